use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use super::extract::ApiJson;
use super::views::{PostView, post_view};
use crate::api::AppState;
use crate::api::errors::ApiResult;
use crate::api::metrics::{record_created, record_deleted, record_updated};
use crate::post::mutations::{create_post, delete_post, update_post};
use crate::post::queries::{get_post, list_posts};
use crate::post::models::parse_period;
use crate::post::{PostInput, PostPatch};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/blog/", get(list).post(create))
        .route(
            "/api/v1/blog/{year}/{month}/{slug}/",
            get(retrieve).put(update).patch(partial_update).delete(destroy),
        )
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<PostView>>> {
    let mut views = Vec::new();
    for post in list_posts(&state.pool).await? {
        views.push(post_view(&state, post).await?);
    }
    Ok(Json(views))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<PostInput>,
) -> ApiResult<(StatusCode, Json<PostView>)> {
    let post = create_post(&state.pool, input).await?;
    record_created("post", &post.page_path());
    Ok((StatusCode::CREATED, Json(post_view(&state, post).await?)))
}

async fn retrieve(
    State(state): State<AppState>,
    Path((year, month, slug)): Path<(String, String, String)>,
) -> ApiResult<Json<PostView>> {
    let (year, month) = parse_period(&year, &month, &slug)?;
    let post = get_post(&state.pool, year, month, &slug).await?;
    Ok(Json(post_view(&state, post).await?))
}

async fn update(
    State(state): State<AppState>,
    Path((year, month, slug)): Path<(String, String, String)>,
    ApiJson(input): ApiJson<PostInput>,
) -> ApiResult<Json<PostView>> {
    let (year, month) = parse_period(&year, &month, &slug)?;
    let post = update_post(&state.pool, year, month, &slug, input).await?;
    record_updated("post", &post.page_path());
    Ok(Json(post_view(&state, post).await?))
}

async fn partial_update(
    State(state): State<AppState>,
    Path((year, month, slug)): Path<(String, String, String)>,
    ApiJson(patch): ApiJson<PostPatch>,
) -> ApiResult<Json<PostView>> {
    let (year, month) = parse_period(&year, &month, &slug)?;
    let current = get_post(&state.pool, year, month, &slug).await?;
    let post = update_post(&state.pool, year, month, &slug, patch.apply_to(&current)).await?;
    record_updated("post", &post.page_path());
    Ok(Json(post_view(&state, post).await?))
}

async fn destroy(
    State(state): State<AppState>,
    Path((year, month, slug)): Path<(String, String, String)>,
) -> ApiResult<StatusCode> {
    let (year, month) = parse_period(&year, &month, &slug)?;
    let post = delete_post(&state.pool, year, month, &slug).await?;
    record_deleted("post", &post.page_path());
    Ok(StatusCode::NO_CONTENT)
}
