use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use super::extract::ApiJson;
use super::views::{NewsLinkView, newslink_view};
use crate::api::AppState;
use crate::api::errors::ApiResult;
use crate::api::metrics::{record_created, record_deleted, record_updated};
use crate::newslink::mutations::{create_newslink, delete_newslink, update_newslink};
use crate::newslink::queries::{get_newslink, list_newslinks};
use crate::newslink::{NewsLinkInput, NewsLinkPatch};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/newslink/", get(list).post(create))
        .route(
            "/api/v1/newslink/{startup_slug}/{newslink_slug}/",
            get(retrieve).put(update).patch(partial_update).delete(destroy),
        )
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<NewsLinkView>>> {
    let mut views = Vec::new();
    for newslink in list_newslinks(&state.pool).await? {
        views.push(newslink_view(&state, newslink).await?);
    }
    Ok(Json(views))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<NewsLinkInput>,
) -> ApiResult<(StatusCode, Json<NewsLinkView>)> {
    let newslink = create_newslink(&state.pool, input).await?;
    record_created("newslink", &newslink.to_string());
    Ok((StatusCode::CREATED, Json(newslink_view(&state, newslink).await?)))
}

async fn retrieve(
    State(state): State<AppState>,
    Path((startup_slug, newslink_slug)): Path<(String, String)>,
) -> ApiResult<Json<NewsLinkView>> {
    let newslink = get_newslink(&state.pool, &startup_slug, &newslink_slug).await?;
    Ok(Json(newslink_view(&state, newslink).await?))
}

async fn update(
    State(state): State<AppState>,
    Path((startup_slug, newslink_slug)): Path<(String, String)>,
    ApiJson(input): ApiJson<NewsLinkInput>,
) -> ApiResult<Json<NewsLinkView>> {
    let newslink = update_newslink(&state.pool, &startup_slug, &newslink_slug, input).await?;
    record_updated("newslink", &newslink.to_string());
    Ok(Json(newslink_view(&state, newslink).await?))
}

async fn partial_update(
    State(state): State<AppState>,
    Path((startup_slug, newslink_slug)): Path<(String, String)>,
    ApiJson(patch): ApiJson<NewsLinkPatch>,
) -> ApiResult<Json<NewsLinkView>> {
    let current = get_newslink(&state.pool, &startup_slug, &newslink_slug).await?;
    let input = patch.apply_to(&current);
    let newslink = update_newslink(&state.pool, &startup_slug, &newslink_slug, input).await?;
    record_updated("newslink", &newslink.to_string());
    Ok(Json(newslink_view(&state, newslink).await?))
}

async fn destroy(
    State(state): State<AppState>,
    Path((startup_slug, newslink_slug)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    let newslink = delete_newslink(&state.pool, &startup_slug, &newslink_slug).await?;
    record_deleted("newslink", &newslink.to_string());
    Ok(StatusCode::NO_CONTENT)
}
