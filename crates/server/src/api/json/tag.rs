use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};

use super::extract::ApiJson;
use super::views::{TagView, tag_view};
use crate::api::AppState;
use crate::api::errors::ApiResult;
use crate::api::metrics::{record_created, record_deleted, record_updated};
use crate::tag::mutations::{create_tag, delete_tag, update_tag};
use crate::tag::queries::{get_tag, list_tags};
use crate::tag::{TagInput, TagPatch};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/tag/", get(list).post(create))
        .route(
            "/api/v1/tag/{slug}/",
            get(retrieve).put(update).patch(partial_update).delete(destroy),
        )
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<TagView>>> {
    let tags = list_tags(&state.pool).await?;
    Ok(Json(
        tags.into_iter().map(|tag| tag_view(&state, tag)).collect(),
    ))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<TagInput>,
) -> ApiResult<(StatusCode, Json<TagView>)> {
    let tag = create_tag(&state.pool, input).await?;
    record_created("tag", &tag.slug);
    Ok((StatusCode::CREATED, Json(tag_view(&state, tag))))
}

async fn retrieve(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<TagView>> {
    let tag = get_tag(&state.pool, &slug).await?;
    Ok(Json(tag_view(&state, tag)))
}

async fn update(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ApiJson(input): ApiJson<TagInput>,
) -> ApiResult<Json<TagView>> {
    let tag = update_tag(&state.pool, &slug, input).await?;
    record_updated("tag", &tag.slug);
    Ok(Json(tag_view(&state, tag)))
}

async fn partial_update(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ApiJson(patch): ApiJson<TagPatch>,
) -> ApiResult<Json<TagView>> {
    let current = get_tag(&state.pool, &slug).await?;
    let tag = update_tag(&state.pool, &slug, patch.apply_to(&current)).await?;
    record_updated("tag", &tag.slug);
    Ok(Json(tag_view(&state, tag)))
}

async fn destroy(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<StatusCode> {
    let tag = delete_tag(&state.pool, &slug).await?;
    record_deleted("tag", &tag.slug);
    Ok(StatusCode::NO_CONTENT)
}
