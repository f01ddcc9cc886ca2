use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use super::extract::ApiJson;
use super::views::{StartupView, TagView, startup_view, tag_view};
use crate::api::AppState;
use crate::api::errors::{ApiError, ApiResult};
use crate::api::metrics::{record_created, record_deleted, record_updated};
use crate::errors::ValidationError;
use crate::relations::{attach_tag_to_startup, list_tags_for_startup};
use crate::startup::mutations::{create_startup, delete_startup, update_startup};
use crate::startup::queries::{get_startup, list_startups};
use crate::startup::{StartupInput, StartupPatch};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/startup/", get(list).post(create))
        .route(
            "/api/v1/startup/{slug}/",
            get(retrieve).put(update).patch(partial_update).delete(destroy),
        )
        .route("/api/v1/startup/{slug}/tags/", get(tags).post(attach_tag))
}

async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<StartupView>>> {
    let mut views = Vec::new();
    for startup in list_startups(&state.pool).await? {
        views.push(startup_view(&state, startup).await?);
    }
    Ok(Json(views))
}

async fn create(
    State(state): State<AppState>,
    ApiJson(input): ApiJson<StartupInput>,
) -> ApiResult<(StatusCode, Json<StartupView>)> {
    let startup = create_startup(&state.pool, input).await?;
    record_created("startup", &startup.slug);
    Ok((StatusCode::CREATED, Json(startup_view(&state, startup).await?)))
}

async fn retrieve(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<StartupView>> {
    let startup = get_startup(&state.pool, &slug).await?;
    Ok(Json(startup_view(&state, startup).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ApiJson(input): ApiJson<StartupInput>,
) -> ApiResult<Json<StartupView>> {
    let startup = update_startup(&state.pool, &slug, input).await?;
    record_updated("startup", &startup.slug);
    Ok(Json(startup_view(&state, startup).await?))
}

async fn partial_update(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    ApiJson(patch): ApiJson<StartupPatch>,
) -> ApiResult<Json<StartupView>> {
    let current = get_startup(&state.pool, &slug).await?;
    let startup = update_startup(&state.pool, &slug, patch.apply_to(&current)).await?;
    record_updated("startup", &startup.slug);
    Ok(Json(startup_view(&state, startup).await?))
}

async fn destroy(State(state): State<AppState>, Path(slug): Path<String>) -> ApiResult<StatusCode> {
    let (startup, newslinks) = delete_startup(&state.pool, &slug).await?;
    record_deleted("startup", &startup.slug);
    if newslinks > 0 {
        tracing::info!("Deleted {} newslinks of startup {}", newslinks, startup.slug);
    }
    Ok(StatusCode::NO_CONTENT)
}

async fn tags(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> ApiResult<Json<Vec<TagView>>> {
    let startup = get_startup(&state.pool, &slug).await?;
    let tags = list_tags_for_startup(&state.pool, startup.id).await?;
    Ok(Json(
        tags.into_iter().map(|tag| tag_view(&state, tag)).collect(),
    ))
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AttachTag {
    slug: Option<String>,
}

/// Adds an existing tag to the startup. Never creates tags.
async fn attach_tag(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    body: Result<ApiJson<AttachTag>, ApiError>,
) -> ApiResult<StatusCode> {
    let startup = get_startup(&state.pool, &slug).await?;
    let ApiJson(body) = body?;
    let tag_slug = match body.slug.as_deref().map(str::trim) {
        Some(tag_slug) if !tag_slug.is_empty() => tag_slug.to_string(),
        _ => return Err(ValidationError::single("slug", "This field is required.").into()),
    };

    let tag = attach_tag_to_startup(&state.pool, startup.id, &tag_slug).await?;
    tracing::info!("Tagged startup {} with {}", startup.slug, tag.slug);
    Ok(StatusCode::NO_CONTENT)
}
