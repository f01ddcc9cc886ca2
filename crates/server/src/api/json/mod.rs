//! JSON API under `/api/v1`.

mod blog;
pub mod extract;
mod newslink;
mod startup;
mod tag;
pub mod views;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde_json::{Map, Value};

use super::AppState;

pub const API_PREFIX: &str = "/api/v1";

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/", get(api_root))
        .merge(tag::routes())
        .merge(startup::routes())
        .merge(newslink::routes())
        .merge(blog::routes())
}

/// Absolute list URL of every endpoint, keyed by name.
async fn api_root(State(state): State<AppState>) -> Json<Map<String, Value>> {
    let endpoints = ["tag", "startup", "newslink", "blog"];
    let map = endpoints
        .iter()
        .map(|name| {
            let url = state.absolute_url(&format!("{API_PREFIX}/{name}/"));
            (name.to_string(), Value::String(url))
        })
        .collect();
    Json(map)
}
