use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::Method;
use sqlx::SqlitePool;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::{json, pages};

/// Shared handler state: the database pool and the public base URL used to
/// build absolute links.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    base_url: Arc<str>,
}

impl AppState {
    pub fn new(pool: SqlitePool, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            pool,
            base_url: Arc::from(base_url.trim_end_matches('/')),
        }
    }

    pub fn absolute_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

pub fn build_api_router(state: AppState) -> Router {
    Router::new()
        .merge(json::router())
        .merge(pages::router())
        .fallback(pages::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_headers(Any)
                .allow_methods([
                    Method::GET,
                    Method::HEAD,
                    Method::POST,
                    Method::PUT,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ]),
        )
        .with_state(state)
}

pub async fn run_api(state: AppState, bind: SocketAddr, shutdown: CancellationToken) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind {bind}"))?;
    tracing::info!("Organizer listening on http://{}", bind);

    axum::serve(listener, build_api_router(state))
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;
    Ok(())
}
