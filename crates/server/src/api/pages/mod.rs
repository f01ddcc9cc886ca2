//! Server-rendered HTML pages.

mod blog;
pub mod form;
pub mod html;
pub mod markdown;
mod newslink;
mod startup;
mod tag;

use axum::Router;
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};
use axum::routing::get;

use super::AppState;
use crate::errors::OrganizerError;
use html::{escape, layout};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(|| async { redirect("/blog/") }))
        .merge(tag::routes())
        .merge(startup::routes())
        .merge(newslink::routes())
        .merge(blog::routes())
}

/// A page request that cannot be served.
#[derive(Debug)]
pub enum PageError {
    NotFound,
    BadRequest(String),
    Internal(OrganizerError),
}

pub type PageResult = Result<Response, PageError>;

impl From<OrganizerError> for PageError {
    fn from(err: OrganizerError) -> Self {
        match err {
            OrganizerError::NotFound(_) => PageError::NotFound,
            other => PageError::Internal(other),
        }
    }
}

impl From<sqlx::Error> for PageError {
    fn from(err: sqlx::Error) -> Self {
        PageError::Internal(err.into())
    }
}

impl IntoResponse for PageError {
    fn into_response(self) -> Response {
        match self {
            PageError::NotFound => not_found_page(),
            PageError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                layout(
                    "Bad Request",
                    &format!("<h2>Bad Request</h2><p>{}</p>", escape(&message)),
                ),
            )
                .into_response(),
            PageError::Internal(err) => {
                tracing::error!("Page failed: {}", err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    layout("Server Error", "<h2>Something went wrong.</h2>"),
                )
                    .into_response()
            }
        }
    }
}

/// 302 to `location`.
pub fn redirect(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

pub async fn not_found() -> Response {
    not_found_page()
}

fn not_found_page() -> Response {
    (
        StatusCode::NOT_FOUND,
        layout("Not Found", "<h2>Page not found.</h2>"),
    )
        .into_response()
}

/// Splits a failed write into form errors the user can fix and failures
/// that end the request.
fn form_errors(err: OrganizerError) -> Result<html::FormErrors, PageError> {
    match err.field_errors() {
        Some(fields) => {
            super::metrics::record_rejected(err.kind());
            Ok(html::FormErrors::new(fields))
        }
        None => Err(err.into()),
    }
}
