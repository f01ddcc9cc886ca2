use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::metrics::record_rejected;
use crate::errors::{OrganizerError, ValidationError};

/// JSON error response for a failed record operation.
///
/// Input problems map to 400 with `{"errors": {field: [message]}}`, missing
/// records to 404 and storage failures to 500.
#[derive(Debug)]
pub struct ApiError(pub OrganizerError);

pub type ApiResult<T> = Result<T, ApiError>;

impl From<OrganizerError> for ApiError {
    fn from(err: OrganizerError) -> Self {
        ApiError(err)
    }
}

impl From<sqlx::Error> for ApiError {
    fn from(err: sqlx::Error) -> Self {
        ApiError(err.into())
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Some(fields) = self.0.field_errors() {
            record_rejected(self.0.kind());
            return (StatusCode::BAD_REQUEST, Json(json!({ "errors": fields }))).into_response();
        }

        match self.0 {
            OrganizerError::NotFound(err) => {
                tracing::debug!("{}", err);
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({ "detail": "Not found." })),
                )
                    .into_response()
            }
            other => {
                tracing::error!("Request failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "detail": "Internal server error." })),
                )
                    .into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        let duplicate = ApiError(OrganizerError::duplicate("slug", "django")).into_response();
        assert_eq!(duplicate.status(), StatusCode::BAD_REQUEST);

        let missing = ApiError(OrganizerError::not_found("tag", "django")).into_response();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let broken = ApiError(OrganizerError::Database(sqlx::Error::PoolClosed)).into_response();
        assert_eq!(broken.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
