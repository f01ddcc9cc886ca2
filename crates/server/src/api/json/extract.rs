use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;

use crate::api::errors::ApiError;
use crate::errors::ValidationError;

/// Field that body-level problems are reported under.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// `Json` body whose rejections use the API's 400 error envelope.
#[derive(Debug)]
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(ApiJson(value)),
            Err(rejection) => Err(rejected_body(&rejection).into()),
        }
    }
}

fn rejected_body(rejection: &JsonRejection) -> ValidationError {
    let message = match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            "Expected request with `Content-Type: application/json`.".to_string()
        }
        other => other.body_text(),
    };
    tracing::debug!("Rejected JSON body: {}", message);
    ValidationError::single(NON_FIELD_ERRORS, message)
}
