use std::str::FromStr;

use email_address::EmailAddress;
use url::Url;

use crate::errors::ValidationError;

pub const MAX_URL_LENGTH: usize = 255;
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Validates an absolute http(s) URL and returns it trimmed.
pub fn validate_web_url(field: &str, raw: &str) -> Result<String, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::single(field, "This field is required."));
    }

    let url = Url::parse(raw).map_err(|_| ValidationError::single(field, "Enter a valid URL."))?;

    match url.scheme() {
        "http" | "https" => {}
        _ => {
            return Err(ValidationError::single(
                field,
                "Only http(s) URLs are supported.",
            ));
        }
    }

    if url.host_str().is_none() {
        return Err(ValidationError::single(field, "Enter a valid URL."));
    }

    if raw.len() > MAX_URL_LENGTH {
        return Err(ValidationError::single(
            field,
            format!("Ensure this value has at most {MAX_URL_LENGTH} characters."),
        ));
    }

    Ok(raw.to_string())
}

pub fn validate_email(field: &str, raw: &str) -> Result<String, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::single(field, "This field is required."));
    }

    if raw.len() > MAX_EMAIL_LENGTH || EmailAddress::from_str(raw).is_err() {
        return Err(ValidationError::single(
            field,
            "Enter a valid email address.",
        ));
    }

    Ok(raw.to_string())
}
