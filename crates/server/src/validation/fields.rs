use chrono::NaiveDate;

use crate::errors::ValidationError;

/// Trimmed required text. Records an issue and returns `None` when the value
/// is blank or longer than `max_len` characters.
pub fn required_text(
    issues: &mut ValidationError,
    field: &str,
    raw: &str,
    max_len: Option<usize>,
) -> Option<String> {
    let value = raw.trim();
    if value.is_empty() {
        issues.push(field, "This field is required.");
        return None;
    }

    if let Some(max_len) = max_len {
        if value.chars().count() > max_len {
            issues.push(
                field,
                format!("Ensure this value has at most {max_len} characters."),
            );
            return None;
        }
    }

    Some(value.to_string())
}

/// Parses an ISO `YYYY-MM-DD` date.
pub fn required_date(issues: &mut ValidationError, field: &str, raw: &str) -> Option<NaiveDate> {
    let value = raw.trim();
    if value.is_empty() {
        issues.push(field, "This field is required.");
        return None;
    }

    match NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            issues.push(field, "Enter a valid date in YYYY-MM-DD format.");
            None
        }
    }
}

/// Runs a single-field validator and folds its issues into `issues`.
pub fn collect<T>(issues: &mut ValidationError, result: Result<T, ValidationError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            issues.issues.extend(err.issues);
            None
        }
    }
}
