use std::collections::BTreeMap;

use thiserror::Error;

/// A slug (or other unique field) already exists within its scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} '{value}' already exists")]
pub struct DuplicateSlugError {
    pub field: &'static str,
    pub value: String,
}

/// A slug collides with a fixed path segment of the router.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field} may not be '{word}'")]
pub struct ReservedSlugError {
    pub field: &'static str,
    pub word: String,
}

/// A referenced record does not exist.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{entity} not found: {lookup}")]
pub struct NotFoundError {
    pub entity: &'static str,
    pub lookup: String,
}

/// Collection of field-level problems found while cleaning input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Error)]
#[error("validation errors: {issues:?}")]
pub struct ValidationError {
    pub issues: Vec<ValidationIssue>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationIssue {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut error = Self::default();
        error.push(field, message);
        error
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.issues.push(ValidationIssue {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// `Ok(value)` when no issue was recorded.
    pub fn finish<T>(self, value: T) -> Result<T, ValidationError> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

/// Top-level error returned by every record operation.
#[derive(Debug, Error)]
pub enum OrganizerError {
    #[error(transparent)]
    DuplicateSlug(#[from] DuplicateSlugError),

    #[error(transparent)]
    ReservedSlug(#[from] ReservedSlugError),

    #[error(transparent)]
    NotFound(#[from] NotFoundError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type OrganizerResult<T> = Result<T, OrganizerError>;

impl OrganizerError {
    pub fn not_found(entity: &'static str, lookup: impl Into<String>) -> Self {
        NotFoundError {
            entity,
            lookup: lookup.into(),
        }
        .into()
    }

    pub fn duplicate(field: &'static str, value: impl Into<String>) -> Self {
        DuplicateSlugError {
            field,
            value: value.into(),
        }
        .into()
    }

    /// Maps a failed INSERT/UPDATE. Unique-constraint violations raised by the
    /// storage layer become [`DuplicateSlugError`] on the matching field;
    /// `candidates` lists the unique fields of the row and the values written.
    pub fn from_write(err: sqlx::Error, candidates: &[(&'static str, &str)]) -> Self {
        let message = match &err {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                db_err.message().to_string()
            }
            _ => return OrganizerError::Database(err),
        };

        let hit = candidates
            .iter()
            .find(|(field, _)| message.contains(&format!(".{field}")))
            .or_else(|| candidates.first());

        match hit {
            Some((field, value)) => OrganizerError::duplicate(field, *value),
            None => OrganizerError::Database(err),
        }
    }

    /// Per-field messages for the errors a user can fix by editing input.
    /// Returns `None` for not-found and database failures.
    pub fn field_errors(&self) -> Option<BTreeMap<String, Vec<String>>> {
        let mut fields: BTreeMap<String, Vec<String>> = BTreeMap::new();
        match self {
            OrganizerError::DuplicateSlug(err) => {
                fields
                    .entry(err.field.to_string())
                    .or_default()
                    .push(format!("A record with this {} already exists.", err.field));
            }
            OrganizerError::ReservedSlug(err) => {
                fields
                    .entry(err.field.to_string())
                    .or_default()
                    .push(format!("Slug may not be '{}'.", err.word));
            }
            OrganizerError::Validation(err) => {
                for issue in &err.issues {
                    fields
                        .entry(issue.field.clone())
                        .or_default()
                        .push(issue.message.clone());
                }
            }
            OrganizerError::NotFound(_) | OrganizerError::Database(_) => return None,
        }
        Some(fields)
    }

    /// Short label used for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            OrganizerError::DuplicateSlug(_) => "duplicate_slug",
            OrganizerError::ReservedSlug(_) => "reserved_slug",
            OrganizerError::NotFound(_) => "not_found",
            OrganizerError::Validation(_) => "validation",
            OrganizerError::Database(_) => "database",
        }
    }
}
