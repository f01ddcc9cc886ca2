use std::fmt;

use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::validation::fields::{collect, required_text};
use crate::validation::slug::validate_slug;

pub const TAG_NAME_MAX: usize = 31;
pub const TAG_SLUG_MAX: usize = 31;

#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct TagRecord {
    pub id: i64,
    pub name: String,
    pub slug: String,
}

impl TagRecord {
    pub fn page_path(&self) -> String {
        format!("/tag/{}/", self.slug)
    }

    pub fn api_path(&self) -> String {
        format!("/api/v1/tag/{}/", self.slug)
    }
}

impl fmt::Display for TagRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Tag fields as submitted by a form or API client. A blank slug is derived
/// from the name.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TagInput {
    pub name: String,
    pub slug: Option<String>,
}

/// Partial update; absent fields keep their current value.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct TagPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
}

impl TagPatch {
    pub fn apply_to(self, current: &TagRecord) -> TagInput {
        TagInput {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            slug: Some(self.slug.unwrap_or_else(|| current.slug.clone())),
        }
    }
}

/// Validated tag fields. `slug` is `None` when it should be derived.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CleanTag {
    pub name: String,
    pub slug: Option<String>,
}

/// Stored form of a tag name: trimmed and lowercased.
pub fn normalize_tag_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}

impl TagInput {
    pub fn clean(&self) -> Result<CleanTag, ValidationError> {
        let mut issues = ValidationError::default();

        let name = required_text(&mut issues, "name", &self.name, Some(TAG_NAME_MAX))
            .map(|name| normalize_tag_name(&name));

        let slug = match self.slug.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(slug) => collect(
                &mut issues,
                validate_slug("slug", slug, TAG_SLUG_MAX).map(|_| slug.to_string()),
            ),
        };

        let (Some(name), true) = (name, issues.is_empty()) else {
            return Err(issues);
        };
        Ok(CleanTag { name, slug })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(name: &str, slug: Option<&str>) -> TagInput {
        TagInput {
            name: name.to_string(),
            slug: slug.map(str::to_string),
        }
    }

    #[test]
    fn test_name_is_lowercased() {
        let clean = input("Django", None).clean().unwrap();
        assert_eq!(clean.name, "django");
        assert_eq!(clean.slug, None);
    }

    #[test]
    fn test_surrounding_whitespace_collapses() {
        assert_eq!(input("a ", None).clean().unwrap().name, "a");
        assert_eq!(input(" A", None).clean().unwrap().name, "a");
    }

    #[test]
    fn test_blank_slug_is_derived_later() {
        assert_eq!(input("web", Some("  ")).clean().unwrap().slug, None);
    }

    #[test]
    fn test_invalid_fields_are_reported_together() {
        let err = input("", Some("not a slug")).clean().unwrap_err();
        let fields: Vec<_> = err.issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "slug"]);
    }

    #[test]
    fn test_patch_keeps_unset_fields() {
        let current = TagRecord {
            id: 1,
            name: "first".to_string(),
            slug: "first".to_string(),
        };
        let patched = TagPatch {
            name: Some("Second".to_string()),
            slug: None,
        }
        .apply_to(&current);
        assert_eq!(patched.name, "Second");
        assert_eq!(patched.slug.as_deref(), Some("first"));
    }

    #[test]
    fn test_paths() {
        let tag = TagRecord {
            id: 1,
            name: "django".to_string(),
            slug: "django".to_string(),
        };
        assert_eq!(tag.page_path(), "/tag/django/");
        assert_eq!(tag.api_path(), "/api/v1/tag/django/");
        assert_eq!(tag.to_string(), "django");
    }
}
