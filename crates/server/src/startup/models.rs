use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::relations::TagSpec;
use crate::validation::fields::{collect, required_date, required_text};
use crate::validation::slug::validate_slug;
use crate::validation::url::{validate_email, validate_web_url};

pub const STARTUP_NAME_MAX: usize = 31;
pub const STARTUP_SLUG_MAX: usize = 31;

#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct StartupRecord {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub founded_date: NaiveDate,
    pub contact: String,
    pub website: String,
}

impl StartupRecord {
    pub fn page_path(&self) -> String {
        format!("/startup/{}/", self.slug)
    }

    pub fn api_path(&self) -> String {
        format!("/api/v1/startup/{}/", self.slug)
    }
}

impl fmt::Display for StartupRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Startup fields as submitted. `tags` of `None` leaves the tag set alone.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StartupInput {
    pub name: String,
    pub slug: Option<String>,
    pub description: String,
    pub founded_date: String,
    pub contact: String,
    pub website: String,
    pub tags: Option<Vec<TagSpec>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct StartupPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<String>,
    pub founded_date: Option<String>,
    pub contact: Option<String>,
    pub website: Option<String>,
    pub tags: Option<Vec<TagSpec>>,
}

impl StartupPatch {
    pub fn apply_to(self, current: &StartupRecord) -> StartupInput {
        StartupInput {
            name: self.name.unwrap_or_else(|| current.name.clone()),
            slug: Some(self.slug.unwrap_or_else(|| current.slug.clone())),
            description: self
                .description
                .unwrap_or_else(|| current.description.clone()),
            founded_date: self
                .founded_date
                .unwrap_or_else(|| current.founded_date.to_string()),
            contact: self.contact.unwrap_or_else(|| current.contact.clone()),
            website: self.website.unwrap_or_else(|| current.website.clone()),
            tags: self.tags,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CleanStartup {
    pub name: String,
    pub slug: Option<String>,
    pub description: String,
    pub founded_date: NaiveDate,
    pub contact: String,
    pub website: String,
    pub tags: Option<Vec<TagSpec>>,
}

impl StartupInput {
    pub fn clean(self) -> Result<CleanStartup, ValidationError> {
        let mut issues = ValidationError::default();

        let name = required_text(&mut issues, "name", &self.name, Some(STARTUP_NAME_MAX));
        let slug = match self.slug.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(slug) => collect(
                &mut issues,
                validate_slug("slug", slug, STARTUP_SLUG_MAX).map(|_| slug.to_string()),
            ),
        };
        let description = required_text(&mut issues, "description", &self.description, None);
        let founded_date = required_date(&mut issues, "founded_date", &self.founded_date);
        let contact = collect(&mut issues, validate_email("contact", &self.contact));
        let website = collect(&mut issues, validate_web_url("website", &self.website));

        match (name, description, founded_date, contact, website) {
            (Some(name), Some(description), Some(founded_date), Some(contact), Some(website))
                if issues.is_empty() =>
            {
                Ok(CleanStartup {
                    name,
                    slug,
                    description,
                    founded_date,
                    contact,
                    website,
                    tags: self.tags,
                })
            }
            _ => Err(issues),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_input() -> StartupInput {
        StartupInput {
            name: "JamBon Software".to_string(),
            slug: None,
            description: "Web consulting".to_string(),
            founded_date: "2013-01-18".to_string(),
            contact: "django@jambonsw.com".to_string(),
            website: "https://jambonsw.com".to_string(),
            tags: None,
        }
    }

    #[test]
    fn test_clean_accepts_complete_input() {
        let clean = sample_input().clean().unwrap();
        assert_eq!(clean.name, "JamBon Software");
        assert_eq!(clean.slug, None);
        assert_eq!(clean.founded_date, NaiveDate::from_ymd_opt(2013, 1, 18).unwrap());
    }

    #[test]
    fn test_clean_empty_input_reports_every_field() {
        let err = StartupInput::default().clean().unwrap_err();
        let fields: Vec<_> = err.issues.iter().map(|i| i.field.as_str()).collect();
        assert_eq!(
            fields,
            vec!["name", "description", "founded_date", "contact", "website"]
        );
    }

    #[test]
    fn test_clean_rejects_bad_email_and_url() {
        let mut input = sample_input();
        input.contact = "not-an-email".to_string();
        input.website = "jambonsw".to_string();
        let err = input.clean().unwrap_err();
        assert_eq!(err.issues.len(), 2);
    }

    #[test]
    fn test_patch_applies_over_current() {
        let current = StartupRecord {
            id: 1,
            name: "JamBon".to_string(),
            slug: "jambon".to_string(),
            description: "Consulting".to_string(),
            founded_date: NaiveDate::from_ymd_opt(2013, 1, 18).unwrap(),
            contact: "a@example.com".to_string(),
            website: "https://example.com".to_string(),
        };
        let input = StartupPatch {
            description: Some("Training".to_string()),
            ..StartupPatch::default()
        }
        .apply_to(&current);
        assert_eq!(input.description, "Training");
        assert_eq!(input.founded_date, "2013-01-18");
        assert_eq!(input.slug.as_deref(), Some("jambon"));
        assert!(input.tags.is_none());
    }
}
