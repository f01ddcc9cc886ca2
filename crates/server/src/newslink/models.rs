use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::errors::ValidationError;
use crate::validation::fields::{collect, required_date, required_text};
use crate::validation::slug::validate_slug;
use crate::validation::url::validate_web_url;

pub const NEWSLINK_TITLE_MAX: usize = 63;
pub const NEWSLINK_SLUG_MAX: usize = 63;

/// A news article about a startup. Rows are always read joined with their
/// startup so that paths can be built without another lookup.
#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct NewsLinkRecord {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub pub_date: NaiveDate,
    pub link: String,
    pub startup_id: i64,
    pub startup_slug: String,
}

impl NewsLinkRecord {
    /// Newslinks have no page of their own; they are shown on the startup page.
    pub fn page_path(&self) -> String {
        format!("/startup/{}/", self.startup_slug)
    }

    pub fn update_path(&self) -> String {
        format!("/startup/{}/{}/update/", self.startup_slug, self.slug)
    }

    pub fn delete_path(&self) -> String {
        format!("/startup/{}/{}/delete/", self.startup_slug, self.slug)
    }

    pub fn api_path(&self) -> String {
        format!("/api/v1/newslink/{}/{}/", self.startup_slug, self.slug)
    }
}

impl fmt::Display for NewsLinkRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.startup_slug, self.title)
    }
}

/// Newslink fields as submitted. `startup` is the slug of the owning startup.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewsLinkInput {
    pub title: String,
    pub slug: String,
    pub pub_date: String,
    pub link: String,
    pub startup: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct NewsLinkPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub pub_date: Option<String>,
    pub link: Option<String>,
    pub startup: Option<String>,
}

impl NewsLinkPatch {
    pub fn apply_to(self, current: &NewsLinkRecord) -> NewsLinkInput {
        NewsLinkInput {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            slug: self.slug.unwrap_or_else(|| current.slug.clone()),
            pub_date: self
                .pub_date
                .unwrap_or_else(|| current.pub_date.to_string()),
            link: self.link.unwrap_or_else(|| current.link.clone()),
            startup: self
                .startup
                .unwrap_or_else(|| current.startup_slug.clone()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CleanNewsLink {
    pub title: String,
    pub slug: String,
    pub pub_date: NaiveDate,
    pub link: String,
    pub startup: String,
}

impl NewsLinkInput {
    pub fn clean(self) -> Result<CleanNewsLink, ValidationError> {
        let mut issues = ValidationError::default();

        let title = required_text(&mut issues, "title", &self.title, Some(NEWSLINK_TITLE_MAX));
        let slug = self.slug.trim().to_string();
        let slug = collect(
            &mut issues,
            validate_slug("slug", &slug, NEWSLINK_SLUG_MAX).map(|_| slug.clone()),
        );
        let pub_date = required_date(&mut issues, "pub_date", &self.pub_date);
        let link = collect(&mut issues, validate_web_url("link", &self.link));
        let startup = required_text(&mut issues, "startup", &self.startup, None);

        match (title, slug, pub_date, link, startup) {
            (Some(title), Some(slug), Some(pub_date), Some(link), Some(startup))
                if issues.is_empty() =>
            {
                Ok(CleanNewsLink {
                    title,
                    slug,
                    pub_date,
                    link,
                    startup,
                })
            }
            _ => Err(issues),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> NewsLinkRecord {
        NewsLinkRecord {
            id: 1,
            title: "JamBon launches".to_string(),
            slug: "launch".to_string(),
            pub_date: NaiveDate::from_ymd_opt(2018, 3, 1).unwrap(),
            link: "https://news.example.com/launch".to_string(),
            startup_id: 2,
            startup_slug: "jambon".to_string(),
        }
    }

    #[test]
    fn test_paths_are_nested_under_startup() {
        let record = sample_record();
        assert_eq!(record.page_path(), "/startup/jambon/");
        assert_eq!(record.update_path(), "/startup/jambon/launch/update/");
        assert_eq!(record.api_path(), "/api/v1/newslink/jambon/launch/");
    }

    #[test]
    fn test_slug_is_required() {
        let input = NewsLinkInput {
            title: "Launch".to_string(),
            slug: "  ".to_string(),
            pub_date: "2018-03-01".to_string(),
            link: "https://example.com".to_string(),
            startup: "jambon".to_string(),
        };
        let err = input.clean().unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].field, "slug");
    }

    #[test]
    fn test_title_limit() {
        let input = NewsLinkInput {
            title: "t".repeat(64),
            slug: "launch".to_string(),
            pub_date: "2018-03-01".to_string(),
            link: "https://example.com".to_string(),
            startup: "jambon".to_string(),
        };
        let err = input.clean().unwrap_err();
        assert_eq!(err.issues[0].field, "title");
    }

    #[test]
    fn test_patch_keeps_startup() {
        let input = NewsLinkPatch {
            title: Some("Renamed".to_string()),
            ..NewsLinkPatch::default()
        }
        .apply_to(&sample_record());
        assert_eq!(input.title, "Renamed");
        assert_eq!(input.startup, "jambon");
        assert_eq!(input.pub_date, "2018-03-01");
    }
}
