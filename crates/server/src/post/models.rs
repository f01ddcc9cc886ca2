use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::{OrganizerError, OrganizerResult, ValidationError};
use crate::relations::TagSpec;
use crate::validation::fields::{collect, required_date, required_text};
use crate::validation::slug::validate_slug;

pub const POST_TITLE_MAX: usize = 63;
pub const POST_SLUG_MAX: usize = 63;

#[derive(Clone, Debug, PartialEq, Eq, sqlx::FromRow, Serialize)]
pub struct PostRecord {
    pub id: i64,
    pub title: String,
    pub slug: String,
    pub text: String,
    pub pub_date: NaiveDate,
}

impl PostRecord {
    fn date_path(&self) -> String {
        format!(
            "{}/{}/{}",
            self.pub_date.year(),
            self.pub_date.month(),
            self.slug
        )
    }

    pub fn page_path(&self) -> String {
        format!("/blog/{}/", self.date_path())
    }

    pub fn api_path(&self) -> String {
        format!("/api/v1/blog/{}/", self.date_path())
    }
}

impl fmt::Display for PostRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} on {}", self.title, self.pub_date)
    }
}

/// Year and month segments of a post URL: four digits, then one or two.
/// Anything else names no post.
pub fn parse_period(year: &str, month: &str, slug: &str) -> OrganizerResult<(i32, u32)> {
    let digits = |raw: &str, min: usize, max: usize| {
        (min..=max).contains(&raw.len()) && raw.bytes().all(|b| b.is_ascii_digit())
    };
    if digits(year, 4, 4) && digits(month, 1, 2) {
        if let (Ok(year), Ok(month)) = (year.parse(), month.parse()) {
            return Ok((year, month));
        }
    }
    Err(OrganizerError::not_found(
        "post",
        format!("{year}/{month}/{slug}"),
    ))
}

/// Post fields as submitted. `tags` and `startups` of `None` leave the
/// current relations alone; startups are referenced by slug.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostInput {
    pub title: String,
    pub slug: String,
    pub text: String,
    pub pub_date: String,
    pub tags: Option<Vec<TagSpec>>,
    pub startups: Option<Vec<String>>,
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub text: Option<String>,
    pub pub_date: Option<String>,
    pub tags: Option<Vec<TagSpec>>,
    pub startups: Option<Vec<String>>,
}

impl PostPatch {
    pub fn apply_to(self, current: &PostRecord) -> PostInput {
        PostInput {
            title: self.title.unwrap_or_else(|| current.title.clone()),
            slug: self.slug.unwrap_or_else(|| current.slug.clone()),
            text: self.text.unwrap_or_else(|| current.text.clone()),
            pub_date: self
                .pub_date
                .unwrap_or_else(|| current.pub_date.to_string()),
            tags: self.tags,
            startups: self.startups,
        }
    }
}

#[derive(Clone, Debug)]
pub struct CleanPost {
    pub title: String,
    pub slug: String,
    pub text: String,
    pub pub_date: NaiveDate,
    pub tags: Option<Vec<TagSpec>>,
    pub startups: Option<Vec<String>>,
}

impl PostInput {
    pub fn clean(self) -> Result<CleanPost, ValidationError> {
        let mut issues = ValidationError::default();

        let title = required_text(&mut issues, "title", &self.title, Some(POST_TITLE_MAX));
        let slug = self.slug.trim().to_string();
        let slug = collect(
            &mut issues,
            validate_slug("slug", &slug, POST_SLUG_MAX).map(|_| slug.clone()),
        );
        let text = required_text(&mut issues, "text", &self.text, None);
        let pub_date = required_date(&mut issues, "pub_date", &self.pub_date);

        match (title, slug, text, pub_date) {
            (Some(title), Some(slug), Some(text), Some(pub_date)) if issues.is_empty() => {
                Ok(CleanPost {
                    title,
                    slug,
                    text,
                    pub_date,
                    tags: self.tags,
                    startups: self.startups,
                })
            }
            _ => Err(issues),
        }
    }
}
