//! Scoped slug uniqueness checks.
//!
//! The checks here are a pre-check run inside the caller's transaction; the
//! unique indexes in `migrations/` stay the authoritative guard.

use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use sqlx::SqliteConnection;

use super::slug::suffixed;
use crate::errors::{OrganizerError, OrganizerResult};

/// Entities whose slugs are unique across the whole table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GlobalEntity {
    Tag,
    Startup,
}

/// Boundary within which a slug must be unique.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlugScope {
    Global(GlobalEntity),
    /// Newslinks, per owning startup.
    PerParent { startup_id: i64 },
    /// Blog posts, per calendar month of `pub_date`.
    PerPeriod { year: i32, month: u32 },
}

impl SlugScope {
    pub fn for_post(pub_date: NaiveDate) -> Self {
        SlugScope::PerPeriod {
            year: pub_date.year(),
            month: pub_date.month(),
        }
    }

    /// `YYYY-MM`, matching the prefix of a stored `pub_date`.
    pub fn period_key(year: i32, month: u32) -> String {
        format!("{year:04}-{month:02}")
    }
}

/// Read access to existing slugs.
#[async_trait]
pub trait SlugLookup: Send {
    /// Whether a record other than `exclude_id` already uses `slug` in `scope`.
    async fn slug_taken(
        &mut self,
        scope: SlugScope,
        slug: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, sqlx::Error>;
}

#[async_trait]
impl SlugLookup for SqliteConnection {
    async fn slug_taken(
        &mut self,
        scope: SlugScope,
        slug: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        // `id IS NOT NULL` holds for every row, so a missing exclusion matches all
        let exists: Option<i64> = match scope {
            SlugScope::Global(GlobalEntity::Tag) => {
                sqlx::query_scalar("SELECT 1 FROM tags WHERE slug = ? AND id IS NOT ? LIMIT 1")
                    .bind(slug)
                    .bind(exclude_id)
                    .fetch_optional(&mut *self)
                    .await?
            }
            SlugScope::Global(GlobalEntity::Startup) => {
                sqlx::query_scalar(
                    "SELECT 1 FROM startups WHERE slug = ? AND id IS NOT ? LIMIT 1",
                )
                .bind(slug)
                .bind(exclude_id)
                .fetch_optional(&mut *self)
                .await?
            }
            SlugScope::PerParent { startup_id } => {
                sqlx::query_scalar(
                    "SELECT 1 FROM newslinks WHERE slug = ? AND startup_id = ? AND id IS NOT ? LIMIT 1",
                )
                .bind(slug)
                .bind(startup_id)
                .bind(exclude_id)
                .fetch_optional(&mut *self)
                .await?
            }
            SlugScope::PerPeriod { year, month } => {
                sqlx::query_scalar(
                    "SELECT 1 FROM posts WHERE slug = ? AND substr(pub_date, 1, 7) = ? AND id IS NOT ? LIMIT 1",
                )
                .bind(slug)
                .bind(SlugScope::period_key(year, month))
                .bind(exclude_id)
                .fetch_optional(&mut *self)
                .await?
            }
        };

        Ok(exists.is_some())
    }
}

/// Fails with a duplicate-slug error when `slug` is already used in `scope`
/// by a record other than `exclude_id`.
pub async fn check_unique<L>(
    lookup: &mut L,
    slug: &str,
    scope: SlugScope,
    exclude_id: Option<i64>,
) -> OrganizerResult<()>
where
    L: SlugLookup + ?Sized,
{
    if lookup.slug_taken(scope, slug, exclude_id).await? {
        return Err(OrganizerError::duplicate("slug", slug));
    }
    Ok(())
}

/// First free slug among `base`, `base-2`, `base-3`, ... in `scope`. Words in
/// `reserved` count as taken.
pub async fn unique_slug<L>(
    lookup: &mut L,
    base: &str,
    scope: SlugScope,
    exclude_id: Option<i64>,
    reserved: &[&str],
    max_len: usize,
) -> OrganizerResult<String>
where
    L: SlugLookup + ?Sized,
{
    let mut n = 1;
    loop {
        let candidate = suffixed(base, n, max_len);
        if !reserved.contains(&candidate.as_str())
            && !lookup.slug_taken(scope, &candidate, exclude_id).await?
        {
            return Ok(candidate);
        }
        n += 1;
    }
}
