use sqlx::{SqliteConnection, SqlitePool};

use super::db::fetch_startup_by_slug;
use super::models::{CleanStartup, STARTUP_SLUG_MAX, StartupInput, StartupRecord};
use crate::errors::{OrganizerError, OrganizerResult, ValidationError};
use crate::relations::{self, TagOwner};
use crate::validation::slug::STARTUP_RESERVED_SLUGS;
use crate::validation::{
    GlobalEntity, SlugScope, check_not_reserved, check_unique, slugify, unique_slug,
};

const SCOPE: SlugScope = SlugScope::Global(GlobalEntity::Startup);

pub async fn create_startup(
    pool: &SqlitePool,
    input: StartupInput,
) -> OrganizerResult<StartupRecord> {
    let clean = input.clean()?;

    let mut tx = pool.begin().await?;
    let slug = match &clean.slug {
        Some(slug) => checked_slug(&mut tx, slug, None).await?,
        None => derived_slug(&mut tx, &clean.name, None).await?,
    };

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO startups (name, slug, description, founded_date, contact, website) \
         VALUES (?, ?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&clean.name)
    .bind(&slug)
    .bind(&clean.description)
    .bind(clean.founded_date)
    .bind(&clean.contact)
    .bind(&clean.website)
    .fetch_one(&mut *tx)
    .await
    .map_err(|err| OrganizerError::from_write(err, &[("slug", slug.as_str())]))?;

    if let Some(tags) = &clean.tags {
        relations::replace_tags(&mut tx, TagOwner::Startup(id), tags).await?;
    }
    tx.commit().await?;

    Ok(record(id, slug, clean))
}

/// Replaces the fields of the startup at `slug`. A blank slug keeps the
/// current one; `tags` of `None` keeps the current tag set.
pub async fn update_startup(
    pool: &SqlitePool,
    slug: &str,
    input: StartupInput,
) -> OrganizerResult<StartupRecord> {
    let clean = input.clean()?;

    let mut tx = pool.begin().await?;
    let current = fetch_startup_by_slug(&mut *tx, slug)
        .await?
        .ok_or_else(|| OrganizerError::not_found("startup", slug))?;

    let new_slug = match &clean.slug {
        Some(new_slug) => checked_slug(&mut tx, new_slug, Some(current.id)).await?,
        None => current.slug.clone(),
    };

    sqlx::query(
        "UPDATE startups SET name = ?, slug = ?, description = ?, founded_date = ?, \
         contact = ?, website = ? WHERE id = ?",
    )
    .bind(&clean.name)
    .bind(&new_slug)
    .bind(&clean.description)
    .bind(clean.founded_date)
    .bind(&clean.contact)
    .bind(&clean.website)
    .bind(current.id)
    .execute(&mut *tx)
    .await
    .map_err(|err| OrganizerError::from_write(err, &[("slug", new_slug.as_str())]))?;

    if let Some(tags) = &clean.tags {
        relations::replace_tags(&mut tx, TagOwner::Startup(current.id), tags).await?;
    }
    tx.commit().await?;

    Ok(record(current.id, new_slug, clean))
}

/// Deletes a startup and its newslinks. Returns the deleted record and the
/// number of newslinks removed with it.
pub async fn delete_startup(
    pool: &SqlitePool,
    slug: &str,
) -> OrganizerResult<(StartupRecord, u64)> {
    let mut tx = pool.begin().await?;
    let startup = fetch_startup_by_slug(&mut *tx, slug)
        .await?
        .ok_or_else(|| OrganizerError::not_found("startup", slug))?;

    let newslinks = relations::delete_startup(&mut tx, startup.id).await?;
    tx.commit().await?;

    Ok((startup, newslinks))
}

async fn checked_slug(
    conn: &mut SqliteConnection,
    slug: &str,
    exclude_id: Option<i64>,
) -> OrganizerResult<String> {
    check_not_reserved(slug, STARTUP_RESERVED_SLUGS)?;
    check_unique(conn, slug, SCOPE, exclude_id).await?;
    Ok(slug.to_string())
}

async fn derived_slug(
    conn: &mut SqliteConnection,
    name: &str,
    exclude_id: Option<i64>,
) -> OrganizerResult<String> {
    let base = slugify(name);
    if base.is_empty() {
        return Err(ValidationError::single(
            "slug",
            "A slug could not be derived from the name; enter one.",
        )
        .into());
    }
    unique_slug(
        conn,
        &base,
        SCOPE,
        exclude_id,
        STARTUP_RESERVED_SLUGS,
        STARTUP_SLUG_MAX,
    )
    .await
}

fn record(id: i64, slug: String, clean: CleanStartup) -> StartupRecord {
    StartupRecord {
        id,
        name: clean.name,
        slug,
        description: clean.description,
        founded_date: clean.founded_date,
        contact: clean.contact,
        website: clean.website,
    }
}
