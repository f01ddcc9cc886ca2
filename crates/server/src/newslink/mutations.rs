use sqlx::{SqliteConnection, SqlitePool};

use super::db::fetch_newslink;
use super::models::{CleanNewsLink, NewsLinkInput, NewsLinkRecord};
use crate::errors::{OrganizerError, OrganizerResult, ValidationError};
use crate::startup::db::fetch_startup_by_slug;
use crate::startup::models::StartupRecord;
use crate::validation::slug::NEWSLINK_RESERVED_SLUGS;
use crate::validation::{SlugScope, check_not_reserved, check_unique};

pub async fn create_newslink(
    pool: &SqlitePool,
    input: NewsLinkInput,
) -> OrganizerResult<NewsLinkRecord> {
    let clean = input.clean()?;

    let mut tx = pool.begin().await?;
    let startup = resolve_startup(&mut tx, &clean.startup).await?;
    check_slug(&mut tx, &clean.slug, startup.id, None).await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO newslinks (title, slug, pub_date, link, startup_id) \
         VALUES (?, ?, ?, ?, ?) RETURNING id",
    )
    .bind(&clean.title)
    .bind(&clean.slug)
    .bind(clean.pub_date)
    .bind(&clean.link)
    .bind(startup.id)
    .fetch_one(&mut *tx)
    .await
    .map_err(|err| OrganizerError::from_write(err, &[("slug", clean.slug.as_str())]))?;
    tx.commit().await?;

    Ok(record(id, clean, startup))
}

/// Replaces the fields of the newslink at `startup_slug`/`slug`. The
/// newslink may move to another startup; its slug is then checked against
/// the newslinks of the new owner.
pub async fn update_newslink(
    pool: &SqlitePool,
    startup_slug: &str,
    slug: &str,
    input: NewsLinkInput,
) -> OrganizerResult<NewsLinkRecord> {
    let clean = input.clean()?;

    let mut tx = pool.begin().await?;
    let current = fetch_newslink(&mut *tx, startup_slug, slug)
        .await?
        .ok_or_else(|| not_found(startup_slug, slug))?;

    let startup = resolve_startup(&mut tx, &clean.startup).await?;
    check_slug(&mut tx, &clean.slug, startup.id, Some(current.id)).await?;

    sqlx::query(
        "UPDATE newslinks SET title = ?, slug = ?, pub_date = ?, link = ?, startup_id = ? \
         WHERE id = ?",
    )
    .bind(&clean.title)
    .bind(&clean.slug)
    .bind(clean.pub_date)
    .bind(&clean.link)
    .bind(startup.id)
    .bind(current.id)
    .execute(&mut *tx)
    .await
    .map_err(|err| OrganizerError::from_write(err, &[("slug", clean.slug.as_str())]))?;
    tx.commit().await?;

    Ok(record(current.id, clean, startup))
}

pub async fn delete_newslink(
    pool: &SqlitePool,
    startup_slug: &str,
    slug: &str,
) -> OrganizerResult<NewsLinkRecord> {
    let mut tx = pool.begin().await?;
    let newslink = fetch_newslink(&mut *tx, startup_slug, slug)
        .await?
        .ok_or_else(|| not_found(startup_slug, slug))?;

    sqlx::query("DELETE FROM newslinks WHERE id = ?")
        .bind(newslink.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(newslink)
}

pub(crate) fn not_found(startup_slug: &str, slug: &str) -> OrganizerError {
    OrganizerError::not_found("newslink", format!("{startup_slug}/{slug}"))
}

/// An unknown startup is a problem with the submitted `startup` field, not
/// a missing page.
async fn resolve_startup(
    conn: &mut SqliteConnection,
    startup_slug: &str,
) -> OrganizerResult<StartupRecord> {
    match fetch_startup_by_slug(&mut *conn, startup_slug).await? {
        Some(startup) => Ok(startup),
        None => Err(ValidationError::single(
            "startup",
            format!("Startup with slug \"{startup_slug}\" does not exist."),
        )
        .into()),
    }
}

async fn check_slug(
    conn: &mut SqliteConnection,
    slug: &str,
    startup_id: i64,
    exclude_id: Option<i64>,
) -> OrganizerResult<()> {
    check_not_reserved(slug, NEWSLINK_RESERVED_SLUGS)?;
    check_unique(conn, slug, SlugScope::PerParent { startup_id }, exclude_id).await
}

fn record(id: i64, clean: CleanNewsLink, startup: StartupRecord) -> NewsLinkRecord {
    NewsLinkRecord {
        id,
        title: clean.title,
        slug: clean.slug,
        pub_date: clean.pub_date,
        link: clean.link,
        startup_id: startup.id,
        startup_slug: startup.slug,
    }
}
