use sqlx::SqlitePool;

use super::db::fetch_newslink;
use super::models::NewsLinkRecord;
use super::mutations::not_found;
use crate::errors::OrganizerResult;

pub async fn list_newslinks(pool: &SqlitePool) -> OrganizerResult<Vec<NewsLinkRecord>> {
    let records = sqlx::query_as::<_, NewsLinkRecord>(
        "SELECT n.id, n.title, n.slug, n.pub_date, n.link, n.startup_id, \
         s.slug AS startup_slug \
         FROM newslinks n JOIN startups s ON s.id = n.startup_id \
         ORDER BY n.pub_date DESC, n.id DESC",
    )
    .fetch_all(pool)
    .await?;
    Ok(records)
}

pub async fn newslinks_for_startup(
    pool: &SqlitePool,
    startup_id: i64,
) -> OrganizerResult<Vec<NewsLinkRecord>> {
    let records = sqlx::query_as::<_, NewsLinkRecord>(
        "SELECT n.id, n.title, n.slug, n.pub_date, n.link, n.startup_id, \
         s.slug AS startup_slug \
         FROM newslinks n JOIN startups s ON s.id = n.startup_id \
         WHERE n.startup_id = ? ORDER BY n.pub_date DESC, n.id DESC",
    )
    .bind(startup_id)
    .fetch_all(pool)
    .await?;
    Ok(records)
}

pub async fn get_newslink(
    pool: &SqlitePool,
    startup_slug: &str,
    slug: &str,
) -> OrganizerResult<NewsLinkRecord> {
    fetch_newslink(pool, startup_slug, slug)
        .await?
        .ok_or_else(|| not_found(startup_slug, slug))
}

pub async fn latest_newslink(pool: &SqlitePool) -> OrganizerResult<Option<NewsLinkRecord>> {
    let record = sqlx::query_as::<_, NewsLinkRecord>(
        "SELECT n.id, n.title, n.slug, n.pub_date, n.link, n.startup_id, \
         s.slug AS startup_slug \
         FROM newslinks n JOIN startups s ON s.id = n.startup_id \
         ORDER BY n.pub_date DESC, n.id DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;
    Ok(record)
}
