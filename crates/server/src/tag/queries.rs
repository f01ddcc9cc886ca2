use sqlx::SqlitePool;

use super::db::fetch_tag_by_slug;
use super::models::TagRecord;
use crate::errors::{OrganizerError, OrganizerResult};
use crate::post::models::PostRecord;
use crate::startup::models::StartupRecord;

pub async fn list_tags(pool: &SqlitePool) -> OrganizerResult<Vec<TagRecord>> {
    let records = sqlx::query_as::<_, TagRecord>("SELECT id, name, slug FROM tags ORDER BY name")
        .fetch_all(pool)
        .await?;
    Ok(records)
}

pub async fn get_tag(pool: &SqlitePool, slug: &str) -> OrganizerResult<TagRecord> {
    fetch_tag_by_slug(pool, slug)
        .await?
        .ok_or_else(|| OrganizerError::not_found("tag", slug))
}

pub async fn startups_for_tag(
    pool: &SqlitePool,
    tag_id: i64,
) -> OrganizerResult<Vec<StartupRecord>> {
    let records = sqlx::query_as::<_, StartupRecord>(
        "SELECT s.id, s.name, s.slug, s.description, s.founded_date, s.contact, s.website \
         FROM startups s JOIN startup_tags st ON st.startup_id = s.id \
         WHERE st.tag_id = ? ORDER BY s.name",
    )
    .bind(tag_id)
    .fetch_all(pool)
    .await?;
    Ok(records)
}

pub async fn posts_for_tag(pool: &SqlitePool, tag_id: i64) -> OrganizerResult<Vec<PostRecord>> {
    let records = sqlx::query_as::<_, PostRecord>(
        "SELECT p.id, p.title, p.slug, p.text, p.pub_date \
         FROM posts p JOIN post_tags pt ON pt.post_id = p.id \
         WHERE pt.tag_id = ? ORDER BY p.pub_date DESC, p.title",
    )
    .bind(tag_id)
    .fetch_all(pool)
    .await?;
    Ok(records)
}
