use sqlx::{SqliteConnection, SqlitePool};

use super::db::fetch_post;
use super::models::{CleanPost, PostInput, PostRecord};
use crate::errors::{OrganizerError, OrganizerResult};
use crate::relations::{self, TagOwner};
use crate::validation::{SlugScope, check_unique};

pub async fn create_post(pool: &SqlitePool, input: PostInput) -> OrganizerResult<PostRecord> {
    let clean = input.clean()?;

    let mut tx = pool.begin().await?;
    check_unique(&mut *tx, &clean.slug, SlugScope::for_post(clean.pub_date), None).await?;

    let id: i64 = sqlx::query_scalar(
        "INSERT INTO posts (title, slug, text, pub_date) VALUES (?, ?, ?, ?) RETURNING id",
    )
    .bind(&clean.title)
    .bind(&clean.slug)
    .bind(&clean.text)
    .bind(clean.pub_date)
    .fetch_one(&mut *tx)
    .await
    .map_err(|err| OrganizerError::from_write(err, &[("slug", clean.slug.as_str())]))?;

    link_relations(&mut tx, id, &clean).await?;
    tx.commit().await?;

    Ok(record(id, clean))
}

/// Replaces the fields of the post at `year`/`month`/`slug`. Moving the post
/// to another month re-checks its slug within the new month.
pub async fn update_post(
    pool: &SqlitePool,
    year: i32,
    month: u32,
    slug: &str,
    input: PostInput,
) -> OrganizerResult<PostRecord> {
    let clean = input.clean()?;

    let mut tx = pool.begin().await?;
    let current = fetch_post(&mut *tx, year, month, slug)
        .await?
        .ok_or_else(|| not_found(year, month, slug))?;

    check_unique(
        &mut *tx,
        &clean.slug,
        SlugScope::for_post(clean.pub_date),
        Some(current.id),
    )
    .await?;

    sqlx::query("UPDATE posts SET title = ?, slug = ?, text = ?, pub_date = ? WHERE id = ?")
        .bind(&clean.title)
        .bind(&clean.slug)
        .bind(&clean.text)
        .bind(clean.pub_date)
        .bind(current.id)
        .execute(&mut *tx)
        .await
        .map_err(|err| OrganizerError::from_write(err, &[("slug", clean.slug.as_str())]))?;

    link_relations(&mut tx, current.id, &clean).await?;
    tx.commit().await?;

    Ok(record(current.id, clean))
}

/// Deletes a post. Its tags and startups only lose the association.
pub async fn delete_post(
    pool: &SqlitePool,
    year: i32,
    month: u32,
    slug: &str,
) -> OrganizerResult<PostRecord> {
    let mut tx = pool.begin().await?;
    let post = fetch_post(&mut *tx, year, month, slug)
        .await?
        .ok_or_else(|| not_found(year, month, slug))?;

    relations::detach_post(&mut tx, post.id).await?;
    sqlx::query("DELETE FROM posts WHERE id = ?")
        .bind(post.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(post)
}

pub(crate) fn not_found(year: i32, month: u32, slug: &str) -> OrganizerError {
    OrganizerError::not_found("post", format!("{year}/{month}/{slug}"))
}

async fn link_relations(
    conn: &mut SqliteConnection,
    post_id: i64,
    clean: &CleanPost,
) -> OrganizerResult<()> {
    if let Some(tags) = &clean.tags {
        relations::replace_tags(conn, TagOwner::Post(post_id), tags).await?;
    }
    if let Some(startups) = &clean.startups {
        relations::replace_startups(conn, post_id, startups).await?;
    }
    Ok(())
}

fn record(id: i64, clean: CleanPost) -> PostRecord {
    PostRecord {
        id,
        title: clean.title,
        slug: clean.slug,
        text: clean.text,
        pub_date: clean.pub_date,
    }
}
