use sqlx::{SqliteConnection, SqlitePool};

use super::db::{fetch_tag_by_slug, name_conflicts_for_tag};
use super::models::{CleanTag, TAG_SLUG_MAX, TagInput, TagRecord};
use crate::errors::{OrganizerError, OrganizerResult, ValidationError};
use crate::relations;
use crate::validation::slug::{NO_RESERVED_SLUGS, TAG_DERIVED_SKIP};
use crate::validation::{
    GlobalEntity, SlugScope, check_not_reserved, check_unique, slugify, unique_slug,
};

const SCOPE: SlugScope = SlugScope::Global(GlobalEntity::Tag);

pub async fn create_tag(pool: &SqlitePool, input: TagInput) -> OrganizerResult<TagRecord> {
    let clean = input.clean()?;

    let mut tx = pool.begin().await?;
    let tag = insert_tag(&mut tx, clean).await?;
    tx.commit().await?;

    Ok(tag)
}

/// Inserts an already-cleaned tag on `conn`, deriving a free slug when none
/// was given.
pub(crate) async fn insert_tag(
    conn: &mut SqliteConnection,
    clean: CleanTag,
) -> OrganizerResult<TagRecord> {
    if name_conflicts_for_tag(&mut *conn, &clean.name, None).await? {
        return Err(OrganizerError::duplicate("name", clean.name));
    }

    let slug = match clean.slug {
        Some(slug) => {
            check_not_reserved(&slug, NO_RESERVED_SLUGS)?;
            check_unique(&mut *conn, &slug, SCOPE, None).await?;
            slug
        }
        None => {
            let base = slugify(&clean.name);
            if base.is_empty() {
                return Err(ValidationError::single(
                    "slug",
                    "A slug could not be derived from the name; enter one.",
                )
                .into());
            }
            unique_slug(&mut *conn, &base, SCOPE, None, TAG_DERIVED_SKIP, TAG_SLUG_MAX).await?
        }
    };

    let id: i64 = sqlx::query_scalar("INSERT INTO tags (name, slug) VALUES (?, ?) RETURNING id")
        .bind(&clean.name)
        .bind(&slug)
        .fetch_one(&mut *conn)
        .await
        .map_err(|err| {
            OrganizerError::from_write(err, &[("name", clean.name.as_str()), ("slug", slug.as_str())])
        })?;

    Ok(TagRecord {
        id,
        name: clean.name,
        slug,
    })
}

/// Replaces the fields of the tag at `slug`. A blank slug keeps the current one.
pub async fn update_tag(
    pool: &SqlitePool,
    slug: &str,
    input: TagInput,
) -> OrganizerResult<TagRecord> {
    let clean = input.clean()?;

    let mut tx = pool.begin().await?;
    let current = fetch_tag_by_slug(&mut *tx, slug)
        .await?
        .ok_or_else(|| OrganizerError::not_found("tag", slug))?;

    if name_conflicts_for_tag(&mut *tx, &clean.name, Some(current.id)).await? {
        return Err(OrganizerError::duplicate("name", clean.name));
    }

    let new_slug = match clean.slug {
        Some(new_slug) => {
            check_not_reserved(&new_slug, NO_RESERVED_SLUGS)?;
            check_unique(&mut *tx, &new_slug, SCOPE, Some(current.id)).await?;
            new_slug
        }
        None => current.slug.clone(),
    };

    sqlx::query("UPDATE tags SET name = ?, slug = ? WHERE id = ?")
        .bind(&clean.name)
        .bind(&new_slug)
        .bind(current.id)
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            OrganizerError::from_write(
                err,
                &[("name", clean.name.as_str()), ("slug", new_slug.as_str())],
            )
        })?;
    tx.commit().await?;

    Ok(TagRecord {
        id: current.id,
        name: clean.name,
        slug: new_slug,
    })
}

/// Deletes a tag. Startups and posts that carried it only lose the association.
pub async fn delete_tag(pool: &SqlitePool, slug: &str) -> OrganizerResult<TagRecord> {
    let mut tx = pool.begin().await?;
    let tag = fetch_tag_by_slug(&mut *tx, slug)
        .await?
        .ok_or_else(|| OrganizerError::not_found("tag", slug))?;

    relations::detach_tag(&mut tx, tag.id).await?;
    sqlx::query("DELETE FROM tags WHERE id = ?")
        .bind(tag.id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    Ok(tag)
}
