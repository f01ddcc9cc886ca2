use sqlx::{Executor, Sqlite};

use super::models::TagRecord;

pub async fn fetch_tag_by_id<'e, E>(executor: E, id: i64) -> Result<Option<TagRecord>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, TagRecord>("SELECT id, name, slug FROM tags WHERE id = ?")
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub async fn fetch_tag_by_slug<'e, E>(
    executor: E,
    slug: &str,
) -> Result<Option<TagRecord>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, TagRecord>("SELECT id, name, slug FROM tags WHERE slug = ?")
        .bind(slug)
        .fetch_optional(executor)
        .await
}

/// Case-insensitive slug lookup.
pub async fn find_tag_by_slug_ci<'e, E>(
    executor: E,
    slug: &str,
) -> Result<Option<TagRecord>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, TagRecord>(
        "SELECT id, name, slug FROM tags WHERE slug = ? COLLATE NOCASE ORDER BY id LIMIT 1",
    )
    .bind(slug)
    .fetch_optional(executor)
    .await
}

/// Lookup by already-normalized name.
pub async fn fetch_tag_by_name<'e, E>(
    executor: E,
    name: &str,
) -> Result<Option<TagRecord>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, TagRecord>("SELECT id, name, slug FROM tags WHERE name = ?")
        .bind(name)
        .fetch_optional(executor)
        .await
}

pub async fn name_conflicts_for_tag<'e, E>(
    executor: E,
    name: &str,
    exclude_id: Option<i64>,
) -> Result<bool, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    let exists: Option<i64> =
        sqlx::query_scalar("SELECT 1 FROM tags WHERE name = ? AND id IS NOT ? LIMIT 1")
            .bind(name)
            .bind(exclude_id)
            .fetch_optional(executor)
            .await?;
    Ok(exists.is_some())
}
