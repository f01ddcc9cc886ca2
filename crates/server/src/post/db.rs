use sqlx::{Executor, Sqlite};

use super::models::PostRecord;
use crate::validation::SlugScope;

/// Lookup by slug within the month of `year`/`month`.
pub async fn fetch_post<'e, E>(
    executor: E,
    year: i32,
    month: u32,
    slug: &str,
) -> Result<Option<PostRecord>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, PostRecord>(
        "SELECT id, title, slug, text, pub_date FROM posts \
         WHERE slug = ? AND substr(pub_date, 1, 7) = ?",
    )
    .bind(slug)
    .bind(SlugScope::period_key(year, month))
    .fetch_optional(executor)
    .await
}
