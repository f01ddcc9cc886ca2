use sqlx::{Executor, Sqlite};

use super::models::StartupRecord;

pub async fn fetch_startup_by_slug<'e, E>(
    executor: E,
    slug: &str,
) -> Result<Option<StartupRecord>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, StartupRecord>(
        "SELECT id, name, slug, description, founded_date, contact, website \
         FROM startups WHERE slug = ?",
    )
    .bind(slug)
    .fetch_optional(executor)
    .await
}
