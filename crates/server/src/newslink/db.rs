use sqlx::{Executor, Sqlite};

use super::models::NewsLinkRecord;

pub async fn fetch_newslink<'e, E>(
    executor: E,
    startup_slug: &str,
    slug: &str,
) -> Result<Option<NewsLinkRecord>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, NewsLinkRecord>(
        "SELECT n.id, n.title, n.slug, n.pub_date, n.link, n.startup_id, \
         s.slug AS startup_slug \
         FROM newslinks n JOIN startups s ON s.id = n.startup_id \
         WHERE s.slug = ? AND n.slug = ?",
    )
    .bind(startup_slug)
    .bind(slug)
    .fetch_optional(executor)
    .await
}

pub async fn fetch_newslink_by_id<'e, E>(
    executor: E,
    id: i64,
) -> Result<Option<NewsLinkRecord>, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_as::<_, NewsLinkRecord>(
        "SELECT n.id, n.title, n.slug, n.pub_date, n.link, n.startup_id, \
         s.slug AS startup_slug \
         FROM newslinks n JOIN startups s ON s.id = n.startup_id \
         WHERE n.id = ?",
    )
    .bind(id)
    .fetch_optional(executor)
    .await
}
