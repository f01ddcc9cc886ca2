use sqlx::SqlitePool;

use super::db::fetch_startup_by_slug;
use super::models::StartupRecord;
use crate::errors::{OrganizerError, OrganizerResult};
use crate::post::models::PostRecord;

pub async fn list_startups(pool: &SqlitePool) -> OrganizerResult<Vec<StartupRecord>> {
    let records = sqlx::query_as::<_, StartupRecord>(
        "SELECT id, name, slug, description, founded_date, contact, website \
         FROM startups ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(records)
}

pub async fn get_startup(pool: &SqlitePool, slug: &str) -> OrganizerResult<StartupRecord> {
    fetch_startup_by_slug(pool, slug)
        .await?
        .ok_or_else(|| OrganizerError::not_found("startup", slug))
}

/// Most recently founded startup.
pub async fn latest_startup(pool: &SqlitePool) -> OrganizerResult<Option<StartupRecord>> {
    let record = sqlx::query_as::<_, StartupRecord>(
        "SELECT id, name, slug, description, founded_date, contact, website \
         FROM startups ORDER BY founded_date DESC, id DESC LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;
    Ok(record)
}

pub async fn posts_for_startup(
    pool: &SqlitePool,
    startup_id: i64,
) -> OrganizerResult<Vec<PostRecord>> {
    let records = sqlx::query_as::<_, PostRecord>(
        "SELECT p.id, p.title, p.slug, p.text, p.pub_date \
         FROM posts p JOIN post_startups ps ON ps.post_id = p.id \
         WHERE ps.startup_id = ? ORDER BY p.pub_date DESC, p.title",
    )
    .bind(startup_id)
    .fetch_all(pool)
    .await?;
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers;

    #[tokio::test]
    async fn test_list_orders_by_name() {
        let pool = test_helpers::create_test_pool().await.unwrap();
        for slug in ["zeta", "alpha", "mid"] {
            test_helpers::insert_startup(&pool, slug).await.unwrap();
        }
        let slugs: Vec<String> = list_startups(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.slug)
            .collect();
        assert_eq!(slugs, vec!["alpha", "mid", "zeta"]);
    }

    #[tokio::test]
    async fn test_latest_by_founded_date() {
        let pool = test_helpers::create_test_pool().await.unwrap();
        assert!(latest_startup(&pool).await.unwrap().is_none());

        test_helpers::insert_startup(&pool, "old").await.unwrap();
        let young = test_helpers::insert_startup(&pool, "young").await.unwrap();
        sqlx::query("UPDATE startups SET founded_date = '2019-06-01' WHERE id = ?")
            .bind(young)
            .execute(&pool)
            .await
            .unwrap();

        let latest = latest_startup(&pool).await.unwrap().unwrap();
        assert_eq!(latest.slug, "young");
    }

    #[tokio::test]
    async fn test_get_missing_startup() {
        let pool = test_helpers::create_test_pool().await.unwrap();
        let err = get_startup(&pool, "ghost").await.unwrap_err();
        assert!(matches!(err, OrganizerError::NotFound(ref e) if e.entity == "startup"));
    }
}
