use sqlx::SqlitePool;

use super::db::fetch_post;
use super::models::PostRecord;
use super::mutations::not_found;
use crate::errors::OrganizerResult;

pub async fn list_posts(pool: &SqlitePool) -> OrganizerResult<Vec<PostRecord>> {
    let records = sqlx::query_as::<_, PostRecord>(
        "SELECT id, title, slug, text, pub_date FROM posts ORDER BY pub_date DESC, title",
    )
    .fetch_all(pool)
    .await?;
    Ok(records)
}

pub async fn get_post(
    pool: &SqlitePool,
    year: i32,
    month: u32,
    slug: &str,
) -> OrganizerResult<PostRecord> {
    fetch_post(pool, year, month, slug)
        .await?
        .ok_or_else(|| not_found(year, month, slug))
}

pub async fn latest_post(pool: &SqlitePool) -> OrganizerResult<Option<PostRecord>> {
    let record = sqlx::query_as::<_, PostRecord>(
        "SELECT id, title, slug, text, pub_date FROM posts \
         ORDER BY pub_date DESC, title LIMIT 1",
    )
    .fetch_optional(pool)
    .await?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::OrganizerError;
    use crate::test_helpers;

    async fn insert(pool: &SqlitePool, title: &str, pub_date: &str) {
        sqlx::query("INSERT INTO posts (title, slug, text, pub_date) VALUES (?, ?, '', ?)")
            .bind(title)
            .bind(title)
            .bind(pub_date)
            .execute(pool)
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_list_orders_by_date_then_title() {
        let pool = test_helpers::create_test_pool().await.unwrap();
        insert(&pool, "b", "2017-01-01").await;
        insert(&pool, "a", "2017-01-01").await;
        insert(&pool, "c", "2018-06-01").await;

        let titles: Vec<String> = list_posts(&pool)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.title)
            .collect();
        assert_eq!(titles, vec!["c", "a", "b"]);
        assert_eq!(latest_post(&pool).await.unwrap().unwrap().title, "c");
    }

    #[tokio::test]
    async fn test_get_by_month() {
        let pool = test_helpers::create_test_pool().await.unwrap();
        insert(&pool, "b", "2017-01-21").await;

        assert_eq!(get_post(&pool, 2017, 1, "b").await.unwrap().title, "b");
        let err = get_post(&pool, 2017, 2, "b").await.unwrap_err();
        assert!(matches!(err, OrganizerError::NotFound(ref e) if e.lookup == "2017/2/b"));
    }
}
