use anyhow::Result;
use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions},
};
use std::str::FromStr;

/// Creates an in-memory SQLite pool for testing
pub async fn create_test_pool() -> Result<SqlitePool> {
    let connect_options = SqliteConnectOptions::from_str("sqlite::memory:")?
        .journal_mode(SqliteJournalMode::Wal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1) // In-memory databases should use a single connection
        .connect_with(connect_options)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    Ok(pool)
}

/// Inserts a bare startup row, bypassing validation. Returns its id.
pub async fn insert_startup(pool: &SqlitePool, slug: &str) -> Result<i64> {
    let id: i64 = sqlx::query_scalar(
        "INSERT INTO startups (name, slug, description, founded_date, contact, website) \
         VALUES (?, ?, 'A startup', '2015-01-01', 'hello@example.com', 'https://example.com') \
         RETURNING id",
    )
    .bind(slug)
    .bind(slug)
    .fetch_one(pool)
    .await?;
    Ok(id)
}

/// Inserts a bare tag row whose name equals its slug. Returns its id.
pub async fn insert_tag(pool: &SqlitePool, slug: &str) -> Result<i64> {
    let id: i64 = sqlx::query_scalar("INSERT INTO tags (name, slug) VALUES (?, ?) RETURNING id")
        .bind(slug)
        .bind(slug)
        .fetch_one(pool)
        .await?;
    Ok(id)
}

pub async fn count_rows(pool: &SqlitePool, table: &str) -> Result<i64> {
    let count: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await?;
    Ok(count)
}
