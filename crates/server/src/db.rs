use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};

use crate::config::DatabaseSettings;

const ORGANIZER_DB_FILENAME: &str = "organizer.db";

/// Open the organizer database under `settings.path`, running migrations
/// as needed.
pub async fn init_pool(settings: &DatabaseSettings) -> Result<SqlitePool> {
    let db_root_path = normalize_path(&settings.path)?;
    std::fs::create_dir_all(&db_root_path)
        .with_context(|| format!("failed to create DB path: {}", db_root_path.display()))?;

    let db_path = db_root_path.join(ORGANIZER_DB_FILENAME);
    let db_uri = format!("sqlite://{}", db_path.to_string_lossy());

    let connect_options = SqliteConnectOptions::from_str(&db_uri)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(connect_options)
        .await
        .with_context(|| format!("failed to open database: {}", db_path.display()))?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("failed to run database migrations")?;

    tracing::info!("Database ready at {}", db_path.display());
    Ok(pool)
}

pub(crate) fn normalize_path<P: Into<PathBuf>>(path: P) -> Result<PathBuf> {
    let path = path.into();
    if path.is_absolute() {
        return Ok(path);
    }

    let cwd = std::env::current_dir().context("failed to read current working directory")?;
    Ok(cwd.join(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_pool_creates_database() {
        let temp_dir = TempDir::new().unwrap();
        let settings = DatabaseSettings {
            path: temp_dir.path().join("data"),
            max_connections: 1,
        };

        let pool = init_pool(&settings).await.unwrap();
        let tags: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(tags, 0);
        assert!(temp_dir.path().join("data").join("organizer.db").exists());
    }

    #[test]
    fn test_normalize_relative_path() {
        let path = normalize_path(".organizer").unwrap();
        assert!(path.is_absolute());
        assert!(path.ends_with(".organizer"));
    }
}
