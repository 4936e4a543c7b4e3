//! SQLite connection pools.

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::time::Duration;

use crate::config::Config;

const MAX_CONNECTIONS: u32 = 5;

/// Open the database named by `[db] path`.
pub async fn connect(config: &Config) -> Result<SqlitePool> {
    open(&config.db.path).await
}

/// Open (creating if needed) a file database with foreign keys enforced.
pub async fn open(path: &Path) -> Result<SqlitePool> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create database dir: {}", dir.display()))?;
    }

    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5))
        .journal_mode(SqliteJournalMode::Wal);

    SqlitePoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .connect_with(options)
        .await
        .with_context(|| format!("Failed to open database: {}", path.display()))
}

/// A private in-memory database with the schema applied.
///
/// Every in-memory connection is its own database, so the pool holds exactly
/// one connection and never recycles it.
pub async fn open_in_memory() -> Result<SqlitePool> {
    let options = SqliteConnectOptions::new()
        .in_memory(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await?;
    crate::migrate::migrate(&pool).await?;
    Ok(pool)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn open_creates_parent_dirs() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("nested/dir/app.sqlite");
        let pool = open(&path).await.unwrap();
        crate::migrate::migrate(&pool).await.unwrap();
        pool.close().await;
        assert!(path.exists());
    }

    #[tokio::test]
    async fn foreign_keys_enforced() {
        let pool = open_in_memory().await.unwrap();
        let err = sqlx::query(
            "INSERT INTO analysis_history (user_id, text_preview, flesch_score, fog_score, created_at) \
             VALUES (999, 'x', 1.0, 1.0, 0)",
        )
        .execute(&pool)
        .await;
        assert!(err.is_err());
    }
}
