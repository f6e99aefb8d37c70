//! SQLite connection pool and embedded migrations

use std::str::FromStr;
use std::time::Duration;

use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use tracing::info;

use super::StoreError;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Maximum pooled connections for a file-backed database.
/// SQLite has a single writer, so a small pool is enough.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connection acquisition timeout in seconds
const DEFAULT_ACQUIRE_TIMEOUT_SECS: u64 = 30;

/// Shared database handle
#[derive(Clone, Debug)]
pub struct Db {
    pool: SqlitePool,
}

impl Db {
    /// Connect to `url` and apply pending migrations
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(url)?.create_if_missing(true);

        let pool = if is_in_memory(url) {
            // Every connection to :memory: is its own database, so keep exactly one
            // and never let it idle out.
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
                .connect_with(options)
                .await?
        } else {
            SqlitePoolOptions::new()
                .max_connections(DEFAULT_MAX_CONNECTIONS)
                .acquire_timeout(Duration::from_secs(DEFAULT_ACQUIRE_TIMEOUT_SECS))
                .connect_with(options.journal_mode(SqliteJournalMode::Wal))
                .await?
        };

        MIGRATOR.run(&pool).await?;
        info!(url, "Database ready");

        Ok(Self { pool })
    }

    /// Fresh private in-memory database, migrated
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self, StoreError> {
        Self::connect("sqlite::memory:").await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

fn is_in_memory(url: &str) -> bool {
    url.contains(":memory:") || url.contains("mode=memory")
}
