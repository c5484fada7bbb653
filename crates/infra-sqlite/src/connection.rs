// SQLite Connection Pool Setup

use crate::error::map_sqlx_error;
use crate::settings::DatabaseSettings;
use repokit_core::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use std::time::Duration;
use tracing::info;

/// Create SQLite connection pool with WAL mode and the configured pragmas
pub async fn create_pool(settings: &DatabaseSettings) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(&settings.url)
        .map_err(map_sqlx_error)?
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(Duration::from_millis(settings.busy_timeout_ms))
        .foreign_keys(settings.foreign_keys)
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
        .map_err(map_sqlx_error)?;

    info!(
        url = %settings.url,
        max_connections = settings.max_connections,
        "SQLite pool ready"
    );

    Ok(pool)
}
