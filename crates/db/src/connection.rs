use std::time::Duration;

use sqlx::sqlite::SqlitePoolOptions;

use orgflow_core::config::DatabaseConfig;

pub type DbPool = sqlx::SqlitePool;

/// Opens a pool sized and timed by the loaded configuration. This is the
/// entry point the CLI commands use; tests that need raw values go through
/// [`connect_with_settings`].
pub async fn connect(database: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    connect_with_settings(&database.url, database.max_connections, database.timeout_secs).await
}

pub async fn connect_with_settings(
    database_url: &str,
    max_connections: u32,
    timeout_secs: u64,
) -> Result<DbPool, sqlx::Error> {
    SqlitePoolOptions::new()
        .max_connections(max_connections.max(1))
        .acquire_timeout(Duration::from_secs(timeout_secs.max(1)))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                // Referential integrity between the org tables depends on
                // this pragma; sqlite ships with it off.
                sqlx::query("PRAGMA foreign_keys = ON").execute(&mut *conn).await?;
                sqlx::query("PRAGMA journal_mode = WAL").execute(&mut *conn).await?;
                sqlx::query("PRAGMA busy_timeout = 5000").execute(&mut *conn).await?;
                Ok(())
            })
        })
        .connect(database_url)
        .await
}
