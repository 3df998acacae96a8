use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;

use crate::config::Config;

/// Pool settings for the catalog database.
///
/// Catalog traffic is small single-row reads and writes, so the pool stays narrow and
/// keeps one warm connection. An in-memory `SQLite` database exists per connection and
/// is therefore pinned to one.
#[must_use]
pub fn pool_options(config: &Config) -> ConnectOptions {
    let max_connections = if config.database_url.contains(":memory:") {
        1
    } else {
        config.database_max_connections.max(1)
    };

    let mut opts = ConnectOptions::new(config.database_url.clone());
    opts.max_connections(max_connections)
        .min_connections(1)
        .connect_timeout(Duration::from_secs(5))
        .acquire_timeout(Duration::from_secs(10))
        .idle_timeout(Duration::from_secs(600))
        .sqlx_logging(false);
    opts
}

/// Connect to the catalog database.
///
/// # Errors
///
/// Returns an error if the connection cannot be established.
pub async fn connect(config: &Config) -> anyhow::Result<DatabaseConnection> {
    let db = Database::connect(pool_options(config)).await?;
    tracing::debug!(
        max_connections = config.database_max_connections,
        "Database pool ready"
    );
    Ok(db)
}
