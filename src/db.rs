use std::str::FromStr;

use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Connection, SqlitePool,
};
use tracing::info;

use crate::{config::DatabaseConfig, error::ConnectionError};

const CREATE_CONTACTS: &str = r#"
CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    message TEXT NOT NULL,
    created_at DATETIME DEFAULT CURRENT_TIMESTAMP
)
"#;

/// Opens the pool, checks it is alive and makes sure the `contacts` table exists.
pub async fn connect(config: &DatabaseConfig) -> Result<SqlitePool, ConnectionError> {
    let options = connect_options(&config.url, &config.auth_token)?;

    let db = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect_with(options)
        .await
        .map_err(ConnectionError::Open)?;

    let mut conn = db.acquire().await.map_err(ConnectionError::Ping)?;
    conn.ping().await.map_err(ConnectionError::Ping)?;
    drop(conn);

    ensure_schema(&db).await?;

    info!(max_connections = config.max_connections, "database ready");
    Ok(db)
}

/// Combines the base url with the auth token. The token is only handed to the
/// engine as the SQLCipher `key` pragma: it does not authenticate anything, stock
/// SQLite ignores it, and on a SQLCipher build a different token cannot open a
/// database created with the old one. The file is created on first use.
pub fn connect_options(url: &str, auth_token: &str) -> Result<SqliteConnectOptions, ConnectionError> {
    let options = SqliteConnectOptions::from_str(url)
        .map_err(ConnectionError::Options)?
        .pragma("key", quote_literal(auth_token))
        .create_if_missing(true);
    Ok(options)
}

pub async fn ensure_schema(db: &SqlitePool) -> Result<(), ConnectionError> {
    sqlx::query(CREATE_CONTACTS)
        .execute(db)
        .await
        .map_err(ConnectionError::Schema)?;
    Ok(())
}

// pragma values are spliced into the statement as-is
fn quote_literal(raw: &str) -> String {
    format!("'{}'", raw.replace('\'', "''"))
}

#[cfg(test)]
pub(crate) async fn memory_pool() -> SqlitePool {
    let config = DatabaseConfig {
        url: "sqlite::memory:".into(),
        auth_token: "test-token".into(),
        max_connections: 1,
    };
    connect(&config).await.expect("in-memory database")
}
