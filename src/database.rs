use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;

use crate::{config::DatabaseConfig, error::Result};

/// Database connection pool type
pub type DbPool = sqlx::PgPool;

/// Database connection type - supports both pool connections and transactions
/// Pass `&mut conn` for pool connections and `&mut tx` for transactions
pub type DbConn = sqlx::PgConnection;

/// Opens a connection pool using the database section of the configuration.
pub async fn connect(config: &DatabaseConfig) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(config.connection_string().expose_secret())
        .await?;

    Ok(pool)
}

/// Applies the embedded schema migrations.
pub async fn run_migrations(pool: &DbPool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}
