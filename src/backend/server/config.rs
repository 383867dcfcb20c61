/**
 * Store Loading
 *
 * Opens the persistence backend named by the configuration.
 *
 * # Backends
 *
 * - `DATABASE_URL` set: a PostgreSQL pool, with the embedded migrations
 *   applied before the server starts
 * - `DATABASE_URL` unset: the in-memory store, which loses everything on
 *   restart
 *
 * # Error Handling
 *
 * A database that is configured but unreachable stops startup. A failed
 * migration is logged and startup continues, since the schema may already
 * be in place.
 */

use sqlx::PgPool;
use thiserror::Error;

use crate::backend::store::Store;
use crate::shared::{AppConfig, ConfigError};

/// Errors that prevent the server from starting
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("failed to connect to the database: {0}")]
    Database(#[from] sqlx::Error),

    #[error("failed to create uploads directory: {0}")]
    Uploads(#[from] std::io::Error),
}

/// Open the store `config` asks for
///
/// ```rust,no_run
/// use ridehub::backend::server::config::load_store;
/// use ridehub::shared::AppConfig;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = load_store(&AppConfig::default()).await?;
/// assert_eq!(store.backend_name(), "memory");
/// # Ok(())
/// # }
/// ```
pub async fn load_store(config: &AppConfig) -> Result<Store, StartupError> {
    let Some(database_url) = config.database_url.as_deref() else {
        tracing::warn!("DATABASE_URL not set. Using the in-memory store; data is lost on restart.");
        return Ok(Store::memory());
    };

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url).await.map_err(|e| {
        tracing::error!("Failed to create database connection pool: {:?}", e);
        e
    })?;
    tracing::info!("Database connection pool created successfully");

    tracing::info!("Running database migrations...");
    match sqlx::migrate!().run(&pool).await {
        Ok(()) => tracing::info!("Database migrations completed successfully"),
        Err(e) => {
            tracing::error!("Failed to run database migrations: {}", e);
            tracing::warn!("Continuing without migrations - database might not be up to date");
        }
    }

    Ok(Store::Postgres(pool))
}
