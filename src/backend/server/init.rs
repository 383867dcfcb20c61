/**
 * Server Initialization
 *
 * Builds the Axum application from an `AppConfig`.
 *
 * # Initialization Process
 *
 * 1. Open the store (PostgreSQL or in-memory)
 * 2. Make sure the local uploads directory exists
 * 3. Create the application state (token keys, media store, realtime channel)
 * 4. Create the router
 *
 * Tests skip the first two steps and call `create_router` with a state built
 * on `Store::memory()`.
 */

use axum::Router;

use crate::backend::routes::router::create_router;
use crate::backend::server::config::{load_store, StartupError};
use crate::backend::server::state::AppState;
use crate::shared::AppConfig;

/// Create and configure the Axum application
///
/// # Errors
///
/// Fails when the configured database cannot be reached or the uploads
/// directory cannot be created.
pub async fn create_app(config: AppConfig) -> Result<Router<()>, StartupError> {
    tracing::info!("Initializing RideHub backend server");

    let store = load_store(&config).await?;
    tracing::info!("Using the {} store", store.backend_name());

    if config.media.is_none() {
        tokio::fs::create_dir_all(&config.uploads_dir).await?;
        tracing::info!("Storing uploads in {}", config.uploads_dir.display());
    } else {
        tracing::info!("Relaying uploads to the external media store");
    }

    let app_state = AppState::new(&config, store);
    let app = create_router(app_state, &config);

    tracing::info!("Router configured");
    Ok(app)
}
