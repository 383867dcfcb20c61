//! Server Module
//!
//! Everything needed to turn an `AppConfig` into a running Axum router.
//!
//! # Module Structure
//!
//! ```text
//! server/
//! ├── mod.rs          - Module exports and documentation
//! ├── state.rs        - AppState and FromRef implementations
//! ├── config.rs       - Store loading and StartupError
//! └── init.rs         - Server initialization and app creation
//! ```
//!
//! # State Management
//!
//! `AppState` holds the `Store`, the token keys, the media store, the
//! realtime broadcast sender and the bcrypt cost. Each is cheap to clone and
//! shared by all request handlers.
//!
//! # Example
//!
//! ```rust,no_run
//! use ridehub::backend::server::create_app;
//! use ridehub::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let app = create_app(AppConfig::from_env()?).await?;
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:5000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

/// Application state management
pub mod state;

/// Store loading
pub mod config;

/// Server initialization
pub mod init;

// Re-export commonly used types
pub use config::StartupError;
pub use init::create_app;
pub use state::AppState;
