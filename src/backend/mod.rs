//! Backend Module
//!
//! This module contains all server-side code for RideHub: an Axum HTTP
//! server exposing the REST API under `/api`, a WebSocket relay on
//! `/socket`, and the persistence layer behind them.
//!
//! This module is only compiled when the `ssr` feature is enabled.
//!
//! # Architecture
//!
//! - **`server`** - Configuration to router: store loading, `AppState`
//! - **`routes`** - Route table, static files and fallback
//! - **`auth`** - Bearer tokens, password hashing, account endpoints
//! - **`handlers`** - Users, posts, events, communities, direct messages
//! - **`middleware`** - Extractors (`AuthUser`, JSON/multipart bodies)
//! - **`store`** - `Store` with PostgreSQL and in-memory backends
//! - **`populate`** - Resolving user references into public profiles
//! - **`media`** - Upload relay (remote object store or local directory)
//! - **`realtime`** - Broadcast fan-out behind the socket relay
//! - **`error`** - `BackendError` and its JSON rendering
//!
//! # Module Structure
//!
//! ```text
//! backend/
//! ├── mod.rs          - Module exports and documentation
//! ├── main.rs         - Server binary
//! ├── server/         - Server initialization and state
//! ├── routes/         - Route configuration
//! ├── auth/           - Authentication
//! ├── handlers/       - Resource handlers
//! ├── middleware/     - Request extractors
//! ├── store/          - Persistence
//! ├── populate.rs     - Reference population
//! ├── media.rs        - Media store
//! ├── realtime/       - Socket relay
//! └── error/          - Error types
//! ```
//!
//! # Thread Safety
//!
//! Handlers share one `AppState`. The store is either a `PgPool` or an
//! `Arc<RwLock<_>>`, the realtime channel is a `broadcast::Sender`, and every
//! multi-step change to shared data happens inside a single store call.

/// Server setup and configuration
pub mod server;

/// Route configuration
pub mod routes;

/// Authentication and account management
pub mod auth;

/// Resource handlers
pub mod handlers;

/// Request extractors
pub mod middleware;

/// Persistence backends
pub mod store;

/// User reference population
pub mod populate;

/// Uploaded media storage
pub mod media;

/// Real-time relay
pub mod realtime;

/// Backend error types
pub mod error;

/// Re-export commonly used types
pub use error::BackendError;
pub use realtime::{broadcast_event, handle_socket_upgrade, RealtimeEventBroadcast};
pub use server::{create_app, AppState, StartupError};
pub use store::{Store, StoreError};
