//! RideHub - Main Library
//!
//! RideHub is the backend for a rider community: user accounts with a
//! follower graph, posts, ride events, communities with a shared chat, and
//! one-to-one direct messaging.
//!
//! # Module Structure
//!
//! - **`shared`** - Types shared between the server and its clients
//!   - Users, posts, events, communities, conversations and messages
//!   - Realtime envelope for the socket relay
//!   - Error and configuration types
//!
//! - **`backend`** - Server-side code (only compiled with `ssr` feature)
//!   - Axum HTTP server and route wiring
//!   - Token authentication and media upload relay
//!   - `Store` with PostgreSQL and in-memory backends
//!   - WebSocket fan-out relay
//!
//! # Feature Flags
//!
//! - **`ssr`** - Server build (enabled by default)
//!
//! # Usage
//!
//! ```rust,no_run
//! use ridehub::backend::server::init::create_app;
//! use ridehub::shared::AppConfig;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::from_env()?;
//! let app = create_app(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Consistency
//!
//! Every mutation on an embedded collection (likes, participants, members,
//! follower edges, comments, chat messages) is a single atomic operation at
//! the `Store` boundary. Conversations are keyed by a canonical participant
//! pair that the store keeps unique.

/// Shared types and data structures
pub mod shared;

/// Backend server-side code
#[cfg(feature = "ssr")]
pub mod backend;
