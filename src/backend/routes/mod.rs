//! Route Configuration Module
//!
//! This module configures all HTTP routes for the backend server.
//!
//! # Module Structure
//!
//! ```text
//! routes/
//! ├── mod.rs          - Module exports and documentation
//! ├── router.rs       - Main router, static files and fallback
//! └── api_routes.rs   - `/api` endpoints grouped by resource
//! ```
//!
//! # Route Types
//!
//! - `/api/auth`, `/api/users`, `/api/events`, `/api/posts`,
//!   `/api/communities`, `/api/messages` - JSON REST endpoints
//! - `GET /socket` - WebSocket relay
//! - `/uploads` - locally stored media
//! - everything else - frontend bundle in production, 404 otherwise

/// Main router creation
pub mod router;

/// API endpoint routes
pub mod api_routes;

// Re-export commonly used functions
pub use router::create_router;
