//! Common test utilities and helpers
//!
//! - An application on the in-memory store, driven with `oneshot`
//! - Account helpers (register, login)
//! - PostgreSQL fixtures, active when `DATABASE_URL` is set
//! - Assertion macros

#[macro_use]
pub mod assertions;
pub mod app;
pub mod auth_helpers;

// Re-export commonly used utilities
pub use app::*;
pub use auth_helpers::*;
pub use database::*;
