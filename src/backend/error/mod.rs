//! Backend Error Module
//!
//! Error types returned by HTTP handlers and their conversion into JSON
//! responses.
//!
//! # Module Structure
//!
//! ```text
//! error/
//! ├── mod.rs        - Module exports and documentation
//! ├── types.rs      - BackendError and its From conversions
//! └── conversion.rs - IntoResponse implementation
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use ridehub::backend::error::BackendError;
//!
//! fn find(found: bool) -> Result<(), BackendError> {
//!     if !found {
//!         return Err(BackendError::not_found("Post not found"));
//!     }
//!     Ok(())
//! }
//! ```

/// Error type definitions
pub mod types;

/// Error conversion implementations
pub mod conversion;

// Re-export commonly used types
pub use types::BackendError;
