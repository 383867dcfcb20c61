//! Middleware Module
//!
//! Request extractors shared by all handlers.
//!
//! - **`auth`** - `AuthUser` and `OptionalAuthUser` bearer-token extractors
//! - **`forms`** - `ApiJson`, `ApiQuery`, `ApiPath` and the JSON-or-multipart `MediaForm`

pub mod auth;
pub mod forms;

pub use auth::{AuthUser, OptionalAuthUser};
pub use forms::{ApiJson, ApiPath, ApiQuery, MediaForm, UploadedFile};
