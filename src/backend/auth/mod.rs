//! Authentication Module
//!
//! Account registration, login and the bearer tokens that identify callers.
//!
//! # Architecture
//!
//! - **`sessions`** - `AuthConfig`, JWT claims, `TokenKeys` for issue/verify
//! - **`passwords`** - bcrypt hashing on the blocking pool
//! - **`handlers`** - HTTP handlers for `/api/auth`
//!
//! The request-side check lives in `middleware::auth`: handlers take an
//! `AuthUser` argument and never look at headers themselves.
//!
//! # Module Structure
//!
//! ```text
//! auth/
//! ├── mod.rs       - Module exports and documentation
//! ├── sessions.rs  - JWT token management
//! ├── passwords.rs - Password hashing
//! └── handlers/    - HTTP handlers
//! ```
//!
//! # Authentication Flow
//!
//! 1. **Register**: username, email, password, full name → user created (201)
//! 2. **Login**: email or username plus password → token and user returned
//! 3. **Authenticated request**: `Authorization: Bearer <token>` → `AuthUser`
//!
//! # Security
//!
//! - Passwords are hashed with bcrypt before storage and never serialised
//! - Tokens are HS256 JWTs with an `id` claim and a configurable lifetime
//!   (one hour by default)
//! - The signing secret comes from `AppConfig`, never from a global

/// JWT token generation and validation
pub mod sessions;

/// Password hashing
pub mod passwords;

/// HTTP handlers for authentication endpoints
pub mod handlers;

pub use handlers::{
    delete_account, get_profile, list_users, login, register, update_profile, update_role, verify,
};
pub use sessions::{AuthConfig, Claims, TokenKeys};
