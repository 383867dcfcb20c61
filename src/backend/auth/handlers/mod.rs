//! Authentication Handlers Module
//!
//! HTTP handlers for the `/api/auth` routes.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs      - Module exports and documentation
//! ├── types.rs    - Request and response types
//! ├── register.rs - Account registration
//! ├── login.rs    - Credential check and token issue
//! └── profile.rs  - Profile, role and account deletion
//! ```
//!
//! # Handlers
//!
//! - **`register`** - POST /api/auth/register
//! - **`login`** - POST /api/auth/login
//! - **`verify`** / **`get_profile`** - GET /api/auth/verify, GET /api/auth/profile
//! - **`list_users`** - GET /api/auth/users
//! - **`update_profile`** - PUT /api/auth/profile
//! - **`update_role`** - PUT /api/auth/profile/role
//! - **`delete_account`** - DELETE /api/auth/profile/{userId}

/// Request and response types
pub mod types;

/// Registration handler
pub mod register;

/// Login handler
pub mod login;

/// Profile and account handlers
pub mod profile;

pub use types::{AuthResponse, LoginRequest, RegisterRequest, UserMessage};

pub use login::login;
pub use profile::{delete_account, get_profile, list_users, update_profile, update_role, verify};
pub use register::register;
