//! Resource Handlers
//!
//! HTTP handlers for every resource outside `/api/auth`. Each handler
//! extracts what it needs (`AuthUser`, path IDs, JSON or multipart bodies),
//! makes one or two `Store` calls and answers with JSON. Failures are
//! `BackendError`s, rendered as `{"message","status"}`.
//!
//! # Module Structure
//!
//! ```text
//! handlers/
//! ├── mod.rs         - Module exports and documentation
//! ├── comments.rs    - Comment append shared by posts and events
//! ├── users.rs       - /api/users
//! ├── posts.rs       - /api/posts
//! ├── events.rs      - /api/events
//! ├── communities.rs - /api/communities
//! └── messaging.rs   - /api/messages
//! ```

pub mod comments;
pub mod communities;
pub mod events;
pub mod messaging;
pub mod posts;
pub mod users;
