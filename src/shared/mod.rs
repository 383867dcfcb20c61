//! Shared Module
//!
//! Types and data structures that cross the HTTP boundary. Everything in
//! here is serialisable with the camelCase field names the web client
//! expects.

/// User accounts and public profiles
pub mod users;

/// Posts, events and their embedded likes/comments
pub mod content;

/// Communities and their chat threads
pub mod community;

/// Conversations and direct messages
pub mod messaging;

/// Realtime socket envelope
pub mod realtime;

/// Lenient deserializers for form-encoded request fields
pub mod forms;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use users::{BikeDetails, PublicUser, Role, User, UserProfile};
pub use content::{Comment, ContentKind, Event, Post};
pub use community::{Chat, ChatMessage, Community};
pub use messaging::{CanonicalPair, Conversation, DirectMessage};
pub use realtime::RealtimeEvent;
pub use error::SharedError;
pub use config::{AppConfig, AppConfigBuilder, ConfigError, MediaConfig};
