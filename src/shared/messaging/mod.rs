//! Messaging Module
//!
//! Direct messaging between two users:
//!
//! - `CanonicalPair` - Order-independent identity of two participants
//! - `Conversation` - The single conversation record for a pair
//! - `DirectMessage` - An append-only message inside a conversation
//!
//! # Usage
//!
//! ```rust
//! use ridehub::shared::messaging::CanonicalPair;
//! use uuid::Uuid;
//!
//! let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
//! assert_eq!(CanonicalPair::new(a, b).unwrap(), CanonicalPair::new(b, a).unwrap());
//! ```

pub mod conversation;
pub mod message;

pub use conversation::{CanonicalPair, Conversation};
pub use message::{DirectMessage, NewDirectMessage};
