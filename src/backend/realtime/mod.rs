//! Real-time Update Module
//!
//! A single fan-out relay: clients connect to `/socket`, and every text
//! frame one of them sends is rebroadcast to all of them.
//!
//! # Module Structure
//!
//! ```text
//! realtime/
//! ├── mod.rs       - Module exports and documentation
//! ├── broadcast.rs - Channel type and broadcast helper
//! └── socket.rs    - WebSocket upgrade and per-connection relay
//! ```
//!
//! # Delivery
//!
//! Delivery is best effort. A socket that falls more than
//! `broadcast::CHANNEL_CAPACITY` events behind skips the oldest ones, and
//! nothing is ordered relative to REST writes.

/// Event broadcasting utilities
pub mod broadcast;

/// WebSocket relay handler
pub mod socket;

pub use broadcast::{broadcast_event, RealtimeEventBroadcast};
pub use socket::handle_socket_upgrade;
