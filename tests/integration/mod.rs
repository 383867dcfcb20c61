//! Integration tests
//!
//! The HTTP API and the socket relay, end to end on the in-memory store,
//! plus the store contract run on both backends.

pub mod database;
