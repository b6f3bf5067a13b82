//! Chunked image transport protocol
//!
//! [`wire`] holds the header layout; [`classify`] turns a UDP payload into a
//! [`crate::StreamRecord`] when it belongs to the protocol.

mod classify;
pub mod wire;

pub use classify::classify;
