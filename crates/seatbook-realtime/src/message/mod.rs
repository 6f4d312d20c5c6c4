//! WebSocket message types.

pub mod types;

pub use types::{InboundMessage, Operation, OutboundMessage};
