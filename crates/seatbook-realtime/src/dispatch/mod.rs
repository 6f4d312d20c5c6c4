//! Inbound message dispatch.

pub mod handler;

pub use handler::InboundHandler;
