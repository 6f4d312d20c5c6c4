//! HTTP and WebSocket handlers.

pub mod booking;
pub mod health;
pub mod seat;
pub mod ws;
