//! # seatbook-realtime
//!
//! Real-time WebSocket engine for SeatBook. Provides:
//!
//! - Connection management with JWT authentication before upgrade
//! - Broadcast of seat status changes to every observer
//! - Dispatch of inbound seat commands to the coordination service
//! - Ping keepalive and engine metrics

pub mod connection;
pub mod dispatch;
pub mod message;
pub mod metrics;
pub mod notification;
pub mod server;

pub use connection::manager::ConnectionManager;
pub use dispatch::handler::InboundHandler;
pub use notification::bus::NotificationBus;
pub use server::RealtimeEngine;
