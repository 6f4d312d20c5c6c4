//! Seat event fan-out.

pub mod bus;

pub use bus::NotificationBus;
