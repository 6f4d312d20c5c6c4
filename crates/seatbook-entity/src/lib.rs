//! # seatbook-entity
//!
//! Domain entity models for SeatBook. `Booking` is a database row and
//! derives `sqlx::FromRow`; the seat views are value objects served to
//! observers.

pub mod booking;
pub mod resource;

pub use booking::{Allocation, Booking, Itinerary, NewBooking};
pub use resource::{ResourceView, StatusSummary};
