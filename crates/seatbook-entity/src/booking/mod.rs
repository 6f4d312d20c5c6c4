//! Booking domain entities.

pub mod model;

pub use model::{Allocation, Booking, Itinerary, NewBooking};
