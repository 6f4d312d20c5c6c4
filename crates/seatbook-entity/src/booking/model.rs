//! Booking entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use seatbook_core::config::BookingConfig;
use seatbook_core::types::id::{BookingId, UserId};
use seatbook_core::types::resource::{HolderId, ResourceId};

/// A confirmed, immutable seat allocation.
///
/// Written once by a successful confirmation and never updated or deleted.
/// At most one booking exists per seat.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Booking {
    /// Unique booking identifier.
    pub id: BookingId,
    /// Seat this booking allocates, in `C{n}-S{m}` form.
    pub resource_id: String,
    /// Lock holder that confirmed the seat.
    pub holder_id: String,
    /// Authenticated user the receipt belongs to.
    pub user_id: UserId,
    /// Train number.
    pub train_number: String,
    /// Departure time, display form.
    pub departure: String,
    /// Arrival time, display form.
    pub arrival: String,
    /// Price in minor units.
    pub amount_cents: i64,
    /// ISO-4217 currency code.
    pub currency: String,
    /// When the booking was written.
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Whether this booking belongs to the given user.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        self.user_id == *user_id
    }

    /// Itinerary fields as a value object.
    pub fn itinerary(&self) -> Itinerary {
        Itinerary {
            train_number: self.train_number.clone(),
            departure: self.departure.clone(),
            arrival: self.arrival.clone(),
        }
    }
}

/// Route details recorded on a booking. Opaque to the coordination layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Itinerary {
    /// Train number.
    pub train_number: String,
    /// Departure time.
    pub departure: String,
    /// Arrival time.
    pub arrival: String,
}

/// Input for appending a booking to the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBooking {
    /// Seat being allocated.
    pub resource_id: ResourceId,
    /// Holder whose lock was released by the confirmation.
    pub holder_id: HolderId,
    /// Owning user.
    pub user_id: UserId,
    /// Route details.
    pub itinerary: Itinerary,
    /// Price in minor units.
    pub amount_cents: i64,
    /// ISO-4217 currency code.
    pub currency: String,
}

impl NewBooking {
    /// Build a booking request priced and routed from configuration.
    pub fn from_config(
        resource_id: ResourceId,
        holder_id: HolderId,
        user_id: UserId,
        config: &BookingConfig,
    ) -> Self {
        Self {
            resource_id,
            holder_id,
            user_id,
            itinerary: Itinerary {
                train_number: config.itinerary.train_number.clone(),
                departure: config.itinerary.departure.clone(),
                arrival: config.itinerary.arrival.clone(),
            },
            amount_cents: config.amount_cents,
            currency: config.currency.clone(),
        }
    }

    /// Materialize the stored record.
    pub fn into_booking(self, id: BookingId, created_at: DateTime<Utc>) -> Booking {
        Booking {
            id,
            resource_id: self.resource_id.to_string(),
            holder_id: self.holder_id.as_str().to_string(),
            user_id: self.user_id,
            train_number: self.itinerary.train_number,
            departure: self.itinerary.departure,
            arrival: self.itinerary.arrival,
            amount_cents: self.amount_cents,
            currency: self.currency,
            created_at,
        }
    }
}

/// A seat known to be allocated, and the booking that allocated it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allocation {
    /// Allocated seat.
    pub resource_id: ResourceId,
    /// The booking behind it.
    pub booking_id: BookingId,
}
