//! Hold, confirmation, and inventory configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Longest accepted hold lifetime, in seconds.
pub const MAX_HOLD_TTL_SECONDS: u64 = 86_400;

/// Settings for holds and the bookings written on confirmation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfig {
    /// Lifetime of a hold in the lock store, in seconds.
    #[serde(default = "default_hold_ttl")]
    pub hold_ttl_seconds: u64,
    /// Price charged per seat, in minor units.
    #[serde(default = "default_amount_cents")]
    pub amount_cents: i64,
    /// ISO-4217 currency code.
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Itinerary recorded on every booking.
    #[serde(default)]
    pub itinerary: ItineraryConfig,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            hold_ttl_seconds: default_hold_ttl(),
            amount_cents: default_amount_cents(),
            currency: default_currency(),
            itinerary: ItineraryConfig::default(),
        }
    }
}

impl BookingConfig {
    /// Hold lifetime as a [`Duration`].
    pub fn hold_ttl(&self) -> Duration {
        Duration::from_secs(self.hold_ttl_seconds)
    }
}

/// The single train served by this inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItineraryConfig {
    /// Train number.
    #[serde(default = "default_train_number")]
    pub train_number: String,
    /// Departure time, display form.
    #[serde(default = "default_departure")]
    pub departure: String,
    /// Arrival time, display form.
    #[serde(default = "default_arrival")]
    pub arrival: String,
}

impl Default for ItineraryConfig {
    fn default() -> Self {
        Self {
            train_number: default_train_number(),
            departure: default_departure(),
            arrival: default_arrival(),
        }
    }
}

/// Fixed seat inventory, loaded once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryConfig {
    /// Number of coaches.
    #[serde(default = "default_coaches")]
    pub coaches: u16,
    /// Seats in every coach.
    #[serde(default = "default_seats_per_coach")]
    pub seats_per_coach: u16,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            coaches: default_coaches(),
            seats_per_coach: default_seats_per_coach(),
        }
    }
}

impl InventoryConfig {
    /// Total number of seats.
    pub fn capacity(&self) -> usize {
        self.coaches as usize * self.seats_per_coach as usize
    }
}

fn default_hold_ttl() -> u64 {
    300
}

fn default_amount_cents() -> i64 {
    5_000
}

fn default_currency() -> String {
    "USD".to_string()
}

fn default_train_number() -> String {
    "T123".to_string()
}

fn default_departure() -> String {
    "10:00 AM".to_string()
}

fn default_arrival() -> String {
    "6:00 PM".to_string()
}

fn default_coaches() -> u16 {
    6
}

fn default_seats_per_coach() -> u16 {
    20
}
