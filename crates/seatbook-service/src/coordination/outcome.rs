//! Results of seat operations.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use seatbook_core::types::id::BookingId;

/// Why an operation lost to another claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentionReason {
    /// A live hold exists.
    HeldByOther,
    /// The seat is booked.
    Allocated,
}

/// The expected result of an acquire, release, or confirm.
///
/// Negative results are values, not errors: the caller always learns what
/// happened and can react. `Err` from a service call means an
/// infrastructure fault or invalid input instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum Outcome {
    /// A hold was created.
    Acquired {
        /// When the hold lapses unless confirmed.
        expires_at: DateTime<Utc>,
    },
    /// The hold was cleared.
    Released,
    /// The seat was booked.
    Confirmed {
        /// The new booking.
        booking_id: BookingId,
    },
    /// Another claim won.
    Contention {
        /// What the seat is held by.
        reason: ContentionReason,
    },
    /// Confirm was attempted without a live hold owned by the caller.
    OwnershipMismatch,
    /// The hold was released but the booking could not be written.
    PersistenceFailure {
        /// Ledger error text.
        message: String,
    },
    /// No verified identity; nothing was touched.
    Unauthenticated,
}

impl Outcome {
    /// Whether the operation took effect.
    pub fn is_success(&self) -> bool {
        matches!(
            self,
            Self::Acquired { .. } | Self::Released | Self::Confirmed { .. }
        )
    }

    /// Short machine name, as used in the serialized `result` tag.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Acquired { .. } => "acquired",
            Self::Released => "released",
            Self::Confirmed { .. } => "confirmed",
            Self::Contention { .. } => "contention",
            Self::OwnershipMismatch => "ownership_mismatch",
            Self::PersistenceFailure { .. } => "persistence_failure",
            Self::Unauthenticated => "unauthenticated",
        }
    }
}
