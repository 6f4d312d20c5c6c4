//! Seat state-change events.
//!
//! Events carry the post-transition status of a single seat and are fanned
//! out to every connected observer. They never carry holder identity.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::id::BookingId;
use crate::types::resource::{ResourceId, ResourceStatus};

/// A seat moved to a new status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceEvent {
    /// The seat that changed.
    pub resource_id: ResourceId,
    /// Status after the transition.
    pub status: ResourceStatus,
    /// Booking that allocated the seat; set only for `allocated`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub booking_id: Option<BookingId>,
    /// When the transition was observed.
    pub occurred_at: DateTime<Utc>,
}

impl ResourceEvent {
    /// A seat went under a hold.
    pub fn held(resource_id: ResourceId) -> Self {
        Self::new(resource_id, ResourceStatus::Held, None)
    }

    /// A seat became free again.
    pub fn available(resource_id: ResourceId) -> Self {
        Self::new(resource_id, ResourceStatus::Available, None)
    }

    /// A seat was booked.
    pub fn allocated(resource_id: ResourceId, booking_id: BookingId) -> Self {
        Self::new(resource_id, ResourceStatus::Allocated, Some(booking_id))
    }

    fn new(
        resource_id: ResourceId,
        status: ResourceStatus,
        booking_id: Option<BookingId>,
    ) -> Self {
        Self {
            resource_id,
            status,
            booking_id,
            occurred_at: Utc::now(),
        }
    }
}
