//! Seat view models served to observers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use seatbook_core::types::resource::{ResourceId, ResourceStatus};

/// Public state of one seat. Holder identity is deliberately absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceView {
    /// Seat identifier.
    pub resource_id: ResourceId,
    /// Current status as last observed.
    pub status: ResourceStatus,
    /// When the current hold lapses, for held seats.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub held_until: Option<DateTime<Utc>>,
}

/// Seat counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    /// Total seats in the inventory.
    pub total: usize,
    /// Free seats.
    pub available: usize,
    /// Seats under a hold.
    pub held: usize,
    /// Booked seats.
    pub allocated: usize,
}

impl StatusSummary {
    /// Count one more seat with the given status.
    pub fn record(&mut self, status: ResourceStatus) {
        self.total += 1;
        match status {
            ResourceStatus::Available => self.available += 1,
            ResourceStatus::Held => self.held += 1,
            ResourceStatus::Allocated => self.allocated += 1,
        }
    }
}

impl FromIterator<ResourceStatus> for StatusSummary {
    fn from_iter<I: IntoIterator<Item = ResourceStatus>>(iter: I) -> Self {
        let mut summary = Self::default();
        for status in iter {
            summary.record(status);
        }
        summary
    }
}
