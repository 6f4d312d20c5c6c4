//! Key builders for every lock store entry.
//!
//! Backends add their own configured prefix on top of these.

use seatbook_core::types::resource::ResourceId;

/// Key of the hold lock for one seat.
pub fn seat_lock(resource_id: &ResourceId) -> String {
    format!("lock:{resource_id}")
}
