//! In-memory booking ledger.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::info;

use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;
use seatbook_core::types::id::{BookingId, UserId};
use seatbook_core::types::resource::ResourceId;
use seatbook_entity::booking::{Allocation, Booking, NewBooking};

use super::BookingLedger;

#[derive(Debug, Default)]
struct Tables {
    bookings: HashMap<BookingId, Booking>,
    by_resource: HashMap<ResourceId, BookingId>,
}

/// Ledger kept in process memory. One mutex covers both indexes so the
/// uniqueness check and the insert happen together.
#[derive(Debug, Default)]
pub struct MemoryBookingLedger {
    tables: Mutex<Tables>,
}

impl MemoryBookingLedger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BookingLedger for MemoryBookingLedger {
    async fn append(&self, booking: NewBooking) -> AppResult<Booking> {
        let resource_id = booking.resource_id;
        let mut tables = self.tables.lock().await;

        if tables.by_resource.contains_key(&resource_id) {
            return Err(AppError::conflict(format!(
                "Seat {resource_id} is already booked"
            )));
        }

        let stored = booking.into_booking(BookingId::new(), Utc::now());
        tables.by_resource.insert(resource_id, stored.id);
        tables.bookings.insert(stored.id, stored.clone());

        info!(booking_id = %stored.id, resource_id = %resource_id, "Booking recorded");
        Ok(stored)
    }

    async fn find_for_user(
        &self,
        booking_id: BookingId,
        user_id: UserId,
    ) -> AppResult<Option<Booking>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .bookings
            .get(&booking_id)
            .filter(|b| b.is_owned_by(&user_id))
            .cloned())
    }

    async fn find_by_resource(&self, resource_id: &ResourceId) -> AppResult<Option<Booking>> {
        let tables = self.tables.lock().await;
        Ok(tables
            .by_resource
            .get(resource_id)
            .and_then(|id| tables.bookings.get(id))
            .cloned())
    }

    async fn allocations(&self) -> AppResult<Vec<Allocation>> {
        let tables = self.tables.lock().await;
        let mut allocations: Vec<Allocation> = tables
            .by_resource
            .iter()
            .map(|(resource_id, booking_id)| Allocation {
                resource_id: *resource_id,
                booking_id: *booking_id,
            })
            .collect();
        allocations.sort_by_key(|a| a.resource_id);
        Ok(allocations)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}
