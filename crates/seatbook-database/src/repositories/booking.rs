//! Booking repository implementation.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{info, warn};

use seatbook_core::error::{AppError, ErrorKind};
use seatbook_core::result::AppResult;
use seatbook_core::types::id::{BookingId, UserId};
use seatbook_core::types::resource::ResourceId;
use seatbook_entity::booking::{Allocation, Booking, NewBooking};

use crate::ledger::BookingLedger;

/// PostgreSQL booking ledger. The `UNIQUE (resource_id)` constraint makes
/// a second booking for the same seat fail with a conflict.
#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: PgPool,
}

impl BookingRepository {
    /// Create a new booking repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingLedger for BookingRepository {
    async fn append(&self, booking: NewBooking) -> AppResult<Booking> {
        let resource_id = booking.resource_id;
        let row = booking.into_booking(BookingId::new(), Utc::now());

        let inserted = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, resource_id, holder_id, user_id, train_number, departure, \
             arrival, amount_cents, currency, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10) RETURNING *",
        )
        .bind(row.id)
        .bind(&row.resource_id)
        .bind(&row.holder_id)
        .bind(row.user_id)
        .bind(&row.train_number)
        .bind(&row.departure)
        .bind(&row.arrival)
        .bind(row.amount_cents)
        .bind(&row.currency)
        .bind(row.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if e.as_database_error()
                .is_some_and(|db_err| db_err.is_unique_violation())
            {
                warn!(resource_id = %resource_id, "Seat already has a booking");
                AppError::conflict(format!("Seat {resource_id} is already booked"))
            } else {
                AppError::with_source(ErrorKind::Database, "Failed to insert booking", e)
            }
        })?;

        info!(booking_id = %inserted.id, resource_id = %resource_id, "Booking recorded");
        Ok(inserted)
    }

    async fn find_for_user(
        &self,
        booking_id: BookingId,
        user_id: UserId,
    ) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = $1 AND user_id = $2")
            .bind(booking_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find booking", e))
    }

    async fn find_by_resource(&self, resource_id: &ResourceId) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE resource_id = $1")
            .bind(resource_id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find booking by seat", e)
            })
    }

    async fn allocations(&self) -> AppResult<Vec<Allocation>> {
        let rows: Vec<(String, BookingId)> =
            sqlx::query_as("SELECT resource_id, id FROM bookings ORDER BY created_at")
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to list allocations", e)
                })?;

        let mut allocations = Vec::with_capacity(rows.len());
        for (resource_id, booking_id) in rows {
            match resource_id.parse::<ResourceId>() {
                Ok(resource_id) => allocations.push(Allocation {
                    resource_id,
                    booking_id,
                }),
                Err(e) => warn!(%booking_id, error = %e, "Skipping booking with unknown seat"),
            }
        }
        Ok(allocations)
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
