//! Booking ledger trait and provider selection.

pub mod memory;

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use seatbook_core::config::LedgerConfig;
use seatbook_core::error::AppError;
use seatbook_core::result::AppResult;
use seatbook_core::types::id::{BookingId, UserId};
use seatbook_core::types::resource::ResourceId;
use seatbook_entity::booking::{Allocation, Booking, NewBooking};

use crate::connection::DatabasePool;
use crate::migration;
use crate::repositories::BookingRepository;

pub use memory::MemoryBookingLedger;

/// Durable, append-only record of confirmed bookings.
///
/// Appending a second booking for a seat that already has one must fail
/// with [`ErrorKind::Conflict`](seatbook_core::error::ErrorKind::Conflict).
#[async_trait]
pub trait BookingLedger: Send + Sync + std::fmt::Debug + 'static {
    /// Record a booking and return the stored row.
    async fn append(&self, booking: NewBooking) -> AppResult<Booking>;

    /// Look up a booking, visible only to the user it belongs to.
    async fn find_for_user(
        &self,
        booking_id: BookingId,
        user_id: UserId,
    ) -> AppResult<Option<Booking>>;

    /// The booking for a seat, if it has been allocated.
    async fn find_by_resource(&self, resource_id: &ResourceId) -> AppResult<Option<Booking>>;

    /// Every allocated seat.
    async fn allocations(&self) -> AppResult<Vec<Allocation>>;

    /// Check that the backend is reachable.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Builds the configured ledger provider.
#[derive(Debug, Clone)]
pub struct LedgerManager {
    inner: Arc<dyn BookingLedger>,
    pool: Option<DatabasePool>,
    provider: &'static str,
}

impl LedgerManager {
    /// Connect the configured provider. For `postgres`, migrations run
    /// first when enabled.
    pub async fn new(config: &LedgerConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                let pool = DatabasePool::connect(&config.database).await?;
                if config.run_migrations {
                    migration::run_migrations(pool.pool()).await?;
                }
                info!("Booking ledger backed by PostgreSQL");
                Ok(Self {
                    inner: Arc::new(BookingRepository::new(pool.pool().clone())),
                    pool: Some(pool),
                    provider: "postgres",
                })
            }
            "memory" => {
                info!("Booking ledger kept in memory; bookings are lost on restart");
                Ok(Self {
                    inner: Arc::new(MemoryBookingLedger::new()),
                    pool: None,
                    provider: "memory",
                })
            }
            other => Err(AppError::configuration(format!(
                "Unknown ledger provider: '{other}'. Supported: memory, postgres"
            ))),
        }
    }

    /// Wrap an existing ledger.
    pub fn from_ledger(ledger: Arc<dyn BookingLedger>) -> Self {
        Self {
            inner: ledger,
            pool: None,
            provider: "custom",
        }
    }

    /// Name of the active provider.
    pub fn provider_name(&self) -> &'static str {
        self.provider
    }

    /// The ledger as a trait object.
    pub fn ledger(&self) -> Arc<dyn BookingLedger> {
        Arc::clone(&self.inner)
    }

    /// Close database connections, if any.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}
