//! Fixtures shared by the coordination and reconciliation tests.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, Notify};

use seatbook_cache::memory::MemoryLockStore;
use seatbook_core::config::BookingConfig;
use seatbook_core::error::AppError;
use seatbook_core::events::ResourceEvent;
use seatbook_core::result::AppResult;
use seatbook_core::traits::EventPublisher;
use seatbook_core::types::id::{BookingId, UserId};
use seatbook_core::types::resource::{ClientId, HolderId, ResourceId, ResourceStatus};
use seatbook_database::ledger::{BookingLedger, MemoryBookingLedger};
use seatbook_entity::booking::{Allocation, Booking, NewBooking};

use crate::context::RequestContext;
use crate::coordination::CoordinationService;
use crate::registry::ResourceRegistry;

/// Records every published event.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    events: Mutex<Vec<ResourceEvent>>,
}

impl RecordingPublisher {
    pub async fn statuses(&self) -> Vec<(String, ResourceStatus)> {
        self.events
            .lock()
            .await
            .iter()
            .map(|e| (e.resource_id.to_string(), e.status))
            .collect()
    }

    pub async fn events(&self) -> Vec<ResourceEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: ResourceEvent) {
        self.events.lock().await.push(event);
    }
}

/// Ledger whose writes always fail.
#[derive(Debug, Default)]
pub struct FailingLedger;

#[async_trait]
impl BookingLedger for FailingLedger {
    async fn append(&self, _booking: NewBooking) -> AppResult<Booking> {
        Err(AppError::database("connection reset by peer"))
    }

    async fn find_for_user(
        &self,
        _booking_id: BookingId,
        _user_id: UserId,
    ) -> AppResult<Option<Booking>> {
        Ok(None)
    }

    async fn find_by_resource(&self, _resource_id: &ResourceId) -> AppResult<Option<Booking>> {
        Ok(None)
    }

    async fn allocations(&self) -> AppResult<Vec<Allocation>> {
        Ok(Vec::new())
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(false)
    }
}

/// Memory ledger that parks each append until the test lets it go.
#[derive(Debug, Default)]
pub struct PausingLedger {
    inner: MemoryBookingLedger,
    before_write: bool,
    /// Signalled once the append has reached its pause point.
    pub paused: Notify,
    /// Lets the parked append continue.
    pub resume: Notify,
}

impl PausingLedger {
    /// Pauses after the booking has been written.
    pub fn after_write() -> Self {
        Self::default()
    }

    /// Pauses before the booking is written.
    pub fn before_write() -> Self {
        Self {
            before_write: true,
            ..Self::default()
        }
    }

    async fn pause(&self) {
        self.paused.notify_one();
        self.resume.notified().await;
    }
}

#[async_trait]
impl BookingLedger for PausingLedger {
    async fn append(&self, booking: NewBooking) -> AppResult<Booking> {
        if self.before_write {
            self.pause().await;
        }
        let written = self.inner.append(booking).await?;
        if !self.before_write {
            self.pause().await;
        }
        Ok(written)
    }

    async fn find_for_user(
        &self,
        booking_id: BookingId,
        user_id: UserId,
    ) -> AppResult<Option<Booking>> {
        self.inner.find_for_user(booking_id, user_id).await
    }

    async fn find_by_resource(&self, resource_id: &ResourceId) -> AppResult<Option<Booking>> {
        self.inner.find_by_resource(resource_id).await
    }

    async fn allocations(&self) -> AppResult<Vec<Allocation>> {
        self.inner.allocations().await
    }

    async fn health_check(&self) -> AppResult<bool> {
        self.inner.health_check().await
    }
}

/// A coordination service over memory backends and a 3 × 4 inventory.
pub struct Harness {
    pub service: CoordinationService,
    pub locks: Arc<MemoryLockStore>,
    pub ledger: Arc<dyn BookingLedger>,
    pub registry: Arc<ResourceRegistry>,
    pub publisher: Arc<RecordingPublisher>,
    pub config: BookingConfig,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_ledger(Arc::new(MemoryBookingLedger::new()))
    }

    pub fn with_ledger(ledger: Arc<dyn BookingLedger>) -> Self {
        Self::build(ledger, BookingConfig::default())
    }

    pub fn with_config(config: BookingConfig) -> Self {
        Self::build(Arc::new(MemoryBookingLedger::new()), config)
    }

    fn build(ledger: Arc<dyn BookingLedger>, config: BookingConfig) -> Self {
        let locks = Arc::new(MemoryLockStore::new());
        let registry = Arc::new(ResourceRegistry::new(ResourceId::inventory(3, 4)));
        let publisher = Arc::new(RecordingPublisher::default());
        let service = CoordinationService::new(
            locks.clone(),
            Arc::clone(&ledger),
            Arc::clone(&registry),
            publisher.clone(),
            config.clone(),
        );
        Self {
            service,
            locks,
            ledger,
            registry,
            publisher,
            config,
        }
    }
}

/// A verified user with one browser tab.
pub struct Caller {
    pub ctx: RequestContext,
    pub client: ClientId,
}

impl Caller {
    pub fn new(name: &str) -> Self {
        Self {
            ctx: RequestContext::authenticated(UserId::new(), name),
            client: "tab-1".parse().expect("client id"),
        }
    }

    pub fn holder(&self) -> HolderId {
        self.ctx.holder_for(&self.client).expect("authenticated")
    }
}

pub fn seat(id: &str) -> ResourceId {
    id.parse().expect("seat id")
}
