//! Event publisher trait for seat state changes.

use async_trait::async_trait;

use crate::events::ResourceEvent;

/// Best-effort fan-out of [`ResourceEvent`]s to connected observers.
///
/// Publishing never fails from the caller's point of view: an observer
/// whose buffer is full or closed simply misses the event and is expected
/// to request a fresh snapshot.
#[async_trait]
pub trait EventPublisher: Send + Sync + 'static {
    /// Deliver one event to every current observer.
    async fn publish(&self, event: ResourceEvent);
}
