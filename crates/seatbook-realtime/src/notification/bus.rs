//! Broadcasts seat events to every connected observer.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use seatbook_core::events::ResourceEvent;
use seatbook_core::traits::EventPublisher;

use crate::connection::manager::ConnectionManager;
use crate::message::types::OutboundMessage;
use crate::metrics::EngineMetrics;

/// [`EventPublisher`] backed by the WebSocket connection pool.
///
/// Delivery is best effort. A connection with a full buffer misses the
/// update and recovers with a snapshot request.
#[derive(Debug, Clone)]
pub struct NotificationBus {
    connections: Arc<ConnectionManager>,
    metrics: Arc<EngineMetrics>,
}

impl NotificationBus {
    /// Creates a bus over the given connections.
    pub fn new(connections: Arc<ConnectionManager>, metrics: Arc<EngineMetrics>) -> Self {
        Self {
            connections,
            metrics,
        }
    }
}

#[async_trait]
impl EventPublisher for NotificationBus {
    async fn publish(&self, event: ResourceEvent) {
        let delivered = self.connections.broadcast_all(&OutboundMessage::from(&event));
        self.metrics.event_published();
        debug!(
            resource_id = %event.resource_id,
            status = event.status.as_str(),
            delivered,
            "Seat update broadcast"
        );
    }
}
