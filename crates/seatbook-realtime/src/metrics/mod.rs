//! Engine metrics collection.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters for the realtime engine.
#[derive(Debug, Default)]
pub struct EngineMetrics {
    /// Total connections accepted.
    pub total_connections: AtomicU64,
    /// Currently open connections.
    pub active_connections: AtomicU64,
    /// Inbound messages received.
    pub messages_received: AtomicU64,
    /// Outbound messages queued.
    pub messages_sent: AtomicU64,
    /// Outbound messages dropped on a full or closed buffer.
    pub messages_dropped: AtomicU64,
    /// Seat events broadcast.
    pub events_published: AtomicU64,
}

impl EngineMetrics {
    /// Creates zeroed metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new connection.
    pub fn connection_opened(&self) {
        self.total_connections.fetch_add(1, Ordering::Relaxed);
        self.active_connections.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a closed connection.
    pub fn connection_closed(&self) {
        let _ = self
            .active_connections
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| n.checked_sub(1));
    }

    /// Record an inbound message.
    pub fn message_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Record the result of a fan-out.
    pub fn record_delivery(&self, sent: u64, dropped: u64) {
        self.messages_sent.fetch_add(sent, Ordering::Relaxed);
        self.messages_dropped.fetch_add(dropped, Ordering::Relaxed);
    }

    /// Record a broadcast seat event.
    pub fn event_published(&self) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
    }

    /// Point-in-time copy of all counters.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            total_connections: self.total_connections.load(Ordering::Relaxed),
            active_connections: self.active_connections.load(Ordering::Relaxed),
            messages_received: self.messages_received.load(Ordering::Relaxed),
            messages_sent: self.messages_sent.load(Ordering::Relaxed),
            messages_dropped: self.messages_dropped.load(Ordering::Relaxed),
            events_published: self.events_published.load(Ordering::Relaxed),
        }
    }
}

/// Serializable snapshot of engine metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    /// Total connections accepted.
    pub total_connections: u64,
    /// Currently open connections.
    pub active_connections: u64,
    /// Inbound messages received.
    pub messages_received: u64,
    /// Outbound messages queued.
    pub messages_sent: u64,
    /// Outbound messages dropped.
    pub messages_dropped: u64,
    /// Seat events broadcast.
    pub events_published: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_never_underflows() {
        let metrics = EngineMetrics::new();
        metrics.connection_opened();
        metrics.connection_closed();
        metrics.connection_closed();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.total_connections, 1);
        assert_eq!(snapshot.active_connections, 0);
    }
}
