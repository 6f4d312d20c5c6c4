//! Connection manager: connection lifecycle and fan-out.

use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use seatbook_core::config::RealtimeConfig;
use seatbook_core::types::id::UserId;

use super::handle::{ConnectionHandle, ConnectionId};
use super::pool::ConnectionPool;
use crate::message::types::OutboundMessage;
use crate::metrics::EngineMetrics;

/// Manages all active WebSocket connections.
#[derive(Debug)]
pub struct ConnectionManager {
    pool: ConnectionPool,
    metrics: Arc<EngineMetrics>,
    config: RealtimeConfig,
    /// Parent of every connection's close token.
    shutdown: CancellationToken,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(
        config: RealtimeConfig,
        metrics: Arc<EngineMetrics>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            pool: ConnectionPool::new(),
            metrics,
            config,
            shutdown,
        }
    }

    /// Registers a new authenticated connection.
    ///
    /// Returns the connection handle and a receiver for outbound messages.
    /// A user at the connection limit loses their oldest connection.
    pub fn register(
        &self,
        user_id: UserId,
        username: String,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(
            user_id,
            username,
            tx,
            self.shutdown.child_token(),
        ));

        let existing = self.pool.get_user_connections(&user_id);
        if existing.len() >= self.config.max_connections_per_user {
            warn!(
                user_id = %user_id,
                count = existing.len(),
                max = self.config.max_connections_per_user,
                "User at max connections, oldest will be replaced"
            );
            if let Some(oldest) = existing.first() {
                self.unregister(&oldest.id);
            }
        }

        self.pool.add(Arc::clone(&handle));
        self.metrics.connection_opened();

        info!(
            conn_id = %handle.id,
            user_id = %user_id,
            username = %handle.username,
            "WebSocket connection registered"
        );

        (handle, rx)
    }

    /// Unregisters a connection and closes it.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.mark_dead();
            self.metrics.connection_closed();
            info!(
                conn_id = %conn_id,
                user_id = %handle.user_id,
                "WebSocket connection unregistered"
            );
        }
    }

    /// Gets a connection by ID.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.pool.get(conn_id)
    }

    /// Sends a message to every connection. The message is serialized once.
    ///
    /// Returns the number of connections it was queued for.
    pub fn broadcast_all(&self, msg: &OutboundMessage) -> usize {
        let text = match serde_json::to_string(msg) {
            Ok(text) => text,
            Err(e) => {
                warn!(error = %e, "Failed to serialize broadcast message");
                return 0;
            }
        };

        let connections = self.pool.all_connections();
        let mut sent = 0usize;
        for handle in &connections {
            if handle.send_text(text.clone()) {
                sent += 1;
            }
        }
        let dropped = connections.len() - sent;
        self.metrics.record_delivery(sent as u64, dropped as u64);
        if dropped > 0 {
            debug!(sent, dropped, "Broadcast partially delivered");
        }
        sent
    }

    /// Closes every connection.
    pub fn close_all(&self) {
        let connections = self.pool.all_connections();
        info!(count = connections.len(), "Closing all WebSocket connections");
        for handle in connections {
            self.unregister(&handle.id);
        }
    }

    /// Returns the total number of connections.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Returns the number of connected users.
    pub fn user_count(&self) -> usize {
        self.pool.user_count()
    }

    /// Realtime configuration.
    pub fn config(&self) -> &RealtimeConfig {
        &self.config
    }
}
