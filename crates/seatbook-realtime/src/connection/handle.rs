//! Individual WebSocket connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{DateTime, Utc};
use tokio::sync::{RwLock, mpsc};
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};
use uuid::Uuid;

use seatbook_core::types::id::UserId;

use crate::message::types::OutboundMessage;

/// Unique connection identifier.
pub type ConnectionId = Uuid;

/// A handle to a single WebSocket connection.
///
/// Holds the bounded sender feeding the socket writer plus metadata about
/// the connected user. Messages are serialized before they are queued.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID, time-ordered.
    pub id: ConnectionId,
    /// User who owns this connection.
    pub user_id: UserId,
    /// Username (cached for logging).
    pub username: String,
    /// When the connection was established.
    pub connected_at: DateTime<Utc>,
    sender: mpsc::Sender<String>,
    last_seen: RwLock<DateTime<Utc>>,
    alive: AtomicBool,
    closed: CancellationToken,
}

impl ConnectionHandle {
    /// Create a new connection handle. `closed` is cancelled when the
    /// connection must be torn down.
    pub fn new(
        user_id: UserId,
        username: String,
        sender: mpsc::Sender<String>,
        closed: CancellationToken,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            user_id,
            username,
            connected_at: now,
            sender,
            last_seen: RwLock::new(now),
            alive: AtomicBool::new(true),
            closed,
        }
    }

    /// Queue an outbound message. Returns `false` if it was dropped.
    pub fn send(&self, msg: &OutboundMessage) -> bool {
        match serde_json::to_string(msg) {
            Ok(text) => self.send_text(text),
            Err(e) => {
                error!(conn_id = %self.id, error = %e, "Failed to serialize outbound message");
                false
            }
        }
    }

    /// Queue an already serialized message. A full buffer drops the
    /// message for this connection only.
    pub fn send_text(&self, text: String) -> bool {
        if !self.is_alive() {
            return false;
        }
        match self.sender.try_send(text) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(_)) => {
                warn!(conn_id = %self.id, "Send buffer full, dropping message");
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_dead();
                false
            }
        }
    }

    /// Check if the connection is alive.
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark the connection dead and signal its tasks to stop.
    pub fn mark_dead(&self) {
        self.alive.store(false, Ordering::SeqCst);
        self.closed.cancel();
    }

    /// Token cancelled when the connection is closed.
    pub fn closed(&self) -> &CancellationToken {
        &self.closed
    }

    /// Record inbound activity.
    pub async fn touch(&self) {
        *self.last_seen.write().await = Utc::now();
    }

    /// Last inbound activity.
    pub async fn last_seen(&self) -> DateTime<Utc> {
        *self.last_seen.read().await
    }
}
