//! Inbound and outbound WebSocket message type definitions.

use serde::{Deserialize, Serialize};

use seatbook_core::events::ResourceEvent;
use seatbook_core::types::id::BookingId;
use seatbook_core::types::resource::{ResourceId, ResourceStatus};
use seatbook_entity::resource::ResourceView;
use seatbook_service::Outcome;

/// Messages sent by the client to the server.
///
/// Identifiers arrive as plain strings so a malformed id can be reported
/// against the operation it belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InboundMessage {
    /// Place a hold on a seat.
    Acquire {
        /// Seat identifier, e.g. `C1-S4`.
        resource_id: String,
        /// Caller's tab or device.
        client_id: String,
    },
    /// Clear the hold on a seat.
    Release {
        /// Seat identifier.
        resource_id: String,
        /// Caller's tab or device, logged only.
        #[serde(default)]
        client_id: Option<String>,
    },
    /// Book a held seat.
    Confirm {
        /// Seat identifier.
        resource_id: String,
        /// Tab or device that holds the seat.
        client_id: String,
    },
    /// Request a full snapshot.
    Snapshot,
    /// Pong response to server ping.
    Pong {
        /// Echoed timestamp.
        #[serde(default)]
        timestamp: i64,
    },
}

/// The seat operation an [`OutboundMessage::OperationResult`] answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Hold request.
    Acquire,
    /// Release request.
    Release,
    /// Confirm request.
    Confirm,
}

/// Messages sent by the server to the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum OutboundMessage {
    /// A seat changed status. Sent to every connection.
    ResourceUpdate {
        /// Seat that changed.
        resource_id: ResourceId,
        /// New status.
        status: ResourceStatus,
        /// Booking id, for allocated seats.
        #[serde(skip_serializing_if = "Option::is_none")]
        booking_id: Option<BookingId>,
    },
    /// Result of the requester's own seat operation.
    OperationResult {
        /// Operation performed.
        operation: Operation,
        /// Seat it targeted.
        resource_id: ResourceId,
        /// What happened.
        outcome: Outcome,
    },
    /// Every seat and its status.
    Snapshot {
        /// All seats in inventory order.
        resources: Vec<ResourceView>,
    },
    /// Server keepalive.
    Ping {
        /// Unix timestamp in milliseconds.
        timestamp: i64,
    },
    /// A message could not be processed.
    Error {
        /// Machine-readable error code.
        code: String,
        /// Human-readable message.
        message: String,
    },
}

impl OutboundMessage {
    /// Error message with the given code.
    pub fn error(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Error {
            code: code.into(),
            message: message.into(),
        }
    }
}

impl From<&ResourceEvent> for OutboundMessage {
    fn from(event: &ResourceEvent) -> Self {
        Self::ResourceUpdate {
            resource_id: event.resource_id,
            status: event.status,
            booking_id: event.booking_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_inbound_parsing() {
        let msg: InboundMessage =
            serde_json::from_str(r#"{"type":"acquire","resource_id":"C1-S2","client_id":"tab"}"#)
                .expect("acquire");
        assert!(matches!(msg, InboundMessage::Acquire { ref resource_id, .. } if resource_id == "C1-S2"));

        let msg: InboundMessage =
            serde_json::from_str(r#"{"type":"release","resource_id":"C1-S2"}"#).expect("release");
        assert!(matches!(msg, InboundMessage::Release { client_id: None, .. }));

        let msg: InboundMessage = serde_json::from_str(r#"{"type":"snapshot"}"#).expect("snapshot");
        assert!(matches!(msg, InboundMessage::Snapshot));

        assert!(serde_json::from_str::<InboundMessage>(r#"{"type":"subscribe"}"#).is_err());
        assert!(serde_json::from_str::<InboundMessage>(r#"{"type":"confirm"}"#).is_err());
    }

    #[test]
    fn test_resource_update_shape() {
        let id: ResourceId = "C2-S3".parse().expect("id");
        let msg = OutboundMessage::from(&ResourceEvent::held(id));
        assert_eq!(
            serde_json::to_value(&msg).expect("json"),
            json!({"type": "resource_update", "resource_id": "C2-S3", "status": "held"})
        );
    }

    #[test]
    fn test_operation_result_shape() {
        let id: ResourceId = "C1-S1".parse().expect("id");
        let expires_at = Utc::now();
        let msg = OutboundMessage::OperationResult {
            operation: Operation::Acquire,
            resource_id: id,
            outcome: Outcome::Acquired { expires_at },
        };
        let value = serde_json::to_value(&msg).expect("json");
        assert_eq!(value["type"], "operation_result");
        assert_eq!(value["operation"], "acquire");
        assert_eq!(value["outcome"]["result"], "acquired");
    }
}
