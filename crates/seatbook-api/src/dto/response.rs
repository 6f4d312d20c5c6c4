//! Response DTOs.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use seatbook_core::types::id::{BookingId, UserId};
use seatbook_core::types::resource::ResourceId;
use seatbook_entity::booking::{Booking, Itinerary};
use seatbook_entity::resource::StatusSummary;
use seatbook_realtime::message::Operation;
use seatbook_realtime::metrics::MetricsSnapshot;
use seatbook_service::Outcome;

/// Standard success response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    /// Whether the request was successful.
    pub success: bool,
    /// Response data.
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    /// Creates a successful response.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Result of a seat operation. The HTTP status follows the outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeatOperationResponse {
    /// Operation performed.
    pub operation: Operation,
    /// Seat it targeted.
    pub resource_id: ResourceId,
    /// What happened.
    pub outcome: Outcome,
}

/// HTTP status for a seat operation outcome.
pub fn outcome_status(outcome: &Outcome) -> StatusCode {
    match outcome {
        Outcome::Acquired { .. } | Outcome::Released | Outcome::Confirmed { .. } => StatusCode::OK,
        Outcome::Contention { .. } | Outcome::OwnershipMismatch => StatusCode::CONFLICT,
        Outcome::Unauthenticated => StatusCode::UNAUTHORIZED,
        Outcome::PersistenceFailure { .. } => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for SeatOperationResponse {
    fn into_response(self) -> Response {
        let status = outcome_status(&self.outcome);
        let body = ApiResponse {
            success: self.outcome.is_success(),
            data: self,
        };
        (status, Json(body)).into_response()
    }
}

/// Booking receipt.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingResponse {
    /// Booking ID.
    pub id: BookingId,
    /// Allocated seat.
    pub resource_id: String,
    /// Owning user.
    pub user_id: UserId,
    /// Route details.
    pub itinerary: Itinerary,
    /// Price in minor units.
    pub amount_cents: i64,
    /// ISO-4217 currency code.
    pub currency: String,
    /// When the booking was made.
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingResponse {
    fn from(booking: Booking) -> Self {
        let itinerary = booking.itinerary();
        Self {
            id: booking.id,
            resource_id: booking.resource_id,
            user_id: booking.user_id,
            itinerary,
            amount_cents: booking.amount_cents,
            currency: booking.currency,
            created_at: booking.created_at,
        }
    }
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Overall status.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since startup.
    pub uptime_seconds: i64,
}

/// State of one backing component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Configured provider.
    pub provider: String,
    /// `ok` or `unavailable`.
    pub status: String,
    /// Failure detail.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Detailed health response.
#[derive(Debug, Clone, Serialize)]
pub struct DetailedHealthResponse {
    /// `ok` or `degraded`.
    pub status: String,
    /// Lock store check.
    pub lock_store: ComponentHealth,
    /// Ledger check.
    pub ledger: ComponentHealth,
    /// Open WebSocket connections.
    pub ws_connections: usize,
    /// Connected users.
    pub online_users: usize,
    /// Seat counts.
    pub seats: StatusSummary,
    /// Realtime engine counters.
    pub realtime: MetricsSnapshot,
}
