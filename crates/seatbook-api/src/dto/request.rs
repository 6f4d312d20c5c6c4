//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use seatbook_core::error::AppError;
use seatbook_core::types::resource::ClientId;

/// Hold request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct HoldRequest {
    /// Caller's tab or device.
    #[validate(length(min = 1, max = 64, message = "client_id must be 1-64 characters"))]
    pub client_id: String,
}

impl HoldRequest {
    /// Parsed client id.
    pub fn client_id(&self) -> Result<ClientId, AppError> {
        self.client_id.parse()
    }
}

/// Confirm request body.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ConfirmRequest {
    /// Tab or device holding the seat.
    #[validate(length(min = 1, max = 64, message = "client_id must be 1-64 characters"))]
    pub client_id: String,
}

impl ConfirmRequest {
    /// Parsed client id.
    pub fn client_id(&self) -> Result<ClientId, AppError> {
        self.client_id.parse()
    }
}

/// Release query parameters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReleaseQuery {
    /// Caller's tab or device, logged only.
    pub client_id: Option<String>,
}

impl ReleaseQuery {
    /// Parsed client id, if given.
    pub fn client_id(&self) -> Result<Option<ClientId>, AppError> {
        self.client_id.as_deref().map(str::parse).transpose()
    }
}
