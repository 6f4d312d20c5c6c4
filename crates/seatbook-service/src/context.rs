//! Request context carrying the caller's verified identity, if any.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use seatbook_core::types::id::UserId;
use seatbook_core::types::resource::{ClientId, HolderId};

/// A user whose bearer token has been verified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    /// Token subject.
    pub user_id: UserId,
    /// Display name from the token.
    pub username: String,
}

/// Context for one seat operation.
///
/// Built by the transport layer and passed into every service method so
/// each operation knows *who* is acting. An anonymous context is valid
/// input; operations answer it with an unauthenticated outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// Verified identity, absent for anonymous callers.
    pub identity: Option<Identity>,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Context for a verified user.
    pub fn authenticated(user_id: UserId, username: impl Into<String>) -> Self {
        Self {
            identity: Some(Identity {
                user_id,
                username: username.into(),
            }),
            request_time: Utc::now(),
        }
    }

    /// Context without a verified identity.
    pub fn anonymous() -> Self {
        Self {
            identity: None,
            request_time: Utc::now(),
        }
    }

    /// The verified user, if any.
    pub fn user_id(&self) -> Option<UserId> {
        self.identity.as_ref().map(|i| i.user_id)
    }

    /// Holder id for one of the caller's clients. `None` when anonymous.
    pub fn holder_for(&self, client_id: &ClientId) -> Option<HolderId> {
        self.identity
            .as_ref()
            .map(|i| HolderId::compose(&i.user_id, client_id))
    }
}
