//! WebSocket authentication. Validates the JWT from the query parameter.

use std::sync::Arc;

use seatbook_auth::JwtDecoder;
use seatbook_core::error::AppError;
use seatbook_core::types::id::UserId;

/// Authenticated connection info extracted from JWT.
#[derive(Debug, Clone)]
pub struct AuthenticatedConnection {
    /// User ID.
    pub user_id: UserId,
    /// Username.
    pub username: String,
}

/// Authenticates WebSocket connections using JWT tokens.
#[derive(Clone)]
pub struct WsAuthenticator {
    decoder: Arc<JwtDecoder>,
}

impl std::fmt::Debug for WsAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WsAuthenticator").finish()
    }
}

impl WsAuthenticator {
    /// Creates a new WebSocket authenticator.
    pub fn new(decoder: Arc<JwtDecoder>) -> Self {
        Self { decoder }
    }

    /// Authenticates a connection before the upgrade.
    pub fn authenticate(&self, token: Option<&str>) -> Result<AuthenticatedConnection, AppError> {
        let token = token
            .filter(|t| !t.is_empty())
            .ok_or_else(|| AppError::authentication("Missing access token"))?;
        let claims = self.decoder.decode_access_token(token)?;

        Ok(AuthenticatedConnection {
            user_id: claims.user_id(),
            username: claims.username,
        })
    }
}
