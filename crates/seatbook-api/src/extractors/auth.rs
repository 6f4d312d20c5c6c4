//! Bearer token extractors that inject a [`RequestContext`].

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use seatbook_core::error::AppError;
use seatbook_service::context::RequestContext;

use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated caller. Rejects the request without a valid token.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            <TypedHeader<Authorization<Bearer>> as FromRequestParts<AppState>>::from_request_parts(
                parts, state,
            )
            .await
            .map_err(|_| AppError::authentication("Missing or malformed Authorization header"))?;

        let claims = state.jwt_decoder.decode_access_token(bearer.token())?;
        Ok(AuthUser(RequestContext::authenticated(
            claims.user_id(),
            claims.username,
        )))
    }
}

/// Caller context that may be anonymous.
///
/// A missing or invalid token yields an anonymous context. The seat
/// operations answer such callers with an `unauthenticated` outcome.
#[derive(Debug, Clone)]
pub struct MaybeAuthUser(pub RequestContext);

impl std::ops::Deref for MaybeAuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for MaybeAuthUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = match AuthUser::from_request_parts(parts, state).await {
            Ok(AuthUser(ctx)) => ctx,
            Err(e) => {
                tracing::debug!(error = %e, "Treating caller as anonymous");
                RequestContext::anonymous()
            }
        };
        Ok(MaybeAuthUser(ctx))
    }
}
