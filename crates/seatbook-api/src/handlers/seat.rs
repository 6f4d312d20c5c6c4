//! Seat handlers.

use axum::Json;
use axum::extract::{Path, Query, State};

use seatbook_core::types::resource::ResourceId;
use seatbook_entity::resource::{ResourceView, StatusSummary};
use seatbook_realtime::message::Operation;

use crate::dto::request::{ConfirmRequest, HoldRequest, ReleaseQuery};
use crate::dto::response::{ApiResponse, SeatOperationResponse};
use crate::error::ApiError;
use crate::extractors::{MaybeAuthUser, ValidatedJson};
use crate::state::AppState;

/// GET /api/seats
pub async fn list_seats(State(state): State<AppState>) -> Json<ApiResponse<Vec<ResourceView>>> {
    Json(ApiResponse::ok(state.coordination.snapshot().await))
}

/// GET /api/seats/summary
pub async fn seat_summary(State(state): State<AppState>) -> Json<ApiResponse<StatusSummary>> {
    Json(ApiResponse::ok(state.coordination.summary().await))
}

/// POST /api/seats/{resource_id}/hold
pub async fn hold_seat(
    State(state): State<AppState>,
    MaybeAuthUser(ctx): MaybeAuthUser,
    Path(resource_id): Path<String>,
    ValidatedJson(req): ValidatedJson<HoldRequest>,
) -> Result<SeatOperationResponse, ApiError> {
    let resource_id: ResourceId = resource_id.parse()?;
    let client_id = req.client_id()?;

    let outcome = state
        .coordination
        .acquire(&ctx, &resource_id, &client_id)
        .await?;
    Ok(SeatOperationResponse {
        operation: Operation::Acquire,
        resource_id,
        outcome,
    })
}

/// DELETE /api/seats/{resource_id}/hold
pub async fn release_seat(
    State(state): State<AppState>,
    MaybeAuthUser(ctx): MaybeAuthUser,
    Path(resource_id): Path<String>,
    Query(query): Query<ReleaseQuery>,
) -> Result<SeatOperationResponse, ApiError> {
    let resource_id: ResourceId = resource_id.parse()?;
    let client_id = query.client_id()?;

    let outcome = state
        .coordination
        .release(&ctx, &resource_id, client_id.as_ref())
        .await?;
    Ok(SeatOperationResponse {
        operation: Operation::Release,
        resource_id,
        outcome,
    })
}

/// POST /api/seats/{resource_id}/confirm
pub async fn confirm_seat(
    State(state): State<AppState>,
    MaybeAuthUser(ctx): MaybeAuthUser,
    Path(resource_id): Path<String>,
    ValidatedJson(req): ValidatedJson<ConfirmRequest>,
) -> Result<SeatOperationResponse, ApiError> {
    let resource_id: ResourceId = resource_id.parse()?;
    let client_id = req.client_id()?;

    let outcome = state
        .coordination
        .confirm(&ctx, &resource_id, &client_id)
        .await?;
    Ok(SeatOperationResponse {
        operation: Operation::Confirm,
        resource_id,
        outcome,
    })
}
