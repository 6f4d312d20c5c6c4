//! Booking receipt handler.

use axum::Json;
use axum::extract::{Path, State};

use seatbook_core::error::AppError;
use seatbook_core::types::id::BookingId;

use crate::dto::response::{ApiResponse, BookingResponse};
use crate::error::ApiError;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/bookings/{booking_id}
pub async fn get_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(booking_id): Path<String>,
) -> Result<Json<ApiResponse<BookingResponse>>, ApiError> {
    let booking_id: BookingId = booking_id
        .parse()
        .map_err(|_| AppError::validation(format!("Invalid booking id: {booking_id}")))?;

    let booking = state.coordination.receipt(auth.context(), booking_id).await?;
    Ok(Json(ApiResponse::ok(BookingResponse::from(booking))))
}
