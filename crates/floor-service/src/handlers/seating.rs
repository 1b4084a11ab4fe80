//! Seating handler.
//!
//! `POST /api/v1/waitlist/{id}/seat` binds one waitlist entry to one
//! physical seat. Exclusivity comes from the store's occupy-iff-empty
//! update: among N concurrent callers for the same seat exactly one
//! succeeds and the rest receive `SEAT_TAKEN`.

use crate::auth::Claims;
use crate::errors::FloorError;
use crate::models::{SeatPlayerRequest, SeatPlayerResponse};
use crate::observability::metrics;
use crate::routes::AppState;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Handler for POST /api/v1/waitlist/{id}/seat
///
/// # Authorization
///
/// Staff credential scoped to the entry's venue.
///
/// # Response
///
/// - 200 OK: entry seated, realized wait time attached
/// - 400 Bad Request: malformed body
/// - 403 Forbidden: not staff for the venue
/// - 404 Not Found: entry, game, or seat absent
/// - 409 Conflict: entry not active, game closed, or seat taken
#[instrument(
    skip_all,
    name = "floor.seating.seat",
    fields(method = "POST", endpoint = "/api/v1/waitlist/{id}/seat")
)]
pub async fn seat_player(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(entry_id): Path<Uuid>,
    body: axum::body::Bytes,
) -> Result<Json<SeatPlayerResponse>, FloorError> {
    let request: SeatPlayerRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(target: "floor.handlers.seating", error = %e, "Invalid request body");
        metrics::record_operation("seat", "error");
        FloorError::Validation("Invalid request body".to_string())
    })?;

    request.validate().map_err(|msg| {
        metrics::record_operation("seat", "error");
        FloorError::Validation(msg.to_string())
    })?;

    let existing = state
        .store
        .entry(entry_id)
        .await?
        .ok_or(FloorError::NotFound("Waitlist entry"))?;

    if !claims.is_staff_for(existing.venue_id) {
        metrics::record_operation("seat", "error");
        return Err(FloorError::Forbidden(
            "Staff credential for this venue required".to_string(),
        ));
    }

    let (entry, wait_time_minutes) = state
        .store
        .seat_entry(
            entry_id,
            request.game_id,
            request.seat_number,
            request.buyin_amount,
        )
        .await
        .inspect_err(|e| {
            let result = match e {
                FloorError::SeatTaken | FloorError::InvalidState(_) | FloorError::GameClosed => {
                    "conflict"
                }
                _ => "error",
            };
            metrics::record_operation("seat", result);
        })?;

    metrics::record_operation("seat", "success");
    info!(
        target: "floor.handlers.seating",
        entry_id = %entry.entry_id,
        game_id = %request.game_id,
        seat_number = request.seat_number,
        wait_time_minutes,
        "Player seated"
    );

    Ok(Json(SeatPlayerResponse {
        entry,
        seat_number: request.seat_number,
        wait_time_minutes,
    }))
}
