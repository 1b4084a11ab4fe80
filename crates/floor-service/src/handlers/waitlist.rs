//! Waitlist handlers.
//!
//! Implements the queue-facing endpoints:
//!
//! - `POST /api/v1/waitlist` - Join a partition's waitlist
//! - `GET /api/v1/venues/{venue_id}/waitlist` - Staff view of a venue queue
//! - `POST /api/v1/waitlist/{id}/call` - Call a waiting player to a seat
//! - `POST /api/v1/waitlist/{id}/pass` - Player declines a call
//!
//! # Security
//!
//! - Players may join and pass for themselves; staff may do either on a
//!   player's behalf, scoped to their venue
//! - Calling and listing require a staff credential for the venue
//! - Validation runs before any state mutation

use crate::auth::Claims;
use crate::errors::FloorError;
use crate::models::{
    player_key, CallPlayerRequest, CallPlayerResponse, Channel, DispatchStatus,
    JoinWaitlistRequest, JoinWaitlistResponse, NotificationOutcome, NotificationRecord,
    PassResponse, Venue, VenueWaitlistResponse, WaitlistEntry, DEFAULT_CALL_CHANNELS,
};
use crate::observability::metrics;
use crate::routes::AppState;
use crate::store::NewEntry;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

/// Staff credential check scoped to a venue.
fn ensure_staff_for(claims: &Claims, venue_id: Uuid) -> Result<(), FloorError> {
    if claims.is_staff_for(venue_id) {
        Ok(())
    } else {
        Err(FloorError::Forbidden(
            "Staff credential for this venue required".to_string(),
        ))
    }
}

/// Default check-in message for a called player. The game type is
/// uppercased for display.
fn default_call_message(venue: &Venue, entry: &WaitlistEntry) -> String {
    format!(
        "Your seat is ready at {} for {} {}. Please check in within 5 minutes.",
        venue.name,
        entry.game_type.to_uppercase(),
        entry.stakes
    )
}

// ============================================================================
// Handler: POST /api/v1/waitlist
// ============================================================================

/// Handler for POST /api/v1/waitlist
///
/// Join the waitlist for one venue + game type + stakes partition.
///
/// # Authorization
///
/// - Player tokens join as themselves (a mismatched `player_id` is
///   rejected)
/// - Staff tokens may join any player or walk-up name, scoped to venue
///
/// # Response
///
/// - 201 Created: entry created with assigned position
/// - 400 Bad Request: missing or malformed fields
/// - 403 Forbidden: venue not queue-managed, or wrong credential
/// - 404 Not Found: venue absent
/// - 409 Conflict: player already queued in this partition
#[instrument(
    skip_all,
    name = "floor.waitlist.join",
    fields(method = "POST", endpoint = "/api/v1/waitlist")
)]
pub async fn join_waitlist(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    body: axum::body::Bytes,
) -> Result<(StatusCode, Json<JoinWaitlistResponse>), FloorError> {
    // Deserialize manually to return 400 (not Axum's default 422).
    let mut request: JoinWaitlistRequest = serde_json::from_slice(&body).map_err(|e| {
        tracing::debug!(target: "floor.handlers.waitlist", error = %e, "Invalid request body");
        metrics::record_operation("join", "error");
        FloorError::Validation("Invalid request body".to_string())
    })?;

    // Player tokens always join as themselves.
    if let Some(player) = claims.player_uuid() {
        if request.player_id.is_some() && request.player_id != Some(player) {
            metrics::record_operation("join", "error");
            return Err(FloorError::Forbidden(
                "Players may only join as themselves".to_string(),
            ));
        }
        request.player_id = Some(player);
    } else {
        ensure_staff_for(&claims, request.venue_id).inspect_err(|_| {
            metrics::record_operation("join", "error");
        })?;
    }

    request.validate().map_err(|msg| {
        metrics::record_operation("join", "error");
        FloorError::Validation(msg.to_string())
    })?;

    let key = player_key(request.player_id, request.player_name.as_deref())
        .ok_or_else(|| FloorError::Validation("player_id or player_name is required".to_string()))?;

    let venue = state
        .store
        .venue(request.venue_id)
        .await?
        .ok_or(FloorError::NotFound("Venue"))?;

    if !venue.queue_managed {
        metrics::record_operation("join", "error");
        return Err(FloorError::VenueNotEligible);
    }

    let wait_rate = venue
        .wait_per_position_minutes
        .unwrap_or(state.config.wait_per_position_minutes);

    let new_entry = NewEntry {
        venue_id: request.venue_id,
        game_type: request.game_type.trim().to_string(),
        stakes: request.stakes.trim().to_string(),
        player_id: request.player_id,
        player_name: request
            .player_name
            .as_deref()
            .map(|n| n.trim().to_string()),
        player_phone: request.player_phone.clone(),
        player_key: key,
        notes: request.notes.clone(),
    };

    let entry = state
        .store
        .create_entry(&new_entry, wait_rate)
        .await
        .inspect_err(|e| {
            let result = match e {
                FloorError::AlreadyQueued => "conflict",
                _ => "error",
            };
            metrics::record_operation("join", result);
        })?;

    metrics::record_operation("join", "success");
    info!(
        target: "floor.handlers.waitlist",
        entry_id = %entry.entry_id,
        venue_id = %entry.venue_id,
        position = entry.position,
        "Player joined waitlist"
    );

    let position = entry.position;
    let estimated_wait_minutes = entry.estimated_wait_minutes;

    Ok((
        StatusCode::CREATED,
        Json(JoinWaitlistResponse {
            entry,
            position,
            estimated_wait_minutes,
        }),
    ))
}

// ============================================================================
// Handler: GET /api/v1/venues/{venue_id}/waitlist
// ============================================================================

/// Handler for GET /api/v1/venues/{venue_id}/waitlist
///
/// Active entries for a venue, ordered by position. Staff only.
#[instrument(
    skip_all,
    name = "floor.waitlist.list",
    fields(method = "GET", endpoint = "/api/v1/venues/{venue_id}/waitlist")
)]
pub async fn venue_waitlist(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(venue_id): Path<Uuid>,
) -> Result<Json<VenueWaitlistResponse>, FloorError> {
    ensure_staff_for(&claims, venue_id)?;

    state
        .store
        .venue(venue_id)
        .await?
        .ok_or(FloorError::NotFound("Venue"))?;

    let entries = state.store.venue_waitlist(venue_id).await?;

    Ok(Json(VenueWaitlistResponse { venue_id, entries }))
}

// ============================================================================
// Handler: POST /api/v1/waitlist/{id}/call
// ============================================================================

/// Handler for POST /api/v1/waitlist/{id}/call
///
/// Call a waiting player to a seat. The state transition is the source of
/// truth; notification delivery is best-effort and reported per channel.
///
/// # Response
///
/// - 200 OK: entry called, per-channel outcomes attached
/// - 403 Forbidden: caller is not staff for the entry's venue
/// - 404 Not Found: entry absent
/// - 409 Conflict: entry not in `waiting` state
#[instrument(
    skip_all,
    name = "floor.waitlist.call",
    fields(method = "POST", endpoint = "/api/v1/waitlist/{id}/call")
)]
pub async fn call_player(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(entry_id): Path<Uuid>,
    body: axum::body::Bytes,
) -> Result<Json<CallPlayerResponse>, FloorError> {
    // An empty body means default channels and message.
    let request: CallPlayerRequest = if body.is_empty() {
        CallPlayerRequest::default()
    } else {
        serde_json::from_slice(&body).map_err(|e| {
            tracing::debug!(target: "floor.handlers.waitlist", error = %e, "Invalid request body");
            FloorError::Validation("Invalid request body".to_string())
        })?
    };

    let existing = state
        .store
        .entry(entry_id)
        .await?
        .ok_or(FloorError::NotFound("Waitlist entry"))?;

    ensure_staff_for(&claims, existing.venue_id)?;

    let venue = state
        .store
        .venue(existing.venue_id)
        .await?
        .ok_or(FloorError::NotFound("Venue"))?;

    let entry = state.store.call_entry(entry_id).await.inspect_err(|e| {
        let result = match e {
            FloorError::InvalidState(_) => "conflict",
            _ => "error",
        };
        metrics::record_operation("call", result);
    })?;

    let message = match &request.message {
        Some(custom) => custom.clone(),
        None => default_call_message(&venue, &entry),
    };
    let channels = request
        .channels
        .unwrap_or_else(|| DEFAULT_CALL_CHANNELS.to_vec());

    let mut notifications = Vec::with_capacity(channels.len());
    for channel in channels {
        let outcome = dispatch_channel(&state, &venue, &entry, channel, &message).await;

        // Persisting the log row is fire-and-forget: a logging failure
        // must not fail the call.
        let record = NotificationRecord {
            entry_id: entry.entry_id,
            venue_id: entry.venue_id,
            channel,
            status: outcome.status,
            detail: outcome.detail.clone(),
        };
        if let Err(e) = state.store.record_notification(&record).await {
            warn!(
                target: "floor.handlers.waitlist",
                entry_id = %entry.entry_id,
                channel = channel.as_str(),
                error = %e,
                "Failed to persist notification record"
            );
        }

        notifications.push(outcome);
    }

    let notifications_sent = notifications
        .iter()
        .filter(|n| n.status == DispatchStatus::Sent)
        .count();

    metrics::record_operation("call", "success");
    info!(
        target: "floor.handlers.waitlist",
        entry_id = %entry.entry_id,
        call_count = entry.call_count,
        notifications_sent,
        "Player called"
    );

    Ok(Json(CallPlayerResponse {
        entry,
        notifications,
        notifications_sent,
    }))
}

/// Dispatch one channel and record the outcome. Channel failures are
/// captured here, never propagated.
async fn dispatch_channel(
    state: &AppState,
    venue: &Venue,
    entry: &WaitlistEntry,
    channel: Channel,
    message: &str,
) -> NotificationOutcome {
    if channel == Channel::Sms && !venue.auto_text_enabled {
        metrics::record_notification("sms", "skipped");
        return NotificationOutcome {
            channel,
            status: DispatchStatus::Skipped,
            detail: Some("auto text disabled for venue".to_string()),
        };
    }

    match state.notifier.send(channel, entry, message).await {
        Ok(()) => {
            metrics::record_notification(channel.as_str(), "sent");
            NotificationOutcome {
                channel,
                status: DispatchStatus::Sent,
                detail: None,
            }
        }
        Err(e) => {
            metrics::record_notification(channel.as_str(), "failed");
            warn!(
                target: "floor.handlers.waitlist",
                entry_id = %entry.entry_id,
                channel = channel.as_str(),
                error = %e,
                "Notification dispatch failed"
            );
            NotificationOutcome {
                channel,
                status: DispatchStatus::Failed,
                detail: Some(e.to_string()),
            }
        }
    }
}

// ============================================================================
// Handler: POST /api/v1/waitlist/{id}/pass
// ============================================================================

/// Handler for POST /api/v1/waitlist/{id}/pass
///
/// The player declines a call. Under the pass budget the entry returns to
/// `waiting` at its original position; at the budget it is removed and
/// archived as not-seated.
///
/// # Response
///
/// - 200 OK: entry back to waiting, or `{removed: true}`
/// - 403 Forbidden: caller is neither the player nor venue staff
/// - 404 Not Found: entry absent (including already removed)
/// - 409 Conflict: entry in a terminal state
#[instrument(
    skip_all,
    name = "floor.waitlist.pass",
    fields(method = "POST", endpoint = "/api/v1/waitlist/{id}/pass")
)]
pub async fn pass_player(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(entry_id): Path<Uuid>,
) -> Result<Json<PassResponse>, FloorError> {
    let entry = state
        .store
        .entry(entry_id)
        .await?
        .ok_or(FloorError::NotFound("Waitlist entry"))?;

    let is_own_entry = claims.player_uuid().is_some() && claims.player_uuid() == entry.player_id;
    if !is_own_entry {
        ensure_staff_for(&claims, entry.venue_id)?;
    }

    if entry.call_count >= state.config.max_passes {
        let record = state
            .store
            .remove_and_archive(entry_id, state.config.max_passes)
            .await?;

        metrics::record_operation("pass", "success");
        info!(
            target: "floor.handlers.waitlist",
            entry_id = %entry_id,
            wait_minutes = record.wait_minutes,
            "Entry removed after exhausting pass budget"
        );

        return Ok(Json(PassResponse {
            removed: true,
            entry: None,
        }));
    }

    let updated = state
        .store
        .release_call(entry_id, state.config.max_passes)
        .await?;

    metrics::record_operation("pass", "success");
    info!(
        target: "floor.handlers.waitlist",
        entry_id = %entry_id,
        call_count = updated.call_count,
        "Player passed, entry back to waiting"
    );

    Ok(Json(PassResponse {
        removed: false,
        entry: Some(updated),
    }))
}
