//! Squad handler.
//!
//! `POST /api/v1/squads/{id}/submit` places a pre-formed squad on the
//! waitlist as a block: one shared position, one entry per member. The
//! `forming -> waiting` transition is one-way, so submission is
//! exactly-once even under racing requests.

use crate::auth::Claims;
use crate::errors::FloorError;
use crate::models::{GroupStatus, SubmitSquadResponse};
use crate::observability::metrics;
use crate::routes::AppState;
use axum::{
    extract::{Path, State},
    Extension, Json,
};
use std::sync::Arc;
use tracing::{info, instrument};
use uuid::Uuid;

/// Squads need at least this many members to queue as a block.
const MIN_SQUAD_MEMBERS: usize = 2;

/// Handler for POST /api/v1/squads/{id}/submit
///
/// # Authorization
///
/// Only the squad leader may submit.
///
/// # Response
///
/// - 200 OK: squad queued, shared position and entry count attached
/// - 400 Bad Request: fewer than two members
/// - 403 Forbidden: caller is not the leader
/// - 404 Not Found: group absent
/// - 409 Conflict: already submitted, or a member already queued
#[instrument(
    skip_all,
    name = "floor.squads.submit",
    fields(method = "POST", endpoint = "/api/v1/squads/{id}/submit")
)]
pub async fn submit_squad(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(group_id): Path<Uuid>,
) -> Result<Json<SubmitSquadResponse>, FloorError> {
    let group = state
        .store
        .group(group_id)
        .await?
        .ok_or(FloorError::NotFound("Group"))?;

    if claims.player_uuid() != Some(group.leader_player_id) {
        metrics::record_operation("submit", "error");
        return Err(FloorError::Forbidden(
            "Only the squad leader may submit".to_string(),
        ));
    }

    if group.status != GroupStatus::Forming {
        metrics::record_operation("submit", "conflict");
        return Err(FloorError::AlreadySubmitted);
    }

    if group.member_player_ids.len() < MIN_SQUAD_MEMBERS {
        metrics::record_operation("submit", "error");
        return Err(FloorError::NotEnoughMembers);
    }

    let venue = state
        .store
        .venue(group.venue_id)
        .await?
        .ok_or(FloorError::NotFound("Venue"))?;
    let wait_rate = venue
        .wait_per_position_minutes
        .unwrap_or(state.config.wait_per_position_minutes);

    let (position, entries) = state
        .store
        .submit_group(group_id, wait_rate)
        .await
        .inspect_err(|e| {
            let result = match e {
                FloorError::AlreadySubmitted | FloorError::AlreadyQueued => "conflict",
                _ => "error",
            };
            metrics::record_operation("submit", result);
        })?;

    metrics::record_operation("submit", "success");
    info!(
        target: "floor.handlers.squads",
        group_id = %group_id,
        position,
        entries_created = entries.len(),
        "Squad submitted to waitlist"
    );

    Ok(Json(SubmitSquadResponse {
        group_id,
        position,
        entries_created: entries.len(),
    }))
}
