//! Table balance handler.
//!
//! `GET /api/v1/venues/{venue_id}/balance?game_type=..&stakes=..` runs the
//! advisory balancer over the venue's running games for one partition.
//! Purely read-only; no table is mutated.

use crate::auth::Claims;
use crate::errors::FloorError;
use crate::observability::metrics;
use crate::routes::AppState;
use crate::services::balancer::{suggest_rebalance, RebalancePlan, TableLoad};
use axum::{
    extract::{Path, Query, State},
    Extension, Json,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct BalanceParams {
    pub game_type: String,
    pub stakes: String,
}

/// Handler for GET /api/v1/venues/{venue_id}/balance
///
/// # Authorization
///
/// Staff credential scoped to the venue.
///
/// # Response
///
/// - 200 OK: rebalance plan for the partition
/// - 400 Bad Request: missing query parameters
/// - 403 Forbidden: not staff for the venue
/// - 404 Not Found: venue absent
#[instrument(
    skip_all,
    name = "floor.balance.suggest",
    fields(method = "GET", endpoint = "/api/v1/venues/{venue_id}/balance")
)]
pub async fn suggest_balance(
    State(state): State<Arc<AppState>>,
    Extension(claims): Extension<Claims>,
    Path(venue_id): Path<Uuid>,
    Query(params): Query<BalanceParams>,
) -> Result<Json<RebalancePlan>, FloorError> {
    if !claims.is_staff_for(venue_id) {
        return Err(FloorError::Forbidden(
            "Staff credential for this venue required".to_string(),
        ));
    }

    if params.game_type.trim().is_empty() || params.stakes.trim().is_empty() {
        return Err(FloorError::Validation(
            "game_type and stakes are required".to_string(),
        ));
    }

    state
        .store
        .venue(venue_id)
        .await?
        .ok_or(FloorError::NotFound("Venue"))?;

    let games = state
        .store
        .running_games(venue_id, params.game_type.trim(), params.stakes.trim())
        .await?;

    let loads: Vec<TableLoad> = games
        .iter()
        .map(|g| TableLoad {
            game_id: g.game_id,
            player_count: g.player_count,
        })
        .collect();

    let plan = suggest_rebalance(&loads);
    metrics::record_operation("balance", "success");

    Ok(Json(plan))
}
