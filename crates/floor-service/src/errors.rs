//! Error taxonomy for the floor service.
//!
//! Every public operation returns `FloorError` on failure; the
//! `IntoResponse` impl maps each variant to an HTTP status and a stable
//! `{"error":{"code","message"}}` body. Conflicts (duplicate queue
//! membership, taken seats, double submission) are always surfaced to the
//! caller, never silently merged.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FloorError {
    /// Malformed or missing request fields, caught before any mutation.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The player already has an active entry in this partition.
    #[error("Player already has an active waitlist entry for this game")]
    AlreadyQueued,

    /// The venue does not run a managed waitlist.
    #[error("Venue is not eligible for queue-managed seating")]
    VenueNotEligible,

    /// Entry, game, seat, venue, or group absent.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Operation invalid for the entity's current lifecycle state.
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Target game is closed (or otherwise not seatable).
    #[error("Game is not open for seating")]
    GameClosed,

    /// Another player won the race for this seat.
    #[error("Seat is already occupied")]
    SeatTaken,

    /// Caller lacks the role or identity the action requires.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// The squad has already been submitted to the waitlist.
    #[error("Group has already been submitted")]
    AlreadySubmitted,

    /// Squads require at least two members.
    #[error("Group needs at least two members")]
    NotEnoughMembers,

    /// Missing or invalid bearer token.
    #[error("Invalid token: {0}")]
    InvalidToken(String),

    /// Storage failure. The message is logged, never returned verbatim.
    #[error("Database error: {0}")]
    Database(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Serialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Serialize)]
struct ErrorDetail {
    code: String,
    message: String,
}

impl FloorError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            FloorError::Validation(_) => "MISSING_FIELDS",
            FloorError::AlreadyQueued => "ALREADY_QUEUED",
            FloorError::VenueNotEligible => "VENUE_NOT_ELIGIBLE",
            FloorError::NotFound(_) => "NOT_FOUND",
            FloorError::InvalidState(_) => "INVALID_STATE",
            FloorError::GameClosed => "GAME_CLOSED",
            FloorError::SeatTaken => "SEAT_TAKEN",
            FloorError::Forbidden(_) => "FORBIDDEN",
            FloorError::AlreadySubmitted => "ALREADY_SUBMITTED",
            FloorError::NotEnoughMembers => "NOT_ENOUGH_MEMBERS",
            FloorError::InvalidToken(_) => "INVALID_TOKEN",
            FloorError::Database(_) => "DATABASE_ERROR",
            FloorError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            FloorError::Validation(_) | FloorError::NotEnoughMembers => StatusCode::BAD_REQUEST,
            FloorError::InvalidToken(_) => StatusCode::UNAUTHORIZED,
            FloorError::Forbidden(_) | FloorError::VenueNotEligible => StatusCode::FORBIDDEN,
            FloorError::NotFound(_) => StatusCode::NOT_FOUND,
            FloorError::AlreadyQueued
            | FloorError::InvalidState(_)
            | FloorError::GameClosed
            | FloorError::SeatTaken
            | FloorError::AlreadySubmitted => StatusCode::CONFLICT,
            FloorError::Database(_) | FloorError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for FloorError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internal failure details are logged server-side only.
        let message = match &self {
            FloorError::Database(detail) => {
                tracing::error!(target: "floor.errors", detail = %detail, "Database error");
                "An internal database error occurred".to_string()
            }
            FloorError::Internal(detail) => {
                tracing::error!(target: "floor.errors", detail = %detail, "Internal error");
                "An internal error occurred".to_string()
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: ErrorDetail {
                code: self.code().to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for FloorError {
    fn from(e: sqlx::Error) -> Self {
        FloorError::Database(e.to_string())
    }
}
