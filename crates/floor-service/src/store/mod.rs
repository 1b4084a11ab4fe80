//! Storage seam for the floor service.
//!
//! All correctness rests on the store providing atomic operations: the
//! per-partition position counter, conditional single-row status
//! transitions, and the occupy-iff-empty seat update. `FloorStore` is the
//! seam; `PgFloorStore` is the production implementation and tests supply
//! an in-memory one with the same conditional semantics.

pub mod pg;

pub use pg::PgFloorStore;

use crate::errors::FloorError;
use crate::models::{
    Game, NotificationRecord, Venue, WaitlistEntry, WaitlistGroup, WaitlistHistoryRecord,
};
use uuid::Uuid;

/// Fields for a new waitlist entry, before position assignment.
#[derive(Debug, Clone)]
pub struct NewEntry {
    pub venue_id: Uuid,
    pub game_type: String,
    pub stakes: String,
    pub player_id: Option<Uuid>,
    pub player_name: Option<String>,
    pub player_phone: Option<String>,
    pub player_key: String,
    pub notes: Option<String>,
}

/// Storage operations backing the floor engine.
///
/// Every mutation is a conditional, atomic operation: callers pass the
/// preconditions in and the store either applies the transition or
/// reports why it could not. No method requires callers to hold locks.
#[async_trait::async_trait]
pub trait FloorStore: Send + Sync {
    /// Fetch a venue.
    async fn venue(&self, venue_id: Uuid) -> Result<Option<Venue>, FloorError>;

    /// Create a waitlist entry with an atomically allocated position.
    ///
    /// `wait_rate_minutes` is the effective wait-per-position rate for the
    /// venue; `estimated_wait_minutes = position * rate`. Fails with
    /// `ALREADY_QUEUED` if the player already holds an active entry in the
    /// partition.
    async fn create_entry(
        &self,
        new_entry: &NewEntry,
        wait_rate_minutes: i32,
    ) -> Result<WaitlistEntry, FloorError>;

    /// Fetch an entry by id.
    async fn entry(&self, entry_id: Uuid) -> Result<Option<WaitlistEntry>, FloorError>;

    /// Active entries (`waiting` / `called`) for a venue, ordered by
    /// position.
    async fn venue_waitlist(&self, venue_id: Uuid) -> Result<Vec<WaitlistEntry>, FloorError>;

    /// Transition `waiting -> called`, incrementing `call_count` and
    /// stamping `last_called_at`, in one conditional update.
    ///
    /// Fails with `NOT_FOUND` if the entry is absent and `INVALID_STATE`
    /// if it is in any state other than `waiting`.
    async fn call_entry(&self, entry_id: Uuid) -> Result<WaitlistEntry, FloorError>;

    /// Return a called entry to `waiting`, refreshing `last_called_at`.
    ///
    /// Conditional on `call_count < max_passes`; a concurrent call that
    /// exhausts the budget makes this fail with `INVALID_STATE`.
    async fn release_call(
        &self,
        entry_id: Uuid,
        max_passes: i32,
    ) -> Result<WaitlistEntry, FloorError>;

    /// Delete an active entry and archive it as not-seated.
    ///
    /// Conditional on `call_count >= min_calls`. Archival is idempotent
    /// per entry; a repeat on an already-removed entry fails with
    /// `NOT_FOUND` rather than double-archiving.
    async fn remove_and_archive(
        &self,
        entry_id: Uuid,
        min_calls: i32,
    ) -> Result<WaitlistHistoryRecord, FloorError>;

    /// Bind an entry to a seat: occupy the seat iff empty, transition the
    /// entry to `seated`, bump the game's player count, and archive the
    /// entry as seated, all in one transaction.
    ///
    /// Returns the updated entry and the realized wait in minutes.
    async fn seat_entry(
        &self,
        entry_id: Uuid,
        game_id: Uuid,
        seat_number: i32,
        buyin_amount: Option<i64>,
    ) -> Result<(WaitlistEntry, i64), FloorError>;

    /// Fetch a squad.
    async fn group(&self, group_id: Uuid) -> Result<Option<WaitlistGroup>, FloorError>;

    /// Submit a squad: transition `forming -> waiting` exactly once,
    /// allocate one shared position, and create one entry per member.
    ///
    /// Fails with `ALREADY_SUBMITTED` if the group is past `forming` and
    /// `ALREADY_QUEUED` if any member already holds an active entry.
    async fn submit_group(
        &self,
        group_id: Uuid,
        wait_rate_minutes: i32,
    ) -> Result<(i32, Vec<WaitlistEntry>), FloorError>;

    /// Running games for one partition.
    async fn running_games(
        &self,
        venue_id: Uuid,
        game_type: &str,
        stakes: &str,
    ) -> Result<Vec<Game>, FloorError>;

    /// Persist one notification dispatch attempt.
    async fn record_notification(&self, record: &NotificationRecord) -> Result<(), FloorError>;

    /// Connectivity check for the readiness probe.
    async fn ping(&self) -> Result<(), FloorError>;
}
