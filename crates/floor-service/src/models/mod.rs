//! Floor service models.
//!
//! Domain rows, lifecycle status enumerations, and the request/response
//! types of the public API. Status values are tagged enums with an explicit
//! transition table; storage layers reject any transition not in the table
//! rather than trusting caller-supplied intent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length for a walk-up player name (bytes, after trimming).
pub const MAX_PLAYER_NAME_LENGTH: usize = 100;

/// Maximum length for game type / stakes labels.
pub const MAX_LABEL_LENGTH: usize = 32;

/// Maximum length for free-text entry notes.
pub const MAX_NOTES_LENGTH: usize = 500;

// ============================================================================
// Lifecycle states
// ============================================================================

/// Waitlist entry lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryStatus {
    /// In the queue, callable.
    Waiting,

    /// Called to a seat; stays called until a human passes or seats it.
    Called,

    /// Terminal: bound to a seat.
    Seated,

    /// Terminal: removed after exhausting the pass budget.
    Removed,
}

impl EntryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryStatus::Waiting => "waiting",
            EntryStatus::Called => "called",
            EntryStatus::Seated => "seated",
            EntryStatus::Removed => "removed",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "waiting" => Some(EntryStatus::Waiting),
            "called" => Some(EntryStatus::Called),
            "seated" => Some(EntryStatus::Seated),
            "removed" => Some(EntryStatus::Removed),
            _ => None,
        }
    }

    /// Whether the entry still occupies its partition slot.
    pub fn is_active(self) -> bool {
        matches!(self, EntryStatus::Waiting | EntryStatus::Called)
    }

    /// The transition table. Anything not listed here is rejected.
    pub fn can_transition_to(self, next: EntryStatus) -> bool {
        matches!(
            (self, next),
            (EntryStatus::Waiting, EntryStatus::Called)
                | (EntryStatus::Called, EntryStatus::Waiting)
                | (EntryStatus::Waiting, EntryStatus::Seated)
                | (EntryStatus::Called, EntryStatus::Seated)
                | (EntryStatus::Waiting, EntryStatus::Removed)
                | (EntryStatus::Called, EntryStatus::Removed)
        )
    }
}

/// Game lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameStatus {
    Waiting,
    Running,
    Closed,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Waiting => "waiting",
            GameStatus::Running => "running",
            GameStatus::Closed => "closed",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "waiting" => Some(GameStatus::Waiting),
            "running" => Some(GameStatus::Running),
            "closed" => Some(GameStatus::Closed),
            _ => None,
        }
    }

    /// Games accept seat bindings while waiting to start or running.
    pub fn is_seatable(self) -> bool {
        matches!(self, GameStatus::Waiting | GameStatus::Running)
    }
}

/// Seat occupancy state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeatStatus {
    Empty,
    Occupied,
}

impl SeatStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SeatStatus::Empty => "empty",
            SeatStatus::Occupied => "occupied",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "empty" => Some(SeatStatus::Empty),
            "occupied" => Some(SeatStatus::Occupied),
            _ => None,
        }
    }
}

/// Squad lifecycle state. `forming -> waiting` is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupStatus {
    Forming,
    Waiting,
    Seated,
    Disbanded,
}

impl GroupStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GroupStatus::Forming => "forming",
            GroupStatus::Waiting => "waiting",
            GroupStatus::Seated => "seated",
            GroupStatus::Disbanded => "disbanded",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "forming" => Some(GroupStatus::Forming),
            "waiting" => Some(GroupStatus::Waiting),
            "seated" => Some(GroupStatus::Seated),
            "disbanded" => Some(GroupStatus::Disbanded),
            _ => None,
        }
    }
}

/// Notification channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    Sms,
    Push,
    InApp,
}

impl Channel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Sms => "sms",
            Channel::Push => "push",
            Channel::InApp => "in_app",
        }
    }
}

/// Channels used when a call request does not name any.
pub const DEFAULT_CALL_CHANNELS: [Channel; 3] = [Channel::Sms, Channel::Push, Channel::InApp];

/// Outcome of one notification dispatch attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispatchStatus {
    Sent,
    Failed,
    Skipped,
}

impl DispatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            DispatchStatus::Sent => "sent",
            DispatchStatus::Failed => "failed",
            DispatchStatus::Skipped => "skipped",
        }
    }
}

// ============================================================================
// Domain rows
// ============================================================================

/// A card room running a managed waitlist.
#[derive(Debug, Clone)]
pub struct Venue {
    pub venue_id: Uuid,
    pub name: String,
    /// Whether this venue is eligible for queue-managed seating.
    pub queue_managed: bool,
    /// When false, SMS dispatches are skipped for this venue.
    pub auto_text_enabled: bool,
    /// Per-venue override of the wait-per-position rate; None = default.
    pub wait_per_position_minutes: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// One player's (or squad member's) slot in a partition's queue.
#[derive(Debug, Clone, Serialize)]
pub struct WaitlistEntry {
    pub entry_id: Uuid,
    pub venue_id: Uuid,
    pub game_type: String,
    pub stakes: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_phone: Option<String>,
    /// Identity key for the one-active-entry rule; not part of the API.
    #[serde(skip)]
    pub player_key: String,
    pub status: EntryStatus,
    pub position: i32,
    pub call_count: i32,
    pub estimated_wait_minutes: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group_id: Option<Uuid>,
    /// Open game of the same partition, associated for display only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_game_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_called_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seated_at: Option<DateTime<Utc>>,
}

impl WaitlistEntry {
    /// Display name: registered name is not stored here, so the walk-up
    /// name falls back to the player id.
    pub fn display_name(&self) -> String {
        match (&self.player_name, &self.player_id) {
            (Some(name), _) => name.clone(),
            (None, Some(id)) => id.to_string(),
            (None, None) => "unknown player".to_string(),
        }
    }
}

/// A running or forming game at a venue.
#[derive(Debug, Clone, Serialize)]
pub struct Game {
    pub game_id: Uuid,
    pub venue_id: Uuid,
    pub game_type: String,
    pub stakes: String,
    pub status: GameStatus,
    pub player_count: i32,
    pub max_players: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// One physical chair at a game.
#[derive(Debug, Clone, Serialize)]
pub struct Seat {
    pub game_id: Uuid,
    pub seat_number: i32,
    pub status: SeatStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupant_player_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub occupant_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub buyin_amount: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seated_at: Option<DateTime<Utc>>,
}

/// A pre-formed squad queuing together as a block.
#[derive(Debug, Clone, Serialize)]
pub struct WaitlistGroup {
    pub group_id: Uuid,
    pub venue_id: Uuid,
    pub game_type: String,
    pub stakes: String,
    pub leader_player_id: Uuid,
    pub member_player_ids: Vec<Uuid>,
    pub status: GroupStatus,
    pub prefer_same_table: bool,
    pub accept_split: bool,
    pub created_at: DateTime<Utc>,
}

/// Immutable archival row written when an entry leaves the active queue.
#[derive(Debug, Clone, Serialize)]
pub struct WaitlistHistoryRecord {
    pub entry_id: Uuid,
    pub venue_id: Uuid,
    pub game_type: String,
    pub stakes: String,
    pub wait_minutes: i32,
    pub was_seated: bool,
    pub archived_at: DateTime<Utc>,
}

/// One persisted notification dispatch attempt.
#[derive(Debug, Clone)]
pub struct NotificationRecord {
    pub entry_id: Uuid,
    pub venue_id: Uuid,
    pub channel: Channel,
    pub status: DispatchStatus,
    pub detail: Option<String>,
}

// ============================================================================
// Identity helpers
// ============================================================================

/// Identity key used by the one-active-entry-per-partition rule.
///
/// Registered players key on their id; walk-ups key on the normalized name.
pub fn player_key(player_id: Option<Uuid>, player_name: Option<&str>) -> Option<String> {
    match (player_id, player_name) {
        (Some(id), _) => Some(id.to_string()),
        (None, Some(name)) => {
            let normalized = name.trim().to_lowercase();
            if normalized.is_empty() {
                None
            } else {
                Some(format!("name:{}", normalized))
            }
        }
        (None, None) => None,
    }
}

// ============================================================================
// Request / response types
// ============================================================================

/// Request to join a partition's waitlist.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct JoinWaitlistRequest {
    pub venue_id: Uuid,
    pub game_type: String,
    pub stakes: String,

    /// Registered player id; required unless `player_name` is given.
    pub player_id: Option<Uuid>,

    /// Walk-up name; required unless `player_id` is given.
    pub player_name: Option<String>,

    /// Contact number for SMS calls.
    pub player_phone: Option<String>,

    pub notes: Option<String>,
}

impl JoinWaitlistRequest {
    /// Validate the request fields.
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.game_type.trim().is_empty() {
            return Err("game_type is required");
        }
        if self.game_type.len() > MAX_LABEL_LENGTH {
            return Err("game_type is too long");
        }
        if self.stakes.trim().is_empty() {
            return Err("stakes is required");
        }
        if self.stakes.len() > MAX_LABEL_LENGTH {
            return Err("stakes is too long");
        }
        if self.player_id.is_none() {
            let name = self.player_name.as_deref().unwrap_or("").trim();
            if name.is_empty() {
                return Err("player_id or player_name is required");
            }
            if name.len() > MAX_PLAYER_NAME_LENGTH {
                return Err("player_name is too long");
            }
        }
        if let Some(notes) = &self.notes {
            if notes.len() > MAX_NOTES_LENGTH {
                return Err("notes are too long");
            }
        }
        Ok(())
    }
}

/// Response after joining the waitlist.
#[derive(Debug, Clone, Serialize)]
pub struct JoinWaitlistResponse {
    pub entry: WaitlistEntry,
    pub position: i32,
    pub estimated_wait_minutes: i32,
}

/// Request to call a waiting player. An empty body means "all channels,
/// default message".
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CallPlayerRequest {
    /// Channels to notify on; defaults to sms + push + in_app.
    pub channels: Option<Vec<Channel>>,

    /// Override for the default message template.
    pub message: Option<String>,
}

/// Per-channel outcome reported on a call.
#[derive(Debug, Clone, Serialize)]
pub struct NotificationOutcome {
    pub channel: Channel,
    pub status: DispatchStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

/// Response after calling a player. Transport failures never fail the
/// call; they surface here as per-channel outcomes.
#[derive(Debug, Clone, Serialize)]
pub struct CallPlayerResponse {
    pub entry: WaitlistEntry,
    pub notifications: Vec<NotificationOutcome>,
    pub notifications_sent: usize,
}

/// Response after a player passes on a call.
#[derive(Debug, Clone, Serialize)]
pub struct PassResponse {
    /// True when the pass budget was exhausted and the entry was removed.
    pub removed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entry: Option<WaitlistEntry>,
}

/// Request to bind an entry to a specific seat.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SeatPlayerRequest {
    pub game_id: Uuid,
    pub seat_number: i32,
    pub buyin_amount: Option<i64>,
}

impl SeatPlayerRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.seat_number < 1 {
            return Err("seat_number must be positive");
        }
        if let Some(buyin) = self.buyin_amount {
            if buyin < 0 {
                return Err("buyin_amount must not be negative");
            }
        }
        Ok(())
    }
}

/// Response after seating a player.
#[derive(Debug, Clone, Serialize)]
pub struct SeatPlayerResponse {
    pub entry: WaitlistEntry,
    pub seat_number: i32,
    pub wait_time_minutes: i64,
}

/// Response after submitting a squad to the waitlist.
#[derive(Debug, Clone, Serialize)]
pub struct SubmitSquadResponse {
    pub group_id: Uuid,
    pub position: i32,
    pub entries_created: usize,
}

/// Staff view of a venue's active waitlist, ordered by position.
#[derive(Debug, Clone, Serialize)]
pub struct VenueWaitlistResponse {
    pub venue_id: Uuid,
    pub entries: Vec<WaitlistEntry>,
}

/// Readiness probe response.
#[derive(Debug, Clone, Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
