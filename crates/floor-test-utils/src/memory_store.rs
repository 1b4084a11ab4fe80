//! In-memory [`FloorStore`] implementation.
//!
//! Mirrors the conditional semantics of the Postgres store: position
//! allocation is atomic under one lock, status transitions check their
//! preconditions, and archival is idempotent per entry. Used by
//! integration tests so they exercise the real handlers and router
//! without a database.

use chrono::Utc;
use floor_service::errors::FloorError;
use floor_service::models::{
    EntryStatus, Game, GameStatus, GroupStatus, NotificationRecord, Seat, SeatStatus, Venue,
    WaitlistEntry, WaitlistGroup, WaitlistHistoryRecord,
};
use floor_service::store::{FloorStore, NewEntry};
use std::collections::HashMap;
use std::sync::Mutex;
use uuid::Uuid;

#[derive(Default)]
struct Inner {
    venues: HashMap<Uuid, Venue>,
    games: HashMap<Uuid, Game>,
    seats: HashMap<(Uuid, i32), Seat>,
    entries: HashMap<Uuid, WaitlistEntry>,
    groups: HashMap<Uuid, WaitlistGroup>,
    positions: HashMap<(Uuid, String, String), i32>,
    history: HashMap<Uuid, WaitlistHistoryRecord>,
    notifications: Vec<NotificationRecord>,
}

impl Inner {
    fn allocate_position(&mut self, venue_id: Uuid, game_type: &str, stakes: &str) -> i32 {
        let counter = self
            .positions
            .entry((venue_id, game_type.to_string(), stakes.to_string()))
            .or_insert(0);
        *counter += 1;
        *counter
    }

    fn display_game(&self, venue_id: Uuid, game_type: &str, stakes: &str) -> Option<Uuid> {
        let mut candidates: Vec<&Game> = self
            .games
            .values()
            .filter(|g| {
                g.venue_id == venue_id
                    && g.game_type == game_type
                    && g.stakes == stakes
                    && g.status.is_seatable()
            })
            .collect();
        candidates.sort_by_key(|g| g.created_at);
        candidates.first().map(|g| g.game_id)
    }

    fn has_active_entry(
        &self,
        venue_id: Uuid,
        game_type: &str,
        stakes: &str,
        player_key: &str,
    ) -> bool {
        self.entries.values().any(|e| {
            e.venue_id == venue_id
                && e.game_type == game_type
                && e.stakes == stakes
                && e.player_key == player_key
                && e.status.is_active()
        })
    }

    fn archive(&mut self, entry: &WaitlistEntry, was_seated: bool) -> WaitlistHistoryRecord {
        let wait_minutes = {
            let minutes = (Utc::now() - entry.created_at).num_minutes().max(0);
            i32::try_from(minutes).unwrap_or(i32::MAX)
        };

        // Idempotent per entry: first archival wins.
        self.history
            .entry(entry.entry_id)
            .or_insert_with(|| WaitlistHistoryRecord {
                entry_id: entry.entry_id,
                venue_id: entry.venue_id,
                game_type: entry.game_type.clone(),
                stakes: entry.stakes.clone(),
                wait_minutes,
                was_seated,
                archived_at: Utc::now(),
            })
            .clone()
    }
}

/// In-memory store with the same conditional semantics as Postgres.
#[derive(Default)]
pub struct InMemoryFloorStore {
    inner: Mutex<Inner>,
}

impl InMemoryFloorStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("store lock poisoned")
    }

    // ------------------------------------------------------------------
    // Seeding helpers
    // ------------------------------------------------------------------

    pub fn seed_venue(
        &self,
        name: &str,
        queue_managed: bool,
        auto_text_enabled: bool,
        wait_per_position_minutes: Option<i32>,
    ) -> Uuid {
        let venue_id = Uuid::new_v4();
        self.lock().venues.insert(
            venue_id,
            Venue {
                venue_id,
                name: name.to_string(),
                queue_managed,
                auto_text_enabled,
                wait_per_position_minutes,
                created_at: Utc::now(),
            },
        );
        venue_id
    }

    /// Seed a game with `seat_count` empty seats, numbered from 1.
    pub fn seed_game(
        &self,
        venue_id: Uuid,
        game_type: &str,
        stakes: &str,
        status: GameStatus,
        player_count: i32,
        seat_count: i32,
    ) -> Uuid {
        let game_id = Uuid::new_v4();
        let mut inner = self.lock();
        inner.games.insert(
            game_id,
            Game {
                game_id,
                venue_id,
                game_type: game_type.to_string(),
                stakes: stakes.to_string(),
                status,
                player_count,
                max_players: 9,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
        );
        for seat_number in 1..=seat_count {
            inner.seats.insert(
                (game_id, seat_number),
                Seat {
                    game_id,
                    seat_number,
                    status: SeatStatus::Empty,
                    occupant_player_id: None,
                    occupant_name: None,
                    buyin_amount: None,
                    seated_at: None,
                },
            );
        }
        game_id
    }

    pub fn seed_group(
        &self,
        venue_id: Uuid,
        game_type: &str,
        stakes: &str,
        leader: Uuid,
        members: Vec<Uuid>,
        status: GroupStatus,
    ) -> Uuid {
        let group_id = Uuid::new_v4();
        self.lock().groups.insert(
            group_id,
            WaitlistGroup {
                group_id,
                venue_id,
                game_type: game_type.to_string(),
                stakes: stakes.to_string(),
                leader_player_id: leader,
                member_player_ids: members,
                status,
                prefer_same_table: true,
                accept_split: false,
                created_at: Utc::now(),
            },
        );
        group_id
    }

    // ------------------------------------------------------------------
    // Inspection helpers for assertions
    // ------------------------------------------------------------------

    pub fn history_record(&self, entry_id: Uuid) -> Option<WaitlistHistoryRecord> {
        self.lock().history.get(&entry_id).cloned()
    }

    pub fn history_len(&self) -> usize {
        self.lock().history.len()
    }

    pub fn notifications(&self) -> Vec<NotificationRecord> {
        self.lock().notifications.clone()
    }

    pub fn seat(&self, game_id: Uuid, seat_number: i32) -> Option<Seat> {
        self.lock().seats.get(&(game_id, seat_number)).cloned()
    }

    pub fn game_snapshot(&self, game_id: Uuid) -> Option<Game> {
        self.lock().games.get(&game_id).cloned()
    }

    pub fn entry_snapshot(&self, entry_id: Uuid) -> Option<WaitlistEntry> {
        self.lock().entries.get(&entry_id).cloned()
    }

    pub fn active_entries(&self, venue_id: Uuid) -> Vec<WaitlistEntry> {
        let mut entries: Vec<WaitlistEntry> = self
            .lock()
            .entries
            .values()
            .filter(|e| e.venue_id == venue_id && e.status.is_active())
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.position);
        entries
    }
}

#[async_trait::async_trait]
impl FloorStore for InMemoryFloorStore {
    async fn venue(&self, venue_id: Uuid) -> Result<Option<Venue>, FloorError> {
        Ok(self.lock().venues.get(&venue_id).cloned())
    }

    async fn create_entry(
        &self,
        new_entry: &NewEntry,
        wait_rate_minutes: i32,
    ) -> Result<WaitlistEntry, FloorError> {
        let mut inner = self.lock();

        if inner.has_active_entry(
            new_entry.venue_id,
            &new_entry.game_type,
            &new_entry.stakes,
            &new_entry.player_key,
        ) {
            return Err(FloorError::AlreadyQueued);
        }

        let position =
            inner.allocate_position(new_entry.venue_id, &new_entry.game_type, &new_entry.stakes);
        let display_game_id =
            inner.display_game(new_entry.venue_id, &new_entry.game_type, &new_entry.stakes);

        let entry = WaitlistEntry {
            entry_id: Uuid::new_v4(),
            venue_id: new_entry.venue_id,
            game_type: new_entry.game_type.clone(),
            stakes: new_entry.stakes.clone(),
            player_id: new_entry.player_id,
            player_name: new_entry.player_name.clone(),
            player_phone: new_entry.player_phone.clone(),
            player_key: new_entry.player_key.clone(),
            status: EntryStatus::Waiting,
            position,
            call_count: 0,
            estimated_wait_minutes: position.saturating_mul(wait_rate_minutes),
            group_id: None,
            display_game_id,
            notes: new_entry.notes.clone(),
            created_at: Utc::now(),
            last_called_at: None,
            seated_at: None,
        };

        inner.entries.insert(entry.entry_id, entry.clone());
        Ok(entry)
    }

    async fn entry(&self, entry_id: Uuid) -> Result<Option<WaitlistEntry>, FloorError> {
        Ok(self.lock().entries.get(&entry_id).cloned())
    }

    async fn venue_waitlist(&self, venue_id: Uuid) -> Result<Vec<WaitlistEntry>, FloorError> {
        Ok(self.active_entries(venue_id))
    }

    async fn call_entry(&self, entry_id: Uuid) -> Result<WaitlistEntry, FloorError> {
        let mut inner = self.lock();
        let entry = inner
            .entries
            .get_mut(&entry_id)
            .ok_or(FloorError::NotFound("Waitlist entry"))?;

        if entry.status != EntryStatus::Waiting {
            return Err(FloorError::InvalidState(format!(
                "entry is {}",
                entry.status.as_str()
            )));
        }

        entry.status = EntryStatus::Called;
        entry.call_count += 1;
        entry.last_called_at = Some(Utc::now());
        Ok(entry.clone())
    }

    async fn release_call(
        &self,
        entry_id: Uuid,
        max_passes: i32,
    ) -> Result<WaitlistEntry, FloorError> {
        let mut inner = self.lock();
        let entry = inner
            .entries
            .get_mut(&entry_id)
            .ok_or(FloorError::NotFound("Waitlist entry"))?;

        if !entry.status.is_active() {
            return Err(FloorError::InvalidState(format!(
                "entry is {}",
                entry.status.as_str()
            )));
        }
        if entry.call_count >= max_passes {
            return Err(FloorError::InvalidState(
                "entry is called, expected active".to_string(),
            ));
        }

        entry.status = EntryStatus::Waiting;
        entry.last_called_at = Some(Utc::now());
        Ok(entry.clone())
    }

    async fn remove_and_archive(
        &self,
        entry_id: Uuid,
        min_calls: i32,
    ) -> Result<WaitlistHistoryRecord, FloorError> {
        let mut inner = self.lock();
        let entry = inner
            .entries
            .get(&entry_id)
            .ok_or(FloorError::NotFound("Waitlist entry"))?
            .clone();

        if !entry.status.is_active() {
            return Err(FloorError::InvalidState(format!(
                "entry is {}",
                entry.status.as_str()
            )));
        }
        if entry.call_count < min_calls {
            return Err(FloorError::InvalidState(
                "entry is waiting, expected active".to_string(),
            ));
        }

        inner.entries.remove(&entry_id);
        Ok(inner.archive(&entry, false))
    }

    async fn seat_entry(
        &self,
        entry_id: Uuid,
        game_id: Uuid,
        seat_number: i32,
        buyin_amount: Option<i64>,
    ) -> Result<(WaitlistEntry, i64), FloorError> {
        let mut inner = self.lock();

        let entry = inner
            .entries
            .get(&entry_id)
            .ok_or(FloorError::NotFound("Waitlist entry"))?
            .clone();
        if !entry.status.is_active() {
            return Err(FloorError::InvalidState(format!(
                "entry is {}",
                entry.status.as_str()
            )));
        }

        let game = inner
            .games
            .get(&game_id)
            .ok_or(FloorError::NotFound("Game"))?;
        if !game.status.is_seatable() {
            return Err(FloorError::GameClosed);
        }

        let seat = inner
            .seats
            .get(&(game_id, seat_number))
            .ok_or(FloorError::NotFound("Seat"))?;
        if seat.status != SeatStatus::Empty {
            return Err(FloorError::SeatTaken);
        }

        // All preconditions hold; apply the combined transition.
        let occupant_name = entry.display_name();
        if let Some(seat) = inner.seats.get_mut(&(game_id, seat_number)) {
            seat.status = SeatStatus::Occupied;
            seat.occupant_player_id = entry.player_id;
            seat.occupant_name = Some(occupant_name);
            seat.buyin_amount = buyin_amount;
            seat.seated_at = Some(Utc::now());
        }
        if let Some(game) = inner.games.get_mut(&game_id) {
            game.player_count += 1;
            game.updated_at = Utc::now();
        }

        let seated = {
            let entry = inner
                .entries
                .get_mut(&entry_id)
                .ok_or(FloorError::NotFound("Waitlist entry"))?;
            entry.status = EntryStatus::Seated;
            entry.seated_at = Some(Utc::now());
            entry.clone()
        };

        let record = inner.archive(&seated, true);
        Ok((seated, i64::from(record.wait_minutes)))
    }

    async fn group(&self, group_id: Uuid) -> Result<Option<WaitlistGroup>, FloorError> {
        Ok(self.lock().groups.get(&group_id).cloned())
    }

    async fn submit_group(
        &self,
        group_id: Uuid,
        wait_rate_minutes: i32,
    ) -> Result<(i32, Vec<WaitlistEntry>), FloorError> {
        let mut inner = self.lock();

        let group = inner
            .groups
            .get(&group_id)
            .ok_or(FloorError::NotFound("Group"))?
            .clone();
        if group.status != GroupStatus::Forming {
            return Err(FloorError::AlreadySubmitted);
        }

        // No partial submission: verify every member before inserting any.
        for member_id in &group.member_player_ids {
            if inner.has_active_entry(
                group.venue_id,
                &group.game_type,
                &group.stakes,
                &member_id.to_string(),
            ) {
                return Err(FloorError::AlreadyQueued);
            }
        }

        let position = inner.allocate_position(group.venue_id, &group.game_type, &group.stakes);
        let display_game_id =
            inner.display_game(group.venue_id, &group.game_type, &group.stakes);
        let estimated_wait = position.saturating_mul(wait_rate_minutes);
        let notes = format!(
            "squad of {}; prefer_same_table={}, accept_split={}",
            group.member_player_ids.len(),
            group.prefer_same_table,
            group.accept_split
        );

        let mut entries = Vec::with_capacity(group.member_player_ids.len());
        for member_id in &group.member_player_ids {
            let entry = WaitlistEntry {
                entry_id: Uuid::new_v4(),
                venue_id: group.venue_id,
                game_type: group.game_type.clone(),
                stakes: group.stakes.clone(),
                player_id: Some(*member_id),
                player_name: None,
                player_phone: None,
                player_key: member_id.to_string(),
                status: EntryStatus::Waiting,
                position,
                call_count: 0,
                estimated_wait_minutes: estimated_wait,
                group_id: Some(group.group_id),
                display_game_id,
                notes: Some(notes.clone()),
                created_at: Utc::now(),
                last_called_at: None,
                seated_at: None,
            };
            inner.entries.insert(entry.entry_id, entry.clone());
            entries.push(entry);
        }

        if let Some(group) = inner.groups.get_mut(&group_id) {
            group.status = GroupStatus::Waiting;
        }

        Ok((position, entries))
    }

    async fn running_games(
        &self,
        venue_id: Uuid,
        game_type: &str,
        stakes: &str,
    ) -> Result<Vec<Game>, FloorError> {
        let mut games: Vec<Game> = self
            .lock()
            .games
            .values()
            .filter(|g| {
                g.venue_id == venue_id
                    && g.game_type == game_type
                    && g.stakes == stakes
                    && g.status == GameStatus::Running
            })
            .cloned()
            .collect();
        games.sort_by_key(|g| g.created_at);
        Ok(games)
    }

    async fn record_notification(&self, record: &NotificationRecord) -> Result<(), FloorError> {
        self.lock().notifications.push(record.clone());
        Ok(())
    }

    async fn ping(&self) -> Result<(), FloorError> {
        Ok(())
    }
}
