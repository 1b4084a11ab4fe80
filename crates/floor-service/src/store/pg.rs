//! Postgres implementation of [`FloorStore`].
//!
//! Position allocation uses a per-partition counter upsert; every status
//! transition is a single conditional UPDATE with the precondition in the
//! WHERE clause. The one-active-entry rule is enforced by a partial unique
//! index, so a racing duplicate join surfaces as a constraint violation
//! rather than a lost update.

use crate::errors::FloorError;
use crate::models::{
    EntryStatus, Game, GameStatus, GroupStatus, NotificationRecord, Venue, WaitlistEntry,
    WaitlistGroup, WaitlistHistoryRecord,
};
use crate::observability::metrics;
use crate::store::{FloorStore, NewEntry};
use chrono::Utc;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use std::time::Instant;
use tracing::instrument;
use uuid::Uuid;

const ENTRY_COLUMNS: &str = "entry_id, venue_id, game_type, stakes, player_id, player_name, \
     player_phone, player_key, status, position, call_count, estimated_wait_minutes, \
     group_id, display_game_id, notes, created_at, last_called_at, seated_at";

pub struct PgFloorStore {
    pool: PgPool,
}

impl PgFloorStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Map a database row to a `WaitlistEntry`.
///
/// Shared by all queries that return entry rows.
fn map_row_to_entry(row: &PgRow) -> Result<WaitlistEntry, FloorError> {
    let status: String = row.get("status");
    let status = EntryStatus::from_db_str(&status)
        .ok_or_else(|| FloorError::Database(format!("unexpected entry status: {status}")))?;

    Ok(WaitlistEntry {
        entry_id: row.get("entry_id"),
        venue_id: row.get("venue_id"),
        game_type: row.get("game_type"),
        stakes: row.get("stakes"),
        player_id: row.get("player_id"),
        player_name: row.get("player_name"),
        player_phone: row.get("player_phone"),
        player_key: row.get("player_key"),
        status,
        position: row.get("position"),
        call_count: row.get("call_count"),
        estimated_wait_minutes: row.get("estimated_wait_minutes"),
        group_id: row.get("group_id"),
        display_game_id: row.get("display_game_id"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        last_called_at: row.get("last_called_at"),
        seated_at: row.get("seated_at"),
    })
}

fn map_row_to_game(row: &PgRow) -> Result<Game, FloorError> {
    let status: String = row.get("status");
    let status = GameStatus::from_db_str(&status)
        .ok_or_else(|| FloorError::Database(format!("unexpected game status: {status}")))?;

    Ok(Game {
        game_id: row.get("game_id"),
        venue_id: row.get("venue_id"),
        game_type: row.get("game_type"),
        stakes: row.get("stakes"),
        status,
        player_count: row.get("player_count"),
        max_players: row.get("max_players"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

fn map_row_to_group(row: &PgRow) -> Result<WaitlistGroup, FloorError> {
    let status: String = row.get("status");
    let status = GroupStatus::from_db_str(&status)
        .ok_or_else(|| FloorError::Database(format!("unexpected group status: {status}")))?;

    Ok(WaitlistGroup {
        group_id: row.get("group_id"),
        venue_id: row.get("venue_id"),
        game_type: row.get("game_type"),
        stakes: row.get("stakes"),
        leader_player_id: row.get("leader_player_id"),
        member_player_ids: row.get("member_player_ids"),
        status,
        prefer_same_table: row.get("prefer_same_table"),
        accept_split: row.get("accept_split"),
        created_at: row.get("created_at"),
    })
}

/// Whether an insert failed on the one-active-entry partial unique index.
fn is_active_entry_conflict(e: &sqlx::Error) -> bool {
    matches!(
        e,
        sqlx::Error::Database(db)
            if db.constraint() == Some("waitlist_entries_active_player_unique")
    )
}

/// Realized wait in whole minutes since the entry was created.
fn wait_minutes_since(created_at: chrono::DateTime<Utc>) -> i32 {
    let minutes = (Utc::now() - created_at).num_minutes().max(0);
    i32::try_from(minutes).unwrap_or(i32::MAX)
}

/// Allocate the next position for a partition via counter upsert.
///
/// Single statement, so two concurrent joins can never receive the same
/// position.
async fn allocate_position(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    venue_id: Uuid,
    game_type: &str,
    stakes: &str,
) -> Result<i32, FloorError> {
    let row = sqlx::query(
        r#"
        INSERT INTO waitlist_positions (venue_id, game_type, stakes, next_position)
        VALUES ($1, $2, $3, 1)
        ON CONFLICT (venue_id, game_type, stakes)
        DO UPDATE SET next_position = waitlist_positions.next_position + 1
        RETURNING next_position
        "#,
    )
    .bind(venue_id)
    .bind(game_type)
    .bind(stakes)
    .fetch_one(&mut **tx)
    .await?;

    Ok(row.get("next_position"))
}

/// Open game of the partition used for display association on new entries.
async fn display_game_for_partition(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    venue_id: Uuid,
    game_type: &str,
    stakes: &str,
) -> Result<Option<Uuid>, FloorError> {
    let row = sqlx::query(
        r#"
        SELECT game_id FROM games
        WHERE venue_id = $1 AND game_type = $2 AND stakes = $3
          AND status IN ('waiting', 'running')
        ORDER BY created_at
        LIMIT 1
        "#,
    )
    .bind(venue_id)
    .bind(game_type)
    .bind(stakes)
    .fetch_optional(&mut **tx)
    .await?;

    Ok(row.map(|r| r.get("game_id")))
}

#[async_trait::async_trait]
impl FloorStore for PgFloorStore {
    #[instrument(skip_all, name = "floor.store.venue")]
    async fn venue(&self, venue_id: Uuid) -> Result<Option<Venue>, FloorError> {
        let start = Instant::now();

        let row = sqlx::query(
            r#"
            SELECT venue_id, name, queue_managed, auto_text_enabled,
                   wait_per_position_minutes, created_at
            FROM venues
            WHERE venue_id = $1
            "#,
        )
        .bind(venue_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            metrics::record_db_query("venue", false, start.elapsed());
            FloorError::Database(e.to_string())
        })?;

        metrics::record_db_query("venue", true, start.elapsed());

        Ok(row.map(|row| Venue {
            venue_id: row.get("venue_id"),
            name: row.get("name"),
            queue_managed: row.get("queue_managed"),
            auto_text_enabled: row.get("auto_text_enabled"),
            wait_per_position_minutes: row.get("wait_per_position_minutes"),
            created_at: row.get("created_at"),
        }))
    }

    #[instrument(skip_all, name = "floor.store.create_entry")]
    async fn create_entry(
        &self,
        new_entry: &NewEntry,
        wait_rate_minutes: i32,
    ) -> Result<WaitlistEntry, FloorError> {
        let start = Instant::now();

        let result: Result<WaitlistEntry, FloorError> = async {
            let mut tx = self.pool.begin().await?;

            let position = allocate_position(
                &mut tx,
                new_entry.venue_id,
                &new_entry.game_type,
                &new_entry.stakes,
            )
            .await?;

            let display_game_id = display_game_for_partition(
                &mut tx,
                new_entry.venue_id,
                &new_entry.game_type,
                &new_entry.stakes,
            )
            .await?;

            let estimated_wait = position.saturating_mul(wait_rate_minutes);

            let row = sqlx::query(&format!(
                r#"
                INSERT INTO waitlist_entries (
                    venue_id, game_type, stakes, player_id, player_name,
                    player_phone, player_key, status, position, call_count,
                    estimated_wait_minutes, display_game_id, notes
                )
                VALUES ($1, $2, $3, $4, $5, $6, $7, 'waiting', $8, 0, $9, $10, $11)
                RETURNING {ENTRY_COLUMNS}
                "#
            ))
            .bind(new_entry.venue_id)
            .bind(&new_entry.game_type)
            .bind(&new_entry.stakes)
            .bind(new_entry.player_id)
            .bind(&new_entry.player_name)
            .bind(&new_entry.player_phone)
            .bind(&new_entry.player_key)
            .bind(position)
            .bind(estimated_wait)
            .bind(display_game_id)
            .bind(&new_entry.notes)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if is_active_entry_conflict(&e) {
                    FloorError::AlreadyQueued
                } else {
                    FloorError::Database(e.to_string())
                }
            })?;

            let entry = map_row_to_entry(&row)?;
            tx.commit().await?;
            Ok(entry)
        }
        .await;

        metrics::record_db_query("create_entry", result.is_ok(), start.elapsed());
        result
    }

    #[instrument(skip_all, name = "floor.store.entry")]
    async fn entry(&self, entry_id: Uuid) -> Result<Option<WaitlistEntry>, FloorError> {
        let start = Instant::now();

        let row = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM waitlist_entries WHERE entry_id = $1"
        ))
        .bind(entry_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            metrics::record_db_query("entry", false, start.elapsed());
            FloorError::Database(e.to_string())
        })?;

        metrics::record_db_query("entry", true, start.elapsed());
        row.as_ref().map(map_row_to_entry).transpose()
    }

    #[instrument(skip_all, name = "floor.store.venue_waitlist")]
    async fn venue_waitlist(&self, venue_id: Uuid) -> Result<Vec<WaitlistEntry>, FloorError> {
        let start = Instant::now();

        let rows = sqlx::query(&format!(
            r#"
            SELECT {ENTRY_COLUMNS} FROM waitlist_entries
            WHERE venue_id = $1 AND status IN ('waiting', 'called')
            ORDER BY position
            "#
        ))
        .bind(venue_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            metrics::record_db_query("venue_waitlist", false, start.elapsed());
            FloorError::Database(e.to_string())
        })?;

        metrics::record_db_query("venue_waitlist", true, start.elapsed());
        rows.iter().map(map_row_to_entry).collect()
    }

    #[instrument(skip_all, name = "floor.store.call_entry")]
    async fn call_entry(&self, entry_id: Uuid) -> Result<WaitlistEntry, FloorError> {
        let start = Instant::now();

        let result: Result<WaitlistEntry, FloorError> = async {
            let row = sqlx::query(&format!(
                r#"
                UPDATE waitlist_entries
                SET status = 'called', call_count = call_count + 1, last_called_at = NOW()
                WHERE entry_id = $1 AND status = 'waiting'
                RETURNING {ENTRY_COLUMNS}
                "#
            ))
            .bind(entry_id)
            .fetch_optional(&self.pool)
            .await?;

            match row {
                Some(row) => map_row_to_entry(&row),
                None => Err(self.classify_missed_transition(entry_id, "waiting").await?),
            }
        }
        .await;

        metrics::record_db_query("call_entry", result.is_ok(), start.elapsed());
        result
    }

    #[instrument(skip_all, name = "floor.store.release_call")]
    async fn release_call(
        &self,
        entry_id: Uuid,
        max_passes: i32,
    ) -> Result<WaitlistEntry, FloorError> {
        let start = Instant::now();

        let result: Result<WaitlistEntry, FloorError> = async {
            let row = sqlx::query(&format!(
                r#"
                UPDATE waitlist_entries
                SET status = 'waiting', last_called_at = NOW()
                WHERE entry_id = $1 AND status IN ('waiting', 'called')
                  AND call_count < $2
                RETURNING {ENTRY_COLUMNS}
                "#
            ))
            .bind(entry_id)
            .bind(max_passes)
            .fetch_optional(&self.pool)
            .await?;

            match row {
                Some(row) => map_row_to_entry(&row),
                None => Err(self.classify_missed_transition(entry_id, "active").await?),
            }
        }
        .await;

        metrics::record_db_query("release_call", result.is_ok(), start.elapsed());
        result
    }

    #[instrument(skip_all, name = "floor.store.remove_and_archive")]
    async fn remove_and_archive(
        &self,
        entry_id: Uuid,
        min_calls: i32,
    ) -> Result<WaitlistHistoryRecord, FloorError> {
        let start = Instant::now();

        let result: Result<WaitlistHistoryRecord, FloorError> = async {
            let mut tx = self.pool.begin().await?;

            let row = sqlx::query(&format!(
                r#"
                DELETE FROM waitlist_entries
                WHERE entry_id = $1 AND status IN ('waiting', 'called')
                  AND call_count >= $2
                RETURNING {ENTRY_COLUMNS}
                "#
            ))
            .bind(entry_id)
            .bind(min_calls)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(row) = row else {
                return Err(self.classify_missed_transition(entry_id, "active").await?);
            };
            let entry = map_row_to_entry(&row)?;

            let wait_minutes = wait_minutes_since(entry.created_at);
            let archived_at = Utc::now();

            sqlx::query(
                r#"
                INSERT INTO waitlist_history (
                    entry_id, venue_id, game_type, stakes, wait_minutes,
                    was_seated, archived_at
                )
                VALUES ($1, $2, $3, $4, $5, false, $6)
                ON CONFLICT (entry_id) DO NOTHING
                "#,
            )
            .bind(entry.entry_id)
            .bind(entry.venue_id)
            .bind(&entry.game_type)
            .bind(&entry.stakes)
            .bind(wait_minutes)
            .bind(archived_at)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;

            Ok(WaitlistHistoryRecord {
                entry_id: entry.entry_id,
                venue_id: entry.venue_id,
                game_type: entry.game_type,
                stakes: entry.stakes,
                wait_minutes,
                was_seated: false,
                archived_at,
            })
        }
        .await;

        metrics::record_db_query("remove_and_archive", result.is_ok(), start.elapsed());
        result
    }

    #[instrument(skip_all, name = "floor.store.seat_entry")]
    async fn seat_entry(
        &self,
        entry_id: Uuid,
        game_id: Uuid,
        seat_number: i32,
        buyin_amount: Option<i64>,
    ) -> Result<(WaitlistEntry, i64), FloorError> {
        let start = Instant::now();

        let result: Result<(WaitlistEntry, i64), FloorError> = async {
            let mut tx = self.pool.begin().await?;

            let entry_row = sqlx::query(&format!(
                "SELECT {ENTRY_COLUMNS} FROM waitlist_entries WHERE entry_id = $1"
            ))
            .bind(entry_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(FloorError::NotFound("Waitlist entry"))?;
            let entry = map_row_to_entry(&entry_row)?;

            if !entry.status.is_active() {
                return Err(FloorError::InvalidState(format!(
                    "entry is {}",
                    entry.status.as_str()
                )));
            }

            let game_row = sqlx::query(
                r#"
                SELECT game_id, venue_id, game_type, stakes, status,
                       player_count, max_players, created_at, updated_at
                FROM games
                WHERE game_id = $1
                "#,
            )
            .bind(game_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(FloorError::NotFound("Game"))?;
            let game = map_row_to_game(&game_row)?;

            if !game.status.is_seatable() {
                return Err(FloorError::GameClosed);
            }

            // Occupy iff empty. Exactly one of N concurrent callers gets
            // the row.
            let occupied = sqlx::query(
                r#"
                UPDATE seats
                SET status = 'occupied', occupant_player_id = $1, occupant_name = $2,
                    buyin_amount = $3, seated_at = NOW()
                WHERE game_id = $4 AND seat_number = $5 AND status = 'empty'
                "#,
            )
            .bind(entry.player_id)
            .bind(entry.display_name())
            .bind(buyin_amount)
            .bind(game_id)
            .bind(seat_number)
            .execute(&mut *tx)
            .await?;

            if occupied.rows_affected() == 0 {
                let seat_exists = sqlx::query(
                    "SELECT 1 AS present FROM seats WHERE game_id = $1 AND seat_number = $2",
                )
                .bind(game_id)
                .bind(seat_number)
                .fetch_optional(&mut *tx)
                .await?;

                return Err(if seat_exists.is_some() {
                    FloorError::SeatTaken
                } else {
                    FloorError::NotFound("Seat")
                });
            }

            let seated_row = sqlx::query(&format!(
                r#"
                UPDATE waitlist_entries
                SET status = 'seated', seated_at = NOW()
                WHERE entry_id = $1 AND status IN ('waiting', 'called')
                RETURNING {ENTRY_COLUMNS}
                "#
            ))
            .bind(entry_id)
            .fetch_optional(&mut *tx)
            .await?
            // A racing pass or seat got here first; the transaction rolls
            // back and the seat stays empty.
            .ok_or_else(|| FloorError::InvalidState("entry state changed".to_string()))?;
            let seated = map_row_to_entry(&seated_row)?;

            sqlx::query(
                r#"
                UPDATE games
                SET player_count = player_count + 1, updated_at = NOW()
                WHERE game_id = $1
                "#,
            )
            .bind(game_id)
            .execute(&mut *tx)
            .await?;

            let wait_minutes = wait_minutes_since(seated.created_at);

            sqlx::query(
                r#"
                INSERT INTO waitlist_history (
                    entry_id, venue_id, game_type, stakes, wait_minutes,
                    was_seated, archived_at
                )
                VALUES ($1, $2, $3, $4, $5, true, NOW())
                ON CONFLICT (entry_id) DO NOTHING
                "#,
            )
            .bind(seated.entry_id)
            .bind(seated.venue_id)
            .bind(&seated.game_type)
            .bind(&seated.stakes)
            .bind(wait_minutes)
            .execute(&mut *tx)
            .await?;

            tx.commit().await?;
            Ok((seated, i64::from(wait_minutes)))
        }
        .await;

        metrics::record_db_query("seat_entry", result.is_ok(), start.elapsed());
        result
    }

    #[instrument(skip_all, name = "floor.store.group")]
    async fn group(&self, group_id: Uuid) -> Result<Option<WaitlistGroup>, FloorError> {
        let start = Instant::now();

        let row = sqlx::query(
            r#"
            SELECT group_id, venue_id, game_type, stakes, leader_player_id,
                   member_player_ids, status, prefer_same_table, accept_split,
                   created_at
            FROM waitlist_groups
            WHERE group_id = $1
            "#,
        )
        .bind(group_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            metrics::record_db_query("group", false, start.elapsed());
            FloorError::Database(e.to_string())
        })?;

        metrics::record_db_query("group", true, start.elapsed());
        row.as_ref().map(map_row_to_group).transpose()
    }

    #[instrument(skip_all, name = "floor.store.submit_group")]
    async fn submit_group(
        &self,
        group_id: Uuid,
        wait_rate_minutes: i32,
    ) -> Result<(i32, Vec<WaitlistEntry>), FloorError> {
        let start = Instant::now();

        let result: Result<(i32, Vec<WaitlistEntry>), FloorError> = async {
            let mut tx = self.pool.begin().await?;

            // forming -> waiting is one-way; losing a submit race surfaces
            // as ALREADY_SUBMITTED.
            let group_row = sqlx::query(
                r#"
                UPDATE waitlist_groups
                SET status = 'waiting'
                WHERE group_id = $1 AND status = 'forming'
                RETURNING group_id, venue_id, game_type, stakes, leader_player_id,
                          member_player_ids, status, prefer_same_table, accept_split,
                          created_at
                "#,
            )
            .bind(group_id)
            .fetch_optional(&mut *tx)
            .await?;

            let Some(group_row) = group_row else {
                let exists =
                    sqlx::query("SELECT 1 AS present FROM waitlist_groups WHERE group_id = $1")
                        .bind(group_id)
                        .fetch_optional(&mut *tx)
                        .await?;
                return Err(if exists.is_some() {
                    FloorError::AlreadySubmitted
                } else {
                    FloorError::NotFound("Group")
                });
            };
            let group = map_row_to_group(&group_row)?;

            let position =
                allocate_position(&mut tx, group.venue_id, &group.game_type, &group.stakes)
                    .await?;
            let display_game_id = display_game_for_partition(
                &mut tx,
                group.venue_id,
                &group.game_type,
                &group.stakes,
            )
            .await?;
            let estimated_wait = position.saturating_mul(wait_rate_minutes);

            let notes = format!(
                "squad of {}; prefer_same_table={}, accept_split={}",
                group.member_player_ids.len(),
                group.prefer_same_table,
                group.accept_split
            );

            let mut entries = Vec::with_capacity(group.member_player_ids.len());
            for member_id in &group.member_player_ids {
                let row = sqlx::query(&format!(
                    r#"
                    INSERT INTO waitlist_entries (
                        venue_id, game_type, stakes, player_id, player_key,
                        status, position, call_count, estimated_wait_minutes,
                        group_id, display_game_id, notes
                    )
                    VALUES ($1, $2, $3, $4, $5, 'waiting', $6, 0, $7, $8, $9, $10)
                    RETURNING {ENTRY_COLUMNS}
                    "#
                ))
                .bind(group.venue_id)
                .bind(&group.game_type)
                .bind(&group.stakes)
                .bind(member_id)
                .bind(member_id.to_string())
                .bind(position)
                .bind(estimated_wait)
                .bind(group.group_id)
                .bind(display_game_id)
                .bind(&notes)
                .fetch_one(&mut *tx)
                .await
                .map_err(|e| {
                    if is_active_entry_conflict(&e) {
                        FloorError::AlreadyQueued
                    } else {
                        FloorError::Database(e.to_string())
                    }
                })?;

                entries.push(map_row_to_entry(&row)?);
            }

            tx.commit().await?;
            Ok((position, entries))
        }
        .await;

        metrics::record_db_query("submit_group", result.is_ok(), start.elapsed());
        result
    }

    #[instrument(skip_all, name = "floor.store.running_games")]
    async fn running_games(
        &self,
        venue_id: Uuid,
        game_type: &str,
        stakes: &str,
    ) -> Result<Vec<Game>, FloorError> {
        let start = Instant::now();

        let rows = sqlx::query(
            r#"
            SELECT game_id, venue_id, game_type, stakes, status,
                   player_count, max_players, created_at, updated_at
            FROM games
            WHERE venue_id = $1 AND game_type = $2 AND stakes = $3
              AND status = 'running'
            ORDER BY created_at
            "#,
        )
        .bind(venue_id)
        .bind(game_type)
        .bind(stakes)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            metrics::record_db_query("running_games", false, start.elapsed());
            FloorError::Database(e.to_string())
        })?;

        metrics::record_db_query("running_games", true, start.elapsed());
        rows.iter().map(map_row_to_game).collect()
    }

    #[instrument(skip_all, name = "floor.store.record_notification")]
    async fn record_notification(&self, record: &NotificationRecord) -> Result<(), FloorError> {
        let start = Instant::now();

        sqlx::query(
            r#"
            INSERT INTO notification_log (entry_id, venue_id, channel, status, detail)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(record.entry_id)
        .bind(record.venue_id)
        .bind(record.channel.as_str())
        .bind(record.status.as_str())
        .bind(&record.detail)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            metrics::record_db_query("record_notification", false, start.elapsed());
            FloorError::Database(e.to_string())
        })?;

        metrics::record_db_query("record_notification", true, start.elapsed());
        Ok(())
    }

    #[instrument(skip_all, name = "floor.store.ping")]
    async fn ping(&self) -> Result<(), FloorError> {
        sqlx::query("SELECT 1 AS one")
            .fetch_one(&self.pool)
            .await
            .map(|_| ())
            .map_err(|e| FloorError::Database(e.to_string()))
    }
}

impl PgFloorStore {
    /// Explain why a conditional transition matched no row: the entry is
    /// either gone or in a state (or call budget) the transition does not
    /// accept.
    async fn classify_missed_transition(
        &self,
        entry_id: Uuid,
        expected: &str,
    ) -> Result<FloorError, FloorError> {
        let row = sqlx::query("SELECT status FROM waitlist_entries WHERE entry_id = $1")
            .bind(entry_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(match row {
            None => FloorError::NotFound("Waitlist entry"),
            Some(row) => {
                let status: String = row.get("status");
                if EntryStatus::from_db_str(&status).is_some_and(|s| s.is_active()) {
                    FloorError::InvalidState(format!("entry is {status}, expected {expected}"))
                } else {
                    FloorError::InvalidState(format!("entry is {status}"))
                }
            }
        })
    }
}
