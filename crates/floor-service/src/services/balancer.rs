//! Advisory table balancing.
//!
//! Pure computation over a snapshot of running games for one
//! venue + game type + stakes partition. The balancer never mutates any
//! table; it only proposes moves for the floor to act on.

use serde::Serialize;
use uuid::Uuid;

/// Player count snapshot for one running game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLoad {
    pub game_id: Uuid,
    pub player_count: i32,
}

/// One proposed player move between two tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoveSuggestion {
    pub from_game_id: Uuid,
    pub to_game_id: Uuid,
    pub players_to_move: i32,
}

/// Result of a rebalance pass.
#[derive(Debug, Clone, Serialize)]
pub struct RebalancePlan {
    /// True when every table is already within 1 of the ideal.
    pub balanced: bool,
    pub ideal_per_table: i32,
    pub suggestions: Vec<MoveSuggestion>,
}

/// Compute rebalancing advice for a set of running tables.
///
/// With fewer than 2 tables there is nothing to balance. Otherwise the
/// ideal is `round(total / tables)`; tables above it are overloaded, below
/// it underloaded, and every (overloaded, underloaded) pair whose gap
/// exceeds 1 yields a suggestion of `floor((over - under) / 2)` players.
///
/// Ordering is deterministic: overloaded tables are visited by descending
/// player count, underloaded by ascending, ties broken by game id. All
/// suggestions are computed against the input snapshot, not against the
/// result of earlier suggestions.
pub fn suggest_rebalance(tables: &[TableLoad]) -> RebalancePlan {
    if tables.len() < 2 {
        let ideal = tables.first().map_or(0, |t| t.player_count);
        return RebalancePlan {
            balanced: true,
            ideal_per_table: ideal,
            suggestions: Vec::new(),
        };
    }

    let total: i64 = tables.iter().map(|t| i64::from(t.player_count)).sum();

    // round(total / tables); counts are small, the cast is exact.
    #[allow(clippy::cast_possible_truncation)]
    let ideal = {
        #[allow(clippy::cast_precision_loss)]
        let mean = total as f64 / tables.len() as f64;
        mean.round() as i32
    };

    let balanced = tables
        .iter()
        .all(|t| (t.player_count - ideal).abs() <= 1);

    if balanced {
        return RebalancePlan {
            balanced: true,
            ideal_per_table: ideal,
            suggestions: Vec::new(),
        };
    }

    let mut overloaded: Vec<&TableLoad> = tables
        .iter()
        .filter(|t| t.player_count > ideal)
        .collect();
    let mut underloaded: Vec<&TableLoad> = tables
        .iter()
        .filter(|t| t.player_count < ideal)
        .collect();

    overloaded.sort_by(|a, b| {
        b.player_count
            .cmp(&a.player_count)
            .then(a.game_id.cmp(&b.game_id))
    });
    underloaded.sort_by(|a, b| {
        a.player_count
            .cmp(&b.player_count)
            .then(a.game_id.cmp(&b.game_id))
    });

    let mut suggestions = Vec::new();
    for over in &overloaded {
        for under in &underloaded {
            let gap = over.player_count - under.player_count;
            if gap > 1 {
                suggestions.push(MoveSuggestion {
                    from_game_id: over.game_id,
                    to_game_id: under.game_id,
                    players_to_move: gap / 2,
                });
            }
        }
    }

    RebalancePlan {
        balanced: false,
        ideal_per_table: ideal,
        suggestions,
    }
}
