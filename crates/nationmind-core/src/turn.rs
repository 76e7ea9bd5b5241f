//! Turn sequencing and world snapshots.
//!
//! Turn numbers start at 1 and grow by exactly one per advance. The
//! number for a new turn is always `current + 1`, where `current` is 0 when
//! no turn exists. The store computes `current` inside the same
//! transaction that inserts the new row.

use nationmind_types::{Nation, NationId, Relation, RelationStatus, WorldState};

use crate::error::GameError;
use crate::relation::pairs_with_status;

/// Maximum length of a turn summary, in characters.
pub const MAX_SUMMARY_LEN: usize = 500;

/// Summary written on the first turn of a new game.
pub const INITIAL_SUMMARY: &str = "Game start. All nations begin at peace.";

/// Summary written when a turn is advanced without AI resolution.
pub const ADVANCE_SUMMARY: &str = "Turn advanced (AI agents pending)";

/// The number the next turn will carry.
///
/// # Errors
///
/// Returns [`GameError::Conflict`] if the counter would overflow.
pub fn next_turn_number(current: Option<i32>) -> Result<i32, GameError> {
    current
        .unwrap_or(0)
        .checked_add(1)
        .ok_or_else(|| GameError::Conflict(String::from("turn counter exhausted")))
}

/// Check an optional summary against the length limit.
///
/// # Errors
///
/// Returns [`GameError::Validation`] if the summary is too long.
pub fn validate_summary(summary: Option<&str>) -> Result<(), GameError> {
    match summary {
        Some(s) if s.chars().count() > MAX_SUMMARY_LEN => Err(GameError::Validation(format!(
            "summary must be at most {MAX_SUMMARY_LEN} characters"
        ))),
        _ => Ok(()),
    }
}

/// Freeze the given nations and relations into a snapshot for `turn`.
///
/// Nations are copied by value; alliance and war lists are derived from the
/// relation statuses.
pub fn snapshot(turn: i32, nations: &[Nation], relations: &[Relation]) -> WorldState {
    WorldState {
        turn,
        nations: nations.to_vec(),
        alliances: pairs_with_status(relations, RelationStatus::Allied),
        wars: pairs_with_status(relations, RelationStatus::War),
        power_ranking: power_ranking(nations),
    }
}

/// Nations ordered by [`Nation::total_power`], strongest first. Ties keep
/// id order.
pub fn power_ranking(nations: &[Nation]) -> Vec<(NationId, f64)> {
    let mut ranking: Vec<(NationId, f64)> =
        nations.iter().map(|n| (n.id, n.total_power())).collect();
    ranking.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
    ranking
}
