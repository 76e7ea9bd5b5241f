//! Game setup and whole-game views.

use nationmind_types::{Event, GameState, Nation, NewNation, Personality};

use crate::error::GameError;

/// Number of recent events included in [`GameState`].
pub const STATE_RECENT_EVENTS: i64 = 10;

/// Largest gold or troop change, in either direction, accepted by one
/// direct resource adjustment.
pub const MAX_RESOURCE_DELTA: i64 = 1_000_000_000;

const MIN_RESOURCE_DELTA: i64 = -1_000_000_000;

/// The nations every new game starts with. The first is the player's.
pub fn starting_nations() -> Vec<NewNation> {
    vec![
        start("España", Personality::Diplomatic, (1200, 120, 3), (60.0, 70.0, 65.0), false),
        start("Francia", Personality::Aggressive, (1500, 150, 4), (80.0, 75.0, 70.0), true),
        start("Alemania", Personality::Expansionist, (1800, 180, 5), (85.0, 90.0, 60.0), true),
        start("Italia", Personality::Defensive, (1000, 100, 2), (55.0, 65.0, 60.0), true),
        start("Inglaterra", Personality::Diplomatic, (1600, 140, 3), (75.0, 85.0, 80.0), true),
    ]
}

fn start(
    name: &str,
    personality: Personality,
    (gold, troops, territories): (i64, i64, i32),
    (military, economic, diplomatic): (f64, f64, f64),
    ai_controlled: bool,
) -> NewNation {
    NewNation {
        personality,
        gold,
        troops,
        territories,
        military_power: military,
        economic_power: economic,
        diplomatic_influence: diplomatic,
        ai_controlled,
        ..NewNation::named(name)
    }
}

/// Refuse to initialize a game when nations already exist.
///
/// # Errors
///
/// Returns [`GameError::Conflict`] if `existing_nations > 0`.
pub fn ensure_not_initialized(existing_nations: i64) -> Result<(), GameError> {
    if existing_nations > 0 {
        return Err(GameError::Conflict(format!(
            "game already initialized ({existing_nations} nations exist)"
        )));
    }
    Ok(())
}

/// Check the deltas of a direct resource adjustment.
///
/// # Errors
///
/// Returns [`GameError::Validation`] if either delta exceeds
/// [`MAX_RESOURCE_DELTA`] in magnitude.
pub fn validate_resource_delta(gold_change: i64, troops_change: i64) -> Result<(), GameError> {
    let allowed = MIN_RESOURCE_DELTA..=MAX_RESOURCE_DELTA;
    for (field, value) in [("gold_change", gold_change), ("troops_change", troops_change)] {
        if !allowed.contains(&value) {
            return Err(GameError::Validation(format!(
                "{field} must be within +/-{MAX_RESOURCE_DELTA}, got {value}"
            )));
        }
    }
    Ok(())
}

/// The game ends once at most one nation is still active.
pub fn is_game_over(nations: &[Nation]) -> bool {
    nations.iter().filter(|n| n.is_active).count() <= 1
}

/// The player's nation: the first active nation not driven by the AI.
pub fn player(nations: &[Nation]) -> Option<&Nation> {
    nations.iter().find(|n| n.is_active && !n.ai_controlled)
}

/// Assemble the game state view.
///
/// `nations` should be the active nations and `recent_events` the newest
/// events, newest first. `current_turn` is 0 before initialization.
pub fn game_state(current_turn: Option<i32>, nations: &[Nation], recent_events: &[Event]) -> GameState {
    GameState {
        current_turn: current_turn.unwrap_or(0),
        nations: nations.iter().map(Nation::summary).collect(),
        player_nation_id: player(nations).map(|n| n.id),
        recent_events: recent_events.iter().map(Event::summary).collect(),
        is_game_over: is_game_over(nations),
        winner: None,
    }
}
