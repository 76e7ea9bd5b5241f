//! Request and response types for the game endpoints.
//!
//! An [`ActionRequest`] is what a client submits for a nation; the
//! resolver in `nationmind-core` turns it into state changes. The
//! `action_type` is kept as a raw string here so that unknown kinds reach
//! the resolver and are rejected as a game rule rather than as a
//! malformed body.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::ids::NationId;
use crate::structs::{EventSummary, NationSummary};

/// An action submitted on behalf of a nation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct ActionRequest {
    /// Wire name of the action (`attack`, `alliance`, `recruit`, ...).
    pub action_type: String,
    /// The other nation involved, for actions that need one.
    #[serde(default)]
    pub target_nation_id: Option<NationId>,
    /// Free-form parameters (e.g. `{"amount": 5}` for recruit).
    #[serde(default)]
    #[ts(type = "Record<string, unknown>")]
    pub data: serde_json::Map<String, serde_json::Value>,
}

/// Full game state returned by `GET /api/game/state`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct GameState {
    /// Current turn number, 0 before initialization.
    pub current_turn: i32,
    /// Active nations.
    pub nations: Vec<NationSummary>,
    /// The player's nation, if one is active.
    pub player_nation_id: Option<NationId>,
    /// Most recent events, newest first.
    pub recent_events: Vec<EventSummary>,
    /// Whether at most one nation remains active.
    pub is_game_over: bool,
    /// Never computed; always `None`.
    pub winner: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_request_defaults_optional_fields() {
        let parsed: Result<ActionRequest, _> =
            serde_json::from_str(r#"{"action_type": "recruit"}"#);
        let request = parsed.ok();
        assert_eq!(
            request.as_ref().map(|r| r.action_type.as_str()),
            Some("recruit")
        );
        assert_eq!(request.as_ref().and_then(|r| r.target_nation_id), None);
        assert!(request.is_some_and(|r| r.data.is_empty()));
    }

    #[test]
    fn action_request_keeps_unknown_action_names() {
        let parsed: Result<ActionRequest, _> = serde_json::from_str(
            r#"{"action_type": "nuke", "target_nation_id": 3, "data": {"x": 1}}"#,
        );
        let request = parsed.ok();
        assert_eq!(request.as_ref().map(|r| r.action_type.as_str()), Some("nuke"));
        assert_eq!(
            request.and_then(|r| r.target_nation_id),
            Some(NationId(3))
        );
    }
}
