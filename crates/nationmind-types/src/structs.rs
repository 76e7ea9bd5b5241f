//! Core entity structs for the Nation-Mind game.
//!
//! Four entities are persisted, one table each: [`Nation`], [`Turn`],
//! [`Event`] and [`Relation`]. Each has a `New*` payload used to create
//! it and, where the entity is mutable, a `*Patch` payload whose `None`
//! fields mean "leave unchanged". Field constraints are declared with
//! [`validator`] and checked before anything reaches the database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use validator::Validate;

use crate::enums::{Personality, RelationStatus};
use crate::ids::{EventId, NationId, RelationId, TurnId};

/// Default starting gold for a created nation.
pub const DEFAULT_GOLD: i64 = 1000;

/// Default starting troops for a created nation.
pub const DEFAULT_TROOPS: i64 = 100;

/// Default territory count for a created nation.
pub const DEFAULT_TERRITORIES: i32 = 1;

/// Default rating for each of the three power stats.
pub const DEFAULT_POWER: f64 = 50.0;

/// Default event importance.
pub const DEFAULT_IMPORTANCE: i32 = 5;

// ---------------------------------------------------------------------------
// Nation
// ---------------------------------------------------------------------------

/// A country in the simulation, controlled by the player or an AI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Nation {
    /// Row id.
    pub id: NationId,
    /// Display name, unique across every nation ever created.
    pub name: String,
    /// AI behavior profile.
    pub personality: Personality,
    /// Treasury.
    #[ts(type = "number")]
    pub gold: i64,
    /// Standing army size.
    #[ts(type = "number")]
    pub troops: i64,
    /// Number of territories held.
    pub territories: i32,
    /// Military rating, 0-100.
    pub military_power: f64,
    /// Economic rating, 0-100.
    pub economic_power: f64,
    /// Diplomatic rating, 0-100.
    pub diplomatic_influence: f64,
    /// Strategic goals, in priority order.
    pub objectives: Vec<String>,
    /// `false` for the human player's nation.
    pub ai_controlled: bool,
    /// `false` once the nation has been (soft-)deleted.
    pub is_active: bool,
}

impl Nation {
    /// Mean of the three power ratings.
    pub fn total_power(&self) -> f64 {
        (self.military_power + self.economic_power + self.diplomatic_influence) / 3.0
    }

    /// Lightweight projection used in list views.
    pub fn summary(&self) -> NationSummary {
        NationSummary {
            id: self.id,
            name: self.name.clone(),
            personality: self.personality,
            ai_controlled: self.ai_controlled,
            is_active: self.is_active,
        }
    }
}

/// Lightweight nation projection for lists and the game state view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NationSummary {
    /// Row id.
    pub id: NationId,
    /// Display name.
    pub name: String,
    /// AI behavior profile.
    pub personality: Personality,
    /// `false` for the player's nation.
    pub ai_controlled: bool,
    /// `false` once deleted.
    pub is_active: bool,
}

const fn default_gold() -> i64 {
    DEFAULT_GOLD
}

const fn default_troops() -> i64 {
    DEFAULT_TROOPS
}

const fn default_territories() -> i32 {
    DEFAULT_TERRITORIES
}

const fn default_power() -> f64 {
    DEFAULT_POWER
}

const fn default_true() -> bool {
    true
}

/// Payload for creating a nation. Omitted fields take the game defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewNation {
    /// Display name (3-100 characters).
    #[validate(length(min = 3, max = 100))]
    pub name: String,
    /// AI behavior profile.
    #[serde(default)]
    pub personality: Personality,
    /// Starting treasury.
    #[serde(default = "default_gold")]
    #[validate(range(min = 0))]
    #[ts(type = "number")]
    pub gold: i64,
    /// Starting army.
    #[serde(default = "default_troops")]
    #[validate(range(min = 0))]
    #[ts(type = "number")]
    pub troops: i64,
    /// Starting territories (at least one).
    #[serde(default = "default_territories")]
    #[validate(range(min = 1))]
    pub territories: i32,
    /// Military rating.
    #[serde(default = "default_power")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub military_power: f64,
    /// Economic rating.
    #[serde(default = "default_power")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub economic_power: f64,
    /// Diplomatic rating.
    #[serde(default = "default_power")]
    #[validate(range(min = 0.0, max = 100.0))]
    pub diplomatic_influence: f64,
    /// Strategic goals.
    #[serde(default)]
    pub objectives: Vec<String>,
    /// `false` for the player's nation.
    #[serde(default = "default_true")]
    pub ai_controlled: bool,
}

impl NewNation {
    /// A nation with the given name and every other field at its default.
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            personality: Personality::default(),
            gold: DEFAULT_GOLD,
            troops: DEFAULT_TROOPS,
            territories: DEFAULT_TERRITORIES,
            military_power: DEFAULT_POWER,
            economic_power: DEFAULT_POWER,
            diplomatic_influence: DEFAULT_POWER,
            objectives: Vec::new(),
            ai_controlled: true,
        }
    }
}

/// Partial nation update. Only `Some` fields are written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NationPatch {
    /// New display name.
    #[validate(length(min = 3, max = 100))]
    pub name: Option<String>,
    /// New behavior profile.
    pub personality: Option<Personality>,
    /// New treasury.
    #[validate(range(min = 0))]
    #[ts(type = "number | null")]
    pub gold: Option<i64>,
    /// New army size.
    #[validate(range(min = 0))]
    #[ts(type = "number | null")]
    pub troops: Option<i64>,
    /// New territory count.
    #[validate(range(min = 1))]
    pub territories: Option<i32>,
    /// New military rating.
    #[validate(range(min = 0.0, max = 100.0))]
    pub military_power: Option<f64>,
    /// New economic rating.
    #[validate(range(min = 0.0, max = 100.0))]
    pub economic_power: Option<f64>,
    /// New diplomatic rating.
    #[validate(range(min = 0.0, max = 100.0))]
    pub diplomatic_influence: Option<f64>,
    /// Replacement objective list.
    pub objectives: Option<Vec<String>>,
    /// New control flag.
    pub ai_controlled: Option<bool>,
    /// New active flag.
    pub is_active: Option<bool>,
}

// ---------------------------------------------------------------------------
// Turn
// ---------------------------------------------------------------------------

/// A numbered time-step carrying a frozen copy of the world.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Turn {
    /// Row id.
    pub id: TurnId,
    /// Sequential turn number, starting at 1.
    pub turn_number: i32,
    /// Snapshot of the world when the turn was opened.
    pub world_state: serde_json::Value,
    /// When the turn row was written.
    pub created_at: DateTime<Utc>,
    /// Optional narrative (at most 500 characters).
    pub summary: Option<String>,
}

/// The structured snapshot stored in [`Turn::world_state`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct WorldState {
    /// The turn number this snapshot opens.
    pub turn: i32,
    /// Every nation included in the snapshot, copied by value.
    pub nations: Vec<Nation>,
    /// Allied pairs, stored in canonical order.
    pub alliances: Vec<(NationId, NationId)>,
    /// Pairs at war, stored in canonical order.
    pub wars: Vec<(NationId, NationId)>,
    /// Every snapshotted nation with its [`Nation::total_power`],
    /// strongest first.
    pub power_ranking: Vec<(NationId, f64)>,
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// An append-only entry in the game log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Event {
    /// Row id.
    pub id: EventId,
    /// Turn during which the event happened.
    pub turn_id: TurnId,
    /// The acting nation.
    pub nation_id: NationId,
    /// Short category, e.g. `attack`, `alliance`, `recruit`.
    pub event_type: String,
    /// Human-readable description.
    pub description: String,
    /// Structured payload.
    pub data: serde_json::Value,
    /// Ranking weight, 1-10.
    pub importance: i32,
    /// When the event was written.
    pub created_at: DateTime<Utc>,
}

impl Event {
    /// Lightweight projection for news feeds.
    pub fn summary(&self) -> EventSummary {
        EventSummary {
            id: self.id,
            event_type: self.event_type.clone(),
            description: self.description.clone(),
            created_at: self.created_at,
        }
    }
}

/// Lightweight event projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct EventSummary {
    /// Row id.
    pub id: EventId,
    /// Short category.
    pub event_type: String,
    /// Human-readable description.
    pub description: String,
    /// When the event was written.
    pub created_at: DateTime<Utc>,
}

fn empty_object() -> serde_json::Value {
    serde_json::Value::Object(serde_json::Map::new())
}

const fn default_importance() -> i32 {
    DEFAULT_IMPORTANCE
}

/// Payload for appending an event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewEvent {
    /// Turn during which the event happened.
    pub turn_id: TurnId,
    /// The acting nation.
    pub nation_id: NationId,
    /// Short category (3-50 characters).
    #[validate(length(min = 3, max = 50))]
    pub event_type: String,
    /// Human-readable description (10-500 characters).
    #[validate(length(min = 10, max = 500))]
    pub description: String,
    /// Structured payload.
    #[serde(default = "empty_object")]
    pub data: serde_json::Value,
    /// Ranking weight, 1-10.
    #[serde(default = "default_importance")]
    #[validate(range(min = 1, max = 10))]
    pub importance: i32,
}

// ---------------------------------------------------------------------------
// Relation
// ---------------------------------------------------------------------------

/// Diplomatic state between exactly two nations.
///
/// Stored with `nation_a_id < nation_b_id`; there is one row per
/// unordered pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Relation {
    /// Row id.
    pub id: RelationId,
    /// The lower nation id of the pair.
    pub nation_a_id: NationId,
    /// The higher nation id of the pair.
    pub nation_b_id: NationId,
    /// Current diplomatic status.
    pub status: RelationStatus,
    /// Hostile (-100) to friendly (+100).
    pub relationship_score: i32,
}

impl Relation {
    /// The other side of the pair, if `nation` is one side.
    pub fn counterpart(&self, nation: NationId) -> Option<NationId> {
        if self.nation_a_id == nation {
            Some(self.nation_b_id)
        } else if self.nation_b_id == nation {
            Some(self.nation_a_id)
        } else {
            None
        }
    }
}

/// Payload for explicitly creating a relation. Order of the ids does not
/// matter; the store normalizes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct NewRelation {
    /// One side of the pair.
    pub nation_a_id: NationId,
    /// The other side of the pair.
    pub nation_b_id: NationId,
    /// Initial status.
    #[serde(default)]
    pub status: RelationStatus,
    /// Initial score, -100..=100.
    #[serde(default)]
    #[validate(range(min = -100, max = 100))]
    pub relationship_score: i32,
}

/// Partial relation update. Only `Some` fields are written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Validate, TS)]
#[ts(export, export_to = "bindings/")]
pub struct RelationPatch {
    /// New status.
    pub status: Option<RelationStatus>,
    /// New score, -100..=100.
    #[validate(range(min = -100, max = 100))]
    pub relationship_score: Option<i32>,
}
