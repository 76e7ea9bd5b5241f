//! Action resolution: turn an [`ActionKind`] into a plan of state changes.
//!
//! Resolution is pure. [`resolve`] checks every precondition against the
//! nations it is handed and returns an [`ActionPlan`] describing the
//! resource change, the event to append and the relation to upsert. The
//! database layer applies a plan inside a single transaction, so either
//! every effect lands or none does.
//!
//! | Action | Preconditions | Effects |
//! |--------|---------------|---------|
//! | `attack` | target exists, attacker has >= 20 troops | event (importance 8), relation -> war / -50 |
//! | `alliance` | target exists | event (importance 6), relation -> allied / 60 |
//! | `recruit` | amount >= 1, gold >= amount * 10 | gold -= cost, troops += amount, event (importance 4) |

use nationmind_types::{
    ActionKind, Nation, NationId, NewEvent, RelationPatch, RelationStatus, TurnId,
};
use serde_json::{Map, Value, json};
use validator::Validate;

use crate::error::GameError;
use crate::relation::canonical_pair;

/// Minimum troops a nation needs to launch an attack.
pub const ATTACK_MIN_TROOPS: i64 = 20;

/// Gold cost of one recruited troop.
pub const TROOP_COST: i64 = 10;

/// Troops recruited when the request does not say how many.
pub const DEFAULT_RECRUIT_AMOUNT: i64 = 10;

/// Relation score written when an attack starts a war.
pub const WAR_SCORE: i32 = -50;

/// Relation score written when an alliance is formed.
pub const ALLIANCE_SCORE: i32 = 60;

const ATTACK_IMPORTANCE: i32 = 8;
const ALLIANCE_IMPORTANCE: i32 = 6;
const RECRUIT_IMPORTANCE: i32 = 4;

/// Signed change to a nation's counters. Applied with a floor of zero.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ResourceDelta {
    /// Gold to add (negative to spend).
    pub gold: i64,
    /// Troops to add (negative to lose).
    pub troops: i64,
}

/// A relation upsert produced by an action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelationChange {
    /// The pair, already in storage order.
    pub pair: (NationId, NationId),
    /// Fields to overwrite.
    pub patch: RelationPatch,
}

/// Every effect of one resolved action.
#[derive(Debug, Clone, PartialEq)]
pub struct ActionPlan {
    /// The resolved action.
    pub kind: ActionKind,
    /// The acting nation.
    pub actor: NationId,
    /// Counter change for the actor, if any.
    pub resources: Option<ResourceDelta>,
    /// Event to append to the game log.
    pub event: NewEvent,
    /// Relation upsert, if any.
    pub relation: Option<RelationChange>,
    /// Message reported back to the caller.
    pub message: String,
}

/// Parse and gate an action name.
///
/// # Errors
///
/// Returns [`GameError::BusinessRule`] if the name is unknown or names an
/// action that has no resolver yet.
pub fn parse_kind(raw: &str) -> Result<ActionKind, GameError> {
    let kind = raw.parse::<ActionKind>().map_err(|e| {
        GameError::BusinessRule(format!("action type '{}' not recognized", e.value))
    })?;
    if !kind.is_implemented() {
        return Err(GameError::BusinessRule(format!(
            "action type '{kind}' is not implemented yet"
        )));
    }
    Ok(kind)
}

/// Whether the action needs a target nation.
pub const fn needs_target(kind: ActionKind) -> bool {
    matches!(
        kind,
        ActionKind::Attack | ActionKind::Alliance | ActionKind::Trade | ActionKind::MoveTroops
    )
}

/// Resolve an action into a plan.
///
/// `target` is the nation named by the request, or `None` if the request
/// named none or it does not exist. `turn` is the current turn, to which
/// the event is attached.
///
/// # Errors
///
/// - [`GameError::BusinessRule`] when a game rule rejects the action.
/// - [`GameError::Validation`] when the actor targets itself or the
///   generated event would be malformed.
pub fn resolve(
    kind: ActionKind,
    turn: TurnId,
    actor: &Nation,
    target: Option<&Nation>,
    data: &Map<String, Value>,
) -> Result<ActionPlan, GameError> {
    let plan = match kind {
        ActionKind::Attack => attack(turn, actor, require_target(target)?)?,
        ActionKind::Alliance => alliance(turn, actor, require_target(target)?)?,
        ActionKind::Recruit => recruit(turn, actor, recruit_amount(data)?)?,
        ActionKind::Trade | ActionKind::MoveTroops | ActionKind::Build => {
            return Err(GameError::BusinessRule(format!(
                "action type '{kind}' is not implemented yet"
            )));
        }
    };
    plan.event.validate()?;
    Ok(plan)
}

/// Read the recruit amount from the action data.
///
/// # Errors
///
/// Returns [`GameError::BusinessRule`] if `amount` is present but not a
/// positive integer.
pub fn recruit_amount(data: &Map<String, Value>) -> Result<i64, GameError> {
    let amount = match data.get("amount") {
        None | Some(Value::Null) => DEFAULT_RECRUIT_AMOUNT,
        Some(value) => value.as_i64().ok_or_else(|| {
            GameError::BusinessRule(format!("recruit amount must be an integer, got {value}"))
        })?,
    };
    if amount < 1 {
        return Err(GameError::BusinessRule(format!(
            "recruit amount must be positive, got {amount}"
        )));
    }
    Ok(amount)
}

fn require_target(target: Option<&Nation>) -> Result<&Nation, GameError> {
    target.ok_or_else(|| GameError::BusinessRule(String::from("target nation not found")))
}

fn attack(turn: TurnId, attacker: &Nation, defender: &Nation) -> Result<ActionPlan, GameError> {
    let pair = canonical_pair(attacker.id, defender.id)?;

    if attacker.troops < ATTACK_MIN_TROOPS {
        return Err(GameError::BusinessRule(format!(
            "not enough troops: {} has {}, attacking requires {ATTACK_MIN_TROOPS}",
            attacker.name, attacker.troops
        )));
    }

    Ok(ActionPlan {
        kind: ActionKind::Attack,
        actor: attacker.id,
        resources: None,
        event: NewEvent {
            turn_id: turn,
            nation_id: attacker.id,
            event_type: ActionKind::Attack.as_str().to_owned(),
            description: format!("{} attacked {}", attacker.name, defender.name),
            data: json!({ "defender_id": defender.id }),
            importance: ATTACK_IMPORTANCE,
        },
        relation: Some(RelationChange {
            pair,
            patch: RelationPatch {
                status: Some(RelationStatus::War),
                relationship_score: Some(WAR_SCORE),
            },
        }),
        message: format!("You attacked {}", defender.name),
    })
}

fn alliance(turn: TurnId, nation: &Nation, target: &Nation) -> Result<ActionPlan, GameError> {
    let pair = canonical_pair(nation.id, target.id)?;

    Ok(ActionPlan {
        kind: ActionKind::Alliance,
        actor: nation.id,
        resources: None,
        event: NewEvent {
            turn_id: turn,
            nation_id: nation.id,
            event_type: ActionKind::Alliance.as_str().to_owned(),
            description: format!("{} proposed an alliance to {}", nation.name, target.name),
            data: json!({ "target_id": target.id }),
            importance: ALLIANCE_IMPORTANCE,
        },
        relation: Some(RelationChange {
            pair,
            patch: RelationPatch {
                status: Some(RelationStatus::Allied),
                relationship_score: Some(ALLIANCE_SCORE),
            },
        }),
        message: format!("Alliance formed with {}", target.name),
    })
}

fn recruit(turn: TurnId, nation: &Nation, amount: i64) -> Result<ActionPlan, GameError> {
    let cost = amount
        .checked_mul(TROOP_COST)
        .ok_or_else(|| GameError::BusinessRule(format!("cannot recruit {amount} troops")))?;

    if nation.gold < cost {
        return Err(GameError::BusinessRule(format!(
            "not enough gold: recruiting {amount} troops costs {cost}, {} has {}",
            nation.name, nation.gold
        )));
    }

    let spend = cost
        .checked_neg()
        .ok_or_else(|| GameError::BusinessRule(format!("cannot recruit {amount} troops")))?;

    Ok(ActionPlan {
        kind: ActionKind::Recruit,
        actor: nation.id,
        resources: Some(ResourceDelta {
            gold: spend,
            troops: amount,
        }),
        event: NewEvent {
            turn_id: turn,
            nation_id: nation.id,
            event_type: ActionKind::Recruit.as_str().to_owned(),
            description: format!("{} recruited {amount} troops", nation.name),
            data: json!({ "amount": amount, "cost": cost }),
            importance: RECRUIT_IMPORTANCE,
        },
        relation: None,
        message: format!("Recruited {amount} troops for {cost} gold"),
    })
}
