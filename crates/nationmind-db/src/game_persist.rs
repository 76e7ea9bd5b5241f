//! Game-level operations that span several tables.
//!
//! Each function opens one transaction, loads what the game rules in
//! `nationmind-core` need, applies the resulting plan through the stores and
//! commits. If any step fails the transaction is dropped and rolls back, so
//! a caller never observes half of an action.
//!
//! ```text
//! initialize_game()  --> 5 nations + 10 neutral relations + turn 1
//! apply_action()     --> resource delta + event + relation upsert
//! advance_turn()     --> snapshot of active nations / relations as turn N+1
//! load_game_state()  --> read-only view
//! ```

use nationmind_core::actions::{self, ActionPlan};
use nationmind_core::game::{self, STATE_RECENT_EVENTS};
use nationmind_core::relation::all_pairs;
use nationmind_core::turn::{ADVANCE_SUMMARY, INITIAL_SUMMARY};
use nationmind_core::GameError;
use nationmind_types::{
    ActionRequest, GameState, Nation, NationId, NewRelation, Relation, RelationStatus, Turn,
};

use crate::error::DbError;
use crate::event_store::EventStore;
use crate::nation_store::NationStore;
use crate::postgres::PostgresPool;
use crate::relation_store::RelationStore;
use crate::turn_store::TurnStore;

// =========================================================================
// Error type
// =========================================================================

/// Errors from operations that combine game rules with persistence.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// A game rule rejected the operation. Nothing was written.
    #[error(transparent)]
    Game(#[from] GameError),

    /// The database failed or rejected a write.
    #[error(transparent)]
    Db(#[from] DbError),
}

const NO_TURN: &str = "no turn exists yet; initialize the game first";

/// What [`initialize_game`] created.
#[derive(Debug, Clone)]
pub struct InitializedGame {
    /// The starting nations, player first.
    pub nations: Vec<Nation>,
    /// Turn 1.
    pub turn: Turn,
    /// One neutral relation per pair of starting nations.
    pub relations: Vec<Relation>,
}

/// Create the starting nations, their relations and turn 1.
///
/// # Errors
///
/// - [`PersistError::Game`] with [`GameError::Conflict`] if any nation
///   already exists.
/// - [`PersistError::Db`] if a write fails.
pub async fn initialize_game(pool: &PostgresPool) -> Result<InitializedGame, PersistError> {
    let mut tx = pool.begin().await?;

    let existing = NationStore::new(&mut tx).count().await?;
    game::ensure_not_initialized(existing)?;

    let mut nations = Vec::new();
    for new_nation in game::starting_nations() {
        nations.push(NationStore::new(&mut tx).create(&new_nation).await?);
    }

    let ids: Vec<NationId> = nations.iter().map(|n| n.id).collect();
    let mut relations = Vec::new();
    for (a, b) in all_pairs(&ids) {
        let relation = NewRelation {
            nation_a_id: a,
            nation_b_id: b,
            status: RelationStatus::Neutral,
            relationship_score: 0,
        };
        relations.push(RelationStore::new(&mut tx).create(&relation).await?);
    }

    let turn = TurnStore::new(&mut tx)
        .advance(&nations, &relations, Some(INITIAL_SUMMARY))
        .await?;

    tx.commit().await.map_err(DbError::from)?;

    tracing::info!(
        nations = nations.len(),
        relations = relations.len(),
        turn_number = turn.turn_number,
        "Game initialized"
    );

    Ok(InitializedGame {
        nations,
        turn,
        relations,
    })
}

/// Resolve and apply one action for `nation_id`.
///
/// The action name is checked before any query runs. Everything the plan
/// writes commits together.
///
/// # Errors
///
/// - [`PersistError::Game`] with [`GameError::BusinessRule`] for an unknown
///   or unimplemented action, or a rule the action breaks.
/// - [`PersistError::Game`] with [`GameError::NotFound`] if the actor does
///   not exist.
/// - [`PersistError::Game`] with [`GameError::Conflict`] if no turn exists.
/// - [`PersistError::Game`] with [`GameError::Validation`] if the actor
///   targets itself.
/// - [`PersistError::Db`] if a query fails.
pub async fn apply_action(
    pool: &PostgresPool,
    nation_id: NationId,
    request: &ActionRequest,
) -> Result<ActionPlan, PersistError> {
    let kind = actions::parse_kind(&request.action_type)?;

    let mut tx = pool.begin().await?;

    let actor = NationStore::new(&mut tx)
        .get(nation_id)
        .await?
        .ok_or_else(|| GameError::not_found("Nation", nation_id))?;

    let turn = TurnStore::new(&mut tx)
        .current()
        .await?
        .ok_or_else(|| GameError::Conflict(NO_TURN.to_owned()))?;

    let target = match request.target_nation_id {
        Some(target_id) if actions::needs_target(kind) => {
            NationStore::new(&mut tx).get(target_id).await?
        }
        _ => None,
    };

    let plan = actions::resolve(kind, turn.id, &actor, target.as_ref(), &request.data)?;

    if let Some(delta) = plan.resources {
        NationStore::new(&mut tx)
            .adjust_resources(plan.actor, delta.gold, delta.troops)
            .await?;
    }

    EventStore::new(&mut tx).create(&plan.event).await?;

    if let Some(change) = plan.relation {
        let (a, b) = change.pair;
        RelationStore::new(&mut tx).upsert(a, b, change.patch).await?;
    }

    tx.commit().await.map_err(DbError::from)?;

    tracing::info!(
        nation_id = %plan.actor,
        action = %plan.kind,
        target_id = ?request.target_nation_id,
        turn_number = turn.turn_number,
        "Action resolved"
    );

    Ok(plan)
}

/// Snapshot the active nations and relations into the next turn.
///
/// # Errors
///
/// - [`PersistError::Game`] with [`GameError::Conflict`] if the game has
///   not been initialized.
/// - [`PersistError::Db`] if a query fails.
pub async fn advance_turn(pool: &PostgresPool) -> Result<Turn, PersistError> {
    let mut tx = pool.begin().await?;

    if TurnStore::new(&mut tx).current().await?.is_none() {
        return Err(GameError::Conflict(NO_TURN.to_owned()).into());
    }

    let nations = NationStore::new(&mut tx).list_active().await?;
    let relations = RelationStore::new(&mut tx).list_all().await?;
    let turn = TurnStore::new(&mut tx)
        .advance(&nations, &relations, Some(ADVANCE_SUMMARY))
        .await?;

    tx.commit().await.map_err(DbError::from)?;

    tracing::info!(
        turn_id = %turn.id,
        turn_number = turn.turn_number,
        nations = nations.len(),
        "Turn advanced"
    );

    Ok(turn)
}

/// Assemble the game state view.
///
/// # Errors
///
/// Returns [`DbError`] if a query fails.
pub async fn load_game_state(pool: &PostgresPool) -> Result<GameState, DbError> {
    let mut conn = pool.acquire().await?;

    let current = TurnStore::new(&mut conn).current_number().await?;
    let nations = NationStore::new(&mut conn).list_active().await?;
    let events = EventStore::new(&mut conn).list_recent(STATE_RECENT_EVENTS).await?;

    Ok(game::game_state(
        (current > 0).then_some(current),
        &nations,
        &events,
    ))
}
