//! Game-level endpoints: initialization, state, actions and turn advance.
//!
//! Each write endpoint delegates to one transactional operation in
//! `nationmind_db::game_persist`.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use nationmind_db::game_persist;
use nationmind_types::{ActionRequest, GameState, NationId};
use serde::Deserialize;
use serde_json::json;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::handlers::MessageResponse;
use crate::state::AppState;

/// Query parameters for `POST /api/game/action`.
#[derive(Debug, Deserialize)]
pub struct ActionQuery {
    /// The acting nation.
    pub nation_id: NationId,
}

/// Create the starting nations, their relations and turn 1.
pub async fn initialize(
    State(state): State<Arc<AppState>>,
) -> Result<Json<MessageResponse>, ApiError> {
    let game = game_persist::initialize_game(&state.db).await?;
    Ok(MessageResponse::ok(
        "Game initialized",
        json!({
            "nations": game.nations.len(),
            "turn_number": game.turn.turn_number,
            "relations": game.relations.len(),
        }),
    ))
}

/// Current turn, active nations, recent events and the game-over flag.
pub async fn game_state(State(state): State<Arc<AppState>>) -> Result<Json<GameState>, ApiError> {
    Ok(Json(game_persist::load_game_state(&state.db).await?))
}

/// Resolve one action for the nation in the query string.
///
/// The whole effect set (resources, event, relation) commits together.
///
/// # Errors
///
/// - [`ApiError::BusinessRule`] for an unknown or unimplemented action,
///   a missing target, or too few troops or gold.
/// - [`ApiError::NotFound`] if the acting nation does not exist.
/// - [`ApiError::Conflict`] (400) if the game has not been initialized.
pub async fn perform_action(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ActionQuery>,
    ApiJson(request): ApiJson<ActionRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let plan = game_persist::apply_action(&state.db, query.nation_id, &request).await?;
    Ok(MessageResponse::ok(
        plan.message,
        json!({
            "action_type": plan.kind.to_string(),
            "nation_id": plan.actor,
            "target_nation_id": request.target_nation_id,
        }),
    ))
}

/// Snapshot the world into the next turn.
///
/// # Errors
///
/// Returns [`ApiError::Conflict`] (400) if the game has not been
/// initialized.
pub async fn next_turn(State(state): State<Arc<AppState>>) -> Result<Json<MessageResponse>, ApiError> {
    let turn = game_persist::advance_turn(&state.db).await?;
    Ok(MessageResponse::ok(
        format!("Turn {} started", turn.turn_number),
        json!({ "turn_number": turn.turn_number }),
    ))
}
