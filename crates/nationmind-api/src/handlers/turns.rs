//! Turn endpoints. Turns are read-only over HTTP; they are created by the
//! game endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use nationmind_core::GameError;
use nationmind_db::TurnStore;
use nationmind_types::{Turn, TurnId};

use crate::error::ApiError;
use crate::extract::{ApiPath, ApiQuery};
use crate::handlers::Pagination;
use crate::state::AppState;

/// List turns, newest first.
pub async fn list_turns(
    State(state): State<Arc<AppState>>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<Turn>>, ApiError> {
    let (skip, limit) = page.checked()?;
    let mut conn = state.db.acquire().await?;
    Ok(Json(TurnStore::new(&mut conn).list(skip, limit).await?))
}

/// The turn with the highest number.
pub async fn current_turn(State(state): State<Arc<AppState>>) -> Result<Json<Turn>, ApiError> {
    let mut conn = state.db.acquire().await?;
    TurnStore::new(&mut conn)
        .current()
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(String::from("No turn exists yet")))
}

/// A single turn by id.
pub async fn get_turn(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<TurnId>,
) -> Result<Json<Turn>, ApiError> {
    let mut conn = state.db.acquire().await?;
    TurnStore::new(&mut conn)
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| GameError::not_found("Turn", id).into())
}

/// A single turn by its sequential number.
pub async fn get_turn_by_number(
    State(state): State<Arc<AppState>>,
    ApiPath(turn_number): ApiPath<i32>,
) -> Result<Json<Turn>, ApiError> {
    let mut conn = state.db.acquire().await?;
    TurnStore::new(&mut conn)
        .get_by_number(turn_number)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Turn number {turn_number} not found")))
}
