//! Nation endpoints.
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | `GET` | `/api/nations` | List (`skip`, `limit`, `active_only`) |
//! | `GET` | `/api/nations/summary` | Active nations, summary view |
//! | `GET` | `/api/nations/player` | The player's nation |
//! | `GET` | `/api/nations/ai` | Active AI nations |
//! | `GET` | `/api/nations/{id}` | Single nation |
//! | `POST` | `/api/nations` | Create |
//! | `PUT` | `/api/nations/{id}` | Partial update |
//! | `DELETE` | `/api/nations/{id}` | Soft delete |
//! | `PATCH` | `/api/nations/{id}/resources` | Add gold / troop deltas |

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use nationmind_core::GameError;
use nationmind_core::game::validate_resource_delta;
use nationmind_db::NationStore;
use nationmind_types::{Nation, NationId, NationPatch, NationSummary, NewNation};
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::handlers::Pagination;
use crate::state::AppState;

/// Query parameters for `GET /api/nations`.
#[derive(Debug, Deserialize)]
pub struct NationsQuery {
    /// Rows to skip.
    #[serde(default)]
    pub skip: i64,
    /// Rows to return (default 100).
    #[serde(default = "super::default_page_size")]
    pub limit: i64,
    /// Hide deactivated nations (default `true`).
    #[serde(default = "default_true")]
    pub active_only: bool,
}

const fn default_true() -> bool {
    true
}

/// Query parameters for `PATCH /api/nations/{id}/resources`.
#[derive(Debug, Deserialize)]
pub struct ResourcesQuery {
    /// Gold to add (negative to spend).
    #[serde(default)]
    pub gold_change: i64,
    /// Troops to add (negative to lose).
    #[serde(default)]
    pub troops_change: i64,
}

/// List nations in insertion order.
///
/// # Query Parameters
///
/// - `skip`: Rows to skip (default 0).
/// - `limit`: Maximum rows to return (default 100, max 1000).
/// - `active_only`: Hide deactivated nations (default `true`).
pub async fn list_nations(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<NationsQuery>,
) -> Result<Json<Vec<Nation>>, ApiError> {
    let (skip, limit) = Pagination {
        skip: params.skip,
        limit: params.limit,
    }
    .checked()?;
    let mut conn = state.db.acquire().await?;
    let nations = NationStore::new(&mut conn)
        .list(skip, limit, params.active_only)
        .await?;
    Ok(Json(nations))
}

/// Summary view of every active nation.
pub async fn nations_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<NationSummary>>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let nations = NationStore::new(&mut conn).list_active().await?;
    Ok(Json(nations.iter().map(Nation::summary).collect()))
}

/// The first active nation not driven by the AI.
pub async fn player_nation(State(state): State<Arc<AppState>>) -> Result<Json<Nation>, ApiError> {
    let mut conn = state.db.acquire().await?;
    NationStore::new(&mut conn)
        .player()
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(String::from("No player nation")))
}

/// Active AI-controlled nations.
pub async fn ai_nations(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Nation>>, ApiError> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(NationStore::new(&mut conn).list_ai().await?))
}

/// A single nation, active or not.
pub async fn get_nation(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<NationId>,
) -> Result<Json<Nation>, ApiError> {
    let mut conn = state.db.acquire().await?;
    NationStore::new(&mut conn)
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| GameError::not_found("Nation", id).into())
}

/// Create a nation. Replies `201 Created`.
///
/// # Errors
///
/// - [`ApiError::Validation`] if a field breaks its constraint.
/// - [`ApiError::Conflict`] (400) if the name is already taken, including
///   by a deactivated nation.
pub async fn create_nation(
    State(state): State<Arc<AppState>>,
    ApiJson(new_nation): ApiJson<NewNation>,
) -> Result<(StatusCode, Json<Nation>), ApiError> {
    new_nation.validate()?;
    let mut conn = state.db.acquire().await?;
    let nation = NationStore::new(&mut conn).create(&new_nation).await?;
    tracing::info!(nation_id = %nation.id, name = %nation.name, "Nation created");
    Ok((StatusCode::CREATED, Json(nation)))
}

/// Overwrite the fields present in the body.
pub async fn update_nation(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<NationId>,
    ApiJson(patch): ApiJson<NationPatch>,
) -> Result<Json<Nation>, ApiError> {
    patch.validate()?;
    let mut conn = state.db.acquire().await?;
    NationStore::new(&mut conn)
        .update(id, &patch)
        .await?
        .map(Json)
        .ok_or_else(|| GameError::not_found("Nation", id).into())
}

/// Deactivate a nation. Replies `204 No Content`.
pub async fn delete_nation(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<NationId>,
) -> Result<StatusCode, ApiError> {
    let mut conn = state.db.acquire().await?;
    if NationStore::new(&mut conn).soft_delete(id).await? {
        tracing::info!(nation_id = %id, "Nation deactivated");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(GameError::not_found("Nation", id).into())
    }
}

/// Add gold and troop deltas, flooring both at zero.
///
/// # Query Parameters
///
/// - `gold_change`: Signed gold delta (default 0).
/// - `troops_change`: Signed troop delta (default 0).
///
/// # Errors
///
/// - [`ApiError::Validation`] if a delta is larger than
///   [`MAX_RESOURCE_DELTA`](nationmind_core::game::MAX_RESOURCE_DELTA)
///   or the sum overflows the stored counter.
/// - [`ApiError::NotFound`] if the nation does not exist.
pub async fn adjust_resources(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<NationId>,
    ApiQuery(params): ApiQuery<ResourcesQuery>,
) -> Result<Json<Nation>, ApiError> {
    validate_resource_delta(params.gold_change, params.troops_change)?;
    let mut conn = state.db.acquire().await?;
    NationStore::new(&mut conn)
        .adjust_resources(id, params.gold_change, params.troops_change)
        .await?
        .map(Json)
        .ok_or_else(|| GameError::not_found("Nation", id).into())
}
