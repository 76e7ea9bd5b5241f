//! Relation endpoints.
//!
//! Pair lookups and writes accept the two nation ids in either order.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use nationmind_core::GameError;
use nationmind_core::relation::{canonical_pair, validate_patch};
use nationmind_db::RelationStore;
use nationmind_types::{NationId, NewRelation, Relation, RelationId, RelationPatch, RelationStatus};
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::state::AppState;

/// Query parameters for `POST /api/relations/update-or-create`.
#[derive(Debug, Deserialize)]
pub struct UpsertQuery {
    /// One side of the pair.
    pub nation_a_id: NationId,
    /// The other side of the pair.
    pub nation_b_id: NationId,
    /// New status, if changing.
    pub status: Option<RelationStatus>,
    /// New score, if changing.
    pub relationship_score: Option<i32>,
}

/// Every relation, in insertion order.
pub async fn list_relations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Relation>>, ApiError> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(RelationStore::new(&mut conn).list_all().await?))
}

/// A single relation by id.
pub async fn get_relation(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<RelationId>,
) -> Result<Json<Relation>, ApiError> {
    let mut conn = state.db.acquire().await?;
    RelationStore::new(&mut conn)
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| GameError::not_found("Relation", id).into())
}

/// Every relation involving a nation.
pub async fn nation_relations(
    State(state): State<Arc<AppState>>,
    ApiPath(nation_id): ApiPath<NationId>,
) -> Result<Json<Vec<Relation>>, ApiError> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(
        RelationStore::new(&mut conn)
            .list_for_nation(nation_id)
            .await?,
    ))
}

/// Allied relations of a nation.
pub async fn nation_allies(
    State(state): State<Arc<AppState>>,
    ApiPath(nation_id): ApiPath<NationId>,
) -> Result<Json<Vec<Relation>>, ApiError> {
    with_status(&state, nation_id, RelationStatus::Allied).await
}

/// Relations at war with a nation.
pub async fn nation_enemies(
    State(state): State<Arc<AppState>>,
    ApiPath(nation_id): ApiPath<NationId>,
) -> Result<Json<Vec<Relation>>, ApiError> {
    with_status(&state, nation_id, RelationStatus::War).await
}

async fn with_status(
    state: &AppState,
    nation_id: NationId,
    status: RelationStatus,
) -> Result<Json<Vec<Relation>>, ApiError> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(
        RelationStore::new(&mut conn)
            .list_for_nation_with_status(nation_id, status)
            .await?,
    ))
}

/// The relation between two nations. `/between/2/5` and `/between/5/2`
/// return the same row.
pub async fn relation_between(
    State(state): State<Arc<AppState>>,
    ApiPath((a, b)): ApiPath<(NationId, NationId)>,
) -> Result<Json<Relation>, ApiError> {
    let mut conn = state.db.acquire().await?;
    RelationStore::new(&mut conn)
        .find_between(a, b)
        .await?
        .map(Json)
        .ok_or_else(|| {
            ApiError::NotFound(format!("No relation between nations {a} and {b}"))
        })
}

/// Create a relation for a pair that has none. Replies `201 Created`.
///
/// # Errors
///
/// - [`ApiError::Validation`] if both ids are the same nation or the score
///   is outside -100..=100.
/// - [`ApiError::Conflict`] (400) if the pair already has a relation.
/// - [`ApiError::NotFound`] if either nation does not exist.
pub async fn create_relation(
    State(state): State<Arc<AppState>>,
    ApiJson(relation): ApiJson<NewRelation>,
) -> Result<(StatusCode, Json<Relation>), ApiError> {
    relation.validate()?;
    canonical_pair(relation.nation_a_id, relation.nation_b_id)?;
    let mut conn = state.db.acquire().await?;
    let created = RelationStore::new(&mut conn).create(&relation).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

/// Overwrite the fields present in the body.
pub async fn update_relation(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<RelationId>,
    ApiJson(patch): ApiJson<RelationPatch>,
) -> Result<Json<Relation>, ApiError> {
    validate_patch(&patch)?;
    let mut conn = state.db.acquire().await?;
    RelationStore::new(&mut conn)
        .update(id, patch)
        .await?
        .map(Json)
        .ok_or_else(|| GameError::not_found("Relation", id).into())
}

/// Create or update the relation for a pair. Repeating the call with the
/// same values leaves a single, unchanged row.
///
/// # Query Parameters
///
/// - `nation_a_id`, `nation_b_id`: The pair, in either order.
/// - `status`: New status, if changing.
/// - `relationship_score`: New score, if changing.
pub async fn upsert_relation(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<UpsertQuery>,
) -> Result<Json<Relation>, ApiError> {
    let patch = RelationPatch {
        status: query.status,
        relationship_score: query.relationship_score,
    };
    validate_patch(&patch)?;
    canonical_pair(query.nation_a_id, query.nation_b_id)?;
    let mut conn = state.db.acquire().await?;
    let relation = RelationStore::new(&mut conn)
        .upsert(query.nation_a_id, query.nation_b_id, patch)
        .await?;
    Ok(Json(relation))
}
