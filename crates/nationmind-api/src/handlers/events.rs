//! Event endpoints. The log is append-only, so there is no update or
//! delete route.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use nationmind_core::GameError;
use nationmind_db::event_store::{
    DEFAULT_FILTER_LIMIT, DEFAULT_IMPORTANT_LIMIT, DEFAULT_MIN_IMPORTANCE, DEFAULT_RECENT_LIMIT,
};
use nationmind_db::EventStore;
use nationmind_types::{Event, EventId, NationId, NewEvent, TurnId};
use serde::Deserialize;
use validator::Validate;

use crate::error::ApiError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::handlers::{LimitQuery, Pagination};
use crate::state::AppState;

/// Query parameters for `GET /api/events/important`.
#[derive(Debug, Deserialize)]
pub struct ImportantQuery {
    /// Lowest importance included (default 7).
    pub min_importance: Option<i32>,
    /// Rows to return (default 30).
    pub limit: Option<i64>,
}

/// List events, newest first.
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    ApiQuery(page): ApiQuery<Pagination>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let (skip, limit) = page.checked()?;
    let mut conn = state.db.acquire().await?;
    Ok(Json(EventStore::new(&mut conn).list(skip, limit).await?))
}

/// The newest events (default 20).
pub async fn recent_events(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let limit = query.or(DEFAULT_RECENT_LIMIT)?;
    let mut conn = state.db.acquire().await?;
    Ok(Json(EventStore::new(&mut conn).list_recent(limit).await?))
}

/// Events at or above an importance threshold, most important first.
///
/// # Query Parameters
///
/// - `min_importance`: Lowest importance included (default 7).
/// - `limit`: Maximum events to return (default 30, max 1000).
pub async fn important_events(
    State(state): State<Arc<AppState>>,
    ApiQuery(query): ApiQuery<ImportantQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let min_importance = query.min_importance.unwrap_or(DEFAULT_MIN_IMPORTANCE);
    let limit = LimitQuery { limit: query.limit }.or(DEFAULT_IMPORTANT_LIMIT)?;
    let mut conn = state.db.acquire().await?;
    Ok(Json(
        EventStore::new(&mut conn)
            .list_important(min_importance, limit)
            .await?,
    ))
}

/// Every event of one turn, oldest first.
pub async fn events_by_turn(
    State(state): State<Arc<AppState>>,
    ApiPath(turn_id): ApiPath<TurnId>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let mut conn = state.db.acquire().await?;
    Ok(Json(EventStore::new(&mut conn).list_by_turn(turn_id).await?))
}

/// Events whose actor is the given nation, newest first.
pub async fn events_by_nation(
    State(state): State<Arc<AppState>>,
    ApiPath(nation_id): ApiPath<NationId>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let limit = query.or(DEFAULT_FILTER_LIMIT)?;
    let mut conn = state.db.acquire().await?;
    Ok(Json(
        EventStore::new(&mut conn)
            .list_by_nation(nation_id, limit)
            .await?,
    ))
}

/// Events of one type, newest first.
pub async fn events_by_type(
    State(state): State<Arc<AppState>>,
    ApiPath(event_type): ApiPath<String>,
    ApiQuery(query): ApiQuery<LimitQuery>,
) -> Result<Json<Vec<Event>>, ApiError> {
    let limit = query.or(DEFAULT_FILTER_LIMIT)?;
    let mut conn = state.db.acquire().await?;
    Ok(Json(
        EventStore::new(&mut conn)
            .list_by_type(&event_type, limit)
            .await?,
    ))
}

/// A single event.
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<EventId>,
) -> Result<Json<Event>, ApiError> {
    let mut conn = state.db.acquire().await?;
    EventStore::new(&mut conn)
        .get(id)
        .await?
        .map(Json)
        .ok_or_else(|| GameError::not_found("Event", id).into())
}

/// Append an event to the log. Replies `201 Created`.
///
/// # Errors
///
/// - [`ApiError::Validation`] if the type, description or importance is
///   out of range.
/// - [`ApiError::NotFound`] if the turn or nation does not exist.
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    ApiJson(event): ApiJson<NewEvent>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    event.validate()?;
    let mut conn = state.db.acquire().await?;
    let created = EventStore::new(&mut conn).create(&event).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
