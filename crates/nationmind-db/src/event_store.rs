//! Event store operations.
//!
//! Events are the game log. They are append-only: there is no update or
//! delete. `importance` and `created_at` are the only ranking keys.

use chrono::{DateTime, Utc};
use nationmind_types::{Event, EventId, NationId, NewEvent, TurnId};
use sqlx::PgConnection;

use crate::error::DbError;

/// Default limit for [`EventStore::list_recent`].
pub const DEFAULT_RECENT_LIMIT: i64 = 20;

/// Default threshold for [`EventStore::list_important`].
pub const DEFAULT_MIN_IMPORTANCE: i32 = 7;

/// Default limit for [`EventStore::list_important`].
pub const DEFAULT_IMPORTANT_LIMIT: i64 = 30;

/// Default limit for per-nation and per-type listings.
pub const DEFAULT_FILTER_LIMIT: i64 = 50;

const EVENT_COLUMNS: &str =
    "id, turn_id, nation_id, event_type, description, data, importance, created_at";

/// Operations on the `events` table.
pub struct EventStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> EventStore<'c> {
    /// Create a store bound to a connection or open transaction.
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Append an event.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::ForeignKeyViolation`] if the turn or nation does
    /// not exist.
    pub async fn create(&mut self, event: &NewEvent) -> Result<Event, DbError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            r"INSERT INTO events (turn_id, nation_id, event_type, description, data, importance)
              VALUES ($1, $2, $3, $4, $5, $6)
              RETURNING {EVENT_COLUMNS}"
        ))
        .bind(event.turn_id.into_inner())
        .bind(event.nation_id.into_inner())
        .bind(&event.event_type)
        .bind(&event.description)
        .bind(&event.data)
        .bind(event.importance)
        .fetch_one(&mut *self.conn)
        .await?;

        tracing::debug!(
            event_id = row.id,
            turn_id = row.turn_id,
            nation_id = row.nation_id,
            event_type = %row.event_type,
            importance = row.importance,
            "Appended event"
        );
        Ok(Event::from(row))
    }

    /// Fetch an event by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&mut self, id: EventId) -> Result<Option<Event>, DbError> {
        let row = sqlx::query_as::<_, EventRow>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(row.map(Event::from))
    }

    /// List events, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list(&mut self, skip: i64, limit: i64) -> Result<Vec<Event>, DbError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r"SELECT {EVENT_COLUMNS} FROM events
              ORDER BY created_at DESC, id DESC
              OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    /// The newest `limit` events.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_recent(&mut self, limit: i64) -> Result<Vec<Event>, DbError> {
        self.list(0, limit).await
    }

    /// Events at or above `min_importance`, most important first, then
    /// newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_important(
        &mut self,
        min_importance: i32,
        limit: i64,
    ) -> Result<Vec<Event>, DbError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r"SELECT {EVENT_COLUMNS} FROM events
              WHERE importance >= $1
              ORDER BY importance DESC, created_at DESC, id DESC
              LIMIT $2"
        ))
        .bind(min_importance)
        .bind(limit)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    /// Every event of a turn, in the order they happened.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_by_turn(&mut self, turn_id: TurnId) -> Result<Vec<Event>, DbError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r"SELECT {EVENT_COLUMNS} FROM events
              WHERE turn_id = $1
              ORDER BY created_at, id"
        ))
        .bind(turn_id.into_inner())
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    /// Events whose actor is `nation_id`, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_by_nation(
        &mut self,
        nation_id: NationId,
        limit: i64,
    ) -> Result<Vec<Event>, DbError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r"SELECT {EVENT_COLUMNS} FROM events
              WHERE nation_id = $1
              ORDER BY created_at DESC, id DESC
              LIMIT $2"
        ))
        .bind(nation_id.into_inner())
        .bind(limit)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }

    /// Events of one type, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_by_type(
        &mut self,
        event_type: &str,
        limit: i64,
    ) -> Result<Vec<Event>, DbError> {
        let rows = sqlx::query_as::<_, EventRow>(&format!(
            r"SELECT {EVENT_COLUMNS} FROM events
              WHERE event_type = $1
              ORDER BY created_at DESC, id DESC
              LIMIT $2"
        ))
        .bind(event_type)
        .bind(limit)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(rows.into_iter().map(Event::from).collect())
    }
}

/// A row from the `events` table.
///
/// Uses runtime types rather than compile-time checked types to
/// avoid requiring a live database during builds.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct EventRow {
    /// Auto-incremented event id.
    pub id: i64,
    /// Turn the event belongs to.
    pub turn_id: i64,
    /// Acting nation.
    pub nation_id: i64,
    /// Short category.
    pub event_type: String,
    /// Human-readable description.
    pub description: String,
    /// Structured payload.
    pub data: serde_json::Value,
    /// Ranking weight, 1-10.
    pub importance: i32,
    /// Insert timestamp.
    pub created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: EventId(row.id),
            turn_id: TurnId(row.turn_id),
            nation_id: NationId(row.nation_id),
            event_type: row.event_type,
            description: row.description,
            data: row.data,
            importance: row.importance,
            created_at: row.created_at,
        }
    }
}
