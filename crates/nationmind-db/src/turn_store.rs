//! Turn store operations.
//!
//! Turns are immutable once written. The "current" turn is the row with the
//! highest `turn_number`. New turns are only created through
//! [`TurnStore::advance`], which must run inside a transaction.

use chrono::{DateTime, Utc};
use nationmind_core::turn::{next_turn_number, snapshot, validate_summary};
use nationmind_types::{Nation, Relation, Turn, TurnId};
use sqlx::PgConnection;

use crate::error::DbError;
use crate::game_persist::PersistError;

/// Advisory lock key serializing turn advances across connections.
const ADVANCE_LOCK_KEY: i64 = 0x6e6d_7475_726e;

const TURN_COLUMNS: &str = "id, turn_number, world_state, created_at, summary";

/// Operations on the `turns` table.
pub struct TurnStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> TurnStore<'c> {
    /// Create a store bound to a connection or open transaction.
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Fetch a turn by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&mut self, id: TurnId) -> Result<Option<Turn>, DbError> {
        let row = sqlx::query_as::<_, TurnRow>(&format!(
            "SELECT {TURN_COLUMNS} FROM turns WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(row.map(Turn::from))
    }

    /// Fetch a turn by its sequential number.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get_by_number(&mut self, turn_number: i32) -> Result<Option<Turn>, DbError> {
        let row = sqlx::query_as::<_, TurnRow>(&format!(
            "SELECT {TURN_COLUMNS} FROM turns WHERE turn_number = $1"
        ))
        .bind(turn_number)
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(row.map(Turn::from))
    }

    /// The turn with the highest number, if any.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn current(&mut self) -> Result<Option<Turn>, DbError> {
        let row = sqlx::query_as::<_, TurnRow>(&format!(
            "SELECT {TURN_COLUMNS} FROM turns ORDER BY turn_number DESC LIMIT 1"
        ))
        .fetch_optional(&mut *self.conn)
        .await?;
        Ok(row.map(Turn::from))
    }

    /// The highest turn number, or 0 before the first turn.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn current_number(&mut self) -> Result<i32, DbError> {
        let number: Option<i32> = sqlx::query_scalar("SELECT MAX(turn_number) FROM turns")
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(number.unwrap_or(0))
    }

    /// List turns, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list(&mut self, skip: i64, limit: i64) -> Result<Vec<Turn>, DbError> {
        let rows = sqlx::query_as::<_, TurnRow>(&format!(
            r"SELECT {TURN_COLUMNS} FROM turns
              ORDER BY turn_number DESC
              OFFSET $1 LIMIT $2"
        ))
        .bind(skip)
        .bind(limit)
        .fetch_all(&mut *self.conn)
        .await?;
        Ok(rows.into_iter().map(Turn::from).collect())
    }

    /// Create the next turn, numbered one past the current one, carrying a
    /// snapshot of `nations` and `relations`.
    ///
    /// Takes a transaction-scoped advisory lock before reading the current
    /// number, so two advances never compute the same number. Call this on
    /// a connection inside an open transaction; on a bare connection the
    /// lock is released as soon as the statement ends.
    ///
    /// # Errors
    ///
    /// - [`PersistError::Game`] if the summary is too long or the counter
    ///   is exhausted.
    /// - [`PersistError::Db`] if a query fails or a racing insert hit the
    ///   unique turn number.
    pub async fn advance(
        &mut self,
        nations: &[Nation],
        relations: &[Relation],
        summary: Option<&str>,
    ) -> Result<Turn, PersistError> {
        validate_summary(summary)?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ADVANCE_LOCK_KEY)
            .execute(&mut *self.conn)
            .await
            .map_err(DbError::from)?;

        let current = self.current_number().await?;
        let turn_number = next_turn_number((current > 0).then_some(current))?;

        let world_state = serde_json::to_value(snapshot(turn_number, nations, relations))
            .map_err(DbError::Serialization)?;

        let row = sqlx::query_as::<_, TurnRow>(&format!(
            r"INSERT INTO turns (turn_number, world_state, summary)
              VALUES ($1, $2, $3)
              RETURNING {TURN_COLUMNS}"
        ))
        .bind(turn_number)
        .bind(&world_state)
        .bind(summary)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| {
            DbError::from(e).on_duplicate(|| format!("turn {turn_number} already exists"))
        })?;

        tracing::debug!(turn_id = row.id, turn_number, "Created turn");
        Ok(Turn::from(row))
    }
}

/// A row from the `turns` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TurnRow {
    /// Row id.
    pub id: i64,
    /// Sequential number.
    pub turn_number: i32,
    /// Frozen [`WorldState`](nationmind_types::WorldState) as JSON.
    pub world_state: serde_json::Value,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Optional narrative.
    pub summary: Option<String>,
}

impl From<TurnRow> for Turn {
    fn from(row: TurnRow) -> Self {
        Self {
            id: TurnId(row.id),
            turn_number: row.turn_number,
            world_state: row.world_state,
            created_at: row.created_at,
            summary: row.summary,
        }
    }
}
