//! Relation store operations.
//!
//! One row per unordered pair, stored as `(min, max)`. Every lookup or write
//! that names a pair normalizes it with
//! [`canonical_pair`](nationmind_core::relation::canonical_pair) first, and
//! the table's unique and `CHECK (nation_a_id < nation_b_id)` constraints
//! back that up.

use nationmind_core::relation::{canonical_pair, merge, validate_patch};
use nationmind_types::{
    NationId, NewRelation, ParseEnumError, Relation, RelationId, RelationPatch, RelationStatus,
};
use sqlx::PgConnection;
use validator::Validate;

use crate::error::DbError;
use crate::game_persist::PersistError;

const RELATION_COLUMNS: &str = "id, nation_a_id, nation_b_id, status, relationship_score";

/// Operations on the `relations` table.
pub struct RelationStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> RelationStore<'c> {
    /// Create a store bound to a connection or open transaction.
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a relation for a pair that has none yet.
    ///
    /// # Errors
    ///
    /// - [`PersistError::Game`] if both ids are equal or the score is out
    ///   of range.
    /// - [`PersistError::Db`] wrapping [`DbError::UniqueViolation`] if the
    ///   pair already has a relation, or [`DbError::ForeignKeyViolation`]
    ///   if either nation does not exist.
    pub async fn create(&mut self, relation: &NewRelation) -> Result<Relation, PersistError> {
        relation.validate().map_err(nationmind_core::GameError::from)?;
        let (a, b) = canonical_pair(relation.nation_a_id, relation.nation_b_id)?;

        let row = sqlx::query_as::<_, RelationRow>(&format!(
            r"INSERT INTO relations (nation_a_id, nation_b_id, status, relationship_score)
              VALUES ($1, $2, $3, $4)
              RETURNING {RELATION_COLUMNS}"
        ))
        .bind(a.into_inner())
        .bind(b.into_inner())
        .bind(relation.status.as_str())
        .bind(relation.relationship_score)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| {
            DbError::from(e)
                .on_duplicate(|| format!("Relation between nations {a} and {b} already exists"))
        })?;

        tracing::debug!(
            relation_id = row.id,
            nation_a_id = row.nation_a_id,
            nation_b_id = row.nation_b_id,
            "Created relation"
        );
        Ok(Relation::try_from(row)?)
    }

    /// Fetch a relation by id.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&mut self, id: RelationId) -> Result<Option<Relation>, DbError> {
        sqlx::query_as::<_, RelationRow>(&format!(
            "SELECT {RELATION_COLUMNS} FROM relations WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?
        .map(Relation::try_from)
        .transpose()
    }

    /// Fetch the relation between two nations, in either argument order.
    ///
    /// # Errors
    ///
    /// - [`PersistError::Game`] if `a == b`.
    /// - [`PersistError::Db`] if the query fails.
    pub async fn find_between(
        &mut self,
        a: NationId,
        b: NationId,
    ) -> Result<Option<Relation>, PersistError> {
        let (lo, hi) = canonical_pair(a, b)?;
        let relation = sqlx::query_as::<_, RelationRow>(&format!(
            "SELECT {RELATION_COLUMNS} FROM relations WHERE nation_a_id = $1 AND nation_b_id = $2"
        ))
        .bind(lo.into_inner())
        .bind(hi.into_inner())
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(DbError::from)?
        .map(Relation::try_from)
        .transpose()?;
        Ok(relation)
    }

    /// Create or update the relation for a pair in one statement.
    ///
    /// An existing row keeps any field the patch omits. A new row fills
    /// omitted fields with `neutral` / `0`. Applying the same patch twice
    /// leaves the same row as applying it once.
    ///
    /// # Errors
    ///
    /// - [`PersistError::Game`] if `a == b` or the score is out of range.
    /// - [`PersistError::Db`] wrapping [`DbError::ForeignKeyViolation`] if
    ///   either nation does not exist.
    pub async fn upsert(
        &mut self,
        a: NationId,
        b: NationId,
        patch: RelationPatch,
    ) -> Result<Relation, PersistError> {
        validate_patch(&patch)?;
        let (lo, hi) = canonical_pair(a, b)?;
        let (initial_status, initial_score) = merge(None, patch);

        let row = sqlx::query_as::<_, RelationRow>(&format!(
            r"INSERT INTO relations (nation_a_id, nation_b_id, status, relationship_score)
              VALUES ($1, $2, $3, $4)
              ON CONFLICT (nation_a_id, nation_b_id) DO UPDATE SET
                  status = COALESCE($5, relations.status),
                  relationship_score = COALESCE($6, relations.relationship_score),
                  updated_at = NOW()
              RETURNING {RELATION_COLUMNS}"
        ))
        .bind(lo.into_inner())
        .bind(hi.into_inner())
        .bind(initial_status.as_str())
        .bind(initial_score)
        .bind(patch.status.map(RelationStatus::as_str))
        .bind(patch.relationship_score)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(DbError::from)?;

        tracing::debug!(
            relation_id = row.id,
            nation_a_id = row.nation_a_id,
            nation_b_id = row.nation_b_id,
            status = %row.status,
            score = row.relationship_score,
            "Upserted relation"
        );
        Ok(Relation::try_from(row)?)
    }

    /// Apply a partial update to a relation by id.
    ///
    /// Returns `Ok(None)` if the relation does not exist.
    ///
    /// # Errors
    ///
    /// - [`PersistError::Game`] if the score is out of range.
    /// - [`PersistError::Db`] if the update fails.
    pub async fn update(
        &mut self,
        id: RelationId,
        patch: RelationPatch,
    ) -> Result<Option<Relation>, PersistError> {
        validate_patch(&patch)?;

        let relation = sqlx::query_as::<_, RelationRow>(&format!(
            r"UPDATE relations SET
                  status = COALESCE($2, status),
                  relationship_score = COALESCE($3, relationship_score),
                  updated_at = NOW()
              WHERE id = $1
              RETURNING {RELATION_COLUMNS}"
        ))
        .bind(id.into_inner())
        .bind(patch.status.map(RelationStatus::as_str))
        .bind(patch.relationship_score)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(DbError::from)?
        .map(Relation::try_from)
        .transpose()?;
        Ok(relation)
    }

    /// Every relation, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_all(&mut self) -> Result<Vec<Relation>, DbError> {
        let rows = sqlx::query_as::<_, RelationRow>(&format!(
            "SELECT {RELATION_COLUMNS} FROM relations ORDER BY id"
        ))
        .fetch_all(&mut *self.conn)
        .await?;
        rows.into_iter().map(Relation::try_from).collect()
    }

    /// Every relation involving `nation`.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_for_nation(&mut self, nation: NationId) -> Result<Vec<Relation>, DbError> {
        let rows = sqlx::query_as::<_, RelationRow>(&format!(
            r"SELECT {RELATION_COLUMNS} FROM relations
              WHERE nation_a_id = $1 OR nation_b_id = $1
              ORDER BY id"
        ))
        .bind(nation.into_inner())
        .fetch_all(&mut *self.conn)
        .await?;
        rows.into_iter().map(Relation::try_from).collect()
    }

    /// Relations involving `nation` with the given status. With
    /// [`RelationStatus::Allied`] these are its allies, with
    /// [`RelationStatus::War`] its enemies.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_for_nation_with_status(
        &mut self,
        nation: NationId,
        status: RelationStatus,
    ) -> Result<Vec<Relation>, DbError> {
        let rows = sqlx::query_as::<_, RelationRow>(&format!(
            r"SELECT {RELATION_COLUMNS} FROM relations
              WHERE (nation_a_id = $1 OR nation_b_id = $1) AND status = $2
              ORDER BY id"
        ))
        .bind(nation.into_inner())
        .bind(status.as_str())
        .fetch_all(&mut *self.conn)
        .await?;
        rows.into_iter().map(Relation::try_from).collect()
    }
}

/// A row from the `relations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RelationRow {
    /// Row id.
    pub id: i64,
    /// Lower nation id.
    pub nation_a_id: i64,
    /// Higher nation id.
    pub nation_b_id: i64,
    /// Status as stored text.
    pub status: String,
    /// Score, -100..=100.
    pub relationship_score: i32,
}

impl TryFrom<RelationRow> for Relation {
    type Error = DbError;

    fn try_from(row: RelationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: RelationId(row.id),
            nation_a_id: NationId(row.nation_a_id),
            nation_b_id: NationId(row.nation_b_id),
            status: row
                .status
                .parse()
                .map_err(|e: ParseEnumError| DbError::Decode(e.to_string()))?,
            relationship_score: row.relationship_score,
        })
    }
}
