//! Nation store operations.
//!
//! Nations are never physically removed: [`NationStore::soft_delete`] only
//! clears `is_active`, so names stay reserved for the life of the game.

use nationmind_types::{Nation, NationId, NationPatch, NewNation, ParseEnumError, Personality};
use sqlx::PgConnection;

use crate::error::DbError;

const NATION_COLUMNS: &str = "id, name, personality, gold, troops, territories, military_power, \
     economic_power, diplomatic_influence, objectives, ai_controlled, is_active";

/// Operations on the `nations` table.
pub struct NationStore<'c> {
    conn: &'c mut PgConnection,
}

impl<'c> NationStore<'c> {
    /// Create a store bound to a connection or open transaction.
    pub const fn new(conn: &'c mut PgConnection) -> Self {
        Self { conn }
    }

    /// Insert a nation.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::UniqueViolation`] if the name is taken.
    pub async fn create(&mut self, nation: &NewNation) -> Result<Nation, DbError> {
        let row = sqlx::query_as::<_, NationRow>(&format!(
            r"INSERT INTO nations (name, personality, gold, troops, territories, military_power,
                                   economic_power, diplomatic_influence, objectives, ai_controlled)
              VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
              RETURNING {NATION_COLUMNS}"
        ))
        .bind(&nation.name)
        .bind(nation.personality.as_str())
        .bind(nation.gold)
        .bind(nation.troops)
        .bind(nation.territories)
        .bind(nation.military_power)
        .bind(nation.economic_power)
        .bind(nation.diplomatic_influence)
        .bind(&nation.objectives)
        .bind(nation.ai_controlled)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| {
            DbError::from(e)
                .on_duplicate(|| format!("Nation with name '{}' already exists", nation.name))
        })?;

        tracing::debug!(nation_id = row.id, name = %row.name, "Created nation");
        row.try_into()
    }

    /// Fetch a nation by id, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get(&mut self, id: NationId) -> Result<Option<Nation>, DbError> {
        sqlx::query_as::<_, NationRow>(&format!(
            "SELECT {NATION_COLUMNS} FROM nations WHERE id = $1"
        ))
        .bind(id.into_inner())
        .fetch_optional(&mut *self.conn)
        .await?
        .map(Nation::try_from)
        .transpose()
    }

    /// Fetch a nation by exact name.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn get_by_name(&mut self, name: &str) -> Result<Option<Nation>, DbError> {
        sqlx::query_as::<_, NationRow>(&format!(
            "SELECT {NATION_COLUMNS} FROM nations WHERE name = $1"
        ))
        .bind(name)
        .fetch_optional(&mut *self.conn)
        .await?
        .map(Nation::try_from)
        .transpose()
    }

    /// List nations in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list(
        &mut self,
        skip: i64,
        limit: i64,
        active_only: bool,
    ) -> Result<Vec<Nation>, DbError> {
        let rows = sqlx::query_as::<_, NationRow>(&format!(
            r"SELECT {NATION_COLUMNS} FROM nations
              WHERE is_active OR NOT $1
              ORDER BY id
              OFFSET $2 LIMIT $3"
        ))
        .bind(active_only)
        .bind(skip)
        .bind(limit)
        .fetch_all(&mut *self.conn)
        .await?;

        rows.into_iter().map(Nation::try_from).collect()
    }

    /// Every active nation, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_active(&mut self) -> Result<Vec<Nation>, DbError> {
        let rows = sqlx::query_as::<_, NationRow>(&format!(
            "SELECT {NATION_COLUMNS} FROM nations WHERE is_active ORDER BY id"
        ))
        .fetch_all(&mut *self.conn)
        .await?;

        rows.into_iter().map(Nation::try_from).collect()
    }

    /// Active nations driven by the AI.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn list_ai(&mut self) -> Result<Vec<Nation>, DbError> {
        let rows = sqlx::query_as::<_, NationRow>(&format!(
            r"SELECT {NATION_COLUMNS} FROM nations
              WHERE ai_controlled AND is_active
              ORDER BY id"
        ))
        .fetch_all(&mut *self.conn)
        .await?;

        rows.into_iter().map(Nation::try_from).collect()
    }

    /// The first active nation not driven by the AI.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn player(&mut self) -> Result<Option<Nation>, DbError> {
        sqlx::query_as::<_, NationRow>(&format!(
            r"SELECT {NATION_COLUMNS} FROM nations
              WHERE NOT ai_controlled AND is_active
              ORDER BY id
              LIMIT 1"
        ))
        .fetch_optional(&mut *self.conn)
        .await?
        .map(Nation::try_from)
        .transpose()
    }

    /// Number of nations ever created, active or not.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the query fails.
    pub async fn count(&mut self) -> Result<i64, DbError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM nations")
            .fetch_one(&mut *self.conn)
            .await?;
        Ok(count)
    }

    /// Apply a partial update. Only `Some` fields are written.
    ///
    /// Returns `None` if the nation does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::UniqueViolation`] if a new name is taken.
    pub async fn update(
        &mut self,
        id: NationId,
        patch: &NationPatch,
    ) -> Result<Option<Nation>, DbError> {
        let row = sqlx::query_as::<_, NationRow>(&format!(
            r"UPDATE nations SET
                  name = COALESCE($2, name),
                  personality = COALESCE($3, personality),
                  gold = COALESCE($4, gold),
                  troops = COALESCE($5, troops),
                  territories = COALESCE($6, territories),
                  military_power = COALESCE($7, military_power),
                  economic_power = COALESCE($8, economic_power),
                  diplomatic_influence = COALESCE($9, diplomatic_influence),
                  objectives = COALESCE($10, objectives),
                  ai_controlled = COALESCE($11, ai_controlled),
                  is_active = COALESCE($12, is_active),
                  updated_at = NOW()
              WHERE id = $1
              RETURNING {NATION_COLUMNS}"
        ))
        .bind(id.into_inner())
        .bind(patch.name.as_deref())
        .bind(patch.personality.map(Personality::as_str))
        .bind(patch.gold)
        .bind(patch.troops)
        .bind(patch.territories)
        .bind(patch.military_power)
        .bind(patch.economic_power)
        .bind(patch.diplomatic_influence)
        .bind(patch.objectives.as_deref())
        .bind(patch.ai_controlled)
        .bind(patch.is_active)
        .fetch_optional(&mut *self.conn)
        .await
        .map_err(|e| {
            DbError::from(e).on_duplicate(|| {
                format!(
                    "Nation with name '{}' already exists",
                    patch.name.as_deref().unwrap_or_default()
                )
            })
        })?;

        if row.is_some() {
            tracing::debug!(nation_id = %id, "Updated nation");
        }
        row.map(Nation::try_from).transpose()
    }

    /// Add signed deltas to gold and troops, flooring both at zero.
    ///
    /// Returns `None` if the nation does not exist.
    ///
    /// # Errors
    ///
    /// - [`DbError::OutOfRange`] if a sum leaves the `bigint` range.
    /// - [`DbError::Postgres`] if the update fails otherwise.
    pub async fn adjust_resources(
        &mut self,
        id: NationId,
        gold_change: i64,
        troops_change: i64,
    ) -> Result<Option<Nation>, DbError> {
        let row = sqlx::query_as::<_, NationRow>(&format!(
            r"UPDATE nations SET
                  gold = GREATEST(0, gold + $2),
                  troops = GREATEST(0, troops + $3),
                  updated_at = NOW()
              WHERE id = $1
              RETURNING {NATION_COLUMNS}"
        ))
        .bind(id.into_inner())
        .bind(gold_change)
        .bind(troops_change)
        .fetch_optional(&mut *self.conn)
        .await?;

        if let Some(ref r) = row {
            tracing::debug!(
                nation_id = r.id,
                gold_change,
                troops_change,
                gold = r.gold,
                troops = r.troops,
                "Adjusted nation resources"
            );
        }
        row.map(Nation::try_from).transpose()
    }

    /// Mark a nation inactive. Returns `false` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`DbError::Postgres`] if the update fails.
    pub async fn soft_delete(&mut self, id: NationId) -> Result<bool, DbError> {
        let result =
            sqlx::query("UPDATE nations SET is_active = FALSE, updated_at = NOW() WHERE id = $1")
                .bind(id.into_inner())
                .execute(&mut *self.conn)
                .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            tracing::debug!(nation_id = %id, "Deactivated nation");
        }
        Ok(deleted)
    }
}

/// A row from the `nations` table.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NationRow {
    /// Row id.
    pub id: i64,
    /// Unique name.
    pub name: String,
    /// Personality as stored text.
    pub personality: String,
    /// Treasury.
    pub gold: i64,
    /// Army size.
    pub troops: i64,
    /// Territory count.
    pub territories: i32,
    /// Military rating.
    pub military_power: f64,
    /// Economic rating.
    pub economic_power: f64,
    /// Diplomatic rating.
    pub diplomatic_influence: f64,
    /// Strategic goals.
    pub objectives: Vec<String>,
    /// Whether the AI drives this nation.
    pub ai_controlled: bool,
    /// Soft-delete flag.
    pub is_active: bool,
}

impl TryFrom<NationRow> for Nation {
    type Error = DbError;

    fn try_from(row: NationRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: NationId(row.id),
            personality: row
                .personality
                .parse()
                .map_err(|e: ParseEnumError| DbError::Decode(e.to_string()))?,
            name: row.name,
            gold: row.gold,
            troops: row.troops,
            territories: row.territories,
            military_power: row.military_power,
            economic_power: row.economic_power,
            diplomatic_influence: row.diplomatic_influence,
            objectives: row.objectives,
            ai_controlled: row.ai_controlled,
            is_active: row.is_active,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(personality: &str) -> NationRow {
        NationRow {
            id: 3,
            name: String::from("Italia"),
            personality: personality.to_owned(),
            gold: 1000,
            troops: 100,
            territories: 2,
            military_power: 55.0,
            economic_power: 65.0,
            diplomatic_influence: 60.0,
            objectives: vec![String::from("hold_rome")],
            ai_controlled: true,
            is_active: true,
        }
    }

    #[test]
    fn row_converts_to_nation() {
        let nation = Nation::try_from(row("defensive"));
        assert!(nation.is_ok());
        let nation = nation.ok();
        assert_eq!(nation.as_ref().map(|n| n.id), Some(NationId(3)));
        assert_eq!(nation.map(|n| n.personality), Some(Personality::Defensive));
    }

    #[test]
    fn unknown_personality_is_a_decode_error() {
        assert!(matches!(Nation::try_from(row("berserk")), Err(DbError::Decode(_))));
    }
}
