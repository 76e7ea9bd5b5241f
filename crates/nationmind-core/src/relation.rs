//! Relation normalization: one row per unordered pair of nations.
//!
//! A pair `{a, b}` is always stored as `(min(a, b), max(a, b))`. Reads
//! normalize their input the same way, so a lookup never needs to check
//! both orderings. Upserts merge a [`RelationPatch`] into whatever is
//! stored: provided fields overwrite, omitted fields keep their value, and
//! a brand-new row fills omitted fields with `neutral` / `0`.

use nationmind_types::{NationId, Relation, RelationPatch, RelationStatus};
use validator::Validate;

use crate::error::GameError;

/// Score given to a relation created without an explicit score.
pub const DEFAULT_SCORE: i32 = 0;

/// Normalize a pair into storage order.
///
/// # Errors
///
/// Returns [`GameError::Validation`] if `a == b`: a nation cannot have a
/// relation with itself.
pub fn canonical_pair(a: NationId, b: NationId) -> Result<(NationId, NationId), GameError> {
    if a == b {
        return Err(GameError::Validation(format!(
            "nation {a} cannot have a relation with itself"
        )));
    }
    Ok((a.min(b), a.max(b)))
}

/// Resolve the `(status, score)` an upsert leaves behind.
///
/// `current` is the stored state, or `None` if the pair has no row yet.
pub fn merge(current: Option<(RelationStatus, i32)>, patch: RelationPatch) -> (RelationStatus, i32) {
    let (status, score) = current.unwrap_or((RelationStatus::default(), DEFAULT_SCORE));
    (
        patch.status.unwrap_or(status),
        patch.relationship_score.unwrap_or(score),
    )
}

/// Check a patch before it is sent to the store.
///
/// # Errors
///
/// Returns [`GameError::Validation`] if the score is out of range.
pub fn validate_patch(patch: &RelationPatch) -> Result<(), GameError> {
    patch.validate()?;
    Ok(())
}

/// All pairs in `relations` with the given status, in storage order.
pub fn pairs_with_status(relations: &[Relation], status: RelationStatus) -> Vec<(NationId, NationId)> {
    relations
        .iter()
        .filter(|r| r.status == status)
        .map(|r| (r.nation_a_id, r.nation_b_id))
        .collect()
}

/// Every unordered pair drawn from `nations`, each in storage order.
///
/// `n` nations yield `n * (n - 1) / 2` pairs. Duplicated ids are skipped.
pub fn all_pairs(nations: &[NationId]) -> Vec<(NationId, NationId)> {
    let mut pairs = Vec::new();
    for (i, a) in nations.iter().enumerate() {
        for b in nations.iter().skip(i.saturating_add(1)) {
            if let Ok(pair) = canonical_pair(*a, *b) {
                pairs.push(pair);
            }
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use nationmind_types::RelationId;

    use super::*;

    fn relation(a: i64, b: i64, status: RelationStatus) -> Relation {
        Relation {
            id: RelationId(a.saturating_mul(100).saturating_add(b)),
            nation_a_id: NationId(a),
            nation_b_id: NationId(b),
            status,
            relationship_score: 0,
        }
    }

    #[test]
    fn canonical_pair_orders_ids() {
        let forward = canonical_pair(NationId(3), NationId(8)).ok();
        let backward = canonical_pair(NationId(8), NationId(3)).ok();
        assert_eq!(forward, Some((NationId(3), NationId(8))));
        assert_eq!(forward, backward);
    }

    #[test]
    fn canonical_pair_rejects_self_relation() {
        let result = canonical_pair(NationId(4), NationId(4));
        assert!(matches!(result, Err(GameError::Validation(_))));
    }

    #[test]
    fn merge_on_missing_row_uses_defaults_for_omitted_fields() {
        let only_status = RelationPatch {
            status: Some(RelationStatus::War),
            relationship_score: None,
        };
        assert_eq!(merge(None, only_status), (RelationStatus::War, 0));

        let only_score = RelationPatch {
            status: None,
            relationship_score: Some(25),
        };
        assert_eq!(merge(None, only_score), (RelationStatus::Neutral, 25));
    }

    #[test]
    fn merge_keeps_omitted_fields_of_existing_row() {
        let current = Some((RelationStatus::Allied, 60));
        let patch = RelationPatch {
            status: None,
            relationship_score: Some(-10),
        };
        assert_eq!(merge(current, patch), (RelationStatus::Allied, -10));
    }

    #[test]
    fn merge_is_absolute_overwrite_not_delta() {
        let current = Some((RelationStatus::Allied, 60));
        let war = RelationPatch {
            status: Some(RelationStatus::War),
            relationship_score: Some(-50),
        };
        assert_eq!(merge(current, war), (RelationStatus::War, -50));
    }

    #[test]
    fn merge_is_idempotent() {
        let patch = RelationPatch {
            status: Some(RelationStatus::TradeAgreement),
            relationship_score: Some(30),
        };
        for current in [None, Some((RelationStatus::War, -80))] {
            let once = merge(current, patch);
            let twice = merge(Some(once), patch);
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn patch_score_out_of_range_is_rejected() {
        let patch = RelationPatch {
            status: None,
            relationship_score: Some(150),
        };
        assert!(matches!(validate_patch(&patch), Err(GameError::Validation(_))));
    }

    #[test]
    fn all_pairs_covers_every_unordered_pair_once() {
        let ids: Vec<NationId> = [5, 1, 4, 2, 3].into_iter().map(NationId).collect();
        let pairs = all_pairs(&ids);
        assert_eq!(pairs.len(), 10);
        assert!(pairs.iter().all(|(a, b)| a < b));
        let mut deduped = pairs.clone();
        deduped.sort();
        deduped.dedup();
        assert_eq!(deduped.len(), 10);
    }

    #[test]
    fn pairs_with_status_filters() {
        let relations = vec![
            relation(1, 2, RelationStatus::Allied),
            relation(1, 3, RelationStatus::War),
            relation(2, 3, RelationStatus::Allied),
        ];
        assert_eq!(
            pairs_with_status(&relations, RelationStatus::Allied),
            vec![(NationId(1), NationId(2)), (NationId(2), NationId(3))]
        );
        assert_eq!(
            pairs_with_status(&relations, RelationStatus::War),
            vec![(NationId(1), NationId(3))]
        );
    }
}
