// Query surface over the merged player table.

use crate::merge::{CanonicalPlayerRecord, PlayerTable};
use crate::scoring::points::{score, PlayerScore};
use crate::scoring::weights::ScoringWeights;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum QueryError {
    #[error("no data found for player: {name}")]
    PlayerNotFound { name: String },

    #[error("at least two players are required for comparison, got {got}")]
    InsufficientInput { got: usize },
}

/// Find a player's merged record by display name.
pub fn lookup_player<'a>(
    table: &'a PlayerTable,
    name: &str,
) -> Result<&'a CanonicalPlayerRecord, QueryError> {
    table.find(name).ok_or_else(|| QueryError::PlayerNotFound {
        name: name.trim().to_string(),
    })
}

/// Score a player by display name.
pub fn score_player(
    table: &PlayerTable,
    name: &str,
    weights: &ScoringWeights,
) -> Result<PlayerScore, QueryError> {
    lookup_player(table, name).map(|record| score(record, weights))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{Category, StatField};

    fn table() -> PlayerTable {
        let mut r = CanonicalPlayerRecord::new("AJ Brown");
        r.stats.insert(StatField::Receptions, 67.0);
        r.games.insert(Category::Receiving, 14.0);
        PlayerTable::from_records([r])
    }

    #[test]
    fn lookup_uses_canonical_key() {
        let t = table();
        assert_eq!(lookup_player(&t, "A.J. Brown").unwrap().player, "AJ Brown");
    }

    #[test]
    fn unknown_player_is_not_found() {
        let t = table();
        assert_eq!(
            lookup_player(&t, " Nobody ").unwrap_err(),
            QueryError::PlayerNotFound {
                name: "Nobody".into()
            }
        );
        assert!(score_player(&t, "Nobody", &ScoringWeights::default()).is_err());
    }

    #[test]
    fn score_player_scores_found_record() {
        let s = score_player(&table(), "AJ Brown", &ScoringWeights::default()).unwrap();
        assert!((s.total - 67.0).abs() < 1e-9);
        assert!((s.per_game - 67.0 / 14.0).abs() < 1e-9);
    }
}
