// Fantasy point computation for a single player.

use serde::Serialize;
use tracing::debug;

use super::weights::{ScoringWeights, WEIGHT_KEYS};
use crate::ingest::{Category, StatField};
use crate::merge::CanonicalPlayerRecord;

/// Games fields checked, in order, when resolving games played.
pub const GAMES_PRIORITY: [Category; 3] = [Category::Passing, Category::Receiving, Category::Rushing];

/// Games played assumed when no source reports any.
const DEFAULT_GAMES: f64 = 1.0;

/// A player's fantasy output under one set of weights.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerScore {
    pub player: String,
    pub total: f64,
    pub per_game: f64,
    pub games_played: f64,
    /// Points contributed by each scored stat, in scoring order.
    pub contributions: Vec<(StatField, f64)>,
    /// Scored stats the record had no value for; they counted as zero.
    pub missing: Vec<StatField>,
}

/// Games played: the first games value found in [`GAMES_PRIORITY`] order,
/// or 1 when no source reports games.
pub fn resolve_games(record: &CanonicalPlayerRecord) -> f64 {
    GAMES_PRIORITY
        .iter()
        .find_map(|c| record.games_for(*c))
        .unwrap_or(DEFAULT_GAMES)
}

/// Score one record. Absent stats count as zero and are listed in
/// [`PlayerScore::missing`]; they never abort the computation.
pub fn score(record: &CanonicalPlayerRecord, weights: &ScoringWeights) -> PlayerScore {
    let mut total = 0.0;
    let mut contributions = Vec::with_capacity(WEIGHT_KEYS.len());
    let mut missing = Vec::new();

    for (_, field) in WEIGHT_KEYS {
        let weight = weights.weight_for(field).unwrap_or(0.0);
        let points = match record.stat(field) {
            Some(value) => value * weight,
            None => {
                missing.push(field);
                0.0
            }
        };
        total += points;
        contributions.push((field, points));
    }

    if !missing.is_empty() {
        debug!(
            "'{}' has no value for {} scored stat(s); counted as zero",
            record.player,
            missing.len()
        );
    }

    let games_played = resolve_games(record);
    let per_game = if games_played > 0.0 {
        total / games_played
    } else {
        0.0
    };

    PlayerScore {
        player: record.player.clone(),
        total,
        per_game,
        games_played,
        contributions,
        missing,
    }
}
