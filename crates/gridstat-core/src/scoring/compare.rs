// Player and group comparisons.
//
// All comparisons rank players by their per-game average.

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

use tracing::warn;

use super::points::PlayerScore;
use super::weights::ScoringWeights;
use crate::ingest::normalize::canonical_key;
use crate::merge::PlayerTable;
use crate::query::{score_player, QueryError};

/// A bench player's halved average must reach this to count at all.
pub const BENCH_THRESHOLD: f64 = 9.0;

// ---------------------------------------------------------------------------
// Pairwise comparison
// ---------------------------------------------------------------------------

/// How two adjacent players in a ranking relate.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Higher {
        first: String,
        second: String,
        first_score: f64,
        second_score: f64,
    },
    Lower {
        first: String,
        second: String,
        first_score: f64,
        second_score: f64,
    },
    Equal {
        first: String,
        second: String,
        score: f64,
    },
    /// At least one of the two had no score.
    Incomparable { first: String, second: String },
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Higher {
                first,
                second,
                first_score,
                second_score,
            } => write!(
                f,
                "{first} has a higher average than {second} (Score: {first_score:.2} > {second_score:.2})"
            ),
            Statement::Lower {
                first,
                second,
                first_score,
                second_score,
            } => write!(
                f,
                "{first} has a lower average than {second} (Score: {first_score:.2} < {second_score:.2})"
            ),
            Statement::Equal { first, second, score } => {
                write!(f, "{first} and {second} have equal scores (Score: {score:.2})")
            }
            Statement::Incomparable { first, second } => {
                write!(f, "Could not compare {first} and {second} due to missing data.")
            }
        }
    }
}

/// Sort descending by score; players without a score rank last. Ties keep
/// their input order.
pub fn rank(mut scores: Vec<(String, Option<f64>)>) -> Vec<(String, Option<f64>)> {
    let key = |s: &Option<f64>| s.unwrap_or(f64::NEG_INFINITY);
    scores.sort_by(|a, b| key(&b.1).partial_cmp(&key(&a.1)).unwrap_or(Ordering::Equal));
    scores
}

/// One statement per adjacent pair of an already ranked list.
pub fn adjacent_statements(ranked: &[(String, Option<f64>)]) -> Vec<Statement> {
    ranked
        .windows(2)
        .map(|pair| {
            let (first, a) = &pair[0];
            let (second, b) = &pair[1];
            let (first, second) = (first.clone(), second.clone());
            match (a, b) {
                (Some(a), Some(b)) if a > b => Statement::Higher {
                    first,
                    second,
                    first_score: *a,
                    second_score: *b,
                },
                (Some(a), Some(b)) if a < b => Statement::Lower {
                    first,
                    second,
                    first_score: *a,
                    second_score: *b,
                },
                (Some(a), Some(_)) => Statement::Equal {
                    first,
                    second,
                    score: *a,
                },
                _ => Statement::Incomparable { first, second },
            }
        })
        .collect()
}

/// Rank the named players by average and describe each adjacent pair.
/// Unknown players rank last and produce "could not compare" statements.
pub fn compare_players<S: AsRef<str>>(
    table: &PlayerTable,
    names: &[S],
    weights: &ScoringWeights,
) -> Result<Vec<Statement>, QueryError> {
    if names.len() < 2 {
        warn!("comparison requested with {} player(s)", names.len());
        return Err(QueryError::InsufficientInput { got: names.len() });
    }

    let scores = names
        .iter()
        .map(|name| {
            let name = name.as_ref().trim().to_string();
            let avg = match score_player(table, &name, weights) {
                Ok(s) => Some(s.per_game),
                Err(e) => {
                    warn!("{e}");
                    None
                }
            };
            (name, avg)
        })
        .collect();

    Ok(adjacent_statements(&rank(scores)))
}

/// The `n` best players by average, best first.
pub fn leaderboard(table: &PlayerTable, weights: &ScoringWeights, n: usize) -> Vec<PlayerScore> {
    let mut scores: Vec<PlayerScore> = table
        .iter()
        .map(|record| super::points::score(record, weights))
        .collect();
    scores.sort_by(|a, b| b.per_game.partial_cmp(&a.per_game).unwrap_or(Ordering::Equal));
    scores.truncate(n);
    scores
}

// ---------------------------------------------------------------------------
// Group comparison
// ---------------------------------------------------------------------------

/// Starter names for both groups, stored as canonical keys.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Starters {
    pub group1: BTreeSet<String>,
    pub group2: BTreeSet<String>,
}

impl Starters {
    pub fn new<I1, I2, S1, S2>(group1: I1, group2: I2) -> Self
    where
        I1: IntoIterator<Item = S1>,
        I2: IntoIterator<Item = S2>,
        S1: AsRef<str>,
        S2: AsRef<str>,
    {
        Self {
            group1: group1.into_iter().map(|s| canonical_key(s.as_ref())).collect(),
            group2: group2.into_iter().map(|s| canonical_key(s.as_ref())).collect(),
        }
    }
}

/// Halve a bench player's average, then drop it entirely if the halved value
/// is under [`BENCH_THRESHOLD`].
pub fn bench_adjusted(points: f64) -> f64 {
    let halved = points / 2.0;
    if halved < BENCH_THRESHOLD {
        0.0
    } else {
        halved
    }
}

/// Totals for two groups of players.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupComparison {
    pub group1_points: f64,
    pub group2_points: f64,
    /// Whether the starter/bench adjustment was applied.
    pub with_starters: bool,
}

impl GroupComparison {
    /// Group 1 minus group 2.
    pub fn difference(&self) -> f64 {
        self.group1_points - self.group2_points
    }

    /// 1 or 2 for the leading group, `None` on a tie.
    pub fn leader(&self) -> Option<u8> {
        let diff = self.difference();
        if diff > 0.0 {
            Some(1)
        } else if diff < 0.0 {
            Some(2)
        } else {
            None
        }
    }
}

impl fmt::Display for GroupComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let noun = if self.with_starters { "Group" } else { "Team" };
        let diff = self.difference();
        match self.leader() {
            Some(1) => write!(f, "{noun} 1 leads {noun} 2 by {diff:.2} points."),
            Some(_) => write!(f, "{noun} 2 leads {noun} 1 by {:.2} points.", -diff),
            None => write!(f, "Both groups have the same total points."),
        }
    }
}

fn group_points<S: AsRef<str>>(
    table: &PlayerTable,
    group: &[S],
    weights: &ScoringWeights,
    starters: Option<&BTreeSet<String>>,
) -> f64 {
    group
        .iter()
        .map(|name| {
            let name = name.as_ref();
            let avg = match score_player(table, name, weights) {
                Ok(s) => s.per_game,
                Err(e) => {
                    warn!("{e}; counting 0 points");
                    return 0.0;
                }
            };
            match starters {
                Some(set) if !set.contains(&canonical_key(name)) => bench_adjusted(avg),
                _ => avg,
            }
        })
        .sum()
}

/// Sum the averages of each group. With `starters`, every player missing
/// from their group's starter set gets the bench adjustment.
pub fn compare_groups<S1: AsRef<str>, S2: AsRef<str>>(
    table: &PlayerTable,
    group1: &[S1],
    group2: &[S2],
    weights: &ScoringWeights,
    starters: Option<&Starters>,
) -> GroupComparison {
    GroupComparison {
        group1_points: group_points(table, group1, weights, starters.map(|s| &s.group1)),
        group2_points: group_points(table, group2, weights, starters.map(|s| &s.group2)),
        with_starters: starters.is_some(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{Category, StatField};
    use crate::merge::CanonicalPlayerRecord;

    /// A player whose average under default weights equals `avg`
    /// (receptions only, one game).
    fn player(name: &str, avg: f64) -> CanonicalPlayerRecord {
        let mut r = CanonicalPlayerRecord::new(name);
        r.stats.insert(StatField::Receptions, avg);
        r.games.insert(Category::Receiving, 1.0);
        r
    }

    fn table() -> PlayerTable {
        PlayerTable::from_records([
            player("A", 13.0),
            player("B", 10.0),
            player("C", 10.0),
            player("Starter", 17.0),
            player("Bench Low", 17.0),
            player("Bench High", 19.0),
            player("Team One", 40.0),
            player("Team Two", 55.0),
        ])
    }

    #[test]
    fn higher_average_statement() {
        let out = compare_players(&table(), &["B", "A"], &ScoringWeights::default()).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(
            out[0].to_string(),
            "A has a higher average than B (Score: 13.00 > 10.00)"
        );
    }

    #[test]
    fn equal_scores_statement() {
        let out = compare_players(&table(), &["B", "C"], &ScoringWeights::default()).unwrap();
        assert_eq!(out[0].to_string(), "B and C have equal scores (Score: 10.00)");
    }

    #[test]
    fn unknown_player_ranks_last() {
        let out =
            compare_players(&table(), &["Ghost", "B", "A"], &ScoringWeights::default()).unwrap();
        assert_eq!(out.len(), 2);
        assert!(matches!(out[0], Statement::Higher { .. }));
        assert_eq!(
            out[1].to_string(),
            "Could not compare B and Ghost due to missing data."
        );
    }

    #[test]
    fn fewer_than_two_players_is_insufficient() {
        let err = compare_players(&table(), &["A"], &ScoringWeights::default()).unwrap_err();
        assert_eq!(err, QueryError::InsufficientInput { got: 1 });
        let none: [&str; 0] = [];
        assert!(compare_players(&table(), &none, &ScoringWeights::default()).is_err());
    }

    #[test]
    fn rank_puts_missing_scores_last() {
        let ranked = rank(vec![
            ("x".into(), None),
            ("y".into(), Some(-5.0)),
            ("z".into(), Some(3.0)),
        ]);
        let names: Vec<&str> = ranked.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["z", "y", "x"]);
    }

    #[test]
    fn lower_statement_formats() {
        let s = adjacent_statements(&[("a".into(), Some(1.0)), ("b".into(), Some(2.5))]);
        assert_eq!(s[0].to_string(), "a has a lower average than b (Score: 1.00 < 2.50)");
    }

    #[test]
    fn group_difference_statement() {
        let cmp = compare_groups(
            &table(),
            &["Team One"],
            &["Team Two"],
            &ScoringWeights::default(),
            None,
        );
        assert!((cmp.difference() + 15.0).abs() < 1e-9);
        assert_eq!(cmp.leader(), Some(2));
        assert_eq!(cmp.to_string(), "Team 2 leads Team 1 by 15.00 points.");
    }

    #[test]
    fn group_tie_statement() {
        let cmp = compare_groups(&table(), &["B"], &["C"], &ScoringWeights::default(), None);
        assert_eq!(cmp.leader(), None);
        assert_eq!(cmp.to_string(), "Both groups have the same total points.");
    }

    #[test]
    fn unknown_group_member_counts_zero() {
        let cmp = compare_groups(
            &table(),
            &["A", "Ghost"],
            &["B"],
            &ScoringWeights::default(),
            None,
        );
        assert!((cmp.group1_points - 13.0).abs() < 1e-9);
        assert_eq!(cmp.to_string(), "Team 1 leads Team 2 by 3.00 points.");
    }

    #[test]
    fn bench_threshold_boundary() {
        assert_eq!(bench_adjusted(17.0), 0.0);
        assert_eq!(bench_adjusted(19.0), 9.5);
        assert_eq!(bench_adjusted(18.0), 9.0);
        assert_eq!(bench_adjusted(-4.0), 0.0);
    }

    #[test]
    fn starters_keep_full_points_and_bench_is_adjusted() {
        let starters = Starters::new(["Starter"], Vec::<String>::new());
        let cmp = compare_groups(
            &table(),
            &["Starter", "Bench Low"],
            &["Bench High"],
            &ScoringWeights::default(),
            Some(&starters),
        );
        assert!((cmp.group1_points - 17.0).abs() < 1e-9);
        assert!((cmp.group2_points - 9.5).abs() < 1e-9);
        assert_eq!(cmp.to_string(), "Group 1 leads Group 2 by 7.50 points.");
    }

    #[test]
    fn starter_names_are_canonicalized() {
        let starters = Starters::new(["  Starter "], ["A.J. Brown Jr."]);
        assert!(starters.group1.contains("Starter"));
        assert!(starters.group2.contains("AJ Brown"));
    }

    #[test]
    fn leaderboard_orders_by_average() {
        let top = leaderboard(&table(), &ScoringWeights::default(), 3);
        let names: Vec<&str> = top.iter().map(|s| s.player.as_str()).collect();
        assert_eq!(names, vec!["Team Two", "Team One", "Bench High"]);
    }
}
