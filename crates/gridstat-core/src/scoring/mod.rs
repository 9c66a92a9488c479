// Fantasy scoring, comparison and display statistics over the merged table.

pub mod compare;
pub mod points;
pub mod summary;
pub mod weights;

pub use compare::{compare_groups, compare_players, GroupComparison, Starters, Statement};
pub use points::{score, PlayerScore};
pub use weights::ScoringWeights;
