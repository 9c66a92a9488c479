// Ingest pipeline: raw table sources, field normalization, per-category
// adapters and the concurrent source loader.

pub mod adapters;
pub mod loader;
pub mod normalize;
pub mod table;

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Stat categories
// ---------------------------------------------------------------------------

/// One of the five independently sourced stat tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Passing,
    Receiving,
    Rushing,
    Conversions,
    Fumbles,
}

impl Category {
    /// All categories in merge order.
    pub const ALL: [Category; 5] = [
        Category::Passing,
        Category::Receiving,
        Category::Rushing,
        Category::Conversions,
        Category::Fumbles,
    ];

    pub fn display_str(&self) -> &'static str {
        match self {
            Category::Passing => "passing",
            Category::Receiving => "receiving",
            Category::Rushing => "rushing",
            Category::Conversions => "conversions",
            Category::Fumbles => "fumbles",
        }
    }

    /// Whether this source is scraped from table markup (cell text dumps with
    /// multi-row player blocks) rather than a ready-made tabular document.
    pub fn is_markup(&self) -> bool {
        matches!(self, Category::Receiving | Category::Rushing)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_str())
    }
}

// ---------------------------------------------------------------------------
// Canonical stat columns
// ---------------------------------------------------------------------------

/// A canonical numeric stat column. Each field is produced by exactly one
/// category, so merging never has to arbitrate between two sources for it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatField {
    PassingYards,
    PassingTd,
    Interceptions,
    Sacks,
    Receptions,
    ReceivingYards,
    ReceivingTd,
    RushAttempts,
    RushYards,
    RushingTd,
    TwoPointConversions,
    Fumbles,
}

impl StatField {
    pub const ALL: [StatField; 12] = [
        StatField::PassingYards,
        StatField::PassingTd,
        StatField::Interceptions,
        StatField::Sacks,
        StatField::Receptions,
        StatField::ReceivingYards,
        StatField::ReceivingTd,
        StatField::RushAttempts,
        StatField::RushYards,
        StatField::RushingTd,
        StatField::TwoPointConversions,
        StatField::Fumbles,
    ];

    /// Canonical column label used in output tables.
    pub fn label(&self) -> &'static str {
        match self {
            StatField::PassingYards => "Passing Yards",
            StatField::PassingTd => "Passing TD",
            StatField::Interceptions => "Int",
            StatField::Sacks => "Sk",
            StatField::Receptions => "Rec",
            StatField::ReceivingYards => "Receiving Yards",
            StatField::ReceivingTd => "Receiving TD",
            StatField::RushAttempts => "Att",
            StatField::RushYards => "Rush Yards",
            StatField::RushingTd => "TD",
            StatField::TwoPointConversions => "2pt Conversion",
            StatField::Fumbles => "Fmb",
        }
    }

    /// Parse a canonical label back into a field. Accepts the labels above
    /// case-insensitively plus a few snake_case spellings for CLI use.
    pub fn from_label(s: &str) -> Option<Self> {
        let wanted = s.trim().to_lowercase();
        if let Some(field) = StatField::ALL
            .iter()
            .find(|f| f.label().to_lowercase() == wanted)
        {
            return Some(*field);
        }
        match wanted.as_str() {
            "passing_yards" => Some(StatField::PassingYards),
            "passing_td" => Some(StatField::PassingTd),
            "interceptions" => Some(StatField::Interceptions),
            "sacks" => Some(StatField::Sacks),
            "receptions" => Some(StatField::Receptions),
            "receiving_yards" => Some(StatField::ReceivingYards),
            "receiving_td" => Some(StatField::ReceivingTd),
            "rush_attempts" => Some(StatField::RushAttempts),
            "rush_yards" | "rushing_yards" => Some(StatField::RushYards),
            "rushing_td" => Some(StatField::RushingTd),
            "two_point_conversions" | "2pt" => Some(StatField::TwoPointConversions),
            "fumbles" => Some(StatField::Fumbles),
            _ => None,
        }
    }

    /// The category whose source produces this field.
    pub fn category(&self) -> Category {
        match self {
            StatField::PassingYards
            | StatField::PassingTd
            | StatField::Interceptions
            | StatField::Sacks => Category::Passing,
            StatField::Receptions | StatField::ReceivingYards | StatField::ReceivingTd => {
                Category::Receiving
            }
            StatField::RushAttempts | StatField::RushYards | StatField::RushingTd => {
                Category::Rushing
            }
            StatField::TwoPointConversions => Category::Conversions,
            StatField::Fumbles => Category::Fumbles,
        }
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Non-fatal ingest conditions
// ---------------------------------------------------------------------------

/// A condition raised while ingesting a category that does not stop the
/// pipeline. Fatal-to-category failures are reported here too, after the
/// category has been replaced by an empty table.
#[derive(Debug, Clone, PartialEq)]
pub enum IngestWarning {
    /// The category's source could not be fetched or read; the category is empty.
    SourceUnavailable { category: Category, reason: String },
    /// An expected column was absent; the field is null for every player.
    SchemaMismatch { category: Category, column: String },
    /// A cell could not be parsed as a number; the value is null.
    CoercionFailure {
        category: Category,
        player: String,
        column: String,
        raw: String,
    },
}

impl fmt::Display for IngestWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IngestWarning::SourceUnavailable { category, reason } => {
                write!(f, "{category} source unavailable: {reason}")
            }
            IngestWarning::SchemaMismatch { category, column } => {
                write!(f, "{category} source is missing column `{column}`")
            }
            IngestWarning::CoercionFailure {
                category,
                player,
                column,
                raw,
            } => write!(
                f,
                "{category}: `{column}` for {player} is not numeric ({raw:?})"
            ),
        }
    }
}

/// Warnings collected across one ingest run.
#[derive(Debug, Clone, Default)]
pub struct IngestReport {
    pub warnings: Vec<IngestWarning>,
}

impl IngestReport {
    pub fn push(&mut self, warning: IngestWarning) {
        self.warnings.push(warning);
    }

    pub fn extend(&mut self, other: IngestReport) {
        self.warnings.extend(other.warnings);
    }

    /// Categories whose source failed outright.
    pub fn unavailable(&self) -> Vec<Category> {
        self.warnings
            .iter()
            .filter_map(|w| match w {
                IngestWarning::SourceUnavailable { category, .. } => Some(*category),
                _ => None,
            })
            .collect()
    }

    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}
