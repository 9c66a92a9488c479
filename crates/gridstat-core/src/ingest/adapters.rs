// Per-category source adapters.
//
// Each category has a fixed column schema: which raw column holds the player
// name, games, position and team, and which raw columns map onto canonical
// stat fields. Everything else in the source is dropped here.

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use super::normalize::{canonical_key, coerce_numeric, markup_key, remap_team, resolve_names, NumericCell};
use super::table::RawTable;
use super::{Category, IngestReport, IngestWarning, StatField};
use crate::merge::HEADER_ARTIFACT;

// ---------------------------------------------------------------------------
// Category schemas
// ---------------------------------------------------------------------------

/// Raw column layout of one category's source.
#[derive(Debug, Clone, Copy)]
pub struct CategorySchema {
    pub category: Category,
    pub name_column: &'static str,
    pub games_column: Option<&'static str>,
    pub position_column: Option<&'static str>,
    pub team_column: Option<&'static str>,
    /// Raw column -> canonical stat field.
    pub stats: &'static [(&'static str, StatField)],
    /// Known source-only columns with no scoring or display value.
    pub dropped: &'static [&'static str],
}

const PASSING: CategorySchema = CategorySchema {
    category: Category::Passing,
    name_column: "Player",
    games_column: Some("G"),
    position_column: Some("Pos"),
    team_column: Some("Team"),
    stats: &[
        ("Yds", StatField::PassingYards),
        ("TD", StatField::PassingTd),
        ("Int", StatField::Interceptions),
        ("Sk", StatField::Sacks),
    ],
    dropped: &[
        "Rk", "Age", "Awards", "QBR", "GS", "QBrec", "Cmp", "Att", "Cmp%", "TD%", "Int%", "1D",
        "Succ%", "Lng", "Y/A", "AY/A", "Y/C", "Y/G", "Rate", "Yds.1", "Sk%", "NY/A", "ANY/A",
        "4QC", "GWD",
    ],
};

const RECEIVING: CategorySchema = CategorySchema {
    category: Category::Receiving,
    name_column: "Player",
    games_column: Some("Gms"),
    position_column: None,
    team_column: Some("Team"),
    stats: &[
        ("Rec", StatField::Receptions),
        ("Yds", StatField::ReceivingYards),
        ("TD", StatField::ReceivingTd),
    ],
    dropped: &["Lg", "FD", "Tar", "YAC", "Avg", "YPG"],
};

const RUSHING: CategorySchema = CategorySchema {
    category: Category::Rushing,
    name_column: "Player",
    games_column: Some("Gms"),
    position_column: Some("Pos"),
    team_column: Some("Team"),
    stats: &[
        ("Att", StatField::RushAttempts),
        ("Yds", StatField::RushYards),
        ("TD", StatField::RushingTd),
    ],
    dropped: &["Lg", "FD", "Avg", "YPG"],
};

const CONVERSIONS: CategorySchema = CategorySchema {
    category: Category::Conversions,
    name_column: "Player",
    games_column: None,
    position_column: None,
    team_column: Some("Team"),
    stats: &[("Value", StatField::TwoPointConversions)],
    dropped: &["Rank", "Pos"],
};

const FUMBLES: CategorySchema = CategorySchema {
    category: Category::Fumbles,
    name_column: "Player",
    games_column: None,
    position_column: Some("Pos"),
    team_column: Some("Team"),
    stats: &[("Value", StatField::Fumbles)],
    dropped: &["Rank"],
};

impl CategorySchema {
    pub fn for_category(category: Category) -> &'static CategorySchema {
        match category {
            Category::Passing => &PASSING,
            Category::Receiving => &RECEIVING,
            Category::Rushing => &RUSHING,
            Category::Conversions => &CONVERSIONS,
            Category::Fumbles => &FUMBLES,
        }
    }

    /// Columns whose absence is reported as a schema mismatch. Position is
    /// display-only and not every source carries it, so it is not expected.
    fn expected_columns(&self) -> Vec<&'static str> {
        let mut cols = vec![self.name_column];
        cols.extend(self.games_column);
        cols.extend(self.stats.iter().map(|(raw, _)| *raw));
        cols
    }

    fn is_known(&self, column: &str) -> bool {
        column == self.name_column
            || self.games_column == Some(column)
            || self.position_column == Some(column)
            || self.team_column == Some(column)
            || self.stats.iter().any(|(raw, _)| *raw == column)
            || self.dropped.contains(&column)
    }
}

// ---------------------------------------------------------------------------
// Category records
// ---------------------------------------------------------------------------

/// One player's row for a single category.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryRecord {
    pub player: String,
    pub position: Option<String>,
    /// Remapped team code. Kept for inspection only; the merge drops it.
    pub team: Option<String>,
    pub games: Option<f64>,
    /// Present values only; an absent field is null.
    pub stats: BTreeMap<StatField, f64>,
}

impl CategoryRecord {
    pub fn stat(&self, field: StatField) -> Option<f64> {
        self.stats.get(&field).copied()
    }

    /// Fold another row for the same player into this one. Multi-row blocks
    /// are split rows of one season, so counting stats add up. Games come
    /// from the first row that reports them; later rows repeat or split the
    /// season and are not added.
    fn absorb(&mut self, other: CategoryRecord) {
        if self.games.is_none() {
            self.games = other.games;
        }
        for (field, value) in other.stats {
            *self.stats.entry(field).or_insert(0.0) += value;
        }
        if self.position.is_none() {
            self.position = other.position;
        }
        if self.team.is_none() {
            self.team = other.team;
        }
    }
}

/// All records for one category, keyed by canonical player key.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTable {
    pub category: Category,
    records: BTreeMap<String, CategoryRecord>,
}

impl CategoryTable {
    pub fn empty(category: Category) -> Self {
        Self {
            category,
            records: BTreeMap::new(),
        }
    }

    /// Build a table from records, folding rows that share a key.
    pub fn from_records<I>(category: Category, records: I) -> Self
    where
        I: IntoIterator<Item = CategoryRecord>,
    {
        let mut table = Self::empty(category);
        for record in records {
            table.insert(record);
        }
        table
    }

    fn insert(&mut self, record: CategoryRecord) {
        match self.records.get_mut(&record.player) {
            Some(existing) => {
                debug!(
                    "{}: folding duplicate row for '{}'",
                    self.category, record.player
                );
                existing.absorb(record);
            }
            None => {
                self.records.insert(record.player.clone(), record);
            }
        }
    }

    pub fn get(&self, player: &str) -> Option<&CategoryRecord> {
        self.records.get(player)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CategoryRecord> {
        self.records.values()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Adapter
// ---------------------------------------------------------------------------

/// Turn a raw table into the category's records.
///
/// Never fails: missing columns and unparsable cells are reported in the
/// returned [`IngestReport`] and the affected values are null.
pub fn adapt(category: Category, table: &RawTable) -> (CategoryTable, IngestReport) {
    let schema = CategorySchema::for_category(category);
    let mut report = IngestReport::default();

    for column in schema.expected_columns() {
        if !table.has_column(column) {
            warn!("{category} source is missing column `{column}`; field will be null");
            report.push(IngestWarning::SchemaMismatch {
                category,
                column: column.to_string(),
            });
        }
    }
    for header in &table.headers {
        if !schema.is_known(header) {
            debug!("{category}: ignoring unrecognized column `{header}`");
        }
    }

    let Some(name_idx) = table.headers.iter().position(|h| h == schema.name_column) else {
        return (CategoryTable::empty(category), report);
    };

    let keys = player_keys(category, table, name_idx);
    let mut records = Vec::with_capacity(table.cells.len());
    let mut skipped_rows = 0usize;

    for (row, key) in table.rows().zip(keys) {
        let Some(player) = key else {
            skipped_rows += 1;
            continue;
        };

        let mut record = CategoryRecord {
            player: player.clone(),
            ..CategoryRecord::default()
        };

        if let Some(col) = schema.games_column {
            record.games = numeric(category, &player, col, row.get(col), &mut report);
        }
        if let Some(col) = schema.position_column {
            record.position = row
                .get(col)
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string);
        }
        if let Some(col) = schema.team_column {
            record.team = row
                .get(col)
                .map(remap_team)
                .filter(|t| !t.is_empty());
        }
        for (col, field) in schema.stats {
            if let Some(value) = numeric(category, &player, col, row.get(col), &mut report) {
                record.stats.insert(*field, value);
            }
        }
        records.push(record);
    }

    if skipped_rows > 0 {
        debug!("{category}: discarded {skipped_rows} blank or header row(s)");
    }

    let out = CategoryTable::from_records(category, records);
    info!("{category}: adapted {} player(s)", out.len());
    (out, report)
}

/// Canonical key for every row; `None` for rows that stay blank and for
/// repeated header rows. The header test runs on the raw cell, since markup
/// display stripping mangles the word it looks for.
fn player_keys(category: Category, table: &RawTable, name_idx: usize) -> Vec<Option<String>> {
    let cells = table
        .cells
        .iter()
        .map(|row| row.get(name_idx).map(String::as_str).unwrap_or(""));

    let keys: Vec<Option<String>> = if category.is_markup() {
        resolve_names(cells)
            .into_iter()
            .map(|name| {
                name.filter(|n| !n.contains(HEADER_ARTIFACT))
                    .map(|n| markup_key(&n))
            })
            .collect()
    } else {
        cells
            .map(|cell| (!cell.contains(HEADER_ARTIFACT)).then(|| canonical_key(cell)))
            .collect()
    };

    keys.into_iter()
        .map(|key| key.filter(|k| !k.is_empty()))
        .collect()
}

fn numeric(
    category: Category,
    player: &str,
    column: &str,
    raw: Option<&str>,
    report: &mut IngestReport,
) -> Option<f64> {
    match coerce_numeric(raw.unwrap_or("")) {
        NumericCell::Value(v) => Some(v),
        NumericCell::Blank => None,
        NumericCell::Unparsable(raw) => {
            debug!("{category}: `{column}` for '{player}' is not numeric: {raw:?}");
            report.push(IngestWarning::CoercionFailure {
                category,
                player: player.to_string(),
                column: column.to_string(),
                raw,
            });
            None
        }
    }
}
