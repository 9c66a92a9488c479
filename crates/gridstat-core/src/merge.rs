// Outer join of the category tables into one record per player.
//
// Every stat field belongs to exactly one category, and the fields several
// sources share (games, position) are stored per category. Joining therefore
// never overwrites a value, and the result does not depend on join order.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, info};

use crate::ingest::adapters::{CategoryRecord, CategoryTable};
use crate::ingest::normalize::canonical_key;
use crate::ingest::{Category, StatField};

/// Substring marking header rows that leaked into the data of a scraped table.
pub const HEADER_ARTIFACT: &str = "Player";

// ---------------------------------------------------------------------------
// Canonical player record
// ---------------------------------------------------------------------------

/// One player's reconciled stats across all categories. Absent entries are
/// null.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalPlayerRecord {
    pub player: String,
    /// Categories that had a row for this player.
    pub sources: BTreeSet<Category>,
    /// Position as reported by each source that carries one.
    pub positions: BTreeMap<Category, String>,
    /// Games as reported by each source that carries them.
    pub games: BTreeMap<Category, f64>,
    pub stats: BTreeMap<StatField, f64>,
}

impl CanonicalPlayerRecord {
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            sources: BTreeSet::new(),
            positions: BTreeMap::new(),
            games: BTreeMap::new(),
            stats: BTreeMap::new(),
        }
    }

    pub fn stat(&self, field: StatField) -> Option<f64> {
        self.stats.get(&field).copied()
    }

    pub fn games_for(&self, category: Category) -> Option<f64> {
        self.games.get(&category).copied()
    }

    /// First position reported, in category order.
    pub fn position(&self) -> Option<&str> {
        self.positions.values().next().map(String::as_str)
    }

    /// Copy one category's row into this record. Team is not carried over.
    fn absorb(&mut self, category: Category, row: &CategoryRecord) {
        self.sources.insert(category);
        if let Some(pos) = &row.position {
            self.positions.insert(category, pos.clone());
        }
        if let Some(games) = row.games {
            self.games.insert(category, games);
        }
        for (field, value) in &row.stats {
            self.stats.insert(*field, *value);
        }
    }
}

// ---------------------------------------------------------------------------
// Player table
// ---------------------------------------------------------------------------

/// The merged table: exactly one record per canonical key.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerTable {
    records: BTreeMap<String, CanonicalPlayerRecord>,
}

impl PlayerTable {
    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = CanonicalPlayerRecord>,
    {
        Self {
            records: records
                .into_iter()
                .map(|r| (r.player.clone(), r))
                .collect(),
        }
    }

    /// Exact lookup by canonical key.
    pub fn get(&self, key: &str) -> Option<&CanonicalPlayerRecord> {
        self.records.get(key)
    }

    /// Lookup by a display name, canonicalized the same way the sources are.
    pub fn find(&self, name: &str) -> Option<&CanonicalPlayerRecord> {
        self.records.get(&canonical_key(name))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.records.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &CanonicalPlayerRecord> {
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
// Join
// ---------------------------------------------------------------------------

/// Outer-join one category table into the accumulated records.
pub fn outer_join(
    mut acc: BTreeMap<String, CanonicalPlayerRecord>,
    table: &CategoryTable,
) -> BTreeMap<String, CanonicalPlayerRecord> {
    let before = acc.len();
    for row in table.iter() {
        acc.entry(row.player.clone())
            .or_insert_with(|| CanonicalPlayerRecord::new(row.player.clone()))
            .absorb(table.category, row);
    }
    debug!(
        "joined {}: {} row(s), {} new key(s)",
        table.category,
        table.len(),
        acc.len() - before
    );
    acc
}

/// Join the category tables in the order given, then drop header artifacts.
///
/// Expects at most one table per category. Empty tables are fine and
/// contribute nothing.
pub fn merge_categories(tables: &[CategoryTable]) -> PlayerTable {
    let joined = tables.iter().fold(BTreeMap::new(), outer_join);
    let total = joined.len();

    let records: BTreeMap<String, CanonicalPlayerRecord> = joined
        .into_iter()
        .filter(|(key, _)| !key.contains(HEADER_ARTIFACT))
        .collect();

    let removed = total - records.len();
    if removed > 0 {
        debug!("removed {removed} header-artifact row(s)");
    }
    info!("merged {} player(s) from {} table(s)", records.len(), tables.len());

    PlayerTable { records }
}
