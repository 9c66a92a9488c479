// Descriptive statistics over one stat column, for display.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::ingest::StatField;
use crate::merge::PlayerTable;

/// Count, mean, median and range of a set of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatSummary {
    pub count: usize,
    pub mean: f64,
    pub median: f64,
    pub range: f64,
}

/// Summarize a slice of values. Returns `None` for an empty slice.
pub fn summarize(values: &[f64]) -> Option<StatSummary> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let median = if n % 2 == 0 {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    } else {
        sorted[n / 2]
    };
    Some(StatSummary {
        count: n,
        mean,
        median,
        range: sorted[n - 1] - sorted[0],
    })
}

/// Every non-null value of a column, with its player.
pub fn column_values(table: &PlayerTable, field: StatField) -> Vec<(&str, f64)> {
    table
        .iter()
        .filter_map(|r| r.stat(field).map(|v| (r.player.as_str(), v)))
        .collect()
}

pub fn summarize_column(table: &PlayerTable, field: StatField) -> Option<StatSummary> {
    let values: Vec<f64> = column_values(table, field).iter().map(|(_, v)| *v).collect();
    summarize(&values)
}

/// The leaders of one column and a summary of just those leaders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TopPlayers {
    pub field: StatField,
    pub entries: Vec<(String, f64)>,
    pub summary: StatSummary,
}

/// The `n` players with the highest positive values in a column. Returns
/// `None` when no player has a positive value.
pub fn top_players(table: &PlayerTable, field: StatField, n: usize) -> Option<TopPlayers> {
    let mut entries: Vec<(String, f64)> = column_values(table, field)
        .into_iter()
        .filter(|(_, v)| *v > 0.0)
        .map(|(p, v)| (p.to_string(), v))
        .collect();
    entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
    entries.truncate(n);

    let values: Vec<f64> = entries.iter().map(|(_, v)| *v).collect();
    let summary = summarize(&values)?;
    Some(TopPlayers {
        field,
        entries,
        summary,
    })
}

/// Values of one column for the named players. Players that are unknown or
/// have no value are left out.
pub fn stat_for_players<S: AsRef<str>>(
    table: &PlayerTable,
    field: StatField,
    names: &[S],
) -> Vec<(String, f64)> {
    names
        .iter()
        .filter_map(|name| table.find(name.as_ref()))
        .filter_map(|r| r.stat(field).map(|v| (r.player.clone(), v)))
        .collect()
}

/// Mean of a column per reported position. Players without a position or
/// without a value are skipped.
pub fn mean_by_position(table: &PlayerTable, field: StatField) -> BTreeMap<String, f64> {
    let mut sums: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for record in table.iter() {
        let (Some(pos), Some(value)) = (record.position(), record.stat(field)) else {
            continue;
        };
        let entry = sums.entry(pos.to_string()).or_insert((0.0, 0));
        entry.0 += value;
        entry.1 += 1;
    }
    sums.into_iter()
        .map(|(pos, (sum, count))| (pos, sum / count as f64))
        .collect()
}
