// Plain-text rendering of query results.

use std::collections::BTreeMap;
use std::fmt::Write;

use gridstat_core::ingest::{IngestReport, StatField};
use gridstat_core::merge::CanonicalPlayerRecord;
use gridstat_core::scoring::summary::{StatSummary, TopPlayers};
use gridstat_core::scoring::PlayerScore;

pub fn record(r: &CanonicalPlayerRecord) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", r.player);
    if let Some(pos) = r.position() {
        let _ = writeln!(out, "  Position: {pos}");
    }
    let sources: Vec<&str> = r.sources.iter().map(|c| c.display_str()).collect();
    let _ = writeln!(out, "  Sources: {}", sources.join(", "));
    for (category, games) in &r.games {
        let _ = writeln!(out, "  Games ({category}): {games}");
    }
    for field in StatField::ALL {
        if let Some(value) = r.stat(field) {
            let _ = writeln!(out, "  {}: {value}", field.label());
        }
    }
    out
}

pub fn score(s: &PlayerScore) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{}: {:.2} points over {} game(s), {:.2} per game",
        s.player, s.total, s.games_played, s.per_game
    );
    for (field, points) in &s.contributions {
        if *points != 0.0 {
            let _ = writeln!(out, "  {:<16} {points:>8.2}", field.label());
        }
    }
    if !s.missing.is_empty() {
        let missing: Vec<&str> = s.missing.iter().map(|f| f.label()).collect();
        let _ = writeln!(out, "  no data (counted as 0): {}", missing.join(", "));
    }
    out
}

pub fn leaders(scores: &[PlayerScore]) -> String {
    let mut out = String::new();
    for (i, s) in scores.iter().enumerate() {
        let _ = writeln!(out, "{:>3}. {:<28} {:>7.2}", i + 1, s.player, s.per_game);
    }
    out
}

pub fn summary(field: StatField, s: &StatSummary) -> String {
    format!(
        "{}: count {}, mean {:.2}, median {:.2}, range {:.2}\n",
        field.label(),
        s.count,
        s.mean,
        s.median,
        s.range
    )
}

pub fn values(values: &[(String, f64)]) -> String {
    let mut out = String::new();
    for (player, value) in values {
        let _ = writeln!(out, "  {player:<28} {value:>8.2}");
    }
    out
}

pub fn top(top: &TopPlayers) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Top {} by {}:", top.entries.len(), top.field.label());
    out.push_str(&values(&top.entries));
    let _ = writeln!(
        out,
        "  mean {:.2}, median {:.2}",
        top.summary.mean, top.summary.median
    );
    out
}

pub fn position_means(field: StatField, means: &BTreeMap<String, f64>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Mean {} by position:", field.label());
    for (pos, mean) in means {
        let _ = writeln!(out, "  {pos:<4} {mean:>8.2}");
    }
    out
}

/// One line per warning, for stderr.
pub fn warnings(report: &IngestReport) -> Vec<String> {
    report
        .warnings
        .iter()
        .map(|w| format!("warning: {w}"))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gridstat_core::ingest::{Category, IngestWarning};
    use gridstat_core::scoring::{score as score_record, ScoringWeights};

    fn receiver() -> CanonicalPlayerRecord {
        let mut r = CanonicalPlayerRecord::new("A");
        r.sources.insert(Category::Receiving);
        r.games.insert(Category::Receiving, 2.0);
        r.stats.insert(StatField::Receptions, 10.0);
        r.stats.insert(StatField::ReceivingYards, 100.0);
        r.stats.insert(StatField::ReceivingTd, 1.0);
        r
    }

    #[test]
    fn score_shows_total_and_average() {
        let text = score(&score_record(&receiver(), &ScoringWeights::default()));
        assert!(text.starts_with("A: 26.00 points over 2 game(s), 13.00 per game"));
        assert!(text.contains("Receiving TD"));
        assert!(text.contains("no data (counted as 0)"));
    }

    #[test]
    fn record_lists_present_stats() {
        let text = record(&receiver());
        assert!(text.contains("Sources: receiving"));
        assert!(text.contains("Rec: 10"));
        assert!(!text.contains("Passing Yards"));
    }

    #[test]
    fn warnings_are_prefixed() {
        let mut report = IngestReport::default();
        report.push(IngestWarning::SourceUnavailable {
            category: Category::Rushing,
            reason: "timed out".into(),
        });
        assert_eq!(
            warnings(&report),
            vec!["warning: rushing source unavailable: timed out"]
        );
    }
}
