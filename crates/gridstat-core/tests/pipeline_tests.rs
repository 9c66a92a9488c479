// Integration tests for the stat pipeline.
//
// These load the CSV fixtures through the public API, the same way the CLI
// does, and check that ingest, merge, scoring and comparison agree end to end.

use std::path::PathBuf;
use std::time::Duration;

use gridstat_core::config::{load_config_from, CONFIG_FILE};
use gridstat_core::ingest::loader::SourceSet;
use gridstat_core::ingest::table::CsvTableSource;
use gridstat_core::ingest::{Category, StatField};
use gridstat_core::merge::PlayerTable;
use gridstat_core::pipeline::{self, PipelineOutput};
use gridstat_core::query::{lookup_player, score_player, QueryError};
use gridstat_core::scoring::compare::leaderboard;
use gridstat_core::scoring::summary::{mean_by_position, top_players};
use gridstat_core::scoring::{compare_groups, compare_players, ScoringWeights, Starters};

// ===========================================================================
// Test helpers
// ===========================================================================

/// Fixture directory path (relative to the crate root, which is the cwd for
/// `cargo test`).
const FIXTURES: &str = "tests/fixtures";

fn fixture(category: Category) -> PathBuf {
    PathBuf::from(FIXTURES).join(format!("{}.csv", category.display_str()))
}

fn fixture_sources() -> SourceSet {
    Category::ALL.iter().fold(SourceSet::new(), |set, &c| {
        set.with(c, CsvTableSource::new(fixture(c)))
    })
}

async fn load_fixtures() -> PipelineOutput {
    pipeline::run(&fixture_sources(), Duration::from_secs(5)).await
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-6,
        "expected {expected}, got {actual}"
    );
}

fn players(table: &PlayerTable) -> Vec<&str> {
    table.keys().collect()
}

// ===========================================================================
// Ingest and merge
// ===========================================================================

#[tokio::test]
async fn merges_every_player_exactly_once() {
    let out = load_fixtures().await;
    assert_eq!(
        players(&out.table),
        vec![
            "AJ Brown",
            "Amon-Ra St Brown",
            "Derrick Henry",
            "Ja'Marr Chase",
            "Joe Burrow",
            "Josh Allen",
            "Lamar Jackson",
            "Saquon Barkley",
        ]
    );
}

#[tokio::test]
async fn header_rows_are_dropped() {
    let out = load_fixtures().await;
    assert!(out.table.keys().all(|k| !k.contains("Player")));

    // Both the passing and the receiving fixture repeat their header mid-table.
    assert!(out.report.is_clean(), "{:?}", out.report.warnings);
    assert!(out.table.find("Playe").is_none());
}

#[tokio::test]
async fn markup_rows_fold_into_one_record() {
    let out = load_fixtures().await;
    let henry = lookup_player(&out.table, "Derrick Henry").unwrap();

    // Games come from the first row of the block.
    assert_eq!(henry.games_for(Category::Rushing), Some(9.0));
    assert_eq!(henry.stat(StatField::RushAttempts), Some(325.0));
    assert_eq!(henry.stat(StatField::RushYards), Some(1921.0));
    assert_eq!(henry.stat(StatField::RushingTd), Some(16.0));
    assert_eq!(henry.stat(StatField::Receptions), Some(19.0));
    assert_eq!(henry.stat(StatField::TwoPointConversions), Some(2.0));
    assert_eq!(henry.stat(StatField::PassingYards), None);
    assert_eq!(
        henry.sources.iter().copied().collect::<Vec<_>>(),
        vec![
            Category::Receiving,
            Category::Rushing,
            Category::Conversions,
            Category::Fumbles,
        ]
    );
}

#[tokio::test]
async fn names_match_across_sources() {
    let out = load_fixtures().await;

    let chase = lookup_player(&out.table, "Ja'Marr Chase").unwrap();
    assert!(chase.sources.contains(&Category::Receiving));
    assert!(chase.sources.contains(&Category::Conversions));

    assert_eq!(
        lookup_player(&out.table, "A.J. Brown").unwrap().player,
        "AJ Brown"
    );
    assert_eq!(
        lookup_player(&out.table, "Amon-Ra St. Brown").unwrap().player,
        "Amon-Ra St Brown"
    );
}

#[tokio::test]
async fn missing_source_only_empties_its_category() {
    let sources = fixture_sources().with(
        Category::Receiving,
        CsvTableSource::new(PathBuf::from(FIXTURES).join("does_not_exist.csv")),
    );
    let out = pipeline::run(&sources, Duration::from_secs(5)).await;

    assert_eq!(out.report.unavailable(), vec![Category::Receiving]);

    // Receiving-only players are gone; everyone else is intact.
    assert!(out.table.find("Amon-Ra St Brown").is_none());
    assert!(out.table.find("AJ Brown").is_none());
    let chase = out.table.find("Ja'Marr Chase").unwrap();
    assert_eq!(chase.stat(StatField::Receptions), None);
    assert_eq!(chase.stat(StatField::TwoPointConversions), Some(1.0));
    assert_eq!(
        out.table.find("Derrick Henry").unwrap().stat(StatField::RushYards),
        Some(1921.0)
    );
}

// ===========================================================================
// Scoring and comparison
// ===========================================================================

#[tokio::test]
async fn scores_a_multi_source_player() {
    let out = load_fixtures().await;
    let score = score_player(&out.table, "Derrick Henry", &ScoringWeights::default()).unwrap();

    // 19 rec + 19.3 rec yds + 192.1 rush yds + 96 rush td + 4 two-pt - 2 fumble
    assert_close(score.total, 328.4);
    assert_eq!(score.games_played, 17.0);
    assert_close(score.per_game, 328.4 / 17.0);
}

#[tokio::test]
async fn passing_games_take_priority() {
    let out = load_fixtures().await;
    let score = score_player(&out.table, "Lamar Jackson", &ScoringWeights::default()).unwrap();
    assert_eq!(score.games_played, 17.0);
    assert_close(score.total, 438.38);
}

#[tokio::test]
async fn pairwise_comparison_statement() {
    let out = load_fixtures().await;
    let statements = compare_players(
        &out.table,
        &["Derrick Henry", "Ja'Marr Chase", "Nobody Atall"],
        &ScoringWeights::default(),
    )
    .unwrap();

    let lines: Vec<String> = statements.iter().map(ToString::to_string).collect();
    assert_eq!(
        lines,
        vec![
            "Ja'Marr Chase has a higher average than Derrick Henry (Score: 23.64 > 19.32)",
            "Could not compare Derrick Henry and Nobody Atall due to missing data.",
        ]
    );
}

#[tokio::test]
async fn comparison_needs_two_players() {
    let out = load_fixtures().await;
    let err = compare_players(&out.table, &["Josh Allen"], &ScoringWeights::default()).unwrap_err();
    assert_eq!(err, QueryError::InsufficientInput { got: 1 });
}

#[tokio::test]
async fn group_comparison_with_and_without_starters() {
    let out = load_fixtures().await;
    let weights = ScoringWeights::default();
    let mine = ["Lamar Jackson", "AJ Brown"];
    let rival = ["Josh Allen", "Saquon Barkley"];

    let plain = compare_groups(&out.table, &mine, &rival, &weights, None);
    assert_close(plain.group1_points, 438.38 / 17.0 + 216.9 / 14.0);
    assert_close(plain.group2_points, 364.34 / 17.0 + 274.5 / 16.0);
    assert!(plain.to_string().starts_with("Team 1 leads Team 2 by"));

    // AJ Brown's 15.49 halves to 7.75, below the bench threshold.
    let starters = Starters::new(["Lamar Jackson"], ["Josh Allen", "Saquon Barkley"]);
    let adjusted = compare_groups(&out.table, &mine, &rival, &weights, Some(&starters));
    assert_close(adjusted.group1_points, 438.38 / 17.0);
    assert_eq!(adjusted.leader(), Some(2));
    assert!(adjusted.to_string().starts_with("Group 2 leads Group 1 by"));
}

#[tokio::test]
async fn leaderboard_and_display_stats() {
    let out = load_fixtures().await;

    let leaders = leaderboard(&out.table, &ScoringWeights::default(), 3);
    let names: Vec<&str> = leaders.iter().map(|s| s.player.as_str()).collect();
    assert_eq!(names, vec!["Lamar Jackson", "Ja'Marr Chase", "Josh Allen"]);

    let top = top_players(&out.table, StatField::RushYards, 2).unwrap();
    assert_eq!(top.entries[0], ("Saquon Barkley".to_string(), 2005.0));
    assert_eq!(top.entries[1], ("Derrick Henry".to_string(), 1921.0));

    let means = mean_by_position(&out.table, StatField::Fumbles);
    assert_close(means["QB"], 3.0);
    assert_close(means["RB"], 1.5);
}

// ===========================================================================
// Config-driven run
// ===========================================================================

#[tokio::test]
async fn runs_from_config_file() {
    let fixtures = std::env::current_dir().unwrap().join(FIXTURES);
    let tmp = std::env::temp_dir().join("gridstat_pipeline_from_config");
    let _ = std::fs::remove_dir_all(&tmp);
    std::fs::create_dir_all(tmp.join("config")).unwrap();

    let mut text = String::from("[sources]\ntimeout_secs = 5\n");
    for category in Category::ALL {
        let path = fixtures.join(format!("{}.csv", category.display_str()));
        text.push_str(&format!("{} = {:?}\n", category.display_str(), path.display().to_string()));
    }
    std::fs::write(tmp.join("config").join(CONFIG_FILE), text).unwrap();

    let config = load_config_from(&tmp).unwrap();
    let out = pipeline::run_from_config(&config).await;
    assert_eq!(out.table.len(), 8);
    assert!(out.report.unavailable().is_empty());

    let _ = std::fs::remove_dir_all(&tmp);
}
