// gridstat: command-line front end for the stat pipeline.
//
// Startup sequence:
// 1. Initialize tracing (stderr)
// 2. Load config (seeding config/ from defaults/ when needed)
// 3. Apply scoring weight overrides
// 4. Fetch, adapt and merge the five sources
// 5. Run the requested query

mod cli;
mod output;

use anyhow::{bail, Context};
use clap::Parser;
use serde::Serialize;
use tracing::warn;

use cli::{Cli, Commands};
use gridstat_core::config::{self, Config};
use gridstat_core::merge::PlayerTable;
use gridstat_core::pipeline;
use gridstat_core::query::{lookup_player, score_player};
use gridstat_core::scoring::compare::leaderboard;
use gridstat_core::scoring::summary::{mean_by_position, stat_for_players, summarize_column, top_players};
use gridstat_core::scoring::{compare_groups, compare_players, ScoringWeights, Starters};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Initialize tracing
    init_tracing()?;

    // 2. Load config
    let base_dir = match &cli.config_dir {
        Some(dir) => dir.clone(),
        None => std::env::current_dir().context("failed to determine working directory")?,
    };
    let config = config::load_config_in(&base_dir).context("failed to load configuration")?;

    // 3. Scoring weights
    let weights = apply_overrides(config.scoring, &cli.weights)?;

    // 4. Pipeline
    let out = pipeline::run_from_config(&config).await;
    for line in output::warnings(&out.report) {
        eprintln!("{line}");
    }
    if out.table.is_empty() {
        warn!("no player data loaded; check the [sources] paths in the config");
    }

    // 5. Query
    run_command(&cli, &config, &out.table, &weights)
}

fn apply_overrides(
    base: ScoringWeights,
    overrides: &[(String, f64)],
) -> anyhow::Result<ScoringWeights> {
    overrides.iter().try_fold(base, |weights, (key, value)| {
        weights
            .with_override(key, *value)
            .with_context(|| format!("invalid --weight {key}={value}"))
    })
}

fn run_command(
    cli: &Cli,
    config: &Config,
    table: &PlayerTable,
    weights: &ScoringWeights,
) -> anyhow::Result<()> {
    match &cli.command {
        Commands::Lookup { name } => {
            let record = lookup_player(table, name)?;
            emit(cli.json, record, || output::record(record))
        }
        Commands::Score { names } => {
            let scores = names
                .iter()
                .map(|name| score_player(table, name, weights))
                .collect::<Result<Vec<_>, _>>()?;
            emit(cli.json, &scores, || {
                scores.iter().map(output::score).collect::<String>()
            })
        }
        Commands::Compare { names } => {
            let statements = compare_players(table, names, weights)?;
            let lines: Vec<String> = statements.iter().map(ToString::to_string).collect();
            emit(cli.json, &lines, || {
                lines.iter().map(|l| format!("{l}\n")).collect::<String>()
            })
        }
        Commands::Groups {
            group1,
            group2,
            lineup1,
            lineup2,
            starters1,
            starters2,
            with_starters,
        } => {
            let (players1, lineup_starters1) = resolve_group(config, "1", group1, lineup1.as_deref())?;
            let (players2, lineup_starters2) = resolve_group(config, "2", group2, lineup2.as_deref())?;

            let use_starters = *with_starters || !starters1.is_empty() || !starters2.is_empty();
            let starters = use_starters.then(|| {
                let s1 = if starters1.is_empty() { &lineup_starters1 } else { starters1 };
                let s2 = if starters2.is_empty() { &lineup_starters2 } else { starters2 };
                Starters::new(s1, s2)
            });

            let result = compare_groups(table, &players1, &players2, weights, starters.as_ref());
            #[derive(Serialize)]
            struct GroupsJson {
                group1_points: f64,
                group2_points: f64,
                with_starters: bool,
                message: String,
            }
            let json = GroupsJson {
                group1_points: result.group1_points,
                group2_points: result.group2_points,
                with_starters: result.with_starters,
                message: result.to_string(),
            };
            emit(cli.json, &json, || format!("{result}\n"))
        }
        Commands::Summary {
            stat,
            players,
            by_position,
        } => {
            if !players.is_empty() {
                let values = stat_for_players(table, *stat, players);
                return emit(cli.json, &values, || output::values(&values));
            }
            let Some(summary) = summarize_column(table, *stat) else {
                bail!("no values for {stat}; is the {} source loaded?", stat.category());
            };
            if *by_position {
                let means = mean_by_position(table, *stat);
                return emit(cli.json, &means, || {
                    output::summary(*stat, &summary) + &output::position_means(*stat, &means)
                });
            }
            emit(cli.json, &summary, || output::summary(*stat, &summary))
        }
        Commands::Top { stat, count } => {
            let Some(top) = top_players(table, *stat, *count) else {
                bail!(
                    "no player has a positive value for {stat} in the {} source",
                    stat.category()
                );
            };
            emit(cli.json, &top, || output::top(&top))
        }
        Commands::Leaders { count } => {
            let scores = leaderboard(table, weights, *count);
            emit(cli.json, &scores, || output::leaders(&scores))
        }
    }
}

/// Players of one group, plus the lineup's starters when it came from config.
fn resolve_group(
    config: &Config,
    label: &str,
    listed: &[String],
    lineup: Option<&str>,
) -> anyhow::Result<(Vec<String>, Vec<String>)> {
    let resolved = match lineup {
        Some(name) => {
            let Some(lineup) = config.lineup(name) else {
                bail!("no lineup named '{name}' in config");
            };
            (lineup.players.clone(), lineup.starters.clone())
        }
        None => (listed.to_vec(), Vec::new()),
    };
    if resolved.0.is_empty() {
        bail!("group {label} is empty; pass --group{label} or --lineup{label}");
    }
    Ok(resolved)
}

fn emit<T: Serialize + ?Sized>(
    json: bool,
    value: &T,
    text: impl FnOnce() -> String,
) -> anyhow::Result<()> {
    if json {
        let rendered = serde_json::to_string_pretty(value).context("failed to serialize output")?;
        println!("{rendered}");
    } else {
        print!("{}", text());
    }
    Ok(())
}

/// Initialize tracing to stderr so query output on stdout stays clean.
fn init_tracing() -> anyhow::Result<()> {
    use std::io::IsTerminal;
    use tracing_subscriber::fmt;
    use tracing_subscriber::EnvFilter;

    let subscriber = fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("gridstat=info,warn")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .context("failed to set tracing subscriber")?;

    Ok(())
}
