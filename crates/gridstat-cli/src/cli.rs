// Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use gridstat_core::ingest::StatField;

#[derive(Parser, Debug)]
#[command(name = "gridstat")]
#[command(
    version,
    about = "Merge fantasy football stat exports and score, rank and compare players"
)]
pub struct Cli {
    /// Directory containing config/ and defaults/ (default: current directory)
    #[arg(long, global = true, env = "GRIDSTAT_CONFIG_DIR")]
    pub config_dir: Option<PathBuf>,

    /// Override a scoring weight, e.g. --weight reception=0.5 (repeatable)
    #[arg(long = "weight", global = true, value_parser = parse_weight)]
    pub weights: Vec<(String, f64)>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show a player's merged record
    Lookup {
        /// Player name
        name: String,
    },

    /// Score one or more players
    Score {
        /// Player names
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Rank players by average points and compare neighbours
    Compare {
        /// Player names (at least two)
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Compare the total points of two groups of players
    #[command(after_help = "\
Examples:
  gridstat groups --group1 \"Josh Allen,Derrick Henry\" --group2 \"Lamar Jackson,Saquon Barkley\"
  gridstat groups --lineup1 mine --lineup2 rival --with-starters")]
    Groups {
        /// Comma-separated players of group 1
        #[arg(long, value_delimiter = ',', conflicts_with = "lineup1")]
        group1: Vec<String>,

        /// Comma-separated players of group 2
        #[arg(long, value_delimiter = ',', conflicts_with = "lineup2")]
        group2: Vec<String>,

        /// Use a lineup from the config as group 1
        #[arg(long)]
        lineup1: Option<String>,

        /// Use a lineup from the config as group 2
        #[arg(long)]
        lineup2: Option<String>,

        /// Starters of group 1; everyone else gets the bench adjustment
        #[arg(long, value_delimiter = ',')]
        starters1: Vec<String>,

        /// Starters of group 2; everyone else gets the bench adjustment
        #[arg(long, value_delimiter = ',')]
        starters2: Vec<String>,

        /// Apply the bench adjustment using the lineups' configured starters
        #[arg(long)]
        with_starters: bool,
    },

    /// Count, mean, median and range of a stat column
    Summary {
        /// Stat column, e.g. "Rush Yards" or rush_yards
        #[arg(value_parser = parse_stat)]
        stat: StatField,

        /// Only show values for these players (comma-separated)
        #[arg(long, value_delimiter = ',')]
        players: Vec<String>,

        /// Also show the mean per position
        #[arg(long)]
        by_position: bool,
    },

    /// Players with the highest values of a stat column
    Top {
        /// Stat column, e.g. "Receiving TD" or receiving_td
        #[arg(value_parser = parse_stat)]
        stat: StatField,

        /// Number of players
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },

    /// Players with the highest average fantasy points
    Leaders {
        /// Number of players
        #[arg(short = 'n', long, default_value = "10")]
        count: usize,
    },
}

fn parse_stat(s: &str) -> Result<StatField, String> {
    StatField::from_label(s).ok_or_else(|| {
        let known: Vec<&str> = StatField::ALL.iter().map(|f| f.label()).collect();
        format!("unknown stat '{s}'; expected one of: {}", known.join(", "))
    })
}

fn parse_weight(s: &str) -> Result<(String, f64), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{s}'"))?;
    let value: f64 = value
        .trim()
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    Ok((key.trim().to_string(), value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "gridstat",
            "compare",
            "Josh Allen",
            "Lamar Jackson",
            "--json",
            "--weight",
            "passing_td=6",
        ])
        .unwrap();
        assert!(cli.json);
        assert_eq!(cli.weights, vec![("passing_td".to_string(), 6.0)]);
        match cli.command {
            Commands::Compare { names } => assert_eq!(names.len(), 2),
            other => panic!("expected Compare, got: {other:?}"),
        }
    }

    #[test]
    fn groups_split_on_commas() {
        let cli = Cli::try_parse_from([
            "gridstat",
            "groups",
            "--group1",
            "A,B",
            "--group2",
            "C",
            "--starters1",
            "A",
        ])
        .unwrap();
        match cli.command {
            Commands::Groups {
                group1,
                group2,
                starters1,
                starters2,
                ..
            } => {
                assert_eq!(group1, vec!["A", "B"]);
                assert_eq!(group2, vec!["C"]);
                assert_eq!(starters1, vec!["A"]);
                assert!(starters2.is_empty());
            }
            other => panic!("expected Groups, got: {other:?}"),
        }
    }

    #[test]
    fn group_list_conflicts_with_lineup() {
        let res = Cli::try_parse_from(["gridstat", "groups", "--group1", "A", "--lineup1", "mine"]);
        assert!(res.is_err());
    }

    #[test]
    fn stat_names_accept_labels_and_snake_case() {
        assert_eq!(parse_stat("Rush Yards"), Ok(StatField::RushYards));
        assert_eq!(parse_stat("rush_yards"), Ok(StatField::RushYards));
        assert!(parse_stat("punts").is_err());
    }

    #[test]
    fn weight_override_syntax() {
        assert_eq!(parse_weight("reception = 0.5"), Ok(("reception".into(), 0.5)));
        assert!(parse_weight("reception").is_err());
        assert!(parse_weight("reception=lots").is_err());
    }
}
