// Configuration loading and parsing (gridstat.toml).

use serde::Deserialize;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::ingest::normalize::canonical_key;
use crate::ingest::Category;
use crate::scoring::weights::ScoringWeights;

/// Name of the config file under `config/` (and `defaults/`).
pub const CONFIG_FILE: &str = "gridstat.toml";

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `config/` and `defaults/`. Relative source paths
    /// resolve against it.
    pub base_dir: PathBuf,
    pub sources: SourcesConfig,
    pub scoring: ScoringWeights,
    pub lineups: BTreeMap<String, Lineup>,
}

impl Config {
    /// Per-source fetch timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.sources.timeout_secs)
    }

    pub fn lineup(&self, name: &str) -> Option<&Lineup> {
        self.lineups.get(name)
    }
}

// ---------------------------------------------------------------------------
// gridstat.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire gridstat.toml file.
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    sources: SourcesConfig,
    /// When present, every weight key must be given.
    #[serde(default)]
    scoring: Option<ScoringWeights>,
    #[serde(default)]
    lineups: BTreeMap<String, Lineup>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    pub timeout_secs: u64,
    #[serde(flatten)]
    pub paths: SourcePaths,
}

/// Location of each category's CSV export.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcePaths {
    pub passing: String,
    pub receiving: String,
    pub rushing: String,
    pub conversions: String,
    pub fumbles: String,
}

impl SourcePaths {
    pub fn get(&self, category: Category) -> &str {
        match category {
            Category::Passing => &self.passing,
            Category::Receiving => &self.receiving,
            Category::Rushing => &self.rushing,
            Category::Conversions => &self.conversions,
            Category::Fumbles => &self.fumbles,
        }
    }
}

/// A named group of players, optionally with designated starters.
#[derive(Debug, Clone, Deserialize)]
pub struct Lineup {
    pub players: Vec<String>,
    #[serde(default)]
    pub starters: Vec<String>,
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate `config/gridstat.toml` relative to `base_dir`.
///
/// Does not seed from defaults; see [`load_config_in`].
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join(CONFIG_FILE);
    let text = read_file(&path)?;
    let file: ConfigFile = toml::from_str(&text).map_err(|e| ConfigError::ParseError {
        path: path.clone(),
        source: e,
    })?;

    let config = Config {
        base_dir: base_dir.to_path_buf(),
        sources: file.sources,
        scoring: file.scoring.unwrap_or_default(),
        lineups: file.lineups,
    };

    validate(&config)?;

    Ok(config)
}

/// Copy `defaults/gridstat.toml` to `config/gridstat.toml` unless the config
/// file already exists. Returns the path written, if any.
pub fn seed_config(base_dir: &Path) -> Result<Option<PathBuf>, ConfigError> {
    let target = base_dir.join("config").join(CONFIG_FILE);
    if target.exists() {
        return Ok(None);
    }

    let default = base_dir.join("defaults").join(CONFIG_FILE);
    if !default.is_file() {
        return Err(ConfigError::DefaultsCopyError {
            message: format!(
                "neither {} nor {} exists; run from the project root or pass --config-dir",
                target.display(),
                default.display()
            ),
        });
    }

    if let Some(dir) = target.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to create {}: {e}", dir.display()),
        })?;
    }
    std::fs::copy(&default, &target).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to copy {} to {}: {e}", default.display(), target.display()),
    })?;
    info!("created {} from defaults", target.display());

    Ok(Some(target))
}

/// Seed the config file from defaults when missing, then load it.
pub fn load_config_in(base_dir: &Path) -> Result<Config, ConfigError> {
    seed_config(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.sources.timeout_secs == 0 {
        return Err(ConfigError::ValidationError {
            field: "sources.timeout_secs".into(),
            message: "must be greater than 0".into(),
        });
    }

    for category in Category::ALL {
        if config.sources.paths.get(category).trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("sources.{}", category.display_str()),
                message: "path must not be empty".into(),
            });
        }
    }

    config.scoring.validate()?;

    for (name, lineup) in &config.lineups {
        if lineup.players.is_empty() {
            return Err(ConfigError::ValidationError {
                field: format!("lineups.{name}.players"),
                message: "must list at least one player".into(),
            });
        }
        let members: BTreeSet<String> = lineup.players.iter().map(|p| canonical_key(p)).collect();
        if let Some(stray) = lineup
            .starters
            .iter()
            .find(|s| !members.contains(&canonical_key(s)))
        {
            return Err(ConfigError::ValidationError {
                field: format!("lineups.{name}.starters"),
                message: format!("starter '{stray}' is not in the lineup's players"),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
