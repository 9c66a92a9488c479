// Fantasy scoring weights.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::ingest::StatField;

/// Per-unit point value of each scored stat.
///
/// When deserialized from config every key is required and unknown keys are
/// rejected; `Default` gives the standard league values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringWeights {
    pub sack: f64,
    pub reception: f64,
    pub fumble: f64,
    pub interception: f64,
    pub rushing_yard: f64,
    pub passing_yard: f64,
    pub receiving_yard: f64,
    pub passing_td: f64,
    pub receiving_td: f64,
    pub rushing_td: f64,
    pub two_point_conversion: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            sack: 0.0,
            reception: 1.0,
            fumble: -2.0,
            interception: -2.0,
            rushing_yard: 0.1,
            passing_yard: 0.04,
            receiving_yard: 0.1,
            passing_td: 4.0,
            receiving_td: 6.0,
            rushing_td: 6.0,
            two_point_conversion: 2.0,
        }
    }
}

/// Weight key and the stat it multiplies, in scoring order.
pub const WEIGHT_KEYS: [(&str, StatField); 11] = [
    ("sack", StatField::Sacks),
    ("reception", StatField::Receptions),
    ("fumble", StatField::Fumbles),
    ("interception", StatField::Interceptions),
    ("rushing_yard", StatField::RushYards),
    ("passing_yard", StatField::PassingYards),
    ("receiving_yard", StatField::ReceivingYards),
    ("passing_td", StatField::PassingTd),
    ("receiving_td", StatField::ReceivingTd),
    ("rushing_td", StatField::RushingTd),
    ("two_point_conversion", StatField::TwoPointConversions),
];

impl ScoringWeights {
    /// Weight applied to a stat, or `None` for stats that are not scored.
    pub fn weight_for(&self, field: StatField) -> Option<f64> {
        match field {
            StatField::Sacks => Some(self.sack),
            StatField::Receptions => Some(self.reception),
            StatField::Fumbles => Some(self.fumble),
            StatField::Interceptions => Some(self.interception),
            StatField::RushYards => Some(self.rushing_yard),
            StatField::PassingYards => Some(self.passing_yard),
            StatField::ReceivingYards => Some(self.receiving_yard),
            StatField::PassingTd => Some(self.passing_td),
            StatField::ReceivingTd => Some(self.receiving_td),
            StatField::RushingTd => Some(self.rushing_td),
            StatField::TwoPointConversions => Some(self.two_point_conversion),
            StatField::RushAttempts => None,
        }
    }

    fn slot_mut(&mut self, key: &str) -> Option<&mut f64> {
        match key {
            "sack" => Some(&mut self.sack),
            "reception" => Some(&mut self.reception),
            "fumble" => Some(&mut self.fumble),
            "interception" => Some(&mut self.interception),
            "rushing_yard" => Some(&mut self.rushing_yard),
            "passing_yard" => Some(&mut self.passing_yard),
            "receiving_yard" => Some(&mut self.receiving_yard),
            "passing_td" => Some(&mut self.passing_td),
            "receiving_td" => Some(&mut self.receiving_td),
            "rushing_td" => Some(&mut self.rushing_td),
            "two_point_conversion" => Some(&mut self.two_point_conversion),
            _ => None,
        }
    }

    /// Build weights from a loosely-typed map. All eleven keys must be
    /// present, no others are allowed, and every value must be finite.
    pub fn from_map(map: &HashMap<String, f64>) -> Result<Self, ConfigError> {
        let mut weights = Self::default();
        for (key, _) in WEIGHT_KEYS {
            if !map.contains_key(key) {
                return Err(ConfigError::ValidationError {
                    field: format!("scoring.{key}"),
                    message: "missing scoring weight".into(),
                });
            }
        }
        for (key, value) in map {
            let slot = weights
                .slot_mut(key)
                .ok_or_else(|| ConfigError::ValidationError {
                    field: format!("scoring.{key}"),
                    message: "unknown scoring weight".into(),
                })?;
            *slot = *value;
        }
        weights.validate()?;
        Ok(weights)
    }

    /// Replace a single weight, e.g. from a command-line override.
    pub fn with_override(mut self, key: &str, value: f64) -> Result<Self, ConfigError> {
        let slot = self
            .slot_mut(key)
            .ok_or_else(|| ConfigError::ValidationError {
                field: format!("scoring.{key}"),
                message: "unknown scoring weight".into(),
            })?;
        *slot = value;
        self.validate()?;
        Ok(self)
    }

    /// Every weight must be a finite number. Negative weights are allowed
    /// (turnovers cost points).
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (key, field) in WEIGHT_KEYS {
            let value = self.weight_for(field).unwrap_or(0.0);
            if !value.is_finite() {
                return Err(ConfigError::ValidationError {
                    field: format!("scoring.{key}"),
                    message: format!("must be a finite number, got {value}"),
                });
            }
        }
        Ok(())
    }
}
