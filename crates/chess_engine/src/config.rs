// Search configuration bundle.
//
// Field names serialize in camelCase so the bundle can be handed over as
// JSON by whatever layer owns difficulty settings. Missing fields take their
// defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Malformed search configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid search configuration: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchConfig {
    /// Base iterative-deepening target depth in plies.
    pub depth: u8,
    pub time_limit_ms: u64,
    /// Maximum number of transposition entries kept before FIFO eviction.
    pub transposition_table_size: usize,
    pub extensions: ExtensionConfig,
    pub creativity: CreativityConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            depth: 3,
            time_limit_ms: 2000,
            transposition_table_size: 100_000,
            extensions: ExtensionConfig::default(),
            creativity: CreativityConfig::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExtensionConfig {
    pub capture_depth_bonus: u8,
    pub check_depth_bonus: u8,
    /// Captures plus promotions at the root needed to count as tactical.
    pub tactical_move_threshold: usize,
    /// Ceiling for the extended depth.
    pub max_depth: u8,
    pub time_bonus_ms: u64,
    /// Root branching factor that earns extra think time.
    pub branching_threshold: usize,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            capture_depth_bonus: 1,
            check_depth_bonus: 1,
            tactical_move_threshold: 4,
            max_depth: 5,
            time_bonus_ms: 500,
            branching_threshold: 35,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreativityConfig {
    pub enabled: bool,
    /// Largest score deficit from the best move a candidate may have.
    pub threshold_centipawns: i32,
    /// Amplitude of the uniform noise added to each candidate weight.
    pub variability_centipawns: i32,
    /// How many of the closest candidates are considered. 0 means no cap.
    pub candidate_count: usize,
    /// Weight multiplier added per exciting trait (capture, promotion, castle, check).
    pub excitement_bonus: f64,
}

impl Default for CreativityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            threshold_centipawns: 25,
            variability_centipawns: 10,
            candidate_count: 3,
            excitement_bonus: 0.3,
        }
    }
}

impl SearchConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SearchConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.depth == 0 {
            return Err(ConfigError::Invalid("depth must be at least 1".to_string()));
        }
        if self.creativity.threshold_centipawns < 0 || self.creativity.variability_centipawns < 0 {
            return Err(ConfigError::Invalid(
                "creativity margins must not be negative".to_string(),
            ));
        }
        if !self.creativity.excitement_bonus.is_finite() || self.creativity.excitement_bonus < 0.0 {
            return Err(ConfigError::Invalid(
                "excitementBonus must be a non-negative number".to_string(),
            ));
        }
        Ok(())
    }

    pub fn with_depth(mut self, depth: u8) -> Self {
        self.depth = depth;
        self
    }

    pub fn with_time_limit_ms(mut self, time_limit_ms: u64) -> Self {
        self.time_limit_ms = time_limit_ms;
        self
    }

    /// Depth that iterative deepening stops at when no extension applies.
    pub fn extension_ceiling(&self) -> u8 {
        self.extensions.max_depth.max(self.depth)
    }
}
