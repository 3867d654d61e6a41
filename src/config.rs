/// Generator configuration: tunable thresholds, loadable from RON.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::core::excerpt::{DEFAULT_CHAR_LIMIT, SENTENCE_STOPS};
use crate::core::markov::StartFilter;
use crate::core::validator::DEFAULT_MIN_LENGTH;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("RON deserialization error: {0}")]
    Ron(#[from] ron::error::SpannedError),
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings for one bot run. Every field has a default, so a config file
/// only needs the values it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Name of the bot; the activity log is `<log_dir>/<bot_name>.log`.
    pub bot_name: String,
    /// Number of double steps taken after the starting pair.
    pub min_words: usize,
    /// Character budget for an excerpt.
    pub char_limit: usize,
    /// Shortest acceptable excerpt, in chars.
    pub min_length: usize,
    /// Generate/extract/validate attempts before giving up.
    pub max_attempts: u32,
    pub sentence_stops: Vec<char>,
    pub start_filter: StartFilter,
    /// RNG seed; `None` seeds from OS entropy.
    pub seed: Option<u64>,
    pub log_dir: Option<PathBuf>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            bot_name: "ebooks".to_string(),
            min_words: 30,
            char_limit: DEFAULT_CHAR_LIMIT,
            min_length: DEFAULT_MIN_LENGTH,
            max_attempts: 1000,
            sentence_stops: SENTENCE_STOPS.to_vec(),
            start_filter: StartFilter::default(),
            seed: None,
            log_dir: None,
        }
    }
}

impl GeneratorConfig {
    pub fn parse_ron(input: &str) -> Result<GeneratorConfig, ConfigError> {
        let config: GeneratorConfig = ron::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_ron(path: &Path) -> Result<GeneratorConfig, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::parse_ron(&contents)?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.bot_name.trim().is_empty() {
            return Err(ConfigError::Invalid("bot_name must not be empty".to_string()));
        }
        if self.char_limit == 0 {
            return Err(ConfigError::Invalid("char_limit must be positive".to_string()));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::Invalid("max_attempts must be positive".to_string()));
        }
        if self.sentence_stops.is_empty() {
            return Err(ConfigError::Invalid(
                "sentence_stops must name at least one character".to_string(),
            ));
        }
        Ok(())
    }

    /// Path of the activity log, when a log directory is configured.
    pub fn log_path(&self) -> Option<PathBuf> {
        self.log_dir
            .as_ref()
            .map(|dir| dir.join(format!("{}.log", self.bot_name)))
    }
}
