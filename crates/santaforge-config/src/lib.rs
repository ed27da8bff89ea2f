//! Configuration system for SantaForge.
//!
//! Load draw configuration from TOML or YAML to tune retry budgets, the
//! matching algorithm and reproducibility without code changes.
//!
//! # Examples
//!
//! Load configuration from TOML string:
//!
//! ```
//! use santaforge_config::{DrawConfig, MatchingAlgorithm};
//!
//! let config = DrawConfig::from_toml_str(r#"
//!     random_seed = 7
//!     shuffle_attempts = 50
//!     matching_algorithm = "kuhn"
//!
//!     [limits]
//!     min_participants = 4
//! "#).unwrap();
//!
//! assert_eq!(config.random_seed, Some(7));
//! assert_eq!(config.shuffle_attempts, 50);
//! assert_eq!(config.search_attempts, 100);
//! assert_eq!(config.matching_algorithm, MatchingAlgorithm::Kuhn);
//! assert_eq!(config.limits.min_participants, 4);
//! ```
//!
//! Use default config when file is missing:
//!
//! ```
//! use santaforge_config::DrawConfig;
//!
//! let config = DrawConfig::load("draw.toml").unwrap_or_default();
//! assert_eq!(config.shuffle_attempts, 100);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use santaforge_core::SantaForgeError;

/// Default number of randomized trials per strategy.
pub const DEFAULT_ATTEMPTS: usize = 100;

/// Smallest group for which exclusions are supported.
pub const DEFAULT_MIN_PARTICIPANTS: usize = 3;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl From<ConfigError> for SantaForgeError {
    fn from(err: ConfigError) -> Self {
        SantaForgeError::Config(err.to_string())
    }
}

/// Main draw configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DrawConfig {
    /// Random seed for reproducible draws.
    #[serde(default)]
    pub random_seed: Option<u64>,

    /// Full-shuffle trials before the cyclic fallback.
    #[serde(default = "default_attempts")]
    pub shuffle_attempts: usize,

    /// Randomized constructions before the matching fallback.
    #[serde(default = "default_attempts")]
    pub search_attempts: usize,

    /// Algorithm used to decide feasibility.
    #[serde(default)]
    pub matching_algorithm: MatchingAlgorithm,

    /// Exclusion limit configuration.
    #[serde(default)]
    pub limits: LimitsConfig,
}

fn default_attempts() -> usize {
    DEFAULT_ATTEMPTS
}

impl Default for DrawConfig {
    fn default() -> Self {
        Self {
            random_seed: None,
            shuffle_attempts: DEFAULT_ATTEMPTS,
            search_attempts: DEFAULT_ATTEMPTS,
            matching_algorithm: MatchingAlgorithm::default(),
            limits: LimitsConfig::default(),
        }
    }
}

impl DrawConfig {
    /// Creates a new default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if file doesn't exist, contains invalid TOML, or fails
    /// [`validate`](Self::validate).
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every retry budget allows at least one attempt.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.shuffle_attempts == 0 {
            return Err(ConfigError::Invalid(
                "shuffle_attempts must be at least 1".to_string(),
            ));
        }
        if self.search_attempts == 0 {
            return Err(ConfigError::Invalid(
                "search_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Sets the random seed.
    pub fn with_random_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Sets the number of full-shuffle trials.
    pub fn with_shuffle_attempts(mut self, attempts: usize) -> Self {
        self.shuffle_attempts = attempts;
        self
    }

    /// Sets the number of randomized constructions.
    pub fn with_search_attempts(mut self, attempts: usize) -> Self {
        self.search_attempts = attempts;
        self
    }

    /// Sets the feasibility matching algorithm.
    pub fn with_matching_algorithm(mut self, algorithm: MatchingAlgorithm) -> Self {
        self.matching_algorithm = algorithm;
        self
    }

    /// Sets the minimum group size for exclusions.
    pub fn with_min_participants(mut self, min: usize) -> Self {
        self.limits.min_participants = min;
        self
    }
}

/// Maximum bipartite matching algorithm.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchingAlgorithm {
    /// Phased shortest augmenting paths, O(E·√V).
    #[default]
    HopcroftKarp,

    /// One augmenting DFS per giver, O(V·E).
    Kuhn,
}

/// Exclusion limit configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LimitsConfig {
    /// Groups smaller than this cannot have exclusions at all.
    #[serde(default = "default_min_participants")]
    pub min_participants: usize,
}

fn default_min_participants() -> usize {
    DEFAULT_MIN_PARTICIPANTS
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            min_participants: DEFAULT_MIN_PARTICIPANTS,
        }
    }
}
