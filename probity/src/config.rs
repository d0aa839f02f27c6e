//! Configuration types for trial counts and generation parameters.

use thiserror::Error;

use crate::primitives::Alphabet;

/// Trial count used when nothing else is configured.
pub const DEFAULT_MAX_COUNT: usize = 100;

/// Size budget handed to synthesis at the top level of each draw.
pub const DEFAULT_SIZE: usize = 50;

/// Environment variable overriding [`GlobalConfig::default_max_count`].
pub const MAX_COUNT_ENV: &str = "PROBITY_CHECKS";

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("invalid max count (must be > 0)")]
    InvalidMaxCount,

    #[error("invalid max count scale: {0} (must be finite and > 0)")]
    InvalidScale(f64),

    #[error("alphabet must contain at least one character")]
    EmptyAlphabet,

    #[error("invalid value {value:?} for {variable}: expected a positive integer")]
    InvalidEnvValue {
        variable: &'static str,
        value: String,
    },
}

/// Configuration for synthesized values
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Budget bounding the branching of one synthesized value
    pub size: usize,
    /// Characters used for synthesized `char` and `String` values
    pub alphabet: Alphabet,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            alphabet: Alphabet::default(),
        }
    }
}

impl GeneratorConfig {
    pub fn new(size: usize, alphabet: Alphabet) -> Self {
        Self { size, alphabet }
    }

    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    pub fn with_alphabet(mut self, alphabet: Alphabet) -> Self {
        self.alphabet = alphabet;
        self
    }
}

/// Global defaults shared by every check of a session
#[derive(Debug, Clone, PartialEq)]
pub struct GlobalConfig {
    /// Default number of trials per check
    pub default_max_count: usize,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            default_max_count: DEFAULT_MAX_COUNT,
        }
    }
}

impl GlobalConfig {
    /// Create a new global configuration with validation
    pub fn new(default_max_count: usize) -> Result<Self, ConfigError> {
        let config = Self { default_max_count };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_max_count == 0 {
            return Err(ConfigError::InvalidMaxCount);
        }
        Ok(())
    }

    /// Defaults with the trial count read from `PROBITY_CHECKS`, when set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_value(std::env::var(MAX_COUNT_ENV).ok().as_deref())
    }

    fn from_env_value(value: Option<&str>) -> Result<Self, ConfigError> {
        let Some(raw) = value else {
            return Ok(Self::default());
        };

        let invalid = || ConfigError::InvalidEnvValue {
            variable: MAX_COUNT_ENV,
            value: raw.to_string(),
        };
        let count = raw.trim().parse::<usize>().map_err(|_| invalid())?;
        Self::new(count).map_err(|_| invalid())
    }
}

/// Per-check overrides
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckConfig {
    /// Exact number of trials, taking precedence over the scale
    pub max_count: Option<usize>,
    /// Multiplier applied to the global default trial count.
    ///
    /// The scaled count is rounded to the nearest integer and never drops below one
    /// trial, so a small scale still runs the property at least once.
    pub max_count_scale: Option<f64>,
    /// Seed for replaying a run while debugging
    pub seed: Option<u64>,
}

impl CheckConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn max_count(mut self, max_count: usize) -> Self {
        self.max_count = Some(max_count);
        self
    }

    /// Scale the global default trial count, rounding to at least one trial.
    pub fn max_count_scale(mut self, scale: f64) -> Self {
        self.max_count_scale = Some(scale);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_count == Some(0) {
            return Err(ConfigError::InvalidMaxCount);
        }
        if let Some(scale) = self.max_count_scale {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ConfigError::InvalidScale(scale));
            }
        }
        Ok(())
    }

    /// Trial count for this check: the explicit count, else the scaled default,
    /// else the default. A scaled count never drops below one trial.
    pub fn resolve_max_count(&self, global: &GlobalConfig) -> usize {
        if let Some(max_count) = self.max_count {
            return max_count;
        }
        match self.max_count_scale {
            Some(scale) => ((global.default_max_count as f64 * scale).round() as usize).max(1),
            None => global.default_max_count,
        }
    }
}
