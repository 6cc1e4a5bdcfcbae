//! Configuration management for Turnstile.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Result, TurnstileError};
use crate::ratelimit::IntervalUnit;

/// Prefix for environment overrides, e.g. `TURNSTILE__LIMITER__CAPACITY=100`.
const ENV_PREFIX: &str = "TURNSTILE";
const ENV_SEPARATOR: &str = "__";

/// Main configuration for Turnstile.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnstileConfig {
    /// Limiter configuration
    #[serde(default)]
    pub limiter: LimiterSettings,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Load driver configuration
    #[serde(default)]
    pub load: LoadSettings,
}

/// Limiter configuration.
///
/// Values are signed so that out-of-range input reaches limiter validation
/// instead of failing as a parse error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LimiterSettings {
    /// Maximum admissions per window
    #[serde(default = "default_capacity")]
    pub capacity: i64,

    /// Window length, in `unit`s
    #[serde(default = "default_interval")]
    pub interval: i64,

    /// Unit of `interval`
    #[serde(default = "default_unit")]
    pub unit: IntervalUnit,
}

impl Default for LimiterSettings {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            interval: default_interval(),
            unit: default_unit(),
        }
    }
}

fn default_capacity() -> i64 {
    50
}

fn default_interval() -> i64 {
    200
}

fn default_unit() -> IntervalUnit {
    IntervalUnit::Milliseconds
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Load driver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadSettings {
    /// Number of concurrent callers
    #[serde(default = "default_workers")]
    pub workers: usize,

    /// Calls per caller per round
    #[serde(default = "default_burst")]
    pub burst: usize,

    /// Pause between rounds in milliseconds
    #[serde(default = "default_pause_ms")]
    pub pause_ms: u64,

    /// Total run time in milliseconds
    #[serde(default = "default_duration_ms")]
    pub duration_ms: u64,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            workers: default_workers(),
            burst: default_burst(),
            pause_ms: default_pause_ms(),
            duration_ms: default_duration_ms(),
        }
    }
}

fn default_workers() -> usize {
    10
}

fn default_burst() -> usize {
    15
}

fn default_pause_ms() -> u64 {
    300
}

fn default_duration_ms() -> u64 {
    900
}

impl TurnstileConfig {
    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!(path = %path.display(), "Loading configuration");

        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml)
            .map_err(|e| TurnstileError::Config(format!("Failed to parse configuration: {}", e)))
    }

    /// Load layered configuration: defaults, then the optional YAML file,
    /// then `TURNSTILE__<SECTION>__<KEY>` environment variables.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = ::config::Config::try_from(&TurnstileConfig::default())
            .map_err(|e| TurnstileError::Config(e.to_string()))?;

        let mut builder = ::config::Config::builder().add_source(defaults);

        if let Some(path) = path {
            info!(path = %path.display(), "Loading configuration");
            builder = builder.add_source(
                ::config::File::from(path)
                    .format(::config::FileFormat::Yaml)
                    .required(true),
            );
        }

        builder
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()
            .and_then(|c| c.try_deserialize::<TurnstileConfig>())
            .map_err(|e| TurnstileError::Config(e.to_string()))
    }
}
