//! Monitor Settings

use crate::history::{HistoryConfig, MAX_HISTORY_DAYS};
use crate::input::{InputLimits, SensorInput};
use crate::risk::RiskConfig;
use crate::MonitorError;
use config::{Config, Environment, File};
use inference_engine::ArtifactPaths;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::Level;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "pump-monitor.toml";

/// Prefix of environment overrides, e.g. `PUMP_MONITOR_HISTORY__DAYS=3`
pub const ENV_PREFIX: &str = "PUMP_MONITOR";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Text,
    Json,
}

/// Where the model artifacts live
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    /// Directory holding the three artifacts
    pub dir: PathBuf,
    /// Artifact file names inside `dir`
    pub artifacts: ArtifactPaths,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("models"),
            artifacts: ArtifactPaths::default(),
        }
    }
}

/// Full monitor configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    pub model: ModelConfig,
    /// Current operator input
    pub input: SensorInput,
    /// Accepted input ranges
    pub limits: InputLimits,
    pub history: HistoryConfig,
    pub risk: RiskConfig,
    /// Maximum log level (trace, debug, info, warn, error)
    pub log_level: String,
    pub log_format: LogFormat,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            input: SensorInput::default(),
            limits: InputLimits::default(),
            history: HistoryConfig::default(),
            risk: RiskConfig::default(),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl MonitorConfig {
    /// Layer defaults, the config file and environment overrides.
    ///
    /// An explicitly given file must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, MonitorError> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Check settings that serde cannot
    pub fn validate(&self) -> Result<(), MonitorError> {
        self.log_level()?;

        let risk = &self.risk;
        let in_unit = |t: f64| (0.0..=1.0).contains(&t);
        if !in_unit(risk.elevated_threshold)
            || !in_unit(risk.high_risk_threshold)
            || risk.elevated_threshold > risk.high_risk_threshold
        {
            return Err(MonitorError::InvalidConfig(format!(
                "risk thresholds must satisfy 0 <= elevated ({}) <= high ({}) <= 1",
                risk.elevated_threshold, risk.high_risk_threshold
            )));
        }

        if !(1..=MAX_HISTORY_DAYS).contains(&self.history.days) {
            return Err(MonitorError::InvalidConfig(format!(
                "history.days must be between 1 and {}, got {}",
                MAX_HISTORY_DAYS, self.history.days
            )));
        }

        if !self.history.noise_fraction.is_finite() || self.history.noise_fraction < 0.0 {
            return Err(MonitorError::InvalidConfig(format!(
                "history.noise_fraction must be a non-negative number, got {}",
                self.history.noise_fraction
            )));
        }

        Ok(())
    }

    /// Parsed log level
    pub fn log_level(&self) -> Result<Level, MonitorError> {
        self.log_level
            .parse()
            .map_err(|_| MonitorError::InvalidConfig(format!("unknown log level {:?}", self.log_level)))
    }
}
