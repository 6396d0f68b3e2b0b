//! Pump Failure Monitor
//!
//! Backend of the pump failure dashboard: validates the operator's pump
//! parameters, scores them with the loaded model bundle, simulates a week of
//! hourly history around them and reports everything as one document.

pub mod history;
pub mod input;
pub mod report;
pub mod risk;
pub mod settings;

pub use history::{HistoryConfig, HistorySimulator, MAX_HISTORY_DAYS};
pub use input::{InputLimits, OutOfRange, SensorInput};
pub use report::{build_report, DashboardReport, HistorySummary};
pub use risk::{Assessment, RiskConfig, RiskLevel};
pub use settings::{LogFormat, ModelConfig, MonitorConfig};

use feature_engine::FeatureError;
use inference_engine::InferenceError;
use thiserror::Error;
use tracing_subscriber::FmtSubscriber;

/// Monitor errors
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid input: {}", format_violations(.0))]
    InvalidInput(Vec<OutOfRange>),
    #[error(transparent)]
    Feature(#[from] FeatureError),
    #[error(transparent)]
    Inference(#[from] InferenceError),
    #[error("Logging setup failed: {0}")]
    Logging(String),
}

fn format_violations(violations: &[OutOfRange]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Initialize logging on stderr; stdout carries the report
pub fn init_logging(config: &MonitorConfig) -> Result<(), MonitorError> {
    let level = config.log_level()?;
    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);

    let result = match config.log_format {
        LogFormat::Text => tracing::subscriber::set_global_default(builder.finish()),
        LogFormat::Json => tracing::subscriber::set_global_default(builder.json().finish()),
    };

    result.map_err(|e| MonitorError::Logging(e.to_string()))
}
