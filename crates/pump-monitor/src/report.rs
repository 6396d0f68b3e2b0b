//! Dashboard Report Assembly

use crate::history::HistorySimulator;
use crate::input::SensorInput;
use crate::risk::{Assessment, RiskLevel};
use crate::settings::MonitorConfig;
use crate::MonitorError;
use chrono::{DateTime, Utc};
use inference_engine::{InferenceEngine, ModelBundle, Prediction};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Aggregates over the simulated history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistorySummary {
    pub readings: usize,
    pub mean_probability: f64,
    pub peak_probability: f64,
    /// Hours classified as high risk
    pub high_risk_hours: usize,
}

impl HistorySummary {
    fn from_predictions(predictions: &[Prediction], config: &MonitorConfig) -> Self {
        let n = predictions.len();
        let sum: f64 = predictions.iter().map(|p| p.probability).sum();
        let peak = predictions
            .iter()
            .map(|p| p.probability)
            .fold(0.0, f64::max);
        let high_risk_hours = predictions
            .iter()
            .filter(|p| config.risk.level(p.probability) == RiskLevel::High)
            .count();

        Self {
            readings: n,
            mean_probability: if n > 0 { sum / n as f64 } else { 0.0 },
            peak_probability: peak,
            high_risk_hours,
        }
    }
}

/// Everything the dashboard displays for one submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardReport {
    pub generated_at: DateTime<Utc>,
    pub input: SensorInput,
    pub current: Assessment,
    pub history: Vec<Prediction>,
    pub summary: HistorySummary,
}

/// Score the configured input at `now` and its simulated history
pub fn build_report(
    bundle: &ModelBundle,
    config: &MonitorConfig,
    now: DateTime<Utc>,
) -> Result<DashboardReport, MonitorError> {
    let violations = config.limits.validate(&config.input);
    if !violations.is_empty() {
        for v in &violations {
            warn!("Rejected input: {}", v);
        }
        return Err(MonitorError::InvalidInput(violations));
    }

    let engine = InferenceEngine::new(bundle);
    let reading = config.input.to_reading(now);

    let probability = engine.predict_reading(&reading)?;
    let current = config.risk.assess(probability);
    info!(
        "Failure probability {:.2}% ({})",
        probability * 100.0,
        current.status
    );

    let mut simulator = HistorySimulator::new(&config.history);
    let history = simulator.simulate(&reading, now, config.history.days)?;
    let predictions = engine.predict_history(&history)?;
    let summary = HistorySummary::from_predictions(&predictions, config);
    info!(
        "History scored: {} readings, peak {:.2}",
        summary.readings, summary.peak_probability
    );

    Ok(DashboardReport {
        generated_at: now,
        input: config.input.clone(),
        current,
        history: predictions,
        summary,
    })
}
