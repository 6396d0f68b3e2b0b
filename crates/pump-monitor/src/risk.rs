//! Failure Risk Assessment

use serde::{Deserialize, Serialize};

/// Risk thresholds on the failure probability
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RiskConfig {
    /// Above this the pump is high risk (default: 0.7)
    pub high_risk_threshold: f64,
    /// At or above this the gauge shows elevated risk (default: 0.5)
    pub elevated_threshold: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            high_risk_threshold: 0.7,
            elevated_threshold: 0.5,
        }
    }
}

/// Gauge band of a failure probability
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Elevated,
    High,
}

impl RiskLevel {
    /// Operator-facing status
    pub fn status(&self) -> &'static str {
        match self {
            RiskLevel::High => "High Risk",
            RiskLevel::Low | RiskLevel::Elevated => "Normal",
        }
    }

    /// Recommended action
    pub fn recommended_action(&self) -> &'static str {
        match self {
            RiskLevel::High => "Immediate Maintenance",
            RiskLevel::Low | RiskLevel::Elevated => "Regular Operation",
        }
    }
}

/// Assessment of one failure probability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub probability: f64,
    pub level: RiskLevel,
    pub status: String,
    pub recommended_action: String,
}

impl RiskConfig {
    /// Map a probability onto a risk level
    pub fn level(&self, probability: f64) -> RiskLevel {
        if probability > self.high_risk_threshold {
            RiskLevel::High
        } else if probability >= self.elevated_threshold {
            RiskLevel::Elevated
        } else {
            RiskLevel::Low
        }
    }

    pub fn assess(&self, probability: f64) -> Assessment {
        let level = self.level(probability);
        Assessment {
            probability,
            level,
            status: level.status().to_string(),
            recommended_action: level.recommended_action().to_string(),
        }
    }
}
