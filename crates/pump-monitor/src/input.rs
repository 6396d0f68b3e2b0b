//! Dashboard Sensor Input and Range Checking

use chrono::{DateTime, Utc};
use feature_engine::Reading;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Input value outside the range the dashboard accepts
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{field} value {value} is out of range [{min}, {max}]")]
pub struct OutOfRange {
    pub field: &'static str,
    pub value: f64,
    pub min: f64,
    pub max: f64,
}

/// The seven operator-supplied pump parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SensorInput {
    /// Vibration (mm/s)
    pub vibration: f64,
    /// Temperature (°C)
    pub temperature: f64,
    /// Pressure (PSI)
    pub pressure: f64,
    /// Flow rate (gal/min)
    pub flow_rate: f64,
    /// Power (kW)
    pub power: f64,
    /// RPM
    pub rpm: f64,
    /// Hours since last maintenance
    pub hours_since_maintenance: f64,
}

impl Default for SensorInput {
    fn default() -> Self {
        Self {
            vibration: 1.5,
            temperature: 75.0,
            pressure: 50.0,
            flow_rate: 100.0,
            power: 10.0,
            rpm: 1800.0,
            hours_since_maintenance: 1000.0,
        }
    }
}

impl SensorInput {
    /// Stamp the input as a reading taken at `timestamp`
    pub fn to_reading(&self, timestamp: DateTime<Utc>) -> Reading {
        Reading {
            timestamp,
            vibration: self.vibration,
            temperature: self.temperature,
            pressure: self.pressure,
            flow_rate: self.flow_rate,
            power: self.power,
            rpm: self.rpm,
            hours_since_maintenance: self.hours_since_maintenance,
        }
    }
}

/// Accepted range of every input field
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputLimits {
    pub vibration: (f64, f64),
    pub temperature: (f64, f64),
    pub pressure: (f64, f64),
    pub flow_rate: (f64, f64),
    pub power: (f64, f64),
    pub rpm: (f64, f64),
    pub hours_since_maintenance: (f64, f64),
}

impl Default for InputLimits {
    fn default() -> Self {
        Self {
            vibration: (0.0, 5.0),
            temperature: (50.0, 100.0),
            pressure: (40.0, 60.0),
            flow_rate: (80.0, 120.0),
            power: (8.0, 12.0),
            rpm: (1700.0, 1900.0),
            hours_since_maintenance: (0.0, 10000.0),
        }
    }
}

impl InputLimits {
    /// Validate a single value against a range
    pub fn validate_range(
        field: &'static str,
        value: f64,
        range: (f64, f64),
    ) -> Result<(), OutOfRange> {
        // Negated so NaN is rejected too
        if !(value >= range.0 && value <= range.1) {
            Err(OutOfRange {
                field,
                value,
                min: range.0,
                max: range.1,
            })
        } else {
            Ok(())
        }
    }

    /// Check every field, returning all violations
    pub fn validate(&self, input: &SensorInput) -> Vec<OutOfRange> {
        [
            ("vibration", input.vibration, self.vibration),
            ("temperature", input.temperature, self.temperature),
            ("pressure", input.pressure, self.pressure),
            ("flow_rate", input.flow_rate, self.flow_rate),
            ("power", input.power, self.power),
            ("rpm", input.rpm, self.rpm),
            (
                "hours_since_maintenance",
                input.hours_since_maintenance,
                self.hours_since_maintenance,
            ),
        ]
        .into_iter()
        .filter_map(|(field, value, range)| Self::validate_range(field, value, range).err())
        .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_input_is_valid() {
        assert!(InputLimits::default().validate(&SensorInput::default()).is_empty());
    }

    #[test]
    fn test_bounds_inclusive() {
        let input = SensorInput {
            vibration: 5.0,
            rpm: 1700.0,
            hours_since_maintenance: 0.0,
            ..Default::default()
        };
        assert!(InputLimits::default().validate(&input).is_empty());
    }

    #[test]
    fn test_out_of_range_fields_reported() {
        let input = SensorInput {
            temperature: 120.0,
            rpm: 1500.0,
            ..Default::default()
        };
        let errors = InputLimits::default().validate(&input);

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].field, "temperature");
        assert_eq!(errors[1].field, "rpm");
        assert_eq!(errors[1].min, 1700.0);
    }

    #[test]
    fn test_nan_rejected() {
        let input = SensorInput {
            pressure: f64::NAN,
            ..Default::default()
        };
        let errors = InputLimits::default().validate(&input);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "pressure");
    }

    #[test]
    fn test_to_reading() {
        let now = Utc::now();
        let reading = SensorInput::default().to_reading(now);
        assert_eq!(reading.timestamp, now);
        assert_eq!(reading.rpm, 1800.0);
        assert_eq!(reading.hours_since_maintenance, 1000.0);
    }
}
