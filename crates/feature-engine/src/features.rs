//! Engineered Feature Assembly

use crate::error::FeatureError;
use crate::reading::{Channel, RawRecord, ReadingSequence};
use crate::statistics::{rate_of_change, rolling};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Number of engineered columns
pub const FEATURE_DIMENSION: usize = 25;

/// Default rolling window: one hour of 5-minute samples
pub const DEFAULT_WINDOW: usize = 12;

/// Canonical column order of an engineered feature vector
pub const FEATURE_NAMES: [&str; FEATURE_DIMENSION] = [
    "vibration",
    "temperature",
    "pressure",
    "flow_rate",
    "power",
    "rpm",
    "hours_since_maintenance",
    "vibration_rolling_mean_1h",
    "vibration_rolling_std_1h",
    "temperature_rolling_mean_1h",
    "temperature_rolling_std_1h",
    "pressure_rolling_mean_1h",
    "pressure_rolling_std_1h",
    "flow_rate_rolling_mean_1h",
    "flow_rate_rolling_std_1h",
    "power_rolling_mean_1h",
    "power_rolling_std_1h",
    "rpm_rolling_mean_1h",
    "rpm_rolling_std_1h",
    "vibration_rate_of_change",
    "temperature_rate_of_change",
    "pressure_rate_of_change",
    "flow_rate_rate_of_change",
    "power_rate_of_change",
    "rpm_rate_of_change",
];

/// Position of a column name in [`FEATURE_NAMES`]
pub fn feature_index(name: &str) -> Option<usize> {
    FEATURE_NAMES.iter().position(|&n| n == name)
}

/// Features derived for one channel at one row
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelFeatures {
    /// Raw value
    pub value: f64,
    /// Trailing-window mean
    pub rolling_mean: f64,
    /// Trailing-window population std dev
    pub rolling_std: f64,
    /// Change per second since the previous row
    pub rate_of_change: f64,
}

/// Engineered feature vector for one row of a reading sequence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineeredFeatures {
    /// Timestamp of the source reading
    pub timestamp: DateTime<Utc>,
    /// Maintenance counter, passed through
    pub hours_since_maintenance: f64,
    /// Per-channel features, indexed by [`Channel::index`]
    pub channels: [ChannelFeatures; 6],
}

impl EngineeredFeatures {
    /// Features of one channel
    pub fn channel(&self, channel: Channel) -> &ChannelFeatures {
        &self.channels[channel.index()]
    }

    /// Flatten into [`FEATURE_NAMES`] order
    pub fn to_vector(&self) -> [f64; FEATURE_DIMENSION] {
        let mut values = [0.0; FEATURE_DIMENSION];

        for (i, ch) in self.channels.iter().enumerate() {
            values[i] = ch.value;
            values[7 + 2 * i] = ch.rolling_mean;
            values[8 + 2 * i] = ch.rolling_std;
            values[19 + i] = ch.rate_of_change;
        }
        values[6] = self.hours_since_maintenance;

        values
    }

    /// Look a column up by name
    pub fn value(&self, name: &str) -> Option<f64> {
        feature_index(name).map(|idx| self.to_vector()[idx])
    }
}

/// Turns reading sequences into engineered feature vectors
#[derive(Debug, Clone)]
pub struct FeatureEngineer {
    /// Rolling window length in samples
    window: usize,
}

impl FeatureEngineer {
    /// Create an engineer with the given rolling window
    pub fn new(window: usize) -> Result<Self, FeatureError> {
        if window == 0 {
            return Err(FeatureError::InvalidWindow(window));
        }
        Ok(Self { window })
    }

    pub fn window(&self) -> usize {
        self.window
    }

    /// Engineer one feature vector per reading, row-aligned with the input
    pub fn engineer(&self, sequence: &ReadingSequence) -> Vec<EngineeredFeatures> {
        let readings = sequence.readings();
        let elapsed = sequence.elapsed_seconds();

        debug!(
            "Engineering features: rows={}, window={}",
            readings.len(),
            self.window
        );

        let mut rows: Vec<EngineeredFeatures> = readings
            .iter()
            .map(|r| EngineeredFeatures {
                timestamp: r.timestamp,
                hours_since_maintenance: r.hours_since_maintenance,
                channels: [ChannelFeatures::default(); 6],
            })
            .collect();

        for channel in Channel::ALL {
            let values = sequence.channel(channel);
            let stats = rolling(&values, self.window);
            let rates = rate_of_change(&values, &elapsed);

            for (i, row) in rows.iter_mut().enumerate() {
                row.channels[channel.index()] = ChannelFeatures {
                    value: values[i],
                    rolling_mean: stats[i].mean,
                    rolling_std: stats[i].std_dev,
                    rate_of_change: rates[i],
                };
            }
        }

        rows
    }

    /// Engineer features from dict-like records.
    ///
    /// Column presence and ordering are checked for every row before any
    /// feature is computed.
    pub fn engineer_records(
        &self,
        records: &[RawRecord],
    ) -> Result<Vec<EngineeredFeatures>, FeatureError> {
        let sequence = ReadingSequence::from_records(records)?;
        Ok(self.engineer(&sequence))
    }
}

impl Default for FeatureEngineer {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }
}
