//! Simulated Reading History

use crate::MonitorError;
use chrono::{DateTime, Duration, Utc};
use feature_engine::{Channel, Reading, ReadingSequence};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Longest history the monitor will simulate
pub const MAX_HISTORY_DAYS: u32 = 365;

/// History simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    /// Days of hourly history leading up to now (1..=365)
    pub days: u32,
    /// Noise std dev as a fraction of each base channel value
    pub noise_fraction: f64,
    /// Fixed seed for reproducible runs
    pub seed: Option<u64>,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            days: 7,
            noise_fraction: 0.1,
            seed: None,
        }
    }
}

/// Generates hourly readings jittered around a base reading
pub struct HistorySimulator {
    rng: StdRng,
    noise_fraction: f64,
}

impl HistorySimulator {
    /// Create a simulator; without a seed the generator is seeded from OS
    /// entropy
    pub fn new(config: &HistoryConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            rng,
            noise_fraction: config.noise_fraction.abs(),
        }
    }

    /// Standard normal sample (Box-Muller transform)
    fn next_gaussian(&mut self) -> f64 {
        // u1 in (0, 1] keeps ln finite
        let u1: f64 = 1.0 - self.rng.gen::<f64>();
        let u2: f64 = self.rng.gen();
        (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos()
    }

    /// Hourly readings from `end - days` to `end` inclusive (`days * 24 + 1`
    /// rows). Each channel gets independent Gaussian noise with std dev
    /// `noise_fraction * |base value|`; the maintenance counter is kept.
    pub fn simulate(
        &mut self,
        base: &Reading,
        end: DateTime<Utc>,
        days: u32,
    ) -> Result<ReadingSequence, MonitorError> {
        let hours = i64::from(days) * 24;
        let start = Duration::try_hours(hours)
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| {
                MonitorError::InvalidConfig(format!(
                    "history of {} days before {} is out of range",
                    days, end
                ))
            })?;

        let readings = (0..=hours)
            .map(|i| {
                let mut reading = base.clone();
                reading.timestamp = start + Duration::hours(i);
                for channel in Channel::ALL {
                    let std_dev = base.value(channel).abs() * self.noise_fraction;
                    *reading.value_mut(channel) += self.next_gaussian() * std_dev;
                }
                reading
            })
            .collect::<Vec<_>>();

        debug!("Simulated {} hourly readings", readings.len());
        Ok(ReadingSequence::new(readings)?)
    }
}
