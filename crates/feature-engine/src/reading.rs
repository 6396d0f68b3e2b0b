//! Pump Readings and Reading Sequences

use crate::error::FeatureError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column name of the maintenance counter carried by every reading
pub const HOURS_SINCE_MAINTENANCE: &str = "hours_since_maintenance";

/// Sensor channel of an industrial pump
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Channel {
    /// Vibration (mm/s)
    Vibration,
    /// Temperature (°C)
    Temperature,
    /// Pressure (PSI)
    Pressure,
    /// Flow rate (gal/min)
    FlowRate,
    /// Power draw (kW)
    Power,
    /// Shaft speed
    Rpm,
}

impl Channel {
    /// All channels, in canonical column order
    pub const ALL: [Channel; 6] = [
        Channel::Vibration,
        Channel::Temperature,
        Channel::Pressure,
        Channel::FlowRate,
        Channel::Power,
        Channel::Rpm,
    ];

    /// Column name of the channel
    pub fn as_str(&self) -> &'static str {
        match self {
            Channel::Vibration => "vibration",
            Channel::Temperature => "temperature",
            Channel::Pressure => "pressure",
            Channel::FlowRate => "flow_rate",
            Channel::Power => "power",
            Channel::Rpm => "rpm",
        }
    }

    /// Position of the channel in [`Channel::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// One timestamped pump observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime<Utc>,
    pub vibration: f64,
    pub temperature: f64,
    pub pressure: f64,
    pub flow_rate: f64,
    pub power: f64,
    pub rpm: f64,
    pub hours_since_maintenance: f64,
}

impl Reading {
    /// Value of a sensor channel
    pub fn value(&self, channel: Channel) -> f64 {
        match channel {
            Channel::Vibration => self.vibration,
            Channel::Temperature => self.temperature,
            Channel::Pressure => self.pressure,
            Channel::FlowRate => self.flow_rate,
            Channel::Power => self.power,
            Channel::Rpm => self.rpm,
        }
    }

    /// Mutable access to a sensor channel
    pub fn value_mut(&mut self, channel: Channel) -> &mut f64 {
        match channel {
            Channel::Vibration => &mut self.vibration,
            Channel::Temperature => &mut self.temperature,
            Channel::Pressure => &mut self.pressure,
            Channel::FlowRate => &mut self.flow_rate,
            Channel::Power => &mut self.power,
            Channel::Rpm => &mut self.rpm,
        }
    }

    /// Build a reading from a dict-like record.
    ///
    /// Every channel and `hours_since_maintenance` must be present; extra
    /// columns are ignored.
    pub fn from_record(record: &RawRecord) -> Result<Self, FeatureError> {
        let column = |name: &str| {
            record
                .fields
                .get(name)
                .copied()
                .ok_or_else(|| FeatureError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            timestamp: record.timestamp,
            vibration: column(Channel::Vibration.as_str())?,
            temperature: column(Channel::Temperature.as_str())?,
            pressure: column(Channel::Pressure.as_str())?,
            flow_rate: column(Channel::FlowRate.as_str())?,
            power: column(Channel::Power.as_str())?,
            rpm: column(Channel::Rpm.as_str())?,
            hours_since_maintenance: column(HOURS_SINCE_MAINTENANCE)?,
        })
    }
}

/// Untyped record as handed over by an outer surface (form input, JSON row)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    pub timestamp: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: BTreeMap<String, f64>,
}

impl RawRecord {
    /// Create an empty record at the given time
    pub fn new(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            fields: BTreeMap::new(),
        }
    }

    /// Add a column value
    pub fn with(mut self, name: &str, value: f64) -> Self {
        self.fields.insert(name.to_string(), value);
        self
    }
}

impl From<&Reading> for RawRecord {
    fn from(reading: &Reading) -> Self {
        let record = Channel::ALL
            .iter()
            .fold(RawRecord::new(reading.timestamp), |record, &channel| {
                record.with(channel.as_str(), reading.value(channel))
            });
        record.with(HOURS_SINCE_MAINTENANCE, reading.hours_since_maintenance)
    }
}

/// Non-empty, time-ordered run of readings
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReadingSequence {
    readings: Vec<Reading>,
}

impl ReadingSequence {
    /// Create a sequence, checking it is non-empty and that timestamps never
    /// go backwards
    pub fn new(readings: Vec<Reading>) -> Result<Self, FeatureError> {
        if readings.is_empty() {
            return Err(FeatureError::EmptySequence);
        }

        if let Some(pos) = readings
            .windows(2)
            .position(|pair| pair[1].timestamp < pair[0].timestamp)
        {
            return Err(FeatureError::UnorderedTimestamps { index: pos + 1 });
        }

        Ok(Self { readings })
    }

    /// Sequence holding a single reading
    pub fn single(reading: Reading) -> Self {
        Self {
            readings: vec![reading],
        }
    }

    /// Build a sequence from dict-like records
    pub fn from_records(records: &[RawRecord]) -> Result<Self, FeatureError> {
        let readings = records
            .iter()
            .map(Reading::from_record)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(readings)
    }

    pub fn readings(&self) -> &[Reading] {
        &self.readings
    }

    pub fn len(&self) -> usize {
        self.readings.len()
    }

    /// Always false: sequences are never empty
    pub fn is_empty(&self) -> bool {
        self.readings.is_empty()
    }

    /// Values of one channel, in time order
    pub fn channel(&self, channel: Channel) -> Vec<f64> {
        self.readings.iter().map(|r| r.value(channel)).collect()
    }

    /// Seconds elapsed between each reading and its predecessor; the first
    /// entry has no predecessor and is `None`
    pub fn elapsed_seconds(&self) -> Vec<Option<f64>> {
        std::iter::once(None)
            .chain(self.readings.windows(2).map(|pair| {
                let delta = pair[1].timestamp - pair[0].timestamp;
                // nanoseconds overflow past ~292 years
                let seconds = match delta.num_nanoseconds() {
                    Some(ns) => ns as f64 / 1e9,
                    None => delta.num_milliseconds() as f64 / 1e3,
                };
                Some(seconds)
            }))
            .collect()
    }

    pub fn into_readings(self) -> Vec<Reading> {
        self.readings
    }
}

impl<'de> Deserialize<'de> for ReadingSequence {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            readings: Vec<Reading>,
        }

        let raw = Raw::deserialize(deserializer)?;
        ReadingSequence::new(raw.readings).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn reading_at(minutes: i64) -> Reading {
        Reading {
            timestamp: Utc.with_ymd_and_hms(2023, 1, 1, 0, 0, 0).unwrap()
                + Duration::minutes(minutes),
            vibration: 1.5,
            temperature: 75.0,
            pressure: 50.0,
            flow_rate: 100.0,
            power: 10.0,
            rpm: 1800.0,
            hours_since_maintenance: 1000.0,
        }
    }

    #[test]
    fn test_record_round_trip() {
        let reading = reading_at(0);
        let record = RawRecord::from(&reading);
        assert_eq!(record.fields.len(), 7);
        assert_eq!(Reading::from_record(&record).unwrap(), reading);
    }

    #[test]
    fn test_missing_pressure_column() {
        let mut record = RawRecord::from(&reading_at(0));
        record.fields.remove("pressure");

        match Reading::from_record(&record) {
            Err(FeatureError::MissingColumn(name)) => assert_eq!(name, "pressure"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_extra_columns_ignored() {
        let record = RawRecord::from(&reading_at(0)).with("failure", 1.0);
        assert!(Reading::from_record(&record).is_ok());
    }

    #[test]
    fn test_empty_sequence_rejected() {
        assert!(matches!(
            ReadingSequence::new(vec![]),
            Err(FeatureError::EmptySequence)
        ));
    }

    #[test]
    fn test_unordered_timestamps_rejected() {
        let readings = vec![reading_at(0), reading_at(10), reading_at(5)];
        assert!(matches!(
            ReadingSequence::new(readings),
            Err(FeatureError::UnorderedTimestamps { index: 2 })
        ));
    }

    #[test]
    fn test_equal_timestamps_allowed() {
        let seq = ReadingSequence::new(vec![reading_at(0), reading_at(0)]).unwrap();
        assert_eq!(seq.elapsed_seconds(), vec![None, Some(0.0)]);
    }

    #[test]
    fn test_elapsed_seconds() {
        let seq = ReadingSequence::new(vec![reading_at(0), reading_at(5), reading_at(65)]).unwrap();
        assert_eq!(seq.elapsed_seconds(), vec![None, Some(300.0), Some(3600.0)]);
    }

    #[test]
    fn test_elapsed_seconds_keeps_sub_millisecond_precision() {
        let first = reading_at(0);
        let mut second = first.clone();
        second.timestamp = first.timestamp + Duration::microseconds(1500);
        let mut third = second.clone();
        third.timestamp = second.timestamp + Duration::microseconds(500);

        let elapsed = ReadingSequence::new(vec![first, second, third])
            .unwrap()
            .elapsed_seconds();
        assert_eq!(elapsed[0], None);
        assert!((elapsed[1].unwrap() - 0.0015).abs() < 1e-12);
        assert!((elapsed[2].unwrap() - 0.0005).abs() < 1e-12);
    }

    #[test]
    fn test_record_json_shape() {
        let json = r#"{"timestamp":"2023-01-01T00:00:00Z","vibration":1.5,"temperature":75,
            "pressure":50,"flow_rate":100,"power":10,"rpm":1800,"hours_since_maintenance":1000}"#;
        let record: RawRecord = serde_json::from_str(json).unwrap();
        assert_eq!(Reading::from_record(&record).unwrap(), reading_at(0));
    }
}
