//! Feature Engineering Engine
//!
//! Turns time-ordered pump readings into the rolling-statistic and
//! rate-of-change features consumed by the failure classifier.

mod error;
mod features;
mod reading;
mod statistics;

pub use error::FeatureError;
pub use features::{
    feature_index, ChannelFeatures, EngineeredFeatures, FeatureEngineer, DEFAULT_WINDOW,
    FEATURE_DIMENSION, FEATURE_NAMES,
};
pub use reading::{Channel, RawRecord, Reading, ReadingSequence, HOURS_SINCE_MAINTENANCE};
pub use statistics::{rate_of_change, rolling, zero_if_undefined, WindowStats};
