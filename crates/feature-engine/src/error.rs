//! Feature Engineering Error Types

use thiserror::Error;

/// Errors raised while turning readings into features
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FeatureError {
    /// A required sensor column is absent from the input
    #[error("Missing required column: {0}")]
    MissingColumn(String),

    /// Nothing to engineer
    #[error("Reading sequence is empty")]
    EmptySequence,

    /// Timestamps go backwards at the given row
    #[error("Timestamp at row {index} is earlier than its predecessor")]
    UnorderedTimestamps { index: usize },

    /// Rolling window must cover at least one sample
    #[error("Invalid rolling window size: {0}")]
    InvalidWindow(usize),
}
