//! Error type for the profile engine and signal classifier.

use thiserror::Error;

/// Errors raised by the pure VRVP core.
///
/// The core never retries or recovers. Transient failures (network, disk)
/// belong to the driver and are reported through `anyhow` there.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    /// Empty series, out-of-range parameter, malformed candle or an
    /// inverted Value Area.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl ProfileError {
    /// Creates an `InvalidInput` error with a message.
    #[must_use]
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        ProfileError::InvalidInput(msg.into())
    }
}

pub type ProfileResult<T> = Result<T, ProfileError>;
