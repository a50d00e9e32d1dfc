//! Unified error types for the analytics pipeline.
//!
//! There is no fatal category here: every failure in the tracking path is
//! caught by the recorder, logged, and swallowed so that analytics never
//! interferes with serving the site.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for the analytics service.
#[derive(Debug, Error)]
pub enum Error {
    /// The row store rejected or failed a read/write.
    #[error("store error: {0}")]
    Store(String),

    /// An external lookup (IP echo, geolocation provider) failed or timed out.
    #[error("provider error: {0}")]
    Provider(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    pub fn provider(msg: impl Into<String>) -> Self {
        Self::Provider(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
