//! Shared error type across promwatch crates.

use thiserror::Error;

/// Stable error codes, usable in logs and test assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Histogram bucket list rejected.
    InvalidBuckets,
    /// Configuration failed to parse or validate.
    BadConfig,
    /// Unsupported config schema version.
    UnsupportedVersion,
    /// The metric registry refused an operation.
    Registry,
    /// Internal error.
    Internal,
}

impl ErrorCode {
    /// String representation used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidBuckets => "INVALID_BUCKETS",
            ErrorCode::BadConfig => "BAD_CONFIG",
            ErrorCode::UnsupportedVersion => "UNSUPPORTED_VERSION",
            ErrorCode::Registry => "REGISTRY",
            ErrorCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, PromwatchError>;

/// Unified error type used by core and the HTTP integration.
#[derive(Debug, Error)]
pub enum PromwatchError {
    #[error("invalid buckets: {0}")]
    InvalidBuckets(String),
    #[error("bad config: {0}")]
    BadConfig(String),
    #[error("unsupported config version")]
    UnsupportedVersion,
    #[error("registry: {0}")]
    Registry(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl PromwatchError {
    /// Map the error to its stable code.
    pub fn code(&self) -> ErrorCode {
        match self {
            PromwatchError::InvalidBuckets(_) => ErrorCode::InvalidBuckets,
            PromwatchError::BadConfig(_) => ErrorCode::BadConfig,
            PromwatchError::UnsupportedVersion => ErrorCode::UnsupportedVersion,
            PromwatchError::Registry(_) => ErrorCode::Registry,
            PromwatchError::Internal(_) => ErrorCode::Internal,
        }
    }
}
