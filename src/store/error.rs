//! Error types for the store capability layer

use std::fmt;
use thiserror::Error;

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Store error types
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backing store read or write failed (network, timeout, command error)
    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Connection or pool failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// A stored serialized value failed schema validation. Surfaced rather
    /// than swallowed: it signals a writer-side defect.
    #[error("Decode error in {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    /// Create an unavailable error
    pub fn unavailable<E: fmt::Display>(msg: E) -> Self {
        Self::Unavailable(msg.to_string())
    }

    /// Create a connection error
    pub fn connection<E: fmt::Display>(msg: E) -> Self {
        Self::Connection(msg.to_string())
    }

    /// Create a decode error with the record it came from
    pub fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            context: context.into(),
            source,
        }
    }

    /// Check if this is a retryable error
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Connection(_))
    }

    /// Check if this is a decode error
    pub fn is_decode(&self) -> bool {
        matches!(self, Self::Decode { .. })
    }
}
