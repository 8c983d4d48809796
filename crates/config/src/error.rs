//! Configuration error types

use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Sink list is not valid JSON
    #[error("invalid sink list: {0}")]
    Parse(#[from] serde_json::Error),

    /// A sink entry has no address
    #[error("sink {name:?} has no address")]
    MissingAddr { name: String },

    /// A sink address is not `host:port` shaped
    #[error("sink {name:?} has invalid address {addr:?}: expected host:port")]
    InvalidAddr { name: String, addr: String },
}

/// Result type for configuration operations
pub type Result<T> = std::result::Result<T, ConfigError>;
