//! # Error Types
//!
//! Custom error types for the RotorRig logger using `thiserror`.

use thiserror::Error;

/// Main error type for the RotorRig logger
#[derive(Debug, Error)]
pub enum RigLoggerError {
    /// Serial transport errors
    #[error("Serial error: {0}")]
    Serial(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the RotorRig logger
pub type Result<T> = std::result::Result<T, RigLoggerError>;
