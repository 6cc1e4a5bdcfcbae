//! Error types for Turnstile.

use thiserror::Error;

/// Main error type for Turnstile operations.
#[derive(Error, Debug)]
pub enum TurnstileError {
    /// Rejected limiter parameters (negative capacity or interval, sub-millisecond unit)
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Configuration file or environment parsing errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for Turnstile operations.
pub type Result<T> = std::result::Result<T, TurnstileError>;
