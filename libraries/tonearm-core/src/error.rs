/// Core error types for Tonearm
use thiserror::Error;

/// Result type alias using `TonearmError`
pub type Result<T> = std::result::Result<T, TonearmError>;

/// Core error type for Tonearm
#[derive(Error, Debug)]
pub enum TonearmError {
    /// PCM layout the processor cannot handle
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Audio processing errors raised by the processor crate
    #[error("Audio error: {0}")]
    Audio(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TonearmError {
    /// Create an unsupported format error
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Create an audio error
    pub fn audio(msg: impl Into<String>) -> Self {
        Self::Audio(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }
}
