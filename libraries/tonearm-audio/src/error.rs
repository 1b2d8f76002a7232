/// Processor-specific errors
use thiserror::Error;
use tonearm_core::TonearmError;

/// Result type alias using `AudioError`
pub type Result<T> = std::result::Result<T, AudioError>;

/// Audio error types
///
/// Every variant is raised before any sample is touched; the per-sample path
/// itself cannot fail.
#[derive(Error, Debug)]
pub enum AudioError {
    /// Input format rejected at negotiation
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// `process` called before a format was negotiated
    #[error("Processor is not configured (call configure first)")]
    NotConfigured,

    /// Output slice cannot hold the processed frames
    #[error("Output buffer too small: need {needed} bytes, got {actual}")]
    OutputTooSmall {
        /// Bytes required
        needed: usize,
        /// Bytes provided
        actual: usize,
    },

    /// Error from the core crate
    #[error(transparent)]
    Core(#[from] TonearmError),
}

impl From<AudioError> for TonearmError {
    fn from(err: AudioError) -> Self {
        match err {
            AudioError::UnsupportedFormat(msg) => TonearmError::UnsupportedFormat(msg),
            AudioError::Core(inner) => inner,
            other => TonearmError::audio(other.to_string()),
        }
    }
}
