/// Render host error types
use thiserror::Error;
use tonearm_audio::AudioError;
use tonearm_core::TonearmError;

pub type Result<T> = std::result::Result<T, RenderError>;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("WAV error: {0}")]
    Wav(#[from] hound::Error),

    #[error("Processor error: {0}")]
    Audio(#[from] AudioError),
}

impl From<config::ConfigError> for RenderError {
    fn from(err: config::ConfigError) -> Self {
        RenderError::Config(err.to_string())
    }
}

impl From<TonearmError> for RenderError {
    fn from(err: TonearmError) -> Self {
        match err {
            TonearmError::Config(msg) | TonearmError::InvalidInput(msg) => RenderError::Config(msg),
            other => RenderError::Audio(AudioError::from(other)),
        }
    }
}
