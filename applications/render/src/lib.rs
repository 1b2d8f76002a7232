//! Tonearm Render
//!
//! Offline host for the stereo processor: decodes a WAV file to raw PCM,
//! streams it through [`StereoProcessor`](tonearm_audio::StereoProcessor) in
//! host-sized blocks and writes the processed stereo WAV.
//!
//! This library exposes the host components for testing purposes.

pub mod config;
pub mod error;
pub mod render;

pub use config::{RenderConfig, RenderSettings};
pub use error::{RenderError, Result};
pub use render::{render_file, RenderReport};
