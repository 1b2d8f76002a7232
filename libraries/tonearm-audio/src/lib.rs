//! Tonearm Audio
//!
//! Real-time stereo processing chain for a music player's output path.
//!
//! This crate provides:
//! - Format negotiation for 16/24/32-bit integer and 32-bit float PCM, mono or stereo
//! - A per-sample DSP chain: loudness, air, gain, warmth, a 150 Hz Linkwitz-Riley
//!   band split with per-band width, clarity and sub-bass shaping, crossfeed,
//!   balance, spatial rotation, DC blocking, soft limiting and TPDF dither
//! - A lock-free parameter surface and peak meter shared with control threads
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use tonearm_audio::{LevelMeter, ProcessorParameters, StereoProcessor};
//! use tonearm_core::AudioFormat;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let params = Arc::new(ProcessorParameters::new());
//! let meter = Arc::new(LevelMeter::new());
//! let mut processor = StereoProcessor::with_shared(params.clone(), meter.clone());
//!
//! // 44.1 kHz, stereo, 16-bit in -> 44.1 kHz, stereo, 16-bit out
//! processor.configure(AudioFormat::from_pcm(44_100, 2, 16, false)?)?;
//!
//! // Control thread
//! params.set_width(1.4);
//! params.set_crossfeed(0.5);
//!
//! // Audio thread
//! let input = vec![0u8; 4_096];
//! let mut output = vec![0u8; processor.output_len(input.len())];
//! let outcome = processor.process(&input, &mut output)?;
//! assert_eq!(outcome.bytes_written, output.len());
//!
//! // UI thread
//! let levels = meter.report();
//! assert!(levels.left_peak <= 1.0);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod codec;
pub mod effects;
mod error;
pub mod format;
pub mod meter;
pub mod params;
pub mod pipeline;
mod processor;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use error::{AudioError, Result};
pub use format::NegotiatedFormat;
pub use meter::{LevelMeter, LevelTelemetry};
pub use params::{ParameterSnapshot, Preset, ProcessorParameters};
pub use processor::{ProcessOutcome, StereoProcessor};
