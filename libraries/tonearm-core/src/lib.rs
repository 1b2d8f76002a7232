//! Tonearm Core
//!
//! Platform-agnostic audio format types and error handling shared by the
//! Tonearm stereo processor and its hosts.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Format Types**: `SampleRate`, `SampleEncoding`, `AudioFormat`
//! - **Error Handling**: Unified `TonearmError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use tonearm_core::{AudioFormat, SampleEncoding, SampleRate};
//!
//! // Describe what the decoder hands us: 24-bit packed stereo at 96 kHz
//! let format = AudioFormat::from_pcm(96_000, 2, 24, false).unwrap();
//! assert_eq!(format.encoding, SampleEncoding::Int24Packed);
//! assert_eq!(format.sample_rate, SampleRate::HIGH_RES_96);
//! assert_eq!(format.frame_size(), 6);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;

// Re-export commonly used types
pub use error::{Result, TonearmError};
pub use types::{AudioFormat, SampleEncoding, SampleRate};
