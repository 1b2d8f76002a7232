//! Format negotiation
//!
//! Decides whether an input stream can be processed and what comes out:
//! always two channels at the input rate, 16-bit for 16-bit input and 32-bit
//! float for everything else.

use tonearm_core::{AudioFormat, SampleEncoding};

use crate::codec::{self, ChannelLayout};
use crate::error::{AudioError, Result};

/// Lowest accepted input rate in Hz
pub const MIN_SAMPLE_RATE: u32 = 8_000;

/// Highest accepted input rate in Hz
pub const MAX_SAMPLE_RATE: u32 = 768_000;

/// An accepted input format and the output it maps to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NegotiatedFormat {
    input: AudioFormat,
    output: AudioFormat,
    layout: ChannelLayout,
}

/// Check `input` and derive the output format
pub fn negotiate(input: AudioFormat) -> Result<NegotiatedFormat> {
    let layout = ChannelLayout::from_count(input.channels).ok_or_else(|| {
        AudioError::UnsupportedFormat(format!(
            "{} channels (only mono and stereo are supported)",
            input.channels
        ))
    })?;

    let rate = input.sample_rate.as_hz();
    if !(MIN_SAMPLE_RATE..=MAX_SAMPLE_RATE).contains(&rate) {
        return Err(AudioError::UnsupportedFormat(format!(
            "sample rate {} outside {MIN_SAMPLE_RATE}..={MAX_SAMPLE_RATE} Hz",
            input.sample_rate
        )));
    }

    Ok(NegotiatedFormat {
        input,
        output: AudioFormat::new(input.sample_rate, 2, output_encoding(input.encoding)),
        layout,
    })
}

/// Output encoding for an input encoding
pub fn output_encoding(input: SampleEncoding) -> SampleEncoding {
    match input {
        SampleEncoding::Int16 => SampleEncoding::Int16,
        SampleEncoding::Int24Packed | SampleEncoding::Int32 | SampleEncoding::Float32 => {
            SampleEncoding::Float32
        }
    }
}

impl NegotiatedFormat {
    pub fn input(&self) -> AudioFormat {
        self.input
    }

    pub fn output(&self) -> AudioFormat {
        self.output
    }

    pub fn layout(&self) -> ChannelLayout {
        self.layout
    }

    pub fn sample_rate_hz(&self) -> f64 {
        f64::from(self.input.sample_rate.as_hz())
    }

    /// True when the output is 16-bit and gets dithered
    pub fn is_dithered(&self) -> bool {
        self.output.encoding == SampleEncoding::Int16
    }

    /// Output bytes for an input buffer of `input_len` bytes
    pub fn output_len(&self, input_len: usize) -> usize {
        let frames = codec::whole_frames(input_len, self.input.encoding, self.layout);
        codec::stereo_len(frames, self.output.encoding)
    }
}
