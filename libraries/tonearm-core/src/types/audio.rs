/// Audio-related types
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Result, TonearmError};

/// Sample rate in Hz
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SampleRate(pub u32);

impl SampleRate {
    /// Common sample rates
    pub const CD_QUALITY: Self = Self(44_100);
    pub const DVD_QUALITY: Self = Self(48_000);
    pub const HIGH_RES_88: Self = Self(88_200);
    pub const HIGH_RES_96: Self = Self(96_000);
    pub const HIGH_RES_176: Self = Self(176_400);
    pub const HIGH_RES_192: Self = Self(192_000);

    /// Create a new sample rate
    #[must_use]
    pub fn new(hz: u32) -> Self {
        Self(hz)
    }

    /// Get the sample rate as Hz
    pub fn as_hz(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for SampleRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} Hz", self.0)
    }
}

/// Linear PCM sample encoding on the wire
///
/// All multi-byte encodings are little-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleEncoding {
    /// Signed 16-bit integer
    Int16,
    /// Signed 24-bit integer packed into three bytes
    Int24Packed,
    /// Signed 32-bit integer
    Int32,
    /// IEEE 754 single precision float
    Float32,
}

impl SampleEncoding {
    /// Map a host PCM descriptor onto a supported encoding
    ///
    /// Anything other than 16/24/32-bit integer or 32-bit float is rejected.
    pub fn from_bits(bits_per_sample: u16, is_float: bool) -> Result<Self> {
        match (bits_per_sample, is_float) {
            (16, false) => Ok(Self::Int16),
            (24, false) => Ok(Self::Int24Packed),
            (32, false) => Ok(Self::Int32),
            (32, true) => Ok(Self::Float32),
            (bits, true) => Err(TonearmError::unsupported_format(format!(
                "{bits}-bit float PCM"
            ))),
            (bits, false) => Err(TonearmError::unsupported_format(format!(
                "{bits}-bit integer PCM"
            ))),
        }
    }

    /// Bytes occupied by one sample of one channel
    pub fn bytes_per_sample(&self) -> usize {
        match self {
            Self::Int16 => 2,
            Self::Int24Packed => 3,
            Self::Int32 | Self::Float32 => 4,
        }
    }

    /// Bits per sample
    pub fn bits_per_sample(&self) -> u16 {
        match self {
            Self::Int16 => 16,
            Self::Int24Packed => 24,
            Self::Int32 | Self::Float32 => 32,
        }
    }

    /// Whether samples are floating point
    pub fn is_float(&self) -> bool {
        matches!(self, Self::Float32)
    }
}

impl fmt::Display for SampleEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int16 => "s16le",
            Self::Int24Packed => "s24le",
            Self::Int32 => "s32le",
            Self::Float32 => "f32le",
        };
        f.write_str(name)
    }
}

/// Audio format information
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AudioFormat {
    /// Sample rate
    pub sample_rate: SampleRate,

    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,

    /// Sample encoding
    pub encoding: SampleEncoding,
}

impl AudioFormat {
    /// Create a new audio format
    pub fn new(sample_rate: SampleRate, channels: u16, encoding: SampleEncoding) -> Self {
        Self {
            sample_rate,
            channels,
            encoding,
        }
    }

    /// Build a format from a raw host descriptor
    ///
    /// Fails with `UnsupportedFormat` when the bit depth / float combination has
    /// no `SampleEncoding`. Channel count and rate are checked at negotiation.
    pub fn from_pcm(
        sample_rate: u32,
        channels: u16,
        bits_per_sample: u16,
        is_float: bool,
    ) -> Result<Self> {
        let encoding = SampleEncoding::from_bits(bits_per_sample, is_float)?;
        Ok(Self::new(SampleRate::new(sample_rate), channels, encoding))
    }

    /// Create CD quality stereo format (44.1kHz, 16-bit, stereo)
    pub fn cd_quality() -> Self {
        Self {
            sample_rate: SampleRate::CD_QUALITY,
            channels: 2,
            encoding: SampleEncoding::Int16,
        }
    }

    /// Bytes per interleaved frame (one sample for every channel)
    pub fn frame_size(&self) -> usize {
        self.encoding.bytes_per_sample() * usize::from(self.channels)
    }

    /// Calculate the byte rate (bytes per second)
    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.as_hz() * self.frame_size() as u32
    }
}

impl fmt::Display for AudioFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}ch @ {}",
            self.encoding, self.channels, self.sample_rate
        )
    }
}
