//! Sample codec
//!
//! Converts between the wire PCM encodings and the processor's internal
//! representation: a stream of `(left, right)` pairs in `f64`, nominally in
//! [-1.0, 1.0]. Mono input is duplicated to both channels on decode; encode
//! always writes two interleaved channels.
//!
//! All wire formats are little-endian. Only whole frames are decoded; a
//! trailing partial frame is left in [`Frames::dropped_bytes`] and never
//! carried into the next call.

use std::slice::ChunksExact;
use tonearm_core::SampleEncoding;

const INT16_SCALE: f64 = 32_768.0;
const INT24_SCALE: f64 = 8_388_608.0;
const INT32_SCALE: f64 = 2_147_483_648.0;

const INT16_OUT_SCALE: f64 = 32_767.0;
const INT24_OUT_SCALE: f64 = 8_388_607.0;
const INT32_OUT_SCALE: f64 = 2_147_483_647.0;

/// Channel layout of a negotiated input stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelLayout {
    /// One channel, duplicated to left and right
    Mono,
    /// Interleaved left/right
    Stereo,
}

impl ChannelLayout {
    /// Layout for a channel count, `None` for anything but 1 or 2
    pub fn from_count(channels: u16) -> Option<Self> {
        match channels {
            1 => Some(Self::Mono),
            2 => Some(Self::Stereo),
            _ => None,
        }
    }

    /// Number of interleaved channels
    pub fn count(&self) -> usize {
        match self {
            Self::Mono => 1,
            Self::Stereo => 2,
        }
    }
}

/// Read one little-endian sample and normalize it
#[inline]
pub fn read_sample(bytes: &[u8], encoding: SampleEncoding) -> f64 {
    match encoding {
        SampleEncoding::Int16 => f64::from(i16::from_le_bytes([bytes[0], bytes[1]])) / INT16_SCALE,
        SampleEncoding::Int24Packed => {
            // Two unsigned low bytes, sign carried by the high byte
            let value = i32::from(bytes[0])
                | (i32::from(bytes[1]) << 8)
                | (i32::from(bytes[2] as i8) << 16);
            f64::from(value) / INT24_SCALE
        }
        SampleEncoding::Int32 => {
            f64::from(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])) / INT32_SCALE
        }
        SampleEncoding::Float32 => {
            sanitize_float(f64::from(f32::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3],
            ])))
        }
    }
}

/// Write one normalized sample in little-endian wire format
///
/// Integer encodings truncate toward zero with a saturating cast.
#[inline]
pub fn write_sample(out: &mut [u8], encoding: SampleEncoding, value: f64) {
    match encoding {
        SampleEncoding::Int16 => {
            out[..2].copy_from_slice(&((value * INT16_OUT_SCALE) as i16).to_le_bytes());
        }
        SampleEncoding::Int24Packed => {
            let scaled = ((value * INT24_OUT_SCALE) as i32).clamp(-8_388_608, 8_388_607);
            out[..3].copy_from_slice(&scaled.to_le_bytes()[..3]);
        }
        SampleEncoding::Int32 => {
            out[..4].copy_from_slice(&((value * INT32_OUT_SCALE) as i32).to_le_bytes());
        }
        SampleEncoding::Float32 => {
            out[..4].copy_from_slice(&(value as f32).to_le_bytes());
        }
    }
}

/// Float PCM may exceed full scale and passes through; only NaN and
/// infinities are replaced with silence
#[inline]
fn sanitize_float(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Decode one whole input frame into a stereo pair
#[inline]
pub fn decode_frame(frame: &[u8], encoding: SampleEncoding, layout: ChannelLayout) -> (f64, f64) {
    let bytes = encoding.bytes_per_sample();
    let left = read_sample(&frame[..bytes], encoding);
    let right = match layout {
        ChannelLayout::Mono => left,
        ChannelLayout::Stereo => read_sample(&frame[bytes..2 * bytes], encoding),
    };
    (left, right)
}

/// Encode a stereo pair as one interleaved output frame
#[inline]
pub fn encode_frame(frame: &mut [u8], encoding: SampleEncoding, left: f64, right: f64) {
    let bytes = encoding.bytes_per_sample();
    write_sample(&mut frame[..bytes], encoding, left);
    write_sample(&mut frame[bytes..2 * bytes], encoding, right);
}

/// Iterator over the whole frames of an input buffer
pub struct Frames<'a> {
    chunks: ChunksExact<'a, u8>,
    encoding: SampleEncoding,
    layout: ChannelLayout,
}

impl Frames<'_> {
    /// Bytes of a trailing partial frame that will not be decoded
    pub fn dropped_bytes(&self) -> usize {
        self.chunks.remainder().len()
    }
}

impl Iterator for Frames<'_> {
    type Item = (f64, f64);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        self.chunks
            .next()
            .map(|frame| decode_frame(frame, self.encoding, self.layout))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.chunks.size_hint()
    }
}

impl ExactSizeIterator for Frames<'_> {}

/// Decode the whole frames of `bytes`
pub fn frames(bytes: &[u8], encoding: SampleEncoding, layout: ChannelLayout) -> Frames<'_> {
    let frame_size = encoding.bytes_per_sample() * layout.count();
    Frames {
        chunks: bytes.chunks_exact(frame_size),
        encoding,
        layout,
    }
}

/// Number of whole frames in a buffer of `len` bytes
pub fn whole_frames(len: usize, encoding: SampleEncoding, layout: ChannelLayout) -> usize {
    len / (encoding.bytes_per_sample() * layout.count())
}

/// Size in bytes of `frames` stereo frames in `encoding`
pub fn stereo_len(frames: usize, encoding: SampleEncoding) -> usize {
    frames * 2 * encoding.bytes_per_sample()
}
