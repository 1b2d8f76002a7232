//! Test signal generation
//!
//! Generators return stereo interleaved `f32` samples (L, R, L, R, ...).
//! [`to_pcm`] and [`from_pcm`] move them across the byte boundary of the
//! processor.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use std::f32::consts::PI;
use tonearm_core::SampleEncoding;

use crate::codec;

/// Generate a sine wave on both channels
///
/// # Arguments
/// * `frequency` - Frequency in Hz
/// * `sample_rate` - Sample rate in Hz
/// * `duration` - Duration in seconds
/// * `amplitude` - Peak amplitude (0.0 to 1.0)
pub fn generate_sine_wave(
    frequency: f32,
    sample_rate: u32,
    duration: f32,
    amplitude: f32,
) -> Vec<f32> {
    let num_frames = (sample_rate as f32 * duration) as usize;
    let mut samples = Vec::with_capacity(num_frames * 2);

    for i in 0..num_frames {
        let t = i as f32 / sample_rate as f32;
        let sample = (2.0 * PI * frequency * t).sin() * amplitude;
        samples.push(sample); // Left
        samples.push(sample); // Right
    }

    samples
}

/// Sine on one channel, silence on the other (`channel`: 0 = left, 1 = right)
pub fn generate_one_sided_sine(
    frequency: f32,
    sample_rate: u32,
    duration: f32,
    amplitude: f32,
    channel: usize,
) -> Vec<f32> {
    let mut samples = generate_sine_wave(frequency, sample_rate, duration, amplitude);
    for frame in samples.chunks_exact_mut(2) {
        frame[1 - channel] = 0.0;
    }
    samples
}

/// Independent white noise per channel from a seeded generator
pub fn generate_white_noise(sample_rate: u32, duration: f32, amplitude: f32, seed: u64) -> Vec<f32> {
    let num_frames = (sample_rate as f32 * duration) as usize;
    let mut rng = SmallRng::seed_from_u64(seed);
    (0..num_frames * 2)
        .map(|_| rng.gen_range(-1.0_f32..1.0) * amplitude)
        .collect()
}

/// Pack interleaved samples as little-endian PCM
///
/// Integer encodings truncate and saturate like processor output; floats are
/// written unchanged, overs included.
pub fn to_pcm(samples: &[f32], encoding: SampleEncoding) -> Vec<u8> {
    let width = encoding.bytes_per_sample();
    let mut bytes = vec![0u8; samples.len() * width];
    for (&sample, out) in samples.iter().zip(bytes.chunks_exact_mut(width)) {
        codec::write_sample(out, encoding, f64::from(sample));
    }
    bytes
}

/// Unpack little-endian PCM into normalized samples
pub fn from_pcm(bytes: &[u8], encoding: SampleEncoding) -> Vec<f32> {
    bytes
        .chunks_exact(encoding.bytes_per_sample())
        .map(|b| codec::read_sample(b, encoding) as f32)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_has_expected_length() {
        let samples = generate_sine_wave(1_000.0, 44_100, 0.1, 0.5);
        assert_eq!(samples.len(), 4_410 * 2);
    }

    #[test]
    fn noise_is_reproducible() {
        assert_eq!(
            generate_white_noise(8_000, 0.01, 0.5, 9),
            generate_white_noise(8_000, 0.01, 0.5, 9)
        );
    }

    #[test]
    fn pcm_int16_packing() {
        let bytes = to_pcm(&[0.5, -0.5], SampleEncoding::Int16);
        assert_eq!(bytes.len(), 4);
        let back = from_pcm(&bytes, SampleEncoding::Int16);
        assert!((back[0] - 0.5).abs() < 1e-4);
        assert!((back[1] + 0.5).abs() < 1e-4);
    }

    #[test]
    fn pcm_int32_packing() {
        let bytes = to_pcm(&[0.5, -1.0], SampleEncoding::Int32);
        assert_eq!(bytes.len(), 8);
        let back = from_pcm(&bytes, SampleEncoding::Int32);
        assert!((back[0] - 0.5).abs() < 1e-6);
        assert!((back[1] + 1.0).abs() < 1e-6);
    }

    #[test]
    fn float_overs_are_kept() {
        let back = from_pcm(&to_pcm(&[8.0, -2.5], SampleEncoding::Float32), SampleEncoding::Float32);
        assert_eq!(back, vec![8.0, -2.5]);
    }

    #[test]
    fn pcm_int24_is_three_bytes() {
        let bytes = to_pcm(&[0.25, -0.25, 1.0], SampleEncoding::Int24Packed);
        assert_eq!(bytes.len(), 9);
        let back = from_pcm(&bytes, SampleEncoding::Int24Packed);
        assert!((back[1] + 0.25).abs() < 1e-6);
    }
}
