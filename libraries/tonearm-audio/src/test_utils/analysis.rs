//! Audio analysis tools for verification
//!
//! Level, tone and channel metrics over stereo interleaved `f32` samples.

use std::f32::consts::PI;

/// RMS level
pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

/// Absolute maximum sample value
pub fn calculate_peak(samples: &[f32]) -> f32 {
    samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max)
}

/// Convert linear amplitude to dB (-100 dB floor for silence)
pub fn linear_to_db(linear: f32) -> f32 {
    if linear <= 0.0 {
        -100.0
    } else {
        20.0 * linear.log10()
    }
}

/// Convert dB to linear amplitude
pub fn db_to_linear(db: f32) -> f32 {
    10.0f32.powf(db / 20.0)
}

/// Check if a signal's peak is below `threshold_db`
pub fn is_silent(samples: &[f32], threshold_db: f32) -> bool {
    linear_to_db(calculate_peak(samples)) < threshold_db
}

/// Extract one channel from a stereo interleaved signal (0 = left, 1 = right)
pub fn extract_mono(stereo: &[f32], channel: usize) -> Vec<f32> {
    stereo.chunks_exact(2).map(|frame| frame[channel]).collect()
}

/// Amplitude of the `frequency` component of a mono signal (Goertzel)
pub fn tone_amplitude(samples: &[f32], frequency: f32, sample_rate: u32) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let omega = 2.0 * PI * frequency / sample_rate as f32;
    let coeff = 2.0 * omega.cos();
    let (mut s1, mut s2) = (0.0f32, 0.0f32);
    for &x in samples {
        let s0 = x + coeff * s1 - s2;
        s2 = s1;
        s1 = s0;
    }
    let power = s1 * s1 + s2 * s2 - coeff * s1 * s2;
    2.0 * power.max(0.0).sqrt() / samples.len() as f32
}

/// Level ratio between an active channel and the one that should be silent
///
/// Returns 120 dB when nothing leaks.
pub fn calculate_channel_separation(stereo_samples: &[f32], active_channel: usize) -> f32 {
    let active = calculate_rms(&extract_mono(stereo_samples, active_channel));
    let leakage = calculate_rms(&extract_mono(stereo_samples, 1 - active_channel));

    if leakage <= 0.0 {
        return 120.0;
    }

    20.0 * (active / leakage).log10()
}

/// Largest absolute difference between two signals
pub fn max_difference(signal_a: &[f32], signal_b: &[f32]) -> f32 {
    signal_a
        .iter()
        .zip(signal_b)
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f32, f32::max)
}
