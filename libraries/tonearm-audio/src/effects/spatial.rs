//! Rotating stereo field
//!
//! A slow LFO sweeps the image around the listener: `sin(phase)` pans with an
//! equal-power law and `cos(phase)` sets a virtual distance. Far positions get
//! quieter and duller through a one-pole low-pass per channel.

use std::f64::consts::{FRAC_PI_4, TAU};

/// Rotation speed bounds in Hz
pub const MIN_ROTATION_HZ: f64 = 0.05;
pub const MAX_ROTATION_HZ: f64 = 1.0;

/// Spatial rotator state: LFO phase and the two distance filters
#[derive(Debug, Clone)]
pub struct SpatialRotator {
    phase: f64,
    filter: [f64; 2],
    sample_rate: f64,
}

impl SpatialRotator {
    pub fn new(sample_rate: f64) -> Self {
        Self {
            phase: 0.0,
            filter: [0.0; 2],
            sample_rate,
        }
    }

    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
    }

    /// Current LFO phase in radians, always in [0, 2π]
    pub fn phase(&self) -> f64 {
        self.phase
    }

    /// Process one pair
    ///
    /// # Arguments
    /// * `left`, `right` - Stereo pair after balance
    /// * `enabled` - Rotation on/off
    /// * `rotation_hz` - Full turns per second
    ///
    /// While disabled the pair passes through untouched and the filters track
    /// it, so enabling the effect mid-stream starts from the current signal.
    #[inline]
    pub fn process(&mut self, left: f64, right: f64, enabled: bool, rotation_hz: f64) -> (f64, f64) {
        if !enabled {
            self.filter = [left, right];
            return (left, right);
        }

        self.phase += TAU * rotation_hz / self.sample_rate;
        if self.phase > TAU {
            self.phase -= TAU;
        }

        let pan = self.phase.sin();
        let depth = self.phase.cos();

        let angle = (pan + 1.0) * FRAC_PI_4;
        let gain_left = angle.cos();
        let gain_right = angle.sin();

        let distance = (1.0 - depth) / 2.0;
        let volume = 1.0 - distance * 0.3;
        let alpha = 1.0 - distance * 0.85;

        self.filter[0] += alpha * (left - self.filter[0]);
        self.filter[1] += alpha * (right - self.filter[1]);

        (
            self.filter[0] * gain_left * volume,
            self.filter[1] * gain_right * volume,
        )
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
        self.filter = [0.0; 2];
    }
}
