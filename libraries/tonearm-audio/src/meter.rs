//! Peak level meter
//!
//! The processor publishes the per-buffer peak of each output channel; a UI
//! thread reads it through a shared `Arc<LevelMeter>`. No smoothing and no
//! history: each non-empty buffer overwrites the previous value.

use atomic_float::AtomicF32;
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;

/// Peak absolute level per channel, in [0, 1]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LevelTelemetry {
    pub left_peak: f32,
    pub right_peak: f32,
}

impl LevelTelemetry {
    /// Louder of the two channels
    pub fn max_peak(&self) -> f32 {
        self.left_peak.max(self.right_peak)
    }

    /// Louder channel in dBFS (`-inf` for silence)
    pub fn max_peak_db(&self) -> f32 {
        20.0 * self.max_peak().log10()
    }
}

/// Lock-free two-channel peak meter
#[derive(Debug)]
pub struct LevelMeter {
    left: AtomicF32,
    right: AtomicF32,
}

impl LevelMeter {
    pub fn new() -> Self {
        Self {
            left: AtomicF32::new(0.0),
            right: AtomicF32::new(0.0),
        }
    }

    /// Latest published peaks
    pub fn report(&self) -> LevelTelemetry {
        LevelTelemetry {
            left_peak: self.left.load(Ordering::Relaxed),
            right_peak: self.right.load(Ordering::Relaxed),
        }
    }

    /// Publish the peaks of one buffer (clamped to [0, 1])
    #[inline]
    pub fn publish(&self, left_peak: f64, right_peak: f64) {
        self.left
            .store(Self::clamp_peak(left_peak), Ordering::Relaxed);
        self.right
            .store(Self::clamp_peak(right_peak), Ordering::Relaxed);
    }

    pub fn reset(&self) {
        self.publish(0.0, 0.0);
    }

    #[inline]
    fn clamp_peak(peak: f64) -> f32 {
        if peak.is_nan() {
            0.0
        } else {
            peak.clamp(0.0, 1.0) as f32
        }
    }
}

impl Default for LevelMeter {
    fn default() -> Self {
        Self::new()
    }
}
