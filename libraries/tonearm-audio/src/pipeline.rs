//! Per-frame DSP chain
//!
//! Owns every piece of state that survives from one buffer to the next:
//! crossover delay registers, clarity envelopes, the spatial LFO and filters,
//! the DC blocker and the dither history. One pipeline belongs to exactly one
//! processor.

use crate::effects::{
    self, Clarity, Crossover, DcBlocker, SpatialRotator, TpdfDither, CROSSOVER_HZ,
};
use crate::params::ParameterSnapshot;

/// Stage chain with its carried state
#[derive(Debug, Clone)]
pub struct DspPipeline {
    crossover: Crossover,
    clarity: Clarity,
    spatial: SpatialRotator,
    dc_blocker: DcBlocker,
    dither: TpdfDither,
    sample_rate: f64,
}

impl DspPipeline {
    pub fn new(sample_rate: f64, dither: TpdfDither) -> Self {
        Self {
            crossover: Crossover::new(CROSSOVER_HZ, sample_rate),
            clarity: Clarity::new(),
            spatial: SpatialRotator::new(sample_rate),
            dc_blocker: DcBlocker::new(),
            dither,
            sample_rate,
        }
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Redesign rate-dependent coefficients (state is left alone)
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.crossover.set_sample_rate(sample_rate);
        self.spatial.set_sample_rate(sample_rate);
    }

    pub fn crossover(&self) -> &Crossover {
        &self.crossover
    }

    pub fn replace_dither(&mut self, dither: TpdfDither) {
        self.dither = dither;
    }

    /// Run one frame through every stage up to and including the limiter
    ///
    /// # Arguments
    /// * `left`, `right` - Decoded input pair, nominally in [-1.0, 1.0]
    /// * `p` - Knob values for the whole buffer
    ///
    /// # Real-Time Constraints
    /// - No allocations
    /// - No logging or locking
    #[inline]
    pub fn process_frame(&mut self, left: f64, right: f64, p: &ParameterSnapshot) -> (f64, f64) {
        // Pre-gain shaping
        let mut l = effects::adaptive_loudness(left, p.pre_gain, p.adaptive_loudness);
        let mut r = effects::adaptive_loudness(right, p.pre_gain, p.adaptive_loudness);
        l = effects::hifi_air(l, p.hifi_air);
        r = effects::hifi_air(r, p.hifi_air);
        l *= p.pre_gain;
        r *= p.pre_gain;
        l = effects::warmth(l, p.warmth);
        r = effects::warmth(r, p.warmth);

        // Per-band processing
        let ((low_l, low_r), (high_l, high_r)) = self.crossover.split(l, r);
        let (high_l, high_r) = self.clarity.process(high_l, high_r, p.clarity);
        let (high_l, high_r) = effects::widen_high(high_l, high_r, p.width);
        let (low_l, low_r) = effects::widen_low(low_l, low_r, p.width);
        let low_l = effects::sub_bass(low_l, p.sub_bass_depth);
        let low_r = effects::sub_bass(low_r, p.sub_bass_depth);

        // Recombined stereo stages
        let (l, r) = effects::crossfeed(high_l + low_l, high_r + low_r, p.crossfeed);
        let (l, r) = effects::balance(l, r, p.balance);
        let (l, r) = self
            .spatial
            .process(l, r, p.spatial_enabled, p.spatial_rotation_hz);
        let (l, r) = self.dc_blocker.process(l, r);

        (effects::soft_limit(l), effects::soft_limit(r))
    }

    /// Next TPDF value, shared by both channels of a frame
    #[inline]
    pub fn dither(&mut self) -> f64 {
        self.dither.next_value()
    }

    /// Zero every carried value; coefficients are kept and the dither
    /// generator keeps running
    pub fn flush(&mut self) {
        self.crossover.reset();
        self.clarity.reset();
        self.spatial.reset();
        self.dc_blocker.reset();
        self.dither.clear_history();
    }

    /// Flush and rewind the dither generator to its seed
    pub fn reset(&mut self) {
        self.flush();
        self.dither.reset();
    }

    /// True when the filter and DC-blocker history is empty
    pub fn is_cleared(&self) -> bool {
        self.crossover.is_cleared()
            && self.dc_blocker.is_cleared()
            && self.clarity.envelope() == [0.0; 2]
            && self.spatial.phase() == 0.0
    }
}
