//! Biquad sections and the Linkwitz-Riley band splitter
//!
//! The splitter is a 4th-order Linkwitz-Riley crossover: two identical
//! Butterworth (Q = 0.7071) low-pass sections in series for the low band and
//! two identical high-pass sections in series for the high band. The two
//! bands sum to an all-pass response, so splitting and recombining keeps the
//! magnitude flat.

use std::f64::consts::PI;

/// Crossover frequency between the bass and the rest of the spectrum
pub const CROSSOVER_HZ: f64 = 150.0;

/// Butterworth quality factor used by both sections
pub const BUTTERWORTH_Q: f64 = 0.7071;

/// Normalized biquad coefficients (a0 divided out)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    pub b0: f64,
    pub b1: f64,
    pub b2: f64,
    pub a1: f64,
    pub a2: f64,
}

impl BiquadCoefficients {
    /// Pass-through coefficients
    pub const IDENTITY: Self = Self {
        b0: 1.0,
        b1: 0.0,
        b2: 0.0,
        a1: 0.0,
        a2: 0.0,
    };

    /// RBJ cookbook low-pass
    pub fn lowpass(frequency: f64, q: f64, sample_rate: f64) -> Self {
        let (cos_w0, alpha) = Self::prewarp(frequency, q, sample_rate);
        Self::normalize(
            (1.0 - cos_w0) / 2.0,
            1.0 - cos_w0,
            (1.0 - cos_w0) / 2.0,
            1.0 + alpha,
            -2.0 * cos_w0,
            1.0 - alpha,
        )
    }

    /// RBJ cookbook high-pass
    pub fn highpass(frequency: f64, q: f64, sample_rate: f64) -> Self {
        let (cos_w0, alpha) = Self::prewarp(frequency, q, sample_rate);
        Self::normalize(
            (1.0 + cos_w0) / 2.0,
            -(1.0 + cos_w0),
            (1.0 + cos_w0) / 2.0,
            1.0 + alpha,
            -2.0 * cos_w0,
            1.0 - alpha,
        )
    }

    fn prewarp(frequency: f64, q: f64, sample_rate: f64) -> (f64, f64) {
        let w0 = 2.0 * PI * frequency / sample_rate;
        (w0.cos(), w0.sin() / (2.0 * q))
    }

    fn normalize(b0: f64, b1: f64, b2: f64, a0: f64, a1: f64, a2: f64) -> Self {
        Self {
            b0: b0 / a0,
            b1: b1 / a0,
            b2: b2 / a0,
            a1: a1 / a0,
            a2: a2 / a0,
        }
    }
}

impl Default for BiquadCoefficients {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// One biquad section for one channel
///
/// Transposed direct form II. The two delay registers carry across buffer
/// boundaries; changing coefficients never touches them.
#[derive(Debug, Clone, Default)]
pub struct Biquad {
    coefficients: BiquadCoefficients,
    z1: f64,
    z2: f64,
}

impl Biquad {
    /// Create a pass-through section with cleared state
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a section with the given coefficients
    pub fn with_coefficients(coefficients: BiquadCoefficients) -> Self {
        Self {
            coefficients,
            z1: 0.0,
            z2: 0.0,
        }
    }

    /// Replace the coefficients, keeping the delay registers
    pub fn set_coefficients(&mut self, coefficients: BiquadCoefficients) {
        self.coefficients = coefficients;
    }

    /// Current coefficients
    pub fn coefficients(&self) -> BiquadCoefficients {
        self.coefficients
    }

    /// Delay registers `(z1, z2)`
    pub fn state(&self) -> (f64, f64) {
        (self.z1, self.z2)
    }

    #[inline]
    pub fn process(&mut self, input: f64) -> f64 {
        let c = &self.coefficients;
        let output = input * c.b0 + self.z1;
        self.z1 = input * c.b1 + self.z2 - output * c.a1;
        self.z2 = input * c.b2 - output * c.a2;
        output
    }

    /// Clear the delay registers (coefficients are kept)
    pub fn reset(&mut self) {
        self.z1 = 0.0;
        self.z2 = 0.0;
    }
}

/// Cascaded LR4 sections for a single channel
#[derive(Debug, Clone, Default)]
struct ChannelSplitter {
    lowpass: [Biquad; 2],
    highpass: [Biquad; 2],
}

impl ChannelSplitter {
    #[inline]
    fn split(&mut self, input: f64) -> (f64, f64) {
        let stage = self.lowpass[0].process(input);
        let low = self.lowpass[1].process(stage);
        let stage = self.highpass[0].process(input);
        let high = self.highpass[1].process(stage);
        (low, high)
    }

    fn set_coefficients(&mut self, lowpass: BiquadCoefficients, highpass: BiquadCoefficients) {
        for section in &mut self.lowpass {
            section.set_coefficients(lowpass);
        }
        for section in &mut self.highpass {
            section.set_coefficients(highpass);
        }
    }

    fn reset(&mut self) {
        for section in self.lowpass.iter_mut().chain(self.highpass.iter_mut()) {
            section.reset();
        }
    }

    fn is_cleared(&self) -> bool {
        self.lowpass
            .iter()
            .chain(self.highpass.iter())
            .all(|section| section.state() == (0.0, 0.0))
    }
}

/// Stereo Linkwitz-Riley 4th-order crossover
///
/// Owns eight independent sections: {LP1, LP2, HP1, HP2} x {left, right}.
#[derive(Debug, Clone)]
pub struct Crossover {
    left: ChannelSplitter,
    right: ChannelSplitter,
    frequency: f64,
    sample_rate: f64,
}

impl Crossover {
    /// Create a crossover designed for `frequency` at `sample_rate`
    pub fn new(frequency: f64, sample_rate: f64) -> Self {
        let mut crossover = Self {
            left: ChannelSplitter::default(),
            right: ChannelSplitter::default(),
            frequency,
            sample_rate,
        };
        crossover.design();
        crossover
    }

    /// Recompute coefficients for a new sample rate (delay registers are kept)
    pub fn set_sample_rate(&mut self, sample_rate: f64) {
        self.sample_rate = sample_rate;
        self.design();
    }

    fn design(&mut self) {
        // Keep the split point clear of Nyquist for very low rates
        let frequency = self.frequency.min(self.sample_rate * 0.45);
        let lowpass = BiquadCoefficients::lowpass(frequency, BUTTERWORTH_Q, self.sample_rate);
        let highpass = BiquadCoefficients::highpass(frequency, BUTTERWORTH_Q, self.sample_rate);
        self.left.set_coefficients(lowpass, highpass);
        self.right.set_coefficients(lowpass, highpass);
    }

    /// Crossover frequency in Hz
    pub fn frequency(&self) -> f64 {
        self.frequency
    }

    /// Sample rate the coefficients were designed for
    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    /// Low-pass section coefficients (shared by all four LP sections)
    pub fn lowpass_coefficients(&self) -> BiquadCoefficients {
        self.left.lowpass[0].coefficients()
    }

    /// High-pass section coefficients (shared by all four HP sections)
    pub fn highpass_coefficients(&self) -> BiquadCoefficients {
        self.left.highpass[0].coefficients()
    }

    /// Split a stereo pair into `((low_l, low_r), (high_l, high_r))`
    #[inline]
    pub fn split(&mut self, left: f64, right: f64) -> ((f64, f64), (f64, f64)) {
        let (low_l, high_l) = self.left.split(left);
        let (low_r, high_r) = self.right.split(right);
        ((low_l, low_r), (high_l, high_r))
    }

    /// Clear every delay register
    pub fn reset(&mut self) {
        self.left.reset();
        self.right.reset();
    }

    /// True when all eight sections have empty delay registers
    pub fn is_cleared(&self) -> bool {
        self.left.is_cleared() && self.right.is_cleared()
    }
}
