//! DC blocking filter
//!
//! First-order high-pass, `H(z) = (1 - z^-1) / (1 - R z^-1)` with a fixed
//! `R = 0.995`. The cutoff is `(1 - R) / 2π · fs`, about 35 Hz at 44.1 kHz.

/// Pole position
pub const DC_BLOCKER_R: f64 = 0.995;

/// Stereo DC blocker
#[derive(Debug, Clone, Default)]
pub struct DcBlocker {
    x_prev: [f64; 2],
    y_prev: [f64; 2],
}

impl DcBlocker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn process(&mut self, left: f64, right: f64) -> (f64, f64) {
        (self.step(0, left), self.step(1, right))
    }

    #[inline]
    fn step(&mut self, channel: usize, input: f64) -> f64 {
        let output = input - self.x_prev[channel] + DC_BLOCKER_R * self.y_prev[channel];
        self.x_prev[channel] = input;
        self.y_prev[channel] = output;
        output
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// True when no history is held
    pub fn is_cleared(&self) -> bool {
        self.x_prev == [0.0; 2] && self.y_prev == [0.0; 2]
    }
}
