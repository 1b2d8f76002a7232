//! TPDF dither for 16-bit output
//!
//! Triangular noise formed as the difference of two consecutive uniform draws
//! in [-1, 1) / 32768, so consecutive dither values are high-pass correlated.
//! Left and right share one value per frame.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// One 16-bit LSB in normalized units
const LSB: f64 = 1.0 / 32_768.0;

/// Seedable TPDF noise source
#[derive(Debug, Clone)]
pub struct TpdfDither {
    rng: SmallRng,
    seed: u64,
    previous: f64,
}

impl TpdfDither {
    /// Create a source with a fixed seed (reproducible output)
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            seed,
            previous: 0.0,
        }
    }

    /// Create a source with a random seed
    pub fn new() -> Self {
        Self::with_seed(rand::random())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Next dither value, within ±2 LSB
    #[inline]
    pub fn next_value(&mut self) -> f64 {
        let current = self.rng.gen_range(-1.0_f64..1.0) * LSB;
        let dither = current - self.previous;
        self.previous = current;
        dither
    }

    /// Forget the carried draw; the generator keeps its position
    pub fn clear_history(&mut self) {
        self.previous = 0.0;
    }

    /// Rewind to the start of the seeded sequence
    pub fn reset(&mut self) {
        self.rng = SmallRng::seed_from_u64(self.seed);
        self.previous = 0.0;
    }
}

impl Default for TpdfDither {
    fn default() -> Self {
        Self::new()
    }
}
