//! Harmonic shapers
//!
//! Stateless per-sample curves used around the gain stage and on each band,
//! plus the clarity envelope follower which carries one value per channel.

/// Level above which the low band is softly compressed
pub const SUB_BASS_KNEE: f64 = 0.85;

/// Signal-dependent loudness lift, strongest when `pre_gain` is below unity
///
/// # Arguments
/// * `x` - Input sample
/// * `pre_gain` - Current linear gain; no lift at or above unity
/// * `amount` - Adaptive loudness knob (0.0 to 1.0)
#[inline]
pub fn adaptive_loudness(x: f64, pre_gain: f64, amount: f64) -> f64 {
    if amount <= 0.0 {
        return x;
    }
    let compensation = (1.0 - pre_gain).clamp(0.0, 0.5) * amount;
    x + x * x * x.abs() * compensation * 0.25
}

/// High-frequency harmonic lift
#[inline]
pub fn hifi_air(x: f64, amount: f64) -> f64 {
    if amount <= 0.0 {
        return x;
    }
    x + (x - x.abs() * x) * amount * 0.35
}

/// Soft saturation, `drive = 1 + warmth`
#[inline]
pub fn warmth(x: f64, amount: f64) -> f64 {
    if amount <= 0.0 {
        return x;
    }
    let driven = x * (1.0 + amount);
    driven / (1.0 + driven.abs() * 0.5)
}

/// Cubic sub-bass exciter followed by the symmetric soft knee
#[inline]
pub fn sub_bass(x: f64, depth: f64) -> f64 {
    if depth <= 0.0 {
        return x;
    }
    sub_bass_knee(harmonic_excite(x, depth))
}

#[inline]
fn harmonic_excite(x: f64, depth: f64) -> f64 {
    let s = x * (1.0 + depth * 0.5);
    let limited = if s.abs() > 1.0 {
        s.signum()
    } else {
        1.5 * s - 0.5 * s * s * s
    };
    x + (limited - x) * depth * 0.45
}

#[inline]
fn sub_bass_knee(x: f64) -> f64 {
    let magnitude = x.abs();
    if magnitude <= SUB_BASS_KNEE {
        return x;
    }
    let headroom = 1.0 - SUB_BASS_KNEE;
    x.signum() * (SUB_BASS_KNEE + headroom * ((magnitude - SUB_BASS_KNEE) / headroom).tanh())
}

/// Transient and harmonic exciter for the high band
///
/// The envelope is a one-pole follower (`env = 0.9 env + 0.1 |h|`) per
/// channel; anything rising above it counts as a transient.
#[derive(Debug, Clone, Default)]
pub struct Clarity {
    envelope: [f64; 2],
}

impl Clarity {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one high-band pair
    #[inline]
    pub fn process(&mut self, left: f64, right: f64, amount: f64) -> (f64, f64) {
        if amount <= 0.0 {
            return (left, right);
        }
        (
            Self::excite(&mut self.envelope[0], left, amount),
            Self::excite(&mut self.envelope[1], right, amount),
        )
    }

    #[inline]
    fn excite(envelope: &mut f64, h: f64, amount: f64) -> f64 {
        let harmonic = h * h.abs() * 0.2;
        *envelope = *envelope * 0.9 + h.abs() * 0.1;
        let boost = (h.abs() - *envelope).max(0.0) * 0.6;
        h + (harmonic + boost) * amount
    }

    /// Current envelope values `[left, right]`
    pub fn envelope(&self) -> [f64; 2] {
        self.envelope
    }

    pub fn reset(&mut self) {
        self.envelope = [0.0; 2];
    }
}
