//! Soft-knee output limiter
//!
//! Below the threshold the signal passes bit-exact. Above it a tanh curve
//! bends toward full scale with a continuous first derivative at the knee.

/// Knee threshold
pub const THRESHOLD: f64 = 0.62;

/// Output ceiling: the largest `f32` below 1.0, so the bound survives the
/// float output conversion too
pub const CEILING: f64 = 1.0 - 1.0 / 16_777_216.0;

/// Limit one sample to (-1.0, 1.0)
///
/// NaN maps to 0.0.
#[inline]
pub fn soft_limit(x: f64) -> f64 {
    if x.is_nan() {
        return 0.0;
    }
    let magnitude = x.abs();
    if magnitude < THRESHOLD {
        return x;
    }
    let headroom = 1.0 - THRESHOLD;
    let limited = THRESHOLD + headroom * ((magnitude - THRESHOLD) / headroom).tanh();
    limited.min(CEILING).copysign(x)
}
