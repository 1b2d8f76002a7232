//! Stereo field: mid/side width per band, crossfeed and balance
//!
//! - Mid = (L + R) / 2
//! - Side = (L - R) / 2
//!
//! Widening only applies to the high band. Bass stays centered once width
//! goes past 1.0, and the mid channel of the high band gets a small lift so
//! vocals are not pushed back by the extra side energy.

/// Mid lift per unit of width above 1.0 (high band only)
const VOCAL_PROTECTION: f64 = 0.15;

/// Crossfeed mix at `crossfeed = 1.0`
const CROSSFEED_MAX_MIX: f64 = 0.28;

#[inline]
fn mid_side(left: f64, right: f64) -> (f64, f64) {
    ((left + right) / 2.0, (left - right) / 2.0)
}

/// High-band width with vocal protection
///
/// # Arguments
/// * `left`, `right` - High band of each channel
/// * `width` - 0.0 = mono, 1.0 = unchanged, 2.0 = double side level
#[inline]
pub fn widen_high(left: f64, right: f64, width: f64) -> (f64, f64) {
    let (mut mid, side) = mid_side(left, right);
    if width > 1.0 {
        mid *= 1.0 + (width - 1.0) * VOCAL_PROTECTION;
    }
    (mid + side * width, mid - side * width)
}

/// Low-band width: narrowing follows `width`, widening collapses to mono
#[inline]
pub fn widen_low(left: f64, right: f64, width: f64) -> (f64, f64) {
    let bass_width = if width > 1.0 { 0.0 } else { width };
    let (mid, side) = mid_side(left, right);
    (mid + side * bass_width, mid - side * bass_width)
}

/// Mix each channel into the other by `crossfeed * 0.28`
#[inline]
pub fn crossfeed(left: f64, right: f64, amount: f64) -> (f64, f64) {
    if amount <= 0.0 {
        return (left, right);
    }
    let mix = amount * CROSSFEED_MAX_MIX;
    (
        left * (1.0 - mix) + right * mix,
        right * (1.0 - mix) + left * mix,
    )
}

/// Balance (-1.0 = left only, 0.0 = center, 1.0 = right only)
#[inline]
pub fn balance(left: f64, right: f64, balance: f64) -> (f64, f64) {
    (
        left * (1.0 - balance).clamp(0.0, 1.0),
        right * (1.0 + balance).clamp(0.0, 1.0),
    )
}

/// Correlation between channels (-1.0 = out of phase, 1.0 = mono)
///
/// Returns 1.0 for silence.
pub fn mono_compatibility(left: &[f64], right: &[f64]) -> f64 {
    let mut sum_lr = 0.0;
    let mut sum_ll = 0.0;
    let mut sum_rr = 0.0;
    for (&l, &r) in left.iter().zip(right) {
        sum_lr += l * r;
        sum_ll += l * l;
        sum_rr += r * r;
    }
    let denominator = (sum_ll * sum_rr).sqrt();
    if denominator < 1e-12 {
        1.0
    } else {
        sum_lr / denominator
    }
}
