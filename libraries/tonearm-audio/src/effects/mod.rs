//! DSP stages of the stereo chain
//!
//! All stages work on `f64` pairs, nominally in [-1.0, 1.0]. Stateful stages
//! own their per-channel history and expose `reset()`; the rest are plain
//! functions.
//!
//! - **Crossover**: Linkwitz-Riley 4th-order band split at 150 Hz
//! - **Clarity** / shapers: loudness, air, warmth, sub-bass harmonics
//! - **Stereo**: per-band mid/side width, crossfeed, balance
//! - **SpatialRotator**: slow rotating stereo field
//! - **DcBlocker**: first-order DC removal
//! - **soft_limit**: tanh soft-knee limiter
//! - **TpdfDither**: triangular dither for 16-bit output

mod biquad;
mod dc_blocker;
mod dither;
mod enhance;
mod limiter;
mod spatial;
mod stereo;

pub use biquad::{Biquad, BiquadCoefficients, Crossover, BUTTERWORTH_Q, CROSSOVER_HZ};
pub use dc_blocker::{DcBlocker, DC_BLOCKER_R};
pub use dither::TpdfDither;
pub use enhance::{adaptive_loudness, hifi_air, sub_bass, warmth, Clarity, SUB_BASS_KNEE};
pub use limiter::{soft_limit, CEILING as LIMITER_CEILING, THRESHOLD as LIMITER_THRESHOLD};
pub use spatial::{SpatialRotator, MAX_ROTATION_HZ, MIN_ROTATION_HZ};
pub use stereo::{balance, crossfeed, mono_compatibility, widen_high, widen_low};
