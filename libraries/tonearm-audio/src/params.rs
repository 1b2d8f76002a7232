//! Parameter surface
//!
//! Every knob is its own atomic cell, written from a control thread and read
//! by the audio thread once per buffer through [`ProcessorParameters::snapshot`].
//! Setters clamp to the knob's range and ignore non-finite values.

use atomic_float::AtomicF64;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use tonearm_core::TonearmError;
use tracing::warn;

use crate::effects::{MAX_ROTATION_HZ, MIN_ROTATION_HZ};

/// One clamped atomic knob
#[derive(Debug)]
struct Knob {
    name: &'static str,
    value: AtomicF64,
    min: f64,
    max: f64,
}

impl Knob {
    fn new(name: &'static str, default: f64, min: f64, max: f64) -> Self {
        Self {
            name,
            value: AtomicF64::new(default),
            min,
            max,
        }
    }

    #[inline]
    fn get(&self) -> f64 {
        self.value.load(Ordering::Relaxed)
    }

    fn set(&self, value: f64) {
        if !value.is_finite() {
            warn!(knob = self.name, value, "Ignoring non-finite parameter value");
            return;
        }
        self.value
            .store(value.clamp(self.min, self.max), Ordering::Relaxed);
    }
}

/// Thread-safe holder of every user-tunable knob
///
/// Share it through an `Arc` between the control side and a
/// [`StereoProcessor`](crate::StereoProcessor).
#[derive(Debug)]
pub struct ProcessorParameters {
    pre_gain: Knob,
    balance: Knob,
    width: Knob,
    crossfeed: Knob,
    clarity: Knob,
    warmth: Knob,
    sub_bass_depth: Knob,
    hifi_air: Knob,
    adaptive_loudness: Knob,
    spatial_enabled: AtomicBool,
    spatial_rotation_hz: Knob,
}

impl ProcessorParameters {
    /// Create parameters at their defaults (flat response)
    pub fn new() -> Self {
        let defaults = ParameterSnapshot::default();
        Self {
            pre_gain: Knob::new("pre_gain", defaults.pre_gain, 0.0, f64::MAX),
            balance: Knob::new("balance", defaults.balance, -1.0, 1.0),
            width: Knob::new("width", defaults.width, 0.0, 2.0),
            crossfeed: Knob::new("crossfeed", defaults.crossfeed, 0.0, 1.0),
            clarity: Knob::new("clarity", defaults.clarity, 0.0, 1.0),
            warmth: Knob::new("warmth", defaults.warmth, 0.0, 1.0),
            sub_bass_depth: Knob::new("sub_bass_depth", defaults.sub_bass_depth, 0.0, 1.0),
            hifi_air: Knob::new("hifi_air", defaults.hifi_air, 0.0, 1.0),
            adaptive_loudness: Knob::new(
                "adaptive_loudness",
                defaults.adaptive_loudness,
                0.0,
                1.0,
            ),
            spatial_enabled: AtomicBool::new(defaults.spatial_enabled),
            spatial_rotation_hz: Knob::new(
                "spatial_rotation_hz",
                defaults.spatial_rotation_hz,
                MIN_ROTATION_HZ,
                MAX_ROTATION_HZ,
            ),
        }
    }

    /// Create parameters initialized from a snapshot (values are clamped)
    pub fn from_snapshot(snapshot: &ParameterSnapshot) -> Self {
        let params = Self::new();
        params.apply(snapshot);
        params
    }

    /// Linear gain before shaping (>= 0, unity by default)
    pub fn pre_gain(&self) -> f64 {
        self.pre_gain.get()
    }

    pub fn set_pre_gain(&self, value: f64) {
        self.pre_gain.set(value);
    }

    /// Left/right skew (-1..1)
    pub fn balance(&self) -> f64 {
        self.balance.get()
    }

    pub fn set_balance(&self, value: f64) {
        self.balance.set(value);
    }

    /// Stereo width (0 = mono, 1 = unchanged, 2 = extra wide)
    pub fn width(&self) -> f64 {
        self.width.get()
    }

    pub fn set_width(&self, value: f64) {
        self.width.set(value);
    }

    /// Headphone crossfeed amount (0..1)
    pub fn crossfeed(&self) -> f64 {
        self.crossfeed.get()
    }

    pub fn set_crossfeed(&self, value: f64) {
        self.crossfeed.set(value);
    }

    /// High-band exciter amount (0..1)
    pub fn clarity(&self) -> f64 {
        self.clarity.get()
    }

    pub fn set_clarity(&self, value: f64) {
        self.clarity.set(value);
    }

    /// Soft saturation amount (0..1)
    pub fn warmth(&self) -> f64 {
        self.warmth.get()
    }

    pub fn set_warmth(&self, value: f64) {
        self.warmth.set(value);
    }

    /// Low-band harmonic enhancement (0..1)
    pub fn sub_bass_depth(&self) -> f64 {
        self.sub_bass_depth.get()
    }

    pub fn set_sub_bass_depth(&self, value: f64) {
        self.sub_bass_depth.set(value);
    }

    /// High-frequency harmonic lift (0..1)
    pub fn hifi_air(&self) -> f64 {
        self.hifi_air.get()
    }

    pub fn set_hifi_air(&self, value: f64) {
        self.hifi_air.set(value);
    }

    /// Signal-dependent loudness compensation (0..1)
    pub fn adaptive_loudness(&self) -> f64 {
        self.adaptive_loudness.get()
    }

    pub fn set_adaptive_loudness(&self, value: f64) {
        self.adaptive_loudness.set(value);
    }

    pub fn spatial_enabled(&self) -> bool {
        self.spatial_enabled.load(Ordering::Relaxed)
    }

    pub fn set_spatial_enabled(&self, enabled: bool) {
        self.spatial_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Rotation speed of the spatial effect in Hz (0.05..1.0)
    pub fn spatial_rotation_hz(&self) -> f64 {
        self.spatial_rotation_hz.get()
    }

    pub fn set_spatial_rotation_hz(&self, value: f64) {
        self.spatial_rotation_hz.set(value);
    }

    /// Read every knob once
    ///
    /// Knobs are read independently; a concurrent writer may land between two
    /// reads, but each value is whole.
    #[inline]
    pub fn snapshot(&self) -> ParameterSnapshot {
        ParameterSnapshot {
            pre_gain: self.pre_gain(),
            balance: self.balance(),
            width: self.width(),
            crossfeed: self.crossfeed(),
            clarity: self.clarity(),
            warmth: self.warmth(),
            sub_bass_depth: self.sub_bass_depth(),
            hifi_air: self.hifi_air(),
            adaptive_loudness: self.adaptive_loudness(),
            spatial_enabled: self.spatial_enabled(),
            spatial_rotation_hz: self.spatial_rotation_hz(),
        }
    }

    /// Write every knob from a snapshot through the clamping setters
    pub fn apply(&self, snapshot: &ParameterSnapshot) {
        self.set_pre_gain(snapshot.pre_gain);
        self.set_balance(snapshot.balance);
        self.set_width(snapshot.width);
        self.set_crossfeed(snapshot.crossfeed);
        self.set_clarity(snapshot.clarity);
        self.set_warmth(snapshot.warmth);
        self.set_sub_bass_depth(snapshot.sub_bass_depth);
        self.set_hifi_air(snapshot.hifi_air);
        self.set_adaptive_loudness(snapshot.adaptive_loudness);
        self.set_spatial_enabled(snapshot.spatial_enabled);
        self.set_spatial_rotation_hz(snapshot.spatial_rotation_hz);
    }

    pub fn reset_to_defaults(&self) {
        self.apply(&ParameterSnapshot::default());
    }
}

impl Default for ProcessorParameters {
    fn default() -> Self {
        Self::new()
    }
}

fn default_unity() -> f64 {
    1.0
}

fn default_rotation_hz() -> f64 {
    0.12
}

/// Plain copy of every knob
///
/// Used once per buffer by the pipeline, and as the `[processor]` section of
/// configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSnapshot {
    #[serde(default = "default_unity")]
    pub pre_gain: f64,
    #[serde(default)]
    pub balance: f64,
    #[serde(default = "default_unity")]
    pub width: f64,
    #[serde(default)]
    pub crossfeed: f64,
    #[serde(default)]
    pub clarity: f64,
    #[serde(default)]
    pub warmth: f64,
    #[serde(default)]
    pub sub_bass_depth: f64,
    #[serde(default)]
    pub hifi_air: f64,
    #[serde(default)]
    pub adaptive_loudness: f64,
    #[serde(default)]
    pub spatial_enabled: bool,
    #[serde(default = "default_rotation_hz")]
    pub spatial_rotation_hz: f64,
}

impl Default for ParameterSnapshot {
    fn default() -> Self {
        Self {
            pre_gain: default_unity(),
            balance: 0.0,
            width: default_unity(),
            crossfeed: 0.0,
            clarity: 0.0,
            warmth: 0.0,
            sub_bass_depth: 0.0,
            hifi_air: 0.0,
            adaptive_loudness: 0.0,
            spatial_enabled: false,
            spatial_rotation_hz: default_rotation_hz(),
        }
    }
}

impl ParameterSnapshot {
    /// True when every stage is neutral
    pub fn is_flat(&self) -> bool {
        *self
            == Self {
                spatial_rotation_hz: self.spatial_rotation_hz,
                ..Self::default()
            }
    }
}

/// Named starting points for the knobs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Preset {
    /// Everything neutral
    #[default]
    Flat,
    /// Crossfeed and slight narrowing for headphone listening
    Headphone,
    /// Saturation and sub-bass
    Warm,
    /// Wider highs with some air
    Wide,
    /// Rotating stereo field
    Spatial,
}

impl Preset {
    pub const ALL: [Self; 5] = [
        Self::Flat,
        Self::Headphone,
        Self::Warm,
        Self::Wide,
        Self::Spatial,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::Flat => "flat",
            Self::Headphone => "headphone",
            Self::Warm => "warm",
            Self::Wide => "wide",
            Self::Spatial => "spatial",
        }
    }

    /// Knob values for this preset
    pub fn snapshot(&self) -> ParameterSnapshot {
        let flat = ParameterSnapshot::default();
        match self {
            Self::Flat => flat,
            Self::Headphone => ParameterSnapshot {
                crossfeed: 0.6,
                width: 0.9,
                clarity: 0.2,
                ..flat
            },
            Self::Warm => ParameterSnapshot {
                pre_gain: 0.9,
                warmth: 0.4,
                sub_bass_depth: 0.3,
                adaptive_loudness: 0.3,
                ..flat
            },
            Self::Wide => ParameterSnapshot {
                width: 1.5,
                clarity: 0.3,
                hifi_air: 0.2,
                ..flat
            },
            Self::Spatial => ParameterSnapshot {
                width: 1.2,
                spatial_enabled: true,
                ..flat
            },
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Preset {
    type Err = TonearmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|preset| preset.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                TonearmError::invalid_input(format!(
                    "unknown preset '{s}' (expected one of flat, headphone, warm, wide, spatial)"
                ))
            })
    }
}
