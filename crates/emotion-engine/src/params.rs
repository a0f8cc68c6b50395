//! Adaptation parameters

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

/// Valid range of the volume multiplier
pub const VOLUME_RANGE: RangeInclusive<f64> = 0.0..=2.0;
/// Valid range of the tempo multiplier
pub const TEMPO_RANGE: RangeInclusive<f64> = 0.5..=2.0;
/// Valid range of bass/treble boost and reverb amount
pub const EFFECT_RANGE: RangeInclusive<f64> = 0.0..=1.0;
/// Valid range of the echo delay (seconds)
pub const ECHO_DELAY_RANGE: RangeInclusive<f64> = 0.0..=1.0;

/// Weight of the new value when blending against the previous parameters
pub const SMOOTHING_FACTOR: f64 = 0.7;

/// Audio adaptation knobs applied by the effect chain
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdaptationParameters {
    /// Gain multiplier (0.0 - 2.0)
    pub volume_multiplier: f64,
    /// Strided resampling step (0.5 - 2.0)
    pub tempo_multiplier: f64,
    /// Low-frequency emphasis (0.0 - 1.0)
    pub bass_boost: f64,
    /// High-frequency emphasis (0.0 - 1.0)
    pub treble_boost: f64,
    /// Reverb tap level (0.0 - 1.0)
    pub reverb_amount: f64,
    /// Echo delay in seconds (0.0 - 1.0)
    pub echo_delay: f64,
}

impl Default for AdaptationParameters {
    fn default() -> Self {
        Self::neutral()
    }
}

impl AdaptationParameters {
    /// Identity parameters: the chain leaves audio unchanged
    pub const fn neutral() -> Self {
        Self {
            volume_multiplier: 1.0,
            tempo_multiplier: 1.0,
            bass_boost: 0.0,
            treble_boost: 0.0,
            reverb_amount: 0.0,
            echo_delay: 0.0,
        }
    }

    /// Construct from the six knobs in chain order
    pub const fn new(
        volume_multiplier: f64,
        tempo_multiplier: f64,
        bass_boost: f64,
        treble_boost: f64,
        reverb_amount: f64,
        echo_delay: f64,
    ) -> Self {
        Self {
            volume_multiplier,
            tempo_multiplier,
            bass_boost,
            treble_boost,
            reverb_amount,
            echo_delay,
        }
    }

    /// Copy with every knob clamped to its valid range (NaN maps to the range start)
    pub fn clamped(&self) -> Self {
        Self {
            volume_multiplier: clamp_to(self.volume_multiplier, &VOLUME_RANGE),
            tempo_multiplier: clamp_to(self.tempo_multiplier, &TEMPO_RANGE),
            bass_boost: clamp_to(self.bass_boost, &EFFECT_RANGE),
            treble_boost: clamp_to(self.treble_boost, &EFFECT_RANGE),
            reverb_amount: clamp_to(self.reverb_amount, &EFFECT_RANGE),
            echo_delay: clamp_to(self.echo_delay, &ECHO_DELAY_RANGE),
        }
    }

    /// `factor * self + (1 - factor) * previous`, knob by knob
    pub fn blend(&self, previous: &Self, factor: f64) -> Self {
        let mix = |new: f64, old: f64| factor * new + (1.0 - factor) * old;
        Self {
            volume_multiplier: mix(self.volume_multiplier, previous.volume_multiplier),
            tempo_multiplier: mix(self.tempo_multiplier, previous.tempo_multiplier),
            bass_boost: mix(self.bass_boost, previous.bass_boost),
            treble_boost: mix(self.treble_boost, previous.treble_boost),
            reverb_amount: mix(self.reverb_amount, previous.reverb_amount),
            echo_delay: mix(self.echo_delay, previous.echo_delay),
        }
    }

    /// Largest per-knob absolute difference
    pub fn max_deviation(&self, other: &Self) -> f64 {
        [
            self.volume_multiplier - other.volume_multiplier,
            self.tempo_multiplier - other.tempo_multiplier,
            self.bass_boost - other.bass_boost,
            self.treble_boost - other.treble_boost,
            self.reverb_amount - other.reverb_amount,
            self.echo_delay - other.echo_delay,
        ]
        .iter()
        .fold(0.0, |acc: f64, d| acc.max(d.abs()))
    }
}

fn clamp_to(value: f64, range: &RangeInclusive<f64>) -> f64 {
    if value.is_nan() {
        return *range.start();
    }
    value.clamp(*range.start(), *range.end())
}
