//! Breathing classifier configuration

use feature_engine::SpectralConfig;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default number of analyses retained
pub const DEFAULT_HISTORY_SIZE: usize = 20;

/// Minimum filtered amplitude for a sample to count as a breath peak
pub const DEFAULT_PEAK_THRESHOLD: f64 = 0.1;

/// Bounds for any rate threshold (breaths per minute)
pub const RATE_LIMITS: (f64, f64) = (1.0, 60.0);

/// Classification thresholds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreathingThresholds {
    /// Lower bound of the normal band (breaths/min)
    pub normal_min_rate: f64,

    /// Upper bound of the normal band (breaths/min)
    pub normal_max_rate: f64,

    /// Depth above which breathing counts as deep (0.0 - 1.0)
    pub deep_threshold: f64,

    /// Depth below which breathing counts as shallow (0.0 - 1.0)
    pub shallow_threshold: f64,

    /// Rate above which breathing counts as rapid (breaths/min)
    pub rapid_threshold: f64,

    /// Regularity below which breathing counts as irregular (0.0 - 1.0)
    pub irregularity_threshold: f64,
}

impl Default for BreathingThresholds {
    fn default() -> Self {
        Self {
            normal_min_rate: 8.0,
            normal_max_rate: 20.0,
            deep_threshold: 0.7,
            shallow_threshold: 0.3,
            rapid_threshold: 25.0,
            irregularity_threshold: 0.7,
        }
    }
}

impl BreathingThresholds {
    /// Copy with every threshold clamped to its valid range.
    ///
    /// Rates fall in `[1, 60]` with `normal_min <= normal_max`; depths in
    /// `[0, 1]` with `shallow <= deep`; irregularity in `[0, 1]`.
    pub fn clamped(&self) -> Self {
        let normal_min_rate = clamp_logged("normal_min_rate", self.normal_min_rate, RATE_LIMITS.0, RATE_LIMITS.1);
        let normal_max_rate = clamp_logged("normal_max_rate", self.normal_max_rate, normal_min_rate, RATE_LIMITS.1);
        let deep_threshold = clamp_logged("deep_threshold", self.deep_threshold, 0.0, 1.0);
        let shallow_threshold = clamp_logged("shallow_threshold", self.shallow_threshold, 0.0, deep_threshold);

        Self {
            normal_min_rate,
            normal_max_rate,
            deep_threshold,
            shallow_threshold,
            rapid_threshold: clamp_logged("rapid_threshold", self.rapid_threshold, RATE_LIMITS.0, RATE_LIMITS.1),
            irregularity_threshold: clamp_logged(
                "irregularity_threshold",
                self.irregularity_threshold,
                0.0,
                1.0,
            ),
        }
    }
}

fn clamp_logged(name: &str, value: f64, min: f64, max: f64) -> f64 {
    let clamped = if value.is_nan() { min } else { value.clamp(min, max) };
    if clamped != value {
        debug!("Threshold {} = {} clamped to {}", name, value, clamped);
    }
    clamped
}

/// Breathing classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BreathingConfig {
    /// Spectral analysis settings (envelope-rate samples, sub-hertz range)
    pub spectral: SpectralConfig,

    /// Capacity of the result, rate and amplitude histories
    pub history_size: usize,

    /// Minimum filtered amplitude of a breath peak
    pub peak_threshold: f64,

    /// Classification thresholds
    pub thresholds: BreathingThresholds,
}

impl Default for BreathingConfig {
    fn default() -> Self {
        Self {
            spectral: SpectralConfig {
                fft_size: 1024,
                sample_rate: 64,
                min_frequency: 0.1,
                max_frequency: Some(1.0),
                hop_size: None,
            },
            history_size: DEFAULT_HISTORY_SIZE,
            peak_threshold: DEFAULT_PEAK_THRESHOLD,
            thresholds: BreathingThresholds::default(),
        }
    }
}

impl BreathingConfig {
    /// Default config for the given window and sample rate, keeping the breathing range
    pub fn new(fft_size: usize, sample_rate: u32) -> Self {
        let mut config = Self::default();
        config.spectral.fft_size = fft_size;
        config.spectral.sample_rate = sample_rate;
        config
    }
}
