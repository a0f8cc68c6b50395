//! Spectral Feature Set and Derived Scalar Features

use serde::{Deserialize, Serialize};

/// Fraction of total magnitude below the spectral rolloff frequency
pub const ROLLOFF_THRESHOLD: f64 = 0.85;

/// Tempo estimate bounds (BPM)
pub const TEMPO_MIN_BPM: f64 = 60.0;
pub const TEMPO_MAX_BPM: f64 = 200.0;

/// Features computed from one analysis window.
///
/// Built fresh by every `SpectralEngine::analyze` call and never mutated
/// afterwards. All spectra hold `N/2 + 1` bins.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpectralFeatures {
    /// `|X_k|` for bins `0..=N/2`
    pub magnitude_spectrum: Vec<f64>,
    /// `arg(X_k)` for bins `0..=N/2`
    pub phase_spectrum: Vec<f64>,
    /// Center frequency of each bin (Hz)
    pub frequencies: Vec<f64>,
    /// Frequency of the largest-magnitude bin (Hz)
    pub fundamental_frequency: f64,
    /// Magnitude-weighted mean frequency (Hz)
    pub spectral_centroid: f64,
    /// Frequency below which 85% of the magnitude sum lies (Hz)
    pub spectral_rolloff: f64,
    /// Fraction of adjacent sample pairs that change sign
    pub zero_crossing_rate: f64,
    /// Heuristic tempo (BPM), derived from the zero-crossing rate
    pub tempo: f64,
    /// RMS level, capped at 1.0
    pub volume_level: f64,
}

impl SpectralFeatures {
    /// Total spectral energy `Σ|X_k|²`
    pub fn total_energy(&self) -> f64 {
        self.magnitude_spectrum.iter().map(|m| m * m).sum()
    }

    /// True when the spectrum carries no energy at all
    pub fn is_silent(&self) -> bool {
        self.magnitude_spectrum.iter().all(|&m| m == 0.0)
    }

    /// Frequency of the strongest bin inside `[min_hz, max_hz]`.
    /// `None` when no bin in the range carries energy.
    pub fn peak_in_range(&self, min_hz: f64, max_hz: f64) -> Option<f64> {
        self.frequencies
            .iter()
            .zip(self.magnitude_spectrum.iter())
            .filter(|&(&freq, &mag)| freq >= min_hz && freq <= max_hz && mag > 0.0)
            .fold(None, |best: Option<(f64, f64)>, (&freq, &mag)| match best {
                Some((_, best_mag)) if best_mag >= mag => best,
                _ => Some((freq, mag)),
            })
            .map(|(freq, _)| freq)
    }
}

/// Frequency of the first bin holding the maximum magnitude
pub fn fundamental_frequency(magnitudes: &[f64], bin_hz: f64) -> f64 {
    let mut peak_bin = 0;
    let mut peak = f64::NEG_INFINITY;
    for (i, &magnitude) in magnitudes.iter().enumerate() {
        if magnitude > peak {
            peak = magnitude;
            peak_bin = i;
        }
    }
    peak_bin as f64 * bin_hz
}

/// Magnitude-weighted mean frequency
pub fn spectral_centroid(magnitudes: &[f64], bin_hz: f64) -> f64 {
    let magnitude_sum: f64 = magnitudes.iter().sum();
    if magnitude_sum <= 0.0 {
        return 0.0;
    }

    let weighted: f64 = magnitudes
        .iter()
        .enumerate()
        .map(|(i, &magnitude)| i as f64 * bin_hz * magnitude)
        .sum();

    weighted / magnitude_sum
}

/// Frequency at which the cumulative magnitude first reaches `threshold` of the total
pub fn spectral_rolloff(magnitudes: &[f64], bin_hz: f64, threshold: f64) -> f64 {
    if magnitudes.is_empty() {
        return 0.0;
    }

    let target = magnitudes.iter().sum::<f64>() * threshold;
    let mut cumulative = 0.0;
    for (i, &magnitude) in magnitudes.iter().enumerate() {
        cumulative += magnitude;
        if cumulative >= target {
            return i as f64 * bin_hz;
        }
    }

    (magnitudes.len() - 1) as f64 * bin_hz
}

/// Fraction of adjacent pairs whose sign differs (zero counts as positive)
pub fn zero_crossing_rate(samples: &[f64]) -> f64 {
    if samples.len() < 2 {
        return 0.0;
    }

    let crossings = samples
        .windows(2)
        .filter(|pair| (pair[0] >= 0.0) != (pair[1] >= 0.0))
        .count();

    crossings as f64 / (samples.len() - 1) as f64
}

/// Rough tempo from the zero-crossing rate, clamped to `[60, 200]` BPM
pub fn estimate_tempo(zero_crossing_rate: f64) -> f64 {
    (zero_crossing_rate * 60.0 * 2.0).clamp(TEMPO_MIN_BPM, TEMPO_MAX_BPM)
}

/// RMS level capped at 1.0
pub fn volume_level(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f64 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f64).sqrt().min(1.0)
}
