//! Breathing metrics, classification and stress scoring

use crate::config::BreathingThresholds;
use crate::state::{BreathingPattern, BreathingState};
use feature_engine::SummaryStatistics;

/// Breathing rate bounds (breaths per minute)
pub const MIN_BREATHING_RATE: f64 = 4.0;
pub const MAX_BREATHING_RATE: f64 = 60.0;

/// Rate history needed before a pattern is reported
pub const MIN_PATTERN_HISTORY: usize = 3;

/// Breaths per minute from the dominant frequency, clamped to `[4, 60]`
pub fn breathing_rate(fundamental_hz: f64) -> f64 {
    (fundamental_hz * 60.0).clamp(MIN_BREATHING_RATE, MAX_BREATHING_RATE)
}

/// Depth from the RMS level: `min(1, 2 * volume)`
pub fn breathing_depth(volume_level: f64) -> f64 {
    (volume_level * 2.0).min(1.0)
}

/// `1 - min(1, std/mean)` over the rate history; 1.0 with fewer than two rates
pub fn regularity(rates: &[f64]) -> f64 {
    if rates.len() < 2 {
        return 1.0;
    }
    let cv = SummaryStatistics::compute(rates.iter().copied()).coefficient_of_variation();
    (1.0 - cv.min(1.0)).clamp(0.0, 1.0)
}

/// Pattern from the spread and level of the rate history
pub fn classify_pattern(rates: &[f64]) -> BreathingPattern {
    if rates.len() < MIN_PATTERN_HISTORY {
        return BreathingPattern::Unknown;
    }

    let stats = SummaryStatistics::compute(rates.iter().copied());
    let cv = stats.coefficient_of_variation();

    if cv < 0.1 {
        BreathingPattern::Regular
    } else if cv > 0.3 {
        BreathingPattern::Irregular
    } else if stats.mean < 8.0 {
        BreathingPattern::Relaxed
    } else if stats.mean > 20.0 {
        BreathingPattern::Stressed
    } else if stats.mean > 15.0 {
        BreathingPattern::Exercise
    } else {
        BreathingPattern::Cyclical
    }
}

/// State by priority: rate band first, then regularity, then depth
pub fn classify_state(
    rate: f64,
    depth: f64,
    regularity: f64,
    thresholds: &BreathingThresholds,
) -> BreathingState {
    if rate < thresholds.normal_min_rate {
        if depth > thresholds.deep_threshold {
            BreathingState::Deep
        } else {
            BreathingState::Holding
        }
    } else if rate > thresholds.rapid_threshold {
        BreathingState::Rapid
    } else if rate > thresholds.normal_max_rate {
        if depth < thresholds.shallow_threshold {
            BreathingState::Shallow
        } else {
            BreathingState::Rapid
        }
    } else if regularity < thresholds.irregularity_threshold {
        BreathingState::Irregular
    } else if depth > thresholds.deep_threshold {
        BreathingState::Deep
    } else if depth < thresholds.shallow_threshold {
        BreathingState::Shallow
    } else {
        BreathingState::Normal
    }
}

/// Stress score in `[0, 1]` from elevated rate, irregularity and shallowness
pub fn stress_level(rate: f64, depth: f64, regularity: f64, thresholds: &BreathingThresholds) -> f64 {
    let mut stress = 0.0;

    if rate > thresholds.normal_max_rate {
        let span = thresholds.rapid_threshold - thresholds.normal_max_rate;
        stress += if span > 0.0 {
            (rate - thresholds.normal_max_rate) / span
        } else {
            1.0
        };
    }

    stress += (1.0 - regularity) * 0.5;

    if depth < thresholds.shallow_threshold && thresholds.shallow_threshold > 0.0 {
        stress += (thresholds.shallow_threshold - depth) / thresholds.shallow_threshold;
    }

    stress.clamp(0.0, 1.0)
}

/// Relaxation score in `[0, 1]` from normal rate, regularity and depth
pub fn relaxation_level(rate: f64, depth: f64, regularity: f64, thresholds: &BreathingThresholds) -> f64 {
    let mut relaxation = 0.0;

    if rate >= thresholds.normal_min_rate && rate <= thresholds.normal_max_rate {
        relaxation += 0.4;
    }

    relaxation += regularity * 0.3;

    if depth > thresholds.deep_threshold {
        relaxation += (depth - thresholds.deep_threshold) * 0.3;
    }

    relaxation.clamp(0.0, 1.0)
}
