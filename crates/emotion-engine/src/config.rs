//! Emotion classifier configuration

use crate::params::AdaptationParameters;
use crate::state::EmotionalState;
use feature_engine::SpectralConfig;
use serde::{Deserialize, Serialize};

/// Default number of smoothed parameter sets retained
pub const DEFAULT_HISTORY_SIZE: usize = 10;

/// Default adaptation sensitivity
pub const DEFAULT_SENSITIVITY: f64 = 0.7;

/// Per-state adaptation presets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionPresets {
    pub calm: AdaptationParameters,
    pub excited: AdaptationParameters,
    pub stressed: AdaptationParameters,
    pub focused: AdaptationParameters,
    pub relaxed: AdaptationParameters,
}

impl Default for EmotionPresets {
    fn default() -> Self {
        Self {
            calm: AdaptationParameters::new(0.8, 0.9, 0.2, 0.1, 0.3, 0.1),
            excited: AdaptationParameters::new(1.2, 1.1, 0.4, 0.3, 0.1, 0.0),
            stressed: AdaptationParameters::new(0.7, 0.8, 0.1, 0.0, 0.5, 0.2),
            focused: AdaptationParameters::new(1.0, 1.0, 0.0, 0.2, 0.0, 0.0),
            relaxed: AdaptationParameters::new(0.9, 0.85, 0.3, 0.0, 0.4, 0.15),
        }
    }
}

impl EmotionPresets {
    /// Preset for `state`; `Unknown` maps to the neutral identity
    pub fn get(&self, state: EmotionalState) -> AdaptationParameters {
        match state {
            EmotionalState::Calm => self.calm,
            EmotionalState::Excited => self.excited,
            EmotionalState::Stressed => self.stressed,
            EmotionalState::Focused => self.focused,
            EmotionalState::Relaxed => self.relaxed,
            EmotionalState::Unknown => AdaptationParameters::neutral(),
        }
    }

    /// Replace the preset for `state`. Returns false for `Unknown`, which has no slot.
    pub fn set(&mut self, state: EmotionalState, params: AdaptationParameters) -> bool {
        let slot = match state {
            EmotionalState::Calm => &mut self.calm,
            EmotionalState::Excited => &mut self.excited,
            EmotionalState::Stressed => &mut self.stressed,
            EmotionalState::Focused => &mut self.focused,
            EmotionalState::Relaxed => &mut self.relaxed,
            EmotionalState::Unknown => return false,
        };
        *slot = params;
        true
    }

    /// Copy with every preset clamped to the valid knob ranges
    pub fn clamped(&self) -> Self {
        Self {
            calm: self.calm.clamped(),
            excited: self.excited.clamped(),
            stressed: self.stressed.clamped(),
            focused: self.focused.clamped(),
            relaxed: self.relaxed.clamped(),
        }
    }
}

/// Emotion classifier configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmotionConfig {
    /// Spectral analysis settings
    pub spectral: SpectralConfig,

    /// Capacity of the smoothing history
    pub history_size: usize,

    /// Adaptation sensitivity (0.0 - 1.0), consumed by callers
    pub adaptation_sensitivity: f64,

    /// Per-state adaptation presets
    pub presets: EmotionPresets,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            spectral: SpectralConfig::default(),
            history_size: DEFAULT_HISTORY_SIZE,
            adaptation_sensitivity: DEFAULT_SENSITIVITY,
            presets: EmotionPresets::default(),
        }
    }
}

impl EmotionConfig {
    /// Default config for the given window and sample rate
    pub fn new(fft_size: usize, sample_rate: u32) -> Self {
        Self {
            spectral: SpectralConfig::new(fft_size, sample_rate),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_presets_are_in_range() {
        let presets = EmotionPresets::default();
        assert_eq!(presets.clamped(), presets);
    }

    #[test]
    fn test_unknown_maps_to_neutral() {
        let mut presets = EmotionPresets::default();
        assert_eq!(
            presets.get(EmotionalState::Unknown),
            AdaptationParameters::neutral()
        );
        assert!(!presets.set(EmotionalState::Unknown, AdaptationParameters::new(2.0, 2.0, 1.0, 1.0, 1.0, 1.0)));
        assert_eq!(
            presets.get(EmotionalState::Unknown),
            AdaptationParameters::neutral()
        );
    }

    #[test]
    fn test_set_preset() {
        let mut presets = EmotionPresets::default();
        let custom = AdaptationParameters::new(1.5, 1.0, 0.0, 0.0, 0.0, 0.0);
        assert!(presets.set(EmotionalState::Focused, custom));
        assert_eq!(presets.get(EmotionalState::Focused), custom);
    }

    #[test]
    fn test_default_config() {
        let config = EmotionConfig::default();
        assert_eq!(config.history_size, 10);
        assert_eq!(config.adaptation_sensitivity, 0.7);
        assert_eq!(config.spectral.fft_size, 1024);
    }
}
