//! Emotion Engine
//!
//! Rule-based emotional state detection over spectral features:
//! - Three-way vote (breathing band, rhythm, spectral shape)
//! - Per-state adaptation presets with exponential smoothing
//! - Adaptive effect chain (gain, strided tempo, emphasis, reverb, echo)

pub mod classifier;
pub mod config;
pub mod effects;
pub mod params;
pub mod rules;
pub mod state;

pub use classifier::{AdaptationResult, EmotionClassifier, EmotionHistoryEntry, EmotionStatistics};
pub use config::{EmotionConfig, EmotionPresets};
pub use params::AdaptationParameters;
pub use rules::EmotionVotes;
pub use state::EmotionalState;

use feature_engine::SpectralError;
use thiserror::Error;

/// Emotion engine error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EmotionError {
    #[error("Spectral engine configuration failed: {0}")]
    Spectral(#[from] SpectralError),
}
