//! Breathing Engine
//!
//! Breathing analysis over a slowly sampled respiration envelope:
//! - 3-tap smoothing and sub-hertz spectral analysis
//! - Rate, depth and regularity from spectrum, RMS and rate history
//! - State and pattern classification with configurable thresholds
//! - Stress and relaxation scoring, breath peak intervals

pub mod analyzer;
pub mod config;
pub mod filter;
pub mod scoring;
pub mod state;

pub use analyzer::{BreathingAnalysisResult, BreathingClassifier, BreathingStatistics};
pub use config::{BreathingConfig, BreathingThresholds};
pub use state::{BreathingPattern, BreathingState};

use feature_engine::SpectralError;
use thiserror::Error;

/// Breathing engine error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BreathingError {
    #[error("Spectral engine configuration failed: {0}")]
    Spectral(#[from] SpectralError),
}
