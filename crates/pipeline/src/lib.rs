//! Affect Analysis Pipeline
//!
//! Runs the emotion and breathing classifiers side by side over one sample
//! buffer and collects their results into a serializable report.

pub mod settings;

pub use settings::{DemoConfig, LoggingConfig, PipelineConfig};

use breathing_engine::{BreathingAnalysisResult, BreathingClassifier, BreathingError};
use emotion_engine::{AdaptationResult, EmotionClassifier, EmotionError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Pipeline error types
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Emotion classifier setup failed: {0}")]
    Emotion(#[from] EmotionError),

    #[error("Breathing classifier setup failed: {0}")]
    Breathing(#[from] BreathingError),

    #[error("Logging setup failed: {0}")]
    Logging(String),
}

/// Initialize the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured level.
pub fn init_logging(config: &LoggingConfig) -> Result<(), PipelineError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .map_err(|e| PipelineError::Logging(e.to_string()))?;

    let builder = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(true);

    let result = if config.json {
        tracing::subscriber::set_global_default(builder.json().finish())
    } else {
        tracing::subscriber::set_global_default(builder.finish())
    };

    result.map_err(|e| PipelineError::Logging(e.to_string()))
}

/// Combined classifier output for one buffer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineReport {
    pub emotion: AdaptationResult,
    pub breathing: BreathingAnalysisResult,
}

/// Emotion and breathing classifiers fed from the same buffer
pub struct AnalysisPipeline {
    emotion: EmotionClassifier,
    breathing: BreathingClassifier,
}

impl AnalysisPipeline {
    /// Build both classifiers from `config`
    pub fn new(config: &PipelineConfig) -> Result<Self, PipelineError> {
        let emotion = EmotionClassifier::with_config(config.emotion.clone())?;
        let breathing = BreathingClassifier::with_config(config.breathing.clone())?;
        info!("Analysis pipeline ready");
        Ok(Self { emotion, breathing })
    }

    /// Run both classifiers on `samples`
    pub fn analyze(&self, samples: &[f64]) -> PipelineReport {
        PipelineReport {
            emotion: self.emotion.process(samples),
            breathing: self.breathing.process(samples),
        }
    }

    /// Emotion classifier
    pub fn emotion(&self) -> &EmotionClassifier {
        &self.emotion
    }

    /// Breathing classifier
    pub fn breathing(&self) -> &BreathingClassifier {
        &self.breathing
    }
}
