//! Pipeline configuration loading
//!
//! Layers, lowest priority first: built-in defaults, an optional TOML file,
//! then `AFFECT__`-prefixed environment variables (`__` separates nested keys,
//! e.g. `AFFECT__BREATHING__THRESHOLDS__RAPID_THRESHOLD=30`).

use breathing_engine::BreathingConfig;
use config::{Config, Environment, File};
use emotion_engine::EmotionConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment prefix for overrides
pub const ENV_PREFIX: &str = "AFFECT";

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    pub level: String,

    /// Emit JSON lines instead of human-readable text
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

/// Synthetic input for the demo binary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Breathing rate of the generated envelope (breaths/min)
    pub breathing_rate: f64,

    /// Envelope amplitude
    pub amplitude: f64,

    /// Buffer length in samples
    pub samples: usize,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            breathing_rate: 15.0,
            amplitude: 0.35,
            samples: 4096,
        }
    }
}

/// Complete pipeline configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub logging: LoggingConfig,
    pub emotion: EmotionConfig,
    pub breathing: BreathingConfig,
    pub demo: DemoConfig,
}

impl PipelineConfig {
    /// Load defaults, then `file` (if given and present), then environment overrides
    pub fn load(file: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = Config::builder().add_source(Config::try_from(&PipelineConfig::default())?);

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).required(false));
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }
}
