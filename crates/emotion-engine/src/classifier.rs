//! Emotion classifier

use crate::config::EmotionConfig;
use crate::effects;
use crate::params::{AdaptationParameters, SMOOTHING_FACTOR};
use crate::rules::EmotionVotes;
use crate::state::EmotionalState;
use crate::{EmotionError, EmotionPresets};
use feature_engine::{SpectralEngine, SpectralFeatures};
use parking_lot::Mutex;
use ring_buffer::RingBuffer;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Result of one `process` call
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdaptationResult {
    /// Winning state of the vote
    pub detected_emotion: EmotionalState,

    /// Smoothed parameters applied to the audio
    pub parameters: AdaptationParameters,

    /// Vote margin (0.0 - 1.0)
    pub confidence: f64,

    /// Input after the effect chain; not serialized
    #[serde(skip)]
    pub processed_audio: Vec<f64>,

    /// Milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

/// One smoothing history entry
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionHistoryEntry {
    pub state: EmotionalState,
    pub parameters: AdaptationParameters,
}

/// Aggregate classifier statistics
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionStatistics {
    /// Samples passed to `process`
    pub total_samples_processed: u64,
    /// Classified (non-empty, non-silent) buffers
    pub analyses: u64,
    /// Most frequent state in the history
    pub most_common_emotion: EmotionalState,
    /// Mean confidence over all analyses
    pub average_confidence: f64,
    /// Mean volume multiplier over the history
    pub average_volume_multiplier: f64,
    /// Mean tempo multiplier over the history
    pub average_tempo_multiplier: f64,
}

struct Inner {
    engine: SpectralEngine,
    presets: EmotionPresets,
    sensitivity: f64,
    history: RingBuffer<EmotionHistoryEntry>,
    total_samples: u64,
    analyses: u64,
    confidence_sum: f64,
}

/// Emotional state classifier with parameter smoothing.
///
/// All state sits behind one lock, so a shared classifier handles one call at a time.
pub struct EmotionClassifier {
    inner: Mutex<Inner>,
}

impl EmotionClassifier {
    /// Classifier with default settings for the given window and sample rate
    pub fn new(fft_size: usize, sample_rate: u32) -> Result<Self, EmotionError> {
        Self::with_config(EmotionConfig::new(fft_size, sample_rate))
    }

    /// Classifier from a full configuration
    pub fn with_config(config: EmotionConfig) -> Result<Self, EmotionError> {
        let engine = SpectralEngine::with_config(&config.spectral)?;

        info!(
            "Emotion classifier initialized: fft_size={}, sample_rate={} Hz, history={}",
            engine.fft_size(),
            engine.sample_rate(),
            config.history_size
        );

        Ok(Self {
            inner: Mutex::new(Inner {
                engine,
                presets: config.presets.clamped(),
                sensitivity: clamp_sensitivity(config.adaptation_sensitivity),
                history: RingBuffer::new(config.history_size),
                total_samples: 0,
                analyses: 0,
                confidence_sum: 0.0,
            }),
        })
    }

    /// Classify `samples`, smooth the preset for the winning state and apply it.
    ///
    /// Empty input yields the default result. All-zero input yields `Unknown` with
    /// zero confidence and the audio unchanged; neither touches the history.
    pub fn process(&self, samples: &[f64]) -> AdaptationResult {
        if samples.is_empty() {
            debug!("Empty buffer, returning default adaptation");
            return AdaptationResult::default();
        }

        let mut inner = self.inner.lock();
        inner.total_samples += samples.len() as u64;

        if samples.iter().all(|&s| s == 0.0) {
            debug!("Silent buffer of {} samples, skipping classification", samples.len());
            return AdaptationResult {
                processed_audio: samples.to_vec(),
                timestamp_ms: now_ms(),
                ..Default::default()
            };
        }

        let features = inner.engine.analyze(samples);

        let votes = EmotionVotes::evaluate(&features);
        let state = votes.winner();
        let confidence = votes.confidence();

        let target = inner.presets.get(state);
        let parameters = match inner.history.last() {
            Some(previous) => target.blend(&previous.parameters, SMOOTHING_FACTOR),
            None => target,
        };

        let processed_audio = effects::apply_chain(samples, &parameters, inner.engine.sample_rate());

        inner.history.push(EmotionHistoryEntry { state, parameters });
        inner.analyses += 1;
        inner.confidence_sum += confidence;

        debug!(
            "Detected {:?} (confidence {:.2}): votes {:?}, output {} samples",
            state,
            confidence,
            votes,
            processed_audio.len()
        );

        AdaptationResult {
            detected_emotion: state,
            parameters,
            confidence,
            processed_audio,
            timestamp_ms: now_ms(),
        }
    }

    /// Run the effect chain with explicit parameters, clamped to their valid ranges.
    /// No classification or history update.
    pub fn process_with_parameters(&self, samples: &[f64], parameters: &AdaptationParameters) -> Vec<f64> {
        let parameters = parameters.clamped();
        let inner = self.inner.lock();
        effects::apply_chain(samples, &parameters, inner.engine.sample_rate())
    }

    /// Spectral features of one window, as seen by the classifier
    pub fn analyze(&self, samples: &[f64]) -> SpectralFeatures {
        self.inner.lock().engine.analyze(samples)
    }

    /// Vote on precomputed features
    pub fn detect_emotional_state(&self, features: &SpectralFeatures) -> EmotionVotes {
        EmotionVotes::evaluate(features)
    }

    /// Current preset for `state`
    pub fn adaptation_parameters(&self, state: EmotionalState) -> AdaptationParameters {
        self.inner.lock().presets.get(state)
    }

    /// Replace the preset for `state`, clamping each knob to its valid range
    pub fn set_emotion_preset(&self, state: EmotionalState, parameters: AdaptationParameters) {
        let clamped = parameters.clamped();
        if clamped != parameters {
            debug!("Preset for {:?} clamped to valid ranges", state);
        }
        if !self.inner.lock().presets.set(state, clamped) {
            warn!("Ignoring preset for {:?}: state has no preset", state);
        }
    }

    /// Set the adaptation sensitivity, clamped to `[0, 1]`
    pub fn set_adaptation_sensitivity(&self, sensitivity: f64) {
        self.inner.lock().sensitivity = clamp_sensitivity(sensitivity);
    }

    /// Adaptation sensitivity (0.0 - 1.0)
    pub fn adaptation_sensitivity(&self) -> f64 {
        self.inner.lock().sensitivity
    }

    /// Change the analysis window; the previous size is kept on error
    pub fn set_fft_size(&self, fft_size: usize) -> Result<(), EmotionError> {
        self.inner.lock().engine.set_fft_size(fft_size).map_err(EmotionError::from)
    }

    /// Change the sample rate; the previous rate is kept on error
    pub fn set_sample_rate(&self, sample_rate: u32) -> Result<(), EmotionError> {
        self.inner.lock().engine.set_sample_rate(sample_rate).map_err(EmotionError::from)
    }

    /// Resize the smoothing history, dropping the oldest entries when shrinking (minimum 1)
    pub fn set_history_size(&self, history_size: usize) {
        let mut inner = self.inner.lock();
        inner.history.set_capacity(history_size);
        debug!("Emotion history resized to {}", inner.history.capacity());
    }

    /// Snapshot of the smoothing history, oldest first
    pub fn history(&self) -> Vec<EmotionHistoryEntry> {
        self.inner.lock().history.to_vec()
    }

    /// Aggregate statistics
    pub fn statistics(&self) -> EmotionStatistics {
        let inner = self.inner.lock();
        let history_len = inner.history.len();

        let (average_volume_multiplier, average_tempo_multiplier) = if history_len == 0 {
            (0.0, 0.0)
        } else {
            let n = history_len as f64;
            (
                inner.history.iter().map(|e| e.parameters.volume_multiplier).sum::<f64>() / n,
                inner.history.iter().map(|e| e.parameters.tempo_multiplier).sum::<f64>() / n,
            )
        };

        EmotionStatistics {
            total_samples_processed: inner.total_samples,
            analyses: inner.analyses,
            most_common_emotion: EmotionalState::most_common(inner.history.iter().map(|e| e.state)),
            average_confidence: if inner.analyses == 0 {
                0.0
            } else {
                inner.confidence_sum / inner.analyses as f64
            },
            average_volume_multiplier,
            average_tempo_multiplier,
        }
    }

    /// Current settings as a config value
    pub fn config(&self) -> EmotionConfig {
        let inner = self.inner.lock();
        EmotionConfig {
            spectral: inner.engine.config(),
            history_size: inner.history.capacity(),
            adaptation_sensitivity: inner.sensitivity,
            presets: inner.presets.clone(),
        }
    }

    /// Clear history and counters
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.history.clear();
        inner.total_samples = 0;
        inner.analyses = 0;
        inner.confidence_sum = 0.0;
        info!("Emotion classifier reset");
    }
}

fn clamp_sensitivity(sensitivity: f64) -> f64 {
    let clamped = if sensitivity.is_nan() {
        0.0
    } else {
        sensitivity.clamp(0.0, 1.0)
    };
    if clamped != sensitivity {
        debug!("Adaptation sensitivity {} clamped to {}", sensitivity, clamped);
    }
    clamped
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
