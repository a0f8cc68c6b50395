//! Breathing classifier

use crate::config::{BreathingConfig, BreathingThresholds};
use crate::filter;
use crate::scoring;
use crate::state::{most_common, BreathingPattern, BreathingState};
use crate::BreathingError;
use feature_engine::{SpectralEngine, SpectralFeatures, WindowSlices};
use parking_lot::Mutex;
use ring_buffer::RingBuffer;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Result of one breathing analysis
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreathingAnalysisResult {
    /// Instantaneous breathing state
    pub current_state: BreathingState,

    /// Pattern inferred from earlier analyses
    pub pattern: BreathingPattern,

    /// Breaths per minute
    pub breathing_rate: f64,

    /// Relative depth (0.0 - 1.0)
    pub breathing_depth: f64,

    /// Rate regularity over earlier analyses (0.0 - 1.0)
    pub regularity: f64,

    /// Stress score (0.0 - 1.0)
    pub stress_level: f64,

    /// Relaxation score (0.0 - 1.0)
    pub relaxation_level: f64,

    /// Dominant frequency of the filtered buffer (Hz)
    pub fundamental_frequency: f64,

    /// Strongest frequency inside the breathing range (Hz), 0 when none
    pub band_frequency: f64,

    /// Seconds between successive breath peaks
    pub cycle_intervals: Vec<f64>,

    /// One representative cycle of the filtered buffer; not serialized
    #[serde(skip)]
    pub breathing_cycle: Vec<f64>,

    /// Milliseconds since the Unix epoch
    pub timestamp_ms: u64,
}

/// Aggregates over the retained analyses
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BreathingStatistics {
    /// Analyses currently retained
    pub analyses: usize,
    pub average_breathing_rate: f64,
    pub average_depth: f64,
    pub average_stress: f64,
    pub average_relaxation: f64,
    pub most_common_state: BreathingState,
    pub most_common_pattern: BreathingPattern,
}

struct Inner {
    engine: SpectralEngine,
    thresholds: BreathingThresholds,
    peak_threshold: f64,
    rate_history: RingBuffer<f64>,
    amplitude_history: RingBuffer<f64>,
    results: RingBuffer<BreathingAnalysisResult>,
}

impl Inner {
    fn process(&mut self, samples: &[f64]) -> BreathingAnalysisResult {
        if samples.is_empty() {
            debug!("Empty buffer, returning default breathing analysis");
            return BreathingAnalysisResult::default();
        }

        let filtered = filter::smooth(samples);
        let features = self.engine.analyze(&filtered);

        let breathing_rate = scoring::breathing_rate(features.fundamental_frequency);
        let breathing_depth = scoring::breathing_depth(features.volume_level);

        let (min_hz, max_hz) = self.engine.frequency_range();
        let band_frequency = features.peak_in_range(min_hz, max_hz).unwrap_or(0.0);

        // Regularity and pattern describe the analyses before this one
        let rates = self.rate_history.to_vec();
        let regularity = scoring::regularity(&rates);
        let pattern = scoring::classify_pattern(&rates);

        let t = &self.thresholds;
        let current_state = scoring::classify_state(breathing_rate, breathing_depth, regularity, t);
        let stress_level = scoring::stress_level(breathing_rate, breathing_depth, regularity, t);
        let relaxation_level = scoring::relaxation_level(breathing_rate, breathing_depth, regularity, t);

        let peaks = filter::detect_peaks(&filtered, self.peak_threshold);
        let cycle_intervals = filter::peak_intervals(&peaks, self.engine.sample_rate());
        let breathing_cycle = filter::extract_cycle(&filtered, &peaks);

        let result = BreathingAnalysisResult {
            current_state,
            pattern,
            breathing_rate,
            breathing_depth,
            regularity,
            stress_level,
            relaxation_level,
            fundamental_frequency: features.fundamental_frequency,
            band_frequency,
            cycle_intervals,
            breathing_cycle,
            timestamp_ms: now_ms(),
        };

        self.rate_history.push(breathing_rate);
        self.amplitude_history.push(breathing_depth);
        self.results.push(result.clone());

        debug!(
            "Breathing {:?}/{:?}: rate={:.1} bpm, depth={:.2}, regularity={:.2}, peaks={}",
            current_state,
            pattern,
            breathing_rate,
            breathing_depth,
            regularity,
            peaks.len()
        );

        result
    }
}

/// Breathing state and pattern classifier.
///
/// Expects a slowly varying envelope signal (tens of samples per second) whose
/// dominant component sits in the breathing range.
pub struct BreathingClassifier {
    inner: Mutex<Inner>,
}

impl BreathingClassifier {
    /// Classifier with default thresholds for the given window and sample rate
    pub fn new(fft_size: usize, sample_rate: u32) -> Result<Self, BreathingError> {
        Self::with_config(BreathingConfig::new(fft_size, sample_rate))
    }

    /// Classifier from a full configuration
    pub fn with_config(config: BreathingConfig) -> Result<Self, BreathingError> {
        let engine = SpectralEngine::with_config(&config.spectral)?;
        let (min_hz, max_hz) = engine.frequency_range();

        info!(
            "Breathing classifier initialized: fft_size={}, sample_rate={} Hz, range={:.2}-{:.2} Hz",
            engine.fft_size(),
            engine.sample_rate(),
            min_hz,
            max_hz
        );

        Ok(Self {
            inner: Mutex::new(Inner {
                engine,
                thresholds: config.thresholds.clamped(),
                peak_threshold: config.peak_threshold,
                rate_history: RingBuffer::new(config.history_size),
                amplitude_history: RingBuffer::new(config.history_size),
                results: RingBuffer::new(config.history_size),
            }),
        })
    }

    /// Analyze one window of the breathing signal
    pub fn process(&self, samples: &[f64]) -> BreathingAnalysisResult {
        self.inner.lock().process(samples)
    }

    /// Analyze `buffer` in hop-advanced windows, each through the full `process` path.
    ///
    /// The hop is a quarter window unless `spectral.hop_size` or `set_hop_size` overrides it.
    pub fn process_with_overlap(&self, buffer: &[f64]) -> Vec<BreathingAnalysisResult> {
        let mut inner = self.inner.lock();
        let windows = WindowSlices::new(buffer, inner.engine.fft_size(), inner.engine.hop_size());
        windows.map(|window| inner.process(window)).collect()
    }

    /// Spectral features of the smoothed window
    pub fn analyze(&self, samples: &[f64]) -> SpectralFeatures {
        self.inner.lock().engine.analyze(&filter::smooth(samples))
    }

    /// State of the latest analysis
    pub fn current_state(&self) -> BreathingState {
        self.inner
            .lock()
            .results
            .last()
            .map_or(BreathingState::Unknown, |r| r.current_state)
    }

    /// Pattern of the latest analysis
    pub fn pattern(&self) -> BreathingPattern {
        self.inner
            .lock()
            .results
            .last()
            .map_or(BreathingPattern::Unknown, |r| r.pattern)
    }

    /// Mean rate over the rate history
    pub fn average_breathing_rate(&self) -> f64 {
        let inner = self.inner.lock();
        mean(inner.rate_history.iter().copied())
    }

    /// Stress score of the latest analysis
    pub fn stress_level(&self) -> f64 {
        self.inner.lock().results.last().map_or(0.0, |r| r.stress_level)
    }

    /// Relaxation score of the latest analysis
    pub fn relaxation_level(&self) -> f64 {
        self.inner.lock().results.last().map_or(0.0, |r| r.relaxation_level)
    }

    /// Set the normal rate band (breaths/min)
    pub fn set_breathing_rate_thresholds(&self, min_rate: f64, max_rate: f64) {
        self.update_thresholds(|t| {
            t.normal_min_rate = min_rate;
            t.normal_max_rate = max_rate;
        });
    }

    /// Set the deep and shallow depth thresholds
    pub fn set_depth_thresholds(&self, deep: f64, shallow: f64) {
        self.update_thresholds(|t| {
            t.deep_threshold = deep;
            t.shallow_threshold = shallow;
        });
    }

    /// Set the rapid breathing threshold (breaths/min)
    pub fn set_rapid_breathing_threshold(&self, threshold: f64) {
        self.update_thresholds(|t| t.rapid_threshold = threshold);
    }

    /// Set the irregularity threshold
    pub fn set_irregularity_threshold(&self, threshold: f64) {
        self.update_thresholds(|t| t.irregularity_threshold = threshold);
    }

    /// Current thresholds
    pub fn thresholds(&self) -> BreathingThresholds {
        self.inner.lock().thresholds.clone()
    }

    fn update_thresholds<F>(&self, update: F)
    where
        F: FnOnce(&mut BreathingThresholds),
    {
        let mut inner = self.inner.lock();
        let mut thresholds = inner.thresholds.clone();
        update(&mut thresholds);
        inner.thresholds = thresholds.clamped();
    }

    /// Aggregates over the retained analyses
    pub fn statistics(&self) -> BreathingStatistics {
        let inner = self.inner.lock();
        let results = &inner.results;

        BreathingStatistics {
            analyses: results.len(),
            average_breathing_rate: mean(results.iter().map(|r| r.breathing_rate)),
            average_depth: mean(results.iter().map(|r| r.breathing_depth)),
            average_stress: mean(results.iter().map(|r| r.stress_level)),
            average_relaxation: mean(results.iter().map(|r| r.relaxation_level)),
            most_common_state: most_common(&BreathingState::ALL, results.iter().map(|r| r.current_state))
                .unwrap_or_default(),
            most_common_pattern: most_common(&BreathingPattern::ALL, results.iter().map(|r| r.pattern))
                .unwrap_or_default(),
        }
    }

    /// Retained analyses, oldest first
    pub fn history(&self) -> Vec<BreathingAnalysisResult> {
        self.inner.lock().results.to_vec()
    }

    /// Retained breathing rates, oldest first
    pub fn rate_history(&self) -> Vec<f64> {
        self.inner.lock().rate_history.to_vec()
    }

    /// Retained breathing depths, oldest first
    pub fn amplitude_history(&self) -> Vec<f64> {
        self.inner.lock().amplitude_history.to_vec()
    }

    /// Change the analysis window; the previous size is kept on error
    pub fn set_fft_size(&self, fft_size: usize) -> Result<(), BreathingError> {
        self.inner.lock().engine.set_fft_size(fft_size).map_err(BreathingError::from)
    }

    /// Change the sample rate; the previous rate is kept on error
    pub fn set_sample_rate(&self, sample_rate: u32) -> Result<(), BreathingError> {
        self.inner.lock().engine.set_sample_rate(sample_rate).map_err(BreathingError::from)
    }

    /// Restrict the breathing range, clamped to `[0, Nyquist]`
    pub fn set_frequency_range(&self, min_hz: f64, max_hz: f64) {
        self.inner.lock().engine.set_frequency_range(min_hz, max_hz);
    }

    /// Set the overlap hop, clamped to `[1, fft_size]`
    pub fn set_hop_size(&self, hop_size: usize) {
        self.inner.lock().engine.set_hop_size(hop_size);
    }

    /// Resize every history, dropping the oldest entries when shrinking (minimum 1)
    pub fn set_history_size(&self, history_size: usize) {
        let mut inner = self.inner.lock();
        inner.rate_history.set_capacity(history_size);
        inner.amplitude_history.set_capacity(history_size);
        inner.results.set_capacity(history_size);
        debug!("Breathing history resized to {}", inner.results.capacity());
    }

    /// Current settings as a config value
    pub fn config(&self) -> BreathingConfig {
        let inner = self.inner.lock();
        BreathingConfig {
            spectral: inner.engine.config(),
            history_size: inner.results.capacity(),
            peak_threshold: inner.peak_threshold,
            thresholds: inner.thresholds.clone(),
        }
    }

    /// Clear all histories
    pub fn reset(&self) {
        let mut inner = self.inner.lock();
        inner.rate_history.clear();
        inner.amplitude_history.clear();
        inner.results.clear();
        info!("Breathing classifier reset");
    }
}

fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}

fn now_ms() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use feature_engine::{signal, SpectralConfig};

    const SAMPLE_RATE: u32 = 64;
    const FFT_SIZE: usize = 1024;

    /// 16 s of breathing at 15 breaths/min, depth ~0.5
    fn normal_breathing() -> Vec<f64> {
        signal::sine(0.25, SAMPLE_RATE, FFT_SIZE, 0.35)
    }

    fn classifier() -> BreathingClassifier {
        BreathingClassifier::with_config(BreathingConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_configuration_fails() {
        assert!(matches!(
            BreathingClassifier::new(100, SAMPLE_RATE),
            Err(BreathingError::Spectral(_))
        ));
        assert!(BreathingClassifier::new(FFT_SIZE, 0).is_err());
    }

    #[test]
    fn test_empty_input_returns_default() {
        let classifier = classifier();
        assert_eq!(classifier.process(&[]), BreathingAnalysisResult::default());
        assert!(classifier.history().is_empty());
        assert_eq!(classifier.current_state(), BreathingState::Unknown);
        assert_eq!(classifier.stress_level(), 0.0);
    }

    #[test]
    fn test_fifteen_breaths_per_minute_is_normal() {
        let classifier = classifier();
        let result = classifier.process(&normal_breathing());

        assert!((result.breathing_rate - 15.0).abs() <= 1.0);
        assert_eq!(result.current_state, BreathingState::Normal);
        assert!((result.breathing_depth - 0.495).abs() < 0.01);
        assert!((result.band_frequency - 0.25).abs() < 1e-9);
        assert_eq!(result.regularity, 1.0);
        assert_eq!(result.pattern, BreathingPattern::Unknown);
    }

    #[test]
    fn test_peaks_give_breath_intervals() {
        let classifier = classifier();
        let result = classifier.process(&normal_breathing());

        // Four full cycles of 4 s each
        assert_eq!(result.cycle_intervals.len(), 3);
        for interval in &result.cycle_intervals {
            assert!((interval - 4.0).abs() < 1e-9);
        }
        assert_eq!(result.breathing_cycle.len(), 256);
    }

    #[test]
    fn test_steady_breathing_becomes_regular() {
        let classifier = classifier();
        let buffer = normal_breathing();
        for _ in 0..4 {
            classifier.process(&buffer);
        }
        assert_eq!(classifier.rate_history(), vec![15.0; 4]);

        let result = classifier.process(&buffer);
        assert!((result.regularity - 1.0).abs() < 1e-12);
        assert_eq!(result.pattern, BreathingPattern::Regular);
        assert_eq!(classifier.pattern(), BreathingPattern::Regular);
        assert!((classifier.relaxation_level() - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_fast_shallow_breathing_is_stressful() {
        let classifier = classifier();
        // 0.5 Hz = 30 breaths/min at low amplitude
        let buffer = signal::sine(0.5, SAMPLE_RATE, FFT_SIZE, 0.05);
        let result = classifier.process(&buffer);

        assert!((result.breathing_rate - 30.0).abs() < 1e-9);
        assert_eq!(result.current_state, BreathingState::Rapid);
        assert_eq!(result.stress_level, 1.0);
        // Peaks below the 0.1 threshold: whole buffer is the cycle
        assert!(result.cycle_intervals.is_empty());
        assert_eq!(result.breathing_cycle.len(), FFT_SIZE);
    }

    #[test]
    fn test_silence_reads_as_holding() {
        let classifier = classifier();
        let result = classifier.process(&signal::silence(FFT_SIZE));
        assert_eq!(result.breathing_rate, scoring::MIN_BREATHING_RATE);
        assert_eq!(result.current_state, BreathingState::Holding);
        assert_eq!(result.band_frequency, 0.0);
    }

    #[test]
    fn test_history_is_bounded() {
        let config = BreathingConfig {
            history_size: 4,
            ..BreathingConfig::default()
        };
        let classifier = BreathingClassifier::with_config(config).unwrap();
        let buffer = normal_breathing();
        for _ in 0..9 {
            classifier.process(&buffer);
        }
        assert_eq!(classifier.history().len(), 4);
        assert_eq!(classifier.rate_history().len(), 4);
        assert_eq!(classifier.amplitude_history().len(), 4);
        assert_eq!(classifier.statistics().analyses, 4);
    }

    #[test]
    fn test_overlap_runs_every_window() {
        let classifier = classifier();
        let buffer = signal::sine(0.25, SAMPLE_RATE, 2 * FFT_SIZE, 0.35);
        let results = classifier.process_with_overlap(&buffer);

        // hop 256: starts 0, 256, ..., 1024
        assert_eq!(results.len(), 5);
        assert_eq!(classifier.history().len(), 5);
        assert_eq!(results[4].pattern, BreathingPattern::Regular);
    }

    #[test]
    fn test_configured_hop_overrides_quarter_window() {
        let config = BreathingConfig {
            spectral: SpectralConfig {
                hop_size: Some(FFT_SIZE / 2),
                ..BreathingConfig::default().spectral
            },
            ..BreathingConfig::default()
        };
        let classifier = BreathingClassifier::with_config(config).unwrap();
        let buffer = signal::sine(0.25, SAMPLE_RATE, 2 * FFT_SIZE, 0.35);

        // hop 512: starts 0, 512, 1024
        assert_eq!(classifier.process_with_overlap(&buffer).len(), 3);

        classifier.reset();
        classifier.set_hop_size(FFT_SIZE);
        assert_eq!(classifier.process_with_overlap(&buffer).len(), 2);
        assert_eq!(classifier.config().spectral.hop_size, Some(FFT_SIZE));
    }

    #[test]
    fn test_history_size_is_runtime_mutable() {
        let classifier = classifier();
        let buffer = normal_breathing();
        for _ in 0..6 {
            classifier.process(&buffer);
        }

        classifier.set_history_size(2);
        assert_eq!(classifier.history().len(), 2);
        assert_eq!(classifier.rate_history().len(), 2);
        assert_eq!(classifier.amplitude_history().len(), 2);
        assert_eq!(classifier.config().history_size, 2);

        classifier.set_history_size(0);
        assert_eq!(classifier.config().history_size, 1);
        classifier.process(&buffer);
        assert_eq!(classifier.history().len(), 1);
    }

    #[test]
    fn test_threshold_setters_clamp() {
        let classifier = classifier();
        classifier.set_breathing_rate_thresholds(12.0, 5.0);
        classifier.set_depth_thresholds(0.6, 0.9);
        classifier.set_rapid_breathing_threshold(100.0);
        classifier.set_irregularity_threshold(-1.0);

        let t = classifier.thresholds();
        assert_eq!(t.normal_min_rate, 12.0);
        assert_eq!(t.normal_max_rate, 12.0);
        assert_eq!(t.deep_threshold, 0.6);
        assert_eq!(t.shallow_threshold, 0.6);
        assert_eq!(t.rapid_threshold, 60.0);
        assert_eq!(t.irregularity_threshold, 0.0);
    }

    #[test]
    fn test_thresholds_change_classification() {
        let classifier = classifier();
        classifier.set_breathing_rate_thresholds(16.0, 30.0);
        let result = classifier.process(&normal_breathing());
        assert_eq!(result.current_state, BreathingState::Holding);
    }

    #[test]
    fn test_statistics_and_reset() {
        let classifier = classifier();
        let buffer = normal_breathing();
        classifier.process(&buffer);
        classifier.process(&buffer);

        let stats = classifier.statistics();
        assert_eq!(stats.analyses, 2);
        assert!((stats.average_breathing_rate - 15.0).abs() < 1e-9);
        assert_eq!(stats.most_common_state, BreathingState::Normal);
        assert_eq!(stats.most_common_pattern, BreathingPattern::Unknown);
        assert!((classifier.average_breathing_rate() - 15.0).abs() < 1e-9);

        classifier.reset();
        assert_eq!(classifier.statistics(), BreathingStatistics::default());
        assert_eq!(classifier.current_state(), BreathingState::Unknown);
    }
}
