//! FFT-based Spectral Engine

use crate::config::SpectralConfig;
use crate::features::{self, SpectralFeatures, ROLLOFF_THRESHOLD};
use crate::fft::Radix2Fft;
use crate::overlap::{OverlapWindows, WindowSlices};
use crate::window::hann_window;
use crate::SpectralError;
use rustfft::num_complex::Complex;
use tracing::{debug, info, warn};

/// Fixed-size spectral analyzer.
///
/// Owns the Hann window and FFT plan for its configured size; both are built
/// once at construction (or on resize) and only read by `analyze`, so repeated
/// calls on the same buffer return identical features.
#[derive(Debug, Clone)]
pub struct SpectralEngine {
    fft_size: usize,
    sample_rate: u32,
    min_frequency: f64,
    max_frequency: f64,
    hop_size: usize,
    window: Vec<f64>,
    fft: Radix2Fft,
}

impl SpectralEngine {
    /// Create an engine for `fft_size`-point windows at `sample_rate` Hz
    pub fn new(fft_size: usize, sample_rate: u32) -> Result<Self, SpectralError> {
        Self::with_config(&SpectralConfig::new(fft_size, sample_rate))
    }

    /// Create an engine from a full configuration
    pub fn with_config(config: &SpectralConfig) -> Result<Self, SpectralError> {
        config.validate()?;

        let fft = Radix2Fft::new(config.fft_size)
            .ok_or(SpectralError::InvalidFftSize(config.fft_size))?;

        let mut engine = Self {
            fft_size: config.fft_size,
            sample_rate: config.sample_rate,
            min_frequency: 0.0,
            max_frequency: config.nyquist(),
            hop_size: config.fft_size / 4,
            window: hann_window(config.fft_size),
            fft,
        };
        engine.set_frequency_range(
            config.min_frequency,
            config.max_frequency.unwrap_or_else(|| config.nyquist()),
        );
        if let Some(hop) = config.hop_size {
            engine.set_hop_size(hop);
        }

        info!(
            "Spectral engine ready: fft_size={}, sample_rate={} Hz, range={:.2}-{:.2} Hz, hop={}",
            engine.fft_size, engine.sample_rate, engine.min_frequency, engine.max_frequency, engine.hop_size
        );
        Ok(engine)
    }

    /// Analyze one window of samples.
    ///
    /// The input is zero-padded or truncated to `fft_size`, Hann-windowed and
    /// transformed. Zero-crossing rate, tempo and volume are measured on the
    /// original, unwindowed input.
    pub fn analyze(&self, samples: &[f64]) -> SpectralFeatures {
        let n = self.fft_size;
        let used = samples.len().min(n);

        debug!(
            "Analyzing window: input={} samples, fft_size={}",
            samples.len(),
            n
        );

        let mut buffer: Vec<Complex<f64>> = (0..n)
            .map(|i| {
                let sample = if i < used { samples[i] } else { 0.0 };
                Complex::new(sample * self.window[i], 0.0)
            })
            .collect();

        self.fft.process(&mut buffer);

        let bins = n / 2 + 1;
        let bin_hz = self.bin_width();
        let magnitude_spectrum: Vec<f64> = buffer[..bins].iter().map(|c| c.norm()).collect();
        let phase_spectrum: Vec<f64> = buffer[..bins].iter().map(|c| c.arg()).collect();
        let frequencies: Vec<f64> = (0..bins).map(|bin| self.frequency(bin)).collect();

        let zero_crossing_rate = features::zero_crossing_rate(samples);

        SpectralFeatures {
            fundamental_frequency: features::fundamental_frequency(&magnitude_spectrum, bin_hz),
            spectral_centroid: features::spectral_centroid(&magnitude_spectrum, bin_hz),
            spectral_rolloff: features::spectral_rolloff(
                &magnitude_spectrum,
                bin_hz,
                ROLLOFF_THRESHOLD,
            ),
            zero_crossing_rate,
            tempo: features::estimate_tempo(zero_crossing_rate),
            volume_level: features::volume_level(samples),
            magnitude_spectrum,
            phase_spectrum,
            frequencies,
        }
    }

    /// Lazily analyze `buffer` in windows advanced by the hop size.
    ///
    /// Stops once a full window no longer fits. A buffer shorter than one
    /// window yields exactly one (padded) result. Clone the iterator to
    /// restart it.
    pub fn analyze_with_overlap<'a>(&'a self, buffer: &'a [f64]) -> OverlapWindows<'a> {
        OverlapWindows::new(self, WindowSlices::new(buffer, self.fft_size, self.hop_size))
    }

    /// Frequency of FFT bin `bin` (Hz)
    pub fn frequency(&self, bin: usize) -> f64 {
        (bin as f64 * self.sample_rate as f64) / self.fft_size as f64
    }

    /// FFT bin holding `frequency` (truncating)
    pub fn frequency_bin(&self, frequency: f64) -> usize {
        (frequency.max(0.0) * self.fft_size as f64 / self.sample_rate as f64) as usize
    }

    /// Width of one bin (Hz)
    pub fn bin_width(&self) -> f64 {
        self.sample_rate as f64 / self.fft_size as f64
    }

    /// Restrict the analysis range, clamped to `[0, Nyquist]`
    pub fn set_frequency_range(&mut self, min_frequency: f64, max_frequency: f64) {
        let nyquist = self.nyquist();
        let min = min_frequency.max(0.0).min(nyquist);
        let max = max_frequency.max(min).min(nyquist);
        if min != min_frequency || max != max_frequency {
            debug!(
                "Frequency range {:.2}-{:.2} Hz clamped to {:.2}-{:.2} Hz",
                min_frequency, max_frequency, min, max
            );
        }
        self.min_frequency = min;
        self.max_frequency = max;
    }

    /// Set the overlap hop, clamped to `[1, fft_size]`
    pub fn set_hop_size(&mut self, hop_size: usize) {
        self.hop_size = hop_size.clamp(1, self.fft_size);
    }

    /// Change the window size, rebuilding the cached window and FFT plan
    pub fn set_fft_size(&mut self, fft_size: usize) -> Result<(), SpectralError> {
        if let Err(e) = SpectralConfig::new(fft_size, self.sample_rate).validate() {
            warn!("Rejected FFT size change: {}", e);
            return Err(e);
        }
        let fft = Radix2Fft::new(fft_size).ok_or(SpectralError::InvalidFftSize(fft_size))?;

        self.fft = fft;
        self.window = hann_window(fft_size);
        self.fft_size = fft_size;
        self.hop_size = self.hop_size.clamp(1, fft_size);
        info!("Spectral engine resized to {} points", fft_size);
        Ok(())
    }

    /// Change the sample rate; the frequency range is re-clamped to the new Nyquist
    pub fn set_sample_rate(&mut self, sample_rate: u32) -> Result<(), SpectralError> {
        if let Err(e) = SpectralConfig::new(self.fft_size, sample_rate).validate() {
            warn!("Rejected sample rate change: {}", e);
            return Err(e);
        }
        self.sample_rate = sample_rate;
        let (min, max) = (self.min_frequency, self.max_frequency);
        self.set_frequency_range(min, max);
        Ok(())
    }

    /// FFT window size
    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Sample rate (Hz)
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Hop between overlapped windows
    pub fn hop_size(&self) -> usize {
        self.hop_size
    }

    /// Configured analysis range (Hz)
    pub fn frequency_range(&self) -> (f64, f64) {
        (self.min_frequency, self.max_frequency)
    }

    /// Nyquist frequency (Hz)
    pub fn nyquist(&self) -> f64 {
        self.sample_rate as f64 / 2.0
    }

    /// Current settings as a config value
    pub fn config(&self) -> SpectralConfig {
        SpectralConfig {
            fft_size: self.fft_size,
            sample_rate: self.sample_rate,
            min_frequency: self.min_frequency,
            max_frequency: Some(self.max_frequency),
            hop_size: Some(self.hop_size),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal;
    use proptest::prelude::*;

    #[test]
    fn test_construction_errors() {
        assert_eq!(
            SpectralEngine::new(1000, 44_100).unwrap_err(),
            SpectralError::InvalidFftSize(1000)
        );
        assert_eq!(
            SpectralEngine::new(1024, 0).unwrap_err(),
            SpectralError::ZeroSampleRate
        );
    }

    #[test]
    fn test_spectrum_shapes() {
        let engine = SpectralEngine::new(256, 8000).unwrap();
        let features = engine.analyze(&signal::sine(440.0, 8000, 256, 0.5));
        assert_eq!(features.magnitude_spectrum.len(), 129);
        assert_eq!(features.phase_spectrum.len(), 129);
        assert_eq!(features.frequencies.len(), 129);
        assert_eq!(features.frequencies[128], 4000.0);
    }

    #[test]
    fn test_silence_is_fully_populated() {
        let engine = SpectralEngine::new(512, 44_100).unwrap();
        let features = engine.analyze(&signal::silence(512));
        assert_eq!(features.magnitude_spectrum.len(), 257);
        assert!(features.is_silent());
        assert_eq!(features.total_energy(), 0.0);
        assert_eq!(features.fundamental_frequency, 0.0);
        assert_eq!(features.spectral_centroid, 0.0);
        assert_eq!(features.volume_level, 0.0);
        assert_eq!(features.tempo, 60.0);
    }

    #[test]
    fn test_empty_input_is_padded() {
        let engine = SpectralEngine::new(64, 1000).unwrap();
        let features = engine.analyze(&[]);
        assert_eq!(features.magnitude_spectrum.len(), 33);
        assert_eq!(features.zero_crossing_rate, 0.0);
        assert_eq!(features.volume_level, 0.0);
    }

    #[test]
    fn test_long_input_is_truncated() {
        let engine = SpectralEngine::new(128, 8000).unwrap();
        let tone = signal::sine(1000.0, 8000, 128, 0.5);
        let mut long = tone.clone();
        long.extend(signal::sine(3000.0, 8000, 512, 0.9));

        let truncated = engine.analyze(&long);
        let exact = engine.analyze(&tone);
        assert_eq!(truncated.magnitude_spectrum, exact.magnitude_spectrum);
        // Time-domain features see the whole unpadded buffer
        assert!(truncated.zero_crossing_rate > exact.zero_crossing_rate);
    }

    #[test]
    fn test_two_tone_centroid_between_tones() {
        // 4 Hz bins: both tones sit exactly on a bin
        let engine = SpectralEngine::new(2048, 8192).unwrap();
        let samples = signal::tones(&[(220.0, 0.5), (440.0, 0.5)], 8192, 2048);
        let features = engine.analyze(&samples);
        assert!(features.spectral_centroid > 220.0);
        assert!(features.spectral_centroid < 440.0);
    }

    #[test]
    fn test_frequency_bin_conversion() {
        let engine = SpectralEngine::new(1024, 44_100).unwrap();
        assert_eq!(engine.frequency_bin(engine.frequency(10)), 10);
        assert!((engine.bin_width() - 43.06640625).abs() < 1e-9);
    }

    #[test]
    fn test_frequency_range_and_hop_are_clamped() {
        let mut engine = SpectralEngine::new(256, 1000).unwrap();
        engine.set_frequency_range(-5.0, 10_000.0);
        assert_eq!(engine.frequency_range(), (0.0, 500.0));
        engine.set_frequency_range(300.0, 100.0);
        assert_eq!(engine.frequency_range(), (300.0, 300.0));

        engine.set_hop_size(0);
        assert_eq!(engine.hop_size(), 1);
        engine.set_hop_size(10_000);
        assert_eq!(engine.hop_size(), 256);
    }

    #[test]
    fn test_resize_rejects_invalid_and_keeps_state() {
        let mut engine = SpectralEngine::new(256, 1000).unwrap();
        assert!(engine.set_fft_size(300).is_err());
        assert_eq!(engine.fft_size(), 256);
        assert!(engine.set_sample_rate(0).is_err());
        assert_eq!(engine.sample_rate(), 1000);

        engine.set_fft_size(64).unwrap();
        assert_eq!(engine.analyze(&[0.1; 10]).magnitude_spectrum.len(), 33);
        assert_eq!(engine.hop_size(), 64);
    }

    #[test]
    fn test_overlap_counts() {
        let engine = SpectralEngine::new(256, 8000).unwrap();
        let buffer = signal::sine(500.0, 8000, 1024, 0.5);
        // hop 64: starts 0, 64, ..., 768
        assert_eq!(engine.analyze_with_overlap(&buffer).count(), 13);

        let short = signal::sine(500.0, 8000, 100, 0.5);
        let results: Vec<_> = engine.analyze_with_overlap(&short).collect();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0], engine.analyze(&short));
    }

    #[test]
    fn test_overlap_is_restartable() {
        let engine = SpectralEngine::new(128, 8000).unwrap();
        let buffer = signal::sine(700.0, 8000, 512, 0.3);
        let windows = engine.analyze_with_overlap(&buffer);
        let first: Vec<_> = windows.clone().collect();
        let second: Vec<_> = windows.collect();
        assert_eq!(first, second);
        assert_eq!(first[1], engine.analyze(&buffer[32..160]));
    }

    proptest! {
        #[test]
        fn bin_aligned_sine_detected(exponent in 6u32..13, bin_seed in 0usize..10_000) {
            let n = 1usize << exponent;
            let sample_rate = 8000u32;
            let bin = 2 + bin_seed % (n / 2 - 4);
            let frequency = bin as f64 * sample_rate as f64 / n as f64;

            let engine = SpectralEngine::new(n, sample_rate).unwrap();
            let features = engine.analyze(&signal::sine(frequency, sample_rate, n, 0.8));

            let expected = (frequency * n as f64 / sample_rate as f64).round()
                * sample_rate as f64 / n as f64;
            prop_assert!((features.fundamental_frequency - expected).abs() <= engine.bin_width());
        }

        #[test]
        fn energy_nonzero_for_signal(values in prop::collection::vec(0.01f64..1.0, 8..300)) {
            let engine = SpectralEngine::new(256, 8000).unwrap();
            prop_assert!(engine.analyze(&values).total_energy() > 0.0);
        }

        #[test]
        fn analyze_is_idempotent(values in prop::collection::vec(-1.0f64..1.0, 0..600)) {
            let engine = SpectralEngine::new(512, 16_000).unwrap();
            let first = engine.analyze(&values);
            let second = engine.analyze(&values);
            prop_assert_eq!(
                first.magnitude_spectrum.iter().map(|m| m.to_bits()).collect::<Vec<_>>(),
                second.magnitude_spectrum.iter().map(|m| m.to_bits()).collect::<Vec<_>>()
            );
            prop_assert_eq!(first, second);
        }
    }
}
