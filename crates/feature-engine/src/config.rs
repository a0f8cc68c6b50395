//! Spectral engine configuration

use crate::SpectralError;
use serde::{Deserialize, Serialize};

/// Spectral engine configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectralConfig {
    /// FFT window size (must be a power of two)
    pub fft_size: usize,

    /// Sample rate of the incoming buffers (Hz)
    pub sample_rate: u32,

    /// Lower bound of the analysis frequency range (Hz)
    pub min_frequency: f64,

    /// Upper bound of the analysis frequency range (Hz), Nyquist when unset
    pub max_frequency: Option<f64>,

    /// Hop between overlapped windows, `fft_size / 4` when unset
    pub hop_size: Option<usize>,
}

impl Default for SpectralConfig {
    fn default() -> Self {
        Self {
            fft_size: 1024,
            sample_rate: 44_100,
            min_frequency: 20.0,
            max_frequency: None,
            hop_size: None,
        }
    }
}

impl SpectralConfig {
    /// Config with the given window and sample rate, other fields defaulted
    pub fn new(fft_size: usize, sample_rate: u32) -> Self {
        Self {
            fft_size,
            sample_rate,
            ..Default::default()
        }
    }

    /// Check the construction-time invariants
    pub fn validate(&self) -> Result<(), SpectralError> {
        if self.fft_size < 2 || !self.fft_size.is_power_of_two() {
            return Err(SpectralError::InvalidFftSize(self.fft_size));
        }
        if self.sample_rate == 0 {
            return Err(SpectralError::ZeroSampleRate);
        }
        Ok(())
    }

    /// Nyquist frequency for this sample rate
    pub fn nyquist(&self) -> f64 {
        self.sample_rate as f64 / 2.0
    }
}
