//! Spectral Engine Error Types

use thiserror::Error;

/// Errors raised while configuring a spectral engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpectralError {
    /// FFT size is not a power of two (or is smaller than 2)
    #[error("FFT size {0} must be a power of two of at least 2")]
    InvalidFftSize(usize),

    /// Sample rate of zero
    #[error("Sample rate must be greater than zero")]
    ZeroSampleRate,
}
