//! Spectral Feature Engine
//!
//! Fixed-size radix-2 FFT analysis of mono sample buffers. Each window is
//! Hann-weighted and reduced to magnitude/phase spectra plus scalar
//! descriptors (fundamental, centroid, rolloff, zero-crossing rate, tempo,
//! volume) consumed by the emotion and breathing classifiers.

mod config;
mod engine;
mod error;
mod features;
mod fft;
mod overlap;
pub mod signal;
mod statistics;
mod window;

pub use config::SpectralConfig;
pub use engine::SpectralEngine;
pub use error::SpectralError;
pub use features::{SpectralFeatures, ROLLOFF_THRESHOLD, TEMPO_MAX_BPM, TEMPO_MIN_BPM};
pub use fft::Radix2Fft;
pub use overlap::{OverlapWindows, WindowSlices};
pub use statistics::SummaryStatistics;
pub use window::hann_window;
