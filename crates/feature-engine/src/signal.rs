//! Synthetic Test Signals

use std::f64::consts::PI;

/// `amplitude * sin(2π f t)` sampled at `sample_rate` for `len` samples
pub fn sine(frequency: f64, sample_rate: u32, len: usize, amplitude: f64) -> Vec<f64> {
    tones(&[(frequency, amplitude)], sample_rate, len)
}

/// Sum of sines given as `(frequency, amplitude)` pairs
pub fn tones(components: &[(f64, f64)], sample_rate: u32, len: usize) -> Vec<f64> {
    let sample_rate = sample_rate.max(1) as f64;
    (0..len)
        .map(|i| {
            let t = i as f64 / sample_rate;
            components
                .iter()
                .map(|&(frequency, amplitude)| amplitude * (2.0 * PI * frequency * t).sin())
                .sum()
        })
        .collect()
}

/// All-zero buffer
pub fn silence(len: usize) -> Vec<f64> {
    vec![0.0; len]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_shape() {
        let samples = sine(1.0, 4, 4, 2.0);
        assert!(samples[0].abs() < 1e-12);
        assert!((samples[1] - 2.0).abs() < 1e-12);
        assert!(samples[2].abs() < 1e-12);
        assert!((samples[3] + 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_tones_sum() {
        let mixed = tones(&[(1.0, 1.0), (2.0, 0.5)], 8, 8);
        let a = sine(1.0, 8, 8, 1.0);
        let b = sine(2.0, 8, 8, 0.5);
        for i in 0..8 {
            assert!((mixed[i] - (a[i] + b[i])).abs() < 1e-12);
        }
    }
}
