//! Window Functions

use std::f64::consts::PI;

/// Symmetric Hann window: `0.5 * (1 - cos(2πi / (N-1)))`
pub fn hann_window(size: usize) -> Vec<f64> {
    if size < 2 {
        return vec![1.0; size];
    }
    let denom = (size - 1) as f64;
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * PI * i as f64 / denom).cos()))
        .collect()
}
