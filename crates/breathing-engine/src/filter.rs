//! Breathing-Band Smoothing and Peak Detection

/// 3-tap smoothing kernel
pub const SMOOTHING_KERNEL: [f64; 3] = [0.25, 0.5, 0.25];

/// Apply the 3-tap kernel to interior samples; the two endpoints pass through.
pub fn smooth(samples: &[f64]) -> Vec<f64> {
    let mut filtered = samples.to_vec();
    if samples.len() < 3 {
        return filtered;
    }

    let [a, b, c] = SMOOTHING_KERNEL;
    for (i, window) in samples.windows(3).enumerate() {
        filtered[i + 1] = a * window[0] + b * window[1] + c * window[2];
    }
    filtered
}

/// Indices of strict local maxima above `threshold`
pub fn detect_peaks(samples: &[f64], threshold: f64) -> Vec<usize> {
    if samples.len() < 3 {
        return Vec::new();
    }

    samples
        .windows(3)
        .enumerate()
        .filter(|(_, w)| w[1] > threshold && w[1] > w[0] && w[1] > w[2])
        .map(|(i, _)| i + 1)
        .collect()
}

/// Seconds between successive peaks
pub fn peak_intervals(peaks: &[usize], sample_rate: u32) -> Vec<f64> {
    if sample_rate == 0 {
        return Vec::new();
    }
    peaks
        .windows(2)
        .map(|pair| (pair[1] - pair[0]) as f64 / sample_rate as f64)
        .collect()
}

/// Samples from the first peak up to (excluding) the second, or the whole buffer
/// when fewer than two peaks were found
pub fn extract_cycle(samples: &[f64], peaks: &[usize]) -> Vec<f64> {
    match peaks {
        [start, end, ..] if start < end && *end <= samples.len() => samples[*start..*end].to_vec(),
        _ => samples.to_vec(),
    }
}
