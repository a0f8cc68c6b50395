//! Summary Statistics over Feature Histories

use serde::{Deserialize, Serialize};

/// Summary of a series of scalar measurements
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    /// Number of values
    pub count: usize,
    /// Mean value
    pub mean: f64,
    /// Population standard deviation
    pub std_dev: f64,
    /// Minimum value
    pub min: f64,
    /// Maximum value
    pub max: f64,
}

impl SummaryStatistics {
    /// Compute summary statistics from a sequence of values
    pub fn compute<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        let values: Vec<f64> = values.into_iter().collect();
        if values.is_empty() {
            return Self::default();
        }

        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let min = values.iter().cloned().fold(f64::MAX, f64::min);
        let max = values.iter().cloned().fold(f64::MIN, f64::max);

        let variance = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / n;

        Self {
            count: values.len(),
            mean,
            std_dev: variance.sqrt(),
            min,
            max,
        }
    }

    /// `std_dev / mean`, or 0 when the mean is not positive
    pub fn coefficient_of_variation(&self) -> f64 {
        if self.mean > 0.0 {
            self.std_dev / self.mean
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_computation() {
        let stats = SummaryStatistics::compute(vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((stats.mean - 3.0).abs() < 0.001);
        assert_eq!(stats.count, 5);
        assert_eq!(stats.min, 1.0);
        assert_eq!(stats.max, 5.0);
    }

    #[test]
    fn test_std_dev_computation() {
        let stats = SummaryStatistics::compute(vec![2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert!((stats.std_dev - 2.0).abs() < 1e-12);
        assert!((stats.coefficient_of_variation() - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_constant_series_has_no_spread() {
        let stats = SummaryStatistics::compute([15.0; 4]);
        assert_eq!(stats.std_dev, 0.0);
        assert_eq!(stats.coefficient_of_variation(), 0.0);
    }

    #[test]
    fn test_empty_values() {
        let stats = SummaryStatistics::compute(Vec::new());
        assert_eq!(stats, SummaryStatistics::default());
        assert_eq!(stats.coefficient_of_variation(), 0.0);
    }
}
