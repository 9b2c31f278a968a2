//! Out-of-sample accuracy metrics
//!
//! Errors are defined as `actual - predicted`, so a positive mean error
//! means the model under-predicts on average.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Forecast accuracy metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastMetrics {
    /// Pearson correlation of actual and predicted values
    pub correlation: f64,
    /// Root Mean Square Error
    pub rmse: f64,
    /// Mean Absolute Error
    pub mae: f64,
    /// Mean of `actual - predicted`
    pub mean_error: f64,
    /// Largest absolute error
    pub max_error: f64,
    /// Number of samples evaluated
    pub sample_count: usize,
}

impl ForecastMetrics {
    /// Calculate metrics from actual and predicted values
    pub fn calculate(actual: &[f64], predicted: &[f64]) -> Result<Self, ForecastMetricsError> {
        if actual.len() != predicted.len() {
            return Err(ForecastMetricsError::DimensionMismatch {
                actual: actual.len(),
                predicted: predicted.len(),
            });
        }

        if actual.is_empty() {
            return Err(ForecastMetricsError::EmptyData);
        }

        let n = actual.len() as f64;
        let errors: Vec<f64> = actual.iter().zip(predicted).map(|(a, p)| a - p).collect();

        let mae = errors.iter().map(|e| e.abs()).sum::<f64>() / n;
        let rmse = (errors.iter().map(|e| e * e).sum::<f64>() / n).sqrt();
        let mean_error = errors.iter().sum::<f64>() / n;
        let max_error = errors.iter().map(|e| e.abs()).fold(0.0f64, f64::max);

        // Identical series correlate perfectly even when they are constant
        let correlation = if actual == predicted {
            1.0
        } else {
            pearson(actual, predicted)
        };

        Ok(ForecastMetrics {
            correlation,
            rmse,
            mae,
            mean_error,
            max_error,
            sample_count: actual.len(),
        })
    }
}

/// Pearson correlation; NaN when either series has zero variance.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    let n = x.len().min(y.len());
    if n == 0 {
        return f64::NAN;
    }
    let mean_x = x[..n].iter().sum::<f64>() / n as f64;
    let mean_y = y[..n].iter().sum::<f64>() / n as f64;

    let (mut sxy, mut sxx, mut syy) = (0.0, 0.0, 0.0);
    for (a, b) in x.iter().zip(y) {
        let dx = a - mean_x;
        let dy = b - mean_y;
        sxy += dx * dy;
        sxx += dx * dx;
        syy += dy * dy;
    }

    if sxx == 0.0 || syy == 0.0 {
        return f64::NAN;
    }
    sxy / (sxx * syy).sqrt()
}

impl fmt::Display for ForecastMetrics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Metrics: corr={:.3}, RMSE={:.3}, MAE={:.3}, ME={:.3}, MaxE={:.3}, n={}",
            self.correlation,
            self.rmse,
            self.mae,
            self.mean_error,
            self.max_error,
            self.sample_count
        )
    }
}

/// Forecast metrics calculation errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum ForecastMetricsError {
    #[error("Dimension mismatch: actual={actual}, predicted={predicted}")]
    DimensionMismatch { actual: usize, predicted: usize },

    #[error("Empty data provided")]
    EmptyData,
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_perfect_forecast() {
        let actual = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let predicted = actual.clone();

        let metrics = ForecastMetrics::calculate(&actual, &predicted).unwrap();

        assert_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.rmse, 0.0);
        assert_eq!(metrics.mean_error, 0.0);
        assert_eq!(metrics.max_error, 0.0);
        assert_eq!(metrics.correlation, 1.0);
        assert_eq!(metrics.sample_count, 5);
    }

    #[test]
    fn test_perfect_constant_forecast() {
        let actual = vec![2.5; 8];
        let metrics = ForecastMetrics::calculate(&actual, &actual).unwrap();
        assert_eq!(metrics.correlation, 1.0);
        assert_eq!(metrics.rmse, 0.0);
    }

    #[test]
    fn test_forecast_with_errors() {
        let actual = vec![1.0, 2.0, 3.0, 4.0];
        let predicted = vec![2.0, 2.0, 2.0, 2.0];

        let metrics = ForecastMetrics::calculate(&actual, &predicted).unwrap();

        // errors = [-1, 0, 1, 2]
        assert!((metrics.mae - 1.0).abs() < 1e-12);
        assert!((metrics.rmse - 1.5f64.sqrt()).abs() < 1e-12);
        assert!((metrics.mean_error - 0.5).abs() < 1e-12);
        assert_eq!(metrics.max_error, 2.0);
        // constant prediction has no variance
        assert!(metrics.correlation.is_nan());
    }

    #[test]
    fn test_negative_correlation() {
        let actual = vec![1.0, 2.0, 3.0];
        let predicted = vec![3.0, 2.0, 1.0];
        let metrics = ForecastMetrics::calculate(&actual, &predicted).unwrap();
        assert!((metrics.correlation + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_dimension_mismatch() {
        let actual = vec![1.0, 2.0, 3.0];
        let predicted = vec![1.0, 2.0];

        let result = ForecastMetrics::calculate(&actual, &predicted);
        assert!(matches!(
            result,
            Err(ForecastMetricsError::DimensionMismatch {
                actual: 3,
                predicted: 2
            })
        ));
    }

    #[test]
    fn test_empty_data() {
        assert!(matches!(
            ForecastMetrics::calculate(&[], &[]),
            Err(ForecastMetricsError::EmptyData)
        ));
    }

    proptest! {
        #[test]
        fn prop_metric_ordering(
            pairs in prop::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 1..50)
        ) {
            let (actual, predicted): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
            let m = ForecastMetrics::calculate(&actual, &predicted).unwrap();
            prop_assert!(m.mean_error.abs() <= m.mae + 1e-9);
            prop_assert!(m.mae <= m.rmse + 1e-9);
            prop_assert!(m.rmse <= m.max_error + 1e-9);
            if m.correlation.is_finite() {
                prop_assert!(m.correlation.abs() <= 1.0 + 1e-9);
            }
        }
    }
}
