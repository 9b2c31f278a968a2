//! Autoregression with a constant, estimated by conditional least squares.

use super::ols::{least_squares, Design, Inference, LinearFit};
use crate::error::ModelError;

/// AR(p) model `y[t] = c + φ1·y[t-1] + ... + φp·y[t-p] + e[t]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AutoReg {
    pub lags: usize,
}

/// Fitted autoregression
#[derive(Debug, Clone)]
pub struct AutoRegFit {
    pub lags: usize,
    pub constant: f64,
    /// φ1..φp
    pub ar_coeffs: Vec<f64>,
    pub fit: LinearFit,
}

impl AutoReg {
    pub fn new(lags: usize) -> Self {
        Self { lags }
    }

    /// Fit on a contiguous series, conditioning on its first `lags` values.
    pub fn fit(&self, dependent: &str, series: &[f64]) -> Result<AutoRegFit, ModelError> {
        let p = self.lags;
        if p == 0 || series.len() <= 2 * p + 1 {
            return Err(ModelError::InsufficientData {
                observations: series.len().saturating_sub(p),
                parameters: p + 1,
            });
        }

        let y = &series[p..];
        let mut names = vec!["const".to_string()];
        let mut columns = vec![vec![1.0; y.len()]];
        for lag in 1..=p {
            names.push(format!("{dependent}.L{lag}"));
            columns.push(series[p - lag..series.len() - lag].to_vec());
        }
        let design = Design {
            names,
            columns,
            has_intercept: true,
        };

        let model = format!("AutoReg({p})");
        let fit = least_squares(&model, dependent, y, &design, Inference::Asymptotic)?;
        let coefficients = fit.coefficients();

        Ok(AutoRegFit {
            lags: p,
            constant: coefficients[0],
            ar_coeffs: coefficients[1..].to_vec(),
            fit,
        })
    }
}

impl AutoRegFit {
    /// One-step-ahead prediction from the `lags` most recent observations,
    /// most recent first.
    pub fn predict_next(&self, recent: &[f64]) -> f64 {
        self.constant
            + self
                .ar_coeffs
                .iter()
                .zip(recent)
                .map(|(phi, y)| phi * y)
                .sum::<f64>()
    }
}
