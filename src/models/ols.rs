//! Least-squares estimation with classical inference.
//!
//! The normal equations are solved on the column-equilibrated cross-product
//! matrix, so the collinearity check does not depend on regressor scale.

use nalgebra::{DMatrix, DVector};
use statrs::distribution::{ContinuousCDF, FisherSnedecor, Normal, StudentsT};
use std::f64::consts::PI;

use super::{ParamEstimate, RegressionSummary};
use crate::error::ModelError;

/// Smallest admissible diagonal of the Cholesky factor of the equilibrated
/// cross-product matrix (`sqrt(1 - R²)` of a column on its predecessors).
const COLLINEARITY_TOLERANCE: f64 = 1e-7;

/// Regressor matrix with column names
#[derive(Debug, Clone, PartialEq)]
pub struct Design {
    pub names: Vec<String>,
    pub columns: Vec<Vec<f64>>,
    /// The design contains a constant column; R² is centred when set
    pub has_intercept: bool,
}

impl Design {
    pub fn nrows(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn ncols(&self) -> usize {
        self.columns.len()
    }

    fn matrix(&self) -> DMatrix<f64> {
        DMatrix::from_fn(self.nrows(), self.ncols(), |i, j| self.columns[j][i])
    }
}

/// How residual variance and parameter significance are computed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inference {
    /// σ² = SSR / df_resid, Student t p-values, F test
    Exact,
    /// σ² = SSR / nobs, normal p-values, σ² counted as a parameter in the
    /// information criteria (conditional MLE of autoregressions)
    Asymptotic,
}

/// Result of a least-squares fit
#[derive(Debug, Clone)]
pub struct LinearFit {
    pub summary: RegressionSummary,
    pub fitted: Vec<f64>,
    pub residuals: Vec<f64>,
}

impl LinearFit {
    pub fn coefficients(&self) -> Vec<f64> {
        self.summary.coefficients()
    }
}

/// Regress `y` on `design`.
pub fn least_squares(
    model: &str,
    dependent: &str,
    y: &[f64],
    design: &Design,
    inference: Inference,
) -> Result<LinearFit, ModelError> {
    let n = y.len();
    let k = design.ncols();

    if design.columns.iter().any(|c| c.len() != n) {
        return Err(ModelError::DimensionMismatch {
            rows: design.nrows(),
            targets: n,
        });
    }
    if k == 0 || n <= k {
        return Err(ModelError::InsufficientData {
            observations: n,
            parameters: k,
        });
    }

    let x = design.matrix();
    let yv = DVector::from_column_slice(y);
    let xtx = x.transpose() * &x;

    let scale = DVector::from_iterator(k, xtx.diagonal().iter().map(|d| d.sqrt()));
    if scale.iter().any(|s| !s.is_finite() || *s == 0.0) {
        return Err(ModelError::Singular);
    }
    let inv_scale = DMatrix::from_diagonal(&scale.map(|s| 1.0 / s));
    let equilibrated = &inv_scale * &xtx * &inv_scale;

    let cholesky = equilibrated.cholesky().ok_or(ModelError::Singular)?;
    if cholesky
        .l_dirty()
        .diagonal()
        .iter()
        .any(|d| !d.is_finite() || *d < COLLINEARITY_TOLERANCE)
    {
        return Err(ModelError::Singular);
    }

    let xtx_inv = &inv_scale * cholesky.inverse() * &inv_scale;
    let beta = &xtx_inv * (x.transpose() * &yv);

    let fitted_v = &x * &beta;
    let residual_v = &yv - &fitted_v;
    let ssr = residual_v.norm_squared();

    let nobs = n as f64;
    let df_resid = n - k;
    let df_model = k - usize::from(design.has_intercept);

    let mean_y = yv.mean();
    let tss = if design.has_intercept {
        yv.iter().map(|v| (v - mean_y).powi(2)).sum::<f64>()
    } else {
        yv.norm_squared()
    };
    let r_squared = if tss > 0.0 { 1.0 - ssr / tss } else { f64::NAN };
    let adj_r_squared = 1.0
        - (nobs - f64::from(u8::from(design.has_intercept))) / df_resid as f64 * (1.0 - r_squared);

    let sigma2 = match inference {
        Inference::Exact => ssr / df_resid as f64,
        Inference::Asymptotic => ssr / nobs,
    };

    let params = beta
        .iter()
        .zip(&design.names)
        .enumerate()
        .map(|(j, (&coef, name))| {
            let std_err = (sigma2 * xtx_inv[(j, j)]).sqrt();
            let statistic = coef / std_err;
            ParamEstimate {
                name: name.clone(),
                coef,
                std_err,
                statistic,
                p_value: two_sided_p_value(statistic, df_resid, inference),
            }
        })
        .collect();

    let (f_statistic, f_pvalue) = match inference {
        Inference::Exact if df_model > 0 => {
            let f = ((tss - ssr) / df_model as f64) / (ssr / df_resid as f64);
            let p = FisherSnedecor::new(df_model as f64, df_resid as f64)
                .map(|dist| dist.sf(f))
                .unwrap_or(f64::NAN);
            (Some(f), Some(if f.is_infinite() { 0.0 } else { p }))
        }
        _ => (None, None),
    };

    let log_likelihood = -nobs / 2.0 * ((2.0 * PI).ln() + (ssr / nobs).ln() + 1.0);
    let n_params = match inference {
        Inference::Exact => k,
        Inference::Asymptotic => k + 1,
    };
    let n_params = n_params as f64;
    let aic = -2.0 * log_likelihood + 2.0 * n_params;
    let bic = -2.0 * log_likelihood + nobs.ln() * n_params;
    let hqic = -2.0 * log_likelihood + 2.0 * nobs.ln().ln() * n_params;

    let residuals: Vec<f64> = residual_v.iter().copied().collect();
    let durbin_watson = residuals
        .windows(2)
        .map(|w| (w[1] - w[0]).powi(2))
        .sum::<f64>()
        / ssr;

    Ok(LinearFit {
        summary: RegressionSummary {
            model: model.to_string(),
            dependent: dependent.to_string(),
            params,
            nobs: n,
            df_model,
            df_resid,
            r_squared,
            adj_r_squared,
            f_statistic,
            f_pvalue,
            sigma2,
            log_likelihood,
            aic,
            bic,
            hqic,
            durbin_watson,
        },
        fitted: fitted_v.iter().copied().collect(),
        residuals,
    })
}

fn two_sided_p_value(statistic: f64, df_resid: usize, inference: Inference) -> f64 {
    if statistic.is_nan() {
        return f64::NAN;
    }
    let tail = match inference {
        Inference::Exact => {
            StudentsT::new(0.0, 1.0, df_resid as f64).map(|d| d.sf(statistic.abs()))
        }
        Inference::Asymptotic => Normal::new(0.0, 1.0).map(|d| d.sf(statistic.abs())),
    };
    tail.map(|p| 2.0 * p).unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design(columns: Vec<Vec<f64>>, names: &[&str], has_intercept: bool) -> Design {
        Design {
            names: names.iter().map(|s| s.to_string()).collect(),
            columns,
            has_intercept,
        }
    }

    #[test]
    fn test_exact_fit_recovers_coefficients() {
        let x1: Vec<f64> = (0..20).map(|i| i as f64).collect();
        let x2: Vec<f64> = (0..20).map(|i| ((i * 7) % 5) as f64).collect();
        let y: Vec<f64> = x1
            .iter()
            .zip(&x2)
            .map(|(a, b)| 1.5 + 2.0 * a - 0.5 * b)
            .collect();
        let d = design(vec![vec![1.0; 20], x1, x2], &["const", "x1", "x2"], true);

        let fit = least_squares("OLS", "y", &y, &d, Inference::Exact).unwrap();
        let coef = fit.coefficients();
        assert!((coef[0] - 1.5).abs() < 1e-8);
        assert!((coef[1] - 2.0).abs() < 1e-8);
        assert!((coef[2] + 0.5).abs() < 1e-8);
        assert!((fit.summary.r_squared - 1.0).abs() < 1e-10);
        assert_eq!(fit.summary.df_model, 2);
        assert_eq!(fit.summary.df_resid, 17);
    }

    #[test]
    fn test_textbook_statistics() {
        // y = [1, 3, 2, 5, 4] on x = [1..5]: beta = (0.6, 0.8), SSR = 3.6, TSS = 10
        let y = vec![1.0, 3.0, 2.0, 5.0, 4.0];
        let x: Vec<f64> = (1..=5).map(f64::from).collect();
        let d = design(vec![vec![1.0; 5], x], &["const", "x"], true);

        let s = least_squares("OLS", "y", &y, &d, Inference::Exact)
            .unwrap()
            .summary;
        assert!((s.params[0].coef - 0.6).abs() < 1e-10);
        assert!((s.params[1].coef - 0.8).abs() < 1e-10);
        assert!((s.sigma2 - 1.2).abs() < 1e-10);
        assert!((s.r_squared - 0.64).abs() < 1e-10);
        assert!((s.adj_r_squared - 0.52).abs() < 1e-10);
        // se(slope) = sqrt(sigma2 / Sxx)
        assert!((s.params[1].std_err - 0.12f64.sqrt()).abs() < 1e-10);
        assert!((s.f_statistic.unwrap() - 6.4 / 1.2).abs() < 1e-10);
        assert!(s.params[1].p_value > 0.05 && s.params[1].p_value < 0.5);

        let llf = -2.5 * ((2.0 * PI).ln() + (3.6f64 / 5.0).ln() + 1.0);
        assert!((s.log_likelihood - llf).abs() < 1e-10);
        assert!((s.aic - (-2.0 * llf + 4.0)).abs() < 1e-10);
        assert!((s.bic - (-2.0 * llf + 2.0 * 5f64.ln())).abs() < 1e-10);
    }

    #[test]
    fn test_duplicated_columns_are_singular() {
        let x: Vec<f64> = (0..10).map(|i| (i as f64).sin()).collect();
        let d = design(vec![vec![1.0; 10], x.clone(), x], &["const", "a", "b"], true);
        let y: Vec<f64> = (0..10).map(|i| i as f64).collect();
        assert!(matches!(
            least_squares("OLS", "y", &y, &d, Inference::Exact),
            Err(ModelError::Singular)
        ));
    }

    #[test]
    fn test_constant_zero_column_is_singular() {
        let d = design(vec![vec![1.0; 6], vec![0.0; 6]], &["const", "zero"], true);
        let y = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        assert!(matches!(
            least_squares("OLS", "y", &y, &d, Inference::Exact),
            Err(ModelError::Singular)
        ));
    }

    #[test]
    fn test_too_few_observations() {
        let d = design(vec![vec![1.0; 2], vec![1.0, 2.0]], &["const", "x"], true);
        assert!(matches!(
            least_squares("OLS", "y", &[1.0, 2.0], &d, Inference::Exact),
            Err(ModelError::InsufficientData { .. })
        ));
    }

    #[test]
    fn test_dimension_mismatch() {
        let d = design(vec![vec![1.0; 4]], &["const"], true);
        assert!(matches!(
            least_squares("OLS", "y", &[1.0, 2.0, 3.0], &d, Inference::Exact),
            Err(ModelError::DimensionMismatch { .. })
        ));
    }

    #[test]
    fn test_asymptotic_inference_uses_mle_variance() {
        let y = vec![1.0, 3.0, 2.0, 5.0, 4.0];
        let x: Vec<f64> = (1..=5).map(f64::from).collect();
        let d = design(vec![vec![1.0; 5], x], &["const", "x"], true);

        let s = least_squares("AutoReg", "y", &y, &d, Inference::Asymptotic)
            .unwrap()
            .summary;
        assert!((s.sigma2 - 3.6 / 5.0).abs() < 1e-10);
        assert!(s.f_statistic.is_none());
        assert!((s.aic - (-2.0 * s.log_likelihood + 6.0)).abs() < 1e-10);
    }
}
