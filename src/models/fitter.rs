use tracing::{info, info_span};

use super::autoreg::{AutoReg, AutoRegFit};
use super::ols::{least_squares, Design, Inference, LinearFit};
use super::{ModelSpec, RegressionSummary, TargetSpec};
use crate::error::{FeatureError, ModelError};
use crate::features::{FeatureKey, FeatureTable, Regressor};

/// A specification estimated on the training partition
pub trait FittedModel: Send + Sync {
    fn spec(&self) -> ModelSpec;

    fn summary(&self) -> &RegressionSummary;

    /// Apply the estimated coefficients to the regressors of `table`.
    fn predict(&self, table: &FeatureTable) -> Result<Vec<f64>, ModelError>;
}

/// OLS specification with its regressor list
#[derive(Debug, Clone)]
pub struct FittedOls {
    pub spec: ModelSpec,
    pub regressors: Vec<Regressor>,
    pub fit: LinearFit,
}

impl FittedModel for FittedOls {
    fn spec(&self) -> ModelSpec {
        self.spec
    }

    fn summary(&self) -> &RegressionSummary {
        &self.fit.summary
    }

    fn predict(&self, table: &FeatureTable) -> Result<Vec<f64>, ModelError> {
        let design = design_for(table, &self.regressors)?;
        let coefficients = self.fit.coefficients();
        Ok((0..table.len())
            .map(|row| {
                design
                    .columns
                    .iter()
                    .zip(&coefficients)
                    .map(|(column, beta)| column[row] * beta)
                    .sum()
            })
            .collect())
    }
}

/// Autoregression on the target series
#[derive(Debug, Clone)]
pub struct FittedAutoReg {
    pub spec: ModelSpec,
    pub dependent: FeatureKey,
    pub fit: AutoRegFit,
}

impl FittedModel for FittedAutoReg {
    fn spec(&self) -> ModelSpec {
        self.spec
    }

    fn summary(&self) -> &RegressionSummary {
        &self.fit.fit.summary
    }

    /// One step ahead, conditioning on the observed lags stored in the table.
    fn predict(&self, table: &FeatureTable) -> Result<Vec<f64>, ModelError> {
        let lags = (1..=self.fit.lags)
            .map(|lag| table_feature(table, &self.dependent.lagged(lag)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok((0..table.len())
            .map(|row| {
                let recent: Vec<f64> = lags.iter().map(|column| column[row]).collect();
                self.fit.predict_next(&recent)
            })
            .collect())
    }
}

/// Fit every specification in `specs` on `train`.
///
/// Errors from any fit abort the whole batch.
pub fn fit_models(
    train: &FeatureTable,
    target: &TargetSpec,
    specs: &[ModelSpec],
) -> Result<Vec<Box<dyn FittedModel>>, ModelError> {
    let dependent = target.dependent();
    let y = table_feature(train, &dependent)?;
    let dependent_name = dependent.column_name();

    let mut models: Vec<Box<dyn FittedModel>> = Vec::with_capacity(specs.len());
    for &spec in specs {
        let _span = info_span!("fit", model = %spec).entered();

        let model: Box<dyn FittedModel> = match spec.regressors(target) {
            None => Box::new(FittedAutoReg {
                spec,
                dependent: dependent.clone(),
                fit: AutoReg::new(spec.max_lag()).fit(&dependent_name, y)?,
            }),
            Some(regressors) => {
                let design = design_for(train, &regressors)?;
                let fit = least_squares("OLS", &dependent_name, y, &design, Inference::Exact)?;
                Box::new(FittedOls {
                    spec,
                    regressors,
                    fit,
                })
            }
        };

        let summary = model.summary();
        info!(
            nobs = summary.nobs,
            r_squared = summary.r_squared,
            aic = summary.aic,
            bic = summary.bic,
            "fitted model"
        );
        models.push(model);
    }
    Ok(models)
}

fn design_for(table: &FeatureTable, regressors: &[Regressor]) -> Result<Design, ModelError> {
    let columns = regressors
        .iter()
        .map(|r| table.column(r).map_err(missing_column))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Design {
        names: regressors.iter().map(Regressor::name).collect(),
        columns,
        has_intercept: regressors.contains(&Regressor::Intercept),
    })
}

fn table_feature<'a>(table: &'a FeatureTable, key: &FeatureKey) -> Result<&'a [f64], ModelError> {
    table.feature(key).map_err(missing_column)
}

fn missing_column(err: FeatureError) -> ModelError {
    match err {
        FeatureError::UnknownColumn(name) => ModelError::MissingColumn(name),
        other => ModelError::MissingColumn(other.to_string()),
    }
}
