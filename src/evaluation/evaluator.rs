use serde::Serialize;
use tracing::{info, warn};

use super::ForecastMetrics;
use crate::error::{EvaluationError, ModelError};
use crate::features::FeatureTable;
use crate::models::{FittedModel, ModelSpec, TargetSpec};

/// Out-of-sample predictions of one model with their metrics
#[derive(Debug, Clone, Serialize)]
pub struct ModelEvaluation {
    pub spec: ModelSpec,
    pub actual: Vec<f64>,
    pub predicted: Vec<f64>,
    pub metrics: ForecastMetrics,
}

/// Predict the target on `test` with every model and score the predictions.
pub fn evaluate(
    models: &[Box<dyn FittedModel>],
    test: &FeatureTable,
    target: &TargetSpec,
) -> Result<Vec<ModelEvaluation>, EvaluationError> {
    models
        .iter()
        .map(|model| {
            let spec = model.spec();
            let actual = test
                .feature(&target.dependent())
                .map_err(|err| EvaluationError::Prediction {
                    spec,
                    source: ModelError::MissingColumn(err.to_string()),
                })?
                .to_vec();
            let predicted = model
                .predict(test)
                .map_err(|source| EvaluationError::Prediction { spec, source })?;
            let metrics = ForecastMetrics::calculate(&actual, &predicted)
                .map_err(|source| EvaluationError::Metrics { spec, source })?;

            if metrics.correlation.is_nan() {
                warn!(model = %spec, "correlation undefined, a series has zero variance");
            }
            info!(
                model = %spec,
                correlation = metrics.correlation,
                rmse = metrics.rmse,
                mae = metrics.mae,
                "evaluated model"
            );

            Ok(ModelEvaluation {
                spec,
                actual,
                predicted,
                metrics,
            })
        })
        .collect()
}
