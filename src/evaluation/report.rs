use serde::Serialize;
use std::fs;
use std::path::Path;
use tabled::{builder::Builder, settings::Style, Table};

use super::ModelEvaluation;
use crate::data::CleanReport;
use crate::features::{FeatureReport, PartitionSummary};
use crate::models::{ModelSpec, RegressionSummary, TargetSpec};

/// Metrics table with one column per model and one row per metric.
pub fn metrics_table(evaluations: &[ModelEvaluation]) -> Table {
    let mut builder = Builder::default();

    let mut header = vec![String::from("metric")];
    header.extend(evaluations.iter().map(|e| e.spec.label().to_string()));
    builder.push_record(header);

    let rows: [(&str, fn(&ModelEvaluation) -> f64); 5] = [
        ("correlation", |e| e.metrics.correlation),
        ("RMSE", |e| e.metrics.rmse),
        ("MAE", |e| e.metrics.mae),
        ("mean error", |e| e.metrics.mean_error),
        ("max error", |e| e.metrics.max_error),
    ];
    for (name, value) in rows {
        let mut record = vec![name.to_string()];
        record.extend(evaluations.iter().map(|e| format!("{:.4}", value(e))));
        builder.push_record(record);
    }

    let mut table = builder.build();
    table.with(Style::modern());
    table
}

/// One fitted and evaluated specification in the run report
#[derive(Debug, Clone, Serialize)]
pub struct ModelReport {
    pub spec: ModelSpec,
    pub label: String,
    pub summary: RegressionSummary,
    pub metrics: super::ForecastMetrics,
}

/// Everything a run produced, serialised to the configured report path
#[derive(Debug, Clone, Serialize)]
pub struct PipelineReport {
    pub input: String,
    pub target: TargetSpec,
    pub cleaning: CleanReport,
    pub features: FeatureReport,
    pub partition: PartitionSummary,
    pub models: Vec<ModelReport>,
}

impl PipelineReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    pub fn write_json(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluation::ForecastMetrics;

    fn evaluation(spec: ModelSpec, predicted: Vec<f64>) -> ModelEvaluation {
        let actual = vec![1.0, 2.0, 3.0, 4.0];
        let metrics = ForecastMetrics::calculate(&actual, &predicted).unwrap();
        ModelEvaluation {
            spec,
            actual,
            predicted,
            metrics,
        }
    }

    #[test]
    fn test_metrics_table_layout() {
        let evaluations = vec![
            evaluation(ModelSpec::Ar1, vec![1.0, 2.0, 3.0, 4.0]),
            evaluation(ModelSpec::OlsDayAhead, vec![1.5, 2.0, 2.5, 4.0]),
        ];
        let table = metrics_table(&evaluations);
        assert_eq!(table.count_rows(), 6);
        assert_eq!(table.count_columns(), 3);

        let rendered = table.to_string();
        assert!(rendered.contains("AR(1)"));
        assert!(rendered.contains("OLS DA"));
        assert!(rendered.contains("max error"));
        assert!(rendered.contains("1.0000"));
    }

    #[test]
    fn test_report_json_fields() {
        let report = PipelineReport {
            input: "prices.csv".into(),
            target: TargetSpec::default(),
            cleaning: CleanReport::default(),
            features: FeatureReport::default(),
            partition: PartitionSummary {
                train_rows: 10,
                test_rows: 2,
                test_month: 12,
            },
            models: vec![],
        };
        let json: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(json["partition"]["test_rows"], 2);
        assert_eq!(json["target"]["country"], "germany");
        assert_eq!(json["target"]["direction"], "long");
    }
}
