//! Runs the stages in order: load, clean, describe, engineer, split, fit,
//! evaluate, report.

use anyhow::{bail, Context, Result};
use itertools::Itertools;
use tracing::{info, info_span};

use crate::analysis::{correlation_matrix, describe, summary_table, ColumnSummary};
use crate::config::Config;
use crate::data::{clean, load_csv, PriceTable};
use crate::evaluation::{evaluate, metrics_table, ModelReport, PipelineReport};
use crate::features::{build_features, split_by_month, FeatureTable, Transform};
use crate::models::{fit_models, ModelSpec, TargetSpec};

/// Execute the whole analysis described by `cfg`, printing the tables to
/// stdout.
pub fn run(cfg: &Config) -> Result<PipelineReport> {
    cfg.validate()
        .map_err(anyhow::Error::msg)
        .context("invalid configuration")?;
    let target = cfg.target_spec()?;
    let plan = cfg.feature_plan();

    let raw = {
        let _span = info_span!("load").entered();
        load_csv(&cfg.input.path, &cfg.input.timestamp_column)
            .with_context(|| format!("loading {}", cfg.input.path.display()))?
    };

    let (table, cleaning) = {
        let _span = info_span!("clean").entered();
        clean(raw).context("cleaning price table")?
    };
    let countries = table.countries();
    info!(countries = %countries.iter().join(", "), "countries in file");
    if !countries.contains(&target.country) {
        bail!(
            "country '{}' not found in {} (available: {})",
            target.country,
            cfg.input.path.display(),
            countries.iter().join(", ")
        );
    }

    println!("Price columns for {}", target.country);
    println!("{}", summary_table(&describe_country(&table, &target)));

    let (features, feature_report) = {
        let _span = info_span!("features").entered();
        build_features(&table, &plan).context("building features")?
    };

    println!("Correlations");
    println!("{}", correlation_matrix(&correlation_columns(&features, &target)).to_table());

    let partition = split_by_month(&features, cfg.model.test_month).context("splitting by month")?;

    let models = {
        let _span = info_span!("fit", train_rows = partition.train.len()).entered();
        fit_models(&partition.train, &target, &ModelSpec::all()).context("fitting models")?
    };
    for model in &models {
        println!("{}", model.summary());
    }

    let evaluations = {
        let _span = info_span!("evaluate", test_rows = partition.test.len()).entered();
        evaluate(&models, &partition.test, &target).context("evaluating models")?
    };
    println!("Out-of-sample accuracy, month {}", partition.test_month);
    println!("{}", metrics_table(&evaluations));

    let report = PipelineReport {
        input: cfg.input.path.display().to_string(),
        target: target.clone(),
        cleaning,
        features: feature_report,
        partition: partition.summary(),
        models: models
            .iter()
            .zip(&evaluations)
            .map(|(model, evaluation)| ModelReport {
                spec: model.spec(),
                label: model.spec().label().to_string(),
                summary: model.summary().clone(),
                metrics: evaluation.metrics.clone(),
            })
            .collect(),
    };

    if let Some(path) = &cfg.output.report_path {
        report
            .write_json(path)
            .with_context(|| format!("writing report {}", path.display()))?;
        info!(path = %path.display(), "wrote report");
    }

    if let Some(dir) = &cfg.output.plot_dir {
        #[cfg(feature = "plots")]
        {
            crate::plotting::write_charts(dir, &evaluations, &partition.test, &target)?;
        }
        #[cfg(not(feature = "plots"))]
        {
            tracing::warn!(
                dir = %dir.display(),
                "plot_dir is set but the `plots` feature is disabled"
            );
        }
    }

    Ok(report)
}

/// Summaries of the target country's cleaned price columns.
fn describe_country(table: &PriceTable, target: &TargetSpec) -> Vec<ColumnSummary> {
    table
        .columns
        .iter()
        .filter(|c| c.key.country == target.country)
        .map(|c| describe(&c.key.column_name(), &c.values))
        .collect()
}

/// Levels of the target country plus the modelled and day-ahead differences.
fn correlation_columns(
    features: &FeatureTable,
    target: &TargetSpec,
) -> Vec<(String, Vec<Option<f64>>)> {
    let levels = features
        .columns
        .iter()
        .filter(|c| c.key.series.country == target.country && c.key.transform == Transform::Level)
        .map(|c| c.key.clone());

    levels
        .chain([target.dependent(), target.day_ahead()])
        .filter_map(|key| {
            let values = features.feature(&key).ok()?;
            Some((key.column_name(), values.iter().copied().map(Some).collect()))
        })
        .collect()
}
