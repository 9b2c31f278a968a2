//! SVG charts of the out-of-sample fit.

use anyhow::{Context, Result};
use plotters::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::evaluation::ModelEvaluation;
use crate::features::FeatureTable;
use crate::models::TargetSpec;

const SIZE: (u32, u32) = (1200, 600);
const MARGIN_FRACTION: f64 = 0.05;

/// Padded `(min, max)` of the finite values; a unit range around a constant.
fn axis_range<'a>(values: impl IntoIterator<Item = &'a f64>) -> (f64, f64) {
    let (min, max) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() {
        return (-1.0, 1.0);
    }
    let pad = ((max - min) * MARGIN_FRACTION).max(0.5);
    (min - pad, max + pad)
}

/// Actual against predicted target over the test rows.
pub fn plot_predictions(evaluation: &ModelEvaluation, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let n = evaluation.actual.len();
    let (y_min, y_max) = axis_range(evaluation.actual.iter().chain(&evaluation.predicted));

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{}: actual vs predicted", evaluation.spec.label()),
            ("sans-serif", 24).into_font(),
        )
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..n.max(1) as f64, y_min..y_max)?;

    chart
        .configure_mesh()
        .x_desc("test row")
        .y_desc("price difference")
        .draw()?;

    chart
        .draw_series(LineSeries::new(
            evaluation.actual.iter().enumerate().map(|(i, &y)| (i as f64, y)),
            BLUE,
        ))?
        .label("actual")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], BLUE));

    chart
        .draw_series(LineSeries::new(
            evaluation.predicted.iter().enumerate().map(|(i, &y)| (i as f64, y)),
            RED,
        ))?
        .label("predicted")
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], RED));

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    Ok(())
}

/// Scatter of `y` against `x`.
pub fn plot_scatter(x: &[f64], y: &[f64], title: &str, path: &Path) -> Result<()> {
    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = axis_range(x);
    let (y_min, y_max) = axis_range(y);

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 24).into_font())
        .margin(10)
        .x_label_area_size(30)
        .y_label_area_size(50)
        .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

    chart.configure_mesh().draw()?;
    chart.draw_series(
        x.iter()
            .zip(y)
            .map(|(&x, &y)| Circle::new((x, y), 2, BLUE.mix(0.5).filled())),
    )?;

    root.present()?;
    Ok(())
}

/// One prediction chart per model plus the target against the day-ahead
/// difference on the test rows.
pub fn write_charts(
    dir: &Path,
    evaluations: &[ModelEvaluation],
    test: &FeatureTable,
    target: &TargetSpec,
) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    let mut written = Vec::with_capacity(evaluations.len() + 1);

    for evaluation in evaluations {
        let path = dir.join(format!("{}.svg", evaluation.spec));
        plot_predictions(evaluation, &path)
            .with_context(|| format!("plotting {}", path.display()))?;
        written.push(path);
    }

    let dependent = target.dependent();
    let day_ahead = target.day_ahead();
    let path = dir.join("target_vs_day_ahead.svg");
    plot_scatter(
        test.feature(&day_ahead)?,
        test.feature(&dependent)?,
        &format!("{dependent} vs {day_ahead}"),
        &path,
    )
    .with_context(|| format!("plotting {}", path.display()))?;
    written.push(path);

    info!(dir = %dir.display(), charts = written.len(), "wrote charts");
    Ok(written)
}
