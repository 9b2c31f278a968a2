//! End-to-end runs of the pipeline on a synthetic price file.

use balancing_econometrics::config::Config;
use balancing_econometrics::models::ModelSpec;
use balancing_econometrics::pipeline;
use chrono::{Duration, NaiveDate, Timelike};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const DAYS_PER_MONTH: u32 = 2;
const ROWS_PER_DAY: usize = 96;

fn noise(t: usize, seed: f64) -> f64 {
    ((t as f64 * 12.9898 + seed).sin() * 43758.5453).fract()
}

/// Two days of quarter-hour prices in each of `months`, with hourly day-ahead
/// prices and balancing prices driven by the day-ahead price.
fn synthetic_csv(months: std::ops::RangeInclusive<u32>) -> String {
    let mut csv = String::from(
        "Datetime,Germany_Day Ahead,long_Germany,short_Germany,Austria_Day Ahead,long_Austria\n",
    );
    let mut t = 0;
    let mut long = 0.0;
    for month in months {
        for day in 1..=DAYS_PER_MONTH {
            let midnight = NaiveDate::from_ymd_opt(2023, month, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap();
            for slot in 0..ROWS_PER_DAY {
                let ts = midnight + Duration::minutes(15 * slot as i64);
                let hourly = ts.minute() == 0;
                let da_de = 80.0 + 20.0 * (ts.hour() as f64 / 24.0 * std::f64::consts::TAU).sin()
                    + 5.0 * noise(t / 4, 1.0);
                long = 0.6 * long + 0.8 * da_de * 0.1 + 3.0 * noise(t, 2.0);
                let short = long - 2.0 + noise(t, 3.0);
                let da_at = da_de - 3.0 + noise(t / 4, 4.0);
                let long_at = 0.5 * long + noise(t, 5.0);

                let cell = |v: f64| if hourly { format!("{v:.3}") } else { String::new() };
                writeln!(
                    csv,
                    "{},{},{:.3},{:.3},{},{:.3}",
                    ts.format("%Y-%m-%d %H:%M:%S"),
                    cell(da_de),
                    long,
                    short,
                    cell(da_at),
                    long_at
                )
                .unwrap();
                t += 1;
            }
        }
    }
    csv
}

fn config_for(dir: &Path, csv: &str) -> Config {
    let input = dir.join("prices.csv");
    fs::write(&input, csv).unwrap();
    let mut cfg = Config::default();
    cfg.input.path = input;
    cfg.output.report_path = Some(dir.join("out").join("report.json"));
    cfg
}

#[test]
fn test_full_year_run() {
    let dir = TempDir::new().unwrap();
    let cfg = config_for(dir.path(), &synthetic_csv(1..=12));

    let report = pipeline::run(&cfg).unwrap();

    let total_rows = 12 * DAYS_PER_MONTH as usize * ROWS_PER_DAY;
    assert_eq!(report.cleaning.rows_in, total_rows);
    assert_eq!(report.cleaning.rows_out, total_rows - 1);
    assert_eq!(report.features.rows_out, total_rows - 1 - 7);
    assert_eq!(report.partition.test_month, 12);
    assert_eq!(report.partition.test_rows, DAYS_PER_MONTH as usize * ROWS_PER_DAY);
    assert_eq!(
        report.partition.train_rows + report.partition.test_rows,
        report.features.rows_out
    );

    let specs: Vec<ModelSpec> = report.models.iter().map(|m| m.spec).collect();
    assert_eq!(specs, ModelSpec::all());
    for model in &report.models {
        assert_eq!(model.metrics.sample_count, report.partition.test_rows);
        assert!(model.metrics.rmse.is_finite());
        assert!(model.metrics.mae <= model.metrics.rmse + 1e-12);
    }

    let hours = &report.models[6].summary;
    assert!(hours.param("hour_7").is_some());
    assert_eq!(hours.nobs, report.partition.train_rows);

    let written = fs::read_to_string(cfg.output.report_path.as_ref().unwrap()).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(json["models"].as_array().unwrap().len(), 7);
    assert_eq!(json["models"][0]["spec"], "ar1");
    assert_eq!(json["target"]["country"], "germany");
}

/// Blank the Austrian day-ahead cells of the first `rows` observations.
fn austria_day_ahead_starts_late(csv: &str, rows: usize) -> String {
    csv.lines()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || i > rows {
                return line.to_string();
            }
            let mut cells: Vec<&str> = line.split(',').collect();
            cells[4] = "";
            cells.join(",")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn test_late_day_ahead_of_other_country_only_drops_rows() {
    let dir = TempDir::new().unwrap();
    let late_rows = ROWS_PER_DAY;
    let csv = austria_day_ahead_starts_late(&synthetic_csv(1..=12), late_rows);
    let cfg = config_for(dir.path(), &csv);

    let report = pipeline::run(&cfg).unwrap();

    let total_rows = 12 * DAYS_PER_MONTH as usize * ROWS_PER_DAY;
    assert_eq!(report.cleaning.rows_out, total_rows - 1);
    assert!(report.cleaning.values_missing > 0);
    // first Austrian value at cleaned row late_rows - 1, then the warm-up
    assert_eq!(report.features.rows_out, total_rows - 1 - (late_rows - 1) - 7);
    assert_eq!(report.models.len(), 7);
    assert_eq!(report.partition.test_rows, DAYS_PER_MONTH as usize * ROWS_PER_DAY);
}

#[test]
fn test_short_direction_for_other_country_is_missing() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config_for(dir.path(), &synthetic_csv(1..=12));
    cfg.model.country = "Austria".into();
    cfg.model.direction = "short".parse().unwrap();

    let err = pipeline::run(&cfg).unwrap_err();
    assert!(format!("{err:#}").contains("short_austria_diff1"));
}

#[test]
fn test_unknown_country_is_rejected() {
    let dir = TempDir::new().unwrap();
    let mut cfg = config_for(dir.path(), &synthetic_csv(1..=12));
    cfg.model.country = "france".into();

    let err = pipeline::run(&cfg).unwrap_err();
    assert!(err.to_string().contains("france"));
}

#[test]
fn test_missing_test_month_fails() {
    let dir = TempDir::new().unwrap();
    let cfg = config_for(dir.path(), &synthetic_csv(1..=3));

    let err = pipeline::run(&cfg).unwrap_err();
    assert!(format!("{err:#}").contains("test partition is empty"));
}

#[test]
fn test_invalid_config_is_rejected_before_loading() {
    let mut cfg = Config::default();
    cfg.input.path = "does/not/exist.csv".into();
    cfg.model.test_month = 13;

    let err = pipeline::run(&cfg).unwrap_err();
    assert!(format!("{err:#}").contains("invalid configuration"));
}
