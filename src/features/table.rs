use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info};

use super::transforms::{self, HOURS_PER_DAY};
use super::{FeatureKey, FeaturePlan, Regressor, Transform};
use crate::data::PriceTable;
use crate::domain::CalendarFields;
use crate::error::FeatureError;

/// A complete engineered column
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureColumn {
    pub key: FeatureKey,
    pub values: Vec<f64>,
}

/// Rows of the cleaned table that survived feature engineering, with every
/// engineered column present.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureTable {
    pub timestamps: Vec<NaiveDateTime>,
    pub calendar: Vec<CalendarFields>,
    /// Position of the row in the cleaned table
    pub trend: Vec<usize>,
    pub columns: Vec<FeatureColumn>,
}

/// Row accounting for the feature build
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeatureReport {
    pub rows_in: usize,
    pub rows_out: usize,
    pub columns: usize,
}

impl FeatureTable {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn feature(&self, key: &FeatureKey) -> Result<&[f64], FeatureError> {
        self.columns
            .iter()
            .find(|c| &c.key == key)
            .map(|c| c.values.as_slice())
            .ok_or_else(|| FeatureError::UnknownColumn(key.column_name()))
    }

    /// Materialise a regressor column.
    pub fn column(&self, regressor: &Regressor) -> Result<Vec<f64>, FeatureError> {
        let values = match regressor {
            Regressor::Intercept => vec![1.0; self.len()],
            Regressor::Trend => self.trend.iter().map(|&t| t as f64).collect(),
            Regressor::LogTrend => self.trend.iter().map(|&t| transforms::log_trend(t)).collect(),
            Regressor::Hour(h) => {
                if *h as usize >= HOURS_PER_DAY {
                    return Err(FeatureError::UnknownColumn(regressor.name()));
                }
                self.calendar
                    .iter()
                    .map(|c| transforms::hour_dummies(c.hour)[*h as usize])
                    .collect()
            }
            Regressor::Feature(key) => self.feature(key)?.to_vec(),
        };
        Ok(values)
    }

    /// The 24 hour indicators of one row.
    pub fn hour_dummies(&self, row: usize) -> [f64; HOURS_PER_DAY] {
        transforms::hour_dummies(self.calendar[row].hour)
    }

    /// Copy of the table restricted to `rows`, in the given order.
    pub fn select(&self, rows: &[usize]) -> FeatureTable {
        FeatureTable {
            timestamps: rows.iter().map(|&i| self.timestamps[i]).collect(),
            calendar: rows.iter().map(|&i| self.calendar[i]).collect(),
            trend: rows.iter().map(|&i| self.trend[i]).collect(),
            columns: self
                .columns
                .iter()
                .map(|c| FeatureColumn {
                    key: c.key.clone(),
                    values: rows.iter().map(|&i| c.values[i]).collect(),
                })
                .collect(),
        }
    }
}

/// Apply `plan` to every price column and keep only complete rows.
///
/// A row is dropped when any level, difference or lag column is missing, or
/// when its log trend is not finite.
pub fn build_features(
    table: &PriceTable,
    plan: &FeaturePlan,
) -> Result<(FeatureTable, FeatureReport), FeatureError> {
    let n = table.len();
    let mut raw: Vec<(FeatureKey, Vec<Option<f64>>)> = Vec::new();

    for column in &table.columns {
        for key in plan.keys_for(&column.key) {
            let base = match key.transform {
                Transform::Level => column.values.clone(),
                Transform::Diff(window) => transforms::difference(&column.values, window),
            };
            let values = if key.lag == 0 {
                base
            } else {
                transforms::lag(&base, key.lag)
            };
            raw.push((key, values));
        }
    }
    debug!(columns = raw.len(), "derived feature columns");

    let keep: Vec<usize> = (0..n)
        .filter(|&row| transforms::log_trend(row).is_finite())
        .filter(|&row| raw.iter().all(|(_, values)| values[row].is_some()))
        .collect();

    if keep.is_empty() {
        return Err(FeatureError::NoCompleteRows);
    }

    let features = FeatureTable {
        timestamps: keep.iter().map(|&i| table.timestamps[i]).collect(),
        calendar: keep.iter().map(|&i| table.calendar[i]).collect(),
        trend: keep.clone(),
        columns: raw
            .into_iter()
            .map(|(key, values)| FeatureColumn {
                key,
                values: keep.iter().filter_map(|&i| values[i]).collect(),
            })
            .collect(),
    };

    let report = FeatureReport {
        rows_in: n,
        rows_out: features.len(),
        columns: features.columns.len(),
    };
    info!(
        rows_in = report.rows_in,
        rows_out = report.rows_out,
        dropped = n - report.rows_out,
        warmup = plan.warmup_rows(),
        columns = report.columns,
        "built feature table"
    );
    Ok((features, report))
}
