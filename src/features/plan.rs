use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::SeriesKey;

/// How a raw series is transformed before lagging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transform {
    /// The cleaned price itself
    Level,
    /// `x[t] - x[t - window]`
    Diff(usize),
}

/// One engineered column: a transform of a price series, optionally lagged.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureKey {
    pub series: SeriesKey,
    pub transform: Transform,
    /// 0 is the contemporaneous value
    pub lag: usize,
}

impl FeatureKey {
    pub fn level(series: SeriesKey) -> Self {
        Self {
            series,
            transform: Transform::Level,
            lag: 0,
        }
    }

    pub fn diff(series: SeriesKey, window: usize) -> Self {
        Self {
            series,
            transform: Transform::Diff(window),
            lag: 0,
        }
    }

    pub fn lagged(&self, lag: usize) -> Self {
        Self {
            lag,
            ..self.clone()
        }
    }

    pub fn column_name(&self) -> String {
        let mut name = self.series.column_name();
        if let Transform::Diff(window) = self.transform {
            name.push_str(&format!("_diff{window}"));
        }
        if self.lag > 0 {
            name.push_str(&format!("_lag{}", self.lag));
        }
        name
    }
}

impl fmt::Display for FeatureKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.column_name())
    }
}

/// Declarative description of the engineered columns: every price series
/// gets each difference in `differences`, and each difference gets lags
/// `1..=max_lag`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeaturePlan {
    pub differences: Vec<usize>,
    pub max_lag: usize,
}

impl Default for FeaturePlan {
    fn default() -> Self {
        Self {
            differences: vec![1, 4],
            max_lag: 3,
        }
    }
}

impl FeaturePlan {
    /// All columns the plan derives from `series`, the level first.
    pub fn keys_for(&self, series: &SeriesKey) -> Vec<FeatureKey> {
        let mut keys = vec![FeatureKey::level(series.clone())];
        for &window in &self.differences {
            let diff = FeatureKey::diff(series.clone(), window);
            keys.extend((0..=self.max_lag).map(|lag| diff.lagged(lag)));
        }
        keys
    }

    /// Leading rows that can never be complete under this plan.
    pub fn warmup_rows(&self) -> usize {
        self.differences.iter().copied().max().unwrap_or(0) + self.max_lag
    }
}

/// A column a model specification can ask for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Regressor {
    Intercept,
    /// Row index of the cleaned table
    Trend,
    /// `ln(trend²)`
    LogTrend,
    /// Indicator for hour of day (0-23)
    Hour(u32),
    Feature(FeatureKey),
}

impl Regressor {
    pub fn name(&self) -> String {
        match self {
            Regressor::Intercept => "const".to_string(),
            Regressor::Trend => "trend".to_string(),
            Regressor::LogTrend => "log_trend".to_string(),
            Regressor::Hour(h) => format!("hour_{h}"),
            Regressor::Feature(key) => key.column_name(),
        }
    }
}

impl fmt::Display for Regressor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}
