use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

use crate::domain::{Country, Direction, SeriesKey};
use crate::features::{FeatureKey, Regressor};

/// The series being explained and the knobs of the specifications.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    pub country: Country,
    pub direction: Direction,
    /// Difference window of the modelled balancing price
    pub difference: usize,
    /// Difference window of the day-ahead regressor
    pub day_ahead_difference: usize,
    /// Hour dummies added by [`ModelSpec::OlsLags3Hours`]
    pub hour_dummies: [u32; 3],
}

impl Default for TargetSpec {
    fn default() -> Self {
        Self {
            country: Country::new("germany"),
            direction: Direction::Long,
            difference: 1,
            day_ahead_difference: 4,
            hour_dummies: [7, 8, 9],
        }
    }
}

impl TargetSpec {
    /// Contemporaneous differenced balancing price
    pub fn dependent(&self) -> FeatureKey {
        FeatureKey::diff(
            SeriesKey::balancing(self.direction, self.country.clone()),
            self.difference,
        )
    }

    /// Contemporaneous differenced day-ahead price
    pub fn day_ahead(&self) -> FeatureKey {
        FeatureKey::diff(
            SeriesKey::day_ahead(self.country.clone()),
            self.day_ahead_difference,
        )
    }

    fn own_lags(&self, max: usize) -> impl Iterator<Item = Regressor> + '_ {
        (1..=max).map(move |lag| Regressor::Feature(self.dependent().lagged(lag)))
    }
}

/// Specifications fitted on the training partition, in increasing
/// complexity.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ModelSpec {
    /// AutoReg(1) on the differenced series
    Ar1,
    /// const + lag 1
    OlsLag1,
    /// const + lag 1 + trend + log trend
    OlsLag1Trend,
    /// const + lags 1-3
    OlsLags3,
    /// const + lags 1-3 + day-ahead difference
    OlsLags3DayAhead,
    /// const + day-ahead difference
    OlsDayAhead,
    /// const + lags 1-3 + three hour dummies
    OlsLags3Hours,
}

impl ModelSpec {
    pub fn all() -> Vec<ModelSpec> {
        ModelSpec::iter().collect()
    }

    /// Short column header for comparison tables
    pub fn label(&self) -> &'static str {
        match self {
            ModelSpec::Ar1 => "AR(1)",
            ModelSpec::OlsLag1 => "OLS lag1",
            ModelSpec::OlsLag1Trend => "OLS lag1+trend",
            ModelSpec::OlsLags3 => "OLS lags3",
            ModelSpec::OlsLags3DayAhead => "OLS lags3+DA",
            ModelSpec::OlsDayAhead => "OLS DA",
            ModelSpec::OlsLags3Hours => "OLS lags3+hours",
        }
    }

    /// Highest own lag the specification reads from the feature table.
    pub fn max_lag(&self) -> usize {
        match self {
            ModelSpec::OlsDayAhead => 0,
            ModelSpec::Ar1 | ModelSpec::OlsLag1 | ModelSpec::OlsLag1Trend => 1,
            ModelSpec::OlsLags3 | ModelSpec::OlsLags3DayAhead | ModelSpec::OlsLags3Hours => 3,
        }
    }

    /// Regressors of the OLS specifications; `None` for the autoregression,
    /// which builds its own lags.
    pub fn regressors(&self, target: &TargetSpec) -> Option<Vec<Regressor>> {
        let mut regressors = vec![Regressor::Intercept];
        match self {
            ModelSpec::Ar1 => return None,
            ModelSpec::OlsLag1 => regressors.extend(target.own_lags(1)),
            ModelSpec::OlsLag1Trend => {
                regressors.extend(target.own_lags(1));
                regressors.extend([Regressor::Trend, Regressor::LogTrend]);
            }
            ModelSpec::OlsLags3 => regressors.extend(target.own_lags(3)),
            ModelSpec::OlsLags3DayAhead => {
                regressors.extend(target.own_lags(3));
                regressors.push(Regressor::Feature(target.day_ahead()));
            }
            ModelSpec::OlsDayAhead => regressors.push(Regressor::Feature(target.day_ahead())),
            ModelSpec::OlsLags3Hours => {
                regressors.extend(target.own_lags(3));
                regressors.extend(target.hour_dummies.iter().map(|&h| Regressor::Hour(h)));
            }
        }
        Some(regressors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(spec: ModelSpec) -> Vec<String> {
        spec.regressors(&TargetSpec::default())
            .unwrap()
            .iter()
            .map(Regressor::name)
            .collect()
    }

    #[test]
    fn test_all_specs_in_order() {
        let all = ModelSpec::all();
        assert_eq!(all.len(), 7);
        assert_eq!(all[0], ModelSpec::Ar1);
        assert_eq!(all[6], ModelSpec::OlsLags3Hours);
        assert_eq!(ModelSpec::Ar1.label(), "AR(1)");
    }

    #[test]
    fn test_regressor_sets() {
        assert!(ModelSpec::Ar1.regressors(&TargetSpec::default()).is_none());
        assert_eq!(names(ModelSpec::OlsLag1), vec!["const", "long_germany_diff1_lag1"]);
        assert_eq!(
            names(ModelSpec::OlsLag1Trend),
            vec!["const", "long_germany_diff1_lag1", "trend", "log_trend"]
        );
        assert_eq!(
            names(ModelSpec::OlsLags3DayAhead),
            vec![
                "const",
                "long_germany_diff1_lag1",
                "long_germany_diff1_lag2",
                "long_germany_diff1_lag3",
                "germany_day_ahead_diff4",
            ]
        );
        assert_eq!(names(ModelSpec::OlsDayAhead), vec!["const", "germany_day_ahead_diff4"]);
        assert_eq!(
            names(ModelSpec::OlsLags3Hours)[4..],
            ["hour_7", "hour_8", "hour_9"]
        );
    }

    #[test]
    fn test_dependent_for_short_direction() {
        let target = TargetSpec {
            direction: Direction::Short,
            country: Country::new("Austria"),
            ..TargetSpec::default()
        };
        assert_eq!(target.dependent().column_name(), "short_austria_diff1");
        assert_eq!(target.day_ahead().column_name(), "austria_day_ahead_diff4");
    }
}
