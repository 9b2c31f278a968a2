use anyhow::{anyhow, Result};
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::domain::{Country, Direction};
use crate::features::{transforms::HOURS_PER_DAY, FeaturePlan};
use crate::models::TargetSpec;

pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";
pub const ENV_PREFIX: &str = "BALANCING__";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub input: InputConfig,
    pub features: FeaturesConfig,
    pub model: ModelConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    pub path: PathBuf,
    pub timestamp_column: String,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("data/prices.csv"),
            timestamp_column: "Datetime".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeaturesConfig {
    pub differences: Vec<usize>,
    pub max_lag: usize,
}

impl Default for FeaturesConfig {
    fn default() -> Self {
        let plan = FeaturePlan::default();
        Self {
            differences: plan.differences,
            max_lag: plan.max_lag,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelConfig {
    pub country: String,
    pub direction: Direction,
    pub target_difference: usize,
    pub day_ahead_difference: usize,
    pub hour_dummies: Vec<u32>,
    pub test_month: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        let target = TargetSpec::default();
        Self {
            country: target.country.to_string(),
            direction: target.direction,
            target_difference: target.difference,
            day_ahead_difference: target.day_ahead_difference,
            hour_dummies: target.hour_dummies.to_vec(),
            test_month: 12,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JSON run report, skipped when unset
    pub report_path: Option<PathBuf>,
    /// Directory for SVG charts (needs the `plots` feature)
    pub plot_dir: Option<PathBuf>,
    pub log_json: bool,
}

impl Config {
    /// Defaults, then the TOML file at `path` if it exists, then `BALANCING__*`
    /// environment variables.
    pub fn load_from(path: &Path) -> Result<Self> {
        let figment = Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));
        Ok(figment.extract()?)
    }

    pub fn validate(&self) -> Result<(), String> {
        let model = &self.model;

        if !(1..=12).contains(&model.test_month) {
            return Err(format!("test_month must be in 1..=12, got {}", model.test_month));
        }
        if Country::new(&model.country).is_empty() {
            return Err("country must not be empty".to_string());
        }
        if model.hour_dummies.len() != 3 {
            return Err(format!(
                "exactly three hour_dummies are required, got {}",
                model.hour_dummies.len()
            ));
        }
        if let Some(h) = model.hour_dummies.iter().find(|&&h| h as usize >= HOURS_PER_DAY) {
            return Err(format!("hour dummy {h} is not an hour of day"));
        }
        let distinct: HashSet<_> = model.hour_dummies.iter().collect();
        if distinct.len() != model.hour_dummies.len() {
            return Err(format!("hour_dummies must be distinct: {:?}", model.hour_dummies));
        }

        if self.features.differences.iter().any(|&w| w == 0) {
            return Err("difference windows must be at least 1".to_string());
        }
        if self.features.max_lag < 3 {
            return Err(format!(
                "max_lag must be at least 3, got {}",
                self.features.max_lag
            ));
        }
        for (name, window) in [
            ("target_difference", model.target_difference),
            ("day_ahead_difference", model.day_ahead_difference),
        ] {
            if !self.features.differences.contains(&window) {
                return Err(format!(
                    "{name} = {window} is not among features.differences {:?}",
                    self.features.differences
                ));
            }
        }

        Ok(())
    }

    pub fn feature_plan(&self) -> FeaturePlan {
        FeaturePlan {
            differences: self.features.differences.clone(),
            max_lag: self.features.max_lag,
        }
    }

    pub fn target_spec(&self) -> Result<TargetSpec> {
        let hour_dummies = <[u32; 3]>::try_from(self.model.hour_dummies.as_slice())
            .map_err(|_| anyhow!("exactly three hour_dummies are required"))?;
        Ok(TargetSpec {
            country: Country::new(&self.model.country),
            direction: self.model.direction,
            difference: self.model.target_difference,
            day_ahead_difference: self.model.day_ahead_difference,
            hour_dummies,
        })
    }
}
