use serde::Serialize;
use std::fmt;
use tabled::{settings::Style, Table, Tabled};

/// One estimated parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParamEstimate {
    pub name: String,
    pub coef: f64,
    pub std_err: f64,
    /// t statistic (z for asymptotic inference)
    pub statistic: f64,
    pub p_value: f64,
}

/// Estimation output of a fitted specification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegressionSummary {
    pub model: String,
    pub dependent: String,
    pub params: Vec<ParamEstimate>,
    pub nobs: usize,
    pub df_model: usize,
    pub df_resid: usize,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub f_statistic: Option<f64>,
    pub f_pvalue: Option<f64>,
    pub sigma2: f64,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    pub hqic: f64,
    pub durbin_watson: f64,
}

impl RegressionSummary {
    pub fn param(&self, name: &str) -> Option<&ParamEstimate> {
        self.params.iter().find(|p| p.name == name)
    }

    pub fn coefficients(&self) -> Vec<f64> {
        self.params.iter().map(|p| p.coef).collect()
    }
}

#[derive(Tabled)]
struct ParamRow {
    #[tabled(rename = "")]
    name: String,
    coef: String,
    #[tabled(rename = "std err")]
    std_err: String,
    #[tabled(rename = "t")]
    statistic: String,
    #[tabled(rename = "P>|t|")]
    p_value: String,
}

impl fmt::Display for RegressionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Results", self.model)?;
        writeln!(f, "{}", "=".repeat(60))?;
        writeln!(
            f,
            "Dep. Variable: {:<24} R-squared:      {:>10.4}",
            self.dependent, self.r_squared
        )?;
        writeln!(
            f,
            "No. Observations: {:<21} Adj. R-squared: {:>10.4}",
            self.nobs, self.adj_r_squared
        )?;
        writeln!(
            f,
            "Df Residuals: {:<25} F-statistic:    {:>10}",
            self.df_resid,
            fmt_optional(self.f_statistic)
        )?;
        writeln!(
            f,
            "Df Model: {:<29} Prob (F-stat):  {:>10}",
            self.df_model,
            fmt_optional(self.f_pvalue)
        )?;
        writeln!(
            f,
            "Log-Likelihood: {:<23.3} AIC:            {:>10.2}",
            self.log_likelihood, self.aic
        )?;
        writeln!(
            f,
            "Durbin-Watson: {:<24.3} BIC:            {:>10.2}",
            self.durbin_watson, self.bic
        )?;
        writeln!(
            f,
            "Sigma²: {:<31.4} HQIC:           {:>10.2}",
            self.sigma2, self.hqic
        )?;

        let rows = self.params.iter().map(|p| ParamRow {
            name: p.name.clone(),
            coef: format!("{:.4}", p.coef),
            std_err: format!("{:.4}", p.std_err),
            statistic: format!("{:.3}", p.statistic),
            p_value: format!("{:.3}", p.p_value),
        });
        let mut table = Table::new(rows);
        table.with(Style::modern());
        writeln!(f, "{table}")
    }
}

fn fmt_optional(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.4}"))
}
