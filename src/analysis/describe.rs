use serde::Serialize;
use statrs::statistics::Statistics;
use tabled::{settings::Style, Table, Tabled};

/// Summary statistics of one column, missing values excluded
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnSummary {
    pub name: String,
    pub count: usize,
    pub missing: usize,
    pub mean: f64,
    /// Sample standard deviation
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub median: f64,
    pub q75: f64,
    pub max: f64,
}

/// Summarise a column. Statistics of an empty column are NaN.
pub fn describe(name: &str, values: &[Option<f64>]) -> ColumnSummary {
    let mut present: Vec<f64> = values.iter().flatten().copied().collect();
    present.sort_by(f64::total_cmp);

    let (mean, std) = match present.len() {
        0 => (f64::NAN, f64::NAN),
        1 => (present[0], f64::NAN),
        _ => (present.iter().mean(), present.iter().std_dev()),
    };

    ColumnSummary {
        name: name.to_string(),
        count: present.len(),
        missing: values.len() - present.len(),
        mean,
        std,
        min: present.first().copied().unwrap_or(f64::NAN),
        q25: quantile(&present, 0.25),
        median: quantile(&present, 0.5),
        q75: quantile(&present, 0.75),
        max: present.last().copied().unwrap_or(f64::NAN),
    }
}

/// Linear interpolation between closest ranks of sorted data.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let idx = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = idx.floor() as usize;
    let upper = idx.ceil() as usize;
    let weight = idx - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "column")]
    name: String,
    count: usize,
    missing: usize,
    mean: String,
    std: String,
    min: String,
    #[tabled(rename = "25%")]
    q25: String,
    #[tabled(rename = "50%")]
    median: String,
    #[tabled(rename = "75%")]
    q75: String,
    max: String,
}

pub fn summary_table(summaries: &[ColumnSummary]) -> Table {
    let rows = summaries.iter().map(|s| SummaryRow {
        name: s.name.clone(),
        count: s.count,
        missing: s.missing,
        mean: format!("{:.3}", s.mean),
        std: format!("{:.3}", s.std),
        min: format!("{:.3}", s.min),
        q25: format!("{:.3}", s.q25),
        median: format!("{:.3}", s.median),
        q75: format!("{:.3}", s.q75),
        max: format!("{:.3}", s.max),
    });
    let mut table = Table::new(rows);
    table.with(Style::modern());
    table
}
