use serde::Serialize;
use tabled::{builder::Builder, settings::Style, Table};

use crate::evaluation::pearson;

/// Pairwise Pearson correlations of named columns
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    pub names: Vec<String>,
    /// Row-major, `names.len()` squared entries
    pub values: Vec<f64>,
}

impl CorrelationMatrix {
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.values[i * self.names.len() + j]
    }

    pub fn to_table(&self) -> Table {
        let mut builder = Builder::default();
        let mut header = vec![String::new()];
        header.extend(self.names.iter().cloned());
        builder.push_record(header);

        for (i, name) in self.names.iter().enumerate() {
            let mut record = vec![name.clone()];
            record.extend((0..self.names.len()).map(|j| format!("{:.3}", self.get(i, j))));
            builder.push_record(record);
        }

        let mut table = builder.build();
        table.with(Style::modern());
        table
    }
}

/// Correlate every pair of columns over the rows where both are present.
pub fn correlation_matrix(columns: &[(String, Vec<Option<f64>>)]) -> CorrelationMatrix {
    let k = columns.len();
    let mut values = vec![f64::NAN; k * k];

    for i in 0..k {
        for j in i..k {
            let (x, y): (Vec<f64>, Vec<f64>) = columns[i]
                .1
                .iter()
                .zip(&columns[j].1)
                .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
                .unzip();
            let r = pearson(&x, &y);
            let r = if i == j && r.is_finite() { 1.0 } else { r };
            values[i * k + j] = r;
            values[j * k + i] = r;
        }
    }

    CorrelationMatrix {
        names: columns.iter().map(|(name, _)| name.clone()).collect(),
        values,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn column(name: &str, values: &[Option<f64>]) -> (String, Vec<Option<f64>>) {
        (name.to_string(), values.to_vec())
    }

    #[test]
    fn test_pairwise_complete_rows() {
        let columns = vec![
            column("a", &[Some(1.0), Some(2.0), Some(3.0), None]),
            column("b", &[Some(2.0), Some(4.0), Some(6.0), Some(100.0)]),
            column("c", &[Some(3.0), Some(2.0), Some(1.0), Some(0.0)]),
        ];
        let m = correlation_matrix(&columns);
        assert_eq!(m.names, vec!["a", "b", "c"]);
        assert_eq!(m.get(0, 0), 1.0);
        assert!((m.get(0, 1) - 1.0).abs() < 1e-12);
        assert!((m.get(0, 2) + 1.0).abs() < 1e-12);
        assert_eq!(m.get(1, 2), m.get(2, 1));
    }

    #[test]
    fn test_constant_column_is_nan() {
        let columns = vec![
            column("a", &[Some(1.0), Some(2.0), Some(3.0)]),
            column("flat", &[Some(5.0), Some(5.0), Some(5.0)]),
        ];
        let m = correlation_matrix(&columns);
        assert!(m.get(0, 1).is_nan());
        assert!(m.get(1, 1).is_nan());
        assert!(m.to_table().to_string().contains("NaN"));
    }
}
