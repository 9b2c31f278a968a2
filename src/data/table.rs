use chrono::NaiveDateTime;

use crate::domain::{CalendarFields, Country, SeriesKey};

/// One price column of the observation table. `None` marks a missing value.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceColumn {
    pub key: SeriesKey,
    pub values: Vec<Option<f64>>,
}

impl PriceColumn {
    pub fn new(key: SeriesKey, values: Vec<Option<f64>>) -> Self {
        Self { key, values }
    }

    pub fn missing_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_none()).count()
    }
}

/// Observation table: one row per timestamp, one column per price series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceTable {
    pub timestamps: Vec<NaiveDateTime>,
    pub calendar: Vec<CalendarFields>,
    pub columns: Vec<PriceColumn>,
}

impl PriceTable {
    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn column(&self, key: &SeriesKey) -> Option<&PriceColumn> {
        self.columns.iter().find(|c| &c.key == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &SeriesKey> {
        self.columns.iter().map(|c| &c.key)
    }

    /// Countries with at least one column, sorted and deduplicated.
    pub fn countries(&self) -> Vec<Country> {
        let mut countries: Vec<Country> = self.keys().map(|k| k.country.clone()).collect();
        countries.sort();
        countries.dedup();
        countries
    }

    /// Reorder rows by `order` (a permutation of `0..len`).
    pub(crate) fn reorder(&mut self, order: &[usize]) {
        self.timestamps = order.iter().map(|&i| self.timestamps[i]).collect();
        self.calendar = order.iter().map(|&i| self.calendar[i]).collect();
        for column in &mut self.columns {
            column.values = order.iter().map(|&i| column.values[i]).collect();
        }
    }

    /// Remove the first `n` rows.
    pub(crate) fn drop_leading(&mut self, n: usize) {
        let n = n.min(self.len());
        self.timestamps.drain(..n);
        self.calendar.drain(..n);
        for column in &mut self.columns {
            column.values.drain(..n);
        }
    }
}
