//! CSV ingest for the day-ahead / balancing price file.

use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::num::ParseFloatError;
use std::path::Path;

use chrono::NaiveDateTime;
use tracing::{debug, info, warn};

use super::{PriceColumn, PriceTable};
use crate::domain::{CalendarFields, SeriesKey};
use crate::error::DataError;

const TIMESTAMP_PREFIX_LEN: usize = 16;
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";
const MISSING_MARKERS: [&str; 5] = ["nan", "null", "na", "n/a", "none"];

/// Parse the `YYYY-MM-DD HH:MM` prefix of a timestamp, ignoring any trailing
/// seconds or offset.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let prefix = raw.trim_start().get(..TIMESTAMP_PREFIX_LEN)?;
    NaiveDateTime::parse_from_str(prefix, TIMESTAMP_FORMAT).ok()
}

/// Parse a price cell. Empty cells and the usual NaN spellings are missing.
pub fn parse_price(raw: &str) -> Result<Option<f64>, ParseFloatError> {
    let cell = raw.trim();
    if cell.is_empty() || MISSING_MARKERS.iter().any(|m| cell.eq_ignore_ascii_case(m)) {
        return Ok(None);
    }
    cell.parse::<f64>().map(|v| (!v.is_nan()).then_some(v))
}

/// Load the price file at `path`.
pub fn load_csv(path: impl AsRef<Path>, timestamp_column: &str) -> Result<PriceTable, DataError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let table = read_prices(file, timestamp_column)?;
    info!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns.len(),
        "loaded price file"
    );
    Ok(table)
}

/// Read a price table from any CSV source.
///
/// The timestamp column is required. Other headers are classified with
/// [`SeriesKey::from_header`]; unrecognised ones are skipped.
pub fn read_prices<R: Read>(source: R, timestamp_column: &str) -> Result<PriceTable, DataError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let ts_index = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(timestamp_column))
        .ok_or_else(|| DataError::MissingTimestampColumn(timestamp_column.to_string()))?;

    let mut seen = HashSet::new();
    let mut layout: Vec<(usize, SeriesKey)> = Vec::new();
    for (index, header) in headers.iter().enumerate() {
        if index == ts_index {
            continue;
        }
        match SeriesKey::from_header(header) {
            Some(key) if seen.insert(key.clone()) => layout.push((index, key)),
            Some(key) => warn!(header, column = %key, "duplicate price column ignored"),
            None => debug!(header, "skipping unrecognised column"),
        }
    }
    if layout.is_empty() {
        return Err(DataError::NoPriceColumns);
    }

    let mut table = PriceTable {
        columns: layout
            .iter()
            .map(|(_, key)| PriceColumn::new(key.clone(), Vec::new()))
            .collect(),
        ..PriceTable::default()
    };

    for record in reader.records() {
        let record = record?;
        let line = record.position().map(|p| p.line()).unwrap_or_default();

        let raw_ts = record.get(ts_index).unwrap_or_default();
        let timestamp = parse_timestamp(raw_ts).ok_or_else(|| DataError::Timestamp {
            line,
            value: raw_ts.to_string(),
        })?;

        for (slot, (index, key)) in layout.iter().enumerate() {
            let raw = record.get(*index).unwrap_or_default();
            let value = parse_price(raw).map_err(|_| DataError::Value {
                line,
                column: key.column_name(),
                value: raw.to_string(),
            })?;
            table.columns[slot].values.push(value);
        }

        table.calendar.push(CalendarFields::from(&timestamp));
        table.timestamps.push(timestamp);
    }

    Ok(table)
}
