//! Chronological ordering and gap filling of the raw observation table.

use chrono::Duration;
use serde::Serialize;
use tracing::{info, warn};

use super::{PriceColumn, PriceTable};
use crate::error::DataError;

/// Expected spacing of balancing observations
pub const INTERVAL_MINUTES: i64 = 15;

/// Rows removed from the head of the sorted table. Balancing prices are not
/// yet available in the first interval of the file.
const LEADING_ROWS_DROPPED: usize = 1;

/// What the cleaner did to the table
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub rows_in: usize,
    pub rows_out: usize,
    pub values_filled: usize,
    /// Leading gaps left after filling; their rows fall out of the feature table
    pub values_missing: usize,
    pub duplicate_timestamps: usize,
    pub irregular_gaps: usize,
}

/// Carry the last observed value forward over missing entries.
///
/// Leading missing values (no earlier observation) are left untouched.
/// Returns the number of values filled.
pub fn forward_fill(values: &mut [Option<f64>]) -> usize {
    let mut last = None;
    let mut filled = 0;
    for value in values.iter_mut() {
        match value {
            Some(v) => last = Some(*v),
            None => {
                if last.is_some() {
                    *value = last;
                    filled += 1;
                }
            }
        }
    }
    filled
}

/// Sort rows by timestamp, forward-fill every price column, and drop the
/// first row.
///
/// Leading gaps with no earlier observation stay missing. Fails only if
/// nothing is left.
pub fn clean(mut table: PriceTable) -> Result<(PriceTable, CleanReport), DataError> {
    let mut report = CleanReport {
        rows_in: table.len(),
        ..CleanReport::default()
    };

    let mut order: Vec<usize> = (0..table.len()).collect();
    order.sort_by_key(|&i| table.timestamps[i]);
    table.reorder(&order);

    let step = Duration::minutes(INTERVAL_MINUTES);
    for pair in table.timestamps.windows(2) {
        let delta = pair[1] - pair[0];
        if delta == Duration::zero() {
            report.duplicate_timestamps += 1;
        } else if delta != step {
            report.irregular_gaps += 1;
        }
    }
    if report.duplicate_timestamps > 0 || report.irregular_gaps > 0 {
        warn!(
            duplicates = report.duplicate_timestamps,
            gaps = report.irregular_gaps,
            "observation grid is not a regular 15-minute series"
        );
    }

    for column in &mut table.columns {
        report.values_filled += forward_fill(&mut column.values);
    }

    table.drop_leading(LEADING_ROWS_DROPPED);
    if table.is_empty() {
        return Err(DataError::Empty);
    }

    report.values_missing = table.columns.iter().map(PriceColumn::missing_count).sum();
    if report.values_missing > 0 {
        warn!(
            missing = report.values_missing,
            "values without an earlier observation are left missing"
        );
    }

    report.rows_out = table.len();
    info!(
        rows_in = report.rows_in,
        rows_out = report.rows_out,
        filled = report.values_filled,
        "cleaned price table"
    );
    Ok((table, report))
}
