use serde::Serialize;
use tracing::info;

use super::FeatureTable;
use crate::error::FeatureError;

/// Chronological train/test partition of the feature table
#[derive(Debug, Clone)]
pub struct Partition {
    pub train: FeatureTable,
    pub test: FeatureTable,
    pub test_month: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct PartitionSummary {
    pub train_rows: usize,
    pub test_rows: usize,
    pub test_month: u32,
}

impl Partition {
    pub fn summary(&self) -> PartitionSummary {
        PartitionSummary {
            train_rows: self.train.len(),
            test_rows: self.test.len(),
            test_month: self.test_month,
        }
    }
}

/// Rows whose month equals `test_month` form the test set, all other rows
/// the training set. Row order is preserved on both sides.
pub fn split_by_month(table: &FeatureTable, test_month: u32) -> Result<Partition, FeatureError> {
    let (test_rows, train_rows): (Vec<usize>, Vec<usize>) =
        (0..table.len()).partition(|&row| table.calendar[row].month == test_month);

    if train_rows.is_empty() {
        return Err(FeatureError::EmptyPartition {
            partition: "train",
            test_month,
        });
    }
    if test_rows.is_empty() {
        return Err(FeatureError::EmptyPartition {
            partition: "test",
            test_month,
        });
    }

    let partition = Partition {
        train: table.select(&train_rows),
        test: table.select(&test_rows),
        test_month,
    };
    info!(
        train = partition.train.len(),
        test = partition.test.len(),
        test_month,
        "split feature table"
    );
    Ok(partition)
}
