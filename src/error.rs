use thiserror::Error;

use crate::evaluation::ForecastMetricsError;
use crate::models::ModelSpec;

/// Failures while reading or cleaning the price file
#[derive(Debug, Error)]
pub enum DataError {
    #[error("Failed to read CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing timestamp column '{0}'")]
    MissingTimestampColumn(String),

    #[error("No price columns recognised in header")]
    NoPriceColumns,

    #[error("Line {line}: timestamp '{value}' does not start with YYYY-MM-DD HH:MM")]
    Timestamp { line: u64, value: String },

    #[error("Line {line}: column '{column}' has non-numeric value '{value}'")]
    Value {
        line: u64,
        column: String,
        value: String,
    },

    #[error("Price table is empty after cleaning")]
    Empty,
}

/// Failures while engineering features or splitting partitions
#[derive(Debug, Error)]
pub enum FeatureError {
    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("No complete rows left after dropping missing values")]
    NoCompleteRows,

    #[error("{partition} partition is empty (test month {test_month})")]
    EmptyPartition {
        partition: &'static str,
        test_month: u32,
    },
}

/// Failures while fitting or applying a model
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("Design matrix is singular")]
    Singular,

    #[error("Not enough observations: {observations} rows for {parameters} parameters")]
    InsufficientData {
        observations: usize,
        parameters: usize,
    },

    #[error("Dimension mismatch: {rows} rows in design, {targets} targets")]
    DimensionMismatch { rows: usize, targets: usize },

    #[error("Missing column for model: {0}")]
    MissingColumn(String),
}

/// Failures while scoring a fitted model on the test partition
#[derive(Debug, Error)]
pub enum EvaluationError {
    #[error("Prediction failed for {spec}: {source}")]
    Prediction {
        spec: ModelSpec,
        #[source]
        source: ModelError,
    },

    #[error("Metrics failed for {spec}: {source}")]
    Metrics {
        spec: ModelSpec,
        #[source]
        source: ForecastMetricsError,
    },
}
