//! Error types for daylog insights

use thiserror::Error;

/// Errors that can occur while loading the log or computing a metric
#[derive(Debug, Error)]
pub enum AnalyticsError {
    /// A required column is absent from the header (`row` is `None`) or a
    /// needed cell is empty in a data row.
    #[error("Missing required field '{column}'{}", fmt_row(.row))]
    MissingColumn { column: String, row: Option<usize> },

    #[error("Malformed timestamp in '{column}' at row {row}: {value:?}")]
    MalformedTimestamp {
        column: String,
        row: usize,
        value: String,
    },

    #[error("End time {end} is before start time {start} at row {row}")]
    NegativeDuration {
        row: usize,
        start: String,
        end: String,
    },

    #[error("Invalid level in '{column}' at row {row}: {value:?} (expected an integer 1-10)")]
    InvalidLevel {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Not enough data: {0}")]
    InsufficientData(String),

    #[error("Unknown selection: {0}")]
    UnknownSelection(String),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

fn fmt_row(row: &Option<usize>) -> String {
    match row {
        Some(row) => format!(" at row {row}"),
        None => " in header".to_string(),
    }
}

impl AnalyticsError {
    /// Whether this error is the "not enough data" condition rather than a
    /// fatal problem with the input.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, AnalyticsError::InsufficientData(_))
    }
}
