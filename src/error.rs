//! Domain errors raised by the loader and the date-window filter.

use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum DashboardError {
    /// The window's start date lies after its end date.
    #[error("invalid date window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    /// No record carries an approval timestamp, so no default window exists.
    #[error("dataset contains no approved orders")]
    EmptyDataset,

    #[error("row {row}: cannot parse timestamp {value:?} in column `{column}`")]
    InvalidTimestamp {
        row: usize,
        column: &'static str,
        value: String,
    },

    /// The dataset header lacks columns the loader consumes.
    #[error("dataset is missing required columns: {}", .columns.join(", "))]
    MissingColumns { columns: Vec<&'static str> },

    #[error("row {row}: review score {score} is not a whole number in 1..=5")]
    InvalidReviewScore { row: usize, score: f64 },

    #[error("row {row}: payment value {value} is not a finite non-negative amount")]
    InvalidPayment { row: usize, value: f64 },
}
