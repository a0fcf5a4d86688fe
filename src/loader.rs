//! CSV loader for the joined orders dataset.
//!
//! Reads the flat `all_data.csv` export (orders joined with items, payments,
//! reviews and translated category names) and normalises each row into an
//! [`OrderRecord`]. Files ending in `.gz` are decompressed on the fly.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use flate2::read::GzDecoder;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::DashboardError;
use crate::records::OrderRecord;

const TIMESTAMP_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

/// Header names that must be present. Their cells may still be blank.
pub const REQUIRED_COLUMNS: &[&str] = &[
    "order_id",
    "order_approved_at",
    "payment_value",
    "product_category_name_english",
    "product_id",
    "review_score",
];

/// Columns consumed from the export; any other column is ignored.
#[derive(Debug, Deserialize)]
struct RawRow {
    order_id: String,
    order_approved_at: Option<String>,
    payment_value: Option<f64>,
    product_category_name_english: Option<String>,
    product_id: Option<String>,
    review_score: Option<f64>,
}

/// Loads every row of the dataset at `path`, sorted by approval timestamp.
///
/// Rows without a timestamp are kept and placed last.
#[tracing::instrument(skip(path), fields(path = %path.display()))]
pub fn load_records(path: &Path) -> Result<Vec<OrderRecord>> {
    let file = File::open(path).with_context(|| format!("opening dataset {}", path.display()))?;

    let reader: Box<dyn Read> = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        debug!("Dataset is gzip-compressed");
        Box::new(GzDecoder::new(file))
    } else {
        Box::new(file)
    };

    let records = read_records(reader)?;
    info!(rows = records.len(), "Dataset loaded");
    Ok(records)
}

/// Parses CSV rows from any reader. See [`load_records`].
pub fn read_records<R: Read>(reader: R) -> Result<Vec<OrderRecord>> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers().context("reading CSV header")?;
    let missing: Vec<&'static str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|h| h.trim() == *column))
        .collect();
    if !missing.is_empty() {
        return Err(DashboardError::MissingColumns { columns: missing }.into());
    }

    let mut records = Vec::new();

    for (i, result) in rdr.deserialize().enumerate() {
        let row = i + 1;
        let raw: RawRow = result.with_context(|| format!("reading CSV row {row}"))?;
        records.push(to_record(row, raw)?);
    }

    records.sort_by_key(|r| (r.approved_at.is_none(), r.approved_at));

    let unapproved = records.iter().filter(|r| r.approved_at.is_none()).count();
    if unapproved > 0 {
        debug!(unapproved, "Rows without approval timestamp");
    }

    Ok(records)
}

fn to_record(row: usize, raw: RawRow) -> Result<OrderRecord, DashboardError> {
    let approved_at = match non_blank(raw.order_approved_at) {
        Some(value) => Some(parse_timestamp(&value).ok_or(DashboardError::InvalidTimestamp {
            row,
            column: "order_approved_at",
            value,
        })?),
        None => None,
    };

    let payment_value = raw.payment_value.unwrap_or(0.0);
    if !payment_value.is_finite() || payment_value < 0.0 {
        return Err(DashboardError::InvalidPayment {
            row,
            value: payment_value,
        });
    }

    // pandas writes integer columns holding NaN as floats ("5.0")
    let review_score = match raw.review_score {
        Some(score) if score.fract() == 0.0 && (1.0..=5.0).contains(&score) => Some(score as u8),
        Some(score) => {
            return Err(DashboardError::InvalidReviewScore { row, score });
        }
        None => None,
    };

    Ok(OrderRecord {
        order_id: raw.order_id,
        approved_at,
        payment_value,
        product_category: non_blank(raw.product_category_name_english),
        product_id: non_blank(raw.product_id).unwrap_or_default(),
        review_score,
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parses the timestamp layouts found in the export. A bare date is taken as
/// midnight.
pub fn parse_timestamp(value: &str) -> Option<NaiveDateTime> {
    let value = value.trim();

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
