use chrono::NaiveDate;
use serde::Serialize;

use crate::error::DashboardError;
use crate::records::OrderRecord;

/// Inclusive range of calendar days used to select records by approval date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// Builds a window, rejecting one whose start lies after its end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, DashboardError> {
        if start > end {
            return Err(DashboardError::InvalidWindow { start, end });
        }
        Ok(DateWindow { start, end })
    }

    /// The default window: first through last approval date found in `records`.
    pub fn spanning(records: &[OrderRecord]) -> Result<Self, DashboardError> {
        let mut dates = records.iter().filter_map(OrderRecord::approval_date);
        let first = dates.next().ok_or(DashboardError::EmptyDataset)?;

        let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Ok(DateWindow { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, both ends included.
    pub fn num_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// Selects the rows of `records` approved within `window`.
///
/// The whole end day is included. Rows without an approval timestamp never
/// match. Always applied to the full table, never to a previous selection.
pub fn filter_records<'a>(
    records: &'a [OrderRecord],
    window: &DateWindow,
) -> Vec<&'a OrderRecord> {
    records
        .iter()
        .filter(|r| r.approval_date().is_some_and(|d| window.contains(d)))
        .collect()
}
