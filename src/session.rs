//! Dashboard session: the full table plus on-demand recomputed views.

use std::collections::HashSet;

use anyhow::Context;
use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use crate::analyzers::categories::category_counts;
use crate::analyzers::daily::daily_orders;
use crate::analyzers::reviews::review_distribution;
use crate::analyzers::types::{CategoryCounts, DailySeries, ReviewDistribution};
use crate::analyzers::window::{DateWindow, filter_records};
use crate::error::DashboardError;
use crate::records::OrderRecord;

/// Holds the dataset loaded for one session. Never mutated after creation.
#[derive(Debug, Clone)]
pub struct Dashboard {
    records: Vec<OrderRecord>,
}

/// Everything derived for one date window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    pub window: DateWindow,
    pub row_count: usize,
    pub order_count: usize,
    pub revenue: f64,
    pub daily: DailySeries,
    pub categories: CategoryCounts,
    pub reviews: ReviewDistribution,
}

impl Dashboard {
    pub fn new(records: Vec<OrderRecord>) -> Self {
        Dashboard { records }
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    /// Window covering every approval date in the dataset.
    pub fn default_window(&self) -> Result<DateWindow, DashboardError> {
        DateWindow::spanning(&self.records)
    }

    /// Filters the full table to `window` and derives all three tables.
    ///
    /// Nothing is cached: calling twice with the same window recomputes and
    /// returns an identical view.
    #[tracing::instrument(skip(self), fields(start = %window.start(), end = %window.end()))]
    pub fn view(&self, window: DateWindow) -> DashboardView {
        let filtered = filter_records(&self.records, &window);

        let order_count = filtered
            .iter()
            .map(|r| r.order_id.as_str())
            .collect::<HashSet<_>>()
            .len();
        let revenue = filtered.iter().map(|r| r.payment_value).sum();

        let view = DashboardView {
            window,
            row_count: filtered.len(),
            order_count,
            revenue,
            daily: daily_orders(&filtered),
            categories: category_counts(&filtered),
            reviews: review_distribution(&filtered),
        };

        info!(
            rows = view.row_count,
            orders = view.order_count,
            days = view.daily.len(),
            categories = view.categories.len(),
            "View recomputed"
        );

        view
    }

    /// Validates `start`/`end` and derives the view. An inverted range fails
    /// before any filtering happens.
    pub fn view_between(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<DashboardView, DashboardError> {
        Ok(self.view(DateWindow::new(start, end)?))
    }

    /// Builds a window from optional bounds, taking any missing bound from
    /// [`Dashboard::default_window`]. When a defaulted bound makes the window
    /// inverted, the error names which bound came from the dataset.
    pub fn resolve_window(
        &self,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> anyhow::Result<DateWindow> {
        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => return Ok(DateWindow::new(start, end)?),
            bounds => bounds,
        };

        let full = self.default_window()?;
        let window = DateWindow::new(start.unwrap_or(full.start()), end.unwrap_or(full.end()));

        match (start, end) {
            (Some(start), _) => window.with_context(|| {
                format!(
                    "start {start} is after the last approval day {} in the dataset",
                    full.end()
                )
            }),
            (_, Some(end)) => window.with_context(|| {
                format!(
                    "end {end} is before the first approval day {} in the dataset",
                    full.start()
                )
            }),
            _ => Ok(window?),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, m, d).unwrap()
    }

    fn row(
        order: &str,
        m: u32,
        d: u32,
        value: f64,
        category: &str,
        score: Option<u8>,
    ) -> OrderRecord {
        let record = OrderRecord::new(order, "p", value)
            .approved_at(date(m, d).and_hms_opt(12, 0, 0).unwrap())
            .category(category);
        match score {
            Some(s) => record.review_score(s),
            None => record,
        }
    }

    fn sample() -> Dashboard {
        Dashboard::new(vec![
            row("O1", 1, 1, 10.0, "toys", Some(5)),
            row("O1", 1, 1, 15.0, "toys", Some(5)),
            row("O2", 1, 1, 20.0, "garden", Some(3)),
            row("O3", 1, 3, 7.5, "toys", None),
            row("O4", 2, 10, 99.0, "books", Some(1)),
            OrderRecord::new("O5", "p", 4.0).category("books").review_score(2),
        ])
    }

    fn narrow(outer: &DashboardView, inner: &DashboardView) {
        assert!(inner.row_count <= outer.row_count);
        assert!(inner.order_count <= outer.order_count);
        for d in inner.daily.days() {
            let o = outer.daily.get(d.date).unwrap();
            assert!(d.order_count <= o.order_count);
        }
        for c in inner.categories.as_slice() {
            let o = outer
                .categories
                .as_slice()
                .iter()
                .find(|x| x.category == c.category)
                .unwrap();
            assert!(c.item_count <= o.item_count);
        }
        for r in inner.reviews.counts() {
            assert!(r.count <= outer.reviews.count_of(r.score));
        }
    }

    #[test]
    fn test_default_window_spans_dataset() {
        let window = sample().default_window().unwrap();
        assert_eq!(window.start(), date(1, 1));
        assert_eq!(window.end(), date(2, 10));
    }

    #[test]
    fn test_view_totals() {
        let dashboard = sample();
        let view = dashboard.view(dashboard.default_window().unwrap());

        assert_eq!(view.row_count, 5);
        assert_eq!(view.order_count, 4);
        assert_eq!(view.revenue, 151.5);

        let jan1 = view.daily.get(date(1, 1)).unwrap();
        assert_eq!(jan1.order_count, 2);
        assert_eq!(jan1.revenue, 45.0);

        assert_eq!(view.categories.top(1)[0].category, "toys");
        assert_eq!(view.reviews.mode(), Some(5));
    }

    #[test]
    fn test_sums_match_filtered_rows() {
        let dashboard = sample();
        let view = dashboard.view(dashboard.default_window().unwrap());

        let daily_orders: usize = view.daily.days().iter().map(|d| d.order_count).sum();
        assert_eq!(daily_orders, view.order_count);
        assert_eq!(view.categories.total_items(), view.row_count);
        assert_eq!(view.reviews.total(), 4);
    }

    #[test]
    fn test_view_is_idempotent() {
        let dashboard = sample();
        let window = DateWindow::new(date(1, 1), date(1, 31)).unwrap();

        assert_eq!(dashboard.view(window), dashboard.view(window));
    }

    #[test]
    fn test_narrowing_never_increases_counts() {
        let dashboard = sample();
        let wide = dashboard.view(DateWindow::new(date(1, 1), date(12, 31)).unwrap());
        let mid = dashboard.view(DateWindow::new(date(1, 1), date(1, 31)).unwrap());
        let tight = dashboard.view(DateWindow::new(date(1, 3), date(1, 3)).unwrap());

        narrow(&wide, &mid);
        narrow(&mid, &tight);
    }

    #[test]
    fn test_window_change_recomputes_from_full_table() {
        let dashboard = sample();
        let jan = dashboard.view(DateWindow::new(date(1, 1), date(1, 31)).unwrap());
        let feb = dashboard.view(DateWindow::new(date(2, 1), date(2, 28)).unwrap());
        let all = dashboard.view(DateWindow::new(date(1, 1), date(2, 28)).unwrap());

        assert_eq!(jan.row_count, 4);
        assert_eq!(feb.row_count, 1);
        assert_eq!(all.row_count, 5);
    }

    #[test]
    fn test_empty_window_yields_empty_tables() {
        let dashboard = sample();
        let view = dashboard.view_between(date(6, 1), date(6, 30)).unwrap();

        assert_eq!(view.row_count, 0);
        assert!(view.daily.is_empty());
        assert!(view.categories.is_empty());
        assert!(view.reviews.is_empty());
        assert_eq!(view.reviews.mode(), None);
    }

    #[test]
    fn test_inverted_window_fails() {
        let result = sample().view_between(date(3, 1), date(2, 1));
        assert!(matches!(result, Err(DashboardError::InvalidWindow { .. })));
    }

    #[test]
    fn test_dataset_without_timestamps_has_no_default_window() {
        let dashboard = Dashboard::new(vec![OrderRecord::new("x", "p", 1.0)]);
        assert_eq!(
            dashboard.default_window().unwrap_err(),
            DashboardError::EmptyDataset
        );
    }

    #[test]
    fn test_resolve_window_fills_missing_bounds() {
        let dashboard = sample();

        let window = dashboard.resolve_window(Some(date(1, 3)), None).unwrap();
        assert_eq!((window.start(), window.end()), (date(1, 3), date(2, 10)));

        let window = dashboard.resolve_window(None, Some(date(1, 3))).unwrap();
        assert_eq!((window.start(), window.end()), (date(1, 1), date(1, 3)));

        assert_eq!(
            dashboard.resolve_window(None, None).unwrap(),
            dashboard.default_window().unwrap()
        );
    }

    #[test]
    fn test_resolve_window_start_after_dataset_names_default_end() {
        let err = sample().resolve_window(Some(date(5, 1)), None).unwrap_err();

        let message = err.to_string();
        assert!(message.contains("start 2018-05-01"));
        assert!(message.contains("last approval day 2018-02-10"));
        assert!(matches!(
            err.downcast_ref::<DashboardError>(),
            Some(DashboardError::InvalidWindow { .. })
        ));
    }

    #[test]
    fn test_resolve_window_end_before_dataset_names_default_start() {
        let err = sample().resolve_window(None, Some(date(1, 1) - chrono::Days::new(1)));

        let message = err.unwrap_err().to_string();
        assert!(message.contains("first approval day 2018-01-01"));
    }

    #[test]
    fn test_resolve_window_explicit_bounds_skip_dataset() {
        let dashboard = Dashboard::new(vec![]);
        let window = dashboard.resolve_window(Some(date(1, 1)), Some(date(1, 2))).unwrap();
        assert_eq!(window.num_days(), 2);

        let err = dashboard.resolve_window(Some(date(1, 2)), Some(date(1, 1))).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DashboardError>(),
            Some(DashboardError::InvalidWindow { .. })
        ));
    }
}
