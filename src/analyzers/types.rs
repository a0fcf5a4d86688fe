//! Derived tables produced by the aggregation pipeline.

use chrono::NaiveDate;
use serde::Serialize;

use crate::analyzers::window::DateWindow;

/// Orders and revenue for a single calendar day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyOrders {
    pub date: NaiveDate,
    pub order_count: usize,
    pub revenue: f64,
}

/// Daily rollup ordered ascending by date.
///
/// Sparse as built: days without approved orders are absent. Use
/// [`DailySeries::fill_gaps`] or [`DailySeries::fill_window`] for a continuous
/// axis.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DailySeries {
    pub(crate) days: Vec<DailyOrders>,
}

impl DailySeries {
    pub fn days(&self) -> &[DailyOrders] {
        &self.days
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyOrders> {
        self.days
            .binary_search_by_key(&date, |d| d.date)
            .ok()
            .map(|i| &self.days[i])
    }

    pub fn total_revenue(&self) -> f64 {
        self.days.iter().map(|d| d.revenue).sum()
    }

    /// Inserts zero-activity days between the first and last day present.
    pub fn fill_gaps(&self) -> DailySeries {
        match (self.days.first(), self.days.last()) {
            (Some(first), Some(last)) => self.fill_between(first.date, last.date),
            _ => DailySeries::default(),
        }
    }

    /// Inserts zero-activity days so that every day of `window` is present.
    pub fn fill_window(&self, window: &DateWindow) -> DailySeries {
        self.fill_between(window.start(), window.end())
    }

    fn fill_between(&self, start: NaiveDate, end: NaiveDate) -> DailySeries {
        let days = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|date| {
                self.get(date).cloned().unwrap_or(DailyOrders {
                    date,
                    order_count: 0,
                    revenue: 0.0,
                })
            })
            .collect();

        DailySeries { days }
    }
}

/// Number of line items sold in one product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub item_count: usize,
}

/// Per-category item counts, most sold first.
///
/// Equal counts are ordered by category label so both views are deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CategoryCounts {
    pub(crate) descending: Vec<CategoryCount>,
}

impl CategoryCounts {
    pub fn as_slice(&self) -> &[CategoryCount] {
        &self.descending
    }

    pub fn is_empty(&self) -> bool {
        self.descending.is_empty()
    }

    pub fn len(&self) -> usize {
        self.descending.len()
    }

    /// The `n` best-selling categories.
    pub fn top(&self, n: usize) -> &[CategoryCount] {
        &self.descending[..n.min(self.descending.len())]
    }

    /// The `n` least-sold categories, least sold first.
    pub fn bottom(&self, n: usize) -> Vec<&CategoryCount> {
        let mut ascending: Vec<&CategoryCount> = self.descending.iter().collect();
        ascending.sort_by(|a, b| {
            a.item_count
                .cmp(&b.item_count)
                .then_with(|| a.category.cmp(&b.category))
        });
        ascending.truncate(n);
        ascending
    }

    pub fn total_items(&self) -> usize {
        self.descending.iter().map(|c| c.item_count).sum()
    }
}

/// Occurrences of a single review score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ReviewCount {
    pub score: u8,
    pub count: usize,
}

/// Review-score frequencies, most frequent first, plus the most common score.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReviewDistribution {
    pub(crate) counts: Vec<ReviewCount>,
    pub(crate) mode: Option<u8>,
}

impl ReviewDistribution {
    pub fn counts(&self) -> &[ReviewCount] {
        &self.counts
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Most frequent score; the lowest score wins a tie. `None` when no
    /// filtered row carries a score.
    pub fn mode(&self) -> Option<u8> {
        self.mode
    }

    pub fn count_of(&self, score: u8) -> usize {
        self.counts
            .iter()
            .find(|c| c.score == score)
            .map_or(0, |c| c.count)
    }

    pub fn total(&self) -> usize {
        self.counts.iter().map(|c| c.count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2018, 1, d).unwrap()
    }

    fn day(d: u32, order_count: usize, revenue: f64) -> DailyOrders {
        DailyOrders {
            date: date(d),
            order_count,
            revenue,
        }
    }

    fn categories(pairs: &[(&str, usize)]) -> CategoryCounts {
        CategoryCounts {
            descending: pairs
                .iter()
                .map(|(c, n)| CategoryCount {
                    category: c.to_string(),
                    item_count: *n,
                })
                .collect(),
        }
    }

    #[test]
    fn test_fill_gaps_inserts_zero_days() {
        let series = DailySeries {
            days: vec![day(1, 2, 30.0), day(4, 1, 5.0)],
        };

        let filled = series.fill_gaps();
        assert_eq!(filled.len(), 4);
        assert_eq!(filled.get(date(2)), Some(&day(2, 0, 0.0)));
        assert_eq!(filled.get(date(4)), Some(&day(4, 1, 5.0)));
        assert_eq!(filled.total_revenue(), 35.0);
    }

    #[test]
    fn test_fill_gaps_on_empty_series() {
        assert!(DailySeries::default().fill_gaps().is_empty());
    }

    #[test]
    fn test_fill_window_pads_both_ends() {
        let series = DailySeries {
            days: vec![day(3, 1, 1.0)],
        };
        let window = DateWindow::new(date(1), date(5)).unwrap();

        let filled = series.fill_window(&window);
        let dates: Vec<_> = filled.days().iter().map(|d| d.date).collect();
        assert_eq!(dates, vec![date(1), date(2), date(3), date(4), date(5)]);
    }

    #[test]
    fn test_top_and_bottom_clamp_to_len() {
        let counts = categories(&[("a", 3), ("b", 1)]);
        assert_eq!(counts.top(10).len(), 2);
        assert_eq!(counts.bottom(10).len(), 2);
        assert!(counts.top(0).is_empty());
    }

    #[test]
    fn test_bottom_breaks_ties_by_label() {
        let counts = categories(&[("z", 4), ("c", 1), ("d", 1)]);

        let bottom: Vec<_> = counts.bottom(2).into_iter().map(|c| c.category.as_str()).collect();
        assert_eq!(bottom, vec!["c", "d"]);
    }

    #[test]
    fn test_count_of_missing_score_is_zero() {
        let dist = ReviewDistribution {
            counts: vec![ReviewCount { score: 4, count: 7 }],
            mode: Some(4),
        };
        assert_eq!(dist.count_of(4), 7);
        assert_eq!(dist.count_of(1), 0);
    }
}
