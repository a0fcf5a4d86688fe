use std::collections::HashMap;

use tracing::debug;

use crate::analyzers::types::{CategoryCount, CategoryCounts};
use crate::records::OrderRecord;

/// Counts line items per product category, most sold first.
///
/// Every row counts once, so an order with three items adds three. Rows
/// without a category are dropped.
pub fn category_counts(records: &[&OrderRecord]) -> CategoryCounts {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut uncategorized = 0usize;

    for record in records {
        match record.product_category.as_deref() {
            Some(category) => *counts.entry(category).or_default() += 1,
            None => uncategorized += 1,
        }
    }

    if uncategorized > 0 {
        debug!(uncategorized, "Rows without product category skipped");
    }

    let mut descending: Vec<CategoryCount> = counts
        .into_iter()
        .map(|(category, item_count)| CategoryCount {
            category: category.to_string(),
            item_count,
        })
        .collect();

    descending.sort_by(|a, b| {
        b.item_count
            .cmp(&a.item_count)
            .then_with(|| a.category.cmp(&b.category))
    });

    CategoryCounts { descending }
}
