use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;

use crate::analyzers::types::{DailyOrders, DailySeries};
use crate::records::OrderRecord;

#[derive(Default)]
struct DayBucket<'a> {
    orders: HashSet<&'a str>,
    revenue: f64,
}

/// Rolls filtered rows up into one entry per approval day.
///
/// `order_count` counts distinct order ids in the day while `revenue` sums the
/// payment value of every row. Rows without an approval timestamp are skipped.
pub fn daily_orders(records: &[&OrderRecord]) -> DailySeries {
    let mut buckets: BTreeMap<NaiveDate, DayBucket> = BTreeMap::new();

    for record in records {
        let Some(date) = record.approval_date() else {
            continue;
        };

        let bucket = buckets.entry(date).or_default();
        bucket.orders.insert(record.order_id.as_str());
        bucket.revenue += record.payment_value;
    }

    let days = buckets
        .into_iter()
        .map(|(date, bucket)| DailyOrders {
            date,
            order_count: bucket.orders.len(),
            revenue: bucket.revenue,
        })
        .collect();

    DailySeries { days }
}
