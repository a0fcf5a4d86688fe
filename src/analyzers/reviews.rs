use std::collections::BTreeMap;

use crate::analyzers::types::{ReviewCount, ReviewDistribution};
use crate::records::OrderRecord;

/// Frequency of each review score among the filtered rows.
///
/// Counts are ordered most frequent first, equal counts by ascending score.
/// The mode is therefore the first entry: on a tie the lowest score wins.
pub fn review_distribution(records: &[&OrderRecord]) -> ReviewDistribution {
    let mut by_score: BTreeMap<u8, usize> = BTreeMap::new();

    for score in records.iter().filter_map(|r| r.review_score) {
        *by_score.entry(score).or_default() += 1;
    }

    let mut counts: Vec<ReviewCount> = by_score
        .into_iter()
        .map(|(score, count)| ReviewCount { score, count })
        .collect();

    // stable: BTreeMap already yields ascending scores
    counts.sort_by(|a, b| b.count.cmp(&a.count));

    let mode = counts.first().map(|c| c.score);

    ReviewDistribution { counts, mode }
}
