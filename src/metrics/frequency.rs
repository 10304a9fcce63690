//! Top activities by frequency
//!
//! Counts the raw, unnormalized activity labels: "Class" and "class " are
//! different activities here, unlike in the duration ranking.

use super::{top_k_by, OrderedTally};
use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;
use crate::store::RecordStore;
use crate::types::{CountResult, LabelCount};
use tracing::debug;

/// The `top_k` most frequent literal activity labels, descending by count
pub fn activity_frequency(
    store: &RecordStore,
    config: &AnalyticsConfig,
) -> Result<CountResult, AnalyticsError> {
    let mut tally: OrderedTally<usize> = OrderedTally::new();
    for record in store.records() {
        *tally.entry(record.activity()?) += 1;
    }

    let entries = rank_counts(tally, config.top_k);
    if entries.is_empty() {
        return Err(AnalyticsError::InsufficientData(
            "no activities in the log".into(),
        ));
    }

    debug!(labels = entries.len(), rows = store.len(), "computed activity frequency");
    Ok(CountResult {
        entries,
        total_rows: store.len(),
    })
}

/// Rank tallied counts and keep the top `k`
pub(crate) fn rank_counts(tally: OrderedTally<usize>, k: usize) -> Vec<LabelCount> {
    top_k_by(tally.into_entries(), k, |(_, count)| *count as f64)
        .into_iter()
        .map(|(label, count)| LabelCount { label, count })
        .collect()
}
