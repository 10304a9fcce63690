//! Share of time at the top locations
//!
//! Counts raw location labels and expresses each of the top entries as a
//! share of the shown locations' total, not of the whole log.

use super::frequency::rank_counts;
use super::OrderedTally;
use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;
use crate::store::RecordStore;
use crate::types::{LocationShareEntry, LocationShareResult};
use tracing::debug;

/// The `top_k` most frequent locations with their share among themselves
pub fn location_share(
    store: &RecordStore,
    config: &AnalyticsConfig,
) -> Result<LocationShareResult, AnalyticsError> {
    let mut tally: OrderedTally<usize> = OrderedTally::new();
    for record in store.records() {
        *tally.entry(record.location()?) += 1;
    }

    let ranked = rank_counts(tally, config.top_k);
    let shown_total: usize = ranked.iter().map(|e| e.count).sum();
    if shown_total == 0 {
        return Err(AnalyticsError::InsufficientData(
            "no locations in the log".into(),
        ));
    }

    let entries: Vec<LocationShareEntry> = ranked
        .into_iter()
        .map(|e| LocationShareEntry {
            share: e.count as f64 / shown_total as f64,
            label: e.label,
            count: e.count,
        })
        .collect();

    debug!(locations = entries.len(), shown_total, "computed location share");
    Ok(LocationShareResult {
        entries,
        total_rows: store.len(),
    })
}
