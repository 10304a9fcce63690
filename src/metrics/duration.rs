//! Top activities by total duration
//!
//! Labels are case-folded and trimmed before grouping. The normalized labels
//! live only inside this pipeline; the store keeps the raw text.

use super::{exclude_negative, top_k_by, OrderedTally};
use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;
use crate::normalizer::normalize_label;
use crate::store::RecordStore;
use crate::types::{DurationResult, LabelHours};
use tracing::debug;

#[derive(Default)]
struct Accumulated {
    hours: f64,
    records: usize,
}

/// The `top_k` normalized activities with the largest summed duration
pub fn activity_duration(
    store: &RecordStore,
    config: &AnalyticsConfig,
) -> Result<DurationResult, AnalyticsError> {
    let mut tally: OrderedTally<Accumulated> = OrderedTally::new();
    let mut excluded = Vec::new();

    for record in store.records() {
        let label = normalize_label(record.activity()?);
        let Some(hours) = exclude_negative(record.row, record.duration_hours(), &mut excluded)?
        else {
            continue;
        };
        let slot = tally.entry(&label);
        slot.hours += hours;
        slot.records += 1;
    }

    let entries: Vec<LabelHours> = top_k_by(tally.into_entries(), config.top_k, |(_, acc)| {
        acc.hours
    })
    .into_iter()
    .map(|(label, acc)| LabelHours {
        label,
        hours: acc.hours,
        records: acc.records,
    })
    .collect();

    if entries.is_empty() {
        return Err(AnalyticsError::InsufficientData(
            "no activities with a usable duration".into(),
        ));
    }

    debug!(
        labels = entries.len(),
        excluded = excluded.len(),
        "computed activity duration"
    );
    Ok(DurationResult { entries, excluded })
}
