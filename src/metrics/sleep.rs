//! Hours of sleep per night
//!
//! Sleep records are picked by an exact, case-sensitive match on the raw
//! activity label, summed per calendar date, and the most recent dates kept.

use super::exclude_negative;
use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;
use crate::store::RecordStore;
use crate::types::{SleepDay, SleepDurationResult};
use std::collections::BTreeMap;
use tracing::debug;

/// Per-day total sleep for the most recent `sleep_window_days` dates, oldest first
pub fn sleep_duration(
    store: &RecordStore,
    config: &AnalyticsConfig,
) -> Result<SleepDurationResult, AnalyticsError> {
    let mut per_day = BTreeMap::new();
    let mut excluded = Vec::new();
    let mut matched = 0usize;

    for record in store.records() {
        if record.activity()? != config.sleep_label {
            continue;
        }
        matched += 1;

        let date = record.calendar_date()?;
        let Some(hours) = exclude_negative(record.row, record.duration_hours(), &mut excluded)?
        else {
            continue;
        };
        *per_day.entry(date).or_insert(0.0) += hours;
    }

    if per_day.is_empty() {
        return Err(AnalyticsError::InsufficientData(if matched == 0 {
            format!("no '{}' records in the log", config.sleep_label)
        } else {
            format!(
                "all {matched} '{}' records were excluded for ending before they start",
                config.sleep_label
            )
        }));
    }

    let skip = per_day.len().saturating_sub(config.sleep_window_days);
    let days: Vec<SleepDay> = per_day
        .into_iter()
        .skip(skip)
        .map(|(date, hours)| SleepDay { date, hours })
        .collect();

    debug!(
        matched,
        days = days.len(),
        excluded = excluded.len(),
        "computed sleep duration"
    );

    Ok(SleepDurationResult { days, excluded })
}
