//! Metric pipelines
//!
//! Seven independent, pure transformations of the record store into a small
//! result table each. Pipelines borrow the store and never mutate it; any
//! normalized view of a column is local to the pipeline that builds it.
//!
//! Pipeline: RecordStore → filter/parse → group/aggregate → rank/fit → result table

pub mod duration;
pub mod frequency;
pub mod hourly;
pub mod location;
pub mod regression;
pub mod sleep;

pub use duration::activity_duration;
pub use frequency::activity_frequency;
pub use hourly::{hourly_energy, hourly_level, hourly_mood};
pub use location::location_share;
pub use regression::energy_mood_regression;
pub use sleep::sleep_duration;

use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;
use crate::store::RecordStore;
use crate::types::{Metric, MetricResult, RecordIssue};
use std::cmp::Ordering;
use std::collections::HashMap;
use tracing::warn;

/// Run one metric pipeline over the store
pub fn compute(
    metric: Metric,
    store: &RecordStore,
    config: &AnalyticsConfig,
) -> Result<MetricResult, AnalyticsError> {
    let result = match metric {
        Metric::SleepDuration => MetricResult::Sleep(sleep_duration(store, config)?),
        Metric::ActivityFrequency => MetricResult::Frequency(activity_frequency(store, config)?),
        Metric::ActivityDuration => MetricResult::Duration(activity_duration(store, config)?),
        Metric::LocationShare => MetricResult::Location(location_share(store, config)?),
        Metric::HourlyEnergy => MetricResult::Hourly(hourly_energy(store)?),
        Metric::HourlyMood => MetricResult::Hourly(hourly_mood(store)?),
        Metric::EnergyMoodRegression => {
            MetricResult::Regression(energy_mood_regression(store)?)
        }
    };
    Ok(result)
}

/// Accumulator keyed by label that remembers first-seen order
pub(crate) struct OrderedTally<V> {
    index: HashMap<String, usize>,
    entries: Vec<(String, V)>,
}

impl<V: Default> OrderedTally<V> {
    pub(crate) fn new() -> Self {
        Self {
            index: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Value slot for `label`, created on first sight
    pub(crate) fn entry(&mut self, label: &str) -> &mut V {
        let idx = match self.index.get(label) {
            Some(&idx) => idx,
            None => {
                self.entries.push((label.to_string(), V::default()));
                self.index.insert(label.to_string(), self.entries.len() - 1);
                self.entries.len() - 1
            }
        };
        &mut self.entries[idx].1
    }

    /// Entries in first-seen order
    pub(crate) fn into_entries(self) -> Vec<(String, V)> {
        self.entries
    }
}

/// Keep the `k` highest-ranked entries, descending by `key`.
///
/// The sort is stable, so ties keep their incoming (first-seen) order.
pub(crate) fn top_k_by<T, F>(mut entries: Vec<T>, k: usize, key: F) -> Vec<T>
where
    F: Fn(&T) -> f64,
{
    entries.sort_by(|a, b| key(b).partial_cmp(&key(a)).unwrap_or(Ordering::Equal));
    entries.truncate(k);
    entries
}

/// Split a per-record result into usable values and excluded records.
///
/// `NegativeDuration` is recorded and skipped; every other error is fatal.
pub(crate) fn exclude_negative<T>(
    row: usize,
    result: Result<T, AnalyticsError>,
    excluded: &mut Vec<RecordIssue>,
) -> Result<Option<T>, AnalyticsError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err @ AnalyticsError::NegativeDuration { .. }) => {
            warn!(row, error = %err, "excluding record from aggregation");
            excluded.extend(RecordIssue::from_error(row, &err));
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
