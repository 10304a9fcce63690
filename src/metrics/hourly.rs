//! Average energy and mood throughout the day

use crate::error::AnalyticsError;
use crate::store::RecordStore;
use crate::types::{HourlyLevel, HourlyResult, LevelKind};
use chrono::Timelike;
use std::collections::BTreeMap;
use tracing::debug;

/// Average energy level per start hour
pub fn hourly_energy(store: &RecordStore) -> Result<HourlyResult, AnalyticsError> {
    hourly_level(store, LevelKind::Energy)
}

/// Average mood per start hour
pub fn hourly_mood(store: &RecordStore) -> Result<HourlyResult, AnalyticsError> {
    hourly_level(store, LevelKind::Mood)
}

/// Mean of the chosen level grouped by the hour of each record's start time.
///
/// Hours without records are absent from the output rather than zero-filled.
pub fn hourly_level(store: &RecordStore, level: LevelKind) -> Result<HourlyResult, AnalyticsError> {
    let mut by_hour: BTreeMap<u32, (f64, usize)> = BTreeMap::new();

    for record in store.records() {
        let hour = record.start()?.hour();
        let value = match level {
            LevelKind::Energy => record.energy()?,
            LevelKind::Mood => record.mood()?,
        };
        let slot = by_hour.entry(hour).or_insert((0.0, 0));
        slot.0 += f64::from(value);
        slot.1 += 1;
    }

    if by_hour.is_empty() {
        return Err(AnalyticsError::InsufficientData(format!(
            "no {} readings in the log",
            level.noun()
        )));
    }

    let points: Vec<HourlyLevel> = by_hour
        .into_iter()
        .map(|(hour, (sum, samples))| HourlyLevel {
            hour,
            average: sum / samples as f64,
            samples,
        })
        .collect();

    debug!(level = level.noun(), hours = points.len(), "computed hourly levels");
    Ok(HourlyResult { level, points })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::SAMPLE_CSV;
    use pretty_assertions::assert_eq;

    const HEADER: &str = "Activity,Start Time,End Time,Date,Location,Energy Level After,Mood After\n";

    #[test]
    fn test_energy_means_per_hour() {
        let csv = format!(
            "{HEADER}A,09:00,10:00,2023-10-09,X,6,1\nB,09:45,10:00,2023-10-09,X,7,1\nC,21:10,22:00,2023-10-09,X,4,1\nD,09:59,10:30,2023-10-10,X,8,1\n"
        );
        let store = RecordStore::from_csv_str(&csv).unwrap();
        let result = hourly_energy(&store).unwrap();
        assert_eq!(result.level, LevelKind::Energy);
        assert_eq!(
            result.points,
            vec![
                HourlyLevel {
                    hour: 9,
                    average: 7.0,
                    samples: 3
                },
                HourlyLevel {
                    hour: 21,
                    average: 4.0,
                    samples: 1
                },
            ]
        );
    }

    #[test]
    fn test_mood_uses_mood_column() {
        let csv = format!("{HEADER}A,13:00,14:00,2023-10-09,X,2,9\nB,13:30,14:00,2023-10-09,X,2,6\n");
        let store = RecordStore::from_csv_str(&csv).unwrap();
        let result = hourly_mood(&store).unwrap();
        assert_eq!(result.points.len(), 1);
        assert!((result.points[0].average - 7.5).abs() < 1e-12);
    }

    #[test]
    fn test_hours_in_range_and_ascending() {
        let store = RecordStore::from_csv_str(SAMPLE_CSV).unwrap();
        for result in [hourly_energy(&store).unwrap(), hourly_mood(&store).unwrap()] {
            assert!(result.points.iter().all(|p| p.hour <= 23));
            assert!(result.points.windows(2).all(|w| w[0].hour < w[1].hour));
            let samples: usize = result.points.iter().map(|p| p.samples).sum();
            assert_eq!(samples, store.len());
        }
    }

    #[test]
    fn test_invalid_level_is_fatal() {
        let csv = format!("{HEADER}A,13:00,14:00,2023-10-09,X,high,9\n");
        let store = RecordStore::from_csv_str(&csv).unwrap();
        assert!(matches!(
            hourly_energy(&store),
            Err(AnalyticsError::InvalidLevel { .. })
        ));
        assert!(hourly_mood(&store).is_ok());
    }

    #[test]
    fn test_empty_store_is_insufficient() {
        let store = RecordStore::from_csv_str(HEADER).unwrap();
        assert!(hourly_mood(&store).unwrap_err().is_insufficient_data());
    }
}
