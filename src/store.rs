//! Record store
//!
//! Loads the activity log table once per session and hands out read-only
//! records. Header problems are caught at load time; cell problems surface
//! lazily, only in the pipelines that read the affected field.

use crate::error::AnalyticsError;
use crate::normalizer::{parse_date, parse_time_of_day, same_day_hours};
use crate::types::{
    ActivityRecord, IssueKind, RecordIssue, COL_ACTIVITY, COL_DATE, COL_END_TIME, COL_ENERGY,
    COL_LOCATION, COL_MOOD, COL_START_TIME, REQUIRED_COLUMNS,
};
use chrono::{NaiveDate, NaiveTime};
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

/// Lowest accepted energy/mood level
pub const LEVEL_MIN: u8 = 1;
/// Highest accepted energy/mood level
pub const LEVEL_MAX: u8 = 10;

/// Immutable, row-oriented activity log
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<ActivityRecord>,
}

impl RecordStore {
    /// Build a store from already-extracted records
    pub fn from_records(records: Vec<ActivityRecord>) -> Self {
        Self { records }
    }

    /// Load a CSV file with a header row
    pub fn from_csv_path(path: &Path) -> Result<Self, AnalyticsError> {
        let file = std::fs::File::open(path)?;
        let store = Self::from_csv_reader(file)?;
        info!(path = %path.display(), rows = store.len(), "loaded activity log");
        Ok(store)
    }

    /// Parse CSV text with a header row
    pub fn from_csv_str(csv: &str) -> Result<Self, AnalyticsError> {
        Self::from_csv_reader(csv.as_bytes())
    }

    /// Read CSV from any reader. All seven required columns must be present in
    /// the header; extra columns are ignored.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, AnalyticsError> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(reader);

        let headers = reader.headers()?.clone();
        let mut indices = [0usize; REQUIRED_COLUMNS.len()];
        for (slot, column) in indices.iter_mut().zip(REQUIRED_COLUMNS) {
            *slot = headers
                .iter()
                .position(|h| h == column)
                .ok_or_else(|| AnalyticsError::MissingColumn {
                    column: column.to_string(),
                    row: None,
                })?;
        }
        let [activity, start, end, date, location, energy, mood] = indices;

        let mut records = Vec::new();
        for (idx, row) in reader.records().enumerate() {
            let row = row?;
            let cell = |i: usize| row.get(i).unwrap_or_default().to_string();
            records.push(ActivityRecord {
                row: idx + 1,
                activity: cell(activity),
                start_time: cell(start),
                end_time: cell(end),
                date: cell(date),
                location: cell(location),
                energy_level_after: cell(energy),
                mood_after: cell(mood),
            });
        }

        debug!(rows = records.len(), "parsed activity csv");
        Ok(Self { records })
    }

    pub fn records(&self) -> &[ActivityRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Earliest and latest parsable dates in the log
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let mut dates = self.records.iter().filter_map(|r| r.calendar_date().ok());
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d))))
    }

    /// Check every field of every record without stopping at the first problem
    pub fn audit(&self) -> Vec<RecordIssue> {
        let mut issues = Vec::new();
        for record in &self.records {
            let mut push = |result: Result<(), AnalyticsError>| {
                if let Err(err) = result {
                    if let Some(issue) = RecordIssue::from_error(record.row, &err) {
                        issues.push(issue);
                    }
                }
            };
            push(record.activity().map(|_| ()));
            push(record.location().map(|_| ()));
            push(record.calendar_date().map(|_| ()));
            push(record.energy().map(|_| ()));
            push(record.mood().map(|_| ()));

            let start = record.start();
            let end = record.end();
            match (start, end) {
                (Ok(_), Ok(_)) => push(record.duration_hours().map(|_| ())),
                (start, end) => {
                    push(start.map(|_| ()));
                    push(end.map(|_| ()));
                }
            }
        }
        issues
    }
}

impl ActivityRecord {
    /// Raw activity label, exactly as written
    pub fn activity(&self) -> Result<&str, AnalyticsError> {
        self.required(COL_ACTIVITY, &self.activity)
    }

    /// Raw location label, exactly as written
    pub fn location(&self) -> Result<&str, AnalyticsError> {
        self.required(COL_LOCATION, &self.location)
    }

    /// Wall-clock start time
    pub fn start(&self) -> Result<NaiveTime, AnalyticsError> {
        self.time_of_day(COL_START_TIME, &self.start_time)
    }

    /// Wall-clock end time
    pub fn end(&self) -> Result<NaiveTime, AnalyticsError> {
        self.time_of_day(COL_END_TIME, &self.end_time)
    }

    pub fn calendar_date(&self) -> Result<NaiveDate, AnalyticsError> {
        let raw = self.required(COL_DATE, &self.date)?;
        parse_date(raw).ok_or_else(|| AnalyticsError::MalformedTimestamp {
            column: COL_DATE.to_string(),
            row: self.row,
            value: raw.to_string(),
        })
    }

    pub fn energy(&self) -> Result<u8, AnalyticsError> {
        self.level(COL_ENERGY, &self.energy_level_after)
    }

    pub fn mood(&self) -> Result<u8, AnalyticsError> {
        self.level(COL_MOOD, &self.mood_after)
    }

    /// Same-day duration in hours; `NegativeDuration` when End is before Start
    pub fn duration_hours(&self) -> Result<f64, AnalyticsError> {
        let start = self.start()?;
        let end = self.end()?;
        same_day_hours(start, end).ok_or_else(|| AnalyticsError::NegativeDuration {
            row: self.row,
            start: self.start_time.trim().to_string(),
            end: self.end_time.trim().to_string(),
        })
    }

    fn required<'a>(&self, column: &str, value: &'a str) -> Result<&'a str, AnalyticsError> {
        if value.trim().is_empty() {
            return Err(AnalyticsError::MissingColumn {
                column: column.to_string(),
                row: Some(self.row),
            });
        }
        Ok(value)
    }

    fn time_of_day(&self, column: &str, value: &str) -> Result<NaiveTime, AnalyticsError> {
        let raw = self.required(column, value)?;
        parse_time_of_day(raw).ok_or_else(|| AnalyticsError::MalformedTimestamp {
            column: column.to_string(),
            row: self.row,
            value: raw.to_string(),
        })
    }

    fn level(&self, column: &str, value: &str) -> Result<u8, AnalyticsError> {
        let raw = self.required(column, value)?.trim();
        raw.parse::<u8>()
            .ok()
            .filter(|level| (LEVEL_MIN..=LEVEL_MAX).contains(level))
            .ok_or_else(|| AnalyticsError::InvalidLevel {
                column: column.to_string(),
                row: self.row,
                value: raw.to_string(),
            })
    }
}

impl RecordIssue {
    /// Convert a per-record error into an issue; `None` for errors that are
    /// not tied to a single record.
    pub fn from_error(row: usize, err: &AnalyticsError) -> Option<Self> {
        let kind = match err {
            AnalyticsError::MissingColumn { .. } => IssueKind::MissingField,
            AnalyticsError::MalformedTimestamp { .. } => IssueKind::MalformedTimestamp,
            AnalyticsError::InvalidLevel { .. } => IssueKind::InvalidLevel,
            AnalyticsError::NegativeDuration { .. } => IssueKind::NegativeDuration,
            _ => return None,
        };
        Some(Self {
            row,
            kind,
            message: err.to_string(),
        })
    }
}


#[cfg(test)]
mod tests {
    use super::fixtures::SAMPLE_CSV;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_load_sample() {
        let store = RecordStore::from_csv_str(SAMPLE_CSV).unwrap();
        assert_eq!(store.len(), 18);
        let first = &store.records()[0];
        assert_eq!(first.row, 1);
        assert_eq!(first.activity().unwrap(), "Sleeping");
        assert_eq!(first.energy().unwrap(), 8);
        assert_eq!(first.duration_hours().unwrap(), 7.0);
    }

    #[test]
    fn test_missing_header_column() {
        let csv = "Activity,Start Time,End Time,Date,Location,Energy Level After\nClass,09:00,10:00,2023-10-09,Campus,5\n";
        let err = RecordStore::from_csv_str(csv).unwrap_err();
        match err {
            AnalyticsError::MissingColumn { column, row } => {
                assert_eq!(column, "Mood After");
                assert_eq!(row, None);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_header_names_are_case_sensitive() {
        let csv = "activity,Start Time,End Time,Date,Location,Energy Level After,Mood After\n";
        assert!(matches!(
            RecordStore::from_csv_str(csv),
            Err(AnalyticsError::MissingColumn { .. })
        ));
    }

    #[test]
    fn test_columns_in_any_order_with_extras() {
        let csv = "Mood After,Notes,Activity,Location,Date,End Time,Start Time,Energy Level After\n7,x,Gym,Gym,2023-10-09,19:00,18:00,6\n";
        let store = RecordStore::from_csv_str(csv).unwrap();
        let record = &store.records()[0];
        assert_eq!(record.activity().unwrap(), "Gym");
        assert_eq!(record.mood().unwrap(), 7);
        assert_eq!(record.energy().unwrap(), 6);
        assert_eq!(record.duration_hours().unwrap(), 1.0);
    }

    #[test]
    fn test_lazy_cell_errors() {
        let csv = "Activity,Start Time,End Time,Date,Location,Energy Level After,Mood After\nClass,nine,10:00,,Campus,11,\n";
        let store = RecordStore::from_csv_str(csv).unwrap();
        let record = &store.records()[0];

        assert!(record.activity().is_ok());
        assert!(matches!(
            record.start(),
            Err(AnalyticsError::MalformedTimestamp { row: 1, .. })
        ));
        assert!(matches!(
            record.calendar_date(),
            Err(AnalyticsError::MissingColumn { row: Some(1), .. })
        ));
        assert!(matches!(record.energy(), Err(AnalyticsError::InvalidLevel { .. })));
        assert!(matches!(record.mood(), Err(AnalyticsError::MissingColumn { .. })));
    }

    #[test]
    fn test_negative_duration() {
        let csv = "Activity,Start Time,End Time,Date,Location,Energy Level After,Mood After\nSleeping,23:00,07:00,2023-10-09,Home,8,8\n";
        let store = RecordStore::from_csv_str(csv).unwrap();
        assert!(matches!(
            store.records()[0].duration_hours(),
            Err(AnalyticsError::NegativeDuration { row: 1, .. })
        ));
    }

    #[test]
    fn test_audit_collects_all_problems() {
        let csv = "\
Activity,Start Time,End Time,Date,Location,Energy Level After,Mood After
Sleeping,23:00,07:00,2023-10-09,Home,8,8
,09:00,bad,2023-10-09,Campus,5,0
Gym,18:00,19:00,2023-10-09,Gym,6,7
";
        let store = RecordStore::from_csv_str(csv).unwrap();
        let issues = store.audit();
        let kinds: Vec<(usize, IssueKind)> = issues.iter().map(|i| (i.row, i.kind)).collect();
        assert_eq!(
            kinds,
            vec![
                (1, IssueKind::NegativeDuration),
                (2, IssueKind::MissingField),
                (2, IssueKind::InvalidLevel),
                (2, IssueKind::MalformedTimestamp),
            ]
        );
    }

    #[test]
    fn test_date_range() {
        let store = RecordStore::from_csv_str(SAMPLE_CSV).unwrap();
        let (lo, hi) = store.date_range().unwrap();
        assert_eq!(lo, NaiveDate::from_ymd_opt(2023, 10, 9).unwrap());
        assert_eq!(hi, NaiveDate::from_ymd_opt(2023, 10, 17).unwrap());
        assert_eq!(RecordStore::default().date_range(), None);
    }
}
