//! Core types for the daylog insights pipelines
//!
//! This module defines the data structures that flow through each stage:
//! raw activity records, per-metric result tables, chart specifications and
//! the panels handed to a rendering layer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Column holding the activity label
pub const COL_ACTIVITY: &str = "Activity";
/// Column holding the activity start timestamp
pub const COL_START_TIME: &str = "Start Time";
/// Column holding the activity end timestamp
pub const COL_END_TIME: &str = "End Time";
/// Column holding the calendar date of the activity
pub const COL_DATE: &str = "Date";
/// Column holding the location label
pub const COL_LOCATION: &str = "Location";
/// Column holding the 1-10 energy level reported after the activity
pub const COL_ENERGY: &str = "Energy Level After";
/// Column holding the 1-10 mood reported after the activity
pub const COL_MOOD: &str = "Mood After";

/// Every column the input table must carry (names are case- and spelling-sensitive)
pub const REQUIRED_COLUMNS: [&str; 7] = [
    COL_ACTIVITY,
    COL_START_TIME,
    COL_END_TIME,
    COL_DATE,
    COL_LOCATION,
    COL_ENERGY,
    COL_MOOD,
];

/// One row of the activity log, kept as raw text.
///
/// Typed views (timestamps, levels) are parsed on demand by the pipelines
/// that need them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityRecord {
    /// 1-based data row number (header excluded)
    pub row: usize,
    pub activity: String,
    pub start_time: String,
    pub end_time: String,
    pub date: String,
    pub location: String,
    pub energy_level_after: String,
    pub mood_after: String,
}

/// Kind of data-quality problem attached to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    MissingField,
    MalformedTimestamp,
    InvalidLevel,
    NegativeDuration,
}

/// A problem found on a single record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordIssue {
    pub row: usize,
    pub kind: IssueKind,
    pub message: String,
}

/// The seven fixed analyses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    SleepDuration,
    ActivityFrequency,
    ActivityDuration,
    LocationShare,
    HourlyEnergy,
    HourlyMood,
    EnergyMoodRegression,
}

impl Metric {
    /// All metrics in dashboard order
    pub const ALL: [Metric; 7] = [
        Metric::SleepDuration,
        Metric::ActivityFrequency,
        Metric::ActivityDuration,
        Metric::LocationShare,
        Metric::HourlyEnergy,
        Metric::HourlyMood,
        Metric::EnergyMoodRegression,
    ];

    /// Dashboard option string, also used as the chart title
    pub fn title(&self) -> &'static str {
        match self {
            Metric::SleepDuration => "Hours of Sleep Per Night for Last 7 Days",
            Metric::ActivityFrequency => "Top 5 Activities by Frequency",
            Metric::ActivityDuration => "Top 5 Activities by Total Duration",
            Metric::LocationShare => "Proportion of Time Spent at Top 5 Locations",
            Metric::HourlyEnergy => "Average Energy Levels Throughout the Day",
            Metric::HourlyMood => "Average Mood Levels Throughout the Day",
            Metric::EnergyMoodRegression => "Energy vs Mood",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::SleepDuration => "sleep_duration",
            Metric::ActivityFrequency => "activity_frequency",
            Metric::ActivityDuration => "activity_duration",
            Metric::LocationShare => "location_share",
            Metric::HourlyEnergy => "hourly_energy",
            Metric::HourlyMood => "hourly_mood",
            Metric::EnergyMoodRegression => "energy_mood_regression",
        }
    }

    /// Chart kind used to display this metric
    pub fn chart_kind(&self) -> ChartKind {
        match self {
            Metric::SleepDuration | Metric::ActivityFrequency | Metric::ActivityDuration => {
                ChartKind::Bar
            }
            Metric::LocationShare => ChartKind::Pie,
            Metric::HourlyEnergy | Metric::HourlyMood => ChartKind::Line,
            Metric::EnergyMoodRegression => ChartKind::ScatterWithTrendline,
        }
    }
}

/// Total sleep for one calendar date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepDay {
    pub date: NaiveDate,
    pub hours: f64,
}

/// Per-day sleep totals for the most recent dates, oldest first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SleepDurationResult {
    pub days: Vec<SleepDay>,
    /// Sleep records left out of the totals
    pub excluded: Vec<RecordIssue>,
}

/// A label with its occurrence count
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelCount {
    pub label: String,
    pub count: usize,
}

/// Top-K labels by occurrence, descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountResult {
    pub entries: Vec<LabelCount>,
    /// Number of rows the counts were drawn from
    pub total_rows: usize,
}

/// A normalized activity label with its summed duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelHours {
    pub label: String,
    pub hours: f64,
    /// Number of records merged under this label
    pub records: usize,
}

/// Top-K normalized activities by total duration, descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DurationResult {
    pub entries: Vec<LabelHours>,
    pub excluded: Vec<RecordIssue>,
}

/// A location with its count and share of the shown locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationShareEntry {
    pub label: String,
    pub count: usize,
    /// `count` divided by the sum of the top-K counts (0-1)
    pub share: f64,
}

/// Top-K locations by occurrence with their share among the shown locations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationShareResult {
    pub entries: Vec<LocationShareEntry>,
    pub total_rows: usize,
}

/// Which self-reported level an hourly profile averages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelKind {
    Energy,
    Mood,
}

impl LevelKind {
    pub fn column(&self) -> &'static str {
        match self {
            LevelKind::Energy => COL_ENERGY,
            LevelKind::Mood => COL_MOOD,
        }
    }

    pub fn noun(&self) -> &'static str {
        match self {
            LevelKind::Energy => "energy",
            LevelKind::Mood => "mood",
        }
    }
}

/// Average level for one hour of the day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyLevel {
    /// Hour of the start time (0-23)
    pub hour: u32,
    pub average: f64,
    /// Number of records averaged
    pub samples: usize,
}

/// Average level per hour of day, ascending by hour; empty hours are absent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyResult {
    pub level: LevelKind,
    pub points: Vec<HourlyLevel>,
}

/// One observed (energy, mood) pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnergyMoodPoint {
    pub energy: f64,
    pub mood: f64,
}

/// Ordinary least squares fit of Mood on Energy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub intercept: f64,
    pub slope: f64,
    /// Undefined (`None`) when mood never varies
    pub r_squared: Option<f64>,
    pub adj_r_squared: Option<f64>,
    /// Standard errors of (intercept, slope)
    pub std_errors: Option<[f64; 2]>,
    /// t statistics of (intercept, slope)
    pub t_values: Option<[f64; 2]>,
    /// Two-sided p-values of (intercept, slope)
    pub p_values: Option<[f64; 2]>,
    pub n_observations: usize,
    /// Fitted mood for each input row, in input order
    pub fitted: Vec<f64>,
    pub points: Vec<EnergyMoodPoint>,
}

impl RegressionResult {
    /// Predicted mood for a given energy level
    pub fn predict(&self, energy: f64) -> f64 {
        self.intercept + self.slope * energy
    }
}

/// Result table of any metric pipeline
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MetricResult {
    Sleep(SleepDurationResult),
    Frequency(CountResult),
    Duration(DurationResult),
    Location(LocationShareResult),
    Hourly(HourlyResult),
    Regression(RegressionResult),
}

/// Chart kinds understood by the rendering layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
    ScatterWithTrendline,
}

/// One plotted point; `x` is already formatted for display
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    pub x: String,
    pub y: f64,
}

/// Straight trendline drawn over a scatter plot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trendline {
    pub intercept: f64,
    pub slope: f64,
    pub x_min: f64,
    pub x_max: f64,
}

/// Everything a renderer needs to draw one metric
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    /// Actual window or K when it differs from the one named in `title`
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub subtitle: Option<String>,
    pub x_label: String,
    pub y_label: String,
    pub points: Vec<ChartPoint>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trendline: Option<Trendline>,
}

/// Output of one selection: the chart, the explanation and the underlying table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderedMetric {
    pub metric: Metric,
    pub chart: ChartSpec,
    pub explanation: String,
    /// Extra text blocks shown under the explanation (regression equation and summary)
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub details: Vec<String>,
    pub result: MetricResult,
}

/// What the dashboard shows after a selection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "panel", rename_all = "snake_case")]
pub enum Panel {
    Idle,
    Rendered(RenderedMetric),
    NotEnoughData { metric: Metric, reason: String },
}
