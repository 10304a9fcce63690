//! Chart specification builder
//!
//! Maps a metric result table onto the chart a renderer should draw. Values
//! are rounded with the same [`DisplayFormat`] the explanation text uses.

use crate::config::{AnalyticsConfig, DEFAULT_SLEEP_WINDOW_DAYS, DEFAULT_TOP_K};
use crate::format::DisplayFormat;
use crate::types::{
    ChartPoint, ChartSpec, LevelKind, Metric, MetricResult, Trendline, COL_ENERGY, COL_MOOD,
};

/// Build the chart for a metric result
pub fn build_chart(metric: Metric, result: &MetricResult, config: &AnalyticsConfig) -> ChartSpec {
    let fmt = &DisplayFormat::from(config);
    let (x_label, y_label, points, trendline): (&str, &str, Vec<ChartPoint>, Option<Trendline>) =
        match result {
            MetricResult::Sleep(sleep) => (
                "Date",
                "Hours of Sleep",
                sleep
                    .days
                    .iter()
                    .map(|d| point(fmt.date(d.date), d.hours, fmt))
                    .collect(),
                None,
            ),
            MetricResult::Frequency(counts) => (
                "Activity",
                "Count",
                counts
                    .entries
                    .iter()
                    .map(|e| point(e.label.clone(), e.count as f64, fmt))
                    .collect(),
                None,
            ),
            MetricResult::Duration(duration) => (
                "Activity",
                "Total Duration",
                duration
                    .entries
                    .iter()
                    .map(|e| point(e.label.clone(), e.hours, fmt))
                    .collect(),
                None,
            ),
            MetricResult::Location(location) => (
                "Location",
                "Count",
                location
                    .entries
                    .iter()
                    .map(|e| point(e.label.clone(), e.count as f64, fmt))
                    .collect(),
                None,
            ),
            MetricResult::Hourly(hourly) => (
                "Hour of Day",
                match hourly.level {
                    LevelKind::Energy => "Average Energy Level",
                    LevelKind::Mood => "Average Mood Level",
                },
                hourly
                    .points
                    .iter()
                    .map(|p| point(p.hour.to_string(), p.average, fmt))
                    .collect(),
                None,
            ),
            MetricResult::Regression(regression) => {
                let (x_min, x_max) = regression
                    .points
                    .iter()
                    .map(|p| p.energy)
                    .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), e| {
                        (lo.min(e), hi.max(e))
                    });
                (
                    COL_ENERGY,
                    COL_MOOD,
                    regression
                        .points
                        .iter()
                        .map(|p| point(fmt.number(p.energy), p.mood, fmt))
                        .collect(),
                    Some(Trendline {
                        intercept: fmt.round(regression.intercept),
                        slope: fmt.round(regression.slope),
                        x_min,
                        x_max,
                    }),
                )
            }
        };

    ChartSpec {
        kind: metric.chart_kind(),
        title: metric.title().to_string(),
        subtitle: subtitle(metric, config),
        x_label: x_label.to_string(),
        y_label: y_label.to_string(),
        points,
        trendline,
    }
}

/// Titles name the default window and K; anything else is spelled out here
fn subtitle(metric: Metric, config: &AnalyticsConfig) -> Option<String> {
    match metric {
        Metric::SleepDuration if config.sleep_window_days != DEFAULT_SLEEP_WINDOW_DAYS => Some(
            format!("Showing the last {} days with sleep records", config.sleep_window_days),
        ),
        Metric::ActivityFrequency | Metric::ActivityDuration | Metric::LocationShare
            if config.top_k != DEFAULT_TOP_K =>
        {
            Some(format!("Showing the top {}", config.top_k))
        }
        _ => None,
    }
}

fn point(x: String, y: f64, fmt: &DisplayFormat) -> ChartPoint {
    ChartPoint { x, y: fmt.round(y) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyticsConfig;
    use crate::metrics::compute;
    use crate::store::fixtures::SAMPLE_CSV;
    use crate::store::RecordStore;
    use crate::types::ChartKind;
    use pretty_assertions::assert_eq;

    fn chart_for(metric: Metric) -> ChartSpec {
        let store = RecordStore::from_csv_str(SAMPLE_CSV).unwrap();
        let config = AnalyticsConfig::default();
        let result = compute(metric, &store, &config).unwrap();
        build_chart(metric, &result, &config)
    }

    #[test]
    fn test_chart_kinds() {
        assert_eq!(chart_for(Metric::SleepDuration).kind, ChartKind::Bar);
        assert_eq!(chart_for(Metric::LocationShare).kind, ChartKind::Pie);
        assert_eq!(chart_for(Metric::HourlyMood).kind, ChartKind::Line);
        assert_eq!(
            chart_for(Metric::EnergyMoodRegression).kind,
            ChartKind::ScatterWithTrendline
        );
    }

    #[test]
    fn test_sleep_chart_points() {
        let chart = chart_for(Metric::SleepDuration);
        assert_eq!(chart.title, "Hours of Sleep Per Night for Last 7 Days");
        assert_eq!(chart.points.len(), 7);
        assert_eq!(
            chart.points[0],
            ChartPoint {
                x: "Oct 11, 2023".to_string(),
                y: 6.0
            }
        );
        assert!(chart.trendline.is_none());
    }

    #[test]
    fn test_default_config_has_no_subtitle() {
        for metric in Metric::ALL {
            assert_eq!(chart_for(metric).subtitle, None);
        }
    }

    #[test]
    fn test_subtitle_names_configured_window_and_k() {
        let store = RecordStore::from_csv_str(SAMPLE_CSV).unwrap();
        let config = AnalyticsConfig {
            sleep_window_days: 3,
            top_k: 2,
            ..AnalyticsConfig::default()
        };
        let chart_with = |metric| {
            let result = compute(metric, &store, &config).unwrap();
            build_chart(metric, &result, &config)
        };

        let sleep = chart_with(Metric::SleepDuration);
        assert_eq!(sleep.title, "Hours of Sleep Per Night for Last 7 Days");
        assert_eq!(
            sleep.subtitle.as_deref(),
            Some("Showing the last 3 days with sleep records")
        );
        assert_eq!(sleep.points.len(), 3);

        let locations = chart_with(Metric::LocationShare);
        assert_eq!(locations.subtitle.as_deref(), Some("Showing the top 2"));
        assert_eq!(locations.points.len(), 2);
        assert_eq!(chart_with(Metric::HourlyEnergy).subtitle, None);
    }

    #[test]
    fn test_regression_trendline_is_rounded() {
        let chart = chart_for(Metric::EnergyMoodRegression);
        let trend = chart.trendline.unwrap();
        assert_eq!(trend.slope, 0.76);
        assert_eq!(trend.intercept, 1.9);
        assert_eq!(trend.x_min, 4.0);
        assert_eq!(trend.x_max, 9.0);
        assert_eq!(chart.points.len(), 18);
    }
}
