//! Explanation generator
//!
//! Derives a short natural-language summary from each metric result table.
//! Text is regenerated on every call and references the table's extrema;
//! ties go to the first entry in the table's order.

use crate::format::DisplayFormat;
use crate::types::{
    CountResult, DurationResult, HourlyResult, LocationShareResult, MetricResult,
    RegressionResult, SleepDurationResult, COL_ENERGY, COL_MOOD,
};

/// Significance level used to phrase the slope's p-value
const SIGNIFICANCE_LEVEL: f64 = 0.05;

/// Explanation generator for metric results
pub struct Explainer {
    fmt: DisplayFormat,
}

impl Default for Explainer {
    fn default() -> Self {
        Self::new(DisplayFormat::default())
    }
}

impl Explainer {
    pub fn new(fmt: DisplayFormat) -> Self {
        Self { fmt }
    }

    /// One paragraph describing the result
    pub fn explain(&self, result: &MetricResult) -> String {
        match result {
            MetricResult::Sleep(r) => self.sleep(r),
            MetricResult::Frequency(r) => self.frequency(r),
            MetricResult::Duration(r) => self.duration(r),
            MetricResult::Location(r) => self.location(r),
            MetricResult::Hourly(r) => self.hourly(r),
            MetricResult::Regression(r) => self.regression(r),
        }
    }

    /// Extra text blocks shown below the explanation
    pub fn details(&self, result: &MetricResult) -> Vec<String> {
        match result {
            MetricResult::Regression(r) => vec![
                format!("Regression equation: {}", self.equation(r)),
                self.regression_summary(r),
            ],
            _ => Vec::new(),
        }
    }

    fn sleep(&self, r: &SleepDurationResult) -> String {
        let fmt = &self.fmt;
        let (Some(first), Some(last)) = (r.days.first(), r.days.last()) else {
            return "There are no sleep records to chart.".to_string();
        };
        let most = argmax(&r.days, |d| d.hours).unwrap_or(first);
        let least = argmin(&r.days, |d| d.hours).unwrap_or(first);
        let average = r.days.iter().map(|d| d.hours).sum::<f64>() / r.days.len() as f64;

        let mut text = format!(
            "The bar chart represents the hours of sleep per night for the most recent {} nights in the log. \
             The x-axis represents the date, ranging from {} to {}. \
             The y-axis represents the hours of sleep. \
             The highest amount of sleep was on {} with {} hours of sleep, \
             and the lowest amount of sleep was on {} with {} hours of sleep. \
             Over this period I slept an average of {} hours per night.",
            r.days.len(),
            fmt.date(first.date),
            fmt.date(last.date),
            fmt.date(most.date),
            fmt.number(most.hours),
            fmt.date(least.date),
            fmt.number(least.hours),
            fmt.number(average),
        );
        if !r.excluded.is_empty() {
            text.push_str(&format!(
                " {} sleep {} ending before {} start{} left out.",
                r.excluded.len(),
                plural(r.excluded.len(), "record", "records"),
                plural(r.excluded.len(), "its", "their"),
                plural(r.excluded.len(), " was", "s were"),
            ));
        }
        text
    }

    fn frequency(&self, r: &CountResult) -> String {
        let (Some(top), Some(bottom)) = (r.entries.first(), r.entries.last()) else {
            return "There are no activities to chart.".to_string();
        };
        format!(
            "The bar chart represents the top {n} activities based on their frequency. \
             The activities are: {list}. \
             The x-axis represents the activities and the y-axis represents their counts. \
             The activity with the highest count is '{}' with a count of {}, \
             and the activity with the lowest count among the selected top {n} is '{}' with a count of {}. \
             This chart helps us understand which activities are most frequently performed. \
             However, it does not show the amount of time spent on each activity: \
             a short activity performed often can outrank a long one performed rarely.",
            top.label,
            top.count,
            bottom.label,
            bottom.count,
            n = r.entries.len(),
            list = join_labels(r.entries.iter().map(|e| e.label.as_str())),
        )
    }

    fn duration(&self, r: &DurationResult) -> String {
        let fmt = &self.fmt;
        let (Some(top), Some(bottom)) = (r.entries.first(), r.entries.last()) else {
            return "There are no activities with a usable duration to chart.".to_string();
        };
        let mut text = format!(
            "The bar chart represents the total duration of the top {n} activities. \
             The x-axis represents different activities: {list}. \
             The y-axis represents the total duration of each activity in hours. \
             The activity with the longest total duration is '{}' with a total duration of {} hours, \
             and the activity with the shortest total duration among the top {n} is '{}' with a total duration of {} hours. \
             This chart helps us understand which activities take up most of my time.",
            top.label,
            fmt.number(top.hours),
            bottom.label,
            fmt.number(bottom.hours),
            n = r.entries.len(),
            list = join_labels(r.entries.iter().map(|e| e.label.as_str())),
        );
        if !r.excluded.is_empty() {
            text.push_str(&format!(
                " {} {} ending before {} start{} left out.",
                r.excluded.len(),
                plural(r.excluded.len(), "record", "records"),
                plural(r.excluded.len(), "its", "their"),
                plural(r.excluded.len(), " was", "s were"),
            ));
        }
        text
    }

    fn location(&self, r: &LocationShareResult) -> String {
        let fmt = &self.fmt;
        let (Some(top), Some(bottom)) = (r.entries.first(), r.entries.last()) else {
            return "There are no locations to chart.".to_string();
        };
        format!(
            "The pie chart represents the proportion of time spent at the top {n} locations. \
             The locations are: {list}. \
             Each slice of the pie represents a different location, and the size of the slice \
             represents the proportion of time spent at that location among the locations shown. \
             The largest slice represents the location '{}' where most time is spent ({}), \
             and the smallest slice represents the location '{}' where least time is spent among the top {n} locations ({}). \
             This chart helps us understand where most time is spent.",
            top.label,
            fmt.percent(top.share),
            bottom.label,
            fmt.percent(bottom.share),
            n = r.entries.len(),
            list = join_labels(r.entries.iter().map(|e| e.label.as_str())),
        )
    }

    fn hourly(&self, r: &HourlyResult) -> String {
        let fmt = &self.fmt;
        let noun = r.level.noun();
        let (Some(first), Some(last)) = (r.points.first(), r.points.last()) else {
            return format!("There are no {noun} readings to chart.");
        };
        let peak = argmax(&r.points, |p| p.average).unwrap_or(first);
        let low = argmin(&r.points, |p| p.average).unwrap_or(first);

        format!(
            "The line graph represents the average {noun} levels throughout the day. \
             The x-axis represents the hour of the day, ranging from {} to {}. \
             The y-axis represents the average {noun} level, ranging from {} to {}. \
             The {noun} level peaks at {} with an average of {}, and is lowest at {} with an average of {}. \
             This visualization can help in understanding how {noun} levels vary throughout the day \
             and can provide insights into optimizing daily routines.",
            first.hour,
            last.hour,
            fmt.number(low.average),
            fmt.number(peak.average),
            clock_hour(peak.hour),
            fmt.number(peak.average),
            clock_hour(low.hour),
            fmt.number(low.average),
        )
    }

    fn regression(&self, r: &RegressionResult) -> String {
        let fmt = &self.fmt;
        let slope = fmt.round(r.slope);
        let (direction, change) = if slope > 0.0 {
            ("The higher my energy level, the higher my mood.", "increases")
        } else if slope < 0.0 {
            ("The higher my energy level, the lower my mood.", "decreases")
        } else {
            ("My mood does not move with my energy level.", "changes")
        };

        let sign = if slope < 0.0 { "minus" } else { "plus" };

        let mut text = format!(
            "The scatter plot shows how my mood changes with my energy level after each activity. \
             {direction} \
             The trendline is the line that best fits the data points and shows the general direction of the relationship. \
             The regression equation says that my mood is equal to {} {sign} {} times my energy level. \
             This means that for every one point increase in my energy level, my mood {change} by {} points on average.",
            fmt.number(r.intercept),
            fmt.number(slope.abs()),
            fmt.number(slope.abs()),
        );

        match r.r_squared {
            // The percentage is taken from the displayed R² so both show the same digits.
            Some(r2) => text.push_str(&format!(
                " The R-squared value is {}, which means that {} of the variation in mood can be explained by energy level.",
                fmt.number(r2),
                fmt.percent(fmt.round(r2)),
            )),
            None => text.push_str(" My mood does not vary across the log, so R-squared is undefined."),
        }

        match r.p_values {
            Some([_, p_slope]) if p_slope < SIGNIFICANCE_LEVEL => text.push_str(&format!(
                " The p-value of the slope is {}, which means that the relationship is very unlikely to happen by chance.",
                fmt.p_value(p_slope)
            )),
            Some([_, p_slope]) => text.push_str(&format!(
                " The p-value of the slope is {}, so the relationship could plausibly be due to chance.",
                fmt.p_value(p_slope)
            )),
            None => text.push_str(
                " With only two observations there are no residual degrees of freedom, so no p-values can be computed.",
            ),
        }
        text
    }

    /// `Mood After = a + b * (Energy Level After)` at display precision
    pub fn equation(&self, r: &RegressionResult) -> String {
        self.fmt
            .linear_equation(COL_MOOD, r.intercept, r.slope, COL_ENERGY)
    }

    /// Plain-text fit summary: coefficient table and goodness of fit
    pub fn regression_summary(&self, r: &RegressionResult) -> String {
        let fmt = &self.fmt;
        let rule = "=".repeat(72);
        let thin = "-".repeat(72);
        let opt = |v: Option<f64>| v.map(|v| fmt.number(v)).unwrap_or_else(|| "n/a".into());
        let opt_p = |v: Option<f64>| v.map(|v| fmt.p_value(v)).unwrap_or_else(|| "n/a".into());

        let mut out = String::new();
        out.push_str("OLS Regression Results\n");
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "{:<18}{:>18}    {:<18}{:>14}\n",
            "Dep. Variable:",
            COL_MOOD,
            "R-squared:",
            opt(r.r_squared)
        ));
        out.push_str(&format!(
            "{:<18}{:>18}    {:<18}{:>14}\n",
            "No. Observations:",
            r.n_observations,
            "Adj. R-squared:",
            opt(r.adj_r_squared)
        ));
        out.push_str(&rule);
        out.push('\n');
        out.push_str(&format!(
            "{:<22}{:>12}{:>12}{:>12}{:>12}\n",
            "", "coef", "std err", "t", "P>|t|"
        ));
        out.push_str(&thin);
        out.push('\n');
        let names = ["const", COL_ENERGY];
        let coefficients = [r.intercept, r.slope];
        for i in 0..2 {
            out.push_str(&format!(
                "{:<22}{:>12}{:>12}{:>12}{:>12}\n",
                names[i],
                fmt.number(coefficients[i]),
                opt(r.std_errors.map(|se| se[i])),
                opt(r.t_values.map(|t| t[i])),
                opt_p(r.p_values.map(|p| p[i])),
            ));
        }
        out.push_str(&rule);
        out
    }
}

fn argmax<T>(items: &[T], key: impl Fn(&T) -> f64) -> Option<&T> {
    let mut best: Option<&T> = None;
    for item in items {
        if best.map_or(true, |b| key(item) > key(b)) {
            best = Some(item);
        }
    }
    best
}

fn argmin<T>(items: &[T], key: impl Fn(&T) -> f64) -> Option<&T> {
    argmax(items, |item| -key(item))
}

fn join_labels<'a>(labels: impl Iterator<Item = &'a str>) -> String {
    labels.collect::<Vec<_>>().join(", ")
}

fn plural(n: usize, one: &'static str, many: &'static str) -> &'static str {
    if n == 1 {
        one
    } else {
        many
    }
}

/// `7` -> "7 am", `0` -> "midnight", `12` -> "noon", `15` -> "3 pm"
fn clock_hour(hour: u32) -> String {
    match hour {
        0 => "midnight".to_string(),
        12 => "noon".to_string(),
        1..=11 => format!("{hour} am"),
        _ => format!("{} pm", hour - 12),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyticsConfig;
    use crate::metrics::compute;
    use crate::store::fixtures::SAMPLE_CSV;
    use crate::store::RecordStore;
    use crate::types::{HourlyLevel, LevelKind, Metric};

    fn explain_sample(metric: Metric) -> String {
        let store = RecordStore::from_csv_str(SAMPLE_CSV).unwrap();
        let result = compute(metric, &store, &AnalyticsConfig::default()).unwrap();
        Explainer::default().explain(&result)
    }

    #[test]
    fn test_sleep_explanation_extrema() {
        let text = explain_sample(Metric::SleepDuration);
        assert!(text.contains("ranging from Oct 11, 2023 to Oct 17, 2023"));
        assert!(text.contains("highest amount of sleep was on Oct 15, 2023 with 9.00 hours"));
        assert!(text.contains("lowest amount of sleep was on Oct 16, 2023 with 5.00 hours"));
        assert!(!text.contains("left out"));
    }

    #[test]
    fn test_frequency_explanation() {
        let text = explain_sample(Metric::ActivityFrequency);
        assert!(text.contains("The activities are: Sleeping, Class, Breakfast, Watch Netflix, Do assignments."));
        assert!(text.contains("'Sleeping' with a count of 9"));
        assert!(text.contains("'Do assignments' with a count of 1"));
    }

    #[test]
    fn test_duration_explanation_rounds_every_number() {
        let text = explain_sample(Metric::ActivityDuration);
        assert!(text.contains("'sleeping' with a total duration of 62.50 hours"));
        assert!(text.contains("'gym' with a total duration of 1.00 hours"));
    }

    #[test]
    fn test_location_explanation_percentages() {
        let text = explain_sample(Metric::LocationShare);
        assert!(text.contains("'Home' where most time is spent (61.11%)"));
        assert!(text.contains("'Cafe' where least time is spent among the top 5 locations (5.56%)"));
    }

    #[test]
    fn test_hourly_ties_go_to_first_hour() {
        let result = MetricResult::Hourly(HourlyResult {
            level: LevelKind::Energy,
            points: vec![
                HourlyLevel { hour: 8, average: 8.5, samples: 2 },
                HourlyLevel { hour: 15, average: 5.0, samples: 1 },
                HourlyLevel { hour: 18, average: 5.0, samples: 1 },
                HourlyLevel { hour: 23, average: 8.5, samples: 1 },
            ],
        });
        let text = Explainer::default().explain(&result);
        assert!(text.contains("ranging from 8 to 23"));
        assert!(text.contains("ranging from 5.00 to 8.50"));
        assert!(text.contains("peaks at 8 am with an average of 8.50"));
        assert!(text.contains("lowest at 3 pm with an average of 5.00"));
    }

    #[test]
    fn test_regression_text_matches_equation_rounding() {
        let store = RecordStore::from_csv_str(SAMPLE_CSV).unwrap();
        let result = compute(Metric::EnergyMoodRegression, &store, &AnalyticsConfig::default())
            .unwrap();
        let explainer = Explainer::default();
        let text = explainer.explain(&result);
        let details = explainer.details(&result);

        assert!(text.contains("equal to 1.90 plus 0.76 times my energy level"));
        assert!(text.contains("The R-squared value is 0.61"));
        assert!(text.contains("very unlikely to happen by chance"));
        assert_eq!(
            details[0],
            "Regression equation: Mood After = 1.90 + 0.76 * (Energy Level After)"
        );
        assert!(details[1].contains("OLS Regression Results"));
        assert!(details[1].contains("No. Observations:"));
        assert!(details[1].contains("0.76"));
    }

    fn regression_from_pairs(pairs: &[(u8, u8)]) -> MetricResult {
        let mut csv =
            "Activity,Start Time,End Time,Date,Location,Energy Level After,Mood After\n".to_string();
        for (energy, mood) in pairs {
            csv.push_str(&format!("A,09:00,10:00,2023-10-09,X,{energy},{mood}\n"));
        }
        let store = RecordStore::from_csv_str(&csv).unwrap();
        compute(Metric::EnergyMoodRegression, &store, &AnalyticsConfig::default()).unwrap()
    }

    #[test]
    fn test_constant_mood_has_undefined_r_squared() {
        let result = regression_from_pairs(&[(2, 6), (5, 6), (8, 6), (9, 6)]);
        let explainer = Explainer::default();
        let text = explainer.explain(&result);

        assert!(text.contains("My mood does not move with my energy level."));
        assert!(text.contains("My mood does not vary across the log, so R-squared is undefined."));
        assert!(!text.contains("of the variation in mood can be explained"));
        assert!(explainer.details(&result)[1].contains("n/a"));
    }

    #[test]
    fn test_negative_slope_sentence_matches_equation() {
        // mood = 10.7 - 0.75 * energy, R² = 0.98684
        let result = regression_from_pairs(&[(2, 9), (4, 8), (6, 6), (8, 5), (10, 3)]);
        let explainer = Explainer::default();
        let text = explainer.explain(&result);

        assert!(text.contains("equal to 10.70 minus 0.75 times my energy level"));
        assert!(text.contains("my mood decreases by 0.75 points"));
        assert_eq!(
            explainer.details(&result)[0],
            "Regression equation: Mood After = 10.70 - 0.75 * (Energy Level After)"
        );
    }

    #[test]
    fn test_r_squared_percentage_uses_displayed_value() {
        let result = regression_from_pairs(&[(2, 9), (4, 8), (6, 6), (8, 5), (10, 3)]);
        let text = Explainer::default().explain(&result);
        assert!(text.contains("The R-squared value is 0.99, which means that 99.00% of the variation"));
    }

    #[test]
    fn test_sleep_exclusion_note() {
        let csv = "Activity,Start Time,End Time,Date,Location,Energy Level After,Mood After\n\
                   Sleeping,23:00,07:00,2023-10-09,Home,8,7\n\
                   Sleeping,00:00,06:00,2023-10-10,Home,8,7\n";
        let store = RecordStore::from_csv_str(csv).unwrap();
        let result = compute(Metric::SleepDuration, &store, &AnalyticsConfig::default()).unwrap();
        let text = Explainer::default().explain(&result);
        assert!(text.ends_with("1 sleep record ending before its start was left out."));
    }

    #[test]
    fn test_clock_hour() {
        assert_eq!(clock_hour(0), "midnight");
        assert_eq!(clock_hour(9), "9 am");
        assert_eq!(clock_hour(12), "noon");
        assert_eq!(clock_hour(20), "8 pm");
    }
}
