//! Analysis configuration
//!
//! Every knob has a default matching the dashboard's fixed analyses, so an
//! empty JSON object is a valid configuration.

use crate::error::AnalyticsError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default activity label used to pick out sleep records
pub const DEFAULT_SLEEP_LABEL: &str = "Sleeping";

/// Default number of most recent sleep dates kept
pub const DEFAULT_SLEEP_WINDOW_DAYS: usize = 7;

/// Default number of entries kept by top-K pipelines
pub const DEFAULT_TOP_K: usize = 5;

/// Default number of decimal places for every displayed number
pub const DEFAULT_DISPLAY_PRECISION: usize = 2;

/// Default chrono format for displayed dates
pub const DEFAULT_DATE_DISPLAY_FORMAT: &str = "%b %d, %Y";

const MAX_DISPLAY_PRECISION: usize = 6;

/// Tunable parameters for the metric pipelines and explanation text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Exact, case-sensitive activity label that marks a sleep record
    pub sleep_label: String,
    /// Number of most recent distinct sleep dates to report
    pub sleep_window_days: usize,
    /// Number of entries kept by frequency, duration and location rankings
    pub top_k: usize,
    /// Decimal places used for charts, equations and summaries alike
    pub display_precision: usize,
    /// Format for dates in explanation text and chart labels
    pub date_display_format: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            sleep_label: DEFAULT_SLEEP_LABEL.to_string(),
            sleep_window_days: DEFAULT_SLEEP_WINDOW_DAYS,
            top_k: DEFAULT_TOP_K,
            display_precision: DEFAULT_DISPLAY_PRECISION,
            date_display_format: DEFAULT_DATE_DISPLAY_FORMAT.to_string(),
        }
    }
}

impl AnalyticsConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> Result<Self, AnalyticsError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file
    pub fn from_path(path: &Path) -> Result<Self, AnalyticsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, AnalyticsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values no pipeline can work with
    pub fn validate(&self) -> Result<(), AnalyticsError> {
        if self.top_k == 0 {
            return Err(AnalyticsError::Config("top_k must be at least 1".into()));
        }
        if self.sleep_window_days == 0 {
            return Err(AnalyticsError::Config(
                "sleep_window_days must be at least 1".into(),
            ));
        }
        if self.display_precision > MAX_DISPLAY_PRECISION {
            return Err(AnalyticsError::Config(format!(
                "display_precision must be at most {MAX_DISPLAY_PRECISION}"
            )));
        }
        if self.sleep_label.is_empty() {
            return Err(AnalyticsError::Config("sleep_label must not be empty".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_empty_json_gives_defaults() {
        let config = AnalyticsConfig::from_json("{}").unwrap();
        assert_eq!(config, AnalyticsConfig::default());
    }

    #[test]
    fn test_partial_override() {
        let config = AnalyticsConfig::from_json(r#"{"top_k": 3, "display_precision": 1}"#).unwrap();
        assert_eq!(config.top_k, 3);
        assert_eq!(config.display_precision, 1);
        assert_eq!(config.sleep_label, "Sleeping");
        assert_eq!(config.sleep_window_days, 7);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AnalyticsConfig {
            sleep_window_days: 14,
            ..Default::default()
        };
        let json = config.to_json().unwrap();
        assert_eq!(AnalyticsConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_rejects_zero_top_k() {
        let err = AnalyticsConfig::from_json(r#"{"top_k": 0}"#).unwrap_err();
        assert!(matches!(err, AnalyticsError::Config(_)));
    }

    #[test]
    fn test_rejects_excessive_precision() {
        let config = AnalyticsConfig {
            display_precision: 9,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
