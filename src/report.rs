//! Full analysis report
//!
//! Runs every metric once over a record store and wraps the panels in an
//! envelope with producer metadata and a generation timestamp.

use crate::config::AnalyticsConfig;
use crate::dispatcher::{introduction, render, DASHBOARD_TITLE};
use crate::error::AnalyticsError;
use crate::store::RecordStore;
use crate::types::{Metric, Panel};
use crate::{PRODUCER_NAME, VERSION};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportProducer {
    pub name: String,
    pub version: String,
    pub instance_id: String,
}

/// Every dashboard panel computed over one log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub producer: ReportProducer,
    pub generated_at_utc: String,
    pub title: String,
    pub introduction: String,
    pub source_rows: usize,
    pub panels: Vec<Panel>,
}

/// Builds [`AnalysisReport`]s tagged with one instance id
pub struct ReportBuilder {
    instance_id: String,
}

impl Default for ReportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self {
            instance_id: Uuid::new_v4().to_string(),
        }
    }

    pub fn with_instance_id(instance_id: String) -> Self {
        Self { instance_id }
    }

    /// Compute every metric in dashboard order.
    ///
    /// Metrics without enough data become `NotEnoughData` panels; malformed
    /// records abort the report.
    pub fn build(
        &self,
        store: &RecordStore,
        config: &AnalyticsConfig,
    ) -> Result<AnalysisReport, AnalyticsError> {
        let panels = Metric::ALL
            .into_iter()
            .map(|metric| render(metric, store, config))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(AnalysisReport {
            producer: ReportProducer {
                name: PRODUCER_NAME.to_string(),
                version: VERSION.to_string(),
                instance_id: self.instance_id.clone(),
            },
            generated_at_utc: Utc::now().to_rfc3339(),
            title: DASHBOARD_TITLE.to_string(),
            introduction: introduction(store, config),
            source_rows: store.len(),
            panels,
        })
    }
}

impl AnalysisReport {
    pub fn to_json(&self) -> Result<String, AnalyticsError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn to_json_pretty(&self) -> Result<String, AnalyticsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Plain-text rendering: one section per panel
    pub fn to_text(&self) -> String {
        let mut out = format!("{}\n\n{}\n", self.title, self.introduction);
        for panel in &self.panels {
            out.push('\n');
            out.push_str(&panel_text(panel));
        }
        out
    }
}

/// Plain-text rendering of a single panel
pub fn panel_text(panel: &Panel) -> String {
    match panel {
        Panel::Idle => String::new(),
        Panel::Rendered(rendered) => {
            let chart = &rendered.chart;
            let mut out = format!("## {}\n\n", chart.title);
            if let Some(subtitle) = &chart.subtitle {
                out.push_str(&format!("{subtitle}\n\n"));
            }
            out.push_str(&format!("{:<28}{}\n", chart.x_label, chart.y_label));
            for point in &chart.points {
                out.push_str(&format!("{:<28}{}\n", point.x, point.y));
            }
            out.push('\n');
            out.push_str(&rendered.explanation);
            out.push('\n');
            for detail in &rendered.details {
                out.push('\n');
                out.push_str(detail);
                out.push('\n');
            }
            out
        }
        Panel::NotEnoughData { metric, reason } => {
            format!("## {}\n\nNot enough data: {reason}\n", metric.title())
        }
    }
}
