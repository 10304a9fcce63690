//! Selection dispatcher
//!
//! The dashboard is a small state machine: it starts `Idle`, and each
//! selection either returns it to `Idle` or moves it to `Showing(metric)`
//! after running that metric's pipeline once. Nothing is cached, so a
//! repeated selection recomputes from the record store.

use crate::chart::build_chart;
use crate::config::AnalyticsConfig;
use crate::error::AnalyticsError;
use crate::explain::Explainer;
use crate::format::DisplayFormat;
use crate::metrics::compute;
use crate::store::RecordStore;
use crate::types::{Metric, Panel, RenderedMetric};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, info};

/// Dashboard header
pub const DASHBOARD_TITLE: &str = "Personal Activity Dashboard";

/// Placeholder option that shows nothing
pub const NO_SELECTION: &str = "Select an option";

/// One of the eight dashboard options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection {
    None,
    Metric(Metric),
}

impl Selection {
    /// Every option in display order, placeholder first
    pub fn options() -> Vec<Selection> {
        std::iter::once(Selection::None)
            .chain(Metric::ALL.into_iter().map(Selection::Metric))
            .collect()
    }

    /// The literal option string
    pub fn label(&self) -> &'static str {
        match self {
            Selection::None => NO_SELECTION,
            Selection::Metric(metric) => metric.title(),
        }
    }

    /// Match an option string exactly; anything unrecognized is `None`
    pub fn parse(input: &str) -> Option<Selection> {
        Self::options()
            .into_iter()
            .find(|option| option.label() == input)
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Selection {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| AnalyticsError::UnknownSelection(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DashboardState {
    Idle,
    Showing(Metric),
}

/// Dispatches selections against one loaded activity log
pub struct Dashboard {
    store: RecordStore,
    config: AnalyticsConfig,
    state: DashboardState,
}

impl Dashboard {
    pub fn new(store: RecordStore, config: AnalyticsConfig) -> Self {
        Self {
            store,
            config,
            state: DashboardState::Idle,
        }
    }

    pub fn state(&self) -> DashboardState {
        self.state
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn config(&self) -> &AnalyticsConfig {
        &self.config
    }

    /// Handle a raw option string.
    ///
    /// Unknown strings degrade to `Idle`. Too little data for the chosen
    /// metric yields `Panel::NotEnoughData`; malformed records are errors.
    pub fn select(&mut self, input: &str) -> Result<Panel, AnalyticsError> {
        match Selection::parse(input) {
            Some(selection) => self.dispatch(selection),
            None => {
                debug!(input, "unrecognized selection, returning to idle");
                self.dispatch(Selection::None)
            }
        }
    }

    /// Handle an already-parsed selection
    pub fn dispatch(&mut self, selection: Selection) -> Result<Panel, AnalyticsError> {
        let metric = match selection {
            Selection::None => {
                self.state = DashboardState::Idle;
                return Ok(Panel::Idle);
            }
            Selection::Metric(metric) => metric,
        };

        self.state = DashboardState::Showing(metric);
        info!(metric = metric.as_str(), "rendering metric");
        render(metric, &self.store, &self.config)
    }

    /// Dashboard introduction naming the covered period
    pub fn introduction(&self) -> String {
        introduction(&self.store, &self.config)
    }
}

/// Run one metric end to end: pipeline, chart and explanation
pub fn render(
    metric: Metric,
    store: &RecordStore,
    config: &AnalyticsConfig,
) -> Result<Panel, AnalyticsError> {
    let result = match compute(metric, store, config) {
        Ok(result) => result,
        Err(AnalyticsError::InsufficientData(reason)) => {
            info!(metric = metric.as_str(), %reason, "not enough data");
            return Ok(Panel::NotEnoughData { metric, reason });
        }
        Err(e) => return Err(e),
    };

    let chart = build_chart(metric, &result, config);
    let explainer = Explainer::new(DisplayFormat::from(config));

    Ok(Panel::Rendered(RenderedMetric {
        metric,
        chart,
        explanation: explainer.explain(&result),
        details: explainer.details(&result),
        result,
    }))
}

/// Introduction text for the dashboard header
pub fn introduction(store: &RecordStore, config: &AnalyticsConfig) -> String {
    let fmt = DisplayFormat::from(config);
    let period = match store.date_range() {
        Some((first, last)) => format!("from {} to {}", fmt.date(first), fmt.date(last)),
        None => "with no dated entries yet".to_string(),
    };
    format!(
        "This dashboard summarizes a personal activity log of {} entries {period}. \
         Each entry records an activity, when and where it happened, and the energy \
         and mood levels that followed it. Pick an option to see a chart of one aspect \
         of the log together with a short explanation of what it shows.",
        store.len()
    )
}
