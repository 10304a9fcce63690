//! Daylog Insights - analytics core for a personal activity log dashboard
//!
//! Turns a table of daily activity records into seven fixed analyses, each
//! with a chart specification and a short generated explanation:
//! record store → metric pipeline → result table → chart + explanation.
//!
//! ## Modules
//!
//! - **Record Store**: CSV loading and lazily-parsed typed views of each record
//! - **Metrics**: one pure pipeline per analysis (sleep, frequency, duration,
//!   location share, hourly energy/mood, energy vs mood regression)
//! - **Dispatcher**: the dashboard selection state machine
//! - **Report**: every analysis at once, as JSON or plain text

pub mod chart;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod explain;
pub mod format;
pub mod metrics;
pub mod normalizer;
pub mod report;
pub mod stats;
pub mod store;
pub mod types;

pub use config::AnalyticsConfig;
pub use dispatcher::{Dashboard, DashboardState, Selection, DASHBOARD_TITLE};
pub use error::AnalyticsError;
pub use explain::Explainer;
pub use format::DisplayFormat;
pub use metrics::compute;
pub use report::{AnalysisReport, ReportBuilder};
pub use store::RecordStore;
pub use types::{ChartKind, ChartSpec, Metric, MetricResult, Panel, RenderedMetric};

/// Crate version embedded in reports
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name for reports
pub const PRODUCER_NAME: &str = "daylog-insights";
