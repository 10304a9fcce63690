//! Daylog CLI - command-line front end for Daylog Insights
//!
//! Commands:
//! - options: List the dashboard options
//! - show: Render one dashboard option
//! - report: Render every analysis at once
//! - validate: Check every record of an activity log
//! - config: Print the default configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use daylog_insights::dispatcher::{Selection, DASHBOARD_TITLE};
use daylog_insights::report::{panel_text, ReportBuilder};
use daylog_insights::types::{IssueKind, Panel, RecordIssue};
use daylog_insights::{AnalyticsConfig, AnalyticsError, Dashboard, RecordStore, VERSION};

/// Daylog - charts and explanations over a personal activity log
#[derive(Parser)]
#[command(name = "daylog")]
#[command(version = VERSION)]
#[command(about = "Summarize a personal activity log", long_about = None)]
struct Cli {
    /// Configuration file (JSON)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Number of entries kept by the top-K analyses
    #[arg(long, global = true)]
    top_k: Option<usize>,

    /// Number of most recent nights in the sleep chart
    #[arg(long, global = true)]
    window: Option<usize>,

    /// Decimal places for displayed numbers
    #[arg(long, global = true)]
    precision: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the dashboard options
    Options,

    /// Render one dashboard option
    Show {
        /// Activity log CSV (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Option string, e.g. "Energy vs Mood"
        selection: String,

        /// Output the panel as JSON
        #[arg(long)]
        json: bool,
    },

    /// Render every analysis
    Report {
        /// Activity log CSV (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file path (use - for stdout)
        #[arg(short, long, default_value = "-")]
        output: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        format: OutputFormat,
    },

    /// Check every record of an activity log
    Validate {
        /// Activity log CSV (use - for stdin)
        #[arg(short, long)]
        input: PathBuf,

        /// Output validation report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Configuration helpers
    Config {
        /// Print the default configuration as JSON
        #[arg(long)]
        print_default: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
    /// Plain text
    Text,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliError::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), DaylogCliError> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Options => {
            for option in Selection::options() {
                println!("{option}");
            }
            Ok(())
        }
        Commands::Show {
            input,
            selection,
            json,
        } => cmd_show(&input, &selection, json, config),
        Commands::Report {
            input,
            output,
            format,
        } => cmd_report(&input, &output, format, &config),
        Commands::Validate { input, json } => cmd_validate(&input, json),
        Commands::Config { print_default } => {
            let shown = if print_default {
                AnalyticsConfig::default()
            } else {
                config
            };
            println!("{}", shown.to_json()?);
            Ok(())
        }
    }
}

fn load_config(cli: &Cli) -> Result<AnalyticsConfig, DaylogCliError> {
    let mut config = match &cli.config {
        Some(path) => AnalyticsConfig::from_path(path)?,
        None => AnalyticsConfig::default(),
    };
    if let Some(top_k) = cli.top_k {
        config.top_k = top_k;
    }
    if let Some(window) = cli.window {
        config.sleep_window_days = window;
    }
    if let Some(precision) = cli.precision {
        config.display_precision = precision;
    }
    config.validate()?;
    Ok(config)
}

fn read_store(input: &Path) -> Result<RecordStore, DaylogCliError> {
    if input.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        Ok(RecordStore::from_csv_str(&buffer)?)
    } else {
        Ok(RecordStore::from_csv_path(input)?)
    }
}

fn cmd_show(
    input: &Path,
    selection: &str,
    json: bool,
    config: AnalyticsConfig,
) -> Result<(), DaylogCliError> {
    let store = read_store(input)?;
    let mut dashboard = Dashboard::new(store, config);
    let panel = dashboard.select(selection)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&panel)?);
        return Ok(());
    }

    match &panel {
        Panel::Idle => {
            println!("{DASHBOARD_TITLE}\n");
            println!("{}\n", dashboard.introduction());
            println!("Options:");
            for option in Selection::options().iter().skip(1) {
                println!("  - {option}");
            }
        }
        other => print!("{}", panel_text(other)),
    }
    Ok(())
}

fn cmd_report(
    input: &Path,
    output: &Path,
    format: OutputFormat,
    config: &AnalyticsConfig,
) -> Result<(), DaylogCliError> {
    let store = read_store(input)?;
    let report = ReportBuilder::new().build(&store, config)?;

    let output_data = match format {
        OutputFormat::Json => report.to_json()? + "\n",
        OutputFormat::JsonPretty => report.to_json_pretty()? + "\n",
        OutputFormat::Text => report.to_text(),
    };

    if output.to_string_lossy() == "-" {
        print!("{}", output_data);
    } else {
        fs::write(output, output_data)?;
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct ValidationReport {
    total_records: usize,
    records_with_issues: usize,
    issues: Vec<RecordIssue>,
}

fn cmd_validate(input: &Path, json: bool) -> Result<(), DaylogCliError> {
    let store = read_store(input)?;
    let issues = store.audit();

    let mut rows: Vec<usize> = issues.iter().map(|i| i.row).collect();
    rows.dedup();

    let report = ValidationReport {
        total_records: store.len(),
        records_with_issues: rows.len(),
        issues,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Validation Report");
        println!("=================");
        println!("Total records:       {}", report.total_records);
        println!("Records with issues: {}", report.records_with_issues);

        if !report.issues.is_empty() {
            println!("\nIssues:");
            for issue in &report.issues {
                let note = match issue.kind {
                    IssueKind::NegativeDuration => " (excluded from duration totals)",
                    _ => "",
                };
                println!("  - Row {}: {}{}", issue.row, issue.message, note);
            }
        }
    }

    if report.issues.is_empty() {
        Ok(())
    } else {
        Err(DaylogCliError::ValidationFailed(report.records_with_issues))
    }
}

// Error types

#[derive(Debug)]
enum DaylogCliError {
    Io(io::Error),
    Analytics(AnalyticsError),
    Json(serde_json::Error),
    ValidationFailed(usize),
}

impl From<io::Error> for DaylogCliError {
    fn from(e: io::Error) -> Self {
        DaylogCliError::Io(e)
    }
}

impl From<AnalyticsError> for DaylogCliError {
    fn from(e: AnalyticsError) -> Self {
        DaylogCliError::Analytics(e)
    }
}

impl From<serde_json::Error> for DaylogCliError {
    fn from(e: serde_json::Error) -> Self {
        DaylogCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliError {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<DaylogCliError> for CliError {
    fn from(e: DaylogCliError) -> Self {
        match e {
            DaylogCliError::Io(e) => CliError {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            DaylogCliError::Analytics(e) => {
                let (code, hint) = match &e {
                    AnalyticsError::MissingColumn { .. } => (
                        "MISSING_COLUMN",
                        "The log needs Activity, Start Time, End Time, Date, Location, Energy Level After and Mood After columns",
                    ),
                    AnalyticsError::MalformedTimestamp { .. } => (
                        "MALFORMED_TIMESTAMP",
                        "Run 'daylog validate' to list every unparsable field",
                    ),
                    AnalyticsError::InvalidLevel { .. } => (
                        "INVALID_LEVEL",
                        "Energy and mood levels must be whole numbers from 1 to 10",
                    ),
                    AnalyticsError::Config(_) => {
                        ("CONFIG_ERROR", "Run 'daylog config --print-default' for a template")
                    }
                    AnalyticsError::UnknownSelection(_) => {
                        ("UNKNOWN_SELECTION", "Run 'daylog options' for the option list")
                    }
                    AnalyticsError::Csv(_) => ("CSV_ERROR", "Check the CSV syntax"),
                    _ => ("ANALYTICS_ERROR", "Run 'daylog validate' for details"),
                };
                CliError {
                    code: code.to_string(),
                    message: e.to_string(),
                    hint: Some(hint.to_string()),
                }
            }
            DaylogCliError::Json(e) => CliError {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: None,
            },
            DaylogCliError::ValidationFailed(count) => CliError {
                code: "VALIDATION_FAILED".to_string(),
                message: format!("{} records have problems", count),
                hint: Some("Fix the listed fields and retry".to_string()),
            },
        }
    }
}
