//! CLI entry point for the e-commerce order dashboard.
//!
//! Loads the joined orders dataset once, applies the requested date window and
//! prints or exports the derived tables.

use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use ecommerce_dashboard::{
    config::DashboardConfig,
    loader::load_records,
    output::{export_view, print_pretty, render_report, to_json},
    session::{Dashboard, DashboardView},
};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ecommerce_dashboard")]
#[command(
    about = "Order, category and review summaries for an e-commerce dataset",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Selection {
    /// Path to the joined dataset CSV (optionally .gz); defaults to DASHBOARD_DATA_PATH
    #[arg(short, long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// First approval day to include (YYYY-MM-DD); defaults to the earliest in the dataset
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last approval day to include (YYYY-MM-DD); defaults to the latest in the dataset
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Insert zero-activity days so the daily series covers the whole window
    #[arg(long, default_value_t = false)]
    fill_gaps: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the dashboard tables for a date window
    Report {
        #[command(flatten)]
        selection: Selection,

        /// Number of best and least selling categories to show
        #[arg(short, long)]
        top: Option<usize>,

        /// Emit JSON instead of the text report
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write the dashboard tables as CSV files
    Export {
        #[command(flatten)]
        selection: Selection,

        /// Directory to write the CSV files into
        #[arg(short, long, default_value = "dashboard")]
        out_dir: PathBuf,
    },
    /// Print the default date window of the dataset
    Range {
        /// Path to the joined dataset CSV (optionally .gz)
        #[arg(short, long, value_name = "FILE")]
        data: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let config = DashboardConfig::from_env()?;

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = config
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = config
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("ecommerce_dashboard.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Report {
            selection,
            top,
            json,
        } => {
            let view = build_view(&config, &selection)?;
            print_pretty(&view);

            if json {
                println!("{}", to_json(&view)?);
            } else {
                print!("{}", render_report(&view, top.unwrap_or(config.top_n))?);
            }
        }
        Commands::Export { selection, out_dir } => {
            let view = build_view(&config, &selection)?;
            let files = export_view(&out_dir, &view)?;

            for file in &files {
                println!("{}", file.display());
            }
        }
        Commands::Range { data } => {
            let path = data.unwrap_or_else(|| config.data_path.clone());
            let dashboard = Dashboard::new(load_records(&path)?);
            let window = dashboard.default_window()?;

            info!(
                start = %window.start(),
                end = %window.end(),
                days = window.num_days(),
                "Dataset range"
            );
            println!("{} {}", window.start(), window.end());
        }
    }

    Ok(())
}

/// Loads the dataset and derives the view for the selected window. Missing
/// bounds fall back to the dataset's own first and last approval day.
#[tracing::instrument(skip_all)]
fn build_view(config: &DashboardConfig, selection: &Selection) -> Result<DashboardView> {
    let path = selection.data.as_ref().unwrap_or(&config.data_path);
    let dashboard = Dashboard::new(load_records(path)?);

    let window = dashboard.resolve_window(selection.start, selection.end)?;

    let mut view = dashboard.view(window);
    if selection.fill_gaps {
        view.daily = view.daily.fill_window(&window);
    }

    Ok(view)
}
