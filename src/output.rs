//! Rendering and persistence for dashboard views.
//!
//! Supports a plain-text report, JSON serialization, and CSV export of each
//! derived table.

use anyhow::{Context, Result};
use csv::WriterBuilder;
use serde::Serialize;
use std::fmt::{self, Write as _};
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::session::DashboardView;

pub const DAILY_ORDERS_FILE: &str = "daily_orders.csv";
pub const CATEGORY_COUNTS_FILE: &str = "category_counts.csv";
pub const REVIEW_SCORES_FILE: &str = "review_scores.csv";

/// Logs a view using Rust's debug pretty-print format.
pub fn print_pretty(view: &DashboardView) {
    debug!("{:#?}", view);
}

/// Serializes a view as pretty-printed JSON.
pub fn to_json(view: &DashboardView) -> Result<String> {
    Ok(serde_json::to_string_pretty(view)?)
}

/// Renders a view as a plain-text report with `top_n` best and worst
/// selling categories. The most common review score is marked with `*`.
pub fn render_report(view: &DashboardView, top_n: usize) -> Result<String, fmt::Error> {
    let mut out = String::new();

    writeln!(
        out,
        "Period {} .. {}: {} orders, {} items, revenue {:.2}",
        view.window.start(),
        view.window.end(),
        view.order_count,
        view.row_count,
        view.revenue
    )?;

    writeln!(out, "\nBest selling categories")?;
    for c in view.categories.top(top_n) {
        writeln!(out, "  {:<40} {:>8}", c.category, c.item_count)?;
    }

    writeln!(out, "\nLeast selling categories")?;
    for c in view.categories.bottom(top_n) {
        writeln!(out, "  {:<40} {:>8}", c.category, c.item_count)?;
    }

    writeln!(out, "\nDaily orders")?;
    for d in view.daily.days() {
        writeln!(out, "  {}  {:>6} orders  {:>12.2}", d.date, d.order_count, d.revenue)?;
    }

    writeln!(out, "\nReview scores")?;
    let mode = view.reviews.mode();
    for r in view.reviews.counts() {
        let marker = if Some(r.score) == mode { '*' } else { ' ' };
        writeln!(out, " {marker}{} {:>8}", r.score, r.count)?;
    }
    match mode {
        Some(score) => writeln!(out, "Most common score: {score}")?,
        None => writeln!(out, "Most common score: no data")?,
    }

    if view.row_count == 0 {
        writeln!(out, "\nNo orders approved in this period.")?;
    }

    Ok(out)
}

/// Writes `rows` to a fresh CSV file at `path`, header first.
pub fn write_csv<T: Serialize>(path: &Path, rows: impl IntoIterator<Item = T>) -> Result<()> {
    debug!(path = %path.display(), "Writing CSV");

    let file = File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    Ok(())
}

/// Exports the three derived tables of `view` into `dir`, creating it if
/// needed. Returns the files written.
pub fn export_view(dir: &Path, view: &DashboardView) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;

    let daily = dir.join(DAILY_ORDERS_FILE);
    write_csv(&daily, view.daily.days())?;

    let categories = dir.join(CATEGORY_COUNTS_FILE);
    write_csv(&categories, view.categories.as_slice())?;

    let reviews = dir.join(REVIEW_SCORES_FILE);
    write_csv(&reviews, view.reviews.counts())?;

    info!(dir = %dir.display(), "Exported dashboard tables");
    Ok(vec![daily, categories, reviews])
}
