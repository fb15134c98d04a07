//! Rendering and export of history and trend results.
//!
//! Terminal output for the CLI views, plus TXT/CSV/JSON files a plotting
//! tool can pick up. Nothing here draws charts.

use crate::error::Result;
use crate::models::{format_float, Record, Table, TrendPoint, COLUMNS, DATE_FORMAT};
use crate::store;
use clap::ValueEnum;
use csv::Writer;
use std::fs::{create_dir_all, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Shown when a history or trend query matches no records.
pub const NO_DATA_MESSAGE: &str = "No data available for this user.";

/// Shown when an entry-form submission is rejected.
pub const INVALID_INPUT_MESSAGE: &str = "Please enter valid data.";

/// Output format for exported results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ExportFormat {
    /// Aligned plain text, same as the terminal view
    #[default]
    Txt,
    /// Comma-separated values with a header row
    Csv,
    /// JSON array of objects
    Json,
}

impl ExportFormat {
    /// Get the file extension for this format
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Txt => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }

    /// `path` unchanged if it has an extension, otherwise with this
    /// format's extension added (`alice` becomes `alice.csv`).
    #[must_use]
    pub fn output_path(self, path: &Path) -> PathBuf {
        if path.extension().is_some() {
            path.to_path_buf()
        } else {
            path.with_extension(self.extension())
        }
    }
}

/// BMI with `decimals` places, e.g. `22.49`.
#[must_use]
pub fn format_bmi(bmi: f64, decimals: usize) -> String {
    format!("{bmi:.decimals$}")
}

/// Confirmation line for a stored measurement.
#[must_use]
pub fn submission_message(record: &Record, decimals: usize) -> String {
    format!("{}, your BMI is: {}", record.name, format_bmi(record.bmi, decimals))
}

/// Aligned text table of `table`'s rows under the storage column names.
#[must_use]
pub fn render_history(table: &Table) -> String {
    let rows: Vec<[String; 5]> = table
        .iter()
        .map(|r| {
            [
                r.name.clone(),
                format!("{:.2}", r.height),
                format!("{:.2}", r.weight),
                format!("{:.2}", r.bmi),
                r.date_string(),
            ]
        })
        .collect();

    let mut widths = COLUMNS.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, COLUMNS.iter().copied(), &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize; 5]) {
    let line = cells
        .zip(widths.iter().copied())
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect::<Vec<_>>()
        .join("  ");
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Text rendering of a trend line, one `date  bmi` line per point.
#[must_use]
pub fn render_trend(name: &str, points: &[TrendPoint]) -> String {
    let mut out = format!("BMI Trend for {name}\n");
    for point in points {
        out.push_str(&format!("{}  {:.2}\n", point.date.format(DATE_FORMAT), point.bmi));
    }
    out
}

/// Write history rows to `file_path`.
///
/// CSV output uses the storage layout, so the file can be loaded back
/// by a [`RecordStore`](crate::store::RecordStore).
pub fn export_history(table: &Table, format: ExportFormat, file_path: &Path) -> Result<()> {
    ensure_parent(file_path)?;
    match format {
        ExportFormat::Txt => write_text(&render_history(table), file_path),
        ExportFormat::Csv => {
            let mut writer = Writer::from_path(file_path)?;
            store::write_records(&mut writer, table)
        },
        ExportFormat::Json => write_json(table.records(), file_path),
    }
}

/// Write trend points to `file_path` for an external plotting tool.
///
/// CSV header: `Date,BMI`.
pub fn export_trend(name: &str, points: &[TrendPoint], format: ExportFormat, file_path: &Path) -> Result<()> {
    ensure_parent(file_path)?;
    match format {
        ExportFormat::Txt => write_text(&render_trend(name, points), file_path),
        ExportFormat::Csv => {
            let mut writer = Writer::from_path(file_path)?;
            writer.write_record(["Date", "BMI"])?;
            for point in points {
                writer.write_record([point.date.format(DATE_FORMAT).to_string(), format_float(point.bmi)])?;
            }
            writer.flush()?;
            Ok(())
        },
        ExportFormat::Json => write_json(points, file_path),
    }
}

fn ensure_parent(file_path: &Path) -> Result<()> {
    if let Some(parent) = file_path.parent() {
        if !parent.as_os_str().is_empty() {
            create_dir_all(parent)?;
        }
    }
    Ok(())
}

fn write_text(text: &str, file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;
    Ok(())
}

fn write_json<T: serde::Serialize>(items: &[T], file_path: &Path) -> Result<()> {
    let file = File::create(file_path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, items)?;
    Ok(())
}
