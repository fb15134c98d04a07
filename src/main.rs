use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};

use bmi_tracker::config::AppConfig;
use bmi_tracker::logging::init_logging;
use bmi_tracker::report::{self, ExportFormat, INVALID_INPUT_MESSAGE, NO_DATA_MESSAGE};
use bmi_tracker::{BmiError, RecordStore, TrackerService};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// CSV file holding the records (overrides storage.data_file)
    #[arg(long, global = true, value_name = "FILE")]
    data_file: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Calculate a BMI and record it
    Add {
        /// Name of the person
        #[arg(short, long)]
        name: String,

        /// Height in centimeters
        #[arg(long, allow_negative_numbers = true)]
        height: f64,

        /// Weight in kilograms
        #[arg(long, allow_negative_numbers = true)]
        weight: f64,
    },
    /// Show every recorded measurement for a person
    History {
        /// Name to look up (exact, case-sensitive)
        #[arg(short, long)]
        name: String,

        /// Output format when writing to a file
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Txt)]
        format: ExportFormat,

        /// Write the result to this file instead of the terminal (the format's
        /// extension is added when the name has none)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Show the BMI trend for a person in recording order
    Trend {
        /// Name to look up (exact, case-sensitive)
        #[arg(short, long)]
        name: String,

        /// Output format when writing to a file
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Txt)]
        format: ExportFormat,

        /// Write the points to this file instead of the terminal (the format's
        /// extension is added when the name has none)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

impl Cli {
    fn log_level(&self, config: &AppConfig) -> String {
        if self.quiet {
            return "error".to_string();
        }
        match self.verbose {
            0 => config.logging.level.clone(),
            1 => "debug".to_string(),
            _ => "trace".to_string(),
        }
    }
}

fn main() -> Result<ExitCode> {
    // Parse command line arguments
    let cli = Cli::parse();

    // Load configuration
    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize logging
    let log_dir = config.logging.file_path.as_deref().map(Path::new);
    let _log_guard = init_logging(Some(cli.log_level(&config).as_str()), log_dir, config.logging.format == "json")?;

    let data_file = cli.data_file.clone().unwrap_or_else(|| config.data_file());
    info!(data_file = %data_file.display(), "Starting bmi-tracker");
    let service = TrackerService::new(RecordStore::new(data_file));

    match &cli.command {
        Commands::Add { name, height, weight } => add_measurement(&service, &config, name, *height, *weight),
        Commands::History { name, format, output } => show_history(&service, name, *format, output.as_deref()),
        Commands::Trend { name, format, output } => show_trend(&service, name, *format, output.as_deref()),
    }
}

/// Validate, compute and store one measurement
fn add_measurement(service: &TrackerService, config: &AppConfig, name: &str, height: f64, weight: f64) -> Result<ExitCode> {
    match service.submit(name, height, weight) {
        Ok(record) => {
            emit(&report::submission_message(&record, config.display.decimals));
            Ok(ExitCode::SUCCESS)
        },
        Err(BmiError::InvalidInput(reason)) => {
            warn!("{}", reason);
            emit(INVALID_INPUT_MESSAGE);
            Ok(ExitCode::FAILURE)
        },
        Err(e) => Err(e).context("Failed to record measurement"),
    }
}

/// Print or export the history for a person
fn show_history(service: &TrackerService, name: &str, format: ExportFormat, output: Option<&Path>) -> Result<ExitCode> {
    let rows = service.history(name).context("Failed to load history")?;
    if rows.is_empty() {
        emit(NO_DATA_MESSAGE);
        return Ok(ExitCode::SUCCESS);
    }

    match output {
        Some(path) => {
            let path = format.output_path(path);
            report::export_history(&rows, format, &path)
                .with_context(|| format!("Failed to write history to {}", path.display()))?;
            info!(rows = rows.len(), path = %path.display(), "Exported history");
        },
        None => emit(report::render_history(&rows).trim_end()),
    }
    Ok(ExitCode::SUCCESS)
}

/// Print or export the trend points for a person
fn show_trend(service: &TrackerService, name: &str, format: ExportFormat, output: Option<&Path>) -> Result<ExitCode> {
    let points = service.trend(name).context("Failed to load trend")?;
    if points.is_empty() {
        emit(NO_DATA_MESSAGE);
        return Ok(ExitCode::SUCCESS);
    }

    match output {
        Some(path) => {
            let path = format.output_path(path);
            report::export_trend(name, &points, format, &path)
                .with_context(|| format!("Failed to write trend to {}", path.display()))?;
            info!(points = points.len(), path = %path.display(), "Exported trend");
        },
        None => emit(report::render_trend(name, &points).trim_end()),
    }
    Ok(ExitCode::SUCCESS)
}

#[allow(clippy::print_stdout)]
fn emit(text: &str) {
    println!("{text}");
}
