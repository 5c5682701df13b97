//! CLI entry point for the naive arrival forecaster.
//!
//! Provides subcommands for running the full batch over a FUSER data
//! directory, listing the airports and dates it contains, and predicting a
//! single airport-day.

use anyhow::Result;
use arrival_forecast::{
    discovery::{arrivals_file_name, discover, parse_date},
    output::{print_json, write_predictions, write_submission},
    pipeline::{RunOptions, predict_day, run},
    predictor::{Airport, NaivePredictor},
    settings::{Mode, Settings},
};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
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
#[command(name = "arrival_forecast")]
#[command(about = "Naive bucketed forecast of airport arrival counts", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict every airport-day and write one submission CSV per airport
    Predict {
        /// Dataset to read
        #[arg(short, long, value_enum, default_value_t = Mode::Train)]
        mode: Mode,

        /// Data directory (overrides FUSER_TRAIN_DIR / FUSER_TEST_DIR)
        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// Output directory (overrides SUBMISSION_OUTPUT_DIR)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Only process these airports (repeatable)
        #[arg(short, long = "airport", value_name = "AIRPORT")]
        airports: Vec<Airport>,

        /// Maximum number of airports processed at once
        #[arg(short, long, default_value_t = 4)]
        concurrency: usize,

        /// Fail the run if any data file name is rejected
        #[arg(long, default_value_t = false)]
        strict: bool,
    },
    /// List airports and dates found in the data directory
    ListAirports {
        #[arg(short, long, value_enum, default_value_t = Mode::Train)]
        mode: Mode,

        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Predict a single airport-day
    Day {
        #[arg(value_name = "AIRPORT")]
        airport: Airport,

        /// Date as YYYY-MM-DD
        #[arg(value_name = "DATE", value_parser = parse_date)]
        date: NaiveDate,

        /// Arrivals file (defaults to the canonical file in the data directory)
        #[arg(short, long)]
        file: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value_t = Mode::Train)]
        mode: Mode,

        #[arg(short, long)]
        data_dir: Option<PathBuf>,

        /// CSV file to write; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    let settings = Settings::from_env();

    // Logging setup: colored stderr + JSON rolling log file
    let log_dir = settings
        .log_file_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("logs"));
    let log_file_name = settings
        .log_file_path
        .file_name()
        .unwrap_or(OsStr::new("arrival_forecast.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| EnvFilter::new(&settings.log_level)),
        );

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(
            EnvFilter::try_from_env("RUST_LOG_JSON").unwrap_or_else(|_| EnvFilter::new("debug")),
        );

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Predict {
            mode,
            data_dir,
            output_dir,
            airports,
            concurrency,
            strict,
        } => {
            info!(%mode, "Starting naive predictor");

            let options = RunOptions {
                mode,
                data_dir: data_dir.unwrap_or_else(|| settings.data_dir(mode).to_path_buf()),
                output_dir: output_dir.unwrap_or_else(|| settings.output_dir.clone()),
                airports,
                concurrency,
                strict,
                prediction: settings.prediction.clone(),
            };

            let summary = run(options).await?;
            print_json(&summary)?;
        }
        Commands::ListAirports { mode, data_dir } => {
            let data_dir = data_dir.unwrap_or_else(|| settings.data_dir(mode).to_path_buf());
            let inventory = discover(&data_dir)?;

            for entry in &inventory.airports {
                info!(
                    airport = %entry.airport,
                    dates = entry.days.len(),
                    first = ?entry.days.first().map(|d| d.date),
                    last = ?entry.days.last().map(|d| d.date),
                    "Airport"
                );
            }

            info!(
                airports = inventory.airports.len(),
                rejected = inventory.rejected.len(),
                "Airport list summary"
            );
        }
        Commands::Day {
            airport,
            date,
            file,
            mode,
            data_dir,
            output,
        } => {
            let path = file.unwrap_or_else(|| {
                data_dir
                    .unwrap_or_else(|| settings.data_dir(mode).to_path_buf())
                    .join(airport.as_str())
                    .join(arrivals_file_name(&airport, date))
            });

            let predictor = NaivePredictor::new(settings.prediction.clone());
            let (records, outcome) = predict_day(&predictor, &airport, date, &path);
            info!(%airport, %date, ?outcome, "Day predicted");

            match output {
                Some(output) => write_submission(&output, &records)?,
                None => write_predictions(&records, std::io::stdout().lock())?,
            }
        }
    }

    Ok(())
}
