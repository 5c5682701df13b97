//! Batch orchestration: discover airport-days, load arrivals, predict and
//! write one submission per airport.
//!
//! Airports are independent, so they are processed concurrently (bounded by
//! a semaphore). A day whose arrivals cannot be loaded falls back to zero
//! predictions, and a submission that cannot be written is recorded in the
//! summary without stopping the other airports.

use anyhow::{Context, Result, bail};
use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{Instrument, debug, error, info, warn};

use crate::discovery::{AirportDays, discover};
use crate::loader::load_scheduled_arrivals;
use crate::output::{submission_path, write_submission};
use crate::predictor::{Airport, NaivePredictor, PredictionConfig, PredictionRecord};
use crate::settings::Mode;
use crate::stats::{AirportSummary, RunSummary};

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub mode: Mode,
    pub data_dir: PathBuf,
    pub output_dir: PathBuf,
    /// Only process these airports; empty means all.
    pub airports: Vec<Airport>,
    pub concurrency: usize,
    /// Abort when any data file name was rejected.
    pub strict: bool,
    pub prediction: PredictionConfig,
}

/// How the arrivals for a day were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayOutcome {
    Loaded(usize),
    NoArrivals,
    LoadFailed,
}

/// Predicts one airport-day from the arrivals file at `path`.
///
/// A load failure is logged and replaced by an empty arrivals table, so the
/// day always yields a full set of records.
pub fn predict_day(
    predictor: &NaivePredictor,
    airport: &Airport,
    date: NaiveDate,
    path: &Path,
) -> (Vec<PredictionRecord>, DayOutcome) {
    let (arrivals, outcome) = match load_scheduled_arrivals(path) {
        Ok(arrivals) if arrivals.is_empty() => (arrivals, DayOutcome::NoArrivals),
        Ok(arrivals) => {
            let n = arrivals.len();
            (arrivals, DayOutcome::Loaded(n))
        }
        Err(e) => {
            warn!(%airport, %date, error = %e, "Failed to load scheduled arrivals");
            (Vec::new(), DayOutcome::LoadFailed)
        }
    };

    (predictor.predict(airport, date, &arrivals), outcome)
}

/// Predicts every day of one airport and writes its submission file.
pub fn process_airport(
    predictor: &NaivePredictor,
    airport_days: &AirportDays,
    output_dir: &Path,
) -> AirportSummary {
    let airport = &airport_days.airport;
    info!(%airport, days = airport_days.days.len(), "Processing airport");

    let mut summary = AirportSummary::new(airport.clone());
    let mut records = Vec::new();

    for day in &airport_days.days {
        debug!(date = %day.date, "Processing date");
        let (day_records, outcome) = predict_day(predictor, airport, day.date, &day.path);

        match outcome {
            DayOutcome::Loaded(_) => {}
            DayOutcome::NoArrivals => summary.zero_fallback_days += 1,
            DayOutcome::LoadFailed => {
                summary.zero_fallback_days += 1;
                summary.load_failures += 1;
            }
        }
        summary.days += 1;
        records.extend(day_records);
    }

    let path = submission_path(output_dir, airport);
    match write_submission(&path, &records) {
        Ok(()) => {
            info!(%airport, path = %path.display(), rows = records.len(), "Saved submission");
            summary.records = records.len();
            summary.output_path = Some(path);
        }
        Err(e) => {
            error!(%airport, path = %path.display(), error = %e, "Failed to save submission");
            summary = summary.with_error(&format!("{e:#}"));
        }
    }

    summary
}

/// Runs the full batch and returns its summary.
///
/// # Errors
///
/// Fails when the data directory cannot be enumerated, when the output
/// directory cannot be created, or in strict mode when a data file was
/// rejected. Per-day and per-airport failures are reported in the summary.
#[tracing::instrument(skip(options), fields(mode = %options.mode, data_dir = %options.data_dir.display()))]
pub async fn run(options: RunOptions) -> Result<RunSummary> {
    let started_at = Utc::now();

    let mut inventory = discover(&options.data_dir)
        .with_context(|| format!("failed to retrieve airports and dates from {}", options.data_dir.display()))?;

    if options.strict && !inventory.rejected.is_empty() {
        bail!(
            "{} data file(s) rejected, first: {} ({})",
            inventory.rejected.len(),
            inventory.rejected[0].path.display(),
            inventory.rejected[0].reason
        );
    }

    inventory.retain_airports(&options.airports);
    info!(airport_count = inventory.airports.len(), "Found airports to process");

    std::fs::create_dir_all(&options.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            options.output_dir.display()
        )
    })?;

    let predictor = Arc::new(NaivePredictor::new(options.prediction.clone()));
    let semaphore = Arc::new(tokio::sync::Semaphore::new(options.concurrency.max(1)));

    let mut tasks = Vec::new();

    for airport_days in inventory.airports {
        let airport = airport_days.airport.clone();
        let sem = semaphore.clone();
        let predictor = predictor.clone();
        let output_dir = options.output_dir.clone();

        let airport_span = tracing::info_span!("process_airport", airport = %airport);

        let task = tokio::spawn(
            async move {
                let _permit = sem.acquire_owned().await?;
                let span = tracing::Span::current();

                let summary = tokio::task::spawn_blocking(move || {
                    span.in_scope(|| process_airport(&predictor, &airport_days, &output_dir))
                })
                .await?;

                anyhow::Ok(summary)
            }
            .instrument(airport_span),
        );

        tasks.push((airport, task));
    }

    let mut airports = Vec::with_capacity(tasks.len());
    for (airport, task) in tasks {
        let summary = match task.await {
            Ok(Ok(summary)) => summary,
            Ok(Err(e)) => {
                error!(%airport, error = %e, "Airport processing failed");
                AirportSummary::new(airport).with_error(&e.to_string())
            }
            Err(e) => {
                error!(%airport, error = %e, "Airport task panicked or was cancelled");
                AirportSummary::new(airport).with_error(&e.to_string())
            }
        };
        airports.push(summary);
    }

    let summary = RunSummary {
        mode: options.mode,
        data_dir: options.data_dir,
        output_dir: options.output_dir,
        started_at,
        finished_at: Some(Utc::now()),
        airports,
        rejected_files: inventory.rejected,
    };

    info!(
        airports = summary.airports.len(),
        records = summary.total_records(),
        failed = summary.failed_airports(),
        rejected = summary.rejected_files.len(),
        "Naive predictor completed"
    );

    Ok(summary)
}
