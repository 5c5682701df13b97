//! Submission persistence and run-summary reporting.

use anyhow::Result;
use csv::WriterBuilder;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::predictor::{Airport, PredictionRecord};
use crate::stats::RunSummary;

/// Path of the submission file for `airport` inside `output_dir`.
pub fn submission_path(output_dir: &Path, airport: &Airport) -> PathBuf {
    output_dir.join(format!("{airport}_submission.csv"))
}

/// Writes `ID,Value` rows to any writer. The header is written even when
/// `records` is empty.
pub fn write_predictions(records: &[PredictionRecord], writer: impl Write) -> Result<()> {
    let mut wtr = WriterBuilder::new().has_headers(false).from_writer(writer);

    wtr.write_record(["ID", "Value"])?;
    for record in records {
        wtr.serialize(record)?;
    }
    wtr.flush()?;

    Ok(())
}

/// Replaces the file at `path` with the given predictions.
pub fn write_submission(path: &Path, records: &[PredictionRecord]) -> Result<()> {
    debug!(path = %path.display(), rows = records.len(), "Writing submission");

    let file = File::create(path)?;
    write_predictions(records, std::io::BufWriter::new(file))
}

/// Logs the run summary as pretty-printed JSON.
pub fn print_json(summary: &RunSummary) -> Result<()> {
    info!("{}", serde_json::to_string_pretty(summary)?);
    Ok(())
}
