//! The naive bucketed predictor: counts already-scheduled arrivals per
//! bucket for every issue time of a day.

use chrono::{DateTime, NaiveDate, Utc};
use tracing::{debug, info, warn};

use super::counter::ArrivalIndex;
use super::grid::IssueGrid;
use super::id::prediction_id;
use super::ladder::{Bucket, BucketLadder};
use super::types::{Airport, ArrivalRecord, PredictionRecord};
use crate::error::PredictError;

/// Immutable prediction settings: when batches are issued and how far ahead
/// they look.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PredictionConfig {
    pub grid: IssueGrid,
    pub ladder: BucketLadder,
}

impl PredictionConfig {
    pub fn new(
        first_issue_hour: u32,
        issue_interval_hours: u32,
        bucket_minutes: u32,
        horizon_minutes: u32,
    ) -> Result<Self, PredictError> {
        Ok(Self {
            grid: IssueGrid::new(first_issue_hour, issue_interval_hours)?,
            ladder: BucketLadder::new(bucket_minutes, horizon_minutes)?,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct NaivePredictor {
    config: PredictionConfig,
}

impl NaivePredictor {
    pub fn new(config: PredictionConfig) -> Self {
        Self { config }
    }

    /// Number of records produced for every airport-day.
    pub fn records_per_day(&self, date: NaiveDate) -> usize {
        self.config.grid.issue_times(date).len() * self.config.ladder.len()
    }

    /// Predicts every (issue time, bucket) slot of `date` for `airport`.
    ///
    /// Rows are ordered by issue time, then by bucket upper bound. An empty
    /// `arrivals` table yields the same identifiers with every value zero.
    pub fn predict(
        &self,
        airport: &Airport,
        date: NaiveDate,
        arrivals: &[ArrivalRecord],
    ) -> Vec<PredictionRecord> {
        debug!(%airport, %date, "Generating predictions");

        if arrivals.is_empty() {
            warn!(%airport, %date, "No arrivals data, generating zero predictions");
            return self.zero_predictions(airport, date);
        }

        let index = ArrivalIndex::new(arrivals);
        let records: Vec<_> = self
            .slots(date)
            .map(|(issue_time, bucket)| PredictionRecord {
                id: prediction_id(airport, issue_time, bucket.upper_minutes),
                value: index.count(issue_time, bucket),
            })
            .collect();

        info!(%airport, %date, count = records.len(), "Generated predictions");
        records
    }

    /// Every slot of `date` with a zero count.
    pub fn zero_predictions(&self, airport: &Airport, date: NaiveDate) -> Vec<PredictionRecord> {
        let records: Vec<_> = self
            .slots(date)
            .map(|(issue_time, bucket)| PredictionRecord {
                id: prediction_id(airport, issue_time, bucket.upper_minutes),
                value: 0,
            })
            .collect();

        info!(%airport, %date, count = records.len(), "Generated zero predictions");
        records
    }

    fn slots(&self, date: NaiveDate) -> impl Iterator<Item = (DateTime<Utc>, Bucket)> + '_ {
        self.config
            .grid
            .issue_times(date)
            .into_iter()
            .flat_map(|t| self.config.ladder.buckets().iter().map(move |b| (t, *b)))
    }
}
