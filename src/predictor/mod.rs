//! Baseline arrival-count forecasting.
//!
//! For each UTC day a fixed [`IssueGrid`] yields the issue times, a
//! [`BucketLadder`] splits the window after each issue time into
//! contiguous half-open buckets, and [`NaivePredictor`] counts the
//! scheduled arrivals landing in each bucket.

pub mod counter;
pub mod grid;
pub mod id;
pub mod ladder;
pub mod naive;
pub mod types;

pub use counter::{ArrivalIndex, count_arrivals};
pub use grid::IssueGrid;
pub use id::prediction_id;
pub use ladder::{Bucket, BucketLadder};
pub use naive::{NaivePredictor, PredictionConfig};
pub use types::{Airport, ArrivalRecord, PredictionRecord};
