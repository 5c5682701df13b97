//! The fixed ladder of contiguous future buckets following an issue time.

use crate::error::PredictError;

/// Half-open window `[issue + lower_minutes, issue + upper_minutes)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Bucket {
    pub lower_minutes: u32,
    pub upper_minutes: u32,
}

/// Contiguous, non-overlapping buckets of `step_minutes` covering
/// `horizon_minutes` after an issue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BucketLadder {
    buckets: Vec<Bucket>,
}

impl BucketLadder {
    /// Largest upper bound that still fits the three-digit identifier field.
    pub const MAX_HORIZON_MINUTES: u32 = 999;

    pub fn new(step_minutes: u32, horizon_minutes: u32) -> Result<Self, PredictError> {
        if step_minutes == 0 {
            return Err(PredictError::InvalidConfig(
                "bucket step must be at least one minute".into(),
            ));
        }
        if horizon_minutes == 0 || horizon_minutes % step_minutes != 0 {
            return Err(PredictError::InvalidConfig(format!(
                "horizon of {horizon_minutes} minutes is not a positive multiple of {step_minutes}"
            )));
        }
        if horizon_minutes > Self::MAX_HORIZON_MINUTES {
            return Err(PredictError::InvalidConfig(format!(
                "horizon of {horizon_minutes} minutes exceeds {}",
                Self::MAX_HORIZON_MINUTES
            )));
        }

        let mut buckets = Vec::new();
        let mut lower_minutes = 0;
        for upper_minutes in (step_minutes..=horizon_minutes).step_by(step_minutes as usize) {
            buckets.push(Bucket {
                lower_minutes,
                upper_minutes,
            });
            lower_minutes = upper_minutes;
        }

        Ok(Self { buckets })
    }

    pub fn buckets(&self) -> &[Bucket] {
        &self.buckets
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}

impl Default for BucketLadder {
    /// Twelve 15-minute buckets covering three hours.
    fn default() -> Self {
        let buckets = (1..=12)
            .map(|i| Bucket {
                lower_minutes: (i - 1) * 15,
                upper_minutes: i * 15,
            })
            .collect();
        Self { buckets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_ladder() {
        let ladder = BucketLadder::default();
        let uppers: Vec<u32> = ladder.buckets().iter().map(|b| b.upper_minutes).collect();

        assert_eq!(
            uppers,
            vec![15, 30, 45, 60, 75, 90, 105, 120, 135, 150, 165, 180]
        );
        assert_eq!(ladder.buckets()[0].lower_minutes, 0);
        assert!(
            ladder
                .buckets()
                .windows(2)
                .all(|w| w[0].upper_minutes == w[1].lower_minutes)
        );
        assert_eq!(ladder.buckets().last().unwrap().upper_minutes, 180);
    }

    #[test]
    fn test_new_matches_default() {
        assert_eq!(BucketLadder::new(15, 180).unwrap(), BucketLadder::default());
    }

    #[test]
    fn test_invalid_ladders() {
        assert!(BucketLadder::new(0, 180).is_err());
        assert!(BucketLadder::new(15, 0).is_err());
        assert!(BucketLadder::new(15, 100).is_err());
        assert!(BucketLadder::new(15, 1005).is_err());
    }
}
