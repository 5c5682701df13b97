//! Issue-time grid: the fixed points of a UTC day at which a batch of
//! predictions is issued.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeDelta, Utc};

use crate::error::PredictError;

const LAST_SECOND: NaiveTime = match NaiveTime::from_hms_opt(23, 59, 59) {
    Some(t) => t,
    None => panic!("23:59:59 is a valid time"),
};

const DEFAULT_FIRST_ISSUE: NaiveTime = match NaiveTime::from_hms_opt(1, 0, 0) {
    Some(t) => t,
    None => panic!("01:00 is a valid time"),
};

/// Evenly spaced issue times starting at a fixed hour of each UTC day.
///
/// The default grid starts at 01:00 and steps every 4 hours, giving
/// 01:00, 05:00, 09:00, 13:00, 17:00 and 21:00.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IssueGrid {
    first_issue: NaiveTime,
    interval: TimeDelta,
}

impl IssueGrid {
    pub fn new(first_issue_hour: u32, interval_hours: u32) -> Result<Self, PredictError> {
        let first_issue = NaiveTime::from_hms_opt(first_issue_hour, 0, 0).ok_or_else(|| {
            PredictError::InvalidConfig(format!(
                "first issue hour must be below 24, got {first_issue_hour}"
            ))
        })?;
        if interval_hours == 0 {
            return Err(PredictError::InvalidConfig(
                "issue interval must be at least one hour".into(),
            ));
        }

        Ok(Self {
            first_issue,
            interval: TimeDelta::hours(interval_hours as i64),
        })
    }

    /// Issue times for `date`, ascending, from the first issue hour up to
    /// and including the last step not past 23:59:59 UTC.
    pub fn issue_times(&self, date: NaiveDate) -> Vec<DateTime<Utc>> {
        let day_end = date.and_time(LAST_SECOND).and_utc();

        let mut times = Vec::new();
        let mut next = Some(date.and_time(self.first_issue).and_utc());
        while let Some(t) = next.filter(|t| *t <= day_end) {
            times.push(t);
            // stops at the end of the representable range
            next = t.checked_add_signed(self.interval);
        }
        times
    }
}

impl Default for IssueGrid {
    fn default() -> Self {
        Self {
            first_issue: DEFAULT_FIRST_ISSUE,
            interval: TimeDelta::hours(4),
        }
    }
}
