//! Counting scheduled arrivals inside a bucket.

use chrono::{DateTime, TimeDelta, Utc};

use super::ladder::Bucket;
use super::types::ArrivalRecord;

/// Absolute `[start, end)` bounds of `bucket` relative to `issue_time`.
///
/// Bounds past the last representable instant are clamped to it.
pub fn bucket_window(issue_time: DateTime<Utc>, bucket: Bucket) -> (DateTime<Utc>, DateTime<Utc>) {
    let offset = |minutes: u32| {
        issue_time
            .checked_add_signed(TimeDelta::minutes(minutes as i64))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    };
    (offset(bucket.lower_minutes), offset(bucket.upper_minutes))
}

/// Counts arrivals scheduled in `[issue + lower, issue + upper)`.
///
/// Scans the whole table; the input order does not matter.
pub fn count_arrivals(arrivals: &[ArrivalRecord], issue_time: DateTime<Utc>, bucket: Bucket) -> usize {
    let (start, end) = bucket_window(issue_time, bucket);
    arrivals
        .iter()
        .filter(|a| a.scheduled_arrival >= start && a.scheduled_arrival < end)
        .count()
}

/// Sorted arrival times for repeated window counts by binary search.
#[derive(Debug, Clone, Default)]
pub struct ArrivalIndex {
    times: Vec<DateTime<Utc>>,
}

impl ArrivalIndex {
    pub fn new(arrivals: &[ArrivalRecord]) -> Self {
        let mut times: Vec<_> = arrivals.iter().map(|a| a.scheduled_arrival).collect();
        times.sort_unstable();
        Self { times }
    }

    pub fn len(&self) -> usize {
        self.times.len()
    }

    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// Number of arrivals with `start <= t < end`.
    pub fn count_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> usize {
        if end <= start {
            return 0;
        }
        let lo = self.times.partition_point(|t| *t < start);
        let hi = self.times.partition_point(|t| *t < end);
        hi - lo
    }

    pub fn count(&self, issue_time: DateTime<Utc>, bucket: Bucket) -> usize {
        let (start, end) = bucket_window(issue_time, bucket);
        self.count_between(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2022, 9, 1, h, m, s).unwrap()
    }

    fn arrival(id: &str, t: DateTime<Utc>) -> ArrivalRecord {
        ArrivalRecord::new(id, t)
    }

    const FIRST: Bucket = Bucket {
        lower_minutes: 0,
        upper_minutes: 15,
    };
    const SECOND: Bucket = Bucket {
        lower_minutes: 15,
        upper_minutes: 30,
    };
    const LAST: Bucket = Bucket {
        lower_minutes: 165,
        upper_minutes: 180,
    };

    #[test]
    fn test_boundary_belongs_to_bucket_it_opens() {
        let arrivals = vec![arrival("f1", at(5, 15, 0))];

        assert_eq!(count_arrivals(&arrivals, at(5, 0, 0), FIRST), 0);
        assert_eq!(count_arrivals(&arrivals, at(5, 0, 0), SECOND), 1);
    }

    #[test]
    fn test_horizon_end_is_excluded() {
        let arrivals = vec![arrival("f1", at(8, 0, 0))];
        assert_eq!(count_arrivals(&arrivals, at(5, 0, 0), LAST), 0);
    }

    #[test]
    fn test_sub_minute_precision() {
        let just_before = at(5, 14, 59) + TimeDelta::milliseconds(999);
        let arrivals = vec![arrival("f1", just_before)];

        assert_eq!(count_arrivals(&arrivals, at(5, 0, 0), FIRST), 1);
        assert_eq!(count_arrivals(&arrivals, at(5, 0, 0), SECOND), 0);
    }

    #[test]
    fn test_unsorted_input() {
        let arrivals = vec![
            arrival("f3", at(5, 20, 0)),
            arrival("f1", at(5, 1, 0)),
            arrival("f2", at(5, 16, 0)),
        ];

        assert_eq!(count_arrivals(&arrivals, at(5, 0, 0), SECOND), 2);
        assert_eq!(ArrivalIndex::new(&arrivals).count(at(5, 0, 0), SECOND), 2);
    }

    #[test]
    fn test_index_counts_window() {
        let arrivals = vec![
            arrival("f1", at(5, 0, 0)),
            arrival("f2", at(5, 14, 0)),
            arrival("f3", at(5, 15, 0)),
            arrival("f4", at(4, 59, 59)),
        ];
        let index = ArrivalIndex::new(&arrivals);

        assert_eq!(index.len(), 4);
        assert_eq!(index.count(at(5, 0, 0), FIRST), 2);
        assert_eq!(index.count(at(5, 0, 0), SECOND), 1);
        assert_eq!(index.count_between(at(6, 0, 0), at(5, 0, 0)), 0);
    }

    #[test]
    fn test_window_clamped_at_end_of_time() {
        let issue_time = NaiveDate::MAX.and_hms_opt(23, 0, 0).unwrap().and_utc();
        let arrivals = vec![arrival("f1", issue_time + TimeDelta::minutes(20))];

        let (_, end) = bucket_window(issue_time, LAST);
        assert_eq!(end, DateTime::<Utc>::MAX_UTC);
        assert_eq!(count_arrivals(&arrivals, issue_time, SECOND), 1);
        assert_eq!(ArrivalIndex::new(&arrivals).count(issue_time, LAST), 0);
    }

    #[test]
    fn test_empty_index() {
        let index = ArrivalIndex::new(&[]);
        assert!(index.is_empty());
        assert_eq!(index.count(at(5, 0, 0), FIRST), 0);
    }
}
