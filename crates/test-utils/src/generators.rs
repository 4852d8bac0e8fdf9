//! Record stream generators for time coordinate tests.
//!
//! Records are plain `(runtime, value)` tuples so the generators stay
//! independent of the crate under test.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::fixtures::{IntervalSchedule, Schedule};

/// The reference epoch all fixture schedules count from.
pub fn epoch() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
}

/// The runtime `hours` after the epoch.
pub fn run_time(hours: i64) -> DateTime<Utc> {
    epoch() + Duration::hours(hours)
}

/// One `(runtime, forecast hour)` record per schedule entry, in schedule
/// order.
pub fn point_records(schedule: Schedule) -> Vec<(DateTime<Utc>, i32)> {
    schedule
        .iter()
        .flat_map(|(run, hours)| hours.iter().map(move |&h| (run_time(*run), h)))
        .collect()
}

/// One `(runtime, (start, end))` record per interval schedule entry.
pub fn interval_records(schedule: IntervalSchedule) -> Vec<(DateTime<Utc>, (i32, i32))> {
    schedule
        .iter()
        .flat_map(|(run, windows)| windows.iter().map(move |&w| (run_time(*run), w)))
        .collect()
}

/// Deterministically scramble a record stream.
///
/// Takes records alternately from the back and the front, so runs arrive
/// interleaved and newest-first; useful for checking that the builder does
/// not depend on input order.
pub fn interleave<T: Clone>(records: &[T]) -> Vec<T> {
    let mut out = Vec::with_capacity(records.len());
    let (mut lo, mut hi) = (0usize, records.len());
    let mut from_back = true;
    while lo < hi {
        if from_back {
            hi -= 1;
            out.push(records[hi].clone());
        } else {
            out.push(records[lo].clone());
            lo += 1;
        }
        from_back = !from_back;
    }
    out
}

/// Repeat every record `n` times, as when several parameters share a
/// time coordinate.
pub fn repeat_records<T: Clone>(records: &[T], n: usize) -> Vec<T> {
    records
        .iter()
        .flat_map(|r| std::iter::repeat(r.clone()).take(n))
        .collect()
}
