//! Common test fixtures for time coordinate tests.
//!
//! A schedule is a list of `(runtime hours after the epoch, forecast
//! hours)` pairs, one per model run.

/// A run schedule: runtime offset in hours and the forecast hours it covers.
pub type Schedule = &'static [(i64, &'static [i32])];

/// An interval schedule: runtime offset in hours and `(start, end)` windows.
pub type IntervalSchedule = &'static [(i64, &'static [(i32, i32)])];

/// Point-offset schedules.
pub mod schedule {
    use super::Schedule;

    /// Three runs six hours apart; the last one is shorter.
    ///
    /// Aligned onto the first run they cover 0, 6, 12 and 18 hours, and the
    /// third run is the latest supplier of 12 and 18.
    pub const THREE_RUNS: Schedule = &[(0, &[0, 6, 12]), (6, &[0, 6, 12]), (12, &[0, 6])];

    /// One 4x-daily day of a global model, hourly to +12 then 3-hourly.
    pub const FOUR_CYCLES: Schedule = &[
        (0, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 15, 18, 21, 24]),
        (6, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 15, 18, 21, 24]),
        (12, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 15, 18, 21, 24]),
        (18, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 15, 18, 21, 24]),
    ];

    /// First day of a two-day archive split into daily partitions.
    pub const DAY_ONE: Schedule = &[(0, &[0, 6, 12]), (12, &[0, 6, 12])];

    /// Second day; its first run repeats the last run of day one with one
    /// extra lead time.
    pub const DAY_TWO: Schedule = &[(12, &[12, 18]), (24, &[0, 6, 12]), (36, &[0, 6])];

    /// Runs with no overlap at all once aligned.
    pub const DISJOINT: Schedule = &[(0, &[0, 1]), (24, &[0, 1])];
}

/// Interval schedules.
pub mod intervals {
    use super::IntervalSchedule;

    /// 6-hour accumulations from two runs six hours apart.
    pub const SIX_HOUR_ACCUM: IntervalSchedule = &[
        (0, &[(0, 6), (6, 12), (12, 18)]),
        (6, &[(0, 6), (6, 12)]),
    ];

    /// A run mixing 3-hour and 6-hour windows.
    pub const MIXED_ACCUM: IntervalSchedule = &[(0, &[(0, 3), (0, 6)]), (6, &[(0, 6)])];

    /// Two runs that each use one length, but not the same one.
    pub const DIFFERING_ACCUM: IntervalSchedule = &[(0, &[(0, 6), (6, 12)]), (6, &[(0, 3)])];
}

/// Total number of (run, forecast hour) pairs in a schedule.
pub fn schedule_len(schedule: Schedule) -> usize {
    schedule.iter().map(|(_, hours)| hours.len()).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_len() {
        assert_eq!(schedule_len(schedule::THREE_RUNS), 8);
        assert_eq!(schedule_len(schedule::FOUR_CYCLES), 68);
    }

    #[test]
    fn test_schedules_are_sorted() {
        for s in [schedule::THREE_RUNS, schedule::FOUR_CYCLES, schedule::DAY_ONE, schedule::DAY_TWO] {
            crate::assert_strictly_ascending!(s.iter().map(|(run, _)| *run).collect::<Vec<_>>());
            for (_, hours) in s.iter() {
                crate::assert_strictly_ascending!(hours);
            }
        }
    }
}
