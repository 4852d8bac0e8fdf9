//! Helpers shared by the integration tests.

#![allow(dead_code)]

use forecast_time::{
    CoordinateConfig, ForecastRecord, ForecastRecordExtractor, IncrementalBuilder, PeriodUnit,
    Time2DCoordinate,
};
use test_utils::{interval_records, point_records, IntervalSchedule, Schedule};

pub type Builder = IncrementalBuilder<ForecastRecord, ForecastRecordExtractor>;

pub fn point_builder() -> Builder {
    IncrementalBuilder::new(
        CoordinateConfig::hourly_points(),
        ForecastRecordExtractor::new(PeriodUnit::HOUR),
    )
    .unwrap()
}

pub fn interval_builder() -> Builder {
    IncrementalBuilder::new(
        CoordinateConfig::hourly_intervals(),
        ForecastRecordExtractor::new(PeriodUnit::HOUR),
    )
    .unwrap()
}

pub fn point_forecast_records(schedule: Schedule) -> Vec<ForecastRecord> {
    point_records(schedule)
        .into_iter()
        .map(|(runtime, hour)| ForecastRecord::point(runtime, hour))
        .collect()
}

pub fn interval_forecast_records(schedule: IntervalSchedule) -> Vec<ForecastRecord> {
    interval_records(schedule)
        .into_iter()
        .map(|(runtime, (start, end))| ForecastRecord::interval(runtime, start, end))
        .collect()
}

/// Coordinate of a point schedule, built through the builder.
pub fn point_coordinate(schedule: Schedule) -> Time2DCoordinate {
    let mut builder = point_builder();
    builder
        .add_records(&point_forecast_records(schedule))
        .unwrap();
    builder.finalize().unwrap()
}

/// Coordinate of an interval schedule, built through the builder.
pub fn interval_coordinate(schedule: IntervalSchedule) -> Time2DCoordinate {
    let mut builder = interval_builder();
    builder
        .add_records(&interval_forecast_records(schedule))
        .unwrap();
    builder.finalize().unwrap()
}
