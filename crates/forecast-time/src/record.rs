//! Record extraction capability and the GRIB2 record summary.
//!
//! The builder never looks inside records itself. It asks a
//! [`RecordExtractor`] for the runtime and the local time value of each one,
//! so any decoded format can feed it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoordError, Result};
use crate::period::PeriodUnit;
use crate::value::{Interval, LocalValue};

/// Pulls the time coordinates out of a record.
pub trait RecordExtractor<R> {
    /// Reference time of the model run that produced the record.
    fn extract_runtime(&self, record: &R) -> DateTime<Utc>;

    /// Offset or validity interval of the record, relative to its runtime.
    fn extract_local(&self, record: &R) -> Result<LocalValue>;
}

fn default_time_unit_code() -> u8 {
    1
}

/// Time-related fields of one decoded GRIB2 message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// Model run reference time (section 1)
    pub reference_time: DateTime<Utc>,
    /// Unit of `forecast_time`, GRIB2 code table 4.4
    #[serde(default = "default_time_unit_code")]
    pub time_unit_code: u8,
    /// Forecast time, or start of the statistical interval (section 4)
    pub forecast_time: i32,
    /// End of the statistical interval, for accumulations and averages
    #[serde(default)]
    pub interval_end: Option<i32>,
}

impl ForecastRecord {
    /// Record valid at a single forecast time, in hours.
    pub fn point(reference_time: DateTime<Utc>, forecast_hour: i32) -> Self {
        Self {
            reference_time,
            time_unit_code: 1,
            forecast_time: forecast_hour,
            interval_end: None,
        }
    }

    /// Record covering `[start, end]` forecast hours.
    pub fn interval(reference_time: DateTime<Utc>, start: i32, end: i32) -> Self {
        Self {
            reference_time,
            time_unit_code: 1,
            forecast_time: start,
            interval_end: Some(end),
        }
    }

    pub fn with_time_unit_code(mut self, code: u8) -> Self {
        self.time_unit_code = code;
        self
    }
}

/// Extractor for [`ForecastRecord`] that rescales offsets into the unit of
/// the coordinate being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForecastRecordExtractor {
    unit: PeriodUnit,
}

impl ForecastRecordExtractor {
    pub fn new(unit: PeriodUnit) -> Self {
        Self { unit }
    }

    fn convert(&self, value: i32, from: PeriodUnit) -> Result<i32> {
        self.unit.convert(value, from).ok_or_else(|| {
            CoordError::Config(format!(
                "cannot express {} {} in units of {}",
                value, from, self.unit
            ))
        })
    }
}

impl RecordExtractor<ForecastRecord> for ForecastRecordExtractor {
    fn extract_runtime(&self, record: &ForecastRecord) -> DateTime<Utc> {
        record.reference_time
    }

    fn extract_local(&self, record: &ForecastRecord) -> Result<LocalValue> {
        let record_unit = PeriodUnit::from_grib_code(record.time_unit_code).ok_or_else(|| {
            CoordError::InvalidPeriodUnit(format!("time unit code {}", record.time_unit_code))
        })?;

        let start = self.convert(record.forecast_time, record_unit)?;
        match record.interval_end {
            Some(end) => {
                let end = self.convert(end, record_unit)?;
                Ok(LocalValue::Interval(Interval::new(start, end)))
            }
            None => Ok(LocalValue::Point(start)),
        }
    }
}
