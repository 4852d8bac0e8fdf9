//! Period units used to express forecast offsets.
//!
//! All offsets inside one time coordinate share a single [`PeriodUnit`].
//! Units map onto GRIB2 code table 4.4 ("indicator of unit of time range").

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoordError, Result};

/// The calendar field a period unit counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodField {
    Second,
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl PeriodField {
    /// Length in seconds, for fields with a fixed length.
    pub fn fixed_seconds(&self) -> Option<i64> {
        match self {
            Self::Second => Some(1),
            Self::Minute => Some(60),
            Self::Hour => Some(3_600),
            Self::Day => Some(86_400),
            Self::Month | Self::Year => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "s" | "sec" | "second" | "seconds" => Some(Self::Second),
            "min" | "minute" | "minutes" => Some(Self::Minute),
            "h" | "hr" | "hour" | "hours" => Some(Self::Hour),
            "d" | "day" | "days" => Some(Self::Day),
            "month" | "months" => Some(Self::Month),
            "y" | "year" | "years" => Some(Self::Year),
            _ => None,
        }
    }
}

/// A named duration unit, e.g. "hour" or "6 hours".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PeriodUnit {
    field: PeriodField,
    value: u32,
}

impl PeriodUnit {
    pub const SECOND: PeriodUnit = PeriodUnit::of(PeriodField::Second);
    pub const MINUTE: PeriodUnit = PeriodUnit::of(PeriodField::Minute);
    pub const HOUR: PeriodUnit = PeriodUnit::of(PeriodField::Hour);
    pub const DAY: PeriodUnit = PeriodUnit::of(PeriodField::Day);

    const fn of(field: PeriodField) -> Self {
        Self { field, value: 1 }
    }

    /// Create a unit of `value` times `field`. A zero multiplier is rejected.
    pub fn new(field: PeriodField, value: u32) -> Result<Self> {
        if value == 0 {
            return Err(CoordError::InvalidPeriodUnit(format!(
                "zero-length {} unit",
                field.name()
            )));
        }
        Ok(Self { field, value })
    }

    pub fn field(&self) -> PeriodField {
        self.field
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Length of the unit in seconds, if it has a fixed length.
    pub fn seconds(&self) -> Option<i64> {
        self.field.fixed_seconds().map(|s| s * i64::from(self.value))
    }

    /// Map a GRIB2 code table 4.4 entry to a unit.
    pub fn from_grib_code(code: u8) -> Option<Self> {
        let (field, value) = match code {
            0 => (PeriodField::Minute, 1),
            1 => (PeriodField::Hour, 1),
            2 => (PeriodField::Day, 1),
            3 => (PeriodField::Month, 1),
            4 => (PeriodField::Year, 1),
            5 => (PeriodField::Year, 10),
            6 => (PeriodField::Year, 30),
            7 => (PeriodField::Year, 100),
            10 => (PeriodField::Hour, 3),
            11 => (PeriodField::Hour, 6),
            12 => (PeriodField::Hour, 12),
            13 => (PeriodField::Second, 1),
            _ => return None,
        };
        Some(Self { field, value })
    }

    /// The GRIB2 code table 4.4 entry for this unit, if there is one.
    pub fn grib_code(&self) -> Option<u8> {
        match (self.field, self.value) {
            (PeriodField::Minute, 1) => Some(0),
            (PeriodField::Hour, 1) => Some(1),
            (PeriodField::Day, 1) => Some(2),
            (PeriodField::Month, 1) => Some(3),
            (PeriodField::Year, 1) => Some(4),
            (PeriodField::Year, 10) => Some(5),
            (PeriodField::Year, 30) => Some(6),
            (PeriodField::Year, 100) => Some(7),
            (PeriodField::Hour, 3) => Some(10),
            (PeriodField::Hour, 6) => Some(11),
            (PeriodField::Hour, 12) => Some(12),
            (PeriodField::Second, 1) => Some(13),
            _ => None,
        }
    }

    /// Number of whole units from `from` to `to`.
    ///
    /// Any remainder smaller than one unit is truncated toward zero, so a
    /// runtime 90 minutes after the first one sits at offset 1 on an hourly
    /// axis. Month and year units count calendar months.
    pub fn offset_between(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
        match self.seconds() {
            Some(unit_secs) => (to - from).num_seconds() / unit_secs,
            None => {
                let months = calendar_months_between(from, to);
                let per_unit = match self.field {
                    PeriodField::Year => 12 * i64::from(self.value),
                    _ => i64::from(self.value),
                };
                months / per_unit
            }
        }
    }

    /// Like [`offset_between`](Self::offset_between), checked against the
    /// `i32` offset range.
    pub fn offset_between_i32(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Result<i32> {
        let offset = self.offset_between(from, to);
        i32::try_from(offset).map_err(|_| {
            CoordError::offset_overflow(format!(
                "{} {} between {} and {}",
                offset, self, from, to
            ))
        })
    }

    /// Rescale an offset expressed in `from` units into this unit.
    ///
    /// Only fixed-length units convert into each other; sub-unit remainders
    /// are truncated toward zero. Calendar units only convert to themselves.
    pub fn convert(&self, offset: i32, from: PeriodUnit) -> Option<i32> {
        if from == *self {
            return Some(offset);
        }
        let from_secs = from.seconds()?;
        let to_secs = self.seconds()?;
        let secs = i64::from(offset).checked_mul(from_secs)?;
        i32::try_from(secs / to_secs).ok()
    }

    /// Canonical label for an interval of `length` units, e.g. "6-hour".
    pub fn length_label(&self, length: i64) -> String {
        let total = i128::from(length) * i128::from(self.value);
        format!("{}-{}", total, self.field.name())
    }
}

impl Default for PeriodUnit {
    fn default() -> Self {
        Self::HOUR
    }
}

impl fmt::Display for PeriodUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.value == 1 {
            write!(f, "{}", self.field.name())
        } else {
            write!(f, "{} {}s", self.value, self.field.name())
        }
    }
}

impl FromStr for PeriodUnit {
    type Err = CoordError;

    /// Parse "hour", "6 hours", "3-hour", "12h" and similar forms.
    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        let digits_end = lower
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(lower.len());
        let (digits, rest) = lower.split_at(digits_end);

        let value = if digits.is_empty() {
            1
        } else {
            digits
                .parse::<u32>()
                .map_err(|_| CoordError::InvalidPeriodUnit(s.to_string()))?
        };

        let name = rest.trim_start_matches(|c: char| c == '-' || c == '_' || c.is_whitespace());
        let field =
            PeriodField::parse(name).ok_or_else(|| CoordError::InvalidPeriodUnit(s.to_string()))?;

        Self::new(field, value)
    }
}

impl TryFrom<String> for PeriodUnit {
    type Error = CoordError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

impl From<PeriodUnit> for String {
    fn from(unit: PeriodUnit) -> Self {
        unit.to_string()
    }
}

/// Whole calendar months from `from` to `to`, truncated toward zero.
fn calendar_months_between(from: DateTime<Utc>, to: DateTime<Utc>) -> i64 {
    let mut months = i64::from(to.year() - from.year()) * 12
        + i64::from(to.month() as i32 - from.month() as i32);

    let from_rest = (from.day(), from.time());
    let to_rest = (to.day(), to.time());
    if months > 0 && to_rest < from_rest {
        months -= 1;
    } else if months < 0 && to_rest > from_rest {
        months += 1;
    }
    months
}
