//! Local time values: point offsets, intervals, and the composite
//! (runtime, local value) pair.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoordError, Result};

/// Whether a time axis holds point offsets or validity intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisVariant {
    Point,
    Interval,
}

impl AxisVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Point => "point",
            Self::Interval => "interval",
        }
    }

    /// Parse from string (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "point" | "offset" => Some(Self::Point),
            "interval" | "intv" => Some(Self::Interval),
            _ => None,
        }
    }
}

impl fmt::Display for AxisVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A bounded validity window `(start, end)` in period units.
///
/// Ordered by start, then by end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Interval {
    pub start: i32,
    pub end: i32,
}

impl Interval {
    pub fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    /// Length of the window, `end - start`. Wide enough for any pair of
    /// endpoints.
    pub fn length(&self) -> i64 {
        i64::from(self.end) - i64::from(self.start)
    }

    /// Shift both endpoints by `delta`.
    pub fn shift(&self, delta: i32) -> Option<Self> {
        Some(Self {
            start: self.start.checked_add(delta)?,
            end: self.end.checked_add(delta)?,
        })
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.start, self.end)
    }
}

/// A time value relative to one reference time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LocalValue {
    /// Offset in period units from the reference time.
    Point(i32),
    /// Validity window in period units from the reference time.
    Interval(Interval),
}

impl LocalValue {
    pub fn variant(&self) -> AxisVariant {
        match self {
            Self::Point(_) => AxisVariant::Point,
            Self::Interval(_) => AxisVariant::Interval,
        }
    }

    /// Shift the value by `delta` units. Intervals shift both endpoints.
    pub fn shift(&self, delta: i32) -> Result<Self> {
        let shifted = match self {
            Self::Point(offset) => offset.checked_add(delta).map(Self::Point),
            Self::Interval(intv) => intv.shift(delta).map(Self::Interval),
        };
        shifted.ok_or_else(|| CoordError::offset_overflow(format!("{} shifted by {}", self, delta)))
    }

    /// Fail with `VariantMismatch` unless the value has the given variant.
    pub fn expect_variant(&self, expected: AxisVariant) -> Result<()> {
        if self.variant() == expected {
            Ok(())
        } else {
            Err(CoordError::VariantMismatch {
                expected,
                found: self.variant(),
            })
        }
    }
}

impl From<i32> for LocalValue {
    fn from(offset: i32) -> Self {
        Self::Point(offset)
    }
}

impl From<Interval> for LocalValue {
    fn from(intv: Interval) -> Self {
        Self::Interval(intv)
    }
}

impl fmt::Display for LocalValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Point(offset) => write!(f, "{}", offset),
            Self::Interval(intv) => write!(f, "{}", intv),
        }
    }
}

/// One observed `(runtime, local value)` pair of a 2D time coordinate.
///
/// Ordered by runtime, then by local value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CompositeValue {
    pub runtime: DateTime<Utc>,
    pub local: LocalValue,
}

impl CompositeValue {
    pub fn new(runtime: DateTime<Utc>, local: impl Into<LocalValue>) -> Self {
        Self {
            runtime,
            local: local.into(),
        }
    }
}

impl fmt::Display for CompositeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.runtime.format("%Y-%m-%dT%H:%MZ"), self.local)
    }
}
