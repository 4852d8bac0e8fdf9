//! Per-run time axis: sorted unique offsets or intervals relative to one
//! reference time.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::error::Result;
use crate::period::PeriodUnit;
use crate::value::{AxisVariant, Interval, LocalValue};

/// Label used when the intervals of an axis do not share one length.
pub const MIXED_INTERVALS: &str = "mixed";

/// Variant-specific storage of a time axis.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AxisValues {
    Point(Vec<i32>),
    Interval(Vec<Interval>),
}

impl AxisValues {
    fn len(&self) -> usize {
        match self {
            Self::Point(v) => v.len(),
            Self::Interval(v) => v.len(),
        }
    }
}

/// Interval length summary of an axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntervalLength {
    /// Every interval has this length.
    Uniform(i64),
    /// At least two intervals differ in length.
    Mixed,
}

impl IntervalLength {
    /// "6-hour" style label, or [`MIXED_INTERVALS`].
    pub fn label(&self, unit: PeriodUnit) -> String {
        match self {
            Self::Uniform(length) => unit.length_label(*length),
            Self::Mixed => MIXED_INTERVALS.to_string(),
        }
    }
}

/// Sorted unique time values of one model run.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TimeAxis {
    unit: PeriodUnit,
    reference_time: DateTime<Utc>,
    values: AxisValues,
}

impl TimeAxis {
    /// Point axis from offsets in any order.
    pub fn points(unit: PeriodUnit, reference_time: DateTime<Utc>, mut offsets: Vec<i32>) -> Self {
        offsets.sort_unstable();
        offsets.dedup();
        Self {
            unit,
            reference_time,
            values: AxisValues::Point(offsets),
        }
    }

    /// Interval axis from intervals in any order.
    pub fn intervals(
        unit: PeriodUnit,
        reference_time: DateTime<Utc>,
        mut intervals: Vec<Interval>,
    ) -> Self {
        intervals.sort_unstable();
        intervals.dedup();
        Self {
            unit,
            reference_time,
            values: AxisValues::Interval(intervals),
        }
    }

    /// Axis of the given variant holding no values.
    pub fn empty(variant: AxisVariant, unit: PeriodUnit, reference_time: DateTime<Utc>) -> Self {
        let values = match variant {
            AxisVariant::Point => AxisValues::Point(Vec::new()),
            AxisVariant::Interval => AxisValues::Interval(Vec::new()),
        };
        Self {
            unit,
            reference_time,
            values,
        }
    }

    /// Axis from tagged local values, all of which must match `variant`.
    pub fn from_values(
        variant: AxisVariant,
        unit: PeriodUnit,
        reference_time: DateTime<Utc>,
        values: impl IntoIterator<Item = LocalValue>,
    ) -> Result<Self> {
        match variant {
            AxisVariant::Point => {
                let mut offsets = Vec::new();
                for value in values {
                    match value {
                        LocalValue::Point(offset) => offsets.push(offset),
                        other => other.expect_variant(variant)?,
                    }
                }
                Ok(Self::points(unit, reference_time, offsets))
            }
            AxisVariant::Interval => {
                let mut intervals = Vec::new();
                for value in values {
                    match value {
                        LocalValue::Interval(intv) => intervals.push(intv),
                        other => other.expect_variant(variant)?,
                    }
                }
                Ok(Self::intervals(unit, reference_time, intervals))
            }
        }
    }

    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn variant(&self) -> AxisVariant {
        match self.values {
            AxisValues::Point(_) => AxisVariant::Point,
            AxisValues::Interval(_) => AxisVariant::Interval,
        }
    }

    pub fn unit(&self) -> PeriodUnit {
        self.unit
    }

    pub fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time
    }

    pub fn values(&self) -> &AxisValues {
        &self.values
    }

    /// The value at `index`, or `None` past the end of the axis.
    pub fn value_at(&self, index: usize) -> Option<LocalValue> {
        match &self.values {
            AxisValues::Point(v) => v.get(index).copied().map(LocalValue::Point),
            AxisValues::Interval(v) => v.get(index).copied().map(LocalValue::Interval),
        }
    }

    /// Position of `value`, or `None` if the axis does not hold it.
    ///
    /// A value of the other variant is never found.
    pub fn index_of(&self, value: &LocalValue) -> Option<usize> {
        match (&self.values, value) {
            (AxisValues::Point(v), LocalValue::Point(offset)) => v.binary_search(offset).ok(),
            (AxisValues::Interval(v), LocalValue::Interval(intv)) => v.binary_search(intv).ok(),
            _ => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = LocalValue> + '_ {
        (0..self.size()).filter_map(move |idx| self.value_at(idx))
    }

    /// Length summary of an interval axis. `None` for point axes and for
    /// empty interval axes.
    pub fn interval_length(&self) -> Option<IntervalLength> {
        let AxisValues::Interval(intervals) = &self.values else {
            return None;
        };
        let first = intervals.first()?.length();
        if intervals.iter().all(|intv| intv.length() == first) {
            Some(IntervalLength::Uniform(first))
        } else {
            Some(IntervalLength::Mixed)
        }
    }

    /// Named-length label of an interval axis, e.g. "6-hour".
    pub fn interval_name(&self) -> Option<String> {
        self.interval_length().map(|len| len.label(self.unit))
    }
}

impl fmt::Display for TimeAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} ref={} n={} [",
            self.variant(),
            self.unit,
            self.reference_time.format("%Y-%m-%dT%H:%MZ"),
            self.size()
        )?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", value)?;
        }
        f.write_str("]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoordError;
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_point_axis_sorted_unique() {
        let axis = TimeAxis::points(PeriodUnit::HOUR, reference(), vec![12, 0, 6, 6]);
        assert_eq!(axis.size(), 3);
        assert_eq!(axis.variant(), AxisVariant::Point);
        assert_eq!(axis.value_at(0), Some(LocalValue::Point(0)));
        assert_eq!(axis.value_at(2), Some(LocalValue::Point(12)));
        assert_eq!(axis.value_at(3), None);
    }

    #[test]
    fn test_index_of_misses_are_none() {
        let axis = TimeAxis::points(PeriodUnit::HOUR, reference(), vec![0, 6, 12]);
        assert_eq!(axis.index_of(&LocalValue::Point(6)), Some(1));
        assert_eq!(axis.index_of(&LocalValue::Point(3)), None);
        assert_eq!(
            axis.index_of(&LocalValue::Interval(Interval::new(0, 6))),
            None
        );
    }

    #[test]
    fn test_interval_axis_lookup() {
        let axis = TimeAxis::intervals(
            PeriodUnit::HOUR,
            reference(),
            vec![Interval::new(6, 12), Interval::new(0, 6)],
        );
        assert_eq!(
            axis.index_of(&LocalValue::Interval(Interval::new(6, 12))),
            Some(1)
        );
        assert_eq!(axis.index_of(&LocalValue::Point(6)), None);
    }

    #[test]
    fn test_interval_name_uniform_and_mixed() {
        let uniform = TimeAxis::intervals(
            PeriodUnit::HOUR,
            reference(),
            vec![Interval::new(0, 6), Interval::new(6, 12)],
        );
        assert_eq!(uniform.interval_name().as_deref(), Some("6-hour"));

        let mixed = TimeAxis::intervals(
            PeriodUnit::HOUR,
            reference(),
            vec![Interval::new(0, 6), Interval::new(0, 12)],
        );
        assert_eq!(mixed.interval_name().as_deref(), Some(MIXED_INTERVALS));

        let points = TimeAxis::points(PeriodUnit::HOUR, reference(), vec![0]);
        assert_eq!(points.interval_name(), None);
    }

    #[test]
    fn test_from_values_rejects_wrong_variant() {
        let err = TimeAxis::from_values(
            AxisVariant::Interval,
            PeriodUnit::HOUR,
            reference(),
            vec![LocalValue::Point(0)],
        )
        .unwrap_err();
        assert!(matches!(err, CoordError::VariantMismatch { .. }));
    }

    #[test]
    fn test_display() {
        let axis = TimeAxis::points(PeriodUnit::HOUR, reference(), vec![0, 6]);
        assert_eq!(axis.to_string(), "point hour ref=2024-01-15T00:00Z n=2 [0, 6]");
    }
}
