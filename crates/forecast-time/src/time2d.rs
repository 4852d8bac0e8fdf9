//! The two-dimensional runtime x time coordinate.
//!
//! A [`Time2DCoordinate`] ties one [`RuntimeAxis`] to one [`TimeAxis`] per
//! run and precomputes how far each run sits from the first runtime. The
//! structure is immutable once constructed and can be shared freely between
//! readers.

use std::collections::BTreeSet;
use std::fmt;

use chrono::{DateTime, Utc};

use crate::best::{AttributionPolicy, BestAxis, LatestRunWins, RunAttributionMap, SlotDensity};
use crate::error::{CoordError, Result};
use crate::period::PeriodUnit;
use crate::runtime::RuntimeAxis;
use crate::time_axis::{AxisValues, IntervalLength, TimeAxis, MIXED_INTERVALS};
use crate::value::{AxisVariant, CompositeValue, LocalValue};

/// Runtime x time coordinate of a forecast collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Time2DCoordinate {
    /// Time unit code the unit was derived from (GRIB2 table 4.4).
    code: u8,
    unit: PeriodUnit,
    variant: AxisVariant,
    runtime: RuntimeAxis,
    /// First runtime; every alignment is measured from here.
    reference_time: DateTime<Utc>,
    times: Vec<TimeAxis>,
    /// Offset of each runtime from the first one, in `unit`.
    alignment: Vec<i32>,
    /// Every observed `(runtime, local)` pair, sorted. Usually sparse.
    values: Vec<CompositeValue>,
    n_times: usize,
}

impl Time2DCoordinate {
    /// Build a coordinate from finalized axes.
    ///
    /// `times` holds one axis per runtime, in runtime order, all of the same
    /// variant and unit. The alignment of each run is computed here; a
    /// runtime that is not a whole number of units after the first one is
    /// truncated toward it.
    pub fn new(
        code: u8,
        unit: PeriodUnit,
        runtime: RuntimeAxis,
        times: Vec<TimeAxis>,
        mut values: Vec<CompositeValue>,
    ) -> Result<Self> {
        let reference_time = runtime.first_date().ok_or(CoordError::EmptyCoordinate)?;

        if times.len() != runtime.size() {
            return Err(CoordError::integrity(format!(
                "{} time axes for {} runtimes",
                times.len(),
                runtime.size()
            )));
        }

        let variant = times[0].variant();
        for (run_idx, (time, run_date)) in times.iter().zip(runtime.iter()).enumerate() {
            if time.variant() != variant {
                return Err(CoordError::VariantMismatch {
                    expected: variant,
                    found: time.variant(),
                });
            }
            if time.unit() != unit {
                return Err(CoordError::integrity(format!(
                    "time axis {} uses unit {} but the coordinate uses {}",
                    run_idx,
                    time.unit(),
                    unit
                )));
            }
            if time.reference_time() != run_date {
                return Err(CoordError::integrity(format!(
                    "time axis {} is referenced to {} but its runtime is {}",
                    run_idx,
                    time.reference_time(),
                    run_date
                )));
            }
        }

        let alignment = runtime
            .iter()
            .map(|run_date| unit.offset_between_i32(reference_time, run_date))
            .collect::<Result<Vec<_>>>()?;

        // Aligned values must fit the offset type so best-axis derivation
        // cannot overflow later.
        for (time, &shift) in times.iter().zip(&alignment) {
            for value in time.iter() {
                value.shift(shift)?;
            }
        }

        // Every composite value must be an observed pair of these axes.
        for value in &values {
            value.local.expect_variant(variant)?;
            let run_idx = runtime.index_of(value.runtime)?;
            if times[run_idx].index_of(&value.local).is_none() {
                return Err(CoordError::integrity(format!(
                    "composite value {} is not on the axis of run {}",
                    value, run_idx
                )));
            }
        }
        values.sort_unstable();
        values.dedup();

        let n_times = times.iter().map(TimeAxis::size).max().unwrap_or(0);

        Ok(Self {
            code,
            unit,
            variant,
            runtime,
            reference_time,
            times,
            alignment,
            values,
            n_times,
        })
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn unit(&self) -> PeriodUnit {
        self.unit
    }

    pub fn variant(&self) -> AxisVariant {
        self.variant
    }

    pub fn is_interval(&self) -> bool {
        self.variant == AxisVariant::Interval
    }

    /// The first runtime.
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.reference_time
    }

    pub fn runtime_axis(&self) -> &RuntimeAxis {
        &self.runtime
    }

    pub fn times(&self) -> &[TimeAxis] {
        &self.times
    }

    pub fn time_axis(&self, run_idx: usize) -> Result<&TimeAxis> {
        self.times
            .get(run_idx)
            .ok_or_else(|| CoordError::index_out_of_range("runtime axis", run_idx, self.n_runs()))
    }

    pub fn n_runs(&self) -> usize {
        self.runtime.size()
    }

    /// Length of the longest run axis.
    pub fn n_times(&self) -> usize {
        self.n_times
    }

    /// Offset of run `run_idx` from the first runtime.
    pub fn alignment(&self, run_idx: usize) -> Result<i32> {
        self.alignment
            .get(run_idx)
            .copied()
            .ok_or_else(|| CoordError::index_out_of_range("runtime axis", run_idx, self.n_runs()))
    }

    pub fn alignments(&self) -> &[i32] {
        &self.alignment
    }

    /// Every observed composite value, sorted.
    pub fn values(&self) -> &[CompositeValue] {
        &self.values
    }

    /// Number of observed composite values.
    pub fn size(&self) -> usize {
        self.values.len()
    }

    pub fn value_at(&self, idx: usize) -> Option<CompositeValue> {
        self.values.get(idx).copied()
    }

    /// Position of `value` in the composite list.
    pub fn index_of_value(&self, value: &CompositeValue) -> Option<usize> {
        self.values.binary_search(value).ok()
    }

    /// Reconstruct the composite value at `(run_idx, time_idx)`.
    ///
    /// Runs need not have equal-length axes, so a time index past the end
    /// of that run's axis yields `Ok(None)`. An unknown run index is an
    /// error.
    pub fn org_value_at(&self, run_idx: usize, time_idx: usize) -> Result<Option<CompositeValue>> {
        let run_date = self.runtime.date_at(run_idx)?;
        let time = self.time_axis(run_idx)?;
        Ok(time
            .value_at(time_idx)
            .map(|local| CompositeValue::new(run_date, local)))
    }

    /// Find `(run_idx, time_idx)` of a composite value; the inverse of
    /// [`org_value_at`](Self::org_value_at).
    ///
    /// The runtime must be a member of this coordinate (integrity error
    /// otherwise). A local value the run does not hold gives `None` for the
    /// time index.
    pub fn index_of(&self, value: &CompositeValue) -> Result<(usize, Option<usize>)> {
        let run_idx = self.runtime.index_of(value.runtime)?;
        let time_idx = self.times[run_idx].index_of(&value.local);
        Ok((run_idx, time_idx))
    }

    /// Find a local value expressed against `value_reference_time` in the
    /// axis of run `run_idx`.
    ///
    /// The value is first shifted by the duration from the run's runtime to
    /// `value_reference_time`. Callers only rebase values that structurally
    /// exist, so a miss is an integrity violation.
    pub fn rebase(
        &self,
        run_idx: usize,
        value: &LocalValue,
        value_reference_time: DateTime<Utc>,
    ) -> Result<usize> {
        let time = self.time_axis(run_idx)?;
        let delta = self
            .unit
            .offset_between_i32(time.reference_time(), value_reference_time)?;
        let shifted = value.shift(delta)?;
        time.index_of(&shifted).ok_or_else(|| {
            CoordError::integrity(format!(
                "value {} referenced to {} (shifted to {}) not found in run {}",
                value, value_reference_time, shifted, run_idx
            ))
        })
    }

    /// Merge every run's values, shifted onto the first runtime, into one
    /// sorted duplicate-free axis.
    pub fn best_axis(&self) -> BestAxis {
        let axis = match self.variant {
            AxisVariant::Point => {
                let mut offsets = Vec::new();
                for (time, &shift) in self.times.iter().zip(&self.alignment) {
                    if let AxisValues::Point(values) = time.values() {
                        offsets.extend(values.iter().filter_map(|o| o.checked_add(shift)));
                    }
                }
                TimeAxis::points(self.unit, self.reference_time, offsets)
            }
            AxisVariant::Interval => {
                let mut intervals = Vec::new();
                for (time, &shift) in self.times.iter().zip(&self.alignment) {
                    if let AxisValues::Interval(values) = time.values() {
                        intervals.extend(values.iter().filter_map(|intv| intv.shift(shift)));
                    }
                }
                TimeAxis::intervals(self.unit, self.reference_time, intervals)
            }
        };
        BestAxis::new(axis)
    }

    /// Map every best-axis slot to the run that supplies it, the most recent
    /// run winning where runs overlap.
    ///
    /// With `density`, slots that have no backing record are skipped.
    pub fn attribute_best_axis(
        &self,
        best: &BestAxis,
        density: Option<&dyn SlotDensity>,
    ) -> Result<RunAttributionMap> {
        self.attribute_best_axis_with(best, density, &LatestRunWins)
    }

    /// [`attribute_best_axis`](Self::attribute_best_axis) with an explicit
    /// conflict policy.
    pub fn attribute_best_axis_with<P: AttributionPolicy + ?Sized>(
        &self,
        best: &BestAxis,
        density: Option<&dyn SlotDensity>,
        policy: &P,
    ) -> Result<RunAttributionMap> {
        if best.variant() != self.variant {
            return Err(CoordError::VariantMismatch {
                expected: self.variant,
                found: best.variant(),
            });
        }

        let mut map = RunAttributionMap::zeroed(best.size());
        for (run_idx, (time, &shift)) in self.times.iter().zip(&self.alignment).enumerate() {
            for (time_idx, value) in time.iter().enumerate() {
                if density.is_some_and(|d| d.count(run_idx, time_idx) == 0) {
                    continue;
                }
                let shifted = value.shift(shift)?;
                let slot = best.index_of(&shifted).ok_or_else(|| {
                    CoordError::integrity(format!(
                        "value {} of run {} (aligned {}) is not on the best axis",
                        value, run_idx, shifted
                    ))
                })?;
                map.offer(slot, run_idx, policy);
            }
        }
        Ok(map)
    }

    /// Sorted union of all runs' local values, without alignment.
    pub fn offsets_sorted(&self) -> Vec<LocalValue> {
        let unique: BTreeSet<LocalValue> = self.times.iter().flat_map(TimeAxis::iter).collect();
        unique.into_iter().collect()
    }

    /// Common interval-length label of all runs.
    ///
    /// `None` for point coordinates. Runs with empty axes do not vote; any
    /// mixed run, or two runs that disagree, give [`MIXED_INTERVALS`].
    pub fn time_interval_name(&self) -> Option<String> {
        if !self.is_interval() {
            return None;
        }

        let mut common: Option<IntervalLength> = None;
        for time in &self.times {
            match (time.interval_length(), common) {
                (None, _) => {}
                (Some(IntervalLength::Mixed), _) => return Some(MIXED_INTERVALS.to_string()),
                (Some(length), None) => common = Some(length),
                (Some(length), Some(prev)) if length != prev => {
                    return Some(MIXED_INTERVALS.to_string())
                }
                (Some(_), Some(_)) => {}
            }
        }
        common.map(|length| length.label(self.unit))
    }
}

impl fmt::Display for Time2DCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "time2d {} unit={} code={} nruns={} ntimes={} total={}",
            self.variant,
            self.unit,
            self.code,
            self.n_runs(),
            self.n_times,
            self.size()
        )?;
        for ((run_date, time), shift) in self.runtime.iter().zip(&self.times).zip(&self.alignment) {
            writeln!(
                f,
                "  {} align={} {}",
                run_date.format("%Y-%m-%dT%H:%MZ"),
                shift,
                time
            )?;
        }
        Ok(())
    }
}
