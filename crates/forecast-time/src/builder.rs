//! Incremental construction of a [`Time2DCoordinate`] from a record stream.
//!
//! Records arrive in any order. Each distinct runtime gets a stable slot the
//! first time it is seen, and the slot's accumulator collects that run's
//! local values. Slots are only put in runtime order once, at finalize.

use std::collections::{BTreeMap, HashMap};
use std::marker::PhantomData;

use chrono::{DateTime, Utc};
use tracing::{debug, trace};

use crate::best::SlotCounts;
use crate::config::CoordinateConfig;
use crate::error::{CoordError, Result};
use crate::period::PeriodUnit;
use crate::record::RecordExtractor;
use crate::runtime::RuntimeAxis;
use crate::time2d::Time2DCoordinate;
use crate::time_axis::TimeAxis;
use crate::value::{AxisVariant, CompositeValue, Interval, LocalValue};

/// Local values of one run with the number of records seen for each.
#[derive(Debug, Clone)]
enum AxisAccumulator {
    Point(BTreeMap<i32, usize>),
    Interval(BTreeMap<Interval, usize>),
}

impl AxisAccumulator {
    fn new(variant: AxisVariant) -> Self {
        match variant {
            AxisVariant::Point => Self::Point(BTreeMap::new()),
            AxisVariant::Interval => Self::Interval(BTreeMap::new()),
        }
    }

    fn variant(&self) -> AxisVariant {
        match self {
            Self::Point(_) => AxisVariant::Point,
            Self::Interval(_) => AxisVariant::Interval,
        }
    }

    fn add(&mut self, value: LocalValue) -> Result<()> {
        match (self, value) {
            (Self::Point(counts), LocalValue::Point(offset)) => {
                *counts.entry(offset).or_default() += 1;
            }
            (Self::Interval(counts), LocalValue::Interval(intv)) => {
                *counts.entry(intv).or_default() += 1;
            }
            (acc, value) => value.expect_variant(acc.variant())?,
        }
        Ok(())
    }

    /// The finished axis plus the record count of every axis position.
    fn finish(self, unit: PeriodUnit, runtime: DateTime<Utc>) -> (TimeAxis, Vec<usize>) {
        match self {
            Self::Point(counts) => {
                let (offsets, n): (Vec<_>, Vec<_>) = counts.into_iter().unzip();
                (TimeAxis::points(unit, runtime, offsets), n)
            }
            Self::Interval(counts) => {
                let (intervals, n): (Vec<_>, Vec<_>) = counts.into_iter().unzip();
                (TimeAxis::intervals(unit, runtime, intervals), n)
            }
        }
    }
}

/// Streams records into a [`Time2DCoordinate`].
///
/// Single owner, single use: [`finalize`](Self::finalize) consumes the
/// builder.
pub struct IncrementalBuilder<R, E> {
    config: CoordinateConfig,
    extractor: E,
    /// Runtimes in order of first appearance; the position is the slot.
    runtimes: Vec<DateTime<Utc>>,
    slots: HashMap<DateTime<Utc>, usize>,
    accumulators: Vec<AxisAccumulator>,
    records: usize,
    _record: PhantomData<fn(&R)>,
}

impl<R, E> IncrementalBuilder<R, E>
where
    E: RecordExtractor<R>,
{
    pub fn new(config: CoordinateConfig, extractor: E) -> Result<Self> {
        config.validate().map_err(CoordError::Config)?;
        Ok(Self {
            config,
            extractor,
            runtimes: Vec::new(),
            slots: HashMap::new(),
            accumulators: Vec::new(),
            records: 0,
            _record: PhantomData,
        })
    }

    pub fn config(&self) -> &CoordinateConfig {
        &self.config
    }

    /// Number of distinct runtimes seen so far.
    pub fn n_runs(&self) -> usize {
        self.runtimes.len()
    }

    /// Number of records and replayed values accepted so far.
    pub fn record_count(&self) -> usize {
        self.records
    }

    pub fn is_empty(&self) -> bool {
        self.runtimes.is_empty()
    }

    fn slot_for(&mut self, runtime: DateTime<Utc>) -> usize {
        if let Some(&slot) = self.slots.get(&runtime) {
            return slot;
        }
        let slot = self.runtimes.len();
        trace!(runtime = %runtime, slot, "new run");
        self.runtimes.push(runtime);
        self.accumulators.push(AxisAccumulator::new(self.config.variant));
        self.slots.insert(runtime, slot);
        slot
    }

    fn accept(&mut self, runtime: DateTime<Utc>, local: LocalValue) -> Result<()> {
        local.expect_variant(self.config.variant)?;
        let slot = self.slot_for(runtime);
        self.accumulators[slot].add(local)?;
        self.records += 1;
        Ok(())
    }

    /// Add one record.
    ///
    /// A record whose local value is of the wrong variant is rejected with
    /// [`CoordError::VariantMismatch`] and leaves the builder unchanged.
    pub fn add_record(&mut self, record: &R) -> Result<()> {
        let runtime = self.extractor.extract_runtime(record);
        let local = self.extractor.extract_local(record)?;
        self.accept(runtime, local)
    }

    /// Add every record of an iterator, stopping at the first error.
    pub fn add_records<'a, I>(&mut self, records: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a R>,
        R: 'a,
    {
        for record in records {
            self.add_record(record)?;
        }
        Ok(())
    }

    /// Replay every composite value of a finished coordinate, e.g. one
    /// partition of a larger collection.
    ///
    /// Values already present are merged when the builder finalizes. A run
    /// whose axis is empty has no composite values, so its runtime is not
    /// carried over.
    pub fn merge_from(&mut self, other: &Time2DCoordinate) -> Result<&mut Self> {
        if other.unit() != self.config.unit {
            return Err(CoordError::Config(format!(
                "cannot merge a coordinate in {} into one in {}",
                other.unit(),
                self.config.unit
            )));
        }
        if other.variant() != self.config.variant {
            return Err(CoordError::VariantMismatch {
                expected: self.config.variant,
                found: other.variant(),
            });
        }

        for value in other.values() {
            self.accept(value.runtime, value.local)?;
        }
        debug!(
            runs = other.n_runs(),
            values = other.size(),
            total_runs = self.n_runs(),
            "Merged partition coordinate"
        );
        Ok(self)
    }

    /// Finish the coordinate.
    pub fn finalize(self) -> Result<Time2DCoordinate> {
        self.finalize_with_counts().map(|(coord, _)| coord)
    }

    /// Finish the coordinate and report how many records back each
    /// `(run index, time index)` slot.
    pub fn finalize_with_counts(self) -> Result<(Time2DCoordinate, SlotCounts)> {
        if self.runtimes.is_empty() {
            return Err(CoordError::EmptyCoordinate);
        }

        let unit = self.config.unit;
        let mut runs: Vec<(DateTime<Utc>, AxisAccumulator)> =
            self.runtimes.into_iter().zip(self.accumulators).collect();
        runs.sort_by_key(|(runtime, _)| *runtime);

        let runtime_axis = RuntimeAxis::from_sorted(runs.iter().map(|(rt, _)| *rt).collect())?;

        let mut times = Vec::with_capacity(runs.len());
        let mut rows = Vec::with_capacity(runs.len());
        let mut values = Vec::new();
        for (runtime, accumulator) in runs {
            let (axis, counts) = accumulator.finish(unit, runtime);
            values.extend(axis.iter().map(|local| CompositeValue::new(runtime, local)));
            times.push(axis);
            rows.push(counts);
        }

        let coord = Time2DCoordinate::new(self.config.code, unit, runtime_axis, times, values)?;
        debug!(
            runs = coord.n_runs(),
            ntimes = coord.n_times(),
            values = coord.size(),
            records = self.records,
            variant = %coord.variant(),
            "Finalized time coordinate"
        );
        Ok((coord, SlotCounts::from_rows(rows)))
    }
}
