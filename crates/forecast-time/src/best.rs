//! Best-estimate axis and the run attribution of its slots.
//!
//! The best axis merges the time axes of all runs after shifting each run
//! onto the first runtime, approximating one continuous series. The
//! attribution map records, for every best-axis slot, which run supplies
//! the value there.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoordError, Result};
use crate::period::PeriodUnit;
use crate::time_axis::TimeAxis;
use crate::value::{AxisVariant, LocalValue};

/// Merged, deduplicated time axis spanning every run of a coordinate.
///
/// Values are offsets from the first runtime of the source coordinate and
/// carry no run attribution of their own.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BestAxis {
    axis: TimeAxis,
}

impl BestAxis {
    pub(crate) fn new(axis: TimeAxis) -> Self {
        Self { axis }
    }

    pub fn size(&self) -> usize {
        self.axis.size()
    }

    pub fn is_empty(&self) -> bool {
        self.axis.is_empty()
    }

    pub fn variant(&self) -> AxisVariant {
        self.axis.variant()
    }

    pub fn unit(&self) -> PeriodUnit {
        self.axis.unit()
    }

    /// The first runtime of the coordinate the axis was derived from.
    pub fn reference_time(&self) -> DateTime<Utc> {
        self.axis.reference_time()
    }

    pub fn value_at(&self, index: usize) -> Option<LocalValue> {
        self.axis.value_at(index)
    }

    pub fn index_of(&self, value: &LocalValue) -> Option<usize> {
        self.axis.index_of(value)
    }

    pub fn iter(&self) -> impl Iterator<Item = LocalValue> + '_ {
        self.axis.iter()
    }

    pub fn interval_name(&self) -> Option<String> {
        self.axis.interval_name()
    }

    pub fn as_axis(&self) -> &TimeAxis {
        &self.axis
    }

    pub fn into_axis(self) -> TimeAxis {
        self.axis
    }
}

/// Per best-axis slot, `1 + run index` of the supplying run; 0 means no run.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunAttributionMap {
    entries: Vec<usize>,
}

impl RunAttributionMap {
    pub(crate) fn zeroed(len: usize) -> Self {
        Self {
            entries: vec![0; len],
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Raw one-based entries.
    pub fn entries(&self) -> &[usize] {
        &self.entries
    }

    /// Zero-based run index supplying `slot`, or `None` when no run does.
    pub fn run_for_slot(&self, slot: usize) -> Option<usize> {
        match self.entries.get(slot) {
            Some(&entry) if entry > 0 => Some(entry - 1),
            _ => None,
        }
    }

    /// Number of slots no run supplies.
    pub fn missing_count(&self) -> usize {
        self.entries.iter().filter(|&&e| e == 0).count()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<usize>> + '_ {
        self.entries.iter().map(|&e| e.checked_sub(1))
    }

    fn assign(&mut self, slot: usize, run_idx: usize) {
        self.entries[slot] = run_idx + 1;
    }

    pub(crate) fn offer<P: AttributionPolicy + ?Sized>(
        &mut self,
        slot: usize,
        run_idx: usize,
        policy: &P,
    ) {
        match self.run_for_slot(slot) {
            Some(current) if !policy.replaces(current, run_idx) => {}
            _ => self.assign(slot, run_idx),
        }
    }
}

/// Conflict policy for best-axis slots supplied by more than one run.
pub trait AttributionPolicy {
    /// Whether run `candidate` takes over a slot already attributed to run
    /// `current`. Both are zero-based run indices.
    fn replaces(&self, current: usize, candidate: usize) -> bool;
}

/// The most recent run overrides older runs for the same validity time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LatestRunWins;

impl AttributionPolicy for LatestRunWins {
    fn replaces(&self, current: usize, candidate: usize) -> bool {
        candidate > current
    }
}

/// Number of records backing each `(run index, time index)` slot.
///
/// Partition views whose nominal axes outrun the data actually present
/// report zero for the missing slots, and attribution skips them.
pub trait SlotDensity {
    fn count(&self, run_idx: usize, time_idx: usize) -> usize;
}

impl<F> SlotDensity for F
where
    F: Fn(usize, usize) -> usize,
{
    fn count(&self, run_idx: usize, time_idx: usize) -> usize {
        self(run_idx, time_idx)
    }
}

/// Ragged record-count matrix, one row per run sized to that run's axis.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SlotCounts {
    rows: Vec<Vec<usize>>,
}

impl SlotCounts {
    /// Zero counts for runs with the given axis sizes.
    pub fn zeroed(axis_sizes: impl IntoIterator<Item = usize>) -> Self {
        Self {
            rows: axis_sizes.into_iter().map(|n| vec![0; n]).collect(),
        }
    }

    pub(crate) fn from_rows(rows: Vec<Vec<usize>>) -> Self {
        Self { rows }
    }

    /// Add `n` records to a slot.
    pub fn add(&mut self, run_idx: usize, time_idx: usize, n: usize) -> Result<()> {
        let n_runs = self.rows.len();
        let row = self
            .rows
            .get_mut(run_idx)
            .ok_or_else(|| CoordError::index_out_of_range("slot counts", run_idx, n_runs))?;
        let row_len = row.len();
        let cell = row
            .get_mut(time_idx)
            .ok_or_else(|| CoordError::index_out_of_range("slot counts row", time_idx, row_len))?;
        *cell += n;
        Ok(())
    }

    pub fn n_runs(&self) -> usize {
        self.rows.len()
    }

    /// Total number of records over all slots.
    pub fn total(&self) -> usize {
        self.rows.iter().flatten().sum()
    }

    /// Number of slots with no backing record.
    pub fn missing(&self) -> usize {
        self.rows.iter().flatten().filter(|&&n| n == 0).count()
    }
}

impl SlotDensity for SlotCounts {
    fn count(&self, run_idx: usize, time_idx: usize) -> usize {
        self.rows
            .get(run_idx)
            .and_then(|row| row.get(time_idx))
            .copied()
            .unwrap_or(0)
    }
}
