//! The runtime axis: sorted, unique model run reference times.

use chrono::{DateTime, Utc};

use crate::error::{CoordError, Result};

/// Ordered set of model run reference times.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuntimeAxis {
    runtimes: Vec<DateTime<Utc>>,
}

impl RuntimeAxis {
    /// Build an axis from runtimes in any order. Duplicates are dropped.
    pub fn new(mut runtimes: Vec<DateTime<Utc>>) -> Self {
        runtimes.sort_unstable();
        runtimes.dedup();
        Self { runtimes }
    }

    /// Build an axis from runtimes that are already strictly ascending.
    pub fn from_sorted(runtimes: Vec<DateTime<Utc>>) -> Result<Self> {
        if let Some(pos) = runtimes.windows(2).position(|w| w[0] >= w[1]) {
            return Err(CoordError::integrity(format!(
                "runtimes not strictly ascending at index {}: {} >= {}",
                pos + 1,
                runtimes[pos],
                runtimes[pos + 1]
            )));
        }
        Ok(Self { runtimes })
    }

    pub fn size(&self) -> usize {
        self.runtimes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.runtimes.is_empty()
    }

    /// The runtime at `index`.
    pub fn date_at(&self, index: usize) -> Result<DateTime<Utc>> {
        self.runtimes
            .get(index)
            .copied()
            .ok_or_else(|| CoordError::index_out_of_range("runtime axis", index, self.size()))
    }

    /// Index of a runtime known to be a member of this axis.
    ///
    /// A miss means the caller mixed up structures, so it is reported as
    /// an integrity violation rather than a plain not-found.
    pub fn index_of(&self, date: DateTime<Utc>) -> Result<usize> {
        self.runtimes.binary_search(&date).map_err(|_| {
            CoordError::integrity(format!("runtime {} is not a member of the runtime axis", date))
        })
    }

    pub fn first_date(&self) -> Option<DateTime<Utc>> {
        self.runtimes.first().copied()
    }

    pub fn last_date(&self) -> Option<DateTime<Utc>> {
        self.runtimes.last().copied()
    }

    pub fn dates(&self) -> &[DateTime<Utc>] {
        &self.runtimes
    }

    pub fn iter(&self) -> impl Iterator<Item = DateTime<Utc>> + '_ {
        self.runtimes.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn run(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_new_sorts_and_dedups() {
        let axis = RuntimeAxis::new(vec![run(12), run(0), run(6), run(0)]);
        assert_eq!(axis.size(), 3);
        assert_eq!(axis.dates(), &[run(0), run(6), run(12)]);
        assert_eq!(axis.first_date(), Some(run(0)));
        assert_eq!(axis.last_date(), Some(run(12)));
    }

    #[test]
    fn test_from_sorted_rejects_disorder() {
        assert!(RuntimeAxis::from_sorted(vec![run(0), run(6)]).is_ok());
        let err = RuntimeAxis::from_sorted(vec![run(6), run(0)]).unwrap_err();
        assert!(err.is_integrity());
        assert!(RuntimeAxis::from_sorted(vec![run(0), run(0)]).is_err());
    }

    #[test]
    fn test_date_at_out_of_range() {
        let axis = RuntimeAxis::new(vec![run(0)]);
        assert_eq!(axis.date_at(0).unwrap(), run(0));
        assert_eq!(
            axis.date_at(1).unwrap_err(),
            CoordError::index_out_of_range("runtime axis", 1, 1)
        );
    }

    #[test]
    fn test_index_of_member_and_non_member() {
        let axis = RuntimeAxis::new(vec![run(0), run(6), run(12)]);
        assert_eq!(axis.index_of(run(6)).unwrap(), 1);
        assert!(axis.index_of(run(18)).unwrap_err().is_integrity());
    }
}
