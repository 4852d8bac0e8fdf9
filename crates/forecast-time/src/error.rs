//! Error types for the forecast time coordinate.

use thiserror::Error;

use crate::value::AxisVariant;

/// Errors that can occur while building or querying a time coordinate.
///
/// Ordinary misses (a run that did not forecast a given lead time) are
/// reported as `None` by the lookup methods and never show up here.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoordError {
    /// An index is outside the bounds of an axis.
    #[error("index {index} out of range for {axis} of size {size}")]
    IndexOutOfRange {
        axis: &'static str,
        index: usize,
        size: usize,
    },

    /// A lookup that is guaranteed by construction failed. The data fed
    /// into the structure is internally inconsistent.
    #[error("integrity violation: {0}")]
    Integrity(String),

    /// A point value was supplied where an interval was configured, or the
    /// other way around.
    #[error("expected {expected} time value, found {found}")]
    VariantMismatch {
        expected: AxisVariant,
        found: AxisVariant,
    },

    /// A coordinate needs at least one runtime.
    #[error("time coordinate has no runtimes")]
    EmptyCoordinate,

    /// An alignment or shifted offset does not fit the offset type.
    #[error("offset overflow: {0}")]
    OffsetOverflow(String),

    /// A period unit string or code could not be understood.
    #[error("invalid period unit: {0}")]
    InvalidPeriodUnit(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),
}

impl CoordError {
    /// Create an Integrity error.
    pub fn integrity(msg: impl Into<String>) -> Self {
        Self::Integrity(msg.into())
    }

    /// Create an IndexOutOfRange error.
    pub fn index_out_of_range(axis: &'static str, index: usize, size: usize) -> Self {
        Self::IndexOutOfRange { axis, index, size }
    }

    /// Create an OffsetOverflow error.
    pub fn offset_overflow(msg: impl Into<String>) -> Self {
        Self::OffsetOverflow(msg.into())
    }

    /// Whether this error signals inconsistent input rather than a bad query.
    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }
}

/// Result type for time coordinate operations.
pub type Result<T> = std::result::Result<T, CoordError>;
