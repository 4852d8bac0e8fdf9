//! Shared test utilities for the forecast-time workspace.
//!
//! This crate provides common testing infrastructure including:
//! - Fixed run schedules (runtime offsets with their forecast hours)
//! - Record stream generators built from those schedules
//! - Ordering assertions
//!
//! # Usage
//!
//! Add to your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! test-utils = { path = "../test-utils" }
//! ```
//!
//! Then import in your tests:
//!
//! ```ignore
//! use test_utils::{fixtures, point_records};
//! ```

pub mod fixtures;
pub mod generators;

// Re-export commonly used items at the crate root
pub use fixtures::*;
pub use generators::*;

/// Macro asserting that a slice-like sequence is strictly ascending.
///
/// # Usage
///
/// ```
/// use test_utils::assert_strictly_ascending;
///
/// assert_strictly_ascending!([0, 6, 12]);
/// ```
#[macro_export]
macro_rules! assert_strictly_ascending {
    ($seq:expr) => {{
        let seq = &$seq;
        for (i, pair) in seq.windows(2).enumerate() {
            if !(pair[0] < pair[1]) {
                panic!(
                    "assertion failed: sequence not strictly ascending at index {}\n  {:?} >= {:?}",
                    i + 1,
                    pair[0],
                    pair[1]
                );
            }
        }
    }};
}
