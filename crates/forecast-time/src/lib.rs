//! Two-dimensional time coordinate for archives of forecast model runs.
//!
//! Every model run ("runtime") contributes values at a set of forecast
//! offsets or validity intervals. This crate indexes those values on a
//! runtime x time grid and translates between per-run indices and a single
//! merged "best estimate" time axis.
//!
//! # Architecture
//!
//! ```text
//! records ──► IncrementalBuilder::add_record
//!                  │  (grouped by runtime, one accumulator per run)
//!                  ▼
//!             finalize()
//!                  │
//!                  ▼
//!           Time2DCoordinate ◄── immutable, shared by readers
//!              │        │
//!              │        ├─► org_value_at / index_of / rebase
//!              ▼        │
//!          best_axis()  └─► attribute_best_axis(best, density)
//!              │                     │
//!              ▼                     ▼
//!          BestAxis          RunAttributionMap
//! ```
//!
//! # Example
//!
//! ```
//! use chrono::{Duration, TimeZone, Utc};
//! use forecast_time::{
//!     CoordinateConfig, ForecastRecord, ForecastRecordExtractor, IncrementalBuilder, PeriodUnit,
//! };
//!
//! let base = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
//! let mut builder = IncrementalBuilder::new(
//!     CoordinateConfig::hourly_points(),
//!     ForecastRecordExtractor::new(PeriodUnit::HOUR),
//! )?;
//! for (run, hour) in [(0, 0), (0, 6), (6, 0), (6, 6)] {
//!     builder.add_record(&ForecastRecord::point(base + Duration::hours(run), hour))?;
//! }
//! let coord = builder.finalize()?;
//!
//! let best = coord.best_axis();
//! assert_eq!(best.size(), 3);
//! let map = coord.attribute_best_axis(&best, None)?;
//! assert_eq!(map.entries(), &[1, 2, 2]);
//! # Ok::<(), forecast_time::CoordError>(())
//! ```

pub mod best;
pub mod builder;
pub mod config;
pub mod error;
pub mod period;
pub mod record;
pub mod runtime;
pub mod time2d;
pub mod time_axis;
pub mod value;

// Re-export commonly used types at crate root
pub use best::{
    AttributionPolicy, BestAxis, LatestRunWins, RunAttributionMap, SlotCounts, SlotDensity,
};
pub use builder::IncrementalBuilder;
pub use config::CoordinateConfig;
pub use error::{CoordError, Result};
pub use period::{PeriodField, PeriodUnit};
pub use record::{ForecastRecord, ForecastRecordExtractor, RecordExtractor};
pub use runtime::RuntimeAxis;
pub use time2d::Time2DCoordinate;
pub use time_axis::{AxisValues, IntervalLength, TimeAxis, MIXED_INTERVALS};
pub use value::{AxisVariant, CompositeValue, Interval, LocalValue};
