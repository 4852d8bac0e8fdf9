//! Build and report the time coordinate of decoded forecast records.
//!
//! Each input file is one partition of a collection. Partitions are built
//! into their own coordinates and then merged, the same way partitioned
//! archives are combined.

pub mod input;
pub mod report;

use anyhow::{Context, Result};
use forecast_time::{
    CoordinateConfig, ForecastRecord, ForecastRecordExtractor, IncrementalBuilder, SlotCounts,
    Time2DCoordinate,
};
use tracing::info;

pub use input::{load_records, parse_records};
pub use report::{CoordinateReport, OutputFormat};

fn builder(
    config: CoordinateConfig,
) -> Result<IncrementalBuilder<ForecastRecord, ForecastRecordExtractor>> {
    Ok(IncrementalBuilder::new(
        config,
        ForecastRecordExtractor::new(config.unit),
    )?)
}

/// Build one coordinate from record partitions.
///
/// A single partition is built directly so its slot counts reflect every
/// record. Several partitions are built separately and merged; the counts
/// then report one observation per partition holding a value.
pub fn build_coordinate(
    config: CoordinateConfig,
    partitions: &[Vec<ForecastRecord>],
) -> Result<(Time2DCoordinate, SlotCounts)> {
    if let [records] = partitions {
        let mut builder = builder(config)?;
        builder.add_records(records)?;
        return Ok(builder.finalize_with_counts()?);
    }

    let mut merged = builder(config)?;
    for (idx, records) in partitions.iter().enumerate() {
        let mut partition = builder(config)?;
        partition
            .add_records(records)
            .with_context(|| format!("partition {}", idx))?;
        let coord = partition
            .finalize()
            .with_context(|| format!("partition {}", idx))?;
        info!(
            partition = idx,
            runs = coord.n_runs(),
            values = coord.size(),
            "Built partition"
        );
        merged.merge_from(&coord)?;
    }
    Ok(merged.finalize_with_counts()?)
}
