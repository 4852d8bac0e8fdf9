//! Time coordinate inspector.
//!
//! Reads decoded forecast record summaries (JSON array or JSON lines), builds
//! the runtime x offset coordinate and prints:
//! - runtimes with their alignment and local values
//! - the best-estimate axis with the run supplying each slot

use std::path::PathBuf;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use tracing::{debug, info, Level};
use tracing_subscriber::FmtSubscriber;

use coord_inspect::{build_coordinate, load_records, CoordinateReport, OutputFormat};
use forecast_time::{AxisVariant, CoordinateConfig, PeriodUnit};

#[derive(Parser, Debug)]
#[command(name = "coord-inspect")]
#[command(about = "Inspect the time coordinate of decoded forecast records")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Record files; each file is one partition
    #[arg(short, long, required = true, num_args = 1..)]
    records: Vec<PathBuf>,

    /// Coordinate unit, e.g. "hour" or "6 hours" (overrides FORECAST_TIME_UNIT)
    #[arg(long)]
    unit: Option<PeriodUnit>,

    /// Axis variant: point or interval (overrides FORECAST_TIME_VARIANT)
    #[arg(long)]
    variant: Option<String>,

    /// Output format
    #[arg(long, value_enum, default_value = "table")]
    format: OutputFormat,

    /// Log level
    #[arg(long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print runtimes, alignment and the best axis
    Summary,

    /// Print only the best axis and its run attribution
    Best,
}

fn coordinate_config(args: &Args) -> Result<CoordinateConfig> {
    let mut config = CoordinateConfig::from_env();
    if let Some(unit) = args.unit {
        config = CoordinateConfig::new(unit, config.variant);
    }
    if let Some(variant) = &args.variant {
        config.variant = match AxisVariant::parse(variant) {
            Some(v) => v,
            None => bail!("unknown axis variant '{}'", variant),
        };
    }
    if let Err(e) = config.validate() {
        bail!("invalid coordinate configuration: {}", e);
    }
    Ok(config)
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let config = coordinate_config(&args)?;
    debug!(unit = %config.unit, code = config.code, variant = %config.variant, "Coordinate config");

    let partitions = args
        .records
        .iter()
        .map(|path| load_records(path))
        .collect::<Result<Vec<_>>>()?;
    info!(
        partitions = partitions.len(),
        records = partitions.iter().map(Vec::len).sum::<usize>(),
        "Loaded records"
    );

    let (coord, counts) = build_coordinate(config, &partitions)?;
    let report = CoordinateReport::new(&coord, &counts)?;

    let output = match (args.command, args.format) {
        (_, OutputFormat::Json) => report.format_json()?,
        (Command::Summary, OutputFormat::Table) => report.format_table(),
        (Command::Best, OutputFormat::Table) => report.format_best_table(),
    };
    println!("{}", output);

    Ok(())
}
