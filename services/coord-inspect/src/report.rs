//! Coordinate reports and their formatting.

use chrono::{DateTime, Utc};
use comfy_table::{modifiers::UTF8_ROUND_CORNERS, presets::UTF8_FULL, Table};
use forecast_time::{
    AxisVariant, CoordError, LocalValue, PeriodUnit, SlotCounts, SlotDensity, Time2DCoordinate,
};
use serde::Serialize;

const TIME_FORMAT: &str = "%Y-%m-%dT%H:%MZ";

/// Output format of the CLI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

/// One run of the coordinate.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub runtime: DateTime<Utc>,
    /// Offset from the first runtime, in the coordinate unit
    pub alignment: i32,
    pub values: Vec<LocalValue>,
    /// Records observed for this run
    pub records: usize,
}

/// One slot of the best axis.
#[derive(Debug, Clone, Serialize)]
pub struct BestSlot {
    pub value: LocalValue,
    /// Zero-based index of the supplying run
    pub run: Option<usize>,
    pub runtime: Option<DateTime<Utc>>,
}

/// Everything the CLI prints about a coordinate.
#[derive(Debug, Clone, Serialize)]
pub struct CoordinateReport {
    pub variant: AxisVariant,
    pub unit: PeriodUnit,
    pub code: u8,
    pub reference_time: DateTime<Utc>,
    pub n_runs: usize,
    pub n_times: usize,
    pub total_values: usize,
    pub interval_name: Option<String>,
    pub runs: Vec<RunReport>,
    pub best: Vec<BestSlot>,
    pub missing_slots: usize,
}

impl CoordinateReport {
    /// Summarize a coordinate, attributing best-axis slots only to runs
    /// with records behind them.
    pub fn new(coord: &Time2DCoordinate, counts: &SlotCounts) -> Result<Self, CoordError> {
        let runtimes = coord.runtime_axis();
        let runs = coord
            .times()
            .iter()
            .zip(runtimes.iter())
            .zip(coord.alignments())
            .enumerate()
            .map(|(run_idx, ((axis, runtime), &alignment))| RunReport {
                runtime,
                alignment,
                values: axis.iter().collect(),
                records: (0..axis.size()).map(|t| counts.count(run_idx, t)).sum(),
            })
            .collect();

        let best_axis = coord.best_axis();
        let map = coord.attribute_best_axis(&best_axis, Some(counts as &dyn SlotDensity))?;
        let best = best_axis
            .iter()
            .zip(map.iter())
            .map(|(value, run)| BestSlot {
                value,
                run,
                runtime: run.and_then(|idx| runtimes.date_at(idx).ok()),
            })
            .collect();

        Ok(Self {
            variant: coord.variant(),
            unit: coord.unit(),
            code: coord.code(),
            reference_time: coord.reference_time(),
            n_runs: coord.n_runs(),
            n_times: coord.n_times(),
            total_values: coord.size(),
            interval_name: coord.time_interval_name(),
            runs,
            best,
            missing_slots: map.missing_count(),
        })
    }

    /// Format the report as console tables.
    pub fn format_table(&self) -> String {
        let mut summary = Table::new();
        summary
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec![format!("Time coordinate ({})", self.variant)]);
        summary.add_row(vec!["Unit:".to_string(), format!("{} (code {})", self.unit, self.code)]);
        summary.add_row(vec![
            "Reference:".to_string(),
            self.reference_time.format(TIME_FORMAT).to_string(),
        ]);
        summary.add_row(vec!["Runs:".to_string(), self.n_runs.to_string()]);
        summary.add_row(vec!["Times per run:".to_string(), self.n_times.to_string()]);
        summary.add_row(vec!["Values:".to_string(), self.total_values.to_string()]);
        if let Some(name) = &self.interval_name {
            summary.add_row(vec!["Intervals:".to_string(), name.clone()]);
        }

        let mut runs = Table::new();
        runs.load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec!["Run", "Runtime", "Align", "Records", "Values"]);
        for (idx, run) in self.runs.iter().enumerate() {
            runs.add_row(vec![
                idx.to_string(),
                run.runtime.format(TIME_FORMAT).to_string(),
                run.alignment.to_string(),
                run.records.to_string(),
                join(&run.values),
            ]);
        }

        format!(
            "{}\n{}\n{}",
            summary,
            runs,
            self.format_best_table()
        )
    }

    /// Format only the best axis and its attribution.
    pub fn format_best_table(&self) -> String {
        let mut table = Table::new();
        table
            .load_preset(UTF8_FULL)
            .apply_modifier(UTF8_ROUND_CORNERS)
            .set_header(vec!["Slot", "Value", "Run", "Runtime"]);
        for (slot, entry) in self.best.iter().enumerate() {
            table.add_row(vec![
                slot.to_string(),
                entry.value.to_string(),
                entry.run.map_or_else(|| "-".to_string(), |r| r.to_string()),
                entry
                    .runtime
                    .map_or_else(|| "-".to_string(), |t| t.format(TIME_FORMAT).to_string()),
            ]);
        }
        table.to_string()
    }

    /// Format the report as JSON.
    pub fn format_json(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn join(values: &[LocalValue]) -> String {
    values
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use forecast_time::{
        CoordinateConfig, ForecastRecord, ForecastRecordExtractor, IncrementalBuilder, TimeAxis,
    };
    use test_utils::{point_records, schedule};

    fn three_runs() -> (Time2DCoordinate, SlotCounts) {
        let mut builder = IncrementalBuilder::new(
            CoordinateConfig::hourly_points(),
            ForecastRecordExtractor::new(PeriodUnit::HOUR),
        )
        .unwrap();
        for (runtime, hour) in point_records(schedule::THREE_RUNS) {
            builder
                .add_record(&ForecastRecord::point(runtime, hour))
                .unwrap();
        }
        builder.finalize_with_counts().unwrap()
    }

    #[test]
    fn test_report_contents() {
        let (coord, counts) = three_runs();
        let report = CoordinateReport::new(&coord, &counts).unwrap();
        assert_eq!(report.n_runs, 3);
        assert_eq!(report.total_values, 8);
        assert_eq!(report.runs[2].records, 2);
        assert_eq!(report.runs[1].alignment, 6);
        assert_eq!(report.best.len(), 4);
        assert_eq!(report.best[2].run, Some(2));
        assert_eq!(report.best[2].runtime, Some(coord.runtime_axis().date_at(2).unwrap()));
        assert_eq!(report.missing_slots, 0);
        assert_eq!(report.interval_name, None);
    }

    #[test]
    fn test_report_skips_runs_without_records() {
        let (coord, _) = three_runs();
        // only the first run actually has data
        let mut counts = SlotCounts::zeroed(coord.times().iter().map(TimeAxis::size));
        for t in 0..3 {
            counts.add(0, t, 1).unwrap();
        }
        let report = CoordinateReport::new(&coord, &counts).unwrap();
        assert_eq!(report.best[2].run, Some(0));
        assert_eq!(report.best[3].run, None);
        assert_eq!(report.missing_slots, 1);
        assert!(report.format_best_table().contains('-'));
    }

    #[test]
    fn test_format_table() {
        let (coord, counts) = three_runs();
        let table = CoordinateReport::new(&coord, &counts).unwrap().format_table();
        assert!(table.contains("Time coordinate (point)"));
        assert!(table.contains("2024-01-15T12:00Z"));
        assert!(table.contains("0, 6, 12"));
    }

    #[test]
    fn test_format_json() {
        let (coord, counts) = three_runs();
        let json = CoordinateReport::new(&coord, &counts).unwrap().format_json().unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed["n_runs"], 3);
        assert_eq!(parsed["unit"], "hour");
        assert_eq!(parsed["best"].as_array().map(Vec::len), Some(4));
        assert_eq!(parsed["runs"][0]["alignment"], 0);
    }
}
