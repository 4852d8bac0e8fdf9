//! Record file loading.
//!
//! A record file holds [`ForecastRecord`]s either as one JSON array or as
//! JSON lines, one record per line.

use std::path::Path;

use anyhow::{Context, Result};
use forecast_time::ForecastRecord;
use tracing::debug;

/// Parse records from JSON array or JSON lines text.
pub fn parse_records(text: &str) -> Result<Vec<ForecastRecord>> {
    let trimmed = text.trim_start();
    if trimmed.starts_with('[') {
        return serde_json::from_str(trimmed).context("invalid record array");
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(idx, line)| {
            serde_json::from_str(line).with_context(|| format!("invalid record on line {}", idx + 1))
        })
        .collect()
}

/// Read and parse a record file.
pub fn load_records(path: &Path) -> Result<Vec<ForecastRecord>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let records =
        parse_records(&text).with_context(|| format!("failed to parse {}", path.display()))?;
    debug!(path = %path.display(), records = records.len(), "Loaded record file");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use test_utils::{epoch, run_time};

    #[test]
    fn test_parse_array() {
        let text = r#"[
            {"reference_time": "2024-01-15T00:00:00Z", "forecast_time": 0},
            {"reference_time": "2024-01-15T06:00:00Z", "forecast_time": 0, "interval_end": 6}
        ]"#;
        let records = parse_records(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], ForecastRecord::point(epoch(), 0));
        assert_eq!(records[1], ForecastRecord::interval(run_time(6), 0, 6));
    }

    #[test]
    fn test_parse_json_lines() {
        let text = concat!(
            r#"{"reference_time": "2024-01-15T00:00:00Z", "forecast_time": 6}"#,
            "\n\n",
            r#"{"reference_time": "2024-01-15T00:00:00Z", "forecast_time": 360, "time_unit_code": 0}"#,
            "\n",
        );
        let records = parse_records(text).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].time_unit_code, 0);
    }

    #[test]
    fn test_parse_reports_bad_line() {
        let text = "{\"reference_time\": \"2024-01-15T00:00:00Z\", \"forecast_time\": 6}\nnot json\n";
        let err = parse_records(text).unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_load_records_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"{{"reference_time": "2024-01-15T12:00:00Z", "forecast_time": 3}}"#
        )
        .unwrap();
        let records = load_records(file.path()).unwrap();
        assert_eq!(records, vec![ForecastRecord::point(run_time(12), 3)]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(&dir.path().join("absent.json")).unwrap_err();
        assert!(err.to_string().contains("failed to read"));
    }
}
