//! Configuration for building time coordinates.

use serde::{Deserialize, Serialize};

use crate::period::PeriodUnit;
use crate::value::AxisVariant;

/// Unit, unit code, and axis variant shared by every value of a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinateConfig {
    /// Unit all offsets are expressed in.
    pub unit: PeriodUnit,

    /// Time unit code carried alongside the unit (GRIB2 table 4.4).
    pub code: u8,

    /// Point offsets or validity intervals.
    pub variant: AxisVariant,
}

impl Default for CoordinateConfig {
    fn default() -> Self {
        Self {
            unit: PeriodUnit::HOUR,
            code: 1,
            variant: AxisVariant::Point,
        }
    }
}

impl CoordinateConfig {
    pub fn new(unit: PeriodUnit, variant: AxisVariant) -> Self {
        Self {
            unit,
            code: unit.grib_code().unwrap_or(255),
            variant,
        }
    }

    /// Hourly point offsets.
    pub fn hourly_points() -> Self {
        Self::new(PeriodUnit::HOUR, AxisVariant::Point)
    }

    /// Hourly validity intervals.
    pub fn hourly_intervals() -> Self {
        Self::new(PeriodUnit::HOUR, AxisVariant::Interval)
    }

    /// Load configuration from environment variables.
    ///
    /// - `FORECAST_TIME_UNIT`: unit string, e.g. "hour" or "6 hours"
    /// - `FORECAST_TIME_UNIT_CODE`: GRIB2 table 4.4 code
    /// - `FORECAST_TIME_VARIANT`: "point" or "interval"
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from a key lookup; unparseable values keep their defaults.
    ///
    /// A code without a unit string selects the unit the code stands for.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let mut unit_set = false;

        if let Some(val) = lookup("FORECAST_TIME_UNIT") {
            if let Ok(unit) = val.parse::<PeriodUnit>() {
                config.unit = unit;
                config.code = unit.grib_code().unwrap_or(255);
                unit_set = true;
            }
        }

        if let Some(val) = lookup("FORECAST_TIME_UNIT_CODE") {
            if let Ok(code) = val.trim().parse::<u8>() {
                config.code = code;
                if !unit_set {
                    if let Some(unit) = PeriodUnit::from_grib_code(code) {
                        config.unit = unit;
                    }
                }
            }
        }

        if let Some(val) = lookup("FORECAST_TIME_VARIANT") {
            if let Some(variant) = AxisVariant::parse(&val) {
                config.variant = variant;
            }
        }

        config
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(expected) = self.unit.grib_code() {
            if expected != self.code {
                return Err(format!(
                    "time unit code {} does not match unit {} (code {})",
                    self.code, self.unit, expected
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CoordinateConfig::default();
        assert_eq!(config.unit, PeriodUnit::HOUR);
        assert_eq!(config.code, 1);
        assert_eq!(config.variant, AxisVariant::Point);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup() {
        let config = CoordinateConfig::from_lookup(lookup(&[
            ("FORECAST_TIME_UNIT", "6 hours"),
            ("FORECAST_TIME_VARIANT", "interval"),
        ]));
        assert_eq!(config.unit.value(), 6);
        assert_eq!(config.code, 11);
        assert_eq!(config.variant, AxisVariant::Interval);
    }

    #[test]
    fn test_from_lookup_code_only() {
        let config = CoordinateConfig::from_lookup(lookup(&[("FORECAST_TIME_UNIT_CODE", "0")]));
        assert_eq!(config.unit, PeriodUnit::MINUTE);
        assert_eq!(config.code, 0);
    }

    #[test]
    fn test_from_lookup_ignores_garbage() {
        let config = CoordinateConfig::from_lookup(lookup(&[
            ("FORECAST_TIME_UNIT", "fortnight"),
            ("FORECAST_TIME_VARIANT", "both"),
        ]));
        assert_eq!(config, CoordinateConfig::default());
    }

    #[test]
    fn test_validation() {
        let mut config = CoordinateConfig::default();
        config.code = 2;
        assert!(config.validate().is_err());

        // units without a table entry accept local codes
        let config = CoordinateConfig::new("2 hours".parse().unwrap(), AxisVariant::Point);
        assert_eq!(config.code, 255);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_partial() {
        let config: CoordinateConfig =
            serde_json::from_str(r#"{"unit":"day","code":2,"variant":"interval"}"#).unwrap();
        assert_eq!(config.unit, PeriodUnit::DAY);
        assert_eq!(config.variant, AxisVariant::Interval);

        let config: CoordinateConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, CoordinateConfig::default());
    }
}
