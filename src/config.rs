//! Plant constants and their optional JSON overrides.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;

/// Nameplate rating of the plant in watts (2 MW).
pub const DEFAULT_RATED_CAPACITY_WATTS: f64 = 2_000_000.0;

/// Irradiance (W/m²) at or below which efficiency is reported as zero.
pub const DEFAULT_IRRADIANCE_THRESHOLD: f64 = 10.0;

/// Assumed sample spacing. The source files carry no timestamps, so this is
/// not derived from the data and should be checked against site metadata.
pub const DEFAULT_SAMPLE_INTERVAL_SECS: u32 = 5;

/// Upper bound of the initial row window.
pub const DEFAULT_WINDOW_ROWS: usize = 10_000;

/// Plant and dashboard parameters.
///
/// Every field has a default; a JSON file only needs to name the fields it
/// overrides.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlantConfig {
    /// Data file opened at startup when none is given on the command line.
    pub data_path: PathBuf,
    /// Nameplate capacity used as the efficiency denominator (W).
    pub rated_capacity_watts: f64,
    /// Efficiency is clipped to zero when irradiance is not above this (W/m²).
    pub irradiance_threshold: f64,
    /// Spacing of the synthesized timestamps (seconds, must be > 0).
    pub sample_interval_secs: u32,
    /// Timestamp of row 0.
    pub base_epoch: NaiveDateTime,
    /// Initial window is `(0, min(N, default_window_rows))`.
    pub default_window_rows: usize,
    /// Bins per axis for the thermal heatmap (must be > 0).
    pub heatmap_bins: usize,
}

impl Default for PlantConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("Generation_data.csv.zip"),
            rated_capacity_watts: DEFAULT_RATED_CAPACITY_WATTS,
            irradiance_threshold: DEFAULT_IRRADIANCE_THRESHOLD,
            sample_interval_secs: DEFAULT_SAMPLE_INTERVAL_SECS,
            base_epoch: default_base_epoch(),
            default_window_rows: DEFAULT_WINDOW_ROWS,
            heatmap_bins: 20,
        }
    }
}

fn default_base_epoch() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 1, 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

/// A violated constraint on one config field.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigError {
    /// Field name as written in the JSON file.
    pub field: &'static str,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {}: {}", self.field, self.message)
    }
}

impl PlantConfig {
    /// Parse a config from a JSON string.
    pub fn from_json_str(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing plant config JSON")
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("in {}", path.display()))
    }

    /// Check every constraint, returning all violations.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if !(self.rated_capacity_watts.is_finite() && self.rated_capacity_watts > 0.0) {
            errors.push(ConfigError {
                field: "rated_capacity_watts",
                message: format!("must be a positive number, got {}", self.rated_capacity_watts),
            });
        }
        if !self.irradiance_threshold.is_finite() {
            errors.push(ConfigError {
                field: "irradiance_threshold",
                message: format!("must be finite, got {}", self.irradiance_threshold),
            });
        }
        if self.sample_interval_secs == 0 {
            errors.push(ConfigError {
                field: "sample_interval_secs",
                message: "must be > 0".to_string(),
            });
        }
        if self.heatmap_bins == 0 {
            errors.push(ConfigError {
                field: "heatmap_bins",
                message: "must be > 0".to_string(),
            });
        }
        errors
    }

    /// Default row window for a dataset of `len` rows.
    pub fn default_window(&self, len: usize) -> (usize, usize) {
        (0, len.min(self.default_window_rows))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_two_megawatt_plant() {
        let cfg = PlantConfig::default();
        assert_eq!(cfg.rated_capacity_watts, 2_000_000.0);
        assert_eq!(cfg.irradiance_threshold, 10.0);
        assert_eq!(cfg.sample_interval_secs, 5);
        assert_eq!(cfg.base_epoch.to_string(), "2024-01-01 00:00:00");
        assert!(cfg.validate().is_empty());
    }

    #[test]
    fn partial_json_keeps_other_defaults() {
        let cfg = PlantConfig::from_json_str(
            r#"{ "rated_capacity_watts": 500000.0, "base_epoch": "2023-06-01T06:00:00" }"#,
        )
        .unwrap();
        assert_eq!(cfg.rated_capacity_watts, 500_000.0);
        assert_eq!(cfg.base_epoch.to_string(), "2023-06-01 06:00:00");
        assert_eq!(cfg.sample_interval_secs, 5);
        assert_eq!(cfg.default_window_rows, 10_000);
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(PlantConfig::from_json_str(r#"{ "capacity": 1.0 }"#).is_err());
    }

    #[test]
    fn validate_reports_every_violation() {
        let cfg = PlantConfig {
            rated_capacity_watts: 0.0,
            sample_interval_secs: 0,
            heatmap_bins: 0,
            irradiance_threshold: f64::NAN,
            ..PlantConfig::default()
        };
        let fields: Vec<&str> = cfg.validate().iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "rated_capacity_watts",
                "irradiance_threshold",
                "sample_interval_secs",
                "heatmap_bins"
            ]
        );
    }

    #[test]
    fn default_window_is_capped() {
        let cfg = PlantConfig::default();
        assert_eq!(cfg.default_window(25_000), (0, 10_000));
        assert_eq!(cfg.default_window(42), (0, 42));
        assert_eq!(cfg.default_window(0), (0, 0));
    }
}
