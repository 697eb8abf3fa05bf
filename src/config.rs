// Inference policy: thresholds and caps

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

pub const NUMERIC_THRESHOLD: f64 = 0.7;
pub const DEFAULT_SAMPLE_ROWS: usize = 100;
pub const CLASSIFY_SAMPLE_ROWS: usize = 200;
pub const MAX_SERIES_POINTS: usize = 1000;
pub const MAX_CATEGORIES: usize = 25;

/// Thresholds and caps used when inferring column types and deriving chart data.
///
/// `Policy::default()` reproduces the constants above. A JSON file may override
/// any subset of the fields; missing fields keep their defaults.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Policy {
    /// Minimum numeric ratio for a column to count as numeric (inclusive)
    #[serde(default = "default_numeric_threshold")]
    pub numeric_threshold: f64,
    /// Rows sampled when picking the default Y column
    #[serde(default = "default_sample_rows")]
    pub default_sample_rows: usize,
    /// Rows sampled when classifying the selected Y column
    #[serde(default = "default_classify_sample_rows")]
    pub classify_sample_rows: usize,
    #[serde(default = "default_max_series_points")]
    pub max_series_points: usize,
    /// Named categories kept before the rest collapse into "Other"
    #[serde(default = "default_max_categories")]
    pub max_categories: usize,
}

fn default_numeric_threshold() -> f64 { NUMERIC_THRESHOLD }
fn default_sample_rows() -> usize { DEFAULT_SAMPLE_ROWS }
fn default_classify_sample_rows() -> usize { CLASSIFY_SAMPLE_ROWS }
fn default_max_series_points() -> usize { MAX_SERIES_POINTS }
fn default_max_categories() -> usize { MAX_CATEGORIES }

impl Default for Policy {
    fn default() -> Self {
        Self {
            numeric_threshold: NUMERIC_THRESHOLD,
            default_sample_rows: DEFAULT_SAMPLE_ROWS,
            classify_sample_rows: CLASSIFY_SAMPLE_ROWS,
            max_series_points: MAX_SERIES_POINTS,
            max_categories: MAX_CATEGORIES,
        }
    }
}

impl Policy {
    pub fn from_json_str(input: &str) -> Result<Self> {
        let policy: Policy = serde_json::from_str(input).context("Invalid policy JSON")?;
        if !(0.0..=1.0).contains(&policy.numeric_threshold) {
            anyhow::bail!(
                "numeric_threshold must be within [0, 1], got {}",
                policy.numeric_threshold
            );
        }
        Ok(policy)
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read policy file '{}'", path.display()))?;
        Self::from_json_str(&text)
    }
}
