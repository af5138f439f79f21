//! Plot configuration
//!
//! Every field has a default matching the benchmark campaign the tool was written for,
//! so an empty JSON object (or no config file at all) reproduces the standard figures.

use crate::analysis::speedup::RatioChain;
use crate::discovery::FileOrder;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    JsonParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Axis has {positions} tick positions but {labels} labels")]
    TickMismatch { positions: usize, labels: usize },
}

/// Options that change how ratios are computed, shared by both plot variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    pub ratio_chain: RatioChain,
    pub file_order: FileOrder,
}

/// Category ticks of the grouped chart
///
/// Ticks are placed at fixed positions whatever the number of groups,
/// so they only line up for the campaign layout they were written for.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AxisConfig {
    pub tick_positions: Vec<f64>,
    pub tick_labels: Vec<String>,
}

impl Default for AxisConfig {
    fn default() -> Self {
        Self {
            tick_positions: vec![-0.5, 2.5],
            tick_labels: vec!["Very Unbalanced".to_string(), "Very Balanced".to_string()],
        }
    }
}

/// Complete configuration of both plot variants
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Case directories of the grouped chart, relative to the root directory
    pub cases: Vec<String>,
    /// Image written by the grouped chart
    pub output: PathBuf,
    /// Width of a single bar in the grouped chart
    pub bar_width: f64,
    /// Prepended to each case's processor count in the legend
    pub legend_prefix: String,
    pub axis: AxisConfig,
    pub grouped_y_label: String,
    pub single_y_label: String,
    /// Prepended to each condition in the single-case tick labels
    pub condition_prefix: String,
    pub settings: AnalysisSettings,
    /// Image size in pixels
    pub width: u32,
    pub height: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            cases: ["core_20", "core_40", "core_80", "core_160", "core_320"]
                .iter()
                .map(|case| case.to_string())
                .collect(),
            output: PathBuf::from("Sr.png"),
            bar_width: 0.15,
            legend_prefix: "N$_{CPU}$: ".to_string(),
            axis: AxisConfig::default(),
            grouped_y_label: "Speed-up Ratio [-]".to_string(),
            single_y_label: "Speed-up Ratio".to_string(),
            condition_prefix: "ω = ".to_string(),
            settings: AnalysisSettings::default(),
            width: 1200,
            height: 800,
        }
    }
}

impl PlotConfig {
    /// Loads a configuration from a JSON file; missing fields keep their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self, ConfigError> {
        let file = File::open(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;

        let config: PlotConfig =
            serde_json::from_reader(BufReader::new(file)).map_err(|source| {
                ConfigError::JsonParse {
                    path: path.to_path_buf(),
                    source,
                }
            })?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let positions = self.axis.tick_positions.len();
        let labels = self.axis.tick_labels.len();
        if positions != labels {
            return Err(ConfigError::TickMismatch { positions, labels });
        }
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
