//! Grouped speed-up chart across processor counts
//!
//! Each case directory (e.g. `core_40`) becomes one colour in the chart; its groups are
//! drawn side by side with the other cases, offset by one bar width per case.

use crate::analysis::speedup::{compute_speedups, SpeedupError, SpeedupSummary};
use crate::common::plots::render_bar_chart;
use crate::common::tables::format_speedup_table;
use crate::common::{AxisTick, Bar, BarChart, BarSeries, PlotError};
use crate::config::{AnalysisSettings, PlotConfig};
use crate::discovery::processor_tag;
use crate::parsing::{load_case, ParsingError};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors that can occur while producing the grouped chart
#[derive(Error, Debug)]
pub enum GroupedError {
    #[error("Case '{0}' does not contain a processor count")]
    MissingProcessorCount(String),

    #[error("Processor count in case '{0}' is out of range")]
    InvalidProcessorCount(String),

    #[error("Failed to load case '{case}': {source}")]
    Parsing {
        case: String,
        #[source]
        source: ParsingError,
    },

    #[error("Failed to aggregate case '{case}': {source}")]
    Speedup {
        case: String,
        #[source]
        source: SpeedupError,
    },

    #[error("Failed to generate plot: {0}")]
    PlotGeneration(#[from] PlotError),
}

type Result<T> = core::result::Result<T, GroupedError>;

/// Speed-up ratios of one case directory
#[derive(Debug, Clone, PartialEq)]
pub struct CaseSpeedup {
    pub case: String,
    pub processors: u32,
    pub summary: SpeedupSummary,
}

/// Processor count of a case, taken from the first run of digits in its name.
pub fn case_processor_count(case: &str) -> Result<u32> {
    let digits =
        processor_tag(case).ok_or_else(|| GroupedError::MissingProcessorCount(case.to_string()))?;
    digits
        .parse()
        .map_err(|_| GroupedError::InvalidProcessorCount(case.to_string()))
}

/// Loads and aggregates the case directory `root/case`
pub fn analyze_case(root: &Path, case: &str, settings: &AnalysisSettings) -> Result<CaseSpeedup> {
    let processors = case_processor_count(case)?;

    let table =
        load_case(&root.join(case), settings.file_order).map_err(|source| {
            GroupedError::Parsing {
                case: case.to_string(),
                source,
            }
        })?;

    let summary = compute_speedups(&table, settings.ratio_chain).map_err(|source| {
        GroupedError::Speedup {
            case: case.to_string(),
            source,
        }
    })?;

    info!(case, processors, groups = summary.len(), "analysed case");
    Ok(CaseSpeedup {
        case: case.to_string(),
        processors,
        summary,
    })
}

/// Lays out the grouped chart
///
/// The case at 1-based position `i` draws group `j` centred at `j - bar_width * i`,
/// so every case sits left of the integer group position. Ticks come straight from
/// [`crate::config::AxisConfig`] and ignore the actual number of groups.
pub fn build_grouped_chart(cases: &[CaseSpeedup], config: &PlotConfig) -> BarChart {
    let series = cases
        .iter()
        .enumerate()
        .map(|(index, case)| {
            let offset = config.bar_width * (index + 1) as f64;
            let bars = case
                .summary
                .ratios()
                .into_iter()
                .enumerate()
                .map(|(group, ratio)| Bar {
                    center: group as f64 - offset,
                    width: config.bar_width,
                    height: ratio,
                })
                .collect();

            BarSeries {
                label: Some(format!("{}{}", config.legend_prefix, case.processors)),
                bars,
            }
        })
        .collect();

    let ticks = config
        .axis
        .tick_positions
        .iter()
        .zip(&config.axis.tick_labels)
        .map(|(&position, label)| AxisTick {
            position,
            label: label.clone(),
        })
        .collect();

    BarChart {
        series,
        ticks,
        y_label: config.grouped_y_label.clone(),
        grid: false,
    }
}

/// Generate the grouped speed-up chart
///
/// Analyses every case in [`PlotConfig::cases`] under `root`, prints a table per case,
/// and writes the chart to [`PlotConfig::output`], replacing any existing file.
///
/// # Returns
/// * `Ok(Vec<CaseSpeedup>)` - The analysed cases, in configuration order
/// * `Err(GroupedError)` - On the first case that fails, or if rendering fails
pub fn generate_grouped_plot(root: &Path, config: &PlotConfig) -> Result<Vec<CaseSpeedup>> {
    let cases = config
        .cases
        .iter()
        .map(|case| analyze_case(root, case, &config.settings))
        .collect::<Result<Vec<_>>>()?;

    for case in &cases {
        println!("{}\n", format_speedup_table(&case.summary, Some(case.case.as_str())));
    }

    let chart = build_grouped_chart(&cases, config);
    render_bar_chart(&chart, &config.output, config.size())?;
    info!(output = %config.output.display(), "saved grouped chart");

    Ok(cases)
}
