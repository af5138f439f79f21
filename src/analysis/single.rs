//! Single-case speed-up chart
//!
//! One bar per `(Function, Init. Condition)` group of a single directory.

use crate::analysis::speedup::{compute_speedups, SpeedupError, SpeedupSummary};
use crate::common::plots::render_bar_chart;
use crate::common::tables::format_speedup_table;
use crate::common::{AxisTick, Bar, BarChart, BarSeries, PlotError};
use crate::config::PlotConfig;
use crate::parsing::{load_case, ParsingError};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Width of a bar in the single-case chart.
const BAR_WIDTH: f64 = 0.8;

/// Errors that can occur while producing the single-case chart
#[derive(Error, Debug)]
pub enum SingleError {
    #[error("Failed to load results: {0}")]
    Parsing(#[from] ParsingError),

    #[error("Failed to aggregate results: {0}")]
    Speedup(#[from] SpeedupError),

    #[error("Failed to generate plot: {0}")]
    PlotGeneration(#[from] PlotError),
}

type Result<T> = core::result::Result<T, SingleError>;

/// Lays out one bar per group at positions `0, 1, 2, ...`, each labelled with its condition.
pub fn build_single_chart(summary: &SpeedupSummary, config: &PlotConfig) -> BarChart {
    let bars = summary
        .ratios()
        .into_iter()
        .enumerate()
        .map(|(index, ratio)| Bar {
            center: index as f64,
            width: BAR_WIDTH,
            height: ratio,
        })
        .collect();

    let ticks = summary
        .conditions()
        .into_iter()
        .enumerate()
        .map(|(index, condition)| AxisTick {
            position: index as f64,
            label: format!("{}{}", config.condition_prefix, condition),
        })
        .collect();

    BarChart {
        series: vec![BarSeries { label: None, bars }],
        ticks,
        y_label: config.single_y_label.clone(),
        grid: true,
    }
}

/// Generate the single-case speed-up chart
///
/// Loads the results in `dir` and prints the ratio table. An image is only written
/// when `output` is given.
///
/// # Returns
/// * `Ok(SpeedupSummary)` - The aggregated groups
/// * `Err(SingleError)` - If loading, aggregation or rendering failed
pub fn generate_single_plot(
    dir: &Path,
    config: &PlotConfig,
    output: Option<&Path>,
) -> Result<SpeedupSummary> {
    let table = load_case(dir, config.settings.file_order)?;
    let summary = compute_speedups(&table, config.settings.ratio_chain)?;

    let title = dir.display().to_string();
    println!("{}", format_speedup_table(&summary, Some(title.as_str())));

    if let Some(output) = output {
        let chart = build_single_chart(&summary, config);
        render_bar_chart(&chart, output, config.size())?;
        info!(output = %output.display(), "saved single-case chart");
    }

    Ok(summary)
}
