//! Plotting infrastructure for speed-up bar charts
//!
//! Charts are first described as a [`BarChart`] (plain data, easy to test) and then
//! rendered to PNG with the [`plotters`] bitmap backend.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::fs;
use std::ops::Range;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during plot generation
#[derive(Error, Debug)]
pub enum PlotError {
    #[error("Failed to create drawing area: {0}")]
    DrawingArea(String),

    #[error("Failed to configure chart: {0}")]
    ChartConfig(String),

    #[error("Failed to draw chart elements: {0}")]
    Drawing(String),

    #[error("Failed to save plot to file: {0}")]
    FileSave(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

type Result<T> = core::result::Result<T, PlotError>;

/// A single bar, positioned in data coordinates
#[derive(Debug, Clone, PartialEq)]
pub struct Bar {
    pub center: f64,
    pub width: f64,
    pub height: f64,
}

impl Bar {
    pub fn left(&self) -> f64 {
        self.center - self.width / 2.0
    }

    pub fn right(&self) -> f64 {
        self.center + self.width / 2.0
    }
}

/// Bars drawn in one colour, with an optional legend entry
#[derive(Debug, Clone, PartialEq)]
pub struct BarSeries {
    pub label: Option<String>,
    pub bars: Vec<Bar>,
}

/// A category label placed under the x-axis at an explicit position
#[derive(Debug, Clone, PartialEq)]
pub struct AxisTick {
    pub position: f64,
    pub label: String,
}

/// Renderer-independent description of a bar chart
#[derive(Debug, Clone, PartialEq)]
pub struct BarChart {
    pub series: Vec<BarSeries>,
    pub ticks: Vec<AxisTick>,
    pub y_label: String,
    /// Draw horizontal grid lines
    pub grid: bool,
}

impl BarChart {
    /// Total number of bars across all series.
    pub fn bar_count(&self) -> usize {
        self.series.iter().map(|series| series.bars.len()).sum()
    }

    /// X range covering every bar and every tick, padded by half a unit on each side.
    pub fn x_range(&self) -> Range<f64> {
        let bar_edges = self
            .series
            .iter()
            .flat_map(|series| series.bars.iter())
            .flat_map(|bar| [bar.left(), bar.right()]);
        let tick_positions = self.ticks.iter().map(|tick| tick.position);

        let (min, max) = bar_edges
            .chain(tick_positions)
            .filter(|x| x.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), x| {
                (min.min(x), max.max(x))
            });

        if min > max {
            return -0.5..0.5;
        }
        (min - 0.5)..(max + 0.5)
    }

    /// Upper bound of the y-axis: 10% headroom over the tallest finite bar.
    pub fn y_max(&self) -> f64 {
        let tallest = self
            .series
            .iter()
            .flat_map(|series| series.bars.iter())
            .map(|bar| bar.height)
            .filter(|height| height.is_finite())
            .fold(f64::NEG_INFINITY, f64::max);

        if tallest > 0.0 {
            tallest * 1.1
        } else {
            1.0
        }
    }
}

/// Renders a bar chart and saves it as a PNG file
///
/// # Arguments
/// * `chart` - The chart to draw
/// * `output_path` - Where the PNG is written; an existing file is overwritten
/// * `size` - Image size in pixels
///
/// # Returns
/// * `Ok(())` - If the chart was successfully created and saved
/// * `Err(PlotError)` - If the chart has no bars or drawing failed
///
/// # Chart Properties
/// * Y-axis: `0..1.1 * tallest bar`, labelled with [`BarChart::y_label`]
/// * X-axis: no automatic labels; [`BarChart::ticks`] are drawn at their positions
/// * Legend: one entry per labelled series, upper right, no frame
/// * Font rendering: needs a system `sans-serif` font
pub fn render_bar_chart(chart: &BarChart, output_path: &Path, size: (u32, u32)) -> Result<()> {
    if chart.bar_count() == 0 {
        return Err(PlotError::InvalidData("Chart has no bars".to_string()));
    }

    if let Some(parent) = output_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let root = BitMapBackend::new(output_path, size).into_drawing_area();
    root.fill(&WHITE)
        .map_err(|e| PlotError::DrawingArea(e.to_string()))?;

    let mut chart_context = ChartBuilder::on(&root)
        .margin(20)
        .x_label_area_size(60)
        .y_label_area_size(85)
        .build_cartesian_2d(chart.x_range(), 0.0..chart.y_max())
        .map_err(|e| PlotError::ChartConfig(e.to_string()))?;

    // X labels are replaced by the chart's own ticks below
    let mut mesh = chart_context.configure_mesh();
    mesh.y_desc(chart.y_label.as_str())
        .y_label_style(("sans-serif", 35))
        .label_style(("sans-serif", 25))
        .x_label_formatter(&|_| String::new())
        .y_label_formatter(&|y| format!("{:.1}", y))
        .disable_x_mesh();

    if !chart.grid {
        mesh.disable_y_mesh();
    }

    mesh.draw().map_err(|e| PlotError::Drawing(e.to_string()))?;

    for (index, series) in chart.series.iter().enumerate() {
        let color = Palette99::pick(index).to_rgba();

        let annotation = chart_context
            .draw_series(series.bars.iter().map(|bar| {
                Rectangle::new([(bar.left(), 0.0), (bar.right(), bar.height)], color.filled())
            }))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;

        if let Some(label) = &series.label {
            annotation.label(label.as_str()).legend(move |(x, y)| {
                Rectangle::new([(x, y - 6), (x + 12, y + 6)], color.filled())
            });
        }
    }

    if chart.series.iter().any(|series| series.label.is_some()) {
        chart_context
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.0))
            .border_style(WHITE.mix(0.0))
            .label_font(("sans-serif", 25))
            .draw()
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    let tick_style =
        TextStyle::from(("sans-serif", 30).into_font()).pos(Pos::new(HPos::Center, VPos::Top));
    for tick in &chart.ticks {
        let (x, y) = chart_context
            .plotting_area()
            .map_coordinate(&(tick.position, 0.0));
        root.draw(&Text::new(tick.label.clone(), (x, y + 10), tick_style.clone()))
            .map_err(|e| PlotError::Drawing(e.to_string()))?;
    }

    // Ensure everything is properly rendered and saved
    root.present()
        .map_err(|e| PlotError::Drawing(e.to_string()))?;

    Ok(())
}

/// Whether the bitmap backend can draw `sans-serif` text on this machine.
#[cfg(test)]
pub(crate) fn fonts_available() -> bool {
    let mut buffer = vec![0u8; 64 * 32 * 3];
    let root = BitMapBackend::with_buffer(&mut buffer, (64, 32)).into_drawing_area();
    root.draw(&Text::new("0", (0, 0), ("sans-serif", 12).into_font()))
        .is_ok()
}

/// Leading bytes of every PNG file.
#[cfg(test)]
pub(crate) const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

#[cfg(test)]
mod tests {
    use super::*;

    fn chart(bars: Vec<Bar>, ticks: Vec<AxisTick>) -> BarChart {
        BarChart {
            series: vec![BarSeries {
                label: Some("test".to_string()),
                bars,
            }],
            ticks,
            y_label: "Speed-up Ratio".to_string(),
            grid: true,
        }
    }

    fn bar(center: f64, height: f64) -> Bar {
        Bar {
            center,
            width: 0.5,
            height,
        }
    }

    #[test]
    fn test_bar_edges() {
        let bar = bar(1.0, 3.0);
        assert_eq!(bar.left(), 0.75);
        assert_eq!(bar.right(), 1.25);
    }

    #[test]
    fn test_x_range_covers_bars_and_ticks() {
        let chart = chart(
            vec![bar(0.0, 1.0), bar(1.0, 2.0)],
            vec![AxisTick {
                position: 2.5,
                label: "Very Balanced".to_string(),
            }],
        );

        let range = chart.x_range();
        assert_eq!(range.start, -0.75);
        assert_eq!(range.end, 3.0);
    }

    #[test]
    fn test_x_range_empty_chart() {
        let chart = chart(vec![], vec![]);
        assert_eq!(chart.x_range(), -0.5..0.5);
    }

    #[test]
    fn test_y_max_headroom() {
        let chart = chart(vec![bar(0.0, 2.0), bar(1.0, 4.0), bar(2.0, f64::NAN)], vec![]);
        assert!((chart.y_max() - 4.4).abs() < 1e-12);

        let flat = chart_with_heights(&[0.0]);
        assert_eq!(flat.y_max(), 1.0);
    }

    fn chart_with_heights(heights: &[f64]) -> BarChart {
        chart(
            heights
                .iter()
                .enumerate()
                .map(|(i, &h)| bar(i as f64, h))
                .collect(),
            vec![],
        )
    }

    #[test]
    fn test_render_bar_chart_validation() {
        let temp_dir = std::env::temp_dir();
        let output_path = temp_dir.join("test_empty_bar_chart.png");

        let result = render_bar_chart(&chart(vec![], vec![]), &output_path, (800, 600));
        assert!(matches!(result, Err(PlotError::InvalidData(_))));
        assert!(!output_path.exists());
    }

    #[test]
    fn test_render_bar_chart_success() {
        if !fonts_available() {
            return;
        }
        let temp_dir = tempfile::TempDir::new().unwrap();
        let output_path = temp_dir.path().join("nested").join("bars.png");

        let chart = chart(
            vec![bar(0.0, 2.0), bar(1.0, 4.0)],
            vec![AxisTick {
                position: 0.5,
                label: "ω = 0".to_string(),
            }],
        );
        let result = render_bar_chart(&chart, &output_path, (800, 600));

        assert!(result.is_ok());
        let bytes = fs::read(&output_path).unwrap();
        assert!(bytes.starts_with(&PNG_SIGNATURE));
    }
}
