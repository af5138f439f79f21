//! Common infrastructure modules shared across analysis phases
//!
//! This module provides reusable infrastructure for:
//! - Data structures for benchmark result rows
//! - Bar chart description and rendering
//! - ASCII table formatting of speed-up ratios

pub mod data_structures;
pub mod plots;
pub mod tables;

// Re-export commonly used items
pub use data_structures::{ConditionKey, GroupKey, ResultRow, ResultTable};
pub use plots::{AxisTick, Bar, BarChart, BarSeries, PlotError};
