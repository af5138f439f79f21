//! # analyze-speedup
//! Speed-up ratio charts for load-balanced chemistry benchmark results.
//!
//! Each benchmark case is a directory of `results_<rank>.dat` CSV files. Rows are grouped by
//! `(Function, Init. Condition)`, each model in a group is reduced to its maximum mean, and
//! the ordered maxima are folded into a speed-up ratio.
//!
//! The pipeline is split into the stages:
//! - [`discovery`]: finding result files
//! - [`parsing`]: loading and joining them into a [`common::ResultTable`]
//! - [`analysis::speedup`]: grouping and ratio computation
//! - [`analysis::grouped`] / [`analysis::single`]: chart layout, rendering and display

pub mod analysis;
pub mod common;
pub mod config;
pub mod discovery;
pub mod parsing;

use thiserror::Error;

/// Errors that can occur during analysis
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Grouped chart error: {0}")]
    Grouped(#[from] analysis::grouped::GroupedError),

    #[error("Single-case chart error: {0}")]
    Single(#[from] analysis::single::SingleError),
}

pub type Result<T> = core::result::Result<T, AnalysisError>;
