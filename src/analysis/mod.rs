//! Domain-specific analysis modules
//!
//! This module contains the analysis logic for:
//! - Speed-up ratio aggregation
//! - The grouped chart across processor counts
//! - The single-case chart

pub mod grouped;
pub mod single;
pub mod speedup;

// Re-export analysis functions for convenience
pub use grouped::{generate_grouped_plot, CaseSpeedup};
pub use single::generate_single_plot;
pub use speedup::{compute_speedups, RatioChain, SpeedupSummary};
