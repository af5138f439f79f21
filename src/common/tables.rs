//! ASCII table formatting of aggregated speed-up ratios
//!
//! This is how results are "shown": the chart data printed as a [`tabled`] table,
//! one line per group, right next to the log output.

use crate::analysis::speedup::SpeedupSummary;
use tabled::{Table, Tabled};

/// One displayed row of a speed-up summary
#[derive(Debug, Clone, Tabled)]
pub struct SpeedupEntry {
    #[tabled(rename = "Function")]
    pub function: String,
    #[tabled(rename = "Init. Condition")]
    pub condition: String,
    /// Models with their maximum mean, in fold order
    #[tabled(rename = "Models")]
    pub models: String,
    #[tabled(rename = "Speed-up Ratio")]
    pub ratio: String,
}

impl SpeedupEntry {
    pub fn from_summary(summary: &SpeedupSummary) -> Vec<Self> {
        summary
            .groups
            .iter()
            .map(|group| SpeedupEntry {
                function: group.key.function.clone(),
                condition: group.condition.clone(),
                models: group
                    .models
                    .iter()
                    .map(|model| format!("{} ({:.4})", model.model, model.max_mean))
                    .collect::<Vec<_>>()
                    .join(" / "),
                ratio: format!("{:.3}", group.ratio),
            })
            .collect()
    }
}

/// Formats a speed-up summary as an ASCII table
///
/// # Arguments
/// * `summary` - Aggregated groups of one case
/// * `title` - Optional title printed above the table
///
/// # Returns
/// A formatted ASCII table as a [`String`]
pub fn format_speedup_table(summary: &SpeedupSummary, title: Option<&str>) -> String {
    if summary.is_empty() {
        return "No groups to display".to_string();
    }

    let table = Table::new(SpeedupEntry::from_summary(summary)).to_string();

    if let Some(title) = title {
        format!("{}\n{}\n{}", title, "=".repeat(title.chars().count()), table)
    } else {
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::speedup::{compute_speedups, RatioChain};
    use crate::common::data_structures::row;
    use crate::common::ResultTable;

    fn summary() -> SpeedupSummary {
        let table = ResultTable::new(vec![
            row("solve()", "0", "Standard", 8.0),
            row("solve()", "0", "loadBalanced", 2.0),
        ]);
        compute_speedups(&table, RatioChain::Sequential).unwrap()
    }

    #[test]
    fn test_speedup_entry_from_summary() {
        let entries = SpeedupEntry::from_summary(&summary());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].function, "solve()");
        assert_eq!(entries[0].condition, "0");
        assert_eq!(
            entries[0].models,
            "Standard (8.0000) / loadBalanced (2.0000)"
        );
        assert_eq!(entries[0].ratio, "4.000");
    }

    #[test]
    fn test_format_speedup_table() {
        let table = format_speedup_table(&summary(), Some("core_40"));
        assert!(table.contains("core_40\n======="));
        assert!(table.contains("Init. Condition"));
        assert!(table.contains("Speed-up Ratio"));
        assert!(table.contains("4.000"));

        // Test without title
        let table_no_title = format_speedup_table(&summary(), None);
        assert!(!table_no_title.contains("core_40"));
        assert!(table_no_title.contains("Models"));
    }

    #[test]
    fn test_format_empty_summary() {
        let table = format_speedup_table(&SpeedupSummary::default(), Some("Empty"));
        assert_eq!(table, "No groups to display");
    }
}
