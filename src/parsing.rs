//! Loading of benchmark result files
//!
//! This module turns the `results_*` files of one case directory into a single
//! [`ResultTable`], tagging each row with the rank number found in its file name.

use crate::common::{ResultRow, ResultTable};
use crate::discovery::{self, file_name_of, processor_tag, DiscoveryError, FileOrder};
use csv::ReaderBuilder;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Errors that can occur while loading result files
#[derive(Error, Debug)]
pub enum ParsingError {
    #[error("Failed to list result files: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Failed to parse CSV file {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("File name '{0}' does not contain a processor number")]
    MissingProcessorTag(String),

    #[error("Processor number '{tag}' in file name '{name}' is out of range")]
    InvalidProcessorTag { name: String, tag: String },

    #[error("No result files found in {0}")]
    NoResultFiles(PathBuf),
}

type Result<T> = core::result::Result<T, ParsingError>;

/// Extracts the processor number from a result file name
///
/// The first run of ASCII digits wins, so `results_12.dat` yields `12`.
pub fn parse_processor_tag(name: &str) -> Result<u32> {
    let digits =
        processor_tag(name).ok_or_else(|| ParsingError::MissingProcessorTag(name.to_string()))?;

    digits
        .parse::<u32>()
        .map_err(|_| ParsingError::InvalidProcessorTag {
            name: name.to_string(),
            tag: digits.to_string(),
        })
}

/// Loads a single result file and tags every row with `processor`
///
/// # Arguments
/// * `path` - Comma separated file with a header row
/// * `processor` - Tag assigned to every row
///
/// Text cells are taken verbatim, so `" solve()"` and `"solve()"` stay distinct.
/// Numeric cells may carry surrounding whitespace, and blank ones load as `None`.
///
/// # Returns
/// * `Ok(ResultTable)` - One row per data line in the file
/// * `Err(ParsingError)` - If the file could not be read or a row is malformed
pub fn load_result_file(path: &Path, processor: u32) -> Result<ResultTable> {
    let csv_error = |source: csv::Error| ParsingError::Csv {
        path: path.to_path_buf(),
        source,
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .from_path(path)
        .map_err(csv_error)?;

    let mut rows = Vec::new();
    for record in reader.deserialize::<ResultRow>() {
        let mut row = record.map_err(csv_error)?;
        row.processor = processor;
        rows.push(row);
    }

    debug!(path = %path.display(), processor, rows = rows.len(), "loaded result file");
    Ok(ResultTable::new(rows))
}

/// Loads every result file of a case directory into one table
///
/// This function:
/// - Lists the `results_*` files of `dir` in the requested order
/// - Parses the processor number out of each file name
/// - Loads and tags each file
/// - Concatenates everything, re-indexing rows from 0
///
/// # Returns
/// * `Ok(ResultTable)` - The combined table
/// * `Err(ParsingError)` - On the first failure; nothing is skipped
pub fn load_case(dir: &Path, order: FileOrder) -> Result<ResultTable> {
    let files = discovery::find_result_files(dir, order)?;
    if files.is_empty() {
        return Err(ParsingError::NoResultFiles(dir.to_path_buf()));
    }

    let mut tables = Vec::with_capacity(files.len());
    for path in &files {
        let processor = parse_processor_tag(&file_name_of(path))?;
        tables.push(load_result_file(path, processor)?);
    }

    let table = ResultTable::concat(tables);
    info!(
        dir = %dir.display(),
        files = files.len(),
        rows = table.len(),
        "loaded case"
    );
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::fs;
    use tempfile::TempDir;

    const HEADER: &str = "Model,Function,Balancer,Init. Condition,Mean,Stdev";

    fn write(dir: &Path, name: &str, lines: &[&str]) -> PathBuf {
        let path = dir.join(name);
        let mut contents = String::from(HEADER);
        for line in lines {
            contents.push('\n');
            contents.push_str(line);
        }
        contents.push('\n');
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_load_result_file_tags_rows() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "results_4.dat",
            &[
                "Standard,solve(),none,0,10.5,0.1",
                "loadBalanced,solve(),simple,0,4.2,0.2",
                "Standard,solve(),none,1,8.0,0.3",
            ],
        );

        let table = load_result_file(&path, 4).unwrap();

        assert_eq!(table.len(), 3);
        assert!(table.rows.iter().all(|row| row.processor == 4));
        assert_eq!(table.rows[1].model, "loadBalanced");
        assert_eq!(table.rows[1].condition, "0");
        assert_eq!(table.rows[1].balancer.as_deref(), Some("simple"));
        assert_eq!(table.rows[0].mean, Some(10.5));
    }

    #[test]
    fn test_load_result_file_keeps_text_whitespace() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "results_0.dat",
            &[
                "Standard, solve(), none, 3, 1.5 , 0.0",
                "Standard,solve(),none,3,2.5,0.0",
            ],
        );

        let table = load_result_file(&path, 0).unwrap();
        assert_eq!(table.rows[0].function, " solve()");
        assert_eq!(table.rows[1].function, "solve()");
        assert_eq!(table.rows[0].condition, " 3");
        assert_eq!(table.rows[0].mean, Some(1.5));
        assert_eq!(table.rows[0].stdev, Some(0.0));
    }

    #[test]
    fn test_load_result_file_blank_mean() {
        let dir = TempDir::new().unwrap();
        let path = write(
            dir.path(),
            "results_0.dat",
            &[
                "Standard,solve(),none,0,,",
                "Standard,solve(),none,0,nan,0.1",
            ],
        );

        let table = load_result_file(&path, 0).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows[0].mean, None);
        assert_eq!(table.rows[0].stdev, None);
        assert!(table.rows[1].mean.is_some_and(f64::is_nan));
    }

    #[test]
    fn test_load_case_blank_mean_is_skipped() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "results_0.dat",
            &[
                "Standard,solve(),none,0,8.0,0.1",
                "Standard,solve(),none,0,,",
                "loadBalanced,solve(),simple,0,4.0,0.1",
            ],
        );

        let table = load_case(dir.path(), FileOrder::Numeric).unwrap();
        let summary =
            crate::analysis::compute_speedups(&table, crate::analysis::RatioChain::Sequential)
                .unwrap();
        assert_eq!(summary.ratios(), vec![2.0]);
    }

    #[test]
    fn test_load_result_file_without_balancer_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results_1.csv");
        fs::write(
            &path,
            "Function,Init. Condition,Model,Mean,Stdev\nsolve(),0,Standard,2.0,0.1\n",
        )
        .unwrap();

        let table = load_result_file(&path, 1).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].balancer, None);
    }

    #[test]
    fn test_load_result_file_missing_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("results_1.csv");
        fs::write(&path, "Function,Model,Mean,Stdev\nsolve(),Standard,2.0,0.1\n").unwrap();

        let result = load_result_file(&path, 1);
        assert!(matches!(result, Err(ParsingError::Csv { .. })));
    }

    #[test]
    fn test_load_result_file_malformed_number() {
        let dir = TempDir::new().unwrap();
        let path = write(dir.path(), "results_0.dat", &["Standard,solve(),none,0,fast,0.1"]);

        let result = load_result_file(&path, 0);
        assert!(matches!(result, Err(ParsingError::Csv { .. })));
    }

    #[test]
    fn test_load_case_concatenates_in_processor_order() {
        let dir = TempDir::new().unwrap();
        write(
            dir.path(),
            "results_1.dat",
            &[
                "Standard,solve(),none,0,3.0,0.0",
                "loadBalanced,solve(),simple,0,1.0,0.0",
            ],
        );
        write(
            dir.path(),
            "results_0.dat",
            &[
                "Standard,solve(),none,0,5.0,0.0",
                "loadBalanced,solve(),simple,0,2.0,0.0",
            ],
        );
        fs::write(dir.path().join("log.txt"), "not a result file").unwrap();

        let table = load_case(dir.path(), FileOrder::Numeric).unwrap();

        assert_eq!(table.len(), 4);
        let processors: Vec<u32> = table.rows.iter().map(|row| row.processor).collect();
        assert_eq!(processors, vec![0, 0, 1, 1]);
    }

    #[test]
    fn test_load_case_without_result_files() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("notes.txt"), "").unwrap();

        let result = load_case(dir.path(), FileOrder::Numeric);
        assert!(matches!(result, Err(ParsingError::NoResultFiles(_))));
    }

    #[test]
    fn test_load_case_untagged_file_fails() {
        let dir = TempDir::new().unwrap();
        write(dir.path(), "results_final.dat", &["Standard,solve(),none,0,1.0,0.0"]);

        let result = load_case(dir.path(), FileOrder::Listing);
        assert!(matches!(result, Err(ParsingError::MissingProcessorTag(_))));
    }

    #[rstest]
    #[case("results_0.dat", 0)]
    #[case("results_4.csv", 4)]
    #[case("results_320.dat", 320)]
    fn test_parse_processor_tag(#[case] name: &str, #[case] expected: u32) {
        assert_eq!(parse_processor_tag(name).unwrap(), expected);
    }

    #[test]
    fn test_parse_processor_tag_overflow() {
        let result = parse_processor_tag("results_99999999999.dat");
        assert!(matches!(
            result,
            Err(ParsingError::InvalidProcessorTag { .. })
        ));
    }

    #[test]
    fn test_parse_processor_tag_ignores_non_ascii_digits() {
        let result = parse_processor_tag("results_\u{663}.dat");
        assert!(matches!(result, Err(ParsingError::MissingProcessorTag(_))));
    }
}
