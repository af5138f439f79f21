//! Result file discovery
//!
//! The benchmark harness writes one `results_<rank>.dat` file per MPI rank into each
//! case directory. This module finds those files; loading them is [`crate::parsing`]'s job.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Substring every result file name carries.
pub const RESULT_FILE_MARKER: &str = "results_";

// ASCII only: `\d` would also match digits such as `٣` that `str::parse` rejects
static DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").expect("digit pattern is valid"));

/// Errors that can occur while listing a case directory
#[derive(Error, Debug)]
pub enum DiscoveryError {
    #[error("Failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read entry in {path}: {source}")]
    Entry {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

type Result<T> = core::result::Result<T, DiscoveryError>;

/// Order in which discovered result files are handed to the loader.
///
/// File order decides which model is encountered first in every group,
/// and therefore which model ends up as the ratio numerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FileOrder {
    /// Whatever order the operating system lists the directory in.
    Listing,
    /// Ascending by embedded processor tag, then by name.
    #[default]
    Numeric,
}

impl FromStr for FileOrder {
    type Err = String;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        match s {
            "listing" => Ok(FileOrder::Listing),
            "numeric" => Ok(FileOrder::Numeric),
            other => Err(format!(
                "unknown file order '{}', expected 'listing' or 'numeric'",
                other
            )),
        }
    }
}

/// Returns the first run of decimal digits in `name`, if any.
pub fn processor_tag(name: &str) -> Option<&str> {
    DIGITS.find(name).map(|m| m.as_str())
}

/// Lists the entries of `dir` whose file name contains [`RESULT_FILE_MARKER`]
///
/// # Arguments
/// * `dir` - Case directory to scan
/// * `order` - How the matching entries are ordered
///
/// # Returns
/// * `Ok(Vec<PathBuf>)` - Matching paths, possibly empty
/// * `Err(DiscoveryError)` - If the directory could not be listed
pub fn find_result_files(dir: &Path, order: FileOrder) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|source| DiscoveryError::ReadDir {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| DiscoveryError::Entry {
            path: dir.to_path_buf(),
            source,
        })?;

        let name = entry.file_name();
        if name.to_string_lossy().contains(RESULT_FILE_MARKER) {
            files.push(entry.path());
        }
    }

    if order == FileOrder::Numeric {
        files.sort_by_cached_key(|path| {
            let name = file_name_of(path);
            // Untagged names sort first; the loader rejects them anyway.
            let tag = processor_tag(&name).and_then(|digits| digits.parse::<u64>().ok());
            (tag, name)
        });
    }

    Ok(files)
}

/// File name of `path` as an owned string, empty if there is none.
pub(crate) fn file_name_of(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
