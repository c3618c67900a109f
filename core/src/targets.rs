//! Reading the resource group list.
//!
//! One name per line. Surrounding whitespace is trimmed, blank lines and `#`
//! comments are skipped. Repeated names are kept unless the caller asks for
//! [`dedupe`], because the report is expected to mirror the input line for line.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use rgscan_common::error::{Result, ScanError};
use rgscan_common::scan::ScanTarget;

pub fn load_targets(path: &Path) -> Result<Vec<ScanTarget>> {
    let contents: String = fs::read_to_string(path).map_err(|source| ScanError::InputNotFound {
        path: path.to_path_buf(),
        source,
    })?;

    let targets: Vec<ScanTarget> = parse_targets(&contents);
    if targets.is_empty() {
        return Err(ScanError::EmptyInput {
            path: path.to_path_buf(),
        });
    }
    Ok(targets)
}

pub fn parse_targets(contents: &str) -> Vec<ScanTarget> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(ScanTarget::from)
        .collect()
}

/// Keeps the first occurrence of every name, preserving order.
pub fn dedupe(targets: Vec<ScanTarget>) -> Vec<ScanTarget> {
    let mut seen: HashSet<ScanTarget> = HashSet::new();
    targets
        .into_iter()
        .filter(|target| seen.insert(target.clone()))
        .collect()
}
