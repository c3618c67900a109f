//! CSV report.
//!
//! One row per detail record. A check with no records still gets one row, so
//! every scanned group shows up in the file even when nothing was found or
//! a check failed.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, SecondsFormat, Utc};
use rgscan_common::error::{Result, ScanError};
use rgscan_common::scan::{CheckKind, CheckOutcome, DetailRecord, ScanResult};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct ReportRow {
    pub resource_group: String,
    pub check: String,
    pub name: String,
    pub state: String,
    pub timestamp: String,
    pub extra: String,
    pub error: String,
}

impl ReportRow {
    fn summary(result: &ScanResult, kind: CheckKind, outcome: &CheckOutcome) -> Self {
        let state = if !result.is_found() {
            "NotFound".to_string()
        } else if outcome.is_failed() {
            "Error".to_string()
        } else {
            format!("Count={}", outcome.count)
        };
        Self {
            resource_group: result.target.to_string(),
            check: kind.display_name().to_string(),
            name: String::new(),
            state,
            timestamp: String::new(),
            extra: String::new(),
            error: row_error(result, outcome),
        }
    }

    fn detail(result: &ScanResult, outcome: &CheckOutcome, detail: &DetailRecord) -> Self {
        let extra: String = detail
            .extra()
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("; ");
        Self {
            resource_group: result.target.to_string(),
            check: detail.kind().display_name().to_string(),
            name: detail.name().to_string(),
            state: detail.state().to_string(),
            timestamp: detail.timestamp().map(format_timestamp).unwrap_or_default(),
            extra,
            error: row_error(result, outcome),
        }
    }
}

fn row_error(result: &ScanResult, outcome: &CheckOutcome) -> String {
    outcome
        .error
        .as_deref()
        .or(result.error.as_deref())
        .unwrap_or_default()
        .to_string()
}

pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Flattens results into report rows, in result order.
pub fn report_rows(results: &[ScanResult]) -> Vec<ReportRow> {
    let mut rows: Vec<ReportRow> = Vec::new();
    for result in results {
        for (kind, outcome) in &result.checks {
            if outcome.details.is_empty() {
                rows.push(ReportRow::summary(result, *kind, outcome));
            } else {
                rows.extend(
                    outcome
                        .details
                        .iter()
                        .map(|detail| ReportRow::detail(result, outcome, detail)),
                );
            }
        }
    }
    rows
}

pub fn write_report<W: io::Write>(writer: W, results: &[ScanResult]) -> csv::Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    let rows = report_rows(results);
    if rows.is_empty() {
        // Header only; serde derives it from the first record otherwise.
        csv_writer.write_record(HEADER)?;
    }
    for row in rows {
        csv_writer.serialize(row)?;
    }
    csv_writer.flush()?;
    Ok(())
}

pub const HEADER: [&str; 7] = [
    "ResourceGroup",
    "Check",
    "Name",
    "State",
    "Timestamp",
    "Extra",
    "Error",
];

/// Writes the report to `path`, creating missing parent directories.
pub fn export_report(path: &Path, results: &[ScanResult]) -> Result<PathBuf> {
    let to_export_error = |source: io::Error| ScanError::Export {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(to_export_error)?;
    }
    let file = fs::File::create(path).map_err(to_export_error)?;
    write_report(file, results).map_err(|err| to_export_error(err.into()))?;
    Ok(path.to_path_buf())
}

/// `rg-scan-<UTC timestamp>.csv`
pub fn default_report_path(now: DateTime<Utc>) -> PathBuf {
    PathBuf::from(format!("rg-scan-{}.csv", now.format("%Y%m%d-%H%M%S")))
}
