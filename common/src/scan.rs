//! # Scan Models
//!
//! * [`target::ScanTarget`]: A resource group name read from the input list.
//! * [`check::CheckKind`]: Which question is asked of a group (resource count,
//!   deployments since, activity log since).
//! * [`check::DetailRecord`]: One row of evidence behind a count, tagged by kind.
//! * [`result::ScanResult`]: Everything learned about one target in one run.
//! * [`summary::ScanSummary`]: Totals derived from a slice of results.

pub mod check;
pub mod result;
pub mod summary;
pub mod target;

pub use check::{CheckKind, CheckOutcome, CheckOutput, DetailRecord};
pub use result::{Existence, ScanResult};
pub use summary::ScanSummary;
pub use target::ScanTarget;
