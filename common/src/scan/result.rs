use std::collections::BTreeMap;

use super::check::{CheckKind, CheckOutcome};
use super::target::ScanTarget;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Existence {
    Found,
    NotFound,
}

/// Everything one run learned about one target.
///
/// A `NotFound` result carries a zeroed slot for every requested check. A
/// `Found` group with zero counts is a different thing and stays
/// distinguishable: only the former can never be a cleanup candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanResult {
    pub target: ScanTarget,
    pub existence: Existence,
    pub checks: BTreeMap<CheckKind, CheckOutcome>,
    /// Target level note, e.g. why an existence lookup fell back to `NotFound`.
    pub error: Option<String>,
}

impl ScanResult {
    pub fn found(target: ScanTarget) -> Self {
        Self {
            target,
            existence: Existence::Found,
            checks: BTreeMap::new(),
            error: None,
        }
    }

    pub fn not_found(target: ScanTarget, kinds: &[CheckKind]) -> Self {
        Self {
            target,
            existence: Existence::NotFound,
            checks: kinds
                .iter()
                .map(|kind| (*kind, CheckOutcome::default()))
                .collect(),
            error: None,
        }
    }

    pub fn with_error(mut self, message: impl Into<String>) -> Self {
        self.error = Some(message.into());
        self
    }

    pub fn record(&mut self, kind: CheckKind, outcome: CheckOutcome) {
        self.checks.insert(kind, outcome);
    }

    pub fn is_found(&self) -> bool {
        self.existence == Existence::Found
    }

    pub fn outcome(&self, kind: CheckKind) -> Option<&CheckOutcome> {
        self.checks.get(&kind)
    }

    /// Count for `kind`, zero when the check was not run or failed.
    pub fn count(&self, kind: CheckKind) -> u64 {
        self.outcome(kind).map_or(0, |outcome| outcome.count)
    }

    pub fn total_count(&self) -> u64 {
        self.checks.values().map(|outcome| outcome.count).sum()
    }

    pub fn has_activity(&self) -> bool {
        self.is_found() && self.checks.values().any(|outcome| outcome.count > 0)
    }

    pub fn failed_checks(&self) -> impl Iterator<Item = (&CheckKind, &str)> {
        self.checks
            .iter()
            .filter_map(|(kind, outcome)| outcome.error.as_deref().map(|err| (kind, err)))
    }

    pub fn has_errors(&self) -> bool {
        self.error.is_some() || self.failed_checks().next().is_some()
    }

    /// An existing group whose resource count came back as zero.
    ///
    /// Requires the resource count to have actually succeeded: a failed count
    /// is "unknown", not "empty".
    pub fn is_cleanup_candidate(&self) -> bool {
        self.is_found()
            && matches!(
                self.outcome(CheckKind::ResourceCount),
                Some(CheckOutcome { count: 0, error: None, .. })
            )
    }
}
