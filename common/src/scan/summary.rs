use std::collections::BTreeMap;

use super::check::CheckKind;
use super::result::ScanResult;

/// Totals over a run. Always derived from the results, never kept alongside them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanSummary {
    pub total_groups: usize,
    pub found_groups: usize,
    pub not_found_groups: usize,
    /// Existing groups with at least one non-zero check.
    pub active_groups: usize,
    pub failed_checks: usize,
    pub totals: BTreeMap<CheckKind, u64>,
}

impl ScanSummary {
    pub fn from_results(results: &[ScanResult]) -> Self {
        let mut summary = ScanSummary {
            total_groups: results.len(),
            ..Default::default()
        };

        for result in results {
            for kind in result.checks.keys() {
                summary.totals.entry(*kind).or_insert(0);
            }

            if !result.is_found() {
                summary.not_found_groups += 1;
                continue;
            }

            summary.found_groups += 1;
            if result.has_activity() {
                summary.active_groups += 1;
            }
            summary.failed_checks += result.failed_checks().count();
            for (kind, outcome) in &result.checks {
                *summary.totals.entry(*kind).or_insert(0) += outcome.count;
            }
        }

        summary
    }

    pub fn total(&self, kind: CheckKind) -> u64 {
        self.totals.get(&kind).copied().unwrap_or(0)
    }

    pub fn quiet_groups(&self) -> usize {
        self.found_groups - self.active_groups
    }
}
