//! The resource group **scan engine**.
//!
//! Given an ordered list of targets and a set of [`CheckKind`]s, the engine
//! asks the [`ExistenceProbe`] about every target, runs the registered
//! [`Check`] for each requested kind against the groups that exist, and
//! folds the outcomes into one [`ScanResult`] per target.
//!
//! Failure handling is deliberately local:
//! * a failed existence lookup turns the target into `NotFound` and keeps the error text,
//! * a failed or panicking check zeroes only its own slot, the remaining checks still run,
//! * nothing is retried here; retries belong to the collaborator.
//!
//! Output order always matches input order, duplicates included.

use std::collections::BTreeMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::anyhow;
use chrono::{DateTime, Utc};
use rgscan_common::error::{Result, ScanError};
use rgscan_common::scan::{CheckKind, CheckOutcome, ScanResult, ScanSummary, ScanTarget};
use rgscan_common::{debug, info, warn};

use crate::ports::{Check, ExistenceProbe};

mod parallel;
mod signal;

pub use signal::StopSignal;

/// What a finished (or stopped) scan hands back.
#[derive(Debug, Clone)]
pub struct ScanReport {
    pub results: Vec<ScanResult>,
    pub summary: ScanSummary,
    /// Set when the stop signal fired before every target was scanned.
    /// `results` then holds the targets completed so far, still in input order.
    pub cancelled: bool,
    pub elapsed: Duration,
}

/// Probe plus check collaborators, shared with worker tasks.
#[derive(Clone)]
pub(crate) struct Inspector {
    probe: Arc<dyn ExistenceProbe>,
    checks: BTreeMap<CheckKind, Arc<dyn Check>>,
}

impl Inspector {
    /// Scans a single target. Never fails: every problem ends up on the result.
    pub(crate) async fn inspect(
        &self,
        target: &ScanTarget,
        kinds: &[CheckKind],
        since: DateTime<Utc>,
    ) -> ScanResult {
        let probe = self.probe.clone();
        let owned = target.clone();
        let exists = match isolated(async move { probe.exists(&owned).await }).await {
            Ok(exists) => exists,
            Err(err) => {
                warn!("Existence lookup for {target} failed, treating it as missing: {err:#}");
                return ScanResult::not_found(target.clone(), kinds)
                    .with_error(format!("existence check failed: {err:#}"));
            }
        };

        if !exists {
            debug!("{target} does not exist, skipping checks");
            return ScanResult::not_found(target.clone(), kinds);
        }

        let mut result = ScanResult::found(target.clone());
        for kind in kinds {
            let outcome = match self.checks.get(kind) {
                Some(check) => {
                    let check = check.clone();
                    let owned = target.clone();
                    match isolated(async move { check.run(&owned, since).await }).await {
                        Ok(output) => CheckOutcome::from(output),
                        Err(err) => {
                            warn!("{kind} check failed for {target}: {err:#}");
                            CheckOutcome::failed(format!("{err:#}"))
                        }
                    }
                }
                None => CheckOutcome::failed(format!("no collaborator registered for the {kind} check")),
            };
            result.record(*kind, outcome);
        }
        result
    }
}

pub struct ScanEngine {
    inspector: Inspector,
    parallelism: usize,
}

impl ScanEngine {
    pub fn new(probe: impl ExistenceProbe + 'static) -> Self {
        Self::with_probe(Arc::new(probe))
    }

    pub fn with_probe(probe: Arc<dyn ExistenceProbe>) -> Self {
        Self {
            inspector: Inspector {
                probe,
                checks: BTreeMap::new(),
            },
            parallelism: 1,
        }
    }

    /// Registers a check. A later check of the same kind replaces the earlier one.
    pub fn with_check(self, check: impl Check + 'static) -> Self {
        self.add_check(Arc::new(check))
    }

    pub fn add_check(mut self, check: Arc<dyn Check>) -> Self {
        self.inspector.checks.insert(check.kind(), check);
        self
    }

    /// Number of targets scanned at once. Values below 2 keep the scan sequential.
    pub fn with_parallelism(mut self, workers: usize) -> Self {
        self.parallelism = workers.max(1);
        self
    }

    pub async fn scan(
        &self,
        targets: &[ScanTarget],
        kinds: &[CheckKind],
        since: DateTime<Utc>,
        signal: &StopSignal,
    ) -> Result<ScanReport> {
        self.scan_with(targets, kinds, since, signal, |_, _| {}).await
    }

    /// Like [`ScanEngine::scan`], calling `on_result` with each finished
    /// result as soon as it and all earlier targets are done.
    pub async fn scan_with<F>(
        &self,
        targets: &[ScanTarget],
        kinds: &[CheckKind],
        since: DateTime<Utc>,
        signal: &StopSignal,
        mut on_result: F,
    ) -> Result<ScanReport>
    where
        F: FnMut(usize, &ScanResult),
    {
        let kinds: Vec<CheckKind> = normalize_kinds(kinds)?;
        let start_time: Instant = Instant::now();

        info!(
            "Scanning {} resource groups ({})",
            targets.len(),
            kinds.iter().map(|k| k.label()).collect::<Vec<_>>().join(", ")
        );

        let (results, cancelled) = if self.parallelism > 1 && targets.len() > 1 {
            let inspector = Arc::new(self.inspector.clone());
            parallel::scan_ordered(
                inspector,
                targets,
                &kinds,
                since,
                signal,
                self.parallelism,
                &mut on_result,
            )
            .await
        } else {
            self.scan_sequential(targets, &kinds, since, signal, &mut on_result)
                .await
        };

        if cancelled {
            warn!(
                "Scan stopped early: {} of {} resource groups scanned",
                results.len(),
                targets.len()
            );
        }

        let summary = ScanSummary::from_results(&results);
        Ok(ScanReport {
            results,
            summary,
            cancelled,
            elapsed: start_time.elapsed(),
        })
    }

    async fn scan_sequential(
        &self,
        targets: &[ScanTarget],
        kinds: &[CheckKind],
        since: DateTime<Utc>,
        signal: &StopSignal,
        on_result: &mut dyn FnMut(usize, &ScanResult),
    ) -> (Vec<ScanResult>, bool) {
        let mut results: Vec<ScanResult> = Vec::with_capacity(targets.len());

        for (idx, target) in targets.iter().enumerate() {
            if signal.is_stopped() {
                return (results, true);
            }
            let result = self.inspector.inspect(target, kinds, since).await;
            on_result(idx, &result);
            results.push(result);
        }

        (results, false)
    }
}

/// Runs one collaborator call on its own task, so a panic inside it is
/// reported as that call's error instead of tearing down the scan.
async fn isolated<T, F>(call: F) -> anyhow::Result<T>
where
    F: Future<Output = anyhow::Result<T>> + Send + 'static,
    T: Send + 'static,
{
    match tokio::spawn(call).await {
        Ok(result) => result,
        Err(err) => Err(anyhow!("collaborator aborted: {err}")),
    }
}

/// Sorts into run order and drops repeats. An empty set is a caller error.
fn normalize_kinds(kinds: &[CheckKind]) -> Result<Vec<CheckKind>> {
    let mut kinds: Vec<CheckKind> = kinds.to_vec();
    kinds.sort();
    kinds.dedup();
    if kinds.is_empty() {
        return Err(ScanError::NoChecks);
    }
    Ok(kinds)
}
