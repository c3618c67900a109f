//! Bounded worker pool over targets.
//!
//! Up to `workers` targets are in flight at once, each on its own tokio task.
//! Handles are awaited front to back, so results come out in input order even
//! when later targets finish first. The stop signal is consulted before each
//! new target is started; targets already in flight are allowed to finish.

use std::collections::VecDeque;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rgscan_common::error;
use rgscan_common::scan::{CheckKind, ScanResult, ScanTarget};
use tokio::task::JoinHandle;

use super::{Inspector, StopSignal};

pub(super) async fn scan_ordered(
    inspector: Arc<Inspector>,
    targets: &[ScanTarget],
    kinds: &[CheckKind],
    since: DateTime<Utc>,
    signal: &StopSignal,
    workers: usize,
    on_result: &mut dyn FnMut(usize, &ScanResult),
) -> (Vec<ScanResult>, bool) {
    let kinds: Arc<[CheckKind]> = Arc::from(kinds);
    let mut in_flight: VecDeque<(usize, JoinHandle<ScanResult>)> = VecDeque::with_capacity(workers);
    let mut results: Vec<ScanResult> = Vec::with_capacity(targets.len());
    let mut next_target: usize = 0;
    let mut cancelled: bool = false;

    loop {
        while !cancelled && in_flight.len() < workers && next_target < targets.len() {
            if signal.is_stopped() {
                cancelled = true;
                break;
            }
            let target: ScanTarget = targets[next_target].clone();
            let inspector = inspector.clone();
            let kinds = kinds.clone();
            let handle = tokio::spawn(async move { inspector.inspect(&target, &kinds, since).await });
            in_flight.push_back((next_target, handle));
            next_target += 1;
        }

        let Some((idx, handle)) = in_flight.pop_front() else {
            break;
        };

        let result: ScanResult = match handle.await {
            Ok(result) => result,
            Err(err) => {
                error!("Scan task for {} aborted: {err}", targets[idx]);
                ScanResult::not_found(targets[idx].clone(), &kinds)
                    .with_error(format!("scan task aborted: {err}"))
            }
        };
        on_result(idx, &result);
        results.push(result);
    }

    (results, cancelled)
}
