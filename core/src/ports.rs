//! # Outbound Ports
//!
//! Contracts the scan engine needs from the outside world. The engine only
//! knows *that* a group can be looked up and checked, never *how*; the
//! [`crate::azure`] adapter and the test fakes implement these traits.
//!
//! All calls may fail. The engine decides what a failure means (a missing
//! group, a failed check slot), so implementations just return the error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rgscan_common::scan::{CheckKind, CheckOutput, ScanTarget};

/// Answers whether a resource group exists.
#[async_trait]
pub trait ExistenceProbe: Send + Sync {
    async fn exists(&self, target: &ScanTarget) -> anyhow::Result<bool>;
}

/// One kind of question asked of an existing resource group.
#[async_trait]
pub trait Check: Send + Sync {
    fn kind(&self) -> CheckKind;

    /// Runs the check. `since` is ignored by kinds without a time window.
    async fn run(&self, target: &ScanTarget, since: DateTime<Utc>) -> anyhow::Result<CheckOutput>;
}

/// Confirms the provider session is usable before any group is scanned.
#[async_trait]
pub trait SessionGuard: Send + Sync {
    async fn ensure_authenticated(&self) -> rgscan_common::error::Result<()>;
}
