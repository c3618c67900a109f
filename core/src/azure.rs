//! # Azure adapter
//!
//! Implements the engine's ports on top of the `az` command line.
//!
//! | Port | Command |
//! |---|---|
//! | [`SessionGuard`] | `az account show` |
//! | [`ExistenceProbe`] | `az group exists --name <rg>` |
//! | resource count | `az resource list --resource-group <rg>` |
//! | deployments since | `az deployment group list --resource-group <rg>` |
//! | activity log since | `az monitor activity-log list --resource-group <rg> --start-time <since> --end-time <until>` |
//!
//! Every command goes through a [`CommandRunner`], so the parsing and
//! filtering here can be exercised with canned JSON.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rgscan_common::error::{Result, ScanError};
use rgscan_common::scan::{CheckKind, CheckOutput, DetailRecord, ScanTarget};

use crate::ports::{Check, ExistenceProbe, SessionGuard};

mod model;
mod runner;

use model::{AzActivityEvent, AzDeployment, AzResource, parse_timestamp};
pub use runner::{AzCli, CommandRunner};

/// Upper bound handed to `--max-events`; the CLI default of 50 silently truncates.
const ACTIVITY_MAX_EVENTS: &str = "5000";
const DEPLOYMENT_OPERATION_PREFIX: &str = "microsoft.resources/deployments/";
const ACTIVITY_VERBS: [&str; 3] = ["/write", "/delete", "/action"];

/// Shared handle on the `az` CLI. Cheap to clone.
#[derive(Clone)]
pub struct AzureClient {
    runner: Arc<dyn CommandRunner>,
    subscription: Option<String>,
}

impl AzureClient {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            runner,
            subscription: None,
        }
    }

    pub fn with_subscription(mut self, subscription: Option<String>) -> Self {
        self.subscription = subscription;
        self
    }

    async fn az(&self, args: &[&str]) -> Result<String> {
        let mut full: Vec<String> = args.iter().map(|arg| arg.to_string()).collect();
        full.extend(["--output".to_string(), "json".to_string()]);
        if let Some(subscription) = &self.subscription {
            full.extend(["--subscription".to_string(), subscription.clone()]);
        }
        self.runner.run(&full).await
    }

    pub fn resource_count_check(&self) -> ResourceCountCheck {
        ResourceCountCheck {
            client: self.clone(),
        }
    }

    pub fn deployments_check(&self) -> DeploymentsCheck {
        DeploymentsCheck {
            client: self.clone(),
        }
    }

    /// `until` closes the query window. Without it `az` stops six hours after
    /// `--start-time`.
    pub fn activity_log_check(&self, exclude_deployment_ops: bool, until: DateTime<Utc>) -> ActivityLogCheck {
        ActivityLogCheck {
            client: self.clone(),
            exclude_deployment_ops,
            until,
        }
    }

    /// One check collaborator per kind, ready to hand to the engine.
    pub fn checks(&self, exclude_deployment_ops: bool, until: DateTime<Utc>) -> Vec<Arc<dyn Check>> {
        let resources: Arc<dyn Check> = Arc::new(self.resource_count_check());
        let deployments: Arc<dyn Check> = Arc::new(self.deployments_check());
        let activity: Arc<dyn Check> = Arc::new(self.activity_log_check(exclude_deployment_ops, until));
        vec![resources, deployments, activity]
    }
}

#[async_trait]
impl SessionGuard for AzureClient {
    async fn ensure_authenticated(&self) -> Result<()> {
        // Subscription is passed along so a missing subscription fails here too.
        match self.az(&["account", "show"]).await {
            Ok(_) => Ok(()),
            Err(ScanError::Command { message, .. }) => Err(ScanError::AuthenticationRequired(format!(
                "{message} (run 'az login' first)"
            ))),
            Err(other) => Err(ScanError::AuthenticationRequired(other.to_string())),
        }
    }
}

#[async_trait]
impl ExistenceProbe for AzureClient {
    async fn exists(&self, target: &ScanTarget) -> anyhow::Result<bool> {
        let stdout = self.az(&["group", "exists", "--name", target.name()]).await?;
        match stdout.trim() {
            "true" => Ok(true),
            "false" => Ok(false),
            other => anyhow::bail!("unexpected 'az group exists' output: {other}"),
        }
    }
}

pub struct ResourceCountCheck {
    client: AzureClient,
}

#[async_trait]
impl Check for ResourceCountCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::ResourceCount
    }

    async fn run(&self, target: &ScanTarget, _since: DateTime<Utc>) -> anyhow::Result<CheckOutput> {
        let stdout = self
            .client
            .az(&["resource", "list", "--resource-group", target.name()])
            .await?;
        let resources: Vec<AzResource> =
            serde_json::from_str(&stdout).context("parsing 'az resource list' output")?;

        let details = resources
            .into_iter()
            .map(|resource| DetailRecord::Resource {
                name: resource.name,
                resource_type: resource.resource_type.unwrap_or_default(),
                location: resource.location.unwrap_or_default(),
            })
            .collect();
        Ok(CheckOutput::from_details(details))
    }
}

pub struct DeploymentsCheck {
    client: AzureClient,
}

#[async_trait]
impl Check for DeploymentsCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::DeploymentsSince
    }

    async fn run(&self, target: &ScanTarget, since: DateTime<Utc>) -> anyhow::Result<CheckOutput> {
        let stdout = self
            .client
            .az(&["deployment", "group", "list", "--resource-group", target.name()])
            .await?;
        let deployments: Vec<AzDeployment> =
            serde_json::from_str(&stdout).context("parsing 'az deployment group list' output")?;

        Ok(CheckOutput::from_details(deployments_since(deployments, since)))
    }
}

/// Deployments stamped at or after `since`, newest first. Entries without a
/// readable timestamp cannot be placed in the window and are left out.
fn deployments_since(deployments: Vec<AzDeployment>, since: DateTime<Utc>) -> Vec<DetailRecord> {
    let mut recent: Vec<(DateTime<Utc>, DetailRecord)> = deployments
        .into_iter()
        .filter_map(|deployment| {
            let properties = deployment.properties.unwrap_or_default();
            let timestamp = properties.timestamp.as_deref().and_then(parse_timestamp)?;
            (timestamp >= since).then(|| {
                let record = DetailRecord::Deployment {
                    name: deployment.name,
                    state: properties.provisioning_state.unwrap_or_else(|| "Unknown".into()),
                    timestamp: Some(timestamp),
                    duration: properties.duration,
                };
                (timestamp, record)
            })
        })
        .collect();

    recent.sort_by(|a, b| b.0.cmp(&a.0));
    recent.into_iter().map(|(_, record)| record).collect()
}

pub struct ActivityLogCheck {
    client: AzureClient,
    exclude_deployment_ops: bool,
    until: DateTime<Utc>,
}

#[async_trait]
impl Check for ActivityLogCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::ActivityLogSince
    }

    async fn run(&self, target: &ScanTarget, since: DateTime<Utc>) -> anyhow::Result<CheckOutput> {
        let start_time: String = since.to_rfc3339_opts(SecondsFormat::Secs, true);
        let end_time: String = self.until.to_rfc3339_opts(SecondsFormat::Secs, true);
        let stdout = self
            .client
            .az(&[
                "monitor",
                "activity-log",
                "list",
                "--resource-group",
                target.name(),
                "--start-time",
                &start_time,
                "--end-time",
                &end_time,
                "--max-events",
                ACTIVITY_MAX_EVENTS,
            ])
            .await?;
        let events: Vec<AzActivityEvent> =
            serde_json::from_str(&stdout).context("parsing 'az monitor activity-log list' output")?;

        Ok(CheckOutput::from_details(activity_since(
            events,
            since,
            self.exclude_deployment_ops,
        )))
    }
}

/// Write, delete and action operations at or after `since`, newest first.
///
/// One operation produces several events (Started, Accepted, Succeeded) under
/// the same correlation id; only the newest of them is kept. Template
/// deployment operations can be dropped so a combined run does not count the
/// same deployment twice.
fn activity_since(
    events: Vec<AzActivityEvent>,
    since: DateTime<Utc>,
    exclude_deployment_ops: bool,
) -> Vec<DetailRecord> {
    let mut timed: Vec<(DateTime<Utc>, AzActivityEvent)> = events
        .into_iter()
        .filter_map(|event| {
            let timestamp = event.event_timestamp.as_deref().and_then(parse_timestamp)?;
            (timestamp >= since).then_some((timestamp, event))
        })
        .collect();
    timed.sort_by(|a, b| b.0.cmp(&a.0));

    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut records: Vec<DetailRecord> = Vec::new();

    for (timestamp, event) in timed {
        let operation = event.operation_name.unwrap_or_default();
        let op_value = operation.value.to_ascii_lowercase();

        if !ACTIVITY_VERBS.iter().any(|verb| op_value.ends_with(verb)) {
            continue;
        }
        if exclude_deployment_ops && op_value.starts_with(DEPLOYMENT_OPERATION_PREFIX) {
            continue;
        }
        if let Some(correlation_id) = &event.correlation_id
            && !seen.insert((correlation_id.clone(), op_value.clone()))
        {
            continue;
        }

        records.push(DetailRecord::Activity {
            operation: operation.display().to_string(),
            status: event
                .status
                .map(|status| status.display().to_string())
                .unwrap_or_else(|| "Unknown".into()),
            timestamp: Some(timestamp),
            caller: event.caller,
            resource_id: event.resource_id,
        });
    }

    records
}
