//! # Checks
//!
//! A check answers one question about a resource group and reports a count
//! plus the records behind it. The three kinds return differently shaped
//! records, so [`DetailRecord`] carries one variant per kind instead of a
//! loose bag of fields.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};

use crate::error::ScanError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum CheckKind {
    /// Number of resources currently in the group. Ignores the time window.
    ResourceCount,
    /// Template deployments recorded since the window start.
    DeploymentsSince,
    /// Write, delete and action operations logged since the window start.
    ActivityLogSince,
}

impl CheckKind {
    /// Every kind, in the order the engine runs them.
    pub const ALL: [CheckKind; 3] = [
        CheckKind::ResourceCount,
        CheckKind::DeploymentsSince,
        CheckKind::ActivityLogSince,
    ];

    pub fn takes_since(&self) -> bool {
        !matches!(self, CheckKind::ResourceCount)
    }

    /// Short name used on the command line.
    pub fn label(&self) -> &'static str {
        match self {
            CheckKind::ResourceCount => "resources",
            CheckKind::DeploymentsSince => "deployments",
            CheckKind::ActivityLogSince => "activity",
        }
    }

    /// Name used in reports and the terminal.
    pub fn display_name(&self) -> &'static str {
        match self {
            CheckKind::ResourceCount => "Resources",
            CheckKind::DeploymentsSince => "Deployments",
            CheckKind::ActivityLogSince => "Activity",
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for CheckKind {
    type Err = ScanError;

    /// Accepts the short label plus a few spellings used by the old scripts
    /// ("resource-count", "deployment", "activity-log", "logs").
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resources" | "resource" | "resource-count" | "count" => Ok(CheckKind::ResourceCount),
            "deployments" | "deployment" | "deploys" => Ok(CheckKind::DeploymentsSince),
            "activity" | "activity-log" | "activitylog" | "logs" => Ok(CheckKind::ActivityLogSince),
            other => Err(ScanError::UnknownCheck(other.to_string())),
        }
    }
}

/// One record behind a check count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetailRecord {
    Resource {
        name: String,
        resource_type: String,
        location: String,
    },
    Deployment {
        name: String,
        state: String,
        timestamp: Option<DateTime<Utc>>,
        duration: Option<String>,
    },
    Activity {
        operation: String,
        status: String,
        timestamp: Option<DateTime<Utc>>,
        caller: Option<String>,
        resource_id: Option<String>,
    },
}

impl DetailRecord {
    pub fn kind(&self) -> CheckKind {
        match self {
            DetailRecord::Resource { .. } => CheckKind::ResourceCount,
            DetailRecord::Deployment { .. } => CheckKind::DeploymentsSince,
            DetailRecord::Activity { .. } => CheckKind::ActivityLogSince,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            DetailRecord::Resource { name, .. } => name,
            DetailRecord::Deployment { name, .. } => name,
            DetailRecord::Activity { operation, .. } => operation,
        }
    }

    /// Resource type, provisioning state or operation status.
    pub fn state(&self) -> &str {
        match self {
            DetailRecord::Resource { resource_type, .. } => resource_type,
            DetailRecord::Deployment { state, .. } => state,
            DetailRecord::Activity { status, .. } => status,
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        match self {
            DetailRecord::Resource { .. } => None,
            DetailRecord::Deployment { timestamp, .. } => *timestamp,
            DetailRecord::Activity { timestamp, .. } => *timestamp,
        }
    }

    /// Kind specific fields as `key=value` pairs.
    pub fn extra(&self) -> Vec<(&'static str, String)> {
        let mut extra = Vec::new();
        match self {
            DetailRecord::Resource { location, .. } => {
                extra.push(("location", location.clone()));
            }
            DetailRecord::Deployment { duration, .. } => {
                if let Some(duration) = duration {
                    extra.push(("duration", duration.clone()));
                }
            }
            DetailRecord::Activity {
                caller,
                resource_id,
                ..
            } => {
                if let Some(caller) = caller {
                    extra.push(("caller", caller.clone()));
                }
                if let Some(resource_id) = resource_id {
                    extra.push(("resource", resource_id.clone()));
                }
            }
        }
        extra
    }
}

/// What a check collaborator hands back on success.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOutput {
    pub count: u64,
    pub details: Vec<DetailRecord>,
}

impl CheckOutput {
    pub fn new(count: u64, details: Vec<DetailRecord>) -> Self {
        Self { count, details }
    }

    /// Count taken from the number of records.
    pub fn from_details(details: Vec<DetailRecord>) -> Self {
        Self {
            count: details.len() as u64,
            details,
        }
    }
}

/// The slot a check fills on a [`crate::scan::ScanResult`].
///
/// A failed check keeps its count at zero and stores the provider's error
/// text untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckOutcome {
    pub count: u64,
    pub details: Vec<DetailRecord>,
    pub error: Option<String>,
}

impl CheckOutcome {
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            count: 0,
            details: Vec::new(),
            error: Some(message.into()),
        }
    }

    pub fn is_failed(&self) -> bool {
        self.error.is_some()
    }
}

impl From<CheckOutput> for CheckOutcome {
    fn from(output: CheckOutput) -> Self {
        Self {
            count: output.count,
            details: output.details,
            error: None,
        }
    }
}
