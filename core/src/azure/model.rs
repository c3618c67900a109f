//! Shapes of the `az ... --output json` payloads the checks read.
//!
//! Only the fields the scanner uses are declared; everything else is ignored.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct AzResource {
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AzDeployment {
    pub name: String,
    pub properties: Option<AzDeploymentProperties>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzDeploymentProperties {
    pub provisioning_state: Option<String>,
    pub timestamp: Option<String>,
    pub duration: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzLocalizable {
    #[serde(default)]
    pub value: String,
    pub localized_value: Option<String>,
}

impl AzLocalizable {
    pub fn display(&self) -> &str {
        self.localized_value
            .as_deref()
            .filter(|s| !s.is_empty())
            .unwrap_or(&self.value)
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AzActivityEvent {
    pub operation_name: Option<AzLocalizable>,
    pub status: Option<AzLocalizable>,
    pub event_timestamp: Option<String>,
    pub caller: Option<String>,
    pub resource_id: Option<String>,
    pub correlation_id: Option<String>,
}

/// Parses the timestamps `az` prints: RFC 3339 with an offset, or a bare
/// ISO timestamp which is taken as UTC.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
