use std::fs;
use std::sync::Arc;

use rgscan_common::scan::{CheckKind, ScanTarget};
use rgscan_core::export::{HEADER, default_report_path, export_report};
use rgscan_core::{ScanEngine, StopSignal};

use super::util::{ScriptedAz, at};

const ONE_DEPLOYMENT: &str = r#"[
    {"name": "network", "properties": {"provisioningState": "Succeeded", "timestamp": "2024-03-09T12:00:00+00:00", "duration": "PT1M"}}
]"#;

#[tokio::test]
async fn report_lists_every_scanned_group() {
    let az = Arc::new(
        ScriptedAz::new()
            .existing(&["rg-live", "rg-quiet"])
            .reply("deployment group list", "rg-live", ONE_DEPLOYMENT)
            .reply("deployment group list", "rg-quiet", "[]"),
    );
    let client = az.client();
    let engine = ScanEngine::new(client.clone()).add_check(Arc::new(client.deployments_check()));
    let targets = [
        ScanTarget::new("rg-live"),
        ScanTarget::new("rg-gone"),
        ScanTarget::new("rg-quiet"),
    ];
    let report = engine
        .scan(&targets, &[CheckKind::DeploymentsSince], at(8, 12), &StopSignal::new())
        .await
        .unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("reports").join("scan.csv");
    let written = export_report(&path, &report.results).unwrap();
    assert_eq!(written, path);

    let contents = fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = contents.lines().collect();

    assert_eq!(lines[0], HEADER.join(","));
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("rg-live,"));
    assert!(lines[1].contains("network"));
    assert!(lines[1].contains("2024-03-09T12:00:00Z"));
    assert!(lines[2].starts_with("rg-gone,"));
    assert!(lines[2].contains("NotFound"));
    assert!(lines[3].starts_with("rg-quiet,"));
    assert!(lines[3].contains("Count=0"));
}

#[tokio::test]
async fn cancelled_scan_still_exports_header() {
    let az = Arc::new(ScriptedAz::new());
    let engine = ScanEngine::new(az.client());
    let signal = StopSignal::new();
    signal.stop();

    let report = engine
        .scan(&[ScanTarget::new("rg-a")], &[CheckKind::ResourceCount], at(8, 12), &signal)
        .await
        .unwrap();
    assert!(report.cancelled);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.csv");
    export_report(&path, &report.results).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert_eq!(contents.trim_end(), HEADER.join(","));
}

#[test]
fn default_report_name_is_timestamped() {
    let path = default_report_path(at(9, 14));
    assert_eq!(path.to_string_lossy(), "rg-scan-20240309-140000.csv");
}
