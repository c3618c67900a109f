use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use rgscan_common::error::ScanError;
use rgscan_common::scan::{CheckKind, DetailRecord, Existence, ScanTarget};
use rgscan_common::window::ScanWindow;
use rgscan_core::ports::SessionGuard;
use rgscan_core::{ScanEngine, ScanReport, StopSignal, targets};
use tempfile::NamedTempFile;

use super::util::{ScriptedAz, at};

const TWO_RESOURCES: &str = r#"[
    {"name": "vnet-core", "type": "Microsoft.Network/virtualNetworks", "location": "westeurope"},
    {"name": "kv-core", "type": "Microsoft.KeyVault/vaults", "location": "westeurope"}
]"#;

const DEPLOYMENTS: &str = r#"[
    {"name": "old", "properties": {"provisioningState": "Succeeded", "timestamp": "2024-02-01T08:00:00+00:00"}},
    {"name": "network", "properties": {"provisioningState": "Succeeded", "timestamp": "2024-03-09T12:00:00+00:00", "duration": "PT1M"}},
    {"name": "vault", "properties": {"provisioningState": "Failed", "timestamp": "2024-03-10T09:30:00.000000"}}
]"#;

const ACTIVITY: &str = r#"[
    {"operationName": {"value": "Microsoft.Network/virtualNetworks/write"}, "status": {"value": "Started"},
     "eventTimestamp": "2024-03-09T11:59:00+00:00", "caller": "ops@contoso.com", "correlationId": "c1",
     "resourceId": "/subscriptions/x/resourceGroups/rg-live/providers/Microsoft.Network/virtualNetworks/vnet-core"},
    {"operationName": {"value": "Microsoft.Network/virtualNetworks/write"}, "status": {"value": "Succeeded"},
     "eventTimestamp": "2024-03-09T12:01:00+00:00", "caller": "ops@contoso.com", "correlationId": "c1"},
    {"operationName": {"value": "Microsoft.Resources/deployments/write"}, "status": {"value": "Succeeded"},
     "eventTimestamp": "2024-03-09T12:02:00+00:00", "correlationId": "c2"},
    {"operationName": {"value": "Microsoft.KeyVault/vaults/read"}, "status": {"value": "Succeeded"},
     "eventTimestamp": "2024-03-10T10:00:00+00:00", "correlationId": "c3"},
    {"operationName": {"value": "Microsoft.KeyVault/vaults/delete"}, "status": {"value": "Succeeded"},
     "eventTimestamp": "2024-03-01T10:00:00+00:00", "correlationId": "c4"}
]"#;

fn names(report: &ScanReport) -> Vec<&str> {
    report.results.iter().map(|r| r.target.name()).collect()
}

fn engine(az: &Arc<ScriptedAz>, exclude_deployment_ops: bool) -> ScanEngine {
    let client = az.client();
    let mut engine = ScanEngine::new(client.clone());
    for check in client.checks(exclude_deployment_ops, at(16, 12)) {
        engine = engine.add_check(check);
    }
    engine
}

#[tokio::test]
async fn inventory_from_input_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "# platform groups").unwrap();
    writeln!(file, "  rg-live  ").unwrap();
    writeln!(file).unwrap();
    writeln!(file, "rg-gone").unwrap();
    writeln!(file, "rg-empty").unwrap();
    writeln!(file, "rg-live").unwrap();

    let targets: Vec<ScanTarget> = targets::load_targets(file.path()).unwrap();

    let az = Arc::new(
        ScriptedAz::new()
            .existing(&["rg-live", "rg-empty"])
            .reply("resource list", "rg-live", TWO_RESOURCES)
            .reply("resource list", "rg-empty", "[]"),
    );
    let report = engine(&az, true)
        .scan(&targets, &[CheckKind::ResourceCount], at(10, 12), &StopSignal::new())
        .await
        .unwrap();

    assert!(!report.cancelled);
    assert_eq!(names(&report), ["rg-live", "rg-gone", "rg-empty", "rg-live"]);

    let live = &report.results[0];
    assert_eq!(live.existence, Existence::Found);
    assert_eq!(live.count(CheckKind::ResourceCount), 2);
    assert!(!live.is_cleanup_candidate());

    let gone = &report.results[1];
    assert_eq!(gone.existence, Existence::NotFound);
    assert_eq!(gone.count(CheckKind::ResourceCount), 0);
    assert!(!gone.is_cleanup_candidate());

    assert!(report.results[2].is_cleanup_candidate());

    assert_eq!(report.summary.total_groups, 4);
    assert_eq!(report.summary.not_found_groups, 1);
    assert_eq!(report.summary.total(CheckKind::ResourceCount), 4);

    // A missing group never reaches the resource listing.
    let listed_gone = az
        .calls()
        .iter()
        .any(|call| call[0] == "resource" && call.contains(&"rg-gone".to_string()));
    assert!(!listed_gone);
}

#[tokio::test]
async fn time_bounded_checks_share_the_window() {
    let window = ScanWindow::new(7, 24, at(16, 12)).unwrap();
    assert_eq!(window.since, at(8, 12));

    let az = Arc::new(
        ScriptedAz::new()
            .existing(&["rg-live"])
            .reply("deployment group list", "rg-live", DEPLOYMENTS)
            .reply("monitor activity-log list", "rg-live", ACTIVITY),
    );
    let targets = [ScanTarget::new("rg-live")];
    let kinds = [CheckKind::DeploymentsSince, CheckKind::ActivityLogSince];
    let report = engine(&az, true)
        .scan(&targets, &kinds, window.since, &StopSignal::new())
        .await
        .unwrap();

    let live = &report.results[0];
    assert_eq!(live.count(CheckKind::DeploymentsSince), 2);
    // Started/Succeeded pair collapses, the deployment op is dropped,
    // reads and events before the window are ignored.
    assert_eq!(live.count(CheckKind::ActivityLogSince), 1);
    assert!(live.has_activity());

    let deployments = &live.outcome(CheckKind::DeploymentsSince).unwrap().details;
    assert_eq!(deployments[0].name(), "vault");
    assert_eq!(deployments[0].state(), "Failed");

    match &live.outcome(CheckKind::ActivityLogSince).unwrap().details[0] {
        DetailRecord::Activity { status, caller, .. } => {
            assert_eq!(status, "Succeeded");
            assert_eq!(caller.as_deref(), Some("ops@contoso.com"));
        }
        other => panic!("expected an activity record, got {other:?}"),
    }

    let activity_call: Vec<String> = az
        .calls()
        .into_iter()
        .find(|call| call[0] == "monitor")
        .unwrap();
    let flag_value = |flag: &str| {
        let idx = activity_call.iter().position(|arg| arg == flag)?;
        activity_call.get(idx + 1).cloned()
    };
    assert_eq!(flag_value("--start-time").as_deref(), Some("2024-03-08T12:00:00Z"));
    // Bounded by the run's "now", otherwise az only returns six hours.
    assert_eq!(flag_value("--end-time").as_deref(), Some("2024-03-16T12:00:00Z"));
}

#[tokio::test]
async fn deployment_operations_can_be_kept() {
    let az = Arc::new(
        ScriptedAz::new()
            .existing(&["rg-live"])
            .reply("monitor activity-log list", "rg-live", ACTIVITY),
    );
    let report = engine(&az, false)
        .scan(
            &[ScanTarget::new("rg-live")],
            &[CheckKind::ActivityLogSince],
            at(8, 12),
            &StopSignal::new(),
        )
        .await
        .unwrap();

    assert_eq!(report.results[0].count(CheckKind::ActivityLogSince), 2);
}

#[tokio::test]
async fn failing_command_only_fails_its_own_check() {
    let az = Arc::new(
        ScriptedAz::new()
            .existing(&["rg-live", "rg-other"])
            .reply("resource list", "rg-live", TWO_RESOURCES)
            .fail("deployment group list", "rg-live", "ERROR: AuthorizationFailed")
            .reply("resource list", "rg-other", "[]")
            .reply("deployment group list", "rg-other", DEPLOYMENTS),
    );
    let targets = [ScanTarget::new("rg-live"), ScanTarget::new("rg-other")];
    let kinds = [CheckKind::ResourceCount, CheckKind::DeploymentsSince];
    let report = engine(&az, true)
        .scan(&targets, &kinds, at(8, 12), &StopSignal::new())
        .await
        .unwrap();

    let live = &report.results[0];
    assert_eq!(live.count(CheckKind::ResourceCount), 2);
    let failed = live.outcome(CheckKind::DeploymentsSince).unwrap();
    assert_eq!(failed.count, 0);
    assert!(failed.error.as_deref().unwrap().contains("AuthorizationFailed"));

    let other = &report.results[1];
    assert!(!other.has_errors());
    assert_eq!(other.count(CheckKind::DeploymentsSince), 2);
    assert_eq!(report.summary.failed_checks, 1);
}

#[tokio::test]
async fn broken_existence_lookup_is_reported_as_missing() {
    let az = Arc::new(ScriptedAz::new().fail("group exists", "rg-flaky", "ERROR: throttled"));
    let report = engine(&az, true)
        .scan(
            &[ScanTarget::new("rg-flaky")],
            &[CheckKind::ResourceCount],
            at(8, 12),
            &StopSignal::new(),
        )
        .await
        .unwrap();

    let flaky = &report.results[0];
    assert_eq!(flaky.existence, Existence::NotFound);
    assert!(flaky.error.as_deref().unwrap().contains("throttled"));
}

#[tokio::test]
async fn stopping_keeps_the_completed_prefix() {
    let az = Arc::new(ScriptedAz::new());
    let targets: Vec<ScanTarget> = ["rg-a", "rg-b", "rg-c", "rg-d"]
        .into_iter()
        .map(ScanTarget::new)
        .collect();
    let signal = StopSignal::new();
    let stopper = signal.clone();

    let report = engine(&az, true)
        .scan_with(&targets, &[CheckKind::ResourceCount], at(8, 12), &signal, |idx, _| {
            if idx == 1 {
                stopper.stop();
            }
        })
        .await
        .unwrap();

    assert!(report.cancelled);
    assert_eq!(names(&report), ["rg-a", "rg-b"]);
    assert_eq!(report.summary.total_groups, 2);
}

#[tokio::test]
async fn expired_deadline_scans_nothing() {
    let az = Arc::new(ScriptedAz::new());
    let signal = StopSignal::new().with_timeout(Duration::ZERO);
    let report = engine(&az, true)
        .scan(
            &[ScanTarget::new("rg-a")],
            &[CheckKind::ResourceCount],
            at(8, 12),
            &signal,
        )
        .await
        .unwrap();

    assert!(report.cancelled);
    assert!(report.results.is_empty());
    assert!(az.calls().is_empty());
}

#[tokio::test]
async fn parallel_scan_keeps_input_order() {
    let az = Arc::new(
        ScriptedAz::new()
            .existing(&["rg-1", "rg-3", "rg-5"])
            .reply("resource list", "rg-1", TWO_RESOURCES)
            .reply("resource list", "rg-3", "[]")
            .reply("resource list", "rg-5", TWO_RESOURCES),
    );
    let targets: Vec<ScanTarget> = (1..=6).map(|n| ScanTarget::new(format!("rg-{n}"))).collect();

    let report = engine(&az, true)
        .with_parallelism(4)
        .scan(&targets, &[CheckKind::ResourceCount], at(8, 12), &StopSignal::new())
        .await
        .unwrap();

    assert_eq!(names(&report), ["rg-1", "rg-2", "rg-3", "rg-4", "rg-5", "rg-6"]);
    let counts: Vec<u64> = report
        .results
        .iter()
        .map(|r| r.count(CheckKind::ResourceCount))
        .collect();
    assert_eq!(counts, [2, 0, 0, 0, 2, 0]);
    assert_eq!(report.summary.found_groups, 3);
}

#[tokio::test]
async fn subscription_is_passed_to_every_call() {
    let az = Arc::new(ScriptedAz::new().existing(&["rg-live"]).reply("resource list", "rg-live", "[]"));
    let client = az.client().with_subscription(Some("sub-42".to_string()));
    let engine = ScanEngine::new(client.clone()).add_check(Arc::new(client.resource_count_check()));

    engine
        .scan(
            &[ScanTarget::new("rg-live")],
            &[CheckKind::ResourceCount],
            at(8, 12),
            &StopSignal::new(),
        )
        .await
        .unwrap();

    let calls = az.calls();
    assert_eq!(calls.len(), 2);
    for call in calls {
        assert!(call.ends_with(&["--subscription".to_string(), "sub-42".to_string()]));
    }
}

#[tokio::test]
async fn expired_login_is_an_authentication_error() {
    let az = Arc::new(ScriptedAz::new().fail("account show", "", "Please run 'az login' to setup account."));
    let err = az.client().ensure_authenticated().await.unwrap_err();
    assert!(matches!(err, ScanError::AuthenticationRequired(_)));
}

#[tokio::test]
async fn missing_input_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = targets::load_targets(&dir.path().join("nope.txt")).unwrap_err();
    assert!(matches!(err, ScanError::InputNotFound { .. }));
}
