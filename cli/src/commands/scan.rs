use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use colored::*;
use rgscan_common::config::Config;
use rgscan_common::scan::{CheckKind, ScanResult, ScanSummary, ScanTarget};
use rgscan_common::window::ScanWindow;
use rgscan_common::{info, success, warn};
use rgscan_core::azure::{AzCli, AzureClient};
use rgscan_core::ports::SessionGuard;
use rgscan_core::{ScanEngine, ScanReport, StopSignal, export, targets};

use crate::rprint;
use crate::terminal::{colors, format, input, print, spinner};

const KEY_WIDTH: usize = 12;

pub async fn scan(cfg: &Config) -> anyhow::Result<()> {
    let targets: Vec<ScanTarget> = load_targets(cfg)?;

    let window: ScanWindow = ScanWindow::from_now(cfg.days, cfg.buffer_hours)?;

    let client: AzureClient = AzureClient::new(Arc::new(AzCli::new(cfg.command_timeout)))
        .with_subscription(cfg.subscription.clone());
    client.ensure_authenticated().await?;
    print_plan(cfg, &targets, &window);

    let signal: StopSignal = match cfg.timeout {
        Some(total) => StopSignal::new().with_timeout(total),
        None => StopSignal::new(),
    };
    input::spawn_ctrl_c_handler(signal.clone());
    if !cfg.disable_input {
        input::spawn_key_listener(signal.clone());
    }

    let mut engine: ScanEngine = ScanEngine::new(client.clone()).with_parallelism(cfg.parallelism);
    for check in client.checks(!cfg.keep_deployment_ops, window.now) {
        engine = engine.add_check(check);
    }

    print::header("scanning", cfg.quiet);
    spinner::start(cfg.quiet, !cfg.disable_input);
    let total: usize = targets.len();
    let mut done: usize = 0;
    let report: ScanReport = engine
        .scan_with(&targets, &cfg.checks, window.since, &signal, |idx, result| {
            done += 1;
            report_progress(idx, total, result, cfg.quiet);
            spinner::report_scan_progress(done, total, result.target.name());
        })
        .await?;
    spinner::finish();

    scan_ends(&report, cfg);

    if !cfg.no_export {
        let path: PathBuf = cfg
            .output
            .clone()
            .unwrap_or_else(|| export::default_report_path(Utc::now()));
        let written = export::export_report(&path, &report.results)
            .with_context(|| format!("exporting {} results", report.results.len()))?;
        success!("Report written to {}", written.display());
    }

    if cfg.quiet == 0 {
        print::end_of_program();
    }
    Ok(())
}

fn load_targets(cfg: &Config) -> anyhow::Result<Vec<ScanTarget>> {
    let mut targets: Vec<ScanTarget> = targets::load_targets(&cfg.input)?;
    let loaded: usize = targets.len();
    if cfg.dedupe {
        targets = targets::dedupe(targets);
        if targets.len() != loaded {
            info!("Dropped {} repeated resource group names", loaded - targets.len());
        }
    }
    info!(
        "Loaded {} resource groups from {}",
        targets.len(),
        cfg.input.display()
    );
    Ok(targets)
}

fn print_plan(cfg: &Config, targets: &[ScanTarget], window: &ScanWindow) {
    if cfg.quiet > 0 {
        return;
    }
    print::header("scan plan", cfg.quiet);
    print::aligned_line("Groups", targets.len().to_string(), KEY_WIDTH);
    print::aligned_line("Checks", format::check_list(&cfg.checks), KEY_WIDTH);
    if cfg.is_time_bounded() {
        let requested: String = export::format_timestamp(window.requested_since());
        let since: String = export::format_timestamp(window.since);
        print::aligned_line("Requested", requested, KEY_WIDTH);
        print::aligned_line("Since", since.color(colors::ACCENT), KEY_WIDTH);
        print::aligned_line(
            "Window",
            format!("{} days + {}h skew buffer", window.days, window.buffer_hours),
            KEY_WIDTH,
        );
    }
    if let Some(subscription) = &cfg.subscription {
        print::aligned_line("Subscription", subscription.as_str(), KEY_WIDTH);
    }
    if cfg.parallelism > 1 {
        print::aligned_line("Parallel", cfg.parallelism.to_string(), KEY_WIDTH);
    }
}

fn report_progress(idx: usize, total: usize, result: &ScanResult, q_level: u8) {
    if q_level > 1 {
        return;
    }
    let counter: String = format!("[{}/{}]", idx + 1, total);
    print::print_status(format!(
        "{} {} {}",
        counter.color(colors::SEPARATOR),
        result.target.name().color(colors::PRIMARY),
        format::result_status(result)
    ));
}

fn scan_ends(report: &ScanReport, cfg: &Config) {
    if report.results.is_empty() {
        print::header("nothing scanned", cfg.quiet);
        print::no_results();
        return;
    }

    if cfg.quiet < 2 {
        print::header("results", cfg.quiet);
        print_results(&report.results, cfg);
    }

    if cfg.runs(CheckKind::ResourceCount) {
        print_cleanup_candidates(&report.results, cfg.quiet);
    }

    print_summary(report, cfg);
}

fn print_results(results: &[ScanResult], cfg: &Config) {
    for (idx, result) in results.iter().enumerate() {
        print::tree_head(idx, result.target.name());
        print::as_tree_one_level(format::result_to_details(result));

        if cfg.details {
            for (kind, outcome) in &result.checks {
                if outcome.details.is_empty() {
                    continue;
                }
                print::print_status(format!("{} records", kind.display_name()));
                let lines: Vec<String> = outcome.details.iter().map(format::detail_to_line).collect();
                print::as_tree_leaves(&lines);
            }
        }

        if idx + 1 != results.len() {
            rprint!();
        }
    }
}

/// Existing groups whose resource count came back as zero. Groups that were
/// not found are never listed: they are already gone or were mistyped.
fn print_cleanup_candidates(results: &[ScanResult], q_level: u8) {
    let candidates: Vec<&ScanResult> = results.iter().filter(|r| r.is_cleanup_candidate()).collect();
    if candidates.is_empty() {
        info!("No empty resource groups found");
        return;
    }

    print::header("empty resource groups", q_level);
    warn!("{} resource groups exist but hold no resources:", candidates.len());
    for result in candidates {
        print::print_status(result.target.name().color(colors::ACCENT).to_string());
    }
}

fn print_summary(report: &ScanReport, cfg: &Config) {
    let summary: &ScanSummary = &report.summary;

    print::header("summary", cfg.quiet);
    if cfg.quiet == 0 {
        print::aligned_line("Groups", summary.total_groups.to_string(), KEY_WIDTH);
        print::aligned_line("Found", summary.found_groups.to_string().color(colors::FOUND), KEY_WIDTH);
        print::aligned_line(
            "Not found",
            summary.not_found_groups.to_string().color(colors::NOT_FOUND),
            KEY_WIDTH,
        );
        print::aligned_line("Active", summary.active_groups.to_string().color(colors::ACTIVE), KEY_WIDTH);
        print::aligned_line("Quiet", summary.quiet_groups().to_string().color(colors::QUIET), KEY_WIDTH);
        for (kind, total) in &summary.totals {
            print::aligned_line(kind.display_name(), total.to_string().bold(), KEY_WIDTH);
        }
        if summary.failed_checks > 0 {
            print::aligned_line(
                "Failed",
                summary.failed_checks.to_string().color(colors::FAILED),
                KEY_WIDTH,
            );
        }
        print::fat_separator();
    }

    if report.cancelled {
        warn!(
            "Scan stopped early: {} of the listed resource groups were scanned",
            summary.total_groups
        );
    }

    let active: ColoredString = format!("{} active", summary.active_groups).bold().yellow();
    let scanned: ColoredString = format!("{} groups", summary.total_groups).bold().green();
    let total_time: ColoredString = format!("{:.2}s", report.elapsed.as_secs_f64()).bold().yellow();
    let output: String = format!("Scan Complete: {scanned} scanned, {active} in {total_time}")
        .color(colors::TEXT_DEFAULT)
        .to_string();

    match cfg.quiet {
        0 => print::centerln(&output),
        _ => success!("{}", output),
    }
}
