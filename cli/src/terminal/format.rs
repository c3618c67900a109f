use colored::*;
use rgscan_common::scan::{CheckKind, DetailRecord, Existence, ScanResult};
use rgscan_core::export::format_timestamp;

use crate::terminal::colors;

type Detail = (String, ColoredString);

pub fn existence_to_colored(result: &ScanResult) -> ColoredString {
    match result.existence {
        Existence::Found => "Found".color(colors::FOUND),
        Existence::NotFound => "Not found".color(colors::NOT_FOUND),
    }
}

/// One short status word for a progress line.
pub fn result_status(result: &ScanResult) -> ColoredString {
    if !result.is_found() {
        return existence_to_colored(result);
    }
    if result.has_errors() {
        return "errors".color(colors::FAILED).bold();
    }
    if result.has_activity() {
        format!("{} total", result.total_count()).color(colors::ACTIVE).bold()
    } else {
        "quiet".color(colors::QUIET)
    }
}

/// Key/value rows for the result tree: existence, one row per check.
pub fn result_to_details(result: &ScanResult) -> Vec<Detail> {
    let mut details: Vec<Detail> = vec![("Status".to_string(), existence_to_colored(result))];

    if let Some(note) = &result.error {
        details.push(("Note".to_string(), note.color(colors::FAILED)));
    }

    for (kind, outcome) in &result.checks {
        let value: ColoredString = match &outcome.error {
            Some(err) => format!("failed: {err}").color(colors::FAILED),
            None if outcome.count > 0 => outcome.count.to_string().color(colors::ACTIVE).bold(),
            None => outcome.count.to_string().color(colors::TEXT_DEFAULT),
        };
        details.push((kind.display_name().to_string(), value));
    }

    details
}

pub fn detail_to_line(detail: &DetailRecord) -> String {
    let mut parts: Vec<String> = vec![
        detail.name().color(colors::PRIMARY).to_string(),
        state_to_colored(detail.state()).to_string(),
    ];
    if let Some(ts) = detail.timestamp() {
        parts.push(format_timestamp(ts).color(colors::SEPARATOR).to_string());
    }
    for (key, value) in detail.extra() {
        if !value.is_empty() {
            parts.push(format!("{key}={value}").dimmed().to_string());
        }
    }
    parts.join(" ")
}

fn state_to_colored(state: &str) -> ColoredString {
    match state.to_ascii_lowercase().as_str() {
        "succeeded" => state.green(),
        "failed" | "canceled" | "cancelled" => state.red(),
        "running" | "accepted" | "started" => state.yellow(),
        _ => state.normal(),
    }
}

pub fn check_list(kinds: &[CheckKind]) -> String {
    kinds
        .iter()
        .map(|kind| kind.display_name())
        .collect::<Vec<_>>()
        .join(", ")
}
