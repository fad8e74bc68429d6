//! Report rendering for generate runs.
//!
//! Supports `human` (default) and `json` reports. The JSON form mirrors
//! `GenerateReport`. In dry-run mode the rendered rules go to stdout and the
//! report goes to stderr so the rules can be piped.

use crate::models::{GenerateReport, RunMode};
use owo_colors::OwoColorize;
use serde_json::Value as JsonVal;

fn use_colors(report: &str) -> bool {
    report != "json" && std::env::var_os("NO_COLOR").is_none()
}

/// Print the outcome of a generate run in the requested format.
pub fn print_generate(rep: &GenerateReport, report: &str) {
    let text = match report {
        "json" => serde_json::to_string_pretty(&compose_generate_json(rep))
            .unwrap_or_else(|_| "{}".to_string()),
        _ => compose_generate_human(rep, use_colors(report)),
    };
    if rep.mode == RunMode::DryRun {
        eprintln!("{}", text);
    } else {
        println!("{}", text);
    }
}

/// Compose the human one-line summary (pure) for testing.
pub fn compose_generate_human(rep: &GenerateReport, color: bool) -> String {
    let (label, detail) = match rep.mode {
        RunMode::Write => (
            "wrote:",
            format!("{} rules -> {}", rep.rules, rep.output),
        ),
        RunMode::Check if rep.changed => (
            "out of date:",
            format!("{} ({} rules expected)", rep.output, rep.rules),
        ),
        RunMode::Check => ("up to date:", rep.output.clone()),
        RunMode::DryRun if rep.changed => (
            "would write:",
            format!("{} rules -> {}", rep.rules, rep.output),
        ),
        RunMode::DryRun => ("no changes:", rep.output.clone()),
    };
    if !color {
        return format!("{} {}", label, detail);
    }
    let label = match (rep.mode, rep.changed) {
        (RunMode::Write, _) => label.green().bold().to_string(),
        (_, true) => label.yellow().bold().to_string(),
        (_, false) => label.bright_black().to_string(),
    };
    format!("{} {}", label, detail)
}

/// Compose the JSON report object (pure) for testing/snapshot purposes.
pub fn compose_generate_json(rep: &GenerateReport) -> JsonVal {
    serde_json::to_value(rep).unwrap_or(JsonVal::Null)
}
