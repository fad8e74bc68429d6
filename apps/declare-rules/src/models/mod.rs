//! Shared data models: the emitted rule records and the run report.

pub mod rule;

pub use rule::{Action, ActionType, Condition, Rule};

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
/// How a generate run treated the destination file.
pub enum RunMode {
    Write,
    Check,
    DryRun,
}

#[derive(Debug, Serialize)]
/// Summary of one generate run, used by printers.
pub struct GenerateReport {
    pub output: String,
    pub rules: usize,
    pub mode: RunMode,
    /// True when the destination differs (or would differ) from the rendered rules.
    /// Always true in write mode, where the old file is not read.
    pub changed: bool,
    pub wrote: bool,
}
