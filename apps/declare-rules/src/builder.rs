//! Rule set construction and serialization.
//!
//! Each target at position `i` becomes a `Rule` with `id = priority = i + 1`,
//! a `block` action, and `urlFilter = url_prefix + target`. The rendered
//! document is a pretty-printed JSON array (2-space indent, no trailing
//! newline) so repeated runs produce byte-identical files.

use crate::config::Effective;
use crate::error::{Error, Result};
use crate::models::{Action, Condition, GenerateReport, Rule, RunMode};
use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::Path;

/// Image widths served by the CDN that get blocked, in id order.
pub const DEFAULT_TARGETS: [u32; 8] = [20, 24, 32, 40, 48, 88, 96, 176];
pub const DEFAULT_URL_PREFIX: &str = "*://miro.medium.com/fit/c/";
pub const DEFAULT_OUTPUT: &str = "./rules.json";

/// Map targets 1:1 to rules, preserving input order.
pub fn build_rules(targets: &[u32], url_prefix: &str) -> Vec<Rule> {
    targets
        .iter()
        .zip(1u32..)
        .map(|(target, id)| Rule {
            id,
            priority: id,
            action: Action::block(),
            condition: Condition {
                url_filter: format!("{}{}", url_prefix, target),
            },
        })
        .collect()
}

/// Render rules as the on-disk JSON document.
pub fn render_rules(rules: &[Rule]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rules)?)
}

/// Create or truncate `path` and write the rendered rules.
///
/// The writer is flushed before returning; a failure partway through leaves
/// whatever bytes reached the file.
pub fn write_rules(path: &Path, rules: &[Rule]) -> Result<()> {
    let write_err = |source: std::io::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };
    let file = fs::File::create(path).map_err(write_err)?;
    let mut w = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut w, rules).map_err(|e| write_err(e.into()))?;
    w.flush().map_err(write_err)?;
    Ok(())
}

/// Compare the file at `path` with the rendered rules.
///
/// Returns `Ok(true)` when the file is up to date. A missing file, or one
/// holding different bytes (including non-UTF-8 content), is out of date
/// rather than an error.
pub fn check_rules(path: &Path, rules: &[Rule]) -> Result<bool> {
    let expected = render_rules(rules)?;
    match fs::read(path) {
        Ok(current) => Ok(current == expected.as_bytes()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(source) => Err(Error::Read {
            path: path.to_path_buf(),
            source,
        }),
    }
}

/// Targets listed more than once, each reported once in first-seen order.
pub fn duplicate_targets(targets: &[u32]) -> Vec<u32> {
    let mut seen = HashSet::new();
    let mut reported = HashSet::new();
    let mut dups = Vec::new();
    for &t in targets {
        if !seen.insert(t) && reported.insert(t) {
            dups.push(t);
        }
    }
    dups
}

/// Build the rule set for `eff` and write, check, or preview it.
///
/// In dry-run mode the rendered document is returned alongside the report so
/// the caller can print it.
pub fn run_generate(eff: &Effective) -> Result<(GenerateReport, Option<String>)> {
    let rules = build_rules(&eff.targets, &eff.url_prefix);
    let output = eff.output.to_string_lossy().to_string();

    if eff.dry_run {
        let rendered = render_rules(&rules)?;
        // Preview only; an unreadable destination just counts as changed.
        let changed = !check_rules(&eff.output, &rules).unwrap_or(false);
        let report = GenerateReport {
            output,
            rules: rules.len(),
            mode: RunMode::DryRun,
            changed,
            wrote: false,
        };
        return Ok((report, Some(rendered)));
    }

    if eff.check {
        let changed = !check_rules(&eff.output, &rules)?;
        let report = GenerateReport {
            output,
            rules: rules.len(),
            mode: RunMode::Check,
            changed,
            wrote: false,
        };
        return Ok((report, None));
    }

    // The existing destination is never read; it is truncated and replaced.
    write_rules(&eff.output, &rules)?;
    let report = GenerateReport {
        output,
        rules: rules.len(),
        mode: RunMode::Write,
        changed: true,
        wrote: true,
    };
    Ok((report, None))
}
