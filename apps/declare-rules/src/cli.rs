//! CLI argument parsing via `clap`.

use crate::config::REPORT_MODES;
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "declare-rules",
    version,
    about = "Generate declarative blocking rules for CDN image sizes",
    long_about = "declare-rules: emit a JSON list of declarative net request rules that block fixed-size image variants.\n\nConfiguration precedence: CLI > declare-rules.toml > defaults.",
    after_help = "Examples:\n  declare-rules\n  declare-rules --output extension/rules.json\n  declare-rules --output extension/rules.json --check\n  declare-rules --dry-run --report json"
)]
/// Top-level CLI options.
pub struct Cli {
    #[arg(long, help = "Destination JSON file (default: ./rules.json)")]
    pub output: Option<String>,
    #[arg(long, help = "Directory to start config discovery from (default: current dir)")]
    pub repo_root: Option<String>,
    #[arg(long, action = clap::ArgAction::SetTrue, conflicts_with = "dry_run", help = "Exit non-zero if the output file is missing or out of date (no write)")]
    pub check: bool,
    #[arg(long, action = clap::ArgAction::SetTrue, help = "Print the rules to stdout without writing")]
    pub dry_run: bool,
    #[arg(long, value_parser = REPORT_MODES, help = "Report mode: human|json (default: human)")]
    pub report: Option<String>,
}
