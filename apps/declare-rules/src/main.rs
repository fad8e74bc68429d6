//! declare-rules CLI binary entry point.
//! Resolves settings, generates the rule file and prints a report.

use clap::Parser;
use declare_rules::cli::Cli;
use declare_rules::{builder, config, output, utils};

fn main() {
    let cli = Cli::parse();
    let eff = config::resolve_effective(
        cli.repo_root.as_deref(),
        cli.output.as_deref(),
        cli.report.as_deref(),
        cli.check,
        cli.dry_run,
    );

    for w in &eff.warnings {
        eprintln!("{} {}", utils::warn_prefix(), w);
    }
    if eff.report != "json" {
        match eff.config_path.as_ref() {
            Some(p) => eprintln!("{} using config {}", utils::info_prefix(), p.display()),
            None if eff.warnings.is_empty() => eprintln!(
                "{} No declare-rules.toml found; using defaults.",
                utils::note_prefix()
            ),
            None => {}
        }
    }
    let dups = builder::duplicate_targets(&eff.targets);
    if !dups.is_empty() {
        let joined = dups
            .iter()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ");
        eprintln!(
            "{} duplicate targets produce duplicate urlFilter values: [{}]",
            utils::warn_prefix(),
            joined
        );
    }

    let (report, preview) = match builder::run_generate(&eff) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("{} {}", utils::error_prefix(), e);
            std::process::exit(2);
        }
    };
    if let Some(rendered) = preview {
        println!("{}", rendered);
    }
    output::print_generate(&report, &eff.report);
    if eff.check && report.changed {
        std::process::exit(1);
    }
}
