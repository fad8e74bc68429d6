//! Configuration discovery and effective settings resolution.
//!
//! `declare-rules` reads `declare-rules.toml|yaml|yml` from the repository
//! root (or closest ancestor) and merges it with CLI flags to produce an
//! `Effective` config.
//! Defaults:
//! - `output`: `./rules.json` (relative to the working directory)
//! - `report`: `human`
//! - `rules.targets`: `20, 24, 32, 40, 48, 88, 96, 176`
//! - `rules.url_prefix`: `*://miro.medium.com/fit/c/`
//!
//! Overrides precedence: CLI > config file > defaults. A config `output` is
//! joined onto the discovered repo root.
//!
//! A config file never fails a run. Unreadable files and rejected values are
//! recorded in `Effective::warnings` and the affected settings fall back to
//! defaults.

use crate::builder::{DEFAULT_OUTPUT, DEFAULT_TARGETS, DEFAULT_URL_PREFIX};
use crate::error::{Error, Result};
use regex::Regex;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

const CONFIG_NAMES: [&str; 3] = [
    "declare-rules.toml",
    "declare-rules.yaml",
    "declare-rules.yml",
];

pub const REPORT_MODES: [&str; 2] = ["human", "json"];

static URL_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\*|[A-Za-z][A-Za-z0-9+.-]*)://\S+$").expect("url prefix pattern compiles")
});

#[derive(Debug, Default, Deserialize, Clone)]
/// Rule generation section under `[rules]`.
pub struct RulesCfg {
    pub targets: Option<Vec<u32>>,
    pub url_prefix: Option<String>,
}

#[derive(Debug, Default, Deserialize, Clone)]
/// Root configuration loaded from `declare-rules.toml|yaml`.
pub struct GeneratorConfig {
    pub output: Option<String>,
    pub report: Option<String>,
    #[serde(default)]
    pub rules: Option<RulesCfg>,
}

#[derive(Debug, Clone)]
/// Fully-resolved configuration used by the generator after applying precedence.
pub struct Effective {
    pub repo_root: PathBuf,
    /// Config file that contributed settings, if any.
    pub config_path: Option<PathBuf>,
    pub output: PathBuf,
    pub report: String,
    pub targets: Vec<u32>,
    pub url_prefix: String,
    pub check: bool,
    pub dry_run: bool,
    /// Config problems that were skipped over; printed as warnings.
    pub warnings: Vec<String>,
}

/// Walk upward from `start` to detect the repository root.
///
/// `start` is made absolute first so a relative `.` can reach its parents.
/// Stops when a `declare-rules.toml|yaml|yml` or a `.git` directory is found.
pub fn detect_repo_root(start: &Path) -> PathBuf {
    let start = fs::canonicalize(start).unwrap_or_else(|_| start.to_path_buf());
    let mut cur = start.as_path();
    loop {
        if CONFIG_NAMES.iter().any(|n| cur.join(n).exists()) {
            return cur.to_path_buf();
        }
        if cur.join(".git").exists() {
            return cur.to_path_buf();
        }
        match cur.parent() {
            Some(p) => cur = p,
            None => return start,
        }
    }
}

/// Path of the first config file present in `root`, TOML preferred.
pub fn find_config(root: &Path) -> Option<PathBuf> {
    CONFIG_NAMES
        .iter()
        .map(|n| root.join(n))
        .find(|p| p.is_file())
}

/// Load `GeneratorConfig` from `declare-rules.toml` or `declare-rules.yaml|yml`.
///
/// Returns `Ok(None)` when no config file exists.
pub fn load_config(root: &Path) -> Result<Option<(PathBuf, GeneratorConfig)>> {
    let Some(path) = find_config(root) else {
        return Ok(None);
    };
    let s = fs::read_to_string(&path).map_err(|source| Error::Read {
        path: path.clone(),
        source,
    })?;
    let is_toml = path.extension().is_some_and(|e| e == "toml");
    let cfg: GeneratorConfig = if is_toml {
        toml::from_str(&s).map_err(|e| Error::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?
    } else {
        serde_yaml::from_str(&s).map_err(|e| Error::ConfigParse {
            path: path.clone(),
            message: e.to_string(),
        })?
    };
    Ok(Some((path, cfg)))
}

/// Resolve `Effective` by merging CLI flags, discovered config, and defaults.
pub fn resolve_effective(
    cli_repo_root: Option<&str>,
    cli_output: Option<&str>,
    cli_report: Option<&str>,
    cli_check: bool,
    cli_dry_run: bool,
) -> Effective {
    let start = PathBuf::from(cli_repo_root.unwrap_or("."));
    let repo_root = detect_repo_root(&start);
    let mut warnings = Vec::new();
    let (config_path, cfg) = match load_config(&repo_root) {
        Ok(Some((p, c))) => (Some(p), c),
        Ok(None) => (None, GeneratorConfig::default()),
        Err(e) => {
            warnings.push(format!("{}; ignoring config file", e));
            (None, GeneratorConfig::default())
        }
    };

    let output = match (cli_output, cfg.output.as_deref()) {
        (Some(cli), _) => PathBuf::from(cli),
        (None, Some(from_cfg)) => repo_root.join(from_cfg),
        (None, None) => PathBuf::from(DEFAULT_OUTPUT),
    };

    let report = match (cli_report, cfg.report) {
        (Some(cli), _) => cli.to_string(),
        (None, Some(r)) if REPORT_MODES.contains(&r.as_str()) => r,
        (None, Some(r)) => {
            warnings.push(format!(
                "invalid config: report '{}' is not one of human|json; using human",
                r
            ));
            "human".to_string()
        }
        (None, None) => "human".to_string(),
    };

    let rules = cfg.rules.unwrap_or_default();
    let targets = match rules.targets {
        Some(t) => match validate_targets(&t) {
            Ok(()) => t,
            Err(e) => {
                warnings.push(format!("{}; using default targets", e));
                DEFAULT_TARGETS.to_vec()
            }
        },
        None => DEFAULT_TARGETS.to_vec(),
    };
    let url_prefix = match rules.url_prefix {
        Some(p) => match validate_url_prefix(&p) {
            Ok(()) => p,
            Err(e) => {
                warnings.push(format!("{}; using default prefix", e));
                DEFAULT_URL_PREFIX.to_string()
            }
        },
        None => DEFAULT_URL_PREFIX.to_string(),
    };

    Effective {
        repo_root,
        config_path,
        output,
        report,
        targets,
        url_prefix,
        check: cli_check,
        dry_run: cli_dry_run,
        warnings,
    }
}

fn validate_targets(targets: &[u32]) -> Result<()> {
    if let Some(pos) = targets.iter().position(|&t| t == 0) {
        return Err(Error::InvalidConfig(format!(
            "rules.targets[{}] must be a positive integer",
            pos
        )));
    }
    Ok(())
}

fn validate_url_prefix(prefix: &str) -> Result<()> {
    if !URL_PREFIX_RE.is_match(prefix) {
        return Err(Error::InvalidConfig(format!(
            "rules.url_prefix '{}' must look like '<scheme or *>://host/path'",
            prefix
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::tempdir;

    #[test]
    fn test_defaults_without_config() {
        let dir = tempdir().unwrap();
        fs::create_dir(dir.path().join(".git")).unwrap();

        let eff = resolve_effective(dir.path().to_str(), None, None, false, false);
        assert!(eff.config_path.is_none());
        assert!(eff.warnings.is_empty());
        assert_eq!(eff.output, PathBuf::from("./rules.json"));
        assert_eq!(eff.report, "human");
        assert_eq!(eff.targets, vec![20, 24, 32, 40, 48, 88, 96, 176]);
        assert_eq!(eff.url_prefix, "*://miro.medium.com/fit/c/");
    }

    #[test]
    fn test_detect_and_load_toml() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        let mut f = fs::File::create(root.join("declare-rules.toml")).unwrap();
        writeln!(
            f,
            "{}",
            r#"
output = "extension/rules.json"
report = "json"
[rules]
targets = [64, 128]
url_prefix = "*://cdn.example.com/fit/c/"
    "#
        )
        .unwrap();

        // Start below the root to exercise the upward walk
        let nested = root.join("a/b");
        fs::create_dir_all(&nested).unwrap();
        let eff = resolve_effective(nested.to_str(), None, None, false, false);
        assert_eq!(eff.repo_root, root);
        assert_eq!(eff.output, root.join("extension/rules.json"));
        assert_eq!(eff.report, "json");
        assert_eq!(eff.targets, vec![64, 128]);
        assert_eq!(eff.url_prefix, "*://cdn.example.com/fit/c/");
    }

    #[test]
    fn test_detect_repo_root_walks_up_from_relative_start() {
        let dir = tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        fs::write(root.join("declare-rules.toml"), "").unwrap();
        let nested = root.join("sub");
        fs::create_dir(&nested).unwrap();

        // A relative path has no parents of its own; it must be resolved first
        let cwd = std::env::current_dir().unwrap().canonicalize().unwrap();
        let rel = pathdiff::diff_paths(&nested, &cwd).unwrap();
        assert!(rel.is_relative());
        assert_eq!(detect_repo_root(&rel), root);
    }

    #[test]
    fn test_load_yaml_partial_keeps_defaults() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("declare-rules.yaml"),
            "rules:\n  targets: [20, 24]\n",
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None, false, false);
        assert_eq!(eff.targets, vec![20, 24]);
        assert_eq!(eff.url_prefix, DEFAULT_URL_PREFIX);
        assert_eq!(eff.output, PathBuf::from(DEFAULT_OUTPUT));
    }

    #[test]
    fn test_cli_output_and_report_take_precedence() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("declare-rules.toml"),
            "output = \"from-config.json\"\nreport = \"json\"\n",
        )
        .unwrap();

        let eff = resolve_effective(
            root.to_str(),
            Some("cli/rules.json"),
            Some("human"),
            true,
            false,
        );
        assert_eq!(eff.output, PathBuf::from("cli/rules.json"));
        assert_eq!(eff.report, "human");
        assert!(eff.check);
        assert!(!eff.dry_run);
    }

    #[test]
    fn test_zero_target_falls_back_with_warning() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("declare-rules.toml"), "[rules]\ntargets = [20, 0]\n").unwrap();

        let eff = resolve_effective(root.to_str(), None, None, false, false);
        assert_eq!(eff.targets, DEFAULT_TARGETS.to_vec());
        assert_eq!(eff.warnings.len(), 1);
        assert!(eff.warnings[0].contains("targets[1]"));
    }

    #[test]
    fn test_bad_url_prefix_falls_back_with_warning() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(
            root.join("declare-rules.toml"),
            "[rules]\nurl_prefix = \"miro.medium.com/fit/c/\"\n",
        )
        .unwrap();

        let eff = resolve_effective(root.to_str(), None, None, false, false);
        assert_eq!(eff.url_prefix, DEFAULT_URL_PREFIX);
        assert!(eff.warnings[0].contains("url_prefix"));
    }

    #[test]
    fn test_unknown_config_report_falls_back_to_human() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("declare-rules.toml"), "report = \"xml\"\n").unwrap();

        let eff = resolve_effective(root.to_str(), None, None, false, false);
        assert_eq!(eff.report, "human");
        assert!(eff.warnings[0].contains("xml"));
    }

    #[test]
    fn test_unparseable_config_is_ignored_with_warning() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::write(root.join("declare-rules.toml"), "output = [oops\n").unwrap();

        assert!(matches!(load_config(root), Err(Error::ConfigParse { .. })));
        let eff = resolve_effective(root.to_str(), Some("rules.json"), None, false, false);
        assert!(eff.config_path.is_none());
        assert_eq!(eff.output, PathBuf::from("rules.json"));
        assert_eq!(eff.targets, DEFAULT_TARGETS.to_vec());
        assert_eq!(eff.warnings.len(), 1);
        assert!(eff.warnings[0].contains("ignoring config file"));
    }
}
