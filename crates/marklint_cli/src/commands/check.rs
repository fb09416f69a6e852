//! Check command implementation

use std::path::Path;

use marklint_core::{Linter, LinterConfig, RuleRegistry};
use marklint_rules::builtin_registry;
use miette::{IntoDiagnostic, Result};
use tracing::{info, warn};

use crate::cli::{CheckArgs, Cli, OutputFormat};
use crate::fix::{FixSummary, output_fix_summary};
use crate::output::output_results;
use crate::utils::{create_tokio_runtime, spawn_ctrl_c_listener};

pub fn run_check(cli: &Cli, args: &CheckArgs) -> Result<bool> {
    let mut config = if let Some(ref path) = cli.config {
        LinterConfig::from_file(path).into_diagnostic()?
    } else {
        find_config()?
    };

    let registry = builtin_registry();
    apply_overrides(&mut config, args, &registry)?;
    let fix = config.fix;
    let dry_run = config.dry_run;

    let linter = Linter::new(config, &registry).into_diagnostic()?;
    let files = linter
        .discover(&args.patterns, Path::new("."))
        .into_diagnostic()?;
    if files.is_empty() {
        warn!("No files matched {}", args.patterns.join(" "));
    }

    let cancel = linter.cancellation_token();
    let runtime = create_tokio_runtime()?;
    spawn_ctrl_c_listener(&runtime, cancel.clone());

    let report = linter.run(&files, &cancel).into_diagnostic()?;
    runtime.shutdown_background();

    output_results(&report, args.format)?;

    // JSON output already carries per-file fix counts.
    if fix && args.format == OutputFormat::Text {
        output_fix_summary(&FixSummary::from_report(&report), dry_run);
    }

    let failures: Vec<_> = report
        .failures()
        .filter(|(_, error)| !error.is_cancelled())
        .collect();
    if !failures.is_empty() {
        eprintln!("\n{} file(s) failed to lint:", failures.len());
        for (path, error) in &failures {
            eprintln!("  {}: {}", path.display(), error);
        }
    }

    if report.cancelled {
        let skipped = report
            .failures()
            .filter(|(_, error)| error.is_cancelled())
            .count();
        eprintln!("\nRun cancelled; {} file(s) were not processed.", skipped);
    }

    Ok(report.is_failure())
}

fn find_config() -> Result<LinterConfig> {
    if let Some(path) = LinterConfig::discover(Path::new(".")) {
        info!("Using config: {}", path.display());
        return LinterConfig::from_file(&path).into_diagnostic();
    }

    info!("No config file found, using defaults");
    Ok(LinterConfig::new())
}

/// Command-line flags win over the config file.
fn apply_overrides(
    config: &mut LinterConfig,
    args: &CheckArgs,
    registry: &RuleRegistry,
) -> Result<()> {
    if args.fix {
        config.fix = true;
    }
    if args.dry_run {
        config.dry_run = true;
    }
    if args.no_backup {
        config.backup = false;
    }
    if let Some(jobs) = args.jobs {
        config.jobs = Some(jobs as usize);
    }
    if let Some(max_passes) = args.max_passes {
        config.max_passes = max_passes as usize;
    }
    if let Some(timeout) = args.timeout {
        config.timeout_secs = Some(timeout);
    }

    for (keys, enabled) in [(&args.enable, true), (&args.disable, false)] {
        for key in keys {
            let rule = registry
                .get(key)
                .ok_or_else(|| miette::miette!("Unknown rule: {}", key))?;
            // Keep options the config file stored under the rule's name.
            let key = if !config.rules.contains_key(rule.id())
                && config.rules.contains_key(rule.name())
            {
                rule.name()
            } else {
                rule.id()
            };
            config.set_rule_enabled(key, enabled);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    use crate::cli::Commands;

    fn check_args(argv: &[&str]) -> CheckArgs {
        let mut full = vec!["marklint", "check"];
        full.extend_from_slice(argv);
        match Cli::try_parse_from(full).unwrap().command {
            Commands::Check(args) => args,
            _ => unreachable!(),
        }
    }

    #[test]
    fn flags_override_config() {
        let mut config = LinterConfig::new();
        let args = check_args(&["a.md", "--fix", "--no-backup", "-j", "2", "--max-passes", "4"]);

        apply_overrides(&mut config, &args, &builtin_registry()).unwrap();

        assert!(config.fix);
        assert!(!config.dry_run);
        assert!(!config.backup);
        assert_eq!(config.jobs, Some(2));
        assert_eq!(config.max_passes, 4);
        assert_eq!(config.timeout_secs, None);
    }

    #[test]
    fn rule_names_normalize_to_ids() {
        let mut config = LinterConfig::new();
        let args = check_args(&["a.md", "--disable", "first-line-heading", "--disable", "md009"]);

        apply_overrides(&mut config, &args, &builtin_registry()).unwrap();

        assert!(!config.rules["MD041"].is_enabled());
        assert!(!config.rules["MD009"].is_enabled());
        assert!(!config.rules.contains_key("first-line-heading"));
    }

    #[test]
    fn enable_keeps_options_stored_by_name() {
        let mut config =
            LinterConfig::from_json(r#"{ "rules": { "no-hard-tabs": { "spaces_per_tab": 2, "enabled": false } } }"#)
                .unwrap();
        let args = check_args(&["a.md", "--enable", "MD010"]);

        apply_overrides(&mut config, &args, &builtin_registry()).unwrap();

        let setting = config.rules["no-hard-tabs"].setting().unwrap();
        assert!(setting.enabled);
        assert_eq!(setting.options["spaces_per_tab"], serde_json::json!(2));
        assert!(!config.rules.contains_key("MD010"));
    }

    #[test]
    fn unknown_rule_is_an_error() {
        let mut config = LinterConfig::new();
        let args = check_args(&["a.md", "--enable", "MD999"]);

        assert!(apply_overrides(&mut config, &args, &builtin_registry()).is_err());
    }
}
