//! CLI argument definitions

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

/// marklint - Markdown linter with convergent auto-fixing
#[derive(Parser)]
#[command(name = "marklint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Lint files, optionally fixing them
    Check(CheckArgs),

    /// List the built-in rules
    Rules,

    /// Initialize configuration
    Init {
        /// Force overwrite existing config
        #[arg(long)]
        force: bool,
    },
}

#[derive(clap::Args)]
pub struct CheckArgs {
    /// Files, directories or glob patterns to check
    #[arg(required = true)]
    pub patterns: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Auto-fix problems
    #[arg(long)]
    pub fix: bool,

    /// Compute fixes without writing them
    #[arg(long, requires = "fix")]
    pub dry_run: bool,

    /// Number of worker threads
    #[arg(short, long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub jobs: Option<u32>,

    /// Do not write `<file>.bak` before overwriting a file
    #[arg(long)]
    pub no_backup: bool,

    /// Maximum number of fix passes per file
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..=100))]
    pub max_passes: Option<u32>,

    /// Cancel the run after this many seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Enable a rule by id or name
    #[arg(long, value_name = "RULE")]
    pub enable: Vec<String>,

    /// Disable a rule by id or name
    #[arg(long, value_name = "RULE")]
    pub disable: Vec<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_check_flags() {
        let cli = Cli::try_parse_from([
            "marklint", "check", "docs", "--fix", "--dry-run", "-j", "4", "--no-backup",
            "--max-passes", "3", "--timeout", "30", "--format", "json", "--disable", "MD041",
        ])
        .unwrap();

        let Commands::Check(args) = cli.command else {
            panic!("expected check");
        };
        assert_eq!(args.patterns, vec!["docs"]);
        assert!(args.fix && args.dry_run && args.no_backup);
        assert_eq!(args.jobs, Some(4));
        assert_eq!(args.max_passes, Some(3));
        assert_eq!(args.timeout, Some(30));
        assert_eq!(args.format, OutputFormat::Json);
        assert_eq!(args.disable, vec!["MD041"]);
    }

    #[test]
    fn dry_run_requires_fix() {
        assert!(Cli::try_parse_from(["marklint", "check", "a.md", "--dry-run"]).is_err());
    }

    #[test]
    fn zero_jobs_is_rejected() {
        assert!(Cli::try_parse_from(["marklint", "check", "a.md", "-j", "0"]).is_err());
    }

    #[test]
    fn global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["marklint", "rules", "-c", "x.jsonc", "-v"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("x.jsonc")));
        assert!(cli.verbose);
    }
}
