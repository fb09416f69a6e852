//! Core linter engine.

use std::path::{Path, PathBuf};
use std::time::Duration;

use marklint_parser::MarkdownParser;
use tracing::debug;

use crate::cancel::CancellationToken;
use crate::file_finder::FileFinder;
use crate::file_processor::{WriteOptions, process_file};
use crate::pipeline::{FixPipeline, PipelineOptions, PipelineResult};
use crate::rule::{ResolvedRule, RuleRegistry};
use crate::runner::{RunReport, Runner};
use crate::{LinterConfig, LinterError};

/// The core linter engine.
///
/// Owns the configuration and the rules it resolved from a registry, and
/// wires file discovery, the fix pipeline and the runner together.
pub struct Linter {
    config: LinterConfig,
    rules: Vec<ResolvedRule>,
    parser: MarkdownParser,
    finder: FileFinder,
}

impl Linter {
    /// Creates a linter, resolving the configured rules against `registry`.
    pub fn new(config: LinterConfig, registry: &RuleRegistry) -> Result<Self, LinterError> {
        let rules = registry.resolve(&config)?;
        let finder = FileFinder::new(&config.include, &config.exclude)?;

        debug!(
            "Enabled rules: {}",
            rules
                .iter()
                .map(ResolvedRule::id)
                .collect::<Vec<_>>()
                .join(", ")
        );

        Ok(Self {
            config,
            rules,
            parser: MarkdownParser::new(),
            finder,
        })
    }

    pub fn config(&self) -> &LinterConfig {
        &self.config
    }

    pub fn rules(&self) -> &[ResolvedRule] {
        &self.rules
    }

    /// Expands patterns into the files to process.
    ///
    /// Relative patterns resolve against `base_dir`.
    pub fn discover(&self, patterns: &[String], base_dir: &Path) -> Result<Vec<PathBuf>, LinterError> {
        self.finder.discover_files(patterns, base_dir)
    }

    /// A fresh token carrying the configured deadline, if any.
    pub fn cancellation_token(&self) -> CancellationToken {
        match self.config.timeout_secs {
            Some(secs) => CancellationToken::with_timeout(Duration::from_secs(secs)),
            None => CancellationToken::new(),
        }
    }

    fn pipeline(&self) -> FixPipeline<'_> {
        FixPipeline::new(
            &self.parser,
            &self.rules,
            PipelineOptions {
                fix: self.config.fix,
                max_passes: self.config.max_passes,
            },
        )
    }

    fn write_options(&self) -> WriteOptions {
        WriteOptions {
            dry_run: self.config.dry_run,
            backup: self.config.backup,
            max_file_size: self.config.max_file_size,
        }
    }

    /// Processes `paths` concurrently and returns outcomes in input order.
    pub fn run(&self, paths: &[PathBuf], cancel: &CancellationToken) -> Result<RunReport, LinterError> {
        Runner::new(self.pipeline(), self.write_options(), self.config.jobs).run(paths, cancel)
    }

    /// Processes a single file on the calling thread.
    pub fn process_file(
        &self,
        path: &Path,
        cancel: &CancellationToken,
    ) -> Result<PipelineResult, LinterError> {
        process_file(path, &self.pipeline(), &self.write_options(), cancel)
    }

    /// Runs the pipeline over in-memory content; nothing touches the disk.
    pub fn process_source(
        &self,
        path: &Path,
        source: &str,
        cancel: &CancellationToken,
    ) -> Result<PipelineResult, LinterError> {
        self.pipeline().run(path, source.as_bytes(), cancel)
    }
}
