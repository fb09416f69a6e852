//! # marklint_core
//!
//! Core engine for marklint.
//!
//! This crate provides:
//! - The edit model and fix engine (conflict detection, merging, application)
//! - The rule interface, registry and per-rule configuration
//! - The fix-convergence pipeline that re-parses after every pass
//! - The concurrent runner with ordered results and shared cancellation
//! - File discovery, backups and atomic write-back
//!
//! ## Example
//!
//! ```rust
//! use marklint_core::{CancellationToken, EditBuilder, prepare_edits};
//!
//! let edits = EditBuilder::new()
//!     .delete(11, 12)
//!     .build()
//!     .unwrap();
//! let prepared = prepare_edits("Hello world \n", edits).unwrap();
//! assert_eq!(prepared.apply("Hello world \n"), "Hello world\n");
//!
//! let cancel = CancellationToken::new();
//! assert!(!cancel.is_cancelled());
//! ```

mod cancel;
mod config;
mod diagnostic;
mod edit;
mod error;
pub mod file_finder;
mod file_processor;
mod linter;
mod pipeline;
mod rule;
mod runner;
mod snapshot;

pub use cancel::CancellationToken;
pub use config::{
    CONFIG_FILE_NAMES, DEFAULT_MAX_FILE_SIZE, DEFAULT_MAX_PASSES, LinterConfig, RuleOption,
    RuleSetting,
};
pub use diagnostic::{Diagnostic, Severity, sort_and_dedup};
pub use edit::{
    EditBuilder, EditError, EditKind, PreparedEditSet, TextEdit, prepare_edits,
    prepare_edits_filtered,
};
pub use error::LinterError;
pub use file_finder::FileFinder;
pub use file_processor::{BACKUP_SUFFIX, WriteOptions, backup_path, process_file};
pub use linter::Linter;
pub use pipeline::{
    FixPipeline, PipelineOptions, PipelineResult, PipelineWarning, RuleFailure,
};
pub use rule::{
    IdempotencyError, ResolvedRule, Rule, RuleContext, RuleError, RuleRegistry,
    RuleRegistryBuilder, check_rule_idempotent,
};
pub use runner::{FileOutcome, FileReport, RunReport, Runner, default_jobs};
pub use snapshot::{HeadingInfo, LineInfo, SourceSnapshot};

pub use marklint_ast::{Location, Position, Span};
