//! Per-file fix convergence.
//!
//! One pass is parse, run every rule, collect edits, apply. Passes repeat
//! on the new content until no rule proposes a fix, the content stops
//! changing, the content returns to an earlier state, or the pass cap is
//! hit. Every pass parses from scratch; positions are never patched.

use std::collections::BTreeSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};

use blake3::Hash;
use marklint_ast::AstArena;
use marklint_parser::{Parser, decode_source};
use tracing::{debug, warn};

use crate::cancel::CancellationToken;
use crate::config::DEFAULT_MAX_PASSES;
use crate::diagnostic::{Diagnostic, Severity, sort_and_dedup};
use crate::edit::{TextEdit, prepare_edits_filtered};
use crate::rule::{ResolvedRule, RuleContext, RuleError};
use crate::snapshot::SourceSnapshot;
use crate::LinterError;

/// Knobs of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PipelineOptions {
    /// Apply fixes; when false a single lint pass runs.
    pub fix: bool,
    /// Upper bound on passes.
    pub max_passes: usize,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            fix: false,
            max_passes: DEFAULT_MAX_PASSES,
        }
    }
}

/// Non-fatal notes about how a file's fixing went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineWarning {
    /// Fixes were still being produced when the pass cap was reached.
    PassCapReached { passes: usize },
    /// A pass produced content seen after an earlier pass.
    Oscillation { pass: usize, cycle_length: usize },
    /// Edits dropped because they conflicted with other edits.
    SkippedEdits { pass: usize, count: usize },
}

impl fmt::Display for PipelineWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PassCapReached { passes } => {
                write!(f, "fixes did not converge within {passes} passes")
            }
            Self::Oscillation { pass, cycle_length } => write!(
                f,
                "fixes oscillate: pass {pass} repeated content from {cycle_length} pass(es) earlier"
            ),
            Self::SkippedEdits { pass, count } => {
                write!(f, "{count} conflicting edit(s) skipped in pass {pass}")
            }
        }
    }
}

/// A rule that failed during one pass.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleFailure {
    pub rule_id: String,
    /// 1-based pass number; the reporting lint after the last fix counts
    /// as one more pass.
    pub pass: usize,
    pub error: RuleError,
}

/// Outcome of running the pipeline on one file.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineResult {
    pub path: PathBuf,
    /// Content after all applied fixes.
    pub final_content: String,
    /// Whether `final_content` differs from the input.
    pub changed: bool,
    /// Diagnostics of the final content, sorted and de-duplicated.
    pub diagnostics: Vec<Diagnostic>,
    pub passes_run: usize,
    /// Number of edits applied over all passes.
    pub fixes_applied: usize,
    pub warnings: Vec<PipelineWarning>,
    /// Rule failures of every pass, in pass order.
    pub errors: Vec<RuleFailure>,
    /// Set by the caller once `final_content` is on disk.
    pub written: bool,
}

impl PipelineResult {
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    fn count(&self, severity: Severity) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == severity)
            .count()
    }

    /// Diagnostics that still carry a fix.
    pub fn fixable_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_fixable()).count()
    }
}

/// Diagnostics and rule failures of one pass.
struct PassOutcome {
    diagnostics: Vec<Diagnostic>,
    errors: Vec<RuleFailure>,
}

/// The fix-convergence loop over a fixed set of resolved rules.
pub struct FixPipeline<'r> {
    parser: &'r dyn Parser,
    rules: &'r [ResolvedRule],
    options: PipelineOptions,
    fixable_rules: BTreeSet<&'static str>,
}

impl<'r> FixPipeline<'r> {
    pub fn new(parser: &'r dyn Parser, rules: &'r [ResolvedRule], options: PipelineOptions) -> Self {
        let fixable_rules = rules.iter().filter(|r| r.fix).map(|r| r.id()).collect();
        Self {
            parser,
            rules,
            options: PipelineOptions {
                max_passes: options.max_passes.max(1),
                ..options
            },
            fixable_rules,
        }
    }

    /// Runs the pipeline on raw file bytes.
    ///
    /// Fails only for file-level problems: invalid UTF-8, a parse error, an
    /// edit that does not fit the content, or cancellation. Rule failures are
    /// recorded in the result instead.
    pub fn run(
        &self,
        path: &Path,
        bytes: &[u8],
        cancel: &CancellationToken,
    ) -> Result<PipelineResult, LinterError> {
        let original = decode_source(bytes)?;
        let mut content = original.to_string();
        let mut history: Vec<Hash> = vec![blake3::hash(content.as_bytes())];
        let mut warnings = Vec::new();
        let mut errors = Vec::new();
        let mut fixes_applied = 0;
        let mut passes = 0;
        let mut cap_reached = false;

        let last = loop {
            passes += 1;
            let pass = self.lint_pass(path, &content, passes, cancel)?;
            debug!(
                "{}: pass {} found {} diagnostic(s)",
                path.display(),
                passes,
                pass.diagnostics.len()
            );
            errors.extend(pass.errors);
            let diagnostics = pass.diagnostics;

            if !self.options.fix {
                break Some(diagnostics);
            }

            let edits: Vec<TextEdit> = diagnostics
                .iter()
                .filter(|d| self.is_applicable(d))
                .flat_map(|d| d.edits.iter().cloned())
                .collect();
            if edits.is_empty() {
                break Some(diagnostics);
            }

            let prepared = prepare_edits_filtered(&content, edits)?;
            if !prepared.skipped.is_empty() {
                warnings.push(PipelineWarning::SkippedEdits {
                    pass: passes,
                    count: prepared.skipped.len(),
                });
            }

            let next = prepared.apply(&content);
            if next == content {
                break Some(diagnostics);
            }
            fixes_applied += prepared.accepted.len();
            content = next;

            let hash = blake3::hash(content.as_bytes());
            if let Some(seen_at) = history.iter().position(|h| *h == hash) {
                let warning = PipelineWarning::Oscillation {
                    pass: passes,
                    cycle_length: history.len() - seen_at,
                };
                warn!("{}: {}", path.display(), warning);
                warnings.push(warning);
                break None;
            }
            history.push(hash);

            if passes >= self.options.max_passes {
                cap_reached = true;
                break None;
            }
        };

        // The last pass changed the content: report against what is on disk
        // afterwards, not against what the pass saw.
        let mut diagnostics = match last {
            Some(diagnostics) => diagnostics,
            None => {
                let report = self.lint_pass(path, &content, passes + 1, cancel)?;
                errors.extend(report.errors);
                report.diagnostics
            }
        };
        sort_and_dedup(&mut diagnostics);

        if cap_reached && diagnostics.iter().any(|d| self.is_applicable(d)) {
            let warning = PipelineWarning::PassCapReached { passes };
            warn!("{}: {}", path.display(), warning);
            warnings.push(warning);
        }

        Ok(PipelineResult {
            path: path.to_path_buf(),
            changed: content != original,
            final_content: content,
            diagnostics,
            passes_run: passes,
            fixes_applied,
            warnings,
            errors,
            written: false,
        })
    }

    fn is_applicable(&self, diagnostic: &Diagnostic) -> bool {
        diagnostic.is_fixable() && self.fixable_rules.contains(diagnostic.rule_id.as_str())
    }

    fn lint_pass(
        &self,
        path: &Path,
        content: &str,
        pass: usize,
        cancel: &CancellationToken,
    ) -> Result<PassOutcome, LinterError> {
        if cancel.is_cancelled() {
            return Err(LinterError::Cancelled);
        }

        let arena = AstArena::for_source(content.len());
        let snapshot = SourceSnapshot::from_source(&arena, self.parser, path, content)?;

        let mut outcome = PassOutcome {
            diagnostics: Vec::new(),
            errors: Vec::new(),
        };

        for rule in self.rules {
            let ctx = RuleContext::new(&snapshot, rule, cancel);
            match run_rule(rule, &ctx) {
                Ok(diagnostics) => outcome.diagnostics.extend(diagnostics),
                Err(RuleError::Cancelled) => return Err(LinterError::Cancelled),
                Err(error) => {
                    warn!("Rule '{}' failed on {}: {}", rule.id(), path.display(), error);
                    outcome.errors.push(RuleFailure {
                        rule_id: rule.id().to_string(),
                        pass,
                        error,
                    });
                }
            }
        }

        Ok(outcome)
    }
}

/// Runs one rule, turning a panic into a rule error.
fn run_rule(rule: &ResolvedRule, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
    panic::catch_unwind(AssertUnwindSafe(|| rule.rule.check(ctx))).unwrap_or_else(|payload| {
        let message = payload
            .downcast_ref::<&str>()
            .map(|s| s.to_string())
            .or_else(|| payload.downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "unknown panic".to_string());
        Err(RuleError::Panicked(message))
    })
}
