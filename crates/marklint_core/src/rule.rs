//! The rule interface and the registry of available rules.

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use marklint_ast::{AstArena, Span};
use marklint_parser::{MarkdownParser, ParseError};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use crate::cancel::CancellationToken;
use crate::config::LinterConfig;
use crate::diagnostic::{Diagnostic, Severity};
use crate::edit::{EditError, prepare_edits};
use crate::snapshot::{LineInfo, SourceSnapshot};
use crate::LinterError;

/// A lint check.
///
/// Rules are pure functions of a snapshot and their options: they may not
/// keep state between calls and only see the snapshot through a shared
/// borrow. Long-running rules must call [`RuleContext::check_cancelled`]
/// at least once per line they scan.
pub trait Rule: Send + Sync {
    /// Stable identifier, e.g. `MD009`.
    fn id(&self) -> &'static str;

    /// Kebab-case name, e.g. `no-trailing-spaces`.
    fn name(&self) -> &'static str;

    fn description(&self) -> &'static str;

    /// Whether the rule attaches fix edits to its diagnostics.
    fn can_fix(&self) -> bool {
        false
    }

    fn default_enabled(&self) -> bool {
        true
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError>;
}

/// Why a rule could not produce diagnostics for a pass.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    /// The run was cancelled while the rule was scanning.
    #[error("cancelled")]
    Cancelled,

    #[error("invalid option '{option}': {message}")]
    InvalidOption { option: String, message: String },

    /// The rule built edits that overlap each other.
    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("rule panicked: {0}")]
    Panicked(String),

    #[error("{0}")]
    Failed(String),
}

impl RuleError {
    pub fn invalid_option(option: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            message: message.into(),
        }
    }
}

/// Everything a rule sees during one check.
pub struct RuleContext<'a> {
    snapshot: &'a SourceSnapshot<'a>,
    rule: &'a ResolvedRule,
    cancel: &'a CancellationToken,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        snapshot: &'a SourceSnapshot<'a>,
        rule: &'a ResolvedRule,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            snapshot,
            rule,
            cancel,
        }
    }

    pub fn snapshot(&self) -> &'a SourceSnapshot<'a> {
        self.snapshot
    }

    pub fn source(&self) -> &'a str {
        self.snapshot.source()
    }

    pub fn lines(&self) -> &'a [LineInfo] {
        self.snapshot.lines()
    }

    /// Rule options with the engine keys (`enabled`, `severity`, `fix`)
    /// removed.
    pub fn options(&self) -> &'a Value {
        &self.rule.options
    }

    /// Reads a non-negative integer option.
    pub fn option_u64(&self, key: &str, default: u64) -> Result<u64, RuleError> {
        match self.rule.options.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(value) => value
                .as_u64()
                .ok_or_else(|| RuleError::invalid_option(key, "expected a non-negative integer")),
        }
    }

    pub fn option_str(&self, key: &str, default: &'a str) -> Result<&'a str, RuleError> {
        match self.rule.options.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(value) => value
                .as_str()
                .ok_or_else(|| RuleError::invalid_option(key, "expected a string")),
        }
    }

    pub fn option_bool(&self, key: &str, default: bool) -> Result<bool, RuleError> {
        match self.rule.options.get(key) {
            None | Some(Value::Null) => Ok(default),
            Some(value) => value
                .as_bool()
                .ok_or_else(|| RuleError::invalid_option(key, "expected a boolean")),
        }
    }

    /// Returns `Err(RuleError::Cancelled)` once the run is cancelled.
    #[inline]
    pub fn check_cancelled(&self) -> Result<(), RuleError> {
        if self.cancel.is_cancelled() {
            Err(RuleError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Starts a diagnostic for this rule at `span`, with the configured
    /// severity and the location derived from the snapshot.
    pub fn report(&self, span: Span, message: impl Into<String>) -> Diagnostic {
        let rule = &self.rule.rule;
        Diagnostic::new(
            rule.id(),
            rule.name(),
            message,
            span,
            self.snapshot.location(span),
        )
        .with_severity(self.rule.severity)
    }
}

/// A rule together with its effective configuration.
#[derive(Clone)]
pub struct ResolvedRule {
    pub rule: Arc<dyn Rule>,
    pub severity: Severity,
    pub options: Value,
    /// Whether fixes of this rule may be applied.
    pub fix: bool,
}

impl ResolvedRule {
    /// Wraps a rule with its defaults and no options.
    pub fn with_defaults(rule: Arc<dyn Rule>) -> Self {
        Self {
            severity: rule.default_severity(),
            rule,
            options: Value::Object(serde_json::Map::new()),
            fix: true,
        }
    }

    pub fn with_options(mut self, options: Value) -> Self {
        self.options = options;
        self
    }

    pub fn id(&self) -> &'static str {
        self.rule.id()
    }
}

impl fmt::Debug for ResolvedRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResolvedRule")
            .field("id", &self.rule.id())
            .field("severity", &self.severity)
            .field("options", &self.options)
            .field("fix", &self.fix)
            .finish()
    }
}

/// Immutable map of rule id to rule.
#[derive(Clone, Default)]
pub struct RuleRegistry {
    rules: BTreeMap<&'static str, Arc<dyn Rule>>,
}

/// Builder for [`RuleRegistry`].
#[derive(Default)]
pub struct RuleRegistryBuilder {
    rules: BTreeMap<&'static str, Arc<dyn Rule>>,
}

impl RuleRegistryBuilder {
    /// Adds a rule; a later rule with the same id replaces the earlier one.
    pub fn register(mut self, rule: impl Rule + 'static) -> Self {
        self.register_arc(Arc::new(rule));
        self
    }

    pub fn register_arc(&mut self, rule: Arc<dyn Rule>) {
        if self.rules.insert(rule.id(), rule.clone()).is_some() {
            warn!("Rule {} registered twice; keeping the last one", rule.id());
        }
    }

    pub fn build(self) -> RuleRegistry {
        RuleRegistry { rules: self.rules }
    }
}

impl RuleRegistry {
    pub fn builder() -> RuleRegistryBuilder {
        RuleRegistryBuilder::default()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn Rule>> {
        self.rules.values()
    }

    /// Looks a rule up by id (case-insensitive) or by name.
    pub fn get(&self, key: &str) -> Option<&Arc<dyn Rule>> {
        self.rules.get(key).or_else(|| {
            self.rules
                .values()
                .find(|rule| rule.id().eq_ignore_ascii_case(key) || rule.name() == key)
        })
    }

    /// Produces the enabled rules, in id order, with their effective
    /// severity, options and fix setting.
    ///
    /// A config key that names no registered rule is a configuration error.
    pub fn resolve(&self, config: &LinterConfig) -> Result<Vec<ResolvedRule>, LinterError> {
        if let Some(unknown) = config.rules.keys().find(|key| self.get(key).is_none()) {
            return Err(LinterError::config(format!("Unknown rule '{}'", unknown)));
        }

        let mut resolved = Vec::with_capacity(self.rules.len());
        for rule in self.rules.values() {
            let Some(option) = config.rule_option(rule.id(), rule.name()) else {
                if rule.default_enabled() {
                    resolved.push(ResolvedRule::with_defaults(rule.clone()));
                }
                continue;
            };

            let setting = option.setting()?;
            if !setting.enabled {
                continue;
            }
            resolved.push(ResolvedRule {
                rule: rule.clone(),
                severity: setting.severity.unwrap_or_else(|| rule.default_severity()),
                options: setting.options,
                fix: setting.fix,
            });
        }

        Ok(resolved)
    }
}

impl fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.rules.keys()).finish()
    }
}

/// Failure of [`check_rule_idempotent`].
#[derive(Debug, Error)]
pub enum IdempotencyError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("rule failed: {0}")]
    Rule(#[from] RuleError),

    #[error(transparent)]
    Edit(#[from] EditError),

    #[error("{count} fixable diagnostic(s) remain after fixing:\n{content}")]
    NotIdempotent { count: usize, content: String },
}

/// Runs one rule on `source`, applies its fixes strictly, and re-runs it on
/// the result.
///
/// Succeeds with the fixed content when the second run reports nothing
/// fixable. Used by rule tests to hold every fixable rule to the
/// idempotency contract.
pub fn check_rule_idempotent(
    rule: &ResolvedRule,
    source: &str,
) -> Result<String, IdempotencyError> {
    let parser = MarkdownParser::new();
    let cancel = CancellationToken::new();
    let path = Path::new("<idempotency>");

    let fixed = {
        let arena = AstArena::new();
        let snapshot = SourceSnapshot::from_source(&arena, &parser, path, source)?;
        let diagnostics = rule.rule.check(&RuleContext::new(&snapshot, rule, &cancel))?;
        let prepared = prepare_edits(source, diagnostics.into_iter().flat_map(|d| d.edits))?;
        prepared.apply(source)
    };

    let arena = AstArena::new();
    let snapshot = SourceSnapshot::from_source(&arena, &parser, path, &fixed)?;
    let remaining = rule.rule.check(&RuleContext::new(&snapshot, rule, &cancel))?;
    let count = remaining.iter().filter(|d| d.is_fixable()).count();
    if count > 0 {
        return Err(IdempotencyError::NotIdempotent {
            count,
            content: fixed,
        });
    }

    Ok(fixed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edit::TextEdit;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    /// Flags every `TODO` and replaces it with `DONE`.
    struct NoTodo;

    impl Rule for NoTodo {
        fn id(&self) -> &'static str {
            "X001"
        }
        fn name(&self) -> &'static str {
            "no-todo"
        }
        fn description(&self) -> &'static str {
            "Disallow TODO"
        }
        fn can_fix(&self) -> bool {
            true
        }
        fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
            let replacement = ctx.option_str("replacement", "DONE")?;
            let mut out = Vec::new();
            for (offset, _) in ctx.source().match_indices("TODO") {
                ctx.check_cancelled()?;
                let span = Span::new(offset as u32, offset as u32 + 4);
                out.push(
                    ctx.report(span, "Found TODO")
                        .with_edits(vec![TextEdit::replace_span(span, replacement)]),
                );
            }
            Ok(out)
        }
    }

    /// Never converges: appends a character on every run.
    struct Grows;

    impl Rule for Grows {
        fn id(&self) -> &'static str {
            "X002"
        }
        fn name(&self) -> &'static str {
            "grows"
        }
        fn description(&self) -> &'static str {
            "Always wants one more"
        }
        fn default_enabled(&self) -> bool {
            false
        }
        fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
            let end = ctx.source().len() as u32;
            Ok(vec![
                ctx.report(Span::empty(end), "more")
                    .with_edits(vec![TextEdit::insert(end, "+")]),
            ])
        }
    }

    fn registry() -> RuleRegistry {
        RuleRegistry::builder().register(Grows).register(NoTodo).build()
    }

    #[test]
    fn registry_iterates_in_id_order() {
        let ids: Vec<&str> = registry().iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec!["X001", "X002"]);
    }

    #[test]
    fn registry_lookup_by_id_or_name() {
        let registry = registry();
        assert_eq!(registry.get("X001").map(|r| r.name()), Some("no-todo"));
        assert_eq!(registry.get("x002").map(|r| r.name()), Some("grows"));
        assert_eq!(registry.get("no-todo").map(|r| r.id()), Some("X001"));
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn resolve_uses_defaults_and_config() {
        let registry = registry();

        let defaults = registry.resolve(&LinterConfig::new()).unwrap();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id(), "X001");
        assert_eq!(defaults[0].severity, Severity::Error);

        let config = LinterConfig::from_json(
            r#"{ "rules": { "grows": "warning", "X001": { "fix": false, "replacement": "OK" } } }"#,
        )
        .unwrap();
        let resolved = registry.resolve(&config).unwrap();
        assert_eq!(resolved.len(), 2);
        assert!(!resolved[0].fix);
        assert_eq!(resolved[0].options, json!({ "replacement": "OK" }));
        assert_eq!(resolved[1].id(), "X002");
        assert_eq!(resolved[1].severity, Severity::Warning);
    }

    #[test]
    fn resolve_rejects_unknown_rules() {
        let config = LinterConfig::from_json(r#"{ "rules": { "MD999": true } }"#).unwrap();
        let err = registry().resolve(&config).unwrap_err();
        assert!(err.to_string().contains("Unknown rule 'MD999'"));
    }

    #[test]
    fn context_reports_with_location_and_severity() {
        let arena = AstArena::new();
        let parser = MarkdownParser::new();
        let snapshot =
            SourceSnapshot::from_source(&arena, &parser, Path::new("a.md"), "ok\nTODO\n").unwrap();
        let mut rule = ResolvedRule::with_defaults(Arc::new(NoTodo));
        rule.severity = Severity::Info;
        let cancel = CancellationToken::new();

        let diags = NoTodo.check(&RuleContext::new(&snapshot, &rule, &cancel)).unwrap();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].loc.start.line, 2);
        assert_eq!(diags[0].loc.start.column, 1);
        assert_eq!(diags[0].severity, Severity::Info);
        assert_eq!(diags[0].rule_name, "no-todo");
    }

    #[test]
    fn context_observes_cancellation() {
        let arena = AstArena::new();
        let parser = MarkdownParser::new();
        let snapshot =
            SourceSnapshot::from_source(&arena, &parser, Path::new("a.md"), "TODO\n").unwrap();
        let rule = ResolvedRule::with_defaults(Arc::new(NoTodo));
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = NoTodo
            .check(&RuleContext::new(&snapshot, &rule, &cancel))
            .unwrap_err();
        assert_eq!(err, RuleError::Cancelled);
    }

    #[test]
    fn invalid_option_type_is_a_rule_error() {
        let rule = ResolvedRule::with_defaults(Arc::new(NoTodo)).with_options(json!({
            "replacement": 3
        }));
        let err = check_rule_idempotent(&rule, "TODO\n").unwrap_err();
        assert!(matches!(
            err,
            IdempotencyError::Rule(RuleError::InvalidOption { .. })
        ));
    }

    #[test]
    fn idempotent_rule_passes() {
        let rule = ResolvedRule::with_defaults(Arc::new(NoTodo));
        let fixed = check_rule_idempotent(&rule, "TODO: a\nTODO: b\n").unwrap();
        assert_eq!(fixed, "DONE: a\nDONE: b\n");
    }

    #[test]
    fn non_idempotent_rule_fails() {
        let rule = ResolvedRule::with_defaults(Arc::new(Grows));
        let err = check_rule_idempotent(&rule, "x").unwrap_err();
        assert!(matches!(err, IdempotencyError::NotIdempotent { count: 1, .. }));
    }
}
