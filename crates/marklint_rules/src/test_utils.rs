use std::path::Path;
use std::sync::Arc;

use marklint_ast::AstArena;
use marklint_core::{
    CancellationToken, Diagnostic, ResolvedRule, Rule, RuleContext, RuleError, SourceSnapshot,
    check_rule_idempotent,
};
use marklint_parser::MarkdownParser;
use serde_json::Value;

fn resolved(rule: impl Rule + 'static, options: Value) -> ResolvedRule {
    ResolvedRule::with_defaults(Arc::new(rule)).with_options(options)
}

/// Runs `rule` once over `source` with `options`.
pub fn try_check_with(
    rule: impl Rule + 'static,
    options: Value,
    source: &str,
) -> Result<Vec<Diagnostic>, RuleError> {
    let rule = resolved(rule, options);
    let arena = AstArena::new();
    let parser = MarkdownParser::new();
    let snapshot = SourceSnapshot::from_source(&arena, &parser, Path::new("test.md"), source)
        .expect("test source should parse");
    rule.rule
        .check(&RuleContext::new(&snapshot, &rule, &CancellationToken::new()))
}

pub fn check_with(rule: impl Rule + 'static, options: Value, source: &str) -> Vec<Diagnostic> {
    try_check_with(rule, options, source).expect("rule should not fail")
}

pub fn check(rule: impl Rule + 'static, source: &str) -> Vec<Diagnostic> {
    check_with(rule, Value::Null, source)
}

/// Applies the rule's fixes and asserts a re-run finds nothing to fix.
pub fn fix_with(rule: impl Rule + 'static, options: Value, source: &str) -> String {
    let rule = resolved(rule, options);
    check_rule_idempotent(&rule, source).unwrap_or_else(|e| panic!("{}", e))
}

pub fn fix(rule: impl Rule + 'static, source: &str) -> String {
    fix_with(rule, Value::Null, source)
}

/// 1-based start lines of the diagnostics.
pub fn lines(diagnostics: &[Diagnostic]) -> Vec<u32> {
    diagnostics.iter().map(|d| d.loc.start.line).collect()
}

/// Runs `rule` with an already-cancelled token.
pub fn check_cancelled(rule: impl Rule + 'static, source: &str) -> Result<Vec<Diagnostic>, RuleError> {
    let rule = resolved(rule, Value::Null);
    let arena = AstArena::new();
    let parser = MarkdownParser::new();
    let snapshot = SourceSnapshot::from_source(&arena, &parser, Path::new("test.md"), source)
        .expect("test source should parse");
    let cancel = CancellationToken::new();
    cancel.cancel();
    rule.rule.check(&RuleContext::new(&snapshot, &rule, &cancel))
}
