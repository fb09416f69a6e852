//! Integration tests for the built-in rules
//!
//! Runs every built-in rule together through the fix pipeline and checks
//! that documents converge to a stable, clean result.

use std::fs;
use std::path::Path;

use marklint_core::{CancellationToken, Linter, LinterConfig, PipelineResult};
use marklint_rules::builtin_registry;
use rstest::rstest;

fn linter(fix: bool) -> Linter {
    linter_with(LinterConfig::new(), fix)
}

fn linter_with(mut config: LinterConfig, fix: bool) -> Linter {
    config.fix = fix;
    Linter::new(config, &builtin_registry()).unwrap()
}

fn run(linter: &Linter, source: &str) -> PipelineResult {
    linter
        .process_source(Path::new("doc.md"), source, &CancellationToken::new())
        .unwrap()
}

fn rule_ids(result: &PipelineResult) -> Vec<&str> {
    result
        .diagnostics
        .iter()
        .map(|d| d.rule_id.as_str())
        .collect()
}

mod convergence {
    use super::*;
    use pretty_assertions::assert_eq;

    #[rstest]
    #[case::heading_revealed_by_fix(
        "#Title\nSome text   \n\n\n\nMore\n",
        "# Title\n\nSome text\n\nMore\n"
    )]
    #[case::headings_tabs_and_punctuation(
        "# Intro:\nText\twith tab\n## Next!!\n",
        "# Intro\n\nText    with tab\n\n## Next\n"
    )]
    #[case::indented_heading_and_missing_newline(
        "  # Title\n\nBody",
        "# Title\n\nBody\n"
    )]
    #[case::extra_space_and_trailing_blank_lines(
        "#  Title\n\nBody\n\n\n",
        "# Title\n\nBody\n"
    )]
    fn fixes_until_clean(#[case] source: &str, #[case] expected: &str) {
        let result = run(&linter(true), source);

        assert_eq!(result.final_content, expected);
        assert!(result.changed);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
        assert!(result.warnings.is_empty(), "{:?}", result.warnings);
        assert!(result.errors.is_empty());
        assert!(result.passes_run <= LinterConfig::new().max_passes);
    }

    #[rstest]
    #[case("#Title\nSome text   \n\n\n\nMore\n")]
    #[case("# Intro:\nText\twith tab\n## Next!!\n")]
    #[case("Intro\n#Heading\n\n\n")]
    fn fixing_twice_changes_nothing(#[case] source: &str) {
        let linter = linter(true);
        let first = run(&linter, source);
        let second = run(&linter, &first.final_content);

        assert_eq!(second.final_content, first.final_content);
        assert!(!second.changed);
        assert_eq!(second.fixes_applied, 0);
        assert_eq!(second.diagnostics, first.diagnostics);
    }

    #[test]
    fn unfixable_findings_survive_fixing() {
        let result = run(&linter(true), "Intro   \n");

        assert_eq!(result.final_content, "Intro\n");
        assert_eq!(rule_ids(&result), vec!["MD041"]);
        assert_eq!(result.fixes_applied, 1);
    }
}

mod preserved_content {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn front_matter_and_code_blocks_are_untouched() {
        let source = "---\ntitle: x   \n---\n# Doc\n\n```\ncode   \n\n\n\n\tindent\n```\n";
        let result = run(&linter(true), source);

        assert_eq!(result.final_content, source);
        assert!(!result.changed);
        assert!(result.diagnostics.is_empty(), "{:?}", result.diagnostics);
    }

    #[test]
    fn hard_breaks_are_kept() {
        let source = "# Poem\n\nline one  \nline two\n";
        let result = run(&linter(true), source);

        assert_eq!(result.final_content, source);
        assert!(result.diagnostics.is_empty());
    }
}

mod lint_only {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reports_sorted_without_changing_content() {
        let source = "Intro\n#Heading   \n\n\n";
        let result = run(&linter(false), source);

        assert_eq!(result.final_content, source);
        assert!(!result.changed);
        assert_eq!(result.fixes_applied, 0);

        let lines: Vec<u32> = result
            .diagnostics
            .iter()
            .map(|d| d.loc.start.line)
            .collect();
        let mut sorted = lines.clone();
        sorted.sort();
        assert_eq!(lines, sorted);
        assert!(rule_ids(&result).contains(&"MD041"));
        assert!(rule_ids(&result).contains(&"MD009"));
    }
}

mod configuration {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn disabled_fix_keeps_the_finding() {
        let config =
            LinterConfig::from_json(r#"{ "rules": { "MD009": { "fix": false } } }"#).unwrap();
        let source = "# Title\n\nText   \n";
        let result = run(&linter_with(config, true), source);

        assert_eq!(result.final_content, source);
        assert_eq!(rule_ids(&result), vec!["MD009"]);
    }

    #[test]
    fn rule_options_by_name() {
        let config = LinterConfig::from_json(
            r#"{ "rules": { "no-hard-tabs": { "spaces_per_tab": 2 }, "first-line-heading": "off" } }"#,
        )
        .unwrap();
        let result = run(&linter_with(config, true), "Text\twith tab\n");

        assert_eq!(result.final_content, "Text  with tab\n");
        assert!(result.diagnostics.is_empty());
    }

    #[test]
    fn severity_override() {
        let config =
            LinterConfig::from_json(r#"{ "rules": { "MD041": "warning" } }"#).unwrap();
        let result = run(&linter_with(config, false), "Intro\n");

        assert_eq!(result.error_count(), 0);
        assert_eq!(result.warning_count(), 1);
    }
}

mod files {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn run_fixes_a_tree_in_place() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("guide")).unwrap();
        fs::write(dir.path().join("README.md"), "#Readme\n").unwrap();
        fs::write(dir.path().join("guide/setup.md"), "# Setup.\nSteps\n").unwrap();

        let mut config = LinterConfig::new();
        config.backup = false;
        let linter = linter_with(config, true);
        let files = linter
            .discover(&[".".to_string()], dir.path())
            .unwrap();
        assert_eq!(files.len(), 2);

        let report = linter.run(&files, &CancellationToken::new()).unwrap();

        assert!(!report.is_failure());
        assert_eq!(
            fs::read_to_string(dir.path().join("README.md")).unwrap(),
            "# Readme\n"
        );
        assert_eq!(
            fs::read_to_string(dir.path().join("guide/setup.md")).unwrap(),
            "# Setup\n\nSteps\n"
        );
    }

    #[test]
    fn cancelled_run_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("doc.md");
        fs::write(&path, "#Doc\n").unwrap();

        let linter = linter(true);
        let cancel = CancellationToken::new();
        cancel.cancel();
        let report = linter.run(&[path.clone()], &cancel).unwrap();

        assert!(report.cancelled);
        assert!(report.is_failure());
        assert_eq!(fs::read_to_string(&path).unwrap(), "#Doc\n");
    }
}
