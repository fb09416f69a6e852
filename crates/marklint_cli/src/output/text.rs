//! Text output formatter

use marklint_core::{FileOutcome, RunReport};

pub fn output_text(report: &RunReport) {
    print!("{}", format_text(report));
}

fn format_text(report: &RunReport) -> String {
    let mut out = String::new();

    for file in &report.files {
        let FileOutcome::Completed(result) = &file.outcome else {
            continue;
        };
        if result.diagnostics.is_empty() && result.errors.is_empty() {
            continue;
        }

        out.push_str(&format!("\n{}:\n", file.path.display()));
        for diag in &result.diagnostics {
            out.push_str(&format!(
                "  {}:{} {} [{}]: {}\n",
                diag.loc.start.line, diag.loc.start.column, diag.severity, diag.rule_id, diag.message
            ));
        }
        for failure in &result.errors {
            out.push_str(&format!(
                "  rule {} failed in pass {}: {}\n",
                failure.rule_id, failure.pass, failure.error
            ));
        }
    }

    let total_issues: usize = report.completed().map(|r| r.diagnostics.len()).sum();
    out.push_str(&format!(
        "\nChecked {} files, found {} issues\n",
        report.files.len(),
        total_issues
    ));
    out
}
