//! Fix summary reporting

use std::path::PathBuf;

use marklint_core::{FileOutcome, PipelineWarning, RunReport};

/// Summary of applied fixes.
#[derive(Debug, Default)]
pub struct FixSummary {
    pub total_fixes: usize,
    pub files_fixed: usize,
    pub fixes_by_file: Vec<(PathBuf, usize)>,
    /// Files whose fixes hit the pass cap or started oscillating.
    pub unconverged: Vec<PathBuf>,
}

impl FixSummary {
    pub fn from_report(report: &RunReport) -> Self {
        let mut summary = Self::default();

        for file in &report.files {
            let FileOutcome::Completed(result) = &file.outcome else {
                continue;
            };
            if result.changed {
                summary.total_fixes += result.fixes_applied;
                summary.files_fixed += 1;
                summary
                    .fixes_by_file
                    .push((file.path.clone(), result.fixes_applied));
            }
            if result.warnings.iter().any(|w| {
                matches!(
                    w,
                    PipelineWarning::PassCapReached { .. } | PipelineWarning::Oscillation { .. }
                )
            }) {
                summary.unconverged.push(file.path.clone());
            }
        }

        summary
    }
}

/// Outputs the fix summary.
pub fn output_fix_summary(summary: &FixSummary, dry_run: bool) {
    print!("{}", format_fix_summary(summary, dry_run));
}

fn format_fix_summary(summary: &FixSummary, dry_run: bool) -> String {
    let mut out = String::new();

    if summary.total_fixes == 0 {
        out.push_str("No fixable issues found.\n");
    } else {
        let action = if dry_run { "Would fix" } else { "Fixed" };
        out.push_str(&format!(
            "\n{} {} issues in {} files:\n",
            action, summary.total_fixes, summary.files_fixed
        ));
        for (path, count) in &summary.fixes_by_file {
            out.push_str(&format!("  {}: {} fixes\n", path.display(), count));
        }
        if dry_run {
            out.push_str("\nRun without --dry-run to apply fixes.\n");
        }
    }

    if !summary.unconverged.is_empty() {
        out.push_str(&format!(
            "\nFixes did not converge in {} file(s):\n",
            summary.unconverged.len()
        ));
        for path in &summary.unconverged {
            out.push_str(&format!("  {}\n", path.display()));
        }
    }

    out
}
