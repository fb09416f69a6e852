//! JSON output formatter

use marklint_core::{FileOutcome, RunReport};
use miette::{IntoDiagnostic, Result};
use serde_json::{Value, json};

pub fn output_json(report: &RunReport) -> Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(&report_to_json(report)).into_diagnostic()?
    );
    Ok(())
}

fn report_to_json(report: &RunReport) -> Value {
    let files: Vec<_> = report
        .files
        .iter()
        .map(|file| {
            let path = file.path.display().to_string();
            match &file.outcome {
                FileOutcome::Completed(result) => json!({
                    "path": path,
                    "status": "completed",
                    "diagnostics": result.diagnostics,
                    "changed": result.changed,
                    "written": result.written,
                    "passes": result.passes_run,
                    "fixes_applied": result.fixes_applied,
                    "warnings": result
                        .warnings
                        .iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>(),
                    "rule_errors": result
                        .errors
                        .iter()
                        .map(|f| json!({
                            "rule_id": f.rule_id,
                            "pass": f.pass,
                            "message": f.error.to_string(),
                        }))
                        .collect::<Vec<_>>(),
                }),
                FileOutcome::Failed(error) => json!({
                    "path": path,
                    "status": if error.is_cancelled() { "cancelled" } else { "failed" },
                    "error": error.to_string(),
                }),
            }
        })
        .collect();

    json!({
        "files": files,
        "summary": {
            "files": report.files.len(),
            "failed": report.failed_count(),
            "errors": report.error_count(),
            "warnings": report.warning_count(),
            "fixes_applied": report.fixes_applied(),
            "cancelled": report.cancelled,
        },
    })
}
