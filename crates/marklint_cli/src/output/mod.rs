//! Output formatting module

mod json;
mod text;

use marklint_core::RunReport;
use miette::Result;

use crate::cli::OutputFormat;

pub fn output_results(report: &RunReport, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => json::output_json(report)?,
        OutputFormat::Text => text::output_text(report),
    }
    Ok(())
}
