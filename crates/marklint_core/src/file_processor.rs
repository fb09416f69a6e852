//! Single file processing: read, run the pipeline, write back.

use std::ffi::OsString;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::cancel::CancellationToken;
use crate::config::DEFAULT_MAX_FILE_SIZE;
use crate::error::LinterError;
use crate::pipeline::{FixPipeline, PipelineResult};

/// Appended to a file name to form its backup path.
pub const BACKUP_SUFFIX: &str = ".bak";

/// How results reach the disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WriteOptions {
    /// Compute fixes but never write.
    pub dry_run: bool,
    /// Copy the original to `<file>.bak` before overwriting it.
    pub backup: bool,
    /// Larger files fail without being read.
    pub max_file_size: u64,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            backup: true,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
        }
    }
}

/// Returns `<path>.bak`.
pub fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(BACKUP_SUFFIX);
    PathBuf::from(name)
}

/// Runs the whole per-file job for one path.
pub fn process_file(
    path: &Path,
    pipeline: &FixPipeline<'_>,
    options: &WriteOptions,
    cancel: &CancellationToken,
) -> Result<PipelineResult, LinterError> {
    debug!("Processing {}", path.display());

    let metadata = fs::metadata(path).map_err(|e| {
        LinterError::file(format!(
            "Failed to read metadata for {}: {}",
            path.display(),
            e
        ))
    })?;

    if !metadata.is_file() {
        return Err(LinterError::file(format!(
            "Not a regular file: {}",
            path.display()
        )));
    }

    if metadata.len() > options.max_file_size {
        return Err(LinterError::file(format!(
            "File size exceeds limit of {} bytes: {}",
            options.max_file_size,
            path.display()
        )));
    }

    let bytes = fs::read(path)
        .map_err(|e| LinterError::file(format!("Failed to read {}: {}", path.display(), e)))?;

    let mut result = pipeline.run(path, &bytes, cancel)?;

    if !result.changed {
        return Ok(result);
    }
    if options.dry_run {
        debug!("Dry run: not writing {}", path.display());
        return Ok(result);
    }

    if options.backup {
        let backup = backup_path(path);
        fs::write(&backup, &bytes).map_err(|source| LinterError::Backup {
            path: backup.clone(),
            source,
        })?;
        debug!("Backed up {} to {}", path.display(), backup.display());
    }

    atomic_write(path, result.final_content.as_bytes(), &metadata.permissions()).map_err(|e| {
        LinterError::file(format!("Failed to write {}: {}", path.display(), e))
    })?;
    result.written = true;
    info!(
        "Fixed {} ({} edit(s), {} pass(es))",
        path.display(),
        result.fixes_applied,
        result.passes_run
    );

    Ok(result)
}

/// Atomic file write: tempfile in the same directory + fsync + rename.
fn atomic_write(path: &Path, content: &[u8], permissions: &fs::Permissions) -> std::io::Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut temp = NamedTempFile::new_in(parent)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    fs::set_permissions(temp.path(), permissions.clone())?;
    temp.persist(path).map_err(|e| e.error)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use marklint_ast::Span;
    use marklint_parser::MarkdownParser;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    use crate::diagnostic::Diagnostic;
    use crate::edit::TextEdit;
    use crate::pipeline::PipelineOptions;
    use crate::rule::{ResolvedRule, Rule, RuleContext, RuleError};

    struct NoTabs;

    impl Rule for NoTabs {
        fn id(&self) -> &'static str {
            "T010"
        }
        fn name(&self) -> &'static str {
            "no-tabs"
        }
        fn description(&self) -> &'static str {
            "tabs to spaces"
        }
        fn can_fix(&self) -> bool {
            true
        }
        fn check(&self, ctx: &RuleContext<'_>) -> Result<Vec<Diagnostic>, RuleError> {
            Ok(ctx
                .source()
                .match_indices('\t')
                .map(|(i, _)| {
                    let span = Span::new(i as u32, i as u32 + 1);
                    ctx.report(span, "tab")
                        .with_edits(vec![TextEdit::replace_span(span, "  ")])
                })
                .collect())
        }
    }

    fn process(path: &Path, fix: bool, options: WriteOptions) -> Result<PipelineResult, LinterError> {
        let parser = MarkdownParser::new();
        let rules = vec![ResolvedRule::with_defaults(Arc::new(NoTabs))];
        let pipeline = FixPipeline::new(
            &parser,
            &rules,
            PipelineOptions {
                fix,
                ..Default::default()
            },
        );
        process_file(path, &pipeline, &options, &CancellationToken::new())
    }

    #[test]
    fn backup_path_appends_suffix() {
        assert_eq!(backup_path(Path::new("docs/a.md")), PathBuf::from("docs/a.md.bak"));
    }

    #[test]
    fn fix_writes_file_and_backup() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.md");
        fs::write(&path, "a\tb\n").unwrap();

        let result = process(&path, true, WriteOptions::default()).unwrap();

        assert!(result.written);
        assert_eq!(fs::read_to_string(&path).unwrap(), "a  b\n");
        assert_eq!(fs::read_to_string(backup_path(&path)).unwrap(), "a\tb\n");
    }

    #[test]
    fn no_backup_when_disabled() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.md");
        fs::write(&path, "\tx\n").unwrap();

        let options = WriteOptions {
            backup: false,
            ..Default::default()
        };
        process(&path, true, options).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "  x\n");
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn dry_run_touches_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.md");
        fs::write(&path, "\tx\n").unwrap();

        let options = WriteOptions {
            dry_run: true,
            ..Default::default()
        };
        let result = process(&path, true, options).unwrap();

        assert!(result.changed);
        assert!(!result.written);
        assert_eq!(result.final_content, "  x\n");
        assert_eq!(fs::read_to_string(&path).unwrap(), "\tx\n");
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn failed_backup_blocks_write() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.md");
        fs::write(&path, "\tx\n").unwrap();
        // A directory where the backup file should go makes the backup fail.
        fs::create_dir(backup_path(&path)).unwrap();

        let err = process(&path, true, WriteOptions::default()).unwrap_err();

        assert!(matches!(err, LinterError::Backup { .. }));
        assert_eq!(fs::read_to_string(&path).unwrap(), "\tx\n");
    }

    #[test]
    fn lint_only_never_writes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a.md");
        fs::write(&path, "\tx\n").unwrap();

        let result = process(&path, false, WriteOptions::default()).unwrap();

        assert_eq!(result.diagnostics.len(), 1);
        assert!(!result.written);
        assert!(!backup_path(&path).exists());
    }

    #[test]
    fn oversized_file_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("big.md");
        fs::write(&path, "0123456789").unwrap();

        let options = WriteOptions {
            max_file_size: 4,
            ..Default::default()
        };
        let err = process(&path, false, options).unwrap_err();
        assert!(err.to_string().contains("exceeds limit"));
    }

    #[test]
    fn directory_is_not_a_regular_file() {
        let dir = tempdir().unwrap();
        let err = process(dir.path(), false, WriteOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Not a regular file"));
    }

    #[test]
    fn missing_file_fails() {
        let dir = tempdir().unwrap();
        let err = process(&dir.path().join("nope.md"), false, WriteOptions::default()).unwrap_err();
        assert!(err.to_string().contains("Failed to read metadata"));
    }
}
