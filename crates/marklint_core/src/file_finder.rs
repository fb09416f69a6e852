use std::path::{Path, PathBuf};

use globset::{Glob, GlobBuilder, GlobSet, GlobSetBuilder};
use tracing::info;
use walkdir::{DirEntry, WalkDir};

use crate::error::LinterError;

/// Extensions picked up when walking a directory.
pub const DEFAULT_EXTENSIONS: &[&str] = &["md", "markdown"];

pub struct FileFinder {
    include_globs: Option<GlobSet>,
    exclude_globs: Option<GlobSet>,
    extensions: Vec<String>,
}

impl FileFinder {
    pub fn new(include: &[String], exclude: &[String]) -> Result<Self, LinterError> {
        let include_globs = Self::build_globset(include)?;
        let exclude_globs = Self::build_globset(exclude)?;

        Ok(Self {
            include_globs,
            exclude_globs,
            extensions: DEFAULT_EXTENSIONS.iter().map(|e| e.to_string()).collect(),
        })
    }

    /// Replaces the extensions used when walking directories.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extensions = extensions.into_iter().map(Into::into).collect();
        self
    }

    fn build_globset(patterns: &[String]) -> Result<Option<GlobSet>, LinterError> {
        if patterns.is_empty() {
            return Ok(None);
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = compile_glob(pattern)
                .map_err(|e| LinterError::config(format!("Invalid glob pattern: {}", e)))?;
            builder.add(glob);
        }

        let globset = builder
            .build()
            .map_err(|e| LinterError::config(format!("Failed to build globset: {}", e)))?;

        Ok(Some(globset))
    }

    /// Checks if a file path should be ignored based on include/exclude patterns.
    pub fn should_ignore(&self, path: &Path) -> bool {
        if self
            .exclude_globs
            .as_ref()
            .is_some_and(|excludes| excludes.is_match(path))
        {
            return true;
        }

        if self
            .include_globs
            .as_ref()
            .is_some_and(|includes| !includes.is_match(path))
        {
            return true;
        }

        false
    }

    fn has_markdown_extension(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|e| e.eq_ignore_ascii_case(ext)))
    }

    /// Expands CLI patterns into a sorted, de-duplicated file list.
    ///
    /// A pattern naming a file is taken as is, a directory is walked for
    /// Markdown files, anything else is a glob matched against paths
    /// relative to `base_dir`. Hidden directories are not entered.
    pub fn discover_files(
        &self,
        patterns: &[String],
        base_dir: &Path,
    ) -> Result<Vec<PathBuf>, LinterError> {
        let mut files = Vec::new();

        let mut glob_builder = GlobSetBuilder::new();
        let mut has_globs = false;

        for pattern in patterns {
            let path = Path::new(pattern);
            let resolved = base_dir.join(path);
            if resolved.is_file() {
                if !self.should_ignore(path) {
                    files.push(output_path(base_dir, path));
                }
            } else if resolved.is_dir() {
                for entry in walk(&resolved) {
                    let rel = entry.path().strip_prefix(base_dir).unwrap_or(entry.path());
                    if self.has_markdown_extension(rel) && !self.should_ignore(rel) {
                        files.push(output_path(base_dir, rel));
                    }
                }
            } else {
                let glob = compile_glob(pattern).map_err(|e| {
                    LinterError::config(format!("Invalid pattern '{}': {}", pattern, e))
                })?;
                glob_builder.add(glob);
                has_globs = true;
            }
        }

        if has_globs {
            let glob_set = glob_builder
                .build()
                .map_err(|e| LinterError::config(format!("Failed to build globset: {}", e)))?;

            for entry in walk(base_dir) {
                let rel = entry.path().strip_prefix(base_dir).unwrap_or(entry.path());
                if glob_set.is_match(rel) && !self.should_ignore(rel) {
                    files.push(output_path(base_dir, rel));
                }
            }
        }

        files.sort();
        files.dedup();

        info!("Discovered {} files to lint", files.len());
        Ok(files)
    }
}

/// `*` and `?` stop at `/`; only `**` crosses directories.
fn compile_glob(pattern: &str) -> Result<Glob, globset::Error> {
    GlobBuilder::new(pattern).literal_separator(true).build()
}

fn walk(root: &Path) -> impl Iterator<Item = DirEntry> {
    WalkDir::new(root)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_str().is_some_and(|s| s.starts_with('.'))
}

fn output_path(base_dir: &Path, rel: &Path) -> PathBuf {
    if base_dir == Path::new(".") || rel.is_absolute() {
        rel.to_path_buf()
    } else {
        base_dir.join(rel)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn names(files: &[PathBuf], base: &Path) -> Vec<String> {
        files
            .iter()
            .map(|f| {
                f.strip_prefix(base)
                    .unwrap_or(f)
                    .to_string_lossy()
                    .replace('\\', "/")
            })
            .collect()
    }

    fn setup() -> tempfile::TempDir {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("docs/guide")).unwrap();
        fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
        fs::create_dir_all(root.join(".git")).unwrap();
        fs::write(root.join("README.md"), "# R\n").unwrap();
        fs::write(root.join("notes.txt"), "n\n").unwrap();
        fs::write(root.join("docs/intro.markdown"), "# I\n").unwrap();
        fs::write(root.join("docs/guide/setup.md"), "# S\n").unwrap();
        fs::write(root.join("node_modules/pkg/readme.md"), "# P\n").unwrap();
        fs::write(root.join(".git/HEAD.md"), "x\n").unwrap();
        dir
    }

    #[test]
    fn test_build_globset() {
        let patterns = vec!["**/*.md".to_string(), "*.txt".to_string()];
        let result = FileFinder::build_globset(&patterns).unwrap();
        assert!(result.is_some());
        assert!(FileFinder::build_globset(&[]).unwrap().is_none());
    }

    #[test]
    fn test_build_globset_invalid_pattern() {
        let patterns = vec!["[invalid".to_string()];
        assert!(FileFinder::build_globset(&patterns).is_err());
    }

    #[test]
    fn test_directory_pattern_walks_markdown_files() {
        let dir = setup();
        let finder = FileFinder::new(&[], &["node_modules/**".to_string()]).unwrap();

        let files = finder.discover_files(&[".".to_string()], dir.path()).unwrap();

        assert_eq!(
            names(&files, dir.path()),
            vec!["README.md", "docs/guide/setup.md", "docs/intro.markdown"]
        );
    }

    #[test]
    fn test_glob_pattern_is_relative_to_base() {
        let dir = setup();
        let finder = FileFinder::new(&[], &[]).unwrap();

        let files = finder
            .discover_files(&["docs/**/*.md".to_string()], dir.path())
            .unwrap();

        assert_eq!(names(&files, dir.path()), vec!["docs/guide/setup.md"]);
    }

    #[test]
    fn test_explicit_file_and_dedup() {
        let dir = setup();
        let finder = FileFinder::new(&[], &[]).unwrap();

        let files = finder
            .discover_files(
                &["README.md".to_string(), "*.md".to_string()],
                dir.path(),
            )
            .unwrap();

        assert_eq!(names(&files, dir.path()), vec!["README.md"]);
    }

    #[test]
    fn test_single_star_stays_in_one_directory() {
        let dir = setup();
        let finder = FileFinder::new(&[], &[]).unwrap();

        let files = finder
            .discover_files(&["docs/*.md".to_string()], dir.path())
            .unwrap();
        assert!(files.is_empty());

        let files = finder
            .discover_files(&["docs/*/*.md".to_string()], dir.path())
            .unwrap();
        assert_eq!(names(&files, dir.path()), vec!["docs/guide/setup.md"]);
    }

    #[test]
    fn test_exclude_single_star_only_matches_top_level() {
        let dir = setup();
        let finder = FileFinder::new(
            &[],
            &["*.md".to_string(), "node_modules/**".to_string()],
        )
        .unwrap();

        let files = finder.discover_files(&[".".to_string()], dir.path()).unwrap();

        assert_eq!(
            names(&files, dir.path()),
            vec!["docs/guide/setup.md", "docs/intro.markdown"]
        );
    }

    #[test]
    fn test_include_filter() {
        let dir = setup();
        let finder = FileFinder::new(&["docs/**".to_string()], &[]).unwrap();

        let files = finder.discover_files(&[".".to_string()], dir.path()).unwrap();

        assert_eq!(
            names(&files, dir.path()),
            vec!["docs/guide/setup.md", "docs/intro.markdown"]
        );
    }

    #[test]
    fn test_custom_extensions() {
        let dir = setup();
        let finder = FileFinder::new(&[], &["node_modules/**".to_string()])
            .unwrap()
            .with_extensions(["txt"]);

        let files = finder.discover_files(&[".".to_string()], dir.path()).unwrap();
        assert_eq!(names(&files, dir.path()), vec!["notes.txt"]);
    }
}
