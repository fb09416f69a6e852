//! Bounded-concurrency processing of many files.
//!
//! Files fan out over a rayon pool of `jobs` threads; each worker sends
//! `(index, outcome)` back over a channel and the runner puts results back
//! in input order once every file is done, so the report does not depend on
//! the number of workers or on scheduling.

use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

use crossbeam_channel::unbounded;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::cancel::CancellationToken;
use crate::error::LinterError;
use crate::file_processor::{WriteOptions, process_file};
use crate::pipeline::{FixPipeline, PipelineResult};

/// Result of one file.
#[derive(Debug)]
pub enum FileOutcome {
    Completed(PipelineResult),
    Failed(LinterError),
}

impl FileOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, FileOutcome::Failed(_))
    }

    pub fn result(&self) -> Option<&PipelineResult> {
        match self {
            FileOutcome::Completed(result) => Some(result),
            FileOutcome::Failed(_) => None,
        }
    }

    pub fn error(&self) -> Option<&LinterError> {
        match self {
            FileOutcome::Completed(_) => None,
            FileOutcome::Failed(error) => Some(error),
        }
    }
}

/// One input file and what happened to it.
#[derive(Debug)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: FileOutcome,
}

/// All outcomes of a run, in input order.
#[derive(Debug, Default)]
pub struct RunReport {
    pub files: Vec<FileReport>,
    /// The run was cancelled before every file completed.
    pub cancelled: bool,
}

impl RunReport {
    pub fn completed(&self) -> impl Iterator<Item = &PipelineResult> {
        self.files.iter().filter_map(|f| f.outcome.result())
    }

    pub fn failures(&self) -> impl Iterator<Item = (&Path, &LinterError)> {
        self.files
            .iter()
            .filter_map(|f| f.outcome.error().map(|e| (f.path.as_path(), e)))
    }

    pub fn failed_count(&self) -> usize {
        self.failures().count()
    }

    /// Error-severity diagnostics left in completed files.
    pub fn error_count(&self) -> usize {
        self.completed().map(PipelineResult::error_count).sum()
    }

    pub fn warning_count(&self) -> usize {
        self.completed().map(PipelineResult::warning_count).sum()
    }

    pub fn fixes_applied(&self) -> usize {
        self.completed().map(|r| r.fixes_applied).sum()
    }

    /// True if any file failed, errors remain, or the run was cancelled.
    pub fn is_failure(&self) -> bool {
        self.cancelled || self.failed_count() > 0 || self.error_count() > 0
    }
}

/// Number of workers used when none is configured.
pub fn default_jobs() -> usize {
    std::thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

/// Runs the per-file job over many paths on a fixed-size pool.
pub struct Runner<'r> {
    pipeline: FixPipeline<'r>,
    write: WriteOptions,
    jobs: usize,
}

impl<'r> Runner<'r> {
    pub fn new(pipeline: FixPipeline<'r>, write: WriteOptions, jobs: Option<usize>) -> Self {
        Self {
            pipeline,
            write,
            jobs: jobs.unwrap_or_else(default_jobs).max(1),
        }
    }

    pub fn jobs(&self) -> usize {
        self.jobs
    }

    /// Processes every path and returns outcomes in input order.
    ///
    /// Only building the thread pool can fail; per-file problems become
    /// [`FileOutcome::Failed`]. Once `cancel` fires, files that have not
    /// started yet are reported as cancelled without being read.
    pub fn run(
        &self,
        paths: &[PathBuf],
        cancel: &CancellationToken,
    ) -> Result<RunReport, LinterError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.jobs)
            .thread_name(|i| format!("marklint-worker-{i}"))
            .build()
            .map_err(|e| LinterError::internal(format!("Failed to build thread pool: {}", e)))?;

        debug!("Processing {} file(s) on {} worker(s)", paths.len(), self.jobs);

        let (tx, rx) = unbounded::<(usize, FileOutcome)>();
        pool.install(|| {
            paths
                .par_iter()
                .enumerate()
                .for_each_with(tx, |tx, (index, path)| {
                    let outcome = self.process_one(path, cancel);
                    // The receiver outlives the pool, so sending cannot fail.
                    let _ = tx.send((index, outcome));
                });
        });

        let mut outcomes: Vec<(usize, FileOutcome)> = rx.iter().collect();
        outcomes.sort_by_key(|(index, _)| *index);

        let files: Vec<FileReport> = outcomes
            .into_iter()
            .map(|(index, outcome)| FileReport {
                path: paths[index].clone(),
                outcome,
            })
            .collect();

        let report = RunReport {
            cancelled: cancel.is_cancelled()
                || files
                    .iter()
                    .any(|f| f.outcome.error().is_some_and(LinterError::is_cancelled)),
            files,
        };

        info!(
            "Processed {} file(s): {} failed, {} fix(es) applied",
            report.files.len(),
            report.failed_count(),
            report.fixes_applied()
        );

        Ok(report)
    }

    fn process_one(&self, path: &Path, cancel: &CancellationToken) -> FileOutcome {
        if cancel.is_cancelled() {
            return FileOutcome::Failed(LinterError::Cancelled);
        }

        match process_file(path, &self.pipeline, &self.write, cancel) {
            Ok(result) => FileOutcome::Completed(result),
            Err(error) => {
                if !error.is_cancelled() {
                    warn!("Failed to process {}: {}", path.display(), error);
                }
                FileOutcome::Failed(error)
            }
        }
    }
}
