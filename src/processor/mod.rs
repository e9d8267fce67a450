//! # Processor Module
//!
//! This module runs the header applier over a resolved list of files and
//! collects one [`FileReport`] per file.
//!
//! The module is organized into two submodules:
//! - [`file_io`] - File reading and writing operations
//! - [`file_collector`] - Include/exclude resolution and directory traversal
//!
//! Processing is best-effort: a file that cannot be read or written is
//! reported as failed and the run continues with the remaining files.

mod file_collector;
mod file_io;

use std::path::{Path, PathBuf};

pub use file_collector::{FileCollector, PatternMatcher, normalize_path};
pub use file_io::FileIO;
use rayon::prelude::*;
use tracing::{debug, warn};

use crate::diff::DiffManager;
use crate::header::{ApplyOutcome, HeaderApplier, HeaderError};
use crate::report::{FileReport, ProcessingSummary};
use crate::verbose_log;

/// Result of a bulk run.
#[derive(Debug, Clone)]
pub struct ProcessingResult {
  pub reports: Vec<FileReport>,
  pub summary: ProcessingSummary,
}

/// Processor for applying license headers to many files.
///
/// The `Processor` is responsible for:
/// - Applying headers to files in parallel batches
/// - Computing plans only, and showing diffs, in dry run mode
/// - Collecting report data about processed files
pub struct Processor {
  applier: HeaderApplier,

  /// Whether to only compute changes without writing files
  dry_run: bool,

  /// Manager for rendering diffs in dry run mode
  diff_manager: DiffManager,
}

impl Processor {
  /// Number of files handed to one rayon task.
  const BATCH_SIZE: usize = 32;

  pub const fn new(applier: HeaderApplier) -> Self {
    Self {
      applier,
      dry_run: false,
      diff_manager: DiffManager::new(false),
    }
  }

  /// Only plan changes; no file is written.
  pub const fn with_dry_run(mut self, dry_run: bool) -> Self {
    self.dry_run = dry_run;
    self
  }

  pub const fn with_diff_manager(mut self, diff_manager: DiffManager) -> Self {
    self.diff_manager = diff_manager;
    self
  }

  pub const fn applier(&self) -> &HeaderApplier {
    &self.applier
  }

  /// Processes every file and returns the per-file reports in input order
  /// together with the aggregate summary.
  pub fn process(&self, files: &[PathBuf]) -> ProcessingResult {
    let process_start = std::time::Instant::now();
    debug!("Processing {} files with rayon", files.len());

    let reports: Vec<FileReport> = files
      .par_chunks(Self::BATCH_SIZE)
      .flat_map_iter(|batch| batch.iter().map(|path| self.process_file(path)))
      .collect();

    let summary = ProcessingSummary::from_reports(&reports, process_start.elapsed());
    debug!(
      "Processed {} files in {}ms",
      summary.total_files,
      summary.processing_time.as_millis()
    );

    ProcessingResult { reports, summary }
  }

  /// Processes a single file, turning errors into a failed report.
  pub fn process_file(&self, path: &Path) -> FileReport {
    match self.apply_one(path) {
      Ok(outcome) => {
        if outcome == ApplyOutcome::Applied {
          verbose_log!("Applied header to: {}", path.display());
        }
        FileReport::from_outcome(path, outcome)
      }
      Err(e) => {
        warn!("Failed to process {}: {}", path.display(), e);
        FileReport::failed(path, e)
      }
    }
  }

  fn apply_one(&self, path: &Path) -> Result<ApplyOutcome, HeaderError> {
    if !self.dry_run {
      return self.applier.apply(path);
    }

    let plan = self.applier.plan(path)?;
    if let (Some(original), Some(updated)) = (&plan.original, &plan.updated) {
      self.diff_manager.display_diff(path, original, updated);
    }
    Ok(plan.outcome)
  }
}

#[cfg(test)]
mod tests {
  use std::fs;

  use super::*;
  use crate::registry::ExtensionRegistry;
  use crate::report::FileAction;
  use crate::templates::HeaderConfig;

  fn processor() -> Processor {
    let config = HeaderConfig {
      title: "MIT License".to_string(),
      year: "2024".to_string(),
      holder: "Acme Corp".to_string(),
      spdx_id: "MIT".to_string(),
      ..HeaderConfig::default()
    };
    Processor::new(HeaderApplier::new(&config, &ExtensionRegistry::builtin()))
  }

  #[test]
  fn test_process_counts_each_outcome() {
    let dir = tempfile::tempdir().expect("temp dir");
    let py = dir.path().join("a.py");
    let js = dir.path().join("b.js");
    let txt = dir.path().join("c.txt");
    let bad = dir.path().join("d.py");
    fs::write(&py, "print(1)\n").expect("write");
    fs::write(&js, "").expect("write");
    fs::write(&txt, "notes\n").expect("write");
    fs::write(&bad, [0xffu8, 0xfe]).expect("write");

    let processor = processor();
    let files = vec![py.clone(), js, txt, bad.clone()];
    let first = processor.process(&files);
    assert_eq!(first.summary.applied, 2);
    assert_eq!(first.summary.unsupported, 1);
    assert_eq!(first.summary.failed, 1);
    assert_eq!(first.reports[3].path, bad);
    assert_eq!(first.reports[3].action, FileAction::Failed);

    let second = processor.process(&files);
    assert_eq!(second.summary.applied, 0);
    assert_eq!(second.summary.skipped, 2);
    assert_eq!(second.summary.failed, 1);
    assert!(fs::read_to_string(&py).expect("read").starts_with("#\n#   MIT License\n"));
  }

  #[test]
  fn test_dry_run_does_not_write() {
    let dir = tempfile::tempdir().expect("temp dir");
    let py = dir.path().join("a.py");
    fs::write(&py, "print(1)\n").expect("write");

    let result = processor().with_dry_run(true).process(std::slice::from_ref(&py));
    assert_eq!(result.summary.applied, 1);
    assert_eq!(fs::read_to_string(&py).expect("read"), "print(1)\n");
  }

  #[test]
  fn test_missing_file_is_failed() {
    let dir = tempfile::tempdir().expect("temp dir");
    let report = processor().process_file(&dir.path().join("gone.py"));
    assert_eq!(report.action, FileAction::Failed);
    assert!(report.error.as_deref().is_some_and(|e| e.contains("File not found")));
  }

  #[test]
  fn test_reports_keep_input_order() {
    let dir = tempfile::tempdir().expect("temp dir");
    let files: Vec<PathBuf> = (0..100).map(|i| dir.path().join(format!("f{i}.txt"))).collect();
    let result = processor().process(&files);
    let paths: Vec<&PathBuf> = result.reports.iter().map(|r| &r.path).collect();
    assert_eq!(paths, files.iter().collect::<Vec<_>>());
  }
}
