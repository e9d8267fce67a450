//! # Report Module
//!
//! This module records the outcome of a bulk header run: one [`FileReport`]
//! per file, aggregated into a [`ProcessingSummary`], and optionally written
//! to disk as a JSON report.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use serde::{Deserialize, Serialize};

use crate::header::ApplyOutcome;

/// Information about a processed file for reporting
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileReport {
  /// Path to the file
  #[serde(with = "path_serialization")]
  pub path: PathBuf,
  /// What happened to the file
  pub action: FileAction,
  /// Failure reason, set only for [`FileAction::Failed`]
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub error: Option<String>,
}

impl FileReport {
  pub fn from_outcome(path: &Path, outcome: ApplyOutcome) -> Self {
    Self {
      path: path.to_path_buf(),
      action: outcome.into(),
      error: None,
    }
  }

  pub fn failed(path: &Path, error: impl std::fmt::Display) -> Self {
    Self {
      path: path.to_path_buf(),
      action: FileAction::Failed,
      error: Some(error.to_string()),
    }
  }
}

/// Possible actions taken on a file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileAction {
  /// Header was inserted or replaced (or would be, in a dry run)
  Applied,
  /// File already carried the header
  Skipped,
  /// No comment family for the file's extension
  Unsupported,
  /// Reading or writing the file failed
  Failed,
}

impl From<ApplyOutcome> for FileAction {
  fn from(outcome: ApplyOutcome) -> Self {
    match outcome {
      ApplyOutcome::Applied => Self::Applied,
      ApplyOutcome::Skipped => Self::Skipped,
      ApplyOutcome::Unsupported => Self::Unsupported,
    }
  }
}

/// Helper module for serializing/deserializing PathBuf
mod path_serialization {
  use std::path::PathBuf;

  use serde::{Deserialize, Deserializer, Serializer};

  pub fn serialize<S>(path: &std::path::Path, serializer: S) -> Result<S::Ok, S::Error>
  where
    S: Serializer,
  {
    serializer.serialize_str(&path.to_string_lossy())
  }

  pub fn deserialize<'de, D>(deserializer: D) -> Result<PathBuf, D::Error>
  where
    D: Deserializer<'de>,
  {
    let s = String::deserialize(deserializer)?;
    Ok(PathBuf::from(s))
  }
}

/// Summary of the processing results
#[derive(Debug, Clone, Serialize)]
pub struct ProcessingSummary {
  /// Total number of files processed
  pub total_files: usize,
  pub applied: usize,
  pub skipped: usize,
  pub unsupported: usize,
  pub failed: usize,
  /// Total processing time
  #[serde(skip_serializing)]
  pub processing_time: Duration,
  /// Processing time in seconds for serialization
  #[serde(rename = "processing_time_seconds")]
  pub processing_time_secs: f64,
  /// Timestamp when the summary was created
  #[serde(skip_serializing_if = "Option::is_none")]
  pub timestamp: Option<i64>,
}

impl ProcessingSummary {
  /// Create a new ProcessingSummary initialized to zero
  pub fn new(processing_time: Duration) -> Self {
    Self {
      total_files: 0,
      applied: 0,
      skipped: 0,
      unsupported: 0,
      failed: 0,
      processing_time,
      processing_time_secs: processing_time.as_secs_f64(),
      timestamp: Some(Local::now().timestamp()),
    }
  }

  /// Create a ProcessingSummary from a collection of FileReports
  pub fn from_reports(files: &[FileReport], processing_time: Duration) -> Self {
    let mut summary = Self::new(processing_time);
    summary.total_files = files.len();

    for file in files {
      match file.action {
        FileAction::Applied => summary.applied += 1,
        FileAction::Skipped => summary.skipped += 1,
        FileAction::Unsupported => summary.unsupported += 1,
        FileAction::Failed => summary.failed += 1,
      }
    }

    summary
  }

  pub const fn has_failures(&self) -> bool {
    self.failed > 0
  }
}

/// Writes `{ "summary": {...}, "files": [...] }` to a JSON file.
pub struct ReportGenerator<'a> {
  output_path: &'a Path,
}

impl<'a> ReportGenerator<'a> {
  pub const fn new(output_path: &'a Path) -> Self {
    Self { output_path }
  }

  /// Generate the report and write it to the output path.
  pub fn generate(&self, files: &[FileReport], summary: &ProcessingSummary) -> Result<()> {
    let content = Self::render(files, summary)?;
    fs::write(self.output_path, content)
      .with_context(|| format!("Failed to write report to {}", self.output_path.display()))
  }

  /// Render the report as pretty-printed JSON.
  pub fn render(files: &[FileReport], summary: &ProcessingSummary) -> Result<String> {
    let report = serde_json::json!({
      "summary": summary,
      "files": files,
    });
    serde_json::to_string_pretty(&report).context("Failed to serialize report")
  }
}
