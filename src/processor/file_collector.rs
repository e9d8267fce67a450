//! # File Collector Module
//!
//! This module resolves the include and exclude path lists of a project into
//! the concrete list of files handed to the header applier.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Pattern matcher for excluded paths.
#[derive(Debug, Clone)]
pub enum PatternMatcher {
  /// Matches a root-relative path and everything below it
  Prefix(PathBuf),
  /// Matches root-relative paths using a glob pattern
  Glob(glob::Pattern),
}

impl PatternMatcher {
  /// Builds a matcher from one exclude entry.
  ///
  /// Entries containing glob metacharacters become [`PatternMatcher::Glob`],
  /// everything else a path prefix.
  pub fn parse(pattern: &str) -> Result<Self> {
    let trimmed = pattern.trim_start_matches("./").trim_end_matches('/');
    if trimmed.contains(['*', '?', '[']) {
      let glob = glob::Pattern::new(trimmed).with_context(|| format!("Invalid glob pattern: {}", pattern))?;
      Ok(Self::Glob(glob))
    } else {
      Ok(Self::Prefix(normalize_path(Path::new(trimmed))))
    }
  }

  pub fn matches(&self, relative: &Path) -> bool {
    match self {
      Self::Prefix(prefix) => relative.starts_with(prefix),
      Self::Glob(pattern) => pattern.matches_path(relative),
    }
  }
}

/// File collector for include lists and directory traversal.
///
/// The `FileCollector` handles:
/// - Expanding include entries (files or directories) below the project root
/// - Skipping hidden directories and symlinks
/// - Dropping paths that match an exclude entry
#[derive(Debug, Clone)]
pub struct FileCollector {
  /// Root of the project
  project_root: PathBuf,
  excludes: Vec<PatternMatcher>,
}

impl FileCollector {
  /// Creates a collector rooted at `project_root`.
  ///
  /// # Errors
  ///
  /// Returns an error if an exclude entry is an invalid glob pattern.
  pub fn new(project_root: PathBuf, exclude_paths: &[String]) -> Result<Self> {
    let excludes = exclude_paths
      .iter()
      .map(|pattern| PatternMatcher::parse(pattern))
      .collect::<Result<Vec<_>>>()?;
    Ok(Self { project_root, excludes })
  }

  pub fn project_root(&self) -> &Path {
    &self.project_root
  }

  /// Collects files for the given include entries, sorted and de-duplicated.
  ///
  /// An empty include list means every non-hidden top-level directory of the
  /// project root. Include entries that do not exist are logged and skipped.
  pub fn collect(&self, include_paths: &[String]) -> Result<Vec<PathBuf>> {
    let targets = if include_paths.is_empty() {
      self.default_targets()?
    } else {
      include_paths.iter().map(|path| self.project_root.join(path)).collect()
    };

    let start_time = std::time::Instant::now();
    let mut files = BTreeSet::new();

    for target in targets {
      if target.is_file() {
        if !self.is_excluded(&target) {
          files.insert(target);
        }
      } else if target.is_dir() {
        files.extend(self.traverse_directory(&target));
      } else {
        warn!("Include path does not exist: {}", target.display());
      }
    }

    debug!("Collected {} files in {}ms", files.len(), start_time.elapsed().as_millis());
    Ok(files.into_iter().collect())
  }

  /// Non-hidden directories directly below the project root.
  fn default_targets(&self) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(&self.project_root)
      .with_context(|| format!("Failed to read directory: {}", self.project_root.display()))?;

    let mut targets = Vec::new();
    for entry in entries.flatten() {
      let Ok(file_type) = entry.file_type() else {
        continue;
      };
      if file_type.is_dir() && !is_hidden(&entry.file_name().to_string_lossy()) {
        targets.push(entry.path());
      }
    }
    targets.sort();
    Ok(targets)
  }

  /// Traverses a directory recursively and collects the files not excluded.
  pub fn traverse_directory(&self, dir: &Path) -> Vec<PathBuf> {
    debug!("Scanning directory: {}", dir.display());

    let walker = WalkDir::new(dir).follow_links(false).into_iter().filter_entry(|entry| {
      let hidden = entry.depth() > 0 && entry.file_type().is_dir() && is_hidden(&entry.file_name().to_string_lossy());
      !hidden && !(entry.depth() > 0 && self.is_excluded(entry.path()))
    });

    let mut files = Vec::new();
    for entry in walker {
      match entry {
        Ok(entry) if entry.file_type().is_file() => files.push(entry.into_path()),
        Ok(_) => {}
        Err(e) => warn!("Error walking {}: {}", dir.display(), e),
      }
    }
    files
  }

  /// Whether `path` matches an exclude entry, relative to the project root.
  pub fn is_excluded(&self, path: &Path) -> bool {
    if self.excludes.is_empty() {
      return false;
    }
    let relative = normalize_path(path.strip_prefix(&self.project_root).unwrap_or(path));
    self.excludes.iter().any(|matcher| matcher.matches(&relative))
  }
}

fn is_hidden(name: &str) -> bool {
  name.starts_with('.') && name != "." && name != ".."
}

/// Drops `.` components so `./src/a.py` and `src/a.py` compare equal.
pub fn normalize_path(path: &Path) -> PathBuf {
  path
    .components()
    .filter(|component| !matches!(component, Component::CurDir))
    .collect()
}
