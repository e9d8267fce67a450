//! # Output Module
//!
//! This module centralizes all user-facing output of the devtools CLI.
//! It provides consistent formatting, colors, and symbols for terminal output.
//!
//! - **Progressive**: more detail with `-v`, silence with `-q`
//! - **Scriptable**: failures and paths in quiet mode stay plain text

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::{OwoColorize, Stream};

use crate::licenses::{LicenseListEntry, PROPRIETARY_ID, PROPRIETARY_TITLE};
use crate::logging::{is_quiet, is_verbose};
use crate::report::{FileAction, FileReport, ProcessingSummary};

/// Symbols used in output
pub mod symbols {
  /// Success
  pub const SUCCESS: &str = "\u{2713}"; // ✓
  /// Failure
  pub const FAILURE: &str = "\u{2717}"; // ✗
}

/// Maximum number of files to show in the default output before truncating
const DEFAULT_FILE_LIST_LIMIT: usize = 20;

/// Print the initial "Processing N files..." message.
pub fn print_start_message(file_count: usize, dry_run: bool) {
  if is_quiet() {
    return;
  }

  let verb = if dry_run { "Checking" } else { "Processing" };
  println!("{} {} {}...", verb, file_count, plural(file_count));
}

/// Print the list of files that got (or would get) a header.
pub fn print_applied_files(files: &[&FileReport], project_root: Option<&Path>, dry_run: bool) {
  if is_quiet() || files.is_empty() {
    return;
  }

  let count = files.len();
  let verb = if dry_run { "Would apply" } else { "Applied" };
  println!(
    "{} {} license header to {} {}:",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    verb,
    count,
    plural(count)
  );

  let show_all = is_verbose();
  let limit = if show_all { count } else { DEFAULT_FILE_LIST_LIMIT };

  for file in files.iter().take(limit) {
    println!("  {}", make_relative_path(&file.path, project_root));
  }

  if !show_all && count > limit {
    let more = format!("... and {} more (use -v to see all)", count - limit);
    println!("  {}", more.if_supports_color(Stream::Stdout, |s| s.dimmed()));
  }
}

/// Print the list of files that failed, with reasons.
///
/// Failures are printed to stderr, even in quiet mode.
pub fn print_failed_files(files: &[&FileReport], project_root: Option<&Path>) {
  if files.is_empty() {
    return;
  }

  let count = files.len();
  eprintln!(
    "{} Failed to process {} {}:",
    symbols::FAILURE.if_supports_color(Stream::Stderr, |s| s.red()),
    count,
    plural(count)
  );

  for file in files {
    let reason = file.error.as_deref().unwrap_or("unknown error");
    eprintln!("  {}: {}", make_relative_path(&file.path, project_root), reason);
  }
}

/// Print the processing summary.
///
/// Format: "Summary: A applied, S skipped, U unsupported, F failed"
/// In verbose mode, also shows timing.
pub fn print_summary(summary: &ProcessingSummary) {
  if is_quiet() {
    return;
  }

  let failed_str = if summary.failed > 0 {
    summary.failed.if_supports_color(Stream::Stdout, |s| s.red()).to_string()
  } else {
    summary.failed.if_supports_color(Stream::Stdout, |s| s.cyan()).to_string()
  };

  let mut summary_line = format!(
    "Summary: {} applied, {} skipped, {} unsupported, {} failed",
    summary.applied.if_supports_color(Stream::Stdout, |s| s.green()),
    summary.skipped.if_supports_color(Stream::Stdout, |s| s.cyan()),
    summary.unsupported.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    failed_str
  );

  if is_verbose() {
    summary_line.push_str(&format!(" ({:.2}s)", summary.processing_time.as_secs_f64()));
  }

  println!("{}", summary_line);
}

/// Print a hint for the user about what to do next.
pub fn print_hint(message: &str) {
  if is_quiet() {
    return;
  }

  println!("{}", message.if_supports_color(Stream::Stdout, |s| s.yellow()));
}

/// Print an error message to stderr.
pub fn print_error(message: &str) {
  eprintln!("{}", message.if_supports_color(Stream::Stderr, |s| s.red()));
}

/// Progress bar for license downloads, drawn on stderr and hidden in quiet mode.
pub fn download_progress(total: usize) -> ProgressBar {
  if is_quiet() {
    return ProgressBar::hidden();
  }

  let bar = ProgressBar::new(total as u64);
  if let Ok(style) =
    ProgressStyle::default_bar().template("{spinner:.green} Downloading licenses [{bar:40.cyan/blue}] {pos}/{len} ({eta})")
  {
    bar.set_style(style.progress_chars("=> "));
  }
  bar
}

/// Print the table of available licenses, proprietary license first.
pub fn print_license_table(entries: &[LicenseListEntry]) {
  for line in license_table_lines(entries) {
    println!("{}", line);
  }
}

/// Lines of the license table: a heading, then index, SPDX id and title.
pub fn license_table_lines(entries: &[LicenseListEntry]) -> Vec<String> {
  let rows: Vec<(&str, &str, &str)> = std::iter::once((PROPRIETARY_ID, "---", PROPRIETARY_TITLE))
    .chain(
      entries
        .iter()
        .map(|e| (e.index_id.as_str(), e.spdx_id.as_str(), e.title.as_str())),
    )
    .collect();

  let id_width = rows.iter().map(|r| r.0.len()).max().unwrap_or(0).max("Index-ID".len());
  let spdx_width = rows.iter().map(|r| r.1.len()).max().unwrap_or(0).max("SPDX-Identifier".len());

  let mut lines = Vec::with_capacity(rows.len() + 2);
  lines.push(format!(
    "{:<id_width$}  {:<spdx_width$}  {}",
    "Index-ID", "SPDX-Identifier", "License Name"
  ));
  lines.push(format!("{}  {}  {}", "-".repeat(id_width), "-".repeat(spdx_width), "-".repeat(12)));
  for (index, spdx_id, title) in rows {
    lines.push(format!("{:<id_width$}  {:<spdx_width$}  {}", index, spdx_id, title));
  }
  lines
}

/// Package metadata shown by `devtools info`, skipping unset fields.
pub fn package_info() -> Vec<(&'static str, String)> {
  [
    ("name", env!("CARGO_PKG_NAME")),
    ("version", env!("CARGO_PKG_VERSION")),
    ("description", env!("CARGO_PKG_DESCRIPTION")),
    ("license", env!("CARGO_PKG_LICENSE")),
    ("authors", env!("CARGO_PKG_AUTHORS")),
    ("repository", env!("CARGO_PKG_REPOSITORY")),
  ]
  .into_iter()
  .filter(|(_, value)| !value.is_empty())
  .map(|(key, value)| {
    // Cargo joins authors with ':'
    let value = if key == "authors" {
      value.split(':').collect::<Vec<_>>().join(", ")
    } else {
      value.to_string()
    };
    (key, value)
  })
  .collect()
}

/// Print the package metadata block.
pub fn print_package_info() {
  println!();
  println!("  {}", "Package Info:".if_supports_color(Stream::Stdout, |s| s.magenta()));
  for (key, value) in package_info() {
    println!(
      "     {}: {}",
      key.if_supports_color(Stream::Stdout, |s| s.cyan()),
      value.if_supports_color(Stream::Stdout, |s| s.yellow())
    );
  }
  println!();
}

/// Split file reports into the groups shown after a run.
pub struct CategorizedReports<'a> {
  pub applied: Vec<&'a FileReport>,
  pub failed: Vec<&'a FileReport>,
}

impl<'a> CategorizedReports<'a> {
  pub fn from_reports(reports: &'a [FileReport]) -> Self {
    let mut applied = Vec::new();
    let mut failed = Vec::new();

    for report in reports {
      match report.action {
        FileAction::Applied => applied.push(report),
        FileAction::Failed => failed.push(report),
        FileAction::Skipped | FileAction::Unsupported => {}
      }
    }

    Self { applied, failed }
  }
}

const fn plural(count: usize) -> &'static str {
  if count == 1 { "file" } else { "files" }
}

/// Make a path relative to the project root for display.
fn make_relative_path(path: &Path, project_root: Option<&Path>) -> String {
  project_root
    .and_then(|root| path.strip_prefix(root).ok())
    .unwrap_or(path)
    .to_string_lossy()
    .to_string()
}
