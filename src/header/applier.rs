use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use tracing::{debug, trace};

use super::detect::detect;
use super::{HeaderError, HeaderRenderer, RenderedHeader};
use crate::processor::FileIO;
use crate::registry::{ExtensionRegistry, RegistryError};
use crate::templates::HeaderConfig;

/// Result of applying a header to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
  /// The file was (or would be) rewritten.
  Applied,
  /// The file already carries the rendered header.
  Skipped,
  /// No comment family is registered for the file's extension.
  Unsupported,
}

impl fmt::Display for ApplyOutcome {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Applied => write!(f, "applied"),
      Self::Skipped => write!(f, "skipped"),
      Self::Unsupported => write!(f, "unsupported"),
    }
  }
}

/// The decision for one file, computed without touching the file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderPlan {
  pub outcome: ApplyOutcome,
  /// File content as read; `None` for unsupported files.
  pub original: Option<String>,
  /// New content; present only when the outcome is [`ApplyOutcome::Applied`].
  pub updated: Option<String>,
}

impl HeaderPlan {
  const fn unsupported() -> Self {
    Self {
      outcome: ApplyOutcome::Unsupported,
      original: None,
      updated: None,
    }
  }
}

/// Applies rendered headers to files, routed by extension.
///
/// The applier holds no mutable state, so one instance can be shared across
/// threads applying headers to different files.
#[derive(Debug, Clone)]
pub struct HeaderApplier {
  headers: Vec<RenderedHeader>,
  by_extension: HashMap<String, usize>,
}

impl HeaderApplier {
  /// Renders `config` for every family in `registry`.
  ///
  /// An [`ExtensionRegistry`] never holds an extension twice, so the
  /// rendered headers index cleanly.
  pub fn new(config: &HeaderConfig, registry: &ExtensionRegistry) -> Self {
    let headers = HeaderRenderer::new(config).render_all(registry);
    Self::from_rendered(headers).expect("registry extensions must be unique")
  }

  /// Builds an applier from already rendered headers.
  ///
  /// # Errors
  ///
  /// Returns [`RegistryError::DuplicateExtension`] if two headers claim the
  /// same extension.
  pub fn from_rendered(headers: Vec<RenderedHeader>) -> Result<Self, RegistryError> {
    let by_extension = index_extensions(&headers)?;
    Ok(Self { headers, by_extension })
  }

  pub fn headers(&self) -> &[RenderedHeader] {
    &self.headers
  }

  /// The header that applies to `path`, selected by its extension.
  pub fn header_for(&self, path: &Path) -> Option<&RenderedHeader> {
    let extension = path.extension()?.to_str()?;
    self.by_extension.get(extension).map(|&index| &self.headers[index])
  }

  /// Computes what [`apply`](Self::apply) would do, without writing.
  ///
  /// # Errors
  ///
  /// - [`HeaderError::FileNotFound`] if the extension is supported but `path`
  ///   is not an existing regular file
  /// - [`HeaderError::Io`] if the file cannot be read as UTF-8 text
  pub fn plan(&self, path: &Path) -> Result<HeaderPlan, HeaderError> {
    let Some(header) = self.header_for(path) else {
      trace!("No comment family for {}", path.display());
      return Ok(HeaderPlan::unsupported());
    };

    if !path.is_file() {
      return Err(HeaderError::FileNotFound {
        path: path.to_path_buf(),
      });
    }

    let original = FileIO::read_full_content(path)?;
    let updated = stamp(&original, header);
    let outcome = if updated.is_some() {
      ApplyOutcome::Applied
    } else {
      ApplyOutcome::Skipped
    };

    debug!("{} {} using the {} family", outcome, path.display(), header.family());

    Ok(HeaderPlan {
      outcome,
      original: Some(original),
      updated,
    })
  }

  /// Applies the header to `path`, rewriting it unless it is already
  /// up to date.
  ///
  /// # Errors
  ///
  /// See [`plan`](Self::plan); write failures surface as
  /// [`HeaderError::Io`].
  pub fn apply(&self, path: &Path) -> Result<ApplyOutcome, HeaderError> {
    let plan = self.plan(path)?;
    if let Some(updated) = &plan.updated {
      FileIO::write_file(path, updated)?;
    }
    Ok(plan.outcome)
  }
}

fn index_extensions(headers: &[RenderedHeader]) -> Result<HashMap<String, usize>, RegistryError> {
  let mut by_extension: HashMap<String, usize> = HashMap::new();
  for (index, header) in headers.iter().enumerate() {
    for extension in header.extensions() {
      if let Some(&existing) = by_extension.get(extension)
        && existing != index
      {
        return Err(RegistryError::DuplicateExtension {
          extension: extension.clone(),
          existing: headers[existing].family().to_string(),
          duplicate: header.family().to_string(),
        });
      }
      by_extension.insert(extension.clone(), index);
    }
  }
  Ok(by_extension)
}

/// Returns `content` with `header` stamped at the top, or `None` when the
/// existing header already matches.
///
/// A leading shebang line stays first. An existing header block, in either
/// symbol form, is replaced by the primary rendering. Leading blank lines of
/// the remaining body are dropped. CRLF content keeps CRLF line endings.
pub fn stamp(content: &str, header: &RenderedHeader) -> Option<String> {
  let newline = if content.contains("\r\n") { "\r\n" } else { "\n" };
  let lines: Vec<&str> = content.lines().collect();

  let (shebang, rest) = match lines.split_first() {
    Some((first, rest)) if first.starts_with("#!") => (Some(*first), rest),
    _ => (None, lines.as_slice()),
  };

  let mut body = rest;
  if let Some(block) = detect(rest, header.symbols()) {
    let existing = rest[block.lines.clone()].join("\n");
    if header
      .text_for(block.form)
      .is_some_and(|expected| existing.trim() == expected.trim())
    {
      return None;
    }
    body = &rest[block.lines.end..];
  }

  let first_content = body.iter().position(|line| !line.trim().is_empty()).unwrap_or(body.len());
  let body = &body[first_content..];

  let mut output = String::with_capacity(content.len() + header.text().len());
  if let Some(shebang) = shebang {
    output.push_str(shebang);
    output.push_str(newline);
  }

  let header_text = if body.is_empty() {
    header.text().trim_end()
  } else {
    header.text()
  };
  for line in header_text.lines() {
    output.push_str(line);
    output.push_str(newline);
  }

  for line in body {
    output.push_str(line);
    output.push_str(newline);
  }

  Some(output)
}
