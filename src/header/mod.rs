//! # Header Module
//!
//! Rendering, detection and application of license header blocks.
//!
//! - [`HeaderRenderer`] turns a [`HeaderConfig`] into one [`RenderedHeader`]
//!   per comment family
//! - [`detect`] finds an existing header block at the top of a file
//! - [`HeaderApplier`] decides per file whether to skip, insert or replace a
//!   header and rewrites the file
//!
//! ## Example
//!
//! ```rust
//! use devtools::header::HeaderRenderer;
//! use devtools::registry::ExtensionRegistry;
//! use devtools::templates::HeaderConfig;
//!
//! let config = HeaderConfig {
//!   title: "MIT License".to_string(),
//!   spdx_id: "MIT".to_string(),
//!   ..HeaderConfig::default()
//! };
//!
//! let headers = HeaderRenderer::new(&config).render_all(&ExtensionRegistry::builtin());
//! let star = headers.iter().find(|h| h.family() == "star").expect("star family");
//! assert!(star.text().starts_with("/*\n *   MIT License\n"));
//! assert!(star.text().ends_with(" */\n\n"));
//! ```

mod applier;
pub mod detect;

use std::path::PathBuf;

pub use applier::{ApplyOutcome, HeaderApplier, HeaderPlan, stamp};
pub use detect::{HeaderBlock, SymbolForm};

use crate::registry::CommentFamily;
use crate::symbols::CommentSymbols;
use crate::templates::{HeaderConfig, HeaderTemplate};

/// Errors raised while applying a header to a file.
#[derive(Debug, thiserror::Error)]
pub enum HeaderError {
  /// The path does not resolve to an existing regular file.
  #[error("File not found: {}", path.display())]
  FileNotFound { path: PathBuf },

  /// Reading or writing the file failed.
  #[error("I/O error on '{}': {source}", path.display())]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },
}

/// Header text rendered for one comment family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedHeader {
  family: String,
  symbols: CommentSymbols,
  extensions: Vec<String>,
  text: String,
  alias_text: Option<String>,
}

impl RenderedHeader {
  /// Name of the comment family this header was rendered for.
  pub fn family(&self) -> &str {
    &self.family
  }

  /// Symbols of the family, with the alias selection off.
  pub const fn symbols(&self) -> &CommentSymbols {
    &self.symbols
  }

  pub fn extensions(&self) -> &[String] {
    &self.extensions
  }

  /// The primary rendering. Always ends with the closing symbol and a blank
  /// line.
  pub fn text(&self) -> &str {
    &self.text
  }

  /// The rendering using the family's alias symbols, if it has any.
  pub fn alias_text(&self) -> Option<&str> {
    self.alias_text.as_deref()
  }

  /// The rendering matching a detected symbol form.
  pub fn text_for(&self, form: SymbolForm) -> Option<&str> {
    match form {
      SymbolForm::Primary => Some(self.text()),
      SymbolForm::Alias => self.alias_text(),
    }
  }
}

/// Builds [`RenderedHeader`]s from a [`HeaderConfig`].
///
/// Rendering is pure: the renderer holds the substituted template lines and
/// only wraps them in comment symbols per family.
#[derive(Debug, Clone)]
pub struct HeaderRenderer {
  lines: Vec<String>,
  indent: String,
}

impl HeaderRenderer {
  pub fn new(config: &HeaderConfig) -> Self {
    Self {
      lines: HeaderTemplate::for_config(config).render_lines(config),
      indent: config.indent(),
    }
  }

  /// Renders the header for a single family.
  pub fn render(&self, family: &CommentFamily) -> RenderedHeader {
    let symbols = family.symbols.with_alias(false);
    let text = self.wrap(&symbols);
    let alias_text = symbols.has_alias().then(|| self.wrap(&symbols.with_alias(true)));

    RenderedHeader {
      family: family.name.clone(),
      symbols,
      extensions: family.extensions.clone(),
      text,
      alias_text,
    }
  }

  /// Renders one header per family in `registry`, in registration order.
  pub fn render_all(&self, registry: &crate::registry::ExtensionRegistry) -> Vec<RenderedHeader> {
    registry.families().iter().map(|family| self.render(family)).collect()
  }

  fn wrap(&self, symbols: &CommentSymbols) -> String {
    let mut text = String::new();
    text.push_str(symbols.first());
    text.push('\n');

    for line in &self.lines {
      let row = format!("{}{}{}", symbols.middle(), self.indent, line);
      text.push_str(row.trim_end());
      text.push('\n');
    }

    text.push_str(symbols.last());
    text.push_str("\n\n");
    text
  }
}
