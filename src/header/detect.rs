//! Detection of an existing header block at the top of a file.
//!
//! Detection is line and prefix based only and never fails: a malformed or
//! empty input simply yields no block.

use std::ops::Range;

use crate::symbols::CommentSymbols;

/// Which member of the symbol pairs a detected block was written with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SymbolForm {
  Primary,
  Alias,
}

/// A well-formed header block found in a slice of lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderBlock {
  /// Line range of the block, end exclusive.
  pub lines: Range<usize>,
  pub form: SymbolForm,
}

/// Finds a header block at the top of `lines` (shebang already removed).
///
/// Tries the primary symbols first, then the alias symbols when the family
/// has any.
pub fn detect(lines: &[&str], symbols: &CommentSymbols) -> Option<HeaderBlock> {
  let primary = symbols.with_alias(false);
  if let Some(range) = find_block(lines, &primary) {
    return Some(HeaderBlock {
      lines: range,
      form: SymbolForm::Primary,
    });
  }

  if !symbols.has_alias() {
    return None;
  }

  find_block(lines, &symbols.with_alias(true)).map(|range| HeaderBlock {
    lines: range,
    form: SymbolForm::Alias,
  })
}

/// Finds a block written with the currently active symbols of `symbols`.
///
/// Blank lines before the block are skipped.
pub fn find_block(lines: &[&str], symbols: &CommentSymbols) -> Option<Range<usize>> {
  let start = lines.iter().position(|line| !line.trim().is_empty())?;

  if symbols.identical() {
    let symbol = symbols.first();
    let len = lines[start..]
      .iter()
      .take_while(|line| is_comment_line(line, symbol))
      .count();
    return (len > 0).then(|| start..start + len);
  }

  if !lines[start].starts_with(symbols.first()) {
    return None;
  }

  for (offset, line) in lines[start + 1..].iter().enumerate() {
    // The closing symbol is checked first: " */" also starts with " *".
    if line.starts_with(symbols.last()) {
      return Some(start..start + offset + 2);
    }
    if !(line.starts_with(symbols.middle()) || line.trim().is_empty()) {
      return None;
    }
  }

  None
}

/// A line of a line-comment block: any line starting with the symbol.
///
/// `#!` directives and `//!`/`///` doc comments are not header lines.
fn is_comment_line(line: &str, symbol: &str) -> bool {
  line.strip_prefix(symbol).is_some_and(|rest| {
    let doc_comment = symbol.ends_with('/') && rest.starts_with('/');
    !(rest.starts_with('!') || doc_comment)
  })
}
