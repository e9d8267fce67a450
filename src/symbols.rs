//! # Comment Symbols Module
//!
//! This module defines [`CommentSymbols`], the three-role comment syntax
//! (opening, continuation and closing symbol) used to wrap a license header
//! block for a family of languages.
//!
//! A symbol set is built either from three plain strings or from three
//! `(primary, alias)` pairs. The alias form describes an alternate syntax for
//! the same family (for example `//` lines standing in for a `/* ... */`
//! block) which is tolerated when looking for an existing header.
//!
//! ## Example
//!
//! ```rust
//! use devtools::symbols::CommentSymbols;
//!
//! # fn main() -> Result<(), devtools::symbols::SymbolError> {
//! let mut stars = CommentSymbols::new(("/*", "//"), (" *", "//"), (" */", "//"))?;
//! assert_eq!(stars.first(), "/*");
//! assert!(stars.has_alias());
//! assert!(!stars.identical());
//!
//! stars.set_use_alias(true);
//! assert_eq!(stars.first(), "//");
//! assert!(stars.identical());
//! # Ok(())
//! # }
//! ```

use std::fmt;

/// Error returned when a comment symbol set violates its construction contract.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SymbolError {
  /// The three roles were given with different arity (some paired, some not).
  #[error("Invalid comment symbol set: {first} first, {middle} middle, {last} last symbol")]
  InvalidSymbolSet {
    first: Arity,
    middle: Arity,
    last: Arity,
  },
}

/// Arity of a single symbol role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
  Single,
  Paired,
}

impl fmt::Display for Arity {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Single => write!(f, "single"),
      Self::Paired => write!(f, "paired"),
    }
  }
}

/// The value of one symbol role: a plain string or a `(primary, alias)` pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Symbol {
  Single(String),
  Paired { primary: String, alias: String },
}

impl Symbol {
  pub const fn arity(&self) -> Arity {
    match self {
      Self::Single(_) => Arity::Single,
      Self::Paired { .. } => Arity::Paired,
    }
  }

  /// Returns the active representative for the given alias selection.
  fn resolve(&self, use_alias: bool) -> &str {
    match self {
      Self::Single(value) => value,
      Self::Paired { primary, .. } if !use_alias => primary,
      Self::Paired { alias, .. } => alias,
    }
  }
}

impl From<&str> for Symbol {
  fn from(value: &str) -> Self {
    Self::Single(value.to_string())
  }
}

impl From<String> for Symbol {
  fn from(value: String) -> Self {
    Self::Single(value)
  }
}

impl From<(&str, &str)> for Symbol {
  fn from((primary, alias): (&str, &str)) -> Self {
    Self::Paired {
      primary: primary.to_string(),
      alias: alias.to_string(),
    }
  }
}

impl From<(String, String)> for Symbol {
  fn from((primary, alias): (String, String)) -> Self {
    Self::Paired { primary, alias }
  }
}

/// Three-role comment syntax for a language family.
///
/// The symbol content is fixed at construction. The only mutable state is the
/// alias selection flag, which switches all three accessors at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentSymbols {
  first: Symbol,
  middle: Symbol,
  last: Symbol,
  use_alias: bool,
}

impl CommentSymbols {
  /// Creates a symbol set from three role values.
  ///
  /// # Errors
  ///
  /// Returns [`SymbolError::InvalidSymbolSet`] if the roles mix plain strings
  /// and `(primary, alias)` pairs.
  pub fn new(first: impl Into<Symbol>, middle: impl Into<Symbol>, last: impl Into<Symbol>) -> Result<Self, SymbolError> {
    let (first, middle, last) = (first.into(), middle.into(), last.into());

    if first.arity() != middle.arity() || middle.arity() != last.arity() {
      return Err(SymbolError::InvalidSymbolSet {
        first: first.arity(),
        middle: middle.arity(),
        last: last.arity(),
      });
    }

    Ok(Self {
      first,
      middle,
      last,
      use_alias: false,
    })
  }

  /// Creates a symbol set without alias symbols.
  pub fn single(first: &str, middle: &str, last: &str) -> Self {
    Self {
      first: first.into(),
      middle: middle.into(),
      last: last.into(),
      use_alias: false,
    }
  }

  /// Creates a symbol set where every role has a `(primary, alias)` pair.
  pub fn paired(first: (&str, &str), middle: (&str, &str), last: (&str, &str)) -> Self {
    Self {
      first: first.into(),
      middle: middle.into(),
      last: last.into(),
      use_alias: false,
    }
  }

  /// The active block opener.
  pub fn first(&self) -> &str {
    self.first.resolve(self.use_alias)
  }

  /// The active continuation prefix.
  pub fn middle(&self) -> &str {
    self.middle.resolve(self.use_alias)
  }

  /// The active block closer.
  pub fn last(&self) -> &str {
    self.last.resolve(self.use_alias)
  }

  /// Whether the set was constructed with `(primary, alias)` pairs.
  pub const fn has_alias(&self) -> bool {
    matches!(self.first, Symbol::Paired { .. })
  }

  pub const fn use_alias(&self) -> bool {
    self.use_alias
  }

  /// Selects the alias (`true`) or primary (`false`) member of every pair.
  ///
  /// Has no visible effect on a set without alias symbols.
  pub const fn set_use_alias(&mut self, use_alias: bool) {
    self.use_alias = use_alias;
  }

  /// Returns a copy with the given alias selection, leaving `self` untouched.
  pub fn with_alias(&self, use_alias: bool) -> Self {
    let mut symbols = self.clone();
    symbols.set_use_alias(use_alias);
    symbols
  }

  /// Whether the three active symbols are pairwise equal (e.g. `#` comments).
  pub fn identical(&self) -> bool {
    self.first() == self.middle() && self.middle() == self.last()
  }
}
