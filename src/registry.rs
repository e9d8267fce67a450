//! # Extension Registry Module
//!
//! Static mapping from file extension to the comment family that applies to
//! it. Several extensions share one family; an extension belongs to at most
//! one family.

use std::collections::HashMap;
use std::path::Path;

use crate::symbols::CommentSymbols;

/// Error returned when building a registry from conflicting families.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
  #[error("Extension '{extension}' is registered by both the '{existing}' and '{duplicate}' comment families")]
  DuplicateExtension {
    extension: String,
    existing: String,
    duplicate: String,
  },
}

/// A set of file extensions sharing one comment syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentFamily {
  /// Short identifier used in logs (e.g. "hash", "star").
  pub name: String,
  pub symbols: CommentSymbols,
  /// Extensions without the leading dot, matched case-sensitively.
  pub extensions: Vec<String>,
}

impl CommentFamily {
  pub fn new<I, S>(name: &str, symbols: CommentSymbols, extensions: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    Self {
      name: name.to_string(),
      symbols,
      extensions: extensions
        .into_iter()
        .map(|ext| normalize_extension(ext.as_ref()).to_string())
        .collect(),
    }
  }

  /// Languages whose comments start every line with `#`.
  pub fn hash() -> Self {
    Self::new(
      "hash",
      CommentSymbols::single("#", "#", "#"),
      [
        "py", "pyw", "pyx", "pxd", "pxi", "pyi", // Python
        "rb", "rbw", // Ruby
        "pl", "pm", "t", "pod", // Perl
        "sh", "bash", "ksh", "csh", "tcsh", "zsh", // shells
        "r", "R", "Rmd", // R
        "lua", "tcl", "yaml", "yml",
      ],
    )
  }

  /// C-like languages using `/* ... */` blocks, tolerating `//` line headers.
  pub fn star() -> Self {
    Self::new(
      "star",
      CommentSymbols::paired(("/*", "//"), (" *", "//"), (" */", "//")),
      [
        "c", "h", "cpp", "hpp", "cc", "cxx", "hxx", "cs", "java", "js", "jsx", "css", "php", "phtml", "php4", "php5",
        "php7", "phps", "swift", "go", "rs", "kt", "kts", "ts", "tsx", "sass", "scss", "less", "scala", "groovy",
        "gvy", "gy", "gsh",
      ],
    )
  }
}

/// Strips a single leading dot from an extension.
fn normalize_extension(extension: &str) -> &str {
  extension.strip_prefix('.').unwrap_or(extension)
}

/// Lookup table from extension to [`CommentFamily`].
#[derive(Debug, Clone)]
pub struct ExtensionRegistry {
  families: Vec<CommentFamily>,
  by_extension: HashMap<String, usize>,
}

impl ExtensionRegistry {
  /// Builds a registry from the given families.
  ///
  /// # Errors
  ///
  /// Returns [`RegistryError::DuplicateExtension`] if two families claim the
  /// same extension.
  pub fn new(families: Vec<CommentFamily>) -> Result<Self, RegistryError> {
    let mut by_extension = HashMap::new();

    for (index, family) in families.iter().enumerate() {
      for extension in &family.extensions {
        match by_extension.insert(extension.clone(), index) {
          Some(existing) if existing != index => {
            return Err(RegistryError::DuplicateExtension {
              extension: extension.clone(),
              existing: families[existing].name.clone(),
              duplicate: family.name.clone(),
            });
          }
          _ => {}
        }
      }
    }

    Ok(Self { families, by_extension })
  }

  /// The built-in hash and star families.
  pub fn builtin() -> Self {
    Self::new(vec![CommentFamily::hash(), CommentFamily::star()])
      .expect("built-in comment families must not share extensions")
  }

  pub fn families(&self) -> &[CommentFamily] {
    &self.families
  }

  /// Index of the family registered for `extension` (leading dot optional).
  pub fn index_of(&self, extension: &str) -> Option<usize> {
    self.by_extension.get(normalize_extension(extension)).copied()
  }

  /// Looks up the family registered for `extension`.
  ///
  /// An unknown extension is an expected outcome and yields `None`.
  pub fn lookup(&self, extension: &str) -> Option<&CommentFamily> {
    self.index_of(extension).map(|index| &self.families[index])
  }

  /// Looks up the family for a file path by its extension.
  pub fn lookup_path(&self, path: &Path) -> Option<&CommentFamily> {
    path.extension().and_then(|ext| ext.to_str()).and_then(|ext| self.lookup(ext))
  }
}

impl Default for ExtensionRegistry {
  fn default() -> Self {
    Self::builtin()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_builtin_routes_c_family_to_star() {
    let registry = ExtensionRegistry::builtin();
    for ext in ["c", "h", "cpp", "js", "rs", "php"] {
      assert_eq!(registry.lookup(ext).map(|f| f.name.as_str()), Some("star"), "{ext}");
    }
  }

  #[test]
  fn test_builtin_routes_scripts_to_hash() {
    let registry = ExtensionRegistry::builtin();
    for ext in ["py", "sh", "yaml", "R", "r"] {
      assert_eq!(registry.lookup(ext).map(|f| f.name.as_str()), Some("hash"), "{ext}");
    }
  }

  #[test]
  fn test_lookup_accepts_leading_dot() {
    let registry = ExtensionRegistry::builtin();
    assert_eq!(registry.lookup(".py").map(|f| f.name.as_str()), Some("hash"));
  }

  #[test]
  fn test_lookup_is_case_sensitive() {
    let registry = ExtensionRegistry::builtin();
    assert!(registry.lookup("PY").is_none());
    assert!(registry.lookup("Rmd").is_some());
    assert!(registry.lookup("rmd").is_none());
  }

  #[test]
  fn test_unknown_extension() {
    let registry = ExtensionRegistry::builtin();
    assert!(registry.lookup("txt").is_none());
    assert!(registry.lookup_path(Path::new("README")).is_none());
    assert!(registry.lookup_path(Path::new("notes.md")).is_none());
  }

  #[test]
  fn test_lookup_path() {
    let registry = ExtensionRegistry::builtin();
    let family = registry.lookup_path(Path::new("src/main.rs")).expect("rs is registered");
    assert_eq!(family.symbols.first(), "/*");
  }

  #[test]
  fn test_builtin_has_no_duplicates() {
    let builtin = ExtensionRegistry::builtin();
    assert!(ExtensionRegistry::new(builtin.families().to_vec()).is_ok());
  }

  #[test]
  fn test_duplicate_extension_rejected() {
    let families = vec![
      CommentFamily::new("hash", CommentSymbols::single("#", "#", "#"), ["php"]),
      CommentFamily::new("star", CommentSymbols::single("/*", " *", " */"), [".php"]),
    ];

    let err = ExtensionRegistry::new(families).expect_err("php registered twice");
    assert_eq!(
      err,
      RegistryError::DuplicateExtension {
        extension: "php".to_string(),
        existing: "hash".to_string(),
        duplicate: "star".to_string(),
      }
    );
  }

  #[test]
  fn test_custom_family() {
    let lisp = CommentFamily::new("semicolon", CommentSymbols::single(";;", ";;", ";;"), ["el", "lisp"]);
    let registry = ExtensionRegistry::new(vec![lisp]).expect("no conflicts");
    assert_eq!(registry.lookup("el").map(|f| f.symbols.middle()), Some(";;"));
    assert!(registry.lookup("py").is_none());
  }
}
