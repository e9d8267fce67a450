//! # File I/O Module
//!
//! This module provides file reading and writing utilities for the header
//! applier. Errors carry the offending path.

use std::path::Path;

use crate::header::HeaderError;

/// File I/O operations for the processor.
///
/// This struct provides static methods for reading and writing files.
pub struct FileIO;

impl FileIO {
  /// Read full file content as UTF-8 text.
  ///
  /// Content that is not valid UTF-8 fails with an
  /// [`InvalidData`](std::io::ErrorKind::InvalidData) I/O error.
  pub fn read_full_content(path: &Path) -> Result<String, HeaderError> {
    std::fs::read_to_string(path).map_err(|source| HeaderError::Io {
      path: path.to_path_buf(),
      source,
    })
  }

  /// Write file content, replacing what was there.
  pub fn write_file(path: &Path, content: &str) -> Result<(), HeaderError> {
    std::fs::write(path, content).map_err(|source| HeaderError::Io {
      path: path.to_path_buf(),
      source,
    })
  }
}
