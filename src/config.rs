//! # Configuration Module
//!
//! This module provides the local project configuration of devtools: a single
//! JSON object stored in a `.devtools` file at the project root, keyed by
//! section name.
//!
//! Sections are read and written independently. Writing one section keeps
//! every other section, and unknown keys inside a typed section survive a
//! read-modify-write cycle through the `extra` overflow maps.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::templates::HeaderConfig;
use crate::verbose_log;

/// The config file name.
pub const CONFIG_FILE_NAME: &str = ".devtools";

/// Error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  /// The config file could not be read.
  #[error("Failed to read config file '{}': {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  /// The config file, or one of its sections, is not valid JSON of the
  /// expected shape.
  #[error("Failed to parse config file '{}': {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },

  /// The config file could not be written.
  #[error("Failed to write config file '{}': {source}", path.display())]
  Write { path: PathBuf, source: std::io::Error },

  /// The top level of the config file is not a JSON object.
  #[error("Config file '{}' does not contain a JSON object", path.display())]
  NotAnObject { path: PathBuf },

  /// A section value could not be serialized.
  #[error("Failed to serialize config section '{section}': {source}")]
  Serialize { section: String, source: serde_json::Error },
}

/// Section-keyed JSON store backed by one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigStore {
  path: PathBuf,
}

impl ConfigStore {
  /// Store for the `.devtools` file in `project_root`.
  pub fn new(project_root: &Path) -> Self {
    Self {
      path: project_root.join(CONFIG_FILE_NAME),
    }
  }

  /// Store for an explicit file path.
  pub const fn at(path: PathBuf) -> Self {
    Self { path }
  }

  pub fn path(&self) -> &Path {
    &self.path
  }

  /// Finds the nearest `.devtools` file in `start` or one of its ancestors.
  pub fn discover(start: &Path) -> Option<PathBuf> {
    start
      .ancestors()
      .map(|dir| dir.join(CONFIG_FILE_NAME))
      .find(|candidate| candidate.is_file())
  }

  /// Reads the whole config object.
  ///
  /// A missing or empty file reads as an empty object.
  pub fn read_all(&self) -> Result<Map<String, Value>, ConfigError> {
    let content = match std::fs::read_to_string(&self.path) {
      Ok(content) => content,
      Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Map::new()),
      Err(source) => {
        return Err(ConfigError::Read {
          path: self.path.clone(),
          source,
        });
      }
    };

    if content.trim().is_empty() {
      return Ok(Map::new());
    }

    let value: Value = serde_json::from_str(&content).map_err(|source| ConfigError::Parse {
      path: self.path.clone(),
      source,
    })?;

    match value {
      Value::Object(map) => Ok(map),
      _ => Err(ConfigError::NotAnObject {
        path: self.path.clone(),
      }),
    }
  }

  /// Reads and deserializes one section; `None` when the section is absent.
  pub fn read_section<T: DeserializeOwned>(&self, section: &str) -> Result<Option<T>, ConfigError> {
    let Some(value) = self.read_all()?.remove(section) else {
      return Ok(None);
    };

    verbose_log!("Loaded config section '{}' from: {}", section, self.path.display());

    serde_json::from_value(value).map(Some).map_err(|source| ConfigError::Parse {
      path: self.path.clone(),
      source,
    })
  }

  /// Replaces one section, keeping all others.
  pub fn write_section<T: Serialize>(&self, section: &str, value: &T) -> Result<(), ConfigError> {
    let mut config = self.read_all()?;
    let value = serde_json::to_value(value).map_err(|source| ConfigError::Serialize {
      section: section.to_string(),
      source,
    })?;
    config.insert(section.to_string(), value);
    self.write_all(&config)
  }

  fn write_all(&self, config: &Map<String, Value>) -> Result<(), ConfigError> {
    let mut content = serde_json::to_string_pretty(config).map_err(|source| ConfigError::Serialize {
      section: String::new(),
      source,
    })?;
    content.push('\n');

    std::fs::write(&self.path, content).map_err(|source| ConfigError::Write {
      path: self.path.clone(),
      source,
    })
  }
}

/// The `"license"` section of the project config.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LicenseConfig {
  #[serde(default)]
  pub header: HeaderConfig,

  /// Paths relative to the project root; empty means all visible top-level
  /// directories.
  #[serde(default)]
  pub include_paths: Vec<String>,

  /// Path prefixes or glob patterns, relative to the project root.
  #[serde(default)]
  pub exclude_paths: Vec<String>,

  /// License data file backing the header, or `"none"` for the proprietary
  /// license.
  #[serde(default, alias = "filename")]
  pub file_name: String,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl LicenseConfig {
  pub const SECTION: &'static str = "license";

  pub fn load(store: &ConfigStore) -> Result<Option<Self>, ConfigError> {
    store.read_section(Self::SECTION)
  }

  pub fn save(&self, store: &ConfigStore) -> Result<(), ConfigError> {
    store.write_section(Self::SECTION, self)
  }
}
