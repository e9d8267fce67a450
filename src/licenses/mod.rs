//! # Licenses Module
//!
//! Local store of license metadata downloaded from choosealicense.com.
//!
//! The store is a directory holding one JSON file per license plus a
//! `.metadata` index that maps `"<index>==<SPDX id>"` keys to file names and
//! lists every license for display. The remote download lives in [`fetch`].

pub mod fetch;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::debug;

/// File name of the metadata index inside the store directory.
pub const METADATA_FILE_NAME: &str = ".metadata";

/// File name written by `license write` in the project root.
pub const LICENSE_FILE_NAME: &str = "LICENSE";

/// Identifier reserved for the built-in proprietary license.
pub const PROPRIETARY_ID: &str = "0";

/// Title of the built-in proprietary license.
pub const PROPRIETARY_TITLE: &str = "Proprietary License";

/// SPDX id and file name used for the built-in proprietary license.
pub const PROPRIETARY_SPDX_ID: &str = "none";

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
  #[error("Failed to read license data '{}': {source}", path.display())]
  Read { path: PathBuf, source: std::io::Error },

  #[error("Failed to parse license data '{}': {source}", path.display())]
  Parse { path: PathBuf, source: serde_json::Error },

  #[error("Failed to write license data '{}': {source}", path.display())]
  Write { path: PathBuf, source: std::io::Error },

  #[error("Failed to serialize license data: {0}")]
  Serialize(#[from] serde_json::Error),

  #[error("License data file does not exist: {}", path.display())]
  NotFound { path: PathBuf },

  #[error("Invalid license file name '{file_name}'")]
  InvalidFileName { file_name: String },
}

/// Full record of one license.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LicenseDetails {
  pub title: String,
  #[serde(alias = "spdx-id")]
  pub spdx_id: String,
  pub index_id: String,
  #[serde(default)]
  pub permissions: Vec<String>,
  #[serde(default)]
  pub conditions: Vec<String>,
  #[serde(default)]
  pub limitations: Vec<String>,
  /// Name of the JSON file holding this record in the store.
  #[serde(default, alias = "filename")]
  pub file_name: String,
  #[serde(default)]
  pub web_url: String,
  #[serde(default)]
  pub full_text: String,
  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

/// One row of the license list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseListEntry {
  pub index_id: String,
  #[serde(alias = "spdx-id")]
  pub spdx_id: String,
  pub title: String,
}

/// The `.metadata` index of the store.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LicenseMetadata {
  /// `"<index>==<SPDX id>"` to license file name.
  #[serde(default)]
  pub ident_map: BTreeMap<String, String>,
  #[serde(default)]
  pub lic_list: Vec<LicenseListEntry>,
}

impl LicenseMetadata {
  /// Builds the index for a set of licenses, in the given order.
  pub fn from_licenses(licenses: &[LicenseDetails]) -> Self {
    let mut metadata = Self::default();
    for license in licenses {
      metadata
        .ident_map
        .insert(format!("{}=={}", license.index_id, license.spdx_id), license.file_name.clone());
      metadata.lic_list.push(LicenseListEntry {
        index_id: license.index_id.clone(),
        spdx_id: license.spdx_id.clone(),
        title: license.title.clone(),
      });
    }
    metadata
  }

  /// Resolves an identifier to a license file name.
  ///
  /// A decimal identifier matches the index exactly; anything else matches the
  /// SPDX id case-insensitively. The reserved proprietary id never resolves.
  pub fn resolve(&self, ident: &str) -> Option<&str> {
    let ident = ident.trim();
    if ident.is_empty() || ident == PROPRIETARY_ID {
      return None;
    }

    let by_index = ident.parse::<u32>().ok().filter(|_| ident.chars().all(|c| c.is_ascii_digit()));

    self
      .ident_map
      .iter()
      .find(|(key, _)| {
        let Some((index, spdx_id)) = key.split_once("==") else {
          return false;
        };
        match by_index {
          Some(wanted) => index.parse::<u32>().is_ok_and(|index| index == wanted),
          None => spdx_id.eq_ignore_ascii_case(ident),
        }
      })
      .map(|(_, file_name)| file_name.as_str())
  }
}

/// Directory-backed license store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LicenseStore {
  dir: PathBuf,
}

impl LicenseStore {
  pub const fn new(dir: PathBuf) -> Self {
    Self { dir }
  }

  pub fn dir(&self) -> &Path {
    &self.dir
  }

  /// Path of a license file inside the store.
  pub fn path_of(&self, file_name: &str) -> PathBuf {
    self.dir.join(file_name)
  }

  /// Whether the store holds a license file of that name.
  pub fn contains(&self, file_name: &str) -> bool {
    !file_name.is_empty() && self.path_of(file_name).is_file()
  }

  /// Writes every license file, then the metadata index.
  ///
  /// File names must be plain names inside the store; nothing is written if
  /// any of them is not.
  pub fn write_all(&self, licenses: &[LicenseDetails]) -> Result<LicenseMetadata, StoreError> {
    if let Some(license) = licenses.iter().find(|license| !is_plain_file_name(&license.file_name)) {
      return Err(StoreError::InvalidFileName {
        file_name: license.file_name.clone(),
      });
    }

    std::fs::create_dir_all(&self.dir).map_err(|source| StoreError::Write {
      path: self.dir.clone(),
      source,
    })?;

    for license in licenses {
      self.write_json(&self.path_of(&license.file_name), license)?;
    }

    let metadata = LicenseMetadata::from_licenses(licenses);
    self.write_json(&self.path_of(METADATA_FILE_NAME), &metadata)?;

    debug!("Wrote {} licenses to {}", licenses.len(), self.dir.display());
    Ok(metadata)
  }

  /// Reads the metadata index; a store without an index reads as empty.
  pub fn read_metadata(&self) -> Result<LicenseMetadata, StoreError> {
    let path = self.path_of(METADATA_FILE_NAME);
    if !path.exists() {
      return Ok(LicenseMetadata::default());
    }
    self.read_json(&path)
  }

  /// Resolves an identifier through the metadata index.
  pub fn resolve(&self, ident: &str) -> Result<Option<String>, StoreError> {
    Ok(self.read_metadata()?.resolve(ident).map(str::to_string))
  }

  /// Reads one license record by file name.
  pub fn read_details(&self, file_name: &str) -> Result<LicenseDetails, StoreError> {
    let path = self.path_of(file_name);
    if !path.is_file() {
      return Err(StoreError::NotFound { path });
    }

    let mut details: LicenseDetails = self.read_json(&path)?;
    if details.file_name.is_empty() {
      details.file_name = file_name.to_string();
    }
    Ok(details)
  }

  /// Resolves an identifier and reads the matching record.
  pub fn find(&self, ident: &str) -> Result<Option<LicenseDetails>, StoreError> {
    match self.resolve(ident)? {
      Some(file_name) => self.read_details(&file_name).map(Some),
      None => Ok(None),
    }
  }

  fn read_json<T: serde::de::DeserializeOwned>(&self, path: &Path) -> Result<T, StoreError> {
    let content = std::fs::read_to_string(path).map_err(|source| StoreError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    serde_json::from_str(&content).map_err(|source| StoreError::Parse {
      path: path.to_path_buf(),
      source,
    })
  }

  fn write_json<T: Serialize>(&self, path: &Path, value: &T) -> Result<(), StoreError> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content).map_err(|source| StoreError::Write {
      path: path.to_path_buf(),
      source,
    })
  }
}

/// A single path component that is neither special nor the metadata index.
fn is_plain_file_name(file_name: &str) -> bool {
  !file_name.is_empty()
    && file_name != "."
    && file_name != ".."
    && file_name != METADATA_FILE_NAME
    && !file_name.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
  use super::*;

  fn license(index: usize, spdx_id: &str, title: &str) -> LicenseDetails {
    LicenseDetails {
      title: title.to_string(),
      spdx_id: spdx_id.to_string(),
      index_id: index.to_string(),
      permissions: vec!["commercial-use".to_string()],
      conditions: vec![],
      limitations: vec![],
      file_name: format!("{}.json", spdx_id.to_lowercase()),
      web_url: format!("https://choosealicense.com/licenses/{}", spdx_id.to_lowercase()),
      full_text: format!("{title} text\n"),
      extra: Map::new(),
    }
  }

  fn licenses() -> Vec<LicenseDetails> {
    (1..=12)
      .map(|i| license(i, &format!("LIC-{i}"), &format!("License {i}")))
      .chain([license(13, "MIT", "MIT License")])
      .collect()
  }

  #[test]
  fn test_write_and_read_back() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = LicenseStore::new(dir.path().join("licenses"));
    let written = store.write_all(&licenses()).expect("writable");

    assert_eq!(store.read_metadata().expect("readable"), written);
    assert_eq!(written.lic_list.len(), 13);
    assert_eq!(written.ident_map.get("13==MIT").map(String::as_str), Some("mit.json"));

    let mit = store.read_details("mit.json").expect("readable");
    assert_eq!(mit.title, "MIT License");
    assert_eq!(mit.full_text, "MIT License text\n");
    assert!(store.contains("mit.json"));
    assert!(!store.contains(""));
  }

  #[test]
  fn test_write_all_rejects_paths_outside_store() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = LicenseStore::new(dir.path().join("licenses"));

    for file_name in ["../escape.json", "nested/mit.json", "..\\escape.json", "..", "", METADATA_FILE_NAME] {
      let mut bad = license(2, "BAD", "Bad License");
      bad.file_name = file_name.to_string();
      let err = store
        .write_all(&[license(1, "MIT", "MIT License"), bad])
        .expect_err("file name rejected");
      assert!(matches!(err, StoreError::InvalidFileName { .. }), "{file_name}");
    }

    assert!(!store.dir().exists());
    assert!(!dir.path().join("escape.json").exists());
  }

  #[test]
  fn test_resolve_by_index_is_exact() {
    let metadata = LicenseMetadata::from_licenses(&licenses());
    assert_eq!(metadata.resolve("1"), Some("lic-1.json"));
    assert_eq!(metadata.resolve("10"), Some("lic-10.json"));
    assert_eq!(metadata.resolve("13"), Some("mit.json"));
    assert_eq!(metadata.resolve("99"), None);
  }

  #[test]
  fn test_resolve_by_spdx_is_case_insensitive() {
    let metadata = LicenseMetadata::from_licenses(&licenses());
    assert_eq!(metadata.resolve("mit"), Some("mit.json"));
    assert_eq!(metadata.resolve("MIT"), Some("mit.json"));
    assert_eq!(metadata.resolve("lic-2"), Some("lic-2.json"));
    assert_eq!(metadata.resolve("apache-2.0"), None);
  }

  #[test]
  fn test_proprietary_id_never_resolves() {
    let metadata = LicenseMetadata::from_licenses(&licenses());
    assert_eq!(metadata.resolve(PROPRIETARY_ID), None);
    assert_eq!(metadata.resolve(""), None);
  }

  #[test]
  fn test_missing_metadata_reads_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = LicenseStore::new(dir.path().to_path_buf());
    assert_eq!(store.read_metadata().expect("readable"), LicenseMetadata::default());
    assert_eq!(store.find("mit").expect("readable"), None);
  }

  #[test]
  fn test_read_details_missing_file() {
    let dir = tempfile::tempdir().expect("temp dir");
    let store = LicenseStore::new(dir.path().to_path_buf());
    assert!(matches!(store.read_details("gpl.json"), Err(StoreError::NotFound { .. })));
  }

  #[test]
  fn test_details_accept_hyphenated_spdx_key() {
    let json = r#"{"title": "MIT License", "spdx-id": "MIT", "index_id": "1", "featured": true}"#;
    let details: LicenseDetails = serde_json::from_str(json).expect("valid");
    assert_eq!(details.spdx_id, "MIT");
    assert_eq!(details.extra.get("featured"), Some(&Value::Bool(true)));
    assert!(details.permissions.is_empty());
  }

  #[test]
  fn test_read_details_fills_missing_file_name() {
    let dir = tempfile::tempdir().expect("temp dir");
    let json = r#"{"title": "MIT License", "spdx_id": "MIT", "index_id": "1"}"#;
    std::fs::write(dir.path().join("mit.json"), json).expect("write");
    let store = LicenseStore::new(dir.path().to_path_buf());
    assert_eq!(store.read_details("mit.json").expect("readable").file_name, "mit.json");
  }
}
