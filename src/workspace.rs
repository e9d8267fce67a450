//! # Workspace Module
//!
//! This module resolves the two directories devtools operates on: the project
//! root holding the `.devtools` config file, and the data root holding the
//! downloaded license store. Both are resolved once at startup and passed
//! explicitly to the components that need them.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::ConfigStore;

/// Environment variable overriding the data root.
pub const DATA_DIR_ENV_VAR: &str = "DEVTOOLS_DATA_DIR";

/// Directory name of the data root inside the home directory.
pub const DATA_DIR_NAME: &str = ".devtools-cli";

/// Resolved project and data directories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
  project_root: PathBuf,
  data_root: PathBuf,
}

impl Workspace {
  pub const fn new(project_root: PathBuf, data_root: PathBuf) -> Self {
    Self {
      project_root,
      data_root,
    }
  }

  /// Resolves the workspace from optional command-line overrides.
  ///
  /// The project root is `project_dir`, else the nearest ancestor of the
  /// current directory containing a `.devtools` file, else the current
  /// directory. The data root is `data_dir`, else `$DEVTOOLS_DATA_DIR`, else
  /// `~/.devtools-cli`.
  pub fn resolve(project_dir: Option<&Path>, data_dir: Option<&Path>) -> Result<Self> {
    let current_dir = std::env::current_dir().with_context(|| "Failed to get current directory")?;

    let project_root = match project_dir {
      Some(dir) => abs_path_or_current(dir, &current_dir),
      None => resolve_project_root(&current_dir),
    };

    let data_root = match data_dir {
      Some(dir) => abs_path_or_current(dir, &current_dir),
      None => resolve_data_root(std::env::var_os(DATA_DIR_ENV_VAR).map(PathBuf::from))?,
    };

    Ok(Self::new(project_root, data_root))
  }

  pub fn project_root(&self) -> &Path {
    &self.project_root
  }

  pub fn data_root(&self) -> &Path {
    &self.data_root
  }

  /// Config store for the project root.
  pub fn config_store(&self) -> ConfigStore {
    ConfigStore::new(&self.project_root)
  }

  /// Directory of the license store below the data root.
  pub fn licenses_dir(&self) -> PathBuf {
    self.data_root.join("licenses")
  }
}

/// Directory of the nearest `.devtools` file, or `current_dir` itself.
pub fn resolve_project_root(current_dir: &Path) -> PathBuf {
  ConfigStore::discover(current_dir)
    .and_then(|file| file.parent().map(Path::to_path_buf))
    .unwrap_or_else(|| current_dir.to_path_buf())
}

/// Data root from an environment override, else inside the home directory.
pub fn resolve_data_root(env_override: Option<PathBuf>) -> Result<PathBuf> {
  if let Some(dir) = env_override.filter(|dir| !dir.as_os_str().is_empty()) {
    return Ok(dir);
  }

  let home = dirs::home_dir().context("Failed to determine the home directory")?;
  Ok(home.join(DATA_DIR_NAME))
}

fn abs_path_or_current(path: &Path, current_dir: &Path) -> PathBuf {
  if path.is_absolute() {
    path.to_path_buf()
  } else {
    current_dir.join(path)
  }
}
