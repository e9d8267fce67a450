//! Download of license data from the choosealicense.com repository.
//!
//! The `_licenses` directory of the repository is listed through the GitHub
//! tree API, then every raw license file is downloaded concurrently. Each file
//! carries YAML front matter between `---` lines followed by the license text.

use std::path::Path;
use std::time::Duration;

use futures::{StreamExt, stream};
use serde::Deserialize;
use serde_json::Map;
use tracing::{debug, trace};

use super::LicenseDetails;

pub const GITHUB_TREE_URL: &str = "https://api.github.com/repos/github/choosealicense.com/git/trees/gh-pages";
pub const RAW_LICENSES_URL: &str = "https://raw.githubusercontent.com/github/choosealicense.com/gh-pages/_licenses/";
pub const LICENSE_SITE_URL: &str = "https://choosealicense.com/licenses/";
pub const COMPARE_URL: &str = "https://choosealicense.com/appendix/";

/// Maximum number of downloads in flight.
pub const DEFAULT_CONCURRENCY: usize = 16;

const LICENSES_TREE_PATH: &str = "_licenses";

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
  #[error("Request to {url} failed: {source}")]
  Http {
    url: String,
    #[source]
    source: reqwest::Error,
  },

  #[error("Request to {url} returned status {status}")]
  Status { url: String, status: reqwest::StatusCode },

  #[error("The repository tree has no '_licenses' directory")]
  MissingLicensesTree,

  #[error("License file '{file_name}' has no front matter")]
  MissingFrontMatter { file_name: String },

  #[error("Invalid front matter in license file '{file_name}': {source}")]
  FrontMatter {
    file_name: String,
    #[source]
    source: serde_yaml::Error,
  },
}

/// Response of the GitHub git tree API.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubTree {
  #[serde(default)]
  pub tree: Vec<GitHubLeaf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GitHubLeaf {
  #[serde(default)]
  pub path: String,
  #[serde(default, rename = "type")]
  pub kind: String,
  #[serde(default)]
  pub url: String,
}

impl GitHubTree {
  /// API url of the `_licenses` subtree.
  pub fn licenses_subtree_url(&self) -> Option<&str> {
    self
      .tree
      .iter()
      .find(|leaf| leaf.kind == "tree" && leaf.path == LICENSES_TREE_PATH)
      .map(|leaf| leaf.url.as_str())
  }

  /// Paths of all entries, in listing order.
  pub fn paths(&self) -> Vec<String> {
    self.tree.iter().map(|leaf| leaf.path.clone()).collect()
  }
}

#[derive(Debug, Deserialize)]
struct FrontMatter {
  #[serde(default)]
  title: String,
  #[serde(default, rename = "spdx-id")]
  spdx_id: String,
  #[serde(default)]
  permissions: Vec<String>,
  #[serde(default)]
  conditions: Vec<String>,
  #[serde(default)]
  limitations: Vec<String>,
}

/// Builds a [`LicenseDetails`] from one raw license file.
///
/// `index` is the 1-based position of the file in the listing. The stored file
/// name is the source file name with a `.json` extension.
pub fn parse_license_document(index: usize, file_name: &str, document: &str) -> Result<LicenseDetails, FetchError> {
  let missing = || FetchError::MissingFrontMatter {
    file_name: file_name.to_string(),
  };

  let rest = document.trim_start().strip_prefix("---").ok_or_else(missing)?;
  let end = rest.find("\n---").ok_or_else(missing)?;
  let yaml = &rest[..end];
  let after = &rest[end + "\n---".len()..];
  let full_text = after
    .strip_prefix("\r\n")
    .or_else(|| after.strip_prefix('\n'))
    .unwrap_or(after);

  let meta: FrontMatter = serde_yaml::from_str(yaml).map_err(|source| FetchError::FrontMatter {
    file_name: file_name.to_string(),
    source,
  })?;

  let json_name = Path::new(file_name).with_extension("json").to_string_lossy().into_owned();

  Ok(LicenseDetails {
    web_url: format!("{}{}", LICENSE_SITE_URL, meta.spdx_id.to_lowercase()),
    title: meta.title,
    spdx_id: meta.spdx_id,
    index_id: index.to_string(),
    permissions: meta.permissions,
    conditions: meta.conditions,
    limitations: meta.limitations,
    file_name: json_name,
    full_text: full_text.to_string(),
    extra: Map::new(),
  })
}

/// Async client for the license repository.
#[derive(Debug, Clone)]
pub struct LicenseFetcher {
  client: reqwest::Client,
  tree_url: String,
  raw_base_url: String,
  concurrency: usize,
}

impl LicenseFetcher {
  pub fn new() -> Result<Self, FetchError> {
    let client = reqwest::Client::builder()
      .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
      .timeout(Duration::from_secs(30))
      .build()
      .map_err(|source| FetchError::Http {
        url: GITHUB_TREE_URL.to_string(),
        source,
      })?;

    Ok(Self {
      client,
      tree_url: GITHUB_TREE_URL.to_string(),
      raw_base_url: RAW_LICENSES_URL.to_string(),
      concurrency: DEFAULT_CONCURRENCY,
    })
  }

  /// Overrides the number of downloads in flight (at least one).
  pub fn with_concurrency(mut self, concurrency: usize) -> Self {
    self.concurrency = concurrency.max(1);
    self
  }

  /// Lists the license file names of the repository.
  pub async fn fetch_file_names(&self) -> Result<Vec<String>, FetchError> {
    let top: GitHubTree = self.get_json(&self.tree_url).await?;
    let url = top
      .licenses_subtree_url()
      .ok_or(FetchError::MissingLicensesTree)?
      .to_string();

    let licenses: GitHubTree = self.get_json(&url).await?;
    let names = licenses.paths();
    debug!("Found {} license files", names.len());
    Ok(names)
  }

  /// Downloads and parses every file, calling `on_done` after each download.
  ///
  /// Results are ordered by index. Any failure fails the whole batch.
  pub async fn fetch_all<F>(&self, file_names: &[String], on_done: F) -> Result<Vec<LicenseDetails>, FetchError>
  where
    F: Fn(),
  {
    let on_done = &on_done;
    let results: Vec<(usize, Result<LicenseDetails, FetchError>)> = stream::iter(file_names.iter().enumerate())
      .map(|(position, file_name)| async move {
        let index = position + 1;
        let result = self.fetch_one(index, file_name).await;
        on_done();
        (index, result)
      })
      .buffer_unordered(self.concurrency)
      .collect()
      .await;

    let mut ordered = results;
    ordered.sort_by_key(|(index, _)| *index);
    ordered.into_iter().map(|(_, result)| result).collect()
  }

  async fn fetch_one(&self, index: usize, file_name: &str) -> Result<LicenseDetails, FetchError> {
    let url = format!("{}{}", self.raw_base_url, file_name);
    trace!("Downloading {}", url);
    let document = self.get_text(&url).await?;
    parse_license_document(index, file_name, &document)
  }

  async fn get_text(&self, url: &str) -> Result<String, FetchError> {
    let response = self.send(url).await?;
    response.text().await.map_err(|source| FetchError::Http {
      url: url.to_string(),
      source,
    })
  }

  async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, FetchError> {
    let response = self.send(url).await?;
    response.json().await.map_err(|source| FetchError::Http {
      url: url.to_string(),
      source,
    })
  }

  async fn send(&self, url: &str) -> Result<reqwest::Response, FetchError> {
    let response = self.client.get(url).send().await.map_err(|source| FetchError::Http {
      url: url.to_string(),
      source,
    })?;

    let status = response.status();
    if !status.is_success() {
      return Err(FetchError::Status {
        url: url.to_string(),
        status,
      });
    }
    Ok(response)
  }
}
