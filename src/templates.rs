//! # Templates Module
//!
//! This module holds the literal license header template and the values used
//! to fill it in.
//!
//! The module includes:
//! - [`HeaderConfig`] with the rendering inputs (title, year, holder, SPDX id,
//!   indentation and the open-source flag)
//! - [`HeaderTemplate`] with the open-source and proprietary line sets
//! - [`substitute`] for single-pass placeholder replacement
//!
//! ## Example
//!
//! ```rust
//! use devtools::templates::{HeaderConfig, HeaderTemplate};
//!
//! let config = HeaderConfig {
//!   title: "MIT License".to_string(),
//!   year: "2024".to_string(),
//!   holder: "Jane Doe".to_string(),
//!   spdx_id: "MIT".to_string(),
//!   ..HeaderConfig::default()
//! };
//!
//! let lines = HeaderTemplate::for_config(&config).render_lines(&config);
//! assert_eq!(lines[0], "MIT License");
//! assert_eq!(lines[2], "Copyright (c) 2024, Jane Doe");
//! assert_eq!(lines.last().map(String::as_str), Some("SPDX-License-Identifier: MIT"));
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default number of spaces between the comment symbol and the header text.
pub const DEFAULT_SPACES: usize = 3;

const fn default_spaces() -> usize {
  DEFAULT_SPACES
}

const fn default_oss() -> bool {
  true
}

/// Rendering inputs for a license header.
///
/// Unknown keys found in the stored configuration are kept in [`extra`] so a
/// read-modify-write cycle does not drop them.
///
/// [`extra`]: HeaderConfig::extra
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeaderConfig {
  #[serde(default)]
  pub title: String,

  #[serde(default)]
  pub year: String,

  #[serde(default)]
  pub holder: String,

  #[serde(default)]
  pub spdx_id: String,

  /// Indentation inserted after the continuation symbol.
  #[serde(default = "default_spaces")]
  pub spaces: usize,

  /// Selects the open-source template; `false` selects the proprietary one.
  #[serde(default = "default_oss")]
  pub oss: bool,

  #[serde(flatten)]
  pub extra: Map<String, Value>,
}

impl Default for HeaderConfig {
  fn default() -> Self {
    Self {
      title: String::new(),
      year: String::new(),
      holder: String::new(),
      spdx_id: String::new(),
      spaces: DEFAULT_SPACES,
      oss: true,
      extra: Map::new(),
    }
  }
}

impl HeaderConfig {
  /// The indentation string derived from [`spaces`](Self::spaces).
  pub fn indent(&self) -> String {
    " ".repeat(self.spaces)
  }
}

const OSS_LINES: &[&str] = &[
  "{title}",
  "",
  "Copyright (c) {year}, {holder}",
  "",
  "The contents of this file are subject to the terms and conditions defined in the License.",
  "You may not use, modify, or distribute this file except in compliance with the License.",
  "",
  "SPDX-License-Identifier: {spdx_id}",
];

const PROPRIETARY_LINES: &[&str] = &[
  "{title}",
  "",
  "Copyright (c) {year}, {holder}",
  "",
  "The contents of this file are proprietary and confidential.",
  "Unauthorized copying, modification, or distribution of this file, via any medium, is strictly prohibited.",
  "",
  "All rights reserved.",
];

/// Which of the two template variants to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderTemplate {
  /// Ends with an `SPDX-License-Identifier` line.
  OpenSource,
  /// Ends with an "All rights reserved." line.
  Proprietary,
}

impl HeaderTemplate {
  pub const fn for_config(config: &HeaderConfig) -> Self {
    if config.oss { Self::OpenSource } else { Self::Proprietary }
  }

  /// The raw template lines, placeholders included.
  pub const fn lines(self) -> &'static [&'static str] {
    match self {
      Self::OpenSource => OSS_LINES,
      Self::Proprietary => PROPRIETARY_LINES,
    }
  }

  /// Template lines with every placeholder replaced from `config`.
  pub fn render_lines(self, config: &HeaderConfig) -> Vec<String> {
    self.lines().iter().map(|line| substitute(line, config)).collect()
  }
}

/// Replaces `{title}`, `{year}`, `{holder}` and `{spdx_id}` in one pass.
///
/// Substituted values are never re-scanned, and unrecognised `{...}`
/// sequences are copied through unchanged. Empty values yield empty text.
pub fn substitute(line: &str, config: &HeaderConfig) -> String {
  let mut result = String::with_capacity(line.len());
  let mut rest = line;

  while let Some(open) = rest.find('{') {
    result.push_str(&rest[..open]);
    let candidate = &rest[open..];

    let replacement = candidate.find('}').and_then(|close| {
      let value = match &candidate[1..close] {
        "title" => &config.title,
        "year" => &config.year,
        "holder" => &config.holder,
        "spdx_id" => &config.spdx_id,
        _ => return None,
      };
      Some((value, close))
    });

    match replacement {
      Some((value, close)) => {
        result.push_str(value);
        rest = &candidate[close + 1..];
      }
      None => {
        result.push('{');
        rest = &candidate[1..];
      }
    }
  }

  result.push_str(rest);
  result
}
