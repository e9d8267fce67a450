//! # devtools
//!
//! A project tool that manages the license of a code base: it downloads the
//! open-source license list from choosealicense.com, records the chosen
//! license in a `.devtools` file, and stamps a matching license header on
//! every supported source file.
//!
//! Headers are rendered once per comment family (`#` style for Python, shell
//! and friends, `/* */` style for the C family) and applied idempotently: a
//! file that already carries the header is left untouched, and an older header
//! in the same comment style is replaced.
//!
//! ## Usage as a Library
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use devtools::header::{ApplyOutcome, HeaderApplier};
//! use devtools::registry::ExtensionRegistry;
//! use devtools::templates::HeaderConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = HeaderConfig {
//!         title: "MIT License".to_string(),
//!         year: "2025".to_string(),
//!         holder: "Acme Corp".to_string(),
//!         spdx_id: "MIT".to_string(),
//!         ..HeaderConfig::default()
//!     };
//!
//!     let applier = HeaderApplier::new(&config, &ExtensionRegistry::builtin());
//!     match applier.apply(Path::new("src/main.rs"))? {
//!         ApplyOutcome::Applied => println!("Header applied"),
//!         ApplyOutcome::Skipped => println!("Header already present"),
//!         ApplyOutcome::Unsupported => println!("No comment style for this file"),
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Modules
//!
//! * [`header`] - Header rendering, detection and application
//! * [`registry`] - Comment families and the extension lookup
//! * [`templates`] - Header templates and placeholder substitution
//! * [`processor`] - Bulk processing of project files
//! * [`licenses`] - Local license store and remote download
//! * [`logging`] - Logging utilities for verbose output

pub mod cli;
pub mod config;
pub mod diff;
pub mod header;
pub mod licenses;
pub mod logging;
pub mod output;
pub mod processor;
pub mod registry;
pub mod report;
pub mod symbols;
pub mod templates;
pub mod workspace;
