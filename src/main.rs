//! # devtools
//!
//! Command-line entry point for managing project licenses and license headers.

use anyhow::Result;
use devtools::cli::{Cli, run};

#[tokio::main]
async fn main() -> Result<()> {
  run(Cli::parse_args()).await
}
