//! # CLI Module
//!
//! This module contains the command-line interface implementation.
//! It uses clap for argument parsing and supports subcommands for
//! extensibility. Global flags are shared by every subcommand.

mod browser;
mod license;

use std::path::PathBuf;

use anyhow::Result;
use clap::builder::styling::{AnsiColor, Color, Style, Styles};
use clap::{Parser, Subcommand};
pub use license::{ApplyArgs, IdArgs, LicenseArgs, LicenseCommand, OpenArgs, resolve_license_config, run_license};
use tracing::debug;

use crate::logging::{ColorMode, init_tracing, set_quiet, set_verbose};
use crate::output::print_package_info;
use crate::workspace::Workspace;

const CUSTOM_STYLES: Styles = Styles::styled()
  .header(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .usage(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))).bold())
  .literal(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Blue))).bold())
  .placeholder(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Cyan))))
  .error(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Red))).bold())
  .valid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Green))))
  .invalid(Style::new().fg_color(Some(Color::Ansi(AnsiColor::Yellow))));

/// Top-level CLI arguments
#[derive(Parser, Debug)]
#[command(
  author,
  version,
  about,
  styles = CUSTOM_STYLES,
  after_help = "Examples:
  # Download the license list
  devtools license update

  # Show the available licenses
  devtools license list

  # Apply MIT headers to everything below src/ and tests/
  devtools license apply --id MIT --holder \"Acme Corp\" --path src --path tests

  # Preview the headers a saved configuration would apply
  devtools license apply --dry-run --show-diff

  # Use the built-in proprietary license
  devtools license apply --id 0 --holder \"Acme Corp\" --year 2024

  # Show the package version and metadata
  devtools info
",
  help_template = "{before-help}{name} v{version}
{about-section}
{usage-heading} {usage}

{all-args}{after-help}
"
)]
pub struct Cli {
  #[command(subcommand)]
  pub command: Command,

  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,

  /// Suppress all output except errors
  #[arg(short, long, conflicts_with = "verbose", global = true)]
  pub quiet: bool,

  /// Control when to use colored output (auto, never, always)
  #[arg(
    long,
    value_name = "WHEN",
    num_args = 0..=1,
    default_value_t = ColorMode::Auto,
    default_missing_value = "always",
    value_enum,
    global = true
  )]
  pub colors: ColorMode,

  /// Project root (default: nearest directory with a .devtools file, else the
  /// current directory)
  #[arg(long, value_name = "DIR", global = true)]
  pub project_dir: Option<PathBuf>,

  /// Data directory holding downloaded licenses (default: $DEVTOOLS_DATA_DIR,
  /// else ~/.devtools-cli)
  #[arg(long, value_name = "DIR", global = true)]
  pub data_dir: Option<PathBuf>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Command {
  /// Manage the project license and source file license headers
  License(LicenseArgs),

  /// Print information about the devtools package
  Info,
}

impl Cli {
  /// Parse CLI arguments and return the Cli struct
  pub fn parse_args() -> Self {
    Self::parse()
  }
}

/// Sets up logging and output modes, then dispatches the subcommand.
pub async fn run(cli: Cli) -> Result<()> {
  init_tracing(cli.quiet, cli.verbose);

  if cli.verbose > 0 {
    set_verbose();
  } else if cli.quiet {
    set_quiet();
  }
  cli.colors.apply();

  let args = match cli.command {
    Command::License(args) => args,
    Command::Info => {
      print_package_info();
      return Ok(());
    }
  };

  let workspace = Workspace::resolve(cli.project_dir.as_deref(), cli.data_dir.as_deref())?;
  debug!(
    "Project root: {}, data root: {}",
    workspace.project_root().display(),
    workspace.data_root().display()
  );

  run_license(args, &workspace).await
}
