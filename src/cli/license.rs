//! # License Command
//!
//! This module implements `devtools license` and its subcommands: applying
//! headers to source files, refreshing the local license store, and showing or
//! writing a license.

use std::path::PathBuf;
use std::process;

use anyhow::{Context, Result, bail};
use chrono::Datelike;
use clap::{Args, Subcommand};
use tracing::debug;

use super::browser::open_url;
use crate::config::LicenseConfig;
use crate::diff::DiffManager;
use crate::header::HeaderApplier;
use crate::info_log;
use crate::licenses::fetch::{COMPARE_URL, LicenseFetcher};
use crate::licenses::{
  LICENSE_FILE_NAME, LicenseDetails, LicenseStore, PROPRIETARY_ID, PROPRIETARY_SPDX_ID, PROPRIETARY_TITLE,
};
use crate::output::{
  CategorizedReports, download_progress, print_applied_files, print_failed_files, print_hint, print_license_table,
  print_start_message, print_summary,
};
use crate::processor::{FileCollector, Processor};
use crate::registry::ExtensionRegistry;
use crate::report::ReportGenerator;
use crate::templates::{HeaderConfig, HeaderTemplate};
use crate::workspace::Workspace;

/// Arguments for the license command
#[derive(Args, Debug)]
pub struct LicenseArgs {
  #[command(subcommand)]
  pub command: LicenseCommand,
}

#[derive(Subcommand, Debug)]
pub enum LicenseCommand {
  /// Apply license headers to the project's source files
  Apply(ApplyArgs),

  /// Download the license list from choosealicense.com
  Update,

  /// List the downloaded licenses
  List,

  /// Show the web page of a license
  Read(OpenArgs),

  /// Show the license comparison page
  Compare {
    /// Only print the URL, do not open a browser
    #[arg(long)]
    no_open: bool,
  },

  /// Write the full license text to LICENSE in the project root
  Write(IdArgs),
}

/// Arguments for `license apply`
#[derive(Args, Debug, Default, Clone)]
pub struct ApplyArgs {
  /// License index or SPDX id (0 selects the built-in proprietary license)
  #[arg(long, value_name = "ID")]
  pub id: Option<String>,

  /// Copyright year(s) (default: the current year)
  #[arg(long)]
  pub year: Option<String>,

  /// Copyright holder
  #[arg(long)]
  pub holder: Option<String>,

  /// Number of spaces between the comment symbol and the header text
  #[arg(long, value_name = "N")]
  pub spaces: Option<usize>,

  /// Paths to process, relative to the project root (repeatable, "." for
  /// everything). Replaces the saved list.
  #[arg(long = "path", value_name = "PATH")]
  pub paths: Vec<String>,

  /// Paths or glob patterns to skip (repeatable). Replaces the saved list.
  #[arg(long = "exclude", value_name = "PATTERN")]
  pub excludes: Vec<String>,

  /// Only report what would change; no file is written
  #[arg(long)]
  pub dry_run: bool,

  /// Show a diff of every change (requires --dry-run)
  #[arg(long, requires = "dry_run")]
  pub show_diff: bool,

  /// Write a JSON report of the run to the specified path
  #[arg(long, value_name = "OUTPUT")]
  pub report_json: Option<PathBuf>,
}

/// Arguments selecting a license, defaulting to the configured one
#[derive(Args, Debug, Default, Clone)]
pub struct IdArgs {
  /// License index or SPDX id (default: the configured license)
  #[arg(long, value_name = "ID")]
  pub id: Option<String>,
}

/// Arguments for commands that open a web page
#[derive(Args, Debug, Default, Clone)]
pub struct OpenArgs {
  #[command(flatten)]
  pub license: IdArgs,

  /// Only print the URL, do not open a browser
  #[arg(long)]
  pub no_open: bool,
}

/// Run the license command with the given arguments
pub async fn run_license(args: LicenseArgs, workspace: &Workspace) -> Result<()> {
  match args.command {
    LicenseCommand::Apply(args) => run_apply(args, workspace).await,
    LicenseCommand::Update => run_update(workspace).await,
    LicenseCommand::List => run_list(workspace),
    LicenseCommand::Read(args) => run_read(&args, workspace),
    LicenseCommand::Compare { no_open } => {
      show_url(COMPARE_URL, no_open);
      Ok(())
    }
    LicenseCommand::Write(args) => run_write(&args, workspace),
  }
}

/// Builds the license config for an apply run from the saved config and the
/// command-line arguments.
///
/// # Errors
///
/// - no `--id` and no saved config
/// - a saved open-source config whose license data file is missing
/// - `--id` without saved config and without `--holder`
/// - an `--id` that matches no stored license
pub fn resolve_license_config(
  existing: Option<LicenseConfig>,
  args: &ApplyArgs,
  store: &LicenseStore,
  current_year: &str,
) -> Result<LicenseConfig> {
  let mut config = match (args.id.as_deref(), existing) {
    (None, None) => {
      bail!("No license is configured for this project. Pass --id to select one (see `devtools license list`).")
    }
    (None, Some(config)) => {
      if config.header.oss && !store.contains(&config.file_name) {
        bail!(
          "License data '{}' is missing from {}. Run `devtools license update` first.",
          config.file_name,
          store.dir().display()
        );
      }
      config
    }
    (Some(id), existing) => {
      let mut config = match existing {
        Some(config) => config,
        None => {
          let Some(holder) = args.holder.as_deref() else {
            bail!("--holder is required when the project has no license configured");
          };
          LicenseConfig {
            header: HeaderConfig {
              holder: holder.to_string(),
              year: current_year.to_string(),
              ..HeaderConfig::default()
            },
            ..LicenseConfig::default()
          }
        }
      };
      select_license(&mut config, id, store)?;
      config
    }
  };

  if let Some(year) = &args.year {
    config.header.year.clone_from(year);
  }
  if let Some(holder) = &args.holder {
    config.header.holder.clone_from(holder);
  }
  if let Some(spaces) = args.spaces {
    config.header.spaces = spaces;
  }

  if !args.paths.is_empty() {
    if args.paths.iter().any(|path| path == ".") {
      config.include_paths.clear();
    } else {
      config.include_paths.clone_from(&args.paths);
    }
  }
  if !args.excludes.is_empty() {
    config.exclude_paths.clone_from(&args.excludes);
  }

  Ok(config)
}

fn select_license(config: &mut LicenseConfig, id: &str, store: &LicenseStore) -> Result<()> {
  if id.trim() == PROPRIETARY_ID {
    config.header.title = PROPRIETARY_TITLE.to_string();
    config.header.spdx_id = PROPRIETARY_SPDX_ID.to_string();
    config.header.oss = false;
    config.file_name = PROPRIETARY_SPDX_ID.to_string();
    return Ok(());
  }

  let Some(details) = store.find(id)? else {
    bail!(
      "Unknown license id '{}'. Run `devtools license list` to see the available licenses.",
      id
    );
  };

  debug!("Selected license {} ({})", details.title, details.file_name);
  config.header.title = details.title;
  config.header.spdx_id = details.spdx_id;
  config.header.oss = true;
  config.file_name = details.file_name;
  Ok(())
}

async fn run_apply(args: ApplyArgs, workspace: &Workspace) -> Result<()> {
  let config_store = workspace.config_store();
  let license_store = LicenseStore::new(workspace.licenses_dir());
  let current_year = chrono::Local::now().year().to_string();

  let existing = LicenseConfig::load(&config_store)?;
  let config = resolve_license_config(existing, &args, &license_store, &current_year)?;

  if !args.dry_run {
    config.save(&config_store)?;
    debug!("Saved license config to {}", config_store.path().display());
  }

  let project_root = workspace.project_root().to_path_buf();
  let collector = FileCollector::new(project_root.clone(), &config.exclude_paths)?;
  let files = collector.collect(&config.include_paths)?;
  print_start_message(files.len(), args.dry_run);

  let applier = HeaderApplier::new(&config.header, &ExtensionRegistry::builtin());
  let processor = Processor::new(applier)
    .with_dry_run(args.dry_run)
    .with_diff_manager(DiffManager::new(args.show_diff));

  let result = tokio::task::spawn_blocking(move || processor.process(&files))
    .await
    .context("Header processing task failed")?;

  let categorized = CategorizedReports::from_reports(&result.reports);
  print_applied_files(&categorized.applied, Some(&project_root), args.dry_run);
  print_failed_files(&categorized.failed, Some(&project_root));
  print_summary(&result.summary);

  if args.dry_run && !categorized.applied.is_empty() {
    print_hint("Run without --dry-run to apply the headers.");
  }

  if let Some(ref output_path) = args.report_json {
    let report_generator = ReportGenerator::new(output_path);
    if let Err(e) = report_generator.generate(&result.reports, &result.summary) {
      eprintln!("Error generating JSON report: {}", e);
    } else {
      info_log!("Generated JSON report at {}", output_path.display());
    }
  }

  if result.summary.has_failures() {
    process::exit(1);
  }

  Ok(())
}

async fn run_update(workspace: &Workspace) -> Result<()> {
  let fetcher = LicenseFetcher::new()?;
  info_log!("Fetching the license list...");
  let file_names = fetcher.fetch_file_names().await?;

  let progress = download_progress(file_names.len());
  let licenses = fetcher.fetch_all(&file_names, || progress.inc(1)).await;
  progress.finish_and_clear();
  let licenses = licenses?;

  let store = LicenseStore::new(workspace.licenses_dir());
  let metadata = store.write_all(&licenses)?;
  info_log!("Stored {} licenses in {}", metadata.lic_list.len(), store.dir().display());
  Ok(())
}

fn run_list(workspace: &Workspace) -> Result<()> {
  let metadata = LicenseStore::new(workspace.licenses_dir()).read_metadata()?;
  print_license_table(&metadata.lic_list);

  if metadata.lic_list.is_empty() {
    print_hint("Run `devtools license update` to download the open-source licenses.");
  }
  Ok(())
}

fn run_read(args: &OpenArgs, workspace: &Workspace) -> Result<()> {
  match selected_license(args.license.id.as_deref(), workspace)? {
    SelectedLicense::Proprietary(_) => println!("The builtin proprietary license does not have a webpage."),
    SelectedLicense::Stored(details) => show_url(&details.web_url, args.no_open),
  }
  Ok(())
}

fn run_write(args: &IdArgs, workspace: &Workspace) -> Result<()> {
  let (title, text) = match selected_license(args.id.as_deref(), workspace)? {
    SelectedLicense::Stored(details) => {
      let header = LicenseConfig::load(&workspace.config_store())?.map(|config| config.header);
      let text = fill_license_text(&details.full_text, header.as_ref());
      (details.title, text)
    }
    SelectedLicense::Proprietary(Some(config)) => {
      let header = HeaderConfig {
        title: PROPRIETARY_TITLE.to_string(),
        oss: false,
        ..config.header
      };
      let mut text = HeaderTemplate::Proprietary.render_lines(&header).join("\n");
      text.push('\n');
      (header.title, text)
    }
    SelectedLicense::Proprietary(None) => {
      bail!("The proprietary license needs a copyright holder. Run `devtools license apply --id 0 --holder NAME` first.")
    }
  };

  let path = workspace.project_root().join(LICENSE_FILE_NAME);
  std::fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))?;
  info_log!("Wrote {} to {}", title, path.display());
  Ok(())
}

enum SelectedLicense {
  Proprietary(Option<LicenseConfig>),
  Stored(LicenseDetails),
}

/// The license named by `id`, else the one in the project config.
fn selected_license(id: Option<&str>, workspace: &Workspace) -> Result<SelectedLicense> {
  let store = LicenseStore::new(workspace.licenses_dir());
  let config = LicenseConfig::load(&workspace.config_store())?;

  if let Some(id) = id {
    if id.trim() == PROPRIETARY_ID {
      return Ok(SelectedLicense::Proprietary(config));
    }
    return match store.find(id)? {
      Some(details) => Ok(SelectedLicense::Stored(details)),
      None => bail!(
        "Unknown license id '{}'. Run `devtools license list` to see the available licenses.",
        id
      ),
    };
  }

  let Some(config) = config else {
    bail!("No license is configured for this project. Pass --id to select one.");
  };
  if !config.header.oss || config.file_name == PROPRIETARY_SPDX_ID {
    return Ok(SelectedLicense::Proprietary(Some(config)));
  }

  let details = store
    .read_details(&config.file_name)
    .with_context(|| "Run `devtools license update` to download the license data")?;
  Ok(SelectedLicense::Stored(details))
}

/// Fills the `[year]` and `[fullname]` placeholders of a license text.
fn fill_license_text(text: &str, header: Option<&HeaderConfig>) -> String {
  match header {
    Some(header) if !header.holder.is_empty() => text
      .replace("[year]", &header.year)
      .replace("[fullname]", &header.holder),
    _ => text.to_string(),
  }
}

fn show_url(url: &str, no_open: bool) {
  println!("{}", url);
  if !no_open && !open_url(url) {
    info_log!("Open the page above in your browser.");
  }
}
