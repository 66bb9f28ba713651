//! Command-line interface definitions for confluence-cp.
//!
//! This module defines the CLI structure using clap derives and dispatches
//! parsed commands to their handlers.

use std::process;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;
use url::Url;

use crate::color::ColorScheme;
use crate::commands::auth::handle_auth_command;
use crate::commands::completions::handle_completions_command;
use crate::commands::copy::handle_copy_tree_command;
use crate::commands::ls::handle_ls_command;
use crate::commands::version::handle_version_command;

/// confluence-cp - Replicate Confluence page trees
#[derive(Debug, Parser)]
#[command(
  name = "confluence-cp",
  version,
  about = "Copy Confluence page trees to a new location",
  long_about = "A command-line tool for copying a Confluence page and its entire descendant\n\
                subtree under a different parent, preserving hierarchy, with glob-style\n\
                title exclusions, write pacing, and continue-on-error reporting.",
  styles = get_clap_styles()
)]
pub struct Cli {
  /// Subcommand to execute
  #[command(subcommand)]
  pub command: Command,

  /// Authentication options
  #[command(flatten)]
  pub auth: AuthOptions,

  /// Behavior options
  #[command(flatten)]
  pub behavior: BehaviorOptions,

  /// Performance options
  #[command(flatten)]
  pub performance: PerformanceOptions,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
  /// Copy a page and its descendant subtree under a new parent
  CopyTree(CopyTreeArgs),

  /// Print the page tree below a page without copying anything
  Ls {
    /// Page URL or numeric page ID whose descendants should be displayed
    #[arg(value_name = "PAGE_URL_OR_ID")]
    target: String,

    /// Maximum depth when traversing children (default 10)
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,

    /// Comma-separated glob patterns; matching titles (and their subtrees) are hidden
    #[arg(long, value_name = "PATTERNS")]
    exclude: Option<String>,
  },

  /// Authentication testing and inspection
  Auth {
    #[command(subcommand)]
    subcommand: AuthCommand,
  },

  /// Display version and build information
  Version {
    /// Output in JSON format
    #[arg(long)]
    json: bool,

    /// Show only version number
    #[arg(long)]
    short: bool,
  },

  /// Generate shell completion scripts
  Completions {
    /// Target shell for completions
    #[arg(value_enum)]
    shell: Shell,
  },
}

/// Arguments for the `copy-tree` subcommand.
#[derive(Debug, Args)]
pub struct CopyTreeArgs {
  /// Source page URL or numeric page ID whose subtree should be copied
  #[arg(value_name = "SOURCE")]
  pub source: String,

  /// Page URL or numeric page ID the copy is created under
  #[arg(value_name = "TARGET_PARENT")]
  pub target_parent: String,

  /// Title for the copied root (defaults to the source title plus the copy suffix)
  #[arg(value_name = "NEW_TITLE")]
  pub new_title: Option<String>,

  /// Maximum depth of descendants to copy (0 copies only the root page)
  #[arg(long, value_name = "N", default_value_t = 10)]
  pub max_depth: usize,

  /// Comma-separated glob patterns; matching titles (and their subtrees) are skipped
  #[arg(long, value_name = "PATTERNS")]
  pub exclude: Option<String>,

  /// Delay between sibling page writes, in milliseconds
  #[arg(long, value_name = "MS", default_value_t = 100)]
  pub delay_ms: u64,

  /// Suffix appended to the source title when NEW_TITLE is not given
  #[arg(long, value_name = "TEXT", default_value = " (Copy)")]
  pub copy_suffix: String,

  /// Show what would be copied without creating any pages
  #[arg(long)]
  pub dry_run: bool,

  /// Exit non-zero when any page failed to copy
  #[arg(long)]
  pub fail_on_error: bool,
}

/// Auth subcommands
#[derive(Debug, Subcommand)]
pub enum AuthCommand {
  /// Test the configured credentials against the Confluence API
  Test,
  /// Show the currently detected credential sources
  Show,
}

/// Shells supported for completion generation
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum Shell {
  Bash,
  Zsh,
  Fish,
  Powershell,
  Elvish,
}

/// Normalize a URL by adding https:// if no scheme is present
fn normalize_url(url: &str) -> Result<String, String> {
  let trimmed = url.trim();

  let parsed = match Url::parse(trimmed) {
    Ok(parsed) => parsed,
    Err(_) => {
      // Failed to parse, likely missing scheme
      let with_https = format!("https://{trimmed}");
      Url::parse(&with_https).map_err(|e| format!("Invalid URL: {e}"))?
    }
  };

  let mut url_str = parsed.to_string();
  if url_str.ends_with('/') && url_str.len() > 1 {
    url_str.pop();
  }

  Ok(url_str)
}

/// Authentication options
#[derive(Debug, Args)]
pub struct AuthOptions {
  /// Confluence base URL
  #[arg(long, env = "CONFLUENCE_URL", value_name = "URL", value_parser = normalize_url, global = true)]
  pub url: Option<String>,

  /// Confluence user email
  #[arg(long, env = "CONFLUENCE_USER", value_name = "EMAIL", global = true)]
  pub user: Option<String>,

  /// Confluence API token
  #[arg(long, env = "CONFLUENCE_TOKEN", value_name = "TOKEN", global = true)]
  pub token: Option<String>,
}

/// Behavior options
#[derive(Debug, Args)]
pub struct BehaviorOptions {
  /// Increase verbosity (-v info, -vv debug, -vvv trace)
  #[arg(short, long, action = clap::ArgAction::Count, global = true)]
  pub verbose: u8,

  /// Suppress progress output
  #[arg(short, long, conflicts_with = "verbose", global = true)]
  pub quiet: bool,

  /// Colorize output
  #[arg(long, value_enum, default_value = "auto", value_name = "WHEN", global = true)]
  pub color: ColorOption,
}

/// Color output options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ColorOption {
  Auto,
  Always,
  Never,
}

/// Performance options
#[derive(Debug, Args)]
pub struct PerformanceOptions {
  /// Max requests per second
  #[arg(long, default_value = "10", value_name = "N", global = true)]
  pub rate_limit: usize,

  /// Request timeout in seconds
  #[arg(long, default_value = "30", value_name = "SECONDS", global = true)]
  pub timeout: u64,
}

impl Cli {
  /// Parse CLI arguments from the environment
  pub fn parse_args() -> Self {
    let mut cli = Self::parse();

    // Normalize URL: add https:// if no scheme is present
    if let Some(url) = &cli.auth.url
      && !url.contains("://")
    {
      cli.auth.url = Some(format!("https://{url}"));
    }

    cli
  }

  /// Validate CLI arguments
  ///
  /// Returns an error if the CLI configuration is invalid.
  pub fn validate(&self) -> Result<(), String> {
    if self.performance.rate_limit == 0 {
      return Err("--rate-limit must be at least 1 request per second".to_string());
    }

    if let Command::CopyTree(args) = &self.command
      && args.source == args.target_parent
    {
      return Err("SOURCE and TARGET_PARENT must refer to different pages".to_string());
    }

    Ok(())
  }
}

/// Parse CLI arguments, initialize shared services, and dispatch to the chosen
/// command.
pub async fn run() {
  let cli = Cli::parse_args();

  init_tracing(&cli.behavior);

  // Create color scheme based on user preference
  let colors = ColorScheme::new(cli.behavior.color);

  // Validate CLI arguments
  if let Err(e) = cli.validate() {
    eprintln!("{} {}", colors.error("Error:"), e);
    process::exit(4); // Invalid arguments exit code
  }

  match &cli.command {
    Command::CopyTree(args) => {
      handle_copy_tree_command(args, &cli, &colors).await;
    }
    Command::Ls {
      target,
      max_depth,
      exclude,
    } => {
      handle_ls_command(target, *max_depth, exclude.as_deref(), &cli, &colors).await;
    }
    Command::Auth { subcommand } => {
      handle_auth_command(subcommand, &cli, &colors).await;
    }
    Command::Version { json, short } => {
      handle_version_command(*json, *short, &colors);
    }
    Command::Completions { shell } => {
      handle_completions_command(*shell);
    }
  }
}

fn init_tracing(behavior: &BehaviorOptions) {
  let level = if behavior.quiet {
    LevelFilter::ERROR
  } else {
    match behavior.verbose {
      0 => LevelFilter::WARN,
      1 => LevelFilter::INFO,
      2 => LevelFilter::DEBUG,
      _ => LevelFilter::TRACE,
    }
  };

  let env_filter = EnvFilter::builder()
    .with_default_directive(level.into())
    .from_env_lossy();

  let _ = tracing_subscriber::fmt()
    .with_env_filter(env_filter)
    .with_target(false)
    .with_writer(std::io::stderr)
    .try_init();
}

/// Get custom styles for clap help output
fn get_clap_styles() -> clap::builder::Styles {
  use clap::builder::styling::{AnsiColor, Effects};

  clap::builder::Styles::styled()
    .header(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .usage(AnsiColor::BrightYellow.on_default() | Effects::BOLD)
    .literal(AnsiColor::BrightGreen.on_default())
    .placeholder(AnsiColor::BrightCyan.on_default())
    .error(AnsiColor::BrightRed.on_default() | Effects::BOLD)
    .valid(AnsiColor::BrightGreen.on_default())
    .invalid(AnsiColor::BrightRed.on_default())
}
