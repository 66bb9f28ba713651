//! `copy-tree` subcommand: replicate a page subtree under a new parent.
//!
//! The handler resolves both page references, builds the API client, and
//! either previews the copy (`--dry-run`) or drives the live replication
//! engine and reports the outcome.

use std::process;
use std::time::Duration;

use anyhow::{Context, Result, bail};

use crate::cli::{Cli, CopyTreeArgs};
use crate::color::ColorScheme;
use crate::commands::auth::load_credentials;
use crate::commands::ls::format_forest_lines;
use crate::confluence::{self, ConfluenceApi};
use crate::copy::{CopyOptions, CopyReport, build_tree, copy_tree, count_nodes, discover_descendants, parse_patterns};

/// Maximum failure entries printed before truncating the list.
const MAX_REPORTED_FAILURES: usize = 10;

/// Execute the `copy-tree` subcommand.
pub(crate) async fn handle_copy_tree_command(args: &CopyTreeArgs, cli: &Cli, colors: &ColorScheme) {
  match run_copy_tree_command(args, cli, colors).await {
    Ok(had_failures) => {
      if had_failures && args.fail_on_error {
        process::exit(1);
      }
    }
    Err(error) => {
      eprintln!("{} {}", colors.error("✗"), colors.error("Failed to copy page tree"));
      eprintln!("  {}: {:#}", colors.emphasis("Error"), error);
      process::exit(1);
    }
  }
}

/// Run the copy and report it. Returns whether any individual page failed.
async fn run_copy_tree_command(args: &CopyTreeArgs, cli: &Cli, colors: &ColorScheme) -> Result<bool> {
  println!("{} {}", colors.progress("→"), colors.info("Copying page tree"));

  let source = confluence::resolve_page_locator(&args.source, cli.auth.url.as_deref())
    .context("Could not determine source page")?;
  let target = confluence::resolve_page_locator(&args.target_parent, cli.auth.url.as_deref())
    .context("Could not determine target parent page")?;

  if source.base_url != target.base_url {
    bail!(
      "Source and target must be on the same Confluence instance ({} vs {})",
      source.base_url,
      target.base_url
    );
  }

  let options = CopyOptions {
    max_depth: args.max_depth,
    exclude: args.exclude.as_deref().map(parse_patterns).unwrap_or_default(),
    delay: Duration::from_millis(args.delay_ms),
    copy_suffix: args.copy_suffix.clone(),
    quiet: cli.behavior.quiet,
  };

  println!("  {}: {}", colors.emphasis("Source"), colors.number(&source.page_id));
  println!("  {}: {}", colors.emphasis("Target parent"), colors.number(&target.page_id));
  if let Some(title) = &args.new_title {
    println!("  {}: {}", colors.emphasis("New title"), colors.emphasis(title));
  }
  println!("  {}: {}", colors.emphasis("Max depth"), colors.number(options.max_depth));
  if !options.exclude.is_empty() {
    println!(
      "  {}: {}",
      colors.emphasis("Excluding"),
      options.exclude.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", ")
    );
  }

  let (username, token) = load_credentials(&source.base_url, cli)
    .context("Failed to resolve credentials. Provide --user/--token, env vars, or configure ~/.netrc")?;

  println!("\n{} {}", colors.info("→"), colors.info("Connecting to Confluence"));
  let client = confluence::ConfluenceClient::new(
    &source.base_url,
    &username,
    &token,
    cli.performance.timeout,
    cli.performance.rate_limit,
  )
  .context("Unable to construct Confluence API client")?;

  if args.dry_run {
    preview_copy(&client, &source.page_id, args.new_title.as_deref(), &options, colors).await?;
    return Ok(false);
  }

  println!("{} {}", colors.info("→"), colors.info("Copying pages"));

  let progress = |line: &str| {
    println!("  {} {}", colors.progress("•"), line);
  };

  let report = copy_tree(
    &client,
    &source.page_id,
    &target.page_id,
    args.new_title.as_deref(),
    &options,
    Some(&progress),
  )
  .await?;

  print_report(&report, colors);

  Ok(!report.failures.is_empty())
}

/// Preview the copy without issuing any writes: discover the filtered
/// subtree, then print the planned root title and tree.
async fn preview_copy(
  client: &dyn ConfluenceApi,
  source_page_id: &str,
  new_title: Option<&str>,
  options: &CopyOptions,
  colors: &ColorScheme,
) -> Result<()> {
  println!(
    "\n{} {}",
    colors.warning("⚠"),
    colors.warning("DRY RUN: No pages will be created")
  );

  let root = client
    .get_page(source_page_id)
    .await
    .with_context(|| format!("Failed to read source page {source_page_id}"))?;

  let planned_title = match new_title {
    Some(title) => title.to_string(),
    None => format!("{}{}", root.title, options.copy_suffix),
  };

  let descendants = discover_descendants(client, source_page_id, options.max_depth, &options.exclude).await;
  let forest = build_tree(&descendants, source_page_id);
  let total = 1 + count_nodes(&forest);

  println!(
    "\n{} Would copy {} {}",
    colors.info("→"),
    colors.number(total),
    if total == 1 { "page" } else { "pages" }
  );
  println!(
    "  {} {}",
    colors.emphasis(&planned_title),
    colors.dimmed(format!("[from id {}]", root.id))
  );
  for line in format_forest_lines(&forest, colors) {
    println!("  {line}");
  }

  Ok(())
}

/// Print the final copy report: totals, then a truncated failure list.
fn print_report(report: &CopyReport, colors: &ColorScheme) {
  println!(
    "\n{} {}",
    colors.success("✓"),
    colors.success(format!(
      "Copied {} {}",
      report.total_copied(),
      if report.total_copied() == 1 { "page" } else { "pages" }
    ))
  );
  println!(
    "  {}: {} {}",
    colors.emphasis("New root"),
    colors.emphasis(&report.root.title),
    colors.dimmed(format!("[id {}]", report.root.id))
  );

  if report.failures.is_empty() {
    return;
  }

  println!(
    "\n{} {}",
    colors.warning("⚠"),
    colors.warning(format!(
      "{} {} failed to copy",
      report.failures.len(),
      if report.failures.len() == 1 { "page" } else { "pages" }
    ))
  );

  for failure in report.failures.iter().take(MAX_REPORTED_FAILURES) {
    let status = failure
      .status
      .map(|code| format!(" [{code}]"))
      .unwrap_or_default();
    println!(
      "  {} {} {}{}: {}",
      colors.error("✗"),
      colors.emphasis(&failure.title),
      colors.dimmed(format!("(id {})", failure.source_page_id)),
      colors.dimmed(status),
      failure.error
    );
  }

  let remainder = report.failures.len().saturating_sub(MAX_REPORTED_FAILURES);
  if remainder > 0 {
    println!(
      "  {}",
      colors.dimmed(format!(
        "... and {remainder} more {}",
        if remainder == 1 { "failure" } else { "failures" }
      ))
    );
  }
}
