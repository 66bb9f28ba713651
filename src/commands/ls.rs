//! `ls` subcommand for printing Confluence page hierarchies.
//!
//! This module powers `confluence-cp ls`, which connects to Confluence,
//! discovers the descendant pages of a target page, and renders the hierarchy
//! in a friendly ASCII tree without writing anything.

use std::process;

use anyhow::{Context, Result};

use crate::cli::Cli;
use crate::color::ColorScheme;
use crate::commands::auth::load_credentials;
use crate::confluence::{self, ConfluenceApi};
use crate::copy::{TreeNode, build_tree, count_nodes, discover_descendants, parse_patterns};

/// Default traversal depth when `--max-depth` is not given.
const DEFAULT_LS_DEPTH: usize = 10;

/// Execute the `ls` subcommand to display a page tree.
///
/// # Arguments
/// * `target` - Page URL or numeric page ID supplied on the CLI.
/// * `max_depth` - Optional traversal depth limit (0 lists only the root).
/// * `exclude` - Optional comma-separated glob patterns hiding matching
///   titles and their subtrees.
/// * `cli` - Top-level CLI options for auth, behavior, and networking.
/// * `colors` - Shared color palette used to render terminal output.
pub(crate) async fn handle_ls_command(
  target: &str,
  max_depth: Option<usize>,
  exclude: Option<&str>,
  cli: &Cli,
  colors: &ColorScheme,
) {
  if let Err(error) = run_ls_command(target, max_depth, exclude, cli, colors).await {
    eprintln!("{} {}", colors.error("✗"), colors.error("Failed to list page tree"));
    eprintln!("  {}: {}", colors.emphasis("Error"), error);
    process::exit(1);
  }
}

async fn run_ls_command(
  target: &str,
  max_depth: Option<usize>,
  exclude: Option<&str>,
  cli: &Cli,
  colors: &ColorScheme,
) -> Result<()> {
  println!("{} {}", colors.progress("→"), colors.info("Inspecting page tree"));

  let locator = confluence::resolve_page_locator(target, cli.auth.url.as_deref())
    .context("Could not determine page identifier")?;
  let max_depth = max_depth.unwrap_or(DEFAULT_LS_DEPTH);
  let patterns = exclude.map(parse_patterns).unwrap_or_default();

  println!("  {}: {}", colors.emphasis("Base URL"), colors.link(&locator.base_url));
  println!("  {}: {}", colors.emphasis("Page ID"), colors.number(&locator.page_id));
  println!("  {}: {}", colors.emphasis("Max depth"), colors.number(max_depth));
  if !patterns.is_empty() {
    println!(
      "  {}: {}",
      colors.emphasis("Excluding"),
      patterns.iter().map(|p| p.as_str()).collect::<Vec<_>>().join(", ")
    );
  }

  let (username, token) = load_credentials(&locator.base_url, cli)
    .context("Failed to resolve credentials. Provide --user/--token, env vars, or configure ~/.netrc")?;

  println!("\n{} {}", colors.info("→"), colors.info("Connecting to Confluence"));
  let client = confluence::ConfluenceClient::new(
    &locator.base_url,
    &username,
    &token,
    cli.performance.timeout,
    cli.performance.rate_limit,
  )
  .context("Unable to construct Confluence API client")?;

  let root = client.get_page(&locator.page_id).await?;

  println!("{} {}", colors.info("→"), colors.info("Discovering descendants"));
  let descendants = discover_descendants(&client, &locator.page_id, max_depth, &patterns).await;
  let forest = build_tree(&descendants, &locator.page_id);

  let total_pages = 1 + count_nodes(&forest);
  println!(
    "  {} {}",
    colors.success("✓"),
    colors.info(format!(
      "Found {} {}",
      colors.number(total_pages),
      if total_pages == 1 { "page" } else { "pages" }
    ))
  );

  println!("\n{}", colors.emphasis("Page Tree"));
  println!(
    "  {} {}",
    colors.emphasis(&root.title),
    colors.dimmed(format!("[id {}]", root.id))
  );
  for line in format_forest_lines(&forest, colors) {
    println!("  {line}");
  }

  Ok(())
}

/// Render a forest of tree nodes as `ls -R`-like ASCII art lines.
pub(crate) fn format_forest_lines(forest: &[TreeNode], colors: &ColorScheme) -> Vec<String> {
  let mut lines = Vec::new();
  for (idx, node) in forest.iter().enumerate() {
    format_node_lines(node, String::new(), idx + 1 == forest.len(), colors, &mut lines);
  }
  lines
}

fn format_node_lines(node: &TreeNode, prefix: String, is_last: bool, colors: &ColorScheme, lines: &mut Vec<String>) {
  let connector = if is_last {
    format!("{prefix}└── ")
  } else {
    format!("{prefix}├── ")
  };

  lines.push(format!(
    "{}{} {}",
    connector,
    colors.emphasis(&node.page.title),
    colors.dimmed(format!("[id {}]", node.page.id))
  ));

  let next_prefix = if is_last {
    format!("{prefix}    ")
  } else {
    format!("{prefix}│   ")
  };

  for (idx, child) in node.children.iter().enumerate() {
    let child_is_last = idx + 1 == node.children.len();
    format_node_lines(child, next_prefix.clone(), child_is_last, colors, lines);
  }
}
