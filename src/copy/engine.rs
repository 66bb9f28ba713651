//! The live replication engine.
//!
//! `copy_tree` copies a source page and its descendant subtree under a new
//! parent, one page at a time, preserving the source hierarchy. Individual
//! page failures are recorded and traversal continues with the remaining
//! siblings; only a failure to create the root copy aborts the operation.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::warn;

use super::discovery::PageSummary;
use super::patterns::{ExclusionPattern, matches_any};
use crate::confluence::{ApiError, ConfluenceApi};

/// Observational sink for human-readable status lines. Never affects control
/// flow.
pub type ProgressFn<'p> = dyn Fn(&str) + Send + Sync + 'p;

/// Policy options for one copy operation.
#[derive(Debug, Clone)]
pub struct CopyOptions {
  /// Maximum depth of descendants to copy; 0 copies only the root.
  pub max_depth: usize,
  /// Title patterns excluding a page and its entire subtree.
  pub exclude: Vec<ExclusionPattern>,
  /// Pacing delay between sibling writes.
  pub delay: Duration,
  /// Appended to the source title when no explicit new title is given.
  pub copy_suffix: String,
  /// Suppress progress line emission.
  pub quiet: bool,
}

impl Default for CopyOptions {
  fn default() -> Self {
    Self {
      max_depth: 10,
      exclude: Vec::new(),
      delay: Duration::from_millis(100),
      copy_suffix: " (Copy)".to_string(),
      quiet: false,
    }
  }
}

/// A source page that could not be copied.
#[derive(Debug, Clone)]
pub struct CopyFailure {
  /// Identifier of the source page.
  pub source_page_id: String,
  /// Title of the source page.
  pub title: String,
  /// Human-readable failure description.
  pub error: String,
  /// HTTP status code, when the failure carried one.
  pub status: Option<u16>,
}

/// Aggregate outcome of one copy operation.
///
/// A partially completed copy is a valid terminal state; nothing is ever
/// rolled back.
#[derive(Debug, Clone)]
pub struct CopyReport {
  /// The newly created root page.
  pub root: PageSummary,
  /// Every successfully created page, root first. Every entry other than the
  /// root has a parent that is also present here.
  pub copied: Vec<PageSummary>,
  /// Source pages that failed to copy. Disjoint from `copied` by source id.
  pub failures: Vec<CopyFailure>,
}

impl CopyReport {
  /// Number of pages created, including the root.
  pub fn total_copied(&self) -> usize {
    self.copied.len()
  }
}

/// Copy the page `source_root_id` and its descendants under
/// `target_parent_id`.
///
/// The root copy is created in the source page's space with the source body
/// verbatim, titled `new_title` when given or the source title plus
/// `copy_suffix` otherwise. Descendants are then copied one generation at a
/// time, each under its parent's freshly created copy, skipping excluded
/// subtrees and pacing sibling writes by `options.delay`.
///
/// Per-page failures below the root are recorded in the report and that
/// page's subtree is skipped; traversal continues with the next sibling.
///
/// # Errors
/// Fails only when the source root cannot be read or its copy cannot be
/// created; in that case there is no partial result to return.
pub async fn copy_tree(
  api: &dyn ConfluenceApi,
  source_root_id: &str,
  target_parent_id: &str,
  new_title: Option<&str>,
  options: &CopyOptions,
  progress: Option<&ProgressFn<'_>>,
) -> Result<CopyReport> {
  let source = api
    .get_page(source_root_id)
    .await
    .with_context(|| format!("Failed to read source page {source_root_id}"))?;

  let space_key = match source.space_key() {
    Some(key) => key.to_string(),
    None => api
      .get_page_space(source_root_id)
      .await
      .with_context(|| format!("Failed to resolve space for source page {source_root_id}"))?,
  };

  let title = effective_title(&source.title, new_title, &options.copy_suffix);
  let content = source.storage_value().unwrap_or_default();

  // Root creation is deliberately outside the continue-on-error policy:
  // without a root copy there is nothing to recurse from.
  let created = api
    .create_child_page(&title, &space_key, Some(target_parent_id), content)
    .await
    .with_context(|| format!("Failed to create root copy '{title}' under page {target_parent_id}"))?;

  let root = PageSummary {
    id: created.id.clone(),
    title: created.title.clone(),
    space_key: Some(space_key.clone()),
    parent_id: Some(target_parent_id.to_string()),
  };

  emit(progress, options, &format!("Created '{}' (id {})", root.title, root.id));

  let mut report = CopyReport {
    copied: vec![root.clone()],
    failures: Vec::new(),
    root,
  };

  let new_root_id = report.root.id.clone();
  copy_children(
    api,
    source_root_id,
    &new_root_id,
    &space_key,
    0,
    options,
    progress,
    &mut report,
  )
  .await;

  Ok(report)
}

/// Compute the title for the root copy.
fn effective_title(source_title: &str, new_title: Option<&str>, copy_suffix: &str) -> String {
  match new_title {
    Some(title) => title.to_string(),
    None => format!("{source_title}{copy_suffix}"),
  }
}

/// Copy one generation of children of `source_id` under `target_id`, then
/// recurse into each successfully created copy.
#[allow(clippy::too_many_arguments)]
fn copy_children<'a>(
  api: &'a dyn ConfluenceApi,
  source_id: &'a str,
  target_id: &'a str,
  space_key: &'a str,
  depth: usize,
  options: &'a CopyOptions,
  progress: Option<&'a ProgressFn<'a>>,
  report: &'a mut CopyReport,
) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
  Box::pin(async move {
    if depth >= options.max_depth {
      return;
    }

    let children = match api.get_child_pages(source_id).await {
      Ok(children) => children,
      Err(e) => {
        warn!("Failed to list children of page {source_id}, skipping subtree: {e}");
        return;
      }
    };

    let generation_size = children.len();
    for (index, child) in children.into_iter().enumerate() {
      if matches_any(&child.title, &options.exclude) {
        emit(
          progress,
          options,
          &format!("Skipping '{}' (matches exclusion pattern)", child.title),
        );
        continue;
      }

      let content = match api.get_page(&child.id).await {
        Ok(page) => page.storage_value().unwrap_or_default().to_string(),
        Err(e) => {
          record_failure(report, &child.id, &child.title, &e);
          continue;
        }
      };

      match api.create_child_page(&child.title, space_key, Some(target_id), &content).await {
        Ok(created) => {
          let copy = PageSummary {
            id: created.id.clone(),
            title: created.title.clone(),
            space_key: Some(space_key.to_string()),
            parent_id: Some(target_id.to_string()),
          };
          emit(progress, options, &format!("Copied '{}' (id {})", copy.title, copy.id));
          report.copied.push(copy);

          copy_children(
            api,
            &child.id,
            &created.id,
            space_key,
            depth + 1,
            options,
            progress,
            report,
          )
          .await;

          // Pace sibling writes; never after the last sibling and never
          // across depth transitions.
          if index + 1 < generation_size && !options.delay.is_zero() {
            tokio::time::sleep(options.delay).await;
          }
        }
        Err(e) => {
          // Subtree-terminal: a failed node's descendants are never
          // attempted, so the new tree gets no orphaned fragments.
          record_failure(report, &child.id, &child.title, &e);
        }
      }
    }
  })
}

fn record_failure(report: &mut CopyReport, source_page_id: &str, title: &str, error: &ApiError) {
  report.failures.push(CopyFailure {
    source_page_id: source_page_id.to_string(),
    title: title.to_string(),
    error: error.to_string(),
    status: error.status(),
  });
}

fn emit(progress: Option<&ProgressFn<'_>>, options: &CopyOptions, line: &str) {
  if options.quiet {
    return;
  }
  if let Some(sink) = progress {
    sink(line);
  }
}
