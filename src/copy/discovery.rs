//! Read-only discovery of a page's descendant subtree.
//!
//! Discovery walks the child-listing API and flattens the result into a list
//! of [`PageSummary`] records annotated with parent linkage. It backs the
//! preview paths (`ls` and `copy-tree --dry-run`); the live copy re-derives
//! children itself while it writes.

use std::collections::HashSet;
use std::future::Future;
use std::pin::Pin;

use tracing::{debug, warn};

use super::patterns::{ExclusionPattern, matches_any};
use crate::confluence::ConfluenceApi;
use crate::confluence::models::Page;

/// Identifying metadata for a discovered or created page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary {
  /// Opaque repository-assigned identifier.
  pub id: String,
  /// Human-readable title.
  pub title: String,
  /// Key of the containing space, when known.
  pub space_key: Option<String>,
  /// Direct parent id; `None` only for a traversal root.
  pub parent_id: Option<String>,
}

impl PageSummary {
  /// Build a summary from an API page record, linked to `parent_id`.
  pub fn from_page(page: &Page, parent_id: Option<&str>) -> Self {
    Self {
      id: page.id.clone(),
      title: page.title.clone(),
      space_key: page.space_key().map(str::to_string),
      parent_id: parent_id.map(str::to_string),
    }
  }
}

/// Collect every descendant of `root_id` down to `max_depth` levels, skipping
/// excluded titles and their entire subtrees.
///
/// `max_depth` counts levels below the root: 0 collects nothing, 1 collects
/// only direct children. The root itself is never included. Sibling order
/// follows the listing order of the API; ordering across depths is not
/// guaranteed.
///
/// A failed child listing omits that node's subtree from the result with a
/// logged warning rather than failing the discovery. Excluded pages are
/// skipped before their children are listed, so a dry-run count matches what
/// a live copy would create.
pub async fn discover_descendants(
  api: &dyn ConfluenceApi,
  root_id: &str,
  max_depth: usize,
  exclude: &[ExclusionPattern],
) -> Vec<PageSummary> {
  let mut collected = Vec::new();
  let mut visited = HashSet::new();
  visited.insert(root_id.to_string());
  collect_level(api, root_id, 0, max_depth, exclude, &mut visited, &mut collected).await;
  collected
}

/// Recursive helper listing one generation of children at a time.
#[allow(clippy::too_many_arguments)]
fn collect_level<'a>(
  api: &'a dyn ConfluenceApi,
  parent_id: &'a str,
  depth: usize,
  max_depth: usize,
  exclude: &'a [ExclusionPattern],
  visited: &'a mut HashSet<String>,
  collected: &'a mut Vec<PageSummary>,
) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
  Box::pin(async move {
    if depth >= max_depth {
      return;
    }

    let children = match api.get_child_pages(parent_id).await {
      Ok(children) => children,
      Err(e) => {
        warn!("Failed to list children of page {parent_id}, omitting subtree: {e}");
        return;
      }
    };

    for child in children {
      if !visited.insert(child.id.clone()) {
        warn!("Circular reference at page {}, skipping", child.id);
        continue;
      }

      if matches_any(&child.title, exclude) {
        debug!("Excluding '{}' (id {}) and its subtree", child.title, child.id);
        continue;
      }

      collected.push(PageSummary::from_page(&child, Some(parent_id)));
      collect_level(api, &child.id, depth + 1, max_depth, exclude, visited, collected).await;
    }
  })
}
