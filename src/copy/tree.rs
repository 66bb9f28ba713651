//! Reconstructing a nested tree view from a flat descendant list.
//!
//! Used only for preview and reporting; the live copy recurses against the
//! API directly and never goes through this module.

use std::collections::HashMap;

use super::discovery::PageSummary;

/// A page with its nested children, built from a flat discovery listing.
#[derive(Debug, Clone)]
pub struct TreeNode {
  /// Metadata for the page at this node.
  pub page: PageSummary,
  /// Descendant pages nested under this node.
  pub children: Vec<TreeNode>,
}

/// Group a flat page list by parent linkage into a nested tree.
///
/// Pure and synchronous: no I/O. Pages whose `parent_id` equals `root_id`
/// become top-level nodes, as do orphans whose declared parent is absent from
/// `pages` — an orphan is never silently dropped. Sibling order preserves the
/// input order.
pub fn build_tree(pages: &[PageSummary], root_id: &str) -> Vec<TreeNode> {
  let known_ids: std::collections::HashSet<&str> = pages.iter().map(|p| p.id.as_str()).collect();

  let mut by_parent: HashMap<&str, Vec<&PageSummary>> = HashMap::new();
  let mut top_level: Vec<&PageSummary> = Vec::new();

  for page in pages {
    match page.parent_id.as_deref() {
      Some(parent) if parent != root_id && known_ids.contains(parent) => {
        by_parent.entry(parent).or_default().push(page);
      }
      // Parent is the root, unset, or missing from the listing: top level.
      _ => top_level.push(page),
    }
  }

  top_level.into_iter().map(|page| attach_children(page, &by_parent)).collect()
}

fn attach_children(page: &PageSummary, by_parent: &HashMap<&str, Vec<&PageSummary>>) -> TreeNode {
  let children = by_parent
    .get(page.id.as_str())
    .map(|nested| nested.iter().map(|child| attach_children(child, by_parent)).collect())
    .unwrap_or_default();

  TreeNode {
    page: page.clone(),
    children,
  }
}

/// Total node count across a forest of trees.
pub fn count_nodes(nodes: &[TreeNode]) -> usize {
  nodes.iter().map(|n| 1 + count_nodes(&n.children)).sum()
}
