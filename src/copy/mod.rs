//! Page-tree replication: exclusion patterns, read-only discovery, the
//! preview tree builder, and the live copy engine.

pub mod discovery;
pub mod engine;
pub mod patterns;
pub mod tree;

pub use discovery::{PageSummary, discover_descendants};
pub use engine::{CopyFailure, CopyOptions, CopyReport, ProgressFn, copy_tree};
pub use patterns::{ExclusionPattern, matches_any, parse_patterns};
pub use tree::{TreeNode, build_tree, count_nodes};
