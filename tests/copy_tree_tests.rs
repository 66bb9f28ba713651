//! Integration tests for the live replication engine, driven by the fake
//! Confluence client.

mod common;

use std::sync::Mutex;
use std::time::Duration;

use common::fake_confluence::FakeConfluenceClient;
use confluence_cp::copy::{CopyOptions, copy_tree, parse_patterns};

/// Options with pacing disabled so tests run instantly.
fn fast_options() -> CopyOptions {
  CopyOptions {
    delay: Duration::ZERO,
    ..CopyOptions::default()
  }
}

/// A -> [B, C], B -> [D], plus a target parent page 99.
fn sample_tree() -> FakeConfluenceClient {
  let mut client = FakeConfluenceClient::new();
  client.add_page("1", "Docs", "<p>root</p>");
  client.add_page("2", "Guide", "<p>guide</p>");
  client.add_page("3", "Reference", "<p>reference</p>");
  client.add_page("4", "Setup", "<p>setup</p>");
  client.add_page("99", "Archive", "<p>archive</p>");
  client.set_children("1", &["2", "3"]);
  client.set_children("2", &["4"]);
  client
}

#[tokio::test]
async fn copies_whole_tree_with_hierarchy_preserved() {
  let client = sample_tree();

  let report = copy_tree(&client, "1", "99", None, &fast_options(), None).await.unwrap();

  assert!(report.failures.is_empty());
  assert_eq!(report.total_copied(), 4);

  let titles: Vec<&str> = report.copied.iter().map(|p| p.title.as_str()).collect();
  assert_eq!(titles, vec!["Docs (Copy)", "Guide", "Reference", "Setup"]);

  // The root copy hangs off the requested target parent.
  let root = client.created_by_id(&report.root.id).unwrap();
  assert_eq!(root.parent_id.as_deref(), Some("99"));
  assert_eq!(root.space_key, "DOCS");
  assert_eq!(root.content, "<p>root</p>");

  // Every other copy's actual parent is the copy of its source parent.
  let guide = &report.copied[1];
  let setup = &report.copied[3];
  assert_eq!(guide.parent_id.as_deref(), Some(report.root.id.as_str()));
  assert_eq!(setup.parent_id.as_deref(), Some(guide.id.as_str()));
  assert_eq!(
    client.created_by_id(&setup.id).unwrap().parent_id.as_deref(),
    Some(guide.id.as_str())
  );
}

#[tokio::test]
async fn hierarchy_invariant_holds_for_every_copied_page() {
  let client = sample_tree();

  let report = copy_tree(&client, "1", "99", None, &fast_options(), None).await.unwrap();

  let copied_ids: Vec<&str> = report.copied.iter().map(|p| p.id.as_str()).collect();
  for page in report.copied.iter().skip(1) {
    let parent = page.parent_id.as_deref().unwrap();
    assert!(
      copied_ids.contains(&parent),
      "parent of '{}' missing from copied set",
      page.title
    );
  }
}

#[tokio::test]
async fn content_is_copied_verbatim() {
  let mut client = FakeConfluenceClient::new();
  client.add_page("1", "Macros", r#"<ac:structured-macro ac:name="toc"/>"#);
  client.add_page("99", "Target", "");

  let report = copy_tree(&client, "1", "99", None, &fast_options(), None).await.unwrap();

  let created = client.created_by_id(&report.root.id).unwrap();
  assert_eq!(created.content, r#"<ac:structured-macro ac:name="toc"/>"#);
}

#[tokio::test]
async fn exclusion_is_subtree_absorbing() {
  let mut client = FakeConfluenceClient::new();
  client.add_page("1", "Docs", "");
  client.add_page("2", "Temp Notes", "");
  client.add_page("3", "Reference", "");
  client.add_page("4", "Nested Under Temp", "");
  client.add_page("99", "Archive", "");
  client.set_children("1", &["2", "3"]);
  client.set_children("2", &["4"]);

  let options = CopyOptions {
    exclude: parse_patterns("temp*"),
    ..fast_options()
  };
  let report = copy_tree(&client, "1", "99", None, &options, None).await.unwrap();

  let titles: Vec<&str> = report.copied.iter().map(|p| p.title.as_str()).collect();
  assert_eq!(titles, vec!["Docs (Copy)", "Reference"]);

  // The excluded page and its descendant appear in neither list.
  assert!(report.failures.is_empty());
  assert!(!client.created_pages().iter().any(|p| p.title.contains("Temp")));
}

#[tokio::test]
async fn failure_is_subtree_terminal_not_traversal_terminal() {
  let mut client = sample_tree();
  client.fail_create_for_title("Guide", 403, "create permission denied");

  let report = copy_tree(&client, "1", "99", None, &fast_options(), None).await.unwrap();

  // Guide failed, Reference still copied, Setup (under Guide) never attempted.
  let titles: Vec<&str> = report.copied.iter().map(|p| p.title.as_str()).collect();
  assert_eq!(titles, vec!["Docs (Copy)", "Reference"]);

  assert_eq!(report.failures.len(), 1);
  let failure = &report.failures[0];
  assert_eq!(failure.source_page_id, "2");
  assert_eq!(failure.title, "Guide");
  assert_eq!(failure.status, Some(403));
  assert!(failure.error.contains("create permission denied"));

  assert!(!client.created_pages().iter().any(|p| p.title == "Setup"));
}

#[tokio::test]
async fn copied_and_failures_are_disjoint_by_source_id() {
  let mut client = sample_tree();
  client.fail_create_for_title("Reference", 409, "duplicate title");

  let report = copy_tree(&client, "1", "99", None, &fast_options(), None).await.unwrap();

  for failure in &report.failures {
    assert!(
      !report.copied.iter().any(|p| p.id == failure.source_page_id),
      "source {} recorded as both copied and failed",
      failure.source_page_id
    );
  }
  assert_eq!(report.failures[0].status, Some(409));
}

#[tokio::test]
async fn depth_bound_stops_recursion() {
  let mut client = FakeConfluenceClient::new();
  client.add_page("1", "A", "");
  client.add_page("2", "B", "");
  client.add_page("3", "C", "");
  client.add_page("99", "Target", "");
  client.set_children("1", &["2"]);
  client.set_children("2", &["3"]);

  let options = CopyOptions {
    max_depth: 1,
    ..fast_options()
  };
  let report = copy_tree(&client, "1", "99", None, &options, None).await.unwrap();

  let titles: Vec<&str> = report.copied.iter().map(|p| p.title.as_str()).collect();
  assert_eq!(titles, vec!["A (Copy)", "B"]);
  assert!(!client.created_pages().iter().any(|p| p.title == "C"));
}

#[tokio::test]
async fn max_depth_zero_copies_only_the_root() {
  let client = sample_tree();

  let options = CopyOptions {
    max_depth: 0,
    ..fast_options()
  };
  let report = copy_tree(&client, "1", "99", None, &options, None).await.unwrap();

  assert_eq!(report.total_copied(), 1);
  assert_eq!(report.copied[0].title, "Docs (Copy)");
}

#[tokio::test]
async fn root_creation_failure_is_fatal() {
  let mut client = sample_tree();
  client.fail_create_for_title("Docs (Copy)", 409, "title exists");

  let result = copy_tree(&client, "1", "99", None, &fast_options(), None).await;

  assert!(result.is_err());
  assert!(client.created_pages().is_empty());
}

#[tokio::test]
async fn missing_source_root_is_fatal() {
  let client = FakeConfluenceClient::new();

  let result = copy_tree(&client, "404", "99", None, &fast_options(), None).await;
  assert!(result.is_err());
}

#[tokio::test]
async fn default_title_appends_copy_suffix() {
  let client = sample_tree();

  let report = copy_tree(&client, "1", "99", None, &fast_options(), None).await.unwrap();
  assert_eq!(report.root.title, "Docs (Copy)");
}

#[tokio::test]
async fn custom_copy_suffix_is_honored() {
  let client = sample_tree();

  let options = CopyOptions {
    copy_suffix: " [mirror]".to_string(),
    ..fast_options()
  };
  let report = copy_tree(&client, "1", "99", None, &options, None).await.unwrap();
  assert_eq!(report.root.title, "Docs [mirror]");
}

#[tokio::test]
async fn explicit_new_title_overrides_suffix() {
  let client = sample_tree();

  let report = copy_tree(&client, "1", "99", Some("Handbook"), &fast_options(), None)
    .await
    .unwrap();
  assert_eq!(report.root.title, "Handbook");
}

#[tokio::test]
async fn child_listing_failure_skips_subtree_without_failure_entry() {
  let mut client = sample_tree();
  client.fail_children_for("2", 500, "listing unavailable");

  let report = copy_tree(&client, "1", "99", None, &fast_options(), None).await.unwrap();

  // Guide itself copies; its unlistable children are skipped silently.
  let titles: Vec<&str> = report.copied.iter().map(|p| p.title.as_str()).collect();
  assert_eq!(titles, vec!["Docs (Copy)", "Guide", "Reference"]);
  assert!(report.failures.is_empty());
}

#[tokio::test]
async fn progress_reports_copies_and_skips() {
  let mut client = sample_tree();
  client.add_page("5", "Temp Scratch", "");
  client.set_children("1", &["2", "3", "5"]);

  let options = CopyOptions {
    exclude: parse_patterns("temp*"),
    ..fast_options()
  };

  let lines: Mutex<Vec<String>> = Mutex::new(Vec::new());
  let progress = |line: &str| lines.lock().unwrap().push(line.to_string());

  copy_tree(&client, "1", "99", None, &options, Some(&progress)).await.unwrap();

  let lines = lines.into_inner().unwrap();
  assert!(lines.iter().any(|l| l.contains("Created 'Docs (Copy)'")));
  assert!(lines.iter().any(|l| l.contains("Copied 'Guide'")));
  assert!(
    lines
      .iter()
      .any(|l| l.contains("Skipping 'Temp Scratch'") && l.contains("exclusion"))
  );
}

#[tokio::test]
async fn quiet_suppresses_progress_emission() {
  let client = sample_tree();

  let options = CopyOptions {
    quiet: true,
    ..fast_options()
  };

  let lines: Mutex<Vec<String>> = Mutex::new(Vec::new());
  let progress = |line: &str| lines.lock().unwrap().push(line.to_string());

  let report = copy_tree(&client, "1", "99", None, &options, Some(&progress)).await.unwrap();

  assert_eq!(report.total_copied(), 4);
  assert!(lines.into_inner().unwrap().is_empty());
}

#[tokio::test]
async fn preview_count_matches_live_copy_count() {
  use confluence_cp::copy::{build_tree, count_nodes, discover_descendants};

  let mut client = FakeConfluenceClient::new();
  client.add_page("1", "Docs", "");
  client.add_page("2", "Guide", "");
  client.add_page("3", "Temp Notes", "");
  client.add_page("4", "Setup", "");
  client.add_page("99", "Archive", "");
  client.set_children("1", &["2", "3"]);
  client.set_children("2", &["4"]);

  let options = CopyOptions {
    exclude: parse_patterns("temp*"),
    ..fast_options()
  };

  let descendants = discover_descendants(&client, "1", options.max_depth, &options.exclude).await;
  let planned = 1 + count_nodes(&build_tree(&descendants, "1"));

  let report = copy_tree(&client, "1", "99", None, &options, None).await.unwrap();
  assert_eq!(report.total_copied(), planned);
}

#[tokio::test(start_paused = true)]
async fn pacing_sleeps_between_siblings_but_not_after_the_last() {
  let mut client = FakeConfluenceClient::new();
  client.add_page("1", "Root", "");
  client.add_page("2", "First", "");
  client.add_page("3", "Second", "");
  client.add_page("4", "Third", "");
  client.add_page("99", "Target", "");
  client.set_children("1", &["2", "3", "4"]);

  let options = CopyOptions {
    delay: Duration::from_millis(100),
    ..CopyOptions::default()
  };

  let start = tokio::time::Instant::now();
  let report = copy_tree(&client, "1", "99", None, &options, None).await.unwrap();

  assert_eq!(report.total_copied(), 4);
  // Three leaf siblings: a delay after the first and second only.
  let elapsed = start.elapsed();
  assert!(
    elapsed >= Duration::from_millis(200) && elapsed < Duration::from_millis(300),
    "expected ~200ms of pacing, got {elapsed:?}"
  );
}
