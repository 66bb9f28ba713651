//! Fake Confluence API client for testing
//!
//! This module provides a stub implementation of the Confluence API that
//! serves an in-memory page tree and records every create call, without
//! making any network requests.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use confluence_cp::confluence::{ApiError, ConfluenceApi, Page, PageBody, PageSpace, PageVersion, StorageFormat, UserInfo};

/// A page created through the fake client, with the linkage the caller
/// requested.
#[derive(Debug, Clone)]
pub struct CreatedPage {
  pub id: String,
  pub title: String,
  pub space_key: String,
  pub parent_id: Option<String>,
  pub content: String,
}

/// A fake Confluence client backed by an in-memory page tree.
///
/// Failures can be injected per page (for reads) or per title (for creates),
/// and `panic_on_create` turns any write into a test failure for dry-run
/// coverage.
pub struct FakeConfluenceClient {
  pages: HashMap<String, Page>,
  children: HashMap<String, Vec<String>>,
  create_failures: HashMap<String, (u16, String)>,
  children_failures: HashMap<String, (u16, String)>,
  panic_on_create: bool,
  created: Mutex<Vec<CreatedPage>>,
  next_id: AtomicU64,
}

impl FakeConfluenceClient {
  /// Create a new fake client with no pages.
  pub fn new() -> Self {
    Self {
      pages: HashMap::new(),
      children: HashMap::new(),
      create_failures: HashMap::new(),
      children_failures: HashMap::new(),
      panic_on_create: false,
      created: Mutex::new(Vec::new()),
      next_id: AtomicU64::new(1),
    }
  }

  /// Add a page with storage content in the `DOCS` space.
  pub fn add_page(&mut self, id: &str, title: &str, content: &str) {
    self.pages.insert(
      id.to_string(),
      Page {
        id: id.to_string(),
        title: title.to_string(),
        page_type: "page".to_string(),
        body: Some(PageBody {
          storage: Some(StorageFormat {
            value: content.to_string(),
            representation: "storage".to_string(),
          }),
        }),
        space: Some(PageSpace {
          key: "DOCS".to_string(),
          name: "Documentation".to_string(),
        }),
        version: Some(PageVersion { number: 1 }),
      },
    );
  }

  /// Declare the direct children of a page, in listing order.
  pub fn set_children(&mut self, parent_id: &str, child_ids: &[&str]) {
    self
      .children
      .insert(parent_id.to_string(), child_ids.iter().map(|s| s.to_string()).collect());
  }

  /// Make any create call for `title` fail with the given HTTP status.
  pub fn fail_create_for_title(&mut self, title: &str, status: u16, message: &str) {
    self
      .create_failures
      .insert(title.to_string(), (status, message.to_string()));
  }

  /// Make child listing fail for `page_id` with the given HTTP status.
  pub fn fail_children_for(&mut self, page_id: &str, status: u16, message: &str) {
    self
      .children_failures
      .insert(page_id.to_string(), (status, message.to_string()));
  }

  /// Panic if any create call is issued. Used to prove a path is read-only.
  pub fn panic_on_create(&mut self) {
    self.panic_on_create = true;
  }

  /// Every page created through this client, in creation order.
  pub fn created_pages(&self) -> Vec<CreatedPage> {
    self.created.lock().unwrap().clone()
  }

  /// The recorded create call for the copy with id `id`.
  pub fn created_by_id(&self, id: &str) -> Option<CreatedPage> {
    self.created.lock().unwrap().iter().find(|p| p.id == id).cloned()
  }
}

impl Default for FakeConfluenceClient {
  fn default() -> Self {
    Self::new()
  }
}

#[async_trait]
impl ConfluenceApi for FakeConfluenceClient {
  async fn get_page(&self, page_id: &str) -> Result<Page, ApiError> {
    self.pages.get(page_id).cloned().ok_or_else(|| ApiError::NotFound {
      message: format!("No content found with id: {page_id}"),
    })
  }

  async fn get_page_space(&self, page_id: &str) -> Result<String, ApiError> {
    let page = self.get_page(page_id).await?;
    page
      .space_key()
      .map(str::to_string)
      .ok_or_else(|| ApiError::transport(format!("Page {page_id} has no space")))
  }

  async fn get_child_pages(&self, page_id: &str) -> Result<Vec<Page>, ApiError> {
    if let Some((status, message)) = self.children_failures.get(page_id) {
      return Err(ApiError::from_status(*status, message.clone()));
    }

    let child_ids = self.children.get(page_id).cloned().unwrap_or_default();
    let mut children = Vec::new();

    for child_id in child_ids {
      if let Some(page) = self.pages.get(&child_id) {
        children.push(page.clone());
      }
    }

    Ok(children)
  }

  async fn create_child_page(
    &self,
    title: &str,
    space_key: &str,
    parent_id: Option<&str>,
    content: &str,
  ) -> Result<Page, ApiError> {
    if self.panic_on_create {
      panic!("create_child_page called on a read-only fake (title: {title})");
    }

    if let Some((status, message)) = self.create_failures.get(title) {
      return Err(ApiError::from_status(*status, message.clone()));
    }

    let id = format!("copy-{}", self.next_id.fetch_add(1, Ordering::SeqCst));
    self.created.lock().unwrap().push(CreatedPage {
      id: id.clone(),
      title: title.to_string(),
      space_key: space_key.to_string(),
      parent_id: parent_id.map(str::to_string),
      content: content.to_string(),
    });

    Ok(Page {
      id,
      title: title.to_string(),
      page_type: "page".to_string(),
      body: Some(PageBody {
        storage: Some(StorageFormat {
          value: content.to_string(),
          representation: "storage".to_string(),
        }),
      }),
      space: Some(PageSpace {
        key: space_key.to_string(),
        name: String::new(),
      }),
      version: Some(PageVersion { number: 1 }),
    })
  }

  async fn test_auth(&self) -> Result<UserInfo, ApiError> {
    Ok(UserInfo {
      account_id: "test-account-id".to_string(),
      email: Some("test@example.com".to_string()),
      display_name: "Test User".to_string(),
    })
  }
}
