//! Trait definitions for interacting with Confluence.

use async_trait::async_trait;

use super::error::ApiError;
use super::models::{Page, UserInfo};

/// Trait for the Confluence operations the replication engine consumes
/// (enables testing with fake implementations).
#[async_trait]
pub trait ConfluenceApi: Send + Sync {
  /// Fetch a page by ID, expanded with its storage body, space, and version.
  ///
  /// # Errors
  /// `NotFound` when the id does not exist, `Unauthorized` when the caller
  /// lacks read access.
  async fn get_page(&self, page_id: &str) -> Result<Page, ApiError>;

  /// Look up the key of the space a page belongs to.
  ///
  /// # Errors
  /// Same failure modes as [`get_page`](Self::get_page).
  async fn get_page_space(&self, page_id: &str) -> Result<String, ApiError>;

  /// Get direct child pages for a given page ID (not recursive).
  ///
  /// An empty list for a leaf page is a normal, non-error result.
  async fn get_child_pages(&self, page_id: &str) -> Result<Vec<Page>, ApiError>;

  /// Create a new page in `space_key`, optionally as a child of `parent_id`,
  /// with `content` written verbatim as the storage body.
  ///
  /// There is no built-in retry; retry policy belongs to the caller.
  ///
  /// # Errors
  /// `Conflict` when a page with an identical title already exists where the
  /// remote enforces uniqueness, `Unauthorized` when the caller lacks create
  /// permission in the space, `RateLimited` when the remote throttles the
  /// request.
  async fn create_child_page(
    &self,
    title: &str,
    space_key: &str,
    parent_id: Option<&str>,
    content: &str,
  ) -> Result<Page, ApiError>;

  /// Test authentication and return user information.
  async fn test_auth(&self) -> Result<UserInfo, ApiError>;
}
