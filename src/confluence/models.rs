//! Data transfer objects exchanged with the Confluence REST API.

use serde::{Deserialize, Serialize};

/// Confluence page metadata and content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
  /// Unique numeric identifier assigned by Confluence. Treated as opaque;
  /// never parsed.
  pub id: String,
  /// Human-readable title displayed in the UI.
  pub title: String,
  #[serde(rename = "type", default = "default_page_type")]
  /// Content type (typically `"page"`).
  pub page_type: String,
  /// Rich body content in storage format.
  pub body: Option<PageBody>,
  /// Space metadata describing where the page lives.
  pub space: Option<PageSpace>,
  /// Version counter incremented by Confluence on each write.
  pub version: Option<PageVersion>,
}

fn default_page_type() -> String {
  "page".to_string()
}

impl Page {
  /// The raw storage-format body, when the API response expanded it.
  pub fn storage_value(&self) -> Option<&str> {
    self
      .body
      .as_ref()
      .and_then(|b| b.storage.as_ref())
      .map(|s| s.value.as_str())
  }

  /// The key of the containing space, when expanded.
  pub fn space_key(&self) -> Option<&str> {
    self.space.as_ref().map(|s| s.key.as_str())
  }
}

/// Page body content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageBody {
  /// Confluence storage-format XHTML representation.
  pub storage: Option<StorageFormat>,
}

/// Storage format (Confluence's internal format). The replication engine
/// treats the value as an opaque blob and copies it verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageFormat {
  /// Raw XHTML markup returned by the API.
  pub value: String,
  /// Representation name (typically `"storage"`).
  pub representation: String,
}

/// Space information.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSpace {
  /// Short key that uniquely identifies the space.
  pub key: String,
  /// Human-readable space name.
  #[serde(default)]
  pub name: String,
}

/// Version metadata assigned by Confluence on each write.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageVersion {
  /// Monotonically increasing version number.
  pub number: u64,
}

/// Child pages response wrapper.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChildPagesResponse {
  /// Child pages returned for the lookup request.
  pub results: Vec<Page>,
}

/// Request body for creating a page via the REST API.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePageRequest {
  #[serde(rename = "type")]
  /// Content type, always `"page"`.
  pub page_type: String,
  /// Title for the new page.
  pub title: String,
  /// Containing space reference.
  pub space: SpaceRef,
  /// Parent page, when the page should be created as a child.
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub ancestors: Vec<AncestorRef>,
  /// Storage-format body for the new page.
  pub body: CreatePageBody,
}

impl CreatePageRequest {
  /// Build a create request for a page in `space_key`, optionally nested
  /// under `parent_id`, carrying `content` verbatim.
  pub fn new(title: &str, space_key: &str, parent_id: Option<&str>, content: &str) -> Self {
    Self {
      page_type: "page".to_string(),
      title: title.to_string(),
      space: SpaceRef {
        key: space_key.to_string(),
      },
      ancestors: parent_id
        .map(|id| vec![AncestorRef { id: id.to_string() }])
        .unwrap_or_default(),
      body: CreatePageBody {
        storage: StorageFormat {
          value: content.to_string(),
          representation: "storage".to_string(),
        },
      },
    }
  }
}

/// Space reference used in create requests.
#[derive(Debug, Clone, Serialize)]
pub struct SpaceRef {
  /// Key of the target space.
  pub key: String,
}

/// Ancestor reference used in create requests.
#[derive(Debug, Clone, Serialize)]
pub struct AncestorRef {
  /// Identifier of the parent page.
  pub id: String,
}

/// Body wrapper used in create requests.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePageBody {
  /// Storage-format content for the new page.
  pub storage: StorageFormat,
}

/// User information from authentication test.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
  #[serde(rename = "accountId")]
  /// Stable Atlassian account identifier.
  pub account_id: String,
  /// Primary email address if the API caller is permitted to view it.
  pub email: Option<String>,
  #[serde(rename = "displayName")]
  /// Full display name configured in the Atlassian profile.
  pub display_name: String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_create_page_request_with_parent() {
    let request = CreatePageRequest::new("New Page", "DOCS", Some("42"), "<p>body</p>");
    let json = serde_json::to_value(&request).unwrap();

    assert_eq!(json["type"], "page");
    assert_eq!(json["title"], "New Page");
    assert_eq!(json["space"]["key"], "DOCS");
    assert_eq!(json["ancestors"][0]["id"], "42");
    assert_eq!(json["body"]["storage"]["value"], "<p>body</p>");
    assert_eq!(json["body"]["storage"]["representation"], "storage");
  }

  #[test]
  fn test_create_page_request_without_parent_omits_ancestors() {
    let request = CreatePageRequest::new("Top Level", "DOCS", None, "");
    let json = serde_json::to_value(&request).unwrap();

    assert!(json.get("ancestors").is_none());
  }

  #[test]
  fn test_page_accessors() {
    let page: Page = serde_json::from_value(serde_json::json!({
      "id": "123",
      "title": "Guide",
      "type": "page",
      "body": { "storage": { "value": "<p>hi</p>", "representation": "storage" } },
      "space": { "key": "DOCS", "name": "Documentation" },
      "version": { "number": 7 }
    }))
    .unwrap();

    assert_eq!(page.storage_value(), Some("<p>hi</p>"));
    assert_eq!(page.space_key(), Some("DOCS"));
    assert_eq!(page.version.unwrap().number, 7);
  }

  #[test]
  fn test_page_deserializes_without_optional_fields() {
    let page: Page = serde_json::from_value(serde_json::json!({
      "id": "123",
      "title": "Bare"
    }))
    .unwrap();

    assert_eq!(page.page_type, "page");
    assert!(page.storage_value().is_none());
    assert!(page.space_key().is_none());
  }
}
