//! Resolving user-supplied page references into actionable identifiers.
//!
//! Both `copy-tree` and `ls` accept either a full Confluence URL or a bare
//! numeric page ID. This module normalizes the two forms into a
//! [`PageLocator`].

use anyhow::{Context, Result, anyhow};
use url::Url;

/// A resolved reference to a page on a specific Confluence instance.
#[derive(Debug, Clone)]
pub struct PageLocator {
  /// Scheme and host of the Confluence instance (e.g., `https://example.atlassian.net`).
  pub base_url: String,
  /// Numeric identifier of the page.
  pub page_id: String,
  /// Space key when the URL encodes one.
  pub space_key: Option<String>,
}

/// Resolve a page reference that is either a Confluence URL or a bare numeric
/// page ID.
///
/// Bare IDs need a base URL from `--url` (or `CONFLUENCE_URL`); full URLs
/// carry their own.
///
/// # Errors
/// Returns an error when a bare ID is given without a base URL, or when a URL
/// cannot be parsed into a page reference.
pub fn resolve_page_locator(input: &str, base_url: Option<&str>) -> Result<PageLocator> {
  let input = input.trim();

  if input.contains("://") {
    return parse_confluence_url(input);
  }

  if !input.chars().all(|c| c.is_ascii_digit()) || input.is_empty() {
    return Err(anyhow!("Page reference is neither a URL nor a numeric ID: {input}"));
  }

  let base_url = base_url.ok_or_else(|| anyhow!("--url is required when using a numeric page ID"))?;

  Ok(PageLocator {
    base_url: base_url.trim_end_matches('/').to_string(),
    page_id: input.to_string(),
    space_key: None,
  })
}

/// Parse a Confluence URL to extract page ID, base URL, and optional space key.
///
/// Supports the common Confluence URL formats:
/// - https://example.atlassian.net/wiki/spaces/SPACE/pages/123456/Page+Title
/// - https://example.atlassian.net/wiki/pages/123456
/// - https://example.atlassian.net/pages/123456
///
/// # Errors
/// Returns an error when the URL is malformed, missing the expected `pages`
/// segment, or contains a non-numeric page ID.
pub fn parse_confluence_url(url: &str) -> Result<PageLocator> {
  let parsed = Url::parse(url).context("Invalid URL format")?;

  let base_url = format!(
    "{}://{}",
    parsed.scheme(),
    parsed.host_str().context("URL missing host")?
  );

  let segments: Vec<&str> = parsed.path().split('/').filter(|s| !s.is_empty()).collect();

  let page_id_pos = segments
    .iter()
    .position(|&s| s == "pages")
    .context("URL does not contain 'pages' segment")?;

  let page_id = *segments
    .get(page_id_pos + 1)
    .ok_or_else(|| anyhow!("URL does not contain page ID after 'pages' segment"))?;

  if !page_id.chars().all(|c| c.is_ascii_digit()) {
    return Err(anyhow!("Page ID is not numeric: {page_id}"));
  }

  let space_key = segments.iter().position(|&s| s == "spaces").and_then(|pos| {
    if pos + 1 < segments.len() && pos + 1 < page_id_pos {
      Some(segments[pos + 1].to_string())
    } else {
      None
    }
  });

  Ok(PageLocator {
    base_url,
    page_id: page_id.to_string(),
    space_key,
  })
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_parse_url_with_space() {
    let url = "https://example.atlassian.net/wiki/spaces/DOCS/pages/229483/Team+Handbook";
    let locator = parse_confluence_url(url).unwrap();

    assert_eq!(locator.base_url, "https://example.atlassian.net");
    assert_eq!(locator.page_id, "229483");
    assert_eq!(locator.space_key, Some("DOCS".to_string()));
  }

  #[test]
  fn test_parse_url_without_space() {
    let url = "https://example.atlassian.net/wiki/pages/123456";
    let locator = parse_confluence_url(url).unwrap();

    assert_eq!(locator.base_url, "https://example.atlassian.net");
    assert_eq!(locator.page_id, "123456");
    assert_eq!(locator.space_key, None);
  }

  #[test]
  fn test_parse_url_non_numeric_id() {
    assert!(parse_confluence_url("https://example.atlassian.net/wiki/pages/notanumber").is_err());
  }

  #[test]
  fn test_parse_url_missing_pages_segment() {
    assert!(parse_confluence_url("https://example.atlassian.net/wiki/spaces/SPACE/123456").is_err());
  }

  #[test]
  fn test_parse_url_pages_at_end() {
    let result = parse_confluence_url("https://example.atlassian.net/wiki/pages");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("does not contain page ID"));
  }

  #[test]
  fn test_parse_url_no_host() {
    assert!(parse_confluence_url("file:///wiki/pages/123").is_err());
  }

  #[test]
  fn test_resolve_numeric_id_with_base_url() {
    let locator = resolve_page_locator("123456", Some("https://example.atlassian.net/")).unwrap();

    assert_eq!(locator.base_url, "https://example.atlassian.net");
    assert_eq!(locator.page_id, "123456");
    assert_eq!(locator.space_key, None);
  }

  #[test]
  fn test_resolve_numeric_id_without_base_url() {
    let result = resolve_page_locator("123456", None);
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("--url is required"));
  }

  #[test]
  fn test_resolve_url_ignores_base_url() {
    let locator = resolve_page_locator(
      "https://other.atlassian.net/wiki/pages/42",
      Some("https://example.atlassian.net"),
    )
    .unwrap();

    assert_eq!(locator.base_url, "https://other.atlassian.net");
    assert_eq!(locator.page_id, "42");
  }

  #[test]
  fn test_resolve_rejects_non_numeric_non_url() {
    assert!(resolve_page_locator("not-a-page", Some("https://example.atlassian.net")).is_err());
  }
}
