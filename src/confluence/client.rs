//! HTTP client implementation for talking to the Confluence REST API.

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use tokio::sync::Mutex;
use tokio::time::sleep;

use super::api::ConfluenceApi;
use super::error::ApiError;
use super::models::{ChildPagesResponse, CreatePageRequest, Page, UserInfo};

/// Confluence API client.
#[derive(Clone)]
pub struct ConfluenceClient {
  base_url: String,
  username: String,
  token: String,
  client: reqwest::Client,
  rate_limiter: Arc<RequestRateLimiter>,
}

/// Simple fixed-window rate limiter to cap the number of requests per interval.
///
/// This caps the client's overall request rate; the replication engine layers
/// its own sibling-to-sibling write pacing on top.
#[derive(Debug)]
struct RequestRateLimiter {
  max_requests: usize,
  window: Duration,
  timestamps: Mutex<VecDeque<Instant>>,
}

impl RequestRateLimiter {
  fn new(max_requests: usize, window: Duration) -> Self {
    Self {
      max_requests,
      window,
      timestamps: Mutex::new(VecDeque::with_capacity(max_requests)),
    }
  }

  /// Wait until the caller can perform another request without exceeding the
  /// rate limit.
  async fn acquire(&self) {
    loop {
      let mut timestamps = self.timestamps.lock().await;
      let now = Instant::now();

      while let Some(earliest) = timestamps.front()
        && now.duration_since(*earliest) >= self.window
      {
        timestamps.pop_front();
      }

      if timestamps.len() < self.max_requests {
        timestamps.push_back(now);
        return;
      }

      let earliest = *timestamps.front().expect("rate limiter queue should never be empty");
      let elapsed = now.duration_since(earliest);
      let wait_duration = if elapsed >= self.window {
        Duration::from_secs(0)
      } else {
        self.window - elapsed
      };

      drop(timestamps);

      if wait_duration > Duration::from_secs(0) {
        sleep(wait_duration).await;
      }
    }
  }
}

impl ConfluenceClient {
  /// Create a new Confluence client.
  ///
  /// # Arguments
  /// * `base_url` - The base URL of the Confluence instance (e.g., https://example.atlassian.net)
  /// * `username` - The user's email address
  /// * `token` - The API token
  /// * `timeout_secs` - Request timeout in seconds
  /// * `rate_limit` - Maximum requests per second
  ///
  /// # Errors
  /// Returns an error if the rate limit is zero or if the underlying
  /// `reqwest::Client` cannot be built.
  pub fn new(
    base_url: impl Into<String>,
    username: impl Into<String>,
    token: impl Into<String>,
    timeout_secs: u64,
    rate_limit: usize,
  ) -> Result<Self> {
    let base_url = base_url.into();
    let username = username.into();
    let token = token.into();

    if rate_limit == 0 {
      return Err(anyhow!("Rate limit must be at least 1 request per second"));
    }

    let base_url = base_url.trim_end_matches('/').to_string();

    let client = reqwest::Client::builder()
      .timeout(Duration::from_secs(timeout_secs))
      .user_agent(format!(
        "confluence-cp/{} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("TARGET")
      ))
      .build()
      .context("Failed to create HTTP client")?;

    Ok(Self {
      base_url,
      username,
      token,
      client,
      rate_limiter: Arc::new(RequestRateLimiter::new(rate_limit, Duration::from_secs(1))),
    })
  }

  /// Get the authorization header value (Basic auth).
  fn auth_header(&self) -> String {
    let credentials = format!("{}:{}", self.username, self.token);
    format!("Basic {}", BASE64.encode(credentials.as_bytes()))
  }

  /// Issue a GET request and deserialize the JSON response, classifying
  /// non-success statuses into [`ApiError`] variants.
  async fn get_json<T: serde::de::DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
    self.rate_limiter.acquire().await;

    let response = self
      .client
      .get(url)
      .header("Authorization", self.auth_header())
      .header("Accept", "application/json")
      .send()
      .await?;

    let response = check_status(response).await?;

    response
      .json()
      .await
      .map_err(|e| ApiError::transport(format!("Failed to parse response from Confluence API: {e}")))
  }
}

/// Convert a non-success response into an [`ApiError`] carrying the status
/// code and the response body detail.
async fn check_status(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }

  let detail = response
    .text()
    .await
    .unwrap_or_else(|_| String::from("(no error details)"));
  Err(ApiError::from_status(status.as_u16(), detail))
}

#[async_trait]
impl ConfluenceApi for ConfluenceClient {
  async fn get_page(&self, page_id: &str) -> Result<Page, ApiError> {
    let url = format!(
      "{}/wiki/rest/api/content/{}?expand=body.storage,space,version",
      self.base_url, page_id
    );
    self.get_json(&url).await
  }

  async fn get_page_space(&self, page_id: &str) -> Result<String, ApiError> {
    let url = format!("{}/wiki/rest/api/content/{}?expand=space", self.base_url, page_id);
    let page: Page = self.get_json(&url).await?;

    page
      .space_key()
      .map(str::to_string)
      .ok_or_else(|| ApiError::transport(format!("Page {page_id} has no space in API response")))
  }

  async fn get_child_pages(&self, page_id: &str) -> Result<Vec<Page>, ApiError> {
    let url = format!(
      "{}/wiki/rest/api/content/{}/child/page?expand=space",
      self.base_url, page_id
    );
    let child_pages: ChildPagesResponse = self.get_json(&url).await?;
    Ok(child_pages.results)
  }

  async fn create_child_page(
    &self,
    title: &str,
    space_key: &str,
    parent_id: Option<&str>,
    content: &str,
  ) -> Result<Page, ApiError> {
    self.rate_limiter.acquire().await;

    let url = format!("{}/wiki/rest/api/content", self.base_url);
    let request = CreatePageRequest::new(title, space_key, parent_id, content);

    let response = self
      .client
      .post(&url)
      .header("Authorization", self.auth_header())
      .header("Accept", "application/json")
      .json(&request)
      .send()
      .await?;

    let response = check_status(response).await?;

    response
      .json()
      .await
      .map_err(|e| ApiError::transport(format!("Failed to parse create response from Confluence API: {e}")))
  }

  async fn test_auth(&self) -> Result<UserInfo, ApiError> {
    let url = format!("{}/wiki/rest/api/user/current", self.base_url);
    self.get_json(&url).await
  }
}
