//! Confluence module providing API abstractions, the HTTP client, data models,
//! the error taxonomy, and page locator resolution.

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod url;

pub use api::ConfluenceApi;
pub use client::ConfluenceClient;
pub use error::ApiError;
pub use models::{ChildPagesResponse, CreatePageRequest, Page, PageBody, PageSpace, PageVersion, StorageFormat, UserInfo};
pub use url::{PageLocator, parse_confluence_url, resolve_page_locator};
