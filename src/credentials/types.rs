//! Strongly typed credentials and related errors.

use thiserror::Error;

/// Represents a set of credentials for authenticating with a host.
///
/// For Atlassian Cloud/Confluence:
/// - `username` should be your email address
/// - `password` should be your API token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
  /// The username for authentication (email address for Atlassian Cloud)
  pub username: String,
  /// The password or API token for authentication
  pub password: String,
}

/// Errors that can occur during credential operations.
#[derive(Debug, Error)]
pub enum CredentialError {
  /// The .netrc file could not be found or read
  #[error(".netrc file not found")]
  NetrcNotFound,
  /// An I/O error occurred while reading credentials
  #[error("I/O error: {0}")]
  Io(#[from] std::io::Error),
}
