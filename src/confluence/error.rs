//! Error taxonomy for Confluence API operations.
//!
//! The replication engine needs to classify remote failures (and keep their
//! HTTP status codes) so that per-page failures can be recorded in a copy
//! report instead of aborting the whole traversal.

use thiserror::Error;

/// Error from a Confluence API operation.
#[derive(Debug, Error)]
pub enum ApiError {
  /// The referenced page or parent does not exist.
  #[error("not found: {message}")]
  NotFound {
    /// Detail from the API response.
    message: String,
  },

  /// Read or create permission was denied (401 or 403).
  #[error("unauthorized: {message}")]
  Unauthorized {
    /// The exact status code, 401 or 403.
    status: u16,
    /// Detail from the API response.
    message: String,
  },

  /// A page with the same title already exists where the remote enforces
  /// uniqueness.
  #[error("conflict: {message}")]
  Conflict {
    /// Detail from the API response.
    message: String,
  },

  /// The remote throttled the request.
  #[error("rate limited: {message}")]
  RateLimited {
    /// Detail from the API response.
    message: String,
  },

  /// Any other transport or protocol failure.
  #[error("API error{}: {message}", status.map(|s| format!(" ({s})")).unwrap_or_default())]
  Unknown {
    /// HTTP status code, when the failure came from an HTTP response.
    status: Option<u16>,
    /// Detail describing the failure.
    message: String,
  },
}

impl ApiError {
  /// Classify an HTTP error response by status code.
  pub fn from_status(status: u16, message: impl Into<String>) -> Self {
    let message = message.into();
    match status {
      404 => Self::NotFound { message },
      401 | 403 => Self::Unauthorized { status, message },
      409 => Self::Conflict { message },
      429 => Self::RateLimited { message },
      _ => Self::Unknown {
        status: Some(status),
        message,
      },
    }
  }

  /// Wrap a transport-level failure that never produced an HTTP response.
  pub fn transport(message: impl Into<String>) -> Self {
    Self::Unknown {
      status: None,
      message: message.into(),
    }
  }

  /// The HTTP status code associated with this error, when one is known.
  pub fn status(&self) -> Option<u16> {
    match self {
      Self::NotFound { .. } => Some(404),
      Self::Unauthorized { status, .. } => Some(*status),
      Self::Conflict { .. } => Some(409),
      Self::RateLimited { .. } => Some(429),
      Self::Unknown { status, .. } => *status,
    }
  }
}

impl From<reqwest::Error> for ApiError {
  fn from(err: reqwest::Error) -> Self {
    Self::transport(err.to_string())
  }
}
