//! `.netrc` credential discovery.
//!
//! Provides a [`CredentialsProvider`] implementation that reads the user's
//! `~/.netrc` file to locate Confluence credentials. This keeps Atlassian API
//! tokens outside of shell history and supports multiple hosts.

use super::{Credential, CredentialError, CredentialsProvider};

/// A credentials provider that reads from `.netrc` files.
///
/// # Example `.netrc` entry for Atlassian Cloud
///
/// ```text
/// machine your-instance.atlassian.net
///   login your.email@example.com
///   password your-api-token-here
/// ```
#[derive(Debug, Default)]
pub struct NetrcProvider;

impl NetrcProvider {
  /// Creates a new `.netrc` credentials provider.
  pub fn new() -> Self {
    Self
  }
}

impl CredentialsProvider for NetrcProvider {
  /// Resolve credentials for `host` by scanning the user's `.netrc`.
  ///
  /// # Errors
  /// Returns `Err(CredentialError)` when the home directory cannot be
  /// determined or the `.netrc` file is unreadable.
  fn get_credentials(&self, host: &str) -> Result<Option<Credential>, CredentialError> {
    let home = std::env::var("HOME").map_err(|_| CredentialError::NetrcNotFound)?;
    let netrc_path = std::path::Path::new(&home).join(".netrc");

    if !netrc_path.exists() {
      return Ok(None);
    }

    let content = std::fs::read_to_string(&netrc_path)?;
    Ok(parse_netrc(&content, host))
  }
}

/// Parse `.netrc` content and extract credentials for a specific host.
///
/// Entries are `machine <host>` followed by `login` and `password` tokens;
/// the token stream is whitespace-separated and may span lines. A `default`
/// entry matches any host not matched earlier, per netrc convention.
fn parse_netrc(content: &str, target_host: &str) -> Option<Credential> {
  let mut tokens = content
    .lines()
    .map(|line| line.split('#').next().unwrap_or(""))
    .flat_map(str::split_whitespace);

  let mut in_target = false;
  let mut username: Option<String> = None;
  let mut password: Option<String> = None;

  while let Some(token) = tokens.next() {
    match token {
      "machine" => {
        if let Some(credential) = complete(in_target, &username, &password) {
          return Some(credential);
        }
        in_target = tokens.next().is_some_and(|name| name == target_host);
        username = None;
        password = None;
      }
      "default" => {
        if let Some(credential) = complete(in_target, &username, &password) {
          return Some(credential);
        }
        in_target = true;
        username = None;
        password = None;
      }
      "login" => username = tokens.next().map(str::to_string),
      "password" => password = tokens.next().map(str::to_string),
      // account, macdef bodies, and unknown tokens are skipped
      _ => {}
    }
  }

  complete(in_target, &username, &password)
}

fn complete(in_target: bool, username: &Option<String>, password: &Option<String>) -> Option<Credential> {
  if !in_target {
    return None;
  }
  match (username, password) {
    (Some(username), Some(password)) => Some(Credential {
      username: username.clone(),
      password: password.clone(),
    }),
    _ => None,
  }
}
