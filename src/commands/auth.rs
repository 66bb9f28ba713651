//! Authentication subcommand handlers.
//!
//! Covers both `confluence-cp auth test`, which performs a live API call, and
//! `confluence-cp auth show`, which prints the currently detected credential
//! sources.

use std::process;

use crate::cli::{AuthCommand, Cli};
use crate::color::ColorScheme;
use crate::confluence::{self, ConfluenceApi};
use crate::credentials::{CredentialsProvider, NetrcProvider};

/// Dispatch the authentication subcommands defined under `confluence-cp auth`.
pub(crate) async fn handle_auth_command(subcommand: &AuthCommand, cli: &Cli, colors: &ColorScheme) {
  match subcommand {
    AuthCommand::Test => test_auth(cli, colors).await,
    AuthCommand::Show => show_auth_config(cli, colors),
  }
}

/// Validate the configured credentials against the Confluence API.
async fn test_auth(cli: &Cli, colors: &ColorScheme) {
  let base_url = match &cli.auth.url {
    Some(url) => url,
    None => {
      eprintln!("{} {}", colors.error("✗"), colors.error("Base URL not provided"));
      eprintln!("\n{}", colors.info("Please provide the Confluence URL:"));
      eprintln!("  confluence-cp auth test --url https://your-instance.atlassian.net");
      eprintln!("  Or set CONFLUENCE_URL environment variable");
      process::exit(1);
    }
  };

  println!("{} {}", colors.info("→"), colors.info("Testing authentication"));
  println!("  {}: {}", colors.emphasis("URL"), colors.link(base_url));

  let (username, token) = match load_credentials(base_url, cli) {
    Ok(creds) => creds,
    Err(e) => {
      eprintln!("\n{} {}", colors.error("✗"), colors.error("Failed to load credentials"));
      eprintln!("  {e}");
      eprintln!("\n{}", colors.info("Setup instructions:"));
      eprintln!(
        "  1. Create an API token at: {}",
        colors.link("https://id.atlassian.com/manage-profile/security/api-tokens")
      );
      eprintln!("  2. Provide credentials via:");
      eprintln!("     • CLI flags: --user and --token");
      eprintln!("     • Environment variables: CONFLUENCE_USER and CONFLUENCE_TOKEN");
      eprintln!("     • ~/.netrc file");
      process::exit(2);
    }
  };

  println!("  {}: {}", colors.emphasis("Username"), username);

  let client = match confluence::ConfluenceClient::new(
    base_url,
    &username,
    &token,
    cli.performance.timeout,
    cli.performance.rate_limit,
  ) {
    Ok(c) => c,
    Err(e) => {
      eprintln!("\n{} {}", colors.error("✗"), colors.error("Failed to create API client"));
      eprintln!("  {e}");
      process::exit(1);
    }
  };

  println!("\n{} {}", colors.info("→"), colors.info("Calling Confluence API..."));
  match client.test_auth().await {
    Ok(user_info) => {
      println!(
        "\n{} {}",
        colors.success("✓"),
        colors.success("Authentication successful!")
      );
      println!("\n{}", colors.emphasis("User Information:"));
      println!("  {}: {}", colors.emphasis("Display Name"), user_info.display_name);
      println!(
        "  {}: {}",
        colors.emphasis("Account ID"),
        colors.dimmed(&user_info.account_id)
      );
      if let Some(email) = user_info.email {
        println!("  {}: {}", colors.emphasis("Email"), email);
      }
      println!("\n{} Your credentials are working correctly.", colors.info("ℹ"));
    }
    Err(e) => {
      eprintln!("\n{} {}", colors.error("✗"), colors.error("Authentication failed"));
      eprintln!("  {e}");
      eprintln!("\n{}", colors.info("Common issues:"));
      eprintln!(
        "  1. Invalid API token - verify at {}",
        colors.link("https://id.atlassian.com/manage-profile/security/api-tokens")
      );
      eprintln!("  2. Incorrect username - should be your email address");
      eprintln!("  3. Wrong base URL - should be https://your-instance.atlassian.net");
      eprintln!("  4. Network connectivity issues");
      eprintln!(
        "\n{}",
        colors.dimmed("Run 'confluence-cp auth show' to see your current configuration")
      );
      process::exit(2);
    }
  }
}

/// Display the currently configured authentication sources and values.
///
/// The output highlights whether values came from CLI flags, environment
/// variables, or a `.netrc` file so that users can quickly diagnose conflicts.
fn show_auth_config(cli: &Cli, colors: &ColorScheme) {
  println!("{}\n", colors.emphasis("Authentication Configuration"));

  let url = cli.auth.url.as_deref();
  let username = cli.auth.user.as_deref();
  let token = cli.auth.token.as_deref();

  if let Some(url_value) = url {
    println!("{}: {}", colors.emphasis("Base URL"), colors.link(url_value));
    println!(
      "  {}: {}",
      colors.dimmed("Source"),
      colors.dimmed(source_label("CONFLUENCE_URL", true))
    );
  } else {
    println!("{}: {}", colors.emphasis("Base URL"), colors.dimmed("(not set)"));
  }

  // Fall back to .netrc when user/token are not given explicitly
  let netrc_creds = if username.is_none() || token.is_none() {
    url.and_then(extract_host).and_then(|host| {
      let provider = NetrcProvider::new();
      provider.get_credentials(&host).ok().flatten()
    })
  } else {
    None
  };

  if let Some(user_value) = username {
    println!("\n{}: {}", colors.emphasis("Username"), user_value);
    println!(
      "  {}: {}",
      colors.dimmed("Source"),
      colors.dimmed(source_label("CONFLUENCE_USER", true))
    );
  } else if let Some(ref creds) = netrc_creds {
    println!("\n{}: {}", colors.emphasis("Username"), creds.username);
    println!("  {}: {}", colors.dimmed("Source"), colors.dimmed(".netrc file"));
  } else {
    println!("\n{}: {}", colors.emphasis("Username"), colors.dimmed("(not set)"));
  }

  if let Some(token_value) = token {
    let masked = if token_value.len() > 8 {
      format!("{}{}", &token_value[..4], "*".repeat(token_value.len() - 4))
    } else {
      "*".repeat(token_value.len())
    };
    println!("\n{}: {}", colors.emphasis("API Token"), colors.dimmed(&masked));
    println!(
      "  {}: {}",
      colors.dimmed("Source"),
      colors.dimmed(source_label("CONFLUENCE_TOKEN", true))
    );
  } else if netrc_creds.is_some() {
    // We have a token from .netrc but never display it
    println!("\n{}: {}", colors.emphasis("API Token"), colors.dimmed("********"));
    println!("  {}: {}", colors.dimmed("Source"), colors.dimmed(".netrc file"));
  } else {
    println!("\n{}: {}", colors.emphasis("API Token"), colors.dimmed("(not set)"));
  }

  if url.is_none() {
    println!(
      "\n{} {} is required for API access",
      colors.warning("⚠"),
      colors.emphasis("Base URL")
    );
    println!("  Set via --url flag or CONFLUENCE_URL environment variable");
  }

  let has_username = username.is_some() || netrc_creds.is_some();
  let has_token = token.is_some() || netrc_creds.is_some();

  if !has_username || !has_token {
    println!(
      "\n{} {} for API access",
      colors.warning("⚠"),
      colors.warning("Credentials incomplete")
    );
    if !has_username {
      println!("  Missing: username (use --user or CONFLUENCE_USER)");
    }
    if !has_token {
      println!("  Missing: API token (use --token or CONFLUENCE_TOKEN)");
    }
    println!("\n  Or add credentials to ~/.netrc:");
    if let Some(url_str) = url
      && let Some(host) = extract_host(url_str)
    {
      println!("    machine {host}");
    }
    println!("      login your.email@example.com");
    println!("      password your-api-token");
  } else {
    println!("\n{} {}", colors.success("✓"), colors.success("Credentials configured"));
  }
}

/// Describe where a configuration value came from.
fn source_label(env_var: &str, flag_present: bool) -> &'static str {
  if std::env::var(env_var).is_ok() {
    "environment variable"
  } else if flag_present {
    "command-line flag"
  } else {
    "not set"
  }
}

/// Resolve Confluence credentials from CLI flags, environment variables, or
/// `.netrc`.
///
/// The lookup order honors explicit CLI input first, then falls back to the
/// host-specific entry in `.netrc`. The helper returns both username and API
/// token so callers can immediately construct an API client.
///
/// # Errors
/// Returns an error when the base URL is invalid, when `.netrc` parsing fails,
/// or when no credential source provides both username and token.
pub(crate) fn load_credentials(base_url: &str, cli: &Cli) -> anyhow::Result<(String, String)> {
  // Try CLI args or env vars first
  let username = cli.auth.user.clone();
  let token = cli.auth.token.clone();

  if let (Some(user), Some(tok)) = (username, token) {
    return Ok((user, tok));
  }

  // Try to load from .netrc
  let host = extract_host(base_url).ok_or_else(|| anyhow::anyhow!("Invalid base URL"))?;

  let provider = NetrcProvider::new();
  if let Some(creds) = provider.get_credentials(&host)? {
    let user = cli.auth.user.clone().unwrap_or(creds.username);
    let tok = cli.auth.token.clone().unwrap_or(creds.password);
    return Ok((user, tok));
  }

  anyhow::bail!(
    "Credentials not found. Provide --user and --token, set CONFLUENCE_USER and CONFLUENCE_TOKEN, or add to ~/.netrc"
  )
}

/// Extract the hostname component from a Confluence base URL string.
fn extract_host(url: &str) -> Option<String> {
  if let Some(start) = url.find("://") {
    let after_scheme = &url[start + 3..];
    if let Some(end) = after_scheme.find('/') {
      Some(after_scheme[..end].to_string())
    } else {
      Some(after_scheme.to_string())
    }
  } else if let Some(end) = url.find('/') {
    Some(url[..end].to_string())
  } else {
    Some(url.to_string())
  }
}
