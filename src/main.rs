//! confluence-cp - Replicate Confluence page trees
//!
//! This is the main entry point for the CLI application.

#[tokio::main]
async fn main() {
  confluence_cp::cli::run().await;
}
