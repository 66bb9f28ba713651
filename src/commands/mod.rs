//! CLI subcommand handlers.
//!
//! This module groups the implementations for each `confluence-cp` subcommand,
//! keeping the top-level entry point lightweight while still allowing the
//! handlers to share utilities and types.

pub mod auth;
pub mod completions;
pub mod copy;
pub mod ls;
pub mod version;
