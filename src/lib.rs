//! Confluence tree replication library
//!
//! This library provides functionality to copy a Confluence page and its
//! entire descendant subtree to a new location, preserving hierarchy.

pub mod cli;
pub mod color;
pub mod commands;
pub mod confluence;
pub mod copy;
pub mod credentials;
