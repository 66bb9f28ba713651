//! Shared test utilities.

pub mod fake_confluence;
