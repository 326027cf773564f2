//! Test utilities
//!
//! Fixtures for unit and integration tests. The in-memory adapters in
//! `crate::adapters::memory` double as the test repositories.

pub mod fixtures;

pub use fixtures::*;
