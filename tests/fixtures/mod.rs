//! Shared fixtures for the integration tests.

use std::path::{Path, PathBuf};

/// A digest-shaped layer id, so the CLI does not warn about it.
pub const LAYER_DIGEST: &str = "4f7c4e1e2a3b5c6d7e8f90a1b2c3d4e5f60718293a4b5c6d7e8f9a0b1c2d3e4f";

/// Path to the parent image config fixture
pub fn parent_config_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/parent.json")
}

/// Owned argv from string slices
pub fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
