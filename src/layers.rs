//! Layer digest resolution
//!
//! A `--layer` value is either the digest itself or `@path`, naming a file
//! whose contents are the digest (as produced by an earlier build step).

use regex_lite::Regex;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use tracing::{debug, warn};

use crate::error::{ImageConfigError, Result};

/// Resolve every layer entry, preserving order.
pub fn resolve_layers(entries: &[String]) -> Result<Vec<String>> {
    entries.iter().map(|entry| resolve_layer(entry)).collect()
}

/// Resolve one layer entry to its digest.
pub fn resolve_layer(entry: &str) -> Result<String> {
    let digest = match entry.strip_prefix('@') {
        Some(file) => {
            let path = Path::new(file);
            let contents = fs::read_to_string(path).map_err(|source| {
                ImageConfigError::ReadLayer {
                    path: path.to_path_buf(),
                    source,
                }
            })?;
            debug!(path = %path.display(), "Read layer digest from file");
            contents.trim().to_string()
        }
        None => entry.to_string(),
    };

    if !looks_like_digest(&digest) {
        warn!(layer = %digest, "Layer digest is not a sha256 hex digest; using it verbatim");
    }

    Ok(digest)
}

/// `<64 lowercase hex>` with an optional `sha256:` prefix.
pub fn looks_like_digest(digest: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^(sha256:)?[a-f0-9]{64}$").unwrap())
        .is_match(digest)
}
