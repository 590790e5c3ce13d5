//! Errors surfaced by the `image-config` tool.
//!
//! Every variant is terminal: the binary prints the message and exits 1.

use std::io;
use std::path::PathBuf;

/// Errors for loading inputs and writing the merged image config
#[derive(Debug, thiserror::Error)]
pub enum ImageConfigError {
    #[error("Could not read base file '{}': {source}", path.display())]
    ReadBase { path: PathBuf, source: io::Error },

    #[error("Could not convert base file to image config: {0}")]
    ParseBase(#[source] serde_json::Error),

    #[error("Could not read layer file '{}': {source}", path.display())]
    ReadLayer { path: PathBuf, source: io::Error },

    #[error("No output filename provided")]
    MissingOutput,

    #[error("Could not convert to json: {0}")]
    Encode(#[source] serde_json::Error),

    #[error("Could not write to file '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("Could not read settings file '{}': {source}", path.display())]
    ReadSettings { path: PathBuf, source: io::Error },

    #[error("Could not parse settings file '{}': {message}", path.display())]
    ParseSettings { path: PathBuf, message: String },

    #[error("Invalid settings: {0}")]
    InvalidSettings(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ImageConfigError>;
