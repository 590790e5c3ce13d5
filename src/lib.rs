//! OCI image config builder
//!
//! Glue around [`oci_config_merge`]: collects overrides from CLI flags and an
//! optional settings file, resolves layer digests, loads the parent config,
//! runs the merge and writes the child config to disk.

pub mod config;
pub mod error;
pub mod layers;
pub mod logging;
pub mod pipeline;
pub mod serialization;

pub use config::OverrideSettings;
pub use error::{ImageConfigError, Result};
pub use pipeline::{run, BuildOutcome};

pub use oci_config_merge::{ImageConfig, ImageDescriptor, OverrideSet};
