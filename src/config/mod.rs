//! Override settings
//!
//! Settings come from two layers, lowest precedence first:
//! 1. Settings file (`--settings path.toml`), optional
//! 2. CLI flags
//!
//! The layers are merged as JSON values and the result is deserialized into
//! [`OverrideSettings`].

mod merge;
mod settings;

pub use merge::{deep_merge, merge_layers};
pub use settings::{load_settings_file, resolve, OverrideSettings};
