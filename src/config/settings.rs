//! Override settings and the settings file loader.

use oci_config_merge::OverrideSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::merge::merge_layers;
use crate::error::{ImageConfigError, Result};

/// Everything one invocation needs: where to read and write, and the raw
/// override values. Layer entries are still unresolved here (`@file` allowed).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OverrideSettings {
    /// Parent image config
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<PathBuf>,

    /// Where the merged config is written
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,

    /// Where `sha256:<hex>` of the written config goes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest_output: Option<PathBuf>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_swap: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_shares: Option<i64>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub env: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub entrypoint: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub command: Vec<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub volumes: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub labels: Vec<String>,
}

impl OverrideSettings {
    /// Build the merge input, given layer digests already resolved.
    pub fn override_set(&self, layers: Vec<String>) -> OverrideSet {
        OverrideSet {
            layers,
            user: self.user.clone(),
            memory: self.memory,
            memory_swap: self.memory_swap,
            cpu_shares: self.cpu_shares,
            ports: self.ports.clone(),
            env: self.env.clone(),
            entrypoint: self.entrypoint.clone(),
            command: self.command.clone(),
            volumes: self.volumes.clone(),
            working_dir: self.working_dir.clone(),
            labels: self.labels.clone(),
        }
    }

    /// Treat empty strings, empty paths and zero resource values as not
    /// given, so they never shadow a lower layer.
    pub fn without_empty(self) -> Self {
        OverrideSettings {
            base: self.base.filter(|path| !path.as_os_str().is_empty()),
            output: self.output.filter(|path| !path.as_os_str().is_empty()),
            digest_output: self
                .digest_output
                .filter(|path| !path.as_os_str().is_empty()),
            user: self.user.filter(|user| !user.is_empty()),
            memory: self.memory.filter(|&value| value != 0),
            memory_swap: self.memory_swap.filter(|&value| value != 0),
            cpu_shares: self.cpu_shares.filter(|&value| value != 0),
            working_dir: self.working_dir.filter(|dir| !dir.is_empty()),
            ..self
        }
    }
}

/// Layer the CLI flags over an optional settings file.
pub fn resolve(settings_file: Option<&Path>, cli: &OverrideSettings) -> Result<OverrideSettings> {
    let mut layers = Vec::new();

    if let Some(path) = settings_file {
        layers.push(load_settings_file(path)?);
        debug!(path = %path.display(), "Loaded settings file");
    }

    let cli = cli.clone().without_empty();
    layers.push(serde_json::to_value(&cli).map_err(ImageConfigError::InvalidSettings)?);

    match merge_layers(layers) {
        Value::Null => Ok(OverrideSettings::default()),
        merged => serde_json::from_value(merged).map_err(ImageConfigError::InvalidSettings),
    }
}

/// Load and parse a TOML settings file into a JSON value
pub fn load_settings_file(path: &Path) -> Result<Value> {
    let contents = fs::read_to_string(path).map_err(|source| ImageConfigError::ReadSettings {
        path: path.to_path_buf(),
        source,
    })?;

    let toml_value: toml::Value =
        toml::from_str(&contents).map_err(|e| ImageConfigError::ParseSettings {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    Ok(toml_to_json(toml_value))
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}
