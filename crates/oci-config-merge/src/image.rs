//! OCI image configuration types.
//!
//! Only the parts of the image-spec config this tool reads or writes are
//! modelled. Unknown keys inside `config` are carried through untouched so a
//! parent produced by a newer builder does not lose fields on the way.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

/// Author recorded on the image and on every history entry we append.
pub const AUTHOR: &str = "Bazel";

/// `created_by` recorded on every history entry we append.
pub const CREATED_BY: &str = "bazel build ...";

/// Architecture stamped on every produced image.
pub const ARCHITECTURE: &str = "amd64";

/// Operating system stamped on every produced image.
pub const OS: &str = "linux";

/// The only rootfs type the image spec defines.
pub const ROOTFS_TYPE: &str = "layers";

/// Fixed creation time (0001-01-01T00:00:00Z) so output is reproducible.
pub fn sentinel_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(1, 1, 1, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Top-level image descriptor (`application/vnd.oci.image.config.v1+json`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageDescriptor {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default)]
    pub architecture: String,

    #[serde(default)]
    pub os: String,

    #[serde(default, deserialize_with = "null_default")]
    pub config: ImageConfig,

    #[serde(default, deserialize_with = "null_default")]
    pub rootfs: RootFs,

    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub history: Vec<History>,
}

/// Runtime configuration of the image (`config` object).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_swap: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu_shares: Option<i64>,

    /// Keys are `port/protocol`; serialized as an object of empty objects.
    #[serde(default, with = "object_set", skip_serializing_if = "BTreeSet::is_empty")]
    pub exposed_ports: BTreeSet<String>,

    #[serde(
        default,
        deserialize_with = "null_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub env: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entrypoint: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cmd: Option<Vec<String>>,

    #[serde(default, with = "object_set", skip_serializing_if = "BTreeSet::is_empty")]
    pub volumes: BTreeSet<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_dir: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<BTreeMap<String, String>>,

    /// Config keys we do not model (e.g. `StopSignal`), kept verbatim.
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

/// Layer content addresses (`rootfs` object).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RootFs {
    #[serde(rename = "type", default)]
    pub fs_type: String,

    /// Ordered bottom-most first.
    #[serde(default, deserialize_with = "null_default")]
    pub diff_ids: Vec<String>,
}

/// One entry in the image build history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct History {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_by: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,

    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub empty_layer: bool,
}

impl History {
    /// The entry appended for one invocation of the merge.
    pub fn build_step(empty_layer: bool) -> Self {
        Self {
            created: Some(sentinel_timestamp()),
            created_by: Some(CREATED_BY.to_string()),
            author: Some(AUTHOR.to_string()),
            comment: None,
            empty_layer,
        }
    }
}

/// Treat an explicit JSON `null` the same as a missing key.
fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Sets encoded the way the image spec does it: `{"80/tcp": {}, ...}`.
mod object_set {
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use serde_json::Value;
    use std::collections::{BTreeMap, BTreeSet};

    #[derive(Serialize)]
    struct Empty {}

    pub fn serialize<S>(set: &BTreeSet<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(set.len()))?;
        for key in set {
            map.serialize_entry(key, &Empty {})?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let map: Option<BTreeMap<String, Value>> = Option::deserialize(deserializer)?;
        Ok(map.map(|m| m.into_keys().collect()).unwrap_or_default())
    }
}
