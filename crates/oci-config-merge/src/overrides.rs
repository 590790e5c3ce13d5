//! The override set and the merge itself.

use std::collections::{BTreeMap, BTreeSet};

use crate::expand::expand;
use crate::image::{
    sentinel_timestamp, History, ImageConfig, ImageDescriptor, RootFs, ARCHITECTURE, AUTHOR, OS,
    ROOTFS_TYPE,
};
use crate::kv::parse_pairs;
use crate::strategy::{Field, Strategy, FIELD_STRATEGIES};

/// Algorithm tag prepended to layer digests in `rootfs.diff_ids`.
pub const DIGEST_ALGORITHM: &str = "sha256";

/// Values layered onto a parent image by one build step.
///
/// Empty strings, zero numbers and empty lists mean "leave the parent
/// value alone".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OverrideSet {
    /// Layer digests added by this step, bottom-most first.
    pub layers: Vec<String>,

    pub user: Option<String>,
    pub memory: Option<i64>,
    pub memory_swap: Option<i64>,
    pub cpu_shares: Option<i64>,

    /// `port` or `port/protocol`; a bare port means tcp.
    pub ports: Vec<String>,

    /// `KEY=VALUE`, may reference parent variables as `$KEY` / `${KEY}`.
    pub env: Vec<String>,

    pub entrypoint: Vec<String>,
    pub command: Vec<String>,
    pub volumes: Vec<String>,
    pub working_dir: Option<String>,

    /// `KEY=VALUE`
    pub labels: Vec<String>,
}

impl OverrideSet {
    /// Build the child image descriptor from `parent`.
    pub fn create_image(&self, parent: ImageDescriptor) -> ImageDescriptor {
        ImageDescriptor {
            created: Some(sentinel_timestamp()),
            author: Some(AUTHOR.to_string()),
            architecture: ARCHITECTURE.to_string(),
            os: OS.to_string(),
            config: self.merge_config(parent.config),
            rootfs: self.merge_rootfs(parent.rootfs),
            history: self.merge_history(parent.history),
        }
    }

    /// Merge the override fields onto `parent`, one field at a time in
    /// [`FIELD_STRATEGIES`] order.
    pub fn merge_config(&self, parent: ImageConfig) -> ImageConfig {
        let mut config = parent;
        for (field, strategy) in FIELD_STRATEGIES {
            if self.is_set(*field) {
                self.apply(*field, *strategy, &mut config);
            }
        }
        config
    }

    /// Append this step's layers to the parent's `diff_ids`.
    pub fn merge_rootfs(&self, parent: RootFs) -> RootFs {
        let mut diff_ids = parent.diff_ids;
        diff_ids.extend(self.layers.iter().map(|layer| normalize_layer(layer)));
        RootFs {
            fs_type: ROOTFS_TYPE.to_string(),
            diff_ids,
        }
    }

    /// Append exactly one history entry; it is an empty layer when this
    /// step added no layers.
    pub fn merge_history(&self, parent: Vec<History>) -> Vec<History> {
        let mut history = parent;
        history.push(History::build_step(self.layers.is_empty()));
        history
    }

    /// Fields this override set will change, with their strategies.
    pub fn applied_fields(&self) -> Vec<(Field, Strategy)> {
        FIELD_STRATEGIES
            .iter()
            .filter(|(field, _)| self.is_set(*field))
            .copied()
            .collect()
    }

    /// Whether the override for `field` is non-empty.
    pub fn is_set(&self, field: Field) -> bool {
        match field {
            Field::User => non_empty(&self.user).is_some(),
            Field::Memory => non_zero(self.memory).is_some(),
            Field::MemorySwap => non_zero(self.memory_swap).is_some(),
            Field::CpuShares => non_zero(self.cpu_shares).is_some(),
            Field::ExposedPorts => !self.ports.is_empty(),
            Field::Env => !self.env.is_empty(),
            Field::Entrypoint => !self.entrypoint.is_empty(),
            Field::Cmd => !self.command.is_empty(),
            Field::Volumes => !self.volumes.is_empty(),
            Field::WorkingDir => non_empty(&self.working_dir).is_some(),
            Field::Labels => !self.labels.is_empty(),
        }
    }

    /// Merge the override for `field` into `config` using `strategy`.
    ///
    /// Returns false when `strategy` does not apply to `field`; the config
    /// is then left untouched.
    fn apply(&self, field: Field, strategy: Strategy, config: &mut ImageConfig) -> bool {
        match strategy {
            Strategy::Replace => self.replace_field(field, config),
            Strategy::SetUnion => self.union_field(field, config),
            Strategy::Upsert => self.upsert_field(field, config),
            Strategy::Expand => self.expand_field(field, config),
        }
    }

    fn replace_field(&self, field: Field, config: &mut ImageConfig) -> bool {
        match field {
            Field::User => replace(&mut config.user, non_empty(&self.user)),
            Field::Memory => replace(&mut config.memory, non_zero(self.memory)),
            Field::MemorySwap => replace(&mut config.memory_swap, non_zero(self.memory_swap)),
            Field::CpuShares => replace(&mut config.cpu_shares, non_zero(self.cpu_shares)),
            Field::Entrypoint => replace(&mut config.entrypoint, non_empty_list(&self.entrypoint)),
            Field::Cmd => replace(&mut config.cmd, non_empty_list(&self.command)),
            Field::WorkingDir => replace(&mut config.working_dir, non_empty(&self.working_dir)),
            _ => return false,
        }
        true
    }

    fn union_field(&self, field: Field, config: &mut ImageConfig) -> bool {
        match field {
            Field::ExposedPorts => set_union(
                &mut config.exposed_ports,
                self.ports.iter().map(|port| normalize_port(port)),
            ),
            Field::Volumes => set_union(&mut config.volumes, self.volumes.iter().cloned()),
            _ => return false,
        }
        true
    }

    fn upsert_field(&self, field: Field, config: &mut ImageConfig) -> bool {
        match field {
            Field::Labels => upsert(
                config.labels.get_or_insert_with(BTreeMap::new),
                &self.labels,
            ),
            _ => return false,
        }
        true
    }

    fn expand_field(&self, field: Field, config: &mut ImageConfig) -> bool {
        match field {
            Field::Env => config.env = expand_env(&config.env, &self.env),
            _ => return false,
        }
        true
    }
}

/// `80` becomes `80/tcp`; anything with a protocol passes through.
pub fn normalize_port(port: &str) -> String {
    if port.contains('/') {
        port.to_string()
    } else {
        format!("{port}/tcp")
    }
}

/// Prefix a layer digest with the digest algorithm. The prefix is added
/// unconditionally: `sha256:abc` becomes `sha256:sha256:abc`.
pub fn normalize_layer(layer: &str) -> String {
    format!("{DIGEST_ALGORITHM}:{layer}")
}

fn replace<T>(target: &mut Option<T>, value: Option<T>) {
    if let Some(value) = value {
        *target = Some(value);
    }
}

fn set_union<I>(target: &mut BTreeSet<String>, values: I)
where
    I: IntoIterator<Item = String>,
{
    target.extend(values);
}

fn upsert(target: &mut BTreeMap<String, String>, entries: &[String]) {
    target.extend(parse_pairs(entries));
}

/// Merge override env entries onto the parent env.
///
/// References in override values resolve against the parent env as it was
/// before this merge; a name the parent does not define expands to itself.
/// The result is sorted by the full `KEY=VALUE` string.
fn expand_env(parent: &[String], overrides: &[String]) -> Vec<String> {
    let parent_env = parse_pairs(parent);
    let mut merged = parent_env.clone();

    for (key, value) in parse_pairs(overrides) {
        let expanded = expand(&value, |name| {
            parent_env
                .get(name)
                .cloned()
                .unwrap_or_else(|| name.to_string())
        });
        merged.insert(key, expanded);
    }

    let mut env: Vec<String> = merged
        .into_iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect();
    env.sort();
    env
}

fn non_empty(value: &Option<String>) -> Option<String> {
    value.as_ref().filter(|v| !v.is_empty()).cloned()
}

fn non_zero(value: Option<i64>) -> Option<i64> {
    value.filter(|v| *v != 0)
}

fn non_empty_list(values: &[String]) -> Option<Vec<String>> {
    (!values.is_empty()).then(|| values.to_vec())
}
