//! Per-field merge strategies.
//!
//! Every config field the override set can touch is listed in
//! [`FIELD_STRATEGIES`] together with how an override combines with the
//! parent value. The merge walks this table in order.

use std::fmt;

/// How an override value combines with the parent value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// A non-empty override replaces the parent value entirely.
    Replace,
    /// Override entries are added to the parent set; duplicates collapse.
    SetUnion,
    /// Override `KEY=VALUE` pairs are inserted, overwriting equal keys.
    Upsert,
    /// Like `Upsert`, but values are expanded against the parent first.
    Expand,
}

/// A config field the override set can touch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    User,
    Memory,
    MemorySwap,
    CpuShares,
    ExposedPorts,
    Env,
    Entrypoint,
    Cmd,
    Volumes,
    WorkingDir,
    Labels,
}

/// Merge order and strategy for every field.
pub const FIELD_STRATEGIES: &[(Field, Strategy)] = &[
    (Field::User, Field::User.strategy()),
    (Field::Memory, Field::Memory.strategy()),
    (Field::MemorySwap, Field::MemorySwap.strategy()),
    (Field::CpuShares, Field::CpuShares.strategy()),
    (Field::ExposedPorts, Field::ExposedPorts.strategy()),
    (Field::Env, Field::Env.strategy()),
    (Field::Entrypoint, Field::Entrypoint.strategy()),
    (Field::Cmd, Field::Cmd.strategy()),
    (Field::Volumes, Field::Volumes.strategy()),
    (Field::WorkingDir, Field::WorkingDir.strategy()),
    (Field::Labels, Field::Labels.strategy()),
];

impl Field {
    /// How overrides for this field combine with the parent value.
    pub const fn strategy(self) -> Strategy {
        match self {
            Self::User
            | Self::Memory
            | Self::MemorySwap
            | Self::CpuShares
            | Self::Entrypoint
            | Self::Cmd
            | Self::WorkingDir => Strategy::Replace,
            Self::ExposedPorts | Self::Volumes => Strategy::SetUnion,
            Self::Env => Strategy::Expand,
            Self::Labels => Strategy::Upsert,
        }
    }

    /// Key of this field in the serialized config.
    pub fn json_key(self) -> &'static str {
        match self {
            Self::User => "User",
            Self::Memory => "Memory",
            Self::MemorySwap => "MemorySwap",
            Self::CpuShares => "CpuShares",
            Self::ExposedPorts => "ExposedPorts",
            Self::Env => "Env",
            Self::Entrypoint => "Entrypoint",
            Self::Cmd => "Cmd",
            Self::Volumes => "Volumes",
            Self::WorkingDir => "WorkingDir",
            Self::Labels => "Labels",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.json_key())
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Replace => write!(f, "replace"),
            Self::SetUnion => write!(f, "set-union"),
            Self::Upsert => write!(f, "upsert"),
            Self::Expand => write!(f, "expand"),
        }
    }
}
