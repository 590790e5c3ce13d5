//! OCI image config merge.
//!
//! Takes a parent image descriptor and a set of build-time overrides and
//! produces the child descriptor: config fields merged by a per-field
//! strategy table, new layer digests appended to `rootfs.diff_ids`, and
//! exactly one history entry appended.
//!
//! The transform is pure and total. Reading the parent and writing the
//! result are left to the caller.

pub mod expand;
pub mod image;
pub mod kv;
mod overrides;
pub mod strategy;

pub use expand::expand;
pub use image::{
    sentinel_timestamp, History, ImageConfig, ImageDescriptor, RootFs, ARCHITECTURE, AUTHOR,
    CREATED_BY, OS, ROOTFS_TYPE,
};
pub use kv::{parse_key_value, parse_pairs};
pub use overrides::{normalize_layer, normalize_port, OverrideSet, DIGEST_ALGORITHM};
pub use strategy::{Field, Strategy, FIELD_STRATEGIES};
