//! One invocation, end to end: resolve inputs, merge, write.

use oci_config_merge::ImageDescriptor;
use std::path::PathBuf;
use tracing::{debug, info};

use crate::config::OverrideSettings;
use crate::error::{ImageConfigError, Result};
use crate::layers::resolve_layers;
use crate::serialization::{load_parent, save_image, write_digest};

/// What a successful run produced
#[derive(Debug, Clone)]
pub struct BuildOutcome {
    pub output: PathBuf,
    /// `sha256:<hex>` of the written config
    pub digest: String,
    pub image: ImageDescriptor,
}

/// Build the child image config described by `settings` and write it out.
pub fn run(settings: &OverrideSettings) -> Result<BuildOutcome> {
    let output = settings
        .output
        .clone()
        .filter(|p| !p.as_os_str().is_empty())
        .ok_or(ImageConfigError::MissingOutput)?;

    let parent = load_parent(settings.base.as_deref())?;
    let layers = resolve_layers(&settings.layers)?;
    let overrides = settings.override_set(layers);

    for (field, strategy) in overrides.applied_fields() {
        debug!(%field, %strategy, "Applying override");
    }

    let image = overrides.create_image(parent);
    let digest = save_image(&image, &output)?;
    info!(
        output = %output.display(),
        %digest,
        layers = image.rootfs.diff_ids.len(),
        history = image.history.len(),
        "Wrote image config"
    );

    if let Some(path) = &settings.digest_output {
        write_digest(path, &digest)?;
        debug!(path = %path.display(), "Wrote config digest");
    }

    Ok(BuildOutcome {
        output,
        digest,
        image,
    })
}
