//! Reading the parent image config and writing the merged one.

use oci_config_merge::ImageDescriptor;
use sha2::{Digest, Sha256};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use tracing::debug;

use crate::error::{ImageConfigError, Result};

/// Load the parent image config, or an empty descriptor when there is none.
pub fn load_parent(base: Option<&Path>) -> Result<ImageDescriptor> {
    let Some(path) = base.filter(|p| !p.as_os_str().is_empty()) else {
        debug!("No base image config; starting from an empty descriptor");
        return Ok(ImageDescriptor::default());
    };

    let bytes = fs::read(path).map_err(|source| ImageConfigError::ReadBase {
        path: path.to_path_buf(),
        source,
    })?;
    let image: ImageDescriptor =
        serde_json::from_slice(&bytes).map_err(ImageConfigError::ParseBase)?;

    debug!(
        path = %path.display(),
        layers = image.rootfs.diff_ids.len(),
        history = image.history.len(),
        "Loaded base image config"
    );
    Ok(image)
}

/// Serialize `image` to `output`, replacing any existing file.
///
/// Returns `sha256:<hex>` of the bytes written.
pub fn save_image(image: &ImageDescriptor, output: &Path) -> Result<String> {
    let bytes = serde_json::to_vec(image).map_err(ImageConfigError::Encode)?;
    write_file(output, &bytes)?;
    Ok(sha256_digest(&bytes))
}

/// Write a digest string to `path`.
pub fn write_digest(path: &Path, digest: &str) -> Result<()> {
    write_file(path, digest.as_bytes())
}

/// `sha256:<hex>` of `bytes`
pub fn sha256_digest(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("sha256:{}", hex::encode(hasher.finalize()))
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    open_and_write(path, bytes).map_err(|source| ImageConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn open_and_write(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o644);
    }

    let mut file = options.open(path)?;
    file.write_all(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_no_base_is_empty_descriptor() {
        assert_eq!(load_parent(None).unwrap(), ImageDescriptor::default());
        assert_eq!(
            load_parent(Some(Path::new(""))).unwrap(),
            ImageDescriptor::default()
        );
    }

    #[test]
    fn test_missing_base() {
        let err = load_parent(Some(Path::new("/definitely/not/here.json"))).unwrap_err();
        assert!(matches!(err, ImageConfigError::ReadBase { .. }));
    }

    #[test]
    fn test_unparseable_base() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("base.json");
        fs::write(&path, "not json").unwrap();

        let err = load_parent(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ImageConfigError::ParseBase(_)));
        assert!(err
            .to_string()
            .starts_with("Could not convert base file to image config"));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        let mut image = ImageDescriptor::default();
        image.config.user = Some("app".to_string());

        let digest = save_image(&image, &path).unwrap();
        assert_eq!(digest, sha256_digest(&fs::read(&path).unwrap()));
        assert_eq!(load_parent(Some(path.as_path())).unwrap(), image);
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "x".repeat(4096)).unwrap();

        save_image(&ImageDescriptor::default(), &path).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with('{'));
        assert!(written.len() < 4096);
    }

    #[cfg(unix)]
    #[test]
    fn test_output_mode() {
        use std::os::unix::fs::PermissionsExt;

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.json");
        save_image(&ImageDescriptor::default(), &path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode() & 0o777;
        assert_eq!(mode & !0o644, 0);
    }

    #[test]
    fn test_unwritable_output() {
        let err = save_image(
            &ImageDescriptor::default(),
            Path::new("/definitely/not/here/config.json"),
        )
        .unwrap_err();
        assert!(matches!(err, ImageConfigError::Write { .. }));
    }

    #[test]
    fn test_sha256_digest() {
        assert_eq!(
            sha256_digest(b""),
            "sha256:e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }
}
