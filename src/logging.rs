//! Log setup for the `image-config` binary.
//!
//! Logs go to stderr; stdout is reserved for the error message printed on
//! failure.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "image_config=info,oci_image_config=info";

/// Filter used with `--verbose`, regardless of `RUST_LOG`.
pub const VERBOSE_FILTER: &str = "image_config=debug,oci_image_config=debug";

/// Pick the filter for this run.
pub fn filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    }
}

/// Install the global subscriber. Call once, from `main`.
pub fn init(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(filter(verbose))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
