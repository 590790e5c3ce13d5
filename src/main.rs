//! image-config CLI
//!
//! Entry point for the `image-config` command-line tool.

use clap::Parser;
use oci_image_config::{config, logging, pipeline, OverrideSettings};
use std::path::PathBuf;
use std::process;

#[derive(Parser)]
#[command(name = "image-config")]
#[command(about = "Merge build overrides onto a parent OCI image config", version)]
struct Cli {
    /// Path to the parent image's config
    #[arg(long)]
    base: Option<PathBuf>,

    /// The output file to generate
    #[arg(long)]
    output: Option<PathBuf>,

    /// Layer sha256 digests that make up this image (`@file` reads the digest from a file)
    #[arg(long = "layer", value_delimiter = ',')]
    layers: Vec<String>,

    /// Set the 'User' for the image
    #[arg(long)]
    user: Option<String>,

    /// Set the 'Memory' for the image
    #[arg(long)]
    memory: Option<i64>,

    /// Set the 'MemorySwap' for the image
    #[arg(long)]
    memory_swap: Option<i64>,

    /// Set the 'CpuShares' for the image
    #[arg(long)]
    cpu_shares: Option<i64>,

    /// Augment the 'ExposedPorts' for the image (`80` means `80/tcp`)
    #[arg(long = "port", value_delimiter = ',')]
    ports: Vec<String>,

    /// Augment the 'Env' for the image (KEY=VALUE, may reference parent $VARS)
    #[arg(long = "env")]
    env: Vec<String>,

    /// Set the 'Entrypoint' for the image
    #[arg(long = "entry-point", value_delimiter = ',', allow_hyphen_values = true)]
    entrypoint: Vec<String>,

    /// Set the 'Cmd' for the image
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    command: Vec<String>,

    /// Augment the 'Volumes' for the image
    #[arg(long = "volume", value_delimiter = ',')]
    volumes: Vec<String>,

    /// Set the 'WorkingDir' for the image
    #[arg(long)]
    working_dir: Option<String>,

    /// Augment the 'Labels' for the image (KEY=VALUE)
    #[arg(long = "label")]
    labels: Vec<String>,

    /// TOML file with default override values; flags take precedence
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Also write `sha256:<hex>` of the generated config to this file
    #[arg(long)]
    digest_output: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

impl Cli {
    fn override_settings(&self) -> OverrideSettings {
        OverrideSettings {
            base: self.base.clone(),
            output: self.output.clone(),
            digest_output: self.digest_output.clone(),
            layers: self.layers.clone(),
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
}

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = config::resolve(cli.settings.as_deref(), &cli.override_settings())
        .and_then(|settings| pipeline::run(&settings));

    if let Err(e) = result {
        println!("{}", e);
        process::exit(1);
    }
}
