//! Subcommand implementations.

use anyhow::{Context, Result};
use clap::Args;
use netpol_model::{LoadOptions, ManifestSource, NetworkPolicy, PolicySource};
use std::path::PathBuf;

pub mod describe;
pub mod translate;

/// Where policies come from and how they are loaded.
#[derive(Args, Debug)]
pub struct InputArgs {
    /// Manifest files or directories; `-` reads stdin
    #[arg(short = 'f', long = "filename", required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// Only keep policies in this namespace
    #[arg(short, long)]
    pub namespace: Option<String>,

    /// Namespace for manifests without metadata.namespace
    #[arg(long, env = "NSM_DEFAULT_NAMESPACE", default_value = "default")]
    pub default_namespace: String,

    /// Default an omitted policyTypes the way the API server does
    #[arg(long)]
    pub apply_defaults: bool,
}

/// Loads every policy named by the input arguments.
pub fn load_policies(input: &InputArgs) -> Result<Vec<NetworkPolicy>> {
    let source = ManifestSource::new(input.paths.iter().cloned())
        .with_namespace(input.namespace.clone())
        .with_options(LoadOptions {
            default_namespace: input.default_namespace.clone(),
            apply_defaults: input.apply_defaults,
        });

    source
        .list()
        .with_context(|| "Failed to load network policies")
}
