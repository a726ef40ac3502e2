//! Manifest loading from files, directories and streams.
//!
//! Accepts what `kubectl get networkpolicy -A -o yaml|json` produces as well
//! as hand-written manifests: single documents, multi-document YAML streams,
//! concatenated JSON documents, and `List`/`NetworkPolicyList` wrappers.

use crate::error::{Error, Result};
use crate::model::{EgressRule, IngressRule, NetworkPolicy, PolicyType};
use crate::selector::LabelSelector;
use serde::Deserialize;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Path that selects standard input.
pub const STDIN_PATH: &str = "-";

/// Namespace assigned to manifests that omit `metadata.namespace`.
pub const DEFAULT_NAMESPACE: &str = "default";

const MANIFEST_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Options controlling how manifests become policies.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Namespace for manifests without `metadata.namespace`.
    pub default_namespace: String,
    /// Apply API-server defaulting to an omitted `policyTypes`.
    pub apply_defaults: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            default_namespace: DEFAULT_NAMESPACE.to_string(),
            apply_defaults: false,
        }
    }
}

/// A supplier of network policies.
pub trait PolicySource {
    /// Lists every policy the source holds, in source order.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying store cannot be read or parsed.
    fn list(&self) -> Result<Vec<NetworkPolicy>>;
}

/// Reads policies from manifest files, directories or stdin.
#[derive(Debug, Clone, Default)]
pub struct ManifestSource {
    paths: Vec<PathBuf>,
    namespace: Option<String>,
    options: LoadOptions,
}

impl ManifestSource {
    /// Creates a source over the given paths. `-` reads stdin.
    #[must_use]
    pub fn new<P: Into<PathBuf>>(paths: impl IntoIterator<Item = P>) -> Self {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            namespace: None,
            options: LoadOptions::default(),
        }
    }

    /// Keeps only policies in `namespace`.
    #[must_use]
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        self.namespace = namespace;
        self
    }

    /// Sets the load options.
    #[must_use]
    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    fn load_path(&self, path: &Path) -> Result<Vec<NetworkPolicy>> {
        if path.as_os_str() == STDIN_PATH {
            let mut input = String::new();
            std::io::stdin().read_to_string(&mut input)?;
            return parse_manifests(&input, &self.options);
        }

        if path.is_dir() {
            let mut policies = Vec::new();
            for file in manifest_files(path)? {
                policies.extend(self.load_path(&file)?);
            }
            return Ok(policies);
        }

        debug!("Reading manifest: {}", path.display());
        let input = std::fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        parse_manifests(&input, &self.options)
    }
}

impl PolicySource for ManifestSource {
    fn list(&self) -> Result<Vec<NetworkPolicy>> {
        let mut policies = Vec::new();
        for path in &self.paths {
            policies.extend(self.load_path(path)?);
        }

        if let Some(namespace) = &self.namespace {
            policies.retain(|p| &p.namespace == namespace);
        }

        info!(
            "Loaded {} network policies from {} path(s)",
            policies.len(),
            self.paths.len()
        );
        Ok(policies)
    }
}

/// Lists manifest files directly inside `dir`, sorted by path.
fn manifest_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|source| Error::Read {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?.path();
        let is_manifest = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| MANIFEST_EXTENSIONS.contains(&ext));
        if path.is_file() && is_manifest {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Envelope of any Kubernetes object.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawManifest {
    #[serde(default)]
    kind: Option<String>,
    #[serde(default)]
    metadata: RawMetadata,
    #[serde(default)]
    spec: Option<RawSpec>,
    #[serde(default)]
    items: Vec<serde_yaml::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct RawMetadata {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    namespace: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSpec {
    #[serde(default)]
    pod_selector: LabelSelector,
    #[serde(default)]
    policy_types: Option<Vec<PolicyType>>,
    #[serde(default)]
    ingress: Vec<IngressRule>,
    #[serde(default)]
    egress: Vec<EgressRule>,
}

impl RawManifest {
    fn into_policy(self, document: usize, options: &LoadOptions) -> Result<NetworkPolicy> {
        let name = self.metadata.name.ok_or(Error::MissingField {
            document,
            field: "metadata.name",
        })?;
        let namespace = self
            .metadata
            .namespace
            .unwrap_or_else(|| options.default_namespace.clone());
        let spec = self.spec.unwrap_or_default();

        let declared = spec.policy_types.is_some();
        let mut policy = NetworkPolicy {
            name,
            namespace,
            pod_selector: spec.pod_selector,
            policy_types: spec.policy_types.unwrap_or_default(),
            ingress: spec.ingress,
            egress: spec.egress,
        };

        if options.apply_defaults && !declared {
            policy.default_policy_types();
            debug!(
                "Defaulted policyTypes of {}/{} to {:?}",
                policy.namespace, policy.name, policy.policy_types
            );
        }

        Ok(policy)
    }
}

/// Parses every network policy in a YAML or JSON stream.
///
/// Documents of other kinds are skipped with a warning. Empty documents are
/// ignored.
///
/// # Errors
///
/// Returns an error if:
/// - The stream is not valid YAML/JSON
/// - A document has no `kind`
/// - A policy has no `metadata.name`
pub fn parse_manifests(input: &str, options: &LoadOptions) -> Result<Vec<NetworkPolicy>> {
    let documents = if looks_like_json(input) {
        serde_json::Deserializer::from_str(input)
            .into_iter::<serde_yaml::Value>()
            .collect::<std::result::Result<Vec<_>, _>>()?
    } else {
        serde_yaml::Deserializer::from_str(input)
            .map(serde_yaml::Value::deserialize)
            .collect::<std::result::Result<Vec<_>, _>>()?
    };

    let mut policies = Vec::new();
    for (document, value) in documents.into_iter().enumerate() {
        if value.is_null() {
            continue;
        }
        collect(value, document, None, options, &mut policies)?;
    }
    Ok(policies)
}

fn looks_like_json(input: &str) -> bool {
    input.trim_start().starts_with('{')
}

/// Adds the policies held by one object to `out`, descending into lists.
fn collect(
    value: serde_yaml::Value,
    document: usize,
    implied_kind: Option<&str>,
    options: &LoadOptions,
    out: &mut Vec<NetworkPolicy>,
) -> Result<()> {
    let manifest: RawManifest =
        serde_yaml::from_value(value).map_err(|e| Error::invalid(document, e.to_string()))?;

    let kind = manifest
        .kind
        .clone()
        .or_else(|| implied_kind.map(String::from))
        .ok_or(Error::MissingField {
            document,
            field: "kind",
        })?;

    match kind.as_str() {
        "NetworkPolicy" => out.push(manifest.into_policy(document, options)?),
        "NetworkPolicyList" => {
            for item in manifest.items {
                collect(item, document, Some("NetworkPolicy"), options, out)?;
            }
        }
        "List" => {
            for item in manifest.items {
                collect(item, document, None, options, out)?;
            }
        }
        other => {
            warn!("Skipping document {} of kind {}", document, other);
        }
    }
    Ok(())
}
