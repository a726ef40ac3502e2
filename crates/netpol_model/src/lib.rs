//! Typed Kubernetes `NetworkPolicy` model and manifest loading for NSM.
//!
//! This crate provides:
//! - A typed model of the `networking.k8s.io/v1` `NetworkPolicy` resource
//! - Label selectors and ports rendered in `kubectl` syntax
//! - A manifest loader that reads YAML/JSON streams, lists and directories
//!
//! # Example
//!
//! ```rust
//! use netpol_model::{parse_manifests, LoadOptions, PolicyType};
//!
//! let input = r#"
//! apiVersion: networking.k8s.io/v1
//! kind: NetworkPolicy
//! metadata:
//!   name: db
//!   namespace: prod
//! spec:
//!   podSelector:
//!     matchLabels:
//!       role: db
//!   policyTypes: [Ingress]
//! "#;
//!
//! let policies = parse_manifests(input, &LoadOptions::default()).unwrap();
//! assert_eq!(policies[0].name, "db");
//! assert!(policies[0].declares(PolicyType::Ingress));
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod error;
pub mod loader;
pub mod model;
pub mod selector;

pub use error::{Error, Result};
pub use loader::{parse_manifests, LoadOptions, ManifestSource, PolicySource};
pub use model::{
    EgressRule, IngressRule, IpBlock, NetworkPolicy, NetworkPolicyPort, PolicyPeer, PolicyType,
    PortValue, Protocol,
};
pub use selector::{LabelSelector, LabelSelectorRequirement, SelectorOperator};
