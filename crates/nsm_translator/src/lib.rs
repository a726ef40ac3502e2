//! NetworkPolicy to firewall rule translator for NSM.
//!
//! The translator is **pure and deterministic**:
//! - No I/O
//! - No shared state between calls
//! - Same input always produces same output
//!
//! Reporting (tables, JSON, YAML, CSV) and policy descriptions live beside
//! it but never feed back into translation.
//!
//! # Example
//!
//! ```rust
//! use netpol_model::{IngressRule, LabelSelector, NetworkPolicy, NetworkPolicyPort, PolicyPeer, PolicyType};
//! use nsm_translator::{translate, RuleAction};
//!
//! let policy = NetworkPolicy::new("default", "db")
//!     .with_pod_selector(LabelSelector::from_labels([("role", "db")]))
//!     .with_policy_types([PolicyType::Ingress])
//!     .with_ingress(IngressRule::new(
//!         vec![NetworkPolicyPort::tcp(6379)],
//!         vec![PolicyPeer::ip_block("172.17.0.0/16", ["172.17.1.0/24"])],
//!     ));
//!
//! let firewall = translate(&policy);
//! assert_eq!(firewall.rules.len(), 2);
//! assert_eq!(firewall.rules[0].action, RuleAction::Reject);
//! assert_eq!(firewall.rules[1].action, RuleAction::Allow);
//! ```

#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::format_push_string)]
#![allow(clippy::uninlined_format_args)]

pub mod describe;
pub mod error;
pub mod firewall;
pub mod report;
pub mod translator;

pub use error::{Error, Result};
pub use firewall::{FirewallLocation, FirewallPolicy, FirewallRule, RuleAction};
pub use report::{OutputFormat, Reporter};
pub use translator::{translate, translate_all};
