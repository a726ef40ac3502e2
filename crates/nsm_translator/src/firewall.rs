//! Firewall output model.
//!
//! Field names follow the JSON export consumed by existing audit tooling:
//! capitalized record fields, camelCase selectors and an upper-case `CIDR`.

use netpol_model::{LabelSelector, NetworkPolicyPort, PolicyType};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered firewall rules derived from one network policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallPolicy {
    /// Name of the source policy.
    #[serde(rename = "Name")]
    pub name: String,
    /// Namespace of the source policy.
    #[serde(rename = "Namespace")]
    pub namespace: String,
    /// Rules in evaluation order.
    #[serde(rename = "Rules", default)]
    pub rules: Vec<FirewallRule>,
}

/// A single ordered allow/reject decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallRule {
    /// Traffic source.
    #[serde(rename = "From")]
    pub from: FirewallLocation,
    /// Traffic destination.
    #[serde(rename = "To")]
    pub to: FirewallLocation,
    /// Decision.
    #[serde(rename = "Action")]
    pub action: RuleAction,
    /// Zero-based precedence; lower orders are evaluated first.
    #[serde(rename = "Order")]
    pub order: usize,
    /// Rule set the decision came from.
    #[serde(rename = "Direction")]
    pub direction: PolicyType,
}

/// A traffic endpoint. Only populated fields are serialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FirewallLocation {
    /// Pods matched by label.
    #[serde(rename = "podSelector", default, skip_serializing_if = "Option::is_none")]
    pub pod_selector: Option<LabelSelector>,
    /// Namespaces matched by label.
    #[serde(
        rename = "namespaceSelector",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub namespace_selector: Option<LabelSelector>,
    /// Address range.
    #[serde(rename = "CIDR", default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    /// Ports; empty means all ports.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<NetworkPolicyPort>,
}

/// Firewall decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RuleAction {
    /// Permit matching traffic.
    Allow,
    /// Refuse matching traffic.
    Reject,
}

impl FirewallPolicy {
    /// Creates a policy with no rules.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            rules: Vec::new(),
        }
    }
}

impl FirewallLocation {
    /// A location holding only a pod selector.
    #[must_use]
    pub fn pods(selector: LabelSelector) -> Self {
        Self {
            pod_selector: Some(selector),
            ..Self::default()
        }
    }

    /// A location holding only a namespace selector.
    #[must_use]
    pub fn namespaces(selector: LabelSelector) -> Self {
        Self {
            namespace_selector: Some(selector),
            ..Self::default()
        }
    }

    /// A location holding only a CIDR.
    #[must_use]
    pub fn cidr(cidr: impl Into<String>) -> Self {
        Self {
            cidr: Some(cidr.into()),
            ..Self::default()
        }
    }

    /// Attaches a port list.
    #[must_use]
    pub fn with_ports(mut self, ports: Vec<NetworkPolicyPort>) -> Self {
        self.ports = ports;
        self
    }
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Allow => f.write_str("ALLOW"),
            Self::Reject => f.write_str("REJECT"),
        }
    }
}

/// Renders as `pod: role=db ports: TCP/6379`; an empty location is `any`.
impl fmt::Display for FirewallLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(selector) = &self.pod_selector {
            parts.push(format!("pod: {selector}"));
        }
        if let Some(selector) = &self.namespace_selector {
            parts.push(format!("ns: {selector}"));
        }
        if let Some(cidr) = &self.cidr {
            parts.push(format!("cidr: {cidr}"));
        }
        if !self.ports.is_empty() {
            let ports: Vec<_> = self.ports.iter().map(ToString::to_string).collect();
            parts.push(format!("ports: {}", ports.join(",")));
        }

        if parts.is_empty() {
            f.write_str("any")
        } else {
            f.write_str(&parts.join(" "))
        }
    }
}
