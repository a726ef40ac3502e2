//! Typed network policy model.
//!
//! These types mirror the `networking.k8s.io/v1` `NetworkPolicy` shape after
//! the manifest envelope (`apiVersion`, `kind`, `metadata`) has been removed.

use crate::selector::LabelSelector;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A network policy: a subject selector plus ingress and egress rule sets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicy {
    /// Policy name.
    pub name: String,
    /// Namespace the policy lives in.
    pub namespace: String,
    /// Pods this policy protects.
    #[serde(default)]
    pub pod_selector: LabelSelector,
    /// Declared traffic directions. Only declared directions are translated.
    #[serde(default)]
    pub policy_types: Vec<PolicyType>,
    /// Inbound traffic rules.
    #[serde(default)]
    pub ingress: Vec<IngressRule>,
    /// Outbound traffic rules.
    #[serde(default)]
    pub egress: Vec<EgressRule>,
}

/// A traffic direction a policy may declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PolicyType {
    /// Traffic into the selected pods.
    Ingress,
    /// Traffic out of the selected pods.
    Egress,
}

/// Inbound traffic rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressRule {
    /// Ports allowed; empty means all ports.
    #[serde(default)]
    pub ports: Vec<NetworkPolicyPort>,
    /// Source peers allowed.
    #[serde(default)]
    pub from: Vec<PolicyPeer>,
}

/// Outbound traffic rule.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EgressRule {
    /// Ports allowed; empty means all ports.
    #[serde(default)]
    pub ports: Vec<NetworkPolicyPort>,
    /// Destination peers allowed.
    #[serde(default)]
    pub to: Vec<PolicyPeer>,
}

/// A peer descriptor.
///
/// The API exposes three optional fields rather than a tagged union, so a
/// single peer may populate more than one of them. Consumers must treat each
/// populated field independently.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyPeer {
    /// CIDR range with carved-out exceptions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_block: Option<IpBlock>,
    /// Pods in the policy's namespace.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pod_selector: Option<LabelSelector>,
    /// Namespaces.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace_selector: Option<LabelSelector>,
}

/// A CIDR range minus a list of excluded sub-ranges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpBlock {
    /// Base range, e.g. `172.17.0.0/16`.
    pub cidr: String,
    /// Ranges carved out of `cidr`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub except: Vec<String>,
}

/// A port (or port range) a rule applies to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkPolicyPort {
    /// Protocol; TCP when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub protocol: Option<Protocol>,
    /// Numeric or named port; all ports when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<PortValue>,
    /// Last port of a range starting at `port`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_port: Option<i32>,
}

/// Transport protocol.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Protocol {
    /// TCP.
    #[default]
    Tcp,
    /// UDP.
    Udp,
    /// SCTP.
    Sctp,
}

/// A port given by number or by container port name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PortValue {
    /// Port number.
    Number(i32),
    /// Named container port.
    Name(String),
}

impl NetworkPolicy {
    /// Creates a policy with an empty subject selector and no rules.
    #[must_use]
    pub fn new(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            namespace: namespace.into(),
            pod_selector: LabelSelector::default(),
            policy_types: Vec::new(),
            ingress: Vec::new(),
            egress: Vec::new(),
        }
    }

    /// Sets the subject selector.
    #[must_use]
    pub fn with_pod_selector(mut self, selector: LabelSelector) -> Self {
        self.pod_selector = selector;
        self
    }

    /// Sets the declared policy types.
    #[must_use]
    pub fn with_policy_types(mut self, types: impl IntoIterator<Item = PolicyType>) -> Self {
        self.policy_types = types.into_iter().collect();
        self
    }

    /// Appends an ingress rule.
    #[must_use]
    pub fn with_ingress(mut self, rule: IngressRule) -> Self {
        self.ingress.push(rule);
        self
    }

    /// Appends an egress rule.
    #[must_use]
    pub fn with_egress(mut self, rule: EgressRule) -> Self {
        self.egress.push(rule);
        self
    }

    /// Returns true if the policy declares the given direction.
    #[must_use]
    pub fn declares(&self, policy_type: PolicyType) -> bool {
        self.policy_types.contains(&policy_type)
    }

    /// Fills in `policy_types` the way the API server does when the field is
    /// omitted: `Ingress` always, `Egress` only when egress rules exist.
    pub fn default_policy_types(&mut self) {
        if !self.policy_types.is_empty() {
            return;
        }
        self.policy_types.push(PolicyType::Ingress);
        if !self.egress.is_empty() {
            self.policy_types.push(PolicyType::Egress);
        }
    }
}

impl IngressRule {
    /// Creates an ingress rule.
    #[must_use]
    pub const fn new(ports: Vec<NetworkPolicyPort>, from: Vec<PolicyPeer>) -> Self {
        Self { ports, from }
    }
}

impl EgressRule {
    /// Creates an egress rule.
    #[must_use]
    pub const fn new(ports: Vec<NetworkPolicyPort>, to: Vec<PolicyPeer>) -> Self {
        Self { ports, to }
    }
}

impl PolicyPeer {
    /// Creates a peer holding only an IP block.
    #[must_use]
    pub fn ip_block<S: Into<String>>(
        cidr: impl Into<String>,
        except: impl IntoIterator<Item = S>,
    ) -> Self {
        Self {
            ip_block: Some(IpBlock {
                cidr: cidr.into(),
                except: except.into_iter().map(Into::into).collect(),
            }),
            ..Self::default()
        }
    }

    /// Creates a peer holding only a pod selector.
    #[must_use]
    pub fn pods(selector: LabelSelector) -> Self {
        Self {
            pod_selector: Some(selector),
            ..Self::default()
        }
    }

    /// Creates a peer holding only a namespace selector.
    #[must_use]
    pub fn namespaces(selector: LabelSelector) -> Self {
        Self {
            namespace_selector: Some(selector),
            ..Self::default()
        }
    }

    /// Returns true if no shape is populated.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.ip_block.is_none() && self.pod_selector.is_none() && self.namespace_selector.is_none()
    }
}

impl NetworkPolicyPort {
    /// Creates a numeric port.
    #[must_use]
    pub const fn new(protocol: Protocol, port: i32) -> Self {
        Self {
            protocol: Some(protocol),
            port: Some(PortValue::Number(port)),
            end_port: None,
        }
    }

    /// Creates a TCP port.
    #[must_use]
    pub const fn tcp(port: i32) -> Self {
        Self::new(Protocol::Tcp, port)
    }

    /// Creates a UDP port.
    #[must_use]
    pub const fn udp(port: i32) -> Self {
        Self::new(Protocol::Udp, port)
    }

    /// Extends the port into a range ending at `end_port`.
    #[must_use]
    pub fn with_end_port(mut self, end_port: i32) -> Self {
        self.end_port = Some(end_port);
        self
    }
}

impl fmt::Display for PolicyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ingress => f.write_str("Ingress"),
            Self::Egress => f.write_str("Egress"),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tcp => f.write_str("TCP"),
            Self::Udp => f.write_str("UDP"),
            Self::Sctp => f.write_str("SCTP"),
        }
    }
}

impl fmt::Display for PortValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Renders as `TCP/6379`, `UDP/53-60` or `TCP/*`.
impl fmt::Display for NetworkPolicyPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let protocol = self.protocol.unwrap_or_default();
        match (&self.port, self.end_port) {
            (None, _) => write!(f, "{protocol}/*"),
            (Some(port), None) => write!(f, "{protocol}/{port}"),
            (Some(port), Some(end)) => write!(f, "{protocol}/{port}-{end}"),
        }
    }
}

impl fmt::Display for IpBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.cidr)?;
        if !self.except.is_empty() {
            write!(f, " except {}", self.except.join(","))?;
        }
        Ok(())
    }
}
