//! Network policy translation.
//!
//! Each peer of each declared rule set expands into one or more firewall
//! rules. For an IP block, the REJECT rules for its exceptions are emitted
//! before the ALLOW rule for the block itself, so a top-down evaluator sees
//! the carve-outs first.

use crate::firewall::{FirewallLocation, FirewallPolicy, FirewallRule, RuleAction};
use netpol_model::{LabelSelector, NetworkPolicy, NetworkPolicyPort, PolicyPeer, PolicyType};
use tracing::debug;

/// Translates one network policy into ordered firewall rules.
///
/// Only directions listed in `policy_types` are expanded; ingress rules are
/// emitted before egress rules. A peer with several shapes populated yields
/// rules for each shape, in the order IP block, pod selector, namespace
/// selector. A peer with no shape yields nothing.
#[must_use]
pub fn translate(policy: &NetworkPolicy) -> FirewallPolicy {
    let mut emitter = RuleEmitter::new(&policy.pod_selector);

    if policy.declares(PolicyType::Ingress) {
        for rule in &policy.ingress {
            for peer in &rule.from {
                emitter.expand_peer(PolicyType::Ingress, peer, &rule.ports);
            }
        }
    }

    if policy.declares(PolicyType::Egress) {
        for rule in &policy.egress {
            for peer in &rule.to {
                emitter.expand_peer(PolicyType::Egress, peer, &rule.ports);
            }
        }
    }

    let rules = emitter.finish();
    debug!(
        "Translated {}/{} into {} firewall rules",
        policy.namespace,
        policy.name,
        rules.len()
    );

    FirewallPolicy {
        name: policy.name.clone(),
        namespace: policy.namespace.clone(),
        rules,
    }
}

/// Translates policies in order, one firewall policy per input.
#[must_use]
pub fn translate_all(policies: &[NetworkPolicy]) -> Vec<FirewallPolicy> {
    policies.iter().map(translate).collect()
}

/// Per-call rule accumulator.
struct RuleEmitter<'a> {
    subject: &'a LabelSelector,
    rules: Vec<FirewallRule>,
    next_order: usize,
}

impl<'a> RuleEmitter<'a> {
    const fn new(subject: &'a LabelSelector) -> Self {
        Self {
            subject,
            rules: Vec::new(),
            next_order: 0,
        }
    }

    fn expand_peer(
        &mut self,
        direction: PolicyType,
        peer: &PolicyPeer,
        ports: &[NetworkPolicyPort],
    ) {
        if let Some(block) = &peer.ip_block {
            for except in &block.except {
                let remote = FirewallLocation::cidr(except).with_ports(ports.to_vec());
                self.emit(direction, remote, RuleAction::Reject);
            }
            let remote = FirewallLocation::cidr(&block.cidr).with_ports(ports.to_vec());
            self.emit(direction, remote, RuleAction::Allow);
        }

        if let Some(selector) = &peer.pod_selector {
            let remote = FirewallLocation::pods(selector.clone()).with_ports(ports.to_vec());
            self.emit(direction, remote, RuleAction::Allow);
        }

        if let Some(selector) = &peer.namespace_selector {
            let remote = FirewallLocation::namespaces(selector.clone()).with_ports(ports.to_vec());
            self.emit(direction, remote, RuleAction::Allow);
        }
    }

    /// Appends a rule between the subject pods and `remote`.
    fn emit(&mut self, direction: PolicyType, remote: FirewallLocation, action: RuleAction) {
        let local = FirewallLocation::pods(self.subject.clone());
        let (from, to) = match direction {
            PolicyType::Ingress => (remote, local),
            PolicyType::Egress => (local, remote),
        };

        self.rules.push(FirewallRule {
            from,
            to,
            action,
            order: self.next_order,
            direction,
        });
        self.next_order += 1;
    }

    fn finish(self) -> Vec<FirewallRule> {
        self.rules
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netpol_model::{EgressRule, IngressRule};

    fn role_db() -> LabelSelector {
        LabelSelector::from_labels([("role", "db")])
    }

    fn db_policy() -> NetworkPolicy {
        NetworkPolicy::new("default", "test-network-policy").with_pod_selector(role_db())
    }

    #[test]
    fn ip_block_exceptions_reject_before_allow() {
        let policy = db_policy()
            .with_policy_types([PolicyType::Ingress])
            .with_ingress(IngressRule::new(
                vec![NetworkPolicyPort::tcp(6379)],
                vec![PolicyPeer::ip_block("172.17.0.0/16", ["172.17.1.0/24"])],
            ));

        let firewall = translate(&policy);
        assert_eq!(firewall.name, "test-network-policy");
        assert_eq!(firewall.namespace, "default");
        assert_eq!(firewall.rules.len(), 2);

        let reject = &firewall.rules[0];
        assert_eq!(reject.order, 0);
        assert_eq!(reject.action, RuleAction::Reject);
        assert_eq!(reject.from.cidr.as_deref(), Some("172.17.1.0/24"));
        assert_eq!(reject.from.ports, vec![NetworkPolicyPort::tcp(6379)]);
        assert_eq!(reject.to, FirewallLocation::pods(role_db()));

        let allow = &firewall.rules[1];
        assert_eq!(allow.order, 1);
        assert_eq!(allow.action, RuleAction::Allow);
        assert_eq!(allow.from.cidr.as_deref(), Some("172.17.0.0/16"));
        assert_eq!(allow.to, FirewallLocation::pods(role_db()));
    }

    #[test]
    fn egress_ip_block_rejects_on_destination() {
        let policy = db_policy()
            .with_policy_types([PolicyType::Egress])
            .with_egress(EgressRule::new(
                vec![NetworkPolicyPort::tcp(5978)],
                vec![PolicyPeer::ip_block("10.0.0.0/24", ["10.0.0.128/25"])],
            ));

        let rules = translate(&policy).rules;
        assert_eq!(rules.len(), 2);

        assert_eq!(rules[0].action, RuleAction::Reject);
        assert_eq!(rules[0].from, FirewallLocation::pods(role_db()));
        assert_eq!(rules[0].to.cidr.as_deref(), Some("10.0.0.128/25"));
        assert_eq!(rules[0].to.ports, vec![NetworkPolicyPort::tcp(5978)]);

        assert_eq!(rules[1].action, RuleAction::Allow);
        assert_eq!(rules[1].from, FirewallLocation::pods(role_db()));
        assert_eq!(rules[1].to.cidr.as_deref(), Some("10.0.0.0/24"));
        assert!(rules.iter().all(|r| r.direction == PolicyType::Egress));
    }

    #[test]
    fn egress_pod_selector_mirrors_locations() {
        let project = LabelSelector::from_labels([("project", "myproject")]);
        let policy = db_policy()
            .with_policy_types([PolicyType::Egress])
            .with_egress(EgressRule::new(
                vec![NetworkPolicyPort::tcp(6379)],
                vec![PolicyPeer::pods(project.clone())],
            ));

        let firewall = translate(&policy);
        assert_eq!(firewall.rules.len(), 1);

        let rule = &firewall.rules[0];
        assert_eq!(rule.action, RuleAction::Allow);
        assert_eq!(rule.direction, PolicyType::Egress);
        assert_eq!(rule.from, FirewallLocation::pods(role_db()));
        assert_eq!(
            rule.to,
            FirewallLocation::pods(project).with_ports(vec![NetworkPolicyPort::tcp(6379)])
        );
    }

    #[test]
    fn undeclared_directions_are_not_expanded() {
        let policy = db_policy().with_ingress(IngressRule::new(
            vec![],
            vec![PolicyPeer::pods(LabelSelector::new())],
        ));
        assert!(policy.policy_types.is_empty());
        assert!(translate(&policy).rules.is_empty());

        let egress_only = policy.with_policy_types([PolicyType::Egress]);
        assert!(translate(&egress_only).rules.is_empty());
    }

    #[test]
    fn policy_without_rules_yields_no_rules() {
        let policy = db_policy().with_policy_types([PolicyType::Ingress, PolicyType::Egress]);
        assert!(translate(&policy).rules.is_empty());
    }

    #[test]
    fn empty_peer_contributes_nothing() {
        let policy = db_policy()
            .with_policy_types([PolicyType::Ingress])
            .with_ingress(IngressRule::new(
                vec![NetworkPolicyPort::tcp(80)],
                vec![
                    PolicyPeer::default(),
                    PolicyPeer::namespaces(LabelSelector::from_labels([("team", "a")])),
                ],
            ));

        let firewall = translate(&policy);
        assert_eq!(firewall.rules.len(), 1);
        assert_eq!(firewall.rules[0].order, 0);
        assert!(firewall.rules[0].from.namespace_selector.is_some());
    }

    #[test]
    fn multi_shape_peer_expands_each_shape_in_fixed_order() {
        let peer = PolicyPeer {
            ip_block: Some(netpol_model::IpBlock {
                cidr: "10.0.0.0/8".to_string(),
                except: vec!["10.1.0.0/16".to_string()],
            }),
            pod_selector: Some(LabelSelector::from_labels([("app", "web")])),
            namespace_selector: Some(LabelSelector::from_labels([("env", "prod")])),
        };
        let policy = db_policy()
            .with_policy_types([PolicyType::Ingress])
            .with_ingress(IngressRule::new(vec![NetworkPolicyPort::udp(53)], vec![peer]));

        let rules = translate(&policy).rules;
        assert_eq!(rules.len(), 4);

        assert_eq!(rules[0].action, RuleAction::Reject);
        assert_eq!(rules[0].from.cidr.as_deref(), Some("10.1.0.0/16"));
        assert_eq!(rules[1].from.cidr.as_deref(), Some("10.0.0.0/8"));
        assert!(rules[2].from.pod_selector.is_some());
        assert!(rules[3].from.namespace_selector.is_some());
        assert!(rules
            .iter()
            .all(|r| r.from.ports == vec![NetworkPolicyPort::udp(53)]));
    }

    #[test]
    fn ingress_is_emitted_before_egress() {
        let policy = db_policy()
            .with_policy_types([PolicyType::Egress, PolicyType::Ingress])
            .with_egress(EgressRule::new(
                vec![],
                vec![PolicyPeer::ip_block("10.0.0.0/24", Vec::<String>::new())],
            ))
            .with_ingress(IngressRule::new(
                vec![],
                vec![PolicyPeer::pods(LabelSelector::from_labels([("role", "frontend")]))],
            ));

        let firewall = translate(&policy);
        let directions: Vec<_> = firewall.rules.iter().map(|r| r.direction).collect();
        assert_eq!(directions, [PolicyType::Ingress, PolicyType::Egress]);
    }

    #[test]
    fn empty_port_list_is_carried_as_absent() {
        let policy = db_policy()
            .with_policy_types([PolicyType::Ingress])
            .with_ingress(IngressRule::new(
                vec![],
                vec![PolicyPeer::ip_block("0.0.0.0/0", Vec::<String>::new())],
            ));

        let rule = &translate(&policy).rules[0];
        assert!(rule.from.ports.is_empty());
        let json = serde_json::to_value(rule).unwrap();
        assert!(json["From"].get("ports").is_none());
    }

    #[test]
    fn order_restarts_for_every_policy() {
        let policy = db_policy()
            .with_policy_types([PolicyType::Ingress])
            .with_ingress(IngressRule::new(
                vec![],
                vec![PolicyPeer::ip_block("10.0.0.0/8", ["10.0.0.0/16", "10.1.0.0/16"])],
            ));

        let translated = translate_all(&[policy.clone(), policy]);
        assert_eq!(translated.len(), 2);
        for firewall in &translated {
            let orders: Vec<_> = firewall.rules.iter().map(|r| r.order).collect();
            assert_eq!(orders, [0, 1, 2]);
        }
        assert_eq!(translated[0], translated[1]);
    }
}
