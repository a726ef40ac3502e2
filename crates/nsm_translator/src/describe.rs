//! Human-readable descriptions of input network policies.
//!
//! Complements the firewall report: it shows the policy as written, including
//! rule sets that are present but not declared in `policyTypes` and therefore
//! produce no firewall rules.

use netpol_model::{NetworkPolicy, NetworkPolicyPort, PolicyPeer, PolicyType};

/// Describes a single policy in `kubectl describe` style.
#[must_use]
pub fn describe_policy(policy: &NetworkPolicy) -> String {
    let mut out = String::new();

    out.push_str(&format!("Name:         {}\n", policy.name));
    out.push_str(&format!("Namespace:    {}\n", policy.namespace));
    out.push_str(&format!("PodSelector:  {}\n", policy.pod_selector));

    let types: Vec<_> = policy.policy_types.iter().map(ToString::to_string).collect();
    if types.is_empty() {
        out.push_str("PolicyTypes:  <none>\n");
    } else {
        out.push_str(&format!("PolicyTypes:  {}\n", types.join(", ")));
    }

    let ingress: Vec<_> = policy.ingress.iter().map(|r| (&r.ports, &r.from)).collect();
    describe_direction(&mut out, policy, PolicyType::Ingress, "From", &ingress);

    let egress: Vec<_> = policy.egress.iter().map(|r| (&r.ports, &r.to)).collect();
    describe_direction(&mut out, policy, PolicyType::Egress, "To", &egress);

    out
}

/// Describes every policy, separated by blank lines.
#[must_use]
pub fn describe_policies(policies: &[NetworkPolicy]) -> String {
    policies
        .iter()
        .map(describe_policy)
        .collect::<Vec<_>>()
        .join("\n")
}

fn describe_direction(
    out: &mut String,
    policy: &NetworkPolicy,
    direction: PolicyType,
    peer_label: &str,
    rules: &[(&Vec<NetworkPolicyPort>, &Vec<PolicyPeer>)],
) {
    if !policy.declares(direction) {
        if !rules.is_empty() {
            out.push_str(&format!(
                "{}:  <not declared, {} rule(s) ignored>\n",
                direction,
                rules.len()
            ));
        }
        return;
    }

    out.push_str(&format!("{}:\n", direction));
    if rules.is_empty() {
        out.push_str("  <none>\n");
        return;
    }

    for (i, (ports, peers)) in rules.iter().enumerate() {
        out.push_str(&format!("  Rule {}:\n", i + 1));

        if ports.is_empty() {
            out.push_str("    Ports:  <any>\n");
        } else {
            let ports: Vec<_> = ports.iter().map(ToString::to_string).collect();
            out.push_str(&format!("    Ports:  {}\n", ports.join(", ")));
        }

        if peers.is_empty() {
            out.push_str(&format!("    {}:  <none> (no firewall rules)\n", peer_label));
            continue;
        }

        out.push_str(&format!("    {}:\n", peer_label));
        for peer in *peers {
            describe_peer(out, peer);
        }
    }
}

fn describe_peer(out: &mut String, peer: &PolicyPeer) {
    if peer.is_empty() {
        out.push_str("      <empty peer>\n");
        return;
    }
    if let Some(block) = &peer.ip_block {
        out.push_str(&format!("      IPBlock:            {}\n", block));
    }
    if let Some(selector) = &peer.pod_selector {
        out.push_str(&format!("      PodSelector:        {}\n", selector));
    }
    if let Some(selector) = &peer.namespace_selector {
        out.push_str(&format!("      NamespaceSelector:  {}\n", selector));
    }
}
