//! Manifest in, rendered firewall rules out.

use netpol_model::{parse_manifests, LabelSelector, LoadOptions, PolicyType};
use nsm_translator::{translate_all, FirewallLocation, OutputFormat, Reporter, RuleAction};

const POLICIES: &str = r"
apiVersion: networking.k8s.io/v1
kind: NetworkPolicy
metadata:
  name: test-network-policy
  namespace: default
spec:
  podSelector:
    matchLabels:
      role: db
  policyTypes:
  - Ingress
  - Egress
  ingress:
  - from:
    - ipBlock:
        cidr: 172.17.0.0/16
        except:
        - 172.17.1.0/24
    - namespaceSelector:
        matchLabels:
          project: myproject
    - podSelector:
        matchLabels:
          role: frontend
    ports:
    - protocol: TCP
      port: 6379
  egress:
  - to:
    - ipBlock:
        cidr: 10.0.0.0/24
    ports:
    - protocol: TCP
      port: 5978
---
apiVersion: networking.k8s.io/v1
kind: NetworkPolicy
metadata:
  name: declared-nothing
  namespace: default
spec:
  podSelector: {}
  policyTypes: []
  ingress:
  - from:
    - podSelector: {}
";

#[test]
fn translate_kubernetes_example() {
    let policies = parse_manifests(POLICIES, &LoadOptions::default()).unwrap();
    let firewall = translate_all(&policies);

    assert_eq!(firewall.len(), 2);
    assert_eq!(firewall[0].name, "test-network-policy");
    assert_eq!(firewall[1].name, "declared-nothing");
    assert!(firewall[1].rules.is_empty());

    let db = FirewallLocation::pods(LabelSelector::from_labels([("role", "db")]));
    let rules = &firewall[0].rules;
    let summary: Vec<_> = rules
        .iter()
        .map(|r| (r.order, r.direction, r.action, r.from.to_string(), r.to.to_string()))
        .collect();

    assert_eq!(
        summary,
        [
            (
                0,
                PolicyType::Ingress,
                RuleAction::Reject,
                "cidr: 172.17.1.0/24 ports: TCP/6379".to_string(),
                "pod: role=db".to_string(),
            ),
            (
                1,
                PolicyType::Ingress,
                RuleAction::Allow,
                "cidr: 172.17.0.0/16 ports: TCP/6379".to_string(),
                "pod: role=db".to_string(),
            ),
            (
                2,
                PolicyType::Ingress,
                RuleAction::Allow,
                "ns: project=myproject ports: TCP/6379".to_string(),
                "pod: role=db".to_string(),
            ),
            (
                3,
                PolicyType::Ingress,
                RuleAction::Allow,
                "pod: role=frontend ports: TCP/6379".to_string(),
                "pod: role=db".to_string(),
            ),
            (
                4,
                PolicyType::Egress,
                RuleAction::Allow,
                "pod: role=db".to_string(),
                "cidr: 10.0.0.0/24 ports: TCP/5978".to_string(),
            ),
        ]
    );
    assert_eq!(rules[4].from, db);
}

#[test]
fn json_export_matches_firewall_schema() {
    let policies = parse_manifests(POLICIES, &LoadOptions::default()).unwrap();
    let output = Reporter::new(OutputFormat::Json)
        .render(&translate_all(&policies))
        .unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();

    let reject = &value[0]["Rules"][0];
    assert_eq!(reject["Action"], "REJECT");
    assert_eq!(reject["Order"], 0);
    assert_eq!(reject["From"]["CIDR"], "172.17.1.0/24");
    assert_eq!(reject["From"]["ports"][0]["port"], 6379);
    assert_eq!(reject["To"]["podSelector"]["matchLabels"]["role"], "db");
    assert!(reject["To"].get("CIDR").is_none());
    assert!(reject["To"].get("ports").is_none());

    assert_eq!(value[1]["Rules"], serde_json::json!([]));
}
