//! Plan properties checked directly against constructed snapshots

use pretty_assertions::assert_eq;
use vpc_acl_reconcile::{
    normalize, AclSnapshot, BaselineRules, DefaultAclReconciler, DesiredState, ProviderBaseline,
    Rule,
};
use vpc_acl_types::{AclId, Direction, Protocol, RuleAction, SubnetId};

fn acl_id() -> AclId {
    AclId::new("acl-0a1b2c3d").unwrap()
}

fn subnet(id: &str) -> SubnetId {
    SubnetId::new(id).unwrap()
}

fn baseline_rules() -> Vec<Rule> {
    let baseline = ProviderBaseline::default();
    Direction::ALL
        .iter()
        .flat_map(|d| baseline.baseline_for(*d))
        .collect()
}

/// Live ACL that already matches `desired`
fn converged_snapshot(desired: &DesiredState) -> AclSnapshot {
    let mut rules = normalize(desired).unwrap();
    rules.extend(baseline_rules());
    AclSnapshot::new(desired.acl_id.clone())
        .with_rules(rules)
        .with_associations(desired.subnet_ids.iter().cloned())
}

fn sample_declarations() -> Vec<DesiredState> {
    let https = Rule::new(
        Direction::Ingress,
        110,
        Protocol::TCP,
        RuleAction::Allow,
        "10.1.0.0/16".parse().unwrap(),
    )
    .with_ports(443, 443);

    vec![
        DesiredState::new(acl_id()),
        DesiredState::new(acl_id()).deny_ingress().deny_egress(),
        DesiredState::new(acl_id()).deny_ingress(),
        DesiredState::new(acl_id())
            .with_ingress_rules(vec![Rule::allow_all(Direction::Ingress, 100), https])
            .with_egress_rules(vec![Rule::allow_all(Direction::Egress, 100)])
            .with_subnets([subnet("subnet-11111111"), subnet("subnet-22222222")]),
    ]
}

#[test]
fn test_converged_snapshot_is_idempotent() {
    let reconciler = DefaultAclReconciler::default();
    for desired in sample_declarations() {
        let plan = reconciler
            .plan(&desired, &converged_snapshot(&desired))
            .unwrap();
        assert!(!plan.requires_action(), "{}", plan);
        assert!(plan.operations().is_empty());
    }
}

#[test]
fn test_user_rules_are_live_minus_baseline() {
    let baseline = ProviderBaseline::default();
    for direction in Direction::ALL {
        assert_eq!(baseline.count_for(direction), 1);
    }
    for desired in sample_declarations() {
        let snapshot = converged_snapshot(&desired);
        let user = normalize(&desired).unwrap().len();
        assert_eq!(snapshot.rule_count() - baseline.total_count(), user);
    }
}

#[test]
fn test_empty_declaration_removes_every_user_rule() {
    let reconciler = DefaultAclReconciler::default();
    let mut rules: Vec<Rule> = (1..=5)
        .map(|n| Rule::allow_all(Direction::Egress, n * 10))
        .collect();
    rules.extend(baseline_rules());
    let snapshot = AclSnapshot::new(acl_id()).with_rules(rules);

    let plan = reconciler
        .plan(&DesiredState::new(acl_id()), &snapshot)
        .unwrap();
    assert_eq!(plan.changes.rules_to_remove.len(), 5);
    assert!(plan.requires_action());
}

#[test]
fn test_deny_all_against_baseline_only() {
    let reconciler = DefaultAclReconciler::default();
    let desired = DesiredState::new(acl_id()).deny_ingress().deny_egress();
    let snapshot = AclSnapshot::new(acl_id()).with_rules(baseline_rules());

    let plan = reconciler.plan(&desired, &snapshot).unwrap();
    assert_eq!(plan.changes.rules_to_add.len(), 2);
    assert!(plan.changes.rules_to_remove.is_empty());
    assert!(plan.requires_action());
}

#[test]
fn test_explicit_allow_all_matching_live_is_empty() {
    let reconciler = DefaultAclReconciler::default();
    let desired = DesiredState::new(acl_id())
        .with_ingress_rules(vec![Rule::allow_all(Direction::Ingress, 100)])
        .with_egress_rules(vec![Rule::allow_all(Direction::Egress, 100)]);
    let mut rules = vec![
        Rule::allow_all(Direction::Ingress, 100),
        Rule::allow_all(Direction::Egress, 100),
    ];
    rules.extend(baseline_rules());

    let plan = reconciler
        .plan(&desired, &AclSnapshot::new(acl_id()).with_rules(rules))
        .unwrap();
    assert!(!plan.requires_action());
}

#[test]
fn test_cleared_subnets_stay_and_plan_is_non_empty() {
    let reconciler = DefaultAclReconciler::default();
    let desired = DesiredState::new(acl_id()).deny_ingress().deny_egress();
    let snapshot = converged_snapshot(&desired)
        .with_associations([subnet("subnet-11111111"), subnet("subnet-22222222")]);

    let plan = reconciler.plan(&desired, &snapshot).unwrap();
    assert!(plan.changes.associations_to_remove.is_empty());
    assert_eq!(plan.changes.unreleased_subnets.len(), 2);
    assert!(plan.requires_action());
}

#[test]
fn test_reassigned_subnets_leave_nothing_to_do() {
    let reconciler = DefaultAclReconciler::default();
    let desired = DesiredState::new(acl_id()).deny_ingress().deny_egress();
    let snapshot = converged_snapshot(&desired);

    let plan = reconciler.plan(&desired, &snapshot).unwrap();
    assert_eq!(snapshot.association_count(), 0);
    assert!(!plan.requires_action());
}

#[test]
fn test_identical_inputs_identical_plans() {
    let reconciler = DefaultAclReconciler::default();
    let desired = sample_declarations().pop().unwrap();
    let snapshot = AclSnapshot::new(acl_id()).with_rules(baseline_rules());

    let first = reconciler.plan(&desired, &snapshot).unwrap();
    let second = reconciler.plan(&desired, &snapshot).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.to_string(), second.to_string());
}
