//! Default network ACL acceptance tests
//!
//! Each test walks a sequence of declarative steps against an in-memory VPC
//! and checks the live ACL and the follow-up plan after every step.

use pretty_assertions::assert_eq;
use vpc_acl_reconcile::{ReconcileError, Rule, UndeclaredSubnetPolicy};
use vpc_acl_test::{
    assert_plan_empty, assert_plan_non_empty, check_default_acl_attributes, fixtures,
    AcceptanceHarness,
};
use vpc_acl_types::{AclId, Direction};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Scenario:
/// 1. Declare no rules: the seeded allow-all entries are planned for removal
/// 2. Declare the seeded entries explicitly: nothing to do
#[tokio::test]
async fn test_basic() {
    init_tracing();
    let harness = AcceptanceHarness::new().unwrap();
    let acl = harness.vpc.default_acl_id();

    let step = harness.run_step(fixtures::basic(&acl)).await.unwrap();
    assert_plan_non_empty(&step.plan).unwrap();
    assert_eq!(step.plan.changes.rules_to_remove.len(), 2);
    assert!(step.plan.changes.rules_to_add.is_empty());
    check_default_acl_attributes(&step.snapshot, &[], 0, harness.reconciler.baseline()).unwrap();
    assert_plan_empty(&step.follow_up).unwrap();

    let step = harness
        .run_step(fixtures::basic_default_rules(&acl))
        .await
        .unwrap();
    assert_eq!(step.plan.changes.rules_to_add.len(), 2);
    check_default_acl_attributes(
        &step.snapshot,
        &[
            Rule::allow_all(Direction::Ingress, 100),
            Rule::allow_all(Direction::Egress, 100),
        ],
        0,
        harness.reconciler.baseline(),
    )
    .unwrap();
    assert_plan_empty(&step.follow_up).unwrap();
}

/// Declaring the seeded entries on a fresh VPC plans nothing at all
#[tokio::test]
async fn test_basic_default_rules_on_fresh_acl() {
    let harness = AcceptanceHarness::new().unwrap();
    let acl = harness.vpc.default_acl_id();

    let step = harness
        .run_step(fixtures::basic_default_rules(&acl))
        .await
        .unwrap();
    assert_plan_empty(&step.plan).unwrap();
    assert!(harness.vpc.applied_operations().is_empty());
    assert_eq!(step.snapshot.rule_count(), 4);
}

/// `ingress_deny` and `egress_deny` replace the seeded allow-all entries
#[tokio::test]
async fn test_deny() {
    let harness = AcceptanceHarness::new().unwrap();
    let acl = harness.vpc.default_acl_id();

    let step = harness.run_step(fixtures::deny(&acl)).await.unwrap();
    assert_plan_non_empty(&step.plan).unwrap();
    assert_eq!(step.plan.summary().to_add, 2);
    assert_eq!(step.plan.summary().to_remove, 2);

    harness
        .verifier()
        .assert_attributes(
            &acl,
            &[
                Rule::deny_all(Direction::Ingress, 100),
                Rule::deny_all(Direction::Egress, 100),
            ],
            0,
        )
        .await
        .unwrap();
    assert_plan_empty(&step.follow_up).unwrap();
}

/// Only ingress is denied; the undeclared egress direction is emptied
///
/// Converges in a single step: the seeded egress allow is removed, not kept.
#[tokio::test]
async fn test_deny_ingress() {
    let harness = AcceptanceHarness::new().unwrap();
    let acl = harness.vpc.default_acl_id();

    let step = harness.run_step(fixtures::deny_ingress(&acl)).await.unwrap();
    assert!(step
        .plan
        .changes
        .rules_to_remove
        .contains(&fixtures::default_egress_entry()));
    assert_eq!(
        step.plan.changes.rules_to_add,
        vec![Rule::deny_all(Direction::Ingress, 100)]
    );

    check_default_acl_attributes(
        &step.snapshot,
        &[Rule::deny_all(Direction::Ingress, 100)],
        0,
        harness.reconciler.baseline(),
    )
    .unwrap();
    assert_plan_empty(&step.follow_up).unwrap();
}

/// Scenario:
/// 1. Claim two subnets
/// 2. Drop them from the declaration without reassigning them: they stay
///    attached and the plan keeps reporting them
#[tokio::test]
async fn test_subnet_removal() {
    let harness = AcceptanceHarness::new().unwrap();
    let acl = harness.vpc.default_acl_id();
    let one = harness.vpc.create_subnet().unwrap();
    let two = harness.vpc.create_subnet().unwrap();
    let bar = harness.vpc.create_network_acl().unwrap();
    harness.vpc.associate(&one, &bar).unwrap();
    harness.vpc.associate(&two, &bar).unwrap();

    let step = harness
        .run_step(fixtures::subnets(&acl, &one, &two))
        .await
        .unwrap();
    assert_eq!(step.plan.changes.associations_to_add, vec![one.clone(), two.clone()]);
    harness
        .verifier()
        .assert_attributes(
            &acl,
            &[
                Rule::deny_all(Direction::Ingress, 100),
                Rule::deny_all(Direction::Egress, 100),
            ],
            2,
        )
        .await
        .unwrap();
    assert_plan_empty(&step.follow_up).unwrap();

    let step = harness
        .run_step(fixtures::subnets_remove(&acl))
        .await
        .unwrap();
    assert!(step.plan.changes.associations_to_remove.is_empty());
    assert_eq!(step.plan.changes.unreleased_subnets, vec![one.clone(), two.clone()]);
    assert_eq!(step.snapshot.association_count(), 2);
    assert_plan_non_empty(&step.follow_up).unwrap();
    assert!(step.follow_up.has_drift());
    assert_eq!(harness.vpc.association_of(&one), Some(acl.clone()));
}

/// Scenario:
/// 1. Claim two subnets
/// 2. Another ACL claims them first, then the default ACL drops them
#[tokio::test]
async fn test_subnet_reassign() {
    let harness = AcceptanceHarness::new().unwrap();
    let acl = harness.vpc.default_acl_id();
    let one = harness.vpc.create_subnet().unwrap();
    let two = harness.vpc.create_subnet().unwrap();
    let bar = harness.vpc.create_network_acl().unwrap();

    let step = harness
        .run_step(fixtures::subnets(&acl, &one, &two))
        .await
        .unwrap();
    assert_eq!(step.snapshot.association_count(), 2);

    harness.vpc.associate(&one, &bar).unwrap();
    harness.vpc.associate(&two, &bar).unwrap();

    let step = harness.run_step(fixtures::subnets_move(&acl)).await.unwrap();
    assert_plan_empty(&step.plan).unwrap();
    harness
        .verifier()
        .assert_attributes(
            &acl,
            &[
                Rule::deny_all(Direction::Ingress, 100),
                Rule::deny_all(Direction::Egress, 100),
            ],
            0,
        )
        .await
        .unwrap();
    assert_plan_empty(&step.follow_up).unwrap();
    assert_eq!(harness.vpc.association_of(&two), Some(bar));
}

/// With the release policy the dropped subnets move to the fallback ACL
#[tokio::test]
async fn test_subnet_removal_with_release_policy() {
    let mut config = vpc_acl_reconcile::ReconcilerConfig::default();
    config.associations.undeclared = UndeclaredSubnetPolicy::Release;
    let harness = AcceptanceHarness::with_config(config).unwrap();
    let acl = harness.vpc.default_acl_id();
    let one = harness.vpc.create_subnet().unwrap();
    let two = harness.vpc.create_subnet().unwrap();
    let fallback = harness.vpc.create_network_acl().unwrap();
    harness.vpc.set_release_target(Some(fallback.clone()));

    harness
        .run_step(fixtures::subnets(&acl, &one, &two))
        .await
        .unwrap();

    let step = harness
        .run_step(fixtures::subnets_remove(&acl))
        .await
        .unwrap();
    assert_eq!(step.plan.changes.associations_to_remove.len(), 2);
    assert_eq!(step.snapshot.association_count(), 0);
    assert_plan_empty(&step.follow_up).unwrap();
    assert_eq!(harness.vpc.association_of(&one), Some(fallback));
}

/// A declaration for an ACL the provider does not know fails the whole step
#[tokio::test]
async fn test_unknown_acl_not_found() {
    let harness = AcceptanceHarness::new().unwrap();
    let missing = AclId::new("acl-deadbeef").unwrap();

    let err = harness.run_step(fixtures::deny(&missing)).await.unwrap_err();
    assert!(matches!(err, ReconcileError::NotFound { .. }));
    assert!(harness.vpc.applied_operations().is_empty());
}

/// Shorthand combined with explicit blocks is rejected before any call
#[tokio::test]
async fn test_conflicting_declaration_rejected() {
    let harness = AcceptanceHarness::new().unwrap();
    let acl = harness.vpc.default_acl_id();
    let mut config = fixtures::basic_default_rules(&acl);
    config.ingress_deny = true;

    let err = harness.run_step(config).await.unwrap_err();
    assert!(err.is_config_error());
    assert_eq!(harness.vpc.snapshot(&acl).unwrap().rule_count(), 4);
}
