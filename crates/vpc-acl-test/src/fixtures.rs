//! Test fixtures for default ACL scenarios
//!
//! Each fixture builds the declarative attributes of one acceptance step.
//! Subnet placement that belongs to other resources (such as moving subnets
//! to a custom ACL) is done on the [`crate::MockVpc`] before the step runs.

use vpc_acl_reconcile::{DefaultAclConfig, Rule, RuleBlock};
use vpc_acl_types::{AclId, Direction, IpPrefix, Protocol, RuleAction, SubnetId};

/// `protocol = -1, rule_no = 100, action = "allow", cidr_block = "0.0.0.0/0"`
pub fn allow_all_block() -> RuleBlock {
    RuleBlock {
        protocol: Protocol::All,
        rule_no: 100,
        action: RuleAction::Allow,
        cidr_block: IpPrefix::any_ipv4(),
        from_port: 0,
        to_port: 0,
    }
}

/// The allow-all egress entry a new default ACL is seeded with
pub fn default_egress_entry() -> Rule {
    Rule::allow_all(Direction::Egress, 100)
}

/// No rules and no subnets: every seeded entry should go
pub fn basic(acl_id: &AclId) -> DefaultAclConfig {
    DefaultAclConfig::new(acl_id.clone())
}

/// The provider's seeded allow-all entries, declared explicitly
pub fn basic_default_rules(acl_id: &AclId) -> DefaultAclConfig {
    DefaultAclConfig {
        ingress: vec![allow_all_block()],
        egress: vec![allow_all_block()],
        ..DefaultAclConfig::new(acl_id.clone())
    }
}

/// Deny all traffic in both directions
pub fn deny(acl_id: &AclId) -> DefaultAclConfig {
    DefaultAclConfig {
        ingress_deny: true,
        egress_deny: true,
        ..DefaultAclConfig::new(acl_id.clone())
    }
}

/// Deny all ingress traffic, declare nothing for egress
pub fn deny_ingress(acl_id: &AclId) -> DefaultAclConfig {
    DefaultAclConfig {
        ingress_deny: true,
        ..DefaultAclConfig::new(acl_id.clone())
    }
}

/// Deny both directions and claim two subnets
pub fn subnets(acl_id: &AclId, one: &SubnetId, two: &SubnetId) -> DefaultAclConfig {
    DefaultAclConfig {
        subnet_ids: vec![one.clone(), two.clone()],
        ..deny(acl_id)
    }
}

/// Subnets dropped from the declaration without being reassigned
pub fn subnets_remove(acl_id: &AclId) -> DefaultAclConfig {
    deny(acl_id)
}

/// Subnets dropped from the declaration after another ACL claimed them
pub fn subnets_move(acl_id: &AclId) -> DefaultAclConfig {
    deny(acl_id)
}
