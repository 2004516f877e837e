//! Declared state of a default network ACL.
//!
//! [`DefaultAclConfig`] mirrors the declarative attribute block one-to-one
//! (`ingress`, `egress`, `ingress_deny`, `egress_deny`, `subnet_ids`,
//! `default_network_acl_id`). Converting it into a [`DesiredState`] resolves
//! the shorthand/explicit union per direction and rejects conflicting
//! declarations before anything talks to the provider.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use vpc_acl_types::{AclId, Direction, IpPrefix, Protocol, RuleAction, SubnetId};

use crate::error::{ReconcileError, ReconcileResult};
use crate::normalizer;
use crate::rule::Rule;

/// How one direction's rules were declared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleDeclaration {
    /// An explicit list of entries (possibly empty).
    Explicit(Vec<Rule>),
    /// `*_deny = true`: a single deny-all entry.
    DenyAll,
}

impl Default for RuleDeclaration {
    fn default() -> Self {
        RuleDeclaration::Explicit(Vec::new())
    }
}

/// The user's declaration for one default ACL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DesiredState {
    pub acl_id: AclId,
    pub ingress: RuleDeclaration,
    pub egress: RuleDeclaration,
    pub subnet_ids: BTreeSet<SubnetId>,
}

impl DesiredState {
    /// A declaration with no rules and no subnets.
    pub fn new(acl_id: AclId) -> Self {
        Self {
            acl_id,
            ingress: RuleDeclaration::default(),
            egress: RuleDeclaration::default(),
            subnet_ids: BTreeSet::new(),
        }
    }

    pub fn with_ingress_rules(mut self, rules: Vec<Rule>) -> Self {
        self.ingress = RuleDeclaration::Explicit(rules);
        self
    }

    pub fn with_egress_rules(mut self, rules: Vec<Rule>) -> Self {
        self.egress = RuleDeclaration::Explicit(rules);
        self
    }

    pub fn deny_ingress(mut self) -> Self {
        self.ingress = RuleDeclaration::DenyAll;
        self
    }

    pub fn deny_egress(mut self) -> Self {
        self.egress = RuleDeclaration::DenyAll;
        self
    }

    pub fn with_subnets<I>(mut self, subnets: I) -> Self
    where
        I: IntoIterator<Item = SubnetId>,
    {
        self.subnet_ids = subnets.into_iter().collect();
        self
    }

    /// Returns the declaration for one direction.
    pub fn declaration(&self, direction: Direction) -> &RuleDeclaration {
        match direction {
            Direction::Ingress => &self.ingress,
            Direction::Egress => &self.egress,
        }
    }
}

/// One `ingress { ... }` / `egress { ... }` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleBlock {
    pub protocol: Protocol,
    pub rule_no: u16,
    pub action: RuleAction,
    pub cidr_block: IpPrefix,
    #[serde(default)]
    pub from_port: u16,
    #[serde(default)]
    pub to_port: u16,
}

impl RuleBlock {
    /// Binds the block to the direction it was declared under.
    pub fn into_rule(self, direction: Direction) -> Rule {
        Rule::new(
            direction,
            self.rule_no,
            self.protocol,
            self.action,
            self.cidr_block,
        )
        .with_ports(self.from_port, self.to_port)
    }
}

/// Declarative attributes for a default network ACL resource.
///
/// Attributes outside the reconcile scope (such as `tags`) are accepted and
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DefaultAclConfig {
    pub default_network_acl_id: AclId,

    #[serde(default)]
    pub ingress: Vec<RuleBlock>,

    #[serde(default)]
    pub egress: Vec<RuleBlock>,

    #[serde(default)]
    pub ingress_deny: bool,

    #[serde(default)]
    pub egress_deny: bool,

    #[serde(default)]
    pub subnet_ids: Vec<SubnetId>,
}

impl DefaultAclConfig {
    pub fn new(default_network_acl_id: AclId) -> Self {
        Self {
            default_network_acl_id,
            ingress: Vec::new(),
            egress: Vec::new(),
            ingress_deny: false,
            egress_deny: false,
            subnet_ids: Vec::new(),
        }
    }
}

impl TryFrom<DefaultAclConfig> for DesiredState {
    type Error = ReconcileError;

    fn try_from(config: DefaultAclConfig) -> ReconcileResult<Self> {
        let ingress_rules = config
            .ingress
            .into_iter()
            .map(|block| block.into_rule(Direction::Ingress))
            .collect();
        let egress_rules = config
            .egress
            .into_iter()
            .map(|block| block.into_rule(Direction::Egress))
            .collect();

        let ingress =
            normalizer::resolve_declaration(Direction::Ingress, config.ingress_deny, ingress_rules)?;
        let egress =
            normalizer::resolve_declaration(Direction::Egress, config.egress_deny, egress_rules)?;

        let desired = DesiredState {
            acl_id: config.default_network_acl_id,
            ingress,
            egress,
            subnet_ids: config.subnet_ids.into_iter().collect(),
        };

        // Surface rule validation errors at conversion time as well.
        normalizer::normalize(&desired)?;
        Ok(desired)
    }
}
