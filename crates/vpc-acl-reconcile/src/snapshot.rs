//! Live view of a network ACL as reported by the provider.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use vpc_acl_types::{AclId, Direction, SubnetId};

use crate::rule::Rule;

/// A point-in-time read of one network ACL. Owned by the provider; the
/// reconciler only reads it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclSnapshot {
    pub id: AclId,
    #[serde(default)]
    pub rules: Vec<Rule>,
    #[serde(default)]
    pub associations: BTreeSet<SubnetId>,
}

impl AclSnapshot {
    pub fn new(id: AclId) -> Self {
        Self {
            id,
            rules: Vec::new(),
            associations: BTreeSet::new(),
        }
    }

    pub fn with_rules(mut self, rules: Vec<Rule>) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_associations<I>(mut self, subnets: I) -> Self
    where
        I: IntoIterator<Item = SubnetId>,
    {
        self.associations = subnets.into_iter().collect();
        self
    }

    /// Rules for one direction, in listing order.
    pub fn rules_for(&self, direction: Direction) -> impl Iterator<Item = &Rule> {
        self.rules.iter().filter(move |r| r.direction == direction)
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn association_count(&self) -> usize {
        self.associations.len()
    }
}
