//! Changesets, ordered operations and the plan verdict.
//!
//! A [`Plan`] requires action when any of its changeset lists is non-empty,
//! including unreleased subnets. There is no partial credit: one pending
//! mutation or one drifted subnet makes the whole plan non-empty.

use serde::{Deserialize, Serialize};
use std::fmt;
use vpc_acl_types::{AclId, Direction, SubnetId};

use crate::association::AssociationChanges;
use crate::rule::Rule;
use crate::rule_diff::RuleChanges;

/// Every change needed to converge one default ACL.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeSet {
    pub rules_to_add: Vec<Rule>,
    pub rules_to_remove: Vec<Rule>,
    pub associations_to_add: Vec<SubnetId>,
    pub associations_to_remove: Vec<SubnetId>,
    /// Drift: attached, undeclared, and left in place.
    pub unreleased_subnets: Vec<SubnetId>,
}

impl ChangeSet {
    pub fn from_parts(rules: RuleChanges, associations: AssociationChanges) -> Self {
        Self {
            rules_to_add: rules.to_add,
            rules_to_remove: rules.to_remove,
            associations_to_add: associations.to_add,
            associations_to_remove: associations.to_remove,
            unreleased_subnets: associations.unreleased,
        }
    }

    /// Provider calls needed to apply this changeset, in execution order.
    ///
    /// Deletes run before creates so a replaced entry can reuse its rule
    /// number. Rule work runs before association work. Unreleased subnets
    /// produce no operation.
    pub fn operations(&self) -> Vec<AclOperation> {
        let mut ops = Vec::with_capacity(
            self.rules_to_remove.len()
                + self.rules_to_add.len()
                + self.associations_to_add.len()
                + self.associations_to_remove.len(),
        );

        ops.extend(self.rules_to_remove.iter().map(|r| AclOperation::DeleteEntry {
            direction: r.direction,
            rule_number: r.rule_number,
        }));
        ops.extend(self.rules_to_add.iter().cloned().map(AclOperation::CreateEntry));
        ops.extend(
            self.associations_to_add
                .iter()
                .map(|s| AclOperation::ClaimSubnet {
                    subnet_id: s.clone(),
                }),
        );
        ops.extend(
            self.associations_to_remove
                .iter()
                .map(|s| AclOperation::ReleaseSubnet {
                    subnet_id: s.clone(),
                }),
        );
        ops
    }

    pub fn summary(&self) -> PlanSummary {
        PlanSummary {
            to_add: self.rules_to_add.len() + self.associations_to_add.len(),
            to_remove: self.rules_to_remove.len() + self.associations_to_remove.len(),
            drifted: self.unreleased_subnets.len(),
        }
    }
}

/// Returns true if `changes` needs any remote mutation or reports drift.
pub fn requires_action(changes: &ChangeSet) -> bool {
    !changes.rules_to_add.is_empty()
        || !changes.rules_to_remove.is_empty()
        || !changes.associations_to_add.is_empty()
        || !changes.associations_to_remove.is_empty()
        || !changes.unreleased_subnets.is_empty()
}

/// One provider call produced for the apply step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum AclOperation {
    /// Delete the entry with this number in this direction.
    DeleteEntry {
        direction: Direction,
        rule_number: u16,
    },
    /// Create this entry.
    CreateEntry(Rule),
    /// Replace the subnet's current association with this ACL.
    ClaimSubnet { subnet_id: SubnetId },
    /// Move the subnet off this ACL.
    ReleaseSubnet { subnet_id: SubnetId },
}

impl fmt::Display for AclOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AclOperation::DeleteEntry {
                direction,
                rule_number,
            } => write!(f, "delete {} entry #{}", direction, rule_number),
            AclOperation::CreateEntry(rule) => write!(f, "create entry {}", rule),
            AclOperation::ClaimSubnet { subnet_id } => write!(f, "claim {}", subnet_id),
            AclOperation::ReleaseSubnet { subnet_id } => write!(f, "release {}", subnet_id),
        }
    }
}

/// Counts shown at the end of a rendered plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    pub to_add: usize,
    pub to_remove: usize,
    pub drifted: usize,
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.to_add == 0 && self.to_remove == 0 && self.drifted == 0 {
            write!(f, "No changes.")
        } else {
            write!(
                f,
                "Plan: {} to add, {} to remove, {} drifted.",
                self.to_add, self.to_remove, self.drifted
            )
        }
    }
}

/// The reconcile result for one default ACL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub acl_id: AclId,
    pub changes: ChangeSet,
}

impl Plan {
    pub fn new(acl_id: AclId, changes: ChangeSet) -> Self {
        Self { acl_id, changes }
    }

    /// The user-visible "non-empty plan" signal.
    pub fn requires_action(&self) -> bool {
        requires_action(&self.changes)
    }

    /// Returns true if the plan carries association drift.
    pub fn has_drift(&self) -> bool {
        !self.changes.unreleased_subnets.is_empty()
    }

    pub fn operations(&self) -> Vec<AclOperation> {
        self.changes.operations()
    }

    pub fn summary(&self) -> PlanSummary {
        self.changes.summary()
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "default network ACL {}", self.acl_id)?;
        for rule in &self.changes.rules_to_remove {
            writeln!(f, "  - {}", rule)?;
        }
        for rule in &self.changes.rules_to_add {
            writeln!(f, "  + {}", rule)?;
        }
        for subnet in &self.changes.associations_to_remove {
            writeln!(f, "  - association {}", subnet)?;
        }
        for subnet in &self.changes.associations_to_add {
            writeln!(f, "  + association {}", subnet)?;
        }
        for subnet in &self.changes.unreleased_subnets {
            writeln!(
                f,
                "  ~ association {} (attached but not declared; reassign to release)",
                subnet
            )?;
        }
        write!(f, "{}", self.summary())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn subnet(id: &str) -> SubnetId {
        SubnetId::new(id).unwrap()
    }

    fn acl_id() -> AclId {
        AclId::new("acl-0a1b2c3d").unwrap()
    }

    #[test]
    fn test_empty_changeset_needs_nothing() {
        let plan = Plan::new(acl_id(), ChangeSet::default());
        assert!(!plan.requires_action());
        assert!(plan.operations().is_empty());
        assert_eq!(plan.to_string(), "default network ACL acl-0a1b2c3d\nNo changes.");
    }

    #[test]
    fn test_any_single_list_makes_plan_non_empty() {
        let rule = Rule::allow_all(Direction::Ingress, 100);
        let cases = vec![
            ChangeSet {
                rules_to_add: vec![rule.clone()],
                ..Default::default()
            },
            ChangeSet {
                rules_to_remove: vec![rule],
                ..Default::default()
            },
            ChangeSet {
                associations_to_add: vec![subnet("subnet-11111111")],
                ..Default::default()
            },
            ChangeSet {
                associations_to_remove: vec![subnet("subnet-11111111")],
                ..Default::default()
            },
            ChangeSet {
                unreleased_subnets: vec![subnet("subnet-11111111")],
                ..Default::default()
            },
        ];
        for changes in cases {
            assert!(requires_action(&changes), "{:?}", changes);
        }
    }

    #[test]
    fn test_operations_delete_before_create() {
        let changes = ChangeSet {
            rules_to_add: vec![Rule::deny_all(Direction::Ingress, 100)],
            rules_to_remove: vec![Rule::allow_all(Direction::Ingress, 100)],
            associations_to_add: vec![subnet("subnet-11111111")],
            associations_to_remove: vec![subnet("subnet-22222222")],
            unreleased_subnets: vec![subnet("subnet-33333333")],
        };
        assert_eq!(
            changes.operations(),
            vec![
                AclOperation::DeleteEntry {
                    direction: Direction::Ingress,
                    rule_number: 100
                },
                AclOperation::CreateEntry(Rule::deny_all(Direction::Ingress, 100)),
                AclOperation::ClaimSubnet {
                    subnet_id: subnet("subnet-11111111")
                },
                AclOperation::ReleaseSubnet {
                    subnet_id: subnet("subnet-22222222")
                },
            ]
        );
    }

    #[test]
    fn test_drift_only_plan() {
        let plan = Plan::new(
            acl_id(),
            ChangeSet {
                unreleased_subnets: vec![subnet("subnet-11111111")],
                ..Default::default()
            },
        );
        assert!(plan.requires_action());
        assert!(plan.has_drift());
        assert!(plan.operations().is_empty());
        assert_eq!(
            plan.summary(),
            PlanSummary {
                to_add: 0,
                to_remove: 0,
                drifted: 1
            }
        );
    }

    #[test]
    fn test_render() {
        let plan = Plan::new(
            acl_id(),
            ChangeSet {
                rules_to_add: vec![Rule::deny_all(Direction::Egress, 100)],
                rules_to_remove: vec![Rule::allow_all(Direction::Egress, 100)],
                ..Default::default()
            },
        );
        let rendered = plan.to_string();
        assert!(rendered.contains("  - egress #100 allow"));
        assert!(rendered.contains("  + egress #100 deny"));
        assert!(rendered.ends_with("Plan: 1 to add, 1 to remove, 0 drifted."));
    }

    #[test]
    fn test_operation_json_shape() {
        let op = AclOperation::DeleteEntry {
            direction: Direction::Egress,
            rule_number: 100,
        };
        let json = serde_json::to_value(&op).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"op": "delete_entry", "direction": "egress", "rule_number": 100})
        );
    }
}
