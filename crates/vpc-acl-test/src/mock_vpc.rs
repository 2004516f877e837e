//! In-memory VPC for acceptance tests
//!
//! Models just enough of a provider to exercise the reconciler end to end:
//! a default network ACL seeded the way the provider seeds it, optional
//! custom ACLs, and subnets that are always associated with exactly one ACL.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;
use vpc_acl_reconcile::{
    AclApplier, AclOperation, AclSnapshot, AclSource, ReconcileError, ReconcileResult, Rule,
    DEFAULT_BASELINE_RULE_NUMBER,
};
use vpc_acl_types::{AclId, Direction, SubnetId};

/// Rule number of the allow-all entries a new default ACL starts with
pub const SEEDED_ALLOW_RULE_NUMBER: u16 = 100;

#[derive(Debug)]
struct VpcState {
    default_acl: AclId,
    acls: BTreeMap<AclId, Vec<Rule>>,
    subnets: BTreeMap<SubnetId, AclId>,
    release_target: Option<AclId>,
    applied: Vec<AclOperation>,
    next_id: u32,
}

impl VpcState {
    fn allocate(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn rules_mut(&mut self, acl_id: &AclId) -> ReconcileResult<&mut Vec<Rule>> {
        self.acls
            .get_mut(acl_id)
            .ok_or_else(|| ReconcileError::not_found(acl_id.clone()))
    }
}

/// A single VPC with its default network ACL
#[derive(Debug)]
pub struct MockVpc {
    state: Mutex<VpcState>,
    baseline_rule_number: u16,
}

impl MockVpc {
    /// Create a VPC whose default ACL allows all traffic in both directions
    pub fn new() -> ReconcileResult<Self> {
        let default_acl = AclId::new("acl-00000001")?;
        let mut acls = BTreeMap::new();
        acls.insert(
            default_acl.clone(),
            vec![
                Rule::allow_all(Direction::Ingress, SEEDED_ALLOW_RULE_NUMBER),
                Rule::allow_all(Direction::Egress, SEEDED_ALLOW_RULE_NUMBER),
                Rule::deny_all(Direction::Ingress, DEFAULT_BASELINE_RULE_NUMBER),
                Rule::deny_all(Direction::Egress, DEFAULT_BASELINE_RULE_NUMBER),
            ],
        );

        Ok(Self {
            state: Mutex::new(VpcState {
                default_acl,
                acls,
                subnets: BTreeMap::new(),
                release_target: None,
                applied: Vec::new(),
                next_id: 1,
            }),
            baseline_rule_number: DEFAULT_BASELINE_RULE_NUMBER,
        })
    }

    fn state(&self) -> MutexGuard<'_, VpcState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Id of the VPC's default network ACL
    pub fn default_acl_id(&self) -> AclId {
        self.state().default_acl.clone()
    }

    /// Create a custom network ACL holding only the baseline entries
    pub fn create_network_acl(&self) -> ReconcileResult<AclId> {
        let mut state = self.state();
        let acl_id = AclId::new(format!("acl-{:08x}", state.allocate()))?;
        state.acls.insert(
            acl_id.clone(),
            vec![
                Rule::deny_all(Direction::Ingress, self.baseline_rule_number),
                Rule::deny_all(Direction::Egress, self.baseline_rule_number),
            ],
        );
        Ok(acl_id)
    }

    /// Create a subnet; new subnets attach to the default ACL
    pub fn create_subnet(&self) -> ReconcileResult<SubnetId> {
        let mut state = self.state();
        let subnet_id = SubnetId::new(format!("subnet-{:08x}", state.allocate()))?;
        let default_acl = state.default_acl.clone();
        state.subnets.insert(subnet_id.clone(), default_acl);
        Ok(subnet_id)
    }

    /// Replace a subnet's association, as another ACL resource would
    pub fn associate(&self, subnet_id: &SubnetId, acl_id: &AclId) -> ReconcileResult<()> {
        let mut state = self.state();
        if !state.acls.contains_key(acl_id) {
            return Err(ReconcileError::not_found(acl_id.clone()));
        }
        match state.subnets.get_mut(subnet_id) {
            Some(owner) => {
                *owner = acl_id.clone();
                Ok(())
            }
            None => Err(ReconcileError::remote(
                "associate",
                format!("subnet {} does not exist", subnet_id),
            )),
        }
    }

    /// ACL that released subnets move to; release fails while unset
    pub fn set_release_target(&self, acl_id: Option<AclId>) {
        self.state().release_target = acl_id;
    }

    /// ACL a subnet is currently associated with
    pub fn association_of(&self, subnet_id: &SubnetId) -> Option<AclId> {
        self.state().subnets.get(subnet_id).cloned()
    }

    /// Current state of one ACL
    pub fn snapshot(&self, acl_id: &AclId) -> ReconcileResult<AclSnapshot> {
        let state = self.state();
        let rules = state
            .acls
            .get(acl_id)
            .ok_or_else(|| ReconcileError::not_found(acl_id.clone()))?;
        let associations = state
            .subnets
            .iter()
            .filter(|(_, owner)| *owner == acl_id)
            .map(|(subnet, _)| subnet.clone());

        Ok(AclSnapshot::new(acl_id.clone())
            .with_rules(rules.clone())
            .with_associations(associations))
    }

    /// Every operation applied so far, in order
    pub fn applied_operations(&self) -> Vec<AclOperation> {
        self.state().applied.clone()
    }

    fn apply_one(
        &self,
        state: &mut VpcState,
        acl_id: &AclId,
        operation: &AclOperation,
    ) -> ReconcileResult<()> {
        match operation {
            AclOperation::DeleteEntry {
                direction,
                rule_number,
            } => {
                if *rule_number == self.baseline_rule_number {
                    return Err(ReconcileError::remote(
                        "delete_entry",
                        format!("{} entry #{} is a default entry", direction, rule_number),
                    ));
                }
                let rules = state.rules_mut(acl_id)?;
                let before = rules.len();
                rules.retain(|r| !(r.direction == *direction && r.rule_number == *rule_number));
                if rules.len() == before {
                    return Err(ReconcileError::remote(
                        "delete_entry",
                        format!("{} entry #{} does not exist", direction, rule_number),
                    ));
                }
            }
            AclOperation::CreateEntry(rule) => {
                let rules = state.rules_mut(acl_id)?;
                if rules
                    .iter()
                    .any(|r| r.direction == rule.direction && r.rule_number == rule.rule_number)
                {
                    return Err(ReconcileError::remote(
                        "create_entry",
                        format!(
                            "{} entry #{} already exists",
                            rule.direction, rule.rule_number
                        ),
                    ));
                }
                rules.push(rule.clone());
            }
            AclOperation::ClaimSubnet { subnet_id } => {
                if !state.acls.contains_key(acl_id) {
                    return Err(ReconcileError::not_found(acl_id.clone()));
                }
                let owner = state.subnets.get_mut(subnet_id).ok_or_else(|| {
                    ReconcileError::remote(
                        "claim_subnet",
                        format!("subnet {} does not exist", subnet_id),
                    )
                })?;
                *owner = acl_id.clone();
            }
            AclOperation::ReleaseSubnet { subnet_id } => {
                let target = state.release_target.clone().ok_or_else(|| {
                    ReconcileError::remote(
                        "release_subnet",
                        format!("no ACL to move subnet {} to", subnet_id),
                    )
                })?;
                match state.subnets.get_mut(subnet_id) {
                    Some(owner) if owner == acl_id => *owner = target,
                    _ => {
                        return Err(ReconcileError::remote(
                            "release_subnet",
                            format!("subnet {} is not associated with {}", subnet_id, acl_id),
                        ))
                    }
                }
            }
        }

        state.applied.push(operation.clone());
        Ok(())
    }
}

#[async_trait]
impl AclSource for MockVpc {
    async fn describe_network_acl(&self, acl_id: &AclId) -> ReconcileResult<AclSnapshot> {
        self.snapshot(acl_id)
    }
}

#[async_trait]
impl AclApplier for MockVpc {
    async fn apply_operations(
        &self,
        acl_id: &AclId,
        operations: &[AclOperation],
    ) -> ReconcileResult<()> {
        let mut state = self.state();
        for operation in operations {
            debug!("Applying {} to {}", operation, acl_id);
            self.apply_one(&mut state, acl_id, operation)?;
        }
        Ok(())
    }
}
