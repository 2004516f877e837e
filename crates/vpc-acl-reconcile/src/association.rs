//! Subnet association reconciliation.
//!
//! A subnet is always associated with exactly one ACL. A default ACL can
//! claim a subnet (replacing whatever association it had), but it cannot
//! hand one back without knowing where it should go. Subnets that are live
//! on the default ACL but no longer declared are therefore handled by an
//! [`UndeclaredSubnetPolicy`].

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, warn};
use vpc_acl_types::SubnetId;

/// What to do with live subnets the declaration no longer lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UndeclaredSubnetPolicy {
    /// Report them as drift and leave them attached.
    #[default]
    Flag,
    /// Propose releasing them; the apply layer picks the new owner.
    Release,
}

/// Association changes needed to converge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssociationChanges {
    /// Declared subnets to claim.
    pub to_add: Vec<SubnetId>,
    /// Attached subnets to release (empty under [`UndeclaredSubnetPolicy::Flag`]).
    pub to_remove: Vec<SubnetId>,
    /// Attached but undeclared subnets this resource will not release.
    pub unreleased: Vec<SubnetId>,
}

impl AssociationChanges {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty() && self.unreleased.is_empty()
    }
}

/// Computes association changes for one default ACL.
///
/// Only the current declaration drives claims: a subnet that was moved to
/// another ACL and dropped from the declaration produces nothing.
pub fn reconcile_associations(
    declared: &BTreeSet<SubnetId>,
    live: &BTreeSet<SubnetId>,
    policy: UndeclaredSubnetPolicy,
) -> AssociationChanges {
    let to_add: Vec<SubnetId> = declared.difference(live).cloned().collect();
    let undeclared: Vec<SubnetId> = live.difference(declared).cloned().collect();

    for subnet in &to_add {
        debug!("Subnet {} declared but not attached, claiming", subnet);
    }

    let (to_remove, unreleased) = match policy {
        UndeclaredSubnetPolicy::Release => (undeclared, Vec::new()),
        UndeclaredSubnetPolicy::Flag => {
            for subnet in &undeclared {
                warn!(
                    "Subnet {} is still attached but no longer declared; reassign it to another ACL",
                    subnet
                );
            }
            (Vec::new(), undeclared)
        }
    };

    AssociationChanges {
        to_add,
        to_remove,
        unreleased,
    }
}
