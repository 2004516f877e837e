//! Verification helpers for default ACL acceptance tests
//!
//! Provides assertion helpers to verify live ACL state and plan verdicts

use thiserror::Error;
use vpc_acl_reconcile::{AclSnapshot, AclSource, BaselineRules, Plan, ReconcileError, Rule};
use vpc_acl_types::AclId;

/// Verification error types
#[derive(Error, Debug)]
pub enum VerificationError {
    #[error(transparent)]
    Reconcile(#[from] ReconcileError),

    #[error("Expected ({expected}) Rules, got ({actual})")]
    RuleCountMismatch { expected: usize, actual: usize },

    #[error("Expected ({expected}) Subnets, got ({actual})")]
    SubnetCountMismatch { expected: usize, actual: usize },

    #[error("Expected entry '{rule}' not found")]
    EntryNotFound { rule: String },

    #[error("Expected an empty plan, got: {plan}")]
    UnexpectedChanges { plan: String },

    #[error("Expected a non-empty plan for {acl_id}")]
    MissingChanges { acl_id: AclId },
}

/// Result type for verification operations
pub type VerifyResult<T> = Result<T, VerificationError>;

/// Check entry and association counts of a default ACL.
///
/// `rules` lists the expected user entries; the hidden baseline entries are
/// added to the expected count.
pub fn check_default_acl_attributes(
    snapshot: &AclSnapshot,
    rules: &[Rule],
    subnet_count: usize,
    baseline: &dyn BaselineRules,
) -> VerifyResult<()> {
    let expected = baseline.expected_rule_count(rules.len());
    if snapshot.rule_count() != expected {
        return Err(VerificationError::RuleCountMismatch {
            expected,
            actual: snapshot.rule_count(),
        });
    }

    for rule in rules {
        if !snapshot.rules.contains(rule) {
            return Err(VerificationError::EntryNotFound {
                rule: rule.to_string(),
            });
        }
    }

    if snapshot.association_count() != subnet_count {
        return Err(VerificationError::SubnetCountMismatch {
            expected: subnet_count,
            actual: snapshot.association_count(),
        });
    }

    Ok(())
}

/// Verify that a plan has nothing left to do
pub fn assert_plan_empty(plan: &Plan) -> VerifyResult<()> {
    if plan.requires_action() {
        return Err(VerificationError::UnexpectedChanges {
            plan: plan.to_string(),
        });
    }
    Ok(())
}

/// Verify that a plan still requires action
pub fn assert_plan_non_empty(plan: &Plan) -> VerifyResult<()> {
    if !plan.requires_action() {
        return Err(VerificationError::MissingChanges {
            acl_id: plan.acl_id.clone(),
        });
    }
    Ok(())
}

/// Live ACL verification helper
pub struct AclVerifier<'a> {
    source: &'a dyn AclSource,
    baseline: &'a dyn BaselineRules,
}

impl<'a> AclVerifier<'a> {
    /// Create a new ACL verifier
    pub fn new(source: &'a dyn AclSource, baseline: &'a dyn BaselineRules) -> Self {
        Self { source, baseline }
    }

    /// Fetch the live ACL (for inspection)
    pub async fn fetch(&self, acl_id: &AclId) -> VerifyResult<AclSnapshot> {
        Ok(self.source.describe_network_acl(acl_id).await?)
    }

    /// Verify entry and association counts of the live ACL
    pub async fn assert_attributes(
        &self,
        acl_id: &AclId,
        rules: &[Rule],
        subnet_count: usize,
    ) -> VerifyResult<()> {
        let snapshot = self.fetch(acl_id).await?;
        check_default_acl_attributes(&snapshot, rules, subnet_count, self.baseline)
    }
}
