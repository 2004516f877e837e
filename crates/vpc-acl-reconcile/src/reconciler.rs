//! The default ACL reconciler.
//!
//! Composes normalization, baseline filtering, rule diffing and association
//! reconciliation into one plan. The reconciler holds no mutable state and
//! caches nothing between calls; only the collaborator calls are async.

use std::sync::Arc;
use tracing::{debug, info, instrument};

use crate::association::{reconcile_associations, UndeclaredSubnetPolicy};
use crate::baseline::BaselineRules;
use crate::config::ReconcilerConfig;
use crate::desired::DesiredState;
use crate::error::{ReconcileError, ReconcileResult};
use crate::normalizer::normalize;
use crate::plan::{ChangeSet, Plan};
use crate::rule::Rule;
use crate::rule_diff::diff_rules;
use crate::snapshot::AclSnapshot;
use crate::source::{AclApplier, AclSource};

/// Plans and applies convergence of one default network ACL at a time.
#[derive(Debug, Clone)]
pub struct DefaultAclReconciler {
    config: ReconcilerConfig,
    baseline: Arc<dyn BaselineRules>,
}

impl DefaultAclReconciler {
    /// Creates a reconciler using the baseline described by `config`.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::InvalidConfig`] if `config` does not validate.
    pub fn new(config: ReconcilerConfig) -> ReconcileResult<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    fn from_validated(config: ReconcilerConfig) -> Self {
        let baseline = Arc::new(config.provider_baseline());
        Self { config, baseline }
    }

    /// Replaces the baseline oracle.
    ///
    /// Declared rules matching one of its shapes are rejected when planning.
    pub fn with_baseline(mut self, baseline: Arc<dyn BaselineRules>) -> Self {
        self.baseline = baseline;
        self
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    pub fn baseline(&self) -> &dyn BaselineRules {
        self.baseline.as_ref()
    }

    pub fn undeclared_policy(&self) -> UndeclaredSubnetPolicy {
        self.config.associations.undeclared
    }

    /// Computes the plan converging `snapshot` to `desired`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the declaration is invalid or declares
    /// a baseline entry, or [`ReconcileError::AclIdMismatch`] if the snapshot
    /// is of another ACL.
    #[instrument(skip_all, fields(acl_id = %desired.acl_id))]
    pub fn plan(&self, desired: &DesiredState, snapshot: &AclSnapshot) -> ReconcileResult<Plan> {
        let declared = normalize(desired)?;
        self.plan_normalized(desired, &declared, snapshot)
    }

    /// Fetches the live ACL from `source` and plans against it.
    ///
    /// The declaration is validated before the fetch, so configuration
    /// errors never reach the provider.
    #[instrument(skip_all, fields(acl_id = %desired.acl_id))]
    pub async fn refresh_and_plan(
        &self,
        source: &dyn AclSource,
        desired: &DesiredState,
    ) -> ReconcileResult<Plan> {
        let declared = normalize(desired)?;
        let snapshot = source.describe_network_acl(&desired.acl_id).await?;
        debug!(
            rules = snapshot.rule_count(),
            associations = snapshot.association_count(),
            "Fetched network ACL"
        );
        self.plan_normalized(desired, &declared, &snapshot)
    }

    /// Hands the plan's operations to `applier`.
    ///
    /// A plan with no operations (including a drift-only plan) makes no
    /// provider call.
    #[instrument(skip_all, fields(acl_id = %plan.acl_id))]
    pub async fn apply(&self, applier: &dyn AclApplier, plan: &Plan) -> ReconcileResult<()> {
        let operations = plan.operations();
        if operations.is_empty() {
            debug!("No operations to apply");
            return Ok(());
        }

        applier.apply_operations(&plan.acl_id, &operations).await?;
        info!("Applied {} operations", operations.len());
        Ok(())
    }

    fn plan_normalized(
        &self,
        desired: &DesiredState,
        declared: &[Rule],
        snapshot: &AclSnapshot,
    ) -> ReconcileResult<Plan> {
        if snapshot.id != desired.acl_id {
            return Err(ReconcileError::AclIdMismatch {
                declared: desired.acl_id.clone(),
                live: snapshot.id.clone(),
            });
        }

        if let Some(rule) = declared.iter().find(|r| self.baseline.is_baseline(r)) {
            return Err(ReconcileError::invalid_rule(
                rule.direction,
                rule.rule_number,
                "collides with a baseline entry",
            ));
        }

        let rules = diff_rules(declared, &snapshot.rules, self.baseline.as_ref());
        let associations = reconcile_associations(
            &desired.subnet_ids,
            &snapshot.associations,
            self.undeclared_policy(),
        );

        let plan = Plan::new(
            desired.acl_id.clone(),
            ChangeSet::from_parts(rules, associations),
        );
        info!(
            requires_action = plan.requires_action(),
            "{}",
            plan.summary()
        );
        Ok(plan)
    }
}

impl Default for DefaultAclReconciler {
    fn default() -> Self {
        Self::from_validated(ReconcilerConfig::default())
    }
}
