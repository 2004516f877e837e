//! Plan, apply and re-plan driver for acceptance steps
//!
//! One step mirrors one declarative run: read the live ACL, plan, apply the
//! plan, then plan again. The follow-up plan is what an operator would see
//! on the next run.

use vpc_acl_reconcile::{
    AclSnapshot, DefaultAclConfig, DefaultAclReconciler, DesiredState, Plan, ReconcileResult,
    ReconcilerConfig,
};

use crate::mock_vpc::MockVpc;
use crate::verification::AclVerifier;

/// What one acceptance step observed
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// Plan computed before applying
    pub plan: Plan,
    /// Plan computed after applying
    pub follow_up: Plan,
    /// Live default ACL after applying
    pub snapshot: AclSnapshot,
}

/// A mock VPC paired with a reconciler
#[derive(Debug)]
pub struct AcceptanceHarness {
    pub vpc: MockVpc,
    pub reconciler: DefaultAclReconciler,
}

impl AcceptanceHarness {
    /// Harness with the provider's default settings
    pub fn new() -> ReconcileResult<Self> {
        Self::with_config(ReconcilerConfig::default())
    }

    pub fn with_config(config: ReconcilerConfig) -> ReconcileResult<Self> {
        Ok(Self {
            reconciler: DefaultAclReconciler::new(config)?,
            vpc: MockVpc::new()?,
        })
    }

    /// Run one declarative step against the VPC
    pub async fn run_step(&self, config: DefaultAclConfig) -> ReconcileResult<StepOutcome> {
        let desired = DesiredState::try_from(config)?;

        let plan = self.reconciler.refresh_and_plan(&self.vpc, &desired).await?;
        self.reconciler.apply(&self.vpc, &plan).await?;
        let follow_up = self.reconciler.refresh_and_plan(&self.vpc, &desired).await?;
        let snapshot = self.vpc.snapshot(&desired.acl_id)?;

        Ok(StepOutcome {
            plan,
            follow_up,
            snapshot,
        })
    }

    pub fn verifier(&self) -> AclVerifier<'_> {
        AclVerifier::new(&self.vpc, self.reconciler.baseline())
    }
}
