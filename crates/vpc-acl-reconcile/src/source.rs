//! Remote collaborator seams.
//!
//! The reconciler never talks to a cloud API directly. Reads go through an
//! [`AclSource`] and writes through an [`AclApplier`], so the same pipeline
//! runs against a real provider client, a recorded snapshot or the
//! in-memory VPC used by the acceptance tests.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//! use vpc_acl_reconcile::{AclSnapshot, AclSource, ReconcileError, ReconcileResult};
//! use vpc_acl_types::AclId;
//!
//! struct Recorded(AclSnapshot);
//!
//! #[async_trait]
//! impl AclSource for Recorded {
//!     async fn describe_network_acl(&self, id: &AclId) -> ReconcileResult<AclSnapshot> {
//!         if &self.0.id == id {
//!             Ok(self.0.clone())
//!         } else {
//!             Err(ReconcileError::not_found(id.clone()))
//!         }
//!     }
//! }
//! ```

use async_trait::async_trait;
use vpc_acl_types::AclId;

use crate::error::ReconcileResult;
use crate::plan::AclOperation;
use crate::snapshot::AclSnapshot;

/// Fetches the live state of a network ACL.
#[async_trait]
pub trait AclSource: Send + Sync {
    /// Returns the entries and associations of `acl_id`.
    ///
    /// Implementations return [`crate::ReconcileError::NotFound`] when the id
    /// does not resolve, and never a partial snapshot.
    async fn describe_network_acl(&self, acl_id: &AclId) -> ReconcileResult<AclSnapshot>;
}

/// Executes provider calls produced by a plan.
#[async_trait]
pub trait AclApplier: Send + Sync {
    /// Applies `operations` to `acl_id` in the given order.
    ///
    /// The first failing operation aborts the batch.
    async fn apply_operations(
        &self,
        acl_id: &AclId,
        operations: &[AclOperation],
    ) -> ReconcileResult<()>;
}
