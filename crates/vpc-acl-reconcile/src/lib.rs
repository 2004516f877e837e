//! Default network ACL reconciliation.
//!
//! A VPC's default network ACL is created by the provider and cannot be
//! deleted. Managing it means adopting the existing object and converging
//! its entries and subnet associations to a declaration:
//!
//! - [`normalizer`]: expands the deny-all shorthand and canonicalizes rules
//! - [`baseline`]: the provider's unremovable catch-all entries
//! - [`rule_diff`]: structural set difference of user entries
//! - [`association`]: subnet claims and undeclared-subnet handling
//! - [`plan`]: the changeset, its ordered operations and the verdict
//! - [`DefaultAclReconciler`]: composes the above behind [`AclSource`] and
//!   [`AclApplier`]
//!
//! # Pipeline
//!
//! 1. Resolve and validate the declaration into a [`DesiredState`]
//! 2. Read an [`AclSnapshot`] of the live ACL
//! 3. Split live entries into baseline and user rules
//! 4. Diff user rules and associations against the declaration
//! 5. Report a [`Plan`]; it requires action if any list is non-empty
//!
//! # Example
//!
//! ```ignore
//! use vpc_acl_reconcile::{AclSnapshot, DefaultAclReconciler, DesiredState};
//!
//! let desired = DesiredState::new(acl_id).deny_ingress().deny_egress();
//! let plan = DefaultAclReconciler::default().plan(&desired, &snapshot)?;
//! if plan.requires_action() {
//!     println!("{}", plan);
//! }
//! ```

pub mod association;
pub mod baseline;
pub mod config;
pub mod desired;
pub mod error;
pub mod normalizer;
pub mod plan;
pub mod reconciler;
pub mod rule;
pub mod rule_diff;
pub mod snapshot;
pub mod source;

// Re-export commonly used items at crate root
pub use association::{reconcile_associations, AssociationChanges, UndeclaredSubnetPolicy};
pub use baseline::{BaselineRules, ProviderBaseline, DEFAULT_BASELINE_RULE_NUMBER};
pub use config::{AssociationConfig, BaselineConfig, ReconcilerConfig};
pub use desired::{DefaultAclConfig, DesiredState, RuleBlock, RuleDeclaration};
pub use error::{ReconcileError, ReconcileResult};
pub use normalizer::{deny_all_rule, normalize};
pub use plan::{requires_action, AclOperation, ChangeSet, Plan, PlanSummary};
pub use reconciler::DefaultAclReconciler;
pub use rule::{Rule, DENY_ALL_RULE_NUMBER, MAX_USER_RULE_NUMBER, MIN_USER_RULE_NUMBER};
pub use rule_diff::{diff_rules, RuleChanges, RulePartition};
pub use snapshot::AclSnapshot;
pub use source::{AclApplier, AclSource};

// Re-export the primitive types for convenience
pub use vpc_acl_types::{AclId, Direction, IpPrefix, Protocol, RuleAction, SubnetId};
