//! Acceptance test infrastructure for default network ACL reconciliation
//!
//! Provides:
//! - An in-memory VPC implementing the source and applier seams
//! - Declarative fixtures for each acceptance scenario
//! - A plan, apply and re-plan step driver
//! - Entry and association count verification helpers

pub mod fixtures;
mod mock_vpc;
mod step;
mod verification;

pub use mock_vpc::{MockVpc, SEEDED_ALLOW_RULE_NUMBER};
pub use step::{AcceptanceHarness, StepOutcome};
pub use verification::*;
