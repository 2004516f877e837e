//! Provider-imposed baseline rules.
//!
//! Every default ACL carries one catch-all deny per direction at the lowest
//! evaluation priority. These entries cannot be deleted, only shadowed, so
//! the diff engine must never propose adding or removing them and every
//! expected rule count must include them.

use std::fmt;
use vpc_acl_types::Direction;

use crate::rule::Rule;

/// Rule number of the provider's catch-all entry.
pub const DEFAULT_BASELINE_RULE_NUMBER: u16 = 32767;

/// Policy point describing the implicit, unremovable rules of a default ACL.
pub trait BaselineRules: fmt::Debug + Send + Sync {
    /// Baseline entries for one direction.
    fn baseline_for(&self, direction: Direction) -> Vec<Rule>;

    /// Number of baseline entries for one direction.
    fn count_for(&self, direction: Direction) -> usize {
        self.baseline_for(direction).len()
    }

    /// Number of baseline entries across both directions.
    fn total_count(&self) -> usize {
        Direction::ALL.iter().map(|d| self.count_for(*d)).sum()
    }

    /// Returns true if `rule` is one of the baseline shapes.
    fn is_baseline(&self, rule: &Rule) -> bool {
        self.baseline_for(rule.direction).contains(rule)
    }

    /// Live entry count expected for an ACL holding `user_rules` user entries.
    fn expected_rule_count(&self, user_rules: usize) -> usize {
        user_rules + self.total_count()
    }
}

/// The provider's baseline: one deny-all per direction at a fixed number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderBaseline {
    rule_number: u16,
}

impl ProviderBaseline {
    pub const fn new(rule_number: u16) -> Self {
        Self { rule_number }
    }

    pub const fn rule_number(&self) -> u16 {
        self.rule_number
    }
}

impl Default for ProviderBaseline {
    fn default() -> Self {
        Self::new(DEFAULT_BASELINE_RULE_NUMBER)
    }
}

impl BaselineRules for ProviderBaseline {
    fn baseline_for(&self, direction: Direction) -> Vec<Rule> {
        vec![Rule::deny_all(direction, self.rule_number)]
    }

    fn count_for(&self, _direction: Direction) -> usize {
        1
    }
}
