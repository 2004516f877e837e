//! Rule diffing between declared and live entries.
//!
//! Live entries are first split into baseline and user rules. Only user
//! rules take part in the set difference, which is an exact structural
//! comparison: a rule whose action or port range changed is removed and
//! re-added, never edited in place.

use std::collections::BTreeSet;
use tracing::debug;

use crate::baseline::BaselineRules;
use crate::rule::Rule;

/// Live entries split by ownership.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RulePartition {
    /// Provider-imposed entries.
    pub baseline: Vec<Rule>,
    /// Everything else.
    pub user: Vec<Rule>,
}

impl RulePartition {
    /// Splits `live` using the baseline shapes.
    pub fn split(live: &[Rule], baseline: &dyn BaselineRules) -> Self {
        let (baseline_rules, user): (Vec<Rule>, Vec<Rule>) =
            live.iter().cloned().partition(|r| baseline.is_baseline(r));
        Self {
            baseline: baseline_rules,
            user,
        }
    }

    /// Total number of live entries this partition was built from.
    pub fn len(&self) -> usize {
        self.baseline.len() + self.user.len()
    }

    pub fn is_empty(&self) -> bool {
        self.baseline.is_empty() && self.user.is_empty()
    }
}

/// Rule additions and removals needed to converge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleChanges {
    pub to_add: Vec<Rule>,
    pub to_remove: Vec<Rule>,
}

impl RuleChanges {
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Computes the minimal rule changeset.
///
/// `declared` must already be normalized. Baseline shapes are ignored on
/// both sides, and both output lists are sorted.
pub fn diff_rules(declared: &[Rule], live: &[Rule], baseline: &dyn BaselineRules) -> RuleChanges {
    let partition = RulePartition::split(live, baseline);

    let declared: BTreeSet<&Rule> = declared.iter().filter(|r| !baseline.is_baseline(r)).collect();
    let user: BTreeSet<&Rule> = partition.user.iter().collect();

    let to_remove: Vec<Rule> = user.difference(&declared).map(|r| (*r).clone()).collect();
    let to_add: Vec<Rule> = declared.difference(&user).map(|r| (*r).clone()).collect();

    debug!(
        live = live.len(),
        baseline = partition.baseline.len(),
        user = partition.user.len(),
        declared = declared.len(),
        add = to_add.len(),
        remove = to_remove.len(),
        "Diffed ACL entries"
    );

    RuleChanges { to_add, to_remove }
}
