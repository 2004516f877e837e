//! Rule set normalization.
//!
//! Turns a [`DesiredState`] into one canonical, sorted rule list per ACL.
//! The deny-all shorthand expands here and nowhere else, so the diff engine
//! only ever sees concrete entries.

use std::collections::BTreeSet;
use tracing::debug;
use vpc_acl_types::Direction;

use crate::desired::{DesiredState, RuleDeclaration};
use crate::error::{ReconcileError, ReconcileResult};
use crate::rule::{Rule, DENY_ALL_RULE_NUMBER, MAX_USER_RULE_NUMBER, MIN_USER_RULE_NUMBER};

/// The single entry `*_deny = true` stands for.
pub fn deny_all_rule(direction: Direction) -> Rule {
    Rule::deny_all(direction, DENY_ALL_RULE_NUMBER)
}

/// Resolves the raw shorthand flag and explicit blocks for one direction.
///
/// # Errors
///
/// Returns [`ReconcileError::ConflictingDeclaration`] if the shorthand is set
/// and explicit rules are also present.
pub fn resolve_declaration(
    direction: Direction,
    deny_all: bool,
    rules: Vec<Rule>,
) -> ReconcileResult<RuleDeclaration> {
    match (deny_all, rules.is_empty()) {
        (true, false) => Err(ReconcileError::ConflictingDeclaration { direction }),
        (true, true) => Ok(RuleDeclaration::DenyAll),
        (false, _) => Ok(RuleDeclaration::Explicit(rules)),
    }
}

/// Normalizes one direction's declaration.
pub fn normalize_direction(
    direction: Direction,
    declaration: &RuleDeclaration,
) -> ReconcileResult<Vec<Rule>> {
    match declaration {
        RuleDeclaration::DenyAll => {
            debug!("Expanding {}_deny into rule {}", direction, DENY_ALL_RULE_NUMBER);
            Ok(vec![deny_all_rule(direction)])
        }
        RuleDeclaration::Explicit(rules) => {
            validate_rules(direction, rules)?;
            let mut rules = rules.clone();
            rules.sort();
            Ok(rules)
        }
    }
}

/// Normalizes both directions into one sorted list (ingress first).
pub fn normalize(desired: &DesiredState) -> ReconcileResult<Vec<Rule>> {
    let mut normalized = Vec::new();
    for direction in Direction::ALL {
        normalized.extend(normalize_direction(
            direction,
            desired.declaration(direction),
        )?);
    }
    Ok(normalized)
}

fn validate_rules(direction: Direction, rules: &[Rule]) -> ReconcileResult<()> {
    let mut seen = BTreeSet::new();

    for rule in rules {
        if rule.direction != direction {
            return Err(ReconcileError::invalid_rule(
                direction,
                rule.rule_number,
                format!("declared under {} but carries {}", direction, rule.direction),
            ));
        }

        if !(MIN_USER_RULE_NUMBER..=MAX_USER_RULE_NUMBER).contains(&rule.rule_number) {
            return Err(ReconcileError::invalid_rule(
                direction,
                rule.rule_number,
                format!(
                    "rule_no must be {}-{}",
                    MIN_USER_RULE_NUMBER, MAX_USER_RULE_NUMBER
                ),
            ));
        }

        if rule.from_port > rule.to_port {
            return Err(ReconcileError::invalid_rule(
                direction,
                rule.rule_number,
                format!("from_port {} exceeds to_port {}", rule.from_port, rule.to_port),
            ));
        }

        if !seen.insert(rule.rule_number) {
            return Err(ReconcileError::DuplicateRuleNumber {
                direction,
                rule_number: rule.rule_number,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vpc_acl_types::{AclId, Protocol, RuleAction};

    fn desired() -> DesiredState {
        DesiredState::new(AclId::new("acl-0a1b2c3d").unwrap())
    }

    #[test]
    fn test_deny_all_expands_to_rule_100() {
        let rules = normalize(&desired().deny_ingress()).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules[0].direction, Direction::Ingress);
        assert_eq!(rules[0].rule_number, 100);
        assert_eq!(rules[0].protocol, Protocol::All);
        assert_eq!(rules[0].action, RuleAction::Deny);
        assert_eq!(rules[0].cidr_block.to_string(), "0.0.0.0/0");
        assert_eq!((rules[0].from_port, rules[0].to_port), (0, 0));
    }

    #[test]
    fn test_shorthand_equals_explicit_rule() {
        let explicit = desired().with_egress_rules(vec![Rule::new(
            Direction::Egress,
            100,
            Protocol::All,
            RuleAction::Deny,
            "0.0.0.0/0".parse().unwrap(),
        )]);
        assert_eq!(
            normalize(&desired().deny_egress()).unwrap(),
            normalize(&explicit).unwrap()
        );
    }

    #[test]
    fn test_empty_declaration_normalizes_to_nothing() {
        assert!(normalize(&desired()).unwrap().is_empty());
    }

    #[test]
    fn test_output_is_sorted_ingress_first() {
        let state = desired()
            .with_egress_rules(vec![Rule::allow_all(Direction::Egress, 100)])
            .with_ingress_rules(vec![
                Rule::allow_all(Direction::Ingress, 200),
                Rule::allow_all(Direction::Ingress, 100),
            ]);
        let numbers: Vec<_> = normalize(&state)
            .unwrap()
            .iter()
            .map(|r| (r.direction, r.rule_number))
            .collect();
        assert_eq!(
            numbers,
            vec![
                (Direction::Ingress, 100),
                (Direction::Ingress, 200),
                (Direction::Egress, 100),
            ]
        );
    }

    #[test]
    fn test_resolve_conflict() {
        let err = resolve_declaration(
            Direction::Ingress,
            true,
            vec![Rule::allow_all(Direction::Ingress, 100)],
        )
        .unwrap_err();
        assert!(err.is_config_error());
        assert!(matches!(
            resolve_declaration(Direction::Ingress, true, Vec::new()),
            Ok(RuleDeclaration::DenyAll)
        ));
    }

    #[test]
    fn test_duplicate_rule_number_rejected() {
        let state = desired().with_ingress_rules(vec![
            Rule::allow_all(Direction::Ingress, 100),
            Rule::deny_all(Direction::Ingress, 100),
        ]);
        assert!(matches!(
            normalize(&state),
            Err(ReconcileError::DuplicateRuleNumber {
                direction: Direction::Ingress,
                rule_number: 100
            })
        ));
    }

    #[test]
    fn test_same_number_in_both_directions_is_fine() {
        let state = desired()
            .with_ingress_rules(vec![Rule::allow_all(Direction::Ingress, 100)])
            .with_egress_rules(vec![Rule::allow_all(Direction::Egress, 100)]);
        assert_eq!(normalize(&state).unwrap().len(), 2);
    }

    #[test]
    fn test_reserved_rule_number_rejected() {
        let state = desired().with_egress_rules(vec![Rule::deny_all(Direction::Egress, 32767)]);
        assert!(matches!(
            normalize(&state),
            Err(ReconcileError::InvalidRule {
                rule_number: 32767,
                ..
            })
        ));

        let zero = desired().with_egress_rules(vec![Rule::deny_all(Direction::Egress, 0)]);
        assert!(normalize(&zero).is_err());
    }

    #[test]
    fn test_port_range_and_direction_checked() {
        let ports = desired().with_ingress_rules(vec![
            Rule::allow_all(Direction::Ingress, 100).with_ports(443, 80)
        ]);
        assert!(normalize(&ports).is_err());

        let misplaced =
            desired().with_ingress_rules(vec![Rule::allow_all(Direction::Egress, 100)]);
        assert!(normalize(&misplaced).is_err());
    }
}
