//! ACL entry model.
//!
//! A [`Rule`] is compared structurally on every field. The field order of
//! the struct is the comparison key order, so sorted rule sets list ingress
//! first and then ascend by rule number within each direction.

use serde::{Deserialize, Serialize};
use std::fmt;
use vpc_acl_types::{Direction, IpPrefix, Protocol, RuleAction};

/// Rule number the deny-all shorthand occupies (the first user slot).
pub const DENY_ALL_RULE_NUMBER: u16 = 100;

/// Lowest rule number a user entry may take.
pub const MIN_USER_RULE_NUMBER: u16 = 1;

/// Highest rule number a user entry may take. Everything above is reserved
/// for provider-managed entries.
pub const MAX_USER_RULE_NUMBER: u16 = 32766;

/// One network ACL entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Rule {
    pub direction: Direction,
    pub rule_number: u16,
    pub protocol: Protocol,
    pub action: RuleAction,
    pub cidr_block: IpPrefix,
    #[serde(default)]
    pub from_port: u16,
    #[serde(default)]
    pub to_port: u16,
}

impl Rule {
    /// Creates a rule with both ports set to 0.
    pub fn new(
        direction: Direction,
        rule_number: u16,
        protocol: Protocol,
        action: RuleAction,
        cidr_block: IpPrefix,
    ) -> Self {
        Self {
            direction,
            rule_number,
            protocol,
            action,
            cidr_block,
            from_port: 0,
            to_port: 0,
        }
    }

    /// Sets the port range.
    pub fn with_ports(mut self, from_port: u16, to_port: u16) -> Self {
        self.from_port = from_port;
        self.to_port = to_port;
        self
    }

    /// All protocols from anywhere, allowed.
    pub fn allow_all(direction: Direction, rule_number: u16) -> Self {
        Self::new(
            direction,
            rule_number,
            Protocol::All,
            RuleAction::Allow,
            IpPrefix::any_ipv4(),
        )
    }

    /// All protocols from anywhere, denied.
    pub fn deny_all(direction: Direction, rule_number: u16) -> Self {
        Self::new(
            direction,
            rule_number,
            Protocol::All,
            RuleAction::Deny,
            IpPrefix::any_ipv4(),
        )
    }

    pub fn is_egress(&self) -> bool {
        self.direction.is_egress()
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} #{} {} proto={} {} ports={}-{}",
            self.direction,
            self.rule_number,
            self.action,
            self.protocol,
            self.cidr_block,
            self.from_port,
            self.to_port
        )
    }
}
