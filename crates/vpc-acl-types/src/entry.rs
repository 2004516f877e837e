//! Network ACL entry field types.

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Traffic direction an ACL entry applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Traffic entering the subnet.
    Ingress,
    /// Traffic leaving the subnet.
    Egress,
}

impl Direction {
    /// Both directions, ingress first.
    pub const ALL: [Direction; 2] = [Direction::Ingress, Direction::Egress];

    /// Maps the provider's `egress` flag onto a direction.
    pub const fn from_egress(egress: bool) -> Self {
        if egress {
            Direction::Egress
        } else {
            Direction::Ingress
        }
    }

    /// Returns true for egress.
    pub const fn is_egress(&self) -> bool {
        matches!(self, Direction::Egress)
    }

    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Ingress => "ingress",
            Direction::Egress => "egress",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ingress" => Ok(Direction::Ingress),
            "egress" => Ok(Direction::Egress),
            _ => Err(ParseError::InvalidDirection(s.to_string())),
        }
    }
}

/// Whether matching traffic is allowed or denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
    Deny,
}

impl fmt::Display for RuleAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleAction::Allow => write!(f, "allow"),
            RuleAction::Deny => write!(f, "deny"),
        }
    }
}

impl FromStr for RuleAction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "allow" => Ok(RuleAction::Allow),
            "deny" => Ok(RuleAction::Deny),
            _ => Err(ParseError::InvalidRuleAction(s.to_string())),
        }
    }
}

/// IP protocol matched by an ACL entry.
///
/// The provider reports protocols as decimal strings with `-1` meaning all
/// traffic. Configuration may also use a protocol name or a bare integer;
/// every spelling canonicalises to the numeric form, so `"tcp"`, `"6"` and
/// `6` compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "ProtocolRepr", into = "String")]
pub enum Protocol {
    /// All protocols (`-1`).
    All,
    /// A specific IP protocol number.
    Number(u8),
}

impl Protocol {
    pub const ICMP: Protocol = Protocol::Number(1);
    pub const TCP: Protocol = Protocol::Number(6);
    pub const UDP: Protocol = Protocol::Number(17);
    pub const ICMPV6: Protocol = Protocol::Number(58);

    /// Returns the provider's numeric code (`-1` for all).
    pub const fn code(&self) -> i16 {
        match self {
            Protocol::All => -1,
            Protocol::Number(n) => *n as i16,
        }
    }

    pub fn from_code(code: i64) -> Result<Self, ParseError> {
        match code {
            -1 => Ok(Protocol::All),
            0..=255 => Ok(Protocol::Number(code as u8)),
            _ => Err(ParseError::InvalidProtocol(code.to_string())),
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Protocol {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        match s.to_lowercase().as_str() {
            "all" | "-1" => Ok(Protocol::All),
            "icmp" => Ok(Protocol::ICMP),
            "tcp" => Ok(Protocol::TCP),
            "udp" => Ok(Protocol::UDP),
            "icmpv6" => Ok(Protocol::ICMPV6),
            other => {
                let code: i64 = other
                    .parse()
                    .map_err(|_| ParseError::InvalidProtocol(s.to_string()))?;
                Protocol::from_code(code)
            }
        }
    }
}

/// Accepts both `protocol = -1` and `protocol = "tcp"`.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProtocolRepr {
    Code(i64),
    Name(String),
}

impl TryFrom<ProtocolRepr> for Protocol {
    type Error = ParseError;

    fn try_from(repr: ProtocolRepr) -> Result<Self, Self::Error> {
        match repr {
            ProtocolRepr::Code(code) => Protocol::from_code(code),
            ProtocolRepr::Name(name) => name.parse(),
        }
    }
}

impl From<Protocol> for String {
    fn from(protocol: Protocol) -> String {
        protocol.to_string()
    }
}
