//! Common types for VPC network ACL management.
//!
//! This crate provides type-safe representations of the primitives that make
//! up a network ACL entry and its attachments:
//!
//! - [`IpPrefix`]: IPv4/IPv6 network prefixes (CIDR notation)
//! - [`AclId`] / [`SubnetId`]: provider resource identifiers
//! - [`Direction`]: ingress or egress
//! - [`Protocol`]: IP protocol number, or `-1` for all traffic
//! - [`RuleAction`]: allow or deny

mod entry;
mod id;
mod ip;

pub use entry::{Direction, Protocol, RuleAction};
pub use id::{AclId, SubnetId};
pub use ip::{IpAddress, IpPrefix};

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("invalid CIDR block: {0}")]
    InvalidIpPrefix(String),

    #[error("invalid network ACL id: {0} (expected acl-<hex>)")]
    InvalidAclId(String),

    #[error("invalid subnet id: {0} (expected subnet-<hex>)")]
    InvalidSubnetId(String),

    #[error("invalid rule direction: {0}")]
    InvalidDirection(String),

    #[error("invalid protocol: {0}")]
    InvalidProtocol(String),

    #[error("invalid rule action: {0} (must be allow or deny)")]
    InvalidRuleAction(String),
}
