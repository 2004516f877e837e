//! Provider resource identifiers.
//!
//! Identifiers are `<prefix>-<suffix>` where the suffix is a non-empty run
//! of lowercase ASCII alphanumerics (`acl-0a1b2c3d`, `subnet-5e6f7a8b`).

use crate::ParseError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

fn has_valid_suffix(s: &str, prefix: &str) -> bool {
    match s.strip_prefix(prefix) {
        Some(suffix) => {
            !suffix.is_empty()
                && suffix
                    .chars()
                    .all(|c| c.is_ascii_digit() || c.is_ascii_lowercase())
        }
        None => false,
    }
}

macro_rules! resource_id {
    ($(#[$meta:meta])* $name:ident, $prefix:literal, $err:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(try_from = "String", into = "String")]
        pub struct $name(String);

        impl $name {
            /// Identifier prefix, including the separator.
            pub const PREFIX: &'static str = $prefix;

            /// Parses and validates an identifier.
            pub fn new(id: impl Into<String>) -> Result<Self, ParseError> {
                let id = id.into();
                if has_valid_suffix(&id, Self::PREFIX) {
                    Ok(Self(id))
                } else {
                    Err(ParseError::$err(id))
                }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s.trim())
            }
        }

        impl TryFrom<String> for $name {
            type Error = ParseError;

            fn try_from(s: String) -> Result<Self, Self::Error> {
                Self::new(s)
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> String {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

resource_id!(
    /// Identifier of a network ACL (`acl-...`).
    AclId,
    "acl-",
    InvalidAclId
);

resource_id!(
    /// Identifier of a subnet (`subnet-...`).
    SubnetId,
    "subnet-",
    InvalidSubnetId
);
