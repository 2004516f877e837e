//! Error types for default ACL reconciliation.
//!
//! All errors implement `std::error::Error` via `thiserror`. Drift between
//! declared and live association state is not an error; it is reported
//! through the plan.

use std::io;
use thiserror::Error;
use vpc_acl_types::{AclId, Direction, ParseError};

/// Result type alias for reconcile operations.
pub type ReconcileResult<T> = Result<T, ReconcileError>;

/// Errors that can occur while planning or applying a default ACL.
#[derive(Debug, Error)]
pub enum ReconcileError {
    /// Shorthand and explicit rules were both given for one direction.
    #[error("Conflicting {direction} rules: {direction}_deny cannot be combined with explicit {direction} blocks")]
    ConflictingDeclaration {
        /// The direction declared twice.
        direction: Direction,
    },

    /// Two declared rules share a rule number within one direction.
    #[error("Duplicate {direction} rule number {rule_number}")]
    DuplicateRuleNumber {
        /// The direction containing the duplicate.
        direction: Direction,
        /// The repeated rule number.
        rule_number: u16,
    },

    /// A declared rule failed validation.
    #[error("Invalid {direction} rule {rule_number}: {message}")]
    InvalidRule {
        /// Direction of the offending rule.
        direction: Direction,
        /// Rule number of the offending rule.
        rule_number: u16,
        /// Error message.
        message: String,
    },

    /// Reconciler configuration validation error.
    #[error("Invalid configuration for {field}: {message}")]
    InvalidConfig {
        /// The field that failed validation.
        field: String,
        /// Error message.
        message: String,
    },

    /// A typed attribute failed to parse.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The ACL id did not resolve to a live object.
    #[error("Network ACL '{acl_id}' not found")]
    NotFound {
        /// The id that was looked up.
        acl_id: AclId,
    },

    /// The snapshot belongs to a different ACL than the declaration.
    #[error("default_network_acl_id is immutable: declared '{declared}', snapshot is '{live}'")]
    AclIdMismatch {
        /// Id from the declaration.
        declared: AclId,
        /// Id carried by the snapshot.
        live: AclId,
    },

    /// The remote collaborator failed.
    #[error("Remote operation failed: {operation}: {message}")]
    Remote {
        /// The operation that failed (e.g., "describe", "create_entry").
        operation: String,
        /// Error message.
        message: String,
    },

    /// Configuration file access failed.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

impl ReconcileError {
    /// Creates an invalid rule error.
    pub fn invalid_rule(direction: Direction, rule_number: u16, message: impl Into<String>) -> Self {
        Self::InvalidRule {
            direction,
            rule_number,
            message: message.into(),
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(acl_id: AclId) -> Self {
        Self::NotFound { acl_id }
    }

    /// Creates a remote collaborator error.
    pub fn remote(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Remote {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Returns true if the error comes from the declaration itself and is
    /// raised before any remote interaction.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            ReconcileError::ConflictingDeclaration { .. }
                | ReconcileError::DuplicateRuleNumber { .. }
                | ReconcileError::InvalidRule { .. }
                | ReconcileError::InvalidConfig { .. }
                | ReconcileError::Parse(_)
        )
    }

    /// Returns true if this error indicates a transient condition
    /// that may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ReconcileError::Remote { .. })
    }
}
