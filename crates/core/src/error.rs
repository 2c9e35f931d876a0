//! # Error Types
//!
//! Errors raised at the boundary between the solver and whatever plugs into
//! it: configuration values handed to constructors and domain models that do
//! not honor the [`crate::Domain`] contract.
//!
//! Both are rejected where they enter the system. A configuration is never
//! clamped into range and a domain that breaks its contract is never
//! "repaired" by the solver.

use thiserror::Error;

/// Core errors shared by every crate in the workspace.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum CoreError {
    /// A configuration value is outside its admissible range.
    #[error("Invalid configuration: `{field}` {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    /// A domain model (or a strategy plugged into the planner) broke the
    /// domain contract.
    #[error("Domain contract violated: {reason}")]
    ContractViolation { reason: String },

    /// A configuration document could not be parsed.
    #[error("Configuration parse error: {0}")]
    Parse(String),
}

impl CoreError {
    /// Shorthand for [`CoreError::InvalidConfig`].
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            reason: reason.into(),
        }
    }

    /// Shorthand for [`CoreError::ContractViolation`].
    pub fn contract(reason: impl Into<String>) -> Self {
        Self::ContractViolation {
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}
