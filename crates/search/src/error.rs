//! Error types for planning.

use pomdp_core::CoreError;
use pomdp_prob::BeliefError;
use thiserror::Error;

/// Errors that can occur while planning.
#[derive(Debug, Clone, Error)]
pub enum SearchError {
    /// The belief handed to the planner could not be used.
    #[error("Belief error: {0}")]
    Belief(#[from] BeliefError),

    /// Invalid planner configuration or a domain/policy contract violation.
    #[error(transparent)]
    Core(#[from] CoreError),
}
