//! Error types for belief operations.

use pomdp_core::CoreError;
use thiserror::Error;

/// Errors that can occur while building, sampling or updating a belief.
#[derive(Debug, Clone, Error)]
pub enum BeliefError {
    /// A belief with no states (or no particles).
    #[error("Belief cannot be empty")]
    EmptyBelief,

    /// Negative probability encountered.
    #[error("Negative probability encountered")]
    NegativeProbability,

    /// Distribution doesn't sum to 1.
    #[error("Distribution not normalized: sum = {sum} (expected 1.0)")]
    NotNormalized { sum: f64 },

    /// All weights are zero (can't normalize).
    #[error("Cannot normalize: all weights are zero")]
    ZeroWeights,

    /// No state in the prior's support explains the observation.
    #[error("Model inconsistency: no state explains observation {observation} after action {action}")]
    ModelInconsistency { action: String, observation: String },

    /// Rejection sampling could not refill the particle set.
    #[error(
        "Particle depletion: accepted {accepted} of {required} particles after {attempts} attempts"
    )]
    ParticleDepletion {
        accepted: usize,
        required: usize,
        attempts: usize,
    },

    /// Invalid configuration or domain contract violation.
    #[error(transparent)]
    Core(#[from] CoreError),
}
