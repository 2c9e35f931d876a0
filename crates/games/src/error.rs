//! Error types for running episodes.

use pomdp_core::CoreError;
use pomdp_prob::BeliefError;
use pomdp_search::SearchError;
use thiserror::Error;

/// Errors that halt an episode.
#[derive(Debug, Clone, Error)]
pub enum EpisodeError {
    /// The belief could not absorb the real observation.
    #[error("Belief update failed: {0}")]
    Belief(#[from] BeliefError),

    /// Planning failed.
    #[error("Planning failed: {0}")]
    Search(#[from] SearchError),

    /// Invalid configuration or a domain contract violation.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The episode already ended.
    #[error("Episode already finished after {steps} steps")]
    Terminated { steps: usize },
}
