//! Domain models: the generative plug-in every problem instance supplies.
//!
//! A domain describes a POMDP without ever handing the solver a transition
//! matrix. The planner only needs to *sample* from it; the exact belief
//! updater additionally needs the successor distribution and the
//! observation likelihood.
//!
//! # Generative Design
//!
//! ```text
//!          ┌──────────┐
//!   Act ──▶│          │──▶ State'
//!          │  Domain  │──▶ Obs
//! State ──▶│          │──▶ Reward
//!          └──────────┘
//!               ▲
//!              rng
//! ```
//!
//! All randomness comes from the injected `rng`, so a seeded generator
//! reproduces a trajectory exactly.

use std::collections::hash_map::DefaultHasher;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};

use rand::Rng;

use crate::error::CoreError;

/// One sampled outcome of `(state, action)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Transition<State, Obs> {
    /// State after the action
    pub next_state: State,
    /// Observation emitted by the post-transition state
    pub observation: Obs,
    /// Reward for this single transition
    pub reward: f64,
}

/// A POMDP domain model.
///
/// The planner is generic over this trait and never over a concrete domain.
/// Implementations must be pure: the same `(state, action, rng state)`
/// always yields the same [`Transition`].
pub trait Domain {
    /// Hidden state.
    type State: Clone + Eq + Hash + Debug;
    /// Action, used as a search-tree edge label.
    type Action: Clone + Eq + Hash + Debug;
    /// Observation, used as a search-tree edge label and belief-update key.
    type Observation: Clone + Eq + Hash + Debug;

    /// The action set in its declared order.
    ///
    /// The order is significant: ties between equally valued actions are
    /// broken in favor of the first one listed here.
    fn actions(&self) -> &[Self::Action];

    /// Sample one outcome of taking `action` in `state`.
    fn generate<R: Rng + ?Sized>(
        &self,
        state: &Self::State,
        action: &Self::Action,
        rng: &mut R,
    ) -> Transition<Self::State, Self::Observation>;

    /// Explicit successor distribution `T(state, action, ·)`.
    ///
    /// Entries may repeat a state; their probabilities add. Only the exact
    /// histogram updater calls this.
    fn transition_outcomes(
        &self,
        state: &Self::State,
        action: &Self::Action,
    ) -> Vec<(Self::State, f64)>;

    /// `P(observation | next_state, action)`.
    fn observation_probability(
        &self,
        observation: &Self::Observation,
        next_state: &Self::State,
        action: &Self::Action,
    ) -> f64;

    /// Whether `state` ends the episode.
    fn is_terminal(&self, state: &Self::State) -> bool;

    /// Actions a rollout should favor in `state` (an action prior).
    ///
    /// Empty means "no preference".
    fn preferred_actions(&self, _state: &Self::State) -> Vec<Self::Action> {
        Vec::new()
    }

    /// Fallback support used to reinvigorate a depleted particle set.
    ///
    /// Empty means the domain offers no reinvigoration source.
    fn reinvigoration_states(&self) -> Vec<Self::State> {
        Vec::new()
    }
}

/// Reject an action that is not part of the domain's declared action set.
pub fn check_action<D: Domain>(domain: &D, action: &D::Action) -> Result<(), CoreError> {
    if domain.actions().contains(action) {
        Ok(())
    } else {
        Err(CoreError::contract(format!(
            "action {:?} is not in the declared action set {:?}",
            action,
            domain.actions()
        )))
    }
}

/// Reject an observation whose copies do not compare or hash equal.
///
/// Observations key the belief update and the search tree; a value that is
/// not equal to its own clone would silently fork the tree.
pub fn check_observation<O: Clone + Eq + Hash + Debug>(observation: &O) -> Result<(), CoreError> {
    let copy = observation.clone();
    if copy != *observation {
        return Err(CoreError::contract(format!(
            "observation {:?} is not equal to its clone",
            observation
        )));
    }
    if hash_of(&copy) != hash_of(observation) {
        return Err(CoreError::contract(format!(
            "observation {:?} hashes differently from its clone",
            observation
        )));
    }
    Ok(())
}

fn hash_of<T: Hash>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Total probability `T(state, action, next_state)`, summing repeated entries.
pub fn transition_probability<D: Domain>(
    domain: &D,
    state: &D::State,
    action: &D::Action,
    next_state: &D::State,
) -> f64 {
    domain
        .transition_outcomes(state, action)
        .iter()
        .filter(|(s, _)| s == next_state)
        .map(|(_, p)| p)
        .sum()
}
