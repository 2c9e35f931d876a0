//! Particle beliefs and the rejection-sampling update.
//!
//! A particle set approximates a belief by a multiset of sampled states,
//! each carrying weight `1/N`:
//!
//! ```text
//!   parents ──sample──▶ s ──generate(s, a)──▶ (s', o')
//!                                              │
//!                              o' == o ? ──yes─┴─▶ accept s'
//!                                    └──no──▶ reject, retry
//! ```
//!
//! The loop is bounded by `max_rejection_attempts` generate calls. Slots
//! still empty afterwards are refilled from the domain's reinvigoration
//! states that can explain the observation, or the update fails.

use std::fmt::Debug;
use std::hash::Hash;

use pomdp_core::{BeliefConfig, Domain};
use rand::Rng;
use tracing::{debug, warn};

use crate::error::BeliefError;
use crate::histogram::Histogram;

/// An ordered multiset of sampled states.
///
/// Invariant: never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Particles<S> {
    states: Vec<S>,
}

impl<S: Clone + Eq + Hash> Particles<S> {
    /// Wrap an explicit particle list.
    pub fn from_states(states: Vec<S>) -> Result<Self, BeliefError> {
        if states.is_empty() {
            return Err(BeliefError::EmptyBelief);
        }
        Ok(Self { states })
    }

    /// Draw `n` particles from an exact belief.
    pub fn from_histogram<R: Rng + ?Sized>(
        histogram: &Histogram<S>,
        n: usize,
        rng: &mut R,
    ) -> Result<Self, BeliefError> {
        if n == 0 {
            return Err(BeliefError::EmptyBelief);
        }
        let states = (0..n).map(|_| histogram.sample(rng)).collect();
        Ok(Self { states })
    }

    /// Uniform draw among the stored particles.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> S {
        self.states[rng.random_range(0..self.states.len())].clone()
    }

    /// Number of particles (`N`).
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &S> {
        self.states.iter()
    }

    /// Fraction of particles equal to `state`.
    pub fn probability(&self, state: &S) -> f64 {
        let count = self.states.iter().filter(|s| *s == state).count();
        count as f64 / self.states.len() as f64
    }

    /// Collapse to an exact belief by counting occurrences.
    pub fn to_histogram(&self) -> Result<Histogram<S>, BeliefError> {
        Histogram::from_counts(self.states.iter())
    }

    /// Rejection-sampling update after `action` produced `observation`.
    ///
    /// The result always holds exactly `config.num_particles` particles.
    ///
    /// # Errors
    ///
    /// - [`BeliefError::Core`] if `config` is invalid
    /// - [`BeliefError::ParticleDepletion`] if the set cannot be refilled
    pub fn update<D, R>(
        &self,
        domain: &D,
        action: &D::Action,
        observation: &D::Observation,
        config: &BeliefConfig,
        rng: &mut R,
    ) -> Result<Self, BeliefError>
    where
        D: Domain<State = S>,
        R: Rng + ?Sized,
        S: Debug,
    {
        config.validate()?;
        let required = config.num_particles;

        let mut accepted = Vec::with_capacity(required);
        let mut attempts = 0;
        while accepted.len() < required && attempts < config.max_rejection_attempts {
            attempts += 1;
            let parent = self.sample(rng);
            let t = domain.generate(&parent, action, rng);
            if t.observation == *observation {
                accepted.push(t.next_state);
            }
        }

        if accepted.len() < required {
            let missing = required - accepted.len();
            if !config.reinvigorate {
                return Err(BeliefError::ParticleDepletion {
                    accepted: accepted.len(),
                    required,
                    attempts,
                });
            }

            let fallback: Vec<S> = domain
                .reinvigoration_states()
                .into_iter()
                .filter(|s| domain.observation_probability(observation, s, action) > 0.0)
                .collect();
            if fallback.is_empty() {
                return Err(BeliefError::ParticleDepletion {
                    accepted: accepted.len(),
                    required,
                    attempts,
                });
            }

            warn!(
                accepted = accepted.len(),
                missing,
                fallback = fallback.len(),
                "reinvigorating particle belief"
            );
            for _ in 0..missing {
                accepted.push(fallback[rng.random_range(0..fallback.len())].clone());
            }
        }

        debug!(particles = accepted.len(), attempts, "particle belief updated");
        Ok(Self { states: accepted })
    }
}
