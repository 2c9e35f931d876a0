//! The belief a planner searches from: exact or particle-based.

use std::fmt::Debug;
use std::hash::Hash;

use pomdp_core::{BeliefConfig, Domain};
use rand::Rng;

use crate::error::BeliefError;
use crate::histogram::Histogram;
use crate::particles::Particles;

/// A belief over hidden states.
///
/// Beliefs are replaced on every update, never mutated in place.
#[derive(Debug, Clone)]
pub enum Belief<S> {
    /// Exact distribution, updated by Bayes' rule.
    Histogram(Histogram<S>),
    /// Sampled approximation, updated by rejection sampling.
    Particles(Particles<S>),
}

impl<S: Clone + Eq + Hash + Debug> Belief<S> {
    /// Certainty about `state` (the default prior).
    pub fn point(state: S) -> Self {
        Belief::Histogram(Histogram::point(state))
    }

    /// An arbitrary caller-supplied prior.
    pub fn from_histogram(histogram: Histogram<S>) -> Self {
        Belief::Histogram(histogram)
    }

    /// Convert a prior into `config.num_particles` particles.
    pub fn particles_from<R: Rng + ?Sized>(
        histogram: &Histogram<S>,
        config: &BeliefConfig,
        rng: &mut R,
    ) -> Result<Self, BeliefError> {
        config.validate()?;
        Ok(Belief::Particles(Particles::from_histogram(
            histogram,
            config.num_particles,
            rng,
        )?))
    }

    /// Draw one hidden state.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> S {
        match self {
            Belief::Histogram(h) => h.sample(rng),
            Belief::Particles(p) => p.sample(rng),
        }
    }

    /// Produce the posterior after `action` and `observation`.
    ///
    /// `config` and `rng` are only consulted by particle beliefs.
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
    {
        match self {
            Belief::Histogram(h) => Ok(Belief::Histogram(h.update(domain, action, observation)?)),
            Belief::Particles(p) => Ok(Belief::Particles(
                p.update(domain, action, observation, config, rng)?,
            )),
        }
    }

    /// Support size for histograms, particle count for particle sets.
    pub fn size(&self) -> usize {
        match self {
            Belief::Histogram(h) => h.support_size(),
            Belief::Particles(p) => p.len(),
        }
    }

    /// Exact probability, or particle frequency.
    pub fn probability(&self, state: &S) -> f64 {
        match self {
            Belief::Histogram(h) => h.prob(state),
            Belief::Particles(p) => p.probability(state),
        }
    }

    pub fn to_histogram(&self) -> Result<Histogram<S>, BeliefError> {
        match self {
            Belief::Histogram(h) => Ok(h.clone()),
            Belief::Particles(p) => p.to_histogram(),
        }
    }

    pub fn is_particles(&self) -> bool {
        matches!(self, Belief::Particles(_))
    }
}

impl<S> From<Histogram<S>> for Belief<S> {
    fn from(h: Histogram<S>) -> Self {
        Belief::Histogram(h)
    }
}

impl<S> From<Particles<S>> for Belief<S> {
    fn from(p: Particles<S>) -> Self {
        Belief::Particles(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomdp_core::{Chain, ChainAction, ChainObs};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_point_belief() {
        let b = Belief::point(3usize);
        assert_eq!(b.size(), 1);
        assert_eq!(b.probability(&3), 1.0);

        let mut rng = ChaCha20Rng::seed_from_u64(0);
        assert_eq!(b.sample(&mut rng), 3);
    }

    #[test]
    fn test_particles_from_prior() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let prior = Histogram::uniform(vec![0usize, 1]).unwrap();
        let config = BeliefConfig::default().with_num_particles(30);

        let b = Belief::particles_from(&prior, &config, &mut rng).unwrap();
        assert!(b.is_particles());
        assert_eq!(b.size(), 30);
        let total = b.probability(&0) + b.probability(&1);
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_update_dispatches_by_representation() {
        let mut rng = ChaCha20Rng::seed_from_u64(11);
        let chain = Chain::new(5);
        let config = BeliefConfig::default().with_num_particles(8);

        let exact = Belief::point(1usize)
            .update(&chain, &ChainAction::Left, &ChainObs::LeftEnd, &config, &mut rng)
            .unwrap();
        assert_eq!(exact.probability(&0), 1.0);
        assert!(!exact.is_particles());

        let sampled: Belief<usize> = Particles::from_states(vec![1usize, 1]).unwrap().into();
        let sampled = sampled
            .update(&chain, &ChainAction::Left, &ChainObs::LeftEnd, &config, &mut rng)
            .unwrap();
        assert_eq!(sampled.size(), 8);
        assert_eq!(sampled.probability(&0), 1.0);
    }
}
