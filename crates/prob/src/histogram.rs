//! Exact beliefs: probability distributions over a finite set of states.

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use pomdp_core::Domain;
use rand::Rng;
use tracing::debug;

use crate::error::BeliefError;
use crate::PROB_TOLERANCE;

/// A probability distribution over hidden states.
///
/// Invariants:
/// - All probabilities are non-negative
/// - Probabilities sum to 1 (within tolerance)
/// - Enumeration order is the order in which states were first inserted
///
/// # Example
///
/// ```rust
/// use pomdp_prob::Histogram;
///
/// // Point mass (certain outcome)
/// let certain = Histogram::point("start");
/// assert_eq!(certain.prob(&"start"), 1.0);
///
/// // Unnormalized weights
/// let h = Histogram::from_weights(vec![("a", 1.0), ("b", 3.0)]).unwrap();
/// assert!((h.prob(&"b") - 0.75).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct Histogram<S> {
    /// `(state, probability)` in enumeration order
    entries: Vec<(S, f64)>,
    /// State → position in `entries`
    index: HashMap<S, usize>,
}

impl<S: Clone + Eq + Hash> Histogram<S> {
    /// Create a histogram from `(state, probability)` pairs.
    ///
    /// Repeated states have their probabilities added.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - There are no pairs
    /// - Any probability is negative
    /// - The probabilities don't sum to 1 (within tolerance)
    pub fn new(pairs: impl IntoIterator<Item = (S, f64)>) -> Result<Self, BeliefError> {
        let hist = Self::collect(pairs)?;

        let sum = hist.total();
        if (sum - 1.0).abs() > PROB_TOLERANCE {
            return Err(BeliefError::NotNormalized { sum });
        }

        Ok(hist)
    }

    /// Create a histogram from unnormalized weights.
    ///
    /// The weights will be normalized to sum to 1.
    pub fn from_weights(pairs: impl IntoIterator<Item = (S, f64)>) -> Result<Self, BeliefError> {
        let mut hist = Self::collect(pairs)?;

        let sum = hist.total();
        if sum <= 0.0 {
            return Err(BeliefError::ZeroWeights);
        }

        for (_, p) in hist.entries.iter_mut() {
            *p /= sum;
        }
        Ok(hist)
    }

    /// A point mass (Dirac delta) on `state`.
    pub fn point(state: S) -> Self {
        let mut index = HashMap::new();
        index.insert(state.clone(), 0);
        Self {
            entries: vec![(state, 1.0)],
            index,
        }
    }

    /// A uniform distribution over `states`.
    ///
    /// A state listed twice gets twice the weight.
    pub fn uniform(states: impl IntoIterator<Item = S>) -> Result<Self, BeliefError> {
        Self::from_weights(states.into_iter().map(|s| (s, 1.0)))
    }

    /// Build a histogram from occurrence counts (used for particle sets).
    pub(crate) fn from_counts<'a>(states: impl IntoIterator<Item = &'a S>) -> Result<Self, BeliefError>
    where
        S: 'a,
    {
        Self::from_weights(states.into_iter().map(|s| (s.clone(), 1.0)))
    }

    fn collect(pairs: impl IntoIterator<Item = (S, f64)>) -> Result<Self, BeliefError> {
        let mut entries: Vec<(S, f64)> = Vec::new();
        let mut index: HashMap<S, usize> = HashMap::new();

        for (state, p) in pairs {
            if p < 0.0 || p.is_nan() {
                return Err(BeliefError::NegativeProbability);
            }
            match index.get(&state) {
                Some(&i) => entries[i].1 += p,
                None => {
                    index.insert(state.clone(), entries.len());
                    entries.push((state, p));
                }
            }
        }

        if entries.is_empty() {
            return Err(BeliefError::EmptyBelief);
        }
        Ok(Self { entries, index })
    }

    /// Probability of `state` (zero outside the histogram).
    pub fn prob(&self, state: &S) -> f64 {
        self.index
            .get(state)
            .map(|&i| self.entries[i].1)
            .unwrap_or(0.0)
    }

    /// `(state, probability)` pairs in enumeration order.
    pub fn iter(&self) -> impl Iterator<Item = (&S, f64)> {
        self.entries.iter().map(|(s, p)| (s, *p))
    }

    /// Number of enumerated states (including zero-probability ones).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false for a constructed histogram.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all probabilities.
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    /// The number of states with non-zero probability.
    pub fn support_size(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, p)| *p > PROB_TOLERANCE)
            .count()
    }

    /// The states with non-zero probability.
    pub fn support(&self) -> Vec<&S> {
        self.entries
            .iter()
            .filter(|(_, p)| *p > PROB_TOLERANCE)
            .map(|(s, _)| s)
            .collect()
    }

    /// Shannon entropy (natural logarithm).
    pub fn entropy(&self) -> f64 {
        self.entries
            .iter()
            .filter(|(_, p)| *p > PROB_TOLERANCE)
            .map(|(_, p)| -p * p.ln())
            .sum()
    }

    /// The most likely state. Returns the first one if there are ties.
    pub fn mode(&self) -> &S {
        let mut best = &self.entries[0];
        for entry in &self.entries[1..] {
            if entry.1 > best.1 {
                best = entry;
            }
        }
        &best.0
    }

    /// Total variation distance `0.5 * Σ |p(s) - q(s)|` over the union of supports.
    pub fn tv_distance(&self, other: &Histogram<S>) -> f64 {
        let mut sum: f64 = self
            .entries
            .iter()
            .map(|(s, p)| (p - other.prob(s)).abs())
            .sum();
        sum += other
            .entries
            .iter()
            .filter(|(s, _)| !self.index.contains_key(s))
            .map(|(_, q)| q)
            .sum::<f64>();
        sum / 2.0
    }

    /// Inverse-CDF sampling with a uniform value `u` in `[0, 1)`.
    pub fn sample_with(&self, u: f64) -> &S {
        let mut cumsum = 0.0;
        for (state, p) in &self.entries {
            cumsum += p;
            if u < cumsum {
                return state;
            }
        }
        // Edge case: u close to 1.0 and floating point drift
        self.entries
            .iter()
            .rev()
            .find(|(_, p)| *p > 0.0)
            .map(|(s, _)| s)
            .unwrap_or(&self.entries[self.entries.len() - 1].0)
    }

    /// Draw one state.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> S {
        self.sample_with(rng.random::<f64>()).clone()
    }

    /// Exact Bayesian update after taking `action` and receiving `observation`.
    ///
    /// `posterior(s') ∝ Σₛ prior(s) · T(s, action, s') · O(observation | s', action)`
    ///
    /// # Errors
    ///
    /// [`BeliefError::ModelInconsistency`] if no state in the prior's support
    /// can produce `observation`. The prior is never silently replaced.
    pub fn update<D>(
        &self,
        domain: &D,
        action: &D::Action,
        observation: &D::Observation,
    ) -> Result<Self, BeliefError>
    where
        D: Domain<State = S>,
        S: Debug,
    {
        let mut entries: Vec<(S, f64)> = Vec::new();
        let mut index: HashMap<S, usize> = HashMap::new();

        for (state, prior) in &self.entries {
            if *prior <= 0.0 {
                continue;
            }
            for (next_state, t) in domain.transition_outcomes(state, action) {
                if t <= 0.0 {
                    continue;
                }
                let o = domain.observation_probability(observation, &next_state, action);
                let mass = prior * t * o;
                if mass <= 0.0 {
                    continue;
                }
                match index.get(&next_state) {
                    Some(&i) => entries[i].1 += mass,
                    None => {
                        index.insert(next_state.clone(), entries.len());
                        entries.push((next_state, mass));
                    }
                }
            }
        }

        let evidence: f64 = entries.iter().map(|(_, p)| p).sum();
        if entries.is_empty() || evidence <= 0.0 {
            return Err(BeliefError::ModelInconsistency {
                action: format!("{:?}", action),
                observation: format!("{:?}", observation),
            });
        }

        for (_, p) in entries.iter_mut() {
            *p /= evidence;
        }

        debug!(
            support = entries.len(),
            evidence, "histogram belief updated"
        );
        Ok(Self { entries, index })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomdp_core::{Chain, ChainAction, ChainObs};

    #[test]
    fn test_new_valid() {
        let h = Histogram::new(vec![('a', 0.3), ('b', 0.7)]).unwrap();
        assert_eq!(h.len(), 2);
        assert!((h.prob(&'a') - 0.3).abs() < 1e-12);
        assert_eq!(h.prob(&'z'), 0.0);
    }

    #[test]
    fn test_new_not_normalized() {
        let result = Histogram::new(vec![('a', 0.3), ('b', 0.6)]);
        assert!(matches!(result, Err(BeliefError::NotNormalized { .. })));
    }

    #[test]
    fn test_new_negative() {
        let result = Histogram::new(vec![('a', -0.5), ('b', 1.5)]);
        assert!(matches!(result, Err(BeliefError::NegativeProbability)));
    }

    #[test]
    fn test_new_empty() {
        let result = Histogram::<char>::new(Vec::new());
        assert!(matches!(result, Err(BeliefError::EmptyBelief)));
    }

    #[test]
    fn test_duplicates_merge() {
        let h = Histogram::from_weights(vec![(1, 1.0), (2, 1.0), (1, 2.0)]).unwrap();
        assert_eq!(h.len(), 2);
        assert!((h.prob(&1) - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_from_weights_zero() {
        let result = Histogram::from_weights(vec![(1, 0.0), (2, 0.0)]);
        assert!(matches!(result, Err(BeliefError::ZeroWeights)));
    }

    #[test]
    fn test_uniform_entropy() {
        let h = Histogram::uniform(0..4).unwrap();
        assert!((h.entropy() - 4.0_f64.ln()).abs() < 1e-12);
        assert_eq!(Histogram::point(0).entropy(), 0.0);
    }

    #[test]
    fn test_sample_inverse_cdf() {
        let h = Histogram::new(vec![("x", 0.3), ("y", 0.7)]).unwrap();
        assert_eq!(*h.sample_with(0.0), "x");
        assert_eq!(*h.sample_with(0.29), "x");
        assert_eq!(*h.sample_with(0.31), "y");
        assert_eq!(*h.sample_with(0.999_999), "y");
    }

    #[test]
    fn test_sample_skips_trailing_zero() {
        let h = Histogram::new(vec![("x", 1.0), ("y", 0.0)]).unwrap();
        assert_eq!(*h.sample_with(1.0), "x");
    }

    #[test]
    fn test_mode_first_on_ties() {
        let h = Histogram::new(vec![('a', 0.4), ('b', 0.4), ('c', 0.2)]).unwrap();
        assert_eq!(*h.mode(), 'a');
    }

    #[test]
    fn test_tv_distance() {
        let p = Histogram::new(vec![(0, 0.5), (1, 0.5)]).unwrap();
        let q = Histogram::point(0);
        assert!((p.tv_distance(&q) - 0.5).abs() < 1e-12);

        let r = Histogram::point(7);
        assert!((q.tv_distance(&r) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_update_point_mass_follows_observation() {
        let chain = Chain::new(5).with_slip(0.2);
        let prior = Histogram::point(0usize);

        // Right from 0: success reaches 1 (Corridor), slip stays at 0 (LeftEnd)
        let posterior = prior
            .update(&chain, &ChainAction::Right, &ChainObs::Corridor)
            .unwrap();
        assert_eq!(posterior.len(), 1);
        assert!((posterior.prob(&1) - 1.0).abs() < 1e-12);

        let posterior = prior
            .update(&chain, &ChainAction::Right, &ChainObs::LeftEnd)
            .unwrap();
        assert!((posterior.prob(&0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_update_weights_by_transition() {
        let chain = Chain::new(6).with_slip(0.25);
        let prior = Histogram::point(2usize);

        // Both 1 and 3 are in the corridor: posterior mirrors T
        let posterior = prior
            .update(&chain, &ChainAction::Right, &ChainObs::Corridor)
            .unwrap();
        assert!((posterior.prob(&3) - 0.75).abs() < 1e-12);
        assert!((posterior.prob(&1) - 0.25).abs() < 1e-12);
        assert!((posterior.total() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_update_inconsistent_observation() {
        let chain = Chain::new(6);
        let prior = Histogram::point(2usize);

        let result = prior.update(&chain, &ChainAction::Right, &ChainObs::RightEnd);
        assert!(matches!(
            result,
            Err(BeliefError::ModelInconsistency { .. })
        ));
    }
}
