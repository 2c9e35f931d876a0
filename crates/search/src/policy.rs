//! Rollout policies: what to do beyond the tree frontier.
//!
//! A rollout policy picks actions for simulated steps that the tree does not
//! cover yet. It is a swappable strategy: same domain, different policy =
//! different value estimates at new leaves.
//!
//! ```text
//!          ┌──────────────────┐
//!  State ─▶│  RolloutPolicy   │─▶ Act
//!          └──────────────────┘
//! ```

use std::marker::PhantomData;

use pomdp_core::{CoreError, Domain};
use rand::Rng;

/// Chooses an action for a rollout step.
///
/// Implementations must only return actions from `domain.actions()`; the
/// planner treats anything else as a contract violation.
pub trait RolloutPolicy<D: Domain> {
    fn choose_action<R: Rng + ?Sized>(&self, domain: &D, state: &D::State, rng: &mut R)
        -> D::Action;
}

// ============================================================================
// Uniform
// ============================================================================

/// Uniform random choice over the declared action set.
#[derive(Debug, Clone, Copy, Default)]
pub struct UniformRollout;

impl<D: Domain> RolloutPolicy<D> for UniformRollout {
    fn choose_action<R: Rng + ?Sized>(&self, domain: &D, _state: &D::State, rng: &mut R) -> D::Action {
        uniform(domain.actions(), rng)
    }
}

fn uniform<A: Clone, R: Rng + ?Sized>(actions: &[A], rng: &mut R) -> A {
    actions[rng.random_range(0..actions.len())].clone()
}

// ============================================================================
// Preferred
// ============================================================================

/// Follows the domain's action prior.
///
/// With probability `probability` the action is drawn uniformly from
/// `domain.preferred_actions(state)`; otherwise (or when the domain has no
/// preference in `state`) it is drawn from the full action set.
#[derive(Debug, Clone, Copy)]
pub struct PreferredRollout {
    probability: f64,
}

impl PreferredRollout {
    /// Create a preferred-action rollout.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidConfig`] if `probability` is outside `[0, 1]`.
    pub fn new(probability: f64) -> Result<Self, CoreError> {
        if !(0.0..=1.0).contains(&probability) {
            return Err(CoreError::invalid(
                "preference_probability",
                format!("{probability} outside [0, 1]"),
            ));
        }
        Ok(Self { probability })
    }

    pub fn probability(&self) -> f64 {
        self.probability
    }
}

impl Default for PreferredRollout {
    fn default() -> Self {
        Self { probability: 0.8 }
    }
}

impl<D: Domain> RolloutPolicy<D> for PreferredRollout {
    fn choose_action<R: Rng + ?Sized>(&self, domain: &D, state: &D::State, rng: &mut R) -> D::Action {
        if rng.random::<f64>() < self.probability {
            let preferred = domain.preferred_actions(state);
            if !preferred.is_empty() {
                return uniform(&preferred, rng);
            }
        }
        uniform(domain.actions(), rng)
    }
}

// ============================================================================
// Function
// ============================================================================

/// A deterministic rollout policy from a closure.
pub struct FnRollout<F, D> {
    f: F,
    _phantom: PhantomData<fn(&D)>,
}

impl<F, D> FnRollout<F, D> {
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: PhantomData,
        }
    }
}

impl<F, D> RolloutPolicy<D> for FnRollout<F, D>
where
    D: Domain,
    F: Fn(&D, &D::State) -> D::Action,
{
    fn choose_action<R: Rng + ?Sized>(&self, domain: &D, state: &D::State, _rng: &mut R) -> D::Action {
        (self.f)(domain, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pomdp_core::{Chain, ChainAction};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_uniform_covers_actions() {
        let chain = Chain::new(4);
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let picks: Vec<ChainAction> = (0..100)
            .map(|_| UniformRollout.choose_action(&chain, &1, &mut rng))
            .collect();
        assert!(picks.contains(&ChainAction::Left));
        assert!(picks.contains(&ChainAction::Right));
    }

    #[test]
    fn test_preferred_always() {
        let chain = Chain::new(4);
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let policy = PreferredRollout::new(1.0).unwrap();
        for _ in 0..50 {
            assert_eq!(policy.choose_action(&chain, &1, &mut rng), ChainAction::Right);
        }
    }

    #[test]
    fn test_preferred_rejects_bad_probability() {
        for p in [1.5, -0.1, f64::NAN] {
            assert!(matches!(
                PreferredRollout::new(p),
                Err(CoreError::InvalidConfig {
                    field: "preference_probability",
                    ..
                })
            ));
        }
        assert_eq!(PreferredRollout::default().probability(), 0.8);
    }

    #[test]
    fn test_fn_rollout() {
        let chain = Chain::new(4);
        let mut rng = ChaCha20Rng::seed_from_u64(3);
        let policy = FnRollout::new(|_: &Chain, s: &usize| {
            if *s == 0 {
                ChainAction::Right
            } else {
                ChainAction::Left
            }
        });
        assert_eq!(policy.choose_action(&chain, &0, &mut rng), ChainAction::Right);
        assert_eq!(policy.choose_action(&chain, &2, &mut rng), ChainAction::Left);
    }
}
