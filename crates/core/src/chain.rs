//! A partially observable chain.
//!
//! States: 0, 1, ..., n-1. The agent only perceives whether it stands at one
//! of the two ends or somewhere in the corridor between them.
//!
//! ```text
//!   obs:  LeftEnd  Corridor  Corridor  ...  RightEnd
//!         [ 0 ] ── [ 1 ] ── [ 2 ] ── ... ── [n-1]  (goal, terminal)
//! ```
//!
//! Actions: Left, Right. With probability `slip_prob` the agent moves in the
//! opposite direction. Moving past an end leaves the agent in place.
//! Reaching `n-1` pays `goal_reward`; every other step costs `step_penalty`.

use rand::Rng;

use crate::domain::{Domain, Transition};

/// Chain actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainAction {
    Left,
    Right,
}

impl ChainAction {
    fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// What the agent perceives about its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChainObs {
    LeftEnd,
    Corridor,
    RightEnd,
}

/// A chain POMDP with slip noise.
#[derive(Debug, Clone)]
pub struct Chain {
    /// Number of states
    pub num_states: usize,
    /// Probability of moving opposite to the intended direction
    pub slip_prob: f64,
    /// Reward for reaching the right end
    pub goal_reward: f64,
    /// Cost of every other step
    pub step_penalty: f64,
    actions: [ChainAction; 2],
}

impl Chain {
    /// Create a noiseless chain with `num_states` states.
    pub fn new(num_states: usize) -> Self {
        assert!(num_states >= 2, "A chain needs at least 2 states");
        Self {
            num_states,
            slip_prob: 0.0,
            goal_reward: 10.0,
            step_penalty: 1.0,
            actions: [ChainAction::Left, ChainAction::Right],
        }
    }

    /// Set slip probability, clamped to `[0, 1]`.
    pub fn with_slip(mut self, slip_prob: f64) -> Self {
        self.slip_prob = if slip_prob.is_nan() {
            0.0
        } else {
            slip_prob.clamp(0.0, 1.0)
        };
        self
    }

    /// Set rewards.
    pub fn with_rewards(mut self, goal_reward: f64, step_penalty: f64) -> Self {
        self.goal_reward = goal_reward;
        self.step_penalty = step_penalty;
        self
    }

    /// The right end of the chain.
    pub fn goal(&self) -> usize {
        self.num_states - 1
    }

    /// Deterministic observation of a state.
    pub fn observe(&self, state: usize) -> ChainObs {
        if state == 0 {
            ChainObs::LeftEnd
        } else if state == self.goal() {
            ChainObs::RightEnd
        } else {
            ChainObs::Corridor
        }
    }

    fn shift(&self, state: usize, direction: ChainAction) -> usize {
        match direction {
            ChainAction::Left => state.saturating_sub(1),
            ChainAction::Right => (state + 1).min(self.goal()),
        }
    }
}

impl Domain for Chain {
    type State = usize;
    type Action = ChainAction;
    type Observation = ChainObs;

    fn actions(&self) -> &[ChainAction] {
        &self.actions
    }

    fn generate<R: Rng + ?Sized>(
        &self,
        state: &usize,
        action: &ChainAction,
        rng: &mut R,
    ) -> Transition<usize, ChainObs> {
        let direction = if rng.random::<f64>() < self.slip_prob {
            action.opposite()
        } else {
            *action
        };

        let next_state = self.shift(*state, direction);
        let reward = if next_state == self.goal() {
            self.goal_reward
        } else {
            -self.step_penalty
        };

        Transition {
            next_state,
            observation: self.observe(next_state),
            reward,
        }
    }

    fn transition_outcomes(&self, state: &usize, action: &ChainAction) -> Vec<(usize, f64)> {
        [
            (self.shift(*state, *action), 1.0 - self.slip_prob),
            (self.shift(*state, action.opposite()), self.slip_prob),
        ]
        .into_iter()
        .filter(|(_, p)| *p > 0.0)
        .collect()
    }

    fn observation_probability(
        &self,
        observation: &ChainObs,
        next_state: &usize,
        _action: &ChainAction,
    ) -> f64 {
        if self.observe(*next_state) == *observation {
            1.0
        } else {
            0.0
        }
    }

    fn is_terminal(&self, state: &usize) -> bool {
        *state == self.goal()
    }

    fn preferred_actions(&self, _state: &usize) -> Vec<ChainAction> {
        vec![ChainAction::Right]
    }

    fn reinvigoration_states(&self) -> Vec<usize> {
        (0..self.num_states).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    #[test]
    fn test_chain_noiseless_walk() {
        let chain = Chain::new(5);
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        let mut state = 0;

        // Move right until terminal
        while !chain.is_terminal(&state) {
            let t = chain.generate(&state, &ChainAction::Right, &mut rng);
            state = t.next_state;
        }

        assert_eq!(state, 4);
    }

    #[test]
    fn test_chain_observations() {
        let chain = Chain::new(4);
        assert_eq!(chain.observe(0), ChainObs::LeftEnd);
        assert_eq!(chain.observe(1), ChainObs::Corridor);
        assert_eq!(chain.observe(2), ChainObs::Corridor);
        assert_eq!(chain.observe(3), ChainObs::RightEnd);
    }

    #[test]
    fn test_chain_rewards() {
        let chain = Chain::new(3).with_rewards(5.0, 0.5);
        let mut rng = ChaCha20Rng::seed_from_u64(1);

        let t = chain.generate(&1, &ChainAction::Right, &mut rng);
        assert_eq!(t.next_state, 2);
        assert_eq!(t.reward, 5.0);

        let t = chain.generate(&1, &ChainAction::Left, &mut rng);
        assert_eq!(t.next_state, 0);
        assert_eq!(t.reward, -0.5);
    }

    #[test]
    fn test_chain_slip_clamped() {
        let chain = Chain::new(4).with_slip(1.7);
        let outcomes = chain.transition_outcomes(&1, &ChainAction::Right);
        assert_eq!(crate::domain::transition_probability(&chain, &1, &ChainAction::Right, &0), 1.0);
        assert_eq!(outcomes.iter().map(|(_, p)| p).sum::<f64>(), 1.0);

        let chain = Chain::new(4).with_slip(-0.4);
        assert_eq!(crate::domain::transition_probability(&chain, &1, &ChainAction::Right, &2), 1.0);
    }

    #[test]
    fn test_chain_outcomes_sum_to_one() {
        let chain = Chain::new(6).with_slip(0.25);
        for state in 0..6 {
            for action in chain.actions() {
                let total: f64 = chain
                    .transition_outcomes(&state, action)
                    .iter()
                    .map(|(_, p)| p)
                    .sum();
                assert!((total - 1.0).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_chain_slip_frequency() {
        let chain = Chain::new(10).with_slip(0.3);
        let mut rng = ChaCha20Rng::seed_from_u64(99);

        let slips = (0..2000)
            .filter(|_| chain.generate(&5, &ChainAction::Right, &mut rng).next_state == 4)
            .count();

        let rate = slips as f64 / 2000.0;
        assert!((rate - 0.3).abs() < 0.05, "slip rate {}", rate);
    }
}
