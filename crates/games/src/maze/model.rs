//! The maze POMDP.
//!
//! ```text
//!   intended move   1 - 2p
//!   slip left           p      (perpendiculars: N/S → E, W;  E/W → N, S)
//!   slip right          p
//! ```
//!
//! A move into a wall (or off the grid) leaves the agent where it was.
//! Orientation never changes. The agent observes the walls of the cell it
//! ends up in, its orientation, and whether that cell is the goal or start.
//!
//! Reward per step is exactly one of: `+goal_reward` if the resulting cell
//! is the goal, else `-wall_penalty` if the move collided, else
//! `-step_penalty`. Goal takes precedence over collision.

use pomdp_core::{CoreError, Domain, Transition};
use pomdp_prob::{BeliefError, Histogram};
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::layout::{MazeLayout, MazeMap};
use super::types::{Direction, LocationTag, MazeAction, MazeObservation, MazeState};

// ============================================================================
// Configuration
// ============================================================================

/// Maze dynamics and rewards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MazeConfig {
    /// Probability of slipping to each perpendicular direction, in `[0, 0.5]`
    pub slip_probability: f64,
    /// Paid on reaching the goal
    pub goal_reward: f64,
    /// Charged for every other step
    pub step_penalty: f64,
    /// Charged for bumping into a wall
    pub wall_penalty: f64,
}

impl Default for MazeConfig {
    fn default() -> Self {
        Self {
            slip_probability: 0.1,
            goal_reward: 10.0,
            step_penalty: 1.0,
            wall_penalty: 5.0,
        }
    }
}

impl MazeConfig {
    pub fn with_slip(mut self, slip_probability: f64) -> Self {
        self.slip_probability = slip_probability;
        self
    }

    pub fn with_rewards(mut self, goal_reward: f64, step_penalty: f64, wall_penalty: f64) -> Self {
        self.goal_reward = goal_reward;
        self.step_penalty = step_penalty;
        self.wall_penalty = wall_penalty;
        self
    }

    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if !(0.0..=0.5).contains(&self.slip_probability) {
            return Err(CoreError::invalid(
                "slip_probability",
                format!("must lie in [0, 0.5], got {}", self.slip_probability),
            ));
        }
        for (field, value) in [
            ("goal_reward", self.goal_reward),
            ("step_penalty", self.step_penalty),
            ("wall_penalty", self.wall_penalty),
        ] {
            if !value.is_finite() {
                return Err(CoreError::invalid(field, format!("must be finite, got {}", value)));
            }
        }
        Ok(())
    }
}

// ============================================================================
// Domain
// ============================================================================

/// The maze domain over any [`MazeMap`].
#[derive(Debug, Clone)]
pub struct Maze<M = MazeLayout> {
    map: M,
    config: MazeConfig,
}

impl Maze<MazeLayout> {
    /// The reference maze with default dynamics.
    pub fn example() -> Self {
        Self {
            map: MazeLayout::example(),
            config: MazeConfig::default(),
        }
    }

    /// The agent at the layout's start, facing North.
    pub fn start_state(&self) -> MazeState {
        MazeState::new(self.map.start(), Direction::North)
    }

    /// The default prior: the start cell, uniform over orientations.
    pub fn start_belief(&self) -> Result<Histogram<MazeState>, BeliefError> {
        Histogram::uniform(
            Direction::ALL
                .iter()
                .map(|d| MazeState::new(self.map.start(), *d)),
        )
    }
}

impl<M: MazeMap> Maze<M> {
    /// Create a maze domain.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidConfig`] if `config` is out of range.
    pub fn new(map: M, config: MazeConfig) -> Result<Self, CoreError> {
        config.validate()?;
        Ok(Self { map, config })
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn config(&self) -> &MazeConfig {
        &self.config
    }

    /// The deterministic observation emitted by `state`.
    pub fn observe(&self, state: &MazeState) -> MazeObservation {
        let location = if self.map.is_goal(state.position) {
            Some(LocationTag::Goal)
        } else if self.map.is_start(state.position) {
            Some(LocationTag::Start)
        } else {
            None
        };
        MazeObservation {
            walls: self.map.walls_at(state.position),
            orientation: state.orientation,
            location,
        }
    }

    /// Attempt a move toward `direction`. Returns the new state and whether
    /// the move collided.
    pub fn apply_move(&self, state: &MazeState, direction: Direction) -> (MazeState, bool) {
        let target = state.position.step(direction);
        if self.map.walls_at(state.position).get(direction) || !self.map.contains(target) {
            (*state, true)
        } else {
            (MazeState::new(target, state.orientation), false)
        }
    }

    /// Reward for ending in `next` after a move that did or did not collide.
    pub fn reward(&self, next: &MazeState, collided: bool) -> f64 {
        if self.map.is_goal(next.position) {
            self.config.goal_reward
        } else if collided {
            -self.config.wall_penalty
        } else {
            -self.config.step_penalty
        }
    }

    /// `[(intended, 1-2p), (slip₁, p), (slip₂, p)]`.
    fn move_distribution(&self, action: &MazeAction) -> [(Direction, f64); 3] {
        let p = self.config.slip_probability;
        let intended = action.direction();
        let [left, right] = intended.perpendicular();
        [(intended, 1.0 - 2.0 * p), (left, p), (right, p)]
    }
}

impl<M: MazeMap> Domain for Maze<M> {
    type State = MazeState;
    type Action = MazeAction;
    type Observation = MazeObservation;

    fn actions(&self) -> &[MazeAction] {
        &MazeAction::ALL
    }

    fn generate<R: Rng + ?Sized>(
        &self,
        state: &MazeState,
        action: &MazeAction,
        rng: &mut R,
    ) -> Transition<MazeState, MazeObservation> {
        let u = rng.random::<f64>();
        let mut cumsum = 0.0;
        let mut direction = action.direction();
        for (d, p) in self.move_distribution(action) {
            cumsum += p;
            if u < cumsum {
                direction = d;
                break;
            }
        }

        let (next_state, collided) = self.apply_move(state, direction);
        Transition {
            observation: self.observe(&next_state),
            reward: self.reward(&next_state, collided),
            next_state,
        }
    }

    fn transition_outcomes(&self, state: &MazeState, action: &MazeAction) -> Vec<(MazeState, f64)> {
        self.move_distribution(action)
            .into_iter()
            .filter(|(_, p)| *p > 0.0)
            .map(|(d, p)| (self.apply_move(state, d).0, p))
            .collect()
    }

    fn observation_probability(
        &self,
        observation: &MazeObservation,
        next_state: &MazeState,
        _action: &MazeAction,
    ) -> f64 {
        if self.observe(next_state) == *observation {
            1.0
        } else {
            0.0
        }
    }

    fn is_terminal(&self, state: &MazeState) -> bool {
        self.map.is_goal(state.position)
    }

    /// Moves that are not walled off at the current cell.
    fn preferred_actions(&self, state: &MazeState) -> Vec<MazeAction> {
        let walls = self.map.walls_at(state.position);
        MazeAction::ALL
            .into_iter()
            .filter(|a| !walls.get(a.direction()))
            .collect()
    }

    /// Every cell in every orientation.
    fn reinvigoration_states(&self) -> Vec<MazeState> {
        self.map
            .positions()
            .into_iter()
            .flat_map(|p| Direction::ALL.map(|d| MazeState::new(p, d)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::types::Position;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    fn noiseless() -> Maze {
        Maze::new(MazeLayout::example(), MazeConfig::default().with_slip(0.0)).unwrap()
    }

    #[test]
    fn test_config_validation() {
        assert!(MazeConfig::default().validate().is_ok());
        assert!(MazeConfig::default().with_slip(0.5).validate().is_ok());
        assert!(MazeConfig::default().with_slip(0.6).validate().is_err());
        assert!(MazeConfig::default().with_slip(-0.1).validate().is_err());
        assert!(MazeConfig::default()
            .with_rewards(f64::INFINITY, 1.0, 5.0)
            .validate()
            .is_err());
    }

    #[test]
    fn test_config_from_json() {
        let config = MazeConfig::from_json(r#"{ "slip_probability": 0.2 }"#).unwrap();
        assert_eq!(config.slip_probability, 0.2);
        assert_eq!(config.wall_penalty, 5.0);

        assert!(MazeConfig::from_json(r#"{ "slip_probability": 0.9 }"#).is_err());
    }

    #[test]
    fn test_start_observation() {
        let maze = Maze::example();
        let obs = maze.observe(&maze.start_state());
        assert_eq!(obs.location, Some(LocationTag::Start));
        assert!(obs.looks_like_start());
    }

    #[test]
    fn test_move_north_from_start() {
        let maze = noiseless();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let t = maze.generate(&maze.start_state(), &MazeAction::MoveNorth, &mut rng);

        assert_eq!(t.next_state.position, Position::new(5, 5));
        assert_eq!(t.next_state.orientation, Direction::North);
        assert_eq!(t.reward, -1.0);
        assert_eq!(t.observation.location, None);
    }

    #[test]
    fn test_bump_into_wall() {
        let maze = noiseless();
        let mut rng = ChaCha20Rng::seed_from_u64(0);
        let start = maze.start_state();
        let t = maze.generate(&start, &MazeAction::MoveEast, &mut rng);

        assert_eq!(t.next_state, start);
        assert_eq!(t.reward, -5.0);
    }

    #[test]
    fn test_slip_outcomes() {
        let maze = Maze::example();
        let state = MazeState::new(Position::new(5, 5), Direction::West);
        let outcomes = maze.transition_outcomes(&state, &MazeAction::MoveNorth);

        assert_eq!(outcomes.len(), 3);
        assert!((outcomes[0].1 - 0.8).abs() < 1e-12);
        assert!((outcomes[1].1 - 0.1).abs() < 1e-12);
        assert!((outcomes[2].1 - 0.1).abs() < 1e-12);
        assert!(outcomes.iter().all(|(s, _)| s.orientation == Direction::West));
    }

    #[test]
    fn test_preferred_actions_avoid_walls() {
        let maze = Maze::example();
        let preferred = maze.preferred_actions(&maze.start_state());
        assert_eq!(preferred, vec![MazeAction::MoveNorth, MazeAction::MoveWest]);
    }

    #[test]
    fn test_reinvigoration_covers_grid() {
        let maze = Maze::example();
        assert_eq!(maze.reinvigoration_states().len(), 77 * 4);
    }

    #[test]
    fn test_start_belief_uniform_over_orientations() {
        let maze = Maze::example();
        let prior = maze.start_belief().unwrap();
        assert_eq!(prior.support_size(), 4);
        for d in Direction::ALL {
            let s = MazeState::new(Position::new(5, 6), d);
            assert!((prior.prob(&s) - 0.25).abs() < 1e-12);
        }
    }
}
