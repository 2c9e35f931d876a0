//! Episode: the plan / act / observe / update loop.
//!
//! ```text
//!     ┌────────────┐  action   ┌──────────────┐
//!     │  Planner   │──────────▶│  true state  │  (hidden, simulated)
//!     └────────────┘           └──────────────┘
//!        ▲     ▲                      │ (observation, reward)
//!  belief│     │advance(a, o)         ▼
//!     ┌────────────┐   update   ┌──────────────┐
//!     │   Belief   │◀───────────│  Domain      │
//!     └────────────┘            └──────────────┘
//! ```
//!
//! The loop stops when the true state is terminal or the step budget is
//! spent, whichever comes first. Any belief or planning error halts the
//! episode; nothing is silently reset.

use std::fmt;

use pomdp_core::{check_observation, BeliefConfig, CoreError, Domain, EpisodeConfig};
use pomdp_prob::Belief;
use pomdp_search::{Planner, RolloutPolicy};
use rand::Rng;
use serde::Serialize;
use tracing::{error, info};

use crate::error::EpisodeError;
use crate::telemetry::{NoopObserver, StepEvent, StepObserver};

/// The outcome of a complete episode.
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeReport<S, A, O> {
    pub events: Vec<StepEvent<S, A, O>>,
    pub total_reward: f64,
    /// Rewards discounted by the planner's discount factor
    pub discounted_reward: f64,
    pub reached_terminal: bool,
    pub steps: usize,
}

/// One running episode.
pub struct Episode<D: Domain, P> {
    domain: D,
    planner: Planner<D, P>,
    belief: Belief<D::State>,
    true_state: D::State,
    config: EpisodeConfig,
    belief_config: BeliefConfig,
    steps: usize,
    cumulative_reward: f64,
    discounted_reward: f64,
    discount: f64,
    halted: bool,
}

impl<D, P> Episode<D, P>
where
    D: Domain,
    P: RolloutPolicy<D>,
{
    /// Start an episode from `belief` with hidden state `true_state`.
    ///
    /// Particle beliefs are updated with the default [`BeliefConfig`]; use
    /// [`with_belief_config`](Self::with_belief_config) to change it.
    pub fn new(
        domain: D,
        planner: Planner<D, P>,
        belief: Belief<D::State>,
        true_state: D::State,
        config: EpisodeConfig,
    ) -> Result<Self, EpisodeError> {
        config.validate()?;
        Ok(Self {
            domain,
            planner,
            belief,
            true_state,
            config,
            belief_config: BeliefConfig::default(),
            steps: 0,
            cumulative_reward: 0.0,
            discounted_reward: 0.0,
            discount: 1.0,
            halted: false,
        })
    }

    /// Set the particle update parameters.
    pub fn with_belief_config(mut self, belief_config: BeliefConfig) -> Result<Self, EpisodeError> {
        belief_config.validate()?;
        self.belief_config = belief_config;
        Ok(self)
    }

    pub fn domain(&self) -> &D {
        &self.domain
    }

    pub fn planner(&self) -> &Planner<D, P> {
        &self.planner
    }

    pub fn belief(&self) -> &Belief<D::State> {
        &self.belief
    }

    pub fn true_state(&self) -> &D::State {
        &self.true_state
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn cumulative_reward(&self) -> f64 {
        self.cumulative_reward
    }

    /// Whether the hidden state is terminal.
    pub fn reached_terminal(&self) -> bool {
        self.domain.is_terminal(&self.true_state)
    }

    /// Whether no further step can be taken.
    pub fn is_finished(&self) -> bool {
        self.halted || self.reached_terminal() || self.steps >= self.config.max_steps
    }

    /// Run a single plan/act/observe/update cycle.
    ///
    /// # Errors
    ///
    /// - [`EpisodeError::Terminated`] if the episode is already finished
    /// - any planning or belief error, after which the episode is halted
    pub fn step<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<StepEvent<D::State, D::Action, D::Observation>, EpisodeError> {
        if self.is_finished() {
            return Err(EpisodeError::Terminated { steps: self.steps });
        }

        let result = self.advance(rng);
        if let Err(err) = &result {
            self.halted = true;
            error!(step = self.steps + 1, %err, "episode halted");
        }
        result
    }

    fn advance<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<StepEvent<D::State, D::Action, D::Observation>, EpisodeError> {
        let action = self.planner.plan(&self.domain, &self.belief, rng)?;
        let (sim_count, planning_duration_ms, tree_nodes, root_particles) =
            match self.planner.last_stats() {
                Some(stats) => (
                    stats.simulations,
                    stats.duration.as_secs_f64() * 1000.0,
                    stats.tree_nodes,
                    stats.root_particles,
                ),
                None => {
                    return Err(CoreError::contract("planner produced no statistics").into());
                }
            };

        let t = self.domain.generate(&self.true_state, &action, rng);
        check_observation(&t.observation)?;
        let belief = self.belief.update(
            &self.domain,
            &action,
            &t.observation,
            &self.belief_config,
            rng,
        )?;

        self.cumulative_reward += t.reward;
        self.discounted_reward += self.discount * t.reward;
        self.discount *= self.planner.config().discount_factor;
        self.steps += 1;

        self.belief = belief;
        self.planner.advance(action.clone(), t.observation.clone());
        self.true_state = t.next_state;

        info!(
            step = self.steps,
            action = ?action,
            observation = ?t.observation,
            reward = t.reward,
            cumulative = self.cumulative_reward,
            belief_size = self.belief.size(),
            "step executed"
        );

        Ok(StepEvent {
            step_index: self.steps,
            true_state: self.true_state.clone(),
            action,
            observation: t.observation,
            reward: t.reward,
            cumulative_reward: self.cumulative_reward,
            sim_count,
            planning_duration_ms,
            belief_size: self.belief.size(),
            tree_nodes,
            root_particles,
        })
    }

    /// Run until the episode finishes, reporting each step to `observer`.
    pub fn run<R, Obs>(
        &mut self,
        rng: &mut R,
        observer: &mut Obs,
    ) -> Result<EpisodeReport<D::State, D::Action, D::Observation>, EpisodeError>
    where
        R: Rng + ?Sized,
        Obs: StepObserver<D::State, D::Action, D::Observation> + ?Sized,
    {
        let mut events = Vec::new();
        while !self.is_finished() {
            let event = self.step(rng)?;
            observer.on_step(&event);
            events.push(event);
        }

        let report = EpisodeReport {
            events,
            total_reward: self.cumulative_reward,
            discounted_reward: self.discounted_reward,
            reached_terminal: self.reached_terminal(),
            steps: self.steps,
        };
        info!(
            steps = report.steps,
            total_reward = report.total_reward,
            reached_terminal = report.reached_terminal,
            "episode finished"
        );
        Ok(report)
    }
}

// ============================================================================
// Evaluation
// ============================================================================

/// Statistics over several episodes.
#[derive(Debug, Clone, Serialize)]
pub struct EpisodeStats {
    pub num_episodes: usize,
    pub mean_reward: f64,
    pub std_reward: f64,
    pub mean_length: f64,
    /// Episodes that ended in a terminal state
    pub num_terminal: usize,
}

impl fmt::Display for EpisodeStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Episode Statistics ({} episodes):", self.num_episodes)?;
        writeln!(
            f,
            "  Mean reward: {:.4} ± {:.4}",
            self.mean_reward, self.std_reward
        )?;
        writeln!(f, "  Mean length: {:.2}", self.mean_length)?;
        writeln!(
            f,
            "  Terminal: {}/{} ({:.1}%)",
            self.num_terminal,
            self.num_episodes,
            100.0 * self.num_terminal as f64 / self.num_episodes as f64
        )
    }
}

/// Run `num_episodes` fresh episodes and summarize them.
///
/// `make_episode` receives the episode index.
pub fn evaluate<D, P, R, F>(
    num_episodes: usize,
    mut make_episode: F,
    rng: &mut R,
) -> Result<EpisodeStats, EpisodeError>
where
    D: Domain,
    P: RolloutPolicy<D>,
    R: Rng + ?Sized,
    F: FnMut(usize) -> Result<Episode<D, P>, EpisodeError>,
{
    if num_episodes == 0 {
        return Err(CoreError::invalid("num_episodes", "must be positive").into());
    }

    let mut rewards = Vec::with_capacity(num_episodes);
    let mut lengths = Vec::with_capacity(num_episodes);
    let mut num_terminal = 0;
    for i in 0..num_episodes {
        let mut episode = make_episode(i)?;
        let report = episode.run(rng, &mut NoopObserver)?;
        rewards.push(report.total_reward);
        lengths.push(report.steps as f64);
        if report.reached_terminal {
            num_terminal += 1;
        }
    }

    let n = num_episodes as f64;
    let mean_reward = rewards.iter().sum::<f64>() / n;
    let mean_length = lengths.iter().sum::<f64>() / n;
    let variance = rewards
        .iter()
        .map(|r| (r - mean_reward).powi(2))
        .sum::<f64>()
        / n;

    Ok(EpisodeStats {
        num_episodes,
        mean_reward,
        std_reward: variance.sqrt(),
        mean_length,
        num_terminal,
    })
}
