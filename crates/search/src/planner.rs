//! # Online Planner (POUCT)
//!
//! Monte-Carlo tree search over histories. Each planning call runs up to
//! `num_simulations` simulations from hidden states sampled out of the
//! current belief:
//!
//! ```text
//!   s₀ ~ belief
//!     │
//!     ▼
//!   root ──UCB1──▶ a ──generate──▶ (s', o, r) ──▶ child[a][o]
//!                                                   │
//!                      expanded? ── yes ──▶ recurse │
//!                          └──── no ──▶ expand, rollout, stop
//!
//!   backup:  Q(h,a) += (G - Q(h,a)) / N(h,a)     G = r + γ·future
//! ```
//!
//! The decision is greedy in `Q` at the root. After the real step, the tree
//! is advanced to the subtree for the committed `(action, observation)` so
//! the statistics collected for it survive into the next call.

use std::time::{Duration, Instant};

use pomdp_core::{check_action, CoreError, Domain, History, PlannerConfig};
use pomdp_prob::Belief;
use rand::Rng;
use serde::Serialize;
use tracing::debug;

use crate::error::SearchError;
use crate::policy::{RolloutPolicy, UniformRollout};
use crate::tree::{BeliefNode, SearchTree};

/// Root statistics for one action.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionValue<A> {
    pub action: A,
    pub visits: u64,
    pub value: f64,
}

/// Diagnostics from the most recent planning call.
#[derive(Debug, Clone, Serialize)]
pub struct PlanStats<A> {
    /// Simulations that ran to completion
    pub simulations: usize,
    /// Wall-clock time spent planning
    pub duration: Duration,
    /// Belief nodes in the tree after planning
    pub tree_nodes: usize,
    /// Particles collected at the root
    pub root_particles: usize,
    /// Whether the time budget cut the sweep short
    pub timed_out: bool,
    /// Per-action statistics at the root, in declared order
    pub action_values: Vec<ActionValue<A>>,
}

/// An online POMDP planner.
///
/// Owns the search tree exclusively. Generic over the domain and the rollout
/// policy, never over a concrete domain.
pub struct Planner<D: Domain, P = UniformRollout> {
    config: PlannerConfig,
    policy: P,
    tree: SearchTree<D::State, D::Action, D::Observation>,
    last_stats: Option<PlanStats<D::Action>>,
}

impl<D: Domain> Planner<D, UniformRollout> {
    /// A planner with uniform-random rollouts.
    pub fn uniform(config: PlannerConfig) -> Result<Self, SearchError> {
        Self::new(config, UniformRollout)
    }
}

impl<D, P> Planner<D, P>
where
    D: Domain,
    P: RolloutPolicy<D>,
{
    /// Create a planner.
    ///
    /// # Errors
    ///
    /// [`SearchError::Core`] if `config` is out of range.
    pub fn new(config: PlannerConfig, policy: P) -> Result<Self, SearchError> {
        config.validate()?;
        Ok(Self {
            config,
            policy,
            tree: SearchTree::new(),
            last_stats: None,
        })
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    pub fn tree(&self) -> &SearchTree<D::State, D::Action, D::Observation> {
        &self.tree
    }

    /// The committed `(action, observation)` pairs of the current episode.
    pub fn history(&self) -> &History<D::Action, D::Observation> {
        self.tree.history()
    }

    /// Diagnostics from the most recent [`plan`](Self::plan) call.
    pub fn last_stats(&self) -> Option<&PlanStats<D::Action>> {
        self.last_stats.as_ref()
    }

    /// Choose an action for the current belief.
    ///
    /// Always returns a declared action: if no root action could be visited
    /// (terminal belief, or the time budget expired first) the first declared
    /// action is returned.
    ///
    /// # Errors
    ///
    /// [`SearchError::Core`] if the domain declares no actions or the rollout
    /// policy returns an undeclared action.
    pub fn plan<R: Rng + ?Sized>(
        &mut self,
        domain: &D,
        belief: &Belief<D::State>,
        rng: &mut R,
    ) -> Result<D::Action, SearchError> {
        let actions = domain.actions();
        let Some(first) = actions.first() else {
            return Err(CoreError::contract("domain declares no actions").into());
        };

        let start = Instant::now();
        let budget = self.config.time_budget();

        let root = self.tree.root_mut();
        if !root.is_expanded() {
            root.expand(actions);
        }

        let mut simulations = 0;
        let mut timed_out = false;
        for _ in 0..self.config.num_simulations {
            if budget.is_some_and(|b| start.elapsed() >= b) {
                timed_out = true;
                break;
            }
            let state = belief.sample(rng);
            simulate(domain, &self.policy, &self.config, root, state, 0, rng)?;
            simulations += 1;
        }

        let chosen = match root.greedy() {
            Some(i) => root.actions()[i].action().clone(),
            None => first.clone(),
        };

        let stats = PlanStats {
            simulations,
            duration: start.elapsed(),
            tree_nodes: self.tree.node_count(),
            root_particles: self.tree.root().particles().len(),
            timed_out,
            action_values: self
                .tree
                .root()
                .actions()
                .iter()
                .map(|node| ActionValue {
                    action: node.action().clone(),
                    visits: node.visits(),
                    value: node.value(),
                })
                .collect(),
        };
        debug!(
            simulations,
            tree_nodes = stats.tree_nodes,
            root_particles = stats.root_particles,
            timed_out,
            elapsed_ms = stats.duration.as_secs_f64() * 1000.0,
            action = ?chosen,
            "planning call finished"
        );
        self.last_stats = Some(stats);

        Ok(chosen)
    }

    /// Re-root the tree after the real `(action, observation)` step.
    ///
    /// Returns whether an explored subtree was reused.
    pub fn advance(&mut self, action: D::Action, observation: D::Observation) -> bool {
        let reused = self.tree.advance(action, observation);
        debug!(reused, history = self.tree.history().len(), "tree advanced");
        reused
    }

    /// Discard the tree and the history (new episode).
    pub fn reset(&mut self) {
        self.tree.reset();
        self.last_stats = None;
    }
}

/// One simulation from `node` with hidden state `state` at `depth`.
///
/// Returns the discounted return from this node onward.
fn simulate<D, P, R>(
    domain: &D,
    policy: &P,
    config: &PlannerConfig,
    node: &mut BeliefNode<D::State, D::Action, D::Observation>,
    state: D::State,
    depth: usize,
    rng: &mut R,
) -> Result<f64, SearchError>
where
    D: Domain,
    P: RolloutPolicy<D>,
    R: Rng + ?Sized,
{
    if depth >= config.max_depth || domain.is_terminal(&state) {
        return Ok(0.0);
    }

    let Some(index) = node.ucb_select(config.exploration_constant) else {
        return Err(CoreError::contract("simulation reached an unexpanded node").into());
    };
    let action = node.actions()[index].action().clone();
    let t = domain.generate(&state, &action, rng);

    let child = node.action_mut(index).child_mut(t.observation);
    let future = if child.is_expanded() {
        child.add_particle(t.next_state.clone());
        simulate(domain, policy, config, child, t.next_state, depth + 1, rng)?
    } else {
        child.expand(domain.actions());
        child.add_particle(t.next_state.clone());
        child.record_visit();
        rollout(domain, policy, config, t.next_state, depth + 1, rng)?
    };

    let ret = t.reward + config.discount_factor * future;
    node.action_mut(index).update(ret);
    node.record_visit();
    Ok(ret)
}

/// Discounted return of following `policy` from `state` until the horizon.
fn rollout<D, P, R>(
    domain: &D,
    policy: &P,
    config: &PlannerConfig,
    mut state: D::State,
    mut depth: usize,
    rng: &mut R,
) -> Result<f64, SearchError>
where
    D: Domain,
    P: RolloutPolicy<D>,
    R: Rng + ?Sized,
{
    let mut total = 0.0;
    let mut discount = 1.0;
    while depth < config.max_depth && !domain.is_terminal(&state) {
        let action = policy.choose_action(domain, &state, rng);
        check_action(domain, &action)?;
        let t = domain.generate(&state, &action, rng);
        total += discount * t.reward;
        discount *= config.discount_factor;
        state = t.next_state;
        depth += 1;
    }
    Ok(total)
}
