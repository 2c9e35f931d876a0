//! # Search - Online Monte-Carlo Planning for POMDPs
//!
//! Builds a search tree over action/observation histories and picks actions
//! by UCB1 tree search with rollouts beyond the frontier (POUCT). The tree is
//! reused across planning calls: after every real step the planner moves its
//! root down the committed `(action, observation)` edge.
//!
//! - **tree**: belief nodes, action nodes, the UCB1 and greedy choices
//! - **policy**: rollout strategies (uniform, preferred-action prior, closure)
//! - **planner**: the simulation loop, tree advance and planning diagnostics
//!
//! ## Example
//!
//! ```rust
//! use pomdp_core::{Chain, ChainAction, ChainObs, PlannerConfig};
//! use pomdp_prob::Belief;
//! use pomdp_search::Planner;
//! use rand::SeedableRng;
//!
//! let chain = Chain::new(4);
//! let config = PlannerConfig::default()
//!     .with_num_simulations(300)
//!     .with_exploration_constant(5.0);
//! let mut planner = Planner::uniform(config).unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(1);
//!
//! let action = planner.plan(&chain, &Belief::point(2usize), &mut rng).unwrap();
//! assert_eq!(action, ChainAction::Right);
//!
//! planner.advance(action, ChainObs::RightEnd);
//! assert_eq!(planner.history().len(), 1);
//! ```

mod error;
mod planner;
mod policy;
mod tree;

pub use error::SearchError;
pub use planner::{ActionValue, PlanStats, Planner};
pub use policy::{FnRollout, PreferredRollout, RolloutPolicy, UniformRollout};
pub use tree::{ActionNode, BeliefNode, SearchTree};
