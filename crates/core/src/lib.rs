//! # Core - Online POMDP Foundations
//!
//! This crate provides the contract every other crate in the workspace is
//! written against:
//!
//! - **Domain**: the generative model `(State, Act) -> (State', Obs, Reward)`
//!   plus the likelihoods the exact belief updater needs
//! - **History**: the `(action, observation)` sequence the planner conditions on
//! - **Config**: explicit planner, belief and episode parameters
//! - **Errors**: invalid configuration and domain contract violations
//! - **Chain**: a small reference domain
//!
//! ## Design Philosophy
//!
//! The solver never sees a transition matrix. Domains are plug-ins that can
//! be *sampled*, and everything random is driven by a caller-supplied `rng`
//! so that a seed pins down an entire episode.
//!
//! ```rust
//! use pomdp_core::{Chain, ChainAction, Domain};
//! use rand::SeedableRng;
//!
//! let chain = Chain::new(4).with_slip(0.1);
//! let mut rng = rand::rngs::StdRng::seed_from_u64(3);
//!
//! let t = chain.generate(&2, &ChainAction::Right, &mut rng);
//! assert!(t.next_state == 3 || t.next_state == 1);
//! ```

pub mod chain;
pub mod config;
pub mod domain;
pub mod error;
pub mod history;

// Re-export key types at crate root for convenience
pub use chain::{Chain, ChainAction, ChainObs};
pub use config::{BeliefConfig, EpisodeConfig, PlannerConfig, SolverConfig};
pub use domain::{check_action, check_observation, transition_probability, Domain, Transition};
pub use error::CoreError;
pub use history::History;
