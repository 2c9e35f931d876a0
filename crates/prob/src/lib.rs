//! # Prob - Beliefs over Hidden States
//!
//! A belief is a probability distribution over the states a POMDP agent
//! cannot see. This crate provides two interchangeable representations:
//!
//! - **Histogram**: exact `state → probability` mapping, updated by Bayes' rule
//! - **Particles**: a multiset of sampled states, updated by rejection sampling
//! - **Belief**: the sum of both, which is what the planner and the execution
//!   loop hold
//!
//! ## The Bayes Filter
//!
//! ```text
//!   b'(s') ∝ O(o | s', a) · Σₛ T(s, a, s') · b(s)
//! ```
//!
//! The histogram computes this sum exactly; the particle set approximates it
//! by pushing samples through the generative model and keeping those whose
//! simulated observation matches the real one.
//!
//! ## Example
//!
//! ```rust
//! use pomdp_core::{Chain, ChainAction, ChainObs};
//! use pomdp_prob::Histogram;
//!
//! let chain = Chain::new(5).with_slip(0.2);
//! let prior = Histogram::point(1usize);
//!
//! let posterior = prior.update(&chain, &ChainAction::Left, &ChainObs::LeftEnd).unwrap();
//! assert!((posterior.prob(&0) - 1.0).abs() < 1e-9);
//! ```

mod belief;
mod error;
mod histogram;
mod particles;

pub use belief::Belief;
pub use error::BeliefError;
pub use histogram::Histogram;
pub use particles::Particles;

/// Tolerance for probability comparisons.
pub const PROB_TOLERANCE: f64 = 1e-6;
