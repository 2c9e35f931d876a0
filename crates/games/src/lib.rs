//! # Games - The Maze and the Execution Loop
//!
//! This crate puts the solver to work:
//!
//! - [`maze`]: the partially observable stochastic maze, a [`pomdp_core::Domain`]
//!   over any [`maze::MazeMap`] layout
//! - [`Episode`]: drives plan → act → observe → update until the goal or the
//!   step budget
//! - [`StepEvent`] / [`StepObserver`]: per-step telemetry for display or logging
//! - [`evaluate()`]: statistics over several episodes
//!
//! ## Example
//!
//! ```rust,no_run
//! use pomdp_core::{EpisodeConfig, PlannerConfig};
//! use pomdp_games::maze::Maze;
//! use pomdp_games::{Episode, NoopObserver};
//! use pomdp_prob::Belief;
//! use pomdp_search::Planner;
//! use rand::SeedableRng;
//!
//! let maze = Maze::example();
//! let prior = Belief::from_histogram(maze.start_belief().unwrap());
//! let start = maze.start_state();
//! let planner = Planner::uniform(PlannerConfig::default()).unwrap();
//!
//! let mut episode = Episode::new(maze, planner, prior, start, EpisodeConfig::default()).unwrap();
//! let mut rng = rand::rngs::StdRng::seed_from_u64(0);
//! let report = episode.run(&mut rng, &mut NoopObserver).unwrap();
//! println!("reward {:.1} in {} steps", report.total_reward, report.steps);
//! ```
//!
//! ## Loop Structure
//!
//! ```text
//!   belief ──▶ Planner.plan ──▶ action ──▶ Domain.generate(true state)
//!     ▲                                          │
//!     └──── Belief.update(action, observation) ◀─┘
//! ```

pub mod episode;
mod error;
pub mod maze;
pub mod telemetry;

pub use episode::{evaluate, Episode, EpisodeReport, EpisodeStats};
pub use error::EpisodeError;
pub use telemetry::{JsonLinesObserver, NoopObserver, RecordingObserver, StepEvent, StepObserver};
