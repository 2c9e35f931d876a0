//! The partially observable stochastic maze.
//!
//! The agent must get from the start `S` to the goal `G`. It cannot see
//! where it is, only its orientation and which sides of its current cell are
//! walled, plus a tag when standing on the start or the goal. Moves slip
//! sideways with a small probability, so the agent is never quite sure a
//! move had the intended effect.
//!
//! ```text
//!   layout (MazeMap) ──▶ Maze<M> : Domain ──▶ planner / beliefs
//! ```

mod layout;
mod model;
mod types;

pub use layout::{MazeLayout, MazeMap};
pub use model::{Maze, MazeConfig};
pub use types::{Direction, LocationTag, MazeAction, MazeObservation, MazeState, Position, Walls};
