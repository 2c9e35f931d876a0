//! Maze with an exact (histogram) belief.
//!
//! Run with: cargo run -p pomdp-games --example maze_histogram
//!
//! Set `RUST_LOG=debug` to see every planning call and belief update.
//!
//! The agent starts at S facing North but is unsure of its heading, so the
//! prior is uniform over the four orientations at the start cell. Each step
//! the planner runs POUCT from the current belief, the simulated world
//! answers with walls and a landmark tag, and Bayes' rule updates the belief.

use std::error::Error;

use pomdp_core::SolverConfig;
use pomdp_games::maze::Maze;
use pomdp_games::{Episode, RecordingObserver};
use pomdp_prob::Belief;
use pomdp_search::Planner;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Maze: POUCT with a Histogram Belief ===\n");

    let maze = Maze::example();
    println!("{}", maze.map().render());

    let config = SolverConfig::from_json(
        r#"{
            "planner": { "num_simulations": 1000, "max_depth": 10, "exploration_constant": 50.0 },
            "episode": { "max_steps": 50 }
        }"#,
    )?;

    let prior = Belief::from_histogram(maze.start_belief()?);
    let start = maze.start_state();
    let planner = Planner::uniform(config.planner.clone())?;
    let mut episode = Episode::new(maze, planner, prior, start, config.episode.clone())?;

    let mut rng = ChaCha20Rng::seed_from_u64(42);
    let mut observer = RecordingObserver::new();
    let report = episode.run(&mut rng, &mut observer)?;

    println!(
        "{:>4}  {:<10} {:<28} {:>7} {:>8} {:>6} {:>7}",
        "step", "action", "observation", "reward", "total", "belief", "ms"
    );
    println!("{}", "-".repeat(78));
    for e in &observer.events {
        println!(
            "{:>4}  {:<10} {:<28} {:>7.1} {:>8.1} {:>6} {:>7.1}",
            e.step_index,
            format!("{:?}", e.action),
            e.observation.to_string(),
            e.reward,
            e.cumulative_reward,
            e.belief_size,
            e.planning_duration_ms
        );
    }

    println!();
    println!("Steps:            {}", report.steps);
    println!("Total reward:     {:.1}", report.total_reward);
    println!("Discounted:       {:.3}", report.discounted_reward);
    println!("Reached the goal: {}", report.reached_terminal);
    println!("Final state:      {}", episode.true_state());

    Ok(())
}
