//! Maze with a particle belief and a wall-aware rollout prior.
//!
//! Run with: cargo run -p pomdp-games --example maze_particles
//!
//! Same problem as `maze_histogram`, but the belief is a set of sampled
//! states updated by rejection sampling (POMCP style), and rollouts prefer
//! moves that are not walled off. Events are streamed as JSON lines on
//! stdout, followed by statistics over several episodes.

use std::error::Error;
use std::io;

use pomdp_core::{BeliefConfig, EpisodeConfig, PlannerConfig};
use pomdp_games::maze::Maze;
use pomdp_games::{evaluate, Episode, EpisodeError, JsonLinesObserver};
use pomdp_prob::Belief;
use pomdp_search::{Planner, PreferredRollout};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let planner_config = PlannerConfig::default().with_num_simulations(500);
    let belief_config = BeliefConfig::default().with_num_particles(200);
    let episode_config = EpisodeConfig::default().with_max_steps(50);

    let mut rng = ChaCha20Rng::seed_from_u64(7);

    let make_episode = |rng: &mut ChaCha20Rng| -> Result<Episode<Maze, PreferredRollout>, EpisodeError> {
        let maze = Maze::example();
        let prior = Belief::particles_from(&maze.start_belief()?, &belief_config, rng)?;
        let start = maze.start_state();
        let planner = Planner::new(planner_config.clone(), PreferredRollout::new(0.8)?)?;
        Episode::new(maze, planner, prior, start, episode_config.clone())?
            .with_belief_config(belief_config.clone())
    };

    // One episode, streamed as JSON lines
    let mut episode = make_episode(&mut rng)?;
    let mut observer = JsonLinesObserver::new(io::stdout().lock());
    let report = episode.run(&mut rng, &mut observer)?;
    eprintln!(
        "\nsingle episode: {} steps, reward {:.1}, goal reached: {}\n",
        report.steps, report.total_reward, report.reached_terminal
    );

    // Several fresh episodes
    let mut seeds = ChaCha20Rng::seed_from_u64(100);
    let stats = evaluate(5, |_| make_episode(&mut seeds), &mut rng)?;
    eprintln!("{}", stats);

    Ok(())
}
