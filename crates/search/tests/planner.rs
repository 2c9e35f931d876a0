use std::time::Duration;

use pomdp_core::{Chain, ChainAction, ChainObs, Domain, PlannerConfig};
use pomdp_prob::{Belief, Histogram};
use pomdp_search::{Planner, PreferredRollout};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

fn config(sims: usize) -> PlannerConfig {
    PlannerConfig::default()
        .with_num_simulations(sims)
        .with_exploration_constant(5.0)
}

#[test]
fn single_simulation_builds_one_path() {
    let chain = Chain::new(6);
    let mut planner = Planner::uniform(config(1)).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(0);

    let action = planner.plan(&chain, &Belief::point(2usize), &mut rng).unwrap();
    assert!(chain.actions().contains(&action));

    let stats = planner.last_stats().unwrap();
    assert_eq!(stats.simulations, 1);
    assert_eq!(stats.tree_nodes, 2);
    assert_eq!(planner.tree().root().visits(), 1);

    // The only simulated action is the first unvisited one
    assert_eq!(action, ChainAction::Left);
    let visited: u64 = stats.action_values.iter().map(|v| v.visits).sum();
    assert_eq!(visited, 1);
}

#[test]
fn planner_moves_toward_goal() {
    let chain = Chain::new(5).with_slip(0.1);
    let mut planner = Planner::uniform(config(800)).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(9);

    let action = planner.plan(&chain, &Belief::point(2usize), &mut rng).unwrap();
    assert_eq!(action, ChainAction::Right);

    let stats = planner.last_stats().unwrap();
    let left = &stats.action_values[0];
    let right = &stats.action_values[1];
    assert!(right.value > left.value);
    assert!(right.visits > left.visits);
}

#[test]
fn advance_preserves_subtree_counts() {
    let chain = Chain::new(6).with_slip(0.2);
    let mut planner = Planner::uniform(config(400)).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(4);

    planner.plan(&chain, &Belief::point(2usize), &mut rng).unwrap();
    let before = planner
        .tree()
        .root()
        .child(&ChainAction::Right, &ChainObs::Corridor)
        .map(|node| (node.visits(), node.particles().len(), node.node_count()))
        .unwrap();

    assert!(planner.advance(ChainAction::Right, ChainObs::Corridor));
    let root = planner.tree().root();
    assert_eq!((root.visits(), root.particles().len(), root.node_count()), before);
    assert_eq!(planner.history().len(), 1);
}

#[test]
fn advance_into_unexplored_branch_starts_fresh() {
    let chain = Chain::new(6);
    let mut planner = Planner::uniform(config(50)).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(4);

    planner.plan(&chain, &Belief::point(2usize), &mut rng).unwrap();
    // Without slip, Right from 2 never yields RightEnd
    assert!(!planner.advance(ChainAction::Right, ChainObs::RightEnd));
    assert_eq!(planner.tree().node_count(), 1);
    assert_eq!(planner.tree().root().visits(), 0);

    // Planning from a fresh root works
    let action = planner.plan(&chain, &Belief::point(3usize), &mut rng).unwrap();
    assert!(chain.actions().contains(&action));
}

#[test]
fn zero_time_budget_still_returns_action() {
    let chain = Chain::new(6);
    let config = config(10_000).with_time_budget(Duration::ZERO);
    let mut planner = Planner::uniform(config).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(4);

    let action = planner.plan(&chain, &Belief::point(2usize), &mut rng).unwrap();
    assert_eq!(action, ChainAction::Left);

    let stats = planner.last_stats().unwrap();
    assert!(stats.timed_out);
    assert_eq!(stats.simulations, 0);
}

#[test]
fn seeded_runs_are_reproducible() {
    let chain = Chain::new(7).with_slip(0.2);
    let prior = Histogram::uniform(1..4usize).unwrap();
    let belief = Belief::from_histogram(prior);

    let run = |seed: u64| {
        let mut planner = Planner::new(config(300), PreferredRollout::new(0.5).unwrap()).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let action = planner.plan(&chain, &belief, &mut rng).unwrap();
        (action, planner.last_stats().unwrap().action_values.clone())
    };

    assert_eq!(run(21), run(21));
}

#[test]
fn reset_discards_tree() {
    let chain = Chain::new(6);
    let mut planner = Planner::uniform(config(100)).unwrap();
    let mut rng = ChaCha20Rng::seed_from_u64(1);

    planner.plan(&chain, &Belief::point(2usize), &mut rng).unwrap();
    planner.advance(ChainAction::Right, ChainObs::Corridor);
    planner.reset();

    assert_eq!(planner.tree().node_count(), 1);
    assert!(planner.history().is_empty());
    assert!(planner.last_stats().is_none());
}

#[test]
fn higher_mean_action_gets_more_visits() {
    // Averaged over seeds: the better action (Right) is selected more often
    let chain = Chain::new(6).with_slip(0.1);
    let mut right = 0u64;
    let mut left = 0u64;
    for seed in 0..10 {
        let mut planner = Planner::uniform(config(200)).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        planner.plan(&chain, &Belief::point(3usize), &mut rng).unwrap();
        let stats = planner.last_stats().unwrap();
        left += stats.action_values[0].visits;
        right += stats.action_values[1].visits;
    }
    assert!(right > left);
}
