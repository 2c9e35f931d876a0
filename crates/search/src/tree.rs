//! The history-indexed search tree.
//!
//! Belief nodes and action nodes alternate:
//!
//! ```text
//!              BeliefNode (root, history h)
//!             /            |             \
//!       ActionNode a₁  ActionNode a₂  ActionNode a₃     visits, Q
//!        /      \
//!   obs o₁     obs o₂
//!     │          │
//!  BeliefNode  BeliefNode   (histories h·a₁·o₁, h·a₁·o₂)
//! ```
//!
//! Children are owned by value: there are no back-references, and dropping
//! a node drops its whole subtree. Advancing the tree moves the committed
//! grandchild out and drops everything else.

use std::collections::HashMap;
use std::hash::Hash;

use pomdp_core::History;

// ============================================================================
// Action Node
// ============================================================================

/// Statistics for one action taken from a belief node.
#[derive(Debug, Clone)]
pub struct ActionNode<S, A, O> {
    /// The edge label
    action: A,
    /// `N(h, a)`
    visits: u64,
    /// `Q(h, a)`, the running mean of discounted returns
    value: f64,
    /// One belief node per observation seen after this action
    children: HashMap<O, BeliefNode<S, A, O>>,
}

impl<S, A, O: Eq + Hash> ActionNode<S, A, O> {
    fn new(action: A) -> Self {
        Self {
            action,
            visits: 0,
            value: 0.0,
            children: HashMap::new(),
        }
    }

    pub fn action(&self) -> &A {
        &self.action
    }

    pub fn visits(&self) -> u64 {
        self.visits
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// The belief node reached by `observation`, if it was ever simulated.
    pub fn child(&self, observation: &O) -> Option<&BeliefNode<S, A, O>> {
        self.children.get(observation)
    }

    pub fn children(&self) -> impl Iterator<Item = (&O, &BeliefNode<S, A, O>)> {
        self.children.iter()
    }

    /// Get or lazily create the child for `observation`.
    pub(crate) fn child_mut(&mut self, observation: O) -> &mut BeliefNode<S, A, O> {
        self.children.entry(observation).or_default()
    }

    /// Incremental-mean backup of one return.
    pub(crate) fn update(&mut self, ret: f64) {
        self.visits += 1;
        self.value += (ret - self.value) / self.visits as f64;
    }
}

// ============================================================================
// Belief Node
// ============================================================================

/// A node for one history.
///
/// Holds the particle estimate of the belief at this history: the hidden
/// states of every simulation that passed through it.
#[derive(Debug, Clone)]
pub struct BeliefNode<S, A, O> {
    /// `N(h)`
    visits: u64,
    /// One entry per declared action once expanded, in declared order
    actions: Vec<ActionNode<S, A, O>>,
    particles: Vec<S>,
}

impl<S, A, O> Default for BeliefNode<S, A, O> {
    fn default() -> Self {
        Self {
            visits: 0,
            actions: Vec::new(),
            particles: Vec::new(),
        }
    }
}

impl<S, A: Clone + PartialEq, O: Eq + Hash> BeliefNode<S, A, O> {
    /// A fresh, unexpanded node.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visits(&self) -> u64 {
        self.visits
    }

    pub fn is_expanded(&self) -> bool {
        !self.actions.is_empty()
    }

    /// Action statistics in declared order.
    pub fn actions(&self) -> &[ActionNode<S, A, O>] {
        &self.actions
    }

    /// The statistics for `action`.
    pub fn action(&self, action: &A) -> Option<&ActionNode<S, A, O>> {
        self.actions.iter().find(|node| node.action == *action)
    }

    /// The grandchild reached by `(action, observation)`.
    pub fn child(&self, action: &A, observation: &O) -> Option<&BeliefNode<S, A, O>> {
        self.action(action).and_then(|node| node.child(observation))
    }

    /// The particle estimate collected at this node.
    pub fn particles(&self) -> &[S] {
        &self.particles
    }

    /// Belief nodes in this subtree, including this one.
    pub fn node_count(&self) -> usize {
        1 + self
            .actions
            .iter()
            .flat_map(|a| a.children.values())
            .map(BeliefNode::node_count)
            .sum::<usize>()
    }

    /// Create one action node per declared action.
    pub(crate) fn expand(&mut self, actions: &[A]) {
        self.actions = actions.iter().cloned().map(ActionNode::new).collect();
    }

    pub(crate) fn add_particle(&mut self, state: S) {
        self.particles.push(state);
    }

    pub(crate) fn record_visit(&mut self) {
        self.visits += 1;
    }

    pub(crate) fn action_mut(&mut self, index: usize) -> &mut ActionNode<S, A, O> {
        &mut self.actions[index]
    }

    /// UCB1 choice: `argmax Q(h,a) + c·√(ln N(h) / N(h,a))`.
    ///
    /// Unvisited actions come first, in declared order. Ties go to the
    /// earliest declared action. `None` only for an unexpanded node.
    pub fn ucb_select(&self, exploration: f64) -> Option<usize> {
        if let Some(i) = self.actions.iter().position(|a| a.visits == 0) {
            return Some(i);
        }

        let ln_n = (self.visits.max(1) as f64).ln();
        let mut best: Option<(usize, f64)> = None;
        for (i, node) in self.actions.iter().enumerate() {
            let score = node.value + exploration * (ln_n / node.visits as f64).sqrt();
            match best {
                Some((_, top)) if score <= top => {}
                _ => best = Some((i, score)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Greedy choice among visited actions: `argmax Q(h,a)`, no exploration.
    pub fn greedy(&self) -> Option<usize> {
        let mut best: Option<(usize, f64)> = None;
        for (i, node) in self.actions.iter().enumerate() {
            if node.visits == 0 {
                continue;
            }
            match best {
                Some((_, top)) if node.value <= top => {}
                _ => best = Some((i, node.value)),
            }
        }
        best.map(|(i, _)| i)
    }

    /// Move the grandchild for `(action, observation)` out of this node.
    fn take_child(&mut self, action: &A, observation: &O) -> Option<BeliefNode<S, A, O>> {
        self.actions
            .iter_mut()
            .find(|node| node.action == *action)
            .and_then(|node| node.children.remove(observation))
    }
}

// ============================================================================
// Search Tree
// ============================================================================

/// The planner's tree together with the history its root stands for.
#[derive(Debug, Clone)]
pub struct SearchTree<S, A, O> {
    root: BeliefNode<S, A, O>,
    history: History<A, O>,
}

impl<S, A, O> Default for SearchTree<S, A, O> {
    fn default() -> Self {
        Self {
            root: BeliefNode::default(),
            history: History::new(),
        }
    }
}

impl<S, A: Clone + PartialEq, O: Clone + Eq + Hash> SearchTree<S, A, O> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &BeliefNode<S, A, O> {
        &self.root
    }

    pub(crate) fn root_mut(&mut self) -> &mut BeliefNode<S, A, O> {
        &mut self.root
    }

    /// The committed `(action, observation)` pairs since the last reset.
    pub fn history(&self) -> &History<A, O> {
        &self.history
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }

    /// Re-root at `root.children[action].children[observation]`.
    ///
    /// Returns whether an explored subtree was reused. An unexplored branch
    /// yields a fresh root. Everything else is dropped.
    pub fn advance(&mut self, action: A, observation: O) -> bool {
        let next = self.root.take_child(&action, &observation);
        let reused = next.is_some();
        self.root = next.unwrap_or_default();
        self.history.push(action, observation);
        reused
    }

    /// Drop the tree and the history.
    pub fn reset(&mut self) {
        self.root = BeliefNode::default();
        self.history.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Node = BeliefNode<u8, char, bool>;

    fn expanded(actions: &[char]) -> Node {
        let mut node = Node::new();
        node.expand(actions);
        node
    }

    #[test]
    fn test_unvisited_actions_first_in_declared_order() {
        let mut node = expanded(&['a', 'b', 'c']);
        assert_eq!(node.ucb_select(1.0), Some(0));

        node.action_mut(0).update(5.0);
        node.record_visit();
        assert_eq!(node.ucb_select(1.0), Some(1));

        node.action_mut(1).update(-5.0);
        node.record_visit();
        assert_eq!(node.ucb_select(1.0), Some(2));
    }

    #[test]
    fn test_ucb_ties_go_to_first() {
        let mut node = expanded(&['a', 'b']);
        for i in 0..2 {
            node.action_mut(i).update(1.0);
            node.record_visit();
        }
        assert_eq!(node.ucb_select(2.0), Some(0));
        assert_eq!(node.greedy(), Some(0));
    }

    #[test]
    fn test_ucb_prefers_higher_mean() {
        let mut node = expanded(&['a', 'b']);
        for _ in 0..4 {
            node.action_mut(0).update(1.0);
            node.action_mut(1).update(2.0);
            node.record_visit();
            node.record_visit();
        }
        assert_eq!(node.ucb_select(1.0), Some(1));

        // Raising a's mean above b's flips the choice
        for _ in 0..4 {
            node.action_mut(0).update(4.0);
            node.record_visit();
        }
        assert_eq!(node.ucb_select(0.0), Some(0));
    }

    #[test]
    fn test_exploration_bonus_favors_rare_action() {
        let mut node = expanded(&['a', 'b']);
        for _ in 0..50 {
            node.action_mut(0).update(1.0);
            node.record_visit();
        }
        node.action_mut(1).update(0.9);
        node.record_visit();

        assert_eq!(node.ucb_select(0.0), Some(0));
        assert_eq!(node.ucb_select(1.0), Some(1));
    }

    #[test]
    fn test_incremental_mean() {
        let mut node = expanded(&['a']);
        for r in [1.0, 2.0, 6.0] {
            node.action_mut(0).update(r);
        }
        assert_eq!(node.actions()[0].visits(), 3);
        assert!((node.actions()[0].value() - 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_greedy_ignores_unvisited() {
        let mut node = expanded(&['a', 'b']);
        assert_eq!(node.greedy(), None);

        node.action_mut(1).update(-3.0);
        assert_eq!(node.greedy(), Some(1));
    }

    #[test]
    fn test_advance_reuses_subtree() {
        let mut tree: SearchTree<u8, char, bool> = SearchTree::new();
        tree.root_mut().expand(&['a', 'b']);
        {
            let child = tree.root_mut().action_mut(0).child_mut(true);
            child.record_visit();
            child.record_visit();
            child.add_particle(7);
        }
        tree.root_mut().action_mut(1).child_mut(false);
        assert_eq!(tree.node_count(), 3);

        assert!(tree.advance('a', true));
        assert_eq!(tree.root().visits(), 2);
        assert_eq!(tree.root().particles(), &[7]);
        assert_eq!(tree.node_count(), 1);
        assert_eq!(tree.history().len(), 1);
    }

    #[test]
    fn test_advance_unexplored_branch_starts_fresh() {
        let mut tree: SearchTree<u8, char, bool> = SearchTree::new();
        tree.root_mut().expand(&['a']);
        tree.root_mut().record_visit();

        assert!(!tree.advance('a', false));
        assert_eq!(tree.root().visits(), 0);
        assert!(!tree.root().is_expanded());

        tree.reset();
        assert!(tree.history().is_empty());
    }
}
