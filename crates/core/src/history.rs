//! Action/observation histories.
//!
//! The planner conditions on history, never on the hidden state: two
//! episodes that produced the same `(action, observation)` sequence reach
//! the same search-tree node.

/// The ordered `(action, observation)` pairs since episode start.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct History<Act, Obs> {
    entries: Vec<(Act, Obs)>,
}

impl<Act, Obs> History<Act, Obs> {
    /// Create an empty history.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Append one committed step.
    pub fn push(&mut self, action: Act, observation: Obs) {
        self.entries.push((action, observation));
    }

    /// Number of committed steps.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The most recent step.
    pub fn last(&self) -> Option<&(Act, Obs)> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(Act, Obs)> {
        self.entries.iter()
    }

    /// Forget everything (new episode).
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl<Act, Obs> Default for History<Act, Obs> {
    fn default() -> Self {
        Self::new()
    }
}
