//! Step-level telemetry.
//!
//! The execution loop emits one [`StepEvent`] per executed step. Observers
//! decide what to do with it; the loop itself never prints.

use std::io::Write;

use serde::Serialize;
use tracing::warn;

/// Everything that happened in one plan/act/observe cycle.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StepEvent<S, A, O> {
    /// 1-based step number
    pub step_index: usize,
    /// Hidden state after the step
    pub true_state: S,
    pub action: A,
    pub observation: O,
    pub reward: f64,
    pub cumulative_reward: f64,
    /// Simulations completed by the planning call
    pub sim_count: usize,
    pub planning_duration_ms: f64,
    /// Support size or particle count of the updated belief
    pub belief_size: usize,
    /// Belief nodes in the search tree before it was advanced
    pub tree_nodes: usize,
    /// Particles at the search root before it was advanced
    pub root_particles: usize,
}

/// Receives step events as the episode runs.
pub trait StepObserver<S, A, O> {
    fn on_step(&mut self, event: &StepEvent<S, A, O>);
}

/// Ignores every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl<S, A, O> StepObserver<S, A, O> for NoopObserver {
    fn on_step(&mut self, _event: &StepEvent<S, A, O>) {}
}

/// Keeps a copy of every event.
#[derive(Debug, Clone)]
pub struct RecordingObserver<S, A, O> {
    pub events: Vec<StepEvent<S, A, O>>,
}

impl<S, A, O> RecordingObserver<S, A, O> {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl<S, A, O> Default for RecordingObserver<S, A, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Clone, A: Clone, O: Clone> StepObserver<S, A, O> for RecordingObserver<S, A, O> {
    fn on_step(&mut self, event: &StepEvent<S, A, O>) {
        self.events.push(event.clone());
    }
}

/// Writes each event as one line of JSON.
#[derive(Debug)]
pub struct JsonLinesObserver<W> {
    writer: W,
}

impl<W: Write> JsonLinesObserver<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W, S, A, O> StepObserver<S, A, O> for JsonLinesObserver<W>
where
    W: Write,
    S: Serialize,
    A: Serialize,
    O: Serialize,
{
    fn on_step(&mut self, event: &StepEvent<S, A, O>) {
        let written = serde_json::to_writer(&mut self.writer, event)
            .map_err(std::io::Error::from)
            .and_then(|_| self.writer.write_all(b"\n"));
        if let Err(err) = written {
            warn!(step = event.step_index, %err, "dropping step event");
        }
    }
}
