//! # Solver Configuration
//!
//! Explicit configuration values handed to the planner, the belief store and
//! the execution loop. There is no process-wide solver state: every component
//! receives its configuration at construction and re-validates it there.
//!
//! All structs deserialize from JSON with missing fields taking their
//! defaults:
//!
//! ```rust
//! use pomdp_core::SolverConfig;
//!
//! let config = SolverConfig::from_json(r#"{ "planner": { "num_simulations": 200 } }"#).unwrap();
//! assert_eq!(config.planner.num_simulations, 200);
//! assert_eq!(config.planner.max_depth, 10);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ============================================================================
// Planner
// ============================================================================

/// Monte-Carlo tree search parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerConfig {
    /// Simulations per planning call (`K`)
    pub num_simulations: usize,
    /// Simulation horizon (`D`)
    pub max_depth: usize,
    /// UCB1 exploration constant (`c`)
    pub exploration_constant: f64,
    /// Discount factor (`γ`), in `[0, 1)`
    pub discount_factor: f64,
    /// Optional wall-clock budget per planning call, in milliseconds
    pub planning_time_budget_ms: Option<u64>,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            num_simulations: 1000,
            max_depth: 10,
            exploration_constant: 50.0,
            discount_factor: 0.95,
            planning_time_budget_ms: None,
        }
    }
}

impl PlannerConfig {
    /// Set the simulation budget.
    pub fn with_num_simulations(mut self, num_simulations: usize) -> Self {
        self.num_simulations = num_simulations;
        self
    }

    /// Set the horizon.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Set the exploration constant.
    pub fn with_exploration_constant(mut self, c: f64) -> Self {
        self.exploration_constant = c;
        self
    }

    /// Set the discount factor.
    pub fn with_discount_factor(mut self, gamma: f64) -> Self {
        self.discount_factor = gamma;
        self
    }

    /// Set a wall-clock budget per planning call.
    pub fn with_time_budget(mut self, budget: Duration) -> Self {
        self.planning_time_budget_ms = Some(u64::try_from(budget.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// The wall-clock budget, if any.
    pub fn time_budget(&self) -> Option<Duration> {
        self.planning_time_budget_ms.map(Duration::from_millis)
    }

    /// Check every field against its admissible range.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.num_simulations == 0 {
            return Err(CoreError::invalid("num_simulations", "must be positive"));
        }
        if self.max_depth == 0 {
            return Err(CoreError::invalid("max_depth", "must be positive"));
        }
        if !self.exploration_constant.is_finite() || self.exploration_constant < 0.0 {
            return Err(CoreError::invalid(
                "exploration_constant",
                format!("must be finite and non-negative, got {}", self.exploration_constant),
            ));
        }
        if !(0.0..1.0).contains(&self.discount_factor) {
            return Err(CoreError::invalid(
                "discount_factor",
                format!("must lie in [0, 1), got {}", self.discount_factor),
            ));
        }
        Ok(())
    }
}

// ============================================================================
// Belief
// ============================================================================

/// Particle-filter parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BeliefConfig {
    /// Particles per belief (`N`)
    pub num_particles: usize,
    /// Cap on `generate` calls during one rejection-sampling update
    pub max_rejection_attempts: usize,
    /// Whether a depleted update may draw from the domain's fallback states
    pub reinvigorate: bool,
}

impl Default for BeliefConfig {
    fn default() -> Self {
        Self {
            num_particles: 100,
            max_rejection_attempts: 100_000,
            reinvigorate: true,
        }
    }
}

impl BeliefConfig {
    /// Set the particle count.
    pub fn with_num_particles(mut self, num_particles: usize) -> Self {
        self.num_particles = num_particles;
        self
    }

    /// Set the rejection-sampling cap.
    pub fn with_max_rejection_attempts(mut self, attempts: usize) -> Self {
        self.max_rejection_attempts = attempts;
        self
    }

    /// Enable or disable reinvigoration.
    pub fn with_reinvigoration(mut self, enabled: bool) -> Self {
        self.reinvigorate = enabled;
        self
    }

    /// Check every field against its admissible range.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.num_particles == 0 {
            return Err(CoreError::invalid("num_particles", "must be positive"));
        }
        if self.max_rejection_attempts == 0 {
            return Err(CoreError::invalid("max_rejection_attempts", "must be positive"));
        }
        Ok(())
    }
}

// ============================================================================
// Episode
// ============================================================================

/// Execution-loop parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpisodeConfig {
    /// Step budget per episode
    pub max_steps: usize,
}

impl Default for EpisodeConfig {
    fn default() -> Self {
        Self { max_steps: 50 }
    }
}

impl EpisodeConfig {
    /// Set the step budget.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Check every field against its admissible range.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.max_steps == 0 {
            return Err(CoreError::invalid("max_steps", "must be positive"));
        }
        Ok(())
    }
}

// ============================================================================
// Aggregate
// ============================================================================

/// The domain-independent configuration surface.
///
/// Domain parameters (slip probability, rewards) belong to the domain's own
/// configuration type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    pub planner: PlannerConfig,
    pub belief: BeliefConfig,
    pub episode: EpisodeConfig,
}

impl SolverConfig {
    /// Parse and validate a JSON document.
    pub fn from_json(json: &str) -> Result<Self, CoreError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate every section.
    pub fn validate(&self) -> Result<(), CoreError> {
        self.planner.validate()?;
        self.belief.validate()?;
        self.episode.validate()
    }
}
