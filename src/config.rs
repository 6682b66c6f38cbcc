//! Search configuration.

use crate::constants::{EXPLORATION, MAX_ROLLOUT_STEPS, N_ITERATIONS, REGION_BONUS};
use crate::error::SearchError;

/// How a rollout picks its moves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RolloutPolicy {
    /// Uniformly random legal moves until the game ends.
    Random,
    /// Take an immediate win for the searching player when one exists,
    /// otherwise prefer moves that capture a sub-region (scored
    /// `region_bonus`), otherwise play randomly.
    Heuristic { region_bonus: u32 },
}

impl RolloutPolicy {
    /// Heuristic rollout with the default region bonus.
    pub fn heuristic() -> Self {
        RolloutPolicy::Heuristic {
            region_bonus: REGION_BONUS,
        }
    }
}

impl Default for RolloutPolicy {
    fn default() -> Self {
        Self::heuristic()
    }
}

/// Configuration for one decision.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Number of MCTS iterations to run.
    pub iterations: usize,

    /// Exploration constant `C` of the UCB1 formula.
    pub exploration: f64,

    /// Rollout policy used to evaluate new leaves.
    pub rollout: RolloutPolicy,

    /// Moves a rollout may simulate before it is considered runaway.
    pub max_rollout_steps: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            iterations: N_ITERATIONS,
            exploration: EXPLORATION,
            rollout: RolloutPolicy::default(),
            max_rollout_steps: MAX_ROLLOUT_STEPS,
        }
    }
}

impl SearchConfig {
    /// Plain UCT with uniformly random rollouts.
    pub fn vanilla() -> Self {
        Self::default().with_rollout(RolloutPolicy::Random)
    }

    /// Builder pattern: set the iteration budget.
    pub fn with_iterations(mut self, n: usize) -> Self {
        self.iterations = n;
        self
    }

    /// Builder pattern: set the exploration constant.
    pub fn with_exploration(mut self, c: f64) -> Self {
        self.exploration = c;
        self
    }

    /// Builder pattern: set the rollout policy.
    pub fn with_rollout(mut self, rollout: RolloutPolicy) -> Self {
        self.rollout = rollout;
        self
    }

    /// Builder pattern: set the rollout step cap.
    pub fn with_max_rollout_steps(mut self, steps: usize) -> Self {
        self.max_rollout_steps = steps;
        self
    }

    /// Reject values the search cannot run with.
    pub fn validate(&self) -> Result<(), SearchError> {
        if !self.exploration.is_finite() || self.exploration < 0.0 {
            return Err(SearchError::InvalidConfig(format!(
                "exploration constant must be finite and >= 0, got {}",
                self.exploration
            )));
        }
        if self.max_rollout_steps == 0 {
            return Err(SearchError::InvalidConfig(
                "max_rollout_steps must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
