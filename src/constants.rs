//! Default search parameters and board geometry.
//!
//! Everything here is a default. The search itself only ever reads the
//! values carried by a [`SearchConfig`](crate::config::SearchConfig).

// =============================================================================
// MCTS Parameters
// =============================================================================

/// Default number of MCTS iterations per decision.
pub const N_ITERATIONS: usize = 250;

/// Default UCB1 exploration constant.
pub const EXPLORATION: f64 = 2.0;

/// Score given by the heuristic rollout to a move that captures a box.
pub const REGION_BONUS: u32 = 100;

/// Upper bound on moves simulated by a single rollout.
///
/// Far above the longest game of any shipped rule set (81 plies for the
/// ultimate board), so it only trips on a broken rules component.
pub const MAX_ROLLOUT_STEPS: usize = 1000;

// =============================================================================
// Payoffs
// =============================================================================

/// Payoff value of a won game.
pub const WIN: i32 = 1;

/// Payoff value of a drawn game.
pub const DRAW: i32 = 0;

/// Payoff value of a lost game.
pub const LOSS: i32 = -1;

// =============================================================================
// Board Geometry
// =============================================================================

/// Cells per side of a 3x3 grid.
pub const SIDE: usize = 3;

/// Cells in a 3x3 grid.
pub const CELLS: usize = SIDE * SIDE;

/// The eight lines (rows, columns, diagonals) of a 3x3 grid.
pub const LINES: [[usize; 3]; 8] = [
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    [0, 4, 8],
    [2, 4, 6],
];
