//! ut3-mcts: a UCB1 Monte Carlo Tree Search decision engine.
//!
//! Given a state of any deterministic two-player game that implements
//! [`game::Rules`], the engine runs a fixed number of MCTS iterations and
//! returns the root move with the best observed win rate.
//!
//! ## Modules
//!
//! - [`mcts`] - Selection, expansion and the search loop (`decide`)
//! - [`tree`] - Arena-backed search tree, UCB1 and backpropagation
//! - [`playout`] - Random and heuristic rollouts
//! - [`config`] - Search configuration
//! - [`game`] - The rules interface the search plays through
//! - [`tictactoe`], [`ultimate`] - Rule sets shipped with the crate
//! - [`minimax`] - Alpha-beta lookahead, separate from the search
//! - [`protocol`] - Text protocol for playing against the engine
//!
//! ## Example
//!
//! ```
//! use fastrand::Rng;
//! use ut3_mcts::config::SearchConfig;
//! use ut3_mcts::mcts::decide;
//! use ut3_mcts::tictactoe::{Board, TicTacToe};
//!
//! let board = Board::new();
//! let mut rng = Rng::with_seed(42);
//! let config = SearchConfig::default().with_iterations(100);
//! let cell = decide(&TicTacToe, &board, &config, &mut rng).unwrap();
//! assert!(cell < 9);
//! ```

pub mod config;
pub mod constants;
pub mod error;
pub mod game;
pub mod logging;
pub mod mcts;
pub mod minimax;
pub mod playout;
pub mod protocol;
pub mod tictactoe;
pub mod tree;
pub mod ultimate;
