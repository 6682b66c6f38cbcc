//! Errors raised by the search.

use thiserror::Error;

/// Errors that can occur while choosing a move.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// The root has no children to choose from: the game is over, or the
    /// iteration budget was zero with more than one move available.
    #[error("no decision available: root has no expanded children")]
    NoDecision,

    #[error("win check called on a non-terminal state")]
    NotTerminal,

    #[error("cannot expand a node whose state is terminal")]
    TerminalExpansion,

    #[error("cannot expand a node with no untried actions")]
    NothingToExpand,

    #[error("rollout did not reach a terminal state within {steps} steps")]
    RolloutLimit { steps: usize },

    #[error("rules report a non-terminal state with no legal actions")]
    Stalled,

    #[error("invalid search configuration: {0}")]
    InvalidConfig(String),
}
