//! Depth-limited minimax with alpha-beta pruning.
//!
//! An alternative way to look at a position, independent of the tree
//! search: [`decide`](crate::mcts::decide) never calls it. Leaves are scored
//! by the searching player's payoff when the game is over and 0 when the
//! depth runs out.

use crate::error::SearchError;
use crate::game::{Player, Rules};

/// Result of a minimax search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookahead<A> {
    /// Best move at the searched state, `None` at a leaf
    pub action: Option<A>,
    /// Value of the state for the searching player
    pub value: i32,
}

/// Minimax value of `state` for `bot`, looking `depth` plies ahead.
///
/// Nodes where `bot` is to move maximize, the others minimize. Ties keep the
/// first move in enumeration order.
pub fn alpha_beta<R: Rules>(
    rules: &R,
    state: &R::State,
    depth: u32,
    bot: Player,
) -> Lookahead<R::Action> {
    search(rules, state, depth, i32::MIN, i32::MAX, bot)
}

fn leaf_value<R: Rules>(rules: &R, state: &R::State, bot: Player) -> i32 {
    rules.points_values(state).map_or(0, |p| p.of(bot))
}

fn search<R: Rules>(
    rules: &R,
    state: &R::State,
    depth: u32,
    mut alpha: i32,
    mut beta: i32,
    bot: Player,
) -> Lookahead<R::Action> {
    let actions = rules.legal_actions(state);
    if depth == 0 || rules.is_ended(state) || actions.is_empty() {
        return Lookahead {
            action: None,
            value: leaf_value(rules, state, bot),
        };
    }

    let maximizing = rules.current_player(state) == bot;
    let mut best = Lookahead {
        action: None,
        value: if maximizing { i32::MIN } else { i32::MAX },
    };

    for action in actions {
        let next = rules.next_state(state, action);
        let value = search(rules, &next, depth - 1, alpha, beta, bot).value;

        if maximizing {
            if best.action.is_none() || value > best.value {
                best = Lookahead { action: Some(action), value };
            }
            alpha = alpha.max(value);
        } else {
            if best.action.is_none() || value < best.value {
                best = Lookahead { action: Some(action), value };
            }
            beta = beta.min(value);
        }
        if beta <= alpha {
            break;
        }
    }

    best
}

/// Play `state` to the end, every move chosen by [`alpha_beta`] at `depth`.
pub fn lookahead_playout<R: Rules>(
    rules: &R,
    state: &R::State,
    depth: u32,
    bot: Player,
    max_steps: usize,
) -> Result<R::State, SearchError> {
    let mut state = state.clone();
    let mut steps = 0;
    while !rules.is_ended(&state) {
        if steps == max_steps {
            return Err(SearchError::RolloutLimit { steps });
        }
        let action = alpha_beta(rules, &state, depth.max(1), bot)
            .action
            .ok_or(SearchError::Stalled)?;
        state = rules.next_state(&state, action);
        steps += 1;
    }
    Ok(state)
}
