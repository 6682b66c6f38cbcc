//! Monte Carlo Tree Search with UCB1 selection.
//!
//! Each iteration runs four steps:
//! - Selection: walk down from the root with UCB1 until a node that is
//!   terminal or still has untried actions
//! - Expansion: turn one random untried action into a new child
//! - Rollout: play the child's state out to the end (see [`crate::playout`])
//! - Backpropagation: credit the result from that node up to the root
//!
//! Wins are always counted for the player who was to move at the root (the
//! "bot"), at every depth. Selection flips the win rate on edges chosen by
//! the opponent.
//!
//! A tree lives for one decision only; nothing is reused between calls.

use fastrand::Rng;
use log::{debug, trace};

use crate::config::SearchConfig;
use crate::constants::WIN;
use crate::error::SearchError;
use crate::game::{Player, Rules};
use crate::playout::rollout;
use crate::tree::{NodeId, SearchTree};

/// Walk from the root to a frontier node.
///
/// Stops at the first node whose state is terminal or that still has
/// untried actions. Returns that node and its state.
pub fn select<R: Rules>(
    rules: &R,
    tree: &SearchTree<R::Action>,
    root_state: &R::State,
    bot: Player,
    exploration: f64,
) -> (NodeId, R::State) {
    let mut node = tree.root();
    let mut state = root_state.clone();

    while !rules.is_ended(&state) && !tree.get(node).has_untried() {
        let is_opponent = rules.current_player(&state) != bot;
        let Some(child) = tree.select_child(node, is_opponent, exploration) else {
            break;
        };
        let Some(action) = tree.get(child).parent_action else {
            break;
        };
        debug_assert!(tree.get(child).visits <= tree.get(node).visits);

        state = rules.next_state(&state, action);
        node = child;
    }

    (node, state)
}

/// Add one child to `node` for a random untried action.
///
/// `state` must be the state of `node`. Returns the new child and its state.
pub fn expand<R: Rules>(
    rules: &R,
    tree: &mut SearchTree<R::Action>,
    node: NodeId,
    state: &R::State,
    rng: &mut Rng,
) -> Result<(NodeId, R::State), SearchError> {
    if rules.is_ended(state) {
        return Err(SearchError::TerminalExpansion);
    }
    let untried = &tree.get(node).untried_actions;
    if untried.is_empty() {
        return Err(SearchError::NothingToExpand);
    }

    let action = untried[rng.usize(..untried.len())];
    let next = rules.next_state(state, action);
    let child = tree.add_child(node, action, rules.legal_actions(&next));
    Ok((child, next))
}

/// Whether `state`, which must be terminal, is a win for `bot`.
pub fn is_win<R: Rules>(rules: &R, state: &R::State, bot: Player) -> Result<bool, SearchError> {
    let payoffs = rules.points_values(state).ok_or(SearchError::NotTerminal)?;
    Ok(payoffs.of(bot) == WIN)
}

/// Build a search tree from `state` with `config.iterations` iterations.
pub fn tree_search<R: Rules>(
    rules: &R,
    state: &R::State,
    config: &SearchConfig,
    rng: &mut Rng,
) -> Result<SearchTree<R::Action>, SearchError> {
    config.validate()?;

    let bot = rules.current_player(state);
    let mut tree = SearchTree::new(rules.legal_actions(state));

    for i in 0..config.iterations {
        let (mut node, mut leaf_state) = select(rules, &tree, state, bot, config.exploration);

        if !rules.is_ended(&leaf_state) && tree.get(node).has_untried() {
            (node, leaf_state) = expand(rules, &mut tree, node, &leaf_state, rng)?;
        }

        let terminal = rollout(
            rules,
            &leaf_state,
            config.rollout,
            bot,
            config.max_rollout_steps,
            rng,
        )?;
        let won = is_win(rules, &terminal, bot)?;
        tree.backpropagate(node, won);

        trace!("iteration {i}: node {} won={won}", node.0);
    }

    let root = tree.get(tree.root());
    debug!(
        "search done for {bot}: {} iterations, {} nodes, root winrate {:.3}",
        config.iterations,
        tree.len(),
        root.win_rate()
    );
    Ok(tree)
}

/// Choose a move for the player to move in `state`.
///
/// A position with a single legal move returns it without searching, for
/// any budget. Otherwise a budget of zero leaves the root without children
/// and yields [`SearchError::NoDecision`], as does a finished game.
pub fn decide<R: Rules>(
    rules: &R,
    state: &R::State,
    config: &SearchConfig,
    rng: &mut Rng,
) -> Result<R::Action, SearchError> {
    config.validate()?;
    if rules.is_ended(state) {
        return Err(SearchError::NoDecision);
    }

    match rules.legal_actions(state).as_slice() {
        [] => return Err(SearchError::NoDecision),
        [only] => {
            debug!("forced move {only:?}");
            return Ok(*only);
        }
        _ => {}
    }

    let tree = tree_search(rules, state, config, rng)?;
    tree.dump_children();
    let best = tree.best_action().ok_or(SearchError::NoDecision)?;
    debug!("chose {best:?}");
    Ok(best)
}
