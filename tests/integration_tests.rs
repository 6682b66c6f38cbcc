//! Integration tests for ut3-mcts.
//!
//! These exercise the search end to end through the shipped rule sets and a
//! few deliberately broken ones.

use fastrand::Rng;

use ut3_mcts::config::{RolloutPolicy, SearchConfig};
use ut3_mcts::error::SearchError;
use ut3_mcts::game::{Payoffs, Player, Rules};
use ut3_mcts::mcts::{decide, expand, select, tree_search};
use ut3_mcts::playout::rollout;
use ut3_mcts::tictactoe::{Board, TicTacToe};
use ut3_mcts::tree::{SearchTree, TreeNode};
use ut3_mcts::ultimate::{Ultimate, UltimateBoard};

// =============================================================================
// Helper functions and test rule sets
// =============================================================================

/// Board with only cell 8 left, X to move, no winner yet.
/// X O X / X O O / O X .
fn one_move_left() -> Board {
    Board::from_moves(&[0, 1, 2, 4, 3, 5, 7, 6])
}

/// Play `n` random moves on the ultimate board, stopping early at game end.
fn random_ultimate_position(n: usize, rng: &mut Rng) -> UltimateBoard {
    let mut board = UltimateBoard::new();
    for _ in 0..n {
        let moves = Ultimate.legal_actions(&board);
        if moves.is_empty() {
            break;
        }
        board = Ultimate.next_state(&board, moves[rng.usize(..moves.len())]);
    }
    board
}

/// Check the counter invariants on every node of a tree.
fn assert_tree_invariants<A>(tree: &SearchTree<A>)
where
    A: Copy + PartialEq + std::fmt::Debug,
{
    for (id, node) in tree.iter() {
        assert!(node.wins <= node.visits, "node {id:?}: wins > visits");
        if let Some(parent) = node.parent {
            let parent: &TreeNode<A> = tree.get(parent);
            assert!(
                node.visits <= parent.visits,
                "node {id:?}: {} visits but parent has {}",
                node.visits,
                parent.visits
            );
            assert!(parent.children.iter().any(|&(_, c)| c == id));
        } else {
            assert_eq!(id, tree.root());
        }
    }
}

/// A game that never ends: every state offers two moves.
struct Endless;

impl Rules for Endless {
    type State = u32;
    type Action = u8;

    fn is_ended(&self, _state: &u32) -> bool {
        false
    }

    fn legal_actions(&self, _state: &u32) -> Vec<u8> {
        vec![0, 1]
    }

    fn next_state(&self, state: &u32, _action: u8) -> u32 {
        state + 1
    }

    fn current_player(&self, state: &u32) -> Player {
        if state % 2 == 0 { Player::One } else { Player::Two }
    }

    fn points_values(&self, _state: &u32) -> Option<Payoffs> {
        None
    }
}

/// A game that runs out of moves without ever ending after ply 1.
struct Stuck;

impl Rules for Stuck {
    type State = u32;
    type Action = u8;

    fn is_ended(&self, _state: &u32) -> bool {
        false
    }

    fn legal_actions(&self, state: &u32) -> Vec<u8> {
        if *state == 0 { vec![0, 1] } else { Vec::new() }
    }

    fn next_state(&self, state: &u32, _action: u8) -> u32 {
        state + 1
    }

    fn current_player(&self, _state: &u32) -> Player {
        Player::One
    }

    fn points_values(&self, _state: &u32) -> Option<Payoffs> {
        None
    }
}

// =============================================================================
// Scenarios
// =============================================================================

#[test]
fn test_forced_move_any_budget() {
    let board = one_move_left();
    assert_eq!(TicTacToe.legal_actions(&board), vec![8]);
    for budget in [0, 1, 50] {
        let mut rng = Rng::with_seed(budget as u64);
        let config = SearchConfig::default().with_iterations(budget);
        assert_eq!(decide(&TicTacToe, &board, &config, &mut rng), Ok(8));
    }
}

#[test]
fn test_empty_board_returns_legal_move() {
    let board = Board::new();
    let legal = TicTacToe.legal_actions(&board);
    assert_eq!(legal.len(), 9);

    for seed in 0..5 {
        let mut rng = Rng::with_seed(seed);
        let config = SearchConfig::default().with_iterations(50);
        let cell = decide(&TicTacToe, &board, &config, &mut rng).unwrap();
        assert!(legal.contains(&cell));
    }
}

#[test]
fn test_zero_budget_is_no_decision() {
    let mut rng = Rng::with_seed(1);
    let config = SearchConfig::default().with_iterations(0);
    assert_eq!(
        decide(&TicTacToe, &Board::new(), &config, &mut rng),
        Err(SearchError::NoDecision)
    );
}

#[test]
fn test_ultimate_decision_is_legal() {
    let mut rng = Rng::with_seed(17);
    let board = random_ultimate_position(10, &mut rng);
    assert!(!Ultimate.is_ended(&board));
    for rollout_policy in [RolloutPolicy::Random, RolloutPolicy::heuristic()] {
        let config = SearchConfig::default()
            .with_iterations(100)
            .with_rollout(rollout_policy);
        let mv = decide(&Ultimate, &board, &config, &mut rng).unwrap();
        assert!(board.is_legal(mv), "{mv} is not legal");
    }
}

// =============================================================================
// Determinism
// =============================================================================

#[test]
fn test_same_seed_same_decision() {
    let board = UltimateBoard::from_moves(&[(4, 4), (4, 0)]);
    let config = SearchConfig::default().with_iterations(200);

    let first = decide(&Ultimate, &board, &config, &mut Rng::with_seed(99)).unwrap();
    let second = decide(&Ultimate, &board, &config, &mut Rng::with_seed(99)).unwrap();
    assert_eq!(first, second);

    let a = tree_search(&TicTacToe, &Board::new(), &config, &mut Rng::with_seed(5)).unwrap();
    let b = tree_search(&TicTacToe, &Board::new(), &config, &mut Rng::with_seed(5)).unwrap();
    assert_eq!(a.root_children(), b.root_children());
}

// =============================================================================
// Tree invariants
// =============================================================================

#[test]
fn test_visit_conservation_and_win_bound() {
    let mut rng = Rng::with_seed(2024);
    for iterations in [1, 9, 40, 300] {
        let tree = tree_search(
            &Ultimate,
            &UltimateBoard::new(),
            &SearchConfig::default().with_iterations(iterations),
            &mut rng,
        )
        .unwrap();
        assert_tree_invariants(&tree);
        assert_eq!(tree.get(tree.root()).visits as usize, iterations);
    }

    let tree = tree_search(
        &TicTacToe,
        &Board::new(),
        &SearchConfig::vanilla().with_iterations(2000),
        &mut rng,
    )
    .unwrap();
    assert_tree_invariants(&tree);
}

#[test]
fn test_each_iteration_adds_at_most_one_node() {
    let mut rng = Rng::with_seed(8);
    let tree = tree_search(
        &TicTacToe,
        &Board::new(),
        &SearchConfig::default().with_iterations(30),
        &mut rng,
    )
    .unwrap();
    assert!(tree.len() <= 31);
    // The root is expanded first: nine iterations give it nine children.
    let root = tree.get(tree.root());
    assert_eq!(root.children.len(), 9);
    assert!(root.untried_actions.is_empty());
}

#[test]
fn test_unvisited_child_is_selected_first() {
    let board = Board::new();
    let mut tree = SearchTree::new(TicTacToe.legal_actions(&board));
    let root = tree.root();
    let mut rng = Rng::with_seed(3);

    let mut children = Vec::new();
    while tree.get(tree.root()).has_untried() {
        let (child, _) = expand(&TicTacToe, &mut tree, root, &board, &mut rng).unwrap();
        children.push(child);
    }
    // Every child but the last gets many wins; the last is never visited.
    let last = *children.last().unwrap();
    for &child in &children[..children.len() - 1] {
        for _ in 0..10 {
            tree.backpropagate(child, true);
        }
    }
    assert_eq!(tree.get(last).visits, 0);

    let (node, _) = select(&TicTacToe, &tree, &board, Player::One, 2.0);
    assert_eq!(node, last);
}

#[test]
fn test_backpropagation_write_law() {
    let board = Board::new();
    let mut tree = SearchTree::new(TicTacToe.legal_actions(&board));
    let root = tree.root();
    let mut rng = Rng::with_seed(12);
    let (child, child_state) = expand(&TicTacToe, &mut tree, root, &board, &mut rng).unwrap();
    let (grandchild, _) = expand(&TicTacToe, &mut tree, child, &child_state, &mut rng).unwrap();
    let path = [grandchild, child, tree.root()];

    let before: Vec<(u32, u32)> = path
        .iter()
        .map(|&id| (tree.get(id).visits, tree.get(id).wins))
        .collect();
    tree.backpropagate(grandchild, true);
    for (&id, &(v, w)) in path.iter().zip(&before) {
        assert_eq!(tree.get(id).visits, v + 1);
        assert_eq!(tree.get(id).wins, w + 1);
    }

    tree.backpropagate(grandchild, false);
    for (&id, &(v, w)) in path.iter().zip(&before) {
        assert_eq!(tree.get(id).visits, v + 2);
        assert_eq!(tree.get(id).wins, w + 1);
    }
}

// =============================================================================
// Rollouts
// =============================================================================

#[test]
fn test_rollouts_terminate_from_reachable_states() {
    let mut rng = Rng::with_seed(77);
    for n in 0..40 {
        let board = random_ultimate_position(n, &mut rng);
        for policy in [RolloutPolicy::Random, RolloutPolicy::heuristic()] {
            let bot = Ultimate.current_player(&board);
            let end = rollout(&Ultimate, &board, policy, bot, 200, &mut rng).unwrap();
            assert!(Ultimate.is_ended(&end));
            assert!(Ultimate.points_values(&end).is_some());
        }
    }
}

#[test]
fn test_heuristic_rollout_takes_immediate_win() {
    // X: 0 1, O: 3 4, X to move and searching.
    let board = Board::from_moves(&[0, 3, 1, 4]);
    for seed in 0..10 {
        let mut rng = Rng::with_seed(seed);
        let end = rollout(
            &TicTacToe,
            &board,
            RolloutPolicy::heuristic(),
            Player::One,
            10,
            &mut rng,
        )
        .unwrap();
        assert_eq!(end.get(2), Some(Player::One));
        assert_eq!(
            TicTacToe.points_values(&end),
            Some(Payoffs::win_for(Player::One))
        );
    }
}

// =============================================================================
// Misbehaving rules
// =============================================================================

#[test]
fn test_endless_game_hits_rollout_limit() {
    let mut rng = Rng::with_seed(1);
    let config = SearchConfig::default()
        .with_iterations(5)
        .with_max_rollout_steps(50);
    assert_eq!(
        decide(&Endless, &0, &config, &mut rng),
        Err(SearchError::RolloutLimit { steps: 50 })
    );
}

#[test]
fn test_stuck_game_is_reported() {
    let mut rng = Rng::with_seed(1);
    let config = SearchConfig::vanilla().with_iterations(5);
    assert_eq!(
        decide(&Stuck, &0, &config, &mut rng),
        Err(SearchError::Stalled)
    );
}
