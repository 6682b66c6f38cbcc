//! Search tree with arena allocation.
//!
//! Nodes live in one `Vec` and refer to each other by [`NodeId`]. A node
//! keeps a non-owning handle to its parent and an ordered list of
//! `(action, child)` pairs. The order is the order actions were expanded in,
//! which is also the tie-break order everywhere a maximum is taken.

use std::fmt::Debug;

use log::debug;

/// Index into the node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// A node in the search tree.
#[derive(Debug, Clone)]
pub struct TreeNode<A> {
    /// Parent node, `None` for the root
    pub parent: Option<NodeId>,
    /// Action that led here from the parent, `None` for the root
    pub parent_action: Option<A>,
    /// Expanded children in expansion order
    pub children: Vec<(A, NodeId)>,
    /// Legal actions not yet expanded into a child
    pub untried_actions: Vec<A>,
    /// Number of backpropagation passes through this node
    pub visits: u32,
    /// Passes that credited a win for the searching player
    pub wins: u32,
}

impl<A> TreeNode<A> {
    fn new(parent: Option<NodeId>, parent_action: Option<A>, actions: Vec<A>) -> Self {
        Self {
            parent,
            parent_action,
            children: Vec::new(),
            untried_actions: actions,
            visits: 0,
            wins: 0,
        }
    }

    /// Observed win rate, 0 for an unvisited node.
    #[inline]
    pub fn win_rate(&self) -> f64 {
        if self.visits > 0 {
            self.wins as f64 / self.visits as f64
        } else {
            0.0
        }
    }

    #[inline]
    pub fn has_untried(&self) -> bool {
        !self.untried_actions.is_empty()
    }
}

/// UCB1 score of `child` as seen by the searching player.
///
/// `is_opponent` is true when the move into `child` was made by the other
/// player; their good outcomes are bad for us, so the win rate flips.
/// `parent_visits` is the visit count of `child`'s parent.
pub fn ucb<A>(child: &TreeNode<A>, parent_visits: u32, is_opponent: bool, c: f64) -> f64 {
    if child.visits == 0 {
        return f64::INFINITY;
    }
    let mut win_rate = child.win_rate();
    if is_opponent {
        win_rate = 1.0 - win_rate;
    }
    let explore = ((parent_visits as f64).ln() / child.visits as f64).sqrt();
    win_rate + c * explore
}

/// Index of the first maximum of `scores`.
///
/// `Iterator::max_by` keeps the last of equal elements; the search needs the
/// first, so ties resolve to insertion order.
pub(crate) fn first_max<I>(scores: I) -> Option<usize>
where
    I: IntoIterator<Item = f64>,
{
    let mut best: Option<(usize, f64)> = None;
    for (i, s) in scores.into_iter().enumerate() {
        match best {
            Some((_, b)) if s <= b => {}
            _ => best = Some((i, s)),
        }
    }
    best.map(|(i, _)| i)
}

/// Arena-backed search tree for one decision.
#[derive(Debug, Clone)]
pub struct SearchTree<A> {
    nodes: Vec<TreeNode<A>>,
}

impl<A: Copy + PartialEq + Debug> SearchTree<A> {
    /// Tree holding only a root with the given legal actions.
    pub fn new(root_actions: Vec<A>) -> Self {
        Self {
            nodes: vec![TreeNode::new(None, None, root_actions)],
        }
    }

    #[inline]
    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> &TreeNode<A> {
        &self.nodes[id.0 as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> &mut TreeNode<A> {
        &mut self.nodes[id.0 as usize]
    }

    /// Number of nodes in the tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree has at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes with their ids, root first.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &TreeNode<A>)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Create the child of `parent` reached by `action` and register it.
    ///
    /// `action` is removed from the parent's untried actions. Callers check
    /// that it was there.
    pub fn add_child(&mut self, parent: NodeId, action: A, child_actions: Vec<A>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(TreeNode::new(Some(parent), Some(action), child_actions));

        let parent_node = self.get_mut(parent);
        debug_assert!(parent_node.children.iter().all(|(a, _)| *a != action));
        parent_node.untried_actions.retain(|a| *a != action);
        parent_node.children.push((action, id));
        id
    }

    /// Credit one rollout to `leaf` and every ancestor up to the root.
    ///
    /// Every node on the path receives the same `won`; the per-player view
    /// is applied when scores are read, in [`ucb`].
    pub fn backpropagate(&mut self, leaf: NodeId, won: bool) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visits += 1;
            if won {
                node.wins += 1;
            }
            debug_assert!(node.wins <= node.visits);
            current = node.parent;
        }
    }

    /// Child of `id` with the highest UCB1 score, first one on ties.
    pub fn select_child(&self, id: NodeId, is_opponent: bool, c: f64) -> Option<NodeId> {
        let node = self.get(id);
        // The parent of every child here is `id` itself.
        let parent_visits = node.visits;
        let scores = node
            .children
            .iter()
            .map(|&(_, child)| ucb(self.get(child), parent_visits, is_opponent, c));
        first_max(scores).map(|i| node.children[i].1)
    }

    /// Root child action with the best observed win rate, first one on ties.
    pub fn best_action(&self) -> Option<A> {
        let root = self.get(self.root());
        let rates = root
            .children
            .iter()
            .map(|&(_, child)| self.get(child).win_rate());
        first_max(rates).map(|i| root.children[i].0)
    }

    /// `(action, visits, wins)` for every root child, in expansion order.
    pub fn root_children(&self) -> Vec<(A, u32, u32)> {
        self.get(self.root())
            .children
            .iter()
            .map(|&(action, id)| {
                let n = self.get(id);
                (action, n.visits, n.wins)
            })
            .collect()
    }

    /// Log the statistics of the root's children.
    pub fn dump_children(&self) {
        for (action, visits, wins) in self.root_children() {
            let wr = if visits > 0 {
                wins as f64 / visits as f64
            } else {
                0.0
            };
            debug!("move {action:?} v={visits} w={wins} wr={wr:.3}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_tree() -> (SearchTree<u8>, NodeId, NodeId, NodeId) {
        let mut tree = SearchTree::new(vec![0, 1, 2]);
        let a = tree.add_child(tree.root(), 0, vec![5, 6]);
        let b = tree.add_child(tree.root(), 1, vec![]);
        let c = tree.add_child(a, 5, vec![]);
        (tree, a, b, c)
    }

    #[test]
    fn test_add_child_moves_action_out_of_untried() {
        let (tree, a, _, c) = small_tree();
        let root = tree.get(tree.root());
        assert_eq!(root.untried_actions, vec![2]);
        assert_eq!(root.children.iter().map(|(a, _)| *a).collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(tree.get(a).untried_actions, vec![6]);
        assert_eq!(tree.get(c).parent, Some(a));
        assert_eq!(tree.get(c).parent_action, Some(5));
        assert_eq!(tree.get(tree.root()).parent, None);
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_backpropagate_win() {
        let (mut tree, a, b, c) = small_tree();
        tree.backpropagate(c, true);
        for id in [c, a, tree.root()] {
            assert_eq!(tree.get(id).visits, 1);
            assert_eq!(tree.get(id).wins, 1);
        }
        assert_eq!(tree.get(b).visits, 0);
    }

    #[test]
    fn test_backpropagate_loss() {
        let (mut tree, a, _, c) = small_tree();
        tree.backpropagate(c, false);
        for id in [c, a, tree.root()] {
            assert_eq!(tree.get(id).visits, 1);
            assert_eq!(tree.get(id).wins, 0);
        }
    }

    #[test]
    fn test_ucb_unvisited_is_infinite() {
        let node: TreeNode<u8> = TreeNode::new(None, None, vec![]);
        assert_eq!(ucb(&node, 10, false, 2.0), f64::INFINITY);
    }

    #[test]
    fn test_ucb_formula_and_inversion() {
        let mut node: TreeNode<u8> = TreeNode::new(Some(NodeId(0)), Some(0), vec![]);
        node.visits = 4;
        node.wins = 3;
        let explore = 2.0 * ((10f64).ln() / 4.0).sqrt();
        assert!((ucb(&node, 10, false, 2.0) - (0.75 + explore)).abs() < 1e-12);
        assert!((ucb(&node, 10, true, 2.0) - (0.25 + explore)).abs() < 1e-12);
    }

    #[test]
    fn test_select_prefers_unvisited() {
        let (mut tree, a, b, _) = small_tree();
        for _ in 0..5 {
            tree.backpropagate(a, true);
        }
        assert_eq!(tree.get(b).visits, 0);
        assert_eq!(tree.select_child(tree.root(), false, 2.0), Some(b));
    }

    #[test]
    fn test_select_ties_go_to_first() {
        let (mut tree, a, b, _) = small_tree();
        tree.backpropagate(a, true);
        tree.backpropagate(b, true);
        assert_eq!(tree.select_child(tree.root(), false, 2.0), Some(a));
    }

    #[test]
    fn test_select_inverts_for_opponent() {
        let (mut tree, a, b, _) = small_tree();
        tree.backpropagate(a, true);
        tree.backpropagate(b, false);
        assert_eq!(tree.select_child(tree.root(), false, 0.0), Some(a));
        assert_eq!(tree.select_child(tree.root(), true, 0.0), Some(b));
    }

    #[test]
    fn test_best_action() {
        let (mut tree, a, b, _) = small_tree();
        assert_eq!(tree.best_action(), Some(0));
        tree.backpropagate(a, false);
        tree.backpropagate(b, true);
        assert_eq!(tree.best_action(), Some(1));
        assert_eq!(tree.root_children(), vec![(0, 1, 0), (1, 1, 1)]);
    }

    #[test]
    fn test_best_action_empty_root() {
        let tree: SearchTree<u8> = SearchTree::new(vec![3]);
        assert_eq!(tree.best_action(), None);
    }

    #[test]
    fn test_first_max() {
        assert_eq!(first_max([1.0, 3.0, 3.0, 2.0]), Some(1));
        assert_eq!(first_max([f64::INFINITY, f64::INFINITY]), Some(0));
        assert_eq!(first_max(std::iter::empty()), None);
    }
}
