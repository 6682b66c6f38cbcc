//! The rules interface consumed by the search.
//!
//! The search never looks inside a game state. Everything it needs to know
//! (whose turn it is, which moves exist, what a move does, and who won) is
//! asked through the [`Rules`] trait. Two implementations ship with the
//! crate: [`tictactoe`](crate::tictactoe) and [`ultimate`](crate::ultimate).

use std::fmt;
use std::hash::Hash;

use crate::constants::{DRAW, LINES, LOSS, WIN};

/// One of the two players.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    /// The other player.
    #[inline]
    pub fn opponent(self) -> Player {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }

    /// Numeric identity (1 or 2).
    #[inline]
    pub fn id(self) -> u8 {
        match self {
            Player::One => 1,
            Player::Two => 2,
        }
    }

    /// Board glyph used by the text renderers.
    pub fn glyph(self) -> char {
        match self {
            Player::One => 'X',
            Player::Two => 'O',
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player {}", self.id())
    }
}

/// Outcome values of a finished game, one per player.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Payoffs {
    one: i32,
    two: i32,
}

impl Payoffs {
    pub fn new(one: i32, two: i32) -> Self {
        Self { one, two }
    }

    /// `winner` gets [`WIN`], the other player [`LOSS`].
    pub fn win_for(winner: Player) -> Self {
        match winner {
            Player::One => Self::new(WIN, LOSS),
            Player::Two => Self::new(LOSS, WIN),
        }
    }

    pub fn draw() -> Self {
        Self::new(DRAW, DRAW)
    }

    /// Payoff of `player`.
    #[inline]
    pub fn of(&self, player: Player) -> i32 {
        match player {
            Player::One => self.one,
            Player::Two => self.two,
        }
    }

    /// The player holding the win value, if any.
    pub fn winner(&self) -> Option<Player> {
        [Player::One, Player::Two]
            .into_iter()
            .find(|&p| self.of(p) == WIN)
    }
}

/// A deterministic, two-player, perfect-information game.
///
/// States are immutable values: [`Rules::next_state`] must return a new
/// state and leave its input untouched. [`Rules::legal_actions`] must
/// enumerate actions in a stable order for a given state, since the search
/// breaks ties by that order.
pub trait Rules {
    type State: Clone;
    type Action: Copy + Eq + Hash + fmt::Debug;

    /// True iff no further moves are possible.
    fn is_ended(&self, state: &Self::State) -> bool;

    /// Legal actions in a stable order. Empty for ended states.
    fn legal_actions(&self, state: &Self::State) -> Vec<Self::Action>;

    /// The state reached by playing `action`, which must be legal.
    fn next_state(&self, state: &Self::State, action: Self::Action) -> Self::State;

    /// The player to move in `state`.
    fn current_player(&self, state: &Self::State) -> Player;

    /// Outcome values of an ended game, `None` while the game is running.
    fn points_values(&self, state: &Self::State) -> Option<Payoffs>;

    /// Owner of each sub-region of the board, for games that have them.
    ///
    /// Only the heuristic rollout asks for this. The default reports no
    /// regions, which makes that rollout fall back to random moves.
    fn region_owners(&self, _state: &Self::State) -> Option<Vec<Option<Player>>> {
        None
    }
}

/// Number of regions owned by `player`.
pub fn count_owned(owners: &[Option<Player>], player: Player) -> usize {
    owners.iter().filter(|&&o| o == Some(player)).count()
}

/// The player holding a full line of a 3x3 grid, if any.
pub fn line_owner(cells: &[Option<Player>; 9]) -> Option<Player> {
    LINES.iter().find_map(|&[a, b, c]| match cells[a] {
        Some(p) if cells[b] == Some(p) && cells[c] == Some(p) => Some(p),
        _ => None,
    })
}
