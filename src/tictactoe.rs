//! Classic 3x3 tic-tac-toe.
//!
//! The smallest game the engine can play. Used by the tests and handy as a
//! sanity check for anything touching the search.

use std::fmt;

use crate::constants::CELLS;
use crate::game::{Payoffs, Player, Rules, line_owner};

/// A cell index, 0..9, row-major.
pub type Cell = usize;

/// A tic-tac-toe position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [Option<Player>; CELLS],
    to_move: Player,
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

impl Board {
    /// Empty board, player one to move.
    pub fn new() -> Self {
        Self {
            cells: [None; CELLS],
            to_move: Player::One,
        }
    }

    /// Board reached by playing `moves` in order from the empty board.
    ///
    /// Panics on an occupied cell; meant for setting up positions.
    pub fn from_moves(moves: &[Cell]) -> Self {
        moves.iter().fold(Self::new(), |board, &cell| {
            assert!(board.cells[cell].is_none(), "cell {cell} already taken");
            board.play(cell)
        })
    }

    pub fn get(&self, cell: Cell) -> Option<Player> {
        self.cells[cell]
    }

    fn play(&self, cell: Cell) -> Self {
        let mut next = self.clone();
        next.cells[cell] = Some(self.to_move);
        next.to_move = self.to_move.opponent();
        next
    }

    fn winner(&self) -> Option<Player> {
        line_owner(&self.cells)
    }

    fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(3) {
            for cell in row {
                let ch = cell.map_or('.', Player::glyph);
                write!(f, "{ch} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Rules of classic tic-tac-toe.
#[derive(Copy, Clone, Debug, Default)]
pub struct TicTacToe;

impl Rules for TicTacToe {
    type State = Board;
    type Action = Cell;

    fn is_ended(&self, state: &Board) -> bool {
        state.winner().is_some() || state.is_full()
    }

    fn legal_actions(&self, state: &Board) -> Vec<Cell> {
        if state.winner().is_some() {
            return Vec::new();
        }
        (0..CELLS).filter(|&c| state.cells[c].is_none()).collect()
    }

    fn next_state(&self, state: &Board, action: Cell) -> Board {
        state.play(action)
    }

    fn current_player(&self, state: &Board) -> Player {
        state.to_move
    }

    fn points_values(&self, state: &Board) -> Option<Payoffs> {
        match state.winner() {
            Some(p) => Some(Payoffs::win_for(p)),
            None if state.is_full() => Some(Payoffs::draw()),
            None => None,
        }
    }
}
