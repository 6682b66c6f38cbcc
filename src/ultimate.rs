//! Ultimate tic-tac-toe.
//!
//! The board is a 3x3 grid of boxes, each box a 3x3 tic-tac-toe board.
//! Playing in cell `c` of any box sends the opponent to box `c`. When that
//! box is already decided the opponent may play in any open box.
//!
//! A box is won by three in a row inside it and drawn once it fills up
//! without a line. The game is won by owning three boxes in a row; it is a
//! draw when every box is decided without such a line.

use std::fmt;

use crate::constants::{CELLS, SIDE};
use crate::game::{Payoffs, Player, Rules, line_owner};

/// A move: cell `cell` (0..9) of box `region` (0..9), both row-major.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    pub region: usize,
    pub cell: usize,
}

impl Move {
    pub fn new(region: usize, cell: usize) -> Self {
        Self { region, cell }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.region, self.cell)
    }
}

/// Status of one box.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BoxStatus {
    Open,
    Won(Player),
    Drawn,
}

impl BoxStatus {
    fn owner(self) -> Option<Player> {
        match self {
            BoxStatus::Won(p) => Some(p),
            _ => None,
        }
    }
}

/// An ultimate tic-tac-toe position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UltimateBoard {
    cells: [[Option<Player>; CELLS]; CELLS],
    boxes: [BoxStatus; CELLS],
    /// Box the player to move is sent to, `None` on the first move.
    target: Option<usize>,
    to_move: Player,
}

impl Default for UltimateBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl UltimateBoard {
    /// Empty board, player one to move anywhere.
    pub fn new() -> Self {
        Self {
            cells: [[None; CELLS]; CELLS],
            boxes: [BoxStatus::Open; CELLS],
            target: None,
            to_move: Player::One,
        }
    }

    /// Board reached by playing `moves` in order.
    ///
    /// Panics on a move that is not legal; meant for setting up positions.
    pub fn from_moves(moves: &[(usize, usize)]) -> Self {
        moves.iter().fold(Self::new(), |board, &(region, cell)| {
            let mv = Move::new(region, cell);
            assert!(board.is_legal(mv), "illegal move {mv}");
            board.play(mv)
        })
    }

    pub fn box_status(&self, region: usize) -> BoxStatus {
        self.boxes[region]
    }

    /// Box the player to move must play in, if it is restricted.
    pub fn forced_region(&self) -> Option<usize> {
        self.target
            .filter(|&region| self.boxes[region] == BoxStatus::Open)
    }

    pub fn is_legal(&self, mv: Move) -> bool {
        mv.region < CELLS
            && mv.cell < CELLS
            && self.winner().is_none()
            && self.boxes[mv.region] == BoxStatus::Open
            && self.forced_region().is_none_or(|r| r == mv.region)
            && self.cells[mv.region][mv.cell].is_none()
    }

    fn owners(&self) -> [Option<Player>; CELLS] {
        self.boxes.map(BoxStatus::owner)
    }

    fn winner(&self) -> Option<Player> {
        line_owner(&self.owners())
    }

    fn all_decided(&self) -> bool {
        self.boxes.iter().all(|&b| b != BoxStatus::Open)
    }

    fn moves(&self) -> Vec<Move> {
        if self.winner().is_some() {
            return Vec::new();
        }
        let regions: Vec<usize> = match self.forced_region() {
            Some(region) => vec![region],
            None => (0..CELLS)
                .filter(|&r| self.boxes[r] == BoxStatus::Open)
                .collect(),
        };
        regions
            .into_iter()
            .flat_map(move |region| {
                (0..CELLS)
                    .filter(move |&cell| self.cells[region][cell].is_none())
                    .map(move |cell| Move::new(region, cell))
            })
            .collect()
    }

    fn play(&self, mv: Move) -> Self {
        let mut next = self.clone();
        let grid = &mut next.cells[mv.region];
        grid[mv.cell] = Some(self.to_move);
        next.boxes[mv.region] = match line_owner(grid) {
            Some(p) => BoxStatus::Won(p),
            None if grid.iter().all(Option::is_some) => BoxStatus::Drawn,
            None => BoxStatus::Open,
        };
        next.target = Some(mv.cell);
        next.to_move = self.to_move.opponent();
        next
    }
}

impl fmt::Display for UltimateBoard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for big_row in 0..SIDE {
            if big_row > 0 {
                writeln!(f, "------+-------+------")?;
            }
            for small_row in 0..SIDE {
                for big_col in 0..SIDE {
                    if big_col > 0 {
                        write!(f, "| ")?;
                    }
                    let region = big_row * SIDE + big_col;
                    for small_col in 0..SIDE {
                        let cell = small_row * SIDE + small_col;
                        let ch = self.cells[region][cell].map_or('.', Player::glyph);
                        write!(f, "{ch} ")?;
                    }
                }
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

/// Rules of ultimate tic-tac-toe.
#[derive(Copy, Clone, Debug, Default)]
pub struct Ultimate;

impl Rules for Ultimate {
    type State = UltimateBoard;
    type Action = Move;

    fn is_ended(&self, state: &UltimateBoard) -> bool {
        state.winner().is_some() || state.all_decided()
    }

    fn legal_actions(&self, state: &UltimateBoard) -> Vec<Move> {
        state.moves()
    }

    fn next_state(&self, state: &UltimateBoard, action: Move) -> UltimateBoard {
        state.play(action)
    }

    fn current_player(&self, state: &UltimateBoard) -> Player {
        state.to_move
    }

    fn points_values(&self, state: &UltimateBoard) -> Option<Payoffs> {
        match state.winner() {
            Some(p) => Some(Payoffs::win_for(p)),
            None if state.all_decided() => Some(Payoffs::draw()),
            None => None,
        }
    }

    fn region_owners(&self, state: &UltimateBoard) -> Option<Vec<Option<Player>>> {
        Some(state.owners().to_vec())
    }
}
