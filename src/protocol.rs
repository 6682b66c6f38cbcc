//! Line-oriented text protocol for playing ultimate tic-tac-toe against the
//! engine, modelled on GTP.
//!
//! Each request is one line: an optional numeric id, a command, arguments.
//! Each response is `=[id] message` on success or `?[id] message` on failure,
//! followed by a blank line.
//!
//! ## Supported Commands
//!
//! - `name`, `version` - engine identification
//! - `list_commands`, `known_command <cmd>` - introspection
//! - `new` - reset to the empty board
//! - `play <box> <cell>` - play a move for the side to move
//! - `genmove` - let the engine choose and play a move
//! - `legal` - list legal moves
//! - `show` - print the board
//! - `iterations <n>` - change the search budget
//! - `quit` - exit

use std::io::{self, BufRead, Write};

use fastrand::Rng;
use log::info;

use crate::config::SearchConfig;
use crate::game::Rules;
use crate::mcts::decide;
use crate::ultimate::{Move, Ultimate, UltimateBoard};

/// The list of known commands.
const KNOWN_COMMANDS: &[&str] = &[
    "genmove",
    "iterations",
    "known_command",
    "legal",
    "list_commands",
    "name",
    "new",
    "play",
    "quit",
    "show",
    "version",
];

/// Protocol engine state.
pub struct ProtocolEngine {
    board: UltimateBoard,
    config: SearchConfig,
    rng: Rng,
}

impl ProtocolEngine {
    pub fn new(config: SearchConfig, rng: Rng) -> Self {
        Self {
            board: UltimateBoard::new(),
            config,
            rng,
        }
    }

    /// Run the command loop over stdin and stdout.
    pub fn run(&mut self) -> io::Result<()> {
        let stdin = io::stdin();
        let stdout = io::stdout();
        self.serve(stdin.lock(), stdout.lock())
    }

    /// Run the command loop over arbitrary streams until `quit` or EOF.
    pub fn serve<I: BufRead, O: Write>(&mut self, input: I, mut output: O) -> io::Result<()> {
        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (id, command_line) = Self::parse_id(line);
            let parts: Vec<&str> = command_line.split_whitespace().collect();
            let Some((command, args)) = parts.split_first() else {
                continue;
            };
            let command = command.to_lowercase();

            let (success, message) = self.execute(&command, args);
            let prefix = if success { '=' } else { '?' };
            let id_str = id.map(|i| i.to_string()).unwrap_or_default();
            writeln!(output, "{prefix}{id_str} {message}\n")?;
            output.flush()?;

            if command == "quit" {
                break;
            }
        }
        Ok(())
    }

    /// Split an optional numeric command id off the front of the line.
    fn parse_id(line: &str) -> (Option<u32>, &str) {
        let end = line
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(line.len());
        match line[..end].parse::<u32>() {
            Ok(id) => (Some(id), line[end..].trim()),
            Err(_) => (None, line),
        }
    }

    fn parse_move(args: &[&str]) -> Result<Move, String> {
        let [region, cell] = args else {
            return Err("expected <box> <cell>".to_string());
        };
        let region = region.parse::<usize>().map_err(|_| "invalid box".to_string())?;
        let cell = cell.parse::<usize>().map_err(|_| "invalid cell".to_string())?;
        Ok(Move::new(region, cell))
    }

    fn status(&self) -> String {
        match Ultimate.points_values(&self.board) {
            None => format!("{} to move", Ultimate.current_player(&self.board)),
            Some(p) => match p.winner() {
                Some(winner) => format!("game over, {winner} wins"),
                None => "game over, draw".to_string(),
            },
        }
    }

    /// Execute a command and return (success, response).
    fn execute(&mut self, command: &str, args: &[&str]) -> (bool, String) {
        match command {
            "name" => (true, env!("CARGO_PKG_NAME").to_string()),

            "version" => (true, env!("CARGO_PKG_VERSION").to_string()),

            "list_commands" => (true, KNOWN_COMMANDS.join("\n")),

            "known_command" => match args.first() {
                Some(cmd) => {
                    let known = KNOWN_COMMANDS.contains(&cmd.to_lowercase().as_str());
                    (true, known.to_string())
                }
                None => (false, "missing argument".to_string()),
            },

            "quit" => (true, String::new()),

            "new" => {
                self.board = UltimateBoard::new();
                (true, String::new())
            }

            "show" => (true, format!("\n{}{}", self.board, self.status())),

            "legal" => {
                let moves: Vec<String> = Ultimate
                    .legal_actions(&self.board)
                    .iter()
                    .map(Move::to_string)
                    .collect();
                (true, moves.join(", "))
            }

            "iterations" => match args.first().map(|s| s.parse::<usize>()) {
                Some(Ok(n)) => {
                    self.config.iterations = n;
                    (true, String::new())
                }
                Some(Err(_)) => (false, "invalid iteration count".to_string()),
                None => (false, "missing argument".to_string()),
            },

            "play" => {
                let mv = match Self::parse_move(args) {
                    Ok(mv) => mv,
                    Err(e) => return (false, e),
                };
                if !self.board.is_legal(mv) {
                    return (false, "illegal move".to_string());
                }
                self.board = Ultimate.next_state(&self.board, mv);
                (true, String::new())
            }

            "genmove" => match decide(&Ultimate, &self.board, &self.config, &mut self.rng) {
                Ok(mv) => {
                    info!("engine plays {mv}");
                    self.board = Ultimate.next_state(&self.board, mv);
                    (true, mv.to_string())
                }
                Err(e) => (false, e.to_string()),
            },

            _ => (false, format!("unknown command: {command}")),
        }
    }
}
