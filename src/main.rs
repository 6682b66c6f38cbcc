//! ut3-mcts: a UCB1 Monte Carlo Tree Search player for ultimate tic-tac-toe.
//!
//! ## Usage
//!
//! - `ut3-mcts` - Run the demo
//! - `ut3-mcts demo` - Search the empty board once and show the root statistics
//! - `ut3-mcts selfplay` - Play one game of the engine against itself
//! - `ut3-mcts play` - Start the text protocol on stdin/stdout

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use fastrand::Rng;
use log::info;

use ut3_mcts::config::{RolloutPolicy, SearchConfig};
use ut3_mcts::constants::{EXPLORATION, N_ITERATIONS};
use ut3_mcts::game::{Player, Rules};
use ut3_mcts::logging::setup_logging;
use ut3_mcts::mcts::{decide, tree_search};
use ut3_mcts::protocol::ProtocolEngine;
use ut3_mcts::ultimate::{Ultimate, UltimateBoard};

/// ut3-mcts: UCB1 MCTS for ultimate tic-tac-toe
#[derive(Parser)]
#[command(name = "ut3-mcts")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// MCTS iterations per move
    #[arg(long, default_value_t = N_ITERATIONS, global = true)]
    iterations: usize,

    /// UCB1 exploration constant
    #[arg(long, default_value_t = EXPLORATION, global = true)]
    exploration: f64,

    /// Rollout policy
    #[arg(long, value_enum, default_value_t = Rollout::Heuristic, global = true)]
    rollout: Rollout,

    /// Seed for the random source (random if omitted)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Log level, overridden by RUST_LOG
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    /// Write logs to rotating files in this directory instead of stderr
    #[arg(long, global = true)]
    log_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search the empty board once and print the root statistics
    Demo,
    /// Play one game of the engine against itself
    Selfplay {
        /// Rollout policy of the second player
        #[arg(long, value_enum, default_value_t = Rollout::Random)]
        opponent_rollout: Rollout,
    },
    /// Start the text protocol on stdin/stdout
    Play,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum)]
enum Rollout {
    Random,
    Heuristic,
}

impl From<Rollout> for RolloutPolicy {
    fn from(r: Rollout) -> Self {
        match r {
            Rollout::Random => RolloutPolicy::Random,
            Rollout::Heuristic => RolloutPolicy::heuristic(),
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let _logger = setup_logging(&cli.log_level, cli.log_dir.as_deref())
        .context("failed to start logger")?;

    let config = SearchConfig::default()
        .with_iterations(cli.iterations)
        .with_exploration(cli.exploration)
        .with_rollout(cli.rollout.into());
    config.validate().context("invalid command line settings")?;

    let mut rng = match cli.seed {
        Some(seed) => Rng::with_seed(seed),
        None => Rng::new(),
    };

    match cli.command {
        Some(Commands::Play) => ProtocolEngine::new(config, rng)
            .run()
            .context("protocol I/O failed"),
        Some(Commands::Selfplay { opponent_rollout }) => {
            let opponent = config.clone().with_rollout(opponent_rollout.into());
            run_selfplay(&config, &opponent, &mut rng)
        }
        Some(Commands::Demo) | None => run_demo(&config, &mut rng),
    }
}

fn run_demo(config: &SearchConfig, rng: &mut Rng) -> Result<()> {
    println!("ut3-mcts: UCB1 MCTS for ultimate tic-tac-toe\n");

    let board = UltimateBoard::new();
    println!("Running {} iterations on the empty board...", config.iterations);
    let tree = tree_search(&Ultimate, &board, config, rng).context("search failed")?;

    let mut stats = tree.root_children();
    stats.sort_by(|a, b| b.1.cmp(&a.1));
    for (mv, visits, wins) in stats.iter().take(10) {
        println!("move {mv}  visits {visits:4}  wins {wins:4}");
    }
    if let Some(best) = tree.best_action() {
        println!("Best move: {best}");
    }
    println!("Nodes in tree: {}", tree.len());
    Ok(())
}

fn run_selfplay(first: &SearchConfig, second: &SearchConfig, rng: &mut Rng) -> Result<()> {
    let mut board = UltimateBoard::new();

    while !Ultimate.is_ended(&board) {
        let player = Ultimate.current_player(&board);
        let config = match player {
            Player::One => first,
            Player::Two => second,
        };
        let mv = decide(&Ultimate, &board, config, rng)
            .with_context(|| format!("{player} could not move"))?;
        info!("{player} plays {mv}");
        board = Ultimate.next_state(&board, mv);
    }

    println!("{board}");
    let outcome = Ultimate
        .points_values(&board)
        .and_then(|p| p.winner())
        .map_or("draw".to_string(), |w| format!("{w} wins"));
    println!("Result: {outcome}");
    Ok(())
}
