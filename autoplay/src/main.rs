//! Autonomous minesweeper driver.
//!
//! Plays one or more complete games: each turn classifies the board, asks
//! the solver for a move, and applies it, until the game is won, lost, or
//! fully resolved. With `--log-steps`, every solver step is emitted as one
//! JSON record per line on stdout for downstream telemetry consumers; the
//! core itself persists nothing.

use anyhow::Context;
use clap::Parser;
use minesweeper::{deduce, Action, Board, BoardView, CellView, Deduction, Outcome, Point};
use serde::Serialize;
use tracing::{debug, info, warn};

#[derive(Parser)]
#[command(name = "autoplay")]
#[command(about = "Autonomous minesweeper player driven by the constraint solver")]
struct Args {
    /// Number of games to play
    #[arg(short, long, default_value = "1")]
    games: u32,

    /// Board rows
    #[arg(long, default_value = "20")]
    rows: usize,

    /// Board columns
    #[arg(long, default_value = "20")]
    cols: usize,

    /// Number of mines
    #[arg(long, default_value = "80")]
    mines: usize,

    /// Placement seed for deterministic runs; game `i` plays with `seed + i`
    #[arg(long)]
    seed: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Print the board after every move
    #[arg(long)]
    show_boards: bool,

    /// Emit one JSON step record per line on stdout
    #[arg(long)]
    log_steps: bool,
}

/// One solver step, in the shape the telemetry layer consumes: the
/// classified board *before* the move, the chosen move, and how it went.
#[derive(Serialize)]
struct StepRecord<'a> {
    game: u32,
    step: u32,
    board: &'a BoardView,
    deduction: Option<&'a Deduction>,
    ok: bool,
    error: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut won = 0u32;
    let mut lost = 0u32;

    for game in 0..args.games {
        let mut board = match args.seed {
            Some(seed) => {
                Board::with_seed(args.rows, args.cols, args.mines, seed + u64::from(game))
            }
            None => Board::new(args.rows, args.cols, args.mines),
        }
        .context("invalid board configuration")?;

        match play(&mut board, game, &args)? {
            Outcome::Won => won += 1,
            Outcome::Lost => lost += 1,
            Outcome::InProgress => warn!(game, "game stopped without a result"),
        }
    }

    info!(games = args.games, won, lost, "finished");
    Ok(())
}

/// Plays a single game to completion, one solver move per turn.
fn play(board: &mut Board, game: u32, args: &Args) -> anyhow::Result<Outcome> {
    let mut step = 0u32;

    while board.outcome() == Outcome::InProgress {
        let view = board.view();

        match deduce(&view) {
            Ok(deduction) => {
                debug!(
                    game,
                    step,
                    action = ?deduction.action,
                    targets = deduction.targets.len(),
                    "applying move"
                );
                for &at in &deduction.targets {
                    match deduction.action {
                        Action::Reveal => board.reveal(at)?,
                        Action::Flag => board.toggle_flag(at)?,
                    }
                }
                if args.log_steps {
                    emit(&StepRecord {
                        game,
                        step,
                        board: &view,
                        deduction: Some(&deduction),
                        ok: true,
                        error: None,
                    })?;
                }
            }
            Err(err) => {
                // Fully resolved: nothing left for the solver to decide.
                if args.log_steps {
                    emit(&StepRecord {
                        game,
                        step,
                        board: &view,
                        deduction: None,
                        ok: false,
                        error: Some(err.to_string()),
                    })?;
                }
                warn!(game, step, "solver exhausted: {err}");
                break;
            }
        }

        if args.show_boards {
            print_board(&board.view());
        }
        step += 1;
    }

    info!(game, steps = step, outcome = ?board.outcome(), "game over");
    Ok(board.outcome())
}

fn emit(record: &StepRecord<'_>) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string(record)?);
    Ok(())
}

fn print_board(view: &BoardView) {
    // Print header
    print!("   ");
    for col in 0..view.cols() {
        print!("{:^3}", col);
    }
    println!("\n  +{}", "---".repeat(view.cols()));

    // Print rows
    for row in 0..view.rows() {
        print!("{:^2}|", row);
        for col in 0..view.cols() {
            let display = match view.at(Point { row, col }) {
                CellView::Unseen => " ■ ".to_string(),
                CellView::Flagged => " F ".to_string(),
                CellView::Mine => " * ".to_string(),
                CellView::Count(n) => format!(" {n} "),
            };
            print!("{display}");
        }
        println!();
    }
    println!();
}
