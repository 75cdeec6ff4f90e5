//! Whole-game properties: random command sequences checked against the
//! board invariants, and solver-driven playouts checked against a known
//! mine layout.

use std::collections::HashSet;

use minesweeper::{deduce, Action, Board, Deduction, Grid, NoMovesAvailable, Outcome, Point};
use proptest::prelude::*;

fn p(row: usize, col: usize) -> Point {
    Point { row, col }
}

/// Applies one deduction to the board.
fn apply(board: &mut Board, deduction: &Deduction) {
    for &at in &deduction.targets {
        match deduction.action {
            Action::Reveal => board.reveal(at).unwrap(),
            Action::Flag => board.toggle_flag(at).unwrap(),
        }
    }
}

proptest! {
    /// Random reveal/flag sequences never break the board invariants:
    /// reveals are monotonic, no cell is ever flagged and revealed at once,
    /// winning requires exactly the full non-mine cell count, and a
    /// finished board ignores further commands.
    #[test]
    fn prop_board_invariants_under_random_play(
        seed in any::<u64>(),
        ops in prop::collection::vec((any::<bool>(), 0..5usize, 0..5usize), 1..80),
    ) {
        let grid = Grid::new(5, 5);
        let mut board = Board::with_seed(5, 5, 5, seed).unwrap();
        let mut previously_revealed: HashSet<Point> = HashSet::new();

        for (is_flag, row, col) in ops {
            let at = p(row, col);
            let outcome_before = board.outcome();
            let view_before = board.view();

            if is_flag {
                board.toggle_flag(at).unwrap();
            } else {
                board.reveal(at).unwrap();
            }

            if outcome_before != Outcome::InProgress {
                prop_assert_eq!(board.outcome(), outcome_before);
                prop_assert_eq!(board.view(), view_before);
            }

            let revealed: HashSet<Point> =
                grid.points().filter(|&at| board.is_revealed(at)).collect();
            prop_assert!(revealed.is_superset(&previously_revealed));

            for at in grid.points() {
                prop_assert!(!(board.is_revealed(at) && board.is_flagged(at)));
            }

            let safe_cells = grid.cell_count() - board.mine_count();
            match board.outcome() {
                Outcome::Won => prop_assert_eq!(revealed.len(), safe_cells),
                Outcome::InProgress => prop_assert!(revealed.len() < safe_cells),
                // The tripped mine is revealed too, so no count claim holds.
                Outcome::Lost => {}
            }

            previously_revealed = revealed;
        }

        // Ground truth is disclosed once the game has ended; it must hold
        // exactly mine_count mines.
        if board.outcome() != Outcome::InProgress {
            let mines = grid
                .points()
                .filter(|&at| board.is_mine(at) == Some(true))
                .count();
            prop_assert_eq!(mines, board.mine_count());
        }
    }

    /// Solver-driven playouts against injected ground truth: every flag the
    /// solver plants sits on a true mine, and every multi-target reveal
    /// (which can only come from a satisfied clue, never from the
    /// single-cell fallback guess) is mine-free.
    #[test]
    fn prop_solver_deductions_are_sound(
        mines in prop::collection::hash_set(
            (0..6usize, 0..6usize).prop_map(|(row, col)| Point { row, col }),
            1..8,
        ),
    ) {
        let mut board = Board::with_mines(6, 6, mines.clone()).unwrap();
        let mut steps = 0;

        while board.outcome() == Outcome::InProgress {
            steps += 1;
            prop_assert!(steps <= 6 * 6 * 2, "playout must terminate");

            let deduction = match deduce(&board.view()) {
                Ok(deduction) => deduction,
                Err(NoMovesAvailable) => break,
            };
            match deduction.action {
                Action::Flag => {
                    for at in &deduction.targets {
                        prop_assert!(mines.contains(at), "flagged a safe cell at {}", at);
                    }
                }
                Action::Reveal if deduction.targets.len() > 1 => {
                    for at in &deduction.targets {
                        prop_assert!(!mines.contains(at), "deduced reveal hit a mine at {}", at);
                    }
                }
                // A single-target reveal may be the fallback guess, which is
                // allowed to hit a mine and lose.
                Action::Reveal => {}
            }
            apply(&mut board, &deduction);
        }
    }
}

#[test]
fn test_autoplay_finishes_every_seeded_game() {
    for seed in 0..8u64 {
        let mut board = Board::with_seed(9, 9, 10, seed).unwrap();
        let mut steps = 0;

        while board.outcome() == Outcome::InProgress {
            steps += 1;
            assert!(steps <= 9 * 9 * 2, "autoplay must terminate (seed {seed})");
            match deduce(&board.view()) {
                Ok(deduction) => apply(&mut board, &deduction),
                Err(NoMovesAvailable) => break,
            }
        }

        // The solver never flags a safe cell, so it can only stop by
        // winning or by guessing into a mine.
        assert_ne!(
            board.outcome(),
            Outcome::InProgress,
            "game stalled on seed {seed}"
        );
    }
}

#[test]
fn test_scripted_flag_deduction_matches_ground_truth() {
    // 1x4 strip with a single mine: revealing the far end floods up to the
    // numbered border, whose clue then pins the mine exactly.
    let mines = HashSet::from([p(0, 1)]);
    let mut board = Board::with_mines(1, 4, mines).unwrap();

    board.reveal(p(0, 3)).unwrap();
    assert!(board.is_revealed(p(0, 2)));
    assert_eq!(board.outcome(), Outcome::InProgress);

    let deduction = deduce(&board.view()).unwrap();
    assert_eq!(
        deduction,
        Deduction {
            action: Action::Flag,
            targets: vec![p(0, 1)],
        }
    );
    apply(&mut board, &deduction);

    // With the mine flagged, only the blind guess at (0,0) remains, and it
    // finishes the board.
    let deduction = deduce(&board.view()).unwrap();
    assert_eq!(
        deduction,
        Deduction {
            action: Action::Reveal,
            targets: vec![p(0, 0)],
        }
    );
    apply(&mut board, &deduction);
    assert_eq!(board.outcome(), Outcome::Won);
}

#[test]
fn test_scripted_safe_reveal_deduction_matches_ground_truth() {
    // A satisfied clue (its one mine already flagged) releases its other
    // unseen neighbor as provably safe.
    let mines = HashSet::from([p(0, 1)]);
    let mut board = Board::with_mines(1, 4, mines).unwrap();

    board.toggle_flag(p(0, 1)).unwrap();
    board.reveal(p(0, 2)).unwrap();

    let deduction = deduce(&board.view()).unwrap();
    assert_eq!(
        deduction,
        Deduction {
            action: Action::Reveal,
            targets: vec![p(0, 3)],
        }
    );
    apply(&mut board, &deduction);
    assert_eq!(board.outcome(), Outcome::InProgress);

    let deduction = deduce(&board.view()).unwrap();
    assert_eq!(
        deduction,
        Deduction {
            action: Action::Reveal,
            targets: vec![p(0, 0)],
        }
    );
    apply(&mut board, &deduction);
    assert_eq!(board.outcome(), Outcome::Won);
}
