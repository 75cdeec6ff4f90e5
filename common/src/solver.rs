use crate::grid::{Grid, Point};
use crate::view::{BoardView, CellView};

/// The kind of move the solver proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Action {
    Reveal,
    Flag,
}

/// One solver move: apply `action` to every coordinate in `targets`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Deduction {
    pub action: Action,
    pub targets: Vec<Point>,
}

/// The board is fully resolved: no unseen cell is left anywhere, so there is
/// nothing for the solver to decide. A signaled, recoverable condition, not
/// a crash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("no unseen cells are left to reveal or flag")]
pub struct NoMovesAvailable;

/// Deduces one move from a classified view.
///
/// A single row-major scan over the revealed numbered cells, first match
/// wins. For a cell showing `N` with `F` flagged neighbors and a non-empty
/// set `U` of unseen neighbors:
///
/// - `F == N`: every mine the clue demands is already flagged, so the rest
///   of `U` is provably safe and is revealed.
/// - `N - F == |U|`: every remaining unseen neighbor is provably a mine and
///   is flagged.
///
/// Only single-clue constraints are used; information from overlapping
/// number cells is never combined, so the scan is intentionally incomplete.
/// When no clue yields a certain move, the fallback is a blind reveal of the
/// last unseen cell met in scan order. With no unseen cell anywhere, the
/// scan fails with [`NoMovesAvailable`].
pub fn deduce(view: &BoardView) -> Result<Deduction, NoMovesAvailable> {
    let grid = Grid::new(view.rows(), view.cols());
    let mut fallback = None;

    for (at, symbol) in view.iter() {
        match symbol {
            CellView::Unseen => fallback = Some(at),
            CellView::Count(count) => {
                let mut flagged = 0;
                let mut unseen = Vec::new();
                for neighbor in grid.neighbors(at) {
                    match view.at(neighbor) {
                        CellView::Flagged => flagged += 1,
                        CellView::Unseen => unseen.push(neighbor),
                        CellView::Mine | CellView::Count(_) => {}
                    }
                }
                if unseen.is_empty() {
                    continue;
                }
                if flagged == usize::from(count) {
                    return Ok(Deduction {
                        action: Action::Reveal,
                        targets: unseen,
                    });
                }
                // Compared as N == F + |U| so an over-flagged clue cannot
                // underflow.
                if flagged + unseen.len() == usize::from(count) {
                    return Ok(Deduction {
                        action: Action::Flag,
                        targets: unseen,
                    });
                }
            }
            // Flags and revealed mines never trigger a check.
            CellView::Flagged | CellView::Mine => {}
        }
    }

    match fallback {
        Some(at) => Ok(Deduction {
            action: Action::Reveal,
            targets: vec![at],
        }),
        None => Err(NoMovesAvailable),
    }
}
