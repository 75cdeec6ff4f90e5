use std::collections::{HashSet, VecDeque};

use rand::prelude::IndexedRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::grid::{Grid, Point};
use crate::view::{BoardView, CellView};

/// Errors a board command can produce. Inert commands (revealing a flagged
/// or already-revealed cell, flagging a revealed cell, any command after the
/// game has ended) are not errors; they are silent no-ops.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("coordinate {at} is outside the {rows}x{cols} board")]
    OutOfBounds { at: Point, rows: usize, cols: usize },

    #[error("board must have at least one row and one column")]
    InvalidDimensions,

    #[error("{mine_count} mines do not fit on a {rows}x{cols} board with a mine-free opening")]
    TooManyMines {
        rows: usize,
        cols: usize,
        mine_count: usize,
    },

    #[error("{mine_count} mines cannot be placed outside the opening around {at}")]
    UnplaceableMines { at: Point, mine_count: usize },
}

/// Tracks the current status of the game. The only transitions are
/// `InProgress -> Won` and `InProgress -> Lost`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    InProgress,
    Won,
    Lost,
}

/// Mine layout phase. Mines are placed lazily, on the first reveal, so the
/// opening cell and its neighbors can be kept mine-free.
#[derive(Debug, Clone)]
enum Phase {
    Unplaced,
    Placed {
        /// Ground-truth mine positions.
        mines: HashSet<Point>,
        /// Adjacent-mine count for every non-mine cell.
        counts: Vec<Vec<u8>>,
    },
}

/// The board engine: a deterministic state machine over a fixed grid.
///
/// Owns the mine layout, per-cell revealed/flagged status, adjacency counts,
/// and the game outcome. The only mutation paths are [`Board::reveal`],
/// [`Board::toggle_flag`], and [`Board::reset`]; everything else is
/// read-only. Mutation is synchronous and in-place; callers wanting parallel
/// playouts use one `Board` per game.
#[derive(Debug, Clone)]
pub struct Board {
    grid: Grid,
    mine_count: usize,
    phase: Phase,
    revealed: Vec<Vec<bool>>,
    flagged: Vec<Vec<bool>>,
    outcome: Outcome,
    rng: ChaCha8Rng,
}

impl Board {
    /// Creates a board with an entropy-derived placement seed.
    pub fn new(rows: usize, cols: usize, mine_count: usize) -> Result<Self, BoardError> {
        Self::with_seed(rows, cols, mine_count, rand::rng().random())
    }

    /// Creates a board whose mine placement is fully determined by `seed`.
    ///
    /// Rejects empty dimensions, and mine counts that could not coexist with
    /// even the smallest possible first-reveal opening (a corner click).
    /// Whether a *specific* first reveal leaves enough room is only known at
    /// [`Board::reveal`] time, which re-checks before placing.
    pub fn with_seed(
        rows: usize,
        cols: usize,
        mine_count: usize,
        seed: u64,
    ) -> Result<Self, BoardError> {
        if rows == 0 || cols == 0 {
            return Err(BoardError::InvalidDimensions);
        }
        let grid = Grid::new(rows, cols);
        let corner_zone = 1 + grid.neighbors(Point { row: 0, col: 0 }).count();
        if mine_count + corner_zone > grid.cell_count() {
            return Err(BoardError::TooManyMines {
                rows,
                cols,
                mine_count,
            });
        }
        Ok(Board {
            grid,
            mine_count,
            phase: Phase::Unplaced,
            revealed: vec![vec![false; cols]; rows],
            flagged: vec![vec![false; cols]; rows],
            outcome: Outcome::InProgress,
            rng: ChaCha8Rng::seed_from_u64(seed),
        })
    }

    /// Creates a board with an explicit mine layout, for deterministic tests
    /// and replays. Mines are placed eagerly, so the first reveal carries no
    /// safe-opening guarantee.
    pub fn with_mines(
        rows: usize,
        cols: usize,
        mines: HashSet<Point>,
    ) -> Result<Self, BoardError> {
        if rows == 0 || cols == 0 {
            return Err(BoardError::InvalidDimensions);
        }
        let grid = Grid::new(rows, cols);
        if let Some(&at) = mines.iter().find(|at| !grid.contains(**at)) {
            return Err(BoardError::OutOfBounds { at, rows, cols });
        }
        if mines.len() >= grid.cell_count() {
            return Err(BoardError::TooManyMines {
                rows,
                cols,
                mine_count: mines.len(),
            });
        }
        let mine_count = mines.len();
        let counts = Self::adjacency_counts(grid, &mines);
        Ok(Board {
            grid,
            mine_count,
            phase: Phase::Placed { mines, counts },
            revealed: vec![vec![false; cols]; rows],
            flagged: vec![vec![false; cols]; rows],
            outcome: Outcome::InProgress,
            rng: ChaCha8Rng::seed_from_u64(0),
        })
    }

    pub fn rows(&self) -> usize {
        self.grid.rows()
    }

    pub fn cols(&self) -> usize {
        self.grid.cols()
    }

    pub fn mine_count(&self) -> usize {
        self.mine_count
    }

    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    pub fn is_revealed(&self, at: Point) -> bool {
        self.revealed[at.row][at.col]
    }

    pub fn is_flagged(&self, at: Point) -> bool {
        self.flagged[at.row][at.col]
    }

    /// The adjacent-mine count of a cell. `None` before mines are placed and
    /// for mine cells, where the count is meaningless.
    pub fn adjacent_count(&self, at: Point) -> Option<u8> {
        match &self.phase {
            Phase::Unplaced => None,
            Phase::Placed { mines, counts } => {
                (!mines.contains(&at)).then(|| counts[at.row][at.col])
            }
        }
    }

    /// Whether a cell is a mine. Hidden (`None`) until the game has ended;
    /// a display layer uses this for its end-of-game full reveal.
    pub fn is_mine(&self, at: Point) -> Option<bool> {
        match (&self.phase, self.outcome) {
            (Phase::Placed { mines, .. }, Outcome::Won | Outcome::Lost) => {
                Some(mines.contains(&at))
            }
            _ => None,
        }
    }

    /// Reveals a cell.
    ///
    /// The first reveal of a game places the mines, keeping the revealed
    /// cell and its neighbors mine-free. Revealing a mine loses the game
    /// with no cascade. Revealing a zero-count cell flood-fills its entire
    /// connected zero region plus the numbered border around it.
    ///
    /// Silently a no-op when the game is over or the target is flagged or
    /// already revealed, so rapid duplicate input never corrupts state.
    pub fn reveal(&mut self, at: Point) -> Result<(), BoardError> {
        self.check_bounds(at)?;
        if self.outcome != Outcome::InProgress
            || self.flagged[at.row][at.col]
            || self.revealed[at.row][at.col]
        {
            return Ok(());
        }

        if matches!(self.phase, Phase::Unplaced) {
            self.place_mines(at)?;
        }
        let Phase::Placed { mines, counts } = &self.phase else {
            unreachable!("mines are placed above")
        };

        if mines.contains(&at) {
            self.revealed[at.row][at.col] = true;
            self.outcome = Outcome::Lost;
            return Ok(());
        }

        // Iterative flood fill over an explicit worklist: zero-count cells
        // propagate to their unrevealed, unflagged neighbors; numbered cells
        // are revealed without propagating.
        let mut queue = VecDeque::from([at]);
        while let Some(cur) = queue.pop_front() {
            if self.revealed[cur.row][cur.col] {
                continue;
            }
            self.revealed[cur.row][cur.col] = true;

            if counts[cur.row][cur.col] == 0 {
                for neighbor in self.grid.neighbors(cur) {
                    if !self.revealed[neighbor.row][neighbor.col]
                        && !self.flagged[neighbor.row][neighbor.col]
                    {
                        queue.push_back(neighbor);
                    }
                }
            }
        }

        self.check_victory();
        Ok(())
    }

    /// Toggles the flag on an unrevealed cell. A no-op when the game is over
    /// or the cell is already revealed, so a cell is never both flagged and
    /// revealed.
    pub fn toggle_flag(&mut self, at: Point) -> Result<(), BoardError> {
        self.check_bounds(at)?;
        if self.outcome != Outcome::InProgress || self.revealed[at.row][at.col] {
            return Ok(());
        }
        self.flagged[at.row][at.col] = !self.flagged[at.row][at.col];
        // Victory is re-evaluated after every mutation; the check is
        // idempotent.
        self.check_victory();
        Ok(())
    }

    /// Discards all state and returns to the lazy pre-placement condition.
    /// The replacement board continues this board's RNG stream, so seeded
    /// games stay reproducible across resets.
    pub fn reset(
        &mut self,
        rows: usize,
        cols: usize,
        mine_count: usize,
    ) -> Result<(), BoardError> {
        let seed = self.rng.random();
        *self = Board::with_seed(rows, cols, mine_count, seed)?;
        Ok(())
    }

    /// Projects the board into the player-visible symbol alphabet.
    /// A fresh snapshot is produced on every call; nothing is cached.
    pub fn view(&self) -> BoardView {
        let cells = (0..self.grid.rows())
            .map(|row| {
                (0..self.grid.cols())
                    .map(|col| self.classify(Point { row, col }))
                    .collect()
            })
            .collect();
        BoardView::new(cells)
    }

    fn classify(&self, at: Point) -> CellView {
        if self.flagged[at.row][at.col] {
            return CellView::Flagged;
        }
        if !self.revealed[at.row][at.col] {
            return CellView::Unseen;
        }
        match &self.phase {
            // A cell cannot be revealed before mines are placed.
            Phase::Unplaced => CellView::Unseen,
            Phase::Placed { mines, counts } => {
                if mines.contains(&at) {
                    CellView::Mine
                } else {
                    CellView::Count(counts[at.row][at.col])
                }
            }
        }
    }

    /// Places exactly `mine_count` mines uniformly at random among all cells
    /// outside the opening (the first-revealed cell and its neighbors), then
    /// computes every non-mine cell's adjacency count.
    ///
    /// Rejects the placement, leaving the board untouched, when the opening
    /// leaves fewer free cells than mines to place.
    fn place_mines(&mut self, safe: Point) -> Result<(), BoardError> {
        let opening: HashSet<Point> = std::iter::once(safe)
            .chain(self.grid.neighbors(safe))
            .collect();
        let available: Vec<Point> = self
            .grid
            .points()
            .filter(|at| !opening.contains(at))
            .collect();
        if self.mine_count > available.len() {
            return Err(BoardError::UnplaceableMines {
                at: safe,
                mine_count: self.mine_count,
            });
        }

        let mines: HashSet<Point> = available
            .choose_multiple(&mut self.rng, self.mine_count)
            .copied()
            .collect();
        let counts = Self::adjacency_counts(self.grid, &mines);
        self.phase = Phase::Placed { mines, counts };
        Ok(())
    }

    fn adjacency_counts(grid: Grid, mines: &HashSet<Point>) -> Vec<Vec<u8>> {
        let mut counts = vec![vec![0u8; grid.cols()]; grid.rows()];
        for at in grid.points() {
            if mines.contains(&at) {
                continue;
            }
            counts[at.row][at.col] =
                grid.neighbors(at).filter(|n| mines.contains(n)).count() as u8;
        }
        counts
    }

    /// All non-mine cells revealed wins the game, regardless of where flags
    /// sit. Terminal outcomes are never re-entered.
    fn check_victory(&mut self) {
        if self.outcome != Outcome::InProgress {
            return;
        }
        let revealed = self.revealed.iter().flatten().filter(|&&r| r).count();
        if revealed == self.grid.cell_count() - self.mine_count {
            self.outcome = Outcome::Won;
        }
    }

    fn check_bounds(&self, at: Point) -> Result<(), BoardError> {
        if self.grid.contains(at) {
            Ok(())
        } else {
            Err(BoardError::OutOfBounds {
                at,
                rows: self.grid.rows(),
                cols: self.grid.cols(),
            })
        }
    }
}
