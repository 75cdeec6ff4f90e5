use crate::grid::Point;

/// The visible state of a single cell, as a player would see it.
/// This restricted alphabet is the only information the solver (or any
/// external move predictor) may consume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CellView {
    /// Not yet revealed and not flagged.
    Unseen,
    /// Flagged by the player.
    Flagged,
    /// A revealed mine. Only present once the game has been lost.
    Mine,
    /// A revealed cell with its adjacent mine count (0..=8).
    Count(u8),
}

/// A read-only snapshot of the whole board in [`CellView`] symbols.
///
/// Produced on demand by [`Board::view`](crate::Board::view). The snapshot
/// holds no reference back to the board and no knowledge of hidden mine
/// positions beyond what is already visible.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct BoardView {
    rows: usize,
    cols: usize,
    cells: Vec<Vec<CellView>>,
}

impl BoardView {
    /// Wraps a rectangular grid of symbols.
    ///
    /// Panics if the rows are ragged or the grid is empty; snapshots are
    /// always produced from a sized board.
    pub fn new(cells: Vec<Vec<CellView>>) -> Self {
        let rows = cells.len();
        let cols = cells.first().map_or(0, Vec::len);
        assert!(
            rows > 0 && cols > 0 && cells.iter().all(|row| row.len() == cols),
            "snapshot must be a non-empty rectangle"
        );
        BoardView { rows, cols, cells }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The symbol at a coordinate. Panics if out of bounds.
    pub fn at(&self, at: Point) -> CellView {
        self.cells[at.row][at.col]
    }

    /// All cells with their coordinates, in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, CellView)> {
        self.cells.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, &cell)| (Point { row, col }, cell))
        })
    }
}
