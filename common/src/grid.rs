use std::fmt;

use itertools::Itertools;

/// A 2D coordinate on the minesweeper board: `(row, col)`, 0-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Point {
    pub row: usize,
    pub col: usize,
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// The fixed coordinate space of a board. Immutable once a board is sized;
/// carries no cell state of its own beyond the dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grid {
    rows: usize,
    cols: usize,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Grid { rows, cols }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Total number of cells on the grid.
    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    pub fn contains(&self, at: Point) -> bool {
        at.row < self.rows && at.col < self.cols
    }

    /// All coordinates of the grid in row-major order.
    pub fn points(&self) -> impl Iterator<Item = Point> {
        (0..self.rows)
            .cartesian_product(0..self.cols)
            .map(|(row, col)| Point { row, col })
    }

    /// The up-to-8 in-bounds neighbors of a cell.
    /// It correctly handles board edges and corners.
    pub fn neighbors(&self, at: Point) -> impl Iterator<Item = Point> {
        let rows = self.rows;
        let cols = self.cols;

        (-1..=1).flat_map(move |dr: isize| {
            (-1..=1).filter_map(move |dc: isize| {
                // Skip the center cell itself (dr=0, dc=0)
                if dr == 0 && dc == 0 {
                    return None;
                }

                let nr = at.row as isize + dr;
                let nc = at.col as isize + dc;

                if nr >= 0 && nr < rows as isize && nc >= 0 && nc < cols as isize {
                    Some(Point {
                        row: nr as usize,
                        col: nc as usize,
                    })
                } else {
                    None
                }
            })
        })
    }
}
