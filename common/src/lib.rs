//! Minesweeper board engine with a deterministic AutoPlay solver.
//!
//! [`Board`] is the game state machine. Mines are placed lazily on the
//! first reveal so the opening is always mine-free; revealing a zero-count
//! cell cascades across its whole zero region; once the outcome flips to
//! won or lost, the board ignores further commands. [`Board::view`]
//! projects the board into the player-visible [`BoardView`] snapshot,
//! restricted to what a player could see, and [`deduce`] inspects such a
//! snapshot to propose one certain move, falling back to a guess when the
//! local clues are not enough.

pub mod board;
pub mod grid;
pub mod solver;
pub mod view;

pub use board::{Board, BoardError, Outcome};
pub use grid::{Grid, Point};
pub use solver::{deduce, Action, Deduction, NoMovesAvailable};
pub use view::{BoardView, CellView};
