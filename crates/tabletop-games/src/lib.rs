//! Built-in games for Tabletop.
//!
//! Each game is a [`RuleAdapter`](tabletop_engine::RuleAdapter): register
//! it in a `GameCatalog` under whatever key clients should use.
//!
//! - [`TicTacToe`]: two seats, strict turns
//! - [`Othello`]: two seats, strict turns, extra turn when the opponent
//!   is stuck
//! - [`Minesweeper`]: any number of seats, anyone may click

mod minesweeper;
mod othello;
mod tictactoe;

pub use minesweeper::{CellState, Minefield, Minesweeper, MinesweeperConfig, Sweep};
pub use othello::{Disc, Othello, OthelloBoard};
pub use tictactoe::{Mark, TicTacToe, TicTacToeBoard};
