//! Implementation of the game rules over a 64-tile board.

pub mod board;
pub mod core;
pub mod error;
pub mod movegen;
pub mod square_set;
