//! Errors reported by the board model and the move engine.

use thiserror::Error;

use crate::chess::core::Square;

/// Everything that can go wrong while querying or mutating a
/// [`crate::chess::board::Board`].
///
/// None of the variants is raised for "no piece at square": every square
/// always holds a [`crate::chess::core::Piece`] value, the empty one included.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// The coordinate is outside of the 8x8 grid. This is a caller bug and
    /// should be prevented by input validation at the boundary.
    #[error("coordinate ({file}, {rank}) is outside of the board")]
    OutOfBounds {
        #[allow(missing_docs)]
        file: i8,
        #[allow(missing_docs)]
        rank: i8,
    },

    /// Serialized board is not exactly 64 known symbols. The board is never
    /// partially populated when this is returned.
    #[error("malformed layout: {0}")]
    MalformedLayout(String),

    /// The requested destination is not among the legal destinations of the
    /// piece. The board is left untouched.
    #[error("illegal move: {from} to {to}")]
    IllegalMove {
        #[allow(missing_docs)]
        from: Square,
        #[allow(missing_docs)]
        to: Square,
    },

    /// Text input could not be read as an algebraic square or move.
    #[error("square should be a file within 'a'..='h' followed by a rank within '1'..='8', got '{0}'")]
    UnknownSquare(String),
}

/// Shorthand for results carrying [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
