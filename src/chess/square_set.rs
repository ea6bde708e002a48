//! [`SquareSet`] is the result type of every destination query. It packs the
//! 64 squares into the bits of a single [u64], so that cloning and comparing
//! destination sets is trivial.
//!
//! Bit `i` corresponds to the square with [`Square::index`] `i`, i.e. the
//! least significant bit is a8 and the most significant one is h1.

use std::fmt;

use itertools::Itertools;

use crate::chess::core::{Square, BOARD_SIZE, BOARD_WIDTH};

/// An unordered set of board squares. Iteration yields squares in tile order.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct SquareSet {
    bits: u64,
}

impl SquareSet {
    /// Constructs an empty set of squares.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bits: 0 }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn contains(self, square: Square) -> bool {
        (self.bits & (1u64 << square.index())) != 0
    }

    #[allow(missing_docs)]
    pub fn insert(&mut self, square: Square) {
        self.bits |= 1u64 << square.index();
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn len(self) -> usize {
        self.bits.count_ones() as usize
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.bits == 0
    }

    /// An efficient way to iterate over the set squares.
    #[must_use]
    pub const fn iter(self) -> SquareSetIterator {
        SquareSetIterator { bits: self.bits }
    }
}

impl FromIterator<Square> for SquareSet {
    fn from_iter<T: IntoIterator<Item = Square>>(iter: T) -> Self {
        let mut result = Self::empty();
        for square in iter {
            result.insert(square);
        }
        result
    }
}

impl IntoIterator for SquareSet {
    type IntoIter = SquareSetIterator;
    type Item = Square;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

const LINE_SEPARATOR: &str = "\n";
const SQUARE_SEPARATOR: &str = " ";

impl fmt::Debug for SquareSet {
    /// Draws the set as an 8x8 grid with rank 8 on top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let grid = (0..BOARD_SIZE)
            .map(|bit| {
                if self.bits & (1u64 << bit) == 0 {
                    '.'
                } else {
                    '1'
                }
            })
            .chunks(BOARD_WIDTH as usize)
            .into_iter()
            .map(|mut row| row.join(SQUARE_SEPARATOR))
            .join(LINE_SEPARATOR);
        f.write_str(&grid)
    }
}

impl fmt::Display for SquareSet {
    /// Lists the squares in algebraic notation, separated by spaces.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.iter().join(SQUARE_SEPARATOR))
    }
}

/// Iterates over set squares in tile order.
pub struct SquareSetIterator {
    bits: u64,
}

impl Iterator for SquareSetIterator {
    type Item = Square;

    fn next(&mut self) -> Option<Self::Item> {
        if self.bits == 0 {
            return None;
        }
        let next_index = self.bits.trailing_zeros() as usize;
        // Clear the least significant set bit.
        self.bits &= self.bits - 1;
        Square::from_index(next_index).ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.bits.count_ones() as usize;
        (len, Some(len))
    }
}

impl ExactSizeIterator for SquareSetIterator {}
