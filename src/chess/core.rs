//! Chess primitives commonly used within [`crate::chess`].

use std::fmt::{self, Write};

use itertools::Itertools;

use crate::chess::error::{Error, Result};

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// A point on the unbounded lattice around the board. Candidate moves are
/// produced as coordinates first and only become [`Square`]s after the
/// out-of-bounds ones are pruned.
///
/// ```
/// use tilechess::chess::core::{Coordinate, Square};
///
/// let knight_jump = Coordinate::new(2, 1).shift(-2, -1);
/// assert_eq!(knight_jump, Coordinate::new(0, 0));
/// assert!(Square::try_from(knight_jump).is_err());
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Coordinate {
    #[allow(missing_docs)]
    pub file: i8,
    #[allow(missing_docs)]
    pub rank: i8,
}

impl Coordinate {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(file: i8, rank: i8) -> Self {
        Self { file, rank }
    }

    /// Moves the coordinate by the given file and rank deltas. The result is
    /// not required to be on the board.
    #[must_use]
    pub const fn shift(self, file_delta: i8, rank_delta: i8) -> Self {
        Self::new(self.file + file_delta, self.rank + rank_delta)
    }

    /// Returns true if the coordinate lies within `[1, 8] x [1, 8]`.
    #[must_use]
    pub const fn is_on_board(self) -> bool {
        self.file >= 1
            && self.file <= BOARD_WIDTH as i8
            && self.rank >= 1
            && self.rank <= BOARD_WIDTH as i8
    }
}

impl From<(i8, i8)> for Coordinate {
    fn from((file, rank): (i8, i8)) -> Self {
        Self::new(file, rank)
    }
}

impl From<Square> for Coordinate {
    fn from(square: Square) -> Self {
        square.coordinate()
    }
}

/// A validated board square: file (column) and rank (row), both 1-indexed.
///
/// File 1 is the a-file and rank 1 is White's back rank, so `(5, 2)` is `e2`.
/// White pawns advance toward increasing ranks.
///
/// ```
/// use tilechess::chess::core::Square;
///
/// let square = Square::new(5, 2).unwrap();
/// assert_eq!(square.to_string(), "e2");
/// assert_eq!(Square::try_from("e2").unwrap(), square);
/// assert!(Square::new(0, 3).is_err());
/// ```
///
/// The board is stored in "tile order": row-major, starting from the a8
/// corner (rank 8 files a..h, then rank 7 and so on down to rank 1).
///
/// ```
/// use tilechess::chess::core::Square;
///
/// assert_eq!(Square::try_from("a8").unwrap().index(), 0);
/// assert_eq!(Square::try_from("h8").unwrap().index(), 7);
/// assert_eq!(Square::try_from("a1").unwrap().index(), 56);
/// assert_eq!(Square::try_from("h1").unwrap().index(), 63);
/// ```
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Square {
    file: u8,
    rank: u8,
}

impl Square {
    /// Connects file (column) and rank (row) to form a full square.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if either coordinate is outside `[1, 8]`.
    pub fn new(file: i8, rank: i8) -> Result<Self> {
        if Coordinate::new(file, rank).is_on_board() {
            Ok(Self {
                file: file as u8,
                rank: rank as u8,
            })
        } else {
            Err(Error::OutOfBounds { file, rank })
        }
    }

    /// Builds a square from coordinates known to be on the board.
    pub(crate) const fn at(file: u8, rank: u8) -> Self {
        debug_assert!(file >= 1 && file <= BOARD_WIDTH && rank >= 1 && rank <= BOARD_WIDTH);
        Self { file, rank }
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> u8 {
        self.file
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> u8 {
        self.rank
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn coordinate(self) -> Coordinate {
        Coordinate::new(self.file as i8, self.rank as i8)
    }

    /// Position of the square in tile order.
    #[must_use]
    pub const fn index(self) -> usize {
        (BOARD_WIDTH - self.rank) as usize * BOARD_WIDTH as usize + (self.file - 1) as usize
    }

    /// Inverse of [`Square::index`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] for indices beyond the 64 tiles.
    pub fn from_index(index: usize) -> Result<Self> {
        if index >= BOARD_SIZE as usize {
            return Err(Error::OutOfBounds {
                file: i8::MAX,
                rank: i8::MAX,
            });
        }
        let width = BOARD_WIDTH as usize;
        // Both values are within 1..=8 here.
        Ok(Self {
            file: (index % width) as u8 + 1,
            rank: BOARD_WIDTH - (index / width) as u8,
        })
    }

    /// All 64 squares in tile order.
    pub fn iter() -> impl Iterator<Item = Self> {
        (1..=BOARD_WIDTH).rev().flat_map(|rank| {
            (1..=BOARD_WIDTH).map(move |file| Self { file, rank })
        })
    }

    /// Squares strictly between two squares of the same rank.
    pub(crate) fn between_on_rank(self, other: Self) -> impl Iterator<Item = Self> {
        debug_assert_eq!(self.rank, other.rank);
        let (low, high) = if self.file < other.file {
            (self.file, other.file)
        } else {
            (other.file, self.file)
        };
        let rank = self.rank;
        (low + 1..high).map(move |file| Self { file, rank })
    }
}

impl TryFrom<Coordinate> for Square {
    type Error = Error;

    fn try_from(coordinate: Coordinate) -> Result<Self> {
        Self::new(coordinate.file, coordinate.rank)
    }
}

impl TryFrom<&str> for Square {
    type Error = Error;

    /// Parses algebraic notation, e.g. `e2`.
    fn try_from(square: &str) -> Result<Self> {
        let unknown = || Error::UnknownSquare(square.to_string());
        let (file, rank) = square
            .chars()
            .collect_tuple::<(char, char)>()
            .ok_or_else(unknown)?;
        if !('a'..='h').contains(&file) || !('1'..='8').contains(&rank) {
            return Err(unknown());
        }
        Self::new(
            (file as u8 - b'a') as i8 + 1,
            (rank as u8 - b'1') as i8 + 1,
        )
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + self.file - 1) as char)?;
        write!(f, "{}", self.rank)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Rank delta of a single pawn step.
    #[must_use]
    pub const fn push_direction(self) -> i8 {
        match self {
            Self::White => 1,
            Self::Black => -1,
        }
    }

    /// The rank where the player's king and rooks start.
    #[must_use]
    pub const fn backrank(self) -> u8 {
        match self {
            Self::White => 1,
            Self::Black => BOARD_WIDTH,
        }
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" | "white" => Ok(Self::White),
            "b" | "black" => Ok(Self::Black),
            _ => anyhow::bail!("player should be 'white' or 'black', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::White => "white",
            Self::Black => "black",
        })
    }
}

/// Color of a tile occupant. [`Color::Neutral`] belongs to empty tiles only.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    White,
    Black,
    Neutral,
}

impl Color {
    /// The player owning pieces of this color, if any.
    #[must_use]
    pub const fn player(self) -> Option<Player> {
        match self {
            Self::White => Some(Player::White),
            Self::Black => Some(Player::Black),
            Self::Neutral => None,
        }
    }
}

impl From<Player> for Color {
    fn from(player: Player) -> Self {
        match player {
            Player::White => Self::White,
            Player::Black => Self::Black,
        }
    }
}

/// Standard [chess pieces] and the explicit placeholder for an empty tile.
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Rook,
    Knight,
    Bishop,
    Queen,
    King,
    Pawn,
    Empty,
}

/// Occupant of a square. Every square always holds one: empty squares hold
/// [`Piece::EMPTY`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    color: Color,
    has_moved: bool,
}

impl Piece {
    /// Placeholder for an empty tile.
    pub const EMPTY: Self = Self {
        kind: PieceKind::Empty,
        color: Color::Neutral,
        has_moved: false,
    };

    /// Creates an unmoved piece. [`PieceKind::Empty`] always produces
    /// [`Piece::EMPTY`] regardless of the owner.
    #[must_use]
    pub const fn new(kind: PieceKind, owner: Player) -> Self {
        if matches!(kind, PieceKind::Empty) {
            return Self::EMPTY;
        }
        Self {
            kind,
            color: match owner {
                Player::White => Color::White,
                Player::Black => Color::Black,
            },
            has_moved: false,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn kind(self) -> PieceKind {
        self.kind
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn color(self) -> Color {
        self.color
    }

    /// True once the piece has been relocated at least once.
    #[must_use]
    pub const fn has_moved(self) -> bool {
        self.has_moved
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn owner(self) -> Option<Player> {
        self.color.player()
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self.kind, PieceKind::Empty)
    }

    /// Returns true if the piece belongs to the opponent of `player`.
    #[must_use]
    pub fn is_opponent_of(self, player: Player) -> bool {
        self.owner() == Some(player.opponent())
    }

    /// Returns a copy with the move history bit set. Empty tiles carry no
    /// history and are returned as is.
    #[must_use]
    pub const fn with_moved(self, has_moved: bool) -> Self {
        if self.is_empty() {
            return self;
        }
        Self { has_moved, ..self }
    }

    /// Tile symbol: `r k b q l p` for Black rook, knight, bishop, queen, king
    /// and pawn, uppercase for White and `~` for an empty tile.
    #[must_use]
    pub const fn symbol(self) -> char {
        let symbol = match self.kind {
            PieceKind::Rook => 'r',
            PieceKind::Knight => 'k',
            PieceKind::Bishop => 'b',
            PieceKind::Queen => 'q',
            PieceKind::King => 'l',
            PieceKind::Pawn => 'p',
            PieceKind::Empty => return '~',
        };
        match self.color {
            Color::White => symbol.to_ascii_uppercase(),
            Color::Black | Color::Neutral => symbol,
        }
    }
}

impl Default for Piece {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl TryFrom<char> for Piece {
    type Error = Error;

    fn try_from(symbol: char) -> Result<Self> {
        let kind = match symbol.to_ascii_lowercase() {
            'r' => PieceKind::Rook,
            'k' => PieceKind::Knight,
            'b' => PieceKind::Bishop,
            'q' => PieceKind::Queen,
            'l' => PieceKind::King,
            'p' => PieceKind::Pawn,
            '~' => return Ok(Self::EMPTY),
            _ => {
                return Err(Error::MalformedLayout(format!(
                    "tile symbol should be within \"rkbqlpRKBQLP~\", got '{symbol}'"
                )))
            },
        };
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        Ok(Self::new(kind, owner))
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(self.symbol())
    }
}

/// A request to relocate the piece on `from` to `to`. Castling is expressed as
/// the king's two-square move.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Move {
    #[allow(missing_docs)]
    pub from: Square,
    #[allow(missing_docs)]
    pub to: Square,
}

impl Move {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl TryFrom<&str> for Move {
    type Error = Error;

    /// Parses a move as two concatenated squares, e.g. `e2e4`.
    fn try_from(input: &str) -> Result<Self> {
        if input.len() != 4 || !input.is_ascii() {
            return Err(Error::UnknownSquare(input.to_string()));
        }
        Ok(Self::new(
            Square::try_from(&input[..2])?,
            Square::try_from(&input[2..])?,
        ))
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)
    }
}
