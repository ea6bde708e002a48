//! The board model: 64 tiles, the side to move and the cached check status.
//!
//! [`Board`] is the only owner of game state. The move engine
//! ([`crate::chess::movegen`]) borrows it for queries and simulates candidate
//! moves on clones; the board itself is only mutated through
//! [`Board::apply_move`] and [`Board::submit_move`].
//!
//! The board serializes to a 64-character tile string, one symbol per square
//! in tile order (see [`Square::index`]). The string carries no move history,
//! side to move or check status.

use std::fmt::{self, Write};

use bitflags::bitflags;

use crate::chess::core::{
    Color,
    Coordinate,
    Piece,
    PieceKind,
    Player,
    Square,
    BOARD_SIZE,
    BOARD_WIDTH,
};
use crate::chess::error::{Error, Result};
use crate::chess::movegen;
use crate::chess::square_set::SquareSet;

/// Tile string of the standard starting position.
pub const STANDARD_LAYOUT: &str = concat!(
    "rkbqlbkr", // 8
    "pppppppp", // 7
    "~~~~~~~~", // 6
    "~~~~~~~~", // 5
    "~~~~~~~~", // 4
    "~~~~~~~~", // 3
    "PPPPPPPP", // 2
    "RKBQLBKR", // 1
);

/// File of the king's home square (the e-file).
pub const KING_HOME_FILE: u8 = 5;

/// Status of the side to move, as reported to the consumers of the board.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    Normal,
    Check,
    Checkmate,
    /// No legal moves while not in check.
    Stalemate,
}

impl GameState {
    /// Terminal states accept no further moves.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Checkmate | Self::Stalemate)
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Normal => "normal",
            Self::Check => "check",
            Self::Checkmate => "checkmate",
            Self::Stalemate => "stalemate",
        })
    }
}

/// The two ways to castle: toward the h-file rook (short, O-O) or toward the
/// a-file rook (long, O-O-O).
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CastleSide {
    Short,
    Long,
}

impl CastleSide {
    #[allow(missing_docs)]
    pub const ALL: [Self; 2] = [Self::Short, Self::Long];

    /// File of the rook taking part in castling.
    #[must_use]
    pub const fn rook_file(self) -> u8 {
        match self {
            Self::Short => BOARD_WIDTH,
            Self::Long => 1,
        }
    }

    /// The square the king crosses on its way.
    #[must_use]
    pub const fn transit_file(self) -> u8 {
        match self {
            Self::Short => KING_HOME_FILE + 1,
            Self::Long => KING_HOME_FILE - 1,
        }
    }

    /// File the king lands on: two files toward the rook.
    #[must_use]
    pub const fn king_target_file(self) -> u8 {
        match self {
            Self::Short => KING_HOME_FILE + 2,
            Self::Long => KING_HOME_FILE - 2,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn rights(self, player: Player) -> CastleRights {
        match (player, self) {
            (Player::White, Self::Short) => CastleRights::WHITE_SHORT,
            (Player::White, Self::Long) => CastleRights::WHITE_LONG,
            (Player::Black, Self::Short) => CastleRights::BLACK_SHORT,
            (Player::Black, Self::Long) => CastleRights::BLACK_LONG,
        }
    }
}

bitflags! {
    /// Track the ability to [castle] each side. Rights are derived from the
    /// tiles: a side keeps its right while its king sits unmoved on the home
    /// square and the corresponding corner rook is unmoved, too.
    ///
    /// Having the right is necessary but not sufficient: the squares between
    /// the king and the rook must be empty, the king must not be in check and
    /// must not cross or land on an attacked square.
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastleRights: u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
    }
}

impl CastleRights {
    #[allow(missing_docs)]
    pub const NONE: Self = Self::empty();

    /// Both rights of the given player.
    #[must_use]
    pub const fn both(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_SHORT.union(Self::WHITE_LONG),
            Player::Black => Self::BLACK_SHORT.union(Self::BLACK_LONG),
        }
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_char('-');
        }
        if self.contains(Self::WHITE_SHORT) {
            f.write_char('K')?;
        }
        if self.contains(Self::WHITE_LONG) {
            f.write_char('Q')?;
        }
        if self.contains(Self::BLACK_SHORT) {
            f.write_char('k')?;
        }
        if self.contains(Self::BLACK_LONG) {
            f.write_char('q')?;
        }
        Ok(())
    }
}

/// State of the game: 64 tiles, one [`Piece`] each, the side to move and the
/// cached status of that side.
///
/// ```
/// use tilechess::chess::board::{Board, GameState, STANDARD_LAYOUT};
/// use tilechess::chess::core::Square;
///
/// let mut board = Board::starting();
/// assert_eq!(board.board_snapshot(), STANDARD_LAYOUT);
///
/// let e2 = Square::try_from("e2").unwrap();
/// let e4 = Square::try_from("e4").unwrap();
/// assert_eq!(board.legal_destinations(e2).to_string(), "e4 e3");
/// board.submit_move(e2, e4).unwrap();
/// assert_eq!(board.game_state(), GameState::Normal);
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Board {
    tiles: [Piece; BOARD_SIZE as usize],
    turn: Player,
    in_check: bool,
    in_checkmate: bool,
    in_stalemate: bool,
}

impl Board {
    /// Creates the starting position of the standard chess variant. No piece
    /// has moved yet and White is to move.
    #[must_use]
    pub fn starting() -> Self {
        const BACKRANK: [PieceKind; BOARD_WIDTH as usize] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];
        let mut board = Self::empty();
        for square in Square::iter() {
            let backrank = BACKRANK[usize::from(square.file() - 1)];
            board.tiles[square.index()] = match square.rank() {
                1 => Piece::new(backrank, Player::White),
                2 => Piece::new(PieceKind::Pawn, Player::White),
                7 => Piece::new(PieceKind::Pawn, Player::Black),
                8 => Piece::new(backrank, Player::Black),
                _ => Piece::EMPTY,
            };
        }
        board
    }

    /// Creates a board with 64 empty tiles to be filled by parser.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            tiles: [Piece::EMPTY; BOARD_SIZE as usize],
            turn: Player::White,
            in_check: false,
            in_checkmate: false,
            in_stalemate: false,
        }
    }

    /// Loads a position from its tile string. A loaded position has no move
    /// history, so every piece is marked as moved: neither castling nor pawn
    /// double steps are available. White is to move.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedLayout`] if the input is not exactly 64 known
    /// symbols, does not contain exactly one king of each color or the king of
    /// the side not to move is attacked.
    pub fn from_tile_string(input: &str) -> Result<Self> {
        Self::parse(input, true, Player::White)
    }

    /// Same as [`Board::from_tile_string`] with the given side to move.
    ///
    /// # Errors
    ///
    /// Same as [`Board::from_tile_string`].
    pub fn from_tile_string_with_turn(input: &str, turn: Player) -> Result<Self> {
        Self::parse(input, true, turn)
    }

    /// Parses a tile string as the layout of a fresh game: every piece is
    /// unmoved. [`Board::starting`] is the same as parsing
    /// [`STANDARD_LAYOUT`] this way.
    ///
    /// # Errors
    ///
    /// Same as [`Board::from_tile_string`].
    pub fn from_initial_layout(input: &str) -> Result<Self> {
        Self::parse(input, false, Player::White)
    }

    /// Same as [`Board::from_initial_layout`] with the given side to move.
    ///
    /// # Errors
    ///
    /// Same as [`Board::from_tile_string`].
    pub fn from_initial_layout_with_turn(input: &str, turn: Player) -> Result<Self> {
        Self::parse(input, false, turn)
    }

    fn parse(input: &str, has_moved: bool, turn: Player) -> Result<Self> {
        let length = input.chars().count();
        if length != BOARD_SIZE as usize {
            return Err(Error::MalformedLayout(format!(
                "expected {BOARD_SIZE} tiles, got {length}"
            )));
        }
        // Parse into a scratch array: the board is only built once the whole
        // input is known to be valid.
        let mut tiles = [Piece::EMPTY; BOARD_SIZE as usize];
        for (tile, symbol) in tiles.iter_mut().zip(input.chars()) {
            *tile = Piece::try_from(symbol)?.with_moved(has_moved);
        }
        for player in [Player::White, Player::Black] {
            let kings = tiles
                .iter()
                .filter(|piece| {
                    piece.kind() == PieceKind::King && piece.color() == Color::from(player)
                })
                .count();
            if kings != 1 {
                return Err(Error::MalformedLayout(format!(
                    "expected 1 {player} king, got {kings}"
                )));
            }
        }
        Self {
            tiles,
            ..Self::empty()
        }
        .with_turn(turn)
    }

    /// Sets the side to move and re-evaluates its check status.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedLayout`] if the king of the other side is
    /// attacked: the side to move could capture it.
    pub fn with_turn(mut self, turn: Player) -> Result<Self> {
        let waiting = turn.opponent();
        if movegen::is_in_check(&self, waiting) {
            return Err(Error::MalformedLayout(format!(
                "{waiting} king is attacked while {turn} is to move"
            )));
        }
        self.turn = turn;
        self.refresh_status();
        Ok(self)
    }

    /// Serializes the board: 64 symbols in tile order, `~` for empty tiles.
    #[must_use]
    pub fn to_tile_string(&self) -> String {
        self.tiles.iter().map(|piece| piece.symbol()).collect()
    }

    /// Current board as a fixed-length tile sequence for the rendering layer.
    #[must_use]
    pub fn board_snapshot(&self) -> String {
        self.to_tile_string()
    }

    /// Returns the occupant of the square, [`Piece::EMPTY`] included.
    #[must_use]
    pub const fn piece_at(&self, square: Square) -> Piece {
        self.tiles[square.index()]
    }

    /// Same as [`Board::piece_at`] for unvalidated coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfBounds`] if the coordinate is not on the board.
    pub fn piece_at_coordinate(&self, coordinate: Coordinate) -> Result<Piece> {
        Ok(self.piece_at(Square::try_from(coordinate)?))
    }

    /// All 64 tiles with their squares, in tile order.
    pub fn tiles(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().map(|square| (square, self.piece_at(square)))
    }

    /// Pieces of the given kind and color, in tile order.
    pub fn pieces_of(
        &self,
        kind: PieceKind,
        color: Color,
    ) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.tiles()
            .filter(move |(_, piece)| piece.kind() == kind && piece.color() == color)
    }

    /// All pieces owned by the player, in tile order.
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.tiles()
            .filter(move |(_, piece)| piece.owner() == Some(player))
    }

    #[allow(missing_docs)]
    #[must_use]
    pub fn king_square(&self, player: Player) -> Option<Square> {
        self.pieces_of(PieceKind::King, player.into())
            .map(|(square, _)| square)
            .next()
    }

    /// The side to move.
    #[must_use]
    pub const fn turn(&self) -> Player {
        self.turn
    }

    /// Whether the side to move is in check.
    #[must_use]
    pub const fn in_check(&self) -> bool {
        self.in_check
    }

    /// Whether the side to move has been checkmated.
    #[must_use]
    pub const fn in_checkmate(&self) -> bool {
        self.in_checkmate
    }

    /// Whether the side to move has no legal moves while not in check.
    #[must_use]
    pub const fn in_stalemate(&self) -> bool {
        self.in_stalemate
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn game_state(&self) -> GameState {
        if self.in_checkmate {
            GameState::Checkmate
        } else if self.in_stalemate {
            GameState::Stalemate
        } else if self.in_check {
            GameState::Check
        } else {
            GameState::Normal
        }
    }

    /// Castling rights of both players derived from the move history bits.
    #[must_use]
    pub fn castle_rights(&self) -> CastleRights {
        let mut rights = CastleRights::NONE;
        for player in [Player::White, Player::Black] {
            let rank = player.backrank();
            let king = self.piece_at(Square::at(KING_HOME_FILE, rank));
            if king.kind() != PieceKind::King || king.owner() != Some(player) || king.has_moved()
            {
                continue;
            }
            for side in CastleSide::ALL {
                let rook = self.piece_at(Square::at(side.rook_file(), rank));
                if rook.kind() == PieceKind::Rook
                    && rook.owner() == Some(player)
                    && !rook.has_moved()
                {
                    rights |= side.rights(player);
                }
            }
        }
        rights
    }

    /// Squares the piece on `square` can legally move to. Empty if the square
    /// does not hold a piece of the side to move or the game is over.
    #[must_use]
    pub fn legal_destinations(&self, square: Square) -> SquareSet {
        if self.game_state().is_terminal() || self.piece_at(square).owner() != Some(self.turn) {
            return SquareSet::empty();
        }
        movegen::legal_destinations(self, square, self.turn)
    }

    /// Moves the piece on `from` to `to` after checking that the move is legal
    /// for the owner of that piece. Handles captures and the rook relocation
    /// of castling. Does not pass the turn.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalMove`] and leaves the board untouched if `to` is
    /// not a legal destination of the piece.
    pub fn apply_move(&mut self, from: Square, to: Square) -> Result<()> {
        let legal = self
            .piece_at(from)
            .owner()
            .is_some_and(|mover| movegen::legal_destinations(self, from, mover).contains(to));
        if !legal {
            return Err(Error::IllegalMove { from, to });
        }
        self.make_move(from, to);
        Ok(())
    }

    /// Plays a move for the side to move: applies it, passes the turn and
    /// re-evaluates check, checkmate and stalemate for the opponent.
    ///
    /// # Errors
    ///
    /// Returns [`Error::IllegalMove`] and leaves the board untouched if `to`
    /// is not in [`Board::legal_destinations`] of `from`.
    pub fn submit_move(&mut self, from: Square, to: Square) -> Result<()> {
        if !self.legal_destinations(from).contains(to) {
            tracing::debug!(%from, %to, turn = %self.turn, "move rejected");
            return Err(Error::IllegalMove { from, to });
        }
        self.make_move(from, to);
        self.pass_turn();
        self.refresh_status();
        tracing::debug!(%from, %to, turn = %self.turn, state = %self.game_state(), "move applied");
        Ok(())
    }

    /// Relocates the piece without any legality checks. Used for simulating
    /// candidates on clones.
    pub(crate) fn make_move(&mut self, from: Square, to: Square) {
        let piece = self.piece_at(from);
        debug_assert!(!piece.is_empty(), "no piece to move on {from}");
        if piece
            .owner()
            .is_some_and(|owner| self.piece_at(to).is_opponent_of(owner))
        {
            self.tiles[to.index()] = Piece::EMPTY;
        }
        if piece.kind() == PieceKind::King
            && from.rank() == to.rank()
            && from.file().abs_diff(to.file()) == 2
        {
            // Castling: the rook lands next to the king, on the side facing
            // the center.
            let (side, rook_file) = if to.file() > from.file() {
                (CastleSide::Short, to.file() - 1)
            } else {
                (CastleSide::Long, to.file() + 1)
            };
            let rook_from = Square::at(side.rook_file(), from.rank());
            let rook = self.piece_at(rook_from);
            self.tiles[rook_from.index()] = Piece::EMPTY;
            self.tiles[Square::at(rook_file, from.rank()).index()] = rook.with_moved(true);
        }
        self.tiles[from.index()] = Piece::EMPTY;
        self.tiles[to.index()] = piece.with_moved(true);
    }

    /// Hands the move to the opponent without re-evaluating the status.
    pub(crate) fn pass_turn(&mut self) {
        self.turn = self.turn.opponent();
    }

    fn refresh_status(&mut self) {
        self.in_check = movegen::is_in_check(self, self.turn);
        let has_moves = movegen::has_legal_moves(self, self.turn);
        self.in_checkmate = self.in_check && !has_moves;
        self.in_stalemate = !self.in_check && !has_moves;
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl TryFrom<&str> for Board {
    type Error = Error;

    /// Trims the input and loads it with [`Board::from_tile_string`].
    fn try_from(input: &str) -> Result<Self> {
        Self::from_tile_string(input.trim())
    }
}

impl fmt::Display for Board {
    /// Draws the board with rank 8 on top.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in (1..=BOARD_WIDTH).rev() {
            write!(f, "{rank} ")?;
            for file in 1..=BOARD_WIDTH {
                if file > 1 {
                    f.write_char(' ')?;
                }
                f.write_char(self.piece_at(Square::at(file, rank)).symbol())?;
            }
            f.write_char('\n')?;
        }
        f.write_str("  a b c d e f g h")
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{self}")?;
        writeln!(f, "Side to move: {}", self.turn)?;
        writeln!(f, "State: {}", self.game_state())?;
        writeln!(f, "Castling rights: {}", self.castle_rights())?;
        write!(f, "Tiles: {}", self.to_tile_string())
    }
}
