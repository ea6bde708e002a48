//! Move generation in three stages:
//!
//! 1. [`candidates`]: raw destination coordinates derived from the piece's
//!    movement pattern. Sliders stop at the first occupied square, knight and
//!    king jumps are not filtered at all, so the result may contain
//!    out-of-bounds coordinates and squares occupied by the mover's own pieces.
//! 2. [`pseudo_legal_destinations`]: candidates pruned to on-board squares
//!    not occupied by the mover.
//! 3. [`legal_destinations`]: pseudo-legal destinations that do not leave the
//!    mover's king attacked. Each one is played on a clone of the board and the
//!    clone is checked for check.
//!
//! Attack detection reuses the first stage in a restricted form: castling is
//! skipped (it never captures, and its own safety conditions need attack
//! detection) and pawns only contribute their two diagonals.

use arrayvec::ArrayVec;

use crate::chess::board::{Board, CastleRights, CastleSide, KING_HOME_FILE};
use crate::chess::core::{Coordinate, Move, PieceKind, Player, Square};
use crate::chess::square_set::SquareSet;

/// Upper bound on the number of candidates of a single piece: a queen in the
/// center of an empty board has 27.
pub const MAX_CANDIDATES: usize = 32;

/// Raw candidate destinations of a single piece.
pub type Candidates = ArrayVec<Coordinate, MAX_CANDIDATES>;

const KNIGHT_OFFSETS: [(i8, i8); 8] = [
    (1, 2),
    (-1, 2),
    (2, 1),
    (2, -1),
    (-2, 1),
    (-2, -1),
    (-1, -2),
    (1, -2),
];
const KING_OFFSETS: [(i8, i8); 8] = [
    (-1, 1),
    (0, 1),
    (1, 1),
    (-1, 0),
    (1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];
const BISHOP_DIRECTIONS: [(i8, i8); 4] = [(1, 1), (-1, 1), (1, -1), (-1, -1)];
const ROOK_DIRECTIONS: [(i8, i8); 4] = [(0, 1), (0, -1), (1, 0), (-1, 0)];

#[derive(Clone, Copy, PartialEq, Eq)]
enum Purpose {
    Moves,
    Attacks,
}

/// Raw candidate destinations of the piece on `from`, castling included.
/// Empty if the square does not hold a piece of `mover`.
///
/// ```
/// use tilechess::chess::board::Board;
/// use tilechess::chess::core::{Coordinate, Square};
/// use tilechess::chess::movegen::candidates;
///
/// let board = Board::starting();
/// let knight = Square::try_from("b1").unwrap();
/// let jumps = candidates(&board, knight, board.turn());
/// assert_eq!(jumps.len(), 8);
/// assert!(jumps.contains(&Coordinate::new(0, 2)));
/// ```
#[must_use]
pub fn candidates(board: &Board, from: Square, mover: Player) -> Candidates {
    generate(board, from, mover, Purpose::Moves)
}

fn generate(board: &Board, from: Square, mover: Player, purpose: Purpose) -> Candidates {
    let mut result = Candidates::new();
    let piece = board.piece_at(from);
    if piece.owner() != Some(mover) {
        return result;
    }
    let origin = from.coordinate();
    match piece.kind() {
        PieceKind::Knight => result.extend(
            KNIGHT_OFFSETS
                .iter()
                .map(|&(file_delta, rank_delta)| origin.shift(file_delta, rank_delta)),
        ),
        PieceKind::Bishop => push_rays(board, origin, mover, &BISHOP_DIRECTIONS, &mut result),
        PieceKind::Rook => push_rays(board, origin, mover, &ROOK_DIRECTIONS, &mut result),
        PieceKind::Queen => {
            push_rays(board, origin, mover, &BISHOP_DIRECTIONS, &mut result);
            push_rays(board, origin, mover, &ROOK_DIRECTIONS, &mut result);
        },
        PieceKind::King => {
            result.extend(
                KING_OFFSETS
                    .iter()
                    .map(|&(file_delta, rank_delta)| origin.shift(file_delta, rank_delta)),
            );
            if purpose == Purpose::Moves {
                push_castling(board, from, mover, &mut result);
            }
        },
        PieceKind::Pawn if purpose == Purpose::Attacks => {
            let forward = mover.push_direction();
            result.push(origin.shift(-1, forward));
            result.push(origin.shift(1, forward));
        },
        PieceKind::Pawn => push_pawn_moves(board, origin, piece.has_moved(), mover, &mut result),
        PieceKind::Empty => {},
    }
    result
}

/// Walks each direction until the edge of the board or the first occupied
/// square, which is included if it holds an opponent's piece.
fn push_rays(
    board: &Board,
    origin: Coordinate,
    mover: Player,
    directions: &[(i8, i8)],
    result: &mut Candidates,
) {
    for &(file_delta, rank_delta) in directions {
        let mut current = origin.shift(file_delta, rank_delta);
        while let Ok(occupant) = board.piece_at_coordinate(current) {
            if occupant.is_empty() {
                result.push(current);
                current = current.shift(file_delta, rank_delta);
                continue;
            }
            if occupant.is_opponent_of(mover) {
                result.push(current);
            }
            break;
        }
    }
}

fn push_pawn_moves(
    board: &Board,
    origin: Coordinate,
    has_moved: bool,
    mover: Player,
    result: &mut Candidates,
) {
    let forward = mover.push_direction();
    let is_free = |coordinate: Coordinate| {
        board
            .piece_at_coordinate(coordinate)
            .is_ok_and(|occupant| occupant.is_empty())
    };
    let single = origin.shift(0, forward);
    if is_free(single) {
        result.push(single);
        let double = single.shift(0, forward);
        if !has_moved && is_free(double) {
            result.push(double);
        }
    }
    for file_delta in [-1, 1] {
        let diagonal = origin.shift(file_delta, forward);
        if board
            .piece_at_coordinate(diagonal)
            .is_ok_and(|occupant| occupant.is_opponent_of(mover))
        {
            result.push(diagonal);
        }
    }
}

/// Adds the king's two-square moves for each side where castling is
/// currently possible.
fn push_castling(board: &Board, king: Square, mover: Player, result: &mut Candidates) {
    let rank = mover.backrank();
    if king != Square::at(KING_HOME_FILE, rank) {
        return;
    }
    let rights = board.castle_rights();
    if !rights.intersects(CastleRights::both(mover)) || is_in_check(board, mover) {
        return;
    }
    for side in CastleSide::ALL {
        if !rights.contains(side.rights(mover)) {
            continue;
        }
        let rook = Square::at(side.rook_file(), rank);
        if !king
            .between_on_rank(rook)
            .all(|square| board.piece_at(square).is_empty())
        {
            continue;
        }
        if is_attacked(board, Square::at(side.transit_file(), rank), mover.opponent()) {
            continue;
        }
        // Landing on an attacked square is rejected by the legality filter.
        result.push(Square::at(side.king_target_file(), rank).coordinate());
    }
}

fn prune(board: &Board, candidates: Candidates, mover: Player) -> SquareSet {
    candidates
        .into_iter()
        .filter_map(|coordinate| Square::try_from(coordinate).ok())
        .filter(|&square| board.piece_at(square).owner() != Some(mover))
        .collect()
}

/// Candidates of the piece on `from` that are on the board and not occupied
/// by `mover`'s own pieces. May leave `mover`'s king in check.
#[must_use]
pub fn pseudo_legal_destinations(board: &Board, from: Square, mover: Player) -> SquareSet {
    prune(board, candidates(board, from, mover), mover)
}

/// Squares attacked by the piece on `from`.
fn attacks(board: &Board, from: Square, attacker: Player) -> SquareSet {
    prune(
        board,
        generate(board, from, attacker, Purpose::Attacks),
        attacker,
    )
}

/// Pseudo-legal destinations that do not leave `mover`'s king attacked.
#[must_use]
pub fn legal_destinations(board: &Board, from: Square, mover: Player) -> SquareSet {
    pseudo_legal_destinations(board, from, mover)
        .iter()
        .filter(|&to| {
            let mut hypothetical = board.clone();
            hypothetical.make_move(from, to);
            !is_in_check(&hypothetical, mover)
        })
        .collect()
}

/// Returns true if any piece of `attacker` could capture on `target`, were
/// it occupied by the opponent.
#[must_use]
pub fn is_attacked(board: &Board, target: Square, attacker: Player) -> bool {
    board
        .pieces(attacker)
        .any(|(square, _)| attacks(board, square, attacker).contains(target))
}

/// Returns true if the king of `player` is attacked. A board without the
/// player's king is never in check.
#[must_use]
pub fn is_in_check(board: &Board, player: Player) -> bool {
    board
        .king_square(player)
        .is_some_and(|king| is_attacked(board, king, player.opponent()))
}

/// Returns true as soon as any piece of `player` has a legal destination.
#[must_use]
pub fn has_legal_moves(board: &Board, player: Player) -> bool {
    board
        .pieces(player)
        .any(|(square, _)| !legal_destinations(board, square, player).is_empty())
}

#[allow(missing_docs)]
#[must_use]
pub fn is_checkmate(board: &Board, player: Player) -> bool {
    is_in_check(board, player) && !has_legal_moves(board, player)
}

#[allow(missing_docs)]
#[must_use]
pub fn is_stalemate(board: &Board, player: Player) -> bool {
    !is_in_check(board, player) && !has_legal_moves(board, player)
}

/// All legal moves of `player`, ordered by origin and then destination in
/// tile order.
#[must_use]
pub fn legal_moves(board: &Board, player: Player) -> Vec<Move> {
    board
        .pieces(player)
        .flat_map(|(from, _)| {
            legal_destinations(board, from, player)
                .into_iter()
                .map(move |to| Move::new(from, to))
        })
        .collect()
}

/// Counts the leaf nodes of the legal move tree of the given depth, starting
/// with the side to move. Useful for validating move generation against
/// known [perft] results.
///
/// [perft]: https://www.chessprogramming.org/Perft
#[must_use]
pub fn perft(board: &Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = legal_moves(board, board.turn());
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|next| {
            let mut child = board.clone();
            child.make_move(next.from, next.to);
            child.pass_turn();
            perft(&child, depth - 1)
        })
        .sum()
}
