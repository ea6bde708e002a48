use itertools::Itertools;
use pretty_assertions::assert_eq;
use shakmaty::{CastlingMode, Chess, Position as ShakmatyPosition};
use tilechess::chess::board::{Board, GameState};
use tilechess::chess::core::{Color, Coordinate, Move, PieceKind, Player, Square};
use tilechess::chess::movegen::{self, candidates, legal_moves, perft};

/// Expands the piece placement part of a FEN into a tile string.
fn tiles(placement: &str) -> String {
    placement
        .chars()
        .flat_map(|symbol| match symbol {
            '/' => vec![],
            '1'..='8' => vec!['~'; symbol as usize - '0' as usize],
            'k' => vec!['l'],
            'K' => vec!['L'],
            'n' => vec!['k'],
            'N' => vec!['K'],
            _ => vec![symbol],
        })
        .collect()
}

/// Loads a position without move history.
fn setup(placement: &str, turn: Player) -> Board {
    Board::from_tile_string_with_turn(&tiles(placement), turn)
        .unwrap_or_else(|e| panic!("parsing {placement}: {e}"))
}

/// Loads a position where no piece has moved yet.
fn fresh(placement: &str, turn: Player) -> Board {
    Board::from_initial_layout_with_turn(&tiles(placement), turn)
        .unwrap_or_else(|e| panic!("parsing {placement}: {e}"))
}

fn square(input: &str) -> Square {
    Square::try_from(input).unwrap()
}

fn destinations(board: &Board, from: &str) -> String {
    board.legal_destinations(square(from)).to_string()
}

fn get_moves(board: &Board) -> Vec<String> {
    legal_moves(board, board.turn())
        .iter()
        .map(Move::to_string)
        .sorted()
        .collect()
}

fn to_fen(board: &Board) -> String {
    let placement = board
        .to_tile_string()
        .chars()
        .map(|symbol| match symbol {
            'l' => 'k',
            'L' => 'K',
            'k' => 'n',
            'K' => 'N',
            _ => symbol,
        })
        .chunks(8)
        .into_iter()
        .map(|row| {
            let mut rank = String::new();
            let mut empty = 0;
            for symbol in row {
                if symbol == '~' {
                    empty += 1;
                    continue;
                }
                if empty > 0 {
                    rank.push_str(&empty.to_string());
                    empty = 0;
                }
                rank.push(symbol);
            }
            if empty > 0 {
                rank.push_str(&empty.to_string());
            }
            rank
        })
        .join("/");
    let turn = match board.turn() {
        Player::White => 'w',
        Player::Black => 'b',
    };
    format!("{placement} {turn} {} - 0 1", board.castle_rights())
}

fn reference(board: &Board) -> Chess {
    let fen: shakmaty::fen::Fen = to_fen(board).parse().unwrap();
    fen.into_position(CastlingMode::Standard).unwrap()
}

fn reference_moves(board: &Board) -> Vec<String> {
    reference(board)
        .legal_moves()
        .iter()
        .map(|m| m.to_uci(CastlingMode::Standard).to_string())
        .sorted()
        .collect()
}

#[test]
fn knight_candidates_before_pruning() {
    let board = setup("8/8/8/8/8/8/8/1N3k1K", Player::White);
    let knight = Square::new(2, 1).unwrap();
    assert_eq!(
        candidates(&board, knight, Player::White).as_slice(),
        &[
            Coordinate::new(3, 3),
            Coordinate::new(1, 3),
            Coordinate::new(4, 2),
            Coordinate::new(4, 0),
            Coordinate::new(0, 2),
            Coordinate::new(0, 0),
            Coordinate::new(1, -1),
            Coordinate::new(3, -1),
        ]
    );
    assert_eq!(destinations(&board, "b1"), "a3 c3 d2");
}

#[test]
fn queen_in_the_center() {
    let board = setup("4k3/8/8/3Q4/8/8/8/4K3", Player::White);
    assert_eq!(candidates(&board, square("d5"), Player::White).len(), 27);
    assert_eq!(board.legal_destinations(square("d5")).len(), 27);
}

#[test]
fn starting_moves() {
    let board = Board::starting();
    assert_eq!(
        get_moves(&board),
        [
            "a2a3", "a2a4", "b1a3", "b1c3", "b2b3", "b2b4", "c2c3", "c2c4", "d2d3", "d2d4", "e2e3",
            "e2e4", "f2f3", "f2f4", "g1f3", "g1h3", "g2g3", "g2g4", "h2h3", "h2h4"
        ]
    );
    assert_eq!(destinations(&board, "e2"), "e4 e3");
    assert!(!board.legal_destinations(square("e2")).contains(square("d3")));
    assert!(!board.legal_destinations(square("e2")).contains(square("f3")));
    // Black pieces are not movable on White's turn.
    assert!(board.legal_destinations(square("e7")).is_empty());
    assert_eq!(
        movegen::legal_destinations(&board, square("e7"), Player::Black).len(),
        2
    );
}

#[test]
fn pawn_rules() {
    // Double step is blocked by a piece on either square in front.
    let board = fresh("4k3/8/8/8/8/4n3/3PP3/4K3", Player::White);
    assert_eq!(destinations(&board, "d2"), "d4 d3 e3");
    assert_eq!(destinations(&board, "e2"), "");
    let board = fresh("4k3/8/8/8/4n3/8/4P3/4K3", Player::White);
    assert_eq!(destinations(&board, "e2"), "e3");
    // Black pawns advance toward lower ranks and capture diagonally.
    let board = fresh("4k3/3p4/2N1N3/8/8/8/8/4K3", Player::Black);
    assert_eq!(destinations(&board, "d7"), "c6 d6 e6 d5");
    // A pawn on the last rank has nowhere to go.
    let board = setup("3Pk3/8/8/8/8/8/8/4K3", Player::White);
    assert_eq!(destinations(&board, "d8"), "");
}

#[test]
fn castle() {
    let board = fresh("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R", Player::White);
    assert_eq!(board.castle_rights().to_string(), "KQkq");
    assert_eq!(destinations(&board, "e1"), "c1 d1 f1 g1");
    assert_eq!(reference_moves(&board), get_moves(&board));

    // Any piece between the king and the rook prevents castling on that side.
    let board = fresh("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/RN2K2R", Player::White);
    assert_eq!(destinations(&board, "e1"), "d1 f1 g1");
    let board = fresh("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3KB1R", Player::White);
    assert_eq!(destinations(&board, "e1"), "c1 d1");
    let board = fresh("rn2k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R", Player::Black);
    assert_eq!(destinations(&board, "e8"), "d8 f8 g8");

    // Moved king or rook.
    let mut board = fresh("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R", Player::White);
    board.submit_move(square("h1"), square("g1")).unwrap();
    board.submit_move(square("a7"), square("a6")).unwrap();
    board.submit_move(square("g1"), square("h1")).unwrap();
    board.submit_move(square("a6"), square("a5")).unwrap();
    assert_eq!(board.castle_rights().to_string(), "Qkq");
    assert_eq!(destinations(&board, "e1"), "c1 d1 f1");

    // Loaded positions have no castling rights.
    let board = setup("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R", Player::White);
    assert_eq!(destinations(&board, "e1"), "d1 f1");
}

#[test]
fn castle_under_attack() {
    // The king may not cross an attacked square.
    let board = fresh("4k3/8/8/5r2/8/8/8/R3K2R", Player::White);
    assert_eq!(destinations(&board, "e1"), "d2 e2 c1 d1");
    // Nor land on one.
    let board = fresh("4k3/8/8/6r1/8/8/8/R3K2R", Player::White);
    assert_eq!(destinations(&board, "e1"), "d2 e2 f2 c1 d1 f1");
    // Nor castle out of check.
    let board = fresh("4k3/8/8/4r3/8/8/8/R3K2R", Player::White);
    assert!(board.in_check());
    assert_eq!(destinations(&board, "e1"), "d2 f2 d1 f1");
    // The rook may cross an attacked square: b1 is only relevant for the rook.
    let board = fresh("4k3/8/8/1r6/8/8/8/R3K2R", Player::White);
    assert_eq!(destinations(&board, "e1"), "d2 e2 f2 c1 d1 f1 g1");

    for placement in [
        "4k3/8/8/5r2/8/8/8/R3K2R",
        "4k3/8/8/6r1/8/8/8/R3K2R",
        "4k3/8/8/1r6/8/8/8/R3K2R",
    ] {
        let board = fresh(placement, Player::White);
        assert_eq!(get_moves(&board), reference_moves(&board), "{placement}");
    }
}

#[test]
fn castling_moves_the_rook() {
    let mut board = fresh("r3k2r/pppppppp/8/8/8/8/PPPPPPPP/R3K2R", Player::White);
    board.submit_move(square("e1"), square("c1")).unwrap();
    board.submit_move(square("e8"), square("g8")).unwrap();
    assert_eq!(board.to_tile_string(), tiles("r4rk1/pppppppp/8/8/8/8/PPPPPPPP/2KR3R"));
    let rook = board.piece_at(square("d1"));
    assert_eq!(rook.kind(), PieceKind::Rook);
    assert!(rook.has_moved());
    assert!(board.castle_rights().is_empty());
}

#[test]
fn pins() {
    // Pinned knight can not move at all.
    let board = setup("4k3/4r3/8/8/8/8/4N3/4K3", Player::White);
    assert_eq!(destinations(&board, "e2"), "");
    assert_eq!(
        movegen::pseudo_legal_destinations(&board, square("e2"), Player::White).len(),
        6
    );
    // Pinned rook can move along the pin line.
    let board = setup("4k3/4r3/8/8/8/8/4R3/4K3", Player::White);
    assert_eq!(destinations(&board, "e2"), "e7 e6 e5 e4 e3");
    // Pinned bishop can only capture the pinner or stay on the diagonal.
    let board = setup("4k3/8/8/b7/8/8/3B4/4K3", Player::White);
    assert_eq!(destinations(&board, "d2"), "a5 b4 c3");
    // The king can not step along the line of the attack.
    let board = setup("4k3/8/8/8/8/8/8/r3K3", Player::White);
    assert_eq!(destinations(&board, "e1"), "d2 e2 f2");

    for (placement, turn) in [
        ("4k3/4r3/8/8/8/8/4N3/4K3", Player::White),
        ("4k3/4r3/8/8/8/8/4R3/4K3", Player::White),
        ("4k3/8/8/b7/8/8/3B4/4K3", Player::White),
        ("4k3/8/8/8/8/8/8/r3K3", Player::White),
    ] {
        let board = setup(placement, turn);
        assert_eq!(get_moves(&board), reference_moves(&board), "{placement}");
    }
}

#[test]
fn check_evasions() {
    let board = setup("4k3/4r3/8/8/R7/8/8/4K3", Player::White);
    assert_eq!(board.game_state(), GameState::Check);
    assert_eq!(destinations(&board, "a4"), "e4");
    assert_eq!(destinations(&board, "e1"), "d2 f2 d1 f1");
    assert_eq!(get_moves(&board), reference_moves(&board));

    let board = setup("3kn3/R2p4/8/6B1/8/6K1/3R4/8", Player::Black);
    assert_eq!(get_moves(&board), ["d8c8", "e8f6"]);
    let board = setup("2R5/8/6k1/8/8/8/PPn5/KR6", Player::White);
    assert_eq!(get_moves(&board), ["c8c2"]);

    // Double check: only the king moves.
    let board = setup("3kn3/R2p1N2/8/8/7B/6K1/3R4/8", Player::Black);
    assert_eq!(board.game_state(), GameState::Check);
    assert_eq!(get_moves(&board), ["d8c8"]);
    assert_eq!(get_moves(&board), reference_moves(&board));
}

#[test]
fn checkmate() {
    // Back rank.
    let mut board = setup("6k1/5ppp/8/8/8/8/8/R5K1", Player::White);
    board.submit_move(square("a1"), square("a8")).unwrap();
    assert_eq!(board.turn(), Player::Black);
    assert_eq!(board.game_state(), GameState::Checkmate);
    assert!(board.in_check());
    assert!(board.in_checkmate());
    assert!(movegen::is_checkmate(&board, Player::Black));
    assert!(!movegen::is_checkmate(&board, Player::White));
    assert!(board.legal_destinations(square("g8")).is_empty());
    assert!(board.submit_move(square("h7"), square("h6")).is_err());

    // Fool's mate.
    let mut board = Board::starting();
    for (from, to) in [("f2", "f3"), ("e7", "e5"), ("g2", "g4"), ("d8", "h4")] {
        assert_eq!(board.game_state(), GameState::Normal);
        board.submit_move(square(from), square(to)).unwrap();
    }
    assert_eq!(board.game_state(), GameState::Checkmate);
    assert!(legal_moves(&board, Player::White).is_empty());

    // Same back rank, but a piece other than the king can capture the
    // attacker.
    let board = setup("R5k1/5ppp/8/8/4b3/8/8/6K1", Player::Black);
    assert_eq!(board.game_state(), GameState::Check);
    assert_eq!(get_moves(&board), ["e4a8"]);
    assert_eq!(get_moves(&board), reference_moves(&board));
}

#[test]
fn stalemate() {
    let board = setup("7k/5Q2/6K1/8/8/8/8/8", Player::Black);
    assert_eq!(board.game_state(), GameState::Stalemate);
    assert!(!board.in_check());
    assert!(movegen::is_stalemate(&board, Player::Black));
    assert!(!movegen::has_legal_moves(&board, Player::Black));
    assert!(movegen::has_legal_moves(&board, Player::White));
    assert!(board.legal_destinations(square("h8")).is_empty());
}

#[test]
fn attacks() {
    let board = setup("4k3/8/8/8/3p4/8/8/4K3", Player::White);
    // Pawns attack diagonally, not forward.
    assert!(movegen::is_attacked(&board, square("c3"), Player::Black));
    assert!(movegen::is_attacked(&board, square("e3"), Player::Black));
    assert!(!movegen::is_attacked(&board, square("d3"), Player::Black));
    assert!(movegen::is_attacked(&board, square("d2"), Player::White));
    assert!(!movegen::is_in_check(&board, Player::White));
}

/// Plays a long deterministic game, checking the invariants after every move.
#[test]
fn invariants_hold_along_a_game() {
    let mut board = Board::starting();
    let mut seed: u64 = 0x2545_F491_4F6C_DD1D;
    for _ in 0..200 {
        let moves = legal_moves(&board, board.turn());
        if moves.is_empty() {
            break;
        }
        seed ^= seed << 13;
        seed ^= seed >> 7;
        seed ^= seed << 17;
        let next = moves[(seed % moves.len() as u64) as usize];
        board.submit_move(next.from, next.to).unwrap();

        for color in [Color::White, Color::Black] {
            assert_eq!(board.pieces_of(PieceKind::King, color).count(), 1);
        }
        let tiles = board.to_tile_string();
        let loaded = Board::from_tile_string_with_turn(&tiles, board.turn()).unwrap();
        assert_eq!(loaded.to_tile_string(), tiles);
        assert!(!movegen::is_in_check(&board, board.turn().opponent()));
        assert_eq!(board.in_check(), movegen::is_in_check(&board, board.turn()));
    }
}

#[test]
fn starting_position_perft() {
    let board = Board::starting();
    let reference = Chess::default();
    for depth in 1..=3 {
        assert_eq!(
            perft(&board, depth),
            shakmaty::perft(&reference, u32::from(depth)),
            "depth {depth}"
        );
    }
    assert_eq!(perft(&board, 3), 8902);
}

#[test]
fn reference_positions() {
    // Kiwipete: castling on both sides, pins and captures.
    let board = fresh(
        "r3k2r/p1ppqpb1/bn2pnp1/3PN3/1p2P3/2N2Q1p/PPPBBPPP/R3K2R",
        Player::White,
    );
    assert_eq!(legal_moves(&board, Player::White).len(), 48);
    assert_eq!(get_moves(&board), reference_moves(&board));

    // Positions without pawns on their starting or promotion ranks, so that
    // neither the move history nor promotion makes a difference.
    for (placement, turn) in [
        ("8/5k2/3p4/1p1Pp2p/pP2Pp1P/P4P1K/8/8", Player::White),
        ("r3k3/1q6/8/3Q4/8/5N2/1B6/4K2R", Player::Black),
        ("2r3k1/8/p2p3p/1p1Pb1p1/4P3/P1N3PP/5RK1/8", Player::White),
        ("6k1/8/4b3/8/2B5/8/1K6/8", Player::White),
    ] {
        let board = setup(placement, turn);
        assert_eq!(get_moves(&board), reference_moves(&board), "{placement}");
        let reference = reference(&board);
        for depth in 1..=2 {
            assert_eq!(
                perft(&board, depth),
                shakmaty::perft(&reference, u32::from(depth)),
                "{placement} at depth {depth}"
            );
        }
    }
}
