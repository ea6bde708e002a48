#![no_main]
use libfuzzer_sys::fuzz_target;
use tilechess::chess::board::Board;
use tilechess::chess::core::{Color, PieceKind};
use tilechess::chess::movegen;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(board) = Board::from_initial_layout(input) else {
        return;
    };
    assert!(!movegen::is_in_check(&board, board.turn().opponent()));
    for next in movegen::legal_moves(&board, board.turn()) {
        let mut child = board.clone();
        child
            .submit_move(next.from, next.to)
            .expect("legal moves should be accepted");
        assert!(!movegen::is_in_check(&child, board.turn()));
        for color in [Color::White, Color::Black] {
            assert_eq!(child.pieces_of(PieceKind::King, color).count(), 1);
        }
    }
});
