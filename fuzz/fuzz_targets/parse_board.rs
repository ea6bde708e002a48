#![no_main]
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;
use tilechess::chess::board::Board;

fuzz_target!(|data: &[u8]| {
    let Ok(input) = std::str::from_utf8(data) else {
        return;
    };
    if let Ok(board) = Board::from_tile_string(input) {
        assert_eq!(board.to_tile_string(), input);
    }
});
