#![no_main]
use chessrules::chess::board::Board;
use libfuzzer_sys::fuzz_target;
use pretty_assertions::assert_eq;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(board) = Board::try_from(s) {
            // Printed FEN is parsed back into the same board.
            let fen = board.to_string();
            assert_eq!(Board::from_fen(&fen).map(|board| board.to_string()).ok(), Some(fen));
        }
    }
});
