//! Rules engine for standard chess. It holds the board state, decides whether
//! a move is legal, applies legal moves (castling, en passant and promotion
//! included) and detects check, checkmate and stalemate.
//!
//! Rendering, input handling and persistence are left to the collaborators:
//! they submit a [`chess::core::Move`] and receive either an
//! [`chess::AppliedMove`] or a [`chess::MoveRejected`] reason, plus a
//! [`chess::Snapshot`] of the board to draw.
//!
//! ```
//! use chessrules::chess::core::{Move, Player};
//! use chessrules::chess::{Game, GameState};
//!
//! let mut game = Game::new();
//! for uci in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     assert!(game.try_move(Move::from_uci(uci).unwrap()).is_ok());
//! }
//! assert_eq!(game.terminal_state(), Ok(GameState::Checkmate(Player::White)));
//! ```

pub mod chess;
