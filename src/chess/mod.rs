//! Implementation of the chess rules: board state, move legality, move
//! application and game state detection.

pub mod apply;
pub mod attacks;
pub mod board;
pub mod core;
pub mod error;
pub mod game;
pub mod movegen;
pub mod snapshot;
pub mod validation;

pub use apply::{AppliedMove, MoveKind};
pub use board::Board;
pub use error::{BoundaryError, InvariantViolation, MoveRejected};
pub use game::{
    new_game,
    render,
    terminal_state,
    try_move,
    try_move_with,
    AlwaysQueen,
    Game,
    PromotionOracle,
};
pub use movegen::{GameState, LegalMoves, MoveList};
pub use snapshot::{Snapshot, SquareView};
