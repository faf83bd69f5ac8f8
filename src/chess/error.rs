//! Error taxonomy of the rules engine.
//!
//! - [`BoundaryError`]: coordinates outside of the board. This is a programming
//!   error and is never triggered by validated input.
//! - [`MoveRejected`]: an illegal move request. The board is left unchanged and
//!   the caller can try another move.
//! - [`InvariantViolation`]: internal consistency failure (e.g. a missing king).
//!   It is never recovered from and has to be reported.

use thiserror::Error;

use crate::chess::core::{Player, Square};

/// Coordinates outside of the 8x8 grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("coordinates out of the board: file {file}, rank {rank}")]
pub struct BoundaryError {
    #[allow(missing_docs)]
    pub file: i8,
    #[allow(missing_docs)]
    pub rank: i8,
}

/// The reason why a move request was rejected.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum MoveRejected {
    #[error("source and destination squares are the same")]
    SameSquare,
    #[error("there is no piece on the source square")]
    EmptySource,
    #[error("the piece belongs to the player who is not on move")]
    WrongTurn,
    #[error("a piece can not capture a piece of the same color")]
    SameColorCapture,
    #[error("the piece can not move this way")]
    BadGeometry,
    #[error("the path of the piece is blocked")]
    PathBlocked,
    #[error("the move would leave the king in check")]
    SelfCheck,
    #[error("the player on move has no king")]
    NoKingFound,
    #[error("pawn reached the last rank but no promotion piece was chosen")]
    MissingPromotion,
    #[error("promotion piece was given for a move that does not promote")]
    UnexpectedPromotion,
    /// The board is broken: the move would capture a king.
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),
}

/// Internal consistency failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum InvariantViolation {
    /// Each player has to have exactly one king.
    #[error("expected 1 {player:?} king, got 0")]
    MissingKing {
        #[allow(missing_docs)]
        player: Player,
    },
    /// There can be at most one king of each color.
    #[error("{player:?} already has a king on {existing}, can not place another on {square}")]
    DuplicateKing {
        #[allow(missing_docs)]
        player: Player,
        #[allow(missing_docs)]
        existing: Square,
        #[allow(missing_docs)]
        square: Square,
    },
    /// The king of the player who is not on move is attacked, so it could be
    /// captured.
    #[error("{player:?} king is in check while it is not {player:?} to move")]
    OpponentInCheck {
        #[allow(missing_docs)]
        player: Player,
    },
}
