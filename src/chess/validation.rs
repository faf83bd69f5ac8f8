//! Move legality: a pure function of a board and a move request.
//!
//! Validation never mutates the board it is given. The self-check guard runs
//! the move on a scratch copy.

use crate::chess::apply::{self, MoveKind};
use crate::chess::attacks::{is_attacked, is_in_check, path_is_clear};
use crate::chess::board::Board;
use crate::chess::core::{
    distance,
    is_diagonal,
    is_orthogonal,
    squares_between,
    CastleRights,
    CastlingSide,
    File,
    Move,
    Piece,
    PieceKind,
    Rank,
    Square,
};
use crate::chess::error::{InvariantViolation, MoveRejected};

/// Decides whether the player to move can make the move, and classifies it.
///
/// A pawn move to the last rank passes without a promotion piece: the choice
/// is up to the caller (see [`crate::chess::game::PromotionOracle`]). A
/// promotion piece on any other move is rejected.
///
/// # Errors
///
/// Returns the first reason the move is illegal for, checked in order: the
/// squares, the moving piece, the destination, the king presence, the piece
/// geometry and path, and the self-check guard. A move that would capture the
/// opponent's king is rejected with [`MoveRejected::Invariant`]: such a board
/// can not be reached by legal play.
pub fn check_move(board: &Board, next_move: Move) -> Result<MoveKind, MoveRejected> {
    let (from, to) = (next_move.from(), next_move.to());
    if from == to {
        return Err(MoveRejected::SameSquare);
    }
    let piece = board.piece_at(from).ok_or(MoveRejected::EmptySource)?;
    let us = board.side_to_move();
    if piece.owner() != us {
        return Err(MoveRejected::WrongTurn);
    }
    if board.piece_at(to).is_some_and(|target| target.owner() == us) {
        return Err(MoveRejected::SameColorCapture);
    }
    if board.king(us).is_none() {
        return Err(MoveRejected::NoKingFound);
    }
    let kind = match piece.kind() {
        PieceKind::Pawn => check_pawn(board, piece, from, to)?,
        PieceKind::Knight => {
            let (file_delta, rank_delta) = from.delta(to);
            if !matches!((file_delta.abs(), rank_delta.abs()), (1, 2) | (2, 1)) {
                return Err(MoveRejected::BadGeometry);
            }
            apply::classify(board, next_move)
        },
        PieceKind::Bishop => check_slider(board, next_move, is_diagonal(from, to))?,
        PieceKind::Rook => check_slider(board, next_move, is_orthogonal(from, to))?,
        PieceKind::Queen => check_slider(
            board,
            next_move,
            is_diagonal(from, to) || is_orthogonal(from, to),
        )?,
        PieceKind::King => check_king(board, piece, from, to)?,
    };
    if board.piece_at(to).is_some_and(|target| target.kind() == PieceKind::King) {
        return Err(InvariantViolation::OpponentInCheck {
            player: us.opponent(),
        }
        .into());
    }
    match (kind, next_move.promotion()) {
        (MoveKind::Promotion, _) | (_, None) => (),
        (_, Some(_)) => return Err(MoveRejected::UnexpectedPromotion),
    }
    let mut scratch = board.clone();
    let _ = apply::relocate(&mut scratch, next_move, kind);
    if is_in_check(&scratch, us) {
        return Err(MoveRejected::SelfCheck);
    }
    Ok(kind)
}

/// Returns true if the player to move can make the move. See [`check_move`].
#[must_use]
pub fn is_legal(board: &Board, next_move: Move) -> bool {
    check_move(board, next_move).is_ok()
}

fn check_slider(board: &Board, next_move: Move, on_line: bool) -> Result<MoveKind, MoveRejected> {
    if !on_line {
        return Err(MoveRejected::BadGeometry);
    }
    if !path_is_clear(board, next_move.from(), next_move.to()) {
        return Err(MoveRejected::PathBlocked);
    }
    Ok(apply::classify(board, next_move))
}

fn check_pawn(
    board: &Board,
    pawn: Piece,
    from: Square,
    to: Square,
) -> Result<MoveKind, MoveRejected> {
    let (_, forward) = pawn.owner().push_direction().delta();
    let (file_delta, rank_delta) = from.delta(to);
    let target = board.piece_at(to);
    let next_move = Move::new(from, to, None);
    match (file_delta.abs(), rank_delta) {
        (0, delta) if delta == forward => {
            if target.is_some() {
                return Err(MoveRejected::PathBlocked);
            }
        },
        (0, delta) if delta == 2 * forward => {
            if pawn.has_moved() {
                return Err(MoveRejected::BadGeometry);
            }
            if target.is_some() || !path_is_clear(board, from, to) {
                return Err(MoveRejected::PathBlocked);
            }
        },
        (1, delta) if delta == forward => {
            if target.is_none() && !en_passant_available(board, pawn, next_move) {
                return Err(MoveRejected::BadGeometry);
            }
        },
        _ => return Err(MoveRejected::BadGeometry),
    }
    Ok(apply::classify(board, next_move))
}

/// The destination is the en passant target and the pawn behind it has just
/// made its first move: a double push.
fn en_passant_available(board: &Board, pawn: Piece, next_move: Move) -> bool {
    if board.en_passant_target() != Some(next_move.to()) {
        return false;
    }
    board
        .piece_at(apply::en_passant_victim(next_move))
        .is_some_and(|victim| {
            victim.kind() == PieceKind::Pawn
                && victim.owner() == pawn.owner().opponent()
                && victim.move_count() == 1
        })
}

fn check_king(
    board: &Board,
    king: Piece,
    from: Square,
    to: Square,
) -> Result<MoveKind, MoveRejected> {
    let next_move = Move::new(from, to, None);
    if distance(from, to) == 1 {
        return Ok(apply::classify(board, next_move));
    }
    let (file_delta, rank_delta) = from.delta(to);
    if rank_delta != 0 || file_delta.abs() != 2 {
        return Err(MoveRejected::BadGeometry);
    }
    let us = king.owner();
    let side = if file_delta > 0 {
        CastlingSide::Short
    } else {
        CastlingSide::Long
    };
    let backrank = Rank::backrank(us);
    if king.has_moved()
        || from != Square::new(File::E, backrank)
        || to != Square::new(side.king_destination(), backrank)
        || !board.castling().contains(CastleRights::side(us, side))
    {
        return Err(MoveRejected::BadGeometry);
    }
    let rook_square = Square::new(side.rook_file(), backrank);
    let rook_in_place = board.piece_at(rook_square).is_some_and(|rook| {
        rook.kind() == PieceKind::Rook && rook.owner() == us && !rook.has_moved()
    });
    if !rook_in_place {
        return Err(MoveRejected::BadGeometry);
    }
    if !path_is_clear(board, from, rook_square) {
        return Err(MoveRejected::PathBlocked);
    }
    // The king may not castle out of, through or into check.
    let mut king_path = std::iter::once(from)
        .chain(squares_between(from, to))
        .chain([to]);
    if king_path.any(|square| is_attacked(board, square, us.opponent())) {
        return Err(MoveRejected::SelfCheck);
    }
    Ok(MoveKind::Castle(side))
}
