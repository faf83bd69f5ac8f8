//! Mutation of the board by moves already proven legal by
//! [`crate::chess::validation`].

use crate::chess::board::Board;
use crate::chess::core::{
    CastleRights,
    CastlingSide,
    Move,
    Piece,
    PieceKind,
    Player,
    Promotion,
    Rank,
    Square,
};
use crate::chess::error::{InvariantViolation, MoveRejected};

/// Category of a legal move: decides which side effects the applier performs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MoveKind {
    /// Relocation to an empty square.
    Quiet,
    /// Pawn advancing two squares from its starting rank.
    DoublePush,
    /// Capture on the destination square.
    Capture,
    /// Pawn capturing the pawn that just double-pushed past it.
    EnPassant,
    /// King moving two squares towards the rook, the rook jumping over.
    Castle(CastlingSide),
    /// Pawn reaching the last rank, with or without a capture.
    Promotion,
}

/// Record of an applied move. Holds enough to explain the move to a
/// collaborator and to reason about what changed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AppliedMove {
    /// The move as played, including the promotion choice.
    pub played: Move,
    /// The moved piece before the move.
    pub piece: Piece,
    #[allow(missing_docs)]
    pub kind: MoveKind,
    /// Captured piece and the square it was captured on. For en passant the
    /// square differs from the destination.
    pub captured: Option<(Square, Piece)>,
    /// En passant target before the move.
    pub previous_en_passant: Option<Square>,
    /// Castle rights before the move.
    pub previous_castling: CastleRights,
}

/// Derives the kind of the move from the board. The move is expected to pass
/// geometry checks: a two-square king move is a castle, a diagonal pawn move to
/// an empty square is en passant.
pub(super) fn classify(board: &Board, next_move: Move) -> MoveKind {
    let Some(piece) = board.piece_at(next_move.from()) else {
        return MoveKind::Quiet;
    };
    let (file_delta, rank_delta) = next_move.from().delta(next_move.to());
    let target = board.piece_at(next_move.to());
    match piece.kind() {
        PieceKind::Pawn if next_move.to().rank() == Rank::promotion(piece.owner()) => {
            MoveKind::Promotion
        },
        PieceKind::Pawn if rank_delta.abs() == 2 => MoveKind::DoublePush,
        PieceKind::Pawn if file_delta != 0 && target.is_none() => MoveKind::EnPassant,
        PieceKind::King if rank_delta == 0 && file_delta.abs() == 2 => {
            MoveKind::Castle(if file_delta > 0 {
                CastlingSide::Short
            } else {
                CastlingSide::Long
            })
        },
        _ if target.is_some() => MoveKind::Capture,
        _ => MoveKind::Quiet,
    }
}

/// Square of the pawn captured en passant: behind the destination from the
/// capturing player's point of view, i.e. on the rank the capturer started on.
pub(super) const fn en_passant_victim(next_move: Move) -> Square {
    Square::new(next_move.to().file(), next_move.from().rank())
}

/// Moves the pieces of the move on the board: the capture, the en passant
/// victim removal, the castling rook relocation and the promotion
/// substitution. Rights, clocks and the side to move are left untouched.
/// Returns the captured piece with its square.
pub(super) fn relocate(
    board: &mut Board,
    next_move: Move,
    kind: MoveKind,
) -> Option<(Square, Piece)> {
    let mut piece = board.take(next_move.from())?;
    piece.record_move();
    let captured = match kind {
        MoveKind::EnPassant => {
            let square = en_passant_victim(next_move);
            board.take(square).map(|victim| (square, victim))
        },
        _ => board.piece_at(next_move.to()).map(|victim| (next_move.to(), victim)),
    };
    let placed = match kind {
        MoveKind::Promotion => Piece::with_move_count(
            piece.owner(),
            next_move.promotion().unwrap_or(Promotion::Queen).into(),
            piece.move_count(),
        ),
        _ => piece,
    };
    let _ = board.put(next_move.to(), Some(placed));
    if let MoveKind::Castle(side) = kind {
        let rank = next_move.from().rank();
        if let Some(mut rook) = board.take(Square::new(side.rook_file(), rank)) {
            rook.record_move();
            let _ = board.put(Square::new(side.rook_destination(), rank), Some(rook));
        }
    }
    captured
}

/// Applies a legal move to the board.
///
/// The move is not validated: calling this with a move that did not pass
/// [`crate::chess::validation::check_move`] leaves the board in an unspecified
/// (but memory-safe) state. Promotions are expected to carry the chosen piece;
/// a missing choice falls back to a queen.
///
/// # Errors
///
/// Returns [`MoveRejected::EmptySource`] if there is nothing to move and
/// [`MoveRejected::Invariant`] if the move would capture a king. The board is
/// not modified in either case.
pub fn apply(board: &mut Board, next_move: Move) -> Result<AppliedMove, MoveRejected> {
    let piece = board
        .piece_at(next_move.from())
        .ok_or(MoveRejected::EmptySource)?;
    if let Some(target) = board
        .piece_at(next_move.to())
        .filter(|target| target.kind() == PieceKind::King)
    {
        return Err(InvariantViolation::OpponentInCheck {
            player: target.owner(),
        }
        .into());
    }
    let kind = classify(board, next_move);
    debug_assert!(
        kind != MoveKind::Promotion || next_move.promotion().is_some(),
        "promotion piece has to be chosen before applying {next_move}"
    );
    let previous_en_passant = board.en_passant_target;
    let previous_castling = board.castling;

    let captured = relocate(board, next_move, kind);

    revoke_castle_rights(board, piece, next_move);
    board.en_passant_target = match kind {
        MoveKind::DoublePush => next_move.from().shift(piece.owner().push_direction()),
        _ => None,
    };
    board.halfmove_clock = if piece.kind() == PieceKind::Pawn || captured.is_some() {
        0
    } else {
        board.halfmove_clock.saturating_add(1)
    };
    if piece.owner() == Player::Black {
        board.fullmove_counter = board.fullmove_counter.saturating_add(1);
    }
    board.side_to_move = board.side_to_move.opponent();
    debug_assert!(board.verify_kings().is_ok(), "{board:?}");

    Ok(AppliedMove {
        played: next_move,
        piece,
        kind,
        captured,
        previous_en_passant,
        previous_castling,
    })
}

/// Castle rights are lost for good once the king moves, once the rook leaves
/// its corner and once anything lands on the corner (capturing the rook).
fn revoke_castle_rights(board: &mut Board, piece: Piece, next_move: Move) {
    if piece.kind() == PieceKind::King {
        board.castling.remove(CastleRights::both(piece.owner()));
    }
    for player in [Player::White, Player::Black] {
        for side in [CastlingSide::Short, CastlingSide::Long] {
            let corner = Square::new(side.rook_file(), Rank::backrank(player));
            if next_move.from() == corner || next_move.to() == corner {
                board.castling.remove(CastleRights::side(player, side));
            }
        }
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn play(board: &mut Board, uci: &str) -> AppliedMove {
        apply(board, Move::from_uci(uci).unwrap()).unwrap()
    }

    #[test]
    fn double_push() {
        let mut board = Board::starting();
        let applied = play(&mut board, "e2e4");
        assert_eq!(applied.kind, MoveKind::DoublePush);
        assert_eq!(applied.captured, None);
        assert_eq!(applied.piece, Piece::new(Player::White, PieceKind::Pawn));
        assert_eq!(board.en_passant_target(), Some(Square::E3));
        assert_eq!(
            board.to_string(),
            "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
        );
        assert_eq!(board.piece_at(Square::E4).unwrap().move_count(), 1);

        let applied = play(&mut board, "g8f6");
        assert_eq!(applied.kind, MoveKind::Quiet);
        assert_eq!(applied.previous_en_passant, Some(Square::E3));
        assert_eq!(
            board.to_string(),
            "rnbqkb1r/pppppppp/5n2/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2"
        );
    }

    #[test]
    fn move_counts_only_change_for_moved_pieces() {
        let mut board = Board::starting();
        let _ = play(&mut board, "g1f3");
        let _ = play(&mut board, "g8f6");
        let _ = play(&mut board, "f3g1");
        assert_eq!(board.piece_at(Square::G1).unwrap().move_count(), 2);
        assert_eq!(board.piece_at(Square::F6).unwrap().move_count(), 1);
        assert!(board
            .pieces(Player::White)
            .filter(|(square, _)| *square != Square::G1)
            .all(|(_, piece)| !piece.has_moved()));
    }

    #[test]
    fn capture() {
        let mut board = Board::from_fen("4k3/8/8/3p4/4P3/8/8/4K3 w - - 7 30").unwrap();
        let applied = play(&mut board, "e4d5");
        assert_eq!(applied.kind, MoveKind::Capture);
        assert_eq!(
            applied.captured,
            Some((Square::D5, Piece::with_move_count(Player::Black, PieceKind::Pawn, 1)))
        );
        assert_eq!(board.to_string(), "4k3/8/8/3P4/8/8/8/4K3 b - - 0 30");
    }

    #[test]
    fn en_passant() {
        let fen = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3";
        let mut board = Board::from_fen(fen).unwrap();
        let applied = play(&mut board, "e5f6");
        assert_eq!(applied.kind, MoveKind::EnPassant);
        assert_eq!(
            applied.captured.map(|(square, piece)| (square, piece.kind())),
            Some((Square::F5, PieceKind::Pawn))
        );
        assert_eq!(
            board.to_string(),
            "rnbqkbnr/ppp1p1pp/5P2/3p4/8/8/PPPP1PPP/RNBQKBNR b KQkq - 0 3"
        );
    }

    #[test]
    fn castle() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 3 20").unwrap();
        let applied = play(&mut board, "e1g1");
        assert_eq!(applied.kind, MoveKind::Castle(CastlingSide::Short));
        assert_eq!(board.to_string(), "r3k2r/8/8/8/8/8/8/R4RK1 b kq - 4 20");
        assert_eq!(board.piece_at(Square::F1).unwrap().move_count(), 1);
        assert_eq!(board.piece_at(Square::G1).unwrap().move_count(), 1);

        let applied = play(&mut board, "e8c8");
        assert_eq!(applied.kind, MoveKind::Castle(CastlingSide::Long));
        assert_eq!(applied.previous_castling, CastleRights::BLACK_BOTH);
        assert_eq!(board.to_string(), "2kr3r/8/8/8/8/8/8/R4RK1 w - - 5 21");
    }

    #[test]
    fn rook_moves_and_captures_revoke_rights() {
        let mut board = Board::from_fen("r3k2r/8/8/8/8/8/8/R3K2R w KQkq - 0 1").unwrap();
        let _ = play(&mut board, "a1a8");
        assert_eq!(board.castling(), CastleRights::WHITE_SHORT | CastleRights::BLACK_SHORT);
        let _ = play(&mut board, "h8h1");
        assert_eq!(board.castling(), CastleRights::empty());
    }

    #[test]
    fn promotion() {
        let mut board = Board::from_fen("1r2k3/P7/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let applied = play(&mut board, "a7b8n");
        assert_eq!(applied.kind, MoveKind::Promotion);
        assert_eq!(
            applied.captured.map(|(square, piece)| (square, piece.kind())),
            Some((Square::B8, PieceKind::Rook))
        );
        let knight = board.piece_at(Square::B8).unwrap();
        assert_eq!(knight.kind(), PieceKind::Knight);
        assert_eq!(knight.owner(), Player::White);
        assert_eq!(knight.move_count(), 2);
        assert_eq!(board.to_string(), "1N2k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn empty_source() {
        let mut board = Board::starting();
        let before = board.clone();
        assert_eq!(
            apply(&mut board, Move::from_uci("e4e5").unwrap()),
            Err(MoveRejected::EmptySource)
        );
        assert_eq!(board, before);
    }

    #[test]
    fn king_is_never_captured() {
        let mut board = Board::empty();
        for (square, player, kind) in [
            (Square::E8, Player::Black, PieceKind::King),
            (Square::E1, Player::White, PieceKind::Rook),
            (Square::G1, Player::White, PieceKind::King),
        ] {
            assert!(board.place(square, Some(Piece::new(player, kind))).is_ok());
        }
        let before = board.clone();
        assert_eq!(
            apply(&mut board, Move::from_uci("e1e8").unwrap()),
            Err(MoveRejected::Invariant(InvariantViolation::OpponentInCheck {
                player: Player::Black
            }))
        );
        assert_eq!(board, before);
    }
}
