//! Threat detection: whether a piece reaches a square by its geometry and a
//! clear path alone.
//!
//! Attack queries never consult the self-check guard of the attacker. The
//! validator builds on top of these queries, so the other way around would
//! never terminate.

use crate::chess::board::Board;
use crate::chess::core::{
    distance,
    is_diagonal,
    is_orthogonal,
    squares_between,
    PieceKind,
    Player,
    Square,
};

/// Returns true if the piece on `from` attacks `to` on the given board. The
/// occupant of `to` is not inspected: a piece "attacks" the squares it could
/// capture on.
///
/// Pawns attack one square diagonally forward only, independently of whether
/// they could advance.
#[must_use]
pub fn attacks(board: &Board, from: Square, to: Square) -> bool {
    let Some(piece) = board.piece_at(from) else {
        return false;
    };
    if from == to {
        return false;
    }
    let (file_delta, rank_delta) = from.delta(to);
    match piece.kind() {
        PieceKind::Pawn => {
            let (_, forward) = piece.owner().push_direction().delta();
            rank_delta == forward && file_delta.abs() == 1
        },
        PieceKind::Knight => matches!(
            (file_delta.abs(), rank_delta.abs()),
            (1, 2) | (2, 1)
        ),
        PieceKind::Bishop => is_diagonal(from, to) && path_is_clear(board, from, to),
        PieceKind::Rook => is_orthogonal(from, to) && path_is_clear(board, from, to),
        PieceKind::Queen => {
            (is_diagonal(from, to) || is_orthogonal(from, to)) && path_is_clear(board, from, to)
        },
        PieceKind::King => distance(from, to) == 1,
    }
}

/// All squares strictly between `from` and `to` are empty.
#[must_use]
pub fn path_is_clear(board: &Board, from: Square, to: Square) -> bool {
    squares_between(from, to).all(|square| board.piece_at(square).is_none())
}

/// Squares of the `attacker` pieces that attack `square`, ascending.
pub fn attackers(
    board: &Board,
    square: Square,
    attacker: Player,
) -> impl Iterator<Item = Square> + '_ {
    board
        .pieces(attacker)
        .map(|(from, _)| from)
        .filter(move |&from| attacks(board, from, square))
}

/// Returns true if any piece of `attacker` attacks `square`.
#[must_use]
pub fn is_attacked(board: &Board, square: Square, attacker: Player) -> bool {
    attackers(board, square, attacker).next().is_some()
}

/// Returns true if the king of `player` is attacked by the opponent. A board
/// without the king of `player` reports no check.
#[must_use]
pub fn is_in_check(board: &Board, player: Player) -> bool {
    board
        .king(player)
        .is_some_and(|king| is_attacked(board, king, player.opponent()))
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;

    fn board(fen: &str) -> Board {
        Board::from_fen(fen).unwrap()
    }

    #[test]
    fn starting_position() {
        let board = Board::starting();
        assert!(!is_in_check(&board, Player::White));
        assert!(!is_in_check(&board, Player::Black));
        // Knights and pawns cover the third rank.
        assert!(is_attacked(&board, Square::F3, Player::White));
        assert!(is_attacked(&board, Square::A3, Player::White));
        assert!(!is_attacked(&board, Square::E4, Player::White));
        assert!(!is_attacked(&board, Square::E5, Player::Black));
        assert_eq!(
            attackers(&board, Square::F6, Player::Black).collect::<Vec<_>>(),
            vec![Square::E7, Square::G7, Square::G8]
        );
    }

    #[test]
    fn pawns_attack_diagonally_only() {
        let board = board("4k3/8/8/3p4/4P3/8/8/4K3 w - - 0 1");
        assert!(attacks(&board, Square::E4, Square::D5));
        assert!(attacks(&board, Square::E4, Square::F5));
        assert!(!attacks(&board, Square::E4, Square::E5));
        assert!(!attacks(&board, Square::E4, Square::D3));
        assert!(attacks(&board, Square::D5, Square::E4));
        assert!(attacks(&board, Square::D5, Square::C4));
        assert!(!attacks(&board, Square::D5, Square::D4));
        assert!(!attacks(&board, Square::D5, Square::E6));
    }

    #[test]
    fn sliders_are_blocked() {
        let board = board("4k3/8/8/8/1b6/8/3P4/R3K3 w - - 0 1");
        assert!(!attacks(&board, Square::B4, Square::E1));
        assert!(attacks(&board, Square::B4, Square::D2));
        assert!(attacks(&board, Square::A1, Square::D1));
        assert!(attacks(&board, Square::A1, Square::E1));
        assert!(!attacks(&board, Square::A1, Square::F1));
        assert!(attacks(&board, Square::A1, Square::A8));
        assert!(!attacks(&board, Square::A1, Square::B2));
        assert!(!is_in_check(&board, Player::White));
    }

    #[test]
    fn knight_and_king_geometry() {
        let board = board("4k3/8/8/4n3/8/8/8/4K3 w - - 0 1");
        for target in [
            Square::D7,
            Square::F7,
            Square::C6,
            Square::G6,
            Square::C4,
            Square::G4,
            Square::D3,
            Square::F3,
        ] {
            assert!(attacks(&board, Square::E5, target), "{target}");
        }
        assert!(!attacks(&board, Square::E5, Square::E3));
        assert!(attacks(&board, Square::E1, Square::D2));
        assert!(!attacks(&board, Square::E1, Square::E3));
        assert!(!attacks(&board, Square::E4, Square::E5));
    }

    #[test]
    fn check() {
        let board = board("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3");
        assert!(is_in_check(&board, Player::White));
        assert!(!is_in_check(&board, Player::Black));
        assert_eq!(
            attackers(&board, Square::E1, Player::Black).collect::<Vec<_>>(),
            vec![Square::H4]
        );
    }

    #[test]
    fn no_king_no_check() {
        let mut board = Board::starting();
        assert!(board.place(Square::E1, None).is_ok());
        assert!(!is_in_check(&board, Player::White));
    }
}
