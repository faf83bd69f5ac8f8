//! Legal move enumeration and terminal state classification.

use arrayvec::ArrayVec;

use crate::chess::apply::{apply, MoveKind};
use crate::chess::attacks::is_in_check;
use crate::chess::board::Board;
use crate::chess::core::{Move, Player, Promotion, Square, BOARD_SIZE};
use crate::chess::error::InvariantViolation;
use crate::chess::validation::check_move;

/// Legal chess position has at most 218 moves, 256 leaves some headroom.
pub const MAX_MOVES: usize = 256;

/// Moves are stored on stack to avoid memory allocations.
pub type MoveList = ArrayVec<Move, MAX_MOVES>;

/// Lazy sequence of the legal moves of the player to move.
///
/// Moves come in ascending order of the source square, then the destination
/// square. A promotion yields one move per piece in [`Promotion::ALL`] order.
/// The sequence is restartable: clone it before consuming or call
/// [`legal_moves`] again.
#[derive(Clone, Debug)]
pub struct LegalMoves<'a> {
    board: &'a Board,
    from: usize,
    to: usize,
    promotions: Option<(Move, usize)>,
}

impl<'a> LegalMoves<'a> {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(board: &'a Board) -> Self {
        Self {
            board,
            from: 0,
            to: 0,
            promotions: None,
        }
    }
}

impl Iterator for LegalMoves<'_> {
    type Item = Move;

    fn next(&mut self) -> Option<Move> {
        loop {
            if let Some((base, index)) = self.promotions {
                if let Some(&promotion) = Promotion::ALL.get(index) {
                    self.promotions = Some((base, index + 1));
                    return Some(base.with_promotion(promotion));
                }
                self.promotions = None;
            }
            let from = *Square::ALL.get(self.from)?;
            let own_piece = self
                .board
                .piece_at(from)
                .is_some_and(|piece| piece.owner() == self.board.side_to_move());
            if !own_piece {
                self.from += 1;
                self.to = 0;
                continue;
            }
            let to = Square::ALL[self.to];
            self.to += 1;
            if self.to == BOARD_SIZE as usize {
                self.from += 1;
                self.to = 0;
            }
            let candidate = Move::new(from, to, None);
            match check_move(self.board, candidate) {
                Ok(MoveKind::Promotion) => self.promotions = Some((candidate, 0)),
                Ok(_) => return Some(candidate),
                Err(_) => (),
            }
        }
    }
}

/// Enumerates the legal moves of the player to move lazily.
#[must_use]
pub const fn legal_moves(board: &Board) -> LegalMoves<'_> {
    LegalMoves::new(board)
}

/// Collects all legal moves of the player to move.
#[must_use]
pub fn generate_moves(board: &Board) -> MoveList {
    legal_moves(board).collect()
}

/// Whether the player to move has any legal move.
#[must_use]
pub fn has_legal_moves(board: &Board) -> bool {
    legal_moves(board).next().is_some()
}

/// State of the game for the player to move. It is derived from the board and
/// never stored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GameState {
    /// The player to move is not in check and has a legal move.
    Normal,
    /// The king of the player is attacked and there is a way out.
    Check(Player),
    /// The king of the player is attacked and there is no legal move.
    Checkmate(Player),
    /// The player is not in check but has no legal move.
    Stalemate(Player),
}

impl GameState {
    /// The game is over: checkmate or stalemate.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Checkmate(_) | Self::Stalemate(_))
    }
}

/// Classifies the position for the player to move.
///
/// # Errors
///
/// Returns [`InvariantViolation`] unless each player has exactly one king and
/// the king of the player who is not on move is safe.
pub fn terminal_state(board: &Board) -> Result<GameState, InvariantViolation> {
    board.verify_kings()?;
    let us = board.side_to_move();
    if is_in_check(board, us.opponent()) {
        return Err(InvariantViolation::OpponentInCheck {
            player: us.opponent(),
        });
    }
    Ok(match (is_in_check(board, us), has_legal_moves(board)) {
        (true, true) => GameState::Check(us),
        (true, false) => GameState::Checkmate(us),
        (false, true) => GameState::Normal,
        (false, false) => GameState::Stalemate(us),
    })
}

/// [Perft] (**per**formance **t**esting) counts the leaf nodes of the legal
/// move tree of a given depth. It is the standard correctness test for move
/// generators.
///
/// [Perft]: https://www.chessprogramming.org/Perft
#[must_use]
pub fn perft(board: &Board, depth: u8) -> u64 {
    if depth == 0 {
        return 1;
    }
    let moves = generate_moves(board);
    if depth == 1 {
        return moves.len() as u64;
    }
    moves
        .iter()
        .map(|next_move| {
            let mut next = board.clone();
            match apply(&mut next, *next_move) {
                Ok(_) => perft(&next, depth - 1),
                Err(_) => 0,
            }
        })
        .sum()
}

#[cfg(test)]
mod test {
    use itertools::Itertools;
    use pretty_assertions::assert_eq;

    use super::*;

    fn moves(fen: &str) -> Vec<String> {
        let board = Board::from_fen(fen).unwrap();
        legal_moves(&board).map(|next_move| next_move.to_string()).collect()
    }

    #[test]
    fn starting_moves() {
        let board = Board::starting();
        assert_eq!(
            legal_moves(&board).map(|next_move| next_move.to_string()).collect_vec(),
            vec![
                "b1a3", "b1c3", "g1f3", "g1h3", "a2a3", "a2a4", "b2b3", "b2b4", "c2c3", "c2c4",
                "d2d3", "d2d4", "e2e3", "e2e4", "f2f3", "f2f4", "g2g3", "g2g4", "h2h3", "h2h4",
            ]
        );
    }

    #[test]
    fn restartable() {
        let board = Board::starting();
        let mut moves = legal_moves(&board);
        let _ = moves.next();
        let rest = moves.clone();
        assert_eq!(moves.count(), 19);
        assert_eq!(rest.count(), 19);
        assert_eq!(legal_moves(&board).count(), 20);
        assert_eq!(generate_moves(&board).len(), 20);
    }

    #[test]
    fn promotions() {
        assert_eq!(
            moves("1r5k/P7/7K/8/8/8/8/8 w - - 0 1"),
            vec![
                "h6g5", "h6h5", "h6g6", "a7a8q", "a7a8r", "a7a8b", "a7a8n", "a7b8q", "a7b8r",
                "a7b8b", "a7b8n",
            ]
        );
    }

    #[test]
    fn check_evasions() {
        // Only the king can move, the rook on the e-file checks.
        assert_eq!(
            moves("4r1k1/8/8/8/8/8/8/4K3 w - - 0 1"),
            vec!["e1d1", "e1f1", "e1d2", "e1f2"]
        );
    }

    #[test]
    fn states() {
        let state = |fen: &str| terminal_state(&Board::from_fen(fen).unwrap());
        assert_eq!(
            state("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"),
            Ok(GameState::Normal)
        );
        assert_eq!(state("4r1k1/8/8/8/8/8/8/4K3 w - - 0 1"), Ok(GameState::Check(Player::White)));
        assert_eq!(
            state("rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"),
            Ok(GameState::Checkmate(Player::White))
        );
        assert_eq!(
            state("7k/5Q2/6K1/8/8/8/8/8 b - - 0 1"),
            Ok(GameState::Stalemate(Player::Black))
        );
        assert!(GameState::Stalemate(Player::Black).is_terminal());
        assert!(!GameState::Check(Player::White).is_terminal());
    }

    #[test]
    fn missing_king() {
        let mut board = Board::starting();
        assert!(board.place(Square::E8, None).is_ok());
        assert_eq!(
            terminal_state(&board),
            Err(InvariantViolation::MissingKing {
                player: Player::Black
            })
        );
    }

    #[test]
    fn perft_starting() {
        let board = Board::starting();
        assert_eq!(perft(&board, 0), 1);
        assert_eq!(perft(&board, 1), 20);
        assert_eq!(perft(&board, 2), 400);
    }
}
