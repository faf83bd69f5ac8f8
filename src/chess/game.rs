//! The boundary of the rules engine consumed by presentation layers: submit a
//! move, receive the outcome and a snapshot to render.
//!
//! A turn goes through the validator first, then (for promotions without a
//! chosen piece) through the [`PromotionOracle`], and only then through the
//! applier. A rejected move leaves the board untouched.

use tracing::{debug, error, trace};

use crate::chess::apply::{apply, AppliedMove, MoveKind};
use crate::chess::board::Board;
use crate::chess::core::{Move, Player, Promotion};
use crate::chess::error::{InvariantViolation, MoveRejected};
use crate::chess::movegen::{self, GameState};
use crate::chess::snapshot::Snapshot;
use crate::chess::validation::check_move;

/// Source of the promotion choice, e.g. a dialog in the user interface. It is
/// consulted after the move is proven legal and before it is applied, only
/// when a pawn reaches the last rank and the move does not carry a choice.
pub trait PromotionOracle {
    /// Picks the piece the pawn of `player` turns into.
    fn choose_promotion(&mut self, player: Player) -> Promotion;
}

/// Promotes to a queen. The fallback for callers that can not ask.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AlwaysQueen;

impl PromotionOracle for AlwaysQueen {
    fn choose_promotion(&mut self, _: Player) -> Promotion {
        Promotion::Queen
    }
}

impl<F: FnMut(Player) -> Promotion> PromotionOracle for F {
    fn choose_promotion(&mut self, player: Player) -> Promotion {
        self(player)
    }
}

/// Creates the board of a new game in the standard starting position.
#[must_use]
pub fn new_game() -> Board {
    Board::starting()
}

/// Validates and applies the move.
///
/// # Errors
///
/// Returns the reason the move was rejected: see
/// [`crate::chess::validation::check_move`]. A pawn reaching the last rank
/// without a chosen piece is rejected with [`MoveRejected::MissingPromotion`].
pub fn try_move(board: &mut Board, next_move: Move) -> Result<AppliedMove, MoveRejected> {
    let kind = validate(board, next_move)?;
    if kind == MoveKind::Promotion && next_move.promotion().is_none() {
        debug!(%next_move, "rejected move: missing promotion piece");
        return Err(MoveRejected::MissingPromotion);
    }
    commit(board, next_move)
}

/// Validates and applies the move, consulting the oracle if a pawn reaches the
/// last rank without a chosen piece.
///
/// # Errors
///
/// Returns the reason the move was rejected.
pub fn try_move_with(
    board: &mut Board,
    next_move: Move,
    oracle: &mut impl PromotionOracle,
) -> Result<AppliedMove, MoveRejected> {
    let kind = validate(board, next_move)?;
    let next_move = match (kind, next_move.promotion()) {
        (MoveKind::Promotion, None) => {
            let player = board.side_to_move();
            let promotion = oracle.choose_promotion(player);
            trace!(%next_move, ?player, %promotion, "consulted promotion oracle");
            next_move.with_promotion(promotion)
        },
        _ => next_move,
    };
    commit(board, next_move)
}

fn validate(board: &Board, next_move: Move) -> Result<MoveKind, MoveRejected> {
    check_move(board, next_move).inspect_err(|reason| match reason {
        MoveRejected::Invariant(violation) => {
            error!(%next_move, %violation, fen = %board, "board invariant violated");
        },
        _ => debug!(%next_move, ?reason, "rejected move"),
    })
}

fn commit(board: &mut Board, next_move: Move) -> Result<AppliedMove, MoveRejected> {
    let applied = apply(board, next_move)?;
    debug!(
        played = %applied.played,
        kind = ?applied.kind,
        captured = ?applied.captured,
        "applied move"
    );
    Ok(applied)
}

/// Classifies the position for the player to move.
///
/// # Errors
///
/// Returns [`InvariantViolation`] unless each player has exactly one king.
pub fn terminal_state(board: &Board) -> Result<GameState, InvariantViolation> {
    movegen::terminal_state(board).inspect_err(|violation| {
        error!(%violation, fen = %board, "board invariant violated");
    })
}

/// Read-only copy of the board for the presentation layer.
#[must_use]
pub fn render(board: &Board) -> Snapshot {
    board.snapshot()
}

/// A game in progress: the live board and the history of the played moves,
/// which allows taking moves back.
#[derive(Clone, Debug, Default)]
pub struct Game {
    board: Board,
    history: Vec<(Board, AppliedMove)>,
}

impl Game {
    /// Starts a new game from the standard starting position.
    #[must_use]
    pub fn new() -> Self {
        Self::from_board(new_game())
    }

    /// Starts a game from an arbitrary position.
    #[must_use]
    pub const fn from_board(board: Board) -> Self {
        Self {
            board,
            history: Vec::new(),
        }
    }

    /// Starts a game from a FEN position.
    ///
    /// # Errors
    ///
    /// Returns an error if the FEN is not valid, see [`Board::try_from`].
    pub fn from_fen(fen: &str) -> anyhow::Result<Self> {
        Ok(Self::from_board(Board::try_from(fen)?))
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// Moves played so far, oldest first.
    pub fn moves(&self) -> impl Iterator<Item = &AppliedMove> {
        self.history.iter().map(|(_, applied)| applied)
    }

    /// See [`try_move`].
    ///
    /// # Errors
    ///
    /// Returns the reason the move was rejected. The game is not changed.
    pub fn try_move(&mut self, next_move: Move) -> Result<AppliedMove, MoveRejected> {
        let before = self.board.clone();
        let applied = try_move(&mut self.board, next_move)?;
        self.history.push((before, applied));
        Ok(applied)
    }

    /// See [`try_move_with`].
    ///
    /// # Errors
    ///
    /// Returns the reason the move was rejected. The game is not changed.
    pub fn try_move_with(
        &mut self,
        next_move: Move,
        oracle: &mut impl PromotionOracle,
    ) -> Result<AppliedMove, MoveRejected> {
        let before = self.board.clone();
        let applied = try_move_with(&mut self.board, next_move, oracle)?;
        self.history.push((before, applied));
        Ok(applied)
    }

    /// Takes back the last move and returns it. The board is restored exactly.
    pub fn undo(&mut self) -> Option<AppliedMove> {
        let (board, applied) = self.history.pop()?;
        debug!(played = %applied.played, "took back move");
        self.board = board;
        Some(applied)
    }

    /// See [`terminal_state`].
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation`] unless each player has exactly one king.
    pub fn terminal_state(&self) -> Result<GameState, InvariantViolation> {
        terminal_state(&self.board)
    }

    /// See [`render`].
    #[must_use]
    pub fn render(&self) -> Snapshot {
        render(&self.board)
    }
}

#[cfg(test)]
mod test {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::chess::core::{Piece, PieceKind, Square};

    fn uci(input: &str) -> Move {
        Move::from_uci(input).unwrap()
    }

    #[test]
    fn rejected_move_keeps_board() {
        let mut board = new_game();
        assert_eq!(try_move(&mut board, uci("e2e5")), Err(MoveRejected::BadGeometry));
        assert_eq!(board, Board::starting());
    }

    #[test]
    fn missing_promotion() {
        let fen = "8/4P1k1/8/8/8/8/8/4K3 w - - 0 1";
        let mut board = Board::from_fen(fen).unwrap();
        assert_eq!(try_move(&mut board, uci("e7e8")), Err(MoveRejected::MissingPromotion));
        assert_eq!(board.to_string(), fen);
        let applied = try_move(&mut board, uci("e7e8r")).unwrap();
        assert_eq!(applied.played, uci("e7e8r"));
        assert_eq!(board.piece_at(Square::E8).map(|piece| piece.kind()), Some(PieceKind::Rook));
    }

    #[test]
    fn oracle() {
        let mut board = Board::from_fen("8/4P1k1/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mut asked = Vec::new();
        let mut oracle = |player: Player| {
            asked.push(player);
            Promotion::Knight
        };
        let applied = try_move_with(&mut board, uci("e7e8"), &mut oracle).unwrap();
        assert_eq!(applied.played, uci("e7e8n"));
        assert_eq!(asked, vec![Player::White]);
        assert_eq!(board.piece_at(Square::E8).map(|piece| piece.kind()), Some(PieceKind::Knight));
    }

    #[test]
    fn oracle_not_consulted() {
        let mut game = Game::from_fen("8/4P1k1/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let mut oracle = |_: Player| -> Promotion { panic!("no promotion expected") };
        assert!(game.try_move_with(uci("e1d1"), &mut oracle).is_ok());
        assert_eq!(
            game.try_move_with(uci("g7g6q"), &mut oracle),
            Err(MoveRejected::UnexpectedPromotion)
        );
        assert!(game.try_move_with(uci("g7f7"), &mut oracle).is_ok());
        // The choice in the move wins over the oracle.
        assert!(game.try_move_with(uci("e7e8b"), &mut oracle).is_ok());
        assert_eq!(
            game.board().piece_at(Square::E8).map(|piece| piece.kind()),
            Some(PieceKind::Bishop)
        );
    }

    #[test]
    fn always_queen() {
        let mut game = Game::from_fen("8/4P1k1/8/8/8/8/8/4K3 w - - 0 1").unwrap();
        let applied = game.try_move_with(uci("e7e8"), &mut AlwaysQueen).unwrap();
        assert_eq!(applied.played.promotion(), Some(Promotion::Queen));
    }

    #[test]
    fn undo() {
        let mut game = Game::new();
        assert_eq!(game.undo(), None);
        let applied = game.try_move(uci("e2e4")).unwrap();
        assert!(game.try_move(uci("e2e4")).is_err());
        assert_eq!(game.moves().count(), 1);
        assert_eq!(game.undo(), Some(applied));
        assert_eq!(game.board(), &Board::starting());
        assert_eq!(game.moves().count(), 0);
    }

    #[test]
    fn game_flow() {
        let mut game = Game::new();
        for next_move in ["f2f3", "e7e5", "g2g4"] {
            assert!(game.try_move(uci(next_move)).is_ok());
            assert_eq!(game.terminal_state(), Ok(GameState::Normal));
        }
        assert!(game.try_move(uci("d8h4")).is_ok());
        assert_eq!(game.terminal_state(), Ok(GameState::Checkmate(Player::White)));
        assert_eq!(game.render(), game.board().snapshot());
    }

    #[test]
    fn exposed_king_is_reported() {
        let mut board = Board::empty();
        for (square, player, kind) in [
            (Square::E8, Player::Black, PieceKind::King),
            (Square::E1, Player::White, PieceKind::Rook),
            (Square::G1, Player::White, PieceKind::King),
        ] {
            assert!(board.place(square, Some(Piece::new(player, kind))).is_ok());
        }
        let violation = InvariantViolation::OpponentInCheck {
            player: Player::Black,
        };
        let mut game = Game::from_board(board.clone());
        assert_eq!(game.terminal_state(), Err(violation));
        assert_eq!(
            game.try_move(uci("e1e8")),
            Err(MoveRejected::Invariant(violation))
        );
        assert_eq!(game.board(), &board);
        assert_eq!(game.moves().count(), 0);
        assert!(game.board().king(Player::Black).is_some());
    }
}
