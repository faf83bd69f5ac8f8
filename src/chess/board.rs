//! Provides the [`Board`]: square-centric ("mailbox") occupancy together with
//! the side to move, castling rights and the en passant target.
//!
//! The board holds and exposes the state but never judges legality: that is
//! the job of [`crate::chess::validation`]. The only mutation of a live board
//! during the game comes from [`crate::chess::apply`].

use std::fmt;
use std::num::NonZeroU16;

use anyhow::{bail, Context};

use crate::chess::attacks::is_in_check;
use crate::chess::core::{
    CastleRights,
    CastlingSide,
    File,
    Piece,
    PieceKind,
    Player,
    Rank,
    Square,
    BOARD_SIZE,
    BOARD_WIDTH,
};
use crate::chess::error::InvariantViolation;
use crate::chess::snapshot::Snapshot;

const BACKRANK: [PieceKind; BOARD_WIDTH as usize] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

/// State of the chess game: piece placement, side to move, castling rights and
/// the en passant target. Half-move clock and full-move counter are tracked for
/// [Forsyth-Edwards Notation] (FEN) round trips.
///
/// [Forsyth-Edwards Notation]: https://www.chessprogramming.org/Forsyth-Edwards_Notation
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    pub(super) squares: [Option<Piece>; BOARD_SIZE as usize],
    pub(super) side_to_move: Player,
    pub(super) castling: CastleRights,
    /// Set only right after a double pawn push: the square the pawn skipped.
    /// It is only valid for the next move.
    pub(super) en_passant_target: Option<Square>,
    /// [Halfmove Clock] keeps track of the number of plies since the last
    /// capture or pawn move.
    ///
    /// [Halfmove Clock]: https://www.chessprogramming.org/Halfmove_Clock
    pub(super) halfmove_clock: u8,
    pub(super) fullmove_counter: NonZeroU16,
}

impl Board {
    /// Creates the starting position of the standard chess variant.
    ///
    /// ```
    /// use chessrules::chess::board::Board;
    ///
    /// let starting_board = Board::starting();
    /// assert_eq!(
    ///     &starting_board.to_string(),
    ///     "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1"
    /// );
    /// ```
    #[must_use]
    pub fn starting() -> Self {
        let mut result = Self::empty();
        for player in [Player::White, Player::Black] {
            for (file, kind) in File::ALL.into_iter().zip(BACKRANK) {
                let square = Square::new(file, Rank::backrank(player));
                result.squares[square as usize] = Some(Piece::new(player, kind));
                let square = Square::new(file, Rank::pawns_starting(player));
                result.squares[square as usize] = Some(Piece::new(player, PieceKind::Pawn));
            }
        }
        result.castling = CastleRights::ALL;
        result
    }

    /// Creates an empty board with White to move and no castling rights. It
    /// can be filled via [`Board::place`].
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            squares: [None; BOARD_SIZE as usize],
            side_to_move: Player::White,
            castling: CastleRights::empty(),
            en_passant_target: None,
            halfmove_clock: 0,
            fullmove_counter: NonZeroU16::MIN,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn piece_at(&self, square: Square) -> Option<Piece> {
        self.squares[square as usize]
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn castling(&self) -> CastleRights {
        self.castling
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn en_passant_target(&self) -> Option<Square> {
        self.en_passant_target
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn halfmove_clock(&self) -> u8 {
        self.halfmove_clock
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn fullmove_counter(&self) -> NonZeroU16 {
        self.fullmove_counter
    }

    /// Puts a piece on the square (or clears it for [`None`]) and returns the
    /// previous occupant. The rules are not consulted: this is meant for
    /// setting up positions.
    ///
    /// # Errors
    ///
    /// Returns [`InvariantViolation::DuplicateKing`] if the player already has
    /// a king elsewhere.
    pub fn place(
        &mut self,
        square: Square,
        piece: Option<Piece>,
    ) -> Result<Option<Piece>, InvariantViolation> {
        if let Some(piece) = piece {
            if piece.kind() == PieceKind::King {
                match self.king(piece.owner()) {
                    Some(existing) if existing != square => {
                        return Err(InvariantViolation::DuplicateKing {
                            player: piece.owner(),
                            existing,
                            square,
                        })
                    },
                    _ => (),
                }
            }
        }
        Ok(self.put(square, piece))
    }

    /// Sets the player to move. Meant for setting up positions.
    pub fn set_side_to_move(&mut self, player: Player) {
        self.side_to_move = player;
    }

    pub(super) fn put(&mut self, square: Square, piece: Option<Piece>) -> Option<Piece> {
        std::mem::replace(&mut self.squares[square as usize], piece)
    }

    pub(super) fn take(&mut self, square: Square) -> Option<Piece> {
        self.squares[square as usize].take()
    }

    /// Finds the king of a player.
    #[must_use]
    pub fn king(&self, player: Player) -> Option<Square> {
        self.pieces(player)
            .find(|(_, piece)| piece.kind() == PieceKind::King)
            .map(|(square, _)| square)
    }

    /// Checks that each player has exactly one king.
    ///
    /// # Errors
    ///
    /// Returns the first violation found.
    pub fn verify_kings(&self) -> Result<(), InvariantViolation> {
        for player in [Player::White, Player::Black] {
            let mut kings = self
                .pieces(player)
                .filter(|(_, piece)| piece.kind() == PieceKind::King)
                .map(|(square, _)| square);
            match (kings.next(), kings.next()) {
                (None, _) => return Err(InvariantViolation::MissingKing { player }),
                (Some(existing), Some(square)) => {
                    return Err(InvariantViolation::DuplicateKing {
                        player,
                        existing,
                        square,
                    })
                },
                (Some(_), None) => (),
            }
        }
        Ok(())
    }

    /// All pieces on the board in ascending square order.
    pub fn occupied(&self) -> impl Iterator<Item = (Square, Piece)> + '_ {
        Square::iter().filter_map(move |square| self.piece_at(square).map(|piece| (square, piece)))
    }

    /// Pieces of one player in ascending square order.
    pub fn pieces(&self, player: Player) -> impl Iterator<Item = (Square, Piece)> + '_ {
        self.occupied()
            .filter(move |(_, piece)| piece.owner() == player)
    }

    /// Read-only copy of the placement for rendering.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self)
    }

    /// Parses board from Forsyth-Edwards Notation. It will also accept trimmed
    /// FEN (EPD with 4 parts).
    ///
    /// FEN ::=
    ///       Piece Placement
    ///   ' ' Side to move
    ///   ' ' Castling ability
    ///   ' ' En passant target square
    ///   ' ' Halfmove clock
    ///   ' ' Fullmove counter
    ///
    /// The last two parts (together) are optional and will default to "0 1".
    ///
    /// The pieces do not carry their history in FEN, so the move counts are
    /// derived: kings and rooks keeping a castling right have not moved, pawns
    /// outside of their starting rank have moved once.
    ///
    /// NOTE: This expects properly-formatted inputs: no extra symbols or
    /// additional whitespace. Use [`Board::try_from`] for cleaning up the
    /// input if it is coming from untrusted source.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not valid FEN or describes a position
    /// the rules engine can not work with (e.g. no kings, pawns on backranks).
    pub fn from_fen(input: &str) -> anyhow::Result<Self> {
        let mut parts = input.split(' ');
        let mut result = Self::empty();
        let Some(pieces_placement) = parts.next() else {
            bail!("incorrect FEN: missing pieces placement");
        };
        let mut rank_id: i8 = BOARD_WIDTH as i8;
        for rank_fen in pieces_placement.split('/') {
            if rank_id == 0 {
                bail!("incorrect FEN: expected 8 ranks, got {pieces_placement}");
            }
            rank_id -= 1;
            let rank = Rank::try_from(rank_id)?;
            let mut file: i8 = 0;
            for symbol in rank_fen.chars() {
                if file >= BOARD_WIDTH as i8 {
                    bail!("file exceeded {BOARD_WIDTH}");
                }
                match symbol {
                    '0' => bail!("increment can not be 0"),
                    '1'..='8' => {
                        file += symbol.to_digit(10).map_or(0, |digit| digit as i8);
                        continue;
                    },
                    _ => (),
                }
                let piece = Piece::try_from(symbol)?;
                let square = Square::new(File::try_from(file)?, rank);
                let _ = result.place(square, Some(piece))?;
                file += 1;
            }
            if file != BOARD_WIDTH as i8 {
                bail!(
                    "incorrect FEN: rank size should be exactly {BOARD_WIDTH}, got {rank_fen} of \
                     length {file}"
                );
            }
        }
        if rank_id != 0 {
            bail!("incorrect FEN: there should be 8 ranks, got {pieces_placement}");
        }
        result.side_to_move = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing side to move"),
        };
        result.castling = match parts.next() {
            Some(value) => value.try_into()?,
            None => bail!("incorrect FEN: missing castling rights"),
        };
        result.en_passant_target = match parts.next() {
            Some("-") => None,
            Some(value) => Some(value.try_into()?),
            None => bail!("incorrect FEN: missing en passant square"),
        };
        match parts.next() {
            Some(value) => {
                result.halfmove_clock = parse_counter(value, "halfmove clock")?;
                result.fullmove_counter = match parts.next() {
                    Some(value) => parse_counter(value, "fullmove counter")?,
                    None => bail!("incorrect FEN: missing fullmove counter"),
                };
                if parts.next().is_some() {
                    bail!("trailing symbols are not allowed in FEN");
                }
            },
            // This is a correct EPD.
            None => (),
        }
        result.validate()?;
        result.derive_move_counts();
        Ok(result)
    }

    /// Rejects positions that can not be reached by the moves of the game in a
    /// way that breaks the rules engine.
    fn validate(&self) -> anyhow::Result<()> {
        self.verify_kings()?;
        let they = self.side_to_move.opponent();
        if is_in_check(self, they) {
            return Err(InvariantViolation::OpponentInCheck { player: they }.into());
        }
        for rank in [Rank::One, Rank::Eight] {
            for file in File::ALL {
                if self
                    .piece_at(Square::new(file, rank))
                    .is_some_and(|piece| piece.kind() == PieceKind::Pawn)
                {
                    bail!("pawns can not be placed on backranks");
                }
            }
        }
        for player in [Player::White, Player::Black] {
            for side in [CastlingSide::Short, CastlingSide::Long] {
                if self.castling.contains(CastleRights::side(player, side))
                    && !self.castling_pieces_in_place(player, side)
                {
                    bail!(
                        "castle rights {} need the king and the rook on their original squares",
                        CastleRights::side(player, side)
                    );
                }
            }
        }
        if let Some(en_passant_target) = self.en_passant_target {
            let expected_rank = match self.side_to_move {
                Player::White => Rank::Six,
                Player::Black => Rank::Three,
            };
            if en_passant_target.rank() != expected_rank {
                bail!(
                    "expected en passant square to be on rank {expected_rank}, got {}",
                    en_passant_target.rank()
                );
            }
            let they = self.side_to_move.opponent();
            let pushed_pawn = en_passant_target.shift(they.push_direction());
            let original_square = en_passant_target.shift(self.side_to_move.push_direction());
            let pushed_pawn_in_place = pushed_pawn
                .and_then(|square| self.piece_at(square))
                .is_some_and(|piece| piece.kind() == PieceKind::Pawn && piece.owner() == they);
            let path_is_empty = self.piece_at(en_passant_target).is_none()
                && original_square.is_some_and(|square| self.piece_at(square).is_none());
            if !pushed_pawn_in_place || !path_is_empty {
                bail!("en passant square is not beyond pushed pawn");
            }
        }
        Ok(())
    }

    fn castling_pieces_in_place(&self, player: Player, side: CastlingSide) -> bool {
        let backrank = Rank::backrank(player);
        let king = self.piece_at(Square::new(File::E, backrank));
        let rook = self.piece_at(Square::new(side.rook_file(), backrank));
        king == Some(Piece::new(player, PieceKind::King))
            && rook == Some(Piece::new(player, PieceKind::Rook))
    }

    fn derive_move_counts(&mut self) {
        for square in Square::iter() {
            let Some(piece) = self.piece_at(square) else {
                continue;
            };
            let owner = piece.owner();
            let backrank = Rank::backrank(owner);
            let unmoved = match piece.kind() {
                PieceKind::Pawn => square.rank() == Rank::pawns_starting(owner),
                PieceKind::King => {
                    square == Square::new(File::E, backrank)
                        && self.castling.intersects(CastleRights::both(owner))
                },
                PieceKind::Rook => [CastlingSide::Short, CastlingSide::Long]
                    .into_iter()
                    .any(|side| {
                        square == Square::new(side.rook_file(), backrank)
                            && self.castling.contains(CastleRights::side(owner, side))
                    }),
                PieceKind::Knight | PieceKind::Bishop | PieceKind::Queen => true,
            };
            let move_count = u16::from(!unmoved);
            self.squares[square as usize] =
                Some(Piece::with_move_count(owner, piece.kind(), move_count));
        }
    }
}

fn parse_counter<T: std::str::FromStr>(value: &str, name: &str) -> anyhow::Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    if !value.bytes().all(|c| c.is_ascii_digit()) {
        bail!("{name} can not contain anything other than digits");
    }
    value
        .parse::<T>()
        .with_context(|| format!("incorrect FEN: {name} can not be parsed {value}"))
}

impl Default for Board {
    fn default() -> Self {
        Self::starting()
    }
}

impl TryFrom<&str> for Board {
    type Error = anyhow::Error;

    /// Cleans up the input (trims whitespace and an optional "fen "/"epd "
    /// prefix) and parses FEN.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        let input = input.trim();
        for prefix in ["fen ", "epd "] {
            if let Some(stripped) = input.strip_prefix(prefix) {
                return Self::from_fen(stripped);
            }
        }
        Self::from_fen(input)
    }
}

impl fmt::Display for Board {
    /// Prints board in Forsyth-Edwards Notation.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for rank in Rank::ALL.into_iter().rev() {
            let mut empty_squares = 0;
            for file in File::ALL {
                match self.piece_at(Square::new(file, rank)) {
                    Some(piece) => {
                        if empty_squares != 0 {
                            write!(f, "{empty_squares}")?;
                            empty_squares = 0;
                        }
                        write!(f, "{piece}")?;
                    },
                    None => empty_squares += 1,
                }
            }
            if empty_squares != 0 {
                write!(f, "{empty_squares}")?;
            }
            if rank != Rank::One {
                write!(f, "/")?;
            }
        }
        write!(f, " {} ", &self.side_to_move)?;
        write!(f, "{} ", &self.castling)?;
        match self.en_passant_target {
            Some(square) => write!(f, "{square} "),
            None => write!(f, "- "),
        }?;
        write!(f, "{} ", &self.halfmove_clock)?;
        write!(f, "{}", &self.fullmove_counter)
    }
}

impl fmt::Debug for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.snapshot())?;
        writeln!(f, "Player to move: {:?}", &self.side_to_move)?;
        writeln!(f, "Fullmove counter: {:?}", &self.fullmove_counter)?;
        writeln!(f, "En Passant: {:?}", &self.en_passant_target)?;
        // bitflags' default fmt::Debug implementation is not very convenient:
        // dump FEN instead.
        writeln!(f, "Castling rights: {}", &self.castling)?;
        writeln!(f, "FEN: {self}")
    }
}
