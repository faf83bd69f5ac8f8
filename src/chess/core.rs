//! Chess primitives commonly used within [`crate::chess`]: board geometry,
//! players, pieces and moves.

use std::fmt::{self, Write};
use std::ops::Not;

use anyhow::bail;
use itertools::Itertools;

use crate::chess::error::BoundaryError;

#[allow(missing_docs)]
pub const BOARD_WIDTH: u8 = 8;
#[allow(missing_docs)]
pub const BOARD_SIZE: u8 = BOARD_WIDTH * BOARD_WIDTH;

/// Board squares: from left to right, from bottom to the top:
///
/// ```
/// use chessrules::chess::core::Square;
///
/// assert_eq!(Square::A1 as u8, 0);
/// assert_eq!(Square::E1 as u8, 4);
/// assert_eq!(Square::H1 as u8, 7);
/// assert_eq!(Square::A4 as u8, 8 * 3);
/// assert_eq!(Square::H8 as u8, 63);
/// ```
///
/// Square is a compact representation using only one byte.
///
/// ```
/// use chessrules::chess::core::Square;
///
/// assert_eq!(std::mem::size_of::<Square>(), 1);
/// ```
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[rustfmt::skip]
#[allow(missing_docs)]
pub enum Square {
    A1, B1, C1, D1, E1, F1, G1, H1,
    A2, B2, C2, D2, E2, F2, G2, H2,
    A3, B3, C3, D3, E3, F3, G3, H3,
    A4, B4, C4, D4, E4, F4, G4, H4,
    A5, B5, C5, D5, E5, F5, G5, H5,
    A6, B6, C6, D6, E6, F6, G6, H6,
    A7, B7, C7, D7, E7, F7, G7, H7,
    A8, B8, C8, D8, E8, F8, G8, H8,
}

impl Square {
    /// All squares in ascending order (A1, B1, ..., H8).
    #[rustfmt::skip]
    pub const ALL: [Self; BOARD_SIZE as usize] = [
        Self::A1, Self::B1, Self::C1, Self::D1, Self::E1, Self::F1, Self::G1, Self::H1,
        Self::A2, Self::B2, Self::C2, Self::D2, Self::E2, Self::F2, Self::G2, Self::H2,
        Self::A3, Self::B3, Self::C3, Self::D3, Self::E3, Self::F3, Self::G3, Self::H3,
        Self::A4, Self::B4, Self::C4, Self::D4, Self::E4, Self::F4, Self::G4, Self::H4,
        Self::A5, Self::B5, Self::C5, Self::D5, Self::E5, Self::F5, Self::G5, Self::H5,
        Self::A6, Self::B6, Self::C6, Self::D6, Self::E6, Self::F6, Self::G6, Self::H6,
        Self::A7, Self::B7, Self::C7, Self::D7, Self::E7, Self::F7, Self::G7, Self::H7,
        Self::A8, Self::B8, Self::C8, Self::D8, Self::E8, Self::F8, Self::G8, Self::H8,
    ];

    /// Connects file (column) and rank (row) to form a full square.
    #[must_use]
    pub const fn new(file: File, rank: Rank) -> Self {
        Self::ALL[rank as usize * BOARD_WIDTH as usize + file as usize]
    }

    /// Creates a square from raw zero-based coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] if either coordinate is outside `0..8`. The
    /// coordinates are never clamped.
    pub fn from_coords(file: i8, rank: i8) -> Result<Self, BoundaryError> {
        match (File::try_from(file), Rank::try_from(rank)) {
            (Ok(file), Ok(rank)) => Ok(Self::new(file, rank)),
            _ => Err(BoundaryError { file, rank }),
        }
    }

    /// Iterates over all squares in ascending order.
    pub fn iter() -> impl DoubleEndedIterator<Item = Self> + Clone {
        Self::ALL.into_iter()
    }

    /// Returns file (column) on which the square is located.
    #[must_use]
    pub const fn file(self) -> File {
        File::ALL[self as usize % BOARD_WIDTH as usize]
    }

    /// Returns rank (row) on which the square is located.
    #[must_use]
    pub const fn rank(self) -> Rank {
        Rank::ALL[self as usize / BOARD_WIDTH as usize]
    }

    /// Moves the square by given file and rank deltas. Returns [`None`] if the
    /// result would fall off the board.
    #[must_use]
    pub fn offset(self, file_delta: i8, rank_delta: i8) -> Option<Self> {
        Self::from_coords(self.file().index() + file_delta, self.rank().index() + rank_delta).ok()
    }

    /// Moves the square one step in the given direction.
    #[must_use]
    pub fn shift(self, direction: Direction) -> Option<Self> {
        let (file_delta, rank_delta) = direction.delta();
        self.offset(file_delta, rank_delta)
    }

    /// Signed (file, rank) difference from `self` to `other`.
    #[must_use]
    pub fn delta(self, other: Self) -> (i8, i8) {
        (
            other.file().index() - self.file().index(),
            other.rank().index() - self.rank().index(),
        )
    }
}

impl TryFrom<u8> for Square {
    type Error = anyhow::Error;

    /// Creates a square given its position on the board.
    ///
    /// # Errors
    ///
    /// If given square index is outside 0..[`BOARD_SIZE`] range.
    fn try_from(square_index: u8) -> anyhow::Result<Self> {
        match Self::ALL.get(usize::from(square_index)) {
            Some(square) => Ok(*square),
            None => bail!("square index should be in 0..BOARD_SIZE, got {square_index}"),
        }
    }
}

impl TryFrom<&str> for Square {
    type Error = anyhow::Error;

    fn try_from(square: &str) -> anyhow::Result<Self> {
        let (file, rank) = match square.chars().collect_tuple() {
            Some((file, rank)) => (file, rank),
            None => bail!(
                "square should be two-char, got {square} with {} chars",
                square.chars().count()
            ),
        };
        Ok(Self::new(file.try_into()?, rank.try_into()?))
    }
}

impl fmt::Display for Square {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file(), self.rank())
    }
}

/// Represents a column (vertical row) of the chessboard. In chess notation, it
/// is normally represented with a lowercase letter.
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum File {
    A = 0,
    B = 1,
    C = 2,
    D = 3,
    E = 4,
    F = 5,
    G = 6,
    H = 7,
}

impl File {
    #[allow(missing_docs)]
    pub const ALL: [Self; BOARD_WIDTH as usize] = [
        Self::A,
        Self::B,
        Self::C,
        Self::D,
        Self::E,
        Self::F,
        Self::G,
        Self::H,
    ];

    /// Zero-based column index.
    #[must_use]
    pub const fn index(self) -> i8 {
        self as i8
    }
}

impl fmt::Display for File {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char((b'a' + *self as u8) as char)
    }
}

impl TryFrom<char> for File {
    type Error = anyhow::Error;

    fn try_from(file: char) -> anyhow::Result<Self> {
        match file {
            'a'..='h' => Ok(Self::ALL[file as usize - 'a' as usize]),
            _ => bail!("file should be within 'a'..='h', got '{file}'"),
        }
    }
}

impl TryFrom<i8> for File {
    type Error = anyhow::Error;

    fn try_from(column: i8) -> anyhow::Result<Self> {
        match usize::try_from(column).ok().and_then(|index| Self::ALL.get(index)) {
            Some(file) => Ok(*file),
            None => bail!("file should be within 0..BOARD_WIDTH, got {column}"),
        }
    }
}

/// Represents a horizontal row of the chessboard. In chess notation, it is
/// represented with a number. The implementation assumes zero-based values
/// (i.e. rank 1 would be 0).
#[repr(u8)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum Rank {
    One = 0,
    Two = 1,
    Three = 2,
    Four = 3,
    Five = 4,
    Six = 5,
    Seven = 6,
    Eight = 7,
}

impl Rank {
    #[allow(missing_docs)]
    pub const ALL: [Self; BOARD_WIDTH as usize] = [
        Self::One,
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
    ];

    /// Zero-based row index.
    #[must_use]
    pub const fn index(self) -> i8 {
        self as i8
    }

    /// The rank where the player's king and rooks start.
    #[must_use]
    pub const fn backrank(player: Player) -> Self {
        match player {
            Player::White => Self::One,
            Player::Black => Self::Eight,
        }
    }

    /// The rank where the player's pawns start.
    #[must_use]
    pub const fn pawns_starting(player: Player) -> Self {
        match player {
            Player::White => Self::Two,
            Player::Black => Self::Seven,
        }
    }

    /// The farthest rank for the player's pawns: reaching it means promotion.
    #[must_use]
    pub const fn promotion(player: Player) -> Self {
        Self::backrank(player.opponent())
    }
}

impl TryFrom<char> for Rank {
    type Error = anyhow::Error;

    fn try_from(rank: char) -> anyhow::Result<Self> {
        match rank {
            '1'..='8' => Ok(Self::ALL[rank as usize - '1' as usize]),
            _ => bail!("rank should be within '1'..='8', got '{rank}'"),
        }
    }
}

impl TryFrom<i8> for Rank {
    type Error = anyhow::Error;

    fn try_from(row: i8) -> anyhow::Result<Self> {
        match usize::try_from(row).ok().and_then(|index| Self::ALL.get(index)) {
            Some(rank) => Ok(*rank),
            None => bail!("rank should be within 0..BOARD_WIDTH, got {row}"),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", *self as u8 + 1)
    }
}

/// A standard game of chess is played between two players: White (having the
/// advantage of the first turn) and Black.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Player {
    White,
    Black,
}

impl Player {
    /// "Flips" the color.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Self::White => Self::Black,
            Self::Black => Self::White,
        }
    }

    /// Direction in which the player's pawns advance.
    #[must_use]
    pub const fn push_direction(self) -> Direction {
        match self {
            Self::White => Direction::Up,
            Self::Black => Direction::Down,
        }
    }
}

impl Not for Player {
    type Output = Self;

    fn not(self) -> Self::Output {
        self.opponent()
    }
}

impl TryFrom<&str> for Player {
    type Error = anyhow::Error;

    fn try_from(player: &str) -> anyhow::Result<Self> {
        match player {
            "w" => Ok(Self::White),
            "b" => Ok(Self::Black),
            _ => bail!("player should be 'w' or 'b', got '{player}'"),
        }
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::White => 'w',
            Self::Black => 'b',
        })
    }
}

/// Standard [chess pieces].
///
/// [chess pieces]: https://en.wikipedia.org/wiki/Chess_piece
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PieceKind {
    Pawn,
    Knight,
    Bishop,
    Rook,
    Queen,
    King,
}

impl From<Promotion> for PieceKind {
    fn from(promotion: Promotion) -> Self {
        match promotion {
            Promotion::Queen => Self::Queen,
            Promotion::Rook => Self::Rook,
            Promotion::Bishop => Self::Bishop,
            Promotion::Knight => Self::Knight,
        }
    }
}

impl fmt::Display for PieceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_char(match &self {
            Self::King => 'k',
            Self::Queen => 'q',
            Self::Rook => 'r',
            Self::Bishop => 'b',
            Self::Knight => 'n',
            Self::Pawn => 'p',
        })
    }
}

/// Represents a specific piece owned by a player together with its history:
/// the number of moves the piece itself has made. The history decides castling
/// rights, pawn double pushes and en passant eligibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    kind: PieceKind,
    owner: Player,
    move_count: u16,
}

impl Piece {
    /// Creates a piece that has not moved yet.
    #[must_use]
    pub const fn new(owner: Player, kind: PieceKind) -> Self {
        Self {
            kind,
            owner,
            move_count: 0,
        }
    }

    /// Creates a piece with a given number of moves already made.
    #[must_use]
    pub const fn with_move_count(owner: Player, kind: PieceKind, move_count: u16) -> Self {
        Self {
            kind,
            owner,
            move_count,
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn kind(&self) -> PieceKind {
        self.kind
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn owner(&self) -> Player {
        self.owner
    }

    /// Number of moves this piece has made.
    #[must_use]
    pub const fn move_count(&self) -> u16 {
        self.move_count
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn has_moved(&self) -> bool {
        self.move_count != 0
    }

    /// Only moves of the piece itself are counted.
    pub(super) fn record_move(&mut self) {
        self.move_count = self.move_count.saturating_add(1);
    }
}

impl TryFrom<char> for Piece {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        let owner = if symbol.is_ascii_uppercase() {
            Player::White
        } else {
            Player::Black
        };
        let kind = match symbol.to_ascii_lowercase() {
            'k' => PieceKind::King,
            'q' => PieceKind::Queen,
            'r' => PieceKind::Rook,
            'b' => PieceKind::Bishop,
            'n' => PieceKind::Knight,
            'p' => PieceKind::Pawn,
            _ => bail!("piece symbol should be within \"KQRBNPkqrbnp\", got '{symbol}'"),
        };
        Ok(Self::new(owner, kind))
    }
}

impl fmt::Display for Piece {
    /// White pieces are uppercase, black pieces are lowercase (FEN symbols).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self.kind {
            PieceKind::King => 'k',
            PieceKind::Queen => 'q',
            PieceKind::Rook => 'r',
            PieceKind::Bishop => 'b',
            PieceKind::Knight => 'n',
            PieceKind::Pawn => 'p',
        };
        f.write_char(match self.owner {
            Player::White => symbol.to_ascii_uppercase(),
            Player::Black => symbol,
        })
    }
}

/// A pawn can be promoted to a queen, rook, bishop or a knight.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Promotion {
    Queen,
    Rook,
    Bishop,
    Knight,
}

impl Promotion {
    #[allow(missing_docs)]
    pub const ALL: [Self; 4] = [Self::Queen, Self::Rook, Self::Bishop, Self::Knight];
}

impl TryFrom<char> for Promotion {
    type Error = anyhow::Error;

    fn try_from(symbol: char) -> anyhow::Result<Self> {
        match symbol.to_ascii_lowercase() {
            'q' => Ok(Self::Queen),
            'r' => Ok(Self::Rook),
            'b' => Ok(Self::Bishop),
            'n' => Ok(Self::Knight),
            _ => bail!("promotion should be one of \"qrbn\", got '{symbol}'"),
        }
    }
}

impl fmt::Display for Promotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", PieceKind::from(*self))
    }
}

/// Kingside (short, O-O) or queenside (long, O-O-O) castling.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum CastlingSide {
    Short,
    Long,
}

impl CastlingSide {
    /// File of the rook that takes part in castling to this side.
    #[must_use]
    pub const fn rook_file(self) -> File {
        match self {
            Self::Short => File::H,
            Self::Long => File::A,
        }
    }

    /// File where the king ends up after castling.
    #[must_use]
    pub const fn king_destination(self) -> File {
        match self {
            Self::Short => File::G,
            Self::Long => File::C,
        }
    }

    /// File where the rook ends up after castling: right next to the king, on
    /// the side it came from.
    #[must_use]
    pub const fn rook_destination(self) -> File {
        match self {
            Self::Short => File::F,
            Self::Long => File::D,
        }
    }
}

bitflags::bitflags! {
    /// Track the ability to [castle] each side (kingside is often referred to
    /// as O-O or h-side castle, queenside -- O-O-O or a-side castle). When the
    /// king moves, player loses ability to castle both sides. When the rook
    /// moves or is captured, player loses ability to castle its side.
    ///
    /// The full rules are:
    ///
    /// - The king and the castling rook must not have previously moved.
    /// - No square from the king's initial square to its final square may be
    ///   under attack by an enemy piece.
    /// - All the squares between the king and the castling rook must be
    ///   vacant.
    ///
    /// [castle]: https://www.chessprogramming.org/Castling
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct CastleRights : u8 {
        #[allow(missing_docs)]
        const WHITE_SHORT = 0b1000;
        #[allow(missing_docs)]
        const WHITE_LONG = 0b0100;
        #[allow(missing_docs)]
        const WHITE_BOTH = Self::WHITE_SHORT.bits() | Self::WHITE_LONG.bits();
        #[allow(missing_docs)]
        const BLACK_SHORT = 0b0010;
        #[allow(missing_docs)]
        const BLACK_LONG = 0b0001;
        #[allow(missing_docs)]
        const BLACK_BOTH = Self::BLACK_SHORT.bits() | Self::BLACK_LONG.bits();
        #[allow(missing_docs)]
        const ALL = Self::WHITE_BOTH.bits() | Self::BLACK_BOTH.bits();
    }
}

impl CastleRights {
    /// The right of a player to castle to one side.
    #[must_use]
    pub const fn side(player: Player, side: CastlingSide) -> Self {
        match (player, side) {
            (Player::White, CastlingSide::Short) => Self::WHITE_SHORT,
            (Player::White, CastlingSide::Long) => Self::WHITE_LONG,
            (Player::Black, CastlingSide::Short) => Self::BLACK_SHORT,
            (Player::Black, CastlingSide::Long) => Self::BLACK_LONG,
        }
    }

    /// Both castling rights of a player.
    #[must_use]
    pub const fn both(player: Player) -> Self {
        match player {
            Player::White => Self::WHITE_BOTH,
            Player::Black => Self::BLACK_BOTH,
        }
    }
}

impl TryFrom<&str> for CastleRights {
    type Error = anyhow::Error;

    /// Parses [`CastleRights`] for both players from the FEN format:
    ///
    /// [`CastleRights`] := '-' | (K)? (Q)? (k)? (q)?
    ///
    /// # Errors
    ///
    /// Returns [`anyhow::Error`] if given pattern does not match.
    fn try_from(input: &str) -> anyhow::Result<Self> {
        if input == "-" {
            return Ok(Self::empty());
        }
        if input.is_empty() {
            bail!("castle rights can not be empty");
        }
        let mut result = Self::empty();
        // Rights have to come in KQkq order and each one at most once.
        let mut last = None;
        for symbol in input.chars() {
            let (order, right) = match symbol {
                'K' => (0, Self::WHITE_SHORT),
                'Q' => (1, Self::WHITE_LONG),
                'k' => (2, Self::BLACK_SHORT),
                'q' => (3, Self::BLACK_LONG),
                _ => bail!("unknown castle rights: {input}"),
            };
            if last.is_some_and(|last| last >= order) {
                bail!("unknown castle rights: {input}");
            }
            last = Some(order);
            result |= right;
        }
        Ok(result)
    }
}

impl fmt::Display for CastleRights {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return f.write_char('-');
        }
        for (right, symbol) in [
            (Self::WHITE_SHORT, 'K'),
            (Self::WHITE_LONG, 'Q'),
            (Self::BLACK_SHORT, 'k'),
            (Self::BLACK_LONG, 'q'),
        ] {
            if self.contains(right) {
                f.write_char(symbol)?;
            }
        }
        Ok(())
    }
}

/// Directions on the board from a perspective of White player.
///
/// Traditionally those are North (Up), West (Left), East (Right), South (Down)
/// and their combinations. However, using cardinal directions is confusing,
/// hence they are replaced by relative directions.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    /// Also known as NorthWest.
    UpLeft,
    /// Also known as North.
    Up,
    /// Also known as NorthEast.
    UpRight,
    /// Also known as East.
    Right,
    /// Also known as West.
    Left,
    /// Also known as SouthWest.
    DownLeft,
    /// Also known as South.
    Down,
    /// Also known as SouthEast.
    DownRight,
}

impl Direction {
    /// One-step (file, rank) vector.
    #[must_use]
    pub const fn delta(self) -> (i8, i8) {
        match self {
            Self::UpLeft => (-1, 1),
            Self::Up => (0, 1),
            Self::UpRight => (1, 1),
            Self::Right => (1, 0),
            Self::Left => (-1, 0),
            Self::DownLeft => (-1, -1),
            Self::Down => (0, -1),
            Self::DownRight => (1, -1),
        }
    }

    /// The direction of the line connecting two distinct squares. Returns
    /// [`None`] if the squares are not on the same rank, file or diagonal.
    #[must_use]
    pub fn between(from: Square, to: Square) -> Option<Self> {
        let (file_delta, rank_delta) = from.delta(to);
        if !is_orthogonal(from, to) && !is_diagonal(from, to) {
            return None;
        }
        Some(match (file_delta.signum(), rank_delta.signum()) {
            (-1, 1) => Self::UpLeft,
            (0, 1) => Self::Up,
            (1, 1) => Self::UpRight,
            (1, 0) => Self::Right,
            (-1, 0) => Self::Left,
            (-1, -1) => Self::DownLeft,
            (0, -1) => Self::Down,
            (1, -1) => Self::DownRight,
            _ => return None,
        })
    }
}

/// Two distinct squares on the same diagonal.
#[must_use]
pub fn is_diagonal(from: Square, to: Square) -> bool {
    let (file_delta, rank_delta) = from.delta(to);
    file_delta != 0 && file_delta.abs() == rank_delta.abs()
}

/// Two distinct squares on the same rank or file.
#[must_use]
pub fn is_orthogonal(from: Square, to: Square) -> bool {
    let (file_delta, rank_delta) = from.delta(to);
    (file_delta == 0) != (rank_delta == 0)
}

/// Chebyshev distance: the number of king steps between two squares.
#[must_use]
pub fn distance(from: Square, to: Square) -> u8 {
    let (file_delta, rank_delta) = from.delta(to);
    file_delta.unsigned_abs().max(rank_delta.unsigned_abs())
}

/// Squares strictly between `from` and `to` on their common line. Empty when
/// the squares are adjacent or not aligned.
pub fn squares_between(from: Square, to: Square) -> impl Iterator<Item = Square> {
    let direction = Direction::between(from, to);
    let mut current = from;
    std::iter::from_fn(move || {
        current = current.shift(direction?)?;
        (current != to).then_some(current)
    })
}

/// Represents a request to move a piece. The move representation has
/// one-to-one correspondence with the UCI move representation. Castling is
/// encoded as a two-square king move.
///
/// A move only becomes a part of the game history after it's validated and
/// applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Move {
    from: Square,
    to: Square,
    promotion: Option<Promotion>,
}

impl Move {
    #[allow(missing_docs)]
    #[must_use]
    pub const fn new(from: Square, to: Square, promotion: Option<Promotion>) -> Self {
        Self {
            from,
            to,
            promotion,
        }
    }

    /// Parses a move in UCI format, e.g. `e2e4` or `e7e8q`.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is not a UCI move.
    pub fn from_uci(uci: &str) -> anyhow::Result<Self> {
        if !uci.is_ascii() {
            bail!("UCI move should be ASCII, got {uci}");
        }
        match uci.len() {
            4 | 5 => Ok(Self::new(
                Square::try_from(&uci[..2])?,
                Square::try_from(&uci[2..4])?,
                match uci.chars().nth(4) {
                    Some(symbol) => Some(symbol.try_into()?),
                    None => None,
                },
            )),
            _ => bail!("UCI move should be 4 or 5 chars long, got {uci}"),
        }
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn from(&self) -> Square {
        self.from
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn to(&self) -> Square {
        self.to
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn promotion(&self) -> Option<Promotion> {
        self.promotion
    }

    /// The same move with the promotion choice filled in.
    #[must_use]
    pub const fn with_promotion(self, promotion: Promotion) -> Self {
        Self::new(self.from, self.to, Some(promotion))
    }
}

impl fmt::Display for Move {
    /// Serializes a move in [UCI format].
    ///
    /// [UCI format]: http://wbec-ridderkerk.nl/html/UCIProtocol.html
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.from, self.to)?;
        if let Some(promotion) = self.promotion {
            write!(f, "{promotion}")?;
        }
        Ok(())
    }
}
