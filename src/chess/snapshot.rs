//! Read-only view of the piece placement for presentation layers.

use std::fmt::{self, Write};

use crate::chess::board::Board;
use crate::chess::core::{File, PieceKind, Player, Rank, Square, BOARD_WIDTH};

/// What a presentation layer needs to know about an occupied square.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SquareView {
    #[allow(missing_docs)]
    pub kind: PieceKind,
    #[allow(missing_docs)]
    pub owner: Player,
}

impl fmt::Display for SquareView {
    /// Uppercase for White, lowercase for Black.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = self.kind.to_string();
        match self.owner {
            Player::White => f.write_str(&symbol.to_ascii_uppercase()),
            Player::Black => f.write_str(&symbol),
        }
    }
}

/// 8x8 grid of the board taken at one moment. The grid is rank-major, rank 1
/// first, so `rows()[Rank::One as usize][File::A as usize]` is a1.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    rows: [[Option<SquareView>; BOARD_WIDTH as usize]; BOARD_WIDTH as usize],
    side_to_move: Player,
}

impl Snapshot {
    pub(super) fn new(board: &Board) -> Self {
        let mut rows = [[None; BOARD_WIDTH as usize]; BOARD_WIDTH as usize];
        for (square, piece) in board.occupied() {
            rows[square.rank() as usize][square.file() as usize] = Some(SquareView {
                kind: piece.kind(),
                owner: piece.owner(),
            });
        }
        Self {
            rows,
            side_to_move: board.side_to_move(),
        }
    }

    /// Contents of a square.
    #[must_use]
    pub const fn at(&self, square: Square) -> Option<SquareView> {
        self.rows[square.rank() as usize][square.file() as usize]
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn rows(
        &self,
    ) -> &[[Option<SquareView>; BOARD_WIDTH as usize]; BOARD_WIDTH as usize] {
        &self.rows
    }

    #[allow(missing_docs)]
    #[must_use]
    pub const fn side_to_move(&self) -> Player {
        self.side_to_move
    }

    /// Renders the board as text as seen by the given player: White sees rank
    /// 8 at the top and file a on the left, Black sees the board rotated.
    /// Empty squares are shown as `.`.
    #[must_use]
    pub fn render(&self, perspective: Player) -> String {
        let (ranks, files): (Vec<Rank>, Vec<File>) = match perspective {
            Player::White => (Rank::ALL.into_iter().rev().collect(), File::ALL.to_vec()),
            Player::Black => (Rank::ALL.to_vec(), File::ALL.into_iter().rev().collect()),
        };
        let mut result = String::new();
        for rank in &ranks {
            result.push_str(&rank.to_string());
            for file in &files {
                result.push(' ');
                match self.at(Square::new(*file, *rank)) {
                    Some(view) => result.push_str(&view.to_string()),
                    None => result.push('.'),
                }
            }
            result.push('\n');
        }
        result.push(' ');
        for file in &files {
            result.push(' ');
            result.push_str(&file.to_string());
        }
        result
    }
}

impl fmt::Display for Snapshot {
    /// Board from White's perspective.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(Player::White))?;
        f.write_char('\n')
    }
}
