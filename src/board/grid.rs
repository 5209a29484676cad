//! The 8×8 piece grid.
//!
//! Pure data container with no legality knowledge. The raw mutation
//! primitives are crate-private and driven only by `GameState`'s
//! make/unmake machinery.

use super::{Color, Piece, Square};

/// An 8×8 grid of cells, each empty or holding a `(Color, Piece)` occupant.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Grid {
    cells: [Option<(Color, Piece)>; 64],
}

impl Grid {
    /// An empty grid.
    #[must_use]
    pub fn empty() -> Self {
        Grid { cells: [None; 64] }
    }

    /// Occupant of a square, if any.
    #[inline]
    #[must_use]
    pub fn piece_at(&self, sq: Square) -> Option<(Color, Piece)> {
        self.cells[sq.as_index()]
    }

    /// Whether a square is empty.
    #[inline]
    #[must_use]
    pub fn is_empty(&self, sq: Square) -> bool {
        self.cells[sq.as_index()].is_none()
    }

    /// Place a piece, replacing any existing occupant.
    #[inline]
    pub(crate) fn set(&mut self, sq: Square, color: Color, piece: Piece) {
        self.cells[sq.as_index()] = Some((color, piece));
    }

    /// Empty a square, returning the previous occupant.
    #[inline]
    pub(crate) fn clear(&mut self, sq: Square) -> Option<(Color, Piece)> {
        self.cells[sq.as_index()].take()
    }

    /// Move whatever occupies `from` onto `to` (which is overwritten).
    #[inline]
    pub(crate) fn move_piece(&mut self, from: Square, to: Square) {
        self.cells[to.as_index()] = self.cells[from.as_index()].take();
    }

    /// Locate the king of the given color.
    #[must_use]
    pub fn king_square(&self, color: Color) -> Option<Square> {
        self.occupied_squares()
            .find(|&(_, c, p)| c == color && p == Piece::King)
            .map(|(sq, _, _)| sq)
    }

    /// Iterate over all occupied squares in rank-major order.
    pub fn occupied_squares(&self) -> impl Iterator<Item = (Square, Color, Piece)> + '_ {
        self.cells.iter().enumerate().filter_map(|(idx, cell)| {
            cell.map(|(color, piece)| (Square(idx / 8, idx % 8), color, piece))
        })
    }
}
