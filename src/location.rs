use std::num::NonZero;

use ndarray::Ix;

pub(crate) type Coord = usize;
/// A nonzero board dimension, either a rank count or a file count.
pub type Dimension = NonZero<Coord>;
/// Row-major index of a square; see [`Location::as_square`].
pub type Square = usize;

#[derive(Clone, Eq, Hash, Copy, PartialEq, Ord, PartialOrd, Debug)]
/// A location `(col, row)` on a board. The top left corner is `Location(0, 0)`.
pub struct Location(pub Coord, pub Coord);

impl Location {
    /// Decompose `square` into a column and a row on a board `files` columns wide.
    pub fn from_square(square: Square, files: Dimension) -> Self {
        Self(square % files.get(), square / files.get())
    }

    /// The square index of this location on a board `files` columns wide, counting along rows from the top left.
    pub fn as_square(&self, files: Dimension) -> Square {
        self.1 * files.get() + self.0
    }

    pub(crate) fn as_index(&self) -> (Ix, Ix) {
        (self.1, self.0)
    }

    // stepping off the top or left edge wraps around to a huge coordinate, which fails any bounds check
    pub(crate) fn offset_by(self, rhs: (isize, isize)) -> Self {
        Self(self.0.wrapping_add_signed(rhs.0), self.1.wrapping_add_signed(rhs.1))
    }
}
