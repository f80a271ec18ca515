//! The eight knight moves and the order in which they are tried.

use itertools::Itertools;
use strum::VariantArray;

use crate::location::Location;

/// The eight ways a knight can jump, named long leg first.
///
/// Variant order is the fixed enumeration order used everywhere moves are generated,
/// so [`VARIANTS`](VariantArray::VARIANTS) yields `(2, 1)`, `(1, 2)`, `(-1, 2)`, `(-2, 1)`, `(-2, -1)`, `(-1, -2)`, `(1, -2)`, `(2, -1)`
/// as `(column, row)` deltas, rows counting downward.
#[derive(Copy, Clone, VariantArray, Eq, PartialEq, Hash, Debug, Ord, PartialOrd)]
pub enum KnightStep {
    /// `(2, 1)`
    RightDown,
    /// `(1, 2)`
    DownRight,
    /// `(-1, 2)`
    DownLeft,
    /// `(-2, 1)`
    LeftDown,
    /// `(-2, -1)`
    LeftUp,
    /// `(-1, -2)`
    UpLeft,
    /// `(1, -2)`
    UpRight,
    /// `(2, -1)`
    RightUp,
}

impl KnightStep {
    /// The `(column, row)` delta of this step.
    pub const fn offset(&self) -> (isize, isize) {
        match self {
            Self::RightDown => (2, 1),
            Self::DownRight => (1, 2),
            Self::DownLeft => (-1, 2),
            Self::LeftDown => (-2, 1),
            Self::LeftUp => (-2, -1),
            Self::UpLeft => (-1, -2),
            Self::UpRight => (1, -2),
            Self::RightUp => (2, -1),
        }
    }

    /// Attempt the step from `location` in the direction specified by `self` and return the resultant [`Location`].
    ///
    /// No bounds are checked; a step off the top or left edge lands on a coordinate no board contains.
    pub fn attempt_from(&self, location: Location) -> Location {
        location.offset_by(self.offset())
    }

    /// The step which undoes `self`.
    pub fn invert(&self) -> Self {
        match self {
            Self::RightDown => Self::LeftUp,
            Self::DownRight => Self::UpLeft,
            Self::DownLeft => Self::UpRight,
            Self::LeftDown => Self::RightUp,
            Self::LeftUp => Self::RightDown,
            Self::UpLeft => Self::DownRight,
            Self::UpRight => Self::DownLeft,
            Self::RightUp => Self::LeftDown,
        }
    }

    /// Every location one knight move from `location`, in enumeration order, before any bounds check.
    pub fn neighbors_of(location: Location) -> Vec<(Self, Location)> {
        Self::VARIANTS.iter()
            .map(|step| (*step, step.attempt_from(location)))
            .collect_vec()
    }

    /// Determine the step leading from `a` to `b`, or [`None`] if the two are not a knight move apart.
    pub fn between(a: Location, b: Location) -> Option<Self> {
        Self::VARIANTS.iter().find(|step| step.attempt_from(a) == b).copied()
    }
}
