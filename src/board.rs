use std::collections::HashSet;
use std::fmt::{Display, Formatter};
use std::num::NonZero;

use itertools::Itertools;
use ndarray::{Array2, AssignElem};
use petgraph::graphmap::UnGraphMap;
use unordered_pair::UnorderedPair;

use crate::builder::BuilderInvalidReason;
use crate::location::{Coord, Dimension, Location, Square};
use crate::step::KnightStep;

/// Whether a closed tour is ruled out on a board, following Schwenk's 1991 classification.
///
/// Any `m * n` board with `m <= n` admits a closed knight's tour unless `m` and `n` are both odd,
/// `m` is 1, 2, or 4, or `m` is 3 and `n` is 4, 6, or 8.
/// This is informational only; a [`Knight`](crate::Knight) never attempts closed tours.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ClosedTourOutlook {
    /// None of the exclusions apply.
    Possible,
    /// Both dimensions are odd, so the square count is odd and no closed tour can alternate colors.
    BothOdd {
        /// The shorter dimension.
        m: Coord,
        /// The longer dimension.
        n: Coord,
    },
    /// The smaller dimension is 1, 2, or 4.
    Narrow {
        /// The shorter dimension.
        m: Coord,
    },
    /// A 3-rank board of length 4, 6, or 8.
    ShortThree {
        /// The longer dimension.
        n: Coord,
    },
}

impl ClosedTourOutlook {
    /// Classify a board with the given dimensions, in either order.
    pub fn classify(a: Coord, b: Coord) -> Self {
        let (m, n) = if a <= b { (a, b) } else { (b, a) };

        if m % 2 == 1 && n % 2 == 1 {
            Self::BothOdd { m, n }
        } else if matches!(m, 1 | 2 | 4) {
            Self::Narrow { m }
        } else if m == 3 && matches!(n, 4 | 6 | 8) {
            Self::ShortThree { n }
        } else {
            Self::Possible
        }
    }

    /// `true` unless the classification is [`Possible`](Self::Possible).
    pub fn excludes_closed_tour(&self) -> bool {
        !matches!(self, Self::Possible)
    }
}

impl Display for ClosedTourOutlook {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Possible => write!(f, "a closed tour is possible"),
            Self::BothOdd { m, n } => write!(f, "m={m} and n={n} are both odd; a closed tour is not possible"),
            Self::Narrow { m } => write!(f, "m={m}: for m=1, 2, or 4, a closed tour is not possible"),
            Self::ShortThree { n } => write!(f, "m=3, n={n}: for m=3 and n=4, 6, or 8, a closed tour is not possible"),
        }
    }
}

/// An immutable rectangular board of `ranks` rows and `files` columns.
///
/// Square `s` lies in column `s % files` and row `s / files`; square 0 is the top left corner and indices run along rows.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Board {
    ranks: Dimension,
    files: Dimension,
}

impl Default for Board {
    fn default() -> Self {
        Self::with_dims((NonZero::new(8).unwrap(), NonZero::new(8).unwrap()))
    }
}

impl TryFrom<(Coord, Coord)> for Board {
    type Error = BuilderInvalidReason;

    /// Build a board from `(ranks, files)`, rejecting a zero in either position.
    fn try_from(value: (Coord, Coord)) -> Result<Self, Self::Error> {
        match (NonZero::new(value.0), NonZero::new(value.1)) {
            (Some(ranks), Some(files)) => Ok(Self::with_dims((ranks, files))),
            _ => Err(BuilderInvalidReason::ZeroDimension),
        }
    }
}

impl Board {
    /// Construct a board from `(ranks, files)`.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self { ranks: dims.0, files: dims.1 }
    }

    /// `(ranks, files)`.
    pub fn dimensions(&self) -> (Coord, Coord) {
        (self.ranks.get(), self.files.get())
    }

    /// Number of rows.
    pub fn ranks(&self) -> Dimension {
        self.ranks
    }

    /// Number of columns.
    pub fn files(&self) -> Dimension {
        self.files
    }

    /// Number of squares on the board; also the length of a complete tour.
    pub fn square_count(&self) -> usize {
        self.ranks.get() * self.files.get()
    }

    /// Whether column `col` and row `row` fall on the board.
    pub fn in_bounds(&self, col: Coord, row: Coord) -> bool {
        col < self.files.get() && row < self.ranks.get()
    }

    /// Whether `square` indexes a square of this board.
    pub fn contains(&self, square: Square) -> bool {
        square < self.square_count()
    }

    /// The column and row of `square`. Off-board squares give off-board locations.
    pub fn location_of(&self, square: Square) -> Location {
        Location::from_square(square, self.files)
    }

    /// The square at `location`, or [`None`] if it is off the board.
    pub fn square_at(&self, location: Location) -> Option<Square> {
        self.in_bounds(location.0, location.1).then(|| location.as_square(self.files))
    }

    /// Squares one knight move from `square`, in [`KnightStep`] enumeration order.
    ///
    /// This knows nothing of visited squares. A `square` off the board has no neighbors.
    pub fn neighbors_raw(&self, square: Square) -> Vec<Square> {
        if !self.contains(square) {
            return Vec::new();
        }

        KnightStep::neighbors_of(self.location_of(square)).into_iter()
            .filter_map(|(_, location)| self.square_at(location))
            .collect_vec()
    }

    /// Whether `a` and `b` are both on the board and a knight move apart.
    pub fn is_knight_move(&self, a: Square, b: Square) -> bool {
        self.contains(a) && self.contains(b) && KnightStep::between(self.location_of(a), self.location_of(b)).is_some()
    }

    /// Every knight move on the board, each listed once regardless of direction.
    pub fn knight_moves(&self) -> HashSet<UnorderedPair<Square>> {
        (0..self.square_count())
            .flat_map(|square| self.neighbors_raw(square).into_iter()
                .map(move |neighbor| UnorderedPair::from((square, neighbor))))
            .collect()
    }

    /// The knight-move graph of this board.
    ///
    /// Each edge is weighted with the step leading from its lower indexed square to its higher indexed square.
    pub fn knight_graph(&self) -> UnGraphMap<Square, KnightStep> {
        let moves = self.knight_moves();
        let mut graph = UnGraphMap::with_capacity(self.square_count(), moves.len());

        for square in 0..self.square_count() {
            graph.add_node(square);
        }

        for UnorderedPair(a, b) in moves {
            let (low, high) = if a < b { (a, b) } else { (b, a) };
            // knight_moves only pairs up actual neighbors, so this always finds a step
            if let Some(step) = KnightStep::between(self.location_of(low), self.location_of(high)) {
                graph.add_edge(low, high, step);
            }
        }

        graph
    }

    /// Classify this board according to [`ClosedTourOutlook::classify`].
    pub fn closed_tour_outlook(&self) -> ClosedTourOutlook {
        ClosedTourOutlook::classify(self.ranks.get(), self.files.get())
    }

    /// Lay `path` out on the board: each visited cell holds its zero-based position in `path`.
    ///
    /// The array is indexed `(row, col)` with row 0 at the top. Squares off the board are skipped.
    pub fn visit_order(&self, path: &[Square]) -> Array2<Option<usize>> {
        let mut grid = Array2::from_elem((self.ranks.get(), self.files.get()), None);

        for (order, square) in path.iter().enumerate() {
            if let Some(cell) = grid.get_mut(self.location_of(*square).as_index()) {
                cell.assign_elem(Some(order));
            }
        }

        grid
    }
}
