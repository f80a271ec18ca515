//! Configuration for placing a [`Knight`] on a board.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use thiserror::Error;
use tracing::info;

use crate::board::{Board, ClosedTourOutlook};
use crate::knight::{Knight, TourError};
use crate::location::{Dimension, Square};

/// Reasons a builder may become invalid while building.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum BuilderInvalidReason {
    /// A board was requested with no ranks or no files.
    #[error("a board needs at least one rank and one file")]
    ZeroDimension,
}

/// Where a [`Knight`] built by a [`TourBuilder`] starts.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub enum StartSquare {
    /// A square chosen uniformly at random.
    #[default]
    Random,
    /// A specific square. If it is off the board, a random square is used and [`Launch::note`] says so.
    At(Square),
}

impl From<Square> for StartSquare {
    fn from(value: Square) -> Self {
        Self::At(value)
    }
}

impl From<Option<Square>> for StartSquare {
    fn from(value: Option<Square>) -> Self {
        value.map_or(Self::Random, Self::At)
    }
}

/// A freshly placed [`Knight`] and what was learned placing it.
pub struct Launch<R: Rng = StdRng> {
    /// The placed knight, ready to traverse.
    pub knight: Knight<R>,
    /// [`TourError::InvalidSquare`] if the requested start was replaced by a random one.
    pub note: Option<TourError>,
    /// Whether a closed tour is ruled out on this board. The knight does not use this.
    pub outlook: ClosedTourOutlook,
}

/// Configures and places a [`Knight`].
///
/// Like other builders, this mutates itself while building and can be [`Clone`]d to save its state.
/// An invalid builder ignores further configuration and refuses to [`build`](Self::build).
#[derive(Clone, Debug)]
pub struct TourBuilder {
    board: Board,
    start: StartSquare,
    seed: Option<u64>,
    invalid_reasons: Vec<BuilderInvalidReason>,
}

impl Default for TourBuilder {
    /// An 8×8 board, a random start, and an unseeded generator.
    fn default() -> Self {
        Self::with_board(Board::default())
    }
}

impl TourBuilder {
    /// Construct a new [`Self`] with the specified dimensions, specified in `(ranks, files)` order.
    pub fn with_dims(dims: (Dimension, Dimension)) -> Self {
        Self::with_board(Board::with_dims(dims))
    }

    /// Like [`Self::with_dims`], but a zero in either position leaves the builder invalid with [`ZeroDimension`](BuilderInvalidReason::ZeroDimension).
    pub fn with_size(ranks: usize, files: usize) -> Self {
        match Board::try_from((ranks, files)) {
            Ok(board) => Self::with_board(board),
            Err(reason) => {
                let mut builder = Self::default();
                builder.invalid_reasons.push(reason);
                builder
            }
        }
    }

    /// Construct a new [`Self`] for an existing board.
    pub fn with_board(board: Board) -> Self {
        Self {
            board,
            start: StartSquare::default(),
            seed: None,
            invalid_reasons: Default::default(),
        }
    }

    /// The board a knight will be placed on, or `None` if the builder is invalid.
    pub fn board(&self) -> Option<&Board> {
        self.invalid_reasons.is_empty().then_some(&self.board)
    }

    /// Set the start square.
    ///
    /// If the builder is in an invalid state, this function does nothing.
    pub fn start(&mut self, start: impl Into<StartSquare>) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        self.start = start.into();
        self
    }

    /// Seed the generator used by [`build`](Self::build) so that placement and traversal are reproducible.
    ///
    /// If the builder is in an invalid state, this function does nothing.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        self.seed = Some(seed);
        self
    }

    /// Check the validity of this builder, ensuring no [`BuilderInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<BuilderInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<BuilderInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Place a knight driven by a [`StdRng`], seeded if [`seed`](Self::seed) was called and from system entropy otherwise.
    pub fn build(&self) -> Result<Launch, &Vec<BuilderInvalidReason>> {
        let rng = match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        self.build_with_rng(rng)
    }

    /// Place a knight driven by the given generator, ignoring any configured seed.
    pub fn build_with_rng<R: Rng>(&self, rng: R) -> Result<Launch<R>, &Vec<BuilderInvalidReason>> {
        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        let outlook = self.board.closed_tour_outlook();
        info!(ranks = self.board.ranks().get(), files = self.board.files().get(), %outlook, "board ready");

        let (knight, note) = match self.start {
            StartSquare::Random => (Knight::at_random(self.board, rng), None),
            StartSquare::At(square) if self.board.contains(square) => (Knight::place(self.board, square, rng), None),
            StartSquare::At(square) => {
                let note = TourError::InvalidSquare { square, count: self.board.square_count() };
                let knight = Knight::at_random(self.board, rng);
                info!(requested = square, start = knight.current_square(), "{note}; starting on a random square");
                (knight, Some(note))
            }
        };

        Ok(Launch { knight, note, outlook })
    }
}
