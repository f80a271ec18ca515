use itertools::Itertools;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;
use strum::Display;
use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::board::Board;
use crate::location::Square;
use crate::tour::Tour;

/// Which neighbors [`Knight::legal_moves`] should report.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Display)]
pub enum MoveFilter {
    /// Neighbors not yet on the path; candidates for the next move.
    Unvisited,
    /// Neighbors already on the path; candidates for a pivot.
    Visited,
}

/// Where a [`Knight`] is in its traversal.
///
/// A traversal alternates `Walking` and `Stuck`/`Pivoting` until it ends in `Done` or `Failed`.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TraversalState {
    /// Moving to random unvisited neighbors.
    Walking,
    /// No unvisited neighbor is left, but the tour is incomplete.
    Stuck,
    /// Reordering the path around a pivot.
    Pivoting,
    /// Every square is visited.
    Done,
    /// Stuck with nothing to pivot on.
    Failed,
}

/// Reasons an operation on a [`Knight`] may be refused.
///
/// None of these leave the knight in a changed state.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum TourError {
    /// A start square outside the board was requested.
    /// Builders recover from this by starting on a random square instead.
    #[error("{square} is not a legal square on a board of {count} squares")]
    InvalidSquare {
        /// The requested square.
        square: Square,
        /// Squares on the board.
        count: usize,
    },
    /// The destination is not an unvisited square one knight move away.
    #[error("{to} is not an unvisited square one knight move from {from}")]
    IllegalMove {
        /// The current square.
        from: Square,
        /// The refused destination.
        to: Square,
    },
    /// The pivot is not a visited square one knight move away.
    #[error("{pivot} is not a visited square one knight move from {from}")]
    InvalidPivot {
        /// The current square.
        from: Square,
        /// The refused pivot.
        pivot: Square,
    },
    /// The knight is stuck and has nothing to pivot on but its immediate predecessor.
    /// This ends a traversal; the tour is incomplete.
    #[error("stuck at {at} with nothing to pivot on after visiting {visited} of {count} squares")]
    TraversalStuck {
        /// The square the knight is stuck on.
        at: Square,
        /// Squares on the path.
        visited: usize,
        /// Squares on the board.
        count: usize,
    },
    /// [`Knight::traverse_within`] used up its pivots without completing the tour.
    #[error("gave up after {pivots} pivots having visited {visited} of {count} squares")]
    PivotBudgetExhausted {
        /// Pivots made by the call that gave up.
        pivots: usize,
        /// Squares on the path.
        visited: usize,
        /// Squares on the board.
        count: usize,
    },
}

/// Counters describing a finished traversal.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
pub struct TraversalReport {
    /// Moves made, including those later reordered by pivots.
    pub moves: usize,
    /// Pivots performed by [`Knight::unblock`].
    pub pivots: usize,
}

/// A knight touring a [`Board`], visiting each square at most once.
///
/// The path is never empty, its last square is always the current square, and consecutive squares on it are always a knight move apart.
/// Randomness comes only from the owned generator `R`, so a seeded generator makes every traversal reproducible.
pub struct Knight<R: Rng = StdRng> {
    board: Board,
    current: Square,
    path: Vec<Square>,
    // membership mirror of `path`, indexed by square
    visited: Vec<bool>,
    state: TraversalState,
    report: TraversalReport,
    rng: R,
}

impl<R: Rng> Knight<R> {
    /// Place a knight on `start`.
    ///
    /// Returns [`TourError::InvalidSquare`] if `start` is not on `board`; every square, including the last, is a valid start.
    pub fn new(board: Board, start: Square, rng: R) -> Result<Self, TourError> {
        if !board.contains(start) {
            return Err(TourError::InvalidSquare { square: start, count: board.square_count() });
        }

        Ok(Self::place(board, start, rng))
    }

    /// Place a knight on a square chosen uniformly at random by `rng`.
    pub fn at_random(board: Board, mut rng: R) -> Self {
        let start = rng.gen_range(0..board.square_count());
        Self::place(board, start, rng)
    }

    // `start` must be on `board`
    pub(crate) fn place(board: Board, start: Square, rng: R) -> Self {
        let mut visited = vec![false; board.square_count()];
        visited[start] = true;

        let mut path = Vec::with_capacity(board.square_count());
        path.push(start);

        Self {
            board,
            current: start,
            path,
            visited,
            state: TraversalState::Walking,
            report: TraversalReport::default(),
            rng,
        }
    }

    /// The board being toured.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The last square of the path.
    pub fn current_square(&self) -> Square {
        self.current
    }

    /// The squares visited so far, in visiting order.
    pub fn current_path(&self) -> &[Square] {
        &self.path
    }

    /// Where the traversal stands.
    pub fn state(&self) -> TraversalState {
        self.state
    }

    /// Moves and pivots made so far.
    pub fn report(&self) -> TraversalReport {
        self.report
    }

    /// Whether every square of the board is on the path.
    pub fn is_complete(&self) -> bool {
        self.path.len() == self.board.square_count()
    }

    /// A snapshot of the path so far.
    pub fn tour(&self) -> Tour {
        Tour::new(self.board, self.path.clone())
    }

    /// Consume the knight, keeping only its path.
    pub fn into_tour(self) -> Tour {
        Tour::new(self.board, self.path)
    }

    /// Squares one knight move from the current square, split by whether they are on the path.
    ///
    /// Order follows [`KnightStep`](crate::step::KnightStep) enumeration order.
    pub fn legal_moves(&self, filter: MoveFilter) -> Vec<Square> {
        self.board.neighbors_raw(self.current).into_iter()
            .filter(|square| match filter {
                MoveFilter::Unvisited => !self.visited[*square],
                MoveFilter::Visited => self.visited[*square],
            })
            .collect_vec()
    }

    /// Move to `destination`, which must be one of [`legal_moves(MoveFilter::Unvisited)`](Self::legal_moves).
    pub fn move_to(&mut self, destination: Square) -> Result<(), TourError> {
        if !self.legal_moves(MoveFilter::Unvisited).contains(&destination) {
            return Err(TourError::IllegalMove { from: self.current, to: destination });
        }

        self.advance(destination);
        Ok(())
    }

    // callers have already checked `destination` is an unvisited neighbor
    fn advance(&mut self, destination: Square) {
        trace!(from = self.current, to = destination, "move");
        self.visited[destination] = true;
        self.path.push(destination);
        self.current = destination;
        self.report.moves += 1;
    }

    /// Move to uniformly random unvisited neighbors until there are none left.
    ///
    /// Returns the number of moves made. Leaves the knight [`Done`](TraversalState::Done) or [`Stuck`](TraversalState::Stuck).
    pub fn random_walk(&mut self) -> usize {
        self.state = TraversalState::Walking;
        let mut moves = 0;

        while let Some(&next) = self.legal_moves(MoveFilter::Unvisited).choose(&mut self.rng) {
            self.advance(next);
            moves += 1;
        }

        self.state = if self.is_complete() {
            TraversalState::Done
        } else {
            debug!(at = self.current, visited = self.path.len(), "stuck");
            TraversalState::Stuck
        };

        moves
    }

    /// Reverse the part of the path after `pivot`, which must be one of [`legal_moves(MoveFilter::Visited)`](Self::legal_moves).
    ///
    /// With the path `p_0 .. p_t .. p_k` and `pivot = p_t`, the path becomes `p_0 .. p_t, p_k, p_(k-1) .. p_(t+1)`.
    /// `p_t` and `p_k` are a knight move apart, so the result is still a knight's path over the same squares, now ending on `p_(t+1)`.
    pub fn pivot_path(&mut self, pivot: Square) -> Result<(), TourError> {
        let invalid = TourError::InvalidPivot { from: self.current, pivot };

        if !self.legal_moves(MoveFilter::Visited).contains(&pivot) {
            return Err(invalid);
        }

        let Some(t) = self.path.iter().position(|square| *square == pivot) else {
            return Err(invalid);
        };

        self.path[t + 1..].reverse();
        // the pivot is never the current square, so the reversed tail is nonempty
        if let Some(&last) = self.path.last() {
            debug!(pivot, from = self.current, to = last, "pivot");
            self.current = last;
        }

        Ok(())
    }

    /// Recover from being stuck by pivoting on a random visited neighbor, then walk again.
    ///
    /// The immediate predecessor is never chosen, as pivoting on it changes nothing.
    /// Returns the number of moves made after the pivot, or [`TourError::TraversalStuck`] if there is no pivot to choose.
    pub fn unblock(&mut self) -> Result<usize, TourError> {
        let predecessor = self.path.len().checked_sub(2).map(|i| self.path[i]);
        let candidates = self.legal_moves(MoveFilter::Visited).into_iter()
            .filter(|square| Some(*square) != predecessor)
            .collect_vec();

        let Some(&pivot) = candidates.choose(&mut self.rng) else {
            self.state = TraversalState::Failed;
            warn!(at = self.current, visited = self.path.len(), count = self.board.square_count(), "no pivot available");
            return Err(TourError::TraversalStuck {
                at: self.current,
                visited: self.path.len(),
                count: self.board.square_count(),
            });
        };

        self.state = TraversalState::Pivoting;
        self.pivot_path(pivot)?;
        self.report.pivots += 1;

        Ok(self.random_walk())
    }

    /// Walk, then alternate pivoting and walking until every square is visited.
    ///
    /// Fails with [`TourError::TraversalStuck`] as soon as [`unblock`](Self::unblock) does; the partial path remains available.
    /// No bound is placed on the number of pivots, so on some boards this never returns; see [`traverse_within`](Self::traverse_within).
    pub fn traverse(&mut self) -> Result<TraversalReport, TourError> {
        self.run(None)
    }

    /// Like [`traverse`](Self::traverse), but give up with [`TourError::PivotBudgetExhausted`] once this call has pivoted `max_pivots` times.
    pub fn traverse_within(&mut self, max_pivots: usize) -> Result<TraversalReport, TourError> {
        self.run(Some(max_pivots))
    }

    fn run(&mut self, max_pivots: Option<usize>) -> Result<TraversalReport, TourError> {
        let pivots_before = self.report.pivots;
        self.random_walk();

        while !self.is_complete() {
            if max_pivots.is_some_and(|max| self.report.pivots - pivots_before >= max) {
                warn!(pivots = self.report.pivots, visited = self.path.len(), "pivot budget exhausted");
                return Err(TourError::PivotBudgetExhausted {
                    pivots: self.report.pivots - pivots_before,
                    visited: self.path.len(),
                    count: self.board.square_count(),
                });
            }

            self.unblock()?;
        }

        self.state = TraversalState::Done;
        debug!(moves = self.report.moves, pivots = self.report.pivots, "tour complete");
        Ok(self.report)
    }
}
