#![warn(missing_docs)]

//! # `chevalier`
//!
//! Open [knight's tours](https://en.wikipedia.org/wiki/Knight%27s_tour) on rectangular boards, found by a randomized walk rather than by search.
//! Begin by configuring a [`TourBuilder`], build it to place a [`Knight`], then call [`traverse()`](crate::Knight::traverse).
//!
//! ```
//! use chevalier::{StartSquare, TourBuilder};
//!
//! let mut launch = TourBuilder::default()
//!     .start(StartSquare::At(0))
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! match launch.knight.traverse_within(10_000) {
//!     Ok(report) => println!("toured in {} moves and {} pivots", report.moves, report.pivots),
//!     Err(error) => println!("{error}"),
//! }
//! println!("{}", launch.knight.tour());
//! ```
//!
//! # Internals
//! Squares are numbered along rows from the top left corner, so square `s` of a board `files` wide sits in column `s % files` and row `s / files`.
//!
//! A traversal proceeds as follows:
//!
//! 1. Walk: jump to a uniformly random unvisited neighbor until none is left.
//! 2. If every square is visited, stop.
//! Otherwise the knight is stuck at the end of its path `p_0 .. p_k`.
//! 3. Pivot: pick a random visited neighbor `p_t` of `p_k`, other than `p_(k-1)`, and reverse the path after it, giving `p_0 .. p_t, p_k .. p_(t+1)`.
//! This is still a knight's path over the same squares, but it ends somewhere new, so walk again from there.
//! 4. If there is nothing to pivot on, give up.
//!
//! There is no backtracking, so a traversal may fail on a board that has a tour, and may take arbitrarily many pivots on one that does not.
//! All randomness comes from the generator owned by the [`Knight`], so a seeded generator reproduces a traversal exactly.

pub use board::{Board, ClosedTourOutlook};
pub use builder::{BuilderInvalidReason, Launch, StartSquare, TourBuilder};
pub use knight::{Knight, MoveFilter, TourError, TraversalReport, TraversalState};
pub use location::{Dimension, Location, Square};
pub use step::KnightStep;
pub use tour::Tour;

pub(crate) mod board;
mod tests;
pub(crate) mod location;
pub mod step;
pub(crate) mod knight;
pub mod builder;
pub(crate) mod tour;
#[cfg(feature = "wasm")]
pub mod wasm;
