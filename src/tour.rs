use std::fmt::{Display, Formatter};

use itertools::Itertools;

use crate::board::Board;
use crate::location::Square;

/// An owned path over a [`Board`], as left behind by a [`Knight`](crate::Knight).
///
/// A tour is not necessarily complete; a failed traversal yields a partial one.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Tour {
    board: Board,
    path: Vec<Square>,
}

impl Tour {
    /// Wrap `path` without checking it; see [`is_knight_path`](Self::is_knight_path).
    pub fn new(board: Board, path: Vec<Square>) -> Self {
        Self { board, path }
    }

    /// The board the path was walked on.
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The squares in visiting order.
    pub fn path(&self) -> &[Square] {
        &self.path
    }

    /// Number of squares on the path.
    pub fn len(&self) -> usize {
        self.path.len()
    }

    /// Whether the path has no squares.
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Whether every square of the board appears on the path.
    pub fn is_complete(&self) -> bool {
        self.path.len() == self.board.square_count() && self.is_knight_path()
    }

    /// Whether the path stays on the board, never repeats a square, and only ever makes knight moves.
    pub fn is_knight_path(&self) -> bool {
        let graph = self.board.knight_graph();

        self.path.iter().all(|square| self.board.contains(*square))
            && self.path.iter().all_unique()
            && self.path.iter().tuple_windows().all(|(a, b)| graph.contains_edge(*a, *b))
    }

    /// Whether this is a complete tour whose last square is a knight move from its first.
    pub fn is_closed(&self) -> bool {
        match (self.path.first(), self.path.last()) {
            (Some(first), Some(last)) => self.is_complete() && self.board.is_knight_move(*first, *last),
            _ => false,
        }
    }
}

fn file_label(col: usize) -> String {
    match u8::try_from(col) {
        Ok(col) if col < 26 => char::from(b'A' + col).to_string(),
        _ => format!("f{col}"),
    }
}

impl Display for Tour {
    /// Print the move number on each square, files lettered along the top and ranks numbered from the bottom.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let (ranks, files) = self.board.dimensions();
        let grid = self.board.visit_order(&self.path);
        let width = self.board.square_count().saturating_sub(1).to_string().len()
            .max(file_label(files - 1).len());
        let margin = ranks.to_string().len();

        write!(f, "{:margin$}", "")?;
        for col in 0..files {
            write!(f, " {:>width$}", file_label(col))?;
        }
        writeln!(f)?;

        for (row, cells) in grid.rows().into_iter().enumerate() {
            write!(f, "{:>margin$}", ranks - row)?;
            for cell in cells {
                match cell {
                    Some(order) => write!(f, " {order:>width$}")?,
                    None => write!(f, " {:>width$}", '.')?,
                }
            }
            writeln!(f)?;
        }

        Ok(())
    }
}
