use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::PlacementError;

use super::piece::PieceKind;

/// Smallest supported board side length.
pub const MIN_SIDE: usize = 4;
/// Largest supported board side length.
pub const MAX_SIDE: usize = 16;

/// A single cell of the board.
///
/// A cell is binary (occupied/empty) for placement purposes; the occupying
/// [`PieceKind`] is carried only so the caller can render a color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum Cell {
    /// Empty cell.
    #[default]
    Empty,
    /// Cell occupied by a placed piece.
    Filled(PieceKind),
}

impl Cell {
    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }
}

/// Result of a successful placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementOutcome {
    /// Number of lines cleared by this placement (full rows plus full
    /// columns, all cleared in the same pass).
    pub cleared_lines: usize,
    /// Coordinates of every cell emptied by the clear, for animation and
    /// scoring. A cell sitting on both a cleared row and a cleared column
    /// appears once.
    pub cleared_cells: Vec<(usize, usize)>,
}

/// Fixed-size square placement board.
///
/// The side length is chosen at construction (the shipped game uses 8 or 10)
/// and never changes afterwards. There is no gravity: cells keep their exact
/// position until the row or column they sit on is cleared.
///
/// # Example
///
/// ```
/// use gridfall_engine::{Board, PieceKind};
///
/// let mut board = Board::new(8);
/// let outcome = board.try_place(PieceKind::O, 0, 0).unwrap();
/// assert_eq!(outcome.cleared_lines, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Board {
    side: usize,
    cells: Vec<Cell>,
}

impl Board {
    /// Creates an empty board with the given side length.
    ///
    /// # Panics
    ///
    /// Panics if `side` is outside [`MIN_SIDE`]`..=`[`MAX_SIDE`].
    #[must_use]
    pub fn new(side: usize) -> Self {
        assert!(
            (MIN_SIDE..=MAX_SIDE).contains(&side),
            "board side {side} outside supported range {MIN_SIDE}..={MAX_SIDE}",
        );
        Self {
            side,
            cells: vec![Cell::Empty; side * side],
        }
    }

    /// Builds a board from an ASCII sketch: `.` for empty, `#` for occupied.
    ///
    /// Lines are trimmed and blank lines skipped, so fixtures can be written
    /// inline in tests.
    ///
    /// # Panics
    ///
    /// Panics if the sketch is not square, uses an unsupported side length,
    /// or contains characters other than `.` and `#`.
    #[must_use]
    pub fn from_ascii(ascii: &str) -> Self {
        let lines: Vec<&str> = ascii
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let mut board = Self::new(lines.len());
        for (row, line) in lines.iter().enumerate() {
            assert_eq!(
                line.chars().count(),
                board.side,
                "row {row} length does not match board side",
            );
            for (col, ch) in line.chars().enumerate() {
                match ch {
                    '.' => {}
                    '#' => board.cells[row * board.side + col] = Cell::Filled(PieceKind::Dot),
                    _ => panic!("unexpected board character {ch:?}"),
                }
            }
        }
        board
    }

    /// Returns the side length of the board.
    #[must_use]
    pub const fn side(&self) -> usize {
        self.side
    }

    /// Returns the cell at the given coordinates.
    ///
    /// # Panics
    ///
    /// Panics if the coordinates are out of bounds.
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Cell {
        assert!(row < self.side && col < self.side, "cell out of bounds");
        self.cells[row * self.side + col]
    }

    /// Returns the number of unoccupied cells.
    #[must_use]
    pub fn empty_cells(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_empty()).count()
    }

    /// Returns the number of occupied cells in a row.
    #[must_use]
    pub fn row_occupied(&self, row: usize) -> usize {
        (0..self.side)
            .filter(|&col| !self.cell(row, col).is_empty())
            .count()
    }

    /// Returns the number of occupied cells in a column.
    #[must_use]
    pub fn col_occupied(&self, col: usize) -> usize {
        (0..self.side)
            .filter(|&row| !self.cell(row, col).is_empty())
            .count()
    }

    /// Checks whether a piece could be placed with its bounding box anchored
    /// at `(row, col)`, without mutating the board.
    #[must_use]
    pub fn can_place(&self, kind: PieceKind, row: usize, col: usize) -> bool {
        self.check_place(kind, row, col).is_ok()
    }

    /// Returns whether the piece has at least one legal placement anywhere on
    /// the current board.
    #[must_use]
    pub fn has_placement(&self, kind: PieceKind) -> bool {
        self.anchor_positions(kind)
            .any(|(row, col)| self.can_place(kind, row, col))
    }

    /// Counts the legal placements of the piece on the current board.
    #[must_use]
    pub fn placement_count(&self, kind: PieceKind) -> usize {
        self.anchor_positions(kind)
            .filter(|&(row, col)| self.can_place(kind, row, col))
            .count()
    }

    /// Attempts to place a piece with its bounding box anchored at
    /// `(row, col)`.
    ///
    /// On success every filled cell of the shape is marked occupied, then
    /// every now-full row and column is cleared **simultaneously** in a
    /// single pass. Clearing one line never cascades into re-evaluating
    /// others, and no gravity is applied afterwards.
    ///
    /// On failure the board is left untouched (no partial writes).
    pub fn try_place(
        &mut self,
        kind: PieceKind,
        row: usize,
        col: usize,
    ) -> Result<PlacementOutcome, PlacementError> {
        self.check_place(kind, row, col)?;
        for &(dr, dc) in kind.shape().cells {
            self.cells[(row + dr) * self.side + (col + dc)] = Cell::Filled(kind);
        }
        Ok(self.clear_full_lines())
    }

    fn check_place(&self, kind: PieceKind, row: usize, col: usize) -> Result<(), PlacementError> {
        let shape = kind.shape();
        if row + shape.rows > self.side || col + shape.cols > self.side {
            return Err(PlacementError::OutOfBounds);
        }
        for &(dr, dc) in shape.cells {
            if !self.cells[(row + dr) * self.side + (col + dc)].is_empty() {
                return Err(PlacementError::Overlap);
            }
        }
        Ok(())
    }

    /// Identifies all full rows and columns in one pass and empties them.
    fn clear_full_lines(&mut self) -> PlacementOutcome {
        let full_rows: ArrayVec<usize, MAX_SIDE> = (0..self.side)
            .filter(|&row| self.row_occupied(row) == self.side)
            .collect();
        let full_cols: ArrayVec<usize, MAX_SIDE> = (0..self.side)
            .filter(|&col| self.col_occupied(col) == self.side)
            .collect();

        let mut cleared_cells = Vec::new();
        for &row in &full_rows {
            for col in 0..self.side {
                cleared_cells.push((row, col));
            }
        }
        for &col in &full_cols {
            for row in 0..self.side {
                if !full_rows.contains(&row) {
                    cleared_cells.push((row, col));
                }
            }
        }
        for &(row, col) in &cleared_cells {
            self.cells[row * self.side + col] = Cell::Empty;
        }

        PlacementOutcome {
            cleared_lines: full_rows.len() + full_cols.len(),
            cleared_cells,
        }
    }

    /// Iterates over every anchor position where the piece's bounding box
    /// fits inside the grid.
    fn anchor_positions(&self, kind: PieceKind) -> impl Iterator<Item = (usize, usize)> + '_ {
        let shape = kind.shape();
        let row_limit = (self.side + 1).saturating_sub(shape.rows);
        let col_limit = (self.side + 1).saturating_sub(shape.cols);
        (0..row_limit).flat_map(move |row| (0..col_limit).map(move |col| (row, col)))
    }
}
