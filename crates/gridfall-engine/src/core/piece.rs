use serde::{Deserialize, Serialize};

/// Enum representing the type of piece.
///
/// The catalog is split into two groups:
///
/// - **Core** pieces: the seven classic tetromino silhouettes (4 cells each).
///   Unlike Tetris, pieces in this game never rotate; each kind has exactly
///   one orientation.
/// - **Extended** pieces: single cells, short/long lines, corners and filled
///   rectangles ranging from 1 to 9 cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceKind {
    /// I-piece (1×4 line).
    I = 0,
    /// O-piece (2×2 square).
    O = 1,
    /// T-piece.
    T = 2,
    /// S-piece.
    S = 3,
    /// Z-piece.
    Z = 4,
    /// J-piece.
    J = 5,
    /// L-piece.
    L = 6,
    /// Single cell.
    Dot = 7,
    /// 1×2 line.
    Duo = 8,
    /// 1×3 line.
    Trio = 9,
    /// 2×2 corner (3 cells).
    SmallCorner = 10,
    /// 1×5 line.
    LongLine = 11,
    /// 3×3 corner (5 cells).
    LargeCorner = 12,
    /// 2×3 filled rectangle (6 cells).
    Rect = 13,
    /// 3×3 filled square (9 cells).
    BigSquare = 14,
}

/// Difficulty class of a piece, derived from its cell count.
///
/// Categories exist only to look up generation weights; placement geometry
/// always goes through [`PieceKind::shape`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[repr(u8)]
pub enum PieceCategory {
    /// 1 cell.
    Tiny = 0,
    /// 2 cells.
    Small = 1,
    /// 3 cells.
    Medium = 2,
    /// 4 cells (all core tetrominoes).
    Standard = 3,
    /// 5 cells.
    Large = 4,
    /// 6 cells.
    Heavy = 5,
    /// 9 cells.
    Huge = 6,
}

/// Immutable shape matrix of a piece.
///
/// `cells` lists the `(row, col)` offsets of every filled cell relative to the
/// top-left corner of the piece's bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    /// Bounding box height.
    pub rows: usize,
    /// Bounding box width.
    pub cols: usize,
    /// Filled cell offsets within the bounding box.
    pub cells: &'static [(usize, usize)],
}

impl PieceKind {
    /// Number of piece kinds in the catalog.
    pub const LEN: usize = 15;

    /// Every piece kind, core pieces first.
    pub const ALL: [Self; Self::LEN] = [
        Self::I,
        Self::O,
        Self::T,
        Self::S,
        Self::Z,
        Self::J,
        Self::L,
        Self::Dot,
        Self::Duo,
        Self::Trio,
        Self::SmallCorner,
        Self::LongLine,
        Self::LargeCorner,
        Self::Rect,
        Self::BigSquare,
    ];

    /// The seven core tetromino kinds.
    pub const CORE: [Self; 7] = [
        Self::I,
        Self::O,
        Self::T,
        Self::S,
        Self::Z,
        Self::J,
        Self::L,
    ];

    /// The extended (non-tetromino) kinds.
    pub const EXTENDED: [Self; 8] = [
        Self::Dot,
        Self::Duo,
        Self::Trio,
        Self::SmallCorner,
        Self::LongLine,
        Self::LargeCorner,
        Self::Rect,
        Self::BigSquare,
    ];

    /// Returns the shape matrix of this kind.
    #[must_use]
    pub const fn shape(self) -> Shape {
        PIECE_SHAPES[self as usize]
    }

    /// Returns the number of filled cells of this kind (1-9).
    #[must_use]
    pub const fn cell_count(self) -> usize {
        self.shape().cells.len()
    }

    /// Returns the generation weight category of this kind.
    #[must_use]
    pub const fn category(self) -> PieceCategory {
        match self {
            Self::Dot => PieceCategory::Tiny,
            Self::Duo => PieceCategory::Small,
            Self::Trio | Self::SmallCorner => PieceCategory::Medium,
            Self::I | Self::O | Self::T | Self::S | Self::Z | Self::J | Self::L => {
                PieceCategory::Standard
            }
            Self::LongLine | Self::LargeCorner => PieceCategory::Large,
            Self::Rect => PieceCategory::Heavy,
            Self::BigSquare => PieceCategory::Huge,
        }
    }

    /// Returns whether this kind belongs to the core tetromino group.
    #[must_use]
    pub const fn is_core(self) -> bool {
        matches!(
            self,
            Self::I | Self::O | Self::T | Self::S | Self::Z | Self::J | Self::L
        )
    }
}

impl PieceCategory {
    /// Number of categories.
    pub const LEN: usize = 7;

    /// Every category, in ascending cell-count order.
    pub const ALL: [Self; Self::LEN] = [
        Self::Tiny,
        Self::Small,
        Self::Medium,
        Self::Standard,
        Self::Large,
        Self::Heavy,
        Self::Huge,
    ];

    /// Cell count shared by every kind in this category.
    #[must_use]
    pub const fn cell_count(self) -> usize {
        match self {
            Self::Tiny => 1,
            Self::Small => 2,
            Self::Medium => 3,
            Self::Standard => 4,
            Self::Large => 5,
            Self::Heavy => 6,
            Self::Huge => 9,
        }
    }

    /// Number of catalog kinds mapped to this category.
    #[must_use]
    pub const fn kind_count(self) -> usize {
        match self {
            Self::Tiny | Self::Small | Self::Heavy | Self::Huge => 1,
            Self::Medium | Self::Large => 2,
            Self::Standard => 7,
        }
    }
}

const PIECE_SHAPES: [Shape; PieceKind::LEN] = {
    const fn s(rows: usize, cols: usize, cells: &'static [(usize, usize)]) -> Shape {
        Shape { rows, cols, cells }
    }
    [
        // I
        s(1, 4, &[(0, 0), (0, 1), (0, 2), (0, 3)]),
        // O
        s(2, 2, &[(0, 0), (0, 1), (1, 0), (1, 1)]),
        // T
        s(2, 3, &[(0, 0), (0, 1), (0, 2), (1, 1)]),
        // S
        s(2, 3, &[(0, 1), (0, 2), (1, 0), (1, 1)]),
        // Z
        s(2, 3, &[(0, 0), (0, 1), (1, 1), (1, 2)]),
        // J
        s(2, 3, &[(0, 0), (1, 0), (1, 1), (1, 2)]),
        // L
        s(2, 3, &[(0, 2), (1, 0), (1, 1), (1, 2)]),
        // Dot
        s(1, 1, &[(0, 0)]),
        // Duo
        s(1, 2, &[(0, 0), (0, 1)]),
        // Trio
        s(1, 3, &[(0, 0), (0, 1), (0, 2)]),
        // SmallCorner
        s(2, 2, &[(0, 0), (0, 1), (1, 0)]),
        // LongLine
        s(1, 5, &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]),
        // LargeCorner
        s(3, 3, &[(0, 0), (1, 0), (2, 0), (2, 1), (2, 2)]),
        // Rect
        s(2, 3, &[(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]),
        // BigSquare
        s(
            3,
            3,
            &[
                (0, 0),
                (0, 1),
                (0, 2),
                (1, 0),
                (1, 1),
                (1, 2),
                (2, 0),
                (2, 1),
                (2, 2),
            ],
        ),
    ]
};
