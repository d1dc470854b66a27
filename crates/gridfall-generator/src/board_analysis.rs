use arrayvec::ArrayVec;
use gridfall_engine::{Board, MAX_SIDE, PieceKind};

/// Reference shapes used to estimate board mobility.
///
/// A fixed sample rather than the full catalog keeps the legal-move count
/// comparable across calls and cheap to compute. The sample spans the size
/// range: the smallest pieces keep counting moves on cramped boards, the
/// larger ones drop out early and pull the mobility signal down.
const REFERENCE_PIECES: [PieceKind; 5] = [
    PieceKind::Dot,
    PieceKind::Duo,
    PieceKind::Trio,
    PieceKind::O,
    PieceKind::I,
];

/// A row or column counts as near-complete with at most 2 empty cells left.
const NEAR_COMPLETE_SLACK: usize = 2;

const OCCUPANCY_WEIGHT: f64 = 0.55;
const MOBILITY_WEIGHT: f64 = 0.35;
const FRAGMENTATION_WEIGHT: f64 = 0.10;

/// Danger and mobility statistics of one board snapshot.
///
/// Computed fresh per generation call and never persisted; only the board and
/// the generator state survive between calls.
#[derive(Debug, Clone, PartialEq)]
pub struct BoardAnalysis {
    empty_cells: usize,
    legal_moves: usize,
    near_complete_rows: ArrayVec<usize, MAX_SIDE>,
    near_complete_cols: ArrayVec<usize, MAX_SIDE>,
    danger_level: f64,
}

impl BoardAnalysis {
    /// Analyzes a board snapshot.
    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn from_board(board: &Board) -> Self {
        let side = board.side();
        let empty_cells = board.empty_cells();
        let legal_moves: usize = REFERENCE_PIECES
            .iter()
            .map(|&kind| board.placement_count(kind))
            .sum();

        let near_complete_rows: ArrayVec<usize, MAX_SIDE> = (0..side)
            .filter(|&row| board.row_occupied(row) + NEAR_COMPLETE_SLACK >= side)
            .collect();
        let near_complete_cols: ArrayVec<usize, MAX_SIDE> = (0..side)
            .filter(|&col| board.col_occupied(col) + NEAR_COMPLETE_SLACK >= side)
            .collect();

        let total_cells = side * side;
        let occupancy = (total_cells - empty_cells) as f64 / total_cells as f64;
        let mobility = legal_moves as f64 / empty_board_legal_moves(side) as f64;
        let fragmentation =
            (near_complete_rows.len() + near_complete_cols.len()) as f64 / (2 * side) as f64;

        let danger_level = (OCCUPANCY_WEIGHT * occupancy
            + MOBILITY_WEIGHT * (1.0 - mobility)
            + FRAGMENTATION_WEIGHT * fragmentation)
            .clamp(0.0, 1.0);

        Self {
            empty_cells,
            legal_moves,
            near_complete_rows,
            near_complete_cols,
            danger_level,
        }
    }

    /// Number of unoccupied cells.
    #[must_use]
    pub fn empty_cells(&self) -> usize {
        self.empty_cells
    }

    /// Legal placements of the reference sample summed over all positions.
    #[must_use]
    pub fn legal_moves(&self) -> usize {
        self.legal_moves
    }

    /// Indices of rows with at most 2 empty cells.
    #[must_use]
    pub fn near_complete_rows(&self) -> &[usize] {
        &self.near_complete_rows
    }

    /// Indices of columns with at most 2 empty cells.
    #[must_use]
    pub fn near_complete_cols(&self) -> &[usize] {
        &self.near_complete_cols
    }

    /// How close the board is to an unplayable state, in `[0, 1]`.
    ///
    /// Blends occupancy, inverse mobility (legal moves normalized against an
    /// empty board of the same side) and a fragmentation signal from the
    /// near-complete line count. Monotonically non-decreasing as occupancy
    /// grows with all else held equal.
    #[must_use]
    pub fn danger_level(&self) -> f64 {
        self.danger_level
    }
}

/// Legal moves of the reference sample on an empty board, in closed form.
fn empty_board_legal_moves(side: usize) -> usize {
    REFERENCE_PIECES
        .iter()
        .map(|&kind| {
            let shape = kind.shape();
            (side + 1).saturating_sub(shape.rows) * (side + 1).saturating_sub(shape.cols)
        })
        .sum()
}
