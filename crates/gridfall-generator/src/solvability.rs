use gridfall_engine::{Board, PieceKind};

/// Placement feasibility of a piece multiset against one board snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolvabilityReport {
    /// Some ordering places every piece, line clears applied in between.
    pub is_solvable: bool,
    /// At least one piece has a legal placement on the current board.
    pub at_least_one_fits: bool,
    /// Every piece has a legal placement on the current board, checked
    /// independently of ordering and without mutation.
    pub all_fit: bool,
    /// The pieces with at least one current legal placement, input order
    /// preserved, duplicates kept.
    pub fitting_pieces: Vec<PieceKind>,
}

/// Checks whether at least one piece of the multiset fits the current board.
///
/// Duplicates are independent; every copy is checked against the same
/// unmutated board.
#[must_use]
pub fn at_least_one_fits(board: &Board, pieces: &[PieceKind]) -> bool {
    pieces.iter().any(|&kind| board.has_placement(kind))
}

/// Checks whether every piece of the multiset fits the current board.
#[must_use]
pub fn all_fit(board: &Board, pieces: &[PieceKind]) -> bool {
    pieces.iter().all(|&kind| board.has_placement(kind))
}

/// Filters the multiset to the pieces with a current legal placement.
#[must_use]
pub fn fitting_pieces(board: &Board, pieces: &[PieceKind]) -> Vec<PieceKind> {
    pieces
        .iter()
        .copied()
        .filter(|&kind| board.has_placement(kind))
        .collect()
}

/// Full feasibility check of a piece multiset.
///
/// `is_solvable` searches for *some* assignment of pieces to positions such
/// that all of them can be placed sequentially, applying each placement's
/// line-clear effect before evaluating the next piece. An empty multiset is
/// trivially solvable.
#[must_use]
pub fn check_solvability(board: &Board, pieces: &[PieceKind]) -> SolvabilityReport {
    SolvabilityReport {
        is_solvable: solve(board, pieces),
        at_least_one_fits: at_least_one_fits(board, pieces),
        all_fit: all_fit(board, pieces),
        fitting_pieces: fitting_pieces(board, pieces),
    }
}

/// Depth-first search over piece orderings and anchor positions.
///
/// Identical kinds are interchangeable, so at each depth every distinct kind
/// is tried once.
fn solve(board: &Board, remaining: &[PieceKind]) -> bool {
    if remaining.is_empty() {
        return true;
    }
    let mut tried: Vec<PieceKind> = Vec::with_capacity(remaining.len());
    for (index, &kind) in remaining.iter().enumerate() {
        if tried.contains(&kind) {
            continue;
        }
        tried.push(kind);
        let shape = kind.shape();
        let side = board.side();
        for row in 0..=(side.saturating_sub(shape.rows)) {
            for col in 0..=(side.saturating_sub(shape.cols)) {
                if !board.can_place(kind, row, col) {
                    continue;
                }
                let mut next_board = board.clone();
                next_board
                    .try_place(kind, row, col)
                    .expect("checked placement cannot fail");
                let mut rest = remaining.to_vec();
                rest.swap_remove(index);
                if solve(&next_board, &rest) {
                    return true;
                }
            }
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_multiset_is_trivially_solvable() {
        let report = check_solvability(&Board::new(8), &[]);
        assert!(report.is_solvable);
        assert!(!report.at_least_one_fits);
        assert!(report.all_fit);
        assert!(report.fitting_pieces.is_empty());
    }

    #[test]
    fn test_everything_fits_an_empty_board() {
        let board = Board::new(8);
        let pieces = PieceKind::ALL.to_vec();
        let report = check_solvability(&board, &pieces);
        assert!(report.is_solvable);
        assert!(report.at_least_one_fits);
        assert!(report.all_fit);
        assert_eq!(report.fitting_pieces, pieces);
    }

    #[test]
    fn test_duplicates_checked_against_unmutated_board() {
        // One free 4x4 area: both BigSquare copies individually fit the
        // current board, but placing either leaves no room for the other.
        // Column 7 and the checkerboard half keep an unreachable empty cell
        // in every row and column, so no placement ever completes a line.
        let board = Board::from_ascii(
            "
            ....###.
            ....###.
            ....###.
            ....###.
            #.#.#.#.
            .#.#.#.#
            #.#.#.#.
            .#.#.#.#
            ",
        );
        let pieces = [PieceKind::BigSquare, PieceKind::BigSquare];
        let report = check_solvability(&board, &pieces);
        assert!(report.at_least_one_fits);
        assert!(report.all_fit);
        assert_eq!(report.fitting_pieces.len(), 2);
        assert!(!report.is_solvable);
    }

    #[test]
    fn test_solvable_only_through_line_clear() {
        // Row 0 needs one dot to clear; the I-piece fits nowhere until that
        // clear frees row 0 again.
        let board = Board::from_ascii(
            "
            #######.
            .#####..
            #.####..
            ##.###..
            ###.##..
            ####.#..
            #####...
            ######..
            ",
        );
        assert!(!board.has_placement(PieceKind::I));
        let pieces = [PieceKind::Dot, PieceKind::I];
        let report = check_solvability(&board, &pieces);
        assert!(report.is_solvable, "clear of row 0 must unlock the I-piece");
        assert!(report.at_least_one_fits);
        assert!(!report.all_fit);
        assert_eq!(report.fitting_pieces, [PieceKind::Dot]);
    }

    #[test]
    fn test_unsolvable_when_nothing_fits() {
        let board = Board::from_ascii(
            "
            ########
            ########
            ########
            ########
            ########
            ########
            ########
            ########
            ",
        );
        let pieces = [PieceKind::Dot];
        let report = check_solvability(&board, &pieces);
        assert!(!report.is_solvable);
        assert!(!report.at_least_one_fits);
        assert!(!report.all_fit);
        assert!(report.fitting_pieces.is_empty());
    }

    #[test]
    fn test_order_preserving_filter() {
        let board = Board::from_ascii(
            "
            ########
            ########
            ########
            ########
            ########
            ########
            ##.#####
            #.......
            ",
        );
        // LongLine (1x5) fits in row 7; O (2x2) does not fit anywhere.
        let pieces = [PieceKind::LongLine, PieceKind::O, PieceKind::Dot];
        assert_eq!(
            fitting_pieces(&board, &pieces),
            [PieceKind::LongLine, PieceKind::Dot],
        );
    }
}
