use crate::{
    PlacementError,
    core::{
        board::{Board, PlacementOutcome},
        piece::PieceKind,
    },
};

use super::score::ScoreCalculator;

/// Outcome of one completed turn, ready to be handed to the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOutcome {
    /// Lines cleared by the placement (rows plus columns).
    pub cleared_lines: usize,
    /// Coordinates emptied by the clear.
    pub cleared_cells: Vec<(usize, usize)>,
    /// Points earned this turn, combo multiplier included.
    pub points: u64,
}

/// Per-session game state: one board, one score stream.
///
/// The session applies placements, converts clears into points and keeps the
/// running totals the surrounding application persists between calls. It is
/// deliberately synchronous; callers serialize access per session.
#[derive(Debug, Clone)]
pub struct GameSession {
    board: Board,
    score: ScoreCalculator,
    total_score: u64,
    total_cleared_lines: u32,
    completed_moves: usize,
}

impl GameSession {
    /// Creates a session over an empty board with the given side length.
    ///
    /// # Panics
    ///
    /// Panics if `side` is outside the supported board range.
    #[must_use]
    pub fn new(side: usize) -> Self {
        Self::with_board(Board::new(side))
    }

    /// Resumes a session from a previously persisted board snapshot.
    ///
    /// The combo streak intentionally restarts on resume; totals are supplied
    /// by the caller via [`Self::restore_totals`].
    #[must_use]
    pub fn with_board(board: Board) -> Self {
        Self {
            board,
            score: ScoreCalculator::new(),
            total_score: 0,
            total_cleared_lines: 0,
            completed_moves: 0,
        }
    }

    /// Restores persisted running totals after [`Self::with_board`].
    pub fn restore_totals(&mut self, total_score: u64, total_cleared_lines: u32, moves: usize) {
        self.total_score = total_score;
        self.total_cleared_lines = total_cleared_lines;
        self.completed_moves = moves;
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    #[must_use]
    pub const fn total_score(&self) -> u64 {
        self.total_score
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> u32 {
        self.total_cleared_lines
    }

    #[must_use]
    pub const fn completed_moves(&self) -> usize {
        self.completed_moves
    }

    #[must_use]
    pub const fn combo(&self) -> u32 {
        self.score.combo()
    }

    /// Returns whether any catalog piece still fits somewhere on the board.
    ///
    /// When this is false for the session's pending pieces the game is over;
    /// the surrounding application owns that decision.
    #[must_use]
    pub fn any_fits(&self, pieces: &[PieceKind]) -> bool {
        pieces.iter().any(|&kind| self.board.has_placement(kind))
    }

    /// Places a piece and settles the turn: clears lines, awards points and
    /// updates the running totals.
    ///
    /// A rejected placement does not count as a turn and does not break the
    /// combo streak.
    pub fn place(
        &mut self,
        kind: PieceKind,
        row: usize,
        col: usize,
    ) -> Result<TurnOutcome, PlacementError> {
        let PlacementOutcome {
            cleared_lines,
            cleared_cells,
        } = self.board.try_place(kind, row, col)?;
        let points = self.score.score_turn(cleared_lines);
        self.total_score += points;
        self.total_cleared_lines += u32::try_from(cleared_lines).unwrap_or(u32::MAX);
        self.completed_moves += 1;
        Ok(TurnOutcome {
            cleared_lines,
            cleared_cells,
            points,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_accumulates_totals() {
        let mut session = GameSession::new(8);
        // Fill row 0 with two I-pieces: second placement clears the row.
        let first = session.place(PieceKind::I, 0, 0).unwrap();
        assert_eq!(first.points, 0);
        let second = session.place(PieceKind::I, 0, 4).unwrap();
        assert_eq!(second.cleared_lines, 1);
        assert_eq!(second.points, 10);
        assert_eq!(session.total_score(), 10);
        assert_eq!(session.total_cleared_lines(), 1);
        assert_eq!(session.completed_moves(), 2);
    }

    #[test]
    fn test_failed_placement_is_not_a_turn() {
        let mut session = GameSession::new(8);
        session.place(PieceKind::O, 0, 0).unwrap();
        let moves = session.completed_moves();
        assert!(session.place(PieceKind::O, 0, 0).is_err());
        assert_eq!(session.completed_moves(), moves);
    }

    #[test]
    fn test_combo_carries_across_turns() {
        let mut session = GameSession::new(8);
        session.place(PieceKind::I, 0, 0).unwrap();
        session.place(PieceKind::I, 1, 0).unwrap();
        session.place(PieceKind::I, 0, 4).unwrap(); // clears row 0, combo -> 1
        let outcome = session.place(PieceKind::I, 1, 4).unwrap(); // clears row 1
        assert_eq!(outcome.points, 15); // 10 * 1.5
    }

    #[test]
    fn test_resume_restores_totals() {
        let mut session = GameSession::with_board(Board::new(10));
        session.restore_totals(420, 12, 30);
        assert_eq!(session.total_score(), 420);
        assert_eq!(session.total_cleared_lines(), 12);
        assert_eq!(session.completed_moves(), 30);
    }
}
