/// Bonus points for clearing `lines` rows and columns in one placement.
///
/// - 0 lines: 0 points
/// - 1 line: 10 points
/// - 2 lines: 30 points
/// - 3 lines: 60 points
/// - 4 lines: 100 points
/// - 5 or more: 150 plus 50 per line beyond the fifth
#[must_use]
pub const fn line_bonus(lines: usize) -> u64 {
    match lines {
        0 => 0,
        1 => 10,
        2 => 30,
        3 => 60,
        4 => 100,
        n => 150 + (n as u64 - 5) * 50,
    }
}

/// Score multiplier for the given combo counter: `1.0 + combo * 0.5`.
#[must_use]
pub fn combo_multiplier(combo: u32) -> f64 {
    1.0 + f64::from(combo) * 0.5
}

/// Tracks the combo streak and converts line clears into points.
///
/// Consecutive scoring turns (each clearing at least one line) increment the
/// combo counter. A turn is awarded `line_bonus × multiplier` using the combo
/// accumulated *before* that turn; a turn that clears nothing awards 0 and
/// resets the counter, without touching points already awarded.
///
/// # Example
///
/// ```
/// use gridfall_engine::ScoreCalculator;
///
/// let mut score = ScoreCalculator::new();
/// assert_eq!(score.score_turn(1), 10); // combo 0, x1.0
/// assert_eq!(score.score_turn(1), 15); // combo 1, x1.5
/// assert_eq!(score.score_turn(0), 0); // streak broken
/// assert_eq!(score.score_turn(1), 10); // combo restarts at 0
/// ```
#[derive(Debug, Clone, Default)]
pub struct ScoreCalculator {
    combo: u32,
}

impl ScoreCalculator {
    /// Creates a calculator with no combo in progress.
    #[must_use]
    pub const fn new() -> Self {
        Self { combo: 0 }
    }

    /// Returns the current combo counter.
    #[must_use]
    pub const fn combo(&self) -> u32 {
        self.combo
    }

    /// Scores one turn that cleared `lines` lines and updates the combo.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[expect(clippy::cast_precision_loss)]
    pub fn score_turn(&mut self, lines: usize) -> u64 {
        if lines == 0 {
            self.combo = 0;
            return 0;
        }
        let points = (line_bonus(lines) as f64 * combo_multiplier(self.combo)).round() as u64;
        self.combo += 1;
        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_bonus_table() {
        let cases = [(0, 0), (1, 10), (2, 30), (3, 60), (4, 100), (5, 150), (6, 200), (8, 300)];
        for (lines, bonus) in cases {
            assert_eq!(line_bonus(lines), bonus, "{lines} lines");
        }
    }

    #[test]
    fn test_combo_multiplier() {
        assert!((combo_multiplier(0) - 1.0).abs() < f64::EPSILON);
        assert!((combo_multiplier(1) - 1.5).abs() < f64::EPSILON);
        assert!((combo_multiplier(2) - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_combo_streak_scoring() {
        let mut score = ScoreCalculator::new();
        assert_eq!(score.score_turn(1), 10);
        assert_eq!(score.score_turn(2), 45); // 30 * 1.5
        assert_eq!(score.score_turn(1), 20); // 10 * 2.0
        assert_eq!(score.combo(), 3);
    }

    #[test]
    fn test_zero_clear_resets_combo_on_next_turn() {
        let mut score = ScoreCalculator::new();
        score.score_turn(1);
        score.score_turn(1);
        assert_eq!(score.score_turn(0), 0);
        assert_eq!(score.combo(), 0);
        // Streak restarts from multiplier 1.0.
        assert_eq!(score.score_turn(4), 100);
    }
}
