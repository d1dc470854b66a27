use std::collections::VecDeque;

use gridfall_engine::{Board, PieceCategory, PieceKind};
use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution as _, weighted::WeightedIndex},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{BoardAnalysis, GenerationExhausted, GeneratorSeed, StateError, solvability};

/// Candidate sets drawn and discarded before generation gives up.
const MAX_ATTEMPTS: usize = 24;
/// Above this danger level every set must contain a rescue piece.
const RESCUE_DANGER_THRESHOLD: f64 = 0.7;
/// A rescue piece has at most this many cells (Tiny or Small).
const RESCUE_MAX_CELLS: usize = 2;
/// Weight multiplier for kinds in the recent-history window.
const REPEAT_PENALTY: f64 = 0.4;
/// Length of the rolling recently-emitted window.
const RECENT_HISTORY: usize = 3;
/// Safe-side weight growth of big categories per cumulative cleared line.
const PROGRESSION_RATE: f64 = 0.005;
/// Upper bound on the progression growth factor (+100%).
const PROGRESSION_CAP: f64 = 1.0;
/// Categories with at least this many cells take part in progression.
const PROGRESSION_MIN_CELLS: usize = 5;

/// Per-category generation weight tables.
///
/// `safe` favors large, complex pieces and applies on a calm board; `danger`
/// favors tiny pieces and applies on a crowded one. The effective weight is
/// the linear interpolation of the two by the current danger level. Tables
/// are immutable and owned by the selector instance, never process-wide.
#[derive(Debug, Clone, PartialEq)]
pub struct PieceWeights {
    safe: [f64; PieceCategory::LEN],
    danger: [f64; PieceCategory::LEN],
}

impl PieceWeights {
    /// Shipped tables, indexed in [`PieceCategory::ALL`] order
    /// (Tiny, Small, Medium, Standard, Large, Heavy, Huge).
    pub const DEFAULT: Self = Self {
        safe: [2.0, 5.0, 12.0, 30.0, 22.0, 18.0, 11.0],
        danger: [30.0, 28.0, 20.0, 14.0, 5.0, 2.0, 1.0],
    };

    /// Builds custom tables, indexed in [`PieceCategory::ALL`] order.
    ///
    /// # Panics
    ///
    /// Panics if any weight is not strictly positive.
    #[must_use]
    pub fn new(safe: [f64; PieceCategory::LEN], danger: [f64; PieceCategory::LEN]) -> Self {
        for weight in safe.iter().chain(&danger) {
            assert!(*weight > 0.0, "piece weights must be strictly positive");
        }
        Self { safe, danger }
    }

    /// Linear interpolation between the safe and danger table entries.
    ///
    /// `danger_level` is clamped to `[0, 1]` first; at the endpoints the
    /// result equals the corresponding table entry exactly.
    #[must_use]
    pub fn weight(&self, category: PieceCategory, danger_level: f64) -> f64 {
        let index = category as usize;
        let t = danger_level.clamp(0.0, 1.0);
        self.safe[index] + (self.danger[index] - self.safe[index]) * t
    }

    /// Like [`Self::weight`], with the safe side of big categories boosted by
    /// cumulative cleared lines. The danger-side endpoint is unaffected, so a
    /// crowded board still favors small pieces late in a run.
    fn effective_weight(
        &self,
        category: PieceCategory,
        danger_level: f64,
        total_cleared_lines: u32,
    ) -> f64 {
        let index = category as usize;
        let t = danger_level.clamp(0.0, 1.0);
        let safe = self.safe[index] * progression_factor(category, total_cleared_lines);
        safe + (self.danger[index] - safe) * t
    }
}

impl Default for PieceWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn progression_factor(category: PieceCategory, total_cleared_lines: u32) -> f64 {
    if category.cell_count() < PROGRESSION_MIN_CELLS {
        return 1.0;
    }
    1.0 + (f64::from(total_cleared_lines) * PROGRESSION_RATE).min(PROGRESSION_CAP)
}

/// Serialized snapshot of a selector; see
/// [`WeightedPieceSelector::serialize_state`].
#[derive(Debug, Deserialize, Serialize)]
struct SelectorState {
    rng: Pcg32,
    recent: Vec<PieceKind>,
}

/// Adaptive piece generator.
///
/// Draws a weighted set of pieces per call, adapting the weights to the
/// board's danger level and the session's cumulative cleared lines. Every
/// returned set is checked to contain at least one piece that fits the board;
/// above the rescue threshold it is forced to contain a 1- or 2-cell piece.
///
/// All randomness flows through a session-scoped, explicitly seeded
/// [`Pcg32`]: two selectors with the same seed and the same call sequence
/// emit identical sets.
#[derive(Debug, Clone)]
pub struct WeightedPieceSelector {
    rng: Pcg32,
    weights: PieceWeights,
    recent: VecDeque<PieceKind>,
}

impl WeightedPieceSelector {
    /// Creates a selector with a random seed and the shipped weight tables.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic draws.
    #[must_use]
    pub fn with_seed(seed: GeneratorSeed) -> Self {
        Self::with_weights(seed, PieceWeights::DEFAULT)
    }

    /// Like [`Self::with_seed`], with custom weight tables.
    #[must_use]
    pub fn with_weights(seed: GeneratorSeed, weights: PieceWeights) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.into_bytes()),
            weights,
            recent: VecDeque::with_capacity(RECENT_HISTORY),
        }
    }

    /// Generates `count` pieces adapted to the board state.
    ///
    /// The set is produced atomically: either all `count` pieces are returned
    /// or generation fails. Candidate sets in which no piece fits the board
    /// are redrawn up to an internal retry budget; exceeding it is a loud
    /// [`GenerationExhausted`] defect.
    ///
    /// A board on which *no catalog kind at all* has a legal placement is not
    /// a generator fault: the drawn set is returned as-is and the game-over
    /// decision stays upstream.
    pub fn generate_pieces(
        &mut self,
        board: &Board,
        total_cleared_lines: u32,
        count: usize,
    ) -> Result<Vec<PieceKind>, GenerationExhausted> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let analysis = BoardAnalysis::from_board(board);
        let danger = analysis.danger_level();
        let board_is_dead = !PieceKind::ALL.iter().any(|&kind| board.has_placement(kind));

        for _ in 0..MAX_ATTEMPTS {
            let mut recent = self.recent.clone();
            let mut set = Vec::with_capacity(count);
            for _ in 0..count {
                let kind = self.draw_one(danger, total_cleared_lines, &recent, None);
                push_recent(&mut recent, kind);
                set.push(kind);
            }

            if danger > RESCUE_DANGER_THRESHOLD
                && !set.iter().any(|kind| kind.cell_count() <= RESCUE_MAX_CELLS)
            {
                let slot = self.rng.random_range(0..count);
                set[slot] =
                    self.draw_one(danger, total_cleared_lines, &recent, Some(RESCUE_MAX_CELLS));
            }

            if board_is_dead || solvability::at_least_one_fits(board, &set) {
                self.recent = recent;
                return Ok(set);
            }
        }
        Err(GenerationExhausted {
            attempts: MAX_ATTEMPTS,
        })
    }

    /// Serializes the RNG cursor and the recent-history window.
    ///
    /// Draws made after a [`Self::from_state`] restore are bit-identical to
    /// the draws an uninterrupted instance would have made next.
    #[must_use]
    pub fn serialize_state(&self) -> String {
        let state = SelectorState {
            rng: self.rng.clone(),
            recent: self.recent.iter().copied().collect(),
        };
        serde_json::to_string(&state).expect("selector state serialization cannot fail")
    }

    /// Restores a selector from [`Self::serialize_state`] output, with the
    /// shipped weight tables.
    pub fn from_state(state: &str) -> Result<Self, StateError> {
        Self::from_state_with_weights(state, PieceWeights::DEFAULT)
    }

    /// Like [`Self::from_state`], with custom weight tables.
    pub fn from_state_with_weights(
        state: &str,
        weights: PieceWeights,
    ) -> Result<Self, StateError> {
        if state.trim().is_empty() {
            return Err(StateError::Empty);
        }
        let state: SelectorState = serde_json::from_str(state).map_err(StateError::Malformed)?;
        Ok(Self {
            rng: state.rng,
            weights,
            recent: state.recent.into_iter().collect(),
        })
    }

    /// One weighted draw over the catalog, optionally restricted to kinds
    /// with at most `max_cells` cells (the rescue draw).
    #[expect(clippy::cast_precision_loss)]
    fn draw_one(
        &mut self,
        danger: f64,
        total_cleared_lines: u32,
        recent: &VecDeque<PieceKind>,
        max_cells: Option<usize>,
    ) -> PieceKind {
        let candidates: Vec<PieceKind> = PieceKind::ALL
            .iter()
            .copied()
            .filter(|kind| max_cells.is_none_or(|max| kind.cell_count() <= max))
            .collect();
        let weights: Vec<f64> = candidates
            .iter()
            .map(|&kind| {
                let category = kind.category();
                // Category weight split evenly across the category's kinds.
                let mut weight = self
                    .weights
                    .effective_weight(category, danger, total_cleared_lines)
                    / category.kind_count() as f64;
                if recent.contains(&kind) {
                    weight *= REPEAT_PENALTY;
                }
                weight
            })
            .collect();
        let index = WeightedIndex::new(&weights).expect("piece weights are always positive");
        candidates[index.sample(&mut self.rng)]
    }
}

impl Default for WeightedPieceSelector {
    fn default() -> Self {
        Self::new()
    }
}

fn push_recent(recent: &mut VecDeque<PieceKind>, kind: PieceKind) {
    if recent.len() == RECENT_HISTORY {
        recent.pop_front();
    }
    recent.push_back(kind);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seed(byte: u8) -> GeneratorSeed {
        GeneratorSeed::from_bytes([byte; 16])
    }

    fn crowded_board() -> Board {
        Board::from_ascii(
            "
            ########
            ########
            ########
            ########
            ........
            ########
            ########
            ########
            ",
        )
    }

    #[test]
    fn test_weight_endpoints_are_exact() {
        let weights = PieceWeights::DEFAULT;
        for category in PieceCategory::ALL {
            let index = category as usize;
            assert_eq!(weights.weight(category, 0.0), weights.safe[index]);
            assert_eq!(weights.weight(category, 1.0), weights.danger[index]);
        }
    }

    #[test]
    fn test_weight_is_linear_interpolation() {
        let weights = PieceWeights::DEFAULT;
        for category in PieceCategory::ALL {
            let index = category as usize;
            for step in 0..=10 {
                let t = f64::from(step) / 10.0;
                let expected = weights.safe[index] + (weights.danger[index] - weights.safe[index]) * t;
                assert!((weights.weight(category, t) - expected).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn test_weight_clamps_out_of_range_danger() {
        let weights = PieceWeights::DEFAULT;
        for category in PieceCategory::ALL {
            assert_eq!(
                weights.weight(category, -3.5),
                weights.weight(category, 0.0),
            );
            assert_eq!(weights.weight(category, 7.0), weights.weight(category, 1.0));
        }
    }

    #[test]
    #[should_panic(expected = "strictly positive")]
    fn test_weights_reject_zero_entries() {
        let mut safe = PieceWeights::DEFAULT.safe;
        safe[0] = 0.0;
        let _ = PieceWeights::new(safe, PieceWeights::DEFAULT.danger);
    }

    #[test]
    fn test_progression_boosts_big_categories_only() {
        let weights = PieceWeights::DEFAULT;
        for category in PieceCategory::ALL {
            let base = weights.effective_weight(category, 0.0, 0);
            let late = weights.effective_weight(category, 0.0, 200);
            if category.cell_count() >= PROGRESSION_MIN_CELLS {
                assert!(late > base, "{category:?} must grow with cleared lines");
            } else {
                assert!((late - base).abs() < 1e-12, "{category:?} must not grow");
            }
            // The danger endpoint is never affected by progression.
            assert_eq!(
                weights.effective_weight(category, 1.0, 200),
                weights.weight(category, 1.0),
            );
        }
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let board = Board::new(8);
        let mut a = WeightedPieceSelector::with_seed(seed(0x42));
        let mut b = WeightedPieceSelector::with_seed(seed(0x42));
        for lines in 0..20 {
            assert_eq!(
                a.generate_pieces(&board, lines, 3).unwrap(),
                b.generate_pieces(&board, lines, 3).unwrap(),
            );
        }
    }

    #[test]
    fn test_state_roundtrip_reproduces_future_draws() {
        let board = Board::new(10);
        let mut original = WeightedPieceSelector::with_seed(seed(0x07));
        original.generate_pieces(&board, 5, 3).unwrap();

        let state = original.serialize_state();
        let mut restored = WeightedPieceSelector::from_state(&state).unwrap();

        for _ in 0..10 {
            assert_eq!(
                original.generate_pieces(&board, 5, 3).unwrap(),
                restored.generate_pieces(&board, 5, 3).unwrap(),
            );
        }
    }

    #[test]
    fn test_from_state_rejects_empty_and_malformed() {
        assert!(matches!(
            WeightedPieceSelector::from_state(""),
            Err(StateError::Empty),
        ));
        assert!(matches!(
            WeightedPieceSelector::from_state("   "),
            Err(StateError::Empty),
        ));
        assert!(matches!(
            WeightedPieceSelector::from_state("{not json"),
            Err(StateError::Malformed(_)),
        ));
    }

    #[test]
    fn test_generated_set_always_fits_somewhere() {
        let boards = [Board::new(8), crowded_board()];
        for board in &boards {
            let mut selector = WeightedPieceSelector::with_seed(seed(0x11));
            for lines in 0..30 {
                let set = selector.generate_pieces(board, lines, 3).unwrap();
                assert_eq!(set.len(), 3);
                assert!(
                    solvability::at_least_one_fits(board, &set),
                    "set {set:?} does not fit",
                );
            }
        }
    }

    #[test]
    fn test_rescue_piece_present_when_danger_high() {
        let board = crowded_board();
        let danger = BoardAnalysis::from_board(&board).danger_level();
        assert!(danger > RESCUE_DANGER_THRESHOLD, "fixture not dangerous enough");

        for seed_byte in 0..20 {
            let mut selector = WeightedPieceSelector::with_seed(seed(seed_byte));
            let set = selector.generate_pieces(&board, 0, 3).unwrap();
            assert!(
                set.iter().any(|kind| kind.cell_count() <= RESCUE_MAX_CELLS),
                "no rescue piece in {set:?}",
            );
        }
    }

    #[test]
    fn test_dead_board_still_returns_a_set() {
        // No kind fits a full board; game over is the caller's call, not a
        // generator error.
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
        let mut selector = WeightedPieceSelector::with_seed(seed(0x99));
        let set = selector.generate_pieces(&board, 0, 3).unwrap();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_zero_count_returns_empty_set() {
        let mut selector = WeightedPieceSelector::with_seed(seed(0x01));
        assert!(selector.generate_pieces(&Board::new(8), 0, 0).unwrap().is_empty());
    }

    #[test]
    fn test_repetition_is_dampened() {
        // With the penalty in place, a long draw sequence on a calm board
        // should not be a single repeated kind.
        let board = Board::new(10);
        let mut selector = WeightedPieceSelector::with_seed(seed(0x23));
        let mut kinds = Vec::new();
        for _ in 0..10 {
            kinds.extend(selector.generate_pieces(&board, 0, 3).unwrap());
        }
        let first = kinds[0];
        assert!(kinds.iter().any(|&kind| kind != first));
    }
}
