use std::collections::VecDeque;

use gridfall_engine::PieceKind;
use rand::{Rng, SeedableRng as _, seq::SliceRandom};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::{GeneratorSeed, StateError};

/// Probability of each extended kind joining a bag.
const EXTENDED_INCLUSION: f64 = 0.5;

/// Serialized snapshot of a bag generator; see
/// [`BagPieceGenerator::serialize_state`].
#[derive(Debug, Deserialize, Serialize)]
struct BagState {
    rng: Pcg32,
    bag: Vec<PieceKind>,
}

/// Fixed-bag piece randomizer, the non-adaptive alternative to
/// [`WeightedPieceSelector`](crate::WeightedPieceSelector).
///
/// Each bag holds the 7 core tetromino kinds plus each extended kind with a
/// fixed inclusion probability, shuffled together. Drawing depletes the bag;
/// refills continue the same RNG stream rather than reseeding, so every core
/// kind appears at least once per bag and near-equally often across many
/// bags.
///
/// # Example
///
/// ```
/// use gridfall_generator::{BagPieceGenerator, GeneratorSeed};
///
/// let mut bag = BagPieceGenerator::with_seed(GeneratorSeed::from_bytes([7; 16]));
/// let preview = bag.peek_next_pieces(3);
/// assert_eq!(bag.next_pieces(3), preview);
/// ```
#[derive(Debug, Clone)]
pub struct BagPieceGenerator {
    rng: Pcg32,
    bag: VecDeque<PieceKind>,
}

impl BagPieceGenerator {
    /// Creates a bag generator with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but with a specific seed for deterministic draws.
    #[must_use]
    pub fn with_seed(seed: GeneratorSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.into_bytes()),
            bag: VecDeque::with_capacity(PieceKind::LEN * 2),
        }
    }

    /// Draws the next `n` pieces, refilling bags as needed.
    ///
    /// `n == 0` returns an empty sequence.
    pub fn next_pieces(&mut self, n: usize) -> Vec<PieceKind> {
        self.ensure_buffered(n);
        (0..n)
            .map(|_| self.bag.pop_front().expect("bag was just refilled"))
            .collect()
    }

    /// Returns the next `n` pieces without consuming them.
    ///
    /// Peeking may buffer future bags ahead of time but never changes what a
    /// subsequent [`Self::next_pieces`] call returns.
    pub fn peek_next_pieces(&mut self, n: usize) -> Vec<PieceKind> {
        self.ensure_buffered(n);
        self.bag.iter().take(n).copied().collect()
    }

    /// Serializes the RNG cursor and the unconsumed bag contents.
    #[must_use]
    pub fn serialize_state(&self) -> String {
        let state = BagState {
            rng: self.rng.clone(),
            bag: self.bag.iter().copied().collect(),
        };
        serde_json::to_string(&state).expect("bag state serialization cannot fail")
    }

    /// Restores a generator from [`Self::serialize_state`] output.
    ///
    /// An empty or malformed state string fails with an explicit
    /// [`StateError`]; there is no silent default.
    pub fn from_state(state: &str) -> Result<Self, StateError> {
        if state.trim().is_empty() {
            return Err(StateError::Empty);
        }
        let state: BagState = serde_json::from_str(state).map_err(StateError::Malformed)?;
        Ok(Self {
            rng: state.rng,
            bag: state.bag.into_iter().collect(),
        })
    }

    fn ensure_buffered(&mut self, n: usize) {
        while self.bag.len() < n {
            self.fill_bag();
        }
    }

    /// Appends one freshly shuffled bag, continuing the RNG stream.
    fn fill_bag(&mut self) {
        let mut bag: Vec<PieceKind> = PieceKind::CORE.to_vec();
        for kind in PieceKind::EXTENDED {
            if self.rng.random_bool(EXTENDED_INCLUSION) {
                bag.push(kind);
            }
        }
        bag.shuffle(&mut self.rng);
        self.bag.extend(bag);
    }
}

impl Default for BagPieceGenerator {
    fn default() -> Self {
        Self::new()
    }
}
