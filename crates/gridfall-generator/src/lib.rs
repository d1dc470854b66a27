//! Adaptive and bag-based piece generation for the gridfall puzzle core.
//!
//! Two generators share the same determinism contract: constructed from the
//! same [`GeneratorSeed`] and called identically, they emit identical piece
//! sequences, and a [serialized state](WeightedPieceSelector::serialize_state)
//! restored via `from_state` continues the stream bit-identically.
//!
//! - [`WeightedPieceSelector`] - danger-adaptive weighted draws with a rescue
//!   guarantee and a solvability check against the live board
//! - [`BagPieceGenerator`] - fixed-bag shuffle of the core tetrominoes plus
//!   probabilistically included extended pieces

pub use self::{bag::*, board_analysis::*, seed::*, solvability::*, weighted::*};

mod bag;
mod board_analysis;
mod seed;
mod solvability;
mod weighted;

/// Failure to restore a generator from a serialized state string.
///
/// This is a defect, never a recoverable condition: the caller must not fall
/// back to a fresh seed, since that would silently fork the piece stream the
/// session was validated against.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum StateError {
    /// The serialized state string was empty.
    #[display("serialized generator state is empty")]
    Empty,
    /// The serialized state string did not parse.
    #[display("malformed generator state: {_0}")]
    Malformed(serde_json::Error),
}

/// The weighted selector exceeded its internal redraw budget.
///
/// Under correct weight and rescue logic this should not occur; it is
/// surfaced loudly instead of returning a set the board cannot accept.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("piece generation retry budget exhausted after {attempts} attempts")]
pub struct GenerationExhausted {
    /// Number of candidate sets drawn and discarded.
    pub attempts: usize,
}
