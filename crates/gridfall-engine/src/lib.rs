pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Reasons a piece placement can be rejected.
///
/// A rejected placement leaves the board completely unchanged; the caller
/// decides whether to retry with another position or end the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum PlacementError {
    /// Part of the piece's shape would land outside the grid.
    #[display("piece extends outside the board")]
    OutOfBounds,
    /// Part of the piece's shape would land on an occupied cell.
    #[display("piece overlaps an occupied cell")]
    Overlap,
}
