//! Gameplay orchestration built on the core board primitives.
//!
//! - [`ScoreCalculator`] - line-clear bonus table and combo multiplier
//! - [`GameSession`] - per-session board + score state, one placement at a time
//!
//! A session is single-threaded by design: the calling layer must guarantee at
//! most one in-flight placement per session. Different sessions share no state
//! and may run in parallel.

pub use self::{score::*, session::*};

mod score;
mod session;
