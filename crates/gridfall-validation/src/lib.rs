//! Anti-cheat validation of completed game sessions.
//!
//! The validator operates purely over an already-recorded
//! [`SessionRecord`] and externally supplied [`SubmissionFacts`]; it never
//! touches storage or authentication. Rejections are ordinary negative
//! [`Verdict`]s with a human-readable [`RejectionReason`], not errors.

pub use self::{session::*, validator::*};

mod session;
mod validator;
