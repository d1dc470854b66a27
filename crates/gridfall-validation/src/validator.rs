use chrono::{DateTime, TimeDelta, Utc};
use gridfall_engine::{combo_multiplier, line_bonus};

use crate::session::SessionRecord;

/// Thresholds applied by [`ScoreValidator`].
///
/// All limits are deliberately generous: honest play never comes near them,
/// while tampered submissions trip at least one.
#[derive(Debug, Clone)]
pub struct ValidationConfig {
    /// Minimum wall-clock duration of a scoring session.
    pub min_duration: TimeDelta,
    /// Maximum age of a session (now minus end time) at submission.
    pub max_submission_age: TimeDelta,
    /// Hard ceiling on claimed points per recorded move.
    pub max_score_per_move: u64,
    /// Hard ceiling on claimed points per elapsed second.
    pub max_score_per_second: u64,
    /// Most lines a single placement can clear.
    pub max_lines_per_move: usize,
    /// Per-user leaderboard entry ceiling.
    pub max_entries_per_user: u32,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            min_duration: TimeDelta::seconds(5),
            max_submission_age: TimeDelta::hours(48),
            max_score_per_move: 1_000,
            max_score_per_second: 500,
            max_lines_per_move: 6,
            max_entries_per_user: 20,
        }
    }
}

/// Storage-derived facts the caller supplies alongside the session.
///
/// The validator never queries storage itself; duplicate and entry-count
/// lookups happen upstream and arrive here as plain values.
#[derive(Debug, Clone)]
pub struct SubmissionFacts {
    /// Identifier of the user submitting the score.
    pub requesting_user: u64,
    /// Whether this session was already submitted once.
    pub already_submitted: bool,
    /// Number of leaderboard entries the user already holds.
    pub entry_count: u32,
    /// Reference clock for age and skew checks.
    pub now: DateTime<Utc>,
}

/// Why a submission was rejected.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display)]
pub enum RejectionReason {
    /// The session is not in the `Ended` state.
    #[display("session has not ended")]
    SessionNotEnded,
    /// The session belongs to a different user.
    #[display("session owner does not match submitting user")]
    OwnerMismatch,
    /// The session was already submitted once.
    #[display("session was already submitted")]
    AlreadySubmitted,
    /// The recorded start time lies in the future.
    #[display("session start time is in the future")]
    StartsInFuture,
    /// The session ended too quickly to be an honest game.
    #[display("session shorter than the minimum duration")]
    DurationTooShort,
    /// The session ended too long ago to still be submitted.
    #[display("submission window expired")]
    SubmissionWindowExpired,
    /// Claimed score exceeds the per-move or per-second rate ceiling.
    #[display("score implausible for the recorded move count or duration")]
    ImplausibleScoreRate,
    /// A combo streak longer than the total number of cleared lines.
    #[display("max combo {_0} exceeds total cleared lines {_1}")]
    ComboExceedsLines(u32, u64),
    /// More lines cleared than the move count allows.
    #[display("cleared lines exceed what {_0} moves can produce")]
    LinesExceedMoveBudget(usize),
    /// Claimed score exceeds the theoretical maximum of the scoring rules.
    #[display("score exceeds theoretical maximum {_0}")]
    ScoreExceedsTheoreticalMax(u64),
    /// The user already holds the maximum number of entries.
    #[display("per-user entry limit reached")]
    EntryLimitReached,
}

/// Validation verdict over one submission.
///
/// Rejections are ordinary negative results the caller renders as a rejected
/// submission; they are never surfaced as errors.
#[derive(Debug, Clone, PartialEq, Eq, derive_more::IsVariant)]
pub enum Verdict {
    /// All checks passed; the session record can be trusted.
    Valid,
    /// A check failed, with a human-readable reason.
    Rejected(RejectionReason),
}

impl Verdict {
    /// Returns the rejection reason, if any.
    #[must_use]
    pub fn reason(&self) -> Option<&RejectionReason> {
        match self {
            Verdict::Valid => None,
            Verdict::Rejected(reason) => Some(reason),
        }
    }
}

/// Anti-cheat validator for completed sessions.
///
/// Runs the checks in a fixed order and short-circuits on the first failure,
/// so the caller always gets the most fundamental reason first (ownership
/// before timing, timing before plausibility).
#[derive(Debug, Clone, Default)]
pub struct ScoreValidator {
    config: ValidationConfig,
}

impl ScoreValidator {
    /// Creates a validator with the default thresholds.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator with custom thresholds.
    #[must_use]
    pub const fn with_config(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Validates a submission against the recorded session and the supplied
    /// facts.
    #[must_use]
    pub fn validate(&self, session: &SessionRecord, facts: &SubmissionFacts) -> Verdict {
        match self.run_checks(session, facts) {
            Ok(()) => Verdict::Valid,
            Err(reason) => {
                log::debug!(
                    "score submission rejected for user {}: {reason}",
                    facts.requesting_user,
                );
                Verdict::Rejected(reason)
            }
        }
    }

    #[expect(clippy::cast_precision_loss)]
    fn run_checks(
        &self,
        session: &SessionRecord,
        facts: &SubmissionFacts,
    ) -> Result<(), RejectionReason> {
        let config = &self.config;

        // 1. Session must have ended.
        let Some(ended_at) = session.ended_at else {
            return Err(RejectionReason::SessionNotEnded);
        };
        if !session.status.is_ended() {
            return Err(RejectionReason::SessionNotEnded);
        }

        // 2. Ownership.
        if session.owner_id != facts.requesting_user {
            return Err(RejectionReason::OwnerMismatch);
        }

        // 3. Duplicate submission (delegated lookup).
        if facts.already_submitted {
            return Err(RejectionReason::AlreadySubmitted);
        }

        // 4. Clock sanity and minimum duration.
        if session.started_at > facts.now {
            return Err(RejectionReason::StartsInFuture);
        }
        let duration = ended_at - session.started_at;
        if duration < config.min_duration {
            return Err(RejectionReason::DurationTooShort);
        }

        // 5. Submission window.
        if facts.now - ended_at > config.max_submission_age {
            return Err(RejectionReason::SubmissionWindowExpired);
        }

        // 6. Score rate ceilings.
        let moves = session.moves.len();
        let elapsed_secs = duration.num_milliseconds() as f64 / 1000.0;
        let per_move_cap = moves as u64 * config.max_score_per_move;
        let per_second_cap = elapsed_secs * config.max_score_per_second as f64;
        if session.score > per_move_cap || session.score as f64 > per_second_cap {
            return Err(RejectionReason::ImplausibleScoreRate);
        }

        // 7. A combo step implies a preceding line clear.
        if u64::from(session.max_combo) > session.cleared_lines {
            return Err(RejectionReason::ComboExceedsLines(
                session.max_combo,
                session.cleared_lines,
            ));
        }

        // 8. Lines-per-move ceiling.
        if session.cleared_lines > (moves * config.max_lines_per_move) as u64 {
            return Err(RejectionReason::LinesExceedMoveBudget(moves));
        }

        // 9. Absolute plausibility against the actual scoring rules.
        let ceiling = self.theoretical_max_score(moves, elapsed_secs);
        if session.score > ceiling {
            return Err(RejectionReason::ScoreExceedsTheoreticalMax(ceiling));
        }

        // 10. Per-user entry ceiling (delegated count).
        if facts.entry_count >= config.max_entries_per_user {
            return Err(RejectionReason::EntryLimitReached);
        }

        Ok(())
    }

    /// Highest score the scoring rules can produce in `moves` moves, capped
    /// by the per-second ceiling over the elapsed time.
    ///
    /// Assumes every move clears the per-move line maximum and an unbroken
    /// combo streak from the first move on.
    #[expect(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    #[expect(clippy::cast_sign_loss)]
    fn theoretical_max_score(&self, moves: usize, elapsed_secs: f64) -> u64 {
        let best_bonus = line_bonus(self.config.max_lines_per_move) as f64;
        let mut by_moves = 0.0;
        for combo in 0..moves {
            by_moves += best_bonus * combo_multiplier(u32::try_from(combo).unwrap_or(u32::MAX));
        }
        let by_time = elapsed_secs * self.config.max_score_per_second as f64;
        by_moves.min(by_time).round() as u64
    }
}
