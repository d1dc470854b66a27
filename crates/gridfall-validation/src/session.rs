use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, derive_more::IsVariant)]
pub enum SessionStatus {
    /// Session is still in progress.
    Playing,
    /// Session has ended and may be submitted for scoring.
    Ended,
}

/// One recorded move of a session.
///
/// Appended by the placement handler of the surrounding application as moves
/// occur; the validator consumes the log read-only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MoveRecord {
    /// Index of the placed piece within its generated set.
    pub piece_index: usize,
    /// Target row of the placement.
    pub row: usize,
    /// Target column of the placement.
    pub col: usize,
    /// Points awarded for this move, combo multiplier included.
    pub points: u64,
    /// Lines (rows plus columns) cleared by this move.
    pub cleared_lines: usize,
    /// Wall-clock time the move was recorded.
    pub timestamp: DateTime<Utc>,
}

/// A completed session as recorded by the surrounding application.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SessionRecord {
    /// Identifier of the user who played the session.
    pub owner_id: u64,
    /// Lifecycle state at submission time.
    pub status: SessionStatus,
    /// When the session started.
    pub started_at: DateTime<Utc>,
    /// When the session ended, if it has.
    pub ended_at: Option<DateTime<Utc>>,
    /// Total score claimed by the client.
    pub score: u64,
    /// Total lines cleared over the whole session.
    pub cleared_lines: u64,
    /// Highest combo counter observed during the session.
    pub max_combo: u32,
    /// Per-move log, in play order.
    pub moves: Vec<MoveRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeDelta;

    #[test]
    fn test_session_record_serde_roundtrip() {
        let started = Utc::now();
        let record = SessionRecord {
            owner_id: 17,
            status: SessionStatus::Ended,
            started_at: started,
            ended_at: Some(started + TimeDelta::seconds(90)),
            score: 1540,
            cleared_lines: 12,
            max_combo: 3,
            moves: vec![MoveRecord {
                piece_index: 0,
                row: 4,
                col: 2,
                points: 30,
                cleared_lines: 2,
                timestamp: started + TimeDelta::seconds(10),
            }],
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: SessionRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_status_is_variant_helpers() {
        assert!(SessionStatus::Playing.is_playing());
        assert!(SessionStatus::Ended.is_ended());
    }
}
