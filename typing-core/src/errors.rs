use typing_types::ErrorReason;

/// A submitted observation that violates the aggregator's preconditions.
/// Nothing is computed when one of these is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum StatsError {
    #[error("wpm must be a non-negative number, got {0}")]
    InvalidWpm(f64),
    #[error("accuracy must be between 0 and 100, got {0}")]
    InvalidAccuracy(f64),
    #[error("timeLimit must be greater than zero, got {0}")]
    InvalidTimeLimit(i32),
    #[error("score must be non-negative, got {0}")]
    InvalidScore(i32),
}

impl StatsError {
    pub fn reason(&self) -> ErrorReason {
        match self {
            StatsError::InvalidWpm(_) => ErrorReason::InvalidWpm,
            StatsError::InvalidAccuracy(_) => ErrorReason::InvalidAccuracy,
            StatsError::InvalidTimeLimit(_) => ErrorReason::InvalidTimeLimit,
            StatsError::InvalidScore(_) => ErrorReason::InvalidScore,
        }
    }
}
