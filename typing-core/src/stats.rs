use chrono::{DateTime, Utc};
use typing_types::{
    Achievement, GameStats, SubmitScoreRequest, SubmitTestRequest, TestRecord, User, UserStats,
};

use crate::achievements::{GAME_RULES, TYPING_RULES, evaluate_rules};
use crate::errors::StatsError;

/// One finished typing test as submitted by the client.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TypingResult {
    pub wpm: f64,
    pub accuracy: f64,
    pub time_limit: i32,
}

impl TypingResult {
    pub fn validate(&self) -> Result<(), StatsError> {
        if !self.wpm.is_finite() || self.wpm < 0.0 {
            return Err(StatsError::InvalidWpm(self.wpm));
        }
        if !(0.0..=100.0).contains(&self.accuracy) {
            return Err(StatsError::InvalidAccuracy(self.accuracy));
        }
        if self.time_limit <= 0 {
            return Err(StatsError::InvalidTimeLimit(self.time_limit));
        }
        Ok(())
    }
}

impl From<SubmitTestRequest> for TypingResult {
    fn from(request: SubmitTestRequest) -> Self {
        Self {
            wpm: request.wpm,
            accuracy: request.accuracy,
            time_limit: request.time_limit,
        }
    }
}

/// One finished game as submitted by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameResult {
    pub score: i32,
}

impl GameResult {
    pub fn validate(&self) -> Result<(), StatsError> {
        if self.score < 0 {
            return Err(StatsError::InvalidScore(self.score));
        }
        Ok(())
    }
}

impl From<SubmitScoreRequest> for GameResult {
    fn from(request: SubmitScoreRequest) -> Self {
        Self {
            score: request.score,
        }
    }
}

/// The part of a user the typing aggregator reads.
#[derive(Debug, Clone, Copy)]
pub struct TypingSnapshot<'a> {
    pub stats: &'a UserStats,
    pub achievements: &'a [Achievement],
    pub history_len: usize,
}

impl<'a> TypingSnapshot<'a> {
    pub fn of(user: &'a User) -> Self {
        Self {
            stats: &user.stats,
            achievements: &user.achievements,
            history_len: user.test_history.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypingOutcome {
    pub stats: UserStats,
    /// Full achievement set after this submission.
    pub achievements: Vec<Achievement>,
    /// Only the achievements this submission unlocked, in rule order.
    pub unlocked: Vec<Achievement>,
    /// Record to append to the history.
    pub record: TestRecord,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameOutcome {
    pub game_stats: GameStats,
    pub achievements: Vec<Achievement>,
    pub unlocked: Vec<Achievement>,
}

/// Computes successor aggregates. Nothing here touches storage: callers pass
/// in a consistent snapshot and persist the returned outcome themselves.
pub struct StatsAggregator;

impl StatsAggregator {
    /// Fold one typing result into the user's stats and evaluate the typing
    /// achievement table.
    pub fn apply_typing_result(
        snapshot: TypingSnapshot<'_>,
        result: TypingResult,
        now: DateTime<Utc>,
    ) -> Result<TypingOutcome, StatsError> {
        result.validate()?;

        let previous = snapshot.stats;
        if snapshot.history_len != previous.total_tests as usize {
            tracing::warn!(
                "History length {} does not match totalTests {}",
                snapshot.history_len,
                previous.total_tests
            );
        }

        let total_tests = previous.total_tests + 1;
        let stats = UserStats {
            average_wpm: round2(running_mean(
                previous.average_wpm,
                previous.total_tests,
                result.wpm,
            )),
            highest_wpm: previous.highest_wpm.max(result.wpm),
            total_tests,
            average_accuracy: round2(running_mean(
                previous.average_accuracy,
                previous.total_tests,
                result.accuracy,
            )),
        };

        let unlocked = evaluate_rules(
            &TYPING_RULES,
            snapshot.achievements,
            previous,
            &stats,
            &result,
            now,
        );

        tracing::debug!(
            "Typing result applied: wpm={} totalTests={} averageWPM={} highestWPM={}",
            result.wpm,
            stats.total_tests,
            stats.average_wpm,
            stats.highest_wpm
        );

        let mut achievements = snapshot.achievements.to_vec();
        achievements.extend(unlocked.iter().cloned());

        Ok(TypingOutcome {
            stats,
            achievements,
            unlocked,
            record: TestRecord {
                wpm: result.wpm,
                accuracy: result.accuracy,
                time_limit: result.time_limit,
                date: now.to_rfc3339(),
            },
        })
    }

    /// Fold one game score into the user's game stats and evaluate the game
    /// achievement table.
    pub fn apply_game_result(
        previous: &GameStats,
        achievements: &[Achievement],
        result: GameResult,
        now: DateTime<Utc>,
    ) -> Result<GameOutcome, StatsError> {
        result.validate()?;

        let game_stats = GameStats {
            high_score: previous.high_score.max(result.score),
            games_played: previous.games_played + 1,
        };

        let unlocked = evaluate_rules(&GAME_RULES, achievements, previous, &game_stats, &result, now);

        tracing::debug!(
            "Game result applied: score={} highScore={} gamesPlayed={}",
            result.score,
            game_stats.high_score,
            game_stats.games_played
        );

        let mut all = achievements.to_vec();
        all.extend(unlocked.iter().cloned());

        Ok(GameOutcome {
            game_stats,
            achievements: all,
            unlocked,
        })
    }
}

fn running_mean(mean: f64, count: i32, value: f64) -> f64 {
    (mean * count as f64 + value) / (count + 1) as f64
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::achievements::{DEDICATED_TYPIST, GAME_MASTER, SPEED_DEMON};

    fn typing(wpm: f64, accuracy: f64) -> TypingResult {
        TypingResult {
            wpm,
            accuracy,
            time_limit: 60,
        }
    }

    fn apply(
        stats: &UserStats,
        achievements: &[Achievement],
        history_len: usize,
        result: TypingResult,
    ) -> TypingOutcome {
        let snapshot = TypingSnapshot {
            stats,
            achievements,
            history_len,
        };
        StatsAggregator::apply_typing_result(snapshot, result, Utc::now()).unwrap()
    }

    #[test]
    fn test_first_submission_sets_averages() {
        let outcome = apply(&UserStats::default(), &[], 0, typing(42.5, 97.0));

        assert_eq!(outcome.stats.total_tests, 1);
        assert_eq!(outcome.stats.average_wpm, 42.5);
        assert_eq!(outcome.stats.highest_wpm, 42.5);
        assert_eq!(outcome.stats.average_accuracy, 97.0);
        assert!(outcome.unlocked.is_empty());
        assert_eq!(outcome.record.wpm, 42.5);
        assert_eq!(outcome.record.time_limit, 60);
    }

    #[test]
    fn test_scenario_mixed_speeds() {
        let mut stats = UserStats::default();
        let mut achievements = Vec::new();
        let mut history = Vec::new();

        for (wpm, accuracy) in [(50.0, 90.0), (120.0, 95.0), (80.0, 92.0)] {
            let outcome = apply(&stats, &achievements, history.len(), typing(wpm, accuracy));
            stats = outcome.stats;
            achievements = outcome.achievements;
            history.push(outcome.record);
        }

        assert_eq!(stats.average_wpm, 83.33);
        assert_eq!(stats.highest_wpm, 120.0);
        assert_eq!(stats.total_tests, 3);
        assert_eq!(stats.average_accuracy, 92.33);
        assert!(achievements.iter().any(|a| a.name == SPEED_DEMON));
        assert!(!achievements.iter().any(|a| a.name == DEDICATED_TYPIST));
        assert_eq!(history.len(), 3);
    }

    #[test]
    fn test_highest_wpm_is_not_rounded() {
        let outcome = apply(&UserStats::default(), &[], 0, typing(71.456, 88.888));

        assert_eq!(outcome.stats.highest_wpm, 71.456);
        assert_eq!(outcome.stats.average_wpm, 71.46);
        assert_eq!(outcome.stats.average_accuracy, 88.89);
    }

    #[test]
    fn test_slower_result_keeps_highest() {
        let stats = UserStats {
            average_wpm: 90.0,
            highest_wpm: 110.0,
            total_tests: 2,
            average_accuracy: 95.0,
        };
        let outcome = apply(&stats, &[], 2, typing(30.0, 80.0));

        assert_eq!(outcome.stats.highest_wpm, 110.0);
        assert_eq!(outcome.stats.average_wpm, 70.0);
        assert_eq!(outcome.stats.average_accuracy, 90.0);
    }

    #[test]
    fn test_invalid_typing_results_are_rejected() {
        let stats = UserStats::default();
        let snapshot = TypingSnapshot {
            stats: &stats,
            achievements: &[],
            history_len: 0,
        };

        let cases = [
            (typing(-1.0, 90.0), StatsError::InvalidWpm(-1.0)),
            (typing(50.0, 100.5), StatsError::InvalidAccuracy(100.5)),
            (typing(50.0, -0.1), StatsError::InvalidAccuracy(-0.1)),
            (
                TypingResult {
                    wpm: 50.0,
                    accuracy: 90.0,
                    time_limit: 0,
                },
                StatsError::InvalidTimeLimit(0),
            ),
        ];

        for (result, expected) in cases {
            let err = StatsAggregator::apply_typing_result(snapshot, result, Utc::now()).unwrap_err();
            assert_eq!(err, expected);
        }

        let err = StatsAggregator::apply_typing_result(snapshot, typing(f64::NAN, 90.0), Utc::now())
            .unwrap_err();
        assert!(matches!(err, StatsError::InvalidWpm(_)));
    }

    #[test]
    fn test_accuracy_bounds_are_inclusive() {
        assert!(typing(0.0, 0.0).validate().is_ok());
        assert!(typing(0.0, 100.0).validate().is_ok());
    }

    #[test]
    fn test_record_is_stamped_with_now() {
        let now = Utc::now();
        let stats = UserStats::default();
        let snapshot = TypingSnapshot {
            stats: &stats,
            achievements: &[],
            history_len: 0,
        };

        let outcome = StatsAggregator::apply_typing_result(snapshot, typing(60.0, 90.0), now).unwrap();
        assert_eq!(outcome.record.date, now.to_rfc3339());
    }

    #[test]
    fn test_game_scenario() {
        let mut game_stats = GameStats::default();
        let mut achievements = Vec::new();

        for score in [200, 1500, 300] {
            let outcome = StatsAggregator::apply_game_result(
                &game_stats,
                &achievements,
                GameResult { score },
                Utc::now(),
            )
            .unwrap();
            game_stats = outcome.game_stats;
            achievements = outcome.achievements;
        }

        assert_eq!(game_stats.high_score, 1500);
        assert_eq!(game_stats.games_played, 3);
        assert_eq!(
            achievements.iter().filter(|a| a.name == GAME_MASTER).count(),
            1
        );
    }

    #[test]
    fn test_game_master_not_fired_by_previous_high_score() {
        let previous = GameStats {
            high_score: 2000,
            games_played: 1,
        };

        let outcome =
            StatsAggregator::apply_game_result(&previous, &[], GameResult { score: 10 }, Utc::now())
                .unwrap();

        assert_eq!(outcome.game_stats.high_score, 2000);
        assert_eq!(outcome.game_stats.games_played, 2);
        assert!(outcome.unlocked.is_empty());
    }

    #[test]
    fn test_negative_score_is_rejected() {
        let err = StatsAggregator::apply_game_result(
            &GameStats::default(),
            &[],
            GameResult { score: -5 },
            Utc::now(),
        )
        .unwrap_err();
        assert_eq!(err, StatsError::InvalidScore(-5));
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(83.333333), 83.33);
        assert_eq!(round2(12.3456), 12.35);
        assert_eq!(round2(0.0), 0.0);
    }
}
