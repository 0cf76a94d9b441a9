#![allow(dead_code)]

use chrono::Utc;
use typing_core::{GameResult, StatsAggregator, TypingResult, TypingSnapshot};
use typing_types::{Achievement, GameStats, TestRecord, UserStats};

/// Running typing state of one simulated user
#[derive(Debug, Default)]
pub struct TypingState {
    pub stats: UserStats,
    pub achievements: Vec<Achievement>,
    pub history: Vec<TestRecord>,
    pub unlocked_per_submission: Vec<Vec<String>>,
}

impl TypingState {
    pub fn submit(&mut self, wpm: f64, accuracy: f64) {
        let snapshot = TypingSnapshot {
            stats: &self.stats,
            achievements: &self.achievements,
            history_len: self.history.len(),
        };
        let result = TypingResult {
            wpm,
            accuracy,
            time_limit: 60,
        };

        let outcome = StatsAggregator::apply_typing_result(snapshot, result, Utc::now())
            .expect("valid typing result");

        self.unlocked_per_submission
            .push(outcome.unlocked.iter().map(|a| a.name.clone()).collect());
        self.stats = outcome.stats;
        self.achievements = outcome.achievements;
        self.history.push(outcome.record);
    }

    pub fn count(&self, name: &str) -> usize {
        self.achievements.iter().filter(|a| a.name == name).count()
    }
}

/// Running game state of one simulated user
#[derive(Debug, Default)]
pub struct GameState {
    pub game_stats: GameStats,
    pub achievements: Vec<Achievement>,
}

impl GameState {
    pub fn submit(&mut self, score: i32) {
        let outcome = StatsAggregator::apply_game_result(
            &self.game_stats,
            &self.achievements,
            GameResult { score },
            Utc::now(),
        )
        .expect("valid game result");

        self.game_stats = outcome.game_stats;
        self.achievements = outcome.achievements;
    }

    pub fn count(&self, name: &str) -> usize {
        self.achievements.iter().filter(|a| a.name == name).count()
    }
}

/// Mean rounded to two decimals, for comparing against the stored average
pub fn rounded_mean(values: &[f64]) -> f64 {
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    (mean * 100.0).round() / 100.0
}
