use chrono::{DateTime, Utc};
use typing_types::{Achievement, GameStats, UserStats};

use crate::stats::{GameResult, TypingResult};

pub const SPEED_DEMON: &str = "Speed Demon";
pub const DEDICATED_TYPIST: &str = "Dedicated Typist";
pub const GAME_MASTER: &str = "Game Master";

pub const SPEED_DEMON_WPM: f64 = 100.0;
pub const DEDICATED_TYPIST_TESTS: i32 = 10;
pub const GAME_MASTER_SCORE: i32 = 1000;

/// One row of an achievement table: the badge it awards and the condition
/// that unlocks it, evaluated over the previous aggregate, the next
/// aggregate and the observation that produced it.
pub struct AchievementRule<S, O> {
    pub name: &'static str,
    pub description: &'static str,
    pub badge: &'static str,
    pub unlocks: fn(previous: &S, next: &S, observation: &O) -> bool,
}

impl<S, O> AchievementRule<S, O> {
    pub fn award(&self, earned_at: DateTime<Utc>) -> Achievement {
        Achievement {
            name: self.name.to_string(),
            description: self.description.to_string(),
            badge: self.badge.to_string(),
            date_earned: earned_at.to_rfc3339(),
        }
    }
}

pub type TypingRule = AchievementRule<UserStats, TypingResult>;
pub type GameRule = AchievementRule<GameStats, GameResult>;

/// Evaluated in order after every typing submission.
pub static TYPING_RULES: [TypingRule; 2] = [
    AchievementRule {
        name: SPEED_DEMON,
        description: "Reached 100 WPM",
        badge: "🏃",
        unlocks: reached_speed_demon,
    },
    AchievementRule {
        name: DEDICATED_TYPIST,
        description: "Completed 10 typing tests",
        badge: "🎯",
        unlocks: reached_dedicated_typist,
    },
];

/// Evaluated in order after every game submission.
pub static GAME_RULES: [GameRule; 1] = [AchievementRule {
    name: GAME_MASTER,
    description: "Scored 1000 points in Dog Rescue",
    badge: "🎮",
    unlocks: reached_game_master,
}];

// Only the submission that sets a new personal best can unlock it.
fn reached_speed_demon(previous: &UserStats, next: &UserStats, result: &TypingResult) -> bool {
    result.wpm > previous.highest_wpm && next.highest_wpm >= SPEED_DEMON_WPM
}

fn reached_dedicated_typist(_previous: &UserStats, next: &UserStats, _: &TypingResult) -> bool {
    next.total_tests == DEDICATED_TYPIST_TESTS
}

// Checked against the submitted score, not the stored high score.
fn reached_game_master(_previous: &GameStats, _next: &GameStats, result: &GameResult) -> bool {
    result.score >= GAME_MASTER_SCORE
}

/// Run every rule of `rules` in table order and return the achievements that
/// unlock now. Rules whose name is already in `earned` are skipped, so a badge
/// is never awarded twice.
pub fn evaluate_rules<S, O>(
    rules: &[AchievementRule<S, O>],
    earned: &[Achievement],
    previous: &S,
    next: &S,
    observation: &O,
    now: DateTime<Utc>,
) -> Vec<Achievement> {
    let mut unlocked: Vec<Achievement> = Vec::new();

    for rule in rules {
        let already_earned = earned.iter().chain(unlocked.iter()).any(|a| a.name == rule.name);
        if already_earned {
            continue;
        }

        if (rule.unlocks)(previous, next, observation) {
            tracing::debug!("Achievement unlocked: {}", rule.name);
            unlocked.push(rule.award(now));
        }
    }

    unlocked
}
