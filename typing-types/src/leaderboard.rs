use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TypingLeaderboardStats {
    #[serde(rename = "highestWPM")]
    pub highest_wpm: f64,
    #[serde(rename = "averageWPM")]
    pub average_wpm: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TypingLeaderboardEntry {
    pub rank: u32,
    pub username: String,
    pub stats: TypingLeaderboardStats,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameLeaderboardStats {
    #[serde(rename = "highScore")]
    pub high_score: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameLeaderboardEntry {
    pub rank: u32,
    pub username: String,
    #[serde(rename = "gameStats")]
    pub game_stats: GameLeaderboardStats,
}
