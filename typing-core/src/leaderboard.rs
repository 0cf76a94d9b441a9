use std::cmp::Reverse;

use typing_types::{
    GameLeaderboardEntry, GameLeaderboardStats, GameStats, TypingLeaderboardEntry,
    TypingLeaderboardStats, UserStats,
};

pub const LEADERBOARD_SIZE: usize = 10;

/// The public part of a user needed to rank them.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerSummary {
    pub username: String,
    pub stats: UserStats,
    pub game_stats: GameStats,
}

/// Top typists by highest WPM. The sort is stable, so ties keep the order the
/// summaries were supplied in.
pub fn typing_leaderboard(
    players: impl IntoIterator<Item = PlayerSummary>,
) -> Vec<TypingLeaderboardEntry> {
    let mut players: Vec<PlayerSummary> = players.into_iter().collect();
    players.sort_by(|a, b| b.stats.highest_wpm.total_cmp(&a.stats.highest_wpm));

    players
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .enumerate()
        .map(|(index, player)| TypingLeaderboardEntry {
            rank: (index + 1) as u32,
            username: player.username,
            stats: TypingLeaderboardStats {
                highest_wpm: player.stats.highest_wpm,
                average_wpm: player.stats.average_wpm,
            },
        })
        .collect()
}

/// Top players by game high score, same tie rules as the typing board.
pub fn game_leaderboard(
    players: impl IntoIterator<Item = PlayerSummary>,
) -> Vec<GameLeaderboardEntry> {
    let mut players: Vec<PlayerSummary> = players.into_iter().collect();
    players.sort_by_key(|p| Reverse(p.game_stats.high_score));

    players
        .into_iter()
        .take(LEADERBOARD_SIZE)
        .enumerate()
        .map(|(index, player)| GameLeaderboardEntry {
            rank: (index + 1) as u32,
            username: player.username,
            game_stats: GameLeaderboardStats {
                high_score: player.game_stats.high_score,
            },
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player(username: &str, highest_wpm: f64, high_score: i32) -> PlayerSummary {
        PlayerSummary {
            username: username.to_string(),
            stats: UserStats {
                average_wpm: highest_wpm / 2.0,
                highest_wpm,
                total_tests: 1,
                average_accuracy: 90.0,
            },
            game_stats: GameStats {
                high_score,
                games_played: 1,
            },
        }
    }

    #[test]
    fn test_typing_leaderboard_orders_by_highest_wpm() {
        let board = typing_leaderboard(vec![
            player("slow", 40.0, 0),
            player("fast", 130.0, 0),
            player("mid", 85.5, 0),
        ]);

        let names: Vec<&str> = board.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["fast", "mid", "slow"]);
        assert_eq!(board[0].rank, 1);
        assert_eq!(board[0].stats.average_wpm, 65.0);
        assert_eq!(board[2].rank, 3);
    }

    #[test]
    fn test_leaderboards_truncate_to_ten() {
        let players: Vec<PlayerSummary> = (0..25)
            .map(|i| player(&format!("user{}", i), i as f64, i * 10))
            .collect();

        let typing = typing_leaderboard(players.clone());
        assert_eq!(typing.len(), LEADERBOARD_SIZE);
        assert_eq!(typing[0].username, "user24");
        assert_eq!(typing[9].username, "user15");

        let game = game_leaderboard(players);
        assert_eq!(game.len(), LEADERBOARD_SIZE);
        assert_eq!(game[0].game_stats.high_score, 240);
        assert!(game.windows(2).all(|w| w[0].game_stats.high_score >= w[1].game_stats.high_score));
    }

    #[test]
    fn test_ties_keep_input_order() {
        let board = game_leaderboard(vec![
            player("first", 0.0, 500),
            player("second", 0.0, 500),
            player("top", 0.0, 900),
        ]);

        let names: Vec<&str> = board.iter().map(|e| e.username.as_str()).collect();
        assert_eq!(names, vec!["top", "first", "second"]);
    }

    #[test]
    fn test_empty_input() {
        assert!(typing_leaderboard(Vec::new()).is_empty());
        assert!(game_leaderboard(Vec::new()).is_empty());
    }
}
