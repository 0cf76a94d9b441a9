use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::info;
use uuid::Uuid;

use crate::errors::ApiError;
use crate::session::Session;
use typing_core::{
    GameResult, LEADERBOARD_SIZE, StatsAggregator, TypingResult, TypingSnapshot,
    game_leaderboard, typing_leaderboard,
};
use typing_persistence::{UserMutation, UserRepository};
use typing_types::{
    ErrorReason, GameLeaderboardEntry, ProfileUpdate, SubmitScoreResponse, SubmitTestResponse,
    TypingLeaderboardEntry, User,
};

/// Applies submissions and profile edits to stored users.
///
/// Writes for one user are serialised in-process by a per-user lock; the
/// store's version check covers writers in other processes.
pub struct UserService {
    users: Arc<UserRepository>,
    locks: DashMap<Uuid, Arc<Mutex<()>>>,
}

/// A held (or awaited) per-user lock. Dropping it, including when the
/// request future is cancelled, forgets the map entry once nobody else
/// holds or waits on it.
struct UserLock<'a> {
    locks: &'a DashMap<Uuid, Arc<Mutex<()>>>,
    user_id: Uuid,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for UserLock<'_> {
    fn drop(&mut self) {
        self.guard.take();
        // Only the map holds the lock once nobody is waiting on it
        self.locks
            .remove_if(&self.user_id, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl UserService {
    pub fn new(users: Arc<UserRepository>) -> Self {
        Self {
            users,
            locks: DashMap::new(),
        }
    }

    async fn lock_user(&self, user_id: Uuid) -> UserLock<'_> {
        let mut held = UserLock {
            locks: &self.locks,
            user_id,
            guard: None,
        };
        let lock = self
            .locks
            .entry(user_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        held.guard = Some(lock.lock_owned().await);
        held
    }

    async fn modify<F>(&self, user_id: Uuid, compute: F) -> Result<User, ApiError>
    where
        F: FnMut(&User) -> Result<UserMutation, ApiError>,
    {
        let _held = self.lock_user(user_id).await;
        self.users.modify_user(user_id, compute).await
    }

    pub async fn submit_test(
        &self,
        session: &Session,
        result: TypingResult,
    ) -> Result<SubmitTestResponse, ApiError> {
        result.validate()?;

        let user = self
            .modify(session.user_id(), |current| {
                let outcome = StatsAggregator::apply_typing_result(
                    TypingSnapshot::of(current),
                    result,
                    Utc::now(),
                )?;
                Ok(UserMutation::Typing {
                    stats: outcome.stats,
                    record: outcome.record,
                    unlocked: outcome.unlocked,
                })
            })
            .await?;

        let test_result = user
            .test_history
            .last()
            .cloned()
            .ok_or_else(|| ApiError::Internal("Saved test result is missing".to_string()))?;

        info!(
            "User {} submitted a typing test: wpm={} totalTests={}",
            user.username, test_result.wpm, user.stats.total_tests
        );

        Ok(SubmitTestResponse {
            test_result,
            stats: user.stats,
            achievements: user.achievements,
        })
    }

    pub async fn submit_score(
        &self,
        session: &Session,
        result: GameResult,
    ) -> Result<SubmitScoreResponse, ApiError> {
        result.validate()?;

        let user = self
            .modify(session.user_id(), |current| {
                let outcome = StatsAggregator::apply_game_result(
                    &current.game_stats,
                    &current.achievements,
                    result,
                    Utc::now(),
                )?;
                Ok(UserMutation::Game {
                    game_stats: outcome.game_stats,
                    unlocked: outcome.unlocked,
                })
            })
            .await?;

        info!(
            "User {} submitted a game score: score={} highScore={}",
            user.username, result.score, user.game_stats.high_score
        );

        Ok(SubmitScoreResponse {
            game_stats: user.game_stats,
            achievements: user.achievements,
        })
    }

    pub async fn update_profile(
        &self,
        session: &Session,
        body: serde_json::Value,
    ) -> Result<User, ApiError> {
        let update = parse_profile_update(body)?;

        self.modify(session.user_id(), |_| {
            Ok(UserMutation::Profile {
                profile: update.profile.clone(),
                preferences: update.preferences.clone(),
            })
        })
        .await
    }

    pub async fn typing_leaderboard(&self) -> Result<Vec<TypingLeaderboardEntry>, ApiError> {
        let rows = self
            .users
            .typing_leaderboard_rows(LEADERBOARD_SIZE as u64)
            .await?;
        Ok(typing_leaderboard(rows))
    }

    pub async fn game_leaderboard(&self) -> Result<Vec<GameLeaderboardEntry>, ApiError> {
        let rows = self
            .users
            .game_leaderboard_rows(LEADERBOARD_SIZE as u64)
            .await?;
        Ok(game_leaderboard(rows))
    }

    #[cfg(test)]
    fn tracked_locks(&self) -> usize {
        self.locks.len()
    }
}

/// Accept only the top-level keys a user may change about themselves.
pub fn parse_profile_update(body: serde_json::Value) -> Result<ProfileUpdate, ApiError> {
    let object = body.as_object().ok_or_else(|| {
        ApiError::bad_request(ErrorReason::InvalidBody, "Request body must be a JSON object")
    })?;

    let disallowed: Vec<&str> = object
        .keys()
        .map(String::as_str)
        .filter(|key| !ProfileUpdate::ALLOWED_KEYS.contains(key))
        .collect();
    if !disallowed.is_empty() {
        tracing::warn!("Rejected profile update with keys {:?}", disallowed);
        return Err(ApiError::bad_request(
            ErrorReason::DisallowedUpdate,
            "Invalid updates",
        ));
    }

    serde_json::from_value(body).map_err(|e| {
        ApiError::bad_request(ErrorReason::InvalidBody, format!("Invalid profile update: {}", e))
    })
}
