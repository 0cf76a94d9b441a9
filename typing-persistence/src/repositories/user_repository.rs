use chrono::{DateTime, FixedOffset, Utc};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveValue, ColumnTrait, DatabaseConnection, DatabaseTransaction, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{achievements, prelude::*, test_records, users};
use crate::errors::StoreError;
use typing_core::PlayerSummary;
use typing_types::{
    Achievement, GameStats, Preferences, Profile, TestRecord, User, UserStats,
};

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

/// A change to one user, produced from a snapshot of that user and written
/// back atomically by [`UserRepository::modify_user`].
#[derive(Debug, Clone, PartialEq)]
pub enum UserMutation {
    Typing {
        stats: UserStats,
        record: TestRecord,
        unlocked: Vec<Achievement>,
    },
    Game {
        game_stats: GameStats,
        unlocked: Vec<Achievement>,
    },
    Profile {
        profile: Option<Profile>,
        preferences: Option<Preferences>,
    },
}

impl UserMutation {
    /// The user as it reads after this mutation is committed.
    fn apply_to(self, mut user: User, updated_at: String) -> User {
        match self {
            UserMutation::Typing {
                stats,
                record,
                unlocked,
            } => {
                user.stats = stats;
                user.test_history.push(record);
                user.achievements.extend(unlocked);
            }
            UserMutation::Game {
                game_stats,
                unlocked,
            } => {
                user.game_stats = game_stats;
                user.achievements.extend(unlocked);
            }
            UserMutation::Profile {
                profile,
                preferences,
            } => {
                if let Some(profile) = profile {
                    user.profile = profile;
                }
                if let Some(preferences) = preferences {
                    user.preferences = preferences;
                }
            }
        }
        user.updated_at = updated_at;
        user
    }
}

pub struct UserRepository {
    db: DatabaseConnection,
    max_attempts: u32,
}

impl UserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            db,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// How many times `modify_user` re-reads and recomputes after losing a
    /// race before giving up with [`StoreError::Conflict`].
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    fn model_to_user(
        model: users::Model,
        history: Vec<test_records::Model>,
        achievements: Vec<achievements::Model>,
    ) -> Result<User, StoreError> {
        Ok(User {
            id: model.id,
            username: model.username,
            profile: serde_json::from_str(&model.profile)?,
            preferences: serde_json::from_str(&model.preferences)?,
            stats: UserStats {
                average_wpm: model.average_wpm,
                highest_wpm: model.highest_wpm,
                total_tests: model.total_tests,
                average_accuracy: model.average_accuracy,
            },
            game_stats: GameStats {
                high_score: model.high_score,
                games_played: model.games_played,
            },
            test_history: history
                .into_iter()
                .map(|record| TestRecord {
                    wpm: record.wpm,
                    accuracy: record.accuracy,
                    time_limit: record.time_limit,
                    date: record.date.to_rfc3339(),
                })
                .collect(),
            achievements: achievements
                .into_iter()
                .map(|achievement| Achievement {
                    name: achievement.name,
                    description: achievement.description,
                    badge: achievement.badge,
                    date_earned: achievement.date_earned.to_rfc3339(),
                })
                .collect(),
            created_at: model.created_at.to_rfc3339(),
            updated_at: model.updated_at.to_rfc3339(),
        })
    }

    fn model_to_summary(model: users::Model) -> PlayerSummary {
        PlayerSummary {
            username: model.username,
            stats: UserStats {
                average_wpm: model.average_wpm,
                highest_wpm: model.highest_wpm,
                total_tests: model.total_tests,
                average_accuracy: model.average_accuracy,
            },
            game_stats: GameStats {
                high_score: model.high_score,
                games_played: model.games_played,
            },
        }
    }

    /// Load history and achievements for a user row, both in insertion order.
    async fn assemble(&self, model: users::Model) -> Result<User, StoreError> {
        let history = TestRecords::find()
            .filter(test_records::Column::UserId.eq(model.id))
            .order_by_asc(test_records::Column::Id)
            .all(&self.db)
            .await?;

        let achievements = Achievements::find()
            .filter(achievements::Column::UserId.eq(model.id))
            .order_by_asc(achievements::Column::Id)
            .all(&self.db)
            .await?;

        Self::model_to_user(model, history, achievements)
    }

    pub async fn create_user(
        &self,
        username: &str,
        password_hash: &str,
        preferences: &Preferences,
    ) -> Result<User, StoreError> {
        let existing = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(StoreError::UsernameTaken);
        }

        let now: DateTime<FixedOffset> = Utc::now().into();
        let user_model = users::ActiveModel {
            id: ActiveValue::Set(Uuid::new_v4()),
            username: ActiveValue::Set(username.to_string()),
            password_hash: ActiveValue::Set(password_hash.to_string()),
            profile: ActiveValue::Set(serde_json::to_string(&Profile::default())?),
            preferences: ActiveValue::Set(serde_json::to_string(preferences)?),
            average_wpm: ActiveValue::Set(0.0),
            highest_wpm: ActiveValue::Set(0.0),
            total_tests: ActiveValue::Set(0),
            average_accuracy: ActiveValue::Set(0.0),
            high_score: ActiveValue::Set(0),
            games_played: ActiveValue::Set(0),
            version: ActiveValue::Set(0),
            created_at: ActiveValue::Set(now),
            updated_at: ActiveValue::Set(now),
        };

        // A concurrent registration can still win between the check and the insert
        let saved_model = Users::insert(user_model)
            .exec(&self.db)
            .await
            .map_err(|err| match err.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => StoreError::UsernameTaken,
                _ => StoreError::Database(err),
            })?;

        let created = Users::find_by_id(saved_model.last_insert_id)
            .one(&self.db)
            .await?
            .ok_or(StoreError::NotFound)?;

        tracing::info!("Created user {} ({})", created.username, created.id);
        Self::model_to_user(created, Vec::new(), Vec::new())
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        match Users::find_by_id(id).one(&self.db).await? {
            Some(model) => Ok(Some(self.assemble(model).await?)),
            None => Ok(None),
        }
    }

    /// The user together with their stored password hash.
    pub async fn find_credentials(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, StoreError> {
        let model = Users::find()
            .filter(users::Column::Username.eq(username))
            .one(&self.db)
            .await?;

        match model {
            Some(model) => {
                let password_hash = model.password_hash.clone();
                let user = self.assemble(model).await?;
                Ok(Some((user, password_hash)))
            }
            None => Ok(None),
        }
    }

    /// Atomic read-modify-write of one user.
    ///
    /// `compute` receives a consistent snapshot and returns the change to
    /// make. The change is written in a single transaction that only commits
    /// if nobody else wrote the user since the snapshot was taken; otherwise
    /// the snapshot is reloaded and `compute` runs again. Errors returned by
    /// `compute` abort without writing anything.
    pub async fn modify_user<F, E>(&self, id: Uuid, mut compute: F) -> Result<User, E>
    where
        F: FnMut(&User) -> Result<UserMutation, E>,
        E: From<StoreError>,
    {
        for attempt in 1..=self.max_attempts {
            let model = Users::find_by_id(id)
                .one(&self.db)
                .await
                .map_err(StoreError::from)?
                .ok_or(StoreError::NotFound)?;
            let version = model.version;
            let user = self.assemble(model).await?;

            let mutation = compute(&user)?;
            let now: DateTime<FixedOffset> = Utc::now().into();

            if self.write_mutation(id, version, &mutation, now).await? {
                return Ok(mutation.apply_to(user, now.to_rfc3339()));
            }

            tracing::warn!(
                "Stale write for user {} at version {} (attempt {}/{})",
                id,
                version,
                attempt,
                self.max_attempts
            );
        }

        Err(StoreError::Conflict(id).into())
    }

    /// Write `mutation` if the stored version still equals `version`.
    /// Returns `false` (and writes nothing) when the version has moved on.
    async fn write_mutation(
        &self,
        id: Uuid,
        version: i32,
        mutation: &UserMutation,
        now: DateTime<FixedOffset>,
    ) -> Result<bool, StoreError> {
        let txn = self.db.begin().await?;

        let mut update = Users::update_many()
            .col_expr(users::Column::Version, Expr::value(version + 1))
            .col_expr(users::Column::UpdatedAt, Expr::value(now))
            .filter(users::Column::Id.eq(id))
            .filter(users::Column::Version.eq(version));

        match mutation {
            UserMutation::Typing { stats, .. } => {
                update = update
                    .col_expr(users::Column::AverageWpm, Expr::value(stats.average_wpm))
                    .col_expr(users::Column::HighestWpm, Expr::value(stats.highest_wpm))
                    .col_expr(users::Column::TotalTests, Expr::value(stats.total_tests))
                    .col_expr(
                        users::Column::AverageAccuracy,
                        Expr::value(stats.average_accuracy),
                    );
            }
            UserMutation::Game { game_stats, .. } => {
                update = update
                    .col_expr(users::Column::HighScore, Expr::value(game_stats.high_score))
                    .col_expr(
                        users::Column::GamesPlayed,
                        Expr::value(game_stats.games_played),
                    );
            }
            UserMutation::Profile {
                profile,
                preferences,
            } => {
                if let Some(profile) = profile {
                    update = update.col_expr(
                        users::Column::Profile,
                        Expr::value(serde_json::to_string(profile)?),
                    );
                }
                if let Some(preferences) = preferences {
                    update = update.col_expr(
                        users::Column::Preferences,
                        Expr::value(serde_json::to_string(preferences)?),
                    );
                }
            }
        }

        let result = update.exec(&txn).await?;
        if result.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(false);
        }

        match mutation {
            UserMutation::Typing {
                record, unlocked, ..
            } => {
                let record_model = test_records::ActiveModel {
                    id: ActiveValue::NotSet,
                    user_id: ActiveValue::Set(id),
                    wpm: ActiveValue::Set(record.wpm),
                    accuracy: ActiveValue::Set(record.accuracy),
                    time_limit: ActiveValue::Set(record.time_limit),
                    date: ActiveValue::Set(DateTime::parse_from_rfc3339(&record.date)?),
                };
                TestRecords::insert(record_model).exec(&txn).await?;
                Self::insert_achievements(&txn, id, unlocked).await?;
            }
            UserMutation::Game { unlocked, .. } => {
                Self::insert_achievements(&txn, id, unlocked).await?;
            }
            UserMutation::Profile { .. } => {}
        }

        txn.commit().await?;
        Ok(true)
    }

    async fn insert_achievements(
        txn: &DatabaseTransaction,
        user_id: Uuid,
        unlocked: &[Achievement],
    ) -> Result<(), StoreError> {
        if unlocked.is_empty() {
            return Ok(());
        }

        let models = unlocked
            .iter()
            .map(|achievement| {
                Ok(achievements::ActiveModel {
                    id: ActiveValue::NotSet,
                    user_id: ActiveValue::Set(user_id),
                    name: ActiveValue::Set(achievement.name.clone()),
                    description: ActiveValue::Set(achievement.description.clone()),
                    badge: ActiveValue::Set(achievement.badge.clone()),
                    date_earned: ActiveValue::Set(DateTime::parse_from_rfc3339(
                        &achievement.date_earned,
                    )?),
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        Achievements::insert_many(models).exec(txn).await?;
        Ok(())
    }

    /// Candidates for the typing leaderboard, best first. Ties are broken by
    /// registration time and then id so the order is stable between calls.
    pub async fn typing_leaderboard_rows(&self, limit: u64) -> Result<Vec<PlayerSummary>, StoreError> {
        let users = Users::find()
            .order_by_desc(users::Column::HighestWpm)
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(users.into_iter().map(Self::model_to_summary).collect())
    }

    /// Candidates for the game leaderboard, same ordering rules as
    /// [`Self::typing_leaderboard_rows`].
    pub async fn game_leaderboard_rows(&self, limit: u64) -> Result<Vec<PlayerSummary>, StoreError> {
        let users = Users::find()
            .order_by_desc(users::Column::HighScore)
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;

        Ok(users.into_iter().map(Self::model_to_summary).collect())
    }

    pub async fn count_users(&self) -> Result<u64, StoreError> {
        Ok(Users::find().count(&self.db).await?)
    }
}
