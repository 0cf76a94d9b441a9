use sea_orm::DbErr;
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("User not found")]
    NotFound,
    #[error("Username already exists")]
    UsernameTaken,
    #[error("Gave up updating user {0} after repeated concurrent writes")]
    Conflict(Uuid),
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
    #[error("Stored JSON is invalid: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(#[from] chrono::ParseError),
}
