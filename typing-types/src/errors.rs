use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Machine-readable reason attached to every error response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ErrorReason {
    InvalidWpm,
    InvalidAccuracy,
    InvalidTimeLimit,
    InvalidScore,
    DisallowedUpdate,
    InvalidBody,
    InvalidUsername,
    InvalidPassword,
    UsernameTaken,
    Unauthorized,
    InvalidCredentials,
    NotFound,
    StoreConflict,
    StoreFailure,
    InternalError,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorBody {
    pub error: String,
    pub reason: ErrorReason,
}
