use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{Achievement, GameStats, Preferences, Profile, TestRecord, User, UserStats};

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PassageResponse {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitTestRequest {
    pub wpm: f64,
    pub accuracy: f64,
    #[serde(rename = "timeLimit")]
    pub time_limit: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitTestResponse {
    #[serde(rename = "testResult")]
    pub test_result: TestRecord,
    pub stats: UserStats,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitScoreRequest {
    pub score: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitScoreResponse {
    #[serde(rename = "gameStats")]
    pub game_stats: GameStats,
    pub achievements: Vec<Achievement>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub preferences: Option<Preferences>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

/// Body of `PATCH /api/user/profile`. Only these two top-level keys may be
/// sent; a provided key replaces the stored value wholesale.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(deny_unknown_fields)]
#[ts(export)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub profile: Option<Profile>,
    #[serde(default)]
    pub preferences: Option<Preferences>,
}

impl ProfileUpdate {
    pub const ALLOWED_KEYS: [&'static str; 2] = ["profile", "preferences"];
}

/// Client-side error report posted to `/api/log/error`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ErrorReport {
    pub message: Option<String>,
    pub error: Option<String>,
    pub stack: Option<String>,
    pub timestamp: Option<String>,
    #[serde(rename = "userId")]
    pub user_id: Option<String>,
    #[serde(rename = "userAgent")]
    pub user_agent: Option<String>,
    pub path: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_submit_request_wire_format() {
        let request: SubmitTestRequest =
            serde_json::from_str(r#"{"wpm":72.5,"accuracy":96,"timeLimit":60}"#).unwrap();
        assert_eq!(request.wpm, 72.5);
        assert_eq!(request.accuracy, 96.0);
        assert_eq!(request.time_limit, 60);
    }

    #[test]
    fn test_profile_update_rejects_unknown_keys() {
        let result = serde_json::from_str::<ProfileUpdate>(r#"{"password":"x"}"#);
        assert!(result.is_err());

        let update: ProfileUpdate =
            serde_json::from_str(r#"{"profile":{"name":"Ada","avatar":null,"bio":null}}"#)
                .unwrap();
        assert_eq!(update.profile.unwrap().name.as_deref(), Some("Ada"));
        assert!(update.preferences.is_none());
    }
}
