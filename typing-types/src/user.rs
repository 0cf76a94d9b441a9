use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

pub type UserId = Uuid;

/// Aggregate typing statistics. Averages are running means over `total_tests`
/// observations, rounded to two decimals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserStats {
    #[serde(rename = "averageWPM")]
    pub average_wpm: f64,
    #[serde(rename = "highestWPM")]
    pub highest_wpm: f64,
    #[serde(rename = "totalTests")]
    pub total_tests: i32,
    #[serde(rename = "averageAccuracy")]
    pub average_accuracy: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameStats {
    #[serde(rename = "highScore")]
    pub high_score: i32,
    #[serde(rename = "gamesPlayed")]
    pub games_played: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TestRecord {
    pub wpm: f64,
    pub accuracy: f64,
    #[serde(rename = "timeLimit")]
    pub time_limit: i32,
    pub date: String, // ISO 8601 string
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Achievement {
    pub name: String,
    pub description: String,
    pub badge: String,
    #[serde(rename = "dateEarned")]
    pub date_earned: String, // ISO 8601 string
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Profile {
    pub name: Option<String>,
    pub avatar: Option<String>,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "lowercase")]
#[ts(export)]
pub enum Gender {
    Male,
    Female,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Preferences {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default)]
    pub gender: Option<Gender>,
}

fn default_theme() -> String {
    "light".to_string()
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            gender: None,
        }
    }
}

/// A user as seen by clients. Credentials are kept by the store and never
/// appear on this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub profile: Profile,
    pub preferences: Preferences,
    pub stats: UserStats,
    #[serde(rename = "gameStats")]
    pub game_stats: GameStats,
    #[serde(rename = "testHistory")]
    pub test_history: Vec<TestRecord>,
    pub achievements: Vec<Achievement>,
    #[serde(rename = "createdAt")]
    pub created_at: String, // ISO 8601 string for simplicity
    #[serde(rename = "updatedAt")]
    pub updated_at: String,
}

impl User {
    pub fn has_achievement(&self, name: &str) -> bool {
        self.achievements.iter().any(|a| a.name == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_use_client_wire_names() {
        let stats = UserStats {
            average_wpm: 83.33,
            highest_wpm: 120.0,
            total_tests: 3,
            average_accuracy: 92.33,
        };

        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["averageWPM"], 83.33);
        assert_eq!(json["highestWPM"], 120.0);
        assert_eq!(json["totalTests"], 3);
        assert_eq!(json["averageAccuracy"], 92.33);
    }

    #[test]
    fn test_preferences_default_theme() {
        let prefs: Preferences = serde_json::from_str("{}").unwrap();
        assert_eq!(prefs.theme, "light");
        assert_eq!(prefs.gender, None);

        let prefs: Preferences =
            serde_json::from_str(r#"{"theme":"dark","gender":"other"}"#).unwrap();
        assert_eq!(prefs.theme, "dark");
        assert_eq!(prefs.gender, Some(Gender::Other));
    }

    #[test]
    fn test_unknown_gender_is_rejected() {
        let result = serde_json::from_str::<Preferences>(r#"{"gender":"robot"}"#);
        assert!(result.is_err());
    }
}
