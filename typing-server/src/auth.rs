use std::sync::LazyLock;

use chrono::{Duration, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_PASSWORD_LENGTH: usize = 6;

static USERNAME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_.-]{3,32}$").expect("username pattern compiles"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String, // User ID
    pub iat: i64,    // Issued at
    pub exp: i64,    // Expiry
}

/// Issues and verifies the bearer tokens that identify a user.
pub struct AuthService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    token_ttl: Duration,
}

impl AuthService {
    pub fn new(secret: &str, token_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
            token_ttl,
        }
    }

    pub fn issue_token(&self, user_id: Uuid) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            iat: now.timestamp(),
            exp: (now + self.token_ttl).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!("Failed to sign session token: {:?}", e);
            AuthError::TokenCreation
        })
    }

    /// Verify a token and return the user it was issued to.
    pub fn validate_token(&self, token: &str) -> Result<Uuid, AuthError> {
        let token_data = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => {
                    tracing::debug!("Session token expired");
                    AuthError::TokenExpired
                }
                _ => {
                    tracing::warn!("Session token validation failed: {:?}", e);
                    AuthError::InvalidToken
                }
            })?;

        Uuid::parse_str(&token_data.claims.sub).map_err(|_| {
            tracing::warn!("Session token subject is not a user id");
            AuthError::InvalidToken
        })
    }
}

/// Trim and check a username for registration or login.
pub fn normalize_username(username: &str) -> Result<String, AuthError> {
    let username = username.trim();
    if !USERNAME_PATTERN.is_match(username) {
        return Err(AuthError::InvalidUsername);
    }
    Ok(username.to_string())
}

pub fn check_password_strength(password: &str) -> Result<(), AuthError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authentication required")]
    MissingToken,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Failed to create token")]
    TokenCreation,
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Username must be 3-32 letters, digits, '.', '_' or '-'")]
    InvalidUsername,
    #[error("Password must be at least 6 characters")]
    WeakPassword,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> AuthService {
        AuthService::new("test-secret", Duration::hours(1))
    }

    #[test]
    fn test_token_round_trip() {
        let auth = service();
        let user_id = Uuid::new_v4();

        let token = auth.issue_token(user_id).unwrap();
        assert_eq!(auth.validate_token(&token).unwrap(), user_id);
    }

    #[test]
    fn test_invalid_token_validation() {
        let auth = service();

        let result = auth.validate_token("invalid-token");
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }

    #[test]
    fn test_token_from_other_secret_is_rejected() {
        let other = AuthService::new("other-secret", Duration::hours(1));
        let token = other.issue_token(Uuid::new_v4()).unwrap();

        assert!(matches!(
            service().validate_token(&token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_expired_token() {
        let expired = AuthService::new("test-secret", Duration::hours(-2));
        let token = expired.issue_token(Uuid::new_v4()).unwrap();

        assert!(matches!(
            service().validate_token(&token),
            Err(AuthError::TokenExpired)
        ));
    }

    #[test]
    fn test_username_rules() {
        assert_eq!(normalize_username("  ada_l ").unwrap(), "ada_l");
        assert!(normalize_username("ab").is_err());
        assert!(normalize_username("has space").is_err());
        assert!(normalize_username("<script>").is_err());
        assert!(normalize_username(&"x".repeat(33)).is_err());
    }

    #[test]
    fn test_password_rules() {
        assert!(check_password_strength("secret").is_ok());
        assert!(matches!(
            check_password_strength("short"),
            Err(AuthError::WeakPassword)
        ));
    }
}
