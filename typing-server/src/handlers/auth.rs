use std::sync::Arc;

use tracing::info;
use warp::http::StatusCode;

use super::{HandlerResult, json_reply, json_reply_with_status};
use crate::auth::{AuthError, AuthService, check_password_strength, normalize_username};
use crate::errors::reject;
use crate::password::{hash_password, verify_password};
use typing_persistence::UserRepository;
use typing_types::{AuthResponse, LoginRequest, RegisterRequest};

pub async fn register(
    request: RegisterRequest,
    auth_service: Arc<AuthService>,
    user_repository: Arc<UserRepository>,
) -> HandlerResult {
    let username = normalize_username(&request.username).map_err(reject)?;
    check_password_strength(&request.password).map_err(reject)?;

    let preferences = request.preferences.unwrap_or_default();
    let password_hash = hash_password(&request.password);
    let user = user_repository
        .create_user(&username, &password_hash, &preferences)
        .await
        .map_err(reject)?;

    let token = auth_service.issue_token(user.id).map_err(reject)?;
    info!("Registered user {}", user.username);

    Ok(json_reply_with_status(
        &AuthResponse { token, user },
        StatusCode::CREATED,
    ))
}

pub async fn login(
    request: LoginRequest,
    auth_service: Arc<AuthService>,
    user_repository: Arc<UserRepository>,
) -> HandlerResult {
    // Unknown users and wrong passwords get the same answer
    let credentials = user_repository
        .find_credentials(request.username.trim())
        .await
        .map_err(reject)?;

    let user = match credentials {
        Some((user, password_hash)) if verify_password(&request.password, &password_hash) => user,
        _ => {
            tracing::warn!("Failed login for {:?}", request.username);
            return Err(reject(AuthError::InvalidCredentials));
        }
    };

    let token = auth_service.issue_token(user.id).map_err(reject)?;
    info!("User {} logged in", user.username);

    Ok(json_reply(&AuthResponse { token, user }))
}
