use std::sync::Arc;

use warp::{Filter, Rejection};

use crate::auth::{AuthError, AuthService};
use crate::errors::{ApiError, reject};
use typing_persistence::{StoreError, UserRepository};
use typing_types::User;

/// The authenticated caller, resolved before the handler runs.
#[derive(Debug, Clone)]
pub struct Session {
    pub user: User,
}

impl Session {
    pub fn user_id(&self) -> uuid::Uuid {
        self.user.id
    }
}

/// Extracts a [`Session`] from the `Authorization: Bearer` header.
pub fn with_session(
    auth_service: Arc<AuthService>,
    user_repository: Arc<UserRepository>,
) -> impl Filter<Extract = (Session,), Error = Rejection> + Clone {
    warp::header::optional::<String>("authorization").and_then(move |header: Option<String>| {
        let auth_service = auth_service.clone();
        let user_repository = user_repository.clone();
        async move {
            resolve_session(header, &auth_service, &user_repository)
                .await
                .map_err(reject)
        }
    })
}

async fn resolve_session(
    header: Option<String>,
    auth_service: &AuthService,
    user_repository: &UserRepository,
) -> Result<Session, ApiError> {
    let header = header.ok_or(AuthError::MissingToken)?;
    let token = header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .ok_or(AuthError::MissingToken)?;

    let user_id = auth_service.validate_token(token)?;
    let user = user_repository
        .find_by_id(user_id)
        .await?
        .ok_or(StoreError::NotFound)?;

    Ok(Session { user })
}
