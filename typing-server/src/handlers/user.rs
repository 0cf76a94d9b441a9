use std::sync::Arc;

use super::{HandlerResult, json_reply};
use crate::errors::reject;
use crate::session::Session;
use crate::user_service::UserService;

pub async fn profile(session: Session) -> HandlerResult {
    Ok(json_reply(&session.user))
}

pub async fn update_profile(
    session: Session,
    body: serde_json::Value,
    user_service: Arc<UserService>,
) -> HandlerResult {
    let user = user_service
        .update_profile(&session, body)
        .await
        .map_err(reject)?;
    Ok(json_reply(&user))
}

pub async fn stats(session: Session) -> HandlerResult {
    Ok(json_reply(&session.user.stats))
}

pub async fn history(session: Session) -> HandlerResult {
    Ok(json_reply(&session.user.test_history))
}

pub async fn achievements(session: Session) -> HandlerResult {
    Ok(json_reply(&session.user.achievements))
}

pub async fn leaderboard(user_service: Arc<UserService>) -> HandlerResult {
    let entries = user_service.typing_leaderboard().await.map_err(reject)?;
    Ok(json_reply(&entries))
}
