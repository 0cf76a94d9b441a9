use std::sync::Arc;

use super::{HandlerResult, json_reply};
use crate::errors::reject;
use crate::session::Session;
use crate::user_service::UserService;
use typing_core::GameResult;
use typing_types::SubmitScoreRequest;

pub async fn score(
    session: Session,
    request: SubmitScoreRequest,
    user_service: Arc<UserService>,
) -> HandlerResult {
    let response = user_service
        .submit_score(&session, GameResult::from(request))
        .await
        .map_err(reject)?;
    Ok(json_reply(&response))
}

pub async fn leaderboard(user_service: Arc<UserService>) -> HandlerResult {
    let entries = user_service.game_leaderboard().await.map_err(reject)?;
    Ok(json_reply(&entries))
}
