use std::sync::Arc;

use super::{HandlerResult, json_reply};
use crate::errors::reject;
use crate::session::Session;
use crate::user_service::UserService;
use typing_core::{PassageProvider, TypingResult};
use typing_types::{PassageResponse, SubmitTestRequest};

pub async fn text(passages: Arc<PassageProvider>) -> HandlerResult {
    let text = passages.random_passage().to_string();
    Ok(json_reply(&PassageResponse { text }))
}

pub async fn submit(
    session: Session,
    request: SubmitTestRequest,
    user_service: Arc<UserService>,
) -> HandlerResult {
    let response = user_service
        .submit_test(&session, TypingResult::from(request))
        .await
        .map_err(reject)?;
    Ok(json_reply(&response))
}
