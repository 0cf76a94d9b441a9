use std::sync::Arc;

use super::{HandlerResult, json_reply};
use crate::errors::reject;
use typing_persistence::ErrorLogRepository;
use typing_types::{ErrorReport, MessageResponse};

pub async fn client_error(report: ErrorReport, error_logs: Arc<ErrorLogRepository>) -> HandlerResult {
    tracing::warn!(
        "Client error at {}: {}",
        report.path.as_deref().unwrap_or("-"),
        report.message.as_deref().or(report.error.as_deref()).unwrap_or("unknown error")
    );

    error_logs.record(report).await.map_err(reject)?;

    Ok(json_reply(&MessageResponse {
        message: "Error logged successfully".to_string(),
    }))
}
