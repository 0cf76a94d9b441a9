use std::convert::Infallible;

use warp::http::StatusCode;
use warp::{Rejection, Reply};

use crate::auth::AuthError;
use typing_core::StatsError;
use typing_persistence::StoreError;
use typing_types::{ErrorBody, ErrorReason};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] StatsError),
    #[error("{message}")]
    BadRequest {
        reason: ErrorReason,
        message: String,
    },
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("{0}")]
    Internal(String),
}

impl warp::reject::Reject for ApiError {}

impl ApiError {
    pub fn bad_request(reason: ErrorReason, message: impl Into<String>) -> Self {
        ApiError::BadRequest {
            reason,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Auth(AuthError::InvalidUsername | AuthError::WeakPassword) => {
                StatusCode::BAD_REQUEST
            }
            ApiError::Auth(AuthError::TokenCreation) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::Store(StoreError::NotFound) => StatusCode::NOT_FOUND,
            ApiError::Store(StoreError::UsernameTaken) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::Conflict(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Store(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn reason(&self) -> ErrorReason {
        match self {
            ApiError::Validation(err) => err.reason(),
            ApiError::BadRequest { reason, .. } => *reason,
            ApiError::Auth(AuthError::InvalidCredentials) => ErrorReason::InvalidCredentials,
            ApiError::Auth(AuthError::InvalidUsername) => ErrorReason::InvalidUsername,
            ApiError::Auth(AuthError::WeakPassword) => ErrorReason::InvalidPassword,
            ApiError::Auth(AuthError::TokenCreation) => ErrorReason::InternalError,
            ApiError::Auth(_) => ErrorReason::Unauthorized,
            ApiError::Store(StoreError::NotFound) => ErrorReason::NotFound,
            ApiError::Store(StoreError::UsernameTaken) => ErrorReason::UsernameTaken,
            ApiError::Store(StoreError::Conflict(_)) => ErrorReason::StoreConflict,
            ApiError::Store(_) => ErrorReason::StoreFailure,
            ApiError::Internal(_) => ErrorReason::InternalError,
        }
    }

    fn public_message(&self) -> String {
        match self.status() {
            // Storage and internal details stay in the logs
            StatusCode::INTERNAL_SERVER_ERROR => "Server error".to_string(),
            _ => self.to_string(),
        }
    }

    pub fn to_response(&self) -> warp::reply::Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected ({}): {}", status.as_u16(), self);
        }

        error_response(status, self.reason(), self.public_message())
    }
}

pub fn error_response(
    status: StatusCode,
    reason: ErrorReason,
    message: impl Into<String>,
) -> warp::reply::Response {
    let body = ErrorBody {
        error: message.into(),
        reason,
    };
    warp::reply::with_status(warp::reply::json(&body), status).into_response()
}

pub fn reject(err: impl Into<ApiError>) -> Rejection {
    warp::reject::custom(err.into())
}

/// Turn every rejection into a JSON error body.
pub async fn handle_rejection(err: Rejection) -> Result<warp::reply::Response, Infallible> {
    if let Some(api_error) = err.find::<ApiError>() {
        return Ok(api_error.to_response());
    }

    if let Some(body_error) = err.find::<warp::filters::body::BodyDeserializeError>() {
        tracing::warn!("Invalid request body: {}", body_error);
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorReason::InvalidBody,
            format!("Invalid JSON: {}", body_error),
        ));
    }

    if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        return Ok(error_response(
            StatusCode::BAD_REQUEST,
            ErrorReason::InvalidBody,
            "Request body must be JSON",
        ));
    }

    if err.find::<warp::reject::LengthRequired>().is_some() {
        return Ok(error_response(
            StatusCode::LENGTH_REQUIRED,
            ErrorReason::InvalidBody,
            "Content-Length header is required",
        ));
    }

    if err.find::<warp::reject::PayloadTooLarge>().is_some() {
        return Ok(error_response(
            StatusCode::PAYLOAD_TOO_LARGE,
            ErrorReason::InvalidBody,
            "Request body too large",
        ));
    }

    if err.is_not_found() {
        return Ok(error_response(
            StatusCode::NOT_FOUND,
            ErrorReason::NotFound,
            "API endpoint not found",
        ));
    }

    if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        return Ok(error_response(
            StatusCode::METHOD_NOT_ALLOWED,
            ErrorReason::NotFound,
            "Method not allowed",
        ));
    }

    tracing::error!("Unhandled rejection: {:?}", err);
    Ok(error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        ErrorReason::InternalError,
        "Server error",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_status_and_reason_mapping() {
        let cases = [
            (
                ApiError::from(StatsError::InvalidWpm(-1.0)),
                StatusCode::BAD_REQUEST,
                ErrorReason::InvalidWpm,
            ),
            (
                ApiError::bad_request(ErrorReason::DisallowedUpdate, "Invalid updates"),
                StatusCode::BAD_REQUEST,
                ErrorReason::DisallowedUpdate,
            ),
            (
                ApiError::from(AuthError::MissingToken),
                StatusCode::UNAUTHORIZED,
                ErrorReason::Unauthorized,
            ),
            (
                ApiError::from(AuthError::InvalidCredentials),
                StatusCode::UNAUTHORIZED,
                ErrorReason::InvalidCredentials,
            ),
            (
                ApiError::from(StoreError::NotFound),
                StatusCode::NOT_FOUND,
                ErrorReason::NotFound,
            ),
            (
                ApiError::from(StoreError::Conflict(Uuid::new_v4())),
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorReason::StoreConflict,
            ),
            (
                ApiError::from(StoreError::Serialization(bad_json())),
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorReason::StoreFailure,
            ),
        ];

        for (error, status, reason) in cases {
            assert_eq!(error.status(), status, "{}", error);
            assert_eq!(error.reason(), reason, "{}", error);
        }
    }

    #[test]
    fn test_server_errors_hide_details() {
        let error = ApiError::from(StoreError::Serialization(bad_json()));
        assert_eq!(error.public_message(), "Server error");

        let error = ApiError::from(StatsError::InvalidScore(-3));
        assert_eq!(error.public_message(), "score must be non-negative, got -3");
    }

    fn bad_json() -> serde_json::Error {
        serde_json::from_str::<serde_json::Value>("{not json").unwrap_err()
    }
}
