//! Error envelope shared by every route

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use intentrelay_domain::{AuthError, IntentRelayError};
use serde_json::json;

use crate::utils::logging::error_label;

/// `{success: false, message}` with an HTTP status
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self { status, message: message.into() }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    /// Undecodable request body
    pub fn from_rejection(rejection: &JsonRejection) -> Self {
        Self::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

fn status_for(error: &IntentRelayError) -> StatusCode {
    match error {
        IntentRelayError::Validation(_)
        | IntentRelayError::InvalidInput(_)
        | IntentRelayError::MalformedIntent(_) => StatusCode::BAD_REQUEST,
        IntentRelayError::Auth(
            AuthError::StateMismatch
            | AuthError::MissingRefreshToken
            | AuthError::ExchangeFailed(_),
        ) => StatusCode::BAD_REQUEST,
        IntentRelayError::Auth(_) => StatusCode::UNAUTHORIZED,
        IntentRelayError::NotFound(_) => StatusCode::NOT_FOUND,
        IntentRelayError::Upstream(_) | IntentRelayError::Network(_) => StatusCode::BAD_GATEWAY,
        IntentRelayError::Config(_)
        | IntentRelayError::Database(_)
        | IntentRelayError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl From<IntentRelayError> for ApiError {
    fn from(error: IntentRelayError) -> Self {
        let status = status_for(&error);
        if status.is_server_error() {
            tracing::error!(error_kind = error_label(&error), error = %error, "request failed");
        } else {
            tracing::warn!(error_kind = error_label(&error), error = %error, "request rejected");
        }
        Self::new(status, error.detail())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({"success": false, "message": self.message}))).into_response()
    }
}
