//! Google connection status for the calling user

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use intentrelay_domain::IntentRelayError;
use serde_json::{json, Value};

use super::error::ApiError;
use super::identity::UserId;
use crate::context::AppContext;

/// `GET /api/user/google-status`
///
/// Connected means a credential with a refresh token is stored; an expired
/// access token still counts because the next call refreshes it.
pub async fn google_status(
    State(ctx): State<Arc<AppContext>>,
    UserId(user_id): UserId,
) -> Result<Json<Value>, ApiError> {
    let connected = match ctx.credentials.get_credential(&user_id).await {
        Ok(credential) => credential.has_refresh_token(),
        Err(IntentRelayError::NotFound(_)) => false,
        Err(err) => return Err(err.into()),
    };

    let message =
        if connected { "Google account connected" } else { "Google account not connected" };
    Ok(Json(json!({"success": true, "connected": connected, "message": message})))
}
