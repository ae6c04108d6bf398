//! Google account connection

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use super::error::ApiError;
use super::identity::UserId;
use crate::context::AppContext;

#[derive(Debug, Deserialize)]
pub struct CallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set by Google when the user declines consent
    pub error: Option<String>,
}

/// `GET /api/auth/google/url`
pub async fn authorization_url(
    State(ctx): State<Arc<AppContext>>,
    UserId(user_id): UserId,
) -> Result<Json<Value>, ApiError> {
    let request = ctx.authorization.begin(&user_id)?;
    tracing::info!(user_id = %user_id, "issued Google authorization url");
    Ok(Json(json!({"success": true, "authUrl": request.authorization_url})))
}

/// `GET /api/auth/google/callback`
pub async fn callback(
    State(ctx): State<Arc<AppContext>>,
    Query(params): Query<CallbackParams>,
) -> Result<Json<Value>, ApiError> {
    if let Some(error) = params.error.as_deref() {
        tracing::warn!(error, "Google authorization was declined");
        return Err(ApiError::bad_request(format!("Authorization was not granted: {error}")));
    }

    let code = params.code.as_deref().map(str::trim).filter(|code| !code.is_empty());
    let state = params.state.as_deref().map(str::trim).filter(|state| !state.is_empty());
    let (Some(code), Some(state)) = (code, state) else {
        return Err(ApiError::bad_request("Missing authorization code or state"));
    };

    let user_id = ctx.authorization.complete(code, state).await?;
    tracing::info!(user_id = %user_id, "Google account connected");

    Ok(Json(json!({"success": true, "message": "Google account connected successfully"})))
}
