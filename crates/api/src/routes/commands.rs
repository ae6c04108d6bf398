//! Command routes: free text through the model, or an already extracted
//! model response

use std::sync::Arc;
use std::time::Instant;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use intentrelay_core::actions::classifier;
use intentrelay_domain::{
    ActionKind, IntentRelayError, RawIntentResponse, Result as DomainResult, RouteOutcome,
};
use serde::Deserialize;

use super::error::ApiError;
use super::identity::UserId;
use crate::context::AppContext;
use crate::utils::logging::log_route_execution;

#[derive(Debug, Deserialize)]
pub struct ProcessRequest {
    #[serde(default)]
    pub text: Option<String>,
}

/// `POST /api/process`
pub async fn process(
    State(ctx): State<Arc<AppContext>>,
    UserId(user_id): UserId,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(request) = payload.map_err(|rejection| ApiError::from_rejection(&rejection))?;
    let text = request.text.unwrap_or_default();

    let started = Instant::now();
    let result = run_with_timeout(&ctx, ctx.router.process_text(&user_id, &text)).await?;
    let succeeded = result.as_ref().is_ok_and(RouteOutcome::success);
    log_route_execution("process", &user_id, started.elapsed(), succeeded);

    match result {
        Ok(outcome) => Ok(outcome_response(outcome)),
        Err(err) if is_request_error(&err) => request_error_response(err),
        // Anything past input validation and normalization came from the model.
        Err(err) => {
            tracing::warn!(user_id = %user_id, error = %err, "intent extraction failed");
            Err(ApiError::new(StatusCode::BAD_GATEWAY, err.detail()))
        }
    }
}

/// `POST /api/route`
pub async fn route(
    State(ctx): State<Arc<AppContext>>,
    UserId(user_id): UserId,
    payload: Result<Json<serde_json::Value>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(value) = payload.map_err(|rejection| ApiError::from_rejection(&rejection))?;
    let raw = match RawIntentResponse::from_value(value) {
        Ok(raw) => raw,
        Err(e) => {
            return request_error_response(IntentRelayError::MalformedIntent(format!(
                "Unrecognized intent payload: {e}"
            )))
        }
    };

    let started = Instant::now();
    let result = run_with_timeout(&ctx, ctx.router.route(&user_id, raw)).await?;
    let succeeded = result.as_ref().is_ok_and(RouteOutcome::success);
    log_route_execution("route", &user_id, started.elapsed(), succeeded);

    match result {
        Ok(outcome) => Ok(outcome_response(outcome)),
        Err(err) if is_request_error(&err) => request_error_response(err),
        Err(err) => Err(err.into()),
    }
}

async fn run_with_timeout<F>(
    ctx: &AppContext,
    work: F,
) -> Result<DomainResult<RouteOutcome>, ApiError>
where
    F: std::future::Future<Output = DomainResult<RouteOutcome>>,
{
    let limit = ctx.request_timeout();
    tokio::time::timeout(limit, work).await.map_err(|_| {
        tracing::warn!(timeout_secs = limit.as_secs(), "command timed out");
        ApiError::new(
            StatusCode::GATEWAY_TIMEOUT,
            format!("Request timed out after {} seconds", limit.as_secs()),
        )
    })
}

fn outcome_response(outcome: RouteOutcome) -> Response {
    let status = if outcome.success() { StatusCode::OK } else { StatusCode::BAD_REQUEST };
    (status, Json(outcome)).into_response()
}

fn is_request_error(error: &IntentRelayError) -> bool {
    matches!(
        error,
        IntentRelayError::Validation(_)
            | IntentRelayError::InvalidInput(_)
            | IntentRelayError::MalformedIntent(_)
    )
}

/// Normalization failures answer with an `UnknownIntent` action result;
/// validation failures use the plain error envelope.
fn request_error_response(error: IntentRelayError) -> Result<Response, ApiError> {
    if matches!(error, IntentRelayError::MalformedIntent(_)) {
        let result = classifier::failure_result(ActionKind::Unknown, &error);
        return Ok((StatusCode::BAD_REQUEST, Json(result)).into_response());
    }
    Err(error.into())
}
